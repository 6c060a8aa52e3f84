use clap::Parser;

#[derive(clap::Parser, Debug)]
#[command(author, version, about = "Discover undocumented API surface: API-like fragments, Swagger/OpenAPI docs, leaked backend URLs", long_about = None)]
pub struct Cli {
    /// Target URL or host (e.g. https://example.com)
    pub target: Option<String>,

    /// Output file for the JSON report
    #[arg(long, default_value = "results.json")]
    pub out: String,

    /// Additional newline-delimited path list to probe
    #[arg(long)]
    pub paths: Option<String>,

    /// Drive a headless browser to observe runtime requests
    #[arg(long, alias = "browser", default_value_t = false)]
    pub puppeteer: bool,

    /// Browser wait time in ms after page load
    #[arg(long, default_value_t = 3000_u64)]
    pub browser_wait: u64,

    /// Expand the swagger probe set with prefix/basename/suffix combinations
    #[arg(long, default_value_t = false)]
    pub fuzz: bool,

    /// Number of concurrent probe workers
    #[arg(short = 'c', long, default_value_t = 8_usize)]
    pub concurrency: usize,

    /// Per-request timeout in ms
    #[arg(long, default_value_t = 10_000_u64)]
    pub timeout: u64,

    /// Politeness delay per worker between requests, in ms
    #[arg(long, default_value_t = 15_u64)]
    pub delay: u64,

    /// Enable verbose logging
    #[arg(long, default_value_t = false)]
    pub verbose: bool,

    /// Enable detailed debug logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
