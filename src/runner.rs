use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use apiscout::config::{read_path_list, ScanConfig, Wordlists};
use apiscout::discover::ChromiumObserver;
use apiscout::output::{write_json, ScanReport};
use apiscout::Scanner;

use crate::cli::Cli;

fn init_logging(cli: &Cli) {
    // Keep external crates quiet unless something is wrong.
    use tracing_subscriber::EnvFilter;
    let crate_level = if cli.debug { "debug" } else if cli.verbose { "info" } else { "warn" };
    let filter_str = format!(
        "apiscout={crate},reqwest=info,hyper=info,h2=info,chromiumoxide=warn",
        crate = crate_level
    );
    let env_filter = EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new(crate_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(true)
        .with_target(false)
        .init();
}

pub async fn run_from_cli(cli: Cli) -> ExitCode {
    init_logging(&cli);

    let Some(target) = cli.target.clone() else {
        eprintln!("usage: apiscout <target-url> [--out=results.json] [--paths=file] [--puppeteer] [--fuzz]");
        return ExitCode::from(2);
    };

    match run_scan(&cli, &target).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("scan failed: {:#}", e);
            eprintln!("[!] Scan failed: {:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run_scan(cli: &Cli, target: &str) -> anyhow::Result<()> {
    let config = ScanConfig {
        concurrency: cli.concurrency.max(1),
        timeout_ms: cli.timeout,
        delay_ms: cli.delay,
        fuzz: cli.fuzz,
        ..ScanConfig::default()
    };

    let mut wordlists = Wordlists::default();
    if let Some(paths_file) = &cli.paths {
        let extra = read_path_list(Path::new(paths_file))?;
        println!("[*] Loaded {} extra paths from {}", extra.len(), paths_file);
        wordlists = wordlists.with_extra_paths(extra);
    }

    let mut scanner = Scanner::new(config, wordlists)?;
    if cli.puppeteer {
        match ChromiumObserver::new(Duration::from_millis(cli.browser_wait)) {
            Ok(observer) => scanner = scanner.with_observer(Box::new(observer)),
            Err(e) => {
                tracing::warn!("browser observation disabled: {}", e);
                println!("[!] Browser observation unavailable ({}), continuing without it", e);
            }
        }
    }

    println!("[>] Target: {}", target);
    if cli.fuzz {
        println!("[·] Mode: Fuzz");
    }

    let report = scanner.run(target).await?;
    print_summary(&report);

    let out = PathBuf::from(&cli.out);
    write_json(&out, &report)?;
    println!("[+] Report written to {}", out.display());
    Ok(())
}

fn print_summary(report: &ScanReport) {
    println!("\n{}", "-".repeat(60));
    println!("[*] HTML candidates:   {}", report.html_candidates.len());
    println!("[*] Script URLs:       {}", report.script_urls.len());
    println!("[*] Script candidates: {}", report.script_candidates.len());
    if let Some(urls) = &report.dynamic_urls {
        println!("[*] Browser-observed:  {}", urls.len());
    }
    for hit in report.swagger_found() {
        println!("[+] Swagger/OpenAPI:  {} ({})", hit.url, hit.status);
    }
    let maybe = report.swagger_probes.len() - report.swagger_found().count();
    if maybe > 0 {
        println!("[~] Possible JSON docs: {}", maybe);
    }
    for finding in &report.config_hints {
        println!("[+] Hints in {}: {}", finding.source, finding.hints.len());
    }
    println!("[*] Reachable API URLs: {}", report.api_probes.len());
    if !report.suggested_bases.is_empty() {
        println!("\n[*] Suggested API bases:");
        for b in &report.suggested_bases {
            println!("    {}", b);
        }
    }
    println!("{}\n", "-".repeat(60));
}
