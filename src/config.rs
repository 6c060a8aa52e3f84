use std::path::Path;
use std::time::Duration;

use anyhow::Context;

/// Tunables for one scan run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Number of probe workers.
    pub concurrency: usize,
    /// Hard limit for every single network attempt.
    pub timeout_ms: u64,
    /// Pause each worker takes after every target.
    pub delay_ms: u64,
    /// Upper bound on the body prefix kept from a probe response.
    pub max_body_bytes: usize,
    /// Upper bound on the bytes read from one external script.
    pub max_script_bytes: usize,
    pub max_scripts: usize,
    pub max_api_probes: usize,
    /// Expand the swagger probe set with the prefix x basename cross-product.
    pub fuzz: bool,
    pub user_agent: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            timeout_ms: 10_000,
            delay_ms: 15,
            max_body_bytes: 512 * 1024,
            max_script_bytes: 2 * 1024 * 1024,
            max_scripts: 40,
            max_api_probes: 150,
            fuzz: false,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

impl ScanConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Fixed path lists injected into the scanner at construction time.
#[derive(Debug, Clone)]
pub struct Wordlists {
    pub swagger_paths: Vec<String>,
    pub config_paths: Vec<String>,
    pub fuzz_prefixes: Vec<String>,
    pub fuzz_basenames: Vec<String>,
}

const SWAGGER_PATHS: &[&str] = &[
    "/swagger.json",
    "/swagger.yaml",
    "/swagger.yml",
    "/openapi.json",
    "/openapi.yaml",
    "/openapi.yml",
    "/api-docs",
    "/api-docs.json",
    "/api/swagger.json",
    "/api/openapi.json",
    "/api/v1/swagger.json",
    "/api/v2/swagger.json",
    "/api/v3/openapi.json",
    "/v1/api-docs",
    "/v2/api-docs",
    "/v3/api-docs",
    "/swagger/v1/swagger.json",
    "/swagger/docs/v1",
    "/docs/swagger.json",
    "/api/docs",
    "/docs",
    "/redoc",
    "/swagger",
    "/swagger/",
    "/swagger/index.html",
    "/swagger-ui",
    "/swagger-ui/",
    "/swagger-ui.html",
    "/swagger-ui/index.html",
    "/api/swagger-ui.html",
    "/.well-known/openapi.json",
];

const CONFIG_PATHS: &[&str] = &[
    "/config.json",
    "/config.js",
    "/app-config.json",
    "/assets/config.json",
    "/assets/env.json",
    "/env.js",
    "/env.json",
    "/env-config.js",
    "/runtime-config.js",
    "/settings.json",
    "/appsettings.json",
    "/appsettings.Production.json",
    "/manifest.json",
    "/asset-manifest.json",
    "/package.json",
    "/static/config.json",
];

const FUZZ_PREFIXES: &[&str] = &[
    "",
    "/api",
    "/api/v1",
    "/api/v2",
    "/api/v3",
    "/v1",
    "/v2",
    "/v3",
    "/docs",
    "/api/docs",
    "/swagger",
    "/openapi",
    "/public",
    "/internal",
];

const FUZZ_BASENAMES: &[&str] = &[
    "swagger",
    "openapi",
    "api-docs",
    "api",
    "docs",
    "spec",
    "schema",
    "swagger-ui",
    "definition",
];

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for Wordlists {
    fn default() -> Self {
        Self {
            swagger_paths: owned(SWAGGER_PATHS),
            config_paths: owned(CONFIG_PATHS),
            fuzz_prefixes: owned(FUZZ_PREFIXES),
            fuzz_basenames: owned(FUZZ_BASENAMES),
        }
    }
}

impl Wordlists {
    /// Append caller-supplied paths to the swagger probe list.
    pub fn with_extra_paths(mut self, extra: Vec<String>) -> Self {
        self.swagger_paths.extend(extra);
        self
    }
}

/// Read a newline-delimited path list. Blank lines and `#` comments are skipped.
pub fn read_path_list(path: &Path) -> anyhow::Result<Vec<String>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading path list {}", path.display()))?;
    Ok(parse_path_list(&data))
}

pub fn parse_path_list(data: &str) -> Vec<String> {
    data.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}
