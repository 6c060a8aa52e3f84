use anyhow::anyhow;
use apiscout::classify::Classification;
use apiscout::config::{ScanConfig, Wordlists};
use apiscout::discover::{DynamicObserver, Observation};
use apiscout::Scanner;
use async_trait::async_trait;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LANDING: &str = r#"<!doctype html>
<html><head>
  <link rel="manifest" href="/manifest.json">
  <script src="/static/app.js"></script>
</head><body>
  <script>fetch("/api/v1/status").then(r => r.json());</script>
</body></html>"#;

const APP_JS: &str = r#"const client = axios.create({ baseURL: "http://127.0.0.1:9/v2" });
const spec = "/docs/openapi.json";
"#;

fn test_config() -> ScanConfig {
    ScanConfig { concurrency: 4, delay_ms: 0, timeout_ms: 2_000, ..ScanConfig::default() }
}

fn test_wordlists() -> Wordlists {
    Wordlists {
        swagger_paths: vec!["/swagger.json".into()],
        config_paths: vec!["/config.json".into()],
        fuzz_prefixes: vec![],
        fuzz_basenames: vec![],
    }
}

async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(LANDING, "text/html"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/static/app.js"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(APP_JS, "application/javascript"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/openapi.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"openapi":"3.0.0","paths":{}}"#, "application/json"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/config.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"apiUrl":"/gateway/v1"}"#, "application/json"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/manifest.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"name":"shop"}"#, "application/json"))
        .mount(server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/api/v1/status"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_scan_merges_every_source() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let uri = server.uri();

    let scanner = Scanner::new(test_config(), test_wordlists()).unwrap();
    let report = scanner.run(&uri).await.unwrap();

    assert!(report.stats.landing_page_fetched);
    assert_eq!(report.html_candidates, vec!["/api/v1/status".to_string()]);
    assert_eq!(report.script_urls, vec![format!("{}/static/app.js", uri)]);
    assert!(report.script_candidates.contains(&"http://127.0.0.1:9/v2".to_string()));
    assert!(report.swagger_files.contains(&"/docs/openapi.json".to_string()));
    assert!(report.swagger_files.contains(&format!("{}/manifest.json", uri)));

    let found: Vec<_> = report.swagger_found().map(|h| h.url.clone()).collect();
    assert_eq!(found, vec![format!("{}/docs/openapi.json", uri)]);

    let config_hint = report
        .config_hints
        .iter()
        .find(|f| f.source.ends_with("/config.json"))
        .expect("config.json hints");
    assert_eq!(config_hint.hints, vec!["/gateway/v1".to_string()]);
    assert!(!report.config_hints.iter().any(|f| f.source.ends_with("/manifest.json")));

    assert_eq!(report.api_probes.len(), 1);
    assert_eq!(report.api_probes[0].classification, Classification::Reachable { status: 200 });

    assert_eq!(
        report.suggested_bases,
        vec![
            "http://127.0.0.1:9/".to_string(),
            format!("{}/gateway/v1/", uri),
            format!("{}/", uri),
            format!("{}/docs/", uri),
        ]
    );
    assert!(report.dynamic_urls.is_none());
}

struct StaticObserver {
    live_url: String,
}

#[async_trait]
impl DynamicObserver for StaticObserver {
    async fn observe(&self, _url: &Url) -> anyhow::Result<Observation> {
        Ok(Observation {
            rendered_markup: r#"<script>window.cfg = { endpoint: "/api/v2/rendered/" };
const http = axios.create({ baseURL: "/api/rendered-gw" });</script>"#
                .into(),
            observed_urls: vec![self.live_url.clone()],
        })
    }
}

struct MissingObserver;

#[async_trait]
impl DynamicObserver for MissingObserver {
    async fn observe(&self, _url: &Url) -> anyhow::Result<Observation> {
        Err(anyhow!("browser not installed"))
    }
}

#[tokio::test]
async fn observer_urls_join_the_candidate_pipeline() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    Mock::given(method("HEAD"))
        .and(path("/api/v2/live"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let uri = server.uri();
    let live_url = format!("{}/api/v2/live", uri);

    let scanner = Scanner::new(test_config(), test_wordlists())
        .unwrap()
        .with_observer(Box::new(StaticObserver { live_url: live_url.clone() }));
    let report = scanner.run(&uri).await.unwrap();

    assert_eq!(report.dynamic_urls, Some(vec![live_url.clone()]));
    assert!(report.html_candidates.contains(&"/api/v2/rendered/".to_string()));
    assert!(report.api_probes.iter().any(|h| h.url == live_url));

    let rendered = report
        .config_hints
        .iter()
        .find(|f| f.source.ends_with("(rendered)"))
        .expect("hints from rendered markup");
    assert_eq!(rendered.hints, vec!["/api/rendered-gw".to_string()]);
    assert!(report.suggested_bases.contains(&format!("{}/api/rendered-gw/", uri)));
}

#[tokio::test]
async fn observed_urls_survive_the_api_probe_cap() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    Mock::given(method("HEAD"))
        .and(path("/api/v2/live"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let uri = server.uri();
    let live_url = format!("{}/api/v2/live", uri);

    let config = ScanConfig { max_api_probes: 1, ..test_config() };
    let scanner = Scanner::new(config, test_wordlists())
        .unwrap()
        .with_observer(Box::new(StaticObserver { live_url: live_url.clone() }));
    let report = scanner.run(&uri).await.unwrap();

    assert_eq!(report.stats.api_targets, 1);
    assert_eq!(report.api_probes.len(), 1);
    assert_eq!(report.api_probes[0].url, live_url);
}

#[tokio::test]
async fn script_and_api_candidate_limits_apply() {
    let server = MockServer::start().await;
    let landing = r#"<html><head>
  <script src="/s0.js"></script>
  <script src="/s1.js"></script>
  <script src="/s2.js"></script>
  <script src="/s3.js"></script>
  <script src="/s4.js"></script>
</head><body>
  <script>const a = "/api/a/"; const b = "/api/b/"; const c = "/api/c/"; const d = "/api/d/";</script>
</body></html>"#;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(landing, "text/html"))
        .mount(&server)
        .await;
    for i in 0..5 {
        Mock::given(method("GET"))
            .and(path(format!("/s{}.js", i)))
            .respond_with(ResponseTemplate::new(200).set_body_raw("var x = 1;", "application/javascript"))
            .mount(&server)
            .await;
    }

    let config = ScanConfig { max_scripts: 2, max_api_probes: 2, ..test_config() };
    let scanner = Scanner::new(config, test_wordlists()).unwrap();
    let report = scanner.run(&server.uri()).await.unwrap();

    assert_eq!(report.script_urls.len(), 5);
    assert_eq!(report.stats.scripts_fetched, 2);
    assert_eq!(report.stats.scripts_failed, 0);
    assert_eq!(report.html_candidates.len(), 4);
    assert_eq!(report.stats.api_targets, 2);
}

#[tokio::test]
async fn missing_observer_degrades_gracefully() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let scanner = Scanner::new(test_config(), test_wordlists())
        .unwrap()
        .with_observer(Box::new(MissingObserver));
    let report = scanner.run(&server.uri()).await.unwrap();

    assert!(report.dynamic_urls.is_none());
    assert!(!report.suggested_bases.is_empty());
}

#[tokio::test]
async fn unreachable_target_still_produces_a_report() {
    let config = ScanConfig { timeout_ms: 500, ..test_config() };
    let scanner = Scanner::new(config, test_wordlists()).unwrap();
    let report = scanner.run("http://127.0.0.1:9").await.unwrap();

    assert!(!report.stats.landing_page_fetched);
    assert!(report.html_candidates.is_empty());
    assert!(report.swagger_probes.is_empty());
    assert!(report.suggested_bases.is_empty());
}

#[tokio::test]
async fn invalid_target_is_an_error() {
    let scanner = Scanner::new(test_config(), test_wordlists()).unwrap();
    assert!(scanner.run("ftp://example.com").await.is_err());
}
