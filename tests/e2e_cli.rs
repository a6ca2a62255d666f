//! Requirements file to report and exit status, through the library and the binary

mod helper;

use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::TempDir;

use deltaver::app::{self, RunError};
use deltaver::audit::Auditor;
use deltaver::config::DeltaverConfig;
use deltaver::report::ThresholdViolation;
use deltaver::version::catalog::CatalogOrder;
use deltaver::version::registries::PypiRegistry;

use helper::create_pypi_body;

const REQUESTS: &[(&str, &[&str])] = &[
    ("1.0.0", &["2020-01-01T00:00:00"]),
    ("1.1.0", &["2020-06-01T00:00:00"]),
];

const HTTPX: &[(&str, &[&str])] = &[
    ("0.26.0", &["2023-12-20T00:00:00"]),
    ("0.27.0", &["2024-02-21T00:00:00"]),
];

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn auditor(server: &mockito::Server) -> Auditor {
    Auditor::new(
        Arc::new(PypiRegistry::new(&server.url())),
        CatalogOrder::UploadTime,
    )
    .with_today(NaiveDate::from_ymd_opt(2021, 6, 1).unwrap())
}

async fn mock_package(server: &mut mockito::Server, name: &str, releases: &[(&str, &[&str])]) {
    server
        .mock("GET", format!("/pypi/{}/json", name).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(create_pypi_body(releases))
        .create_async()
        .await;
}

#[tokio::test]
async fn run_fails_when_max_delta_exceeds_limit() {
    let mut server = mockito::Server::new_async().await;
    mock_package(&mut server, "requests", REQUESTS).await;
    mock_package(&mut server, "httpx", HTTPX).await;

    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "requirements.txt", "requests==1.0.0\nhttpx==0.27.0\n");
    let config = DeltaverConfig {
        fail_on_max: 30,
        ..Default::default()
    };

    let outcome = app::run(&config, &path, &auditor(&server)).await.unwrap();

    assert!(!outcome.passed());
    assert_eq!(
        outcome.violations,
        vec![ThresholdViolation::Max {
            limit: 30,
            actual: 365
        }]
    );

    let rendered = outcome.report.render();
    assert!(rendered.contains("requests"));
    assert!(!rendered.contains("httpx"));
    assert!(rendered.ends_with("Max delta: 365\nAverage delta: 365.00\n"));
}

#[tokio::test]
async fn run_passes_without_limits_and_detects_poetry_lock() {
    let mut server = mockito::Server::new_async().await;
    mock_package(&mut server, "requests", REQUESTS).await;

    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "poetry.lock",
        "[[package]]\nname = \"requests\"\nversion = \"1.1.0\"\n",
    );

    let outcome = app::run(&DeltaverConfig::default(), &path, &auditor(&server))
        .await
        .unwrap();

    assert!(outcome.passed());
    assert!(outcome.report.rows.is_empty());
    assert!(outcome.report.render().ends_with("Max delta: 0\nAverage delta: 0\n"));
}

#[tokio::test]
async fn run_reports_unreadable_and_malformed_files() {
    let server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();

    let missing = dir.path().join("requirements.txt");
    let result = app::run(&DeltaverConfig::default(), &missing, &auditor(&server)).await;
    assert!(matches!(result, Err(RunError::Io { .. })));

    let malformed = write_file(&dir, "requirements.txt", "!!not a requirement\n");
    let result = app::run(&DeltaverConfig::default(), &malformed, &auditor(&server)).await;
    assert!(matches!(
        result,
        Err(RunError::Parse { format: "freezed", .. })
    ));
}

#[tokio::test]
async fn run_reports_failing_package_with_its_line() {
    let mut server = mockito::Server::new_async().await;
    mock_package(&mut server, "requests", REQUESTS).await;
    server
        .mock("GET", "/pypi/ghost/json")
        .with_status(404)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "requirements.txt", "requests==1.0.0\nghost==0.1\n");

    let err = app::run(&DeltaverConfig::default(), &path, &auditor(&server))
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "ghost==0.1 (line 2): Package not found: ghost"
    );
}

fn run_binary(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_deltaver"))
        .args(args)
        .env("XDG_CONFIG_HOME", dir.path())
        .env_remove("DELTAVER_LOG")
        .output()
        .unwrap()
}

#[test]
fn binary_exits_with_failure_when_limit_exceeded() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/pypi/requests/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(create_pypi_body(REQUESTS))
        .expect(2)
        .create();

    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "requirements.txt", "requests==1.0.0\n");
    let path = path.to_str().unwrap();
    let url = server.url();

    let failing = run_binary(
        &dir,
        &[path, "--artifactory-domain", &url, "--fail-on-max", "30"],
    );
    assert_eq!(failing.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&failing.stdout);
    assert!(stdout.contains("requests"));
    assert!(stdout.contains("Max delta: "));
    assert!(String::from_utf8_lossy(&failing.stderr).contains("exceeds limit 30"));

    let passing = run_binary(&dir, &[path, "--artifactory-domain", &url]);
    assert_eq!(passing.status.code(), Some(0));
}

#[test]
fn binary_merges_config_file_with_command_line() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/pypi/requests/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(create_pypi_body(REQUESTS))
        .create();

    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "requirements.txt", "requests==1.0.0\n");
    let config = write_file(
        &dir,
        "deltaver.json",
        &format!(
            r#"{{"artifactoryDomain": "{}", "failOnMax": 30}}"#,
            server.url()
        ),
    );
    let path = path.to_str().unwrap();
    let config = config.to_str().unwrap();

    let from_file = run_binary(&dir, &[path, "--config", config]);
    assert_eq!(from_file.status.code(), Some(1));

    let overridden = run_binary(&dir, &[path, "--config", config, "--fail-on-max", "0"]);
    assert_eq!(overridden.status.code(), Some(0));
}
