
use assert_cmd::prelude::*;
use cli_helpers::*;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn invalid_window_is_rejected_without_fetching() {
    let home = TempDir::new().expect("failed to create temp home");
    let bcb = mockito::Server::new();
    let yahoo = mockito::Server::new();

    base_cmd(&home, &bcb, &yahoo)
        .args(["--no-color", "--as-of", "2024-07-15", "13"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("invalid input"))
        .stdout(predicate::str::contains("'13'"));
}

#[test]
fn json_report_for_start_month() {
    let home = TempDir::new().expect("failed to create temp home");
    let mut bcb = mockito::Server::new();
    let mut yahoo = mockito::Server::new();
    let bcb_mock = mock_bcb_june(&mut bcb);
    let yahoo_mock = mock_yahoo_june(&mut yahoo);

    let output = base_cmd(&home, &bcb, &yahoo)
        .args(["--json", "--as-of", "2024-07-15", "jun/24"])
        .output()
        .expect("failed to run indicadores");

    assert!(output.status.success());
    bcb_mock.assert();
    yahoo_mock.assert();

    let report: Value = serde_json::from_slice(&output.stdout).expect("stdout is not JSON");
    assert_eq!(report["month_count"], 1);
    assert_eq!(report["start_date"], "2024-06-01");

    let columns: Vec<&str> = report["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap())
        .collect();
    assert_eq!(columns.len(), 14);
    assert_eq!(&columns[..2], ["IGPM", "IGPM-accumulated"]);
    assert_eq!(&columns[12..], ["IBOV", "IBOV-accumulated"]);

    let rows = report["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["month"], "jun/24");

    let values = rows[0]["values"].as_array().unwrap();
    // CDI observed and accumulated over a single month
    assert_eq!(values[6].as_f64(), Some(0.5));
    assert_eq!(values[7].as_f64(), Some(0.5));
    // IBOV last close of the month, rebased on itself
    assert_eq!(values[12].as_f64(), Some(110.0));
    assert_eq!(values[13].as_f64(), Some(0.0));

    assert_eq!(report["chart"].as_array().unwrap().len(), 7);
}

#[test]
fn all_sources_down_is_insufficient_data() {
    let home = TempDir::new().expect("failed to create temp home");
    let mut bcb = mockito::Server::new();
    let mut yahoo = mockito::Server::new();
    mock_failure(&mut bcb);
    mock_failure(&mut yahoo);

    base_cmd(&home, &bcb, &yahoo)
        .args(["--no-color", "--as-of", "2024-07-15", "12"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("insufficient data"));
}

#[test]
fn table_output_has_no_color_when_requested() {
    let home = TempDir::new().expect("failed to create temp home");
    let mut bcb = mockito::Server::new();
    let mut yahoo = mockito::Server::new();
    mock_bcb_june(&mut bcb);
    mock_yahoo_june(&mut yahoo);

    base_cmd(&home, &bcb, &yahoo)
        .args(["--no-color", "--as-of", "2024-07-15", "jun/24"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Consolidated economic indicators"))
        .stdout(predicate::str::contains("CDI-accumulated"))
        .stdout(predicate::str::contains("Accumulated indicators over the last 1 months"))
        .stdout(predicate::str::contains("\u{001b}[").not());
}

#[test]
fn json_requires_a_window() {
    let home = TempDir::new().expect("failed to create temp home");
    let bcb = mockito::Server::new();
    let yahoo = mockito::Server::new();

    base_cmd(&home, &bcb, &yahoo)
        .arg("--json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("WINDOW"));
}

#[test]
fn failed_market_source_leaves_its_columns_out() {
    let home = TempDir::new().expect("failed to create temp home");
    let mut bcb = mockito::Server::new();
    let mut yahoo = mockito::Server::new();
    mock_bcb_june(&mut bcb);
    mock_failure(&mut yahoo);

    let output = base_cmd(&home, &bcb, &yahoo)
        .args(["--json", "--as-of", "2024-07-15", "jun/24"])
        .output()
        .expect("failed to run indicadores");

    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).expect("stdout is not JSON");

    let columns: Vec<&str> = report["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap())
        .collect();
    assert_eq!(
        columns,
        [
            "IGPM",
            "IGPM-accumulated",
            "INCC",
            "INCC-accumulated",
            "IPCA",
            "IPCA-accumulated",
            "CDI",
            "CDI-accumulated",
            "POUP",
            "POUP-accumulated",
        ]
    );
    assert_eq!(report["rows"].as_array().unwrap().len(), 1);
    assert_eq!(report["chart"].as_array().unwrap().len(), 5);
}
