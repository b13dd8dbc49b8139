//! End-to-end tests for Salesboard CLI commands.
//!
//! These tests verify that the CLI produces expected output
//! when run against real data files.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin for tests

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

const ORDERS_CSV: &str = "\
Row ID,Order ID,Order Date,Region,Segment,Category,Sub-Category,Ship Mode,City,Customer ID,Sales,Profit,Quantity,Discount
1,CA-1,2017-01-05,West,Consumer,Furniture,Chairs,Second Class,Seattle,C1,100,10,2,0
2,CA-2,2017-02-11,East,Corporate,Technology,Phones,First Class,Boston,C2,200,40,1,0.2
3,CA-3,2017-03-02,East,Consumer,Technology,Phones,Standard Class,Boston,C3,300,-30,4,0.4
4,CA-4,2017-04-20,South,Home Office,Office Supplies,Paper,Same Day,Miami,C1,400,60,5,0
";

/// Create a temporary directory with a data file.
struct TestData {
    temp_dir: TempDir,
    data_path: PathBuf,
}

impl TestData {
    fn new(filename: &str, contents: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let data_path = temp_dir.path().join(filename);
        fs::write(&data_path, contents).expect("Failed to write data file");

        Self { temp_dir, data_path }
    }

    fn orders() -> Self {
        Self::new("orders.csv", ORDERS_CSV)
    }

    fn path(&self) -> &PathBuf {
        &self.data_path
    }

    fn dir(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }
}

fn salesboard() -> Command {
    let mut cmd = Command::cargo_bin("salesboard").expect("Failed to find binary");
    cmd.env_remove("SALESBOARD_BASE_PATH");
    cmd
}

// =============================================================================
// Report
// =============================================================================

#[test]
fn test_report_all_rows() {
    let data = TestData::orders();

    salesboard()
        .arg("--data")
        .arg(data.path())
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Sales        Rs. 1,000.00"))
        .stdout(predicate::str::contains("Unique Customers   3"))
        .stdout(predicate::str::contains("Mean = 1,000.00 / 4 = 250.00"))
        .stdout(predicate::str::contains("Std Dev = √16,666.67 = 129.10"))
        .stdout(predicate::str::contains("IQR = 325.00 - 175.00 = 150.00"));
}

#[test]
fn test_report_with_filters() {
    let data = TestData::orders();

    salesboard()
        .arg("report")
        .arg("--data")
        .arg(data.path())
        .args(["--region", "East", "--segment", "Consumer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rows: 1 of 4 (25.0%)"))
        .stdout(predicate::str::contains("Total Sales        Rs. 300.00"))
        .stdout(predicate::str::contains("Variance = Not enough data"));
}

#[test]
fn test_report_unknown_region_is_empty() {
    let data = TestData::orders();

    salesboard()
        .arg("report")
        .arg("--data")
        .arg(data.path())
        .args(["--region", "Atlantis"])
        .assert()
        .success()
        .stderr(predicate::str::contains("unknown region 'Atlantis'"))
        .stdout(predicate::str::contains("warning").not())
        .stdout(predicate::str::contains("Mean = Not enough data"))
        .stdout(predicate::str::contains("NaN").not());
}

#[test]
fn test_base_path_env_locates_default_file() {
    let data = TestData::new("BA_Dataset.csv", ORDERS_CSV);

    // The default file name is BA_Dataset.xlsx, which does not exist here.
    salesboard()
        .env("SALESBOARD_BASE_PATH", data.dir())
        .arg("report")
        .assert()
        .failure()
        .stderr(predicate::str::contains("BA_Dataset.xlsx"))
        .stderr(predicate::str::contains("hint:"));

    salesboard()
        .env("SALESBOARD_BASE_PATH", data.dir())
        .arg("--data")
        .arg(data.path())
        .arg("report")
        .assert()
        .success();
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn test_export_writes_csv() {
    let data = TestData::orders();
    let output = data.dir().join("filtered_data.csv");

    salesboard()
        .arg("--data")
        .arg(data.path())
        .arg("export")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 4 rows"));

    let text = fs::read_to_string(&output).expect("Export file should exist");
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Row ID,Order ID,Order Date,Region,Segment,Category,Sub-Category,Ship Mode,City,\
         Customer ID,Sales,Profit,Quantity,Discount"
    );
    assert_eq!(lines.count(), 4);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_missing_data_file() {
    let data = TestData::orders();

    salesboard()
        .arg("--data")
        .arg(data.dir().join("missing.xlsx"))
        .arg("report")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.xlsx"))
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn test_missing_column() {
    let data = TestData::new(
        "orders.csv",
        "Order ID,Order Date,Region\nCA-1,2017-01-05,West\n",
    );

    salesboard()
        .arg("--data")
        .arg(data.path())
        .arg("report")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required column 'Segment' not found"));
}

#[test]
fn test_unsupported_format() {
    let data = TestData::new("orders.json", "[]");

    salesboard()
        .arg("--data")
        .arg(data.path())
        .arg("export")
        .assert()
        .failure();
}

#[test]
fn test_invalid_target() {
    let data = TestData::orders();

    salesboard()
        .arg("--data")
        .arg(data.path())
        .args(["serve", "--target", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Sales target must be a positive number"));
}
