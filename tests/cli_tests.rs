//! Integration tests for the CLI application
//!
//! These tests verify that the CLI commands work correctly with real data files.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{NamedTempFile, TempDir};

/// Helper to create test data files
struct TestDataFiles {
    pub train_file: NamedTempFile,
    pub test_file: NamedTempFile,
    pub multiclass_file: NamedTempFile,
    pub regression_file: NamedTempFile,
}

impl TestDataFiles {
    fn new() -> std::io::Result<Self> {
        // Two-class training data with a header
        let mut train_file = NamedTempFile::with_suffix(".csv")?;
        writeln!(train_file, "feature1,feature2,label")?;
        writeln!(train_file, "2.0,1.0,yes")?;
        writeln!(train_file, "-2.0,-1.0,no")?;
        writeln!(train_file, "1.5,0.8,yes")?;
        writeln!(train_file, "-1.5,-0.8,no")?;
        writeln!(train_file, "1.8,0.9,yes")?;
        writeln!(train_file, "-1.8,-0.9,no")?;
        train_file.flush()?;

        let mut test_file = NamedTempFile::with_suffix(".csv")?;
        writeln!(test_file, "feature1,feature2,label")?;
        writeln!(test_file, "1.6,0.7,yes")?;
        writeln!(test_file, "-1.6,-0.7,no")?;
        test_file.flush()?;

        // Three classes, no header
        let mut multiclass_file = NamedTempFile::with_suffix(".csv")?;
        for (x, y, label) in [
            (0.0, 3.0, "a"),
            (0.2, 3.2, "a"),
            (-0.2, 2.9, "a"),
            (3.0, 0.0, "b"),
            (3.1, 0.3, "b"),
            (2.8, -0.2, "b"),
            (-3.0, -3.0, "c"),
            (-3.2, -2.8, "c"),
            (-2.9, -3.1, "c"),
        ] {
            writeln!(multiclass_file, "{x},{y},{label}")?;
        }
        multiclass_file.flush()?;

        // y = 2 x + 1
        let mut regression_file = NamedTempFile::with_suffix(".csv")?;
        writeln!(regression_file, "x,y")?;
        for i in 0..12 {
            let x = i as f64 * 0.5;
            writeln!(regression_file, "{x},{}", 2.0 * x + 1.0)?;
        }
        regression_file.flush()?;

        Ok(TestDataFiles {
            train_file,
            test_file,
            multiclass_file,
            regression_file,
        })
    }
}

/// Get the path to the compiled CLI binary
fn get_cli_binary_path() -> &'static str {
    env!("CARGO_BIN_EXE_lssvm")
}

fn run(args: &[&str]) -> Output {
    Command::new(get_cli_binary_path())
        .args(args)
        .output()
        .expect("Failed to run CLI")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("Temp path is not valid UTF-8")
}

fn train_model(data: &Path, model: &Path, extra: &[&str]) {
    let mut args = vec!["train", "--data", path_str(data), "--output", path_str(model)];
    args.extend_from_slice(extra);
    let output = run(&args);
    assert!(
        output.status.success(),
        "Train command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_cli_train_command() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    train_model(
        test_data.train_file.path(),
        &model_path,
        &[
            "--kernel",
            "rbf",
            "--sigma",
            "1.0",
            "--gamma",
            "10",
            "--tolerance",
            "1e-8",
            "--max-iterations",
            "100",
        ],
    );
    assert!(model_path.exists(), "Model file was not created");

    let content = std::fs::read_to_string(&model_path).expect("Failed to read model");
    let json: serde_json::Value = serde_json::from_str(&content).expect("Model is not JSON");
    assert_eq!(json["format_version"], 1);
    assert_eq!(json["task"], "classification");
    assert_eq!(json["classes"], serde_json::json!(["no", "yes"]));
    assert!(json["metadata"]["created_at"].is_string());
}

#[test]
fn test_cli_train_each_kernel() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    for kernel in ["linear", "poly", "rbf", "sigmoid"] {
        let model_path = temp_dir.path().join(format!("{kernel}.json"));
        train_model(
            test_data.train_file.path(),
            &model_path,
            &["--kernel", kernel],
        );
        assert!(model_path.exists(), "No model for kernel {kernel}");
    }
}

#[test]
fn test_cli_info_command() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");
    train_model(test_data.multiclass_file.path(), &model_path, &[]);

    let output = run(&["info", path_str(&model_path)]);
    assert!(output.status.success(), "Info command failed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("LS-SVM Model Summary"));
    assert!(stdout.contains("Classes (3): a, b, c"));
    assert!(stdout.contains("Sub-models: 3"));
    assert!(stdout.contains("a vs b"));
    assert!(stdout.contains("b vs c"));
}

#[test]
fn test_cli_predict_command() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");
    let predictions_path = temp_dir.path().join("predictions.txt");
    train_model(test_data.train_file.path(), &model_path, &[]);

    let output = run(&[
        "predict",
        "--model",
        path_str(&model_path),
        "--data",
        path_str(test_data.test_file.path()),
        "--output",
        path_str(&predictions_path),
    ]);
    assert!(
        output.status.success(),
        "Predict command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let content = std::fs::read_to_string(&predictions_path).expect("Failed to read predictions");
    let lines: Vec<&str> = content.lines().filter(|l| !l.starts_with('#')).collect();
    assert_eq!(lines, vec!["0 yes", "1 no"]);
}

#[test]
fn test_cli_predict_with_scores() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");
    train_model(test_data.multiclass_file.path(), &model_path, &[]);

    let output = run(&[
        "predict",
        "--model",
        path_str(&model_path),
        "--data",
        path_str(test_data.multiclass_file.path()),
        "--scores",
    ]);
    assert!(output.status.success(), "Predict command failed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("scores[a b c]"));
    // First sample is class a with both of its pair votes
    assert!(stdout.lines().any(|l| l.starts_with("0 a 2.000000 ")));
    let n_predictions = stdout.lines().filter(|l| !l.starts_with('#')).count();
    assert_eq!(n_predictions, 9);
}

#[test]
fn test_cli_evaluate_command() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");
    train_model(test_data.train_file.path(), &model_path, &[]);

    let output = run(&[
        "evaluate",
        "--model",
        path_str(&model_path),
        "--data",
        path_str(test_data.test_file.path()),
        "--detailed",
    ]);
    assert!(output.status.success(), "Evaluate command failed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Model Evaluation"));
    assert!(stdout.contains("Accuracy: 100.00%"));
    assert!(stdout.contains("Confusion Matrix"));
    assert!(stdout.contains("Macro F1"));
}

#[test]
fn test_cli_regression_workflow() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("regressor.json");
    train_model(
        test_data.regression_file.path(),
        &model_path,
        &["--task", "regression", "--kernel", "linear", "--gamma", "1000"],
    );

    let output = run(&[
        "evaluate",
        "--model",
        path_str(&model_path),
        "--data",
        path_str(test_data.regression_file.path()),
    ]);
    assert!(output.status.success(), "Evaluate command failed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Task: Regression"));
    assert!(stdout.contains("MSE:"));

    let output = run(&[
        "predict",
        "--model",
        path_str(&model_path),
        "--data",
        path_str(test_data.regression_file.path()),
    ]);
    assert!(output.status.success(), "Predict command failed");
    let first: f64 = String::from_utf8_lossy(&output.stdout)
        .lines()
        .find(|l| !l.starts_with('#'))
        .and_then(|l| l.split_whitespace().nth(1))
        .and_then(|v| v.parse().ok())
        .expect("No prediction printed");
    assert!((first - 1.0).abs() < 0.05, "prediction = {first}");
}

#[test]
fn test_cli_regression_rejects_class_labels() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    let output = run(&[
        "train",
        "--data",
        path_str(test_data.train_file.path()),
        "--output",
        path_str(&model_path),
        "--task",
        "regression",
    ]);
    assert!(!output.status.success());
    assert!(!model_path.exists());
}

#[test]
fn test_cli_tune_command() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("best.json");

    let output = run(&[
        "tune",
        "--data",
        path_str(test_data.multiclass_file.path()),
        "--ratio",
        "0.7",
        "--grid-size",
        "3",
        "--output",
        path_str(&model_path),
    ]);
    assert!(
        output.status.success(),
        "Tune command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Grid Search Results"));
    assert!(stdout.contains("Best: gamma="));
    assert_eq!(stdout.lines().filter(|l| l.contains("accuracy=")).count(), 10);
    assert!(model_path.exists());
}

#[test]
fn test_cli_tune_reports_invalid_parameters() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let data = path_str(test_data.train_file.path());

    let cases: [&[&str]; 2] = [
        &["tune", "--data", data, "--ratio", "1.5", "--grid-size", "2"],
        &["tune", "--data", data, "-k", "poly", "--degree", "0", "--grid-size", "2"],
    ];
    for args in cases {
        let output = run(args);
        assert!(!output.status.success(), "{args:?} should fail");

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(
            stderr.contains("Error: Invalid parameter"),
            "{args:?} reported: {stderr}"
        );
        assert!(!stderr.contains("No grid point"));
        assert!(!String::from_utf8_lossy(&output.stdout).contains("Grid Search Results"));
    }
}

#[test]
fn test_cli_error_handling_invalid_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    let output = run(&[
        "train",
        "--data",
        "nonexistent.csv",
        "--output",
        path_str(&model_path),
    ]);
    assert!(!output.status.success(), "Should fail with nonexistent file");
}

#[test]
fn test_cli_invalid_parameters() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    for extra in [["--gamma", "0"], ["--sigma", "0"], ["--kernel", "cubic"]] {
        let mut args = vec![
            "train",
            "--data",
            path_str(test_data.train_file.path()),
            "--output",
            path_str(&model_path),
        ];
        args.extend_from_slice(&extra);
        let output = run(&args);
        assert!(!output.status.success(), "Should reject {extra:?}");
    }
    assert!(!model_path.exists());
}

#[test]
fn test_cli_single_class_rejected() {
    let mut data = NamedTempFile::with_suffix(".csv").expect("Failed to create temp file");
    writeln!(data, "1.0,2.0,only").expect("Failed to write");
    writeln!(data, "2.0,1.0,only").expect("Failed to write");
    data.flush().expect("Failed to flush");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    let output = run(&[
        "train",
        "--data",
        path_str(data.path()),
        "--output",
        path_str(&model_path),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("at least 2 distinct classes"));
}

#[test]
fn test_cli_corrupt_model_rejected() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let mut model = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(model, "{{\"format_version\": 1}}").expect("Failed to write");
    model.flush().expect("Failed to flush");

    let output = run(&[
        "predict",
        "--model",
        path_str(model.path()),
        "--data",
        path_str(test_data.test_file.path()),
    ]);
    assert!(!output.status.success());
}

#[test]
fn test_cli_verbose_and_debug_flags() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    train_model(test_data.train_file.path(), &model_path, &["--verbose"]);
    train_model(test_data.train_file.path(), &model_path, &["--debug"]);
    assert!(model_path.exists());
}

#[test]
fn test_cli_help_output() {
    let output = run(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Least Squares Support Vector Machines"));
    for command in ["train", "predict", "evaluate", "info", "tune"] {
        assert!(stdout.contains(command), "help does not mention {command}");
    }
}

#[test]
fn test_cli_version_output() {
    let output = run(&["--version"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}
