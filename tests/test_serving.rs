//! Integration test: serving hooks end-to-end

use molino::data::TRAIN_FILE_NAME;
use molino::serving::{input_fn, model_fn, output_fn, predict_fn};
use molino::training::{self, TrainingConfig};
use ndarray::array;
use ndarray_npy::WriteNpyExt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

fn train_model(train_dir: &Path, model_dir: &Path) {
    let mut file = File::create(train_dir.join(TRAIN_FILE_NAME)).unwrap();
    writeln!(file, "a,b,rendimiento_t_h").unwrap();
    for i in 1..=10 {
        writeln!(file, "{},{},{}", i, 2 * i, 3 * i).unwrap();
    }

    let config = TrainingConfig {
        n_estimators: 20,
        random_state: 42,
        model_dir: model_dir.to_path_buf(),
        train_dir: train_dir.to_path_buf(),
    };
    training::run(&config).unwrap();
}

#[test]
fn test_equivalent_matrices_across_encodings() {
    let json = input_fn(b"[[1.0, 2.0], [3.0, 4.0]]", "application/json").unwrap();
    let csv = input_fn(b"1,2\n3,4", "text/csv").unwrap();

    let mut npy_bytes: Vec<u8> = Vec::new();
    array![[1.0, 2.0], [3.0, 4.0]].write_npy(&mut npy_bytes).unwrap();
    let npy = input_fn(&npy_bytes, "application/x-npy").unwrap();

    assert_eq!(json, csv);
    assert_eq!(json, npy);
    assert_eq!(json, array![[1.0, 2.0], [3.0, 4.0]]);
}

#[test]
fn test_unsupported_content_type_names_offender() {
    let err = input_fn(b"<matrix/>", "text/xml").unwrap_err();
    assert!(err.to_string().contains("text/xml"));
}

#[test]
fn test_malformed_payload_for_declared_type() {
    assert!(input_fn(b"{not a matrix}", "application/json").is_err());
    assert!(input_fn(b"1,two\n3,4", "text/csv").is_err());
    assert!(input_fn(b"\x00\x01", "application/x-npy").is_err());
}

#[test]
fn test_prediction_length_matches_row_count() {
    let train_dir = TempDir::new().unwrap();
    let model_dir = TempDir::new().unwrap();
    train_model(train_dir.path(), model_dir.path());
    let model = model_fn(model_dir.path()).unwrap();

    for n_rows in [1usize, 3, 7] {
        let body = (0..n_rows)
            .map(|i| format!("{},{}", i, 2 * i))
            .collect::<Vec<String>>()
            .join("\n");
        let matrix = input_fn(body.as_bytes(), "text/csv").unwrap();
        let prediction = predict_fn(&matrix, &model).unwrap();
        assert_eq!(prediction.len(), n_rows);
    }
}

#[test]
fn test_output_json_round_trips() {
    let prediction = array![1.25, -3.5, 100.0];
    let (body, content_type) = output_fn(&prediction, "application/json").unwrap();

    assert_eq!(content_type, "application/json");
    let parsed: Vec<f64> = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed, prediction.to_vec());
}

#[test]
fn test_output_json_accepts_charset_qualifier() {
    let prediction = array![1.0];
    let (_, content_type) =
        output_fn(&prediction, "application/json; charset=utf-8").unwrap();
    assert_eq!(content_type, "application/json");
}

#[test]
fn test_output_csv_one_line_per_value_no_header() {
    let prediction = array![1.0, 2.0, 3.0, 4.0];
    let (body, content_type) = output_fn(&prediction, "text/csv").unwrap();

    assert_eq!(content_type, "text/csv");
    assert_eq!(body.lines().count(), prediction.len());
    assert!(!body.starts_with("rendimiento"));
    for line in body.lines() {
        line.parse::<f64>().unwrap();
    }
}

#[test]
fn test_unsupported_accept_type_names_offender() {
    let err = output_fn(&array![1.0], "application/xml").unwrap_err();
    assert!(err.to_string().contains("application/xml"));
}

#[test]
fn test_end_to_end_request_flow() {
    let train_dir = TempDir::new().unwrap();
    let model_dir = TempDir::new().unwrap();
    train_model(train_dir.path(), model_dir.path());

    assert!(model_dir.path().join("model.joblib").exists());

    let model = model_fn(model_dir.path()).unwrap();

    let matrix = input_fn(b"[[1.0, 2.0]]", "application/json").unwrap();
    assert_eq!(matrix, array![[1.0, 2.0]]);

    let prediction = predict_fn(&matrix, &model).unwrap();
    assert_eq!(prediction.len(), 1);

    let (body, content_type) = output_fn(&prediction, "text/csv").unwrap();
    assert_eq!(content_type, "text/csv");
    assert_eq!(body.lines().count(), 1);
}

#[test]
fn test_model_fn_missing_artifact_fails() {
    let model_dir = TempDir::new().unwrap();
    assert!(model_fn(model_dir.path()).is_err());
}
