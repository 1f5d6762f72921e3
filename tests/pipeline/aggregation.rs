//! Aggregator behaviour against real files.

use framestat::{discover, Aggregator, ConfigurationKey, FrameStatError, TiePolicy};

use crate::utils::{assert_close, Workspace, STEADY_ROW};

#[test]
fn discovery_groups_by_configuration() {
    let ws = Workspace::new();
    ws.write_trial("A_TN1.csv", &[STEADY_ROW, STEADY_ROW]);
    ws.write_trial("A_TN2.csv", &[STEADY_ROW, STEADY_ROW]);
    ws.write_trial("B_TN1.csv", &[STEADY_ROW, STEADY_ROW]);
    ws.write_file("tables.csv", "\"\"\n");
    ws.write_file("notes.txt", "not a csv");

    let groups = discover(&ws.config()).unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[&ConfigurationKey::new("A")].len(), 2);
    assert_eq!(groups[&ConfigurationKey::new("B")].len(), 1);
}

#[test]
fn identical_samples_have_zero_spread() {
    let ws = Workspace::new();
    let path = ws.write_trial("GTX_fluid_TN1.csv", &[STEADY_ROW, STEADY_ROW]);

    let trial = Aggregator::new(ws.config()).summarize_file(&path).unwrap();

    assert_eq!(trial.row.total_frames, 100);
    assert_eq!(trial.row.frame_time.mean, 16.0);
    assert_eq!(trial.row.frame_time.stdev, 0.0);
    assert_eq!(trial.row.frame_time.variance, 0.0);
    assert_eq!(trial.headers[1][0], "Frames");
}

#[test]
fn variance_is_stdev_squared() {
    let ws = Workspace::new();
    let path = ws.write_trial(
        "GTX_cloth_TN1.csv",
        &[
            [1.0, 15.2, 0.0, 4.1, 4.1, 1.0, 12.0, 11.0],
            [2.0, 16.9, 0.5, 5.3, 4.8, 0.2, 13.1, 12.9],
            [3.0, 17.4, 2.0, 6.0, 4.0, 2.0, 14.0, 12.0],
            [4.0, 14.8, 0.0, 3.9, 3.9, 0.7, 11.5, 10.8],
        ],
    );

    let row = Aggregator::new(ws.config()).summarize_file(&path).unwrap().row;

    assert_eq!(row.total_frames, 4);
    for m in row.metrics() {
        assert_close(m.stdev * m.stdev, m.variance, "stdev^2");
    }
}

#[test]
fn single_data_row_is_fatal() {
    let ws = Workspace::new();
    let path = ws.write_trial("GTX_short_TN1.csv", &[STEADY_ROW]);

    let err = Aggregator::new(ws.config()).summarize_file(&path).unwrap_err();
    match err {
        FrameStatError::InsufficientSamples { source_name, got, .. } => {
            assert!(source_name.contains("GTX_short_TN1.csv"));
            assert_eq!(got, 1);
        }
        other => panic!("Expected InsufficientSamples, got {:?}", other),
    }
}

#[test]
fn run_writes_blocks_in_key_order() {
    let ws = Workspace::new();
    ws.write_trial("B_x_TN1.csv", &[STEADY_ROW, STEADY_ROW]);
    ws.write_trial("A_x_TN2.csv", &[STEADY_ROW, STEADY_ROW]);
    ws.write_trial("A_x_TN1.csv", &[STEADY_ROW, STEADY_ROW]);

    let report = Aggregator::new(ws.config()).run().unwrap();

    assert_eq!(report.files_processed(), 3);
    let keys: Vec<&str> = report.configurations.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["A_x", "B_x"]);

    let a = &report.configurations[0];
    assert!(a.trials[0].ends_with("A_x_TN1.csv"));
    assert!(a.trials[1].ends_with("A_x_TN2.csv"));
    // Header rows come from the last trial processed.
    assert_eq!(a.headers[0][0], "A_x_TN2.csv simulation");

    let tables = ws.read_tables();
    let lines: Vec<&str> = tables.lines().collect();
    // 2 leading blanks + (GPU, 2 headers, labels, 2 rows, 3 blanks) + (4 + 1 + 3)
    assert_eq!(lines.len(), 2 + 9 + 8);
    assert_eq!(lines[0], "\"\"");
    assert_eq!(lines[2], "\"A\"");
    assert!(lines[5].starts_with("\"Total Frames\""));
    assert_eq!(lines[11], "\"B\"");
}

#[test]
fn run_resets_previous_tables() {
    let ws = Workspace::new();
    ws.write_file("tables.csv", "\"old\"\n\"content\"\n");
    ws.write_trial("A_TN1.csv", &[STEADY_ROW, STEADY_ROW]);

    Aggregator::new(ws.config()).run().unwrap();

    let tables = ws.read_tables();
    assert!(!tables.contains("old"));
    assert!(tables.starts_with("\"\"\n\"\"\n\"A\"\n"));
}

#[test]
fn failing_configuration_leaves_no_partial_block() {
    let ws = Workspace::new();
    ws.write_trial("Z_TN1.csv", &[STEADY_ROW, STEADY_ROW]);
    ws.write_trial("Z_TN2.csv", &[STEADY_ROW]);

    let err = Aggregator::new(ws.config()).run().unwrap_err();
    assert!(err.is_insufficient_samples());

    // Only the reset content: the Z block was never appended.
    assert_eq!(ws.read_tables(), "\"\"\n\"\"\n");
}

#[test]
fn malformed_row_names_file_and_line() {
    let ws = Workspace::new();
    ws.write_file(
        "GTX_bad_TN1.csv",
        "GTX\nheader\nlabels\n1,16,0,8,8,8,16,8\n2,16,0,8\n",
    );

    let err = Aggregator::new(ws.config()).run().unwrap_err();
    match err {
        FrameStatError::MalformedRow { path, line, .. } => {
            assert!(path.ends_with("GTX_bad_TN1.csv"));
            assert_eq!(line, 5);
        }
        other => panic!("Expected MalformedRow, got {:?}", other),
    }
}

#[test]
fn tie_policy_changes_difference() {
    let ws = Workspace::new();
    // Row 1: compute first, diff = 8 - 4 = 4. Row 2: tie at 3.
    let path = ws.write_trial(
        "GTX_tie_TN1.csv",
        &[
            [1.0, 16.0, 0.0, 8.0, 8.0, 4.0, 12.0, 8.0],
            [2.0, 16.0, 3.0, 9.0, 6.0, 3.0, 10.0, 7.0],
        ],
    );

    let carry = Aggregator::new(ws.config()).summarize_file(&path).unwrap();
    assert_eq!(carry.row.difference.mean, 4.0);
    assert_eq!(carry.row.difference.variance, 0.0);

    let zero = Aggregator::new(ws.config().tie_policy(TiePolicy::Zero))
        .summarize_file(&path)
        .unwrap();
    assert_eq!(zero.row.difference.mean, 2.0);
    assert_close(zero.row.difference.variance, 8.0, "variance of [4, 0]");
}

#[test]
fn empty_directory_produces_empty_report() {
    let ws = Workspace::new();
    let report = Aggregator::new(ws.config()).run().unwrap();
    assert!(report.configurations.is_empty());
    assert_eq!(ws.read_tables(), "\"\"\n\"\"\n");
}

#[test]
fn tables_file_in_input_dir_is_not_rediscovered() {
    let ws = Workspace::new();
    ws.write_trial("GTX_fluid_TN1.csv", &[STEADY_ROW, STEADY_ROW]);
    let config = ws.config().tables_path(ws.path().join("results.csv"));

    let first = Aggregator::new(config.clone()).run().unwrap();
    let second = Aggregator::new(config).run().unwrap();

    assert_eq!(first.files_processed(), 1);
    assert_eq!(second.files_processed(), 1);
    let keys: Vec<&str> = second.configurations.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["GTX_fluid"]);
}

#[test]
fn blank_led_header_row_is_fatal() {
    let ws = Workspace::new();
    ws.write_file(
        "GTX_blank_TN1.csv",
        "GTX\n,particles,4096\nlabels\n1,16,0,8,8,8,16,8\n2,16,0,8,8,8,16,8\n",
    );

    let err = Aggregator::new(ws.config()).run().unwrap_err();
    match err {
        FrameStatError::MalformedRow { path, line, .. } => {
            assert!(path.ends_with("GTX_blank_TN1.csv"));
            assert_eq!(line, 2);
        }
        other => panic!("Expected MalformedRow, got {:?}", other),
    }
    assert_eq!(ws.read_tables(), "\"\"\n\"\"\n");
}
