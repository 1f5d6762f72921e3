//! Aggregator output fed straight into the collator.

use framestat::output::to_json;
use framestat::{Aggregator, Collator};

use crate::utils::{assert_close, Workspace, STEADY_ROW};

#[test]
fn single_trial_averages_equal_summary_row() {
    let ws = Workspace::new();
    ws.write_trial(
        "GTX1080_fluid_4096_TN1.csv",
        &[
            [10.0, 16.1, 0.0, 4.0, 4.0, 1.0, 12.0, 11.0],
            [20.0, 16.7, 2.0, 6.5, 4.5, 0.5, 12.5, 12.0],
            [30.0, 15.9, 1.0, 5.0, 4.0, 1.0, 13.0, 12.0],
        ],
    );
    let config = ws.config();

    let report = Aggregator::new(config.clone()).run().unwrap();
    let expected = report.configurations[0].rows[0];

    let datasets = Collator::new(config).collate().unwrap();
    assert_eq!(datasets.len(), 1);
    let ds = &datasets[0];

    assert_eq!(ds.gpu, "GTX1080");
    assert_eq!(ds.rows.len(), 1);
    assert_eq!(ds.rows[0], expected);

    let a = &ds.averages;
    assert_close(a.total_frames, expected.total_frames as f64, "total frames");
    let pairs = [
        (a.frame_time, expected.frame_time),
        (a.compute_time, expected.compute_time),
        (a.graphics_time, expected.graphics_time),
        (a.difference, expected.difference),
    ];
    for (got, want) in pairs {
        assert_close(got.mean, want.mean, "mean");
        assert_close(got.variance, want.variance, "variance");
        assert_close(got.stdev, want.stdev, "stdev");
    }

    // Averages of one trial serialize to the trial's own cells.
    let averages = ds.average_fields();
    let written = expected.to_fields();
    assert_eq!(averages.len(), written.len());
    assert_eq!(averages[0], "30.0");
    assert_eq!(&averages[1..], &written[1..]);
}

#[test]
fn many_configurations_round_trip() {
    let ws = Workspace::new();
    for gpu in ["GTX1080", "RX580", "UHD630"] {
        for trial in 1..=3 {
            ws.write_trial(
                &format!("{}_cloth_TN{}.csv", gpu, trial),
                &[STEADY_ROW, STEADY_ROW, STEADY_ROW],
            );
        }
    }
    let config = ws.config();

    Aggregator::new(config.clone()).run().unwrap();
    let datasets = Collator::new(config).collate().unwrap();

    let gpus: Vec<&str> = datasets.iter().map(|d| d.gpu.as_str()).collect();
    assert_eq!(gpus, vec!["GTX1080", "RX580", "UHD630"]);
    for ds in &datasets {
        assert_eq!(ds.trial_count(), 3);
        assert_eq!(ds.header.len(), 13);
        assert_close(ds.averages.frame_time.mean, 16.0, "frame time");
        assert_close(ds.averages.frame_time.stdev, 0.0, "frame stdev");
    }

    let json = to_json(&datasets).unwrap();
    assert!(json.contains("\"UHD630\""));
}
