//! Shared helpers for pipeline tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use framestat::Config;
use tempfile::TempDir;

/// One raw row: `[totalFrames, frameTime, cStart, cEnd, cTime, gStart, gEnd, gTime]`.
pub type RawRow = [f64; 8];

/// The two-identical-samples row used throughout.
pub const STEADY_ROW: RawRow = [100.0, 16.0, 0.0, 8.0, 8.0, 8.0, 16.0, 8.0];

const RAW_LABELS: &str = "Frames,FrameTime,ComputeStart,ComputeEnd,ComputeTime,\
GraphicsStart,GraphicsEnd,GraphicsTime,Unused,Unused";

/// A scratch directory holding trial files.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> Config {
        Config::in_dir(self.path())
    }

    pub fn tables_path(&self) -> PathBuf {
        self.path().join("tables.csv")
    }

    /// Write a trial file with the standard three metadata rows.
    pub fn write_trial(&self, name: &str, rows: &[RawRow]) -> PathBuf {
        let gpu = name.split('_').next().unwrap_or("GPU");
        let mut text = format!("{}\n{} simulation,particles,4096\n{}\n", gpu, name, RAW_LABELS);
        for row in rows {
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    if i == 0 {
                        format!("{}", *v as u64)
                    } else {
                        format!("{}", v)
                    }
                })
                .collect();
            text.push_str(&cells.join(","));
            text.push_str(",0,0\n");
        }
        self.write_file(name, &text)
    }

    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, contents).expect("write file");
        path
    }

    pub fn read_tables(&self) -> String {
        fs::read_to_string(self.tables_path()).expect("read tables")
    }
}

pub fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "{}: expected {}, got {}",
        what,
        expected,
        actual
    );
}
