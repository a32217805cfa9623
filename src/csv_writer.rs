// src/csv_writer.rs
//
// Append-only numeric sink. One record per fitted frame:
//   radius,curvature,arc_length,base_x,base_y
// each formatted to two decimals. A frame whose tip (hence arc length) is
// missing writes the literal `nan` in the arc field; a frame with no circle
// fit writes no record at all.

use crate::types::FrameResult;
use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

pub struct CsvSink {
    file: File,
}

impl CsvSink {
    pub fn create(path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening csv output {path}"))?;
        Ok(Self { file })
    }

    /// Append the frame's record, flushing so every completed frame is
    /// durable even if a later frame fails. Returns whether a record was
    /// written.
    pub fn append(&mut self, result: &FrameResult) -> Result<bool> {
        match format_record(result) {
            Some(line) => {
                writeln!(self.file, "{}", line)?;
                self.file.flush()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

pub fn format_record(result: &FrameResult) -> Option<String> {
    let circle = result.circle?;
    let base = result.base?;
    let arc = match result.arc_length {
        Some(v) => format!("{:.2}", v),
        None => "nan".to_string(),
    };
    Some(format!(
        "{:.2},{:.2},{},{:.2},{:.2}",
        circle.radius,
        circle.curvature(),
        arc,
        base.0,
        base.1
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CircleModel, FrameResult};

    fn fitted_result(arc: Option<f64>) -> FrameResult {
        FrameResult {
            circle: Some(CircleModel {
                cx: 100.0,
                cy: 100.0,
                radius: 50.0,
            }),
            plausible: true,
            base: Some((100.0, 150.0)),
            arc_length: arc,
            ..Default::default()
        }
    }

    #[test]
    fn test_record_with_arc() {
        let line = format_record(&fitted_result(Some(157.0796))).unwrap();
        assert_eq!(line, "50.00,0.02,157.08,100.00,150.00");
    }

    #[test]
    fn test_record_without_arc_uses_sentinel() {
        let line = format_record(&fitted_result(None)).unwrap();
        assert_eq!(line, "50.00,0.02,nan,100.00,150.00");
    }

    #[test]
    fn test_unfitted_frame_writes_nothing() {
        assert!(format_record(&FrameResult::default()).is_none());
    }

    #[test]
    fn test_append_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut sink = CsvSink::create(path.to_str().unwrap()).unwrap();

        assert!(sink.append(&fitted_result(Some(10.0))).unwrap());
        assert!(!sink.append(&FrameResult::default()).unwrap());
        assert!(sink.append(&fitted_result(None)).unwrap());

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains(",nan,"));
    }
}
