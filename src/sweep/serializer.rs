use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, SweepError};
use crate::models::Assignment;
use crate::space::is_internal;

/// Separator between key and value on every config line.
pub const SEPARATOR: &str = " = ";

/// Render the public keys of an assignment as `key = value` lines, in declared order.
pub fn config_lines(assignment: &Assignment) -> Vec<String> {
    assignment
        .iter()
        .filter(|(key, _)| !is_internal(key))
        .map(|(key, value)| format!("{}{}{}", key, SEPARATOR, value))
        .collect()
}

/// Full config file text, LF-terminated lines.
pub fn render_config(assignment: &Assignment) -> String {
    let mut text = String::new();
    for line in config_lines(assignment) {
        text.push_str(&line);
        text.push('\n');
    }
    text
}

/// Write a config file, replacing any existing file at `path`.
///
/// The file is flushed and closed before returning; any write failure is
/// returned rather than leaving a silently truncated file.
pub fn write_config<P: AsRef<Path>>(path: P, assignment: &Assignment) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut out = BufWriter::new(file);
    out.write_all(render_config(assignment).as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Parse config text back into `(key, value)` pairs, splitting on the first separator.
pub fn parse_config(text: &str) -> Result<Vec<(String, String)>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(i, line)| {
            line.split_once(SEPARATOR)
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| {
                    SweepError::InvalidInput(format!(
                        "config line {} has no '{}' separator: {}",
                        i + 1,
                        SEPARATOR.trim(),
                        line
                    ))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssignedValue, ParamValue};
    use tempfile::TempDir;

    fn sample_assignment() -> Assignment {
        let mut a = Assignment::new();
        a.set("BatchSize", AssignedValue::Scalar(ParamValue::Int(128)));
        a.set("ConvPad", AssignedValue::Scalar("same".into()));
        a.set("LearningRate", AssignedValue::Scalar(0.002.into()));
        a.set("NumKernelsFirstLayer", AssignedValue::Scalar(ParamValue::Int(1024)));
        a.set(
            "NumKernels",
            AssignedValue::List(vec![
                ParamValue::Int(1024),
                ParamValue::Int(512),
                ParamValue::Int(64),
            ]),
        );
        a.set("NumKernelsLaterLayers", AssignedValue::Scalar(ParamValue::Int(512)));
        a.set("DenseSizes", AssignedValue::layer_list(Vec::<ParamValue>::new()));
        a
    }

    #[test]
    fn test_lines_skip_internal_keys() {
        let lines = config_lines(&sample_assignment());
        assert_eq!(
            lines,
            vec![
                "BatchSize = 128",
                "ConvPad = same",
                "LearningRate = 0.002",
                "NumKernels = 1024,512,64",
                "DenseSizes = 0",
            ]
        );
    }

    #[test]
    fn test_round_trip_through_text() {
        let assignment = sample_assignment();
        let parsed = parse_config(&render_config(&assignment)).unwrap();

        let expected: Vec<(String, String)> = assignment
            .iter()
            .filter(|(k, _)| !is_internal(k))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("1.config");
        std::fs::write(&path, "Stale = 1\nOther = 2\nMore = 3\nLines = 4\nHere = 5\n").unwrap();

        write_config(&path, &sample_assignment()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("Stale"));
        assert!(text.ends_with("DenseSizes = 0\n"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("1.config");
        assert!(write_config(&path, &sample_assignment()).is_err());
    }

    #[test]
    fn test_parse_rejects_malformed_line() {
        assert!(parse_config("BatchSize=128\n").is_err());
        let parsed = parse_config("Tasks = K562\n\n").unwrap();
        assert_eq!(parsed, vec![("Tasks".to_string(), "K562".to_string())]);
    }
}
