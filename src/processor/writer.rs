//! Row output for parsed sections
//!
//! Writes rows as CSV (flexible record lengths, since each zone has its own
//! arity) or as JSON lines tagged with the producing zone. Files are written
//! to a hidden `.partial` sibling and renamed into place once complete.

use crate::config::{OutputFormat, ProcessorConfig};
use crate::error::{Result, SimError};
use crate::models::BepsRow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Write rows as CSV records, returning the number written
pub fn write_csv<W: Write>(rows: &[BepsRow], mut writer: W) -> Result<usize> {
    let mut csv_writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    for row in rows {
        csv_writer.write_record(row.fields())?;
    }
    let bytes = csv_writer
        .into_inner()
        .map_err(|e| SimError::Write(e.into_error()))?;

    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(rows.len())
}

/// Write rows as newline-delimited JSON objects
pub fn write_jsonl<W: Write>(rows: &[BepsRow], mut writer: W) -> Result<usize> {
    for row in rows {
        let mut line = serde_json::to_vec(row)?;
        line.push(b'\n');
        writer.write_all(&line)?;
    }
    writer.flush()?;

    Ok(rows.len())
}

pub fn write_rows<W: Write>(rows: &[BepsRow], format: OutputFormat, writer: W) -> Result<usize> {
    match format {
        OutputFormat::Csv => write_csv(rows, writer),
        OutputFormat::Jsonl => write_jsonl(rows, writer),
    }
}

/// Write rows to `path`, creating parent directories as needed.
///
/// `path` only ever holds a complete file: a failed write leaves nothing
/// behind.
pub fn write_rows_to_file(rows: &[BepsRow], format: OutputFormat, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SimError::io(parent, e))?;
    }

    let partial = partial_path_for(path);
    let result = write_partial(rows, format, &partial).and_then(|written| {
        fs::rename(&partial, path).map_err(|e| SimError::io(path, e))?;
        Ok(written)
    });

    match result {
        Ok(written) => {
            debug!("Wrote {} rows to {}", written, path.display());
            Ok(written)
        }
        Err(e) => {
            if let Err(cleanup) = fs::remove_file(&partial) {
                if partial.exists() {
                    warn!("Could not remove {}: {}", partial.display(), cleanup);
                }
            }
            Err(e)
        }
    }
}

fn write_partial(rows: &[BepsRow], format: OutputFormat, partial: &Path) -> Result<usize> {
    let file = File::create(partial).map_err(|e| SimError::io(partial, e))?;
    write_rows(rows, format, BufWriter::new(file)).map_err(|e| e.with_path(partial))
}

/// Hidden sibling that receives the rows before the rename
fn partial_path_for(path: &Path) -> PathBuf {
    let name = path.file_name().unwrap_or_default().to_string_lossy();
    path.with_file_name(format!(".{}.partial", name))
}

/// Output path for an input report: `<stem>.<report code>.<ext>`
pub fn output_path_for(input: &Path, config: &ProcessorConfig) -> PathBuf {
    let stem = input
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();
    let file_name = format!(
        "{}.{}.{}",
        stem,
        config.report_code.to_lowercase(),
        config.output_format.extension()
    );

    match &config.output_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryHeader, NoteRow, PercentHoursRecord};
    use tempfile::TempDir;

    fn rows() -> Vec<BepsRow> {
        vec![
            BepsRow::Categories(CategoryHeader::default()),
            BepsRow::PercentHours(PercentHoursRecord {
                label: "HOURS ANY ZONE ABOVE COOLING THROTTLING RANGE".to_string(),
                value: "0".to_string(),
            }),
            BepsRow::Note(NoteRow {
                text: "NOTE:  ENERGY IS APPORTIONED HOURLY".to_string(),
            }),
        ]
    }

    #[test]
    fn test_csv_allows_varying_arity() {
        let mut buffer = Vec::new();
        let written = write_csv(&rows(), &mut buffer).unwrap();
        assert_eq!(written, 3);

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("METER,TYPE,UNIT,LIGHTS,TASK LIGHTS"));
        assert!(lines[0].contains("PUMPS & AUX"));
        assert_eq!(lines[1], "HOURS ANY ZONE ABOVE COOLING THROTTLING RANGE,0");
        assert_eq!(lines[2], "NOTE:  ENERGY IS APPORTIONED HOURLY");
    }

    #[test]
    fn test_jsonl_one_object_per_row() {
        let mut buffer = Vec::new();
        write_jsonl(&rows(), &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let values: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(values.len(), 3);
        assert_eq!(values[0]["zone"], "categories");
        assert_eq!(values[1]["zone"], "percent_hours");
        assert_eq!(values[2]["text"], "NOTE:  ENERGY IS APPORTIONED HOURLY");
    }

    #[test]
    fn test_write_rows_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("out.csv");

        let written = write_rows_to_file(&rows(), OutputFormat::Csv, &path).unwrap();
        assert_eq!(written, 3);
        assert!(path.exists());
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("no space left on device"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failures_are_io_errors() {
        for format in [OutputFormat::Csv, OutputFormat::Jsonl] {
            match write_rows(&rows(), format, FullDisk).unwrap_err() {
                SimError::Write(source) => {
                    assert_eq!(source.to_string(), "no space left on device")
                }
                other => panic!("Expected Write error for {format}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_write_leaves_no_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.jsonl");

        write_rows_to_file(&rows(), OutputFormat::Jsonl, &path).unwrap();

        let names: Vec<String> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["out.jsonl"]);
    }

    #[test]
    fn test_failed_rename_cleans_up() {
        let temp_dir = TempDir::new().unwrap();
        // A directory in the way makes the final rename fail
        let path = temp_dir.path().join("out.csv");
        fs::create_dir_all(path.join("occupied")).unwrap();

        match write_rows_to_file(&rows(), OutputFormat::Csv, &path).unwrap_err() {
            SimError::Io { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("Expected Io error, got {other:?}"),
        }
        assert!(!partial_path_for(&path).exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_output_path_naming() {
        let config = ProcessorConfig::default();
        assert_eq!(
            output_path_for(Path::new("/runs/office.SIM"), &config),
            PathBuf::from("/runs/office.beps.csv")
        );

        let config = config
            .with_output_dir(PathBuf::from("/out"))
            .with_output_format(OutputFormat::Jsonl);
        assert_eq!(
            output_path_for(Path::new("/runs/office.SIM"), &config),
            PathBuf::from("/out/office.beps.jsonl")
        );
    }
}
