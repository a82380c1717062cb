use crate::error::{LayoutError, Result};
use crate::optimize::LayoutRecord;
use chrono::Local;
use csv::WriterBuilder;
use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};
use strum_macros::{Display, EnumString};

/// Which files a run writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ExportFormat {
    Json,
    Csv,
    Both,
}

impl ExportFormat {
    pub fn writes_json(self) -> bool {
        matches!(self, ExportFormat::Json | ExportFormat::Both)
    }

    pub fn writes_csv(self) -> bool {
        matches!(self, ExportFormat::Csv | ExportFormat::Both)
    }
}

fn timestamped_path(output_dir: Option<&Path>, extension: &str) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let filename = format!("layout_{timestamp}.{extension}");

    if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir).map_err(|e| LayoutError::CreateDir {
            path: dir.to_path_buf(),
            source: e,
        })?;
        Ok(dir.join(filename))
    } else {
        Ok(filename.into())
    }
}

fn create_file(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| LayoutError::CreateFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(BufWriter::new(file))
}

/// Writes the records as a pretty JSON array, the renderer's input format
pub fn export_layout_json(records: &[LayoutRecord], output_dir: Option<&Path>) -> Result<PathBuf> {
    let file_path = timestamped_path(output_dir, "json")?;
    let writer = create_file(&file_path)?;
    serde_json::to_writer_pretty(writer, records)?;
    Ok(file_path)
}

/// Writes the records as `Name,Level,Column,Row`
pub fn export_layout_csv(records: &[LayoutRecord], output_dir: Option<&Path>) -> Result<PathBuf> {
    let file_path = timestamped_path(output_dir, "csv")?;
    let writer = create_file(&file_path)?;

    #[allow(unused_mut)]
    let mut builder = WriterBuilder::new();
    #[cfg(windows)]
    {
        use csv::Terminator;
        builder = builder.terminator(Terminator::CRLF);
    }
    let mut wtr = builder.from_writer(writer);

    wtr.write_record(["Name", "Level", "Column", "Row"])?;
    for record in records {
        let level = u8::from(record.level).to_string();
        let col = record.position[0].to_string();
        let row = record.position[1].to_string();
        wtr.write_record([record.name.as_str(), &level, &col, &row])?;
    }

    wtr.flush()?;
    Ok(file_path)
}

/// Reads a layout previously written by [`export_layout_json`]
pub fn read_layout_json<P: AsRef<Path>>(path: P) -> Result<Vec<LayoutRecord>> {
    let file = File::open(path)?;
    let records = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DetailLevel;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn sample() -> Vec<LayoutRecord> {
        vec![
            LayoutRecord {
                name: "alpha".to_string(),
                level: DetailLevel::Detailed,
                position: [0, 2],
            },
            LayoutRecord {
                name: "gamma".to_string(),
                level: DetailLevel::Icon,
                position: [6, 3],
            },
        ]
    }

    #[test]
    fn test_export_json_reads_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = export_layout_json(&sample(), Some(temp_dir.path())).unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("layout_"));
        assert!(name.ends_with(".json"));

        let records = read_layout_json(&path).unwrap();
        assert_eq!(records, sample());
    }

    #[test]
    fn test_csv_content_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = export_layout_csv(&sample(), Some(temp_dir.path())).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();

        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["Name,Level,Column,Row", "alpha,2,0,2", "gamma,0,6,3"]);
    }

    #[test]
    fn test_export_empty_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = export_layout_json(&[], Some(temp_dir.path())).unwrap();
        assert!(read_layout_json(&path).unwrap().is_empty());

        let path = export_layout_csv(&[], Some(temp_dir.path())).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), "Name,Level,Column,Row");
    }

    #[test]
    fn test_creates_nested_output_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("runs").join("today");
        let path = export_layout_json(&sample(), Some(&nested)).unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }

    #[test]
    fn test_read_rejects_bad_level() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, r#"[{"name":"a","level":7,"position":[0,0]}]"#).unwrap();
        assert!(matches!(read_layout_json(&path), Err(LayoutError::Json(_))));
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!(ExportFormat::from_str("both").unwrap(), ExportFormat::Both);
        assert!(ExportFormat::Json.writes_json());
        assert!(!ExportFormat::Json.writes_csv());
        assert!(ExportFormat::from_str("xml").is_err());
    }
}
