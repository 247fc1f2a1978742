//! Append-only CSV output partitioned by block index

use {
    async_trait::async_trait,
    std::{
        fs::OpenOptions,
        io::Write,
        path::{Path, PathBuf},
    },
};

#[derive(Debug)]
pub enum WriterError {
    Io(std::io::Error),
}

impl From<std::io::Error> for WriterError {
    fn from(err: std::io::Error) -> Self {
        WriterError::Io(err)
    }
}

impl std::fmt::Display for WriterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriterError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for WriterError {}

/// One committed window aggregate
#[derive(Debug, Clone, PartialEq)]
pub struct WindowRow {
    /// Zero-padded `HH:MM` wall-clock label
    pub time_label: String,
    pub avg_temp: f64,
    pub avg_hum: f64,
}

/// Storage backend for committed window aggregates
#[async_trait]
pub trait BlockWriter: Send + Sync {
    /// Append one window row to the artifacts of the given block
    async fn append_window(&self, block_index: u64, row: &WindowRow) -> Result<(), WriterError>;

    /// Get backend type for logging
    fn backend_type(&self) -> &'static str;
}

/// Writes three append-only CSV series per block:
/// `block_<i>_temp.csv`, `block_<i>_hum.csv` and `block_<i>_hum_temp.csv`
pub struct CsvBlockWriter {
    output_dir: PathBuf,
}

impl CsvBlockWriter {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, WriterError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    fn append_line(&self, file_name: &str, line: &str) -> Result<(), WriterError> {
        let path = self.output_dir.join(file_name);
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

#[async_trait]
impl BlockWriter for CsvBlockWriter {
    async fn append_window(&self, block_index: u64, row: &WindowRow) -> Result<(), WriterError> {
        self.append_line(
            &format!("block_{}_temp.csv", block_index),
            &format!("{},{:.2}", row.time_label, row.avg_temp),
        )?;
        self.append_line(
            &format!("block_{}_hum.csv", block_index),
            &format!("{},{:.2}", row.time_label, row.avg_hum),
        )?;
        self.append_line(
            &format!("block_{}_hum_temp.csv", block_index),
            &format!("{},{:.2},{:.2}", row.time_label, row.avg_temp, row.avg_hum),
        )?;
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "CSV"
    }
}
