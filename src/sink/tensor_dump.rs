use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{info, warn};

use crate::{converter::filter::ConverterFilter, error::ConvertError, tensor::tensor_record::TensorRecord};

const MAX_PRINTED_DATA_BYTES: usize = 32;

/// Writes the tensors attached to a frame out for inspection.
///
/// The frame counter belongs to the instance, so two dumps never share
/// numbering and `reset` gives tests a known starting point.
pub struct TensorDump {
    location: PathBuf,
    method: String,
    filter: ConverterFilter,
    frame_num: AtomicU64,
}

impl TensorDump {
    pub fn new(location: impl AsRef<Path>, method: Option<&str>, filter: ConverterFilter) -> Self {
        Self {
            location: location.as_ref().to_owned(),
            method: method.unwrap_or("default").to_string(),
            filter,
            frame_num: AtomicU64::new(0),
        }
    }

    pub fn frame_num(&self) -> u64 {
        self.frame_num.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.frame_num.store(0, Ordering::SeqCst);
    }

    /// Log a short summary of every matching record.
    pub fn log_tensors(&self, records: &[TensorRecord]) {
        for record in records.iter().filter(|r| self.filter.matches(r)) {
            let head: Vec<String> = record
                .payload()
                .iter()
                .take(MAX_PRINTED_DATA_BYTES)
                .map(|b| format!("0x{:02x}", b))
                .collect();

            info!(
                layer = record.layer_name(),
                model = record.model_name(),
                data_size = record.payload().len(),
                number_elements = record.num_elements(),
                dims = ?record.dims(),
                "Tensor data: {{ {}... }}",
                head.join(", ")
            );
        }
    }

    /// Write the payload of every matching record of one frame to
    /// `{location}/{method}_frame_{n}_idx_{i}.tensor`, where `i` is the record's
    /// position among the matching records. Returns how many files were
    /// written; a file that cannot be written is logged and skipped.
    pub fn write_frame(&self, records: &[TensorRecord]) -> usize {
        let frame_num = self.frame_num.fetch_add(1, Ordering::SeqCst);
        let mut written = 0;

        for (index, record) in records.iter().filter(|r| self.filter.matches(r)).enumerate() {
            let path = self.tensor_path(frame_num, index);
            match write_payload(&path, record) {
                Ok(()) => written += 1,
                Err(e) => warn!(path = %path.display(), "Failed to open/create file: {}", e),
            }
        }

        written
    }

    fn tensor_path(&self, frame_num: u64, index: usize) -> PathBuf {
        self.location
            .join(format!("{}_frame_{}_idx_{}.tensor", self.method, frame_num, index))
    }
}

fn write_payload(path: &Path, record: &TensorRecord) -> Result<(), ConvertError> {
    fs::write(path, record.payload())?;
    Ok(())
}
