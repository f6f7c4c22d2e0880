//! Converts raw inference output blobs into per-frame tensor records.
//!
//! An inference stage hands over a batch of named [`OutputBlob`]s; a
//! [`BlobToTensorConverter`] built by the [`ConverterRegistry`] turns them
//! into a [`TensorsTable`] that the pipeline attaches frame by frame.

pub mod blob;
pub mod config;
pub mod converter;
pub mod error;
pub mod model_info;
pub mod sink;
pub mod tensor;

#[cfg(test)]
mod test_support;

pub use blob::output_blob::{OutputBlob, OutputBlobs};
pub use config::ConverterConfig;
pub use converter::converter::{BlobToTensorConverter, ConverterInitializer};
pub use converter::filter::ConverterFilter;
pub use converter::registry::ConverterRegistry;
pub use error::{ConvertError, ErrorKind};
pub use model_info::ModelInputImageInfo;
pub use tensor::precision::{Layout, Precision};
pub use tensor::tensor_record::{FieldValue, TensorRecord, TensorStructure};
pub use tensor::tensors_table::{TensorGroup, TensorsTable};
