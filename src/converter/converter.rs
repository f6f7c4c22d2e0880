use tracing::{debug, error};

use crate::{
    blob::output_blob::{OutputBlob, OutputBlobs},
    config::ConverterConfig,
    error::ConvertError,
    model_info::ModelInputImageInfo,
    tensor::tensors_table::{TensorGroup, TensorsTable},
};

use super::filter::ConverterFilter;

/// Everything a converter is built from. Read-only once constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct ConverterInitializer {
    pub model_name: String,
    pub model_input: ModelInputImageInfo,
    pub filter: ConverterFilter,
    pub source_batch_size: Option<usize>,
    pub source_resolution: Option<(usize, usize)>,
}

impl ConverterInitializer {
    pub fn new(model_name: impl Into<String>, model_input: ModelInputImageInfo) -> Self {
        Self {
            model_name: model_name.into(),
            model_input,
            filter: ConverterFilter::default(),
            source_batch_size: None,
            source_resolution: None,
        }
    }

    pub fn from_config(config: &ConverterConfig, model_input: ModelInputImageInfo) -> Self {
        Self {
            model_name: config.model_name.clone(),
            model_input,
            filter: ConverterFilter::new(config.model_name_filter.clone(), config.layer_name_filter.clone()),
            source_batch_size: config.source_batch_size,
            source_resolution: config.source_resolution(),
        }
    }

    /// Batch the blobs were produced with, falling back to the model input batch.
    pub fn source_batch_size(&self) -> usize {
        self.source_batch_size.unwrap_or(self.model_input.batch_size)
    }
}

/// Turns the named output blobs of one inference batch into a per-frame table.
pub trait BlobToTensorConverter: Send + Sync {
    // Name the converter is registered under
    fn name(&self) -> &'static str;

    fn initializer(&self) -> &ConverterInitializer;

    // Prepended to layer names so records built from the same layer by
    // different converters never collide
    fn layer_prefix(&self) -> &'static str;

    // Build the records of one frame of one blob
    fn process_frame(
        &self,
        layer_name: &str,
        blob: &OutputBlob,
        frame_index: usize,
    ) -> Result<TensorGroup, ConvertError>;

    fn prefixed_layer_name(&self, layer_name: &str) -> String {
        format!("{}{}", self.layer_prefix(), layer_name)
    }

    /// Never fails: a bad blob or frame is logged and left out of the table,
    /// which always holds one entry per frame of the model input batch.
    fn convert(&self, blobs: &OutputBlobs) -> TensorsTable {
        let init = self.initializer();
        let batch_size = init.model_input.batch_size;
        let mut table = TensorsTable::with_batch_size(batch_size);

        if !init.filter.matches_model(&init.model_name) {
            debug!(converter = self.name(), model = %init.model_name, "model filtered out");
            return table;
        }

        for (layer_name, blob) in blobs.iter() {
            if !init.filter.matches_layer(layer_name) {
                continue;
            }

            let blob = match check_blob(layer_name, blob) {
                Ok(blob) => blob,
                Err(e) => {
                    error!(
                        function = "convert",
                        converter = self.name(),
                        layer = layer_name,
                        "An error occurred while processing output blobs: {}",
                        e
                    );
                    continue;
                }
            };

            for frame_index in 0..batch_size {
                let group = self
                    .process_frame(layer_name, blob, frame_index)
                    .and_then(|group| table.push_group(frame_index, group));

                if let Err(e) = group {
                    error!(
                        function = "convert",
                        converter = self.name(),
                        layer = layer_name,
                        frame = frame_index,
                        kind = ?e.kind(),
                        "An error occurred while processing output blobs: {}",
                        e
                    );
                }
            }
        }

        table
    }
}

fn check_blob<'b, 'a>(
    layer_name: &str,
    blob: Option<&'b OutputBlob<'a>>,
) -> Result<&'b OutputBlob<'a>, ConvertError> {
    let blob = blob.ok_or_else(|| ConvertError::NullBlob(layer_name.to_string()))?;
    if blob.data().is_none() {
        return Err(ConvertError::NullData(layer_name.to_string()));
    }
    Ok(blob)
}
