use crate::{
    blob::{output_blob::OutputBlob, slicing},
    error::ConvertError,
    tensor::{tensor_record::TensorRecord, tensors_table::TensorGroup},
};

use super::converter::{BlobToTensorConverter, ConverterInitializer};

pub const RAW_FORMAT: &str = "raw_data";

/// Copies each frame slice of each blob verbatim into a record.
pub struct RawCopyConverter {
    init: ConverterInitializer,
}

impl RawCopyConverter {
    pub const NAME: &'static str = "raw_data_copy";

    pub fn new(init: ConverterInitializer) -> Self {
        Self { init }
    }
}

impl BlobToTensorConverter for RawCopyConverter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn initializer(&self) -> &ConverterInitializer {
        &self.init
    }

    fn layer_prefix(&self) -> &'static str {
        "raw_copy:"
    }

    fn process_frame(
        &self,
        layer_name: &str,
        blob: &OutputBlob,
        frame_index: usize,
    ) -> Result<TensorGroup, ConvertError> {
        let batch_size = self.init.source_batch_size();
        let slice = slicing::frame_slice(blob, layer_name, batch_size, frame_index)?;
        let dims = slicing::frame_dims(blob, batch_size)?;

        // Attachment order to a frame differs between host versions, consumers
        // find records by tensor_id instead
        let tensor_id = i32::try_from(frame_index).map_err(|_| ConvertError::FrameOutOfRange {
            frame_index,
            batch_size,
        })?;

        let record = TensorRecord::new(layer_name, blob.precision(), blob.layout(), dims, slice.to_vec())?
            .with_layer_name(self.prefixed_layer_name(layer_name))
            .with_model_name(&self.init.model_name)
            .with_format(RAW_FORMAT)
            .with_tensor_id(tensor_id);

        Ok(vec![record])
    }
}
