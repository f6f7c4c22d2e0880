use crate::{
    blob::{output_blob::OutputBlob, sample, slicing},
    error::ConvertError,
    tensor::{
        precision::{Layout, Precision},
        tensor_record::TensorRecord,
        tensors_table::TensorGroup,
    },
};

use super::{
    converter::{BlobToTensorConverter, ConverterInitializer},
    resize::{resize_bilinear, MaskImage},
};

/// Plane size assumed for flat blobs when none is configured.
pub const LEGACY_SOURCE_WIDTH: usize = 128;
pub const LEGACY_SOURCE_HEIGHT: usize = 128;

pub const MASK_TENSOR_NAME: &str = "mask_endo";
pub const MASK_FORMAT: &str = "segmentation_mask";

/// Resizes a per-frame probability map to the model input resolution and
/// emits it as an FP32 `[height, width]` mask record.
///
/// The plane size comes from the blob's declared shape (`[H, W]` or
/// `[1, H, W]` per frame). Flat blobs fall back to the configured source
/// resolution, or to `LEGACY_SOURCE_WIDTH` x `LEGACY_SOURCE_HEIGHT`.
pub struct SegmentationMaskConverter {
    init: ConverterInitializer,
}

impl SegmentationMaskConverter {
    pub const NAME: &'static str = "segmentation_mask";

    pub fn new(init: ConverterInitializer) -> Self {
        Self { init }
    }

    /// Width and height of the source plane of one frame.
    pub fn source_resolution(&self, frame_dims: &[usize]) -> Result<(usize, usize), ConvertError> {
        let declared = declared_plane(frame_dims);

        match (declared, self.init.source_resolution) {
            (Some((declared_width, declared_height)), Some((configured_width, configured_height)))
                if (declared_width, declared_height) != (configured_width, configured_height) =>
            {
                Err(ConvertError::SourceResolutionMismatch {
                    declared_width,
                    declared_height,
                    configured_width,
                    configured_height,
                })
            }
            (Some(declared), _) => Ok(declared),
            (None, Some(configured)) => Ok(configured),
            (None, None) => Ok((LEGACY_SOURCE_WIDTH, LEGACY_SOURCE_HEIGHT)),
        }
    }

    // Decode, resize and package one frame; `frame_dims` excludes the batch
    fn build_mask(
        &self,
        layer_name: &str,
        precision: Precision,
        frame_dims: &[usize],
        slice: &[u8],
        tensor_id: i32,
    ) -> Result<TensorRecord, ConvertError> {
        let (src_width, src_height) = self.source_resolution(frame_dims)?;

        let samples = sample::to_f32(slice, precision)?;
        let actual = samples.len();
        let source = MaskImage::from_raw(to_u32(src_width)?, to_u32(src_height)?, samples)
            .filter(|_| actual == src_width * src_height)
            .ok_or(ConvertError::ElementCountMismatch {
                expected: src_width * src_height,
                actual,
            })?;

        // Always resampled, also when the sizes already agree
        let out_width = self.init.model_input.width;
        let out_height = self.init.model_input.height;
        let resized = resize_bilinear(&source, to_u32(out_width)?, to_u32(out_height)?)?;

        let payload = bytemuck::cast_slice::<f32, u8>(&resized.into_raw()).to_vec();
        let record = TensorRecord::new(MASK_TENSOR_NAME, Precision::FP32, Layout::HW, vec![out_height, out_width], payload)?
            .with_layer_name(self.prefixed_layer_name(layer_name))
            .with_model_name(&self.init.model_name)
            .with_format(MASK_FORMAT)
            .with_tensor_id(tensor_id);

        Ok(record)
    }
}

impl BlobToTensorConverter for SegmentationMaskConverter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn initializer(&self) -> &ConverterInitializer {
        &self.init
    }

    fn layer_prefix(&self) -> &'static str {
        "segmentation_mask:"
    }

    fn process_frame(
        &self,
        layer_name: &str,
        blob: &OutputBlob,
        frame_index: usize,
    ) -> Result<TensorGroup, ConvertError> {
        let batch_size = self.init.source_batch_size();
        let slice = slicing::frame_slice(blob, layer_name, batch_size, frame_index)?;
        let frame_dims = slicing::frame_dims(blob, batch_size)?;
        let tensor_id = i32::try_from(frame_index)
            .map_err(|_| ConvertError::FrameOutOfRange { frame_index, batch_size })?;

        let record = self
            .build_mask(layer_name, blob.precision(), &frame_dims, slice, tensor_id)
            .map_err(|e| e.context("failed to copy model"))?;

        Ok(vec![record])
    }
}

// `[H, W]` with any number of leading unit dims
fn declared_plane(frame_dims: &[usize]) -> Option<(usize, usize)> {
    match frame_dims {
        [leading @ .., height, width] if leading.iter().all(|&d| d == 1) => Some((*width, *height)),
        _ => None,
    }
}

fn to_u32(value: usize) -> Result<u32, ConvertError> {
    u32::try_from(value).map_err(|_| ConvertError::DimOverflow(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        blob::output_blob::OutputBlobs, error::ErrorKind, model_info::ModelInputImageInfo, test_support::capture_logs,
    };

    fn converter(width: usize, height: usize, batch_size: usize) -> SegmentationMaskConverter {
        SegmentationMaskConverter::new(ConverterInitializer::new(
            "endo-seg",
            ModelInputImageInfo::new(width, height, batch_size),
        ))
    }

    fn fp32(values: &[f32]) -> Vec<u8> {
        bytemuck::cast_slice::<f32, u8>(values).to_vec()
    }

    #[test]
    fn uniform_plane_upscaled() {
        let data = fp32(&[0.75; 4]);
        let dims = [1, 1, 2, 2];
        let mut blobs = OutputBlobs::new();
        blobs.insert("seg", OutputBlob::new(&data, Precision::FP32, Layout::NCHW, &dims).unwrap());

        let table = converter(4, 4, 1).convert(&blobs);
        let mask = &table.frame(0).unwrap()[0][0];

        assert_eq!(mask.name(), MASK_TENSOR_NAME);
        assert_eq!(mask.format(), Some(MASK_FORMAT));
        assert_eq!(mask.precision(), Precision::FP32);
        assert_eq!(mask.dims(), &[4, 4]);
        assert_eq!(mask.layer_name(), "segmentation_mask:seg");
        assert_eq!(mask.model_name(), "endo-seg");
        assert_eq!(mask.tensor_id(), Some(0));
        assert_eq!(mask.to_f32().unwrap(), vec![0.75; 16]);
    }

    #[test]
    fn same_size_passes_values_through() {
        let values: Vec<f32> = (0..6).map(|i| i as f32 - 2.5).collect();
        let data = fp32(&values);
        let dims = [1, 2, 3];
        let mut blobs = OutputBlobs::new();
        blobs.insert("seg", OutputBlob::new(&data, Precision::FP32, Layout::CHW, &dims).unwrap());

        let table = converter(3, 2, 1).convert(&blobs);
        let mask = &table.frame(0).unwrap()[0][0];
        assert_eq!(mask.dims(), &[2, 3]);
        assert_eq!(mask.to_f32().unwrap(), values);
    }

    #[test]
    fn frames_are_resized_independently() {
        let mut values = vec![1.0; 4];
        values.extend([5.0; 4]);
        let data = fp32(&values);
        let dims = [2, 2, 2];
        let mut blobs = OutputBlobs::new();
        blobs.insert("seg", OutputBlob::new(&data, Precision::FP32, Layout::CHW, &dims).unwrap());

        let table = converter(3, 3, 2).convert(&blobs);
        assert_eq!(table.frame(0).unwrap()[0][0].to_f32().unwrap(), vec![1.0; 9]);
        let second = &table.frame(1).unwrap()[0][0];
        assert_eq!(second.to_f32().unwrap(), vec![5.0; 9]);
        assert_eq!(second.tensor_id(), Some(1));
        assert_eq!(second.payload().len(), 9 * 4);
    }

    #[test]
    fn u8_planes_are_converted() {
        let data = [10u8, 10, 10, 10];
        let dims = [1, 2, 2];
        let mut blobs = OutputBlobs::new();
        blobs.insert("seg", OutputBlob::new(&data, Precision::U8, Layout::CHW, &dims).unwrap());

        let table = converter(2, 2, 1).convert(&blobs);
        assert_eq!(table.frame(0).unwrap()[0][0].to_f32().unwrap(), vec![10.0; 4]);
    }

    #[test]
    fn flat_blob_uses_configured_resolution() {
        let data = fp32(&[2.0; 6]);
        let dims = [1, 6];
        let blob = OutputBlob::new(&data, Precision::FP32, Layout::NC, &dims).unwrap();

        let mut init = ConverterInitializer::new("seg", ModelInputImageInfo::new(4, 2, 1));
        init.source_resolution = Some((3, 2));
        let converter = SegmentationMaskConverter::new(init);

        // [6] per frame is not a plane, the configured 3x2 applies
        let group = converter.process_frame("flat", &blob, 0).unwrap();
        assert_eq!(group[0].dims(), &[2, 4]);
        assert_eq!(group[0].to_f32().unwrap(), vec![2.0; 8]);
    }

    #[test]
    fn flat_blob_of_wrong_size_is_rejected() {
        let data = fp32(&[1.0; 5]);
        let dims = [1, 5];
        let blob = OutputBlob::new(&data, Precision::FP32, Layout::NC, &dims).unwrap();

        let err = converter(4, 4, 1).process_frame("flat", &blob, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Processing);
        assert!(err.to_string().starts_with("failed to copy model"));
        match err {
            ConvertError::Context { source, .. } => assert!(matches!(
                *source,
                ConvertError::ElementCountMismatch {
                    expected,
                    actual: 5,
                } if expected == LEGACY_SOURCE_WIDTH * LEGACY_SOURCE_HEIGHT
            )),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn declared_and_configured_must_agree() {
        let data = fp32(&[0.0; 4]);
        let dims = [1, 2, 2];
        let blob = OutputBlob::new(&data, Precision::FP32, Layout::CHW, &dims).unwrap();

        let mut init = ConverterInitializer::new("seg", ModelInputImageInfo::new(4, 4, 1));
        init.source_resolution = Some((4, 1));
        let err = SegmentationMaskConverter::new(init)
            .process_frame("seg", &blob, 0)
            .unwrap_err();

        match err {
            ConvertError::Context { source, .. } => {
                assert!(matches!(*source, ConvertError::SourceResolutionMismatch { .. }))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn missing_data_is_input_validation() {
        let dims = [1, 2, 2];
        let blob = OutputBlob::without_data(Precision::FP32, Layout::CHW, &dims);
        let err = converter(4, 4, 1).process_frame("seg", &blob, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputValidation);
    }

    #[test]
    fn uneven_batch_split_is_input_validation() {
        // 12 bytes split over 2 frames, but 3 elements do not
        let data = fp32(&[1.0; 3]);
        let dims = [3];
        let blob = OutputBlob::new(&data, Precision::FP32, Layout::C, &dims).unwrap();

        let err = converter(4, 4, 2).process_frame("seg", &blob, 0).unwrap_err();
        assert!(matches!(err, ConvertError::BatchSizeMismatch { batch_size: 2, .. }));
        assert_eq!(err.kind(), ErrorKind::InputValidation);
    }

    #[test]
    fn failing_blob_keeps_table_shape() {
        let good = fp32(&[3.0; 8]);
        let good_dims = [2, 2, 2];
        let bad = fp32(&[3.0; 6]);
        let bad_dims = [2, 3];

        let mut blobs = OutputBlobs::new();
        blobs.insert("bad", OutputBlob::new(&bad, Precision::FP32, Layout::NC, &bad_dims).unwrap());
        blobs.insert("good", OutputBlob::new(&good, Precision::FP32, Layout::CHW, &good_dims).unwrap());

        let (table, logs) = capture_logs(|| converter(2, 2, 2).convert(&blobs));
        assert_eq!(table.len(), 2);
        for frame in table.frames() {
            assert_eq!(frame.len(), 1);
            assert_eq!(frame[0][0].layer_name(), "segmentation_mask:good");
        }

        // One error per frame of the bad blob, none for the good one
        let errors: Vec<&str> = logs.lines().filter(|l| l.contains("ERROR")).collect();
        assert_eq!(errors.len(), 2, "{}", logs);
        for line in errors {
            assert!(line.contains("function=\"convert\""), "{}", line);
            assert!(line.contains("layer=\"bad\""), "{}", line);
            assert!(line.contains("failed to copy model"), "{}", line);
        }
    }

    #[test]
    fn plane_detection() {
        assert_eq!(declared_plane(&[2, 3]), Some((3, 2)));
        assert_eq!(declared_plane(&[1, 1, 2, 3]), Some((3, 2)));
        assert_eq!(declared_plane(&[3, 2, 3]), None);
        assert_eq!(declared_plane(&[6]), None);
    }
}
