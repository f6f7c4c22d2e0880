use crate::error::ConvertError;

use super::output_blob::OutputBlob;

/// Bytes one frame occupies in a batched blob.
pub fn unbatched_slice_size(blob: &OutputBlob, batch_size: usize) -> Result<usize, ConvertError> {
    let total_bytes = blob.size_in_bytes();
    if batch_size == 0 || total_bytes % batch_size != 0 {
        return Err(ConvertError::BatchSizeMismatch { total_bytes, batch_size });
    }
    Ok(total_bytes / batch_size)
}

/// Borrow the bytes of frame `frame_index` out of a batched blob. No copy.
pub fn frame_slice<'a>(
    blob: &OutputBlob<'a>,
    layer_name: &str,
    batch_size: usize,
    frame_index: usize,
) -> Result<&'a [u8], ConvertError> {
    let data = blob
        .data()
        .ok_or_else(|| ConvertError::NullData(layer_name.to_string()))?;

    let slice_size = unbatched_slice_size(blob, batch_size)?;
    if frame_index >= batch_size {
        return Err(ConvertError::FrameOutOfRange { frame_index, batch_size });
    }

    let start = frame_index * slice_size;
    Ok(&data[start..start + slice_size])
}

/// Dims of one frame: the blob dims without the leading batch dimension.
/// Single-dimension blobs are split into one flat vector per frame.
pub fn frame_dims(blob: &OutputBlob, batch_size: usize) -> Result<Vec<usize>, ConvertError> {
    let dims = blob.dims();
    if dims.len() > 1 && dims[0] == batch_size {
        return Ok(dims[1..].to_vec());
    }

    let elements = blob.num_elements();
    if batch_size == 0 || elements % batch_size != 0 {
        return Err(ConvertError::BatchSizeMismatch {
            total_bytes: blob.size_in_bytes(),
            batch_size,
        });
    }
    Ok(vec![elements / batch_size])
}
