use crate::error::ConvertError;
use crate::tensor::precision::Precision;

/// Decode a little endian frame slice into `f32` samples.
pub fn to_f32(bytes: &[u8], precision: Precision) -> Result<Vec<f32>, ConvertError> {
    let result = match precision {
        Precision::FP32 => bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect(),
        Precision::FP64 => bytes
            .chunks_exact(8)
            .map(|chunk| {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(chunk);
                f64::from_le_bytes(raw) as f32
            })
            .collect(),
        Precision::U8 => bytes.iter().map(|&x| x as f32).collect(),
        Precision::I8 => bytes.iter().map(|&x| x as i8 as f32).collect(),
        Precision::U16 => bytes
            .chunks_exact(2)
            .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]) as f32)
            .collect(),
        Precision::I16 => bytes
            .chunks_exact(2)
            .map(|chunk| i16::from_le_bytes([chunk[0], chunk[1]]) as f32)
            .collect(),
        Precision::I32 => bytes
            .chunks_exact(4)
            .map(|chunk| i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as f32)
            .collect(),
        Precision::FP16 | Precision::I64 | Precision::U64 => {
            return Err(ConvertError::UnsupportedPrecision(precision))
        }
    };

    Ok(result)
}
