use fast_image_resize as fir;
use image::ImageBuffer;
use image::Luma;

use crate::error::ConvertError;

/// Single-channel float plane, row-major.
pub type MaskImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Bilinear resize of a float plane. Values keep their own range, nothing is
/// clamped or renormalised.
pub fn resize_bilinear(src: &MaskImage, width: u32, height: u32) -> Result<MaskImage, ConvertError> {
    let mut resized = MaskImage::new(width, height);
    let (src_width, src_height) = src.dimensions();
    if src_width == 0 || src_height == 0 || width == 0 || height == 0 {
        return Ok(resized);
    }

    let src_view = fir::images::ImageRef::new(
        src_width,
        src_height,
        bytemuck::cast_slice::<f32, u8>(src.as_raw()),
        fir::PixelType::F32,
    )?;

    {
        let mut dst_view = fir::images::Image::from_slice_u8(
            width,
            height,
            bytemuck::cast_slice_mut::<f32, u8>(&mut resized),
            fir::PixelType::F32,
        )?;

        let options = fir::ResizeOptions::new().resize_alg(fir::ResizeAlg::Convolution(fir::FilterType::Bilinear));
        let mut resizer = fir::Resizer::new();
        resizer.resize(&src_view, &mut dst_view, &options)?;
    }

    Ok(resized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: u32, height: u32, values: Vec<f32>) -> MaskImage {
        ImageBuffer::from_raw(width, height, values).unwrap()
    }

    #[test]
    fn constant_stays_constant() {
        for v in [0.0, 0.37, -12.5, 4096.0] {
            let out = resize_bilinear(&image(2, 2, vec![v; 4]), 4, 4).unwrap();
            assert_eq!(out.dimensions(), (4, 4));
            assert!(out.pixels().all(|p| p.0[0] == v), "value {}", v);
        }
    }

    #[test]
    fn same_size_is_identity() {
        let values: Vec<f32> = (0..12).map(|i| i as f32 * 1.5 - 4.0).collect();
        let out = resize_bilinear(&image(4, 3, values.clone()), 4, 3).unwrap();
        assert_eq!(out.into_raw(), values);
    }

    #[test]
    fn values_are_not_clamped() {
        let out = resize_bilinear(&image(1, 2, vec![-3.0, 7.0]), 1, 4).unwrap();
        assert_eq!(out.into_raw(), vec![-3.0, -0.5, 4.5, 7.0]);
    }

    #[test]
    fn downscale_stays_in_source_range() {
        let out = resize_bilinear(&image(4, 1, vec![0.0, 2.0, 4.0, 6.0]), 2, 1).unwrap();
        let values = out.into_raw();
        assert_eq!(values.len(), 2);
        assert!(values.iter().all(|v| (0.0..=6.0).contains(v)));
        assert!(values[0] < values[1]);
    }

    #[test]
    fn empty_source() {
        let out = resize_bilinear(&ImageBuffer::new(0, 0), 3, 2).unwrap();
        assert_eq!(out.into_raw(), vec![0.0; 6]);
    }
}
