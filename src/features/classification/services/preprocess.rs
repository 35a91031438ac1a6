use image::imageops::{self, FilterType};

use super::scorer::{ClassificationError, ImageTensor};

/// Decode `bytes` and lay them out as an NHWC `[1, size, size, 3]` RGB tensor
/// with every channel scaled to [0, 1].
///
/// The image is stretched to `size × size` with nearest-neighbour sampling,
/// regardless of its aspect ratio.
pub fn to_model_input(bytes: &[u8], size: u32) -> Result<ImageTensor, ClassificationError> {
    if size == 0 {
        return Err(ClassificationError::Decode(
            "input size must be positive".to_string(),
        ));
    }

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ClassificationError::Decode(e.to_string()))?
        .to_rgb8();

    let resized = imageops::resize(&decoded, size, size, FilterType::Nearest);
    let data = resized
        .into_raw()
        .into_iter()
        .map(|channel| f32::from(channel) / 255.0)
        .collect();

    let side = size as usize;
    Ok(ImageTensor {
        shape: [1, side, side, 3],
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32, pixel: [u8; 3]) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb(pixel));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_resizes_and_normalizes() {
        let tensor = to_model_input(&png(7, 3, [255, 0, 51]), 4).unwrap();

        assert_eq!(tensor.shape, [1, 4, 4, 3]);
        assert_eq!(tensor.data.len(), 4 * 4 * 3);
        assert_eq!(&tensor.data[..3], &[1.0, 0.0, 0.2]);
        assert!(tensor.data.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_rejects_undecodable_bytes() {
        let err = to_model_input(b"not an image", 224).unwrap_err();
        assert!(matches!(err, ClassificationError::Decode(_)));
    }

    #[test]
    fn test_rejects_empty_buffer() {
        assert!(to_model_input(&[], 224).is_err());
    }

    #[test]
    fn test_rejects_zero_size() {
        assert!(to_model_input(&png(2, 2, [0, 0, 0]), 0).is_err());
    }
}
