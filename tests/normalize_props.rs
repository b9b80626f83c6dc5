// Property tests for the canvas normalizer
use flag_cropper::cropper::{CanvasMode, CropError, normalize, scaled_size};
use image::{DynamicImage, Rgb, RgbImage};
use proptest::prelude::*;

fn region(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, 200])
    }))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn scale_and_pad_always_fills_target_canvas(
        width in 1u32..400,
        height in 1u32..400,
        size in 1u32..160,
    ) {
        let canvas = normalize(&region(width, height), CanvasMode::ScaleAndPad, size, size)
            .expect("scale_and_pad never fails for non-empty regions");

        prop_assert_eq!(canvas.image.dimensions(), (size, size));
        prop_assert!(canvas.placed.0 <= size && canvas.placed.1 <= size);
        // 较长的一边贴合画布（允许 1 像素截断误差）
        prop_assert!(canvas.placed.0 + 1 >= size || canvas.placed.1 + 1 >= size);
    }

    #[test]
    fn scale_and_pad_preserves_aspect_ratio(
        width in 1u32..2000,
        height in 1u32..2000,
        size in 16u32..1024,
    ) {
        let (new_width, new_height) = scaled_size(width, height, size, size);
        let expected_height = new_width as f64 * height as f64 / width as f64;
        let expected_width = new_height as f64 * width as f64 / height as f64;

        prop_assert!(
            (new_height as f64 - expected_height).abs() <= 1.0
                || (new_width as f64 - expected_width).abs() <= 1.0
        );
    }

    #[test]
    fn padding_is_balanced_for_both_modes(
        width in 1u32..128,
        height in 1u32..128,
        size in 128u32..200,
        pad_only in any::<bool>(),
    ) {
        let mode = if pad_only { CanvasMode::PadOnly } else { CanvasMode::ScaleAndPad };
        let canvas = normalize(&region(width, height), mode, size, size).expect("fits");

        let left = canvas.offset.x;
        let right = size - canvas.placed.0 - left;
        let top = canvas.offset.y;
        let bottom = size - canvas.placed.1 - top;

        prop_assert!(left <= right && right - left <= 1);
        prop_assert!(top <= bottom && bottom - top <= 1);
    }

    #[test]
    fn pad_only_rejects_anything_larger_than_target(
        width in 1u32..300,
        height in 1u32..300,
        size in 1u32..300,
    ) {
        let result = normalize(&region(width, height), CanvasMode::PadOnly, size, size);

        if width > size || height > size {
            let is_oversize = matches!(result, Err(CropError::Oversize { .. }));
            prop_assert!(is_oversize);
        } else {
            let canvas = result.expect("region fits");
            prop_assert_eq!(canvas.placed, (width, height));
        }
    }
}
