use visual_hull_core::{ColorImage, ColorImageView, MaskImage};

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{morphology, SilhouetteError, SilhouetteParams};

#[inline]
fn l1_distance(rgb: [f32; 3], reference: [f32; 3]) -> f32 {
    (rgb[0] - reference[0]).abs() + (rgb[1] - reference[1]).abs() + (rgb[2] - reference[2]).abs()
}

/// Label every pixel as object (`1`) or background (`0`) without clean-up.
///
/// The comparison is inclusive: a pixel exactly at `distance_threshold`
/// is background.
pub fn key_background(
    image: &ColorImageView<'_>,
    params: &SilhouetteParams,
) -> Result<MaskImage, SilhouetteError> {
    params.validate()?;
    // re-check the buffer in case the view was built by hand
    let image = ColorImageView::new(image.width, image.height, image.data)?;

    let data = image
        .pixels()
        .map(|rgb| u8::from(l1_distance(rgb, params.background_rgb) > params.distance_threshold))
        .collect();
    Ok(MaskImage::from_raw(image.width, image.height, data)?)
}

/// Convert one photograph into a cleaned binary silhouette of the same size.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(image, params), fields(width = image.width, height = image.height))
)]
pub fn extract_silhouette(
    image: &ColorImageView<'_>,
    params: &SilhouetteParams,
) -> Result<MaskImage, SilhouetteError> {
    let keyed = key_background(image, params)?;
    Ok(morphology::open(&keyed, params.kernel_radius()))
}

/// Extract silhouettes for every image, preserving input order.
///
/// With the `rayon` feature the images are processed in parallel.
pub fn extract_silhouettes(
    images: &[ColorImage],
    params: &SilhouetteParams,
) -> Result<Vec<MaskImage>, SilhouetteError> {
    params.validate()?;

    let run = |(index, image): (usize, &ColorImage)| {
        let mask = extract_silhouette(&image.view(), params).map_err(|e| match e {
            SilhouetteError::InvalidImage(source) => SilhouetteError::Image { index, source },
            other => other,
        })?;
        log::debug!(
            "silhouette {index}: {} of {} pixels foreground",
            mask.count_foreground(),
            mask.data.len()
        );
        Ok(mask)
    };

    #[cfg(feature = "rayon")]
    let masks = images.par_iter().enumerate().map(run).collect();
    #[cfg(not(feature = "rayon"))]
    let masks = images.iter().enumerate().map(run).collect();

    masks
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUE: [f32; 3] = [0.0, 0.0, 0.75];

    fn screen_with_square(w: usize, h: usize, x0: usize, y0: usize, side: usize) -> ColorImage {
        let mut img = ColorImage::filled(w, h, BLUE).expect("image");
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                img.set_pixel(x, y, [0.8, 0.6, 0.2]);
            }
        }
        img
    }

    #[test]
    fn all_background_gives_empty_mask() {
        let img = ColorImage::filled(12, 9, BLUE).expect("image");
        let mask = extract_silhouette(&img.view(), &SilhouetteParams::default()).expect("mask");
        assert_eq!(mask.size(), img.size());
        assert_eq!(mask.count_foreground(), 0);
    }

    #[test]
    fn threshold_is_inclusive() {
        let params = SilhouetteParams {
            distance_threshold: 0.5,
            kernel_size: 1,
            ..SilhouetteParams::default()
        };
        let mut img = ColorImage::filled(2, 1, BLUE).expect("image");
        img.set_pixel(0, 0, [0.5, 0.0, 0.75]); // exactly at threshold
        img.set_pixel(1, 0, [0.625, 0.0, 0.75]);
        let mask = key_background(&img.view(), &params).expect("mask");
        assert_eq!(mask.data, vec![0, 1]);
    }

    #[test]
    fn object_survives_and_speck_is_removed() {
        let mut img = screen_with_square(20, 16, 6, 4, 8);
        img.set_pixel(1, 1, [1.0, 1.0, 1.0]);
        let mask = extract_silhouette(&img.view(), &SilhouetteParams::default()).expect("mask");
        assert_eq!(mask.get(1, 1), 0);
        assert_eq!(mask.count_foreground(), 64);
        assert_eq!(mask.get(6, 4), 1);
        assert_eq!(mask.get(13, 11), 1);
        assert_eq!(mask.get(14, 11), 0);
    }

    #[test]
    fn rerunning_on_own_output_is_stable() {
        let mut img = screen_with_square(24, 18, 3, 2, 9);
        img.set_pixel(20, 15, [0.9, 0.1, 0.1]);
        img.set_pixel(5, 5, BLUE); // hole inside the object
        let params = SilhouetteParams::default();
        let first = extract_silhouette(&img.view(), &params).expect("first");
        let second = extract_silhouette(&first.to_color_image().view(), &params).expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_view_is_rejected() {
        let data = vec![0.0_f32; 10];
        let view = ColorImageView {
            width: 2,
            height: 2,
            data: &data,
        };
        assert!(matches!(
            extract_silhouette(&view, &SilhouetteParams::default()),
            Err(SilhouetteError::InvalidImage(_))
        ));
    }

    #[test]
    fn batch_preserves_order() {
        let images = vec![
            ColorImage::filled(10, 10, BLUE).expect("blue"),
            screen_with_square(10, 10, 0, 0, 10),
        ];
        let masks = extract_silhouettes(&images, &SilhouetteParams::default()).expect("masks");
        assert_eq!(masks.len(), 2);
        assert_eq!(masks[0].count_foreground(), 0);
        assert_eq!(masks[1].count_foreground(), 100);
    }
}
