//! Binary morphology with a square structuring element.
//!
//! A square kernel is separable, so each operation runs as a horizontal
//! pass followed by a vertical pass. Pixels outside the frame are ignored:
//! erosion never removes foreground because of the border and dilation
//! never grows from outside the image.

use visual_hull_core::MaskImage;

#[derive(Clone, Copy)]
enum Reduce {
    /// Keep a pixel only if every in-frame neighbor is set.
    All,
    /// Set a pixel if any in-frame neighbor is set.
    Any,
}

impl Reduce {
    #[inline]
    fn apply(self, window: &[u8]) -> u8 {
        match self {
            Reduce::All => u8::from(window.iter().all(|&v| v != 0)),
            Reduce::Any => u8::from(window.iter().any(|&v| v != 0)),
        }
    }
}

fn pass_rows(src: &[u8], width: usize, height: usize, radius: usize, op: Reduce) -> Vec<u8> {
    let mut out = vec![0u8; src.len()];
    for y in 0..height {
        let row = &src[y * width..(y + 1) * width];
        for x in 0..width {
            let x0 = x.saturating_sub(radius);
            let x1 = (x + radius + 1).min(width);
            out[y * width + x] = op.apply(&row[x0..x1]);
        }
    }
    out
}

fn pass_cols(src: &[u8], width: usize, height: usize, radius: usize, op: Reduce) -> Vec<u8> {
    let mut out = vec![0u8; src.len()];
    let mut column = Vec::with_capacity(height);
    for x in 0..width {
        column.clear();
        column.extend((0..height).map(|y| src[y * width + x]));
        for y in 0..height {
            let y0 = y.saturating_sub(radius);
            let y1 = (y + radius + 1).min(height);
            out[y * width + x] = op.apply(&column[y0..y1]);
        }
    }
    out
}

fn separable(mask: &MaskImage, radius: usize, op: Reduce) -> MaskImage {
    if radius == 0 {
        return mask.clone();
    }
    let (w, h) = (mask.width, mask.height);
    let horizontal = pass_rows(&mask.data, w, h, radius, op);
    MaskImage {
        width: w,
        height: h,
        data: pass_cols(&horizontal, w, h, radius, op),
    }
}

/// Erode with a `(2 * radius + 1)` square kernel.
pub fn erode(mask: &MaskImage, radius: usize) -> MaskImage {
    separable(mask, radius, Reduce::All)
}

/// Dilate with a `(2 * radius + 1)` square kernel.
pub fn dilate(mask: &MaskImage, radius: usize) -> MaskImage {
    separable(mask, radius, Reduce::Any)
}

/// Morphological opening: erosion followed by dilation with the same kernel.
///
/// Removes foreground features smaller than the kernel while leaving larger
/// regions in place. Idempotent.
pub fn open(mask: &MaskImage, radius: usize) -> MaskImage {
    dilate(&erode(mask, radius), radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from_rows(rows: &[&str]) -> MaskImage {
        let height = rows.len();
        let width = rows[0].len();
        let data = rows
            .iter()
            .flat_map(|r| r.bytes().map(|b| u8::from(b == b'#')))
            .collect();
        MaskImage::from_raw(width, height, data).expect("mask")
    }

    fn rows_of(mask: &MaskImage) -> Vec<String> {
        mask.data
            .chunks(mask.width)
            .map(|r| r.iter().map(|&v| if v != 0 { '#' } else { '.' }).collect())
            .collect()
    }

    #[test]
    fn opening_removes_isolated_speck() {
        let mask = mask_from_rows(&[
            ".......", //
            ".#.....", //
            ".......", //
            "...###.", //
            "...###.", //
            "...###.", //
            ".......",
        ]);
        let opened = open(&mask, 1);
        assert_eq!(
            rows_of(&opened),
            vec![
                ".......", //
                ".......", //
                ".......", //
                "...###.", //
                "...###.", //
                "...###.", //
                ".......",
            ]
        );
    }

    #[test]
    fn erosion_ignores_out_of_frame_pixels() {
        let mask = MaskImage::ones(4, 3).expect("mask");
        assert_eq!(erode(&mask, 2), mask);
    }

    #[test]
    fn dilation_grows_by_radius() {
        let mask = mask_from_rows(&[
            ".....", //
            ".....", //
            "..#..", //
            ".....", //
            ".....",
        ]);
        let grown = dilate(&mask, 1);
        assert_eq!(
            rows_of(&grown),
            vec![".....", ".###.", ".###.", ".###.", "....."]
        );
    }

    #[test]
    fn opening_is_idempotent() {
        let mask = mask_from_rows(&[
            "#..#####..", //
            "..######..", //
            ".#######.#", //
            "...####...", //
            "#...##....", //
            "..........",
        ]);
        let once = open(&mask, 1);
        assert_eq!(open(&once, 1), once);
    }

    #[test]
    fn zero_radius_is_identity() {
        let mask = mask_from_rows(&["#.#", ".#."]);
        assert_eq!(open(&mask, 0), mask);
    }
}
