//! Letterboxed resizing into a fixed canvas.

use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use super::{Frame, OffsetPolicy};

/// Target canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self { Self { width, height } }

    /// A `side` x `side` canvas.
    #[must_use]
    pub const fn square(side: u32) -> Self { Self::new(side, side) }

    #[must_use]
    pub const fn is_empty(self) -> bool { self.width == 0 || self.height == 0 }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Fits `source` inside a transparent `target` canvas.
///
/// The image is scaled uniformly so it fits entirely (letterbox, never crop),
/// centered horizontally, centered vertically and then lifted by `y_offset`
/// pixels. Anything lifted past the top edge is clipped. The lift applies to
/// input already at the target size as well.
///
/// Zero-sized input or target is returned as an unchanged copy.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn fit(source: &Frame, target: Size, y_offset: f32) -> Frame {
    let (src_width, src_height) = source.dimensions();

    if src_width == 0 || src_height == 0 || target.is_empty() {
        return source.clone();
    }

    let source_aspect = f64::from(src_width) / f64::from(src_height);
    let target_aspect = f64::from(target.width) / f64::from(target.height);

    let (draw_width, draw_height) = if source_aspect > target_aspect {
        let height = (f64::from(target.width) / source_aspect).round() as u32;
        (target.width, height.clamp(1, target.height))
    } else {
        let width = (f64::from(target.height) * source_aspect).round() as u32;
        (width.clamp(1, target.width), target.height)
    };

    let scaled = imageops::resize(source, draw_width, draw_height, FilterType::CatmullRom);

    let x = i64::from((target.width - draw_width) / 2);
    let centered_y = f64::from(target.height - draw_height) / 2.0;
    let y = (centered_y - f64::from(y_offset)).round() as i64;

    let mut canvas = RgbaImage::new(target.width, target.height);
    imageops::replace(&mut canvas, &scaled, x, y);
    canvas
}

/// Resizes frames using the offset bucket of their set name.
#[derive(Debug, Clone, Default)]
pub struct FrameResizer {
    policy: Arc<OffsetPolicy>,
}

impl FrameResizer {
    #[must_use]
    pub const fn new(policy: Arc<OffsetPolicy>) -> Self { Self { policy } }

    #[must_use]
    pub fn policy(&self) -> &OffsetPolicy { &self.policy }

    /// Fits `image` into `target`, shifted by the offset of `name`'s base set.
    #[must_use]
    pub fn resize(&self, image: &Frame, target: Size, name: &str) -> Frame {
        let y_offset = self.policy.shift_for(name);
        tracing::trace!(name, %target, y_offset, "resizing frame");
        fit(image, target, y_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::test_support::solid;

    const RED: [u8; 4] = [255, 0, 0, 255];

    fn opaque_rows(frame: &Frame) -> Vec<u32> {
        (0..frame.height())
            .filter(|&y| (0..frame.width()).any(|x| frame.get_pixel(x, y)[3] > 0))
            .collect()
    }

    fn opaque_columns(frame: &Frame) -> Vec<u32> {
        (0..frame.width())
            .filter(|&x| (0..frame.height()).any(|y| frame.get_pixel(x, y)[3] > 0))
            .collect()
    }

    #[test]
    fn test_square_source_fills_canvas_without_offset() {
        let out = fit(&solid(64, 64, RED), Size::square(32), 0.0);
        assert_eq!(out.dimensions(), (32, 32));
        assert_eq!(opaque_rows(&out).len(), 32);
        assert_eq!(out.get_pixel(16, 16).0, RED);
    }

    #[test]
    fn test_wide_source_is_letterboxed_and_centered() {
        let out = fit(&solid(64, 32, RED), Size::square(32), 0.0);
        assert_eq!(out.dimensions(), (32, 32));
        assert_eq!(opaque_rows(&out), (8..24).collect::<Vec<_>>());
        assert_eq!(opaque_columns(&out).len(), 32);
        assert_eq!(out.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_tall_source_is_pillarboxed_and_centered() {
        let out = fit(&solid(16, 64, RED), Size::square(32), 0.0);
        assert_eq!(opaque_columns(&out), (12..20).collect::<Vec<_>>());
        assert_eq!(opaque_rows(&out).len(), 32);
    }

    #[test]
    fn test_offset_lifts_image_upwards() {
        let out = fit(&solid(64, 32, RED), Size::square(32), 4.0);
        assert_eq!(opaque_rows(&out), (4..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_offset_past_top_edge_is_clipped() {
        let out = fit(&solid(64, 64, RED), Size::square(32), 2.8);
        let rows = opaque_rows(&out);
        assert_eq!(rows.first(), Some(&0));
        assert_eq!(rows.len(), 29);
    }

    #[test]
    fn test_target_sized_source_is_still_lifted() {
        let resizer = FrameResizer::default();

        let out = resizer.resize(&solid(27, 27, RED), Size::square(27), "parrot1");

        assert_eq!(out.dimensions(), (27, 27));
        assert_eq!(out.get_pixel(13, 26)[3], 0);
        assert_eq!(opaque_rows(&out).first(), Some(&0));
        assert_eq!(opaque_rows(&out).len(), 24);
    }

    #[test]
    fn test_target_sized_source_matches_larger_source() {
        let resizer = FrameResizer::default();

        let exact = resizer.resize(&solid(27, 20, RED), Size::square(27), "parrot1");
        let scaled = resizer.resize(&solid(54, 40, RED), Size::square(27), "parrot1");

        assert_eq!(opaque_rows(&exact), opaque_rows(&scaled));
    }

    #[test]
    fn test_resize_without_offset_is_idempotent() {
        let policy = OffsetPolicy::new(vec!["parrot"], vec![], vec![]);
        let resizer = FrameResizer::new(Arc::new(policy));
        let source = solid(50, 20, RED);

        let once = resizer.resize(&source, Size::square(32), "parrot1");
        let twice = resizer.resize(&once, Size::square(32), "parrot1");

        assert_eq!(once, twice);
    }

    #[test]
    fn test_zero_sized_source_is_copied() {
        let source = RgbaImage::new(0, 0);
        let out = fit(&source, Size::square(32), 2.8);
        assert_eq!(out.dimensions(), (0, 0));
    }

    #[test]
    fn test_zero_sized_target_is_copied() {
        let source = solid(8, 8, RED);
        assert_eq!(fit(&source, Size::new(0, 32), 0.0), source);
    }

    #[test]
    fn test_resizer_applies_policy_of_base_name() {
        let policy = OffsetPolicy::new(vec!["flatparrot"], vec![], vec!["liftedparrot"]);
        let resizer = FrameResizer::new(Arc::new(policy));
        let source = solid(64, 32, RED);

        let flat = resizer.resize(&source, Size::square(32), "flatparrot7");
        let lifted = resizer.resize(&source, Size::square(32), "liftedparrot7");

        assert_eq!(opaque_rows(&flat).first(), Some(&8));
        assert_eq!(opaque_rows(&lifted).first(), Some(&4));
    }
}
