//! Overlay placement math
//!
//! Pure functions only: no host handles, no timers. The overlay always opens
//! to the right of the source rectangle, vertically centered on it, shrunk
//! (never grown) to fit the viewport.

use crate::settings::PreviewTunables;

/// On-screen rectangle in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Width/height pair (natural image size or viewport size)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Final overlay box in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Compute where the overlay goes for a hovered thumbnail.
///
/// Size starts at the image's natural dimensions and is only ever shrunk.
/// The clamp runs height-first, then width, then re-checks height: a
/// width-driven shrink feeds the already-height-adjusted value back in, so
/// the final box fits both dimensions while staying aspect-correct.
///
/// There is no clamping against the left viewport edge; the overlay always
/// opens rightward and the available-width term already accounts for a
/// source rectangle near the right edge.
pub fn compute_placement(
    source: Rect,
    natural: Size,
    viewport: Size,
    tunables: &PreviewTunables,
) -> Placement {
    let preview_left = source.right() + tunables.spacing;

    let available_width = (viewport.width - preview_left - tunables.right_margin).max(0.0);
    let available_height = (viewport.height * tunables.height_ratio).max(0.0);

    let mut width = natural.width.max(0.0);
    let mut height = natural.height.max(0.0);

    if height > available_height {
        let ratio = available_height / height;
        height = available_height;
        width *= ratio;
    }

    if width > available_width {
        let ratio = available_width / width;
        width = available_width;
        height *= ratio;
    }

    if height > available_height {
        let ratio = available_height / height;
        height = available_height;
        width *= ratio;
    }

    let mut top = source.center_y() - height / 2.0;
    if top + height > viewport.height - tunables.bottom_margin {
        top = viewport.height - height - tunables.bottom_margin;
    }
    if top < tunables.top_margin {
        top = tunables.top_margin;
    }

    Placement { left: preview_left, top, width, height }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> PreviewTunables {
        PreviewTunables::default()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.5,
            "expected ~{expected}, got {actual}"
        );
    }

    #[test]
    fn test_wide_image_clamps_height_first() {
        // Thumbnail at (100, 100) 80x80, natural 1600x900, viewport 1280x800
        let source = Rect::new(100.0, 100.0, 80.0, 80.0);
        let p = compute_placement(
            source,
            Size::new(1600.0, 900.0),
            Size::new(1280.0, 800.0),
            &defaults(),
        );

        // available height = 800 * 0.7 = 560, so 900 -> 560 and width scales
        // to 1600 * (560/900) ~= 995.6; available width = 1280-195-20 = 1065
        // so no further width clamp
        assert_close(p.left, 195.0);
        assert_close(p.height, 560.0);
        assert_close(p.width, 995.6);
        // vertical center 140 puts top at -140, clamped to the top margin
        assert_close(p.top, 10.0);
    }

    #[test]
    fn test_small_image_keeps_natural_size() {
        let source = Rect::new(50.0, 300.0, 80.0, 80.0);
        let p = compute_placement(
            source,
            Size::new(200.0, 150.0),
            Size::new(1920.0, 1080.0),
            &defaults(),
        );
        assert_eq!(p.width, 200.0);
        assert_eq!(p.height, 150.0);
        assert_close(p.left, 145.0);
        // centered on source center_y = 340
        assert_close(p.top, 340.0 - 75.0);
    }

    #[test]
    fn test_width_clamp_rescales_height() {
        // Source near the right edge leaves little horizontal room
        let source = Rect::new(900.0, 300.0, 80.0, 80.0);
        let p = compute_placement(
            source,
            Size::new(400.0, 300.0),
            Size::new(1200.0, 1000.0),
            &defaults(),
        );
        // available width = 1200 - 995 - 20 = 185
        assert_close(p.width, 185.0);
        assert_close(p.height, 300.0 * (185.0 / 400.0));
    }

    #[test]
    fn test_bottom_clamp() {
        let source = Rect::new(100.0, 700.0, 80.0, 80.0);
        let p = compute_placement(
            source,
            Size::new(300.0, 400.0),
            Size::new(1280.0, 800.0),
            &defaults(),
        );
        // center_y = 740, top would be 540, bottom 940 > 770 so clamp
        assert_close(p.top, 800.0 - p.height - 30.0);
    }

    #[test]
    fn test_never_exceeds_available_space() {
        let viewport = Size::new(1280.0, 800.0);
        let t = defaults();
        let naturals = [
            Size::new(4000.0, 3000.0),
            Size::new(10.0, 5000.0),
            Size::new(5000.0, 10.0),
            Size::new(1.0, 1.0),
        ];
        for natural in naturals {
            for left in [0.0, 400.0, 1100.0] {
                let source = Rect::new(left, 200.0, 80.0, 80.0);
                let p = compute_placement(source, natural, viewport, &t);
                let available_width =
                    (viewport.width - p.left - t.right_margin).max(0.0);
                let available_height = viewport.height * t.height_ratio;
                assert!(p.width <= available_width + 0.001);
                assert!(p.height <= available_height + 0.001);
                assert!(p.width >= 0.0 && p.height >= 0.0);
            }
        }
    }

    #[test]
    fn test_zero_size_inputs_propagate_zero() {
        let p = compute_placement(
            Rect::default(),
            Size::default(),
            Size::new(1280.0, 800.0),
            &defaults(),
        );
        assert_eq!(p.width, 0.0);
        assert_eq!(p.height, 0.0);
    }

    #[test]
    fn test_source_past_right_edge_yields_zero_width() {
        // No left-edge policy: the overlay still opens rightward, but the
        // available-width term collapses to zero
        let source = Rect::new(1300.0, 100.0, 80.0, 80.0);
        let p = compute_placement(
            source,
            Size::new(400.0, 300.0),
            Size::new(1280.0, 800.0),
            &defaults(),
        );
        assert_eq!(p.width, 0.0);
        assert_eq!(p.height, 0.0);
        assert!(p.left > 1280.0);
    }
}
