/// Vertical divisor applied to the marker height when anchoring.
/// Pulls the icon up so its lower tip, not its center, sits on the district.
pub const MARKER_TIP_BIAS: f64 = 1.2;

/// Axis-aligned rectangle in viewport coordinates, as reported by
/// `getBoundingClientRect()`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn midpoint_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    pub fn midpoint_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Page scroll offset (`window.scrollX`, `window.scrollY`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

impl ScrollOffset {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Page-absolute position of a marker visual's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Anchor {
    pub top: f64,
    pub left: f64,
}

/// Place a marker over the bounding-box center of a district.
///
/// `district` is relative to the embedded image's own viewport, so the image
/// container's rectangle and the page scroll are added to get page
/// coordinates. The bounding box is a box around an irregular polygon; its
/// center is used as-is.
pub fn compute_anchor(
    container: Rect,
    district: Rect,
    scroll: ScrollOffset,
    marker: Size,
) -> Anchor {
    let top_anchor = scroll.y + container.top + district.midpoint_y();
    let left_anchor = scroll.x + container.left + district.midpoint_x();
    Anchor {
        top: top_anchor - marker.height / MARKER_TIP_BIAS,
        left: left_anchor - marker.width / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff < 1e-9,
            "expected {expected}, got {actual} (diff: {diff})"
        );
    }

    #[test]
    fn anchor_matches_reference_case() {
        let anchor = compute_anchor(
            Rect::new(10.0, 5.0, 800.0, 600.0),
            Rect::new(100.0, 50.0, 20.0, 20.0),
            ScrollOffset::default(),
            Size::new(15.0, 15.0),
        );
        assert_close(anchor.top, 107.5);
        assert_close(anchor.left, 57.5);
    }

    #[test]
    fn anchor_includes_page_scroll() {
        let anchor = compute_anchor(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(40.0, 40.0, 20.0, 20.0),
            ScrollOffset::new(30.0, 200.0),
            Size::new(10.0, 12.0),
        );
        assert_close(anchor.top, 200.0 + 50.0 - 10.0);
        assert_close(anchor.left, 30.0 + 50.0 - 5.0);
    }

    #[test]
    fn vertical_bias_is_not_symmetric() {
        let anchor = compute_anchor(
            Rect::default(),
            Rect::new(0.0, 0.0, 0.0, 0.0),
            ScrollOffset::default(),
            Size::new(24.0, 24.0),
        );
        assert_close(anchor.left, -12.0);
        assert_close(anchor.top, -20.0);
    }
}
