//! Scroll parallax for ordinary page elements.

/// Default speed when an element does not specify one.
pub const DEFAULT_PARALLAX_SPEED: f32 = 0.5;

/// Vertical offset for an element at document offset `top` with height
/// `height`, or `None` while it is outside the viewport (leave its
/// transform as it was).
pub fn element_parallax_offset(
    scroll_y: f32,
    top: f32,
    height: f32,
    viewport_height: f32,
    speed: f32,
) -> Option<f32> {
    let visible = scroll_y + viewport_height > top && scroll_y < top + height;
    visible.then(|| (scroll_y - top) * speed)
}

/// Parse a `data-parallax-speed` attribute, falling back to the default.
pub fn parse_speed(raw: Option<&str>) -> f32 {
    raw.and_then(|s| s.trim().parse::<f32>().ok())
        .filter(|s| s.is_finite())
        .unwrap_or(DEFAULT_PARALLAX_SPEED)
}

/// CSS transform for an offset.
pub fn translate_y(offset: f32) -> String {
    format!("translate3d(0, {offset}px, 0)")
}
