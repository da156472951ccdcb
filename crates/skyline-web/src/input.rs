use crate::constants::MAX_PIXEL_RATIO;

#[inline]
pub fn clamp_pixel_ratio(dpr: f64) -> f64 {
    if dpr.is_finite() && dpr > 0.0 {
        dpr.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}

/// Canvas backing size for a CSS box, never smaller than 1×1.
#[inline]
pub fn backing_size(css_width: f64, css_height: f64, dpr: f64) -> (u32, u32) {
    let ratio = clamp_pixel_ratio(dpr);
    let w = (css_width.max(0.0) * ratio) as u32;
    let h = (css_height.max(0.0) * ratio) as u32;
    (w.max(1), h.max(1))
}
