// Page contract for the hero background: element ids, data attributes and timings.

pub const CANVAS_ID: &str = "hero-canvas";
pub const LOADING_OVERLAY_ID: &str = "hero-loading";

// Overlay stays up this long before the background mounts.
pub const LOADING_DELAY_MS: i32 = 2500;

// Backing store never exceeds 2 device pixels per CSS pixel.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

pub const CTA_SELECTOR: &str = "[data-cta-id]";
pub const CTA_ID_ATTR: &str = "data-cta-id";
pub const CTA_LOCATION_ATTR: &str = "data-cta-location";
pub const CTA_UNKNOWN_LOCATION: &str = "unknown";

pub const PARALLAX_SELECTOR: &str = "[data-parallax-speed]";
pub const PARALLAX_SPEED_ATTR: &str = "data-parallax-speed";

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

pub const GTAG_SCRIPT_URL: &str = "https://www.googletagmanager.com/gtag/js";

pub const POSTHOG_SCRIPT_URL: &str = "https://us-assets.i.posthog.com/static/array.js";
pub const POSTHOG_API_HOST: &str = "https://us.i.posthog.com";
