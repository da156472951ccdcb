//! Scroll position to camera target and layer offsets.
//!
//! Runs on every scroll event and once at mount. It never draws; it only
//! publishes a [`ScrollFrame`] that the render tick reads.

use smallvec::SmallVec;

use crate::camera::CameraPose;
use crate::config::{MountainConfig, SceneConfig, Waypoint};
use crate::constants::{MOON_SCROLL_ROLL, MOON_SCROLL_SWAY, NEBULA_BEHIND_MOUNTAINS};
use crate::easing::ease_in_out_cubic;

/// Raw page metrics in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollInput {
    pub scroll_y: f32,
    pub document_height: f32,
    pub viewport_height: f32,
}

impl ScrollInput {
    pub fn new(scroll_y: f32, document_height: f32, viewport_height: f32) -> Self {
        Self {
            scroll_y,
            document_height,
            viewport_height,
        }
    }

    pub fn max_scroll(&self) -> f32 {
        self.document_height - self.viewport_height
    }

    pub fn progress(&self) -> f32 {
        scroll_progress(self.scroll_y, self.document_height, self.viewport_height)
    }
}

/// `clamp(scroll_y / (document - viewport), 0, 1)`, or 0 when the page
/// does not scroll. Never NaN.
pub fn scroll_progress(scroll_y: f32, document_height: f32, viewport_height: f32) -> f32 {
    let max = document_height - viewport_height;
    if !(max > 0.0) || !scroll_y.is_finite() {
        return 0.0;
    }
    (scroll_y / max).clamp(0.0, 1.0)
}

/// Number of blended segments for a waypoint list: one between each
/// adjacent pair, and at least one.
#[inline]
pub fn segment_count(waypoints: usize) -> usize {
    waypoints.saturating_sub(1).max(1)
}

/// Which segment `progress` falls in, and how far along. `section` is
/// always a valid index; progress 1 is the end of the last segment.
pub fn locate_section(progress: f32, segments: usize) -> (usize, f32) {
    if segments == 0 {
        return (0, 0.0);
    }
    let scaled = progress.clamp(0.0, 1.0) * segments as f32;
    let section = scaled.floor() as usize;
    if section >= segments {
        return (segments - 1, 1.0);
    }
    (section, (scaled - section as f32).clamp(0.0, 1.0))
}

/// Eased blend between `waypoints[section]` and the next one. The camera
/// reaches the last waypoint exactly at progress 1.
pub fn target_pose(waypoints: &[Waypoint], progress: f32) -> CameraPose {
    let Some(first) = waypoints.first() else {
        return CameraPose::default();
    };
    let (section, local_t) = locate_section(progress, segment_count(waypoints.len()));
    let current = waypoints.get(section).unwrap_or(first);
    let next = &waypoints[(section + 1).min(waypoints.len() - 1)];
    if local_t >= 1.0 {
        return next.pose;
    }
    current.pose.lerp(&next.pose, ease_in_out_cubic(local_t))
}

/// Per-layer z for the current scroll, in the same back-to-front order as
/// the config table.
pub fn mountain_depths(cfg: &MountainConfig, scroll_y: f32) -> SmallVec<[f32; 8]> {
    let scroll_y = if scroll_y.is_finite() { scroll_y.max(0.0) } else { 0.0 };
    cfg.layers
        .iter()
        .map(|l| l.base_depth + scroll_y * l.speed * cfg.scroll_scale)
        .collect()
}

/// Everything one scroll event publishes.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollFrame {
    pub progress: f32,
    pub section: usize,
    pub local_t: f32,
    pub target: CameraPose,
    pub mountain_depths: SmallVec<[f32; 8]>,
    pub nebula_z: f32,
    pub moon_offset_x: f32,
    pub moon_roll: f32,
}

/// Stateless mapper bound to one configuration.
#[derive(Clone, Debug)]
pub struct ScrollMapper {
    waypoints: Vec<Waypoint>,
    mountains: MountainConfig,
    nebula_z: f32,
    nebula_follows: bool,
}

impl ScrollMapper {
    pub fn new(cfg: &SceneConfig) -> Self {
        Self {
            waypoints: cfg.waypoints.clone(),
            mountains: cfg.mountains.clone(),
            nebula_z: cfg.nebula.z,
            nebula_follows: cfg.nebula.follow_mountains,
        }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn map(&self, input: &ScrollInput) -> ScrollFrame {
        let progress = input.progress();
        let segments = segment_count(self.waypoints.len());
        let (section, local_t) = locate_section(progress, segments);
        let target = target_pose(&self.waypoints, progress);
        let depths = mountain_depths(&self.mountains, input.scroll_y);

        // Backdrop stays a fixed distance behind the farthest ridge.
        let nebula_z = match depths.first() {
            Some(far) if self.nebula_follows => far - NEBULA_BEHIND_MOUNTAINS,
            _ => self.nebula_z,
        };

        let frame = ScrollFrame {
            progress,
            section,
            local_t,
            target,
            mountain_depths: depths,
            nebula_z,
            moon_offset_x: (progress * std::f32::consts::PI).sin() * MOON_SCROLL_SWAY,
            moon_roll: progress * std::f32::consts::PI * MOON_SCROLL_ROLL,
        };
        log::debug!(
            "[scroll] progress={:.3} section={} t={:.3}",
            frame.progress,
            frame.section,
            frame.local_t
        );
        frame
    }
}
