// A scrollable stand-in for the web page the background sits behind.

use skyline_core::ScrollInput;

/// Document height in viewport heights.
pub const DOCUMENT_PAGES: f32 = 5.0;
/// Pixels per wheel "line".
pub const WHEEL_LINE_PX: f32 = 60.0;
/// Arrow keys move a tenth of a viewport.
pub const ARROW_STEP: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VirtualDocument {
    scroll_y: f32,
    viewport_height: f32,
    pages: f32,
}

impl VirtualDocument {
    pub fn new(viewport_height: f32) -> Self {
        Self {
            scroll_y: 0.0,
            viewport_height: viewport_height.max(0.0),
            pages: DOCUMENT_PAGES,
        }
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn height(&self) -> f32 {
        self.viewport_height * self.pages
    }

    pub fn max_scroll(&self) -> f32 {
        (self.height() - self.viewport_height).max(0.0)
    }

    /// Returns whether the position moved.
    pub fn scroll_to(&mut self, y: f32) -> bool {
        let y = if y.is_finite() { y } else { 0.0 };
        let next = y.clamp(0.0, self.max_scroll());
        let moved = next != self.scroll_y;
        self.scroll_y = next;
        moved
    }

    pub fn scroll_by(&mut self, dy: f32) -> bool {
        self.scroll_to(self.scroll_y + dy)
    }

    /// Positive lines scroll towards the top, like a wheel turned up.
    pub fn scroll_lines(&mut self, lines: f32) -> bool {
        self.scroll_by(-lines * WHEEL_LINE_PX)
    }

    pub fn step(&mut self, direction: f32) -> bool {
        self.scroll_by(direction.signum() * self.viewport_height * ARROW_STEP)
    }

    pub fn page(&mut self, direction: f32) -> bool {
        self.scroll_by(direction.signum() * self.viewport_height)
    }

    /// Keeps the relative position when the window changes height.
    pub fn set_viewport_height(&mut self, height: f32) {
        let max = self.max_scroll();
        let fraction = if max > 0.0 { self.scroll_y / max } else { 0.0 };
        self.viewport_height = height.max(0.0);
        self.scroll_y = fraction * self.max_scroll();
    }

    pub fn snapshot(&self) -> ScrollInput {
        ScrollInput::new(self.scroll_y, self.height(), self.viewport_height)
    }
}
