use skyline_core::{ScrollInput, Viewport};
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::REDUCED_MOTION_QUERY;
use crate::input;

#[inline]
pub fn window_document() -> Option<(web::Window, web::Document)> {
    let window = web::window()?;
    let document = window.document()?;
    Some((window, document))
}

pub fn element_by_id<T: JsCast>(document: &web::Document, id: &str) -> anyhow::Result<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{id}"))?
        .dyn_into::<T>()
        .map_err(|e| anyhow::anyhow!("#{id} has the wrong element type: {e:?}"))
}

/// CSS-pixel size of the layout viewport.
pub fn inner_size(window: &web::Window) -> (f64, f64) {
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    (w, h)
}

pub fn sync_canvas_backing_size(window: &web::Window, canvas: &web::HtmlCanvasElement) {
    let rect = canvas.get_bounding_client_rect();
    let (w, h) = input::backing_size(rect.width(), rect.height(), window.device_pixel_ratio());
    if canvas.width() != w {
        canvas.set_width(w);
    }
    if canvas.height() != h {
        canvas.set_height(h);
    }
}

pub fn canvas_viewport(canvas: &web::HtmlCanvasElement) -> Viewport {
    Viewport::new(canvas.width(), canvas.height())
}

pub fn scroll_snapshot(window: &web::Window, document: &web::Document) -> ScrollInput {
    let scroll_y = window.scroll_y().unwrap_or(0.0);
    let document_height = document
        .document_element()
        .map(|el| el.scroll_height() as f64)
        .unwrap_or(0.0);
    let (_, viewport_height) = inner_size(window);
    ScrollInput::new(
        scroll_y as f32,
        document_height as f32,
        viewport_height as f32,
    )
}

pub fn prefers_reduced_motion(window: &web::Window) -> bool {
    matches!(
        window.match_media(REDUCED_MOTION_QUERY),
        Ok(Some(mql)) if mql.matches()
    )
}

/// Listener options for scroll-type events that never call preventDefault.
pub fn passive() -> web::AddEventListenerOptions {
    let opts = web::AddEventListenerOptions::new();
    opts.set_passive(true);
    opts
}
