use std::rc::Rc;

use skyline_core::parallax::{element_parallax_offset, parse_speed, translate_y};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

use crate::constants::{PARALLAX_SELECTOR, PARALLAX_SPEED_ATTR};
use crate::dom;

struct Layer {
    element: web::HtmlElement,
    speed: f32,
}

fn apply(window: &web::Window, layers: &[Layer]) {
    let scroll_y = window.scroll_y().unwrap_or(0.0) as f32;
    let (_, viewport_h) = dom::inner_size(window);
    for layer in layers {
        // Layout offsets ignore transforms, so the applied shift never feeds back.
        let top = layer.element.offset_top() as f32;
        let height = layer.element.offset_height() as f32;
        if let Some(offset) =
            element_parallax_offset(scroll_y, top, height, viewport_h as f32, layer.speed)
        {
            let _ = layer
                .element
                .style()
                .set_property("transform", &translate_y(offset));
        }
    }
}

/// Translate every `data-parallax-speed` element with the scroll position.
/// Returns how many elements were wired; zero under reduced motion.
pub fn install(window: &web::Window, document: &web::Document) -> Result<usize, JsValue> {
    if dom::prefers_reduced_motion(window) {
        log::info!("[parallax] reduced motion requested, parallax disabled");
        return Ok(0);
    }

    let nodes = document.query_selector_all(PARALLAX_SELECTOR)?;
    let mut layers = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        let Some(element) = nodes
            .item(i)
            .and_then(|n| n.dyn_into::<web::HtmlElement>().ok())
        else {
            continue;
        };
        let speed = parse_speed(element.get_attribute(PARALLAX_SPEED_ATTR).as_deref());
        element.style().set_property("will-change", "transform")?;
        layers.push(Layer { element, speed });
    }
    if layers.is_empty() {
        return Ok(0);
    }

    let layers = Rc::new(layers);
    apply(window, &layers);

    let window_in = window.clone();
    let layers_in = layers.clone();
    let closure =
        Closure::wrap(Box::new(move || apply(&window_in, &layers_in)) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback_and_add_event_listener_options(
        "scroll",
        closure.as_ref().unchecked_ref(),
        &dom::passive(),
    )?;
    closure.forget();
    Ok(layers.len())
}
