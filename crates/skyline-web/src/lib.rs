#![cfg(target_arch = "wasm32")]
//! WASM entry for the skyline hero background.
//!
//! On start the loading overlay is shown, analytics and DOM parallax are
//! installed, and after [`LOADING_DELAY_MS`] the background mounts on
//! `#hero-canvas` and the overlay is hidden. Host pages can drive the same
//! lifecycle through [`mount_hero`]/[`unmount_hero`] or embed their own
//! [`HeroBackground`].

mod analytics;
mod constants;
mod dom;
mod frame;
mod input;
mod overlay;
mod parallax;
mod platform;

use std::cell::RefCell;

use skyline_core::analytics::Properties;
use skyline_core::{Lifecycle, MountOutcome, SceneConfig, SeededRandom};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

use constants::{CANVAS_ID, LOADING_DELAY_MS};
use platform::WebPlatform;

thread_local! {
    static HERO: RefCell<Option<Lifecycle<WebPlatform>>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("[web] skyline-web starting");

    if let Err(e) = init() {
        log::error!("[web] init error: {e:?}");
    }
    Ok(())
}

fn init() -> anyhow::Result<()> {
    let (window, document) =
        dom::window_document().ok_or_else(|| anyhow::anyhow!("no window/document"))?;

    overlay::show(&document);

    if let Err(e) = analytics::install(&window, &document) {
        log::warn!("[analytics] install failed: {e:?}");
    }
    match parallax::install(&window, &document) {
        Ok(n) if n > 0 => log::info!("[parallax] {n} elements"),
        Ok(_) => {}
        Err(e) => log::warn!("[parallax] install failed: {e:?}"),
    }

    let gate = Closure::wrap(Box::new(move || {
        spawn_local(async move {
            mount_page_hero().await;
            if let Some((_, document)) = dom::window_document() {
                if !overlay::is_hidden(&document) {
                    overlay::hide(&document);
                }
            }
        });
    }) as Box<dyn FnMut()>);
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            gate.as_ref().unchecked_ref(),
            LOADING_DELAY_MS,
        )
        .map_err(|e| anyhow::anyhow!("setTimeout failed: {e:?}"))?;
    gate.forget();
    Ok(())
}

fn config_for(window: &web::Window, preset: Option<&str>) -> SceneConfig {
    match preset {
        Some("compact") => SceneConfig::compact(),
        _ => SceneConfig::for_viewport_width(dom::inner_size(window).0 as u32),
    }
}

async fn renderer_for(
    window: &web::Window,
    canvas: &web::HtmlCanvasElement,
) -> Result<skyline_render::GpuState, skyline_core::SceneError> {
    dom::sync_canvas_backing_size(window, canvas);
    skyline_render::create_renderer(
        wgpu::SurfaceTarget::Canvas(canvas.clone()),
        canvas.width(),
        canvas.height(),
    )
    .await
}

async fn mount_page_hero() {
    let Some((window, document)) = dom::window_document() else {
        return;
    };
    let canvas = match dom::element_by_id::<web::HtmlCanvasElement>(&document, CANVAS_ID) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("[web] hero background disabled: {e:#}");
            return;
        }
    };

    // The old renderer must let go of the canvas before a new one configures it.
    HERO.with(|slot| {
        if let Some(lifecycle) = slot.borrow_mut().as_mut() {
            lifecycle.unmount();
        }
    });

    let config = config_for(&window, None);
    let renderer = renderer_for(&window, &canvas).await;
    let outcome = HERO.with(|slot| {
        let mut slot = slot.borrow_mut();
        let lifecycle = slot.get_or_insert_with(|| {
            Lifecycle::new(
                WebPlatform::new(window.clone(), document.clone(), canvas.clone()),
                config.clone(),
            )
        });
        lifecycle.set_config(config);
        lifecycle.mount(renderer, &mut SeededRandom::from_entropy())
    });
    if let MountOutcome::Degraded(e) = outcome {
        analytics::with_tracker(|t| {
            t.track_error("hero_background", &e.to_string(), None, Properties::new())
        });
    }
}

/// Mount (or remount) the page's hero background.
#[wasm_bindgen]
pub fn mount_hero() {
    spawn_local(mount_page_hero());
}

/// Stop the loop, remove listeners and free GPU resources. Safe to call
/// when nothing is mounted.
#[wasm_bindgen]
pub fn unmount_hero() {
    HERO.with(|slot| {
        if let Some(lifecycle) = slot.borrow_mut().as_mut() {
            lifecycle.unmount();
            log::debug!(
                "[web] {} listeners left after unmount",
                lifecycle.platform().listener_count()
            );
        }
    });
}

/// Track a custom analytics event with a plain-object property bag.
#[wasm_bindgen]
pub fn track_event(name: &str, properties: JsValue) {
    analytics::track_from_js(name, &properties);
}

/// A hero background bound to a host-provided canvas.
#[wasm_bindgen]
pub struct HeroBackground {
    lifecycle: Lifecycle<WebPlatform>,
}

#[wasm_bindgen]
impl HeroBackground {
    /// `preset` is `"hero"` (default) or `"compact"`. A missing GPU does not
    /// reject; the returned instance just reports `running == false`.
    pub async fn attach(
        canvas: web::HtmlCanvasElement,
        preset: Option<String>,
    ) -> Result<HeroBackground, JsValue> {
        let (window, document) =
            dom::window_document().ok_or_else(|| JsValue::from_str("no window/document"))?;
        let config = config_for(&window, preset.as_deref());
        let renderer = renderer_for(&window, &canvas).await;
        let mut lifecycle = Lifecycle::new(WebPlatform::new(window, document, canvas), config);
        if let MountOutcome::Degraded(e) =
            lifecycle.mount(renderer, &mut SeededRandom::from_entropy())
        {
            log::warn!("[web] HeroBackground degraded: {e}");
        }
        Ok(HeroBackground { lifecycle })
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.lifecycle.is_mounted()
    }

    pub fn unmount(&mut self) {
        self.lifecycle.unmount();
    }
}
