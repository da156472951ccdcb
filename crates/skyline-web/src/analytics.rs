//! Browser side of the analytics shim: the `gtag`/`posthog` forwarder, the
//! GA4 bootstrap, page-view and scroll-depth tracking, and CTA click wiring.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Object, Reflect};
use skyline_core::analytics::{
    AnalyticsConfig, AnalyticsEvent, AnalyticsTracker, Clock, Environment, EventForwarder,
    ForwardError, PosthogInit, PropValue, Properties, ScrollDepthTracker,
};
use skyline_core::SeededRandom;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

use crate::constants::{
    CTA_ID_ATTR, CTA_LOCATION_ATTR, CTA_SELECTOR, CTA_UNKNOWN_LOCATION, GTAG_SCRIPT_URL,
    POSTHOG_API_HOST, POSTHOG_SCRIPT_URL,
};
use crate::dom;

pub type WebTracker = AnalyticsTracker<WebForwarder, DateClock>;

thread_local! {
    static TRACKER: RefCell<Option<WebTracker>> = const { RefCell::new(None) };
}

/// Run `f` against the page tracker, if one is installed.
pub fn with_tracker<T>(f: impl FnOnce(&mut WebTracker) -> T) -> Option<T> {
    TRACKER.with(|slot| slot.borrow_mut().as_mut().map(f))
}

pub struct DateClock;

impl Clock for DateClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

pub struct WebForwarder {
    window: web::Window,
}

impl WebForwarder {
    pub fn new(window: web::Window) -> Self {
        Self { window }
    }
}

fn global_function(target: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|v| v.dyn_into::<Function>().ok())
}

fn rejected(target: &'static str, err: JsValue) -> ForwardError {
    ForwardError::Rejected {
        target,
        reason: format!("{err:?}"),
    }
}

fn prop_to_js(value: &PropValue) -> JsValue {
    match value {
        PropValue::Text(s) => JsValue::from_str(s),
        PropValue::Number(n) => JsValue::from_f64(*n),
        PropValue::Flag(b) => JsValue::from_bool(*b),
        PropValue::List(items) => items
            .iter()
            .map(|s| JsValue::from_str(s))
            .collect::<Array>()
            .into(),
    }
}

fn properties_to_js(props: &Properties) -> Object {
    let obj = Object::new();
    for (k, v) in props.iter() {
        let _ = Reflect::set(&obj, &JsValue::from_str(k), &prop_to_js(v));
    }
    obj
}

/// Inverse of [`properties_to_js`] for host-page calls. Values that are not
/// strings, numbers, booleans or string arrays are dropped.
fn properties_from_js(value: &JsValue) -> Properties {
    let mut props = Properties::new();
    let Some(obj) = value.dyn_ref::<Object>() else {
        return props;
    };
    for entry in Object::entries(obj).iter() {
        let pair = Array::from(&entry);
        let Some(key) = pair.get(0).as_string() else {
            continue;
        };
        let v = pair.get(1);
        if let Some(s) = v.as_string() {
            props.insert(&key, s);
        } else if let Some(n) = v.as_f64() {
            props.insert(&key, n);
        } else if let Some(b) = v.as_bool() {
            props.insert(&key, b);
        } else if Array::is_array(&v) {
            let items: Vec<String> = Array::from(&v)
                .iter()
                .filter_map(|item| item.as_string())
                .collect();
            props.insert(&key, items);
        }
    }
    props
}

impl EventForwarder for WebForwarder {
    fn forward(&mut self, event: &AnalyticsEvent) -> Result<(), ForwardError> {
        let props = properties_to_js(&event.properties);
        let name = JsValue::from_str(&event.name);

        if let Some(gtag) = global_function(&self.window, "gtag") {
            gtag.call3(&JsValue::NULL, &JsValue::from_str("event"), &name, &props)
                .map_err(|e| rejected("gtag", e))?;
        }

        let posthog =
            Reflect::get(&self.window, &JsValue::from_str("posthog")).unwrap_or_default();
        if posthog.is_object() {
            if let Some(capture) = global_function(&posthog, "capture") {
                capture
                    .call2(&posthog, &name, &props)
                    .map_err(|e| rejected("posthog", e))?;
            }
        }
        Ok(())
    }
}

pub fn config_from_env() -> AnalyticsConfig {
    let non_empty = |v: Option<&'static str>| v.filter(|s| !s.is_empty()).map(str::to_owned);
    AnalyticsConfig {
        ga4_measurement_id: non_empty(option_env!("SKYLINE_GA4_MEASUREMENT_ID")),
        posthog_key: non_empty(option_env!("SKYLINE_POSTHOG_KEY")),
        environment: if cfg!(debug_assertions) {
            Environment::Development
        } else {
            Environment::Production
        },
    }
}

/// Inject gtag.js and the dataLayer bootstrap unless the page already
/// defines `window.gtag`.
fn install_gtag(
    window: &web::Window,
    document: &web::Document,
    measurement_id: &str,
) -> Result<(), JsValue> {
    if global_function(window, "gtag").is_some() {
        return Ok(());
    }

    let script = document
        .create_element("script")?
        .dyn_into::<web::HtmlScriptElement>()
        .map_err(JsValue::from)?;
    script.set_async(true);
    script.set_src(&format!("{GTAG_SCRIPT_URL}?id={measurement_id}"));
    document
        .head()
        .ok_or_else(|| JsValue::from_str("document has no <head>"))?
        .append_child(&script)?;

    let data_layer_key = JsValue::from_str("dataLayer");
    if !Array::is_array(&Reflect::get(window, &data_layer_key)?) {
        Reflect::set(window, &data_layer_key, &Array::new())?;
    }
    let gtag = Function::new_no_args("window.dataLayer.push(arguments);");
    Reflect::set(window, &JsValue::from_str("gtag"), &gtag)?;
    gtag.call2(&JsValue::NULL, &JsValue::from_str("js"), &js_sys::Date::new_0())?;
    gtag.call2(
        &JsValue::NULL,
        &JsValue::from_str("config"),
        &JsValue::from_str(measurement_id),
    )?;
    log::info!("[analytics] gtag installed for {measurement_id}");
    Ok(())
}

/// Load posthog-js unless the page already defines `window.posthog`, then
/// call `posthog.init` once the script has loaded. Events tracked before
/// that only reach gtag.
fn install_posthog(
    window: &web::Window,
    document: &web::Document,
    init: PosthogInit,
) -> Result<(), JsValue> {
    let posthog_key = JsValue::from_str("posthog");
    if Reflect::get(window, &posthog_key)?.is_object() {
        return Ok(());
    }

    let script = document
        .create_element("script")?
        .dyn_into::<web::HtmlScriptElement>()
        .map_err(JsValue::from)?;
    script.set_async(true);
    script.set_src(POSTHOG_SCRIPT_URL);

    let window_in = window.clone();
    let on_load = Closure::wrap(Box::new(move || {
        let posthog = Reflect::get(&window_in, &posthog_key).unwrap_or_default();
        let Some(init_fn) = global_function(&posthog, "init") else {
            log::warn!("[analytics] posthog script loaded without init()");
            return;
        };
        let options = Object::new();
        let _ = Reflect::set(&options, &"api_host".into(), &POSTHOG_API_HOST.into());
        let _ = Reflect::set(
            &options,
            &"capture_pageview".into(),
            &init.capture_pageview.into(),
        );
        let _ = Reflect::set(
            &options,
            &"capture_pageleave".into(),
            &init.capture_pageleave.into(),
        );
        if let Err(e) = init_fn.call2(&posthog, &JsValue::from_str(&init.key), &options) {
            log::warn!("[analytics] posthog init failed: {e:?}");
        }
    }) as Box<dyn FnMut()>);
    script.set_onload(Some(on_load.as_ref().unchecked_ref()));
    on_load.forget();

    document
        .head()
        .ok_or_else(|| JsValue::from_str("document has no <head>"))?
        .append_child(&script)?;
    log::info!("[analytics] posthog loader installed");
    Ok(())
}

fn track_page_view(window: &web::Window, document: &web::Document) {
    let location = window.location();
    let path = location.pathname().unwrap_or_else(|_| "/".into());
    let url = location.href().unwrap_or_default();
    let title = document.title();
    let referrer = document.referrer();
    with_tracker(|t| t.track_page_view(&path, &title, &referrer, &url));
}

fn watch_scroll_depth(window: &web::Window, document: &web::Document) -> Result<(), JsValue> {
    let depth = Rc::new(RefCell::new(ScrollDepthTracker::new()));
    let window_in = window.clone();
    let document_in = document.clone();
    let closure = Closure::wrap(Box::new(move || {
        let snapshot = dom::scroll_snapshot(&window_in, &document_in);
        let crossed = depth.borrow_mut().update(&snapshot);
        for milestone in crossed {
            with_tracker(|t| t.track_scroll_depth(milestone, None));
        }
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback_and_add_event_listener_options(
        "scroll",
        closure.as_ref().unchecked_ref(),
        &dom::passive(),
    )?;
    closure.forget();
    Ok(())
}

fn wire_ctas(document: &web::Document) -> Result<u32, JsValue> {
    let nodes = document.query_selector_all(CTA_SELECTOR)?;
    let mut wired = 0;
    for i in 0..nodes.length() {
        let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<web::Element>().ok()) else {
            continue;
        };
        let cta_id = el.get_attribute(CTA_ID_ATTR).unwrap_or_default();
        let location = el
            .get_attribute(CTA_LOCATION_ATTR)
            .unwrap_or_else(|| CTA_UNKNOWN_LOCATION.to_owned());
        let element_type = el.tag_name().to_lowercase();
        let target = el.clone();
        let closure = Closure::wrap(Box::new(move || {
            let text = target.text_content().unwrap_or_default();
            with_tracker(|t| {
                t.track_cta_click(
                    &cta_id,
                    text.trim(),
                    &location,
                    Some(element_type.as_str()),
                    Properties::new(),
                )
            });
        }) as Box<dyn FnMut()>);
        el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        wired += 1;
    }
    Ok(wired)
}

/// Install the page tracker once: bootstrap gtag, record the page view and
/// start scroll-depth and CTA tracking.
pub fn install(window: &web::Window, document: &web::Document) -> Result<(), JsValue> {
    if with_tracker(|_| ()).is_some() {
        return Ok(());
    }
    let config = config_from_env();
    if let Some(id) = config.ga4_id() {
        if let Err(e) = install_gtag(window, document, id) {
            log::warn!("[analytics] gtag bootstrap failed: {e:?}");
        }
    }
    if let Some(init) = config.posthog_init() {
        if let Err(e) = install_posthog(window, document, init) {
            log::warn!("[analytics] posthog bootstrap failed: {e:?}");
        }
    }
    let mut rng = SeededRandom::from_entropy();
    let forwarder = WebForwarder::new(window.clone());
    let tracker = AnalyticsTracker::new(config, forwarder, DateClock, &mut rng);
    TRACKER.with(|slot| *slot.borrow_mut() = Some(tracker));

    track_page_view(window, document);
    watch_scroll_depth(window, document)?;
    let wired = wire_ctas(document)?;
    log::debug!("[analytics] tracking {wired} call-to-action elements");
    Ok(())
}

/// Track an arbitrary event from the host page. `properties` is a plain
/// object; unsupported values are dropped.
pub fn track_from_js(name: &str, properties: &JsValue) {
    let props = properties_from_js(properties);
    if with_tracker(|t| t.track_event(name, props)).is_none() {
        log::warn!("[analytics] tracker not installed, dropping {name}");
    }
}
