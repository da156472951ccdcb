//! First-party analytics shim.
//!
//! Events are stamped with session data, kept in an in-memory log and handed
//! to an [`EventForwarder`] (the web crate forwards to `gtag` and `posthog`).
//! There is no retry, batching or delivery guarantee; a forwarder failure is
//! logged and dropped.

use std::fmt;

use smallvec::SmallVec;
use thiserror::Error;

use crate::random::RandomSource;
use crate::scroll::ScrollInput;

#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    Text(String),
    Number(f64),
    Flag(bool),
    List(Vec<String>),
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Text(s) => write!(f, "{s:?}"),
            PropValue::Number(n) => write!(f, "{n}"),
            PropValue::Flag(b) => write!(f, "{b}"),
            PropValue::List(items) => write!(f, "{items:?}"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        PropValue::Text(v.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        PropValue::Text(v)
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        PropValue::Number(v)
    }
}

impl From<u32> for PropValue {
    fn from(v: u32) -> Self {
        PropValue::Number(v as f64)
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        PropValue::Flag(v)
    }
}

impl From<Vec<String>> for PropValue {
    fn from(v: Vec<String>) -> Self {
        PropValue::List(v)
    }
}

/// Insertion-ordered property bag. Inserting an existing key replaces it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Properties(Vec<(String, PropValue)>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Like [`with`](Self::with) but skips `None`.
    pub fn with_opt<V: Into<PropValue>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.insert(key, v);
        }
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<PropValue>) {
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key.to_owned(), value)),
        }
    }

    /// Later entries win, like an object spread.
    pub fn extend(&mut self, other: Properties) {
        for (k, v) in other.0 {
            self.insert(&k, v);
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnalyticsEvent {
    pub name: String,
    pub properties: Properties,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnalyticsConfig {
    pub ga4_measurement_id: Option<String>,
    pub posthog_key: Option<String>,
    pub environment: Environment,
}

/// Settings passed to `posthog.init`. Page views and page leaves are tracked
/// through the shim, so PostHog's automatic capture stays off.
#[derive(Clone, Debug, PartialEq)]
pub struct PosthogInit {
    pub key: String,
    pub capture_pageview: bool,
    pub capture_pageleave: bool,
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl AnalyticsConfig {
    pub fn ga4_id(&self) -> Option<&str> {
        non_blank(&self.ga4_measurement_id)
    }

    /// `None` unless a non-blank PostHog key is configured.
    pub fn posthog_init(&self) -> Option<PosthogInit> {
        non_blank(&self.posthog_key).map(|key| PosthogInit {
            key: key.to_owned(),
            capture_pageview: false,
            capture_pageleave: false,
        })
    }
}

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("{target} rejected event: {reason}")]
    Rejected { target: &'static str, reason: String },
}

/// Delivers an event to third-party trackers.
pub trait EventForwarder {
    fn forward(&mut self, event: &AnalyticsEvent) -> Result<(), ForwardError>;
}

/// Milliseconds since the Unix epoch.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormAction {
    Start,
    Fill,
    Submit,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionKind {
    Hover,
    Click,
    Focus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
    Image,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaAction {
    Play,
    Pause,
    Complete,
    Error,
}

macro_rules! wire_name {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }
        }
    };
}

wire_name!(FormAction { Start => "start", Fill => "fill", Submit => "submit", Error => "error" });
wire_name!(InteractionKind { Hover => "hover", Click => "click", Focus => "focus" });
wire_name!(MediaKind { Video => "video", Audio => "audio", Image => "image" });
wire_name!(MediaAction { Play => "play", Pause => "pause", Complete => "complete", Error => "error" });

#[derive(Clone, Debug, PartialEq)]
pub struct SessionInfo {
    pub session_id: String,
    pub start_time_ms: f64,
    pub duration_ms: f64,
    pub event_count: usize,
}

/// `"{start_ms}-{9 base-36 chars}"`.
pub fn generate_session_id(now_ms: f64, rng: &mut dyn RandomSource) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let suffix: String = (0..9)
        .map(|_| {
            let i = ((rng.next_unit() * 36.0) as usize).min(35);
            DIGITS[i] as char
        })
        .collect();
    format!("{}-{}", now_ms.max(0.0) as u64, suffix)
}

pub struct AnalyticsTracker<F: EventForwarder, C: Clock> {
    config: AnalyticsConfig,
    forwarder: F,
    clock: C,
    session_id: String,
    start_ms: f64,
    events: Vec<AnalyticsEvent>,
}

impl<F: EventForwarder, C: Clock> AnalyticsTracker<F, C> {
    pub fn new(config: AnalyticsConfig, forwarder: F, clock: C, rng: &mut dyn RandomSource) -> Self {
        let start_ms = clock.now_ms();
        let session_id = generate_session_id(start_ms, rng);
        log::debug!("[analytics] session {session_id}");
        Self {
            config,
            forwarder,
            clock,
            session_id,
            start_ms,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn forwarder(&self) -> &F {
        &self.forwarder
    }

    pub fn forwarder_mut(&mut self) -> &mut F {
        &mut self.forwarder
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn elapsed_ms(&self) -> f64 {
        (self.clock.now_ms() - self.start_ms).max(0.0)
    }

    /// Stamp, record and forward one event.
    pub fn track_event(&mut self, name: &str, properties: Properties) {
        let now = self.clock.now_ms();
        let mut props = properties;
        props.insert("session_id", self.session_id.clone());
        props.insert("timestamp", now);
        props.insert("time_on_site", (now - self.start_ms).max(0.0));

        let event = AnalyticsEvent {
            name: name.to_owned(),
            properties: props,
        };

        if self.config.environment == Environment::Development {
            let rendered: Vec<String> = event
                .properties
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            log::info!("[analytics] event {} {{{}}}", event.name, rendered.join(", "));
        }

        if let Err(e) = self.forwarder.forward(&event) {
            log::error!("[analytics] error tracking event {}: {e}", event.name);
        }
        self.events.push(event);
    }

    pub fn track_page_view(&mut self, path: &str, title: &str, referrer: &str, url: &str) {
        self.track_event(
            "page_view",
            Properties::new()
                .with("path", path)
                .with("title", title)
                .with("referrer", referrer)
                .with("url", url),
        );
    }

    pub fn track_cta_click(
        &mut self,
        cta_id: &str,
        cta_text: &str,
        location: &str,
        element_type: Option<&str>,
        extra: Properties,
    ) {
        let mut props = Properties::new()
            .with("cta_id", cta_id)
            .with("cta_text", cta_text)
            .with("location", location)
            .with_opt("element_type", element_type);
        props.extend(extra);
        self.track_event("cta_click", props);
    }

    pub fn track_form_interaction(
        &mut self,
        form_id: &str,
        action: FormAction,
        field_name: Option<&str>,
        error_message: Option<&str>,
    ) {
        self.track_event(
            "form_interaction",
            Properties::new()
                .with("form_id", form_id)
                .with("action", action.as_str())
                .with_opt("field_name", field_name)
                .with_opt("error_message", error_message),
        );
    }

    pub fn track_form_submit(
        &mut self,
        form_id: &str,
        success: bool,
        errors: Option<Vec<String>>,
        fields_completed: u32,
    ) {
        let submission_time = self.elapsed_ms();
        self.track_event(
            "form_submit",
            Properties::new()
                .with("form_id", form_id)
                .with("success", success)
                .with_opt("errors", errors)
                .with("fields_completed", fields_completed)
                .with("submission_time", submission_time),
        );
    }

    pub fn track_service_view(&mut self, service_id: &str, service_name: &str, category: Option<&str>) {
        self.track_event(
            "service_view",
            Properties::new()
                .with("service_id", service_id)
                .with("service_name", service_name)
                .with_opt("category", category),
        );
    }

    pub fn track_scroll_depth(&mut self, depth_percentage: u32, section: Option<&str>) {
        let time_to_depth = self.elapsed_ms();
        self.track_event(
            "scroll_depth",
            Properties::new()
                .with("depth_percentage", depth_percentage)
                .with_opt("section", section)
                .with("time_to_depth", time_to_depth),
        );
    }

    pub fn track_interaction(&mut self, element_id: &str, kind: InteractionKind, extra: Properties) {
        let mut props = Properties::new()
            .with("element_id", element_id)
            .with("interaction_type", kind.as_str());
        props.extend(extra);
        self.track_event("element_interaction", props);
    }

    pub fn track_media_event(
        &mut self,
        media_id: &str,
        kind: MediaKind,
        action: MediaAction,
        duration: Option<f64>,
    ) {
        self.track_event(
            "media_event",
            Properties::new()
                .with("media_id", media_id)
                .with("media_type", kind.as_str())
                .with("action", action.as_str())
                .with_opt("duration", duration),
        );
    }

    pub fn track_engagement_time(&mut self, section: &str, time_spent_ms: f64) {
        self.track_event(
            "engagement_time",
            Properties::new()
                .with("section", section)
                .with("time_spent_ms", time_spent_ms)
                .with("time_spent_seconds", (time_spent_ms / 1000.0).round()),
        );
    }

    pub fn track_conversion(
        &mut self,
        conversion_type: &str,
        value: Option<f64>,
        currency: Option<&str>,
        metadata: Properties,
    ) {
        let mut props = Properties::new()
            .with("conversion_type", conversion_type)
            .with_opt("value", value)
            .with_opt("currency", currency);
        props.extend(metadata);
        self.track_event("conversion", props);
    }

    /// Context entries are flattened under a `context_` prefix.
    pub fn track_error(
        &mut self,
        error_type: &str,
        error_message: &str,
        stack_trace: Option<&str>,
        context: Properties,
    ) {
        let mut props = Properties::new()
            .with("error_type", error_type)
            .with("error_message", error_message)
            .with_opt("stack_trace", stack_trace);
        for (k, v) in context.iter() {
            props.insert(&format!("context_{k}"), v.clone());
        }
        self.track_event("error", props);
    }

    pub fn track_performance(&mut self, metric: &str, value: f64, unit: Option<&str>) {
        self.track_event(
            "performance_metric",
            Properties::new()
                .with("metric", metric)
                .with("value", value)
                .with_opt("unit", unit),
        );
    }

    pub fn session_info(&self) -> SessionInfo {
        SessionInfo {
            session_id: self.session_id.clone(),
            start_time_ms: self.start_ms,
            duration_ms: self.elapsed_ms(),
            event_count: self.events.len(),
        }
    }

    pub fn events(&self) -> &[AnalyticsEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

/// Reports each quarter of the page once, in ascending order.
#[derive(Clone, Debug, Default)]
pub struct ScrollDepthTracker {
    max_reported: u32,
}

impl ScrollDepthTracker {
    pub const STEP: u32 = 25;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_reported(&self) -> u32 {
        self.max_reported
    }

    /// Milestones crossed since the last call. A fast jump reports every
    /// milestone it skipped over.
    pub fn update(&mut self, input: &ScrollInput) -> SmallVec<[u32; 4]> {
        let percent = (input.progress() * 100.0).round() as u32;
        let reached = percent / Self::STEP * Self::STEP;
        let mut crossed = SmallVec::new();
        let mut next = self.max_reported + Self::STEP;
        while next <= reached {
            crossed.push(next);
            next += Self::STEP;
        }
        if reached > self.max_reported {
            self.max_reported = reached;
        }
        crossed
    }

    pub fn reset(&mut self) {
        self.max_reported = 0;
    }
}
