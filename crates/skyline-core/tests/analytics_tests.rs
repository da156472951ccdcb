// Host-side tests for the analytics shim and scroll-depth milestones.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use skyline_core::analytics::*;
use skyline_core::{ScrollInput, SequenceRandom};

#[derive(Clone, Default)]
struct FakeClock(Rc<Cell<f64>>);

impl FakeClock {
    fn at(ms: f64) -> Self {
        Self(Rc::new(Cell::new(ms)))
    }

    fn advance(&self, ms: f64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> f64 {
        self.0.get()
    }
}

#[derive(Clone, Default)]
struct Recorder {
    sent: Rc<RefCell<Vec<AnalyticsEvent>>>,
    fail: bool,
}

impl EventForwarder for Recorder {
    fn forward(&mut self, event: &AnalyticsEvent) -> Result<(), ForwardError> {
        if self.fail {
            return Err(ForwardError::Rejected {
                target: "gtag",
                reason: "not a function".into(),
            });
        }
        self.sent.borrow_mut().push(event.clone());
        Ok(())
    }
}

fn tracker(clock: FakeClock) -> (AnalyticsTracker<Recorder, FakeClock>, Recorder) {
    let rec = Recorder::default();
    let mut rng = SequenceRandom::new(vec![0.0, 0.5, 0.99]);
    let t = AnalyticsTracker::new(AnalyticsConfig::default(), rec.clone(), clock, &mut rng);
    (t, rec)
}

#[test]
fn session_id_format() {
    let mut rng = SequenceRandom::new(vec![0.0, 0.5, 0.99]);
    let id = generate_session_id(1_700_000_000_123.0, &mut rng);
    let (ms, suffix) = id.split_once('-').unwrap();
    assert_eq!(ms, "1700000000123");
    assert_eq!(suffix.len(), 9);
    assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    assert_eq!(&suffix[..3], "0iz");
}

#[test]
fn events_are_stamped_recorded_and_forwarded() {
    let clock = FakeClock::at(10_000.0);
    let (mut t, rec) = tracker(clock.clone());
    clock.advance(2_500.0);
    t.track_event("custom", Properties::new().with("k", "v"));

    let events = t.events();
    assert_eq!(events.len(), 1);
    let p = &events[0].properties;
    assert_eq!(p.get("k"), Some(&PropValue::Text("v".into())));
    assert_eq!(p.get("session_id"), Some(&PropValue::Text(t.session_id().to_owned())));
    assert_eq!(p.get("timestamp"), Some(&PropValue::Number(12_500.0)));
    assert_eq!(p.get("time_on_site"), Some(&PropValue::Number(2_500.0)));
    assert_eq!(rec.sent.borrow().len(), 1);
    assert_eq!(rec.sent.borrow()[0], events[0]);
}

#[test]
fn session_fields_override_caller_properties() {
    let (mut t, _rec) = tracker(FakeClock::at(0.0));
    t.track_event("x", Properties::new().with("session_id", "spoofed"));
    let p = &t.events()[0].properties;
    assert_ne!(p.get("session_id"), Some(&PropValue::Text("spoofed".into())));
}

#[test]
fn forwarder_failure_is_swallowed() {
    let rec = Recorder {
        fail: true,
        ..Recorder::default()
    };
    let mut rng = SequenceRandom::constant(0.3);
    let mut t = AnalyticsTracker::new(AnalyticsConfig::default(), rec, FakeClock::at(0.0), &mut rng);
    t.track_page_view("/", "Home", "", "https://example.test/");
    assert_eq!(t.events().len(), 1);
    assert_eq!(t.session_info().event_count, 1);
}

#[test]
fn typed_helpers_use_wire_names() {
    let (mut t, _rec) = tracker(FakeClock::at(0.0));
    t.track_cta_click("hero-cta", "Get started", "hero", Some("BUTTON"), Properties::new());
    t.track_form_interaction("contact", FormAction::Fill, Some("email"), None);
    t.track_form_submit("contact", false, Some(vec!["email".into()]), 3);
    t.track_service_view("solar", "Solar", None);
    t.track_scroll_depth(50, None);
    t.track_interaction("card", InteractionKind::Hover, Properties::new().with("index", 2u32));
    t.track_media_event("reel", MediaKind::Video, MediaAction::Complete, Some(12.0));
    t.track_engagement_time("about", 4_600.0);
    t.track_conversion("lead", Some(120.0), Some("EUR"), Properties::new());
    t.track_error("network", "timeout", None, Properties::new().with("url", "/api"));
    t.track_performance("lcp", 1800.0, Some("ms"));

    let names: Vec<&str> = t.events().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "cta_click",
            "form_interaction",
            "form_submit",
            "service_view",
            "scroll_depth",
            "element_interaction",
            "media_event",
            "engagement_time",
            "conversion",
            "error",
            "performance_metric",
        ]
    );

    let ev = t.events();
    assert_eq!(ev[1].properties.get("action"), Some(&PropValue::Text("fill".into())));
    assert!(ev[1].properties.get("error_message").is_none());
    assert_eq!(ev[2].properties.get("fields_completed"), Some(&PropValue::Number(3.0)));
    assert_eq!(ev[5].properties.get("interaction_type"), Some(&PropValue::Text("hover".into())));
    assert_eq!(ev[7].properties.get("time_spent_seconds"), Some(&PropValue::Number(5.0)));
    assert_eq!(ev[9].properties.get("context_url"), Some(&PropValue::Text("/api".into())));
}

#[test]
fn session_info_and_clear() {
    let clock = FakeClock::at(1_000.0);
    let (mut t, _rec) = tracker(clock.clone());
    t.track_scroll_depth(25, Some("hero"));
    clock.advance(400.0);
    let info = t.session_info();
    assert_eq!(info.start_time_ms, 1_000.0);
    assert_eq!(info.duration_ms, 400.0);
    assert_eq!(info.event_count, 1);
    t.clear_events();
    assert!(t.events().is_empty());
}

#[test]
fn scroll_depth_reports_each_quarter_once() {
    let mut d = ScrollDepthTracker::new();
    let page = |y: f32| ScrollInput::new(y, 5000.0, 1000.0);

    assert!(d.update(&page(0.0)).is_empty());
    assert!(d.update(&page(500.0)).is_empty());
    assert_eq!(d.update(&page(1000.0)).as_slice(), &[25]);
    assert!(d.update(&page(1100.0)).is_empty());
    // Jumping straight to the bottom reports the skipped quarters too.
    assert_eq!(d.update(&page(4000.0)).as_slice(), &[50, 75, 100]);
    // Scrolling back up never re-reports.
    assert!(d.update(&page(0.0)).is_empty());
    assert!(d.update(&page(4000.0)).is_empty());
    assert_eq!(d.max_reported(), 100);
}

#[test]
fn scroll_depth_on_unscrollable_page() {
    let mut d = ScrollDepthTracker::new();
    assert!(d.update(&ScrollInput::new(0.0, 800.0, 800.0)).is_empty());
}

#[test]
fn tracker_bootstraps_follow_configured_keys() {
    let none = AnalyticsConfig::default();
    assert_eq!(none.ga4_id(), None);
    assert_eq!(none.posthog_init(), None);

    let blank = AnalyticsConfig {
        ga4_measurement_id: Some("  ".into()),
        posthog_key: Some(String::new()),
        environment: Environment::Production,
    };
    assert_eq!(blank.ga4_id(), None);
    assert_eq!(blank.posthog_init(), None);

    let both = AnalyticsConfig {
        ga4_measurement_id: Some("G-TEST123".into()),
        posthog_key: Some(" phc_abc ".into()),
        environment: Environment::Development,
    };
    assert_eq!(both.ga4_id(), Some("G-TEST123"));
    let init = both.posthog_init().expect("posthog configured");
    assert_eq!(init.key, "phc_abc");
    assert!(!init.capture_pageview);
    assert!(!init.capture_pageleave);
}
