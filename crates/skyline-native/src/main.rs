mod document;
mod platform;

use std::sync::Arc;
use std::time::Instant;

use skyline_core::{
    normalize_pointer, InputKind, Lifecycle, MountOutcome, SceneConfig, SeededRandom, Viewport,
};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use platform::NativePlatform;

fn mount(lifecycle: &mut Lifecycle<NativePlatform>, window: &Arc<Window>) {
    let size = window.inner_size();
    let renderer = pollster::block_on(skyline_render::create_renderer(
        window.clone(),
        size.width,
        size.height,
    ));
    match lifecycle.mount(renderer, &mut SeededRandom::from_entropy()) {
        MountOutcome::Running => log::info!("[native] background running"),
        MountOutcome::Degraded(e) => log::warn!("[native] background disabled: {e}"),
    }
}

/// Returns false when the preview should quit.
fn handle_key(
    lifecycle: &mut Lifecycle<NativePlatform>,
    window: &Arc<Window>,
    key: &Key,
) -> bool {
    let platform = lifecycle.platform_mut();
    match key {
        Key::Named(NamedKey::ArrowDown) => platform.scroll(|d| d.step(1.0)),
        Key::Named(NamedKey::ArrowUp) => platform.scroll(|d| d.step(-1.0)),
        Key::Named(NamedKey::PageDown | NamedKey::Space) => platform.scroll(|d| d.page(1.0)),
        Key::Named(NamedKey::PageUp) => platform.scroll(|d| d.page(-1.0)),
        Key::Named(NamedKey::Home) => platform.scroll(|d| d.scroll_to(0.0)),
        Key::Named(NamedKey::End) => platform.scroll(|d| d.scroll_to(f32::MAX)),
        Key::Named(NamedKey::Escape) => return false,
        Key::Character(c) if c.eq_ignore_ascii_case("r") => {
            log::info!("[native] remounting");
            lifecycle.unmount();
            mount(lifecycle, window);
        }
        _ => {}
    }
    true
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let event_loop = EventLoop::new().expect("event loop");
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("skyline (native preview)")
            .with_inner_size(LogicalSize::new(1280.0, 720.0))
            .build(&event_loop)
            .expect("window"),
    );

    let css_width = window.inner_size().to_logical::<f64>(window.scale_factor()).width;
    let mut lifecycle = Lifecycle::new(
        NativePlatform::new(window.clone()),
        SceneConfig::for_viewport_width(css_width as u32),
    );
    mount(&mut lifecycle, &window);
    log::info!("[native] wheel/arrows scroll, R remounts, Esc quits");

    let start = Instant::now();
    let result = event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => lifecycle
                .platform_mut()
                .window_resized(Viewport::new(size.width, size.height)),
            WindowEvent::MouseWheel { delta, .. } => {
                let platform = lifecycle.platform_mut();
                match delta {
                    MouseScrollDelta::LineDelta(_, lines) => {
                        platform.scroll(|d| d.scroll_lines(lines))
                    }
                    MouseScrollDelta::PixelDelta(pos) => {
                        platform.scroll(|d| d.scroll_by(-pos.y as f32))
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let size = window.inner_size();
                let pointer = normalize_pointer(
                    position.x as f32,
                    position.y as f32,
                    size.width as f32,
                    size.height as f32,
                );
                lifecycle
                    .platform()
                    .emit(InputKind::Pointer, |sim| sim.on_pointer(pointer));
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if !handle_key(&mut lifecycle, &window, &logical_key) {
                    elwt.exit();
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            if let Err(e) = lifecycle
                .platform()
                .pump(start.elapsed().as_secs_f64())
            {
                log::warn!("[native] frame failed: {e}");
            }
            window.request_redraw();
        }
        Event::LoopExiting => lifecycle.unmount(),
        _ => {}
    });
    if let Err(e) = result {
        log::error!("[native] event loop error: {e}");
    }
}
