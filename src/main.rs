//! capsule-runtime: a small 2D platformer runtime
//!
//! Walk the capsule around with the arrow keys (or WASD), jump with Space,
//! stop dead with Down. F1 toggles the debug overlay, F2 cycles the fps
//! limit, R reloads the level and B drops a box.

use capsule_runtime::config::{ConfigError, RuntimeConfig};
use capsule_runtime::game::{
    renderer::draw_debug_overlay, render_world, Clock, FrameTimings, MacroquadClock, MacroquadSurface, Runtime,
};
use capsule_runtime::input::InputState;
use capsule_runtime::scene::{ObjectDesc, SceneDesc};
use capsule_runtime::VERSION;
use macroquad::prelude::*;
use tracing_subscriber::EnvFilter;

fn window_conf(config: &RuntimeConfig) -> Conf {
    Conf {
        window_title: format!("{} v{}", config.window.title, VERSION),
        window_width: config.window.width,
        window_height: config.window.height,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// `RUST_LOG` wins over the configured filter.
fn init_logging(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let path = RuntimeConfig::default_path();
    let loaded: Option<Result<RuntimeConfig, ConfigError>> =
        path.as_deref().filter(|p| p.exists()).map(RuntimeConfig::load);
    let config = match &loaded {
        Some(Ok(config)) => config.clone(),
        _ => RuntimeConfig::with_defaults(),
    };

    // Logging needs the config's filter, so config problems are reported
    // right after it comes up
    init_logging(&config.log_filter);
    match loaded {
        Some(Ok(_)) => tracing::info!(?path, "loaded config"),
        Some(Err(e)) => tracing::warn!(?path, error = %e, "config rejected, using defaults"),
        None => tracing::debug!("no config file, using defaults"),
    }

    macroquad::Window::from_config(window_conf(&config), run(config));
}

async fn run(config: RuntimeConfig) {
    tracing::info!(version = VERSION, "starting");
    let input = InputState::new(config.input.clone());
    let clock = MacroquadClock;
    let scene = SceneDesc::demo(screen_width(), screen_height());
    let mut runtime = Runtime::new(config);
    if let Err(e) = runtime.load_scene(&scene) {
        tracing::error!(error = %e, "demo scene failed to load");
        return;
    }
    let mut rng = ::rand::thread_rng();

    loop {
        let frame_start = get_time();

        let t = FrameTimings::start();
        let snapshot = input.sample();
        let requests = runtime.handle_system_actions(&snapshot);
        if requests.reset_scene {
            if let Err(e) = runtime.load_scene(&scene) {
                tracing::error!(error = %e, "scene reload failed");
            }
        }
        if requests.spawn_box {
            let desc = ObjectDesc::random_box(&mut rng, screen_width());
            match desc.build(&runtime.config().player) {
                Ok(object) => {
                    runtime.world.spawn(object);
                }
                Err(e) => tracing::warn!(error = %e, "box rejected"),
            }
        }
        let input_ms = FrameTimings::elapsed_ms(t);

        let t = FrameTimings::start();
        runtime.tick(&snapshot, clock.now());
        let tick_ms = FrameTimings::elapsed_ms(t);

        let t = FrameTimings::start();
        clear_background(Color::from_rgba(24, 26, 32, 255));
        render_world(&runtime.world, &mut MacroquadSurface);
        if runtime.show_debug_overlay {
            draw_debug_overlay(&runtime.world, &runtime.frame_timings, runtime.fps_limit.label());
        }
        let render_ms = FrameTimings::elapsed_ms(t);

        runtime.frame_timings = FrameTimings {
            input_ms,
            logic_ms: tick_ms,
            render_ms,
            total_ms: FrameTimings::elapsed_ms(frame_start),
        };

        // FPS limiting
        if let Some(target_frame_time) = runtime.fps_limit.frame_time() {
            let elapsed = get_time() - frame_start;
            let remaining = target_frame_time - elapsed;

            if remaining > 0.0 {
                // Native: use sleep for bulk, then spin-wait for precision
                #[cfg(not(target_arch = "wasm32"))]
                {
                    let spin_margin = 0.002; // 2ms
                    while get_time() - frame_start + spin_margin < target_frame_time {
                        std::thread::sleep(std::time::Duration::from_millis(1));
                    }
                    while get_time() - frame_start < target_frame_time {
                        std::hint::spin_loop();
                    }
                }
                // WASM: just spin-wait (no thread::sleep available)
                #[cfg(target_arch = "wasm32")]
                {
                    while get_time() - frame_start < target_frame_time {}
                }
            }
        }

        next_frame().await;
    }
}
