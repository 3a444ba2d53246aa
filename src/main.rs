use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

use sun_scene::app::{self, AppState};
use sun_scene::scene_core::config::SceneConfig;

fn main() -> Result<()> {
    env_logger::init();

    let config = SceneConfig::load();

    let event_loop = EventLoop::new()?;
    let window = Box::leak(Box::new(
        WindowBuilder::new()
            .with_title("sun-scene")
            .with_inner_size(PhysicalSize::new(config.window.width, config.window.height))
            .build(&event_loop)
            .context("failed to create window")?,
    ));

    let app = pollster::block_on(AppState::new(window, &config, false))?;

    app::run_event_loop(app, event_loop)
}
