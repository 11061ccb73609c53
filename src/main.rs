mod app;
mod config;
mod gpu;
mod simulation;

use winit::event_loop::{ControlFlow, EventLoop};

use crate::app::App;
use crate::config::SimConfig;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimConfig::default();
    let mut app = match App::new(config) {
        Ok(app) => app,
        Err(err) => {
            log::error!("Invalid configuration: {err}");
            std::process::exit(1);
        }
    };

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop
        .run_app(&mut app)
        .expect("Event loop terminated with an error");
}
