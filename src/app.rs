use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{ConfigError, SimConfig, STEP_INTERVAL_MS};
use crate::gpu::{GpuContext, GridRenderer};
use crate::simulation::{self, EntanglementTable, Grid, SuperpositionField};

/// Application state: the simulation buffers plus the window/GPU shell.
///
/// The shell only ever observes finished generations; `advance` swaps in a
/// fully materialized grid and superposition field before any upload.
pub struct App {
    config: SimConfig,
    rng: StdRng,
    grid: Grid,
    superposition: SuperpositionField,
    entanglement: EntanglementTable,
    generation: u64,
    paused: bool,
    last_step: Instant,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    renderer: Option<GridRenderer>,
    fps_counter: FpsCounter,
}

impl App {
    /// Validate the config and sample the initial state. Fails fast on a
    /// caller contract violation; nothing else in the shell is fallible.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let mut rng = StdRng::from_entropy();
        let (grid, superposition, entanglement) = simulation::initialize(&config, &mut rng)?;
        Ok(Self {
            config,
            rng,
            grid,
            superposition,
            entanglement,
            generation: 0,
            paused: false,
            last_step: Instant::now(),
            window: None,
            gpu: None,
            renderer: None,
            fps_counter: FpsCounter::new(),
        })
    }

    /// Step the simulation if the pacing interval elapsed.
    fn advance(&mut self) {
        if self.paused || self.last_step.elapsed() < Duration::from_millis(STEP_INTERVAL_MS) {
            return;
        }
        let (grid, superposition) = simulation::step(
            &self.grid,
            &self.superposition,
            &self.entanglement,
            &mut self.rng,
        );
        self.grid = grid;
        self.superposition = superposition;
        self.generation += 1;
        self.last_step = Instant::now();
    }

    fn render(&mut self) {
        let gpu = self.gpu.as_ref().unwrap();
        let renderer = self.renderer.as_mut().unwrap();

        renderer.upload(&gpu.queue, &self.grid, &self.superposition, &self.entanglement);

        let output = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        renderer.draw(&mut encoder, &view);

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some(fps) = self.fps_counter.tick() {
            if let Some(window) = &self.window {
                let paused = if self.paused { " [paused]" } else { "" };
                window.set_title(&format!(
                    "Quantum Conway's Game of Life - gen {} - pop {} - {:.0} FPS{}",
                    self.generation,
                    self.grid.population(),
                    fps,
                    paused,
                ));
            }
        }
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        match key_code {
            KeyCode::Space => {
                self.paused = !self.paused;
                log::info!("Simulation {}", if self.paused { "paused" } else { "resumed" });
            }

            // Restart with a fresh random grid and entanglement table
            KeyCode::KeyR => {
                let (grid, superposition, entanglement) =
                    simulation::initialize(&self.config, &mut self.rng)
                        .expect("configuration was validated at startup");
                self.grid = grid;
                self.superposition = superposition;
                self.entanglement = entanglement;
                self.generation = 0;
                log::info!("Restarted with a new random state");
            }

            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!("Initializing Quantum Conway's Game of Life...");
        log::info!(
            "Grid: {0}x{0}, {1} entangled cells, {2} initially alive",
            self.config.size,
            self.entanglement.len(),
            self.grid.population(),
        );

        let window_size = self.config.window_size();
        let window_attrs = Window::default_attributes()
            .with_title("Quantum Conway's Game of Life")
            .with_inner_size(winit::dpi::LogicalSize::new(window_size, window_size));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        let gpu = pollster::block_on(GpuContext::new(window.clone()));
        let renderer = GridRenderer::new(
            &gpu.device,
            &gpu.queue,
            gpu.format(),
            self.config.size as u32,
            self.config.cell_size as u32,
        );

        log::info!("Controls:");
        log::info!("  Space: Pause/resume");
        log::info!("  R: Restart with a new random state");
        log::info!("  Escape: Quit");

        window.request_redraw();
        self.window = Some(window);
        self.gpu = Some(gpu);
        self.renderer = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        if key_code == KeyCode::Escape {
                            log::info!("Escape pressed, exiting...");
                            event_loop.exit();
                        } else {
                            self.handle_key(key_code);
                        }
                    }
                }
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.advance();
                self.render();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Simple FPS counter
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}
