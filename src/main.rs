use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use glam::{Vec2, Vec3};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::{Directive, LevelFilter};

use conch3d::ViewerError;
use conch3d::config::{self, AppConfig};
use conch3d::math::engine::build_mesh;
use conch3d::math::presets::{SURFACE_PRESETS, find_preset};
use conch3d::math::{MeshEngine, MeshResult, SurfaceMesh};

mod cli;
mod renderer;
mod ui;

use renderer::{Camera, GpuState};
use ui::{MeshStats, UiActions, UiState, apply_theme, draw_help_overlay, draw_side_panel};

struct App {
    config: AppConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    egui_state: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    egui_ctx: egui::Context,

    camera: Camera,
    mesh_engine: MeshEngine,
    ui_state: UiState,
    stats: MeshStats,
    last_error: Option<String>,

    dragging: bool,
    last_cursor: Option<Vec2>,
    mesh_bounds: Option<(Vec3, Vec3)>,
    reframe_pending: bool,

    frame_count: u32,
    fps_timer: Instant,
    last_vsync_state: bool,

    fatal: Option<ViewerError>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let ui_state = UiState::from_config(&config);
        let last_vsync_state = ui_state.vsync_enabled;

        Self {
            config,
            window: None,
            gpu: None,
            egui_state: None,
            egui_renderer: None,
            egui_ctx: egui::Context::default(),

            camera: Camera::default(),
            mesh_engine: MeshEngine::new(),
            ui_state,
            stats: MeshStats::default(),
            last_error: None,

            dragging: false,
            last_cursor: None,
            mesh_bounds: None,
            reframe_pending: true,

            frame_count: 0,
            fps_timer: Instant::now(),
            last_vsync_state,

            fatal: None,
        }
    }

    fn init_gpu(&mut self, window: Arc<Window>) -> Result<(), ViewerError> {
        let gpu = pollster::block_on(GpuState::new(window.clone(), &self.config.viewer))?;

        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            self.egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2048),
        );

        let egui_renderer =
            egui_wgpu::Renderer::new(&gpu.device, gpu.config.format, None, 1, false);

        apply_theme(&self.egui_ctx);

        self.camera
            .set_aspect(gpu.size.width as f32, gpu.size.height as f32);

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.egui_state = Some(egui_state);
        self.egui_renderer = Some(egui_renderer);

        self.request_mesh();
        Ok(())
    }

    fn request_mesh(&mut self) {
        self.mesh_engine.request(self.ui_state.mesh_request());
        self.ui_state.mesh_needs_rebuild = false;
    }

    fn update(&mut self) {
        self.frame_count += 1;
        if self.fps_timer.elapsed().as_secs_f32() >= 1.0 {
            self.stats.fps = self.frame_count as f32 / self.fps_timer.elapsed().as_secs_f32();
            self.frame_count = 0;
            self.fps_timer = Instant::now();
        }

        while let Some(result) = self.mesh_engine.try_recv_result() {
            match result {
                MeshResult::Mesh(mesh) => self.install_mesh(mesh),
                MeshResult::Error(e) => {
                    warn!("mesh rebuild failed: {e}");
                    self.last_error = Some(e);
                }
            }
        }
    }

    fn install_mesh(&mut self, surface: SurfaceMesh) {
        let Some(gpu) = &mut self.gpu else { return };
        gpu.upload_mesh(&surface.mesh);

        self.stats.vertices = surface.mesh.vertex_count();
        self.stats.triangles = surface.mesh.triangle_count();
        self.stats.index_format = match &surface.mesh.indices {
            None => None,
            Some(_) if surface.mesh.indices_u16().is_some() => Some("u16"),
            Some(_) => Some("u32"),
        };
        self.stats.tessellation_ms = surface.elapsed.as_secs_f64() * 1000.0;

        self.mesh_bounds = surface.bounds;
        self.last_error = None;

        if self.reframe_pending {
            self.frame_mesh();
        }
    }

    /// Fit the camera around the current mesh as seen through the model tilt.
    fn frame_mesh(&mut self) {
        let (Some(gpu), Some((min, max))) = (&self.gpu, self.mesh_bounds) else {
            return;
        };
        let center = gpu.model.transform_point3((min + max) * 0.5);
        let half = (max - min) * 0.5;
        self.camera.frame_bounds(center - half, center + half);
        self.reframe_pending = false;
        debug!(distance = self.camera.distance, "camera framed");
    }

    fn render(&mut self) {
        let (Some(window), Some(egui_state)) = (&self.window, &mut self.egui_state) else {
            return;
        };

        let raw_input = egui_state.take_egui_input(window);

        let stats = self.stats;
        let last_error = self
            .last_error
            .clone()
            .or_else(|| self.mesh_engine.last_error());

        let mut ui_actions = UiActions::default();

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if self.ui_state.show_panel {
                ui_actions = draw_side_panel(ctx, &mut self.ui_state, &stats, &last_error);
            }
            draw_help_overlay(ctx);
        });

        self.handle_ui_actions(ui_actions);

        let Some(gpu) = &mut self.gpu else { return };
        let Some(window) = &self.window else { return };
        let Some(egui_state) = &mut self.egui_state else {
            return;
        };
        let Some(egui_renderer) = &mut self.egui_renderer else {
            return;
        };

        egui_state.handle_platform_output(window, full_output.platform_output);

        if self.ui_state.vsync_enabled != self.last_vsync_state {
            gpu.set_vsync(self.ui_state.vsync_enabled);
            self.last_vsync_state = self.ui_state.vsync_enabled;
        }

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.resize(gpu.size);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("out of GPU memory, skipping frame");
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.update_camera(&self.camera);
        gpu.update_light(&self.ui_state.lighting);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, delta) in full_output.textures_delta.set {
            egui_renderer.update_texture(&gpu.device, &gpu.queue, id, &delta);
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Main Encoder"),
            });

        egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        gpu.render_surface(&view, &mut encoder, self.ui_state.background);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        for id in full_output.textures_delta.free {
            egui_renderer.free_texture(&id);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        window.request_redraw();
    }

    fn handle_ui_actions(&mut self, actions: UiActions) {
        if actions.reset_view {
            self.reframe_pending = true;
            self.frame_mesh();
        }

        if actions.rebuild_mesh {
            self.request_mesh();
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Tab => self.ui_state.show_panel = !self.ui_state.show_panel,
            KeyCode::KeyR => {
                self.reframe_pending = true;
                self.frame_mesh();
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

        let window_attrs = Window::default_attributes()
            .with_title("Conch 3D")
            .with_inner_size(PhysicalSize::new(
                self.config.viewer.width,
                self.config.viewer.height,
            ));

        let result = event_loop
            .create_window(window_attrs)
            .map_err(ViewerError::from)
            .and_then(|window| self.init_gpu(Arc::new(window)));

        if let Err(e) = result {
            error!("{e}");
            self.fatal = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(egui_state) = &mut self.egui_state {
            if let Some(window) = &self.window {
                let response = egui_state.on_window_event(window, &event);
                if response.consumed {
                    return;
                }
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.mesh_engine.stop();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size);
                    self.camera
                        .set_aspect(size.width as f32, size.height as f32);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    if let PhysicalKey::Code(key) = event.physical_key {
                        self.handle_key(key);
                    }
                }
            }

            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.dragging = state == ElementState::Pressed;
            }

            WindowEvent::CursorMoved { position, .. } => {
                let cursor = Vec2::new(position.x as f32, position.y as f32);
                if let (true, Some(last)) = (self.dragging, self.last_cursor) {
                    self.camera.process_drag(cursor - last);
                }
                self.last_cursor = Some(cursor);
            }

            WindowEvent::CursorLeft { .. } => {
                self.last_cursor = None;
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
                };
                self.camera.process_scroll(scroll);
            }

            WindowEvent::RedrawRequested => {
                self.update();
                self.render();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn init_logging(level: Option<&str>) {
    let directive: Directive = level
        .unwrap_or("conch3d=info")
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();
}

/// Config file, then command-line overrides on top.
fn resolve_config(args: &cli::Args) -> Option<AppConfig> {
    let mut config = match config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            warn!("failed to load config: {e}, using defaults");
            AppConfig::default()
        }
    };

    if let Some(name) = &args.preset {
        match find_preset(name) {
            Some(index) => config.apply_preset(&SURFACE_PRESETS[index]),
            None => {
                let names: Vec<&str> = SURFACE_PRESETS.iter().map(|p| p.name).collect();
                error!("unknown preset {name:?}, expected one of: {}", names.join(", "));
                return None;
            }
        }
    }
    if let Some(step) = args.step {
        config.tessellation.step = step;
    }
    if let Some(mode) = args.mode {
        config.tessellation.mode = mode.into();
    }

    if let Err(e) = config::validate(&config) {
        error!("{e}");
        return None;
    }
    Some(config)
}

fn run_headless(config: &AppConfig) -> ExitCode {
    let request = UiState::from_config(config).mesh_request();
    match build_mesh(request) {
        Ok(surface) => {
            let mesh = &surface.mesh;
            info!(
                vertices = mesh.vertex_count(),
                triangles = mesh.triangle_count(),
                indexed = mesh.is_indexed(),
                u16_indices = mesh.indices_u16().is_some(),
                bounds = ?surface.bounds,
                "tessellation finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("tessellation failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_viewer(config: AppConfig) -> Result<(), ViewerError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    let args = cli::parse();
    init_logging(args.log_level.as_deref());

    info!("conch3d v{}", env!("CARGO_PKG_VERSION"));

    let Some(config) = resolve_config(&args) else {
        return ExitCode::from(2);
    };

    if args.headless {
        return run_headless(&config);
    }

    match run_viewer(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("viewer failed: {e}");
            ExitCode::FAILURE
        }
    }
}
