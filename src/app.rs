//! Application entry: window + wgpu setup, event routing, and the frame
//! loop.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context as _;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::params::RenderParams;
use crate::scene::FieldScene;
use crate::ui::{controls, PerformanceMetrics, UiSystem};

pub struct App {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    scene: FieldScene,
    ui: UiSystem,
    params: RenderParams,
    performance: PerformanceMetrics,
    last_render_time: Instant,
}

impl App {
    /// Build the window, GPU context, scene, and UI. Any failure here is
    /// fatal and reported with context.
    fn init(event_loop: &ActiveEventLoop) -> anyhow::Result<Self> {
        let window_attributes = Window::default_attributes()
            .with_title("cubefield")
            .with_inner_size(winit::dpi::PhysicalSize::new(1600, 900));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("cubefield device"),
            ..Default::default()
        }))
        .context("failed to create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoNoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let params = RenderParams::load();
        let scene = FieldScene::new(&device, &config, &params)?;
        let ui = UiSystem::new(&device, config.format, &window);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            scene,
            ui,
            params,
            performance: PerformanceMetrics::new(),
            last_render_time: Instant::now(),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Route one window event. Returns `false` when the app should exit.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        // egui gets first look; events it consumes stay away from the camera
        let response = self.ui.handle_event(&self.window, event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                if let Err(e) = self.params.save() {
                    log::warn!("Failed to save parameters: {}", e);
                }
                return false;
            }
            WindowEvent::Resized(physical_size) => {
                self.config.width = physical_size.width.max(1);
                self.config.height = physical_size.height.max(1);
                self.surface.configure(&self.device, &self.config);
                self.scene
                    .resize(&self.device, self.config.width, self.config.height);
            }
            WindowEvent::MouseInput { button, state, .. } if !response.consumed => {
                self.scene.camera.handle_mouse_button(*button, *state);
            }
            WindowEvent::CursorMoved { position, .. } if !response.consumed => {
                self.scene.camera.handle_mouse_move(*position);
            }
            WindowEvent::MouseWheel { delta, .. } if !response.consumed => {
                self.scene.camera.handle_scroll(*delta);
            }
            WindowEvent::RedrawRequested => {
                self.render();
            }
            _ => {}
        }
        true
    }

    fn render(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_render_time).as_secs_f32();
        self.last_render_time = now;

        self.performance.update(dt);
        self.scene.update(&self.device, dt, &self.params);

        // Build this frame's UI
        self.ui.begin_frame(&self.window);
        let panel = controls::show(&self.ui.ctx, &mut self.params);
        self.performance.show_overlay(&self.ui.ctx);
        let output = self.ui.end_frame(&self.window);

        if panel.load_scene {
            self.scene.load_scene(&self.device, &self.params);
        }

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface out of memory");
                return;
            }
            Err(e) => {
                log::warn!("Dropped frame: {}", e);
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.scene
            .render(&self.device, &self.queue, &view, &self.params);

        // Paint the UI on top
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("UI Render Encoder"),
            });
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };
        self.ui.render(
            &self.device,
            &self.queue,
            &mut encoder,
            &view,
            screen_descriptor,
            output,
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        frame.present();
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

struct AppState {
    app: Option<App>,
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() {
            return;
        }

        match App::init(event_loop) {
            Ok(app) => self.app = Some(app),
            Err(e) => {
                log::error!("Startup failed: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(app) = &mut self.app else { return };

        if window_id != app.window().id() {
            return;
        }

        if !app.handle_event(&event) {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(app) = &self.app {
            app.request_redraw();
        }
    }
}

/// Run the demo until the window closes.
pub fn run() -> anyhow::Result<()> {
    env_logger::init();

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let mut state = AppState { app: None };
    event_loop.run_app(&mut state)?;
    Ok(())
}
