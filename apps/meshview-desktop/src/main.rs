use anyhow::Result;
use clap::Parser;
use meshview_input::MoveKeys;
use meshview_render::FramePlan;
use meshview_render_wgpu::{RenderError, ShaderSources, WgpuRenderer};
use meshview_viewer::{
    FrameHost, FrameScheduler, HeadlessHost, SceneContext, TickOutcome, ViewerConfig, ViewerError,
};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(
    name = "meshview-desktop",
    version,
    about = "Fly-through viewer for converted meshes"
)]
struct Cli {
    /// Geometry file to view
    model: Option<PathBuf>,

    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory containing vertex.wgsl and fragment.wgsl
    #[arg(long)]
    shader_dir: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Render this many frames as text without opening a window
    #[arg(long)]
    headless_frames: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn viewer_config(&self) -> Result<ViewerConfig, ViewerError> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::load(path)?,
            None => ViewerConfig::default(),
        };
        if let Some(model) = &self.model {
            config.model_path = model.clone();
        }
        if let Some(dir) = &self.shader_dir {
            config.shader_dir = Some(dir.clone());
        }
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        Ok(config)
    }
}

fn movement_keys(held: &HashSet<KeyCode>) -> MoveKeys {
    MoveKeys {
        forward: held.contains(&KeyCode::KeyW),
        backward: held.contains(&KeyCode::KeyS),
        left: held.contains(&KeyCode::KeyA),
        right: held.contains(&KeyCode::KeyD),
    }
}

/// Window, surface, and device created once the event loop resumes.
struct GpuState {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
}

impl GpuState {
    fn new(
        event_loop: &ActiveEventLoop,
        viewer: &ViewerConfig,
        shaders: ShaderSources,
        ctx: &SceneContext,
    ) -> Result<Self, ViewerError> {
        let attrs = Window::default_attributes()
            .with_title(viewer.window.title.clone())
            .with_inner_size(PhysicalSize::new(viewer.window.width, viewer.window.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| ViewerError::Initialization(format!("create window: {e}")))?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| ViewerError::Initialization(format!("create surface: {e}")))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| ViewerError::Initialization("no compatible GPU adapter".into()))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("meshview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| ViewerError::Initialization(format!("create device: {e}")))?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| ViewerError::Initialization("surface has no formats".into()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let mut renderer = WgpuRenderer::new(
            &device,
            surface_format,
            config.width,
            config.height,
            shaders,
        );
        renderer
            .upload_objects(&device, &ctx.objects)
            .map_err(|e| ViewerError::Initialization(e.to_string()))?;

        if window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
            .is_err()
        {
            tracing::warn!("cursor grab unavailable, pointer may leave the window");
        }
        window.set_cursor_visible(false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
        self.renderer.resize(&self.device, width, height);
    }

    fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }
}

/// One tick's view of the window for the scheduler.
struct WindowHost<'a> {
    gpu: &'a mut GpuState,
    started: Instant,
    close_requested: bool,
    keys: MoveKeys,
    frame: Option<wgpu::SurfaceTexture>,
}

impl FrameHost for WindowHost<'_> {
    type Error = RenderError;

    fn close_requested(&self) -> bool {
        self.close_requested
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn movement_keys(&self) -> MoveKeys {
        self.keys
    }

    fn initialise_render_state(&mut self) -> Result<(), RenderError> {
        self.gpu.renderer.initialise(&self.gpu.device)
    }

    fn render(&mut self, frame: &FramePlan) -> Result<(), RenderError> {
        let output = match self.gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("surface timeout, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.gpu
            .renderer
            .render(&self.gpu.device, &self.gpu.queue, &view, frame)?;
        self.frame = Some(output);
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        if let Some(output) = self.frame.take() {
            output.present();
        }
        Ok(())
    }

    // winit dispatches window events to the handler between redraws.
    fn poll_events(&mut self) {}
}

struct GpuApp {
    viewer: ViewerConfig,
    shaders: Option<ShaderSources>,
    ctx: SceneContext,
    scheduler: FrameScheduler,
    gpu: Option<GpuState>,
    started: Instant,
    close_requested: bool,
    keys_held: HashSet<KeyCode>,
    // Accumulated mouse motion, fed to the camera as an absolute position.
    cursor: (f64, f64),
    error: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(viewer: ViewerConfig, shaders: ShaderSources, ctx: SceneContext) -> Self {
        Self {
            viewer,
            shaders: Some(shaders),
            ctx,
            scheduler: FrameScheduler::new(),
            gpu: None,
            started: Instant::now(),
            close_requested: false,
            keys_held: HashSet::new(),
            cursor: (0.0, 0.0),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        let Some(shaders) = self.shaders.take() else {
            return;
        };

        match GpuState::new(event_loop, &self.viewer, shaders, &self.ctx) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.ctx.resize(size.width, size.height);
                self.gpu = Some(gpu);
            }
            Err(e) => self.fail(event_loop, e.into()),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.close_requested = true;
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    self.ctx.resize(gpu.config.width, gpu.config.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                if key == KeyCode::Escape {
                    self.close_requested = true;
                } else if key_state == ElementState::Pressed {
                    self.keys_held.insert(key);
                } else {
                    self.keys_held.remove(&key);
                }
            }
            WindowEvent::Focused(false) => {
                self.keys_held.clear();
                self.ctx.controller.release_pointer();
            }
            WindowEvent::RedrawRequested => {
                let Some(gpu) = self.gpu.as_mut() else {
                    return;
                };
                let outcome = {
                    let mut host = WindowHost {
                        gpu,
                        started: self.started,
                        close_requested: self.close_requested,
                        keys: movement_keys(&self.keys_held),
                        frame: None,
                    };
                    self.scheduler.tick(&mut self.ctx, &mut host)
                };
                match outcome {
                    Ok(TickOutcome::Continue) => {}
                    Ok(TickOutcome::Quit) => event_loop.exit(),
                    Err(e) => self.fail(event_loop, e.into()),
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.cursor.0 += delta.0;
            self.cursor.1 += delta.1;
            self.ctx.on_pointer_moved(self.cursor.0, self.cursor.1);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn run_headless(ctx: &mut SceneContext, frames: u64) {
    let mut host = HeadlessHost::new(frames);
    let rendered = FrameScheduler::new()
        .run(ctx, &mut host)
        .unwrap_or_else(|never| match never {});
    println!("{}", host.last_frame().trim_end());
    tracing::info!("headless run finished after {rendered} frames");
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("meshview-desktop starting");

    let viewer = cli.viewer_config().inspect_err(|e| tracing::error!("{e}"))?;
    let mut ctx = SceneContext::load(&viewer).inspect_err(|e| tracing::error!("{e}"))?;

    if let Some(frames) = cli.headless_frames {
        run_headless(&mut ctx, frames);
        return Ok(());
    }

    let shaders = match &viewer.shader_dir {
        Some(dir) => ShaderSources::load(dir).inspect_err(|e| tracing::error!("{e}"))?,
        None => ShaderSources::builtin(),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(viewer, shaders, ctx);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_maps_to_move_keys() {
        let held: HashSet<_> = [KeyCode::KeyW, KeyCode::KeyD].into_iter().collect();
        let keys = movement_keys(&held);
        assert!(keys.forward && keys.right);
        assert!(!keys.backward && !keys.left);
        assert_eq!(movement_keys(&HashSet::new()), MoveKeys::NONE);
    }

    #[test]
    fn cli_overrides_config() {
        let cli = Cli::parse_from([
            "meshview-desktop",
            "teapot",
            "--width",
            "800",
            "--shader-dir",
            "shaders",
        ]);
        let config = cli.viewer_config().unwrap();
        assert_eq!(config.model_path, PathBuf::from("teapot"));
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.shader_dir, Some(PathBuf::from("shaders")));
    }

    #[test]
    fn default_model_path() {
        let cli = Cli::parse_from(["meshview-desktop"]);
        let config = cli.viewer_config().unwrap();
        assert_eq!(config.model_path, PathBuf::from("output_model"));
        assert!(cli.headless_frames.is_none());
    }
}
