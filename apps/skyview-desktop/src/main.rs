use anyhow::{Context, Result};
use clap::Parser;
use skyview_assets::TextureSet;
use skyview_camera::Camera;
use skyview_common::{FrameLimiter, ViewerConfig};
use skyview_input::{Flow, InputCollector, InputEvent, Key};
use skyview_render::Scene;
use skyview_render_wgpu::WgpuRenderer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "skyview-desktop", about = "First-person skybox viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Asset directory holding skybox/ and grass.jpg
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Frame cap, 0 for uncapped
    #[arg(long)]
    max_fps: Option<u32>,

    /// Draw the skybox only
    #[arg(long)]
    no_ground: bool,
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::Space => Key::Space,
        KeyCode::ShiftLeft => Key::LeftShift,
        KeyCode::Escape => Key::Escape,
        _ => Key::Other,
    }
}

/// Application state.
struct AppState {
    camera: Camera,
    input: InputCollector,
    scene: Scene,
    limiter: FrameLimiter,
    focused: bool,
}

impl AppState {
    fn new(config: &ViewerConfig, textures: &TextureSet) -> Self {
        let scene = Scene::new(textures.skybox_mask(), textures.has_ground());
        let scene = if config.show_ground {
            scene
        } else {
            scene.without_ground()
        };
        Self {
            camera: Camera::with_settings(config.start_position, config.camera),
            input: InputCollector::new(),
            scene,
            limiter: FrameLimiter::new(config.max_fps),
            focused: true,
        }
    }

    fn handle(&mut self, event: InputEvent) -> Flow {
        self.input.apply(event, &mut self.camera)
    }
}

struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
}

struct GpuApp {
    state: AppState,
    config: ViewerConfig,
    textures: Option<TextureSet>,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    fatal: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(config: ViewerConfig, textures: TextureSet) -> Self {
        Self {
            state: AppState::new(&config, &textures),
            config,
            textures: Some(textures),
            window: None,
            gpu: None,
            fatal: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);
        if self.config.window.grab_cursor {
            grab_cursor(&window);
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("skyview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;

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
            &queue,
            surface_format,
            config.width,
            config.height,
            self.config.projection,
        );
        if let Some(textures) = self.textures.take() {
            renderer.upload_textures(&device, &queue, &textures);
        }

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        self.window = Some(window);
        self.gpu = Some(Gpu {
            surface,
            device,
            queue,
            config,
            renderer,
        });
        Ok(())
    }

    /// Input for this frame has already been applied by the event handlers.
    fn render_frame(&mut self) {
        let dt = self.state.limiter.mark_frame(Instant::now());
        tracing::trace!(dt_ms = dt.as_secs_f32() * 1000.0, "frame");

        self.state.camera.update();

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut recorder = gpu.renderer.frame(&gpu.device, &gpu.queue, &view);
        if let Err(e) = self.state.scene.draw(&self.state.camera, &mut recorder) {
            tracing::error!("render error: {e}");
        }

        output.present();
    }

    fn dispatch(&mut self, event_loop: &ActiveEventLoop, event: InputEvent) {
        if self.state.handle(event) == Flow::Exit {
            event_loop.exit();
        }
    }
}

fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
    if let Err(e) = grabbed {
        tracing::warn!("cursor grab unavailable: {e}");
    }
    window.set_cursor_visible(false);
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            tracing::error!("failed to initialize: {e:#}");
            self.fatal = Some(e);
            event_loop.exit();
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
                self.dispatch(event_loop, InputEvent::Quit);
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.config.width = new_size.width.max(1);
                    gpu.config.height = new_size.height.max(1);
                    gpu.surface.configure(&gpu.device, &gpu.config);
                    gpu.renderer
                        .resize(&gpu.device, gpu.config.width, gpu.config.height);
                }
            }
            WindowEvent::Focused(focused) => {
                self.state.focused = focused;
                if focused && self.config.window.grab_cursor {
                    if let Some(window) = &self.window {
                        grab_cursor(window);
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                let key = map_key(code);
                let event = match key_state {
                    ElementState::Pressed => InputEvent::KeyDown(key),
                    ElementState::Released => InputEvent::KeyUp(key),
                };
                self.dispatch(event_loop, event);
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.focused {
                let (dx, dy) = (delta.0 as f32, delta.1 as f32);
                self.dispatch(event_loop, InputEvent::MouseMotion { dx, dy });
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };
        let now = Instant::now();
        if self.state.limiter.is_due(now) {
            window.request_redraw();
            event_loop.set_control_flow(ControlFlow::Poll);
        } else if let Some(deadline) = self.state.limiter.deadline() {
            event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("skyview-desktop starting");

    let mut config = ViewerConfig::load_or_default(cli.config.as_deref())?;
    if let Some(assets) = cli.assets {
        config.asset_root = assets;
    }
    if let Some(max_fps) = cli.max_fps {
        config.max_fps = max_fps;
    }
    if cli.no_ground {
        config.show_ground = false;
    }
    config.validate()?;

    let textures = TextureSet::load(&config.asset_root);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config, textures);
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.fatal.take() {
        return Err(e);
    }
    tracing::info!("skyview-desktop exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_map_to_bindings() {
        assert_eq!(map_key(KeyCode::KeyW), Key::W);
        assert_eq!(map_key(KeyCode::ShiftLeft), Key::LeftShift);
        assert_eq!(map_key(KeyCode::Space), Key::Space);
        assert_eq!(map_key(KeyCode::ShiftRight), Key::Other);
    }

    #[test]
    fn state_applies_config() {
        let config = ViewerConfig::from_json_str(
            r#"{"start_position": [1.0, 2.0, 3.0], "show_ground": false}"#,
        )
        .unwrap();
        let state = AppState::new(&config, &TextureSet::default());
        assert!(state.scene.ground().is_none());
        assert_eq!(state.camera.position.to_array(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn escape_ends_the_loop() {
        let mut state = AppState::new(&ViewerConfig::default(), &TextureSet::default());
        assert_eq!(state.handle(InputEvent::KeyDown(Key::W)), Flow::Continue);
        assert!(state.camera.intents.forward);
        assert_eq!(state.handle(InputEvent::KeyDown(Key::Escape)), Flow::Exit);
    }
}
