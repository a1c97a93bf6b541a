//! Interactive viewer.
//!
//! Opens a window, runs a [`CircularMotion`] on a software canvas and
//! presents the canvas through [`Presenter`] once per display refresh.
//!
//! Controls: Space starts/stops the animation, Escape quits. Resizing the
//! window resizes the canvas to the smaller window side.

use std::sync::Arc;

use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::controller::CircularMotion;
use crate::error::ViewerError;
use crate::frame::{AnimationLoop, FrameDriver, FrameStats};
use crate::gpu::Presenter;
use crate::options::PartialOptions;
use crate::raster::PixelCanvas;

const TITLE: &str = "Circular Motion";

/// Open the viewer and block until the window is closed.
pub fn run(options: PartialOptions) -> Result<(), ViewerError> {
    let canvas = PixelCanvas::new();
    let driver = AnimationLoop::new();
    let motion = CircularMotion::new(canvas.clone(), options, driver.clone())?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(canvas, driver, motion);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    canvas: PixelCanvas,
    driver: AnimationLoop,
    motion: CircularMotion<PixelCanvas>,
    stats: FrameStats,
    error: Option<ViewerError>,
}

impl App {
    fn new(canvas: PixelCanvas, driver: AnimationLoop, motion: CircularMotion<PixelCanvas>) -> Self {
        Self {
            window: None,
            presenter: None,
            canvas,
            driver,
            motion,
            stats: FrameStats::new(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: ViewerError) {
        error!("{}", e);
        self.error = Some(e);
        event_loop.exit();
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn update_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        if self.motion.is_running() {
            window.set_title(&format!("{} - {:.0} FPS", TITLE, self.stats.fps()));
        } else {
            window.set_title(&format!("{} (paused)", TITLE));
        }
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        match key {
            KeyCode::Space => {
                self.motion.toggle();
                self.update_title();
                self.request_redraw();
            }
            KeyCode::Escape => event_loop.exit(),
            _ => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.driver.pump();

        let Some(presenter) = &mut self.presenter else {
            return;
        };
        presenter.upload(&self.canvas.pixmap());

        match presenter.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = winit::dpi::PhysicalSize {
                    width: presenter.config.width,
                    height: presenter.config.height,
                };
                warn!("Surface lost, reconfiguring at {}x{}", size.width, size.height);
                presenter.resize(size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
                return;
            }
            Err(e) => warn!("Render error: {:?}", e),
        }

        if self.stats.tick() {
            self.update_title();
        }
        if self.driver.is_running() {
            self.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let size = self.motion.options().size;
        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::PhysicalSize::new(size, size));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        match pollster::block_on(Presenter::new(window.clone())) {
            Ok(presenter) => self.presenter = Some(presenter),
            Err(e) => return self.fail(event_loop, e.into()),
        }
        self.window = Some(window);

        info!("Space toggles the animation, Escape quits");
        self.motion.start();
        self.update_title();
        self.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(physical_size);
                }
                let side = physical_size.width.min(physical_size.height);
                if side > 0 {
                    self.motion.set_size(side);
                }
                self.request_redraw();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.on_key(event_loop, key),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
