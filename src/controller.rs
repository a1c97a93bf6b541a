//! The motion controller.
//!
//! [`CircularMotion`] owns a drawing surface and a ring of particles. Once
//! started, every frame fades the previous trails with a translucent white
//! wash and strokes each particle's step along its orbit.

use crate::color::Color;
use crate::error::ConfigurationError;
use crate::frame::{AnimationLoop, FrameDriver};
use crate::options::{MotionOptions, PartialOptions};
use crate::particle::Particle;
use crate::spawn::{create_particles, rng_for};
use crate::surface::{sync_dimensions, Context2d, Surface, SurfaceLookup};
use glam::Vec2;
use log::{debug, info};
use rand::Rng;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// Wash painted over the whole surface at the start of each frame.
pub const TRAIL_FADE: Color = Color::rgba(255, 255, 255, 0.1);

/// State touched by the frame callback.
struct Scene<C> {
    context: C,
    particles: Vec<Particle>,
    /// Current surface size, used by `clear`.
    size: u32,
    /// Size captured by the last `start`; frames draw around its center
    /// even after a resize.
    frame_size: u32,
}

impl<C: Context2d> Scene<C> {
    fn render_frame(&mut self) {
        let Scene {
            context,
            particles,
            frame_size,
            ..
        } = self;
        let extent = *frame_size as f32;
        let center = Vec2::splat(extent / 2.0);

        context.set_fill_style(TRAIL_FADE);
        context.fill_rect(0.0, 0.0, extent, extent);

        for particle in particles.iter_mut() {
            let (from, to) = particle.advance(center);

            context.begin_path();
            context.set_stroke_style(particle.color);
            context.set_line_width(particle.radius);
            context.move_to(from.x, from.y);
            context.line_to(to.x, to.y);
            context.stroke();
            context.close_path();
        }
    }

    fn clear(&mut self) {
        let extent = self.size as f32;
        self.context.clear_rect(0.0, 0.0, extent, extent);
    }
}

/// Particles orbiting the center of a square surface.
///
/// ```ignore
/// let canvas = PixelCanvas::new();
/// let driver = AnimationLoop::new();
/// let mut motion = CircularMotion::new(canvas, PartialOptions::new().with_size(400), driver.clone())?;
///
/// motion.start();
/// while driver.pump() {
///     present(motion.surface());
/// }
/// ```
pub struct CircularMotion<S: Surface, D: FrameDriver = AnimationLoop> {
    surface: S,
    options: MotionOptions,
    scene: Rc<RefCell<Scene<S::Context>>>,
    driver: D,
}

impl<S, D> CircularMotion<S, D>
where
    S: Surface,
    S::Context: 'static,
    D: FrameDriver,
{
    /// Build a controller on `surface`.
    ///
    /// Fails when the surface is not drawable, when it cannot provide a 2D
    /// context, or when the merged options are invalid. Particles are drawn
    /// from a seeded generator when `options.seed` is set, from OS entropy
    /// otherwise.
    pub fn new(surface: S, options: PartialOptions, driver: D) -> Result<Self, ConfigurationError> {
        Self::build(surface, options, driver, |options| {
            create_particles(options, &mut rng_for(options))
        })
    }

    /// Like [`new`](Self::new), drawing particles from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        surface: S,
        options: PartialOptions,
        driver: D,
        rng: &mut R,
    ) -> Result<Self, ConfigurationError> {
        Self::build(surface, options, driver, |options| create_particles(options, rng))
    }

    /// Resolve `selector` with `lookup` and build a controller on the result.
    pub fn from_selector<L>(
        lookup: &L,
        selector: &str,
        options: PartialOptions,
        driver: D,
    ) -> Result<Self, ConfigurationError>
    where
        L: SurfaceLookup<Surface = S>,
    {
        let surface = lookup
            .query(selector)
            .filter(|surface| surface.is_drawable())
            .ok_or_else(|| ConfigurationError::InvalidSurfaceReference {
                selector: Some(selector.to_string()),
            })?;
        Self::new(surface, options, driver)
    }

    fn build<F>(
        mut surface: S,
        overrides: PartialOptions,
        driver: D,
        spawn: F,
    ) -> Result<Self, ConfigurationError>
    where
        F: FnOnce(&MotionOptions) -> Vec<Particle>,
    {
        if !surface.is_drawable() {
            return Err(ConfigurationError::InvalidSurfaceReference { selector: None });
        }
        let context = surface
            .context_2d()
            .ok_or(ConfigurationError::SurfaceContextUnavailable)?;
        let options = MotionOptions::resolve(overrides)?;

        let particles = spawn(&options);
        if sync_dimensions(&mut surface, options.size) {
            debug!("Surface resized to {}x{}", options.size, options.size);
        }
        debug!(
            "Created {} particles (size {}, offset {}, {} colors)",
            particles.len(),
            options.size,
            options.offset_center,
            options.colors.len()
        );

        let scene = Scene {
            context,
            particles,
            size: options.size,
            frame_size: options.size,
        };

        Ok(Self {
            surface,
            options,
            scene: Rc::new(RefCell::new(scene)),
            driver,
        })
    }

    /// Change the surface edge length.
    ///
    /// A running animation keeps drawing around the center it started with;
    /// the new center applies from the next [`start`](Self::start).
    /// [`stop`](Self::stop) clears the resized surface. Particles keep
    /// their orbits.
    pub fn set_size(&mut self, size: u32) {
        self.options.size = size;
        self.scene.borrow_mut().size = size;
        if sync_dimensions(&mut self.surface, size) {
            debug!("Surface resized to {}x{}", size, size);
        }
    }

    /// Start animating. Restarting a running controller keeps a single loop.
    pub fn start(&mut self) {
        {
            let mut scene = self.scene.borrow_mut();
            scene.frame_size = scene.size;
        }
        let scene = Rc::clone(&self.scene);
        self.driver
            .start(Box::new(move || scene.borrow_mut().render_frame()));
        info!("Animation started");
    }

    /// Stop animating and clear the surface.
    pub fn stop(&mut self) {
        self.driver.stop();
        self.scene.borrow_mut().clear();
        info!("Animation stopped");
    }

    /// Start when stopped, stop when running.
    pub fn toggle(&mut self) {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
    }
}

impl<S: Surface, D: FrameDriver> CircularMotion<S, D> {
    /// The resolved options, including the current size.
    pub fn options(&self) -> &MotionOptions {
        &self.options
    }

    /// Current particle state.
    ///
    /// # Panics
    ///
    /// The returned guard borrows the frame state. Running a frame while it
    /// is held (for example `AnimationLoop::pump`) panics with a
    /// `BorrowMutError`, as do [`set_size`](Self::set_size),
    /// [`start`](Self::start) and [`stop`](Self::stop).
    pub fn particles(&self) -> Ref<'_, [Particle]> {
        Ref::map(self.scene.borrow(), |scene| scene.particles.as_slice())
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    /// The surface being drawn on.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }
}

impl<S: Surface, D: FrameDriver> Drop for CircularMotion<S, D> {
    fn drop(&mut self) {
        self.driver.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{Document, Node, PixelCanvas, MAX_CANVAS_DIMENSION};
    use crate::surface::Dimension;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn seeded() -> PartialOptions {
        PartialOptions::new().with_seed(11)
    }

    #[test]
    fn test_construction_sizes_canvas() {
        let canvas = PixelCanvas::new();
        let motion = CircularMotion::new(canvas.clone(), seeded(), AnimationLoop::new()).unwrap();

        assert_eq!(canvas.dimension(Dimension::Width), Some(250));
        assert_eq!(canvas.dimension(Dimension::Height), Some(250));
        assert_eq!(motion.particles().len(), 200);
        assert!(!motion.is_running());
    }

    #[test]
    fn test_frames_draw_and_stop_clears() {
        let canvas = PixelCanvas::new();
        let driver = AnimationLoop::new();
        let mut motion = CircularMotion::new(canvas.clone(), seeded(), driver.clone()).unwrap();

        motion.start();
        for _ in 0..5 {
            assert!(driver.pump());
        }
        assert!(!canvas.pixmap().is_clear());

        motion.stop();
        assert!(canvas.pixmap().is_clear());
        assert!(!driver.pump());
        assert_eq!(driver.frames(), 5);
    }

    #[test]
    fn test_particles_advance_by_velocity() {
        let driver = AnimationLoop::new();
        let mut rng = SmallRng::seed_from_u64(4);
        let mut motion =
            CircularMotion::with_rng(PixelCanvas::new(), PartialOptions::new(), driver.clone(), &mut rng)
                .unwrap();

        let before: Vec<Particle> = motion.particles().to_vec();
        motion.start();
        driver.pump();

        for (old, new) in before.iter().zip(motion.particles().iter()) {
            assert_eq!(new.angle, old.angle + old.velocity);
        }
    }

    #[test]
    fn test_selector_construction() {
        let document = Document::new()
            .with(Node::element("div").with_id("text"))
            .with(Node::canvas(PixelCanvas::new()).with_id("stage"));

        assert!(CircularMotion::from_selector(&document, "#stage", seeded(), AnimationLoop::new()).is_ok());

        let err = CircularMotion::from_selector(&document, "#text", seeded(), AnimationLoop::new())
            .err()
            .unwrap();
        assert_eq!(
            err,
            ConfigurationError::InvalidSurfaceReference {
                selector: Some("#text".to_string())
            }
        );

        let err = CircularMotion::from_selector(&document, "#nope", seeded(), AnimationLoop::new())
            .err()
            .unwrap();
        assert!(matches!(err, ConfigurationError::InvalidSurfaceReference { .. }));
    }

    #[test]
    fn test_oversized_canvas_has_no_context() {
        let canvas = PixelCanvas::with_size(MAX_CANVAS_DIMENSION * 2, 10);
        let err = CircularMotion::new(canvas, seeded(), AnimationLoop::new())
            .err()
            .unwrap();
        assert_eq!(err, ConfigurationError::SurfaceContextUnavailable);
    }

    #[test]
    fn test_drop_stops_driver() {
        let driver = AnimationLoop::new();
        {
            let mut motion = CircularMotion::new(PixelCanvas::new(), seeded(), driver.clone()).unwrap();
            motion.start();
            assert!(driver.is_running());
        }
        assert!(!driver.is_running());
        assert!(!driver.pump());
    }

    #[test]
    #[should_panic]
    fn test_pumping_while_particles_are_borrowed_panics() {
        let driver = AnimationLoop::new();
        let mut motion = CircularMotion::new(PixelCanvas::new(), seeded(), driver.clone()).unwrap();
        motion.start();

        let particles = motion.particles();
        driver.pump();
        drop(particles);
    }

    #[test]
    fn test_toggle() {
        let mut motion = CircularMotion::new(PixelCanvas::new(), seeded(), AnimationLoop::new()).unwrap();
        motion.toggle();
        assert!(motion.is_running());
        motion.toggle();
        assert!(!motion.is_running());
    }
}
