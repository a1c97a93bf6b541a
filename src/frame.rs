//! Frame scheduling.
//!
//! A [`FrameDriver`] runs a callback once per display refresh until told to
//! stop. [`AnimationLoop`] is the host-pumped implementation: the windowing
//! loop (or an exporter, or a test) calls [`AnimationLoop::pump`] whenever
//! it is ready for the next frame.
//!
//! ```ignore
//! let driver = AnimationLoop::new();
//! let mut motion = CircularMotion::new(canvas, PartialOptions::new(), driver.clone())?;
//! motion.start();
//!
//! while driver.pump() {
//!     // present, wait for vsync, ...
//! }
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Runs a callback repeatedly until stopped.
pub trait FrameDriver {
    /// Begin calling `callback` once per frame. Replaces any callback that
    /// is already scheduled; there is never more than one.
    fn start(&mut self, callback: Box<dyn FnMut()>);

    /// Stop scheduling. A frame already in flight completes. No-op when idle.
    fn stop(&mut self);

    /// Whether a callback is scheduled.
    fn is_running(&self) -> bool;
}

#[derive(Default)]
struct LoopState {
    running: bool,
    /// Bumped by every start/stop so a frame can tell whether its callback
    /// was replaced or cancelled while it ran.
    generation: u64,
    callback: Option<Box<dyn FnMut()>>,
    frames: u64,
}

/// Host-pumped frame driver.
///
/// Clones share the same loop, so the controller can own one handle while
/// the host keeps another to pump.
#[derive(Clone, Default)]
pub struct AnimationLoop {
    state: Rc<RefCell<LoopState>>,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one frame if running.
    ///
    /// Returns whether another frame should be scheduled. Calls to
    /// [`start`](FrameDriver::start) or [`stop`](FrameDriver::stop) made by
    /// the callback take effect from the next frame on. A nested `pump`
    /// from inside the callback does nothing.
    pub fn pump(&self) -> bool {
        let (mut callback, generation) = {
            let mut state = self.state.borrow_mut();
            if !state.running {
                return false;
            }
            match state.callback.take() {
                Some(callback) => (callback, state.generation),
                None => return false,
            }
        };

        callback();

        let mut state = self.state.borrow_mut();
        state.frames += 1;
        if state.generation == generation {
            state.callback = Some(callback);
            true
        } else {
            let running = state.running;
            // Replaced or stopped mid-frame: the old callback goes away here,
            // outside the borrow.
            drop(state);
            drop(callback);
            running
        }
    }

    /// Frames completed since creation.
    pub fn frames(&self) -> u64 {
        self.state.borrow().frames
    }
}

impl FrameDriver for AnimationLoop {
    fn start(&mut self, callback: Box<dyn FnMut()>) {
        let previous = {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            state.running = true;
            state.callback.replace(callback)
        };
        drop(previous);
    }

    fn stop(&mut self) {
        let previous = {
            let mut state = self.state.borrow_mut();
            if !state.running {
                return;
            }
            state.generation += 1;
            state.running = false;
            state.callback.take()
        };
        drop(previous);
    }

    fn is_running(&self) -> bool {
        self.state.borrow().running
    }
}

impl fmt::Debug for AnimationLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("AnimationLoop")
            .field("running", &state.running)
            .field("frames", &state.frames)
            .finish()
    }
}

/// Frame counter with a periodically refreshed frames-per-second figure.
#[derive(Debug, Clone)]
pub struct FrameStats {
    frames: u64,
    fps: f32,
    window_start: Instant,
    window_frames: u64,
    interval: Duration,
}

impl FrameStats {
    /// Stats refreshing the FPS figure every half second.
    pub fn new() -> Self {
        Self::with_interval(Duration::from_millis(500))
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            frames: 0,
            fps: 0.0,
            window_start: Instant::now(),
            window_frames: 0,
            interval,
        }
    }

    /// Record a presented frame. Returns `true` when the FPS figure changed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> bool {
        self.frames += 1;
        self.window_frames += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.interval {
            return false;
        }
        self.fps = self.window_frames as f32 / elapsed.as_secs_f32();
        self.window_start = now;
        self.window_frames = 0;
        true
    }

    /// Total frames recorded.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Most recent FPS measurement, 0 until the first interval elapses.
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<u32>>, Box<dyn FnMut()>) {
        let count = Rc::new(Cell::new(0));
        let handle = Rc::clone(&count);
        (count, Box::new(move || handle.set(handle.get() + 1)))
    }

    #[test]
    fn test_idle_loop_does_nothing() {
        let driver = AnimationLoop::new();
        assert!(!driver.is_running());
        assert!(!driver.pump());
        assert_eq!(driver.frames(), 0);
    }

    #[test]
    fn test_pump_runs_one_frame() {
        let mut driver = AnimationLoop::new();
        let (count, callback) = counter();
        driver.start(callback);

        assert!(driver.pump());
        assert!(driver.pump());
        assert_eq!(count.get(), 2);
        assert_eq!(driver.frames(), 2);
    }

    #[test]
    fn test_stop_halts_and_is_idempotent() {
        let mut driver = AnimationLoop::new();
        let (count, callback) = counter();
        driver.start(callback);
        driver.pump();
        driver.stop();
        driver.stop();

        assert!(!driver.is_running());
        assert!(!driver.pump());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_restart_replaces_callback() {
        let mut driver = AnimationLoop::new();
        let (first, a) = counter();
        let (second, b) = counter();
        driver.start(a);
        driver.start(b);

        for _ in 0..3 {
            driver.pump();
        }
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 3);
    }

    #[test]
    fn test_stop_from_inside_callback_finishes_frame() {
        let driver = AnimationLoop::new();
        let count = Rc::new(Cell::new(0));

        let mut inner = driver.clone();
        let handle = Rc::clone(&count);
        driver.clone().start(Box::new(move || {
            inner.stop();
            handle.set(handle.get() + 1);
        }));

        assert!(!driver.pump());
        assert!(!driver.pump());
        assert_eq!(count.get(), 1);
        assert_eq!(driver.frames(), 1);
    }

    #[test]
    fn test_restart_from_inside_callback_takes_effect_next_frame() {
        let driver = AnimationLoop::new();
        let (replacement_count, replacement) = counter();
        let replacement = RefCell::new(Some(replacement));

        let mut inner = driver.clone();
        driver.clone().start(Box::new(move || {
            if let Some(next) = replacement.borrow_mut().take() {
                inner.start(next);
            }
        }));

        assert!(driver.pump());
        assert_eq!(replacement_count.get(), 0);
        assert!(driver.pump());
        assert_eq!(replacement_count.get(), 1);
    }

    #[test]
    fn test_nested_pump_is_ignored() {
        let driver = AnimationLoop::new();
        let nested = Rc::new(Cell::new(true));

        let inner = driver.clone();
        let result = Rc::clone(&nested);
        driver.clone().start(Box::new(move || result.set(inner.pump())));

        driver.pump();
        assert!(!nested.get());
        assert_eq!(driver.frames(), 1);
    }

    #[test]
    fn test_stats_refresh_after_interval() {
        let mut stats = FrameStats::with_interval(Duration::from_millis(100));
        let start = stats.window_start;

        assert!(!stats.tick_at(start + Duration::from_millis(10)));
        assert_eq!(stats.fps(), 0.0);
        assert!(stats.tick_at(start + Duration::from_millis(200)));
        assert!((stats.fps() - 10.0).abs() < 1e-3);
        assert_eq!(stats.frames(), 2);
    }
}
