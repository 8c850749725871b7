//! Per-frame exponential smoothing of tracked positions toward their targets.
//!
//! Each frame every tracked position covers a fixed fraction `alpha` of the
//! remaining distance to its target, so motion stays continuous however
//! often the target jumps.  Steps are counted in frames, not seconds: if
//! frames stop arriving the followers simply hold still.

use std::collections::HashMap;
use std::hash::Hash;

/// Smoothing coefficient used when the configured one is unusable.
pub const DEFAULT_ALPHA: f64 = 0.1;

/// A 2D position in glue-layer units (pixels, cells, ...).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// `(current, target)` pair for one tracked pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowerState {
    current: Point,
    target: Point,
}

impl FollowerState {
    pub fn current(&self) -> Point {
        self.current
    }

    fn step(&mut self, alpha: f64) {
        self.current.x += (self.target.x - self.current.x) * alpha;
        self.current.y += (self.target.y - self.current.y) * alpha;
    }
}

/// Lifecycle of the frame loop.  Once shut down it is never restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Idle,
    Running,
    Shutdown,
}

/// Smoothing follower over any number of tracked ids.
#[derive(Debug)]
pub struct Follower<K> {
    alpha: f64,
    tracked: HashMap<K, FollowerState>,
    state: LoopState,
    frames: u64,
}

impl<K: Hash + Eq> Follower<K> {
    /// `alpha` is the per-frame fraction of the remaining distance covered.
    /// Callers validate it through configuration; it is clamped into the
    /// open interval here so a bad value can never overshoot or freeze.  A
    /// non-finite value falls back to [`DEFAULT_ALPHA`].
    pub fn new(alpha: f64) -> Self {
        let alpha = if alpha.is_finite() { alpha } else { DEFAULT_ALPHA };
        Self {
            alpha: alpha.clamp(f64::EPSILON, 1.0 - f64::EPSILON),
            tracked: HashMap::new(),
            state: LoopState::Idle,
            frames: 0,
        }
    }

    /// Start tracking `id` with both positions at `at`.
    #[cfg(test)]
    pub fn track(&mut self, id: K, at: Point) {
        self.tracked.insert(
            id,
            FollowerState {
                current: at,
                target: at,
            },
        );
    }

    /// Move the target immediately.  The current position is left for the
    /// frame loop to catch up; an unknown id starts following from the origin.
    pub fn set_target(&mut self, id: K, target: Point) {
        self.tracked
            .entry(id)
            .or_insert(FollowerState {
                current: Point::ORIGIN,
                target,
            })
            .target = target;
    }

    /// Begin consuming frames.  Idempotent while running; a shut-down loop
    /// stays shut down.
    pub fn start(&mut self) {
        if self.state == LoopState::Idle {
            self.state = LoopState::Running;
        }
    }

    /// Halt frame scheduling for good.
    pub fn shutdown(&mut self) {
        self.state = LoopState::Shutdown;
    }

    #[cfg(test)]
    pub fn loop_state(&self) -> LoopState {
        self.state
    }

    /// Whether the driver should keep delivering frames.
    pub fn wants_frames(&self) -> bool {
        self.state == LoopState::Running
    }

    /// One delivered animation frame.  Steps every tracked id once while the
    /// loop is running; otherwise does nothing.
    pub fn on_frame(&mut self) {
        if self.state != LoopState::Running {
            return;
        }
        self.frames += 1;
        for state in self.tracked.values_mut() {
            state.step(self.alpha);
        }
        tracing::trace!(frame = self.frames, "follower: stepped");
    }

    /// Number of frames stepped so far.
    #[cfg(test)]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn position(&self, id: &K) -> Option<Point> {
        self.tracked.get(id).map(FollowerState::current)
    }

    #[cfg(test)]
    pub fn target(&self, id: &K) -> Option<Point> {
        self.tracked.get(id).map(|s| s.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(a: Point, b: Point) -> f64 {
        (a.x - b.x).hypot(a.y - b.y)
    }

    fn running(alpha: f64) -> Follower<u8> {
        let mut f = Follower::new(alpha);
        f.start();
        f
    }

    #[test]
    fn distance_strictly_decreases_and_converges() {
        let mut f = running(0.1);
        f.track(0, Point::ORIGIN);
        let target = Point::new(300.0, -120.0);
        f.set_target(0, target);

        let eps = 1e-3;
        // (1 - alpha)^n * d0 < eps  =>  n > ln(eps / d0) / ln(1 - alpha)
        let d0 = distance(Point::ORIGIN, target);
        let bound = ((eps / d0).ln() / (1.0 - 0.1f64).ln()).ceil() as u64 + 1;

        let mut prev = d0;
        let mut steps = 0;
        while prev >= eps {
            f.on_frame();
            steps += 1;
            let d = distance(f.position(&0).unwrap(), target);
            assert!(d < prev, "step {steps}: {d} !< {prev}");
            prev = d;
            assert!(steps <= bound, "did not converge within {bound} frames");
        }
    }

    #[test]
    fn ten_frames_remove_about_two_thirds_of_the_gap() {
        let mut f = running(0.1);
        f.set_target(0, Point::new(100.0, 0.0));
        for _ in 0..10 {
            f.on_frame();
        }
        let x = f.position(&0).unwrap().x;
        let expected = 100.0 * (1.0 - 0.9f64.powi(10));
        assert!((x - expected).abs() < 1e-9);
    }

    #[test]
    fn set_target_does_not_move_current() {
        let mut f = running(0.5);
        f.track(1, Point::new(10.0, 10.0));
        f.set_target(1, Point::new(500.0, 500.0));
        assert_eq!(f.position(&1), Some(Point::new(10.0, 10.0)));
        f.on_frame();
        assert_eq!(f.position(&1), Some(Point::new(255.0, 255.0)));
    }

    #[test]
    fn retargeting_mid_flight_is_continuous() {
        let mut f = running(0.1);
        f.set_target(0, Point::new(100.0, 0.0));
        f.on_frame();
        let before = f.position(&0).unwrap();
        f.set_target(0, Point::new(-1_000.0, 0.0));
        f.on_frame();
        let after = f.position(&0).unwrap();
        // One step moves at most alpha of the remaining distance.
        let remaining = distance(before, Point::new(-1_000.0, 0.0));
        assert!(distance(before, after) <= 0.1 * remaining + 1e-9);
    }

    #[test]
    fn frames_ignored_unless_running() {
        let mut f = Follower::new(0.1);
        f.set_target(0, Point::new(50.0, 50.0));
        f.on_frame();
        assert_eq!(f.position(&0), Some(Point::ORIGIN));

        f.start();
        f.on_frame();
        assert_ne!(f.position(&0), Some(Point::ORIGIN));

        f.shutdown();
        let frozen = f.position(&0);
        f.on_frame();
        f.start();
        f.on_frame();
        assert_eq!(f.position(&0), frozen);
        assert_eq!(f.loop_state(), LoopState::Shutdown);
        assert_eq!(f.frames(), 1);
    }

    #[test]
    fn unknown_ids_have_no_position() {
        let f: Follower<u8> = running(0.1);
        assert_eq!(f.position(&9), None);
    }

    #[test]
    fn non_finite_alpha_falls_back_to_default() {
        for alpha in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut f = running(alpha);
            f.set_target(0, Point::new(100.0, 0.0));
            f.on_frame();
            let p = f.position(&0).unwrap();
            assert!(p.x.is_finite());
            assert!((p.x - 100.0 * DEFAULT_ALPHA).abs() < 1e-9);
        }
    }

    #[test]
    fn out_of_range_alpha_is_clamped() {
        let mut f = running(4.0);
        f.set_target(0, Point::new(100.0, 0.0));
        f.on_frame();
        let x = f.position(&0).unwrap().x;
        assert!(x > 0.0 && x < 100.0);
    }
}
