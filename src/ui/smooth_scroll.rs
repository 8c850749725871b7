//! Page scroll with exponential ease-out.
//!
//! Input moves the scroll *target* immediately; the displayed offset closes a
//! fixed fraction of the remaining gap on every frame, so wheel bursts and
//! menu jumps glide and decelerate instead of snapping.

/// Page scroll animator, in rows.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    /// Displayed offset (fractional rows).
    position: f64,
    /// Where the page is heading.
    target: f64,
    /// Fraction of the remaining gap closed per frame.
    /// Good range: 0.2–0.35 at 60 fps.
    speed: f64,
}

impl SmoothScroll {
    pub fn new(speed: f64) -> Self {
        Self {
            position: 0.0,
            target: 0.0,
            speed: speed.clamp(0.05, 0.95),
        }
    }

    /// Move the target by `delta` rows, keeping it within `[0, max]`.
    pub fn scroll_by(&mut self, delta: f64, max: usize) {
        self.scroll_to(self.target + delta, max);
    }

    pub fn scroll_to(&mut self, target: f64, max: usize) {
        self.target = target.clamp(0.0, max as f64);
    }

    /// Re-clamp after the page got shorter (e.g. cards were hidden).
    pub fn clamp(&mut self, max: usize) {
        let max = max as f64;
        self.target = self.target.min(max);
        self.position = self.position.min(max);
    }

    /// Ease toward the target.  Call once per frame.
    pub fn tick(&mut self) {
        self.position += (self.target - self.position) * self.speed;
        if (self.target - self.position).abs() < 0.05 {
            self.position = self.target;
        }
    }

    /// Current offset in fractional rows.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// First visible row.
    pub fn offset(&self) -> usize {
        self.position.round().max(0.0) as usize
    }

    pub fn target(&self) -> f64 {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glides_to_target_and_settles() {
        let mut s = SmoothScroll::new(0.3);
        s.scroll_to(40.0, 100);
        let mut last = s.position();
        for _ in 0..200 {
            s.tick();
            assert!(s.position() >= last);
            last = s.position();
        }
        assert_eq!(s.position(), s.target());
        assert_eq!(s.offset(), 40);
    }

    #[test]
    fn target_is_clamped() {
        let mut s = SmoothScroll::new(0.3);
        s.scroll_by(-5.0, 10);
        assert_eq!(s.target(), 0.0);
        s.scroll_by(50.0, 10);
        assert_eq!(s.target(), 10.0);
    }

    #[test]
    fn clamp_pulls_back_after_page_shrinks() {
        let mut s = SmoothScroll::new(0.9);
        s.scroll_to(30.0, 30);
        for _ in 0..50 {
            s.tick();
        }
        s.clamp(12);
        assert_eq!(s.target(), 12.0);
        assert_eq!(s.offset(), 12);
    }
}
