//! Binary threshold over a continuously sampled scalar (scroll offset).
//!
//! No hysteresis: a value flapping across the cutoff flaps the flag.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdGate {
    threshold: f64,
    active: bool,
}

impl ThresholdGate {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            active: false,
        }
    }

    /// Record a sample and return the resulting state, `value > threshold`.
    pub fn observe(&mut self, value: f64) -> bool {
        let active = value > self.threshold;
        if active != self.active {
            tracing::debug!(value, active, "gate: crossed");
        }
        self.active = active;
        active
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_latest_sample_only() {
        let mut g = ThresholdGate::new(100.0);
        assert_eq!(
            [g.observe(101.0), g.observe(99.0), g.observe(101.0)],
            [true, false, true]
        );
    }

    #[test]
    fn exactly_at_threshold_is_inactive() {
        let mut g = ThresholdGate::new(100.0);
        g.observe(500.0);
        assert!(!g.observe(100.0));
        assert!(!g.is_active());
    }

    #[test]
    fn flaps_without_hysteresis() {
        let mut g = ThresholdGate::new(0.0);
        for i in 0..1_000 {
            let v = if i % 2 == 0 { 1e-9 } else { 0.0 };
            assert_eq!(g.observe(v), i % 2 == 0);
        }
    }

    #[test]
    fn starts_inactive() {
        assert!(!ThresholdGate::new(100.0).is_active());
    }
}
