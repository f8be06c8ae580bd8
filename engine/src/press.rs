/// Short tactile "button pushed in" animation per button index.
#[derive(Debug, Clone)]
pub struct PressTracker {
    timers: Vec<f32>,
}

impl PressTracker {
    pub const DURATION: f32 = 0.15;
    /// Smallest scale, reached part way into the press.
    pub const MIN_SCALE: f32 = 0.94;
    const DIP_AT: f32 = 0.4;

    pub fn new(count: usize) -> Self {
        Self {
            timers: vec![0.0; count],
        }
    }

    pub fn press(&mut self, index: usize) {
        if let Some(t) = self.timers.get_mut(index) {
            *t = Self::DURATION;
        }
    }

    pub fn is_pressed(&self, index: usize) -> bool {
        self.timers.get(index).is_some_and(|t| *t > 0.0)
    }

    pub fn update(&mut self, dt: f32) {
        for t in &mut self.timers {
            *t = (*t - dt).max(0.0);
        }
    }

    pub fn reset(&mut self) {
        self.timers.iter_mut().for_each(|t| *t = 0.0);
    }

    /// Draw scale for button `index`: dips to [`Self::MIN_SCALE`] and springs back.
    pub fn scale(&self, index: usize) -> f32 {
        let Some(&t) = self.timers.get(index) else {
            return 1.0;
        };
        if t <= 0.0 {
            return 1.0;
        }
        let progress = 1.0 - t / Self::DURATION;
        let depth = 1.0 - Self::MIN_SCALE;
        if progress < Self::DIP_AT {
            1.0 - depth * (progress / Self::DIP_AT)
        } else {
            Self::MIN_SCALE + depth * ((progress - Self::DIP_AT) / (1.0 - Self::DIP_AT))
        }
    }
}

/// Navigation that fires after a short delay, so a press animation can be seen first.
#[derive(Debug, Clone, Default)]
pub struct DelayedNav<T> {
    pending: Option<(T, f32)>,
}

impl<T: Copy> DelayedNav<T> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Schedules `target`; a newer schedule replaces an older one.
    pub fn schedule(&mut self, target: T, delay: f32) {
        self.pending = Some((target, delay));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Counts down; yields the target exactly once when the delay has elapsed.
    pub fn tick(&mut self, dt: f32) -> Option<T> {
        let (target, left) = self.pending.as_mut()?;
        *left -= dt;
        if *left > 0.0 {
            return None;
        }
        let target = *target;
        self.pending = None;
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_dips_and_recovers() {
        let mut p = PressTracker::new(3);
        assert_eq!(p.scale(1), 1.0);

        p.press(1);
        assert!(p.is_pressed(1));
        assert_eq!(p.scale(1), 1.0);

        p.update(0.06);
        assert!((p.scale(1) - PressTracker::MIN_SCALE).abs() < 1e-3);

        p.update(0.2);
        assert!(!p.is_pressed(1));
        assert_eq!(p.scale(1), 1.0);
        assert_eq!(p.scale(0), 1.0);
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let mut p = PressTracker::new(1);
        p.press(5);
        assert!(!p.is_pressed(5));
        assert_eq!(p.scale(5), 1.0);
    }

    #[test]
    fn delayed_nav_fires_once_after_delay() {
        let mut nav = DelayedNav::new();
        nav.schedule(7u8, 0.12);
        assert_eq!(nav.tick(0.1), None);
        assert!(nav.is_pending());
        assert_eq!(nav.tick(0.05), Some(7));
        assert_eq!(nav.tick(1.0), None);
        assert!(!nav.is_pending());
    }

    #[test]
    fn cancel_drops_pending_target() {
        let mut nav = DelayedNav::new();
        nav.schedule("games", 0.1);
        nav.cancel();
        assert_eq!(nav.tick(1.0), None);
    }
}
