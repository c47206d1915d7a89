//! Column-level smooth scroll with exponential ease-out.
//!
//! The strip's logical scroll offset jumps whenever the selection changes.
//! The animator keeps a displayed offset that closes a fixed fraction of the
//! remaining distance each tick, so slides glide into place and decelerate.

/// Column-offset smooth scroll animator.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    /// Offset currently drawn.
    position: f64,
    /// Offset the strip is heading to.
    target: f64,
    /// Damping: `gap *= (1 - speed)` each tick.
    /// Higher speed = faster settle.  Good range: 0.25–0.45 at 20 fps.
    speed: f64,
    /// Set once the first target arrived; until then targets are jumped to.
    primed: bool,
}

impl SmoothScroll {
    pub fn new(speed: f64) -> Self {
        Self {
            position: 0.0,
            target: 0.0,
            speed: speed.clamp(0.05, 0.95),
            primed: false,
        }
    }

    /// Feed the current target offset.  The very first target is adopted
    /// immediately so the strip does not slide in from column 0 on launch.
    pub fn set_target(&mut self, target: f64) {
        if !self.primed {
            self.jump_to(target);
            return;
        }
        self.target = target;
    }

    /// Snap to `target` with no animation (layout changes, reloads).
    pub fn jump_to(&mut self, target: f64) {
        self.position = target;
        self.target = target;
        self.primed = true;
    }

    /// Forget the current position; the next target is jumped to.
    pub fn reset(&mut self) {
        self.primed = false;
        self.position = 0.0;
        self.target = 0.0;
    }

    /// Close part of the gap.  Call once per frame.
    pub fn tick(&mut self) {
        let gap = self.target - self.position;
        if gap.abs() < 0.4 {
            self.position = self.target;
        } else {
            self.position += gap * self.speed;
        }
    }

    /// Current displayed offset, in whole columns.
    pub fn offset(&self) -> i32 {
        self.position.round() as i32
    }

    /// True while the displayed offset has not reached the target.
    pub fn is_animating(&self) -> bool {
        self.position != self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_target_is_adopted_without_motion() {
        let mut scroll = SmoothScroll::new(0.35);
        scroll.set_target(42.0);
        assert_eq!(scroll.offset(), 42);
        assert!(!scroll.is_animating());
    }

    #[test]
    fn eases_toward_target_and_settles() {
        let mut scroll = SmoothScroll::new(0.5);
        scroll.set_target(0.0);
        scroll.set_target(40.0);
        assert!(scroll.is_animating());

        scroll.tick();
        assert_eq!(scroll.offset(), 20);
        scroll.tick();
        assert_eq!(scroll.offset(), 30);

        for _ in 0..20 {
            scroll.tick();
        }
        assert_eq!(scroll.offset(), 40);
        assert!(!scroll.is_animating());
    }

    #[test]
    fn reset_makes_next_target_jump() {
        let mut scroll = SmoothScroll::new(0.35);
        scroll.set_target(10.0);
        scroll.set_target(90.0);
        scroll.reset();
        scroll.set_target(-5.0);
        assert_eq!(scroll.offset(), -5);
        assert!(!scroll.is_animating());
    }
}
