//! Per-reel motion state and the animation tick rule

use serde::{Deserialize, Serialize};

use crate::easing::{Easing, ease_out_cubic};

/// Deceleration freezes once eased progress reaches this fraction
pub const FREEZE_PROGRESS: f64 = 0.98;

/// Velocities below this (px/ms) are treated as stopped
pub const VELOCITY_EPSILON: f64 = 1e-3;

/// What a reel is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MotionMode {
    /// Slow constant scroll while awaiting input
    IdleDrift,
    /// Fast constant scroll, unbounded duration
    FreeSpin,
    /// Velocity ramps to zero over a fixed duration (best-effort stop)
    Decelerating {
        initial_velocity: f64,
        elapsed_ms: f64,
        duration_ms: f64,
    },
    /// Position animates to an exact precomputed offset
    Seeking {
        from: f64,
        travel: f64,
        elapsed_ms: f64,
        duration_ms: f64,
        easing: Easing,
    },
    /// Velocity zero, position fixed
    Frozen,
}

/// Mutable state of one reel
///
/// Owned exclusively by its controller; mutated only by [`tick`]
/// (ReelMotion::tick) and the explicit control calls. Rendering reads
/// [`position`](ReelMotion::position) and derives its transform from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelMotion {
    position: f64,
    velocity: f64,
    direction: f64,
    frozen: bool,
    mode: MotionMode,
    cycle_width: f64,
}

impl ReelMotion {
    /// Create a reel at a starting position
    ///
    /// `direction` is +1 or −1; `cycle_width` is one catalog cycle in
    /// pixels. The reel starts still in idle-drift mode.
    pub fn new(cycle_width: f64, start_position: f64, direction: f64) -> Self {
        debug_assert!(cycle_width > 0.0, "cycle width must be positive");
        Self {
            position: start_position.rem_euclid(cycle_width),
            velocity: 0.0,
            direction: if direction < 0.0 { -1.0 } else { 1.0 },
            frozen: false,
            mode: MotionMode::IdleDrift,
            cycle_width,
        }
    }

    /// Current scroll offset, always in `[0, cycle_width)`
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current velocity magnitude (px/ms)
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Scroll direction: +1 or −1
    pub fn direction(&self) -> f64 {
        self.direction
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn mode(&self) -> MotionMode {
        self.mode
    }

    /// Enter idle drift at the given velocity
    pub fn start_drift(&mut self, velocity: f64) {
        self.velocity = velocity.max(0.0);
        self.frozen = false;
        self.mode = MotionMode::IdleDrift;
    }

    /// Enter free spin at the given velocity
    pub fn start_spin(&mut self, velocity: f64) {
        self.velocity = velocity.max(0.0);
        self.frozen = false;
        self.mode = MotionMode::FreeSpin;
    }

    /// Ramp the current velocity to zero over `duration_ms`
    ///
    /// Captures the velocity at call time; each tick applies the cubic
    /// ease-out curve and freezes once progress passes
    /// [`FREEZE_PROGRESS`] or velocity drops under [`VELOCITY_EPSILON`].
    /// Best-effort: the landing position is wherever the ramp ends.
    pub fn begin_deceleration(&mut self, duration_ms: f64) {
        if self.frozen {
            return;
        }
        self.mode = MotionMode::Decelerating {
            initial_velocity: self.velocity,
            elapsed_ms: 0.0,
            duration_ms: duration_ms.max(1.0),
        };
    }

    /// Animate to an exact target offset over `duration_ms` with cubic
    /// ease-out
    ///
    /// `target_offset` is unwrapped strip space (it may exceed the cycle
    /// width to encode full laps); the landing position is its normalized
    /// image, so index recovery is exact modulo the catalog length.
    pub fn begin_seek(&mut self, target_offset: f64, duration_ms: f64) {
        self.begin_seek_with(target_offset, duration_ms, Easing::CubicOut);
    }

    /// Seek with an explicit easing curve
    pub fn begin_seek_with(&mut self, target_offset: f64, duration_ms: f64, easing: Easing) {
        let travel = target_offset - self.position;
        self.direction = if travel < 0.0 { -1.0 } else { 1.0 };
        self.frozen = false;
        self.mode = MotionMode::Seeking {
            from: self.position,
            travel,
            elapsed_ms: 0.0,
            duration_ms: duration_ms.max(1.0),
            easing,
        };
    }

    /// Round the position to the nearest item boundary
    pub fn snap_to_grid(&mut self, pitch: f64) {
        debug_assert!(pitch > 0.0);
        self.position = ((self.position / pitch).round() * pitch).rem_euclid(self.cycle_width);
    }

    /// Stop immediately, holding the current position
    pub fn freeze(&mut self) {
        self.velocity = 0.0;
        self.frozen = true;
        self.mode = MotionMode::Frozen;
    }

    /// Advance the reel by one animation frame of `dt_ms`
    ///
    /// No-op while frozen. The position is wrapped back into
    /// `[0, cycle_width)` after every advance.
    pub fn tick(&mut self, dt_ms: f64) {
        if self.frozen || dt_ms <= 0.0 {
            return;
        }

        match self.mode {
            MotionMode::IdleDrift | MotionMode::FreeSpin => {
                self.position += self.velocity * self.direction * dt_ms;
                self.wrap();
            }
            MotionMode::Decelerating {
                initial_velocity,
                elapsed_ms,
                duration_ms,
            } => {
                let elapsed_ms = elapsed_ms + dt_ms;
                let progress = (elapsed_ms / duration_ms).clamp(0.0, 1.0);
                self.velocity = initial_velocity * (1.0 - ease_out_cubic(progress));
                self.position += self.velocity * self.direction * dt_ms;
                self.wrap();
                self.mode = MotionMode::Decelerating {
                    initial_velocity,
                    elapsed_ms,
                    duration_ms,
                };
                if progress >= FREEZE_PROGRESS || self.velocity < VELOCITY_EPSILON {
                    self.freeze();
                }
            }
            MotionMode::Seeking {
                from,
                travel,
                elapsed_ms,
                duration_ms,
                easing,
            } => {
                let elapsed_ms = elapsed_ms + dt_ms;
                let progress = (elapsed_ms / duration_ms).clamp(0.0, 1.0);
                let unwrapped = from + travel * easing.eval(progress);
                let previous = self.position;
                self.position = unwrapped.rem_euclid(self.cycle_width);
                self.velocity = (self.position - previous).abs() / dt_ms;
                self.mode = MotionMode::Seeking {
                    from,
                    travel,
                    elapsed_ms,
                    duration_ms,
                    easing,
                };
                if progress >= 1.0 {
                    // Land exactly on the target's normalized image
                    self.position = (from + travel).rem_euclid(self.cycle_width);
                    self.freeze();
                }
            }
            MotionMode::Frozen => {}
        }
    }

    fn wrap(&mut self) {
        if self.position >= self.cycle_width || self.position < 0.0 {
            self.position = self.position.rem_euclid(self.cycle_width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CYCLE: f64 = 14.0 * 140.0;

    #[test]
    fn test_wrap_idempotence() {
        let mut reel = ReelMotion::new(CYCLE, 0.0, 1.0);
        reel.start_spin(3.7);
        for _ in 0..10_000 {
            reel.tick(16.0);
            assert!(
                (0.0..CYCLE).contains(&reel.position()),
                "position escaped range: {}",
                reel.position()
            );
        }
    }

    #[test]
    fn test_wrap_negative_direction() {
        let mut reel = ReelMotion::new(CYCLE, 10.0, -1.0);
        reel.start_spin(2.1);
        for _ in 0..10_000 {
            reel.tick(16.0);
            assert!((0.0..CYCLE).contains(&reel.position()));
        }
    }

    #[test]
    fn test_frozen_tick_is_noop() {
        let mut reel = ReelMotion::new(CYCLE, 42.0, 1.0);
        reel.freeze();
        reel.tick(16.0);
        assert_relative_eq!(reel.position(), 42.0);
        assert_eq!(reel.velocity(), 0.0);
    }

    #[test]
    fn test_deceleration_captures_velocity_and_freezes() {
        let mut reel = ReelMotion::new(CYCLE, 0.0, 1.0);
        reel.start_spin(2.0);
        reel.begin_deceleration(600.0);

        let mut prev_velocity = 2.0;
        let mut ticks = 0;
        while !reel.is_frozen() {
            reel.tick(16.0);
            assert!(
                reel.velocity() <= prev_velocity + 1e-9,
                "velocity must ramp down monotonically"
            );
            prev_velocity = reel.velocity();
            ticks += 1;
            assert!(ticks < 100, "deceleration never froze");
        }
        // 600ms at 16ms/tick freezes within the duration plus one frame
        assert!(ticks as f64 * 16.0 <= 600.0 + 16.0);
    }

    #[test]
    fn test_deceleration_on_frozen_reel_is_noop() {
        let mut reel = ReelMotion::new(CYCLE, 5.0, 1.0);
        reel.freeze();
        reel.begin_deceleration(400.0);
        assert_eq!(reel.mode(), MotionMode::Frozen);
    }

    #[test]
    fn test_seek_lands_exactly() {
        let mut reel = ReelMotion::new(CYCLE, 150.0, 1.0);
        // Item 31 of a 14-item catalog at pitch 140, viewport 400
        let target = 4210.0;
        reel.begin_seek(target, 800.0);
        let mut ticks = 0;
        while !reel.is_frozen() {
            reel.tick(16.0);
            ticks += 1;
            assert!(ticks < 200, "seek never completed");
        }
        assert_relative_eq!(
            reel.position(),
            target.rem_euclid(CYCLE),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_seek_backward_travel() {
        let mut reel = ReelMotion::new(CYCLE, 500.0, 1.0);
        reel.begin_seek(430.0, 200.0);
        assert_relative_eq!(reel.direction(), -1.0);
        while !reel.is_frozen() {
            reel.tick(16.0);
        }
        assert_relative_eq!(reel.position(), 430.0, epsilon = 1e-9);
    }

    #[test]
    fn test_seek_with_bounce_still_lands_exactly() {
        let mut reel = ReelMotion::new(CYCLE, 0.0, 1.0);
        reel.begin_seek_with(700.0, 400.0, Easing::BounceOut);
        while !reel.is_frozen() {
            reel.tick(16.0);
        }
        assert_relative_eq!(reel.position(), 700.0, epsilon = 1e-9);
    }

    #[test]
    fn test_snap_to_grid() {
        let mut reel = ReelMotion::new(CYCLE, 423.0, 1.0);
        reel.snap_to_grid(140.0);
        assert_relative_eq!(reel.position(), 420.0);

        let mut reel = ReelMotion::new(CYCLE, CYCLE - 30.0, 1.0);
        reel.snap_to_grid(140.0);
        // Rounds up to the cycle boundary, which wraps to zero
        assert_relative_eq!(reel.position(), 0.0);
    }

    #[test]
    fn test_idle_drift_moves_slowly() {
        let mut reel = ReelMotion::new(CYCLE, 0.0, 1.0);
        reel.start_drift(0.05);
        reel.tick(16.0);
        assert_relative_eq!(reel.position(), 0.8);
        assert_eq!(reel.mode(), MotionMode::IdleDrift);
    }
}
