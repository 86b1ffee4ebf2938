use crate::{
    constants::{MAX_TICKS_PER_FRAME, TICK_DT},
    game::Flow,
};

/// Counts rendered frames and reports the total once per second.
pub struct FpsCounter {
    elapsed: f32,
    frames: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            elapsed: 0.,
            frames: 0,
        }
    }

    /// Records one frame that took `dt` seconds. Returns the frame count of the
    /// last second whenever a full second has passed.
    pub fn frame(&mut self, dt: f32) -> Option<u32> {
        self.elapsed += dt;
        self.frames += 1;
        if self.elapsed >= 1. {
            let fps = self.frames;
            self.elapsed = 0.;
            self.frames = 0;
            Some(fps)
        } else {
            None
        }
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

// fraction of a tick forgiven so f32 rounding never eats a whole tick
const TICK_SLACK: f32 = 0.001;

/// Turns real frame times into fixed `TICK_DT` ticks, holding on to input until
/// a tick consumes it.
pub struct FixedStep<E> {
    accumulated: f32,
    pending: Vec<E>,
}

impl<E: Clone> FixedStep<E> {
    pub fn new() -> Self {
        Self {
            accumulated: 0.,
            pending: Vec::new(),
        }
    }

    /// Adds `dt` seconds and runs every tick now due, at most
    /// `MAX_TICKS_PER_FRAME`. Time past that budget is dropped. The first tick
    /// gets all input received since the last tick ran.
    pub fn advance<F>(&mut self, dt: f32, inputs: &[E], mut tick: F) -> Flow
    where
        F: FnMut(f32, &[E]) -> Flow,
    {
        self.pending.extend_from_slice(inputs);

        self.accumulated = (self.accumulated + dt).min(TICK_DT * MAX_TICKS_PER_FRAME as f32);
        let due = (self.accumulated / TICK_DT + TICK_SLACK).floor() as u32;
        let due = due.min(MAX_TICKS_PER_FRAME);
        self.accumulated = (self.accumulated - due as f32 * TICK_DT).max(0.);

        for _ in 0..due {
            let flow = tick(TICK_DT, &self.pending);
            self.pending.clear();
            if flow == Flow::Exit {
                return Flow::Exit;
            }
        }
        Flow::Continue
    }
}

impl<E: Clone> Default for FixedStep<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks(step: &mut FixedStep<u32>, dt: f32, inputs: &[u32]) -> Vec<Vec<u32>> {
        let mut seen = Vec::new();
        step.advance(dt, inputs, |tick_dt, inputs| {
            assert_eq!(tick_dt, TICK_DT);
            seen.push(inputs.to_vec());
            Flow::Continue
        });
        seen
    }

    #[test]
    fn long_frame_runs_at_most_the_tick_budget() {
        let mut step = FixedStep::new();
        assert_eq!(ticks(&mut step, 1., &[]).len(), 5);
        // the rest of the second is dropped, not carried over
        assert_eq!(ticks(&mut step, 0., &[]).len(), 0);
    }

    #[test]
    fn full_budget_always_gives_every_tick() {
        let mut step = FixedStep::new();
        for _ in 0..20 {
            assert_eq!(ticks(&mut step, 0.05, &[]).len(), 5);
        }
    }

    #[test]
    fn short_frames_add_up() {
        let mut step = FixedStep::new();
        let total: usize = (0..100).map(|_| ticks(&mut step, 0.001, &[]).len()).sum();
        assert_eq!(total, 10);

        let mut step = FixedStep::new();
        let total: usize = (0..60).map(|_| ticks(&mut step, 1. / 60., &[]).len()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn input_waits_for_the_next_tick() {
        let mut step = FixedStep::new();
        assert!(ticks(&mut step, 0.004, &[1]).is_empty());
        assert!(ticks(&mut step, 0.004, &[2]).is_empty());
        assert_eq!(ticks(&mut step, 0.004, &[3]), vec![vec![1, 2, 3]]);

        let seen = ticks(&mut step, 0.02, &[4]);
        assert_eq!(seen, vec![vec![4], vec![]]);
    }

    #[test]
    fn exit_stops_the_remaining_ticks() {
        let mut step: FixedStep<u32> = FixedStep::new();
        let mut runs = 0;
        let flow = step.advance(1., &[], |_, _| {
            runs += 1;
            Flow::Exit
        });
        assert_eq!(flow, Flow::Exit);
        assert_eq!(runs, 1);
    }

    #[test]
    fn reports_once_per_second() {
        let mut counter = FpsCounter::new();
        let reports: Vec<u32> = (0..250).filter_map(|_| counter.frame(0.01)).collect();
        // 0.01 doesn't add up to exactly 1.0, so a report may slip by one frame
        assert_eq!(reports.len(), 2);
        for fps in reports {
            assert!(fps == 100 || fps == 101, "unexpected fps {}", fps);
        }
    }

    #[test]
    fn slow_frame_reports_immediately() {
        let mut counter = FpsCounter::new();
        assert_eq!(counter.frame(0.5), None);
        assert_eq!(counter.frame(0.75), Some(2));
        assert_eq!(counter.frame(0.1), None);
    }
}
