use bevy::color::Mix;
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::PI;
use crate::core::instance_buffer::ClassBuffer;
use crate::core::morph_config::TwinkleConfig;

/// One short highlight over a single instance's color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwinkleTask {
    pub target_index: usize,
    pub start_time: f64,
    pub duration: f32,
    /// Color shown when the task started; written back bit-for-bit on completion.
    pub original_color: LinearRgba,
}

impl TwinkleTask {
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (((now - self.start_time) / self.duration as f64) as f32).clamp(0.0, 1.0)
    }
}

/// Bounded pool of concurrent highlight tasks, one slot per allowed task.
#[derive(Debug, Clone, Default)]
pub struct TwinkleScheduler {
    slots: Vec<Option<TwinkleTask>>,
    clock: f64,
    next_trigger_at: f64,
}

impl TwinkleScheduler {
    pub fn new(max_active: usize) -> Self {
        TwinkleScheduler {
            slots: vec![None; max_active],
            clock: 0.0,
            next_trigger_at: 0.0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &TwinkleTask> {
        self.slots.iter().flatten()
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.tasks().any(|t| t.target_index == index)
    }

    /// Drops every task without touching colors. Used when the colors it
    /// would restore have been regenerated anyway.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    /// Completes every active task, restoring each original color.
    pub fn finish_all(&mut self, buffer: &mut ClassBuffer) {
        for slot in &mut self.slots {
            if let Some(task) = slot.take() {
                buffer.write_color(task.target_index, task.original_color);
            }
        }
    }

    /// Changes the concurrent task cap. Tasks in removed slots finish immediately.
    pub fn set_capacity(&mut self, max_active: usize, buffer: &mut ClassBuffer) {
        if max_active < self.slots.len() {
            for task in self.slots.drain(max_active..).flatten() {
                buffer.write_color(task.target_index, task.original_color);
            }
        } else {
            self.slots.resize(max_active, None);
        }
    }

    pub fn update(&mut self, dt: f32, buffer: &mut ClassBuffer, config: &TwinkleConfig, rng: &mut impl Rng) {
        if dt.is_finite() && dt > 0.0 {
            self.clock += dt as f64;
        }
        if self.slots.len() != config.max_active {
            self.set_capacity(config.max_active, buffer);
        }

        self.advance_tasks(buffer, config);

        if self.clock >= self.next_trigger_at && self.active_count() < self.slots.len() {
            self.try_start(buffer, config, rng);
            self.next_trigger_at = self.clock + config.cadence.sample(rng) as f64;
        }
    }

    fn advance_tasks(&mut self, buffer: &mut ClassBuffer, config: &TwinkleConfig) {
        let now = self.clock;
        for slot in &mut self.slots {
            let Some(task) = *slot else { continue };
            let progress = task.progress(now);
            if progress >= 1.0 {
                buffer.write_color(task.target_index, task.original_color);
                *slot = None;
                continue;
            }
            let intensity = (PI * progress).sin().clamp(0.0, 1.0);
            let color = task.original_color.mix(&config.highlight, intensity * config.strength);
            buffer.write_color(task.target_index, color);
        }
    }

    // Gives up quietly when every attempt lands on a busy index.
    fn try_start(&mut self, buffer: &ClassBuffer, config: &TwinkleConfig, rng: &mut impl Rng) {
        let len = buffer.colors().len();
        if len == 0 {
            return;
        }
        for _ in 0..config.max_attempts {
            let index = rng.gen_range(0..len);
            if self.is_active(index) {
                continue;
            }
            let Some(original_color) = buffer.color(index) else { return };
            let Some(slot) = self.slots.iter_mut().find(|s| s.is_none()) else { return };
            *slot = Some(TwinkleTask {
                target_index: index,
                start_time: self.clock,
                duration: config.duration.sample(rng),
                original_color,
            });
            return;
        }
        debug!("twinkle skipped: {} attempts all hit active instances", config.max_attempts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::morph_config::{FloatRange, MorphConfig};
    use crate::spawning::helpers::GenRng;
    use std::collections::HashSet;

    const TICK: f32 = 1.0 / 60.0;

    fn palette_buffer(len: usize) -> (ClassBuffer, Vec<LinearRgba>) {
        let colors: Vec<LinearRgba> = (0..len)
            .map(|i| LinearRgba::new(i as f32 * 0.013, 0.2, 0.7 - i as f32 * 0.001, 1.0))
            .collect();
        let mut buffer = ClassBuffer::default();
        buffer.resize(len);
        buffer.set_colors(colors.clone());
        (buffer, colors)
    }

    #[test]
    fn cap_and_uniqueness_hold_every_frame() {
        let config = MorphConfig::default().twinkle;
        let (mut buffer, _) = palette_buffer(12);
        let mut gen_rng = GenRng::new(9);
        let mut scheduler = TwinkleScheduler::new(config.max_active);
        let mut peak = 0;

        for _ in 0..3000 {
            scheduler.update(TICK, &mut buffer, &config, gen_rng.rng_mut());
            let indices: HashSet<usize> = scheduler.tasks().map(|t| t.target_index).collect();
            assert!(scheduler.active_count() <= config.max_active);
            assert_eq!(indices.len(), scheduler.active_count());
            peak = peak.max(scheduler.active_count());
        }
        assert_eq!(peak, config.max_active);
    }

    #[test]
    fn every_completed_task_restores_its_color_exactly() {
        let config = MorphConfig::default().twinkle;
        let (mut buffer, original) = palette_buffer(40);
        let mut gen_rng = GenRng::new(10);
        let mut scheduler = TwinkleScheduler::new(config.max_active);

        for _ in 0..1200 {
            scheduler.update(TICK, &mut buffer, &config, gen_rng.rng_mut());
            for (i, color) in buffer.colors().iter().enumerate() {
                if !scheduler.is_active(i) {
                    assert_eq!(*color, original[i], "index {} left tinted", i);
                }
            }
        }

        scheduler.finish_all(&mut buffer);
        assert_eq!(buffer.colors(), original.as_slice());
    }

    #[test]
    fn flash_peaks_mid_task_toward_highlight() {
        let mut config = MorphConfig::default().twinkle;
        config.max_active = 1;
        config.duration = FloatRange::new(0.5, 0.5);
        config.cadence = FloatRange::new(100.0, 100.0);
        let (mut buffer, original) = palette_buffer(1);
        let mut gen_rng = GenRng::new(1);
        let mut scheduler = TwinkleScheduler::new(1);

        scheduler.update(TICK, &mut buffer, &config, gen_rng.rng_mut());
        assert_eq!(scheduler.active_count(), 1);
        // advance to the middle of the flash
        scheduler.update(0.25, &mut buffer, &config, gen_rng.rng_mut());
        let peak = buffer.colors()[0];
        let expected = original[0].mix(&config.highlight, config.strength);
        assert!((peak.red - expected.red).abs() < 1e-3);
        assert!(peak.green > original[0].green);

        scheduler.update(0.3, &mut buffer, &config, gen_rng.rng_mut());
        assert_eq!(scheduler.active_count(), 0);
        assert_eq!(buffer.colors()[0], original[0]);
    }

    #[test]
    fn starts_are_gated_by_the_cadence_window() {
        let mut config = MorphConfig::default().twinkle;
        config.max_active = 50;
        config.cadence = FloatRange::new(1.0, 1.0);
        config.duration = FloatRange::new(100.0, 100.0);
        let (mut buffer, _) = palette_buffer(200);
        let mut gen_rng = GenRng::new(6);
        let mut scheduler = TwinkleScheduler::new(config.max_active);

        let mut start_ticks = Vec::new();
        let mut active = 0;
        for tick in 0..600 {
            scheduler.update(TICK, &mut buffer, &config, gen_rng.rng_mut());
            let now = scheduler.active_count();
            assert!(now <= active + 1);
            if now > active {
                start_ticks.push(tick);
            }
            active = now;
        }

        // ten simulated seconds with a one second window
        assert!((10..=11).contains(&start_ticks.len()), "starts = {:?}", start_ticks);
        for pair in start_ticks.windows(2) {
            assert!(pair[1] - pair[0] >= 59, "starts = {:?}", start_ticks);
        }
    }

    #[test]
    fn zero_duration_tasks_restore_on_the_next_frame() {
        let mut config = MorphConfig::default().twinkle;
        config.duration = FloatRange::new(0.0, 0.0);
        let (mut buffer, original) = palette_buffer(8);
        let mut gen_rng = GenRng::new(2);
        let mut scheduler = TwinkleScheduler::new(config.max_active);
        for _ in 0..200 {
            scheduler.update(TICK, &mut buffer, &config, gen_rng.rng_mut());
            assert!(scheduler.active_count() <= 1);
        }
        scheduler.finish_all(&mut buffer);
        assert_eq!(buffer.colors(), original.as_slice());
    }

    #[test]
    fn saturated_pool_skips_instead_of_blocking() {
        let mut config = MorphConfig::default().twinkle;
        config.max_active = 3;
        config.duration = FloatRange::new(10.0, 10.0);
        config.cadence = FloatRange::new(0.0, 0.0);
        let (mut buffer, _) = palette_buffer(2);
        let mut gen_rng = GenRng::new(3);
        let mut scheduler = TwinkleScheduler::new(3);
        for _ in 0..50 {
            scheduler.update(TICK, &mut buffer, &config, gen_rng.rng_mut());
        }
        // only two distinct indices exist
        assert_eq!(scheduler.active_count(), 2);
    }

    #[test]
    fn empty_pool_never_starts_tasks() {
        let config = MorphConfig::default().twinkle;
        let mut buffer = ClassBuffer::default();
        let mut gen_rng = GenRng::new(4);
        let mut scheduler = TwinkleScheduler::new(config.max_active);
        for _ in 0..100 {
            scheduler.update(TICK, &mut buffer, &config, gen_rng.rng_mut());
        }
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn shrinking_capacity_restores_dropped_tasks() {
        let mut config = MorphConfig::default().twinkle;
        config.cadence = FloatRange::new(0.0, 0.0);
        config.duration = FloatRange::new(5.0, 5.0);
        let (mut buffer, original) = palette_buffer(30);
        let mut gen_rng = GenRng::new(5);
        let mut scheduler = TwinkleScheduler::new(config.max_active);
        for _ in 0..30 {
            scheduler.update(TICK, &mut buffer, &config, gen_rng.rng_mut());
        }
        assert_eq!(scheduler.active_count(), config.max_active);

        config.max_active = 0;
        scheduler.update(TICK, &mut buffer, &config, gen_rng.rng_mut());
        assert_eq!(scheduler.capacity(), 0);
        assert_eq!(buffer.colors(), original.as_slice());
    }
}
