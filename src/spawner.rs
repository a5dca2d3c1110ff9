//! Particle spawner
//!
//! Owns the stage it is mounted on, the repeating spawn timer and every
//! particle's scheduled lifecycle events. Time is virtual: the caller feeds
//! `advance` with elapsed milliseconds and the spawner fires whatever came
//! due, in order.

use crate::config::{MountConfig, SpawnerConfig};
use crate::error::MountError;
use crate::particle::{Particle, ParticleId, ParticleKind};
use crate::scheduler::{Millis, Scheduler, TimerHandle};
use crate::stage::{Region, Stage, ToggleControl};
use rand::Rng;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Task {
    SpawnTick,
    FadeOut(ParticleId),
    Remove(ParticleId),
}

pub struct Spawner<R: Rng> {
    config: SpawnerConfig,
    stage: Stage,
    container: usize,
    rng: R,
    scheduler: Scheduler<Task>,
    timer: Option<TimerHandle>,
    running: bool,
    reduced_motion: bool,
    now: Millis,
    next_id: u64,
    // Inserted but not yet animated; flushed on the next frame
    awaiting_frame: Vec<ParticleId>,
}

impl<R: Rng> Spawner<R> {
    /// Resolve the container and boot: spawning starts unless motion is
    /// reduced, in which case the toggle is hidden for good.
    pub fn mount(
        stage: Stage,
        mount: &MountConfig,
        config: SpawnerConfig,
        reduced_motion: bool,
        rng: R,
    ) -> Result<Self, MountError> {
        let container = stage.resolve(mount)?;
        let mut spawner = Self {
            config,
            stage,
            container,
            rng,
            scheduler: Scheduler::new(),
            timer: None,
            running: true,
            reduced_motion,
            now: 0,
            next_id: 0,
            awaiting_frame: Vec::new(),
        };

        if reduced_motion {
            info!("reduced motion requested; spawning disabled");
            spawner.stage.toggle.hidden = true;
        } else {
            spawner.start_spawning();
        }
        Ok(spawner)
    }

    /// Insert one particle of `kind`. Does nothing under reduced motion.
    pub fn spawn_one(&mut self, kind: ParticleKind) -> Option<ParticleId> {
        if self.reduced_motion {
            return None;
        }

        let id = ParticleId(self.next_id);
        self.next_id += 1;

        let now = self.now;
        let bounds = self.container().size_px();
        let particle = Particle::sample(id, kind, bounds, &self.config, &mut self.rng, now);
        debug!(
            id = id.0,
            class = kind.class(),
            x = particle.x,
            y = particle.y,
            size = particle.size,
            lifetime_ms = particle.lifetime_ms,
            "spawned particle"
        );

        self.scheduler.once(now + particle.lifetime_ms, Task::FadeOut(id));
        self.scheduler.once(particle.expires_at, Task::Remove(id));
        self.stage.region_mut(self.container).append(particle);
        self.awaiting_frame.push(id);
        Some(id)
    }

    /// Arm the repeating spawn timer unless it already is
    pub fn start_spawning(&mut self) {
        if self.timer.is_some() {
            return;
        }
        let handle = self.scheduler.repeating(self.now, self.config.spawn_interval_ms, Task::SpawnTick);
        self.timer = Some(handle);
        info!(interval_ms = self.config.spawn_interval_ms, "spawning started");
    }

    pub fn stop_spawning(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.scheduler.cancel(handle);
            info!("spawning stopped");
        }
    }

    /// Flip between running and paused. A hidden control can't be pressed.
    pub fn toggle(&mut self) {
        if self.stage.toggle.hidden {
            return;
        }
        self.running = !self.running;
        self.stage.toggle.show_running(self.running);
        if self.running {
            self.start_spawning();
        } else {
            self.stop_spawning();
        }
    }

    /// Fire everything due up to `now`
    pub fn advance(&mut self, now: Millis) {
        let now = now.max(self.now);

        // Entrance transitions start on the frame after insertion
        for id in std::mem::take(&mut self.awaiting_frame) {
            if let Some(particle) = self.stage.region_mut(self.container).get_mut(id) {
                particle.appear(now, &self.config);
            }
        }

        while let Some((due, task)) = self.scheduler.pop_due(now) {
            self.now = due;
            match task {
                Task::SpawnTick => self.tick(),
                Task::FadeOut(id) => {
                    if let Some(particle) = self.stage.region_mut(self.container).get_mut(id) {
                        particle.fade_out(due, &self.config);
                    }
                }
                Task::Remove(id) => {
                    if self.stage.region_mut(self.container).remove(id).is_some() {
                        debug!(id = id.0, "removed particle");
                    }
                }
            }
        }
        self.now = now;
    }

    fn tick(&mut self) {
        let kind = if self.rng.gen_bool(self.config.heart_weight) {
            ParticleKind::Heart
        } else {
            ParticleKind::Flower
        };
        self.spawn_one(kind);

        if self.rng.gen_bool(self.config.burst_probability) {
            self.spawn_one(ParticleKind::Flower);
            self.spawn_one(ParticleKind::Heart);
        }
    }

    /// Terminal was resized. Only future spawns see the new bounds.
    pub fn resize(&mut self, cols: u16, rows: u16, pixels: (u16, u16)) {
        self.stage.resize(cols, rows, pixels);
    }

    pub fn container(&self) -> &Region {
        self.stage.region(self.container)
    }

    pub fn toggle_control(&self) -> &ToggleControl {
        &self.stage.toggle
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(test)]
    pub fn timer_active(&self) -> bool {
        self.timer.is_some_and(|handle| self.scheduler.is_armed(handle))
    }
}
