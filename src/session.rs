//! One round of play, from spawning the cell's cargo to the last capture.
//!
//! [`Session`] owns every piece of gameplay state and is advanced by
//! [`Session::tick`], one call per 60 Hz frame.  It never touches Bevy's ECS,
//! windows, or the clock, so the whole game can be driven from a test with a
//! scripted [`FrameInput`] sequence.
//!
//! ## Frame order
//!
//! 1. forfeit command
//! 2. once-per-second fission roll
//! 3. autophagosome drag, motion and release
//! 4. free cargo physics
//! 5. particles
//! 6. phagophore gesture (only while no AP exists)
//! 7. end-of-session check

use bevy::log::{debug, info};
use bevy::math::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::autophagosome::Autophagosome;
use crate::cargo::{Cargo, CargoId, CargoKind, CargoOverrides};
use crate::config::SessionConfig;
use crate::containment::check_trapped;
use crate::fission::{can_split, daughters, largest_mitochondrion};
use crate::geometry::is_in_bounds;
use crate::gesture::{GestureOutcome, GestureTracker, ShapeEstimate};
use crate::particles::{spawn_release_particles, update_particles, Particle};

/// Input sampled for a single frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Primary button held this frame.
    pub pressed: bool,
    /// Pointer location in screen space.
    pub pointer: Vec2,
    /// Give up the round: clear the cell and zero the score.
    pub forfeit: bool,
    /// Same sample as the previous tick.  Pointer motion is not applied
    /// twice, so a held AP keeps the velocity of the last real drag.
    pub repeat: bool,
}

/// Something observable that happened during a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PhagophoreStarted { anchor: Vec2 },
    /// Released outside the hit circle.
    Missed { penalty: i64 },
    /// Timed out away from the PAS; a pill was dropped into the cell.
    TimeoutPenalty { pill: CargoId },
    /// A closed loop too small to become an AP.
    Discarded { area: f32 },
    ApFormed { trapped: Vec<CargoId>, radius: f32 },
    /// The AP left the stage and the cargo it carried out was scored.
    ApReleased { removed: Vec<CargoId>, score_delta: i64 },
    Fission { parent: CargoId, daughters: [CargoId; 2] },
    Forfeited,
    Finished { score: i64 },
}

/// Everything a single tick did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub events: Vec<SessionEvent>,
    /// Net change in score over the tick.
    pub score_delta: i64,
}

pub struct Session {
    config: SessionConfig,
    rng: StdRng,
    cargo: Vec<Cargo>,
    ap: Option<Autophagosome>,
    gesture: GestureTracker,
    particles: Vec<Particle>,
    score: i64,
    attempts: u32,
    ticks: u64,
    ticks_this_second: u32,
    elapsed_secs: u32,
    flash_remaining: u32,
    previous_pointer: Option<Vec2>,
    next_cargo_id: u64,
    next_particle_id: u64,
    /// Width a mitochondrion spawns with; fission stops at a fraction of it.
    mito_spawn_width: f32,
    running: bool,
}

impl Session {
    /// Start a session and populate the cell with its opening cargo.
    pub fn new(config: SessionConfig, seed: u64) -> Self {
        let gesture = GestureTracker::new(config.profile.timeout_samples, config.hit_radius);
        let mito_spawn_width = config
            .scale
            .length(CargoKind::Mitochondrion.spec().footprint.x);
        let mut session = Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            cargo: Vec::new(),
            ap: None,
            gesture,
            particles: Vec::new(),
            score: 0,
            attempts: 0,
            ticks: 0,
            ticks_this_second: 0,
            elapsed_secs: 0,
            flash_remaining: 0,
            previous_pointer: None,
            next_cargo_id: 0,
            next_particle_id: 0,
            mito_spawn_width,
            running: true,
        };
        session.spawn_opening_cargo();
        info!(
            "Session started: {} cargo on {} ({}x{})",
            session.cargo.len(),
            session.config.difficulty,
            session.config.screen.x,
            session.config.screen.y
        );
        session
    }

    fn spawn_opening_cargo(&mut self) {
        let plan = [
            (CargoKind::Mitochondrion, self.config.mito_count),
            (CargoKind::Ribosome, self.config.ribo_count),
            (CargoKind::Rna, self.config.rna_count),
        ];
        for (kind, count) in plan {
            for _ in 0..count {
                self.spawn_cargo(kind, CargoOverrides::default());
            }
        }
    }

    fn allocate_id(&mut self) -> CargoId {
        let id = CargoId(self.next_cargo_id);
        self.next_cargo_id += 1;
        id
    }

    /// Add a cargo to the cell and return its id.
    pub fn spawn_cargo(&mut self, kind: CargoKind, overrides: CargoOverrides) -> CargoId {
        let id = self.allocate_id();
        let cargo = Cargo::spawn(id, kind, &self.config, overrides, &mut self.rng);
        self.cargo.push(cargo);
        id
    }

    /// Advance the session by one frame.
    pub fn tick(&mut self, input: &FrameInput) -> TickReport {
        let mut report = TickReport::default();
        if !self.running {
            return report;
        }
        self.ticks += 1;
        self.flash_remaining = self.flash_remaining.saturating_sub(1);

        if input.forfeit {
            self.forfeit(&mut report);
        } else {
            self.advance_clock(&mut report);
            self.update_autophagosome(input, &mut report);
            for cargo in &mut self.cargo {
                cargo.update(&self.config, &mut self.rng);
            }
            update_particles(&mut self.particles);
            if self.ap.is_none() {
                self.update_gesture(input, &mut report);
            }
            self.previous_pointer = Some(input.pointer);
        }

        if self.good_cargo_remaining() == 0 {
            self.running = false;
            info!("Session finished with score {}", self.score);
            report.events.push(SessionEvent::Finished { score: self.score });
        }
        report
    }

    fn add_score(&mut self, delta: i64, report: &mut TickReport) {
        self.score += delta;
        report.score_delta += delta;
    }

    fn forfeit(&mut self, report: &mut TickReport) {
        self.cargo.clear();
        self.ap = None;
        let delta = -self.score;
        self.add_score(delta, report);
        report.events.push(SessionEvent::Forfeited);
    }

    // ── Fission ──────────────────────────────────────────────────────────────

    fn advance_clock(&mut self, report: &mut TickReport) {
        self.ticks_this_second += 1;
        if self.ticks_this_second < self.config.tick_rate {
            return;
        }
        self.ticks_this_second = 0;
        self.elapsed_secs += 1;
        if self.rng.gen_bool(self.config.fission_chance) {
            self.try_fission(report);
        }
    }

    fn try_fission(&mut self, report: &mut TickReport) {
        let Some(index) = largest_mitochondrion(&self.cargo) else {
            return;
        };
        if !can_split(
            self.cargo[index].footprint.x,
            self.mito_spawn_width,
            self.config.fission_floor,
        ) {
            return;
        }
        let parent = self.cargo.remove(index);
        let ids = [self.allocate_id(), self.allocate_id()];
        let children = daughters(&parent, ids, &self.config, &mut self.rng);
        self.cargo.extend(children);
        debug!("Fission: {:?} -> {:?}", parent.id, ids);
        report.events.push(SessionEvent::Fission {
            parent: parent.id,
            daughters: ids,
        });
    }

    // ── Autophagosome ────────────────────────────────────────────────────────

    fn update_autophagosome(&mut self, input: &FrameInput, report: &mut TickReport) {
        let Some(ap) = self.ap.as_mut() else {
            return;
        };
        if !input.repeat {
            ap.drag(input.pressed, self.previous_pointer, input.pointer);
        }
        ap.advance();
        if !ap.has_left_stage(self.config.screen, self.config.ap_exit_buffer) {
            return;
        }
        if let Some(ap) = self.ap.take() {
            self.release(ap, report);
        }
    }

    /// The AP has left the cell: score whatever it carried out.
    fn release(&mut self, ap: Autophagosome, report: &mut TickReport) {
        let center = ap.center;
        let velocity = ap.velocity;
        let carried = ap.contents().len();
        self.cargo.extend(ap.into_contents());

        let screen = self.config.screen;
        let (gone, kept): (Vec<Cargo>, Vec<Cargo>) = std::mem::take(&mut self.cargo)
            .into_iter()
            .partition(|c| !is_in_bounds(c.bounds(), screen, 0.0));
        self.cargo = kept;
        // Anything the AP dropped on the way out drifts freely again.
        for cargo in &mut self.cargo {
            cargo.trapped = false;
        }

        let delta = gone.iter().map(|c| c.score_value).sum::<i64>() - self.config.ap_release_cost;
        self.add_score(delta, report);
        spawn_release_particles(
            &mut self.particles,
            &mut self.next_particle_id,
            center,
            velocity,
            carried,
            &mut self.rng,
        );
        debug!("AP released {} cargo for {} points", gone.len(), delta);
        report.events.push(SessionEvent::ApReleased {
            removed: gone.iter().map(|c| c.id).collect(),
            score_delta: delta,
        });
    }

    // ── Gesture ──────────────────────────────────────────────────────────────

    fn update_gesture(&mut self, input: &FrameInput, report: &mut TickReport) {
        let Some(outcome) = self.gesture.update(input.pressed, input.pointer) else {
            return;
        };
        match outcome {
            GestureOutcome::Started(anchor) => {
                report.events.push(SessionEvent::PhagophoreStarted { anchor });
            }
            GestureOutcome::Missed => {
                self.attempts += 1;
                let penalty = self.config.miss_penalty;
                self.add_score(-penalty, report);
                report.events.push(SessionEvent::Missed { penalty });
            }
            GestureOutcome::TimedOutOpen => {
                let pill = self.spawn_cargo(
                    CargoKind::Pill,
                    CargoOverrides {
                        score: Some(self.config.timeout_penalty),
                        ..Default::default()
                    },
                );
                self.flash_remaining = self.config.flash_frames;
                report.events.push(SessionEvent::TimeoutPenalty { pill });
            }
            GestureOutcome::Closed(shape) | GestureOutcome::TimedOutClosed(shape) => {
                self.form_autophagosome(&shape, report);
            }
        }
    }

    fn form_autophagosome(&mut self, shape: &ShapeEstimate, report: &mut TickReport) {
        if !shape.is_viable(self.config.min_area) {
            report.events.push(SessionEvent::Discarded { area: shape.area });
            return;
        }
        self.attempts += 1;
        let mut ap = Autophagosome::from_shape(shape, self.config.ap_sprite_scale);
        let trapped = check_trapped(&mut ap, &mut self.cargo);
        debug!("AP formed (r = {:.1}) trapping {:?}", ap.radius, trapped);
        report.events.push(SessionEvent::ApFormed {
            trapped,
            radius: ap.radius,
        });
        self.ap = Some(ap);
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[inline]
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Phagophores that resolved into a miss or an AP.
    #[inline]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Free cargo (everything not inside the AP).
    #[inline]
    pub fn cargo(&self) -> &[Cargo] {
        &self.cargo
    }

    #[inline]
    pub fn autophagosome(&self) -> Option<&Autophagosome> {
        self.ap.as_ref()
    }

    #[inline]
    pub fn gesture(&self) -> &GestureTracker {
        &self.gesture
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Whether the red timeout overlay should be drawn this frame.
    #[inline]
    pub fn is_flashing(&self) -> bool {
        self.flash_remaining > 0
    }

    #[inline]
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        !self.running
    }

    /// Good cargo still in the cell, free or trapped.
    pub fn good_cargo_remaining(&self) -> usize {
        let trapped = self
            .ap
            .as_ref()
            .map_or(0, |ap| ap.contents().iter().filter(|c| c.is_good()).count());
        self.cargo.iter().filter(|c| c.is_good()).count() + trapped
    }

    /// Find a cargo by id, free or trapped.
    pub fn find_cargo(&self, id: CargoId) -> Option<&Cargo> {
        self.cargo.iter().find(|c| c.id == id).or_else(|| {
            self.ap
                .as_ref()
                .and_then(|ap| ap.contents().iter().find(|c| c.id == id))
        })
    }
}
