//! In-flight visual sequences.
//!
//! Every running animation is one [`Effect`] record in an [`EffectQueue`].
//! Each frame the queue advances every record, collects the [`Command`]s they
//! emit (impacts, explosions, shake...) and drops the ones that finished.
//! The simulation applies the commands after the whole queue has advanced.

use crate::game::damage::Impact;
use crate::game::weapon::Tool;
use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

pub const SPARK_COLOR: u32 = 0xff4422;
pub const FLAME_COLOR: u32 = 0xffcc44;
pub const LIGHT_COLOR: u32 = 0xff6600;
pub const FLARE_COLOR: u32 = 0xffaa00;

const SPARKS_PER_BURST: usize = 3;
const FLAMES_PER_BURST: usize = 6;
const BURSTS_PER_EXPLOSION: usize = 20;
const EXPLOSION_LIGHT_MS: f32 = 200.0;
const EXPLOSION_LIGHT_INTENSITY: f32 = 30.0;
const BLACK_HOLE_FRAMES: u32 = 30;
const BLACK_HOLE_GROWTH: f32 = 1.05;
const FLARE_FRAMES: u32 = 40;

/// Side effects emitted by an advancing record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Deform(Impact),
    BigExplosion { at: Vec3, size: f32 },
    Sparks(Vec3),
    Debris { at: Vec3, count: usize },
    Shake(f32),
    Flash(f32),
    LaunchMeteor(Vec3),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlightKind {
    Missile,
    Meteor,
    Moon,
}

impl FlightKind {
    /// Progress gained per frame; the flight lands at 1.0.
    pub fn step(self) -> f32 {
        match self {
            FlightKind::Missile => 0.05,
            FlightKind::Meteor => 0.06,
            FlightKind::Moon => 0.012,
        }
    }

    fn landing(self, at: Vec3, out: &mut Vec<Command>) {
        match self {
            FlightKind::Missile => {
                out.push(Command::BigExplosion { at, size: 3.0 });
                out.push(Command::Deform(Tool::Missile.impact_at(at)));
                out.push(Command::Debris { at, count: 8 });
                out.push(Command::Shake(1.0));
                out.push(Command::Flash(0.4));
            }
            FlightKind::Meteor => {
                out.push(Command::Sparks(at));
                out.push(Command::Deform(Tool::Meteors.impact_at(at)));
            }
            FlightKind::Moon => {
                out.push(Command::BigExplosion { at, size: 10.0 });
                out.push(Command::Deform(Tool::Moon.impact_at(at)));
                out.push(Command::Shake(3.0));
                out.push(Command::Flash(0.8));
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flight {
    pub kind: FlightKind,
    pub start: Vec3,
    pub target: Vec3,
    pub frames: u32,
}

impl Flight {
    pub fn new(kind: FlightKind, start: Vec3, target: Vec3) -> Self {
        Self {
            kind,
            start,
            target,
            frames: 0,
        }
    }

    pub fn progress(&self) -> f32 {
        (self.frames as f32 * self.kind.step()).min(1.0)
    }

    pub fn position(&self) -> Vec3 {
        self.start.lerp(self.target, self.progress())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    Spark,
    Flame,
    Debris,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub position: Vec3,
    pub velocity: Vec3,
    pub age: u32,
    pub color: u32,
}

impl Particle {
    pub fn new(kind: ParticleKind, position: Vec3, velocity: Vec3, color: u32) -> Self {
        Self {
            kind,
            position,
            velocity,
            age: 0,
            color,
        }
    }

    fn decay(&self) -> f32 {
        match self.kind {
            ParticleKind::Spark | ParticleKind::Flame => 0.05,
            ParticleKind::Debris => 0.025,
        }
    }

    /// Remaining life in `[0, 1]`, shrinking linearly with age.
    pub fn life(&self) -> f32 {
        (1.0 - self.age as f32 * self.decay()).max(0.0)
    }

    pub fn scale(&self) -> f32 {
        match self.kind {
            ParticleKind::Flame => self.life() * 1.5,
            _ => self.life(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolarFlare {
    /// Euler angles of the arc.
    pub rotation: Vec3,
    pub radius: f32,
    pub age: u32,
}

impl SolarFlare {
    pub fn scale(&self) -> f32 {
        1.0 + self.age as f32 * 0.01
    }

    pub fn opacity(&self) -> f32 {
        (0.8 - self.age as f32 * 0.02).max(0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    Flight(Flight),
    Laser {
        origin: Vec3,
        target: Vec3,
        remaining_ms: f32,
    },
    PendingMeteor {
        target: Vec3,
        delay_ms: f32,
    },
    BlackHole {
        at: Vec3,
        scale: f32,
        frames: u32,
    },
    Particle(Particle),
    Light {
        at: Vec3,
        range: f32,
        intensity: f32,
        remaining_ms: f32,
    },
    SolarFlare(SolarFlare),
}

impl Effect {
    /// Moves the record one frame forward. Returns false once it is finished.
    pub fn advance(&mut self, dt_ms: f32, out: &mut Vec<Command>) -> bool {
        match self {
            Effect::Flight(flight) => {
                flight.frames += 1;
                if (flight.frames as f32 * flight.kind.step()) < 1.0 {
                    return true;
                }
                flight.kind.landing(flight.target, out);
                false
            }
            Effect::Laser { remaining_ms, .. } | Effect::Light { remaining_ms, .. } => {
                *remaining_ms -= dt_ms;
                *remaining_ms > 0.0
            }
            Effect::PendingMeteor { target, delay_ms } => {
                *delay_ms -= dt_ms;
                if *delay_ms > 0.0 {
                    return true;
                }
                out.push(Command::LaunchMeteor(*target));
                false
            }
            Effect::BlackHole { at, scale, frames } => {
                *scale *= BLACK_HOLE_GROWTH;
                out.push(Command::Deform(Tool::BlackHole.impact_at(*at)));
                *frames += 1;
                *frames < BLACK_HOLE_FRAMES
            }
            Effect::Particle(particle) => {
                particle.position += particle.velocity;
                particle.age += 1;
                particle.life() > 0.0
            }
            Effect::SolarFlare(flare) => {
                flare.age += 1;
                flare.age < FLARE_FRAMES
            }
        }
    }
}

#[derive(Default)]
pub struct EffectQueue {
    effects: Vec<Effect>,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn extend(&mut self, effects: impl IntoIterator<Item = Effect>) {
        self.effects.extend(effects);
    }

    pub fn advance(&mut self, dt_ms: f32) -> Vec<Command> {
        let mut commands = Vec::new();
        self.effects.retain_mut(|effect| effect.advance(dt_ms, &mut commands));
        commands
    }

    /// Drops every in-flight record, returning how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.effects.len();
        self.effects.clear();
        cancelled
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }
}

fn spread(rng: &mut ChaCha8Rng, extent: f32) -> Vec3 {
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * extent,
        (rng.gen::<f32>() - 0.5) * extent,
        (rng.gen::<f32>() - 0.5) * extent,
    )
}

pub fn spark_burst(at: Vec3, rng: &mut ChaCha8Rng) -> Vec<Effect> {
    (0..SPARKS_PER_BURST)
        .map(|_| {
            Effect::Particle(Particle::new(
                ParticleKind::Spark,
                at,
                spread(rng, 0.4),
                SPARK_COLOR,
            ))
        })
        .collect()
}

pub fn flame_burst(at: Vec3, rng: &mut ChaCha8Rng) -> Vec<Effect> {
    (0..FLAMES_PER_BURST)
        .map(|_| {
            let position = at + spread(rng, 0.3);
            Effect::Particle(Particle::new(
                ParticleKind::Flame,
                position,
                spread(rng, 0.2),
                FLAME_COLOR,
            ))
        })
        .collect()
}

pub fn debris_burst(at: Vec3, count: usize, color: u32, rng: &mut ChaCha8Rng) -> Vec<Effect> {
    (0..count)
        .map(|_| {
            let position = at + spread(rng, 1.0);
            Effect::Particle(Particle::new(
                ParticleKind::Debris,
                position,
                spread(rng, 0.5),
                color,
            ))
        })
        .collect()
}

/// A short-lived point light plus a cloud of spark bursts around `at`.
pub fn big_explosion(at: Vec3, size: f32, rng: &mut ChaCha8Rng) -> Vec<Effect> {
    let mut effects = vec![Effect::Light {
        at,
        range: size * 3.0,
        intensity: EXPLOSION_LIGHT_INTENSITY,
        remaining_ms: EXPLOSION_LIGHT_MS,
    }];
    for _ in 0..BURSTS_PER_EXPLOSION {
        let center = at + spread(rng, size * 0.5);
        effects.extend(spark_burst(center, rng));
    }
    effects
}

pub fn solar_flare(body_radius: f32, rng: &mut ChaCha8Rng) -> Effect {
    let turn = std::f32::consts::PI;
    Effect::SolarFlare(SolarFlare {
        rotation: Vec3::new(
            rng.gen::<f32>() * turn,
            rng.gen::<f32>() * turn,
            rng.gen::<f32>() * turn,
        ),
        radius: body_radius * 0.95,
        age: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn run_to_completion(effect: Effect, dt_ms: f32) -> (usize, Vec<Command>) {
        let mut queue = EffectQueue::new();
        queue.push(effect);
        let mut frames = 0;
        let mut commands = Vec::new();
        while !queue.is_empty() {
            commands.extend(queue.advance(dt_ms));
            frames += 1;
            assert!(frames < 10_000, "effect never finished");
        }
        (frames, commands)
    }

    #[test]
    fn missile_lands_after_twenty_frames() {
        let target = Vec3::new(0.0, 0.0, 5.0);
        let flight = Flight::new(FlightKind::Missile, Vec3::new(5.0, 5.0, 17.5), target);
        let (frames, commands) = run_to_completion(Effect::Flight(flight), 16.0);
        assert_eq!(frames, 20);
        assert_eq!(
            commands,
            vec![
                Command::BigExplosion { at: target, size: 3.0 },
                Command::Deform(Impact {
                    point: target,
                    radius: 2.5,
                    strength: -0.8
                }),
                Command::Debris { at: target, count: 8 },
                Command::Shake(1.0),
                Command::Flash(0.4),
            ]
        );
    }

    #[test]
    fn moon_is_slow_and_heavy() {
        let target = Vec3::new(0.0, 5.0, 0.0);
        let flight = Flight::new(FlightKind::Moon, Vec3::new(0.0, 40.0, 0.0), target);
        let (frames, commands) = run_to_completion(Effect::Flight(flight), 16.0);
        assert_eq!(frames, 84);
        assert!(commands.contains(&Command::Deform(Impact {
            point: target,
            radius: 6.0,
            strength: -3.0
        })));
        assert!(commands.contains(&Command::Shake(3.0)));
    }

    #[test]
    fn black_hole_deforms_every_frame_for_thirty_frames() {
        let at = Vec3::new(5.0, 0.0, 0.0);
        let (frames, commands) = run_to_completion(
            Effect::BlackHole {
                at,
                scale: 1.0,
                frames: 0,
            },
            16.0,
        );
        assert_eq!(frames, 30);
        assert_eq!(commands.len(), 30);
        assert!(commands.iter().all(|c| *c
            == Command::Deform(Impact {
                point: at,
                radius: 2.5,
                strength: -0.1
            })));
    }

    #[test]
    fn timed_effects_expire_by_wall_clock() {
        let laser = Effect::Laser {
            origin: Vec3::ZERO,
            target: Vec3::Z,
            remaining_ms: 50.0,
        };
        let (frames, commands) = run_to_completion(laser, 16.0);
        assert_eq!(frames, 4);
        assert!(commands.is_empty());

        let pending = Effect::PendingMeteor {
            target: Vec3::X,
            delay_ms: 120.0,
        };
        let (frames, commands) = run_to_completion(pending, 60.0);
        assert_eq!(frames, 2);
        assert_eq!(commands, vec![Command::LaunchMeteor(Vec3::X)]);
    }

    #[test]
    fn particles_fade_and_move() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let sparks = spark_burst(Vec3::ZERO, &mut rng);
        assert_eq!(sparks.len(), 3);
        let (frames, _) = run_to_completion(sparks[0], 16.0);
        assert_eq!(frames, 20);

        let debris = debris_burst(Vec3::ZERO, 8, 0xffffff, &mut rng);
        assert_eq!(debris.len(), 8);
        let (frames, _) = run_to_completion(debris[0], 16.0);
        assert_eq!(frames, 40);

        let mut flame = flame_burst(Vec3::ZERO, &mut rng)[0];
        let mut sink = Vec::new();
        flame.advance(16.0, &mut sink);
        match flame {
            Effect::Particle(p) => assert!((p.scale() - 0.95 * 1.5).abs() < 1e-5),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn big_explosion_spawns_light_and_sparks() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let effects = big_explosion(Vec3::ZERO, 3.0, &mut rng);
        assert_eq!(effects.len(), 1 + 20 * 3);
        match effects[0] {
            Effect::Light { range, .. } => assert_eq!(range, 9.0),
            other => panic!("expected light, got {other:?}"),
        }
        for effect in &effects[1..] {
            if let Effect::Particle(p) = effect {
                assert!(p.position.abs().max_element() <= 0.75);
            }
        }
    }

    #[test]
    fn solar_flare_fades_out() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let flare = solar_flare(10.0, &mut rng);
        let (frames, commands) = run_to_completion(flare, 16.0);
        assert_eq!(frames, 40);
        assert!(commands.is_empty());
    }

    #[test]
    fn cancel_all_empties_the_queue() {
        let mut queue = EffectQueue::new();
        queue.push(Effect::BlackHole {
            at: Vec3::ZERO,
            scale: 1.0,
            frames: 0,
        });
        queue.push(Effect::PendingMeteor {
            target: Vec3::ZERO,
            delay_ms: 500.0,
        });
        assert_eq!(queue.cancel_all(), 2);
        assert!(queue.is_empty());
        assert!(queue.advance(16.0).is_empty());
    }
}
