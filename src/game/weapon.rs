use crate::error::DestructorError;
use crate::game::damage::Impact;
use crate::game::effect::{flame_burst, Command, Effect, Flight, FlightKind};
use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::str::FromStr;

const LASER_BEAM_MS: f32 = 50.0;
const METEOR_COUNT: usize = 8;
const METEOR_STAGGER_MS: f32 = 120.0;
const METEOR_SCATTER: f32 = 4.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tool {
    #[default]
    Missile,
    Laser,
    Meteors,
    BlackHole,
    Moon,
}

/// Falloff radius and peak displacement a tool hands to the damage model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImpactProfile {
    pub radius: f32,
    pub strength: f32,
}

impl Tool {
    pub const ALL: [Tool; 5] = [
        Tool::Missile,
        Tool::Laser,
        Tool::Meteors,
        Tool::BlackHole,
        Tool::Moon,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Missile => "missile",
            Tool::Laser => "laser",
            Tool::Meteors => "meteors",
            Tool::BlackHole => "blackhole",
            Tool::Moon => "moon",
        }
    }

    /// Only the laser keeps firing while the pointer is dragged.
    pub fn fires_on_drag(self) -> bool {
        self == Tool::Laser
    }

    pub fn profile(self) -> ImpactProfile {
        let (radius, strength) = match self {
            Tool::Missile => (2.5, -0.8),
            Tool::Laser => (1.2, -0.15),
            Tool::Meteors => (1.4, -0.4),
            Tool::BlackHole => (2.5, -0.1),
            Tool::Moon => (6.0, -3.0),
        };
        ImpactProfile { radius, strength }
    }

    pub fn impact_at(self, point: Vec3) -> Impact {
        let profile = self.profile();
        Impact {
            point,
            radius: profile.radius,
            strength: profile.strength,
        }
    }
}

impl FromStr for Tool {
    type Err = DestructorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Tool::ALL
            .into_iter()
            .find(|tool| tool.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DestructorError::UnknownTool(s.to_string()))
    }
}

/// What firing a tool starts: records to animate and commands to apply now.
#[derive(Debug, Default)]
pub struct Dispatch {
    pub effects: Vec<Effect>,
    pub commands: Vec<Command>,
}

pub fn dispatch(tool: Tool, target: Vec3, camera: Vec3, rng: &mut ChaCha8Rng) -> Dispatch {
    let mut out = Dispatch::default();
    match tool {
        Tool::Missile => {
            let start = camera + Vec3::new(5.0, 5.0, 0.0);
            out.effects
                .push(Effect::Flight(Flight::new(FlightKind::Missile, start, target)));
        }
        Tool::Laser => {
            out.effects.push(Effect::Laser {
                origin: camera,
                target,
                remaining_ms: LASER_BEAM_MS,
            });
            out.effects.extend(flame_burst(target, rng));
            out.commands.push(Command::Deform(tool.impact_at(target)));
        }
        Tool::Meteors => {
            out.effects.extend((0..METEOR_COUNT).map(|i| Effect::PendingMeteor {
                target,
                delay_ms: i as f32 * METEOR_STAGGER_MS,
            }));
        }
        Tool::BlackHole => out.effects.push(Effect::BlackHole {
            at: target,
            scale: 1.0,
            frames: 0,
        }),
        Tool::Moon => {
            let start = camera + Vec3::new(0.0, 40.0, -10.0);
            out.effects
                .push(Effect::Flight(Flight::new(FlightKind::Moon, start, target)));
        }
    }
    out
}

/// One meteor of a shower, scattered around the shower's aim point.
pub fn launch_meteor(target: Vec3, camera: Vec3, rng: &mut ChaCha8Rng) -> Effect {
    let scatter = Vec3::new(
        (rng.gen::<f32>() - 0.5) * METEOR_SCATTER,
        (rng.gen::<f32>() - 0.5) * METEOR_SCATTER,
        (rng.gen::<f32>() - 0.5) * METEOR_SCATTER,
    );
    let start = camera + Vec3::new(rng.gen::<f32>() * 20.0 - 10.0, 20.0, 0.0);
    Effect::Flight(Flight::new(FlightKind::Meteor, start, target + scatter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn tool_names_round_trip() {
        for tool in Tool::ALL {
            assert_eq!(tool.name().parse::<Tool>().unwrap(), tool);
        }
        assert_eq!(" BlackHole ".parse::<Tool>().unwrap(), Tool::BlackHole);
        assert!(matches!(
            "railgun".parse::<Tool>(),
            Err(DestructorError::UnknownTool(name)) if name == "railgun"
        ));
    }

    #[test]
    fn laser_hits_immediately() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let target = Vec3::new(0.0, 0.0, 5.0);
        let out = dispatch(Tool::Laser, target, Vec3::new(0.0, 0.0, 17.5), &mut rng);
        assert_eq!(
            out.commands,
            vec![Command::Deform(Impact {
                point: target,
                radius: 1.2,
                strength: -0.15
            })]
        );
        // Beam plus six flame particles.
        assert_eq!(out.effects.len(), 7);
        assert!(Tool::Laser.fires_on_drag());
        assert!(!Tool::Missile.fires_on_drag());
    }

    #[test]
    fn delayed_tools_only_schedule_effects() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let camera = Vec3::new(0.0, 0.0, 17.5);
        for tool in [Tool::Missile, Tool::Meteors, Tool::BlackHole, Tool::Moon] {
            let out = dispatch(tool, Vec3::Z * 5.0, camera, &mut rng);
            assert!(out.commands.is_empty(), "{tool:?} should not hit on click");
            assert!(!out.effects.is_empty());
        }

        let shower = dispatch(Tool::Meteors, Vec3::Z * 5.0, camera, &mut rng);
        let delays: Vec<f32> = shower
            .effects
            .iter()
            .map(|e| match e {
                Effect::PendingMeteor { delay_ms, .. } => *delay_ms,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(delays, vec![0.0, 120.0, 240.0, 360.0, 480.0, 600.0, 720.0, 840.0]);
    }

    #[test]
    fn meteors_scatter_around_the_aim_point() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let target = Vec3::new(1.0, 2.0, 3.0);
        let camera = Vec3::new(0.0, 0.0, 20.0);
        for _ in 0..32 {
            match launch_meteor(target, camera, &mut rng) {
                Effect::Flight(flight) => {
                    assert_eq!(flight.kind, FlightKind::Meteor);
                    assert!((flight.target - target).abs().max_element() <= 2.0);
                    assert_eq!(flight.start.y, 20.0);
                    assert!((flight.start.x).abs() <= 10.0);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }
}
