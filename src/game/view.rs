use crate::game::body::{kind_label, BodyDescriptor, CATALOG};
use crate::game::damage::DamageStatus;
use crate::game::effect::{Effect, FlightKind, ParticleKind, FLARE_COLOR, LIGHT_COLOR};
use crate::game::planet::Planet;
use serde::Serialize;

pub fn damage_text(ratio: f64) -> String {
    format!("Damage: {:.2}%", ratio * 100.0)
}

pub fn status_text(status: DamageStatus) -> String {
    format!("Status: {}", status.label())
}

#[derive(Serialize)]
pub struct StatusView {
    pub damage_ratio: f64,
    pub damaged: usize,
    pub total: usize,
    pub status: &'static str,
    pub damage_text: String,
    pub status_text: String,
}

impl From<&Planet> for StatusView {
    fn from(planet: &Planet) -> Self {
        let ratio = planet.damage_ratio();
        let status = planet.status();
        Self {
            damage_ratio: ratio,
            damaged: planet.damage().damaged_count(),
            total: planet.damage().total(),
            status: status.label(),
            damage_text: damage_text(ratio),
            status_text: status_text(status),
        }
    }
}

#[derive(Serialize)]
pub struct BodyFrameView {
    pub key: &'static str,
    pub name: &'static str,
    pub world_matrix: [f32; 16],
    pub spin: f32,
    pub cloud_spin: f32,
    pub texture_offset: f32,
    pub core_time: f32,
    pub atmosphere_scale: f32,
    pub positions_dirty: bool,
    pub colors_dirty: bool,
    #[serde(flatten)]
    pub status: StatusView,
}

impl From<&Planet> for BodyFrameView {
    fn from(planet: &Planet) -> Self {
        let descriptor = planet.descriptor();
        let world = glam::Mat4::from(planet.world_transform());
        Self {
            key: descriptor.key,
            name: descriptor.name,
            world_matrix: world.to_cols_array(),
            spin: planet.spin,
            cloud_spin: planet.cloud_spin,
            texture_offset: planet.texture_offset,
            core_time: planet.core_time,
            atmosphere_scale: planet.atmosphere_scale,
            positions_dirty: planet.mesh().positions_dirty(),
            colors_dirty: planet.mesh().colors_dirty(),
            status: StatusView::from(planet),
        }
    }
}

#[derive(Serialize)]
pub struct EffectView {
    pub kind: &'static str,
    pub position: [f32; 3],
    pub scale: f32,
    pub opacity: f32,
    pub color: u32,
    pub size: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aim: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f32>,
    /// Parented to the body rather than placed in world space.
    pub attached: bool,
}

impl EffectView {
    fn at(kind: &'static str, position: glam::Vec3, color: u32, size: f32) -> Self {
        Self {
            kind,
            position: position.to_array(),
            scale: 1.0,
            opacity: 1.0,
            color,
            size,
            aim: None,
            rotation: None,
            intensity: None,
            attached: false,
        }
    }
}

/// Visual state of a record; `None` for records with nothing on screen yet.
pub fn effect_view(effect: &Effect) -> Option<EffectView> {
    let view = match effect {
        Effect::Flight(flight) => {
            let (kind, color, size) = match flight.kind {
                FlightKind::Missile => ("missile", 0x444444, 1.5),
                FlightKind::Meteor => ("meteor", 0x663300, 0.5),
                FlightKind::Moon => ("moon", 0x999999, 3.0),
            };
            EffectView {
                aim: Some(flight.target.to_array()),
                ..EffectView::at(kind, flight.position(), color, size)
            }
        }
        Effect::Laser { origin, target, .. } => EffectView {
            aim: Some(target.to_array()),
            opacity: 0.4,
            ..EffectView::at("laser", *origin, 0xff8800, 0.5)
        },
        Effect::PendingMeteor { .. } => return None,
        Effect::BlackHole { at, scale, .. } => EffectView {
            scale: *scale,
            ..EffectView::at("blackhole", *at, 0x000000, 0.2)
        },
        Effect::Particle(particle) => {
            let (kind, size, opacity) = match particle.kind {
                ParticleKind::Spark => ("spark", 0.1, 1.0),
                ParticleKind::Flame => ("flame", 0.2, 0.8),
                ParticleKind::Debris => ("debris", 0.12, 1.0),
            };
            EffectView {
                scale: particle.scale(),
                opacity,
                ..EffectView::at(kind, particle.position, particle.color, size)
            }
        }
        Effect::Light {
            at,
            range,
            intensity,
            ..
        } => EffectView {
            intensity: Some(*intensity),
            ..EffectView::at("light", *at, LIGHT_COLOR, *range)
        },
        Effect::SolarFlare(flare) => EffectView {
            scale: flare.scale(),
            opacity: flare.opacity(),
            rotation: Some(flare.rotation.to_array()),
            attached: true,
            ..EffectView::at("flare", glam::Vec3::ZERO, FLARE_COLOR, flare.radius)
        },
    };
    Some(view)
}

#[derive(Serialize)]
pub struct FrameView {
    pub frame: u64,
    pub elapsed_ms: f64,
    pub tool: &'static str,
    pub star_rotation: f32,
    pub camera_nudge: [f32; 3],
    pub flash_opacity: f32,
    pub body: Option<BodyFrameView>,
    pub effects: Vec<EffectView>,
}

#[derive(Serialize)]
struct BodyCardView {
    key: &'static str,
    name: &'static str,
    radius: f32,
    kind: &'static str,
    tint: u32,
    atmosphere: u32,
    has_clouds: bool,
}

impl From<&BodyDescriptor> for BodyCardView {
    fn from(body: &BodyDescriptor) -> Self {
        Self {
            key: body.key,
            name: body.name,
            radius: body.radius,
            kind: kind_label(body.kind),
            tint: body.tint,
            atmosphere: body.atmosphere,
            has_clouds: body.has_clouds,
        }
    }
}

pub fn catalog_json() -> String {
    let cards: Vec<BodyCardView> = CATALOG.iter().map(BodyCardView::from).collect();
    serde_json::to_string(&cards).unwrap_or_else(|_| "[]".to_string())
}

pub fn to_json<T: Serialize>(view: &T) -> String {
    serde_json::to_string(view).unwrap_or_else(|_| "{}".to_string())
}
