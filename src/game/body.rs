use crate::error::DestructorError;
use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Rocky,
    Gas,
    Star,
}

impl BodyKind {
    /// Color a fully-weighted impact blends a vertex toward.
    pub fn damage_color(self) -> Vec3 {
        match self {
            BodyKind::Rocky => rgb(0xff8800),
            BodyKind::Gas => rgb(0x221100),
            BodyKind::Star => rgb(0x110000),
        }
    }

    pub fn is_rocky(self) -> bool {
        self == BodyKind::Rocky
    }
}

pub fn kind_label(kind: BodyKind) -> &'static str {
    match kind {
        BodyKind::Rocky => "rocky",
        BodyKind::Gas => "gas",
        BodyKind::Star => "star",
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BodyDescriptor {
    pub key: &'static str,
    pub name: &'static str,
    pub radius: f32,
    pub kind: BodyKind,
    pub tint: u32,
    pub atmosphere: u32,
    pub has_clouds: bool,
}

impl BodyDescriptor {
    /// Material tint of the surface mesh; debris inherits it.
    pub fn surface_color(&self) -> u32 {
        match self.kind {
            BodyKind::Star => 0xffaa00,
            _ => 0xffffff,
        }
    }
}

pub const CATALOG: &[BodyDescriptor] = &[
    BodyDescriptor {
        key: "earth",
        name: "Earth",
        radius: 5.0,
        kind: BodyKind::Rocky,
        tint: 0x2233ff,
        atmosphere: 0x0088ff,
        has_clouds: true,
    },
    BodyDescriptor {
        key: "mars",
        name: "Mars",
        radius: 4.0,
        kind: BodyKind::Rocky,
        tint: 0xff4422,
        atmosphere: 0xff4400,
        has_clouds: false,
    },
    BodyDescriptor {
        key: "jupiter",
        name: "Jupiter",
        radius: 7.5,
        kind: BodyKind::Gas,
        tint: 0xffaa88,
        atmosphere: 0xaa6644,
        has_clouds: false,
    },
    BodyDescriptor {
        key: "sun",
        name: "Sun",
        radius: 10.0,
        kind: BodyKind::Star,
        tint: 0xff4400,
        atmosphere: 0xffaa00,
        has_clouds: false,
    },
];

pub fn find_body(key: &str) -> Result<&'static BodyDescriptor, DestructorError> {
    CATALOG
        .iter()
        .find(|body| body.key.eq_ignore_ascii_case(key.trim()))
        .ok_or_else(|| DestructorError::UnknownBody(key.to_string()))
}

pub fn rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}
