use crate::game::body::BodyKind;
use crate::game::mesh::SphereMesh;
use glam::{Affine3A, Vec3};
use std::collections::HashSet;

/// One localized deformation event, in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Impact {
    pub point: Vec3,
    pub radius: f32,
    /// Peak radial displacement at the center; negative digs a crater.
    pub strength: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeformSettings {
    pub core_floor_ratio: f32,
    pub soft_body_scale: f32,
}

impl Default for DeformSettings {
    fn default() -> Self {
        Self {
            core_floor_ratio: 0.85,
            soft_body_scale: 0.7,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DamageStatus {
    Stable,
    Damaged,
    Critical,
    Imminent,
}

impl DamageStatus {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > 0.80 {
            DamageStatus::Imminent
        } else if ratio > 0.50 {
            DamageStatus::Critical
        } else if ratio > 0.10 {
            DamageStatus::Damaged
        } else {
            DamageStatus::Stable
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DamageStatus::Stable => "Stable",
            DamageStatus::Damaged => "Damaged",
            DamageStatus::Critical => "Critical",
            DamageStatus::Imminent => "Collapse Imminent",
        }
    }
}

/// Vertex indices displaced at least once since the body was created.
#[derive(Clone, Debug, Default)]
pub struct DamageState {
    damaged: HashSet<u32>,
    total: usize,
}

impl DamageState {
    pub fn new(total: usize) -> Self {
        Self {
            damaged: HashSet::new(),
            total,
        }
    }

    pub fn reset(&mut self, total: usize) {
        self.damaged.clear();
        self.total = total;
    }

    /// Returns true when the index was not already damaged.
    pub fn mark(&mut self, index: usize) -> bool {
        if index >= self.total {
            return false;
        }
        self.damaged.insert(index as u32)
    }

    pub fn is_damaged(&self, index: usize) -> bool {
        self.damaged.contains(&(index as u32))
    }

    pub fn damaged_count(&self) -> usize {
        self.damaged.len()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.damaged.is_empty()
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.damaged.len() as f64 / self.total as f64).clamp(0.0, 1.0)
    }

    pub fn status(&self) -> DamageStatus {
        DamageStatus::from_ratio(self.ratio())
    }
}

/// Pushes every vertex within `impact.radius` of the impact point along its
/// radial direction and blends its color toward the body's damage color,
/// both scaled by the linear falloff `1 - d / radius`.
///
/// Returns how many vertices were touched by this call.
pub fn deform(
    mesh: &mut SphereMesh,
    damage: &mut DamageState,
    world: &Affine3A,
    impact: &Impact,
    kind: BodyKind,
    base_radius: f32,
    settings: &DeformSettings,
) -> usize {
    // Negated comparisons also reject NaN.
    if !(impact.radius > 0.0) || !(base_radius > 0.0) || mesh.vertex_count() == 0 {
        return 0;
    }

    let strength = if kind.is_rocky() {
        impact.strength
    } else {
        impact.strength * settings.soft_body_scale
    };
    let floor = base_radius * settings.core_floor_ratio;
    let target = kind.damage_color();

    let mut touched = 0;
    for index in 0..mesh.vertex_count() {
        let (position, color) = mesh.vertex_mut(index);
        let distance = world.transform_point3(*position).distance(impact.point);
        if distance >= impact.radius {
            continue;
        }
        let weight = 1.0 - distance / impact.radius;
        damage.mark(index);
        touched += 1;

        let length = position.length();
        let dir = if length > 0.0 { *position / length } else { Vec3::Y };
        *position = dir * (length + strength * weight).max(floor);
        *color = color.lerp(target, weight);
    }

    if touched > 0 {
        mesh.mark_positions_dirty();
        mesh.mark_colors_dirty();
    }
    touched
}

/// Brightens every color channel below 1.0 by `step`. Geometry and the
/// damage set are left alone.
pub fn cool(mesh: &mut SphereMesh, step: f32) -> bool {
    let mut changed = false;
    for color in mesh.colors_mut() {
        if color.cmplt(Vec3::ONE).any() {
            *color = (*color + Vec3::splat(step)).min(Vec3::ONE);
            changed = true;
        }
    }
    if changed {
        mesh.mark_colors_dirty();
    }
    changed
}
