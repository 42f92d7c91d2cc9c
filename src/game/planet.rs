use crate::config::SimConfig;
use crate::game::body::{BodyDescriptor, BodyKind};
use crate::game::damage::{self, DamageState, DamageStatus, DeformSettings, Impact};
use crate::game::mesh::SphereMesh;
use glam::{Affine3A, Quat, Vec3};

/// The body currently on screen: its mesh, damage and idle animation.
pub struct Planet {
    descriptor: BodyDescriptor,
    mesh: SphereMesh,
    damage: DamageState,
    settings: DeformSettings,
    pub spin: f32,
    pub cloud_spin: f32,
    pub texture_offset: f32,
    pub core_time: f32,
    pub atmosphere_scale: f32,
    /// Shake jitter applied on top of the spin.
    pub offset: Vec3,
}

impl Planet {
    pub fn new(descriptor: &BodyDescriptor, config: &SimConfig) -> Self {
        let mesh = SphereMesh::uv_sphere(
            descriptor.radius,
            config.width_segments,
            config.height_segments,
        );
        let damage = DamageState::new(mesh.vertex_count());
        Self {
            descriptor: descriptor.clone(),
            mesh,
            damage,
            settings: DeformSettings {
                core_floor_ratio: config.core_floor_ratio,
                soft_body_scale: config.soft_body_scale,
            },
            spin: 0.0,
            cloud_spin: 0.0,
            texture_offset: 0.0,
            core_time: 0.0,
            atmosphere_scale: 1.0,
            offset: Vec3::ZERO,
        }
    }

    pub fn descriptor(&self) -> &BodyDescriptor {
        &self.descriptor
    }

    pub fn kind(&self) -> BodyKind {
        self.descriptor.kind
    }

    pub fn mesh(&self) -> &SphereMesh {
        &self.mesh
    }

    pub fn mesh_mut(&mut self) -> &mut SphereMesh {
        &mut self.mesh
    }

    pub fn damage(&self) -> &DamageState {
        &self.damage
    }

    pub fn world_transform(&self) -> Affine3A {
        Affine3A::from_rotation_translation(Quat::from_rotation_y(self.spin), self.offset)
    }

    pub fn apply_impact(&mut self, impact: &Impact) -> usize {
        let world = self.world_transform();
        damage::deform(
            &mut self.mesh,
            &mut self.damage,
            &world,
            impact,
            self.descriptor.kind,
            self.descriptor.radius,
            &self.settings,
        )
    }

    pub fn cooling_pass(&mut self, step: f32) -> bool {
        damage::cool(&mut self.mesh, step)
    }

    pub fn damage_ratio(&self) -> f64 {
        self.damage.ratio()
    }

    pub fn status(&self) -> DamageStatus {
        self.damage.status()
    }

    pub fn pick(&self, origin: Vec3, direction: Vec3) -> Option<Vec3> {
        self.mesh.raycast(&self.world_transform(), origin, direction)
    }

    /// Idle animation for one frame; `elapsed_ms` drives the star pulse.
    pub fn animate(&mut self, config: &SimConfig, elapsed_ms: f64) {
        self.spin += config.spin_per_frame;
        self.core_time += config.core_time_per_frame;
        if self.descriptor.has_clouds {
            self.cloud_spin += config.cloud_spin_per_frame;
        }
        match self.descriptor.kind {
            BodyKind::Gas => self.texture_offset += config.texture_scroll_per_frame,
            BodyKind::Star => {
                self.atmosphere_scale = 1.0 + (elapsed_ms * 0.002).sin() as f32 * 0.02;
            }
            BodyKind::Rocky => {}
        }
    }
}
