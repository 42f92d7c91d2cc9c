use glam::{Affine3A, Vec3};
use std::f32::consts::{PI, TAU};

const RAY_EPSILON: f32 = 1e-6;
/// Keeps `(w + 1) * (h + 1)` well inside `u32` index range.
pub const MAX_SEGMENTS: u32 = 1024;

/// Sphere vertex buffer with a parallel color buffer.
///
/// The layout matches a latitude/longitude sphere: `(w + 1) * (h + 1)`
/// vertices, including the duplicated seam column and pole rows, so vertex
/// counts line up with what a WebGL renderer builds for the same segments.
pub struct SphereMesh {
    positions: Vec<Vec3>,
    colors: Vec<Vec3>,
    indices: Vec<u32>,
    positions_dirty: bool,
    colors_dirty: bool,
}

impl SphereMesh {
    pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width = width_segments.clamp(3, MAX_SEGMENTS);
        let height = height_segments.clamp(2, MAX_SEGMENTS);
        let row = width as usize + 1;
        let count = row * (height as usize + 1);

        let mut positions = Vec::with_capacity(count);
        for iy in 0..=height {
            let v = iy as f32 / height as f32;
            for ix in 0..=width {
                let u = ix as f32 / width as f32;
                positions.push(Vec3::new(
                    -radius * (u * TAU).cos() * (v * PI).sin(),
                    radius * (v * PI).cos(),
                    radius * (u * TAU).sin() * (v * PI).sin(),
                ));
            }
        }

        // Pole rows collapse to a point, so their outer triangles are skipped.
        let mut indices = Vec::with_capacity(width as usize * height as usize * 6);
        for iy in 0..height {
            for ix in 0..width {
                let at = |y: u32, x: u32| y * row as u32 + x;
                let a = at(iy, ix + 1);
                let b = at(iy, ix);
                let c = at(iy + 1, ix);
                let d = at(iy + 1, ix + 1);
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self {
            colors: vec![Vec3::ONE; positions.len()],
            positions,
            indices,
            positions_dirty: true,
            colors_dirty: true,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub(crate) fn vertex_mut(&mut self, index: usize) -> (&mut Vec3, &mut Vec3) {
        (&mut self.positions[index], &mut self.colors[index])
    }

    pub(crate) fn colors_mut(&mut self) -> &mut [Vec3] {
        &mut self.colors
    }

    pub fn mark_positions_dirty(&mut self) {
        self.positions_dirty = true;
    }

    pub fn mark_colors_dirty(&mut self) {
        self.colors_dirty = true;
    }

    pub fn positions_dirty(&self) -> bool {
        self.positions_dirty
    }

    pub fn colors_dirty(&self) -> bool {
        self.colors_dirty
    }

    /// Flattened positions for upload. Clears the position dirty flag.
    pub fn take_positions(&mut self) -> Vec<f32> {
        self.positions_dirty = false;
        flatten(&self.positions)
    }

    /// Flattened colors for upload. Clears the color dirty flag.
    pub fn take_colors(&mut self) -> Vec<f32> {
        self.colors_dirty = false;
        flatten(&self.colors)
    }

    /// Nearest hit of a world-space ray against the mesh triangles, in world space.
    pub fn raycast(&self, world: &Affine3A, origin: Vec3, direction: Vec3) -> Option<Vec3> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }
        let to_local = world.inverse();
        let local_origin = to_local.transform_point3(origin);
        let local_dir = to_local.transform_vector3(direction);

        let nearest = self
            .indices
            .chunks_exact(3)
            .filter_map(|tri| {
                ray_triangle(
                    local_origin,
                    local_dir,
                    self.positions[tri[0] as usize],
                    self.positions[tri[1] as usize],
                    self.positions[tri[2] as usize],
                )
            })
            .fold(None, |best: Option<f32>, t| Some(best.map_or(t, |b| b.min(t))))?;

        Some(world.transform_point3(local_origin + local_dir * nearest))
    }
}

fn flatten(values: &[Vec3]) -> Vec<f32> {
    values.iter().flat_map(|v| v.to_array()).collect()
}

// Möller–Trumbore, double sided.
fn ray_triangle(origin: Vec3, dir: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = dir.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < RAY_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(q) * inv_det;
    (t > RAY_EPSILON).then_some(t)
}
