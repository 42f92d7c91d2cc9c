use crate::error::DestructorError;
use crate::game::mesh::MAX_SEGMENTS;
use serde::{Deserialize, Serialize};

/// Tunables for the simulation. Defaults reproduce the feel of the web toy;
/// the host may override any subset through a JSON document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub width_segments: u32,
    pub height_segments: u32,
    /// Vertices never sink below this fraction of the body radius.
    pub core_floor_ratio: f32,
    /// Strength multiplier for gas giants and stars.
    pub soft_body_scale: f32,
    pub cooling_step: f32,
    /// Chance per frame that a cooling pass runs.
    pub cooling_chance: f64,
    pub spin_per_frame: f32,
    pub cloud_spin_per_frame: f32,
    pub texture_scroll_per_frame: f32,
    pub core_time_per_frame: f32,
    pub shake_decay: f32,
    pub flash_decay: f32,
    pub body_jitter_threshold: f32,
    pub solar_flare_chance: f64,
    pub star_count: usize,
    pub star_spread: f32,
    pub camera_distance_factor: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width_segments: 64,
            height_segments: 64,
            core_floor_ratio: 0.85,
            soft_body_scale: 0.7,
            cooling_step: 0.002,
            cooling_chance: 0.2,
            spin_per_frame: 0.0004,
            cloud_spin_per_frame: 0.0006,
            texture_scroll_per_frame: 0.0001,
            core_time_per_frame: 0.01,
            shake_decay: 0.94,
            flash_decay: 0.85,
            body_jitter_threshold: 0.8,
            solar_flare_chance: 0.05,
            star_count: 1500,
            star_spread: 1500.0,
            camera_distance_factor: 3.5,
        }
    }
}

pub const MAX_STARS: usize = 100_000;

impl SimConfig {
    pub fn from_json(raw: &str) -> Result<Self, DestructorError> {
        let config: SimConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DestructorError> {
        if self.width_segments < 3 || self.height_segments < 2 {
            return Err(invalid(format!(
                "sphere needs at least 3x2 segments, got {}x{}",
                self.width_segments, self.height_segments
            )));
        }
        if self.width_segments > MAX_SEGMENTS || self.height_segments > MAX_SEGMENTS {
            return Err(invalid(format!(
                "sphere segments are capped at {MAX_SEGMENTS}, got {}x{}",
                self.width_segments, self.height_segments
            )));
        }
        if self.star_count > MAX_STARS {
            return Err(invalid(format!(
                "star_count is capped at {MAX_STARS}, got {}",
                self.star_count
            )));
        }
        for (name, value) in [
            ("core_floor_ratio", self.core_floor_ratio),
            ("soft_body_scale", self.soft_body_scale),
            ("cooling_step", self.cooling_step),
            ("spin_per_frame", self.spin_per_frame),
            ("cloud_spin_per_frame", self.cloud_spin_per_frame),
            ("texture_scroll_per_frame", self.texture_scroll_per_frame),
            ("core_time_per_frame", self.core_time_per_frame),
            ("shake_decay", self.shake_decay),
            ("flash_decay", self.flash_decay),
            ("body_jitter_threshold", self.body_jitter_threshold),
            ("star_spread", self.star_spread),
            ("camera_distance_factor", self.camera_distance_factor),
        ] {
            if !value.is_finite() {
                return Err(invalid(format!("{name} must be finite, got {value}")));
            }
        }
        unit_range("core_floor_ratio", self.core_floor_ratio as f64)?;
        unit_range("soft_body_scale", self.soft_body_scale as f64)?;
        unit_range("cooling_chance", self.cooling_chance)?;
        unit_range("solar_flare_chance", self.solar_flare_chance)?;
        unit_range("body_jitter_threshold", self.body_jitter_threshold as f64)?;
        if !(self.cooling_step > 0.0 && self.cooling_step <= 1.0) {
            return Err(invalid(format!(
                "cooling_step must be in (0, 1], got {}",
                self.cooling_step
            )));
        }
        for (name, decay) in [("shake_decay", self.shake_decay), ("flash_decay", self.flash_decay)] {
            if !(0.0..1.0).contains(&decay) {
                return Err(invalid(format!("{name} must be in [0, 1), got {decay}")));
            }
        }
        if !(self.star_spread >= 0.0) {
            return Err(invalid(format!(
                "star_spread must be non-negative, got {}",
                self.star_spread
            )));
        }
        if !(self.camera_distance_factor > 0.0) {
            return Err(invalid(format!(
                "camera_distance_factor must be positive, got {}",
                self.camera_distance_factor
            )));
        }
        Ok(())
    }
}

fn unit_range(name: &str, value: f64) -> Result<(), DestructorError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be in [0, 1], got {value}")))
    }
}

fn invalid(msg: String) -> DestructorError {
    DestructorError::InvalidConfig(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config = SimConfig::from_json(r#"{ "width_segments": 32, "cooling_chance": 1.0 }"#)
            .expect("valid config");
        assert_eq!(config.width_segments, 32);
        assert_eq!(config.cooling_chance, 1.0);
        assert_eq!(config.height_segments, 64);
        assert_eq!(config.core_floor_ratio, 0.85);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = SimConfig::from_json(r#"{ "core_floor_ratio": 1.5 }"#).unwrap_err();
        assert!(matches!(err, DestructorError::InvalidConfig(_)));

        let err = SimConfig::from_json(r#"{ "shake_decay": 1.0 }"#).unwrap_err();
        assert!(err.to_string().contains("shake_decay"));

        let err = SimConfig::from_json(r#"{ "width_segments": 2 }"#).unwrap_err();
        assert!(matches!(err, DestructorError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_overflowing_floats_and_caps() {
        // 1e39 does not fit in f32 and parses as infinity.
        let err = SimConfig::from_json(r#"{ "star_spread": 1e39 }"#).unwrap_err();
        assert!(err.to_string().contains("star_spread"));

        for raw in [
            r#"{ "spin_per_frame": 1e39 }"#,
            r#"{ "camera_distance_factor": 1e39 }"#,
            r#"{ "core_time_per_frame": -1e39 }"#,
            r#"{ "width_segments": 100000 }"#,
            r#"{ "star_count": 10000000 }"#,
        ] {
            assert!(
                matches!(SimConfig::from_json(raw), Err(DestructorError::InvalidConfig(_))),
                "{raw} should be rejected"
            );
        }

        let config = SimConfig::from_json(r#"{ "star_spread": 3e38, "width_segments": 1024 }"#)
            .expect("largest finite values are accepted");
        assert_eq!(config.width_segments, MAX_SEGMENTS);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = SimConfig::from_json("{ width_segments: ").unwrap_err();
        assert!(matches!(err, DestructorError::Config(_)));
    }
}
