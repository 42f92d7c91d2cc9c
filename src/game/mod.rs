pub mod body;
pub mod damage;
pub mod effect;
pub mod fx;
pub mod mesh;
pub mod planet;
pub mod starfield;
pub mod view;
pub mod weapon;

use crate::config::SimConfig;
use crate::error::DestructorError;
use body::{find_body, BodyDescriptor, BodyKind};
use damage::{DamageStatus, Impact};
use effect::{Command, EffectQueue};
use fx::ScreenFx;
use glam::Vec3;
use log::{debug, info, warn};
use planet::Planet;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use view::{effect_view, BodyFrameView, FrameView, StatusView};
use weapon::Tool;

const DEFAULT_DEBRIS_COLOR: u32 = 0x888888;

/// Owns everything that changes while the toy runs: the body on screen,
/// its damage, the in-flight effects and the screen shake/flash.
pub struct Simulation {
    config: SimConfig,
    rng: ChaCha8Rng,
    frame: u64,
    elapsed_ms: f64,
    star_rotation: f32,
    planet: Option<Planet>,
    tool: Tool,
    pointer_held: bool,
    camera: Vec3,
    effects: EffectQueue,
    fx: ScreenFx,
}

impl Simulation {
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, SimConfig::default())
    }

    pub fn with_config(seed: u64, config: SimConfig) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            frame: 0,
            elapsed_ms: 0.0,
            star_rotation: 0.0,
            planet: None,
            tool: Tool::default(),
            pointer_held: false,
            camera: Vec3::new(0.0, 0.0, 30.0),
            effects: EffectQueue::new(),
            fx: ScreenFx::default(),
        }
    }

    pub fn select_body(&mut self, key: &str) -> Result<(), DestructorError> {
        let descriptor = find_body(key)?;
        self.load_body(descriptor);
        Ok(())
    }

    /// Replaces the current body with a pristine sphere for `descriptor`.
    pub fn load_body(&mut self, descriptor: &BodyDescriptor) {
        self.cancel_effects();
        let planet = Planet::new(descriptor, &self.config);
        info!(
            "loaded {} ({} vertices, radius {})",
            descriptor.name,
            planet.mesh().vertex_count(),
            descriptor.radius
        );
        self.camera = Vec3::new(0.0, 0.0, descriptor.radius * self.config.camera_distance_factor);
        self.planet = Some(planet);
    }

    /// Rebuilds the current body. Returns false when no body is loaded.
    pub fn reset_body(&mut self) -> bool {
        let Some(descriptor) = self.planet.as_ref().map(|p| p.descriptor().clone()) else {
            return false;
        };
        self.load_body(&descriptor);
        true
    }

    /// Back to the lobby: the body goes away with everything aimed at it.
    pub fn leave_body(&mut self) {
        self.cancel_effects();
        if let Some(planet) = self.planet.take() {
            info!("left {}", planet.descriptor().name);
        }
    }

    fn cancel_effects(&mut self) {
        let cancelled = self.effects.cancel_all();
        if cancelled > 0 {
            info!("cancelled {cancelled} in-flight effects");
        }
        self.fx.clear();
    }

    pub fn planet(&self) -> Option<&Planet> {
        self.planet.as_ref()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        if tool != self.tool {
            debug!("tool -> {}", tool.name());
        }
        self.tool = tool;
    }

    pub fn camera(&self) -> Vec3 {
        self.camera
    }

    pub fn set_camera(&mut self, position: Vec3) {
        self.camera = position;
    }

    pub fn pointer_down(&mut self) {
        self.pointer_held = true;
    }

    pub fn pointer_up(&mut self) {
        self.pointer_held = false;
    }

    pub fn pick(&self, origin: Vec3, direction: Vec3) -> Option<Vec3> {
        self.planet.as_ref()?.pick(origin, direction)
    }

    /// Fires the active tool at whatever the ray hits.
    pub fn click(&mut self, origin: Vec3, direction: Vec3) -> Option<Vec3> {
        let point = self.pick(origin, direction)?;
        self.fire_at(point);
        Some(point)
    }

    /// Pointer moved; only a held laser keeps firing.
    pub fn drag(&mut self, origin: Vec3, direction: Vec3) -> Option<Vec3> {
        if !self.pointer_held || !self.tool.fires_on_drag() {
            return None;
        }
        self.click(origin, direction)
    }

    pub fn fire_at(&mut self, point: Vec3) {
        if self.planet.is_none() {
            return;
        }
        let out = weapon::dispatch(self.tool, point, self.camera, &mut self.rng);
        self.effects.extend(out.effects);
        self.apply_commands(out.commands);
    }

    pub fn apply_impact(&mut self, impact: &Impact) -> usize {
        let Some(planet) = self.planet.as_mut() else {
            debug!("impact with no body loaded, ignored");
            return 0;
        };
        if !(impact.radius > 0.0) || !impact.strength.is_finite() || !impact.point.is_finite() {
            warn!(
                "ignoring impact with radius {} strength {} at {}",
                impact.radius, impact.strength, impact.point
            );
            return 0;
        }
        let touched = planet.apply_impact(impact);
        debug!(
            "impact r={} s={} touched {touched} vertices, damage {:.2}%",
            impact.radius,
            impact.strength,
            planet.damage_ratio() * 100.0
        );
        touched
    }

    pub fn damage_ratio(&self) -> f64 {
        self.planet.as_ref().map_or(0.0, Planet::damage_ratio)
    }

    pub fn status(&self) -> DamageStatus {
        DamageStatus::from_ratio(self.damage_ratio())
    }

    pub fn status_view(&self) -> Option<StatusView> {
        self.planet.as_ref().map(StatusView::from)
    }

    /// Randomly gated color recovery; only runs while something is damaged.
    pub fn cooling_pass(&mut self) -> bool {
        let Some(planet) = self.planet.as_mut() else {
            return false;
        };
        if planet.damage().is_empty() || self.rng.gen::<f64>() >= self.config.cooling_chance {
            return false;
        }
        planet.cooling_pass(self.config.cooling_step)
    }

    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    pub fn starfield(&mut self) -> Vec<f32> {
        starfield::scatter(&mut self.rng, self.config.star_count, self.config.star_spread)
    }

    pub fn take_positions(&mut self) -> Vec<f32> {
        self.planet
            .as_mut()
            .map(|p| p.mesh_mut().take_positions())
            .unwrap_or_default()
    }

    pub fn take_colors(&mut self) -> Vec<f32> {
        self.planet
            .as_mut()
            .map(|p| p.mesh_mut().take_colors())
            .unwrap_or_default()
    }

    pub fn indices(&self) -> Vec<u32> {
        self.planet
            .as_ref()
            .map(|p| p.mesh().indices().to_vec())
            .unwrap_or_default()
    }

    /// Advances one animation frame.
    pub fn tick(&mut self, dt_ms: f64) -> FrameView {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        self.frame += 1;
        self.elapsed_ms += dt_ms;
        self.star_rotation += starfield::ROTATION_PER_FRAME;

        let fx = self.fx.advance(
            &mut self.rng,
            self.config.shake_decay,
            self.config.flash_decay,
            self.config.body_jitter_threshold,
        );
        if let Some(planet) = self.planet.as_mut() {
            planet.animate(&self.config, self.elapsed_ms);
            planet.offset = fx.body_offset;
        }
        self.cooling_pass();

        let commands = self.effects.advance(dt_ms as f32);
        self.apply_commands(commands);
        self.maybe_flare();

        FrameView {
            frame: self.frame,
            elapsed_ms: self.elapsed_ms,
            tool: self.tool.name(),
            star_rotation: self.star_rotation,
            camera_nudge: fx.camera_nudge.to_array(),
            flash_opacity: fx.flash_opacity,
            body: self.planet.as_ref().map(BodyFrameView::from),
            effects: self.effects.iter().filter_map(effect_view).collect(),
        }
    }

    fn maybe_flare(&mut self) {
        let Some(planet) = self.planet.as_ref() else {
            return;
        };
        if planet.kind() != BodyKind::Star {
            return;
        }
        if self.rng.gen::<f64>() < self.config.solar_flare_chance {
            let radius = planet.descriptor().radius;
            self.effects.push(effect::solar_flare(radius, &mut self.rng));
        }
    }

    fn apply_commands(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Deform(impact) => {
                    self.apply_impact(&impact);
                }
                Command::BigExplosion { at, size } => {
                    self.effects.extend(effect::big_explosion(at, size, &mut self.rng));
                }
                Command::Sparks(at) => {
                    self.effects.extend(effect::spark_burst(at, &mut self.rng));
                }
                Command::Debris { at, count } => {
                    let color = self
                        .planet
                        .as_ref()
                        .map_or(DEFAULT_DEBRIS_COLOR, |p| p.descriptor().surface_color());
                    self.effects
                        .extend(effect::debris_burst(at, count, color, &mut self.rng));
                }
                Command::Shake(amount) => self.fx.trigger_shake(amount),
                Command::Flash(amount) => self.fx.trigger_flash(amount),
                Command::LaunchMeteor(target) => {
                    let meteor = weapon::launch_meteor(target, self.camera, &mut self.rng);
                    self.effects.push(meteor);
                }
            }
        }
    }
}
