use glam::Vec3;
use log::Level;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod game;
mod hud;

use config::SimConfig;
use game::view::{self, to_json};
use game::weapon::Tool;
use game::Simulation;

/// Installs the console logger and panic hook. Safe to call more than once.
#[wasm_bindgen]
pub fn start(level: Option<String>) {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let level = level
        .as_deref()
        .and_then(|l| l.parse::<Level>().ok())
        .unwrap_or(Level::Info);
    // A second init fails because the logger is already set; that is fine.
    let _ = console_log::init_with_level(level);
}

#[wasm_bindgen]
pub fn body_catalog() -> String {
    view::catalog_json()
}

/// Host handle owning one running simulation.
#[wasm_bindgen]
pub struct Destructor {
    sim: Simulation,
}

#[wasm_bindgen]
impl Destructor {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, config_json: Option<String>) -> Result<Destructor, JsError> {
        let config = match config_json {
            Some(json) => SimConfig::from_json(&json)?,
            None => SimConfig::default(),
        };
        Ok(Self {
            sim: Simulation::with_config(seed, config),
        })
    }

    pub fn select_body(&mut self, key: &str) -> Result<(), JsError> {
        self.sim.select_body(key)?;
        Ok(())
    }

    pub fn reset_body(&mut self) -> bool {
        self.sim.reset_body()
    }

    pub fn leave_body(&mut self) {
        self.sim.leave_body();
    }

    pub fn set_tool(&mut self, name: &str) -> Result<(), JsError> {
        let tool: Tool = name.parse()?;
        self.sim.set_tool(tool);
        Ok(())
    }

    pub fn tool(&self) -> String {
        self.sim.tool().name().to_string()
    }

    pub fn set_camera(&mut self, x: f32, y: f32, z: f32) {
        self.sim.set_camera(Vec3::new(x, y, z));
    }

    pub fn camera(&self) -> Vec<f32> {
        self.sim.camera().to_array().to_vec()
    }

    pub fn pointer_down(&mut self) {
        self.sim.pointer_down();
    }

    pub fn pointer_up(&mut self) {
        self.sim.pointer_up();
    }

    /// World-space hit point of a ray against the body, if any.
    pub fn pick(&self, ox: f32, oy: f32, oz: f32, dx: f32, dy: f32, dz: f32) -> Option<Vec<f32>> {
        self.sim
            .pick(Vec3::new(ox, oy, oz), Vec3::new(dx, dy, dz))
            .map(|p| p.to_array().to_vec())
    }

    pub fn click(&mut self, ox: f32, oy: f32, oz: f32, dx: f32, dy: f32, dz: f32) -> Option<Vec<f32>> {
        self.sim
            .click(Vec3::new(ox, oy, oz), Vec3::new(dx, dy, dz))
            .map(|p| p.to_array().to_vec())
    }

    pub fn drag(&mut self, ox: f32, oy: f32, oz: f32, dx: f32, dy: f32, dz: f32) -> Option<Vec<f32>> {
        self.sim
            .drag(Vec3::new(ox, oy, oz), Vec3::new(dx, dy, dz))
            .map(|p| p.to_array().to_vec())
    }

    pub fn apply_impact(&mut self, x: f32, y: f32, z: f32, radius: f32, strength: f32) -> usize {
        self.sim.apply_impact(&game::damage::Impact {
            point: Vec3::new(x, y, z),
            radius,
            strength,
        })
    }

    pub fn tick(&mut self, dt_ms: f64) -> String {
        to_json(&self.sim.tick(dt_ms))
    }

    pub fn damage_ratio(&self) -> f64 {
        self.sim.damage_ratio()
    }

    pub fn status(&self) -> String {
        self.sim.status().label().to_string()
    }

    pub fn status_json(&self) -> String {
        match self.sim.status_view() {
            Some(status) => to_json(&status),
            None => "{}".to_string(),
        }
    }

    /// Pushes damage and status text into the page's HUD elements.
    pub fn render_hud(&self) {
        if let (Some(planet), Some(status)) = (self.sim.planet(), self.sim.status_view()) {
            hud::render(planet.descriptor().name, &status);
        }
    }

    /// Flat xyz positions; clears the positions dirty flag.
    pub fn positions(&mut self) -> Vec<f32> {
        self.sim.take_positions()
    }

    /// Flat rgb colors; clears the colors dirty flag.
    pub fn colors(&mut self) -> Vec<f32> {
        self.sim.take_colors()
    }

    pub fn indices(&self) -> Vec<u32> {
        self.sim.indices()
    }

    pub fn starfield(&mut self) -> Vec<f32> {
        self.sim.starfield()
    }
}
