#![warn(missing_docs)]

//! Pressure-advance calibration tower G-code generator.
//!
//! This crate generates a Klipper-flavored toolpath that prints a hollow
//! square tower, sweeping the firmware pressure-advance value linearly
//! across layers while switching print speed mid-edge. The speed
//! discontinuity makes bad advance values show up as bulges or gaps at the
//! corners and seams; the z height of the cleanest band identifies the
//! best value.
//!
//! # Example
//!
//! ```ignore
//! use patower::{generate_gcode, TowerSettings};
//!
//! let settings = TowerSettings {
//!     layer_count: 100,
//!     pa_max: 0.06,
//!     ..Default::default()
//! };
//! let gcode = generate_gcode(&settings)?;
//! std::fs::write("pa_tower.gcode", gcode)?;
//! ```

pub mod command;
pub mod error;
pub mod flow;
pub mod generator;

pub use command::GcodeCommand;
pub use error::{Result, TowerError};
pub use generator::{generate_gcode, ToolState, TowerGenerator};

use serde::{Deserialize, Serialize};

/// Generation settings for one calibration tower.
///
/// The caller is responsible for choosing a `square_side_length` that fits
/// centered on the bed; positions are not range-checked against the bed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerSettings {
    /// Bed size along X (mm), used only to center the square.
    pub bed_x_length: f64,
    /// Bed size along Y (mm), used only to center the square.
    pub bed_y_length: f64,
    /// Extruded bead width (mm).
    pub extrusion_width: f64,
    /// Layer height: Z step and bead height (mm).
    pub layer_height: f64,
    /// Filament diameter (mm).
    pub filament_diameter: f64,
    /// Hotend temperature (°C).
    pub print_temp: f64,
    /// Travel speed for the priming move (mm/s).
    pub travel_speed: f64,
    /// Slow print speed on the swept layers (mm/s).
    pub slow_print_speed: f64,
    /// Fast print speed on the swept layers (mm/s).
    pub fast_print_speed: f64,
    /// Part-cooling fan duty after the adhesion layer (PWM, 0-255).
    pub cooling_fan_speed: u8,
    /// Side length of the calibration square (mm).
    pub square_side_length: f64,
    /// Number of ramped layers, excluding the adhesion layer and the two
    /// finishing layers.
    pub layer_count: u32,
    /// Pressure advance at the bottom of the ramp.
    pub pa_min: f64,
    /// Pressure advance at the top of the ramp. May be below `pa_min` for
    /// a descending sweep.
    pub pa_max: f64,
}

impl Default for TowerSettings {
    fn default() -> Self {
        Self {
            bed_x_length: 235.0,
            bed_y_length: 205.0,
            extrusion_width: 0.4,
            layer_height: 0.3,
            filament_diameter: 1.75,
            print_temp: 190.0,
            travel_speed: 150.0,
            slow_print_speed: 15.0,
            fast_print_speed: 120.0,
            cooling_fan_speed: 51,
            square_side_length: 50.0,
            layer_count: 60,
            pa_min: 0.0,
            pa_max: 0.1,
        }
    }
}

impl TowerSettings {
    /// Validate settings.
    ///
    /// Catches the configurations that would otherwise put NaN or Inf
    /// into the output stream. `layer_count == 0` is valid and simply
    /// skips the ramped phase.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("bed_x_length", self.bed_x_length),
            ("bed_y_length", self.bed_y_length),
            ("extrusion_width", self.extrusion_width),
            ("layer_height", self.layer_height),
            ("filament_diameter", self.filament_diameter),
            ("print_temp", self.print_temp),
            ("travel_speed", self.travel_speed),
            ("slow_print_speed", self.slow_print_speed),
            ("fast_print_speed", self.fast_print_speed),
            ("square_side_length", self.square_side_length),
            ("pa_min", self.pa_min),
            ("pa_max", self.pa_max),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(TowerError::InvalidSettings(format!(
                    "{name} must be finite"
                )));
            }
        }
        if self.filament_diameter <= 0.0 {
            return Err(TowerError::InvalidSettings(
                "filament_diameter must be positive".into(),
            ));
        }
        if self.extrusion_width <= 0.0 {
            return Err(TowerError::InvalidSettings(
                "extrusion_width must be positive".into(),
            ));
        }
        if self.layer_height <= 0.0 {
            return Err(TowerError::InvalidSettings(
                "layer_height must be positive".into(),
            ));
        }
        if self.square_side_length <= 0.0 {
            return Err(TowerError::InvalidSettings(
                "square_side_length must be positive".into(),
            ));
        }
        if self.travel_speed <= 0.0 || self.slow_print_speed <= 0.0 || self.fast_print_speed <= 0.0
        {
            return Err(TowerError::InvalidSettings(
                "speeds must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Per-segment speeds for the swept and finishing layers: fast along
    /// the lead-in edge and the first half of the split edge, slow after
    /// the mid-edge change, fast along the far edge, slow on the return.
    pub fn ramp_speed_plan(&self) -> [f64; 5] {
        [
            self.fast_print_speed,
            self.fast_print_speed,
            self.slow_print_speed,
            self.fast_print_speed,
            self.slow_print_speed,
        ]
    }
}
