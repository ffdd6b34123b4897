//! Tower toolpath generation.
//!
//! One [`TowerGenerator`] run owns the tool state and builds the complete
//! G-code file in memory, one phase at a time: preamble, priming move,
//! adhesion layer, ramped layers, two finishing layers, shutdown. Each
//! phase is a public method so its emitted lines can be captured and
//! inspected on their own.

use crate::command::{GcodeCommand, ABSOLUTE_EXTRUSION_GCODE, END_GCODE, START_GCODE};
use crate::error::Result;
use crate::{flow, TowerSettings};

/// Pressure advance applied to the adhesion layer.
///
/// The adhesion layer always prints at zero advance, not `pa_min`; the
/// sweep proper starts at the first ramped layer.
pub const ADHESION_PRESSURE_ADVANCE: f64 = 0.0;

/// Print speed for the adhesion layer (mm/s), independent of the
/// configured print speeds.
pub const ADHESION_PRINT_SPEED: f64 = 20.0;

/// Tool position and cumulative extrusion for one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ToolState {
    /// Absolute X (mm).
    pub x: f64,
    /// Absolute Y (mm).
    pub y: f64,
    /// Absolute Z (mm).
    pub z: f64,
    /// Total filament fed so far (mm). Never decreases.
    pub e: f64,
}

/// Builds the calibration-tower G-code for one [`TowerSettings`].
#[derive(Debug)]
pub struct TowerGenerator {
    settings: TowerSettings,
    state: ToolState,
    out: String,
}

impl TowerGenerator {
    /// Create a generator after validating `settings`.
    pub fn new(settings: TowerSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            state: ToolState::default(),
            out: String::new(),
        })
    }

    /// Settings this generator was created with.
    pub fn settings(&self) -> &TowerSettings {
        &self.settings
    }

    /// Current tool state.
    pub fn state(&self) -> &ToolState {
        &self.state
    }

    /// G-code emitted so far.
    pub fn output(&self) -> &str {
        &self.out
    }

    fn push_line(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }

    fn push(&mut self, command: GcodeCommand) {
        self.push_line(&command.to_string());
    }

    /// Heat the hotend, then run the fixed priming/limits block and switch
    /// the extruder to absolute mode.
    pub fn preamble(&mut self) {
        self.push(GcodeCommand::SetHotendTemp {
            celsius: self.settings.print_temp,
        });
        self.push(GcodeCommand::WaitHotendTemp {
            celsius: self.settings.print_temp,
        });
        self.out.push_str(START_GCODE);
        self.out.push_str(ABSOLUTE_EXTRUSION_GCODE);
    }

    /// Move to the square's start corner, centered on the bed, and prime.
    ///
    /// Assumes the square fits on the bed; an oversized square produces
    /// off-bed coordinates without error.
    pub fn move_to_start(&mut self) {
        let x = self.settings.bed_x_length / 2.0 - self.settings.square_side_length / 2.0;
        let y = self.settings.bed_y_length / 2.0 - self.settings.square_side_length / 2.0;
        let z = self.settings.layer_height;
        self.state.x = x;
        self.state.y = y;
        self.state.z = z;
        self.push(GcodeCommand::PrimeMove {
            x,
            y,
            z,
            feed_mm_min: self.settings.travel_speed * 60.0,
        });
    }

    /// Extrude one straight segment of `(dx, dy)` mm at `speed` mm/s.
    ///
    /// Zero-length segments are permitted and emit a zero-length move.
    pub fn segment(&mut self, dx: f64, dy: f64, speed: f64) {
        let length = (dx * dx + dy * dy).sqrt();
        self.state.x += dx;
        self.state.y += dy;
        self.state.e += flow::filament_length_for_path(
            length,
            self.settings.extrusion_width,
            self.settings.layer_height,
            self.settings.filament_diameter,
        );
        self.push(GcodeCommand::ExtrudeMove {
            x: self.state.x,
            y: self.state.y,
            e: self.state.e,
            feed_mm_min: speed * 60.0,
        });
    }

    /// Step Z up one layer height.
    pub fn layer_up(&mut self) {
        self.state.z += self.settings.layer_height;
        self.push(GcodeCommand::LayerMove { z: self.state.z });
    }

    /// Set the firmware pressure-advance value.
    pub fn set_pressure_advance(&mut self, advance: f64) {
        self.push(GcodeCommand::PressureAdvance { advance });
    }

    /// Start the part-cooling fan at the configured duty.
    pub fn fan_on(&mut self) {
        self.push(GcodeCommand::FanOn {
            duty: self.settings.cooling_fan_speed,
        });
    }

    /// Trace one closed square outline from the start corner.
    ///
    /// Five segments in fixed order: the full +x edge, the +y edge split
    /// into two halves so `plan` can change speed mid-edge, the full -x
    /// edge, the full -y edge. `plan` supplies one speed per segment.
    pub fn square_outline(&mut self, plan: [f64; 5]) {
        let side = self.settings.square_side_length;
        let half = side / 2.0;
        self.segment(side, 0.0, plan[0]);
        self.segment(0.0, half, plan[1]);
        self.segment(0.0, half, plan[2]);
        self.segment(-side, 0.0, plan[3]);
        self.segment(0.0, -side, plan[4]);
    }

    /// First layer: slow, no cooling, zero advance.
    pub fn adhesion_layer(&mut self) {
        self.set_pressure_advance(ADHESION_PRESSURE_ADVANCE);
        self.square_outline([ADHESION_PRINT_SPEED; 5]);
        self.layer_up();
    }

    /// The advance sweep: one outline per layer, advance interpolated
    /// linearly from `pa_min` to `pa_max`.
    ///
    /// With `layer_count == 0` this phase emits nothing.
    pub fn ramped_layers(&mut self) {
        let layers = self.settings.layer_count;
        let plan = self.settings.ramp_speed_plan();
        for i in 0..layers {
            let t = f64::from(i) / f64::from(layers);
            let advance = t * (self.settings.pa_max - self.settings.pa_min) + self.settings.pa_min;
            self.set_pressure_advance(advance);
            self.square_outline(plan);
            self.layer_up();
        }
    }

    /// Two layers at `pa_max` capping the sweep, with a Z step only
    /// between them.
    pub fn finishing_layers(&mut self) {
        let plan = self.settings.ramp_speed_plan();
        self.set_pressure_advance(self.settings.pa_max);
        self.square_outline(plan);
        self.layer_up();
        self.set_pressure_advance(self.settings.pa_max);
        self.square_outline(plan);
    }

    /// Run every phase in order and return the finished G-code.
    pub fn generate(mut self) -> String {
        self.preamble();
        self.move_to_start();
        self.adhesion_layer();
        self.fan_on();
        self.ramped_layers();
        self.finishing_layers();
        self.out.push_str(END_GCODE);
        self.out
    }
}

/// Generate the complete calibration-tower G-code for `settings`.
///
/// Validates first; nothing is emitted for invalid settings.
pub fn generate_gcode(settings: &TowerSettings) -> Result<String> {
    let generator = TowerGenerator::new(settings.clone())?;
    Ok(generator.generate())
}
