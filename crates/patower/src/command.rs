//! G-code command formatting.
//!
//! Every generated line is either one of the fixed literal blocks below or
//! a [`GcodeCommand`] rendered through its `Display` impl. The consumer is
//! Klipper, which tolerates fixed decimal-place formatting: positions,
//! temperatures and fan duty carry 3 decimals, extrusion and pressure
//! advance carry 4, feed rates are whole numbers in mm/min.

use std::fmt;

/// Fixed start-of-print block: speed/flow overrides, homing, a short
/// priming stroke with a single -1mm retraction, travel away from the
/// prime line, and the corner-velocity/lookahead limits the test relies on.
pub const START_GCODE: &str = "M220 S100\n\
                               M221 S100\n\
                               G28\n\
                               G92 E0\n\
                               G1 X1 Y1\n\
                               G1 Y40 E10 F500\n\
                               G92 E0\n\
                               G1 E-1 F500\n\
                               G1 Y80 F4000\n\
                               G1 Z2.0 F3000\n\
                               SET_VELOCITY_LIMIT SQUARE_CORNER_VELOCITY=1 ACCEL=500\n\
                               SET_PRESSURE_ADVANCE ADVANCE_LOOKAHEAD_TIME=0\n";

/// Switches the extruder to absolute mode and zeroes it.
pub const ABSOLUTE_EXTRUSION_GCODE: &str = "M82\n\
                                            G92 E0\n";

/// Fixed end-of-print block: lift the nozzle, then fan, heaters and
/// motors off.
pub const END_GCODE: &str = "G91\n\
                             G1 Z10 F450\n\
                             G90\n\
                             M106 S0\n\
                             M104 S0\n\
                             M140 S0\n\
                             M84\n";

/// A single generated G-code line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GcodeCommand {
    /// M104: set hotend temperature without waiting.
    SetHotendTemp {
        /// Target temperature (°C).
        celsius: f64,
    },
    /// M109: set hotend temperature and wait for it.
    WaitHotendTemp {
        /// Target temperature (°C).
        celsius: f64,
    },
    /// M106: set the part-cooling fan duty.
    FanOn {
        /// PWM duty, 0-255.
        duty: u8,
    },
    /// G1 move-and-prime entering the square: absolute x/y/z with a fixed
    /// 1mm prime extrusion.
    PrimeMove {
        /// Absolute X (mm).
        x: f64,
        /// Absolute Y (mm).
        y: f64,
        /// Absolute Z (mm).
        z: f64,
        /// Feed rate (mm/min).
        feed_mm_min: f64,
    },
    /// G1 extruding move to an absolute x/y at an absolute extruder
    /// position.
    ExtrudeMove {
        /// Absolute X (mm).
        x: f64,
        /// Absolute Y (mm).
        y: f64,
        /// Absolute extruder position (mm of filament).
        e: f64,
        /// Feed rate (mm/min).
        feed_mm_min: f64,
    },
    /// G1 Z-only hop to the next layer.
    LayerMove {
        /// Absolute Z (mm).
        z: f64,
    },
    /// SET_PRESSURE_ADVANCE: set the firmware pressure-advance value.
    PressureAdvance {
        /// Advance value (unitless).
        advance: f64,
    },
}

impl fmt::Display for GcodeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GcodeCommand::SetHotendTemp { celsius } => write!(f, "M104 S{celsius:.3}"),
            GcodeCommand::WaitHotendTemp { celsius } => write!(f, "M109 S{celsius:.3}"),
            GcodeCommand::FanOn { duty } => write!(f, "M106 S{:.3}", f64::from(*duty)),
            GcodeCommand::PrimeMove {
                x,
                y,
                z,
                feed_mm_min,
            } => write!(f, "G1 X{x:.3} Y{y:.3} Z{z:.3} E1.0 F{feed_mm_min:.0}"),
            GcodeCommand::ExtrudeMove {
                x,
                y,
                e,
                feed_mm_min,
            } => write!(f, "G1 X{x:.3} Y{y:.3} E{e:.4} F{feed_mm_min:.0}"),
            GcodeCommand::LayerMove { z } => write!(f, "G1 Z{z:.3}"),
            GcodeCommand::PressureAdvance { advance } => {
                write!(f, "SET_PRESSURE_ADVANCE ADVANCE={advance:.4}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_commands() {
        let set = GcodeCommand::SetHotendTemp { celsius: 190.0 };
        assert_eq!(set.to_string(), "M104 S190.000");
        let wait = GcodeCommand::WaitHotendTemp { celsius: 190.0 };
        assert_eq!(wait.to_string(), "M109 S190.000");
    }

    #[test]
    fn test_fan_command() {
        let cmd = GcodeCommand::FanOn { duty: 51 };
        assert_eq!(cmd.to_string(), "M106 S51.000");
    }

    #[test]
    fn test_prime_move_has_fixed_extrusion() {
        let cmd = GcodeCommand::PrimeMove {
            x: 92.5,
            y: 77.5,
            z: 0.3,
            feed_mm_min: 9000.0,
        };
        assert_eq!(cmd.to_string(), "G1 X92.500 Y77.500 Z0.300 E1.0 F9000");
    }

    #[test]
    fn test_extrude_move_decimal_places() {
        let cmd = GcodeCommand::ExtrudeMove {
            x: 142.5,
            y: 77.5,
            e: 2.4945122354850735,
            feed_mm_min: 7200.0,
        };
        assert_eq!(cmd.to_string(), "G1 X142.500 Y77.500 E2.4945 F7200");
    }

    #[test]
    fn test_layer_move() {
        let cmd = GcodeCommand::LayerMove { z: 0.6 };
        assert_eq!(cmd.to_string(), "G1 Z0.600");
    }

    #[test]
    fn test_pressure_advance_four_decimals() {
        let cmd = GcodeCommand::PressureAdvance { advance: 0.05 };
        assert_eq!(cmd.to_string(), "SET_PRESSURE_ADVANCE ADVANCE=0.0500");
    }

    #[test]
    fn test_literal_blocks_are_line_terminated() {
        for block in [START_GCODE, ABSOLUTE_EXTRUSION_GCODE, END_GCODE] {
            assert!(block.ends_with('\n'));
        }
        assert!(START_GCODE.starts_with("M220 S100\n"));
        assert!(START_GCODE.contains("SET_PRESSURE_ADVANCE ADVANCE_LOOKAHEAD_TIME=0"));
        assert!(END_GCODE.ends_with("M84\n"));
    }
}
