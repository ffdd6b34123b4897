//! Filament flow math.
//!
//! Converts deposited-bead geometry into the filament length the extruder
//! must feed. The bead is modeled as a plain rectangular cross-section
//! (width × height) of material drawn from a cylindrical filament, with no
//! rounded-end correction.

/// π approximation used in the filament cross-section ratio.
///
/// Kept truncated so emitted extrusion values stay digit-identical with
/// output already validated on printers.
const PI_APPROX: f64 = 3.14159;

/// Filament length that supplies `volume` mm³ of material from a filament
/// of diameter `filament_diameter` mm.
pub fn filament_length_for_volume(volume: f64, filament_diameter: f64) -> f64 {
    volume / (filament_diameter * filament_diameter * PI_APPROX * 0.25)
}

/// Filament length to extrude while traveling `path_length` mm, laying
/// down a bead of `extrusion_width` × `layer_height` cross-section.
pub fn filament_length_for_path(
    path_length: f64,
    extrusion_width: f64,
    layer_height: f64,
    filament_diameter: f64,
) -> f64 {
    filament_length_for_volume(
        path_length * extrusion_width * layer_height,
        filament_diameter,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_bead() {
        // 50mm path, 0.4 x 0.3 bead, 1.75mm filament.
        let e = filament_length_for_path(50.0, 0.4, 0.3, 1.75);
        assert_relative_eq!(e, 2.4945122354850735, max_relative = 1e-12);
    }

    #[test]
    fn test_proportional_to_path_length() {
        let e1 = filament_length_for_path(10.0, 0.4, 0.3, 1.75);
        let e2 = filament_length_for_path(20.0, 0.4, 0.3, 1.75);
        assert_relative_eq!(e2, 2.0 * e1, max_relative = 1e-12);
    }

    #[test]
    fn test_volume_form_agrees_with_path_form() {
        let by_path = filament_length_for_path(25.0, 0.45, 0.2, 1.75);
        let by_volume = filament_length_for_volume(25.0 * 0.45 * 0.2, 1.75);
        assert_relative_eq!(by_path, by_volume, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_length_path() {
        let e = filament_length_for_path(0.0, 0.4, 0.3, 1.75);
        assert_eq!(e, 0.0);
    }
}
