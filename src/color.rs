use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

// ---------------------------------------------------------------------------
// Amount colouring for table cells
// ---------------------------------------------------------------------------

/// Text colour for a money cell: losses are tinted red, everything else
/// keeps the theme's text colour (`None`).
pub fn amount_color(value: Option<f64>, dark_mode: bool) -> Option<Color32> {
    match value {
        Some(v) if v < 0.0 => {
            let lightness = if dark_mode { 0.65 } else { 0.42 };
            Some(hsl_to_color32(0.0, 0.70, lightness))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_distinct_colours() {
        assert!(generate_palette(0).is_empty());
        let colours = generate_palette(4);
        assert_eq!(colours.len(), 4);
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn only_negative_amounts_are_tinted() {
        assert!(amount_color(Some(-1.0), false).is_some());
        assert_eq!(amount_color(Some(0.0), false), None);
        assert_eq!(amount_color(Some(12.5), true), None);
        assert_eq!(amount_color(None, true), None);
    }
}
