use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::MAX_SERIES;

// ---------------------------------------------------------------------------
// Series colours
// ---------------------------------------------------------------------------

/// One colour per series slot, shared by lines and toggle buttons.
pub const SERIES_COLORS: [Color32; MAX_SERIES] = [
    Color32::from_rgb(0, 0, 255),
    Color32::from_rgb(255, 0, 0),
    Color32::from_rgb(0, 255, 0),
    Color32::from_rgb(255, 0, 255),
    Color32::from_rgb(0, 255, 255),
    Color32::from_rgb(255, 255, 0),
    Color32::from_rgb(136, 136, 136),
    Color32::from_rgb(0, 0, 0),
];

pub fn series_color(index: usize) -> Color32 {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}

// ---------------------------------------------------------------------------
// Derived colours
// ---------------------------------------------------------------------------

fn to_srgb(c: Color32) -> Srgb {
    Srgb::new(
        c.r() as f32 / 255.0,
        c.g() as f32 / 255.0,
        c.b() as f32 / 255.0,
    )
}

fn from_srgb(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

/// Washed-out variant used for toggles of hidden series.
pub fn dimmed(c: Color32) -> Color32 {
    let mut hsl: Hsl = to_srgb(c).into_color();
    hsl.saturation *= 0.35;
    hsl.lightness = hsl.lightness * 0.4 + 0.45;
    let rgb: Srgb = hsl.into_color();
    from_srgb(rgb)
}

/// Black or white, whichever reads better on `background`.
pub fn text_color_on(background: Color32) -> Color32 {
    let rgb = to_srgb(background);
    let luma = 0.299 * rgb.red + 0.587 * rgb.green + 0.114 * rgb.blue;
    if luma > 0.5 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_colors_wrap() {
        assert_eq!(series_color(0), series_color(MAX_SERIES));
        assert_eq!(series_color(1), Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn dimmed_is_lighter_and_greyer() {
        let blue = series_color(0);
        let dim = dimmed(blue);
        assert_ne!(dim, blue);
        // Lifted lightness pulls the dark channels up.
        assert!(dim.r() > blue.r());
        assert!(dim.g() > blue.g());
        assert!(dim.b() <= blue.b());
    }

    #[test]
    fn contrast_text() {
        assert_eq!(text_color_on(Color32::from_rgb(255, 255, 0)), Color32::BLACK);
        assert_eq!(text_color_on(Color32::from_rgb(0, 0, 255)), Color32::WHITE);
        assert_eq!(text_color_on(Color32::BLACK), Color32::WHITE);
    }
}
