use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Diverging scale for correlation coefficients
// ---------------------------------------------------------------------------

/// Colour for r = -1.
const NEGATIVE: Srgb<u8> = Srgb::new(33, 102, 172);
/// Colour for r = 0.
const NEUTRAL: Srgb<u8> = Srgb::new(247, 247, 247);
/// Colour for r = +1.
const POSITIVE: Srgb<u8> = Srgb::new(178, 24, 43);

/// Background used for masked / undefined cells.
pub const BLANK: Color32 = Color32::TRANSPARENT;

/// RGB for a coefficient on the blue–white–red scale. Values outside
/// `[-1, 1]` are clamped. Interpolation happens in linear RGB.
pub fn correlation_rgb(r: f64) -> [u8; 3] {
    let r = r.clamp(-1.0, 1.0) as f32;
    let neutral: LinSrgb = NEUTRAL.into_linear();
    let end: LinSrgb = if r < 0.0 {
        NEGATIVE.into_linear()
    } else {
        POSITIVE.into_linear()
    };
    let mixed = neutral.mix(end, r.abs());
    let rgb: Srgb<u8> = Srgb::from_linear(mixed);
    [rgb.red, rgb.green, rgb.blue]
}

/// Heatmap cell colour; `None` (undefined or masked) stays blank.
pub fn correlation_color(r: Option<f64>) -> Color32 {
    match r {
        Some(r) => {
            let [red, green, blue] = correlation_rgb(r);
            Color32::from_rgb(red, green, blue)
        }
        None => BLANK,
    }
}

/// Text colour that stays readable on top of [`correlation_color`].
pub fn label_color(r: f64) -> Color32 {
    if r.abs() > 0.6 {
        Color32::WHITE
    } else {
        Color32::BLACK
    }
}

// ---------------------------------------------------------------------------
// Categorical palette for scatter plots
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let rgb: Srgb = Hsl::new(hue, 0.65, 0.5).into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}
