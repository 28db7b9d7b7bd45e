use std::sync::OnceLock;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::data::model::State;

// ---------------------------------------------------------------------------
// Categorical palette: one colour per state
// ---------------------------------------------------------------------------

const STATE_COUNT: usize = State::ALL.len();

/// The `i`-th of `n` evenly spaced hues.
fn hue_color(i: usize, n: usize) -> Color32 {
    let hue = (i as f32 / n as f32) * 360.0;
    let rgb: Srgb = Hsl::new(hue, 0.65, 0.5).into_color();
    to_color32(rgb)
}

/// One colour per state, indexed by declaration order (same as
/// [`State::ALL`]). Built on first use.
fn state_palette() -> &'static [Color32; STATE_COUNT] {
    static PALETTE: OnceLock<[Color32; STATE_COUNT]> = OnceLock::new();
    PALETTE.get_or_init(|| std::array::from_fn(|i| hue_color(i, STATE_COUNT)))
}

/// Stable colour for a state in the stacked chart and its legend.
pub fn state_color(state: State) -> Color32 {
    state_palette()[state as usize]
}

// ---------------------------------------------------------------------------
// Continuous scale: magnitude → colour
// ---------------------------------------------------------------------------

/// Viridis anchor colours, dark purple to yellow.
const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

/// Maps values in `[min, max]` onto the Viridis ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    min: f64,
    max: f64,
}

impl ColorScale {
    /// Scale spanning the given values; a flat or empty input maps
    /// everything to the middle of the ramp.
    pub fn spanning(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        ColorScale { min, max }
    }

    /// Position of `value` on the scale, in `[0, 1]`.
    pub fn normalize(&self, value: f64) -> f32 {
        let range = self.max - self.min;
        if !range.is_finite() || range.abs() < f64::EPSILON || !value.is_finite() {
            return 0.5;
        }
        ((value - self.min) / range).clamp(0.0, 1.0) as f32
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: f64) -> Color32 {
        let t = self.normalize(value) * (VIRIDIS.len() - 1) as f32;
        let lower = (t.floor() as usize).min(VIRIDIS.len() - 2);
        let frac = t - lower as f32;

        let a = anchor(VIRIDIS[lower]);
        let b = anchor(VIRIDIS[lower + 1]);
        to_color32(Srgb::from_linear(a.mix(b, frac)))
    }
}

fn anchor((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}
