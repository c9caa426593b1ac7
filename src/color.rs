use std::collections::HashMap;

use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::LensCatalog;

// ---------------------------------------------------------------------------
// Qualitative palette
// ---------------------------------------------------------------------------

/// Plotly's "Light24" qualitative palette.
pub const LIGHT24: [&str; 24] = [
    "#FD3216", "#00FE35", "#6A76FC", "#FED4C4", "#FE00CE", "#0DF9FF", "#F6F926", "#FF9616",
    "#479B55", "#EEA6FB", "#DC587D", "#D626FF", "#6E899C", "#00B5F7", "#B68E00", "#C9FBE5",
    "#FF0092", "#22FFA7", "#E3EE9E", "#86CE00", "#BC7196", "#7E7DCD", "#FC6955", "#E48F72",
];

const FALLBACK: Srgb<u8> = Srgb::new(128, 128, 128);

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Srgb<u8>> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            rgb.into_format()
        })
        .collect()
}

/// `#rrggbb`
pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

// ---------------------------------------------------------------------------
// Manufacturer → colour
// ---------------------------------------------------------------------------

/// Assigns each manufacturer a colour by first-seen order in the catalog.
#[derive(Debug, Clone, Default)]
pub struct ManufacturerColors {
    mapping: HashMap<String, Srgb<u8>>,
}

impl ManufacturerColors {
    pub fn new(catalog: &LensCatalog) -> Self {
        let manufacturers = catalog.manufacturers();
        let mut colors: Vec<Srgb<u8>> = LIGHT24
            .iter()
            .map(|hex| hex.parse().unwrap_or(FALLBACK))
            .collect();

        if manufacturers.len() > colors.len() {
            let extra = manufacturers.len() - colors.len();
            log::warn!(
                "{} manufacturers exceed the palette, generating {extra} colours",
                manufacturers.len()
            );
            colors.extend(generate_palette(extra));
        }

        ManufacturerColors {
            mapping: manufacturers.iter().cloned().zip(colors).collect(),
        }
    }

    /// Look up the colour for a manufacturer.
    pub fn color_for(&self, manufacturer: &str) -> Srgb<u8> {
        self.mapping.get(manufacturer).copied().unwrap_or(FALLBACK)
    }
}
