use std::fmt;
use std::str::FromStr;

use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Rgb – renderer-neutral colour
// ---------------------------------------------------------------------------

/// An 8-bit sRGB colour handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
}

impl From<Srgb> for Rgb {
    fn from(c: Srgb) -> Self {
        let c: Srgb<u8> = c.into_format();
        Rgb {
            r: c.red,
            g: c.green,
            b: c.blue,
        }
    }
}

// ---------------------------------------------------------------------------
// Colormap – continuous map sampled into a colour cycle
// ---------------------------------------------------------------------------

/// Continuous colour maps an ensemble's colour cycle is sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Colormap {
    /// Blue → cyan → yellow → red.
    #[default]
    Jet,
    /// Evenly spaced hues at fixed saturation/lightness.
    Hsl,
    /// Black → white.
    Gray,
}

impl Colormap {
    pub const ALL: [Colormap; 3] = [Colormap::Jet, Colormap::Hsl, Colormap::Gray];

    pub fn name(self) -> &'static str {
        match self {
            Colormap::Jet => "jet",
            Colormap::Hsl => "hsl",
            Colormap::Gray => "gray",
        }
    }

    /// Sample the map at `t` in `[0, 1]` (clamped).
    pub fn sample(self, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        match self {
            Colormap::Jet => {
                let channel = |offset: f32| (1.5 - (4.0 * t - offset).abs()).clamp(0.0, 1.0);
                Srgb::new(channel(3.0), channel(2.0), channel(1.0)).into()
            }
            Colormap::Hsl => {
                let rgb: Srgb = Hsl::new(t * 360.0, 0.75, 0.55).into_color();
                rgb.into()
            }
            Colormap::Gray => Srgb::new(t, t, t).into(),
        }
    }

    /// `n` colours at `i / n` for `i` in `0..n`, in order.
    pub fn cycle(self, n: usize) -> Vec<Rgb> {
        if n == 0 {
            return Vec::new();
        }
        (0..n).map(|i| self.sample(i as f32 / n as f32)).collect()
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Colormap {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Colormap::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| Error::UnknownColormap(s.to_string()))
    }
}

impl TryFrom<String> for Colormap {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_length_and_order() {
        assert!(Colormap::Jet.cycle(0).is_empty());
        let cycle = Colormap::Gray.cycle(4);
        assert_eq!(cycle.len(), 4);
        assert_eq!(cycle[0], Rgb::BLACK);
        assert!(cycle.windows(2).all(|w| w[1].r > w[0].r));
    }

    #[test]
    fn test_jet_endpoints() {
        // t = 0 is dark blue, t = 1 is dark red
        let lo = Colormap::Jet.sample(0.0);
        assert_eq!((lo.r, lo.g), (0, 0));
        assert!(lo.b > 100);
        let hi = Colormap::Jet.sample(1.0);
        assert_eq!((hi.g, hi.b), (0, 0));
        assert!(hi.r > 100);
    }

    #[test]
    fn test_hsl_cycle_is_distinct() {
        let cycle = Colormap::Hsl.cycle(6);
        for i in 0..cycle.len() {
            for j in (i + 1)..cycle.len() {
                assert_ne!(cycle[i], cycle[j]);
            }
        }
    }

    #[test]
    fn test_unknown_colormap() {
        assert_eq!("jet".parse::<Colormap>().unwrap(), Colormap::Jet);
        assert!(matches!(
            "viridis".parse::<Colormap>().unwrap_err(),
            Error::UnknownColormap(_)
        ));
    }
}
