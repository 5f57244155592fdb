//! Flat RGBA colors and their presets

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(input: &str) -> Option<Self> {
        let hex = input.trim().trim_start_matches('#');
        if !matches!(hex.len(), 6 | 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| -> Option<f32> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };
        let a = if hex.len() == 8 { channel(6)? } else { 1.0 };
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    pub fn to_hex(&self) -> String {
        let c = self.clamped();
        let byte = |v: f32| (v * 255.0).round() as u8;
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            byte(c.r),
            byte(c.g),
            byte(c.b),
            byte(c.a)
        )
    }

    pub fn approx_eq(&self, other: &Rgba) -> bool {
        const EPS: f32 = 1.0 / 512.0;
        (self.r - other.r).abs() < EPS
            && (self.g - other.g).abs() < EPS
            && (self.b - other.b).abs() < EPS
            && (self.a - other.a).abs() < EPS
    }
}

// Stored as a plain `[r, g, b, a]` array.
impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.r, self.g, self.b, self.a].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [r, g, b, a] = <[f32; 4]>::deserialize(deserializer)?;
        Ok(Self::new(r, g, b, a))
    }
}

/// A named color choice shown in the menu
#[derive(Debug, Clone, Copy)]
pub struct ColorPreset {
    pub name: &'static str,
    pub label: &'static str,
    pub color: Rgba,
}

pub const DEFAULT_BACKGROUND: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.55);
pub const DEFAULT_FOREGROUND: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

pub const BACKGROUND_PRESETS: [ColorPreset; 6] = [
    ColorPreset { name: "dark", label: "Dark", color: DEFAULT_BACKGROUND },
    ColorPreset { name: "black", label: "Solid Black", color: Rgba::new(0.0, 0.0, 0.0, 0.9) },
    ColorPreset { name: "light", label: "Light", color: Rgba::new(1.0, 1.0, 1.0, 0.75) },
    ColorPreset { name: "blue", label: "Blue", color: Rgba::new(0.1, 0.25, 0.55, 0.7) },
    ColorPreset { name: "purple", label: "Purple", color: Rgba::new(0.35, 0.15, 0.5, 0.7) },
    ColorPreset { name: "clear", label: "Transparent", color: Rgba::new(0.0, 0.0, 0.0, 0.0) },
];

pub const FOREGROUND_PRESETS: [ColorPreset; 5] = [
    ColorPreset { name: "white", label: "White", color: DEFAULT_FOREGROUND },
    ColorPreset { name: "black", label: "Black", color: Rgba::new(0.0, 0.0, 0.0, 1.0) },
    ColorPreset { name: "green", label: "Terminal Green", color: Rgba::new(0.2, 1.0, 0.4, 1.0) },
    ColorPreset { name: "amber", label: "Amber", color: Rgba::new(1.0, 0.75, 0.0, 1.0) },
    ColorPreset { name: "cyan", label: "Cyan", color: Rgba::new(0.0, 0.85, 0.9, 1.0) },
];

pub fn find_preset<'a>(presets: &'a [ColorPreset], name: &str) -> Option<&'a ColorPreset> {
    presets.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        let c = Rgba::from_hex("#FF000080").unwrap();
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);

        assert_eq!(Rgba::from_hex("00ff00").unwrap().a, 1.0);
        assert!(Rgba::from_hex("#12345").is_none());
        assert!(Rgba::from_hex("#GGGGGG").is_none());
        assert!(Rgba::from_hex("").is_none());
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(DEFAULT_FOREGROUND.to_hex(), "#FFFFFFFF");
        assert_eq!(Rgba::new(2.0, -1.0, 0.0, 1.0).to_hex(), "#FF0000FF");
    }

    #[test]
    fn test_serialized_as_array() {
        let json = serde_json::to_string(&Rgba::new(0.0, 0.5, 1.0, 0.25)).unwrap();
        assert_eq!(json, "[0.0,0.5,1.0,0.25]");
        let back: Rgba = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgba::new(0.0, 0.5, 1.0, 0.25));
        assert!(serde_json::from_str::<Rgba>("[1.0, 1.0]").is_err());
    }

    #[test]
    fn test_preset_lookup() {
        assert!(find_preset(&BACKGROUND_PRESETS, "Light").is_some());
        assert!(find_preset(&FOREGROUND_PRESETS, "magenta").is_none());
    }
}
