//! Named color palettes. The set is closed: lookups of any other name yield `None`.

use serde::Serialize;

/// A 24-bit RGB color, written to the package as an `srgbClr` hex value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorScheme {
    pub name: &'static str,
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
    pub text: Rgb,
}

pub const PROFESSIONAL: ColorScheme = ColorScheme {
    name: "professional",
    primary: Rgb(0, 85, 140),
    secondary: Rgb(225, 225, 225),
    accent: Rgb(0, 164, 239),
    text: Rgb(51, 51, 51),
};

pub const MODERN: ColorScheme = ColorScheme {
    name: "modern",
    primary: Rgb(52, 73, 94),
    secondary: Rgb(236, 240, 241),
    accent: Rgb(26, 188, 156),
    text: Rgb(44, 62, 80),
};

pub const CREATIVE: ColorScheme = ColorScheme {
    name: "creative",
    primary: Rgb(155, 89, 182),
    secondary: Rgb(250, 250, 250),
    accent: Rgb(241, 196, 15),
    text: Rgb(52, 73, 94),
};

pub const SCHEMES: [ColorScheme; 3] = [PROFESSIONAL, MODERN, CREATIVE];

impl ColorScheme {
    /// Exact-name lookup.
    pub fn named(name: &str) -> Option<ColorScheme> {
        SCHEMES.iter().find(|s| s.name == name).copied()
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        PROFESSIONAL
    }
}
