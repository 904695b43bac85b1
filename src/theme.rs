//! Display theme.
//!
//! The mode is a plain value owned by the application and handed to the
//! renderer; the palette is derived from it every frame.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

/// 24-bit colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Fixed style mapping applied to every widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub foreground: Rgb,
    pub button: Rgb,
    pub button_active: Rgb,
    pub field: Rgb,
    pub heading: Rgb,
}

const LIGHT: Palette = Palette {
    background: Rgb(0xff, 0xff, 0xff),
    foreground: Rgb(0x00, 0x00, 0x00),
    button: Rgb(0xe1, 0xe1, 0xe1),
    button_active: Rgb(0xd0, 0xd0, 0xd0),
    field: Rgb(0xff, 0xff, 0xff),
    heading: Rgb(0xf0, 0xf0, 0xf0),
};

const DARK: Palette = Palette {
    background: Rgb(0x2b, 0x2b, 0x2b),
    foreground: Rgb(0xff, 0xff, 0xff),
    button: Rgb(0x3c, 0x3f, 0x41),
    button_active: Rgb(0x5a, 0x5a, 0x5a),
    field: Rgb(0x3c, 0x3f, 0x41),
    heading: Rgb(0x4a, 0x4a, 0x4a),
};

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            ThemeMode::Light => LIGHT,
            ThemeMode::Dark => DARK,
        }
    }

    /// Label for the menu entry that switches away from this mode
    pub fn toggle_label(self) -> &'static str {
        match self {
            ThemeMode::Light => "Toggle Dark Mode",
            ThemeMode::Dark => "Toggle Light Mode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_restores_palette() {
        for mode in [ThemeMode::Light, ThemeMode::Dark] {
            assert_ne!(mode.toggled(), mode);
            assert_eq!(mode.toggled().toggled(), mode);
            assert_eq!(mode.toggled().toggled().palette(), mode.palette());
        }
    }

    #[test]
    fn test_palettes_differ() {
        assert_ne!(ThemeMode::Light.palette(), ThemeMode::Dark.palette());
        assert_eq!(ThemeMode::Dark.palette().background, Rgb(0x2b, 0x2b, 0x2b));
        assert_eq!(ThemeMode::default(), ThemeMode::Light);
    }

    #[test]
    fn test_toggle_label() {
        assert_eq!(ThemeMode::Light.toggle_label(), "Toggle Dark Mode");
        assert_eq!(ThemeMode::Dark.toggle_label(), "Toggle Light Mode");
    }

    #[test]
    fn test_mode_deserializes_lowercase() {
        let mode: ThemeMode = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(mode, ThemeMode::Dark);
    }
}
