//! Grid color themes
//!
//! YAML themes embedded at compile time, overridable by user files.
//!
//! Theme loading priority:
//! 1. User config: `~/.config/sheetview/themes/{id}.yaml`
//! 2. Embedded: Built-in themes compiled into binary

use std::path::Path;

use serde::Deserialize;

pub const DEFAULT_DARK_YAML: &str = include_str!("../themes/dark.yaml");
pub const DEFAULT_LIGHT_YAML: &str = include_str!("../themes/light.yaml");

/// A built-in theme entry
pub struct BuiltinTheme {
    /// Stable identifier for config (e.g. "default-dark")
    pub id: &'static str,
    pub yaml: &'static str,
}

pub const BUILTIN_THEMES: &[BuiltinTheme] = &[
    BuiltinTheme {
        id: "default-dark",
        yaml: DEFAULT_DARK_YAML,
    },
    BuiltinTheme {
        id: "default-light",
        yaml: DEFAULT_LIGHT_YAML,
    },
];

/// Load a theme from a YAML file
pub fn from_file(path: &Path) -> Result<Theme, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read theme file {}: {}", path.display(), e))?;
    Theme::from_yaml(&content)
}

/// Load theme by id with priority: user → builtin
pub fn load_theme(id: &str) -> Result<Theme, String> {
    if let Some(user_dir) = crate::config_paths::themes_dir() {
        let user_path = user_dir.join(format!("{}.yaml", id));
        if user_path.exists() {
            tracing::info!("Loading user theme from {}", user_path.display());
            return from_file(&user_path);
        }
    }

    tracing::debug!("Loading builtin theme: {}", id);
    Theme::from_builtin(id)
}

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Packed ARGB, the layout most pixel buffers expect
    pub fn to_argb_u32(&self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Return a new color with the specified alpha value
    pub const fn with_alpha(&self, a: u8) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).map_err(|e| e.to_string());
        match s.len() {
            6 => Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }
}

/// Raw theme data as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeData {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub grid: GridThemeData,
    #[serde(default)]
    pub remote_cursors: Vec<String>,
}

/// Grid colors (raw strings from YAML)
#[derive(Debug, Clone, Deserialize)]
pub struct GridThemeData {
    pub background: String,
    pub grid_line: String,
    pub heading_background: String,
    pub heading_foreground: String,
    pub heading_selected: String,
    pub cursor: String,
    pub selection_fill: String,
    #[serde(default)]
    pub autofill_preview: Option<String>,
    pub move_valid: String,
    pub move_invalid: String,
    #[serde(default)]
    pub column_row_overlay: Option<String>,
    #[serde(default)]
    pub resize_line: Option<String>,
}

/// Resolved theme with parsed colors
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub background: Color,
    pub grid_line: Color,
    pub heading_background: Color,
    pub heading_foreground: Color,
    pub heading_selected: Color,
    pub cursor: Color,
    pub selection_fill: Color,
    pub autofill_preview: Color,
    pub move_valid: Color,
    pub move_invalid: Color,
    pub column_row_overlay: Color,
    pub resize_line: Color,
    /// Palette cycled through for other users' cursors
    pub remote_cursors: Vec<Color>,
}

impl Theme {
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let data: ThemeData =
            serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse theme: {}", e))?;
        Self::from_data(data)
    }

    pub fn from_builtin(id: &str) -> Result<Self, String> {
        BUILTIN_THEMES
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| format!("Unknown builtin theme: {}", id))
            .and_then(|t| Self::from_yaml(t.yaml))
    }

    fn from_data(data: ThemeData) -> Result<Self, String> {
        let g = &data.grid;
        let cursor = Color::from_hex(&g.cursor)?;
        let optional = |value: &Option<String>, fallback: Color| match value {
            Some(hex) => Color::from_hex(hex),
            None => Ok(fallback),
        };

        let mut remote_cursors = data
            .remote_cursors
            .iter()
            .map(|hex| Color::from_hex(hex))
            .collect::<Result<Vec<_>, _>>()?;
        if remote_cursors.is_empty() {
            remote_cursors.push(cursor);
        }

        Ok(Theme {
            name: data.name.clone(),
            background: Color::from_hex(&g.background)?,
            grid_line: Color::from_hex(&g.grid_line)?,
            heading_background: Color::from_hex(&g.heading_background)?,
            heading_foreground: Color::from_hex(&g.heading_foreground)?,
            heading_selected: Color::from_hex(&g.heading_selected)?,
            cursor,
            selection_fill: Color::from_hex(&g.selection_fill)?,
            autofill_preview: optional(&g.autofill_preview, cursor.with_alpha(0x66))?,
            move_valid: Color::from_hex(&g.move_valid)?,
            move_invalid: Color::from_hex(&g.move_invalid)?,
            column_row_overlay: optional(&g.column_row_overlay, cursor.with_alpha(0x22))?,
            resize_line: optional(&g.resize_line, cursor)?,
            remote_cursors,
        })
    }

    /// Color for a remote user, stable per color index
    pub fn remote_cursor(&self, index: usize) -> Color {
        self.remote_cursors[index % self.remote_cursors.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::from_yaml(DEFAULT_DARK_YAML).unwrap_or_else(|e| {
            tracing::error!("embedded theme is invalid: {}", e);
            Theme {
                name: "Fallback".to_string(),
                background: Color::rgb(0x1E, 0x1F, 0x22),
                grid_line: Color::rgb(0x2B, 0x2D, 0x30),
                heading_background: Color::rgb(0x2B, 0x2D, 0x30),
                heading_foreground: Color::rgb(0xA9, 0xB7, 0xC6),
                heading_selected: Color::rgb(0x3D, 0x4B, 0x63),
                cursor: Color::rgb(0x4A, 0x88, 0xC7),
                selection_fill: Color::rgba(0x4A, 0x88, 0xC7, 0x33),
                autofill_preview: Color::rgba(0x4A, 0x88, 0xC7, 0x66),
                move_valid: Color::rgb(0x4A, 0x88, 0xC7),
                move_invalid: Color::rgb(0xD2, 0x52, 0x52),
                column_row_overlay: Color::rgba(0x4A, 0x88, 0xC7, 0x22),
                resize_line: Color::rgb(0x68, 0x97, 0xBB),
                remote_cursors: vec![Color::rgb(0xE0, 0x6C, 0x75)],
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_themes_parse() {
        for builtin in BUILTIN_THEMES {
            let theme = Theme::from_yaml(builtin.yaml)
                .unwrap_or_else(|e| panic!("{} failed: {}", builtin.id, e));
            assert!(!theme.remote_cursors.is_empty());
        }
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#102030").unwrap(), Color::rgb(0x10, 0x20, 0x30));
        assert_eq!(Color::from_hex("10203040").unwrap().a, 0x40);
        assert!(Color::from_hex("#123").is_err());
    }

    #[test]
    fn test_remote_cursor_palette_wraps() {
        let theme = Theme::default();
        let n = theme.remote_cursors.len();
        assert_eq!(theme.remote_cursor(0), theme.remote_cursor(n));
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(Theme::from_builtin("nope").is_err());
    }
}
