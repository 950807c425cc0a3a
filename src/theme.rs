//! Theme colors for the UI.
//!
//! A default palette is built in; users can override individual colors with
//! ~/.config/simboard/theme.conf in `name #rrggbb` format.

use ratatui::style::Color;
use std::collections::HashMap;
use std::fs;

#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,      // Active borders, edit icon
    pub danger: Color,      // Delete icon, error status
    pub success: Color,     // Ready status
    pub warning: Color,     // Status messages
    pub text: Color,        // Primary text
    pub text_dim: Color,    // Dimmed text, empty-state message
    pub bg_selected: Color, // Selected row background
    pub inactive: Color,    // Inactive borders
    pub header: Color,      // Table header text
}

impl Default for Theme {
    fn default() -> Self {
        // Catppuccin-inspired fallback palette
        Self {
            accent: Color::Rgb(250, 179, 135),
            danger: Color::Rgb(243, 139, 168),
            success: Color::Rgb(166, 218, 149),
            warning: Color::Rgb(250, 179, 135),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(243, 139, 168),
        }
    }
}

impl Theme {
    /// Load the theme, applying user overrides if a theme.conf exists.
    pub fn load() -> Self {
        let mut theme = Self::default();

        let Some(config) = dirs::config_dir() else {
            return theme;
        };
        let path = config.join("simboard/theme.conf");
        let Ok(content) = fs::read_to_string(&path) else {
            return theme;
        };

        for (key, color) in Self::parse_theme_conf(&content) {
            match key.as_str() {
                "accent" => theme.accent = color,
                "danger" => theme.danger = color,
                "success" => theme.success = color,
                "warning" => theme.warning = color,
                "text" => theme.text = color,
                "text_dim" => theme.text_dim = color,
                "bg_selected" => theme.bg_selected = color,
                "inactive" => theme.inactive = color,
                "header" => theme.header = color,
                other => tracing::warn!("Unknown theme key: {}", other),
            }
        }

        theme
    }

    /// Parse `name #rrggbb` lines, skipping comments and blanks.
    fn parse_theme_conf(content: &str) -> HashMap<String, Color> {
        let mut colors = HashMap::new();

        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.splitn(2, char::is_whitespace).collect();
            if parts.len() == 2 {
                if let Some(color) = Self::parse_hex_color(parts[1].trim()) {
                    colors.insert(parts[0].trim().to_string(), color);
                }
            }
        }

        colors
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');

        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            Theme::parse_hex_color("#ffc107"),
            Some(Color::Rgb(255, 193, 7))
        );
        assert_eq!(
            Theme::parse_hex_color("#fff"),
            Some(Color::Rgb(255, 255, 255))
        );
        assert_eq!(Theme::parse_hex_color("nope"), None);
    }

    #[test]
    fn test_parse_theme_conf_skips_comments_and_bad_lines() {
        let conf = "# a comment\naccent #112233\n\nbad-line\n";
        let colors = Theme::parse_theme_conf(conf);
        assert_eq!(colors.len(), 1);
        assert_eq!(colors["accent"], Color::Rgb(0x11, 0x22, 0x33));
    }
}
