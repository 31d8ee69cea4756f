//! Colors and the editor palette.

use crate::config::ThemeConfig;
use crate::highlight::HighlightStyle;

/// An RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Creates an opaque color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parses `#rrggbb` (the `#` is optional). Returns `None` for
    /// anything malformed.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::rgb(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
        ))
    }

    /// Components as 8-bit values.
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let scale = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (scale(self.r), scale(self.g), scale(self.b))
    }

    /// The 24-bit ANSI foreground escape for this color.
    pub fn ansi_fg(&self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("\x1b[38;2;{r};{g};{b}m")
    }
}

/// The editor's color palette.
///
/// The default is a dark scheme: cyan keywords, green strings, muted
/// gray-blue comments, pale yellow for find matches.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color,
    pub foreground: Color,
    pub keyword: Color,
    pub string: Color,
    pub comment: Color,
    pub match_highlight: Color,
}

impl Theme {
    /// The built-in dark theme.
    pub fn dark() -> Self {
        Self {
            name: "webpad-dark".to_string(),
            background: Color::rgb(0.157, 0.165, 0.212), // #282a36
            foreground: Color::rgb(0.973, 0.973, 0.949), // #f8f8f2
            keyword: Color::rgb(0.400, 0.851, 0.937),    // #66d9ef
            string: Color::rgb(0.596, 0.765, 0.475),     // #98c379
            comment: Color::rgb(0.384, 0.447, 0.643),    // #6272a4
            match_highlight: Color::rgb(0.945, 0.980, 0.549), // #f1fa8c
        }
    }

    /// Builds a palette from config, keeping the dark default for any
    /// color that is missing or malformed.
    pub fn from_config(config: &ThemeConfig) -> Self {
        fn apply(slot: &mut Color, value: &Option<String>) {
            if let Some(hex) = value {
                match Color::from_hex(hex) {
                    Some(color) => *slot = color,
                    None => tracing::warn!("ignoring malformed theme color {hex:?}"),
                }
            }
        }

        let mut theme = Self::dark();
        apply(&mut theme.background, &config.background);
        apply(&mut theme.foreground, &config.foreground);
        apply(&mut theme.keyword, &config.keyword);
        apply(&mut theme.string, &config.string);
        apply(&mut theme.comment, &config.comment);
        apply(&mut theme.match_highlight, &config.match_highlight);
        theme
    }

    /// The render color for a highlight style.
    pub fn style_color(&self, style: HighlightStyle) -> Color {
        match style {
            HighlightStyle::Keyword => self.keyword,
            HighlightStyle::String => self.string,
            HighlightStyle::Comment => self.comment,
            HighlightStyle::Match => self.match_highlight,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        let cyan = Color::from_hex("#66d9ef").unwrap();
        assert_eq!(cyan.to_rgb8(), (0x66, 0xd9, 0xef));

        let bare = Color::from_hex("6272a4").unwrap();
        assert_eq!(bare.to_rgb8(), (0x62, 0x72, 0xa4));
    }

    #[test]
    fn test_hex_rejects_malformed_input() {
        assert!(Color::from_hex("#66d9e").is_none());
        assert!(Color::from_hex("not hex").is_none());
        assert!(Color::from_hex("#gggggg").is_none());
        assert!(Color::from_hex("").is_none());
        // from_str_radix tolerates a leading sign per pair
        assert!(Color::from_hex("+1+2+3").is_none());
    }

    #[test]
    fn test_default_palette() {
        let theme = Theme::dark();
        assert_eq!(theme.keyword.to_rgb8(), (0x66, 0xd9, 0xef));
        assert_eq!(theme.comment.to_rgb8(), (0x62, 0x72, 0xa4));
        assert_eq!(theme.background.to_rgb8(), (0x28, 0x2a, 0x36));
    }

    #[test]
    fn test_config_overrides_and_fallback() {
        let config = ThemeConfig {
            keyword: Some("#ff0000".to_string()),
            comment: Some("bogus".to_string()),
            ..ThemeConfig::default()
        };
        let theme = Theme::from_config(&config);
        assert_eq!(theme.keyword.to_rgb8(), (255, 0, 0));
        // Malformed entry keeps the default
        assert_eq!(theme.comment.to_rgb8(), (0x62, 0x72, 0xa4));
    }

    #[test]
    fn test_ansi_escape_shape() {
        let color = Color::from_hex("#010203").unwrap();
        assert_eq!(color.ansi_fg(), "\x1b[38;2;1;2;3m");
    }
}
