//! Session configuration.
//!
//! Every field has a default, so the host page only needs to pass the keys
//! it wants to override:
//!
//! ```json
//! {
//!   "backgrounds": [
//!     { "label": "Sunset", "src": "backgrounds/sunset.png" }
//!   ],
//!   "text_color": "#FFD700"
//! }
//! ```

use crate::color::Color;
use kurbo::Size;
use log::Level;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One entry of the background dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundChoice {
    /// Text shown to the user.
    pub label: String,
    /// Image URL (or path, for the native surface).
    pub src: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("unrecognized text color {0:?}")]
    InvalidColor(String),

    #[error("unrecognized log level {0:?}")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub surface_width: u32,
    pub surface_height: u32,
    pub photo_width: f64,
    pub photo_height: f64,
    pub corner_radius: f64,
    pub font_weight: String,
    pub font_size: f64,
    pub font_family: String,
    pub text_color: String,
    /// Height assumed for label hit boxes (text metrics only give a width).
    pub text_line_height: f64,
    pub export_filename: String,
    pub blank_export_message: String,
    pub backgrounds: Vec<BackgroundChoice>,
    /// `error`, `warn`, `info`, `debug`, or `trace`.
    pub log_level: String,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            surface_width: 630,
            surface_height: 800,
            photo_width: 335.0,
            photo_height: 420.0,
            corner_radius: 33.0,
            font_weight: "bold".to_string(),
            font_size: 35.0,
            font_family: "Arial".to_string(),
            text_color: "white".to_string(),
            text_line_height: 35.0,
            export_filename: "edited-image.png".to_string(),
            blank_export_message: "No image available to download!".to_string(),
            backgrounds: Vec::new(),
            log_level: "info".to_string(),
        }
    }
}

impl CardConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive: [(&'static str, f64); 6] = [
            ("surface_width", self.surface_width as f64),
            ("surface_height", self.surface_height as f64),
            ("photo_width", self.photo_width),
            ("photo_height", self.photo_height),
            ("font_size", self.font_size),
            ("text_line_height", self.text_line_height),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        // Zero is a plain rectangle.
        if !(self.corner_radius >= 0.0) {
            return Err(ConfigError::NonPositive {
                field: "corner_radius",
                value: self.corner_radius,
            });
        }
        if Color::parse(&self.text_color).is_none() {
            return Err(ConfigError::InvalidColor(self.text_color.clone()));
        }
        if self.log_level.parse::<Level>().is_err() {
            return Err(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }
        Ok(())
    }

    pub fn surface_size(&self) -> Size {
        Size::new(self.surface_width as f64, self.surface_height as f64)
    }

    /// Default display size of the photo layer.
    pub fn photo_size(&self) -> Size {
        Size::new(self.photo_width, self.photo_height)
    }

    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            weight: self.font_weight.clone(),
            size: self.font_size,
            family: self.font_family.clone(),
            color: self.text_color.clone(),
            line_height: self.text_line_height,
        }
    }

    /// Configured log level, `Info` if unparseable.
    pub fn log_level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::Info)
    }

    pub fn background(&self, src: &str) -> Option<&BackgroundChoice> {
        self.backgrounds.iter().find(|b| b.src == src)
    }
}

/// Font and fill used for every label.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub weight: String,
    pub size: f64,
    pub family: String,
    /// CSS color string.
    pub color: String,
    pub line_height: f64,
}

impl TextStyle {
    /// CSS `font` shorthand, e.g. `bold 35px Arial`.
    pub fn css_font(&self) -> String {
        format!("{} {}px {}", self.weight, self.size, self.family)
    }

    /// Parsed fill color; configs are validated, so this only falls back
    /// for hand-built styles.
    pub fn fill(&self) -> Color {
        Color::parse(&self.color).unwrap_or(Color::WHITE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_card_layout() {
        let c = CardConfig::default();
        assert_eq!(c.surface_size(), Size::new(630.0, 800.0));
        assert_eq!(c.photo_size(), Size::new(335.0, 420.0));
        assert_eq!(c.corner_radius, 33.0);
        assert_eq!(c.text_style().css_font(), "bold 35px Arial");
        assert_eq!(c.export_filename, "edited-image.png");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = CardConfig::from_json(
            r##"{
                "text_color": "#FFD700",
                "backgrounds": [{ "label": "Sunset", "src": "bg/sunset.png" }]
            }"##,
        )
        .unwrap();
        assert_eq!(c.text_color, "#FFD700");
        assert_eq!(c.surface_width, 630);
        assert_eq!(c.backgrounds.len(), 1);
        assert_eq!(c.background("bg/sunset.png").map(|b| b.label.as_str()), Some("Sunset"));
        assert!(c.background("bg/missing.png").is_none());
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(CardConfig::from_json("{}").unwrap(), CardConfig::default());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            CardConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            CardConfig::from_json(r#"{ "photo_width": 0 }"#),
            Err(ConfigError::NonPositive { field: "photo_width", .. })
        ));
        assert!(matches!(
            CardConfig::from_json(r#"{ "corner_radius": -4 }"#),
            Err(ConfigError::NonPositive { field: "corner_radius", .. })
        ));
        assert!(matches!(
            CardConfig::from_json(r#"{ "text_color": "sparkly" }"#),
            Err(ConfigError::InvalidColor(_))
        ));
        assert!(matches!(
            CardConfig::from_json(r#"{ "log_level": "chatty" }"#),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn log_level_parses_case_insensitively() {
        let c = CardConfig::from_json(r#"{ "log_level": "DEBUG" }"#).unwrap();
        assert_eq!(c.log_level(), Level::Debug);
        assert_eq!(CardConfig::default().log_level(), Level::Info);
    }

    #[test]
    fn zero_radius_is_allowed() {
        assert!(CardConfig::from_json(r#"{ "corner_radius": 0 }"#).is_ok());
    }
}
