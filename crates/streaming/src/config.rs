//! Per-hazard configuration: where the day datasets live, how facilities are
//! named, and how the map and panel present them.

use std::path::Path;
use std::str::FromStr;

use foundation::ids::Day;
use layers::panel::PanelSchema;
use layers::symbology::StyleDefaults;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardKind {
    Fire,
    Severe,
}

impl FromStr for HazardKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fire" => Ok(HazardKind::Fire),
            "severe" | "spc" => Ok(HazardKind::Severe),
            other => Err(ConfigError::UnknownHazard(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownHazard(String),
    Io { path: String, message: String },
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::UnknownHazard(s) => {
                write!(f, "unknown hazard kind '{s}' (expected fire or severe)")
            }
            ConfigError::Io { path, message } => write!(f, "cannot read {path}: {message}"),
            ConfigError::Parse(msg) => write!(f, "invalid hazard profile: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Everything that differs between hazard types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardProfile {
    pub kind: HazardKind,
    /// File-name prefix of the day datasets (`Fire`, `SPC`).
    pub prefix: String,
    /// Directory or URL holding `<prefix>_day_<d>.geojson`.
    pub points_base: String,
    /// Directory or URL holding `<prefix>Outlook_day_<d>.geojson`.
    pub outlook_base: String,
    /// Attributes naming a facility, tried in order; the first non-blank is its identity key.
    pub identity_fields: Vec<String>,
    #[serde(default)]
    pub style: StyleDefaults,
    /// Popup title for regions without a `LABEL`.
    pub popup_title: String,
    pub panel: PanelSchema,
}

impl HazardProfile {
    pub fn builtin(kind: HazardKind) -> Self {
        match kind {
            HazardKind::Fire => Self::fire(),
            HazardKind::Severe => Self::severe(),
        }
    }

    pub fn fire() -> Self {
        Self {
            kind: HazardKind::Fire,
            prefix: "Fire".to_string(),
            points_base: "data/Fire_Data".to_string(),
            outlook_base: "data/Fire_Outlooks".to_string(),
            identity_fields: vec!["LOCATION".to_string(), "FACILITY_NAME".to_string()],
            style: StyleDefaults {
                marker_fill: "#888888".to_string(),
                polygon_fill: "transparent".to_string(),
                ..StyleDefaults::default()
            },
            popup_title: "Outlook".to_string(),
            panel: PanelSchema::fire_v1(),
        }
    }

    pub fn severe() -> Self {
        Self {
            kind: HazardKind::Severe,
            prefix: "SPC".to_string(),
            points_base: "data/SPC_Data".to_string(),
            outlook_base: "data/SPC_Outlooks".to_string(),
            identity_fields: vec!["FACILITY_NAME".to_string(), "LOCATION".to_string()],
            style: StyleDefaults::default(),
            popup_title: "SPC Outlook".to_string(),
            panel: PanelSchema::severe_v1(),
        }
    }

    pub fn with_bases(mut self, points_base: impl Into<String>, outlook_base: impl Into<String>) -> Self {
        self.points_base = points_base.into();
        self.outlook_base = outlook_base.into();
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&text)
    }

    /// Points dataset URL, cache-busted with `t=<cache_bust>`.
    pub fn points_url(&self, day: Day, cache_bust: u64) -> String {
        format!(
            "{}/{}_day_{}.geojson?t={}",
            self.points_base.trim_end_matches('/'),
            self.prefix,
            day,
            cache_bust
        )
    }

    /// Outlook polygons URL, cache-busted with `t=<cache_bust>`.
    pub fn polygons_url(&self, day: Day, cache_bust: u64) -> String {
        format!(
            "{}/{}Outlook_day_{}.geojson?t={}",
            self.outlook_base.trim_end_matches('/'),
            self.prefix,
            day,
            cache_bust
        )
    }
}
