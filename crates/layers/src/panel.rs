//! Info panel bridge: turns a selection outcome into what the side panel shows.
//!
//! The panel is write-only from the core's point of view. Which attributes are
//! shown, and what is printed when one is missing, is a versioned schema per
//! hazard type; a missing attribute is never an error.

use scene::Attributes;
use serde::{Deserialize, Serialize};

/// What the core asks the panel to show.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderRequest {
    ShowDefault,
    ShowFeature(Attributes),
}

impl RenderRequest {
    pub fn is_feature(&self) -> bool {
        matches!(self, RenderRequest::ShowFeature(_))
    }
}

/// One recognized attribute with its label and substitute text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub key: String,
    pub label: String,
    #[serde(default = "not_available")]
    pub default: String,
}

impl FieldSpec {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            default: not_available(),
        }
    }
}

fn not_available() -> String {
    "N/A".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSchema {
    pub version: u32,
    pub prompt: String,
    /// Facility name attributes, tried in order.
    pub name_fields: Vec<String>,
    pub name_default: String,
    pub color_field: String,
    pub color_default: String,
    pub headline: FieldSpec,
    pub details: Vec<FieldSpec>,
}

const PROMPT: &str = "Select a location for specific risk information";

impl PanelSchema {
    pub fn fire_v1() -> Self {
        Self {
            version: 1,
            prompt: PROMPT.to_string(),
            name_fields: vec!["LOCATION".to_string(), "FACILITY_NAME".to_string()],
            name_default: "Unknown Facility".to_string(),
            color_field: "cat_color".to_string(),
            color_default: "#ffffff".to_string(),
            headline: FieldSpec::new("outlook", "Overall Fire Risk"),
            details: vec![
                FieldSpec::new("fireweather_risk", "Fire Weather Risk"),
                FieldSpec::new("dryT_risk", "Dry T risk"),
            ],
        }
    }

    pub fn severe_v1() -> Self {
        Self {
            version: 1,
            prompt: PROMPT.to_string(),
            name_fields: vec!["FACILITY_NAME".to_string(), "LOCATION".to_string()],
            name_default: "Unknown Facility".to_string(),
            color_field: "cat_color".to_string(),
            color_default: "#ffffff".to_string(),
            headline: FieldSpec::new("cat_risk", "Overall Severe Risk"),
            details: vec![
                FieldSpec::new("TORN_RISK", "Tornado Risk"),
                FieldSpec::new("TORN_SIG_RISK", "Significant Tornado Risk"),
                FieldSpec::new("HAIL_RISK", "Hail Risk"),
                FieldSpec::new("HAIL_SIG_RISK", "Significant Hail Risk"),
                FieldSpec::new("WIND_RISK", "High Wind Risk"),
                FieldSpec::new("WIND_SIG_RISK", "Significant High Wind Risk"),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturePanel {
    pub facility: String,
    /// Colour applied to the headline.
    pub color: String,
    pub headline: PanelRow,
    pub details: Vec<PanelRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelView {
    Prompt(String),
    Feature(FeaturePanel),
}

impl std::fmt::Display for PanelView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PanelView::Prompt(p) => write!(f, "{p}"),
            PanelView::Feature(panel) => {
                writeln!(f, "Facility: {}", panel.facility)?;
                write!(
                    f,
                    "{}: {} ({})",
                    panel.headline.label, panel.headline.value, panel.color
                )?;
                for row in &panel.details {
                    write!(f, "\n{}: {}", row.label, row.value)?;
                }
                Ok(())
            }
        }
    }
}

/// Stateless translation of [`RenderRequest`]s through a [`PanelSchema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoPanelBridge {
    schema: PanelSchema,
}

impl InfoPanelBridge {
    pub fn new(schema: PanelSchema) -> Self {
        Self { schema }
    }

    pub fn render(&self, request: &RenderRequest) -> PanelView {
        let attrs = match request {
            RenderRequest::ShowDefault => return PanelView::Prompt(self.schema.prompt.clone()),
            RenderRequest::ShowFeature(attrs) => attrs,
        };
        let row = |spec: &FieldSpec| PanelRow {
            label: spec.label.clone(),
            value: attrs
                .text(&spec.key)
                .unwrap_or_else(|| spec.default.clone()),
        };
        PanelView::Feature(FeaturePanel {
            facility: attrs
                .first_text(self.schema.name_fields.as_slice())
                .unwrap_or_else(|| self.schema.name_default.clone()),
            color: attrs
                .text(&self.schema.color_field)
                .unwrap_or_else(|| self.schema.color_default.clone()),
            headline: row(&self.schema.headline),
            details: self.schema.details.iter().map(row).collect(),
        })
    }
}

/// Write-only sink the bridge's output is presented on.
pub trait PanelSurface {
    fn present(&mut self, view: PanelView);
}

/// Keeps every presented view; the last one is what is on screen.
#[derive(Debug, Default, Clone)]
pub struct RecordingPanel {
    views: Vec<PanelView>,
}

impl RecordingPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn views(&self) -> &[PanelView] {
        &self.views
    }

    pub fn current(&self) -> Option<&PanelView> {
        self.views.last()
    }
}

impl PanelSurface for RecordingPanel {
    fn present(&mut self, view: PanelView) {
        self.views.push(view);
    }
}
