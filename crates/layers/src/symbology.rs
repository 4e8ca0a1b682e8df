use scene::{Attributes, VisualSubstate};
use serde::{Deserialize, Serialize};

/// Circle-marker appearance of a point feature.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub radius: f32,
    pub fill_color: String,
    pub stroke_color: String,
    pub weight: f32,
    pub fill_opacity: f32,
}

/// Filled/stroked appearance of an outlook region.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonStyle {
    pub stroke_color: String,
    pub weight: f32,
    pub fill_color: String,
    pub fill_opacity: f32,
}

/// Per-hazard styling fallbacks, used when a feature omits its colour attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleDefaults {
    /// Attribute holding the marker's category colour.
    pub color_field: String,
    pub marker_fill: String,
    pub polygon_stroke: String,
    pub polygon_fill: String,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            color_field: "cat_color".to_string(),
            marker_fill: "#808080".to_string(),
            polygon_stroke: "#3388ff".to_string(),
            polygon_fill: "#3388ff".to_string(),
        }
    }
}

const MARKER_STROKE: &str = "#000";
const MARKER_FILL_OPACITY: f32 = 0.8;
const POLYGON_WEIGHT: f32 = 2.0;
const POLYGON_FILL_OPACITY: f32 = 0.3;

/// Marker style as a pure function of the feature's colour and its sub-state.
pub fn marker_style(
    attributes: &Attributes,
    substate: VisualSubstate,
    defaults: &StyleDefaults,
) -> MarkerStyle {
    let fill_color = attributes
        .text(&defaults.color_field)
        .unwrap_or_else(|| defaults.marker_fill.clone());
    let (radius, weight) = match substate {
        VisualSubstate::Default => (6.0, 1.0),
        VisualSubstate::Hovered => (8.0, 2.0),
        VisualSubstate::Selected => (10.0, 2.0),
    };
    MarkerStyle {
        radius,
        fill_color,
        stroke_color: MARKER_STROKE.to_string(),
        weight,
        fill_opacity: MARKER_FILL_OPACITY,
    }
}

pub fn polygon_style(attributes: &Attributes, defaults: &StyleDefaults) -> PolygonStyle {
    PolygonStyle {
        stroke_color: attributes
            .text("stroke")
            .unwrap_or_else(|| defaults.polygon_stroke.clone()),
        weight: POLYGON_WEIGHT,
        fill_color: attributes
            .text("fill")
            .unwrap_or_else(|| defaults.polygon_fill.clone()),
        fill_opacity: POLYGON_FILL_OPACITY,
    }
}

#[cfg(test)]
mod tests {
    use super::{StyleDefaults, marker_style, polygon_style};
    use scene::{AttrValue, Attributes, VisualSubstate};

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        Attributes::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), AttrValue::Text(v.to_string())))
                .collect(),
        )
    }

    #[test]
    fn marker_grows_with_substate_and_keeps_colour() {
        let d = StyleDefaults::default();
        let a = attrs(&[("CAT_COLOR", "#ff0000")]);
        let base = marker_style(&a, VisualSubstate::Default, &d);
        let hover = marker_style(&a, VisualSubstate::Hovered, &d);
        let sel = marker_style(&a, VisualSubstate::Selected, &d);
        assert_eq!((base.radius, base.weight), (6.0, 1.0));
        assert_eq!((hover.radius, hover.weight), (8.0, 2.0));
        assert_eq!((sel.radius, sel.weight), (10.0, 2.0));
        assert!([&base, &hover, &sel].iter().all(|s| s.fill_color == "#ff0000"));
    }

    #[test]
    fn missing_colours_use_defaults() {
        let d = StyleDefaults {
            marker_fill: "#888888".to_string(),
            polygon_fill: "transparent".to_string(),
            ..StyleDefaults::default()
        };
        let empty = Attributes::default();
        assert_eq!(
            marker_style(&empty, VisualSubstate::Default, &d).fill_color,
            "#888888"
        );
        let p = polygon_style(&empty, &d);
        assert_eq!(p.stroke_color, "#3388ff");
        assert_eq!(p.fill_color, "transparent");

        let p = polygon_style(&attrs(&[("stroke", "#aa0000"), ("fill", "#ffcc00")]), &d);
        assert_eq!((p.stroke_color.as_str(), p.fill_color.as_str()), ("#aa0000", "#ffcc00"));
    }
}
