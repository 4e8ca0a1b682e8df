//! GeoJSON `FeatureCollection` decoding for the day datasets.
//!
//! Only the subset the hazard datasets use is accepted: a top-level
//! `FeatureCollection` whose features carry a flat `properties` object and a
//! Point/Polygon family geometry. Unlocated features (`"geometry": null`) are
//! legal and skipped; they have nothing to render or pick.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

/// A polygon as an outer ring followed by zero or more holes.
pub type Rings = Vec<Vec<GeoPoint>>;

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(GeoPoint),
    MultiPoint(Vec<GeoPoint>),
    Polygon(Rings),
    MultiPolygon(Vec<Rings>),
}

impl Geometry {
    pub fn is_areal(&self) -> bool {
        matches!(self, Geometry::Polygon(_) | Geometry::MultiPolygon(_))
    }

    /// Every polygon of an areal geometry; empty for point geometries.
    pub fn polygons(&self) -> Vec<&Rings> {
        match self {
            Geometry::Polygon(rings) => vec![rings],
            Geometry::MultiPolygon(polys) => polys.iter().collect(),
            Geometry::Point(_) | Geometry::MultiPoint(_) => Vec::new(),
        }
    }

    /// Marker positions of a point geometry; empty for areal geometries.
    pub fn positions(&self) -> Vec<GeoPoint> {
        match self {
            Geometry::Point(p) => vec![*p],
            Geometry::MultiPoint(ps) => ps.clone(),
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    pub features: Vec<GeoFeature>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeoJsonError {
    Json(String),
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoJsonError::Json(e) => write!(f, "JSON parse error: {e}"),
            GeoJsonError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            GeoJsonError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for GeoJsonError {}

impl FeatureCollection {
    pub fn parse(payload: &str) -> Result<Self, GeoJsonError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| GeoJsonError::Json(e.to_string()))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, GeoJsonError> {
        let obj = value.as_object().ok_or(GeoJsonError::NotAFeatureCollection)?;
        if obj.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
            return Err(GeoJsonError::NotAFeatureCollection);
        }
        let raw = obj
            .get("features")
            .and_then(Value::as_array)
            .ok_or(GeoJsonError::NotAFeatureCollection)?;

        let mut features = Vec::with_capacity(raw.len());
        for (index, v) in raw.iter().enumerate() {
            let parsed =
                parse_feature(v).map_err(|reason| GeoJsonError::InvalidFeature { index, reason })?;
            features.extend(parsed);
        }

        Ok(Self { features })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// `Ok(None)` for a feature without a location.
fn parse_feature(value: &Value) -> Result<Option<GeoFeature>, String> {
    let obj = value
        .as_object()
        .ok_or_else(|| "feature must be an object".to_string())?;
    match obj.get("type").and_then(Value::as_str) {
        Some("Feature") => {}
        Some(other) => return Err(format!("unexpected feature type: {other}")),
        None => return Err("feature missing type".to_string()),
    }

    // A null or absent properties member is an empty attribute map.
    let properties = obj
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let geometry = match obj.get("geometry") {
        None => return Err("feature missing geometry".to_string()),
        Some(Value::Null) => return Ok(None),
        Some(g) => parse_geometry(g)?,
    };

    Ok(Some(GeoFeature {
        properties,
        geometry,
    }))
}

fn parse_geometry(value: &Value) -> Result<Geometry, String> {
    let obj = value
        .as_object()
        .ok_or_else(|| "geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| "geometry missing type".to_string())?;
    let coords = obj
        .get("coordinates")
        .ok_or_else(|| "geometry missing coordinates".to_string())?;

    match ty {
        "Point" => parse_position(coords).map(Geometry::Point),
        "MultiPoint" => parse_positions(coords).map(Geometry::MultiPoint),
        "Polygon" => parse_rings(coords).map(Geometry::Polygon),
        "MultiPolygon" => array(coords, "MultiPolygon")?
            .iter()
            .map(parse_rings)
            .collect::<Result<Vec<_>, _>>()
            .map(Geometry::MultiPolygon),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, String> {
    value
        .as_array()
        .ok_or_else(|| format!("{what} coordinates must be an array"))
}

fn parse_position(value: &Value) -> Result<GeoPoint, String> {
    let arr = array(value, "position")?;
    let (Some(lon), Some(lat)) = (
        arr.first().and_then(Value::as_f64),
        arr.get(1).and_then(Value::as_f64),
    ) else {
        return Err("position must be [lon, lat] numbers".to_string());
    };
    Ok(GeoPoint::new(lon, lat))
}

fn parse_positions(value: &Value) -> Result<Vec<GeoPoint>, String> {
    array(value, "ring")?.iter().map(parse_position).collect()
}

fn parse_rings(value: &Value) -> Result<Rings, String> {
    let rings = array(value, "Polygon")?
        .iter()
        .map(parse_positions)
        .collect::<Result<Rings, _>>()?;
    if rings.first().is_some_and(|outer| outer.len() < 3) {
        return Err("polygon outer ring needs at least 3 positions".to_string());
    }
    Ok(rings)
}

#[cfg(test)]
mod tests {
    use super::{FeatureCollection, GeoJsonError, GeoPoint, Geometry};
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_points_with_flat_properties() {
        let payload = r##"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "id": 7,
                 "properties": {"FACILITY_NAME": "Plant A", "cat_color": "#ff0000", "score": 3},
                 "geometry": {"type": "Point", "coordinates": [-97.5, 35.4]}},
                {"type": "Feature", "properties": null,
                 "geometry": {"type": "Point", "coordinates": [-90.0, 30.0, 12.0]}}
            ]
        }"##;
        let fc = FeatureCollection::parse(payload).expect("parse");
        assert_eq!(fc.len(), 2);
        assert_eq!(
            fc.features[0].geometry,
            Geometry::Point(GeoPoint::new(-97.5, 35.4))
        );
        assert_eq!(fc.features[0].properties["FACILITY_NAME"], "Plant A");
        assert!(fc.features[1].properties.is_empty());
    }

    #[test]
    fn parses_polygons_and_multipolygons() {
        let payload = r##"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"LABEL": "ELEVATED"},
                 "geometry": {"type": "Polygon", "coordinates": [[[0,0],[4,0],[4,4],[0,4],[0,0]]]}},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "MultiPolygon", "coordinates": [
                    [[[0,0],[1,0],[1,1],[0,0]]],
                    [[[5,5],[6,5],[6,6],[5,5]]]
                 ]}}
            ]
        }"##;
        let fc = FeatureCollection::parse(payload).expect("parse");
        assert!(fc.features.iter().all(|f| f.geometry.is_areal()));
        assert_eq!(fc.features[1].geometry.polygons().len(), 2);
        assert!(fc.features[0].geometry.positions().is_empty());
    }

    #[test]
    fn empty_collection_is_valid() {
        let fc = FeatureCollection::parse(r#"{"type":"FeatureCollection","features":[]}"#)
            .expect("parse");
        assert!(fc.is_empty());
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(matches!(
            FeatureCollection::parse("<html>404</html>"),
            Err(GeoJsonError::Json(_))
        ));
        assert_eq!(
            FeatureCollection::parse(r#"{"type":"Feature"}"#),
            Err(GeoJsonError::NotAFeatureCollection)
        );

        let bad_geom = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[1,2]}},
            {"type":"Feature","properties":{},"geometry":{"type":"LineString","coordinates":[[1,2],[3,4]]}}
        ]}"#;
        match FeatureCollection::parse(bad_geom) {
            Err(GeoJsonError::InvalidFeature { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("LineString"));
            }
            other => panic!("unexpected: {other:?}"),
        }

        let no_geom = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{}}
        ]}"#;
        assert!(matches!(
            FeatureCollection::parse(no_geom),
            Err(GeoJsonError::InvalidFeature { index: 0, .. })
        ));
    }

    #[test]
    fn unlocated_features_are_skipped() {
        let payload = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"FACILITY_NAME":"Unlocated"},"geometry":null},
            {"type":"Feature","properties":{"FACILITY_NAME":"Plant A"},
             "geometry":{"type":"Point","coordinates":[1,2]}}
        ]}"#;
        let fc = FeatureCollection::parse(payload).expect("parse");
        assert_eq!(fc.len(), 1);
        assert_eq!(fc.features[0].properties["FACILITY_NAME"], "Plant A");
    }
}
