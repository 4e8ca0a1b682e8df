use formats::{GeoFeature, Geometry};

use crate::attributes::Attributes;

/// Human-readable facility name used to recognize the same facility across days.
///
/// Not guaranteed unique within a day. An empty key means the feature carried
/// no usable name; such features can be clicked but never re-selected by key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which of the two independently loaded collections a feature belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatasetKind {
    Points,
    Polygons,
}

impl DatasetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DatasetKind::Points => "points",
            DatasetKind::Polygons => "polygons",
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a feature within its dataset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureIndex(pub usize);

/// Immutable feature record.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub identity_key: IdentityKey,
    pub attributes: Attributes,
    pub geometry: Geometry,
}

impl Feature {
    pub fn new(identity_key: IdentityKey, attributes: Attributes, geometry: Geometry) -> Self {
        Self {
            identity_key,
            attributes,
            geometry,
        }
    }

    /// Builds a feature, taking the identity from the first non-blank of `identity_fields`.
    pub fn from_geo<S: AsRef<str>>(geo: &GeoFeature, identity_fields: &[S]) -> Self {
        let attributes = Attributes::from_properties(&geo.properties);
        let identity_key = attributes
            .first_text(identity_fields)
            .map(IdentityKey::new)
            .unwrap_or_default();
        Self::new(identity_key, attributes, geo.geometry.clone())
    }
}
