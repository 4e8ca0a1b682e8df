use formats::{GeoPoint, Rings};
use scene::{DayDataset, FeatureIndex, IdentityKey, SelectionState};

use crate::labels::{Popup, popup_for};
use crate::layer::{Layer, LayerId};
use crate::symbology::{MarkerStyle, PolygonStyle, StyleDefaults, marker_style, polygon_style};

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub index: FeatureIndex,
    pub key: IdentityKey,
    pub positions: Vec<GeoPoint>,
    pub style: MarkerStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub index: FeatureIndex,
    pub polygons: Vec<Rings>,
    pub style: PolygonStyle,
    pub popup: Popup,
}

/// Everything a viewport needs to draw the facility markers of one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLayerSnapshot {
    pub id: LayerId,
    pub markers: Vec<Marker>,
}

/// Everything a viewport needs to draw the outlook regions of one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonLayerSnapshot {
    pub id: LayerId,
    pub regions: Vec<Region>,
}

impl Layer for PointLayerSnapshot {
    fn id(&self) -> LayerId {
        self.id
    }
}

impl Layer for PolygonLayerSnapshot {
    fn id(&self) -> LayerId {
        self.id
    }
}

impl PointLayerSnapshot {
    /// Builds markers in dataset order, styling each from its current sub-state.
    pub fn extract(
        dataset: &DayDataset,
        selection: &SelectionState,
        defaults: &StyleDefaults,
    ) -> Self {
        let markers = dataset
            .features
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let index = FeatureIndex(i);
                Marker {
                    index,
                    key: f.identity_key.clone(),
                    positions: f.geometry.positions(),
                    style: marker_style(&f.attributes, selection.substate(index), defaults),
                }
            })
            .collect();
        Self {
            id: LayerId::new(dataset.kind, dataset.token),
            markers,
        }
    }

    pub fn marker(&self, index: FeatureIndex) -> Option<&Marker> {
        self.markers.get(index.0)
    }
}

impl PolygonLayerSnapshot {
    pub fn extract(dataset: &DayDataset, defaults: &StyleDefaults, popup_title: &str) -> Self {
        let regions = dataset
            .features
            .iter()
            .enumerate()
            .map(|(i, f)| Region {
                index: FeatureIndex(i),
                polygons: f.geometry.polygons().into_iter().cloned().collect(),
                style: polygon_style(&f.attributes, defaults),
                popup: popup_for(&f.attributes, popup_title),
            })
            .collect();
        Self {
            id: LayerId::new(dataset.kind, dataset.token),
            regions,
        }
    }
}
