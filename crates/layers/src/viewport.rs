use scene::FeatureIndex;

use crate::labels::Popup;
use crate::layer::{Layer, LayerId};
use crate::symbology::MarkerStyle;
use crate::vector::{PointLayerSnapshot, PolygonLayerSnapshot};

/// A rendered feature as seen by the map surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FeatureRef {
    pub layer: LayerId,
    pub index: FeatureIndex,
}

impl FeatureRef {
    pub fn new(layer: LayerId, index: FeatureIndex) -> Self {
        Self { layer, index }
    }
}

/// Interaction stream emitted by the map surface.
///
/// One physical click produces exactly one of `FeatureClick`, `RegionClick` or
/// `BackgroundClick`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MapEvent {
    FeatureClick(FeatureRef),
    FeatureHover(FeatureRef),
    FeatureUnhover(FeatureRef),
    RegionClick(FeatureRef),
    BackgroundClick,
}

/// Rendering surface the core drives. Implementations own no selection state.
pub trait MapViewport {
    /// Replaces the whole points layer.
    fn show_points(&mut self, layer: PointLayerSnapshot);
    /// Replaces the whole polygon layer.
    fn show_polygons(&mut self, layer: PolygonLayerSnapshot);
    fn restyle_marker(&mut self, layer: LayerId, index: FeatureIndex, style: MarkerStyle);
    fn open_popup(&mut self, layer: LayerId, index: FeatureIndex, popup: Popup);
}

/// In-memory viewport holding whatever was last drawn.
#[derive(Debug, Default, Clone)]
pub struct HeadlessViewport {
    points: Option<PointLayerSnapshot>,
    polygons: Option<PolygonLayerSnapshot>,
    popup: Option<(LayerId, FeatureIndex, Popup)>,
    point_layer_swaps: usize,
    polygon_layer_swaps: usize,
}

impl HeadlessViewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> Option<&PointLayerSnapshot> {
        self.points.as_ref()
    }

    pub fn polygons(&self) -> Option<&PolygonLayerSnapshot> {
        self.polygons.as_ref()
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref().map(|(_, _, p)| p)
    }

    pub fn marker_style(&self, index: FeatureIndex) -> Option<&MarkerStyle> {
        self.points.as_ref()?.marker(index).map(|m| &m.style)
    }

    pub fn point_layer_swaps(&self) -> usize {
        self.point_layer_swaps
    }

    pub fn polygon_layer_swaps(&self) -> usize {
        self.polygon_layer_swaps
    }
}

impl MapViewport for HeadlessViewport {
    fn show_points(&mut self, layer: PointLayerSnapshot) {
        self.points = Some(layer);
        self.point_layer_swaps += 1;
    }

    fn show_polygons(&mut self, layer: PolygonLayerSnapshot) {
        // Popups belong to the layer they were opened on.
        if self.popup.as_ref().is_some_and(|(id, _, _)| id.kind == layer.id().kind) {
            self.popup = None;
        }
        self.polygons = Some(layer);
        self.polygon_layer_swaps += 1;
    }

    fn restyle_marker(&mut self, layer: LayerId, index: FeatureIndex, style: MarkerStyle) {
        let Some(points) = self.points.as_mut() else {
            return;
        };
        if points.id != layer {
            return;
        }
        if let Some(marker) = points.markers.get_mut(index.0) {
            marker.style = style;
        }
    }

    fn open_popup(&mut self, layer: LayerId, index: FeatureIndex, popup: Popup) {
        self.popup = Some((layer, index, popup));
    }
}
