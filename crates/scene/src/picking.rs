use formats::{GeoPoint, Rings};
use foundation::bounds::Aabb2;

use crate::feature::FeatureIndex;
use crate::store::FeatureStore;

/// The single target a click gesture resolves to.
///
/// A gesture has exactly one target: a point hit shadows any polygon or the
/// background underneath it, mirroring the points pane sitting above the
/// polygon pane.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    Point(FeatureIndex),
    Polygon(FeatureIndex),
    Background,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    /// Marker hit radius in degrees.
    pub point_tolerance_deg: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            point_tolerance_deg: 0.1,
        }
    }
}

/// Deterministic click routing over the current store.
///
/// Ordering contract:
/// - Points are tested first; the closest marker within tolerance wins, ties
///   going to the lower feature index.
/// - Otherwise the lowest-index polygon containing the location wins.
/// - Otherwise the click is a background click.
pub fn pick(store: &FeatureStore, at: GeoPoint, opts: PickOptions) -> ClickTarget {
    if let Some(index) = pick_point(store, at, opts.point_tolerance_deg) {
        return ClickTarget::Point(index);
    }
    if let Some(index) = pick_polygon(store, at) {
        return ClickTarget::Polygon(index);
    }
    ClickTarget::Background
}

fn pick_point(store: &FeatureStore, at: GeoPoint, tolerance: f64) -> Option<FeatureIndex> {
    let points = store.points()?;
    let tol2 = tolerance * tolerance;
    let mut best: Option<(f64, usize)> = None;

    for (idx, feature) in points.features.iter().enumerate() {
        for p in feature.geometry.positions() {
            let dx = p.lon_deg - at.lon_deg;
            let dy = p.lat_deg - at.lat_deg;
            let d2 = dx * dx + dy * dy;
            if d2 > tol2 {
                continue;
            }
            // Strict comparison keeps the lower index on ties.
            if best.is_none_or(|(bd, _)| d2.total_cmp(&bd).is_lt()) {
                best = Some((d2, idx));
            }
        }
    }

    best.map(|(_, idx)| FeatureIndex(idx))
}

fn pick_polygon(store: &FeatureStore, at: GeoPoint) -> Option<FeatureIndex> {
    let polygons = store.polygons()?;
    polygons
        .features
        .iter()
        .position(|f| f.geometry.polygons().into_iter().any(|rings| contains(rings, at)))
        .map(FeatureIndex)
}

/// Even-odd containment: inside the outer ring and outside every hole.
fn contains(rings: &Rings, at: GeoPoint) -> bool {
    let Some(outer) = rings.first() else {
        return false;
    };
    let bounds = Aabb2::from_points(outer.iter().map(|p| [p.lon_deg, p.lat_deg]));
    if !bounds.is_some_and(|b| b.contains([at.lon_deg, at.lat_deg])) {
        return false;
    }
    ring_contains(outer, at) && !rings[1..].iter().any(|hole| ring_contains(hole, at))
}

fn ring_contains(ring: &[GeoPoint], at: GeoPoint) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let (x, y) = (at.lon_deg, at.lat_deg);
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (ring[i].lon_deg, ring[i].lat_deg);
        let (xj, yj) = (ring[j].lon_deg, ring[j].lat_deg);
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::{ClickTarget, PickOptions, pick};
    use crate::attributes::Attributes;
    use crate::feature::{DatasetKind, Feature, FeatureIndex, IdentityKey};
    use crate::store::{DayDataset, FeatureStore};
    use formats::{GeoPoint, Geometry};
    use foundation::ids::{Day, LoadToken};
    use foundation::time::Time;

    fn gp(lon: f64, lat: f64) -> GeoPoint {
        GeoPoint::new(lon, lat)
    }

    fn square(min: f64, max: f64) -> Vec<GeoPoint> {
        vec![gp(min, min), gp(max, min), gp(max, max), gp(min, max), gp(min, min)]
    }

    fn store() -> FeatureStore {
        let day = Day::new(1).expect("day");
        let feature = |g: Geometry| Feature::new(IdentityKey::new("f"), Attributes::default(), g);

        let mut store = FeatureStore::new();
        store.replace(DayDataset::new(
            DatasetKind::Points,
            day,
            LoadToken::new(1),
            Time(0.0),
            vec![
                feature(Geometry::Point(gp(5.0, 5.0))),
                feature(Geometry::Point(gp(5.05, 5.0))),
                feature(Geometry::Point(gp(5.0, 5.0))),
            ],
        ));
        store.replace(DayDataset::new(
            DatasetKind::Polygons,
            day,
            LoadToken::new(1),
            Time(0.0),
            vec![
                // Square with a hole in the middle.
                feature(Geometry::Polygon(vec![square(0.0, 10.0), square(4.0, 6.0)])),
                feature(Geometry::Polygon(vec![square(0.0, 20.0)])),
            ],
        ));
        store
    }

    #[test]
    fn point_shadows_polygon_and_ties_go_to_lower_index() {
        let s = store();
        let hit = pick(&s, gp(5.0, 5.0), PickOptions::default());
        assert_eq!(hit, ClickTarget::Point(FeatureIndex(0)));

        let hit = pick(&s, gp(5.06, 5.0), PickOptions::default());
        assert_eq!(hit, ClickTarget::Point(FeatureIndex(1)));
    }

    #[test]
    fn holes_fall_through_to_next_polygon() {
        let s = store();
        let opts = PickOptions {
            point_tolerance_deg: 0.01,
        };
        assert_eq!(pick(&s, gp(2.0, 2.0), opts), ClickTarget::Polygon(FeatureIndex(0)));
        assert_eq!(pick(&s, gp(4.5, 4.5), opts), ClickTarget::Polygon(FeatureIndex(1)));
        assert_eq!(pick(&s, gp(30.0, 30.0), opts), ClickTarget::Background);
    }

    #[test]
    fn empty_store_is_background() {
        let s = FeatureStore::new();
        assert_eq!(
            pick(&s, gp(0.0, 0.0), PickOptions::default()),
            ClickTarget::Background
        );
    }
}
