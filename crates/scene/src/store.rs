use foundation::ids::{Day, LoadToken};
use foundation::time::Time;

use crate::feature::{DatasetKind, Feature, FeatureIndex, IdentityKey};

/// One successfully fetched collection for one day.
///
/// Points and polygons are fetched and swapped independently, so each carries
/// its own day, token and load time.
#[derive(Debug, Clone, PartialEq)]
pub struct DayDataset {
    pub kind: DatasetKind,
    pub day: Day,
    /// Token of the request that produced this dataset; doubles as the layer generation.
    pub token: LoadToken,
    pub loaded_at: Time,
    pub features: Vec<Feature>,
}

impl DayDataset {
    pub fn new(
        kind: DatasetKind,
        day: Day,
        token: LoadToken,
        loaded_at: Time,
        features: Vec<Feature>,
    ) -> Self {
        Self {
            kind,
            day,
            token,
            loaded_at,
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, index: FeatureIndex) -> Option<&Feature> {
        self.features.get(index.0)
    }

    /// First feature (in dataset order) whose identity equals `key`.
    ///
    /// Blank keys never match: an unnamed facility is not "the same" as any other.
    pub fn find_by_key(&self, key: &IdentityKey) -> Option<FeatureIndex> {
        if key.is_empty() {
            return None;
        }
        self.features
            .iter()
            .position(|f| &f.identity_key == key)
            .map(FeatureIndex)
    }
}

/// The currently displayed point and polygon collections.
///
/// Pure data: replacing a collection is atomic per kind and never touches the other.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FeatureStore {
    points: Option<DayDataset>,
    polygons: Option<DayDataset>,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> Option<&DayDataset> {
        self.points.as_ref()
    }

    pub fn polygons(&self) -> Option<&DayDataset> {
        self.polygons.as_ref()
    }

    pub fn dataset(&self, kind: DatasetKind) -> Option<&DayDataset> {
        match kind {
            DatasetKind::Points => self.points(),
            DatasetKind::Polygons => self.polygons(),
        }
    }

    /// Installs `dataset` in the slot for its kind, returning the superseded one.
    pub fn replace(&mut self, dataset: DayDataset) -> Option<DayDataset> {
        let slot = match dataset.kind {
            DatasetKind::Points => &mut self.points,
            DatasetKind::Polygons => &mut self.polygons,
        };
        slot.replace(dataset)
    }

    pub fn point(&self, index: FeatureIndex) -> Option<&Feature> {
        self.points.as_ref()?.get(index)
    }

    pub fn polygon(&self, index: FeatureIndex) -> Option<&Feature> {
        self.polygons.as_ref()?.get(index)
    }

    /// Day shown by both collections, if they agree.
    pub fn current_day(&self) -> Option<Day> {
        match (&self.points, &self.polygons) {
            (Some(p), Some(g)) if p.day == g.day => Some(p.day),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DayDataset, FeatureStore};
    use crate::attributes::Attributes;
    use crate::feature::{DatasetKind, Feature, FeatureIndex, IdentityKey};
    use formats::{GeoPoint, Geometry};
    use foundation::ids::{Day, LoadToken};
    use foundation::time::Time;

    fn point(name: &str) -> Feature {
        Feature::new(
            IdentityKey::new(name),
            Attributes::default(),
            Geometry::Point(GeoPoint::new(0.0, 0.0)),
        )
    }

    fn dataset(kind: DatasetKind, day: u8, features: Vec<Feature>) -> DayDataset {
        DayDataset::new(
            kind,
            Day::new(day).expect("day"),
            LoadToken::new(day as u64),
            Time(0.0),
            features,
        )
    }

    #[test]
    fn replace_swaps_only_its_kind() {
        let mut store = FeatureStore::new();
        assert!(store.replace(dataset(DatasetKind::Points, 1, vec![point("A")])).is_none());
        store.replace(dataset(DatasetKind::Polygons, 1, vec![]));
        assert_eq!(store.current_day().map(Day::get), Some(1));

        let old = store
            .replace(dataset(DatasetKind::Points, 2, vec![point("B")]))
            .expect("superseded");
        assert_eq!(old.day.get(), 1);
        assert_eq!(store.polygons().map(|d| d.day.get()), Some(1));
        assert_eq!(store.current_day(), None);
        assert_eq!(
            store.point(FeatureIndex(0)).map(|f| f.identity_key.as_str()),
            Some("B")
        );
    }

    #[test]
    fn find_by_key_takes_first_match_and_skips_blank() {
        let ds = dataset(
            DatasetKind::Points,
            1,
            vec![point(""), point("Dup"), point("Dup")],
        );
        assert_eq!(ds.find_by_key(&IdentityKey::new("Dup")), Some(FeatureIndex(1)));
        assert_eq!(ds.find_by_key(&IdentityKey::new("")), None);
        assert_eq!(ds.find_by_key(&IdentityKey::new("Nope")), None);
    }
}
