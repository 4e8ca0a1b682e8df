use crate::feature::{FeatureIndex, IdentityKey};
use crate::store::DayDataset;

/// Visual state of one rendered point feature.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum VisualSubstate {
    #[default]
    Default,
    Hovered,
    Selected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selected {
    pub index: FeatureIndex,
    pub key: IdentityKey,
}

/// Single-selection state over the current points dataset.
///
/// Contract:
/// - At most one feature is `Selected`; the sub-state of every feature is
///   derived from `selected`/`hovered`, never stored per feature.
/// - `Selected` dominates `Hovered`: hover changes never alter a selected feature.
/// - The selection survives a points swap only through [`SelectionState::reconcile`],
///   which re-finds the previous identity key in the new dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<Selected>,
    hovered: Option<FeatureIndex>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&Selected> {
        self.selected.as_ref()
    }

    pub fn selected_index(&self) -> Option<FeatureIndex> {
        self.selected.as_ref().map(|s| s.index)
    }

    pub fn selected_key(&self) -> Option<&IdentityKey> {
        self.selected.as_ref().map(|s| &s.key)
    }

    pub fn hovered(&self) -> Option<FeatureIndex> {
        self.hovered
    }

    pub fn substate(&self, index: FeatureIndex) -> VisualSubstate {
        if self.selected_index() == Some(index) {
            VisualSubstate::Selected
        } else if self.hovered == Some(index) {
            VisualSubstate::Hovered
        } else {
            VisualSubstate::Default
        }
    }

    /// Sub-states for a dataset of `len` features, in dataset order.
    pub fn substates(&self, len: usize) -> Vec<VisualSubstate> {
        (0..len).map(|i| self.substate(FeatureIndex(i))).collect()
    }

    /// Promotes `index` to `Selected`, demoting the previous selection.
    ///
    /// Returns the features whose sub-state changed.
    pub fn select(&mut self, index: FeatureIndex, key: IdentityKey) -> Vec<FeatureIndex> {
        let mut changed = Vec::with_capacity(2);
        if let Some(prev) = self.selected_index() {
            if prev != index {
                changed.push(prev);
            }
        }
        if self.substate(index) != VisualSubstate::Selected {
            changed.push(index);
        }
        if self.hovered == Some(index) {
            self.hovered = None;
        }
        self.selected = Some(Selected { index, key });
        changed
    }

    /// Demotes the current selection (if any) to `Default`.
    pub fn clear(&mut self) -> Option<FeatureIndex> {
        self.selected.take().map(|s| s.index)
    }

    /// Marks a `Default` feature as hovered. Returns the features whose sub-state changed.
    pub fn hover(&mut self, index: FeatureIndex) -> Vec<FeatureIndex> {
        if self.substate(index) != VisualSubstate::Default {
            return Vec::new();
        }
        let mut changed = Vec::with_capacity(2);
        if let Some(prev) = self.hovered.replace(index) {
            if self.selected_index() != Some(prev) {
                changed.push(prev);
            }
        }
        changed.push(index);
        changed
    }

    /// Returns a hovered feature to `Default`. Returns `true` if it changed.
    pub fn unhover(&mut self, index: FeatureIndex) -> bool {
        if self.substate(index) != VisualSubstate::Hovered {
            return false;
        }
        self.hovered = None;
        true
    }

    /// Re-derives the selection against a freshly installed points dataset.
    ///
    /// The previous identity key is captured before anything is cleared; the
    /// first feature carrying it (in dataset order) becomes `Selected`. Hover
    /// state never carries across datasets.
    ///
    /// Returns the re-selected feature, or `None` when the state is now unselected.
    pub fn reconcile(&mut self, dataset: &DayDataset) -> Option<FeatureIndex> {
        let previous_key = self.selected.take().map(|s| s.key);
        self.hovered = None;

        let key = previous_key?;
        let index = dataset.find_by_key(&key)?;
        self.selected = Some(Selected { index, key });
        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::{SelectionState, VisualSubstate};
    use crate::attributes::Attributes;
    use crate::feature::{DatasetKind, Feature, FeatureIndex, IdentityKey};
    use crate::store::DayDataset;
    use formats::{GeoPoint, Geometry};
    use foundation::ids::{Day, LoadToken};
    use foundation::time::Time;

    fn k(s: &str) -> IdentityKey {
        IdentityKey::new(s)
    }

    fn points(names: &[&str]) -> DayDataset {
        let features = names
            .iter()
            .map(|n| {
                Feature::new(
                    k(n),
                    Attributes::default(),
                    Geometry::Point(GeoPoint::new(0.0, 0.0)),
                )
            })
            .collect();
        DayDataset::new(
            DatasetKind::Points,
            Day::new(2).expect("day"),
            LoadToken::new(2),
            Time(0.0),
            features,
        )
    }

    fn selected_count(s: &SelectionState, len: usize) -> usize {
        s.substates(len)
            .into_iter()
            .filter(|v| *v == VisualSubstate::Selected)
            .count()
    }

    #[test]
    fn select_demotes_previous() {
        let mut s = SelectionState::new();
        assert_eq!(s.select(FeatureIndex(0), k("A")), vec![FeatureIndex(0)]);
        assert_eq!(
            s.select(FeatureIndex(2), k("C")),
            vec![FeatureIndex(0), FeatureIndex(2)]
        );
        assert_eq!(s.substate(FeatureIndex(0)), VisualSubstate::Default);
        assert_eq!(s.substate(FeatureIndex(2)), VisualSubstate::Selected);
        assert_eq!(s.selected_key(), Some(&k("C")));
        assert_eq!(selected_count(&s, 3), 1);

        // Re-selecting the same feature changes nothing visually.
        assert!(s.select(FeatureIndex(2), k("C")).is_empty());
    }

    #[test]
    fn clear_returns_demoted() {
        let mut s = SelectionState::new();
        assert_eq!(s.clear(), None);
        s.select(FeatureIndex(1), k("B"));
        assert_eq!(s.clear(), Some(FeatureIndex(1)));
        assert_eq!(s.selected_key(), None);
        assert_eq!(selected_count(&s, 3), 0);
    }

    #[test]
    fn hover_never_touches_selected() {
        let mut s = SelectionState::new();
        s.select(FeatureIndex(0), k("A"));
        assert!(s.hover(FeatureIndex(0)).is_empty());
        assert!(!s.unhover(FeatureIndex(0)));
        assert_eq!(s.substate(FeatureIndex(0)), VisualSubstate::Selected);

        assert_eq!(s.hover(FeatureIndex(1)), vec![FeatureIndex(1)]);
        assert_eq!(s.substate(FeatureIndex(1)), VisualSubstate::Hovered);
        assert_eq!(
            s.hover(FeatureIndex(2)),
            vec![FeatureIndex(1), FeatureIndex(2)]
        );
        assert!(!s.unhover(FeatureIndex(1)));
        assert!(s.unhover(FeatureIndex(2)));
        assert_eq!(s.substate(FeatureIndex(2)), VisualSubstate::Default);
    }

    #[test]
    fn selecting_hovered_feature_drops_hover() {
        let mut s = SelectionState::new();
        s.hover(FeatureIndex(1));
        s.select(FeatureIndex(1), k("B"));
        assert_eq!(s.hovered(), None);
        s.clear();
        assert_eq!(s.substate(FeatureIndex(1)), VisualSubstate::Default);
    }

    #[test]
    fn reconcile_reselects_first_match_by_key() {
        let mut s = SelectionState::new();
        s.select(FeatureIndex(0), k("Plant A"));
        s.hover(FeatureIndex(1));

        let ds = points(&["Other", "Plant A", "Plant A"]);
        assert_eq!(s.reconcile(&ds), Some(FeatureIndex(1)));
        assert_eq!(s.selected_key(), Some(&k("Plant A")));
        assert_eq!(s.hovered(), None);
        assert_eq!(selected_count(&s, ds.len()), 1);
    }

    #[test]
    fn reconcile_without_match_unselects() {
        let mut s = SelectionState::new();
        s.select(FeatureIndex(0), k("Gone"));
        assert_eq!(s.reconcile(&points(&["A", "B"])), None);
        assert_eq!(s.selected_key(), None);

        let mut fresh = SelectionState::new();
        assert_eq!(fresh.reconcile(&points(&["A"])), None);
    }

    #[test]
    fn unnamed_selection_is_not_carried() {
        let mut s = SelectionState::new();
        s.select(FeatureIndex(0), k(""));
        assert_eq!(s.reconcile(&points(&["", "A"])), None);
    }
}
