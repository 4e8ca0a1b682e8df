use foundation::ids::LoadToken;
use scene::DatasetKind;

/// Identifies one rendered layer: the dataset kind plus the generation (load
/// token) of the dataset it was built from.
///
/// Interaction events carry the `LayerId` they were raised on, so an event from
/// a superseded layer can be recognized and dropped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LayerId {
    pub kind: DatasetKind,
    pub generation: LoadToken,
}

impl LayerId {
    pub fn new(kind: DatasetKind, generation: LoadToken) -> Self {
        Self { kind, generation }
    }

    /// Stacking order: points draw above polygons.
    pub fn z_index(&self) -> i32 {
        match self.kind {
            DatasetKind::Points => 650,
            DatasetKind::Polygons => 200,
        }
    }
}

pub trait Layer {
    fn id(&self) -> LayerId;
}
