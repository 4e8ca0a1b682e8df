pub mod labels;
pub mod layer;
pub mod panel;
pub mod symbology;
pub mod vector;
pub mod viewport;

pub use layer::*;
