pub mod attributes;
pub mod feature;
pub mod picking;
pub mod selection;
pub mod store;

pub use attributes::*;
pub use feature::*;
pub use picking::*;
pub use selection::*;
pub use store::*;
