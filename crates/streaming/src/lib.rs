pub mod config;
pub mod driver;
pub mod error;
pub mod request;
pub mod session;
pub mod source;

pub use config::*;
pub use driver::*;
pub use error::*;
pub use request::*;
pub use session::*;
pub use source::*;
