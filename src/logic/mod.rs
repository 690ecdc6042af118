pub mod catalog;
pub mod registry;
pub mod resolver;

pub use catalog::*;
pub use registry::*;
pub use resolver::*;
