pub mod identifier;
pub mod pattern;
pub mod response;

pub use identifier::*;
pub use pattern::*;
pub use response::*;
