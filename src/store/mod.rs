pub mod fixture_cache;
pub mod fs;
pub mod memory;
pub mod traits;

pub use fixture_cache::*;
pub use fs::*;
pub use memory::*;
pub use traits::*;
