pub mod example;
pub mod loader;
pub mod split;

pub use example::*;
pub use loader::*;
pub use split::*;
