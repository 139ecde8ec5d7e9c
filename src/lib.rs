pub mod data;
pub mod evaluate;
pub mod optimizer;
pub mod predict;
pub mod utils;

pub use data::*;
pub use evaluate::*;
pub use optimizer::*;
pub use predict::*;
pub use utils::*;
