pub mod leave;
pub mod model;
pub mod path;
pub mod warning;

pub use leave::*;
pub use model::*;
pub use path::*;
pub use warning::*;
