mod path;
mod types;

pub use path::*;
pub use types::*;
