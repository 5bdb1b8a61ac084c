mod renderer;
mod tessellation;
mod vertex;

pub use renderer::*;
pub use tessellation::*;
pub use vertex::*;
