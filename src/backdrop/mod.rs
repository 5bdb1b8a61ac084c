mod frame_loop;
mod geometry;
mod palette;
mod shapes;

pub use frame_loop::*;
pub use geometry::*;
pub use palette::*;
pub use shapes::*;
