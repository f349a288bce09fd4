mod driver;
mod mode;
mod refresh;
mod render;

pub use driver::*;
pub use mode::*;
pub use refresh::*;
pub use render::*;
