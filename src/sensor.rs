mod acquisition;
mod simulated;
mod transport;

pub use acquisition::*;
pub use simulated::*;
pub use transport::*;
