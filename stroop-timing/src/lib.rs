pub mod deferred;
pub mod timer;

pub use deferred::{CancelToken, Deferred, Epoch};
pub use timer::{HighPrecisionTimer, ManualTimer, Timer};
