//! Process-wide `tracing` setup. `bin/rotation_demo.rs` shows it in use.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};
