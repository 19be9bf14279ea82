pub mod logging;
pub mod vec2;

pub use logging::{init_stdout_logger, level_from_env, StdoutLogger};
pub use vec2::Vec2;

// Re-export log crate so downstream crates can use stance_base::log::*
pub use log;
