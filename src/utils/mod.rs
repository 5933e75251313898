//! Utils module - logging setup and string helpers

pub mod logging;
pub mod string;

pub use logging::init_logging;
pub use string::preview;
