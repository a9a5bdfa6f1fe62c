pub mod format;
pub mod logging;

pub use format::format_file_size;
pub use logging::init_tracing;
