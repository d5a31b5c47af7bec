pub mod format;
pub mod fs;
pub mod progress;
pub mod shell;
