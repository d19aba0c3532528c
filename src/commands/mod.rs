/// Commands module
/// Functions a UI front-end calls (browser, desktop, or any IPC bridge)
/// Commands act as the boundary between the front-end and the engine; errors cross it as strings

pub mod files;
pub mod monitor;
pub mod shell;

pub use files::{list_directory, preview_file};
pub use monitor::{system_summary, top_processes};
pub use shell::execute_command;
