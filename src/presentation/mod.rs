// Presentation layer - terminal controls
pub mod commands;
pub mod console;
