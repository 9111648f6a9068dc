// src/application/commands/mod.rs
//
// Commands callable by a UI shell.
// Each takes the shared AppState and returns UI-ready DTOs; failures are
// serialized ErrorResponse strings.

pub mod book_commands;
pub mod library_commands;
pub mod statistics_commands;

pub use book_commands::*;
pub use library_commands::*;
pub use statistics_commands::*;
