// src/app/mod.rs
//
// Application wiring

pub mod library_init;

pub use library_init::{init_library_subsystem, LibraryConfig};
