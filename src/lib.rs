// trust library - exposes the editor core for the binary and integration tests

pub mod app;
pub mod config;
pub mod config_io;
pub mod error;
pub mod input;
pub mod model;
pub mod services;
pub mod view;
