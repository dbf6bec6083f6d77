//! Core system components for robot operation
pub mod board;
pub mod config;
pub mod drive_command;
pub mod error;
pub mod event;
pub mod indicator;
#[cfg(test)]
pub mod mock;
pub mod remote_command;
pub mod route;
pub mod state;
