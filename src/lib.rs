//! Calculator for the gold a roster of characters earns from weekly raids.
//! State is kept in a small key-value store so it survives restarts, and is shown as a table in
//! the terminal.
//!

pub mod cli;
pub mod fs;
pub mod storage;
pub mod tracker;
pub mod utils;
