//! # toolswitch
//!
//! Turns a set of typed tool switches (booleans, strings, integers, enumerations,
//! file lists) into one correctly ordered, correctly overridden command line, and
//! decides whether that line is handed to the tool directly or through a response file.

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;
