//! # System Interaction Layer
//!
//! This module is the boundary between the command-line engine and the operating system.
//!
//! ## Modules
//!
//! - **`executor`**: Launches the external tool with either the direct command line or a
//!   response file reference, and turns its exit code into success or a reported failure.
//! - **`response_file_writer`**: Writes a rendered command line to a temporary response
//!   file and builds the `@file` argument pointing at it.

pub mod executor;
pub mod response_file_writer;
