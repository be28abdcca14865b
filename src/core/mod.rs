// src/core/mod.rs

pub mod commons;
pub mod config_loader;
pub mod diagnostics;
pub mod generator;
pub mod override_resolver;
pub mod response_file;
pub mod switch_set;
pub mod template;
pub mod validation;
