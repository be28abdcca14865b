// src/constants.rs

/// Rendered command lines shorter than this many characters are passed directly
/// to the tool; longer ones go through a response file.
pub const DEFAULT_RESPONSE_FILE_THRESHOLD: usize = 32000;

/// Documented ceiling for a process command line. A configured threshold must stay below it.
pub const MAX_COMMAND_LINE_LENGTH: usize = 32768;

/// Prefix that tells a tool the argument is the path of a response file.
pub const RESPONSE_FILE_PREFIX: char = '@';

/// Exit code reported by the OS when a tool is denied access (`STATUS_ACCESS_DENIED`).
pub const ACCESS_DENIED_EXIT_CODE: i32 = -1073741790;

/// Template placeholder expanding to every switch not referenced elsewhere in the template.
pub const ALL_OPTIONS_PLACEHOLDER: &str = "AllOptions";

/// Template placeholder expanding to the free-form additional options.
pub const ADDITIONAL_OPTIONS_PLACEHOLDER: &str = "AdditionalOptions";
