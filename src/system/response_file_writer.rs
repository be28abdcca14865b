// src/system/response_file_writer.rs

use crate::constants::RESPONSE_FILE_PREFIX;
use std::io::{self, Write};
use tempfile::NamedTempFile;

/// Writes `content` to a fresh temporary response file.
///
/// The file is deleted when the returned handle is dropped, so the caller must keep
/// it alive until the tool has exited.
pub fn write_response_file(content: &str) -> io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("toolswitch-")
        .suffix(".rsp")
        .tempfile()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    log::trace!(
        "Wrote {} bytes to response file '{}'.",
        content.len(),
        file.path().display()
    );
    Ok(file)
}

/// The argument that points a tool at a response file (`@/tmp/toolswitch-x.rsp`).
pub fn response_file_argument(file: &NamedTempFile) -> String {
    format!("{}{}", RESPONSE_FILE_PREFIX, file.path().display())
}
