//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Lesson plan (RPM) generation prompt
pub const RPM: &str = include_str!("../../prompts/rpm.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "rpm" => {
            debug!("get_embedded: matched rpm");
            Some(RPM)
        }
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
