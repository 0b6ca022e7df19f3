//! Byte retrieval for source locations: HTTPS URLs or local paths.
//!
//! The core only ever sees the resulting byte payloads; where they came from
//! is this module's concern alone.

use std::error::Error;
use std::fs;

/// Retrieve one source payload. `https://` locations are fetched with a
/// blocking GET, anything else is read from the filesystem.
pub fn get_data(location: &str) -> Result<Vec<u8>, Box<dyn Error>> {
    if location.starts_with("https://") {
        let response = reqwest::blocking::get(location)?;
        let status = response.status();
        let body = response.bytes()?;
        if !status.is_success() {
            return Err(format!(
                "response for '{}' failed with status code {} and body: {}",
                location,
                status.as_u16(),
                String::from_utf8_lossy(&body),
            )
            .into());
        }
        Ok(body.to_vec())
    } else {
        fs::read(location).map_err(|e| format!("failed to read '{}': {}", location, e).into())
    }
}
