//! FIT session extraction and normalization
//!
//! Provides:
//! - [`extract_session`]: decode a FIT file and pull the first session message
//!   into a flat field map ([`RawSession`])
//! - [`normalize_session`]: turn that map into a [`NormalizedSession`] with
//!   canonical units and best-effort numeric coercion
//!
//! [`NormalizedSession`]: crate::models::NormalizedSession

mod extract;
mod normalize;

pub use extract::{extract_session, extract_session_from_bytes, FieldValue, RawSession};
pub use normalize::{normalize_session, FieldKeys};

use std::path::Path;

use crate::error::Result;
use crate::models::NormalizedSession;

/// Extract and normalize the session summary of one FIT file
pub fn read_session(path: &Path) -> Result<NormalizedSession> {
    let raw = extract_session(path)?;
    Ok(normalize_session(&raw))
}
