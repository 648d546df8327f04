//! crates/codec/src/separators.rs

use crate::error::{CodecError, CodecResult};

/// The pair of sentinels that frame a session record.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Separators {
    request: Vec<u8>,
    response: Vec<u8>,
}

impl Separators {
    /// Default request sentinel.
    pub const DEFAULT_REQUEST: &'static [u8] = b"~>";
    /// Default response sentinel.
    pub const DEFAULT_RESPONSE: &'static [u8] = b"<~";

    /// Creates a sentinel pair. Both must be non-empty and distinct.
    pub fn new(request: impl Into<Vec<u8>>, response: impl Into<Vec<u8>>) -> CodecResult<Self> {
        let request = request.into();
        let response = response.into();
        if request.is_empty() {
            return Err(CodecError::EmptySeparator { which: "request" });
        }
        if response.is_empty() {
            return Err(CodecError::EmptySeparator { which: "response" });
        }
        if request == response {
            return Err(CodecError::IdenticalSeparators(
                String::from_utf8_lossy(&request).into_owned(),
            ));
        }
        Ok(Self { request, response })
    }

    /// Sentinel that starts a request.
    #[must_use]
    pub fn request(&self) -> &[u8] {
        &self.request
    }

    /// Sentinel that starts a response.
    #[must_use]
    pub fn response(&self) -> &[u8] {
        &self.response
    }
}

impl Default for Separators {
    fn default() -> Self {
        Self {
            request: Self::DEFAULT_REQUEST.to_vec(),
            response: Self::DEFAULT_RESPONSE.to_vec(),
        }
    }
}
