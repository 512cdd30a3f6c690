//! Avatar image reference
//!
//! The avatar is kept as a self-contained `data:` URI so it can live in the
//! same key-value storage as the rest of the sheet.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::SheetError;

/// Validated `data:` URI pointing at the avatar image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarRef(String);

impl AvatarRef {
    /// Accept a stored reference if it looks like a data URI
    pub fn parse(value: impl Into<String>) -> Result<Self, SheetError> {
        let value = value.into();
        if value.starts_with("data:") && value.contains(',') {
            Ok(Self(value))
        } else {
            Err(SheetError::invalid_data_url(&value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AvatarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encode raw file bytes as a base64 data URI
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> AvatarRef {
    let mime = if mime.trim().is_empty() {
        "application/octet-stream"
    } else {
        mime.trim()
    };
    AvatarRef(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

/// Best-effort MIME type from a file name, for pickers that report none
pub fn guess_image_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Ticket for one in-flight avatar read
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AvatarTicket(u64);

impl AvatarTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Issues request ids for avatar reads so only the newest one may commit.
///
/// Also holds the cancel handle `H` of the read in flight, so starting a new
/// read hands back the one it supersedes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarRequests<H = ()> {
    latest: u64,
    in_flight: Option<H>,
}

impl<H> Default for AvatarRequests<H> {
    fn default() -> Self {
        Self {
            latest: 0,
            in_flight: None,
        }
    }
}

impl<H> AvatarRequests<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new read, superseding any earlier one.
    ///
    /// Returns the new ticket and the handle of the superseded read if it
    /// was still running; the caller cancels it.
    pub fn begin(&mut self) -> (AvatarTicket, Option<H>) {
        self.latest += 1;
        (AvatarTicket(self.latest), self.in_flight.take())
    }

    /// Remember the cancel handle of the read started with `ticket`
    pub fn attach(&mut self, ticket: AvatarTicket, handle: H) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.in_flight = Some(handle);
        true
    }

    pub fn is_current(&self, ticket: AvatarTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Mark the read for `ticket` as done. `false` if it was superseded.
    pub fn finish(&mut self, ticket: AvatarTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.in_flight = None;
        true
    }

    pub fn in_flight(&self) -> Option<&H> {
        self.in_flight.as_ref()
    }
}

/// Build the avatar for a picked file.
///
/// The reported content type wins; without one the type is guessed from the
/// file name.
pub fn avatar_from_file(name: &str, content_type: Option<String>, bytes: &[u8]) -> AvatarRef {
    let mime = content_type
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| guess_image_mime(name).to_string());
    encode_data_url(&mime, bytes)
}
