//! Serialization codec for the database file.
//!
//! Two layers live here. The record layer maps [`ArtRecord`] to and from its
//! tagged JSON shape. The document layer handles the optional base64 wrapping
//! of the whole JSON text, including the header/footer framing of line-wrapped
//! files.
//!
//! Base64 detection is speculative by design: [`try_decode_base64`] returns an
//! `Option` and the caller picks the fallback branch, so a file that merely
//! looks like it might be encoded degrades to being read as plain text.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::config::WireFormat;
use crate::domain::ArtRecord;

use super::collection::StoreError;

/// Tag value identifying a record object in the database JSON.
pub(crate) const RECORD_TAG: &str = "ArtRecord";

/// On-disk shape of one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordRepr {
    /// Type discriminator; always [`RECORD_TAG`] for records we wrote.
    #[serde(rename = "__class__")]
    pub class: String,

    /// Canonical base64 content.
    pub content: String,

    /// Hex identity digest.
    pub identity: String,
}

/// Encode a record into its on-disk shape.
pub fn encode(record: &ArtRecord) -> RecordRepr {
    RecordRepr {
        class: RECORD_TAG.to_string(),
        content: record.content().to_string(),
        identity: record.identity().to_string(),
    }
}

/// Decode an on-disk record, dispatching on the tag field.
pub fn decode(repr: RecordRepr) -> Result<ArtRecord, StoreError> {
    if repr.class != RECORD_TAG {
        return Err(StoreError::UnknownTag(repr.class));
    }
    Ok(ArtRecord::from_parts(repr.content, repr.identity))
}

/// Strict base64 decode, `None` on any invalid input.
///
/// Used wherever content may or may not be encoded; failure is not an error,
/// the caller falls back to treating the input as plain text.
pub fn try_decode_base64(text: &str) -> Option<Vec<u8>> {
    BASE64.decode(text.as_bytes()).ok()
}

/// Split the raw database file text into the JSON document and its storage
/// mode.
///
/// Header and footer marker lines, when present, are stripped first. The
/// remaining body (newlines removed) is then speculatively base64-decoded;
/// on success the decoded text is the document and the storage mode is
/// base64, otherwise the body is returned verbatim as plain JSON.
pub fn read_framed(text: &str, fmt: &WireFormat) -> (String, bool) {
    let mut lines: Vec<&str> = text.lines().collect();

    let framed = lines
        .first()
        .map(|line| line.trim_end() == fmt.b64_header)
        .unwrap_or(false);

    let body = if framed {
        lines.remove(0);
        if lines
            .last()
            .map(|line| line.trim_end() == fmt.b64_footer)
            .unwrap_or(false)
        {
            lines.pop();
        }
        lines
            .iter()
            .map(|line| line.trim_end())
            .collect::<String>()
    } else {
        text.to_string()
    };

    let compact: String = body.chars().filter(|c| *c != '\n' && *c != '\r').collect();
    if let Some(decoded) = try_decode_base64(&compact) {
        if let Ok(json) = String::from_utf8(decoded) {
            return (json, true);
        }
    }

    (body, false)
}

/// Render the JSON document in the requested storage mode.
///
/// With `b64` the whole document is base64-encoded; `wrap` additionally
/// frames it between the header and footer markers with the body wrapped at
/// the configured width.
pub fn write_framed(json: &str, b64: bool, wrap: bool, fmt: &WireFormat) -> String {
    if !b64 {
        return json.to_string();
    }

    let encoded = BASE64.encode(json.as_bytes());
    if wrap {
        format!(
            "{}\n{}\n{}",
            fmt.b64_header,
            wrap_text(&encoded, fmt.wrap_width),
            fmt.b64_footer
        )
    } else {
        encoded
    }
}

/// Hard-wrap text at a fixed column.
pub fn wrap_text(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }

    let mut wrapped = String::with_capacity(text.len() + text.len() / width + 1);
    let mut column = 0;
    for ch in text.chars() {
        if column == width {
            wrapped.push('\n');
            column = 0;
        }
        wrapped.push(ch);
        column += 1;
    }
    wrapped
}
