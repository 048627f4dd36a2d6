//! Text-block import parser.
//!
//! An import file holds one or more art blocks delimited by the separator
//! line. Each block is independently auto-detected as base64 or plain text,
//! so a single file can mix hand-written art with pre-encoded blocks (the
//! escape hatch for art that itself contains the separator string).

use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::debug;

use crate::config::WireFormat;
use crate::store::codec;

/// Parse a text file into record payloads.
pub async fn parse_file(path: &Path, fmt: &WireFormat) -> Result<Vec<Vec<u8>>> {
    let text = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read art file: {}", path.display()))?;

    Ok(split_blocks(&text, fmt))
}

/// Split raw text into record payloads on separator lines.
///
/// A line counts as a separator only when it is exactly equal to the marker,
/// line terminator aside. Each non-empty accumulated block is finalized as
/// the base64-decoded bytes when the newline-stripped block text decodes
/// cleanly, and as the raw block text otherwise. A trailing block without a
/// closing separator is finalized the same way.
pub fn split_blocks(text: &str, fmt: &WireFormat) -> Vec<Vec<u8>> {
    let mut payloads = Vec::new();
    let mut block = String::new();

    for chunk in text.split_inclusive('\n') {
        let line = chunk.strip_suffix('\n').unwrap_or(chunk);
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line == fmt.separator {
            finalize_block(&mut block, &mut payloads);
        } else {
            block.push_str(chunk);
        }
    }
    finalize_block(&mut block, &mut payloads);

    payloads
}

fn finalize_block(block: &mut String, payloads: &mut Vec<Vec<u8>>) {
    if block.is_empty() {
        return;
    }

    let compact: String = block.chars().filter(|c| *c != '\n').collect();
    let payload = match codec::try_decode_base64(&compact) {
        Some(decoded) => {
            debug!("base64 art block decoded");
            decoded
        }
        None => block.clone().into_bytes(),
    };

    payloads.push(payload);
    block.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;

    fn fmt() -> WireFormat {
        WireFormat::default()
    }

    #[test]
    fn test_two_plain_blocks() {
        let fmt = fmt();
        let text = format!("foo\n{}\nbar\n", fmt.separator);

        let payloads = split_blocks(&text, &fmt);
        assert_eq!(payloads, vec![b"foo\n".to_vec(), b"bar\n".to_vec()]);
    }

    #[test]
    fn test_single_block_without_trailing_separator() {
        let fmt = fmt();
        let payloads = split_blocks("  /\\ \n |  |\n", &fmt);

        assert_eq!(payloads, vec![b"  /\\ \n |  |\n".to_vec()]);
    }

    #[test]
    fn test_base64_block_is_decoded() {
        let fmt = fmt();
        let art = "ascii art with\nnewlines\n";
        let encoded = BASE64.encode(art.as_bytes());
        let text = format!("{}\n{}\nplain block\n", encoded, fmt.separator);

        let payloads = split_blocks(&text, &fmt);
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0], art.as_bytes());
        assert_eq!(payloads[1], b"plain block\n");
    }

    #[test]
    fn test_wrapped_base64_block_is_decoded() {
        let fmt = fmt();
        let art = "x".repeat(100);
        let encoded = codec::wrap_text(&BASE64.encode(art.as_bytes()), fmt.wrap_width);

        let payloads = split_blocks(&encoded, &fmt);
        assert_eq!(payloads, vec![art.into_bytes()]);
    }

    #[test]
    fn test_consecutive_separators_produce_no_empty_payloads() {
        let fmt = fmt();
        let text = format!("{sep}\n{sep}\nonly block\n", sep = fmt.separator);

        let payloads = split_blocks(&text, &fmt);
        assert_eq!(payloads, vec![b"only block\n".to_vec()]);
    }

    #[test]
    fn test_separator_requires_exact_match() {
        let fmt = fmt();
        let embedded = format!("art {} art", fmt.separator);
        let padded = format!("{}-", fmt.separator);
        let text = format!("{embedded}\n{padded}\n");

        // Lines merely containing (or extending) the marker stay in the block.
        let payloads = split_blocks(&text, &fmt);
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0], text.as_bytes());
    }

    #[test]
    fn test_crlf_separator_lines_match() {
        let fmt = fmt();
        let text = format!("foo\r\n{}\r\nbar\r\n", fmt.separator);

        let payloads = split_blocks(&text, &fmt);
        assert_eq!(payloads, vec![b"foo\r\n".to_vec(), b"bar\r\n".to_vec()]);
    }

    #[test]
    fn test_empty_input() {
        assert!(split_blocks("", &fmt()).is_empty());
    }
}
