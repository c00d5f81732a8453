//! Input decoding that remembers how to write the output back.
//!
//! BibTeX files in the wild are UTF-8 (with or without a BOM) or a legacy
//! 8-bit encoding, almost always Latin-1. Bytes that are not valid UTF-8
//! are read as windows-1252, the WHATWG superset of Latin-1, and the output
//! is encoded the same way.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// The encoding a file was read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceEncoding {
    encoding: &'static Encoding,
    bom: bool,
}

impl SourceEncoding {
    /// WHATWG label, e.g. `UTF-8` or `windows-1252`.
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn has_bom(&self) -> bool {
        self.bom
    }

    /// Encodes `text` back into this encoding, restoring a UTF-8 BOM if the input had one.
    ///
    /// Text decoded from windows-1252 only ever gains ASCII through the
    /// transform, so every character stays mappable.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len() + UTF8_BOM.len());
        if self.bom {
            out.extend_from_slice(UTF8_BOM);
        }
        let (bytes, _, _) = self.encoding.encode(text);
        out.extend_from_slice(&bytes);
        out
    }
}

/// Decodes raw file contents, detecting UTF-8 (with optional BOM) or falling back to windows-1252.
pub fn decode(bytes: &[u8]) -> (String, SourceEncoding) {
    let (body, bom) = match bytes.strip_prefix(UTF8_BOM) {
        Some(rest) => (rest, true),
        None => (bytes, false),
    };

    match std::str::from_utf8(body) {
        Ok(text) => (
            text.to_string(),
            SourceEncoding {
                encoding: UTF_8,
                bom,
            },
        ),
        Err(_) => {
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(body);
            (
                text.into_owned(),
                SourceEncoding {
                    encoding: WINDOWS_1252,
                    bom: false,
                },
            )
        }
    }
}
