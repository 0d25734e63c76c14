//! Text decoding for data files written by older tools
//!
//! Files are always written as UTF-8. Reading tries a fixed list of encodings in
//! order and uses the first one that accepts every byte.

use std::fmt;

/// Encodings tried when reading a data file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// Strict UTF-8; a leading byte-order mark is dropped
    Utf8,
    /// ISO-8859-1 (Latin-1); every byte maps to the code point of the same value
    Iso8859_1,
    /// Windows-1252; bytes `0x81`, `0x8D`, `0x8F`, `0x90` and `0x9D` are undefined
    Windows1252,
    /// Strict 7-bit ASCII
    UsAscii,
}

/// Candidate encodings, in the order they are tried
pub const CANDIDATE_ENCODINGS: [TextEncoding; 4] = [
    TextEncoding::Utf8,
    TextEncoding::Iso8859_1,
    TextEncoding::Windows1252,
    TextEncoding::UsAscii,
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// Windows-1252 code points for 0x80..=0x9F; 0 marks an undefined byte
const WINDOWS_1252_HIGH: [u32; 32] = [
    0x20AC, 0, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, 0x02C6, 0x2030, 0x0160, 0x2039,
    0x0152, 0, 0x017D, 0, 0, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, 0x02DC,
    0x2122, 0x0161, 0x203A, 0x0153, 0, 0x017E, 0x0178,
];

impl TextEncoding {
    /// Conventional name of the encoding
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Iso8859_1 => "ISO-8859-1",
            Self::Windows1252 => "windows-1252",
            Self::UsAscii => "US-ASCII",
        }
    }

    /// Decode `bytes`, or `None` if any byte is not valid in this encoding
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => {
                let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                std::str::from_utf8(bytes).ok().map(str::to_string)
            }
            Self::Iso8859_1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            Self::Windows1252 => bytes.iter().map(|&b| windows_1252_char(b)).collect(),
            Self::UsAscii => {
                if bytes.is_ascii() {
                    Some(bytes.iter().map(|&b| char::from(b)).collect())
                } else {
                    None
                }
            }
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn windows_1252_char(byte: u8) -> Option<char> {
    match byte {
        0x80..=0x9F => match WINDOWS_1252_HIGH[usize::from(byte - 0x80)] {
            0 => None,
            code => char::from_u32(code),
        },
        _ => Some(char::from(byte)),
    }
}

/// Decode with the first candidate encoding that accepts the whole input
#[must_use]
pub fn decode_any(bytes: &[u8]) -> Option<(String, TextEncoding)> {
    CANDIDATE_ENCODINGS
        .iter()
        .find_map(|&encoding| encoding.decode(bytes).map(|text| (text, encoding)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_preferred_and_bom_stripped() {
        let (text, encoding) = decode_any("\u{FEFF}café|ok".as_bytes()).unwrap();
        assert_eq!(encoding, TextEncoding::Utf8);
        assert_eq!(text, "café|ok");
    }

    #[test]
    fn test_latin1_fallback() {
        // "café" written as Latin-1
        let (text, encoding) = decode_any(b"caf\xE9").unwrap();
        assert_eq!(encoding, TextEncoding::Iso8859_1);
        assert_eq!(text, "café");
    }

    #[test]
    fn test_windows_1252_table() {
        assert_eq!(
            TextEncoding::Windows1252.decode(b"\x93hi\x94 \x80").as_deref(),
            Some("\u{201C}hi\u{201D} \u{20AC}")
        );
        assert_eq!(TextEncoding::Windows1252.decode(b"\x81"), None);
    }

    #[test]
    fn test_ascii_is_strict() {
        assert_eq!(TextEncoding::UsAscii.decode(b"plain").as_deref(), Some("plain"));
        assert_eq!(TextEncoding::UsAscii.decode(b"caf\xE9"), None);
        assert_eq!(TextEncoding::Utf8.decode(b"caf\xE9"), None);
    }

    #[test]
    fn test_labels() {
        let labels: Vec<_> = CANDIDATE_ENCODINGS.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["UTF-8", "ISO-8859-1", "windows-1252", "US-ASCII"]);
    }
}
