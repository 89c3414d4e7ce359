//! Byte-to-text decoding.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

use crate::config::CharsetPolicy;
use crate::error::{Error, Result};

/// Decoded file text plus the name of the encoding that produced it.
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static str,
    /// Set when malformed sequences were replaced with U+FFFD.
    pub had_errors: bool,
}

pub fn decode(bytes: &[u8], policy: &CharsetPolicy) -> Result<DecodedText> {
    let encoding = match policy {
        CharsetPolicy::AutoDetect => detect(bytes),
        CharsetPolicy::Force { label } => Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| Error::UnknownCharset(label.clone()))?,
    };
    // decode() strips a matching BOM and honours a BOM over the requested encoding.
    let (text, used, had_errors) = encoding.decode(bytes);
    log::debug!("Opening file using {} charset", used.name());
    Ok(DecodedText {
        text: text.into_owned(),
        encoding: used.name(),
        had_errors,
    })
}

fn detect(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    if std::str::from_utf8(bytes).is_ok() {
        UTF_8
    } else {
        WINDOWS_1252
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ascii_is_utf8() {
        let decoded = decode(b"FHX2 FORMAT\n", &CharsetPolicy::AutoDetect).unwrap();
        assert_eq!(decoded.encoding, "UTF-8");
        assert_eq!(decoded.text, "FHX2 FORMAT\n");
        assert!(!decoded.had_errors);
    }

    #[test]
    fn bom_is_stripped() {
        let decoded = decode(b"\xEF\xBB\xBFFHX2 FORMAT", &CharsetPolicy::AutoDetect).unwrap();
        assert_eq!(decoded.text, "FHX2 FORMAT");
    }

    #[test]
    fn invalid_utf8_falls_back_to_windows_1252() {
        // 0xE9 is 'é' in Windows-1252 and not valid UTF-8 on its own.
        let decoded = decode(b"Site: Caf\xE9\n", &CharsetPolicy::AutoDetect).unwrap();
        assert_eq!(decoded.encoding, "windows-1252");
        assert_eq!(decoded.text, "Site: Café\n");
    }

    #[test]
    fn forced_label_is_used() {
        let policy = CharsetPolicy::Force {
            label: "latin1".to_string(),
        };
        let decoded = decode(b"\xE9", &policy).unwrap();
        assert_eq!(decoded.text, "é");
    }

    #[test]
    fn unknown_label_is_an_error() {
        let policy = CharsetPolicy::Force {
            label: "klingon".to_string(),
        };
        assert!(matches!(decode(b"", &policy), Err(Error::UnknownCharset(_))));
    }
}
