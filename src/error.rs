//! Crate-level error types.

use std::fmt;

/// Errors produced by the glyphfx crate.
///
/// The animation components themselves never fail; these cover loading
/// options, driving a terminal and talking to browser APIs.
#[derive(Debug)]
pub enum GlyphError {
    /// Generic I/O failure (files, terminal).
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Options parsed but violate a documented range.
    InvalidOptions(String),
    /// Browser API failure.
    Web(String),
}

impl fmt::Display for GlyphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::InvalidOptions(msg) => {
                write!(f, "invalid options: {msg}")
            }
            Self::Web(msg) => write!(f, "web error: {msg}"),
        }
    }
}

impl std::error::Error for GlyphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GlyphError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn display_includes_message() {
        let err = GlyphError::InvalidOptions("rotator.texts is empty".into());
        assert_eq!(err.to_string(), "invalid options: rotator.texts is empty");
    }

    #[test]
    fn io_errors_keep_their_source() {
        let err: GlyphError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.source().is_some());
        assert!(GlyphError::Web("raf".into()).source().is_none());
    }
}
