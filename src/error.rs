// Error types for header emission and header inspection

use std::fmt;
use thiserror::Error;

/// Boxed error reported by a packetizer or an output sink
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Identifies which write of the header sequence failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStage {
    HeadMagic,
    HeadVersionChannelsPreSkip,
    HeadSampleRate,
    HeadGainMappingFamily,
    HeadPageFlush,
    HeadPageAppend,
    TagsMagic,
    TagsVendorLength,
    TagsVendorString,
    TagsCount,
    TagsComment,
    TagsPageFlush,
    TagsPageAppend,
}

impl fmt::Display for WriteStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WriteStage::HeadMagic => "OpusHead magic",
            WriteStage::HeadVersionChannelsPreSkip => "OpusHead version/channel count/pre-skip",
            WriteStage::HeadSampleRate => "OpusHead sample rate",
            WriteStage::HeadGainMappingFamily => "OpusHead output gain/channel mapping family",
            WriteStage::HeadPageFlush => "OpusHead page flush",
            WriteStage::HeadPageAppend => "OpusHead page append",
            WriteStage::TagsMagic => "OpusTags magic",
            WriteStage::TagsVendorLength => "OpusTags vendor string length",
            WriteStage::TagsVendorString => "OpusTags vendor string",
            WriteStage::TagsCount => "OpusTags tag count",
            WriteStage::TagsComment => "OpusTags comment",
            WriteStage::TagsPageFlush => "OpusTags page flush",
            WriteStage::TagsPageAppend => "OpusTags page append",
        };
        f.write_str(name)
    }
}

/// Fatal failures while emitting the OpusHead/OpusTags pages
#[derive(Debug, Error)]
pub enum HeaderError {
    /// Fewer bytes were accepted than requested
    #[error("short write at {stage}: wrote {written} of {expected} bytes")]
    ShortWrite {
        stage: WriteStage,
        written: usize,
        expected: usize,
    },

    /// A forced single-packet flush produced a page count other than 1
    #[error("invalid page flush at {stage}: produced {count} pages, expected 1")]
    UnexpectedPageCount { stage: WriteStage, count: usize },

    /// The packetizer or the output sink reported an error
    #[error("{stage} failed: {source}")]
    Underlying {
        stage: WriteStage,
        #[source]
        source: BoxError,
    },
}

impl HeaderError {
    pub(crate) fn underlying<E>(stage: WriteStage, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        HeaderError::Underlying {
            stage,
            source: source.into(),
        }
    }

    /// The write that failed
    pub fn stage(&self) -> WriteStage {
        match self {
            HeaderError::ShortWrite { stage, .. }
            | HeaderError::UnexpectedPageCount { stage, .. }
            | HeaderError::Underlying { stage, .. } => *stage,
        }
    }
}

/// Failures while reading Ogg pages or Opus header packets back
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad Ogg capture pattern at page {0}")]
    BadCapturePattern(usize),

    #[error("unsupported Ogg stream structure version {0}")]
    UnsupportedVersion(u8),

    #[error("stream ended after {found} of {expected} header packets")]
    MissingPackets { found: usize, expected: usize },

    #[error("invalid {header} header: {reason}")]
    InvalidHeader {
        header: &'static str,
        reason: String,
    },
}

impl ParseError {
    pub(crate) fn invalid(header: &'static str, reason: impl Into<String>) -> Self {
        ParseError::InvalidHeader {
            header,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn test_error_messages_name_the_stage() {
        let err = HeaderError::UnexpectedPageCount {
            stage: WriteStage::TagsPageFlush,
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "invalid page flush at OpusTags page flush: produced 2 pages, expected 1"
        );
        assert_eq!(err.stage(), WriteStage::TagsPageFlush);
    }

    #[test]
    fn test_underlying_keeps_source() {
        let err = HeaderError::underlying(
            WriteStage::HeadPageAppend,
            io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"),
        );
        assert!(err.to_string().contains("sink closed"));
        assert!(err.source().is_some());
    }
}
