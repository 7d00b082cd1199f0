// OPUS header support (in OGG container)
//
// OPUS Stream Structure:
// - Page 0: identification header, "OpusHead" (19 bytes for mapping family 0)
// - Page 1: comment header, "OpusTags" followed by vendor string and tags
// - Audio data pages
//
// Reference:
// - https://wiki.xiph.org/OggOpus
// - RFC 7845: Ogg Encapsulation for the Opus Audio Codec

pub mod head;
pub mod reader;
pub mod tags;
pub mod writer;

pub use head::IdentificationHeader;
pub use reader::{is_opus_stream, read_headers, OpusHeaders, PageSummary};
pub use tags::{Comment, CommentHeader};
pub use writer::write_headers;

pub const OPUS_SIGNATURE: &[u8; 8] = b"OpusHead";
pub const OPUS_TAGS: &[u8; 8] = b"OpusTags";

/// Vendor string written into every comment header
pub const VENDOR_STRING: &str = "libopus";

/// Caller-supplied parameters of the stream being started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamParameters {
    pub channels: u8,
    pub sample_rate: u32,
}

impl StreamParameters {
    pub fn new(channels: u8, sample_rate: u32) -> Self {
        StreamParameters {
            channels,
            sample_rate,
        }
    }
}

impl Default for StreamParameters {
    fn default() -> Self {
        StreamParameters::new(2, 48000)
    }
}
