//! opus-headers - OggOpus header writer
//!
//! Emits the two mandatory header pages of an Ogg Opus stream, the
//! identification header ("OpusHead") and the comment header ("OpusTags"),
//! through any [`ogg::Packetizer`]. [`ogg::OggStream`] is the page framer
//! shipped with the crate.
//!
//! ```
//! use opus_headers::{write_headers, OggStream, StreamParameters};
//!
//! let mut stream = OggStream::new(0x1234);
//! let mut output = Vec::new();
//! write_headers(&StreamParameters::new(2, 48000), &mut stream, &mut output).unwrap();
//! assert_eq!(stream.page_sequence(), 2);
//! ```

pub mod error;
pub mod ogg;
pub mod opus;
pub mod utils;

pub use error::{HeaderError, ParseError, WriteStage};
pub use ogg::{OggStream, Packetizer, SequencedPacket, SubmittedPages};
pub use opus::{
    read_headers, write_headers, Comment, CommentHeader, IdentificationHeader, OpusHeaders,
    StreamParameters, VENDOR_STRING,
};
