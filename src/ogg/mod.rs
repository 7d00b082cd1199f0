// OGG container support
//
// OGG Page Header (27 bytes + segment table):
// - Capture Pattern: "OggS" (4 bytes)
// - Version: 0 (1 byte)
// - Header Type: 1=continuation, 2=bos, 4=eos (1 byte)
// - Granule Position (8 bytes)
// - Bitstream Serial Number (4 bytes)
// - Page Sequence Number (4 bytes)
// - CRC Checksum (4 bytes)
// - Number of Page Segments (1 byte)
// - Segment Table (variable)
//
// Header writers only talk to the `Packetizer` trait. `OggStream` is the
// framer shipped with this crate; tests substitute their own. Page encoding
// (CRC included) goes through `tinyogg`; this module keeps lacing, sequencing
// and the page reader used for inspection.

pub mod page;
pub mod stream;

pub use page::{create_segment_table, OggPage, OggPageHeader};
pub use stream::OggStream;

// OGG signature
pub const OGG_SIGNATURE: &[u8; 4] = b"OggS";

/// Size of the fixed part of a page header
pub const OGG_PAGE_HEADER_LEN: usize = 27;

/// Largest number of lacing values a page can carry
pub const OGG_MAX_SEGMENTS: usize = 255;

// OGG page header types
pub const OGG_HEADER_TYPE_CONTINUATION: u8 = 0x01;
pub const OGG_HEADER_TYPE_BOS: u8 = 0x02; // Beginning of Stream
pub const OGG_HEADER_TYPE_EOS: u8 = 0x04; // End of Stream

/// Granule position of a page on which no packet completes
pub const GRANULE_NONE: u64 = u64::MAX;

/// A payload stamped with its packet number, ready for page framing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencedPacket {
    pub data: Vec<u8>,
    pub packet_no: u64,
    pub granule_position: u64,
}

impl SequencedPacket {
    pub fn new(data: &[u8], packet_no: u64) -> Self {
        SequencedPacket {
            data: data.to_vec(),
            packet_no,
            granule_position: 0,
        }
    }
}

/// Encoded pages produced by one `submit` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmittedPages {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Packet/page framer consumed by the header writer
pub trait Packetizer {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Wrap a payload into a sequenced packet
    fn wrap(&mut self, payload: &[u8], packet_no: u64) -> SequencedPacket {
        SequencedPacket::new(payload, packet_no)
    }

    /// Queue a packet; with `force_flush` every pending segment is sealed into pages.
    fn submit(
        &mut self,
        packet: SequencedPacket,
        force_flush: bool,
    ) -> Result<SubmittedPages, Self::Error>;
}
