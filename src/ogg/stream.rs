// Logical bitstream framer: laces packets into segments and seals pages

use std::collections::VecDeque;
use std::convert::Infallible;

use ::ogg::{OggPacket, OggPacketType};
use tracing::trace;

use crate::ogg::page::create_segment_table;
use crate::ogg::{Packetizer, SequencedPacket, SubmittedPages, GRANULE_NONE, OGG_MAX_SEGMENTS};

/// One lacing value waiting to be sealed into a page
#[derive(Debug, Clone, Copy)]
struct PendingSegment {
    len: u8,
    /// Set on the final segment of a packet
    granule_end: Option<u64>,
}

/// Ogg page writer for a single logical bitstream
///
/// Lacing and page sequencing happen here; each sealed page is encoded
/// (header layout and CRC) by `tinyogg`.
#[derive(Debug)]
pub struct OggStream {
    serial: u32,
    page_sequence: u32,
    segments: VecDeque<PendingSegment>,
    body: VecDeque<u8>,
    bos_written: bool,
    packets_submitted: u64,
}

impl OggStream {
    pub fn new(serial: u32) -> Self {
        OggStream {
            serial,
            page_sequence: 0,
            segments: VecDeque::new(),
            body: VecDeque::new(),
            bos_written: false,
            packets_submitted: 0,
        }
    }

    pub fn serial(&self) -> u32 {
        self.serial
    }

    /// Sequence number the next sealed page will carry
    pub fn page_sequence(&self) -> u32 {
        self.page_sequence
    }

    /// Number of packets accepted so far
    pub fn packets_submitted(&self) -> u64 {
        self.packets_submitted
    }

    /// Whether segments are waiting for a flush
    pub fn has_pending(&self) -> bool {
        !self.segments.is_empty()
    }

    fn enqueue(&mut self, packet: &SequencedPacket) {
        let table = create_segment_table(packet.data.len());
        let last = table.len() - 1;
        for (i, &len) in table.iter().enumerate() {
            self.segments.push_back(PendingSegment {
                len,
                granule_end: (i == last).then_some(packet.granule_position),
            });
        }
        self.body.extend(packet.data.iter().copied());
        self.packets_submitted += 1;
    }

    /// Seal up to 255 pending segments into one page
    fn seal_page(&mut self, out: &mut Vec<u8>) {
        let count = self.segments.len().min(OGG_MAX_SEGMENTS);

        // Only the very first page of the stream is flagged BOS
        let packet_type = if self.bos_written {
            OggPacketType::Continuation
        } else {
            OggPacketType::BeginOfStream
        };

        let mut segment_table = Vec::with_capacity(count);
        let mut granule_position = GRANULE_NONE;
        let mut data_len = 0usize;
        for segment in self.segments.drain(..count) {
            segment_table.push(segment.len);
            data_len += segment.len as usize;
            if let Some(granule) = segment.granule_end {
                granule_position = granule;
            }
        }

        let mut page = OggPacket::new(self.serial, packet_type, self.page_sequence);
        page.granule_position = granule_position;
        page.segment_table = segment_table;
        page.data = self.body.drain(..data_len).collect();
        out.extend(page.into_bytes());

        trace!(
            serial = self.serial,
            sequence = self.page_sequence,
            segments = count,
            bytes = data_len,
            "sealed ogg page"
        );

        self.bos_written = true;
        self.page_sequence = self.page_sequence.wrapping_add(1);
    }
}

impl Packetizer for OggStream {
    type Error = Infallible;

    fn submit(
        &mut self,
        packet: SequencedPacket,
        force_flush: bool,
    ) -> Result<SubmittedPages, Self::Error> {
        self.enqueue(&packet);

        let mut pages = SubmittedPages::default();
        while self.segments.len() >= OGG_MAX_SEGMENTS
            || (force_flush && !self.segments.is_empty())
        {
            self.seal_page(&mut pages.bytes);
            pages.page_count += 1;
        }
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ogg::OggPage;
    use std::io::Cursor;

    fn read_pages(bytes: &[u8]) -> Vec<OggPage> {
        let mut cursor = Cursor::new(bytes.to_vec());
        let mut pages = Vec::new();
        while let Some(page) = OggPage::read(&mut cursor, pages.len()).unwrap() {
            pages.push(page);
        }
        pages
    }

    #[test]
    fn test_forced_flush_single_packet() {
        let mut stream = OggStream::new(7);
        let packet = stream.wrap(b"OpusHead", 0);
        let out = stream.submit(packet, true).unwrap();
        assert_eq!(out.page_count, 1);

        let pages = read_pages(&out.bytes);
        assert_eq!(pages.len(), 1);
        let page = &pages[0];
        assert!(page.header.is_bos());
        assert!(!page.header.is_continuation());
        assert_eq!(page.header.bitstream_serial, 7);
        assert_eq!(page.header.page_sequence, 0);
        assert_eq!(page.header.granule_position, 0);
        assert_eq!(page.header.segment_table, vec![8]);
        assert_eq!(page.data, b"OpusHead");
        assert_eq!(stream.page_sequence(), 1);
    }

    #[test]
    fn test_header_pages_match_reference_bytes() {
        let mut stream = OggStream::new(7);
        let head = stream.wrap(b"OpusHead\x01\x02\x00\x00\x80\xBB\x00\x00\x00\x00\x00", 0);
        let first = stream.submit(head, true).unwrap().bytes;
        let tags = stream.wrap(b"OpusTags\x07\x00\x00\x00libopus\x00\x00\x00\x00", 1);
        let second = stream.submit(tags, true).unwrap().bytes;

        assert_eq!(first.len(), 27 + 1 + 19);
        assert_eq!(&first[..6], b"OggS\x00\x02");
        assert_eq!(&first[6..14], &0u64.to_le_bytes());
        assert_eq!(&first[14..18], &7u32.to_le_bytes());
        assert_eq!(&first[18..22], &0u32.to_le_bytes());
        assert_eq!(&first[22..26], &0x5769_0507u32.to_le_bytes());
        assert_eq!(&first[26..28], &[1, 19]);

        assert_eq!(second.len(), 27 + 1 + 23);
        assert_eq!(&second[..6], b"OggS\x00\x00");
        assert_eq!(&second[18..22], &1u32.to_le_bytes());
        assert_eq!(&second[22..26], &0x92E4_178Cu32.to_le_bytes());
        assert_eq!(&second[26..28], &[1, 23]);
    }

    #[test]
    fn test_second_page_is_not_bos() {
        let mut stream = OggStream::new(1);
        let first = stream.wrap(b"first", 0);
        stream.submit(first, true).unwrap();
        let second = stream.wrap(b"second", 0);
        let out = stream.submit(second, true).unwrap();

        let pages = read_pages(&out.bytes);
        assert_eq!(pages[0].header.page_sequence, 1);
        assert!(!pages[0].header.is_bos());
    }

    #[test]
    fn test_unforced_submit_buffers() {
        let mut stream = OggStream::new(1);
        let packet = stream.wrap(&[0xAA; 100], 0);
        let out = stream.submit(packet, false).unwrap();
        assert_eq!(out.page_count, 0);
        assert!(out.bytes.is_empty());
        assert!(stream.has_pending());

        let packet = stream.wrap(&[0xBB; 10], 1);
        let out = stream.submit(packet, true).unwrap();
        assert_eq!(out.page_count, 1);
        let pages = read_pages(&out.bytes);
        assert_eq!(pages[0].header.segment_table, vec![100, 10]);
        assert!(!stream.has_pending());
        assert_eq!(stream.packets_submitted(), 2);
    }

    #[test]
    fn test_large_packet_spans_pages() {
        let mut stream = OggStream::new(9);
        let payload: Vec<u8> = (0..70_000u32).map(|i| i as u8).collect();
        let mut packet = stream.wrap(&payload, 0);
        packet.granule_position = 960;
        let out = stream.submit(packet, true).unwrap();
        assert_eq!(out.page_count, 2);

        let pages = read_pages(&out.bytes);
        assert_eq!(pages.len(), 2);
        assert!(pages[0].header.is_bos());
        assert_eq!(pages[0].header.segment_table, vec![255; 255]);
        assert_eq!(pages[0].header.granule_position, GRANULE_NONE);
        assert!(!pages[1].header.is_bos());
        assert_eq!(pages[1].header.page_sequence, 1);
        assert_eq!(pages[1].header.granule_position, 960);

        let joined: Vec<u8> = pages.iter().flat_map(|p| p.data.iter().copied()).collect();
        assert_eq!(joined, payload);
    }

    #[test]
    fn test_bos_not_repeated_after_sequence_wraps() {
        let mut stream = OggStream::new(3);
        let packet = stream.wrap(b"first", 0);
        stream.submit(packet, true).unwrap();

        stream.page_sequence = u32::MAX;
        let packet = stream.wrap(b"last", 1);
        stream.submit(packet, true).unwrap();
        assert_eq!(stream.page_sequence(), 0);

        let packet = stream.wrap(b"wrapped", 2);
        let out = stream.submit(packet, true).unwrap();
        let pages = read_pages(&out.bytes);
        assert_eq!(pages[0].header.page_sequence, 0);
        assert!(!pages[0].header.is_bos());
    }

    #[test]
    fn test_empty_packet_gets_zero_lacing() {
        let mut stream = OggStream::new(2);
        let packet = stream.wrap(&[], 0);
        let out = stream.submit(packet, true).unwrap();
        let pages = read_pages(&out.bytes);
        assert_eq!(pages[0].header.segment_table, vec![0]);
        assert!(pages[0].data.is_empty());
    }
}
