// Reads the OpusHead/OpusTags packets back out of an Ogg stream

use std::io::Read;

use serde::Serialize;
use tracing::debug;

use crate::error::ParseError;
use crate::ogg::OggPage;
use crate::opus::{CommentHeader, IdentificationHeader, OPUS_SIGNATURE};

const HEADER_PACKETS: usize = 2;

/// Summary of one page that carried header data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub sequence: u32,
    pub serial: u32,
    pub granule_position: u64,
    pub bos: bool,
    pub eos: bool,
    pub continuation: bool,
    pub segments: usize,
    pub body_bytes: usize,
    pub crc: u32,
}

impl PageSummary {
    fn from_page(page: &OggPage) -> Self {
        PageSummary {
            sequence: page.header.page_sequence,
            serial: page.header.bitstream_serial,
            granule_position: page.header.granule_position,
            bos: page.header.is_bos(),
            eos: page.header.is_eos(),
            continuation: page.header.is_continuation(),
            segments: page.header.segment_table.len(),
            body_bytes: page.data.len(),
            crc: page.header.crc,
        }
    }
}

/// Decoded header packets of an Ogg Opus stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpusHeaders {
    pub identification: IdentificationHeader,
    pub comment: CommentHeader,
    pub pages: Vec<PageSummary>,
    #[serde(skip)]
    pub head_packet: Vec<u8>,
    #[serde(skip)]
    pub tags_packet: Vec<u8>,
}

/// Reassemble and parse the first two packets of the stream
pub fn read_headers<R: Read>(reader: &mut R) -> Result<OpusHeaders, ParseError> {
    let mut packets: Vec<Vec<u8>> = Vec::with_capacity(HEADER_PACKETS);
    let mut current = Vec::new();
    let mut pages = Vec::new();

    'pages: while packets.len() < HEADER_PACKETS {
        let page = match OggPage::read(reader, pages.len())? {
            Some(page) => page,
            None => break,
        };
        pages.push(PageSummary::from_page(&page));

        let mut offset = 0;
        for &lacing in &page.header.segment_table {
            let len = lacing as usize;
            current.extend_from_slice(&page.data[offset..offset + len]);
            offset += len;
            if lacing < 255 {
                packets.push(std::mem::take(&mut current));
                if packets.len() == HEADER_PACKETS {
                    break 'pages;
                }
            }
        }
    }

    if packets.len() < HEADER_PACKETS {
        return Err(ParseError::MissingPackets {
            found: packets.len(),
            expected: HEADER_PACKETS,
        });
    }

    let tags_packet = packets.pop().unwrap_or_default();
    let head_packet = packets.pop().unwrap_or_default();
    let identification = IdentificationHeader::parse(&head_packet)?;
    let comment = CommentHeader::parse(&tags_packet)?;
    debug!(
        pages = pages.len(),
        channels = identification.channel_count,
        vendor = %comment.vendor_string,
        "parsed opus headers"
    );

    Ok(OpusHeaders {
        identification,
        comment,
        pages,
        head_packet,
        tags_packet,
    })
}

/// Detect if a stream starts with an OpusHead page
pub fn is_opus_stream<R: Read>(reader: &mut R) -> bool {
    match OggPage::read(reader, 0) {
        Ok(Some(page)) => page.header.is_bos() && page.data.starts_with(OPUS_SIGNATURE),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ogg::{OggStream, Packetizer};
    use ::ogg::{OggPacket, OggPacketType};
    use crate::opus::{write_headers, Comment, StreamParameters, VENDOR_STRING};
    use std::io::Cursor;

    fn written_headers(params: StreamParameters) -> Vec<u8> {
        let mut stream = OggStream::new(77);
        let mut output = Vec::new();
        write_headers(&params, &mut stream, &mut output).unwrap();
        output
    }

    #[test]
    fn test_reads_back_written_headers() {
        let bytes = written_headers(StreamParameters::new(2, 48000));
        let headers = read_headers(&mut Cursor::new(bytes)).unwrap();

        assert_eq!(headers.identification.channel_count, 2);
        assert_eq!(headers.identification.sample_rate, 48000);
        assert_eq!(headers.identification.version, 1);
        assert_eq!(headers.comment.vendor_string, VENDOR_STRING);
        assert!(headers.comment.comments.is_empty());
        assert_eq!(headers.head_packet.len(), 19);

        assert_eq!(headers.pages.len(), 2);
        assert!(headers.pages[0].bos);
        assert_eq!(headers.pages[1].sequence, 1);
        assert!(headers.pages.iter().all(|p| p.serial == 77 && p.crc != 0));
    }

    #[test]
    fn test_tags_split_across_pages() {
        let mut stream = OggStream::new(5);
        let mut output = Vec::new();

        let head = IdentificationHeader::from_params(&StreamParameters::new(1, 8000));
        let packet = stream.wrap(&head.to_bytes().unwrap(), 0);
        output.extend(stream.submit(packet, true).unwrap().bytes);

        let tags = CommentHeader {
            vendor_string: "x".repeat(70_000),
            comments: vec![Comment::new("TITLE", "Long")],
        };
        let packet = stream.wrap(&tags.to_bytes().unwrap(), 1);
        let pages = stream.submit(packet, true).unwrap();
        assert_eq!(pages.page_count, 2);
        output.extend(pages.bytes);

        let headers = read_headers(&mut Cursor::new(output)).unwrap();
        assert_eq!(headers.pages.len(), 3);
        assert_eq!(headers.pages[1].segments, 255);
        assert!(!headers.pages[2].bos);
        assert_eq!(headers.comment.get("title").map(String::as_str), Some("Long"));
        assert_eq!(headers.comment.vendor_string.len(), 70_000);
    }

    #[test]
    fn test_missing_tags_page() {
        let bytes = written_headers(StreamParameters::default());
        let first_page_len = 27 + 1 + 19;
        let err = read_headers(&mut Cursor::new(bytes[..first_page_len].to_vec())).unwrap_err();
        assert!(matches!(err, ParseError::MissingPackets { found: 1, expected: 2 }));
    }

    #[test]
    fn test_is_opus_stream() {
        let bytes = written_headers(StreamParameters::default());
        assert!(is_opus_stream(&mut Cursor::new(bytes)));

        let mut vorbis = OggPacket::new(1, OggPacketType::BeginOfStream, 0);
        vorbis.write(b"\x01vorbis");
        assert!(!is_opus_stream(&mut Cursor::new(vorbis.into_bytes())));
        assert!(!is_opus_stream(&mut Cursor::new(Vec::new())));
    }
}
