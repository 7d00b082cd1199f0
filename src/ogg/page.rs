use std::io::Read;

use serde::Serialize;

use crate::error::ParseError;
use crate::ogg::{
    OGG_HEADER_TYPE_BOS, OGG_HEADER_TYPE_CONTINUATION, OGG_HEADER_TYPE_EOS, OGG_PAGE_HEADER_LEN,
    OGG_SIGNATURE,
};
use crate::utils::io::{read_le_u32, read_le_u64, read_u8};

/// OGG Page Header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OggPageHeader {
    pub version: u8,
    pub header_type: u8,
    pub granule_position: u64,
    pub bitstream_serial: u32,
    pub page_sequence: u32,
    pub crc: u32,
    pub segment_table: Vec<u8>,
}

/// OGG Page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OggPage {
    pub header: OggPageHeader,
    pub data: Vec<u8>,
}

impl OggPageHeader {
    /// Read OGG page header from a reader.
    ///
    /// Returns `Ok(None)` on a clean end of stream before the first byte.
    pub fn read<R: Read>(reader: &mut R, index: usize) -> Result<Option<Self>, ParseError> {
        let mut signature = [0u8; 4];
        let mut filled = 0;
        while filled < signature.len() {
            match reader.read(&mut signature[filled..]) {
                Ok(0) if filled == 0 => return Ok(None),
                Ok(0) => return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into()),
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        // Check OGG signature
        if &signature != OGG_SIGNATURE {
            return Err(ParseError::BadCapturePattern(index));
        }

        let version = read_u8(reader)?;
        if version != 0 {
            return Err(ParseError::UnsupportedVersion(version));
        }

        let header_type = read_u8(reader)?;
        let granule_position = read_le_u64(reader)?;
        let bitstream_serial = read_le_u32(reader)?;
        let page_sequence = read_le_u32(reader)?;
        let crc = read_le_u32(reader)?;
        let segment_count = read_u8(reader)?;

        // Read segment table
        let mut segment_table = vec![0u8; segment_count as usize];
        reader.read_exact(&mut segment_table)?;

        Ok(Some(OggPageHeader {
            version,
            header_type,
            granule_position,
            bitstream_serial,
            page_sequence,
            crc,
            segment_table,
        }))
    }

    /// Calculate total page data size from segment table
    pub fn get_data_size(&self) -> usize {
        self.segment_table.iter().map(|&x| x as usize).sum()
    }

    /// Encoded size of this header including the segment table
    pub fn encoded_len(&self) -> usize {
        OGG_PAGE_HEADER_LEN + self.segment_table.len()
    }

    pub fn is_bos(&self) -> bool {
        self.header_type & OGG_HEADER_TYPE_BOS != 0
    }

    pub fn is_eos(&self) -> bool {
        self.header_type & OGG_HEADER_TYPE_EOS != 0
    }

    /// First segment continues a packet started on an earlier page
    pub fn is_continuation(&self) -> bool {
        self.header_type & OGG_HEADER_TYPE_CONTINUATION != 0
    }
}

impl OggPage {
    /// Read OGG page from a reader
    pub fn read<R: Read>(reader: &mut R, index: usize) -> Result<Option<Self>, ParseError> {
        let header = match OggPageHeader::read(reader, index)? {
            Some(header) => header,
            None => return Ok(None),
        };

        // Read page data
        let mut data = vec![0u8; header.get_data_size()];
        reader.read_exact(&mut data)?;

        Ok(Some(OggPage { header, data }))
    }
}

/// Create segment table for a single packet of the given size
///
/// A packet whose length is a multiple of 255 (including the empty packet)
/// ends with a zero lacing value.
pub fn create_segment_table(size: usize) -> Vec<u8> {
    let mut table = vec![255u8; size / 255];
    table.push((size % 255) as u8);
    table
}
