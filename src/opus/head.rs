// OpusHead identification header

use std::io::{Cursor, Write};

use serde::Serialize;

use crate::error::{HeaderError, ParseError, WriteStage};
use crate::opus::{StreamParameters, OPUS_SIGNATURE};
use crate::utils::io::{read_le_u16, read_le_u32, read_u8, write_checked};

/// Encoded size with channel mapping family 0
pub const ID_HEADER_LEN: usize = 19;

pub const OPUS_HEAD_VERSION: u8 = 1;

// Only mono/stereo with the default mapping is written, so these stay zero
pub const PRE_SKIP: u16 = 0;
pub const OUTPUT_GAIN: u16 = 0;
pub const CHANNEL_MAPPING_FAMILY: u8 = 0;

/// Identification header fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdentificationHeader {
    pub version: u8,
    pub channel_count: u8,
    pub pre_skip: u16,
    pub sample_rate: u32,
    pub output_gain: u16,
    pub channel_mapping_family: u8,
}

impl IdentificationHeader {
    pub fn from_params(params: &StreamParameters) -> Self {
        IdentificationHeader {
            version: OPUS_HEAD_VERSION,
            channel_count: params.channels,
            pre_skip: PRE_SKIP,
            sample_rate: params.sample_rate,
            output_gain: OUTPUT_GAIN,
            channel_mapping_family: CHANNEL_MAPPING_FAMILY,
        }
    }

    /// Write the packet payload field by field
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), HeaderError> {
        write_checked(writer, OPUS_SIGNATURE, WriteStage::HeadMagic)?;

        let pre_skip = self.pre_skip.to_le_bytes();
        write_checked(
            writer,
            &[self.version, self.channel_count, pre_skip[0], pre_skip[1]],
            WriteStage::HeadVersionChannelsPreSkip,
        )?;

        write_checked(writer, &self.sample_rate.to_le_bytes(), WriteStage::HeadSampleRate)?;

        let gain = self.output_gain.to_le_bytes();
        write_checked(
            writer,
            &[gain[0], gain[1], self.channel_mapping_family],
            WriteStage::HeadGainMappingFamily,
        )?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, HeaderError> {
        let mut buf = Vec::with_capacity(ID_HEADER_LEN);
        self.write(&mut buf)?;
        Ok(buf)
    }

    /// Parse an identification packet
    pub fn parse(packet: &[u8]) -> Result<Self, ParseError> {
        if packet.len() < ID_HEADER_LEN {
            return Err(ParseError::invalid(
                "OpusHead",
                format!("packet is {} bytes, need at least {}", packet.len(), ID_HEADER_LEN),
            ));
        }
        if &packet[0..8] != OPUS_SIGNATURE {
            return Err(ParseError::invalid("OpusHead", "missing OpusHead magic"));
        }

        let mut cursor = Cursor::new(&packet[8..]);
        let version = read_u8(&mut cursor)?;
        // Major version 0 is the only one defined; minor revisions stay compatible
        if version >> 4 != 0 {
            return Err(ParseError::invalid(
                "OpusHead",
                format!("unsupported version {}", version),
            ));
        }
        let channel_count = read_u8(&mut cursor)?;
        let pre_skip = read_le_u16(&mut cursor)?;
        let sample_rate = read_le_u32(&mut cursor)?;
        let output_gain = read_le_u16(&mut cursor)?;
        let channel_mapping_family = read_u8(&mut cursor)?;

        Ok(IdentificationHeader {
            version,
            channel_count,
            pre_skip,
            sample_rate,
            output_gain,
            channel_mapping_family,
        })
    }

    /// Output gain in dB (Q7.8 fixed point)
    pub fn output_gain_db(&self) -> f64 {
        self.output_gain as i16 as f64 / 256.0
    }
}
