// OpusTags comment header

use std::io::{Cursor, Read, Write};

use serde::Serialize;

use crate::error::{HeaderError, ParseError, WriteStage};
use crate::opus::{OPUS_TAGS, VENDOR_STRING};
use crate::utils::io::{read_le_u32, write_checked};

/// One `FIELD=value` user comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub field: String,
    pub value: String,
}

impl Comment {
    pub fn new(field: &str, value: &str) -> Self {
        Comment {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

/// Comment header: vendor string plus `FIELD=value` tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommentHeader {
    pub vendor_string: String,
    pub comments: Vec<Comment>,
}

impl CommentHeader {
    /// The header this crate emits: fixed vendor, no tags
    pub fn vendor_only() -> Self {
        CommentHeader {
            vendor_string: VENDOR_STRING.to_string(),
            comments: Vec::new(),
        }
    }

    /// Encoded size of the packet payload
    pub fn encoded_len(&self) -> usize {
        OPUS_TAGS.len()
            + 4
            + self.vendor_string.len()
            + 4
            + self
                .comments
                .iter()
                .map(|c| 4 + c.field.len() + 1 + c.value.len())
                .sum::<usize>()
    }

    /// Write the packet payload field by field
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), HeaderError> {
        write_checked(writer, OPUS_TAGS, WriteStage::TagsMagic)?;

        let vendor = self.vendor_string.as_bytes();
        write_checked(
            writer,
            &(vendor.len() as u32).to_le_bytes(),
            WriteStage::TagsVendorLength,
        )?;
        write_checked(writer, vendor, WriteStage::TagsVendorString)?;

        write_checked(
            writer,
            &(self.comments.len() as u32).to_le_bytes(),
            WriteStage::TagsCount,
        )?;
        for entry in &self.comments {
            let comment = format!("{}={}", entry.field, entry.value);
            write_checked(
                writer,
                &(comment.len() as u32).to_le_bytes(),
                WriteStage::TagsComment,
            )?;
            write_checked(writer, comment.as_bytes(), WriteStage::TagsComment)?;
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, HeaderError> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.write(&mut buf)?;
        Ok(buf)
    }

    /// Parse a comment packet
    pub fn parse(packet: &[u8]) -> Result<Self, ParseError> {
        if packet.len() < 16 || &packet[0..8] != OPUS_TAGS {
            return Err(ParseError::invalid("OpusTags", "missing OpusTags magic"));
        }
        let mut reader = Cursor::new(&packet[8..]);

        let vendor_string = read_string(&mut reader, packet.len())?;

        let comment_count = read_le_u32(&mut reader)? as usize;
        // Each comment needs at least its 4-byte length
        if comment_count > packet.len() / 4 {
            return Err(ParseError::invalid(
                "OpusTags",
                format!("comment count {} exceeds packet size", comment_count),
            ));
        }

        let mut comments = Vec::with_capacity(comment_count);
        for _ in 0..comment_count {
            let comment = read_string(&mut reader, packet.len())?;
            // Parse comment (format: FIELD=value)
            if let Some((field, value)) = comment.split_once('=') {
                comments.push(Comment::new(field, value));
            }
        }

        Ok(CommentHeader {
            vendor_string,
            comments,
        })
    }

    /// Get a comment value by field name
    pub fn get(&self, field: &str) -> Option<&String> {
        self.comments
            .iter()
            .find(|c| c.field.eq_ignore_ascii_case(field))
            .map(|c| &c.value)
    }
}

/// Read a length-prefixed string, bounded by the packet size
fn read_string<R: Read>(reader: &mut R, limit: usize) -> Result<String, ParseError> {
    let length = read_le_u32(reader)? as usize;
    if length > limit {
        return Err(ParseError::invalid(
            "OpusTags",
            format!("string length {} exceeds packet size", length),
        ));
    }
    let mut bytes = vec![0u8; length];
    reader.read_exact(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).to_string())
}
