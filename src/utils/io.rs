// I/O helpers for fixed-width little-endian fields

use std::io::{Read, Write};

use crate::error::{HeaderError, WriteStage};

/// Write `data` with a single `write` call and require it to be taken in full
pub fn write_checked<W: Write + ?Sized>(
    writer: &mut W,
    data: &[u8],
    stage: WriteStage,
) -> Result<(), HeaderError> {
    let written = writer
        .write(data)
        .map_err(|e| HeaderError::underlying(stage, e))?;
    if written != data.len() {
        return Err(HeaderError::ShortWrite {
            stage,
            written,
            expected: data.len(),
        });
    }
    Ok(())
}

/// Read little-endian 16-bit integer
pub fn read_le_u16<R: Read>(reader: &mut R) -> std::io::Result<u16> {
    let mut buffer = [0u8; 2];
    reader.read_exact(&mut buffer)?;
    Ok(u16::from_le_bytes(buffer))
}

/// Read little-endian 32-bit integer
pub fn read_le_u32<R: Read>(reader: &mut R) -> std::io::Result<u32> {
    let mut buffer = [0u8; 4];
    reader.read_exact(&mut buffer)?;
    Ok(u32::from_le_bytes(buffer))
}

/// Read little-endian 64-bit integer
pub fn read_le_u64<R: Read>(reader: &mut R) -> std::io::Result<u64> {
    let mut buffer = [0u8; 8];
    reader.read_exact(&mut buffer)?;
    Ok(u64::from_le_bytes(buffer))
}

/// Read a single byte
pub fn read_u8<R: Read>(reader: &mut R) -> std::io::Result<u8> {
    let mut buffer = [0u8; 1];
    reader.read_exact(&mut buffer)?;
    Ok(buffer[0])
}

/// Render bytes as space-separated uppercase hex
pub fn hex_string(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::{self, Cursor};

    /// Sink that stops accepting bytes once `limit` have been written
    pub(crate) struct ShortSink {
        pub limit: usize,
        pub data: Vec<u8>,
    }

    impl Write for ShortSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.limit.saturating_sub(self.data.len()));
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_checked_full() {
        let mut buf = Vec::new();
        write_checked(&mut buf, b"OpusHead", WriteStage::HeadMagic).unwrap();
        assert_eq!(buf, b"OpusHead");
    }

    #[test]
    fn test_write_checked_short() {
        let mut sink = ShortSink { limit: 3, data: Vec::new() };
        let err = write_checked(&mut sink, b"OpusTags", WriteStage::TagsMagic).unwrap_err();
        match err {
            HeaderError::ShortWrite { stage, written, expected } => {
                assert_eq!(stage, WriteStage::TagsMagic);
                assert_eq!(written, 3);
                assert_eq!(expected, 8);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_le() {
        let mut cursor = Cursor::new(vec![0x80, 0xBB, 0x00, 0x00, 0x34, 0x12]);
        assert_eq!(read_le_u32(&mut cursor).unwrap(), 48000);
        assert_eq!(read_le_u16(&mut cursor).unwrap(), 0x1234);
        assert!(read_u8(&mut cursor).is_err());
    }

    #[test]
    fn test_hex_string() {
        assert_eq!(hex_string(&[0x4F, 0x00, 0xBB]), "4F 00 BB");
        assert_eq!(hex_string(&[]), "");
    }
}
