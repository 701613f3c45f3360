use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

/// Version needed to extract: 2.0 (DEFLATE support)
pub const VERSION_NEEDED: u16 = 20;

/// General-purpose flags: bit 3 (data descriptor follows) and bit 11
/// (UTF-8 filename)
pub const GP_FLAGS: u16 = (1 << 3) | (1 << 11);

/// Compression method field value for DEFLATE
pub const DEFLATE_METHOD: u16 = 8;

/// Local File Header (LFH) - 30 bytes plus filename
///
/// The CRC and size fields are written as zero: flag bit 3 announces that
/// the trailing data descriptor carries them instead, which is what lets
/// the archive stream to a non-seekable sink without patching headers.
pub struct LocalFileHeader<'a> {
    pub file_name: &'a str,
}

impl LocalFileHeader<'_> {
    pub const SIGNATURE: &'static [u8] = b"PK\x03\x04";
    pub const SIZE: usize = 30;

    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let name = self.file_name.as_bytes();
        let mut buf = Vec::with_capacity(Self::SIZE + name.len());

        buf.write_all(Self::SIGNATURE)?;
        buf.write_u16::<LittleEndian>(VERSION_NEEDED)?;
        buf.write_u16::<LittleEndian>(GP_FLAGS)?;
        buf.write_u16::<LittleEndian>(DEFLATE_METHOD)?;
        buf.write_u16::<LittleEndian>(0)?; // mod time
        buf.write_u16::<LittleEndian>(0)?; // mod date
        buf.write_u32::<LittleEndian>(0)?; // crc-32, in the descriptor
        buf.write_u32::<LittleEndian>(0)?; // compressed size, in the descriptor
        buf.write_u32::<LittleEndian>(0)?; // uncompressed size, in the descriptor
        buf.write_u16::<LittleEndian>(name.len() as u16)?;
        buf.write_u16::<LittleEndian>(0)?; // extra field length
        buf.write_all(name)?;

        Ok(buf)
    }
}

/// Data descriptor - 12 bytes, written immediately after an entry's
/// compressed data
///
/// The bare form without the optional `PK\x07\x08` signature word.
pub struct DataDescriptor {
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
}

impl DataDescriptor {
    pub const SIZE: usize = 12;

    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(Self::SIZE);

        buf.write_u32::<LittleEndian>(self.crc32)?;
        buf.write_u32::<LittleEndian>(self.compressed_size)?;
        buf.write_u32::<LittleEndian>(self.uncompressed_size)?;

        Ok(buf)
    }
}

/// Central Directory File Header (CDFH) - 46 bytes plus filename
///
/// One record is accumulated per entry as its sizes and checksum become
/// final, and all records are written out in entry order at finalization.
/// Mirrors the local header's metadata and additionally records the byte
/// offset at which that entry's local header began.
pub struct CentralDirEntry {
    pub file_name: String,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub header_offset: u32,
}

impl CentralDirEntry {
    pub const SIGNATURE: &'static [u8] = b"PK\x01\x02";
    pub const SIZE: usize = 46;

    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let name = self.file_name.as_bytes();
        let mut buf = Vec::with_capacity(Self::SIZE + name.len());

        buf.write_all(Self::SIGNATURE)?;
        buf.write_u16::<LittleEndian>(VERSION_NEEDED)?; // version made by
        buf.write_u16::<LittleEndian>(VERSION_NEEDED)?; // version needed
        buf.write_u16::<LittleEndian>(GP_FLAGS)?;
        buf.write_u16::<LittleEndian>(DEFLATE_METHOD)?;
        buf.write_u16::<LittleEndian>(0)?; // mod time
        buf.write_u16::<LittleEndian>(0)?; // mod date
        buf.write_u32::<LittleEndian>(self.crc32)?;
        buf.write_u32::<LittleEndian>(self.compressed_size)?;
        buf.write_u32::<LittleEndian>(self.uncompressed_size)?;
        buf.write_u16::<LittleEndian>(name.len() as u16)?;
        buf.write_u16::<LittleEndian>(0)?; // extra field length
        buf.write_u16::<LittleEndian>(0)?; // file comment length
        buf.write_u16::<LittleEndian>(0)?; // disk number start
        buf.write_u16::<LittleEndian>(0)?; // internal attributes
        buf.write_u32::<LittleEndian>(0)?; // external attributes
        buf.write_u32::<LittleEndian>(self.header_offset)?;
        buf.write_all(name)?;

        Ok(buf)
    }
}

/// End of Central Directory (EOCD) - 22 bytes
pub struct EndOfCentralDirectory {
    pub entry_count: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";
    pub const SIZE: usize = 22;

    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(Self::SIZE);

        buf.write_all(Self::SIGNATURE)?;
        buf.write_u16::<LittleEndian>(0)?; // disk number
        buf.write_u16::<LittleEndian>(0)?; // disk with central directory
        buf.write_u16::<LittleEndian>(self.entry_count)?; // entries on this disk
        buf.write_u16::<LittleEndian>(self.entry_count)?; // entries total
        buf.write_u32::<LittleEndian>(self.cd_size)?;
        buf.write_u32::<LittleEndian>(self.cd_offset)?;
        buf.write_u16::<LittleEndian>(0)?; // comment length

        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::ReadBytesExt;
    use std::io::Cursor;

    #[test]
    fn local_header_layout() {
        let bytes = LocalFileHeader { file_name: "a.txt" }.to_bytes().unwrap();
        assert_eq!(bytes.len(), LocalFileHeader::SIZE + 5);

        assert_eq!(&bytes[0..4], LocalFileHeader::SIGNATURE);
        let mut cursor = Cursor::new(&bytes[4..]);
        assert_eq!(cursor.read_u16::<LittleEndian>().unwrap(), VERSION_NEEDED);
        assert_eq!(cursor.read_u16::<LittleEndian>().unwrap(), 0x0808); // bits 3 and 11
        assert_eq!(cursor.read_u16::<LittleEndian>().unwrap(), DEFLATE_METHOD);

        // crc and sizes at offsets 14/18/22 stay zero
        assert_eq!(&bytes[14..26], &[0u8; 12]);
        // filename length at offset 26, name at offset 30
        assert_eq!(u16::from_le_bytes([bytes[26], bytes[27]]), 5);
        assert_eq!(&bytes[30..], b"a.txt");
    }

    #[test]
    fn data_descriptor_layout() {
        let bytes = DataDescriptor {
            crc32: 0x1122_3344,
            compressed_size: 7,
            uncompressed_size: 11,
        }
        .to_bytes()
        .unwrap();

        assert_eq!(bytes.len(), DataDescriptor::SIZE);
        assert_eq!(&bytes[0..4], &0x1122_3344u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &7u32.to_le_bytes());
        assert_eq!(&bytes[8..12], &11u32.to_le_bytes());
    }

    #[test]
    fn central_entry_layout() {
        let bytes = CentralDirEntry {
            file_name: "dir/a.txt".to_string(),
            crc32: 0xdead_beef,
            compressed_size: 100,
            uncompressed_size: 200,
            header_offset: 42,
        }
        .to_bytes()
        .unwrap();

        assert_eq!(bytes.len(), CentralDirEntry::SIZE + 9);
        assert_eq!(&bytes[0..4], CentralDirEntry::SIGNATURE);
        assert_eq!(&bytes[16..20], &0xdead_beefu32.to_le_bytes());
        assert_eq!(&bytes[20..24], &100u32.to_le_bytes());
        assert_eq!(&bytes[24..28], &200u32.to_le_bytes());
        // relative header offset lives at byte 42
        assert_eq!(&bytes[42..46], &42u32.to_le_bytes());
        assert_eq!(&bytes[46..], b"dir/a.txt");
    }

    #[test]
    fn eocd_layout() {
        let bytes = EndOfCentralDirectory {
            entry_count: 3,
            cd_size: 150,
            cd_offset: 1000,
        }
        .to_bytes()
        .unwrap();

        assert_eq!(bytes.len(), EndOfCentralDirectory::SIZE);
        assert_eq!(&bytes[0..4], EndOfCentralDirectory::SIGNATURE);
        assert_eq!(u16::from_le_bytes([bytes[8], bytes[9]]), 3);
        assert_eq!(u16::from_le_bytes([bytes[10], bytes[11]]), 3);
        assert_eq!(&bytes[12..16], &150u32.to_le_bytes());
        assert_eq!(&bytes[16..20], &1000u32.to_le_bytes());
        assert_eq!(&bytes[20..22], &[0, 0]);
    }
}
