//! Bounds-checked access to the raw image.
//!
//! Nothing in this crate indexes the buffer directly; every read goes
//! through [`slice_at`] or a [`FieldReader`] built on top of it.

use crate::error::{ElfError, Result};
use crate::ident::{ElfClass, Encoding, Ident};
use byteorder::{ReadBytesExt, BE, LE};
use std::io::{self, Cursor};

/// Returns `buf[offset..offset + size]`, or `OffsetOutOfBounds` if any part of
/// the range (including the arithmetic itself) falls outside the buffer.
pub fn slice_at(buf: &[u8], offset: u64, size: u64) -> Result<&[u8]> {
    let out_of_bounds = || ElfError::OffsetOutOfBounds {
        offset,
        size,
        len: buf.len(),
    };
    let end = offset.checked_add(size).ok_or_else(out_of_bounds)?;
    if end > buf.len() as u64 {
        return Err(out_of_bounds());
    }
    Ok(&buf[offset as usize..end as usize])
}

/// Sequential reader over one record, honouring the image's class and
/// byte order.
pub(crate) struct FieldReader<'a> {
    cursor: Cursor<&'a [u8]>,
    base: u64,
    buf_len: usize,
    ident: Ident,
}

impl<'a> FieldReader<'a> {
    /// Positions a reader over `buf[offset..offset + size]`.
    pub(crate) fn at(buf: &'a [u8], offset: u64, size: u64, ident: Ident) -> Result<Self> {
        let record = slice_at(buf, offset, size)?;
        Ok(Self {
            cursor: Cursor::new(record),
            base: offset,
            buf_len: buf.len(),
            ident,
        })
    }

    fn read<T>(
        &mut self,
        size: u64,
        f: impl FnOnce(&mut Cursor<&'a [u8]>) -> io::Result<T>,
    ) -> Result<T> {
        let pos = self.cursor.position();
        f(&mut self.cursor).map_err(|_| ElfError::OffsetOutOfBounds {
            offset: self.base + pos,
            size,
            len: self.buf_len,
        })
    }

    pub(crate) fn skip(&mut self, n: u64) {
        let pos = self.cursor.position();
        self.cursor.set_position(pos + n);
    }

    pub(crate) fn u16(&mut self) -> Result<u16> {
        match self.ident.encoding {
            Encoding::Little => self.read(2, |c| c.read_u16::<LE>()),
            Encoding::Big => self.read(2, |c| c.read_u16::<BE>()),
        }
    }

    pub(crate) fn u32(&mut self) -> Result<u32> {
        match self.ident.encoding {
            Encoding::Little => self.read(4, |c| c.read_u32::<LE>()),
            Encoding::Big => self.read(4, |c| c.read_u32::<BE>()),
        }
    }

    pub(crate) fn u64(&mut self) -> Result<u64> {
        match self.ident.encoding {
            Encoding::Little => self.read(8, |c| c.read_u64::<LE>()),
            Encoding::Big => self.read(8, |c| c.read_u64::<BE>()),
        }
    }

    /// Reads an address/offset/size field: 4 bytes for ELF32, 8 for ELF64,
    /// widened to `u64` either way.
    pub(crate) fn word(&mut self) -> Result<u64> {
        match self.ident.class {
            ElfClass::Class32 => self.u32().map(u64::from),
            ElfClass::Class64 => self.u64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(class: ElfClass, encoding: Encoding) -> Ident {
        Ident {
            class,
            encoding,
            version: 1,
            os_abi: 0,
            abi_version: 0,
        }
    }

    #[test]
    fn slice_at_rejects_ranges_past_the_end() {
        let buf = [0u8; 8];
        assert_eq!(slice_at(&buf, 0, 8).unwrap().len(), 8);
        assert_eq!(slice_at(&buf, 8, 0).unwrap().len(), 0);
        assert_eq!(
            slice_at(&buf, 4, 5),
            Err(ElfError::OffsetOutOfBounds {
                offset: 4,
                size: 5,
                len: 8
            })
        );
    }

    #[test]
    fn slice_at_rejects_overflowing_ranges() {
        let buf = [0u8; 8];
        assert!(matches!(
            slice_at(&buf, u64::MAX, 2),
            Err(ElfError::OffsetOutOfBounds { .. })
        ));
    }

    #[test]
    fn words_follow_class_and_encoding() {
        let buf = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

        let mut r = FieldReader::at(&buf, 0, 8, ident(ElfClass::Class32, Encoding::Little)).unwrap();
        assert_eq!(r.word().unwrap(), 0x0403_0201);
        assert_eq!(r.u16().unwrap(), 0x0605);

        let mut r = FieldReader::at(&buf, 0, 8, ident(ElfClass::Class64, Encoding::Big)).unwrap();
        assert_eq!(r.word().unwrap(), 0x0102_0304_0506_0708);
    }

    #[test]
    fn reading_past_the_record_is_an_error() {
        let buf = [0u8; 16];
        let mut r = FieldReader::at(&buf, 10, 4, ident(ElfClass::Class64, Encoding::Little)).unwrap();
        r.skip(2);
        assert_eq!(
            r.u32(),
            Err(ElfError::OffsetOutOfBounds {
                offset: 12,
                size: 4,
                len: 16
            })
        );
    }
}
