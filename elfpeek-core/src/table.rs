use crate::error::{ElfError, Result};
use crate::ident::Ident;
use crate::reader::FieldReader;

/// Location of a header table as declared by the file header.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Table {
    pub kind: &'static str,
    pub offset: u64,
    pub count: u64,
    pub entsize: u16,
}

impl Table {
    /// Decodes `count` records, the `i`th starting at `offset + i * entsize`.
    ///
    /// The stride is always the declared `entsize`; `min` is only the number
    /// of bytes one record of this class needs. Fails on the first record
    /// that does not fit in `buf`.
    pub(crate) fn entries<T>(
        &self,
        buf: &[u8],
        ident: Ident,
        min: usize,
        decode: impl Fn(&mut FieldReader<'_>) -> Result<T>,
    ) -> Result<Vec<T>> {
        if self.count == 0 {
            return Ok(Vec::new());
        }
        if (self.entsize as usize) < min {
            return Err(ElfError::MalformedTableStride {
                table: self.kind,
                entsize: self.entsize,
                min,
            });
        }

        let stride = u64::from(self.entsize);
        let out_of_bounds = |offset| ElfError::OffsetOutOfBounds {
            offset,
            size: stride,
            len: buf.len(),
        };

        // Every record must fit in the buffer, so this bounds the allocation
        // even when `count` is garbage.
        let fits = buf.len() as u64 / stride;
        let mut records = Vec::with_capacity(self.count.min(fits) as usize);

        for i in 0..self.count {
            let start = i
                .checked_mul(stride)
                .and_then(|rel| self.offset.checked_add(rel))
                .ok_or_else(|| out_of_bounds(self.offset))?;
            let mut r = FieldReader::at(buf, start, stride, ident)?;
            records.push(decode(&mut r)?);
        }

        log::debug!(
            "{} table: {} entries of {} bytes at {:#x}",
            self.kind,
            records.len(),
            stride,
            self.offset
        );
        Ok(records)
    }
}
