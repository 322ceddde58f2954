use crate::error::Result;
use crate::header::FileHeader;
use crate::ident::ElfClass;
use crate::reader::FieldReader;
use crate::table::Table;
use goblin::elf::program_header::{pt_to_str, PF_R, PF_W, PF_X, PT_LOAD};
use serde::Serialize;

/// `e_phnum` value meaning the real count is in section 0's `sh_info`.
pub const PN_XNUM: u16 = 0xffff;

pub fn record_size(class: ElfClass) -> usize {
    match class {
        ElfClass::Class32 => goblin::elf32::program_header::SIZEOF_PHDR,
        ElfClass::Class64 => goblin::elf64::program_header::SIZEOF_PHDR,
    }
}

/// One program header (segment descriptor), widened to 64-bit fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgramHeader {
    pub p_type: u32,
    pub p_flags: u32,
    pub p_offset: u64,
    pub p_vaddr: u64,
    pub p_paddr: u64,
    pub p_filesz: u64,
    pub p_memsz: u64,
    pub p_align: u64,
}

impl ProgramHeader {
    fn decode(r: &mut FieldReader<'_>, class: ElfClass) -> Result<Self> {
        // ELF64 moves p_flags up next to p_type to keep the words aligned.
        match class {
            ElfClass::Class32 => {
                let p_type = r.u32()?;
                let p_offset = r.word()?;
                let p_vaddr = r.word()?;
                let p_paddr = r.word()?;
                let p_filesz = r.word()?;
                let p_memsz = r.word()?;
                let p_flags = r.u32()?;
                let p_align = r.word()?;
                Ok(Self {
                    p_type,
                    p_flags,
                    p_offset,
                    p_vaddr,
                    p_paddr,
                    p_filesz,
                    p_memsz,
                    p_align,
                })
            }
            ElfClass::Class64 => Ok(Self {
                p_type: r.u32()?,
                p_flags: r.u32()?,
                p_offset: r.word()?,
                p_vaddr: r.word()?,
                p_paddr: r.word()?,
                p_filesz: r.word()?,
                p_memsz: r.word()?,
                p_align: r.word()?,
            }),
        }
    }

    /// e.g. `"PT_LOAD"`.
    pub fn type_name(&self) -> &'static str {
        pt_to_str(self.p_type)
    }

    pub fn is_load(&self) -> bool {
        self.p_type == PT_LOAD
    }

    /// `readelf`-style permission string, e.g. `"R E"`.
    pub fn flags_string(&self) -> String {
        let bit = |mask: u32, c: char| if self.p_flags & mask != 0 { c } else { ' ' };
        [bit(PF_R, 'R'), bit(PF_W, 'W'), bit(PF_X, 'E')]
            .iter()
            .collect()
    }
}

/// Decodes the program-header table using the header's `e_phnum` as-is.
pub fn resolve_program_headers(buf: &[u8], header: &FileHeader) -> Result<Vec<ProgramHeader>> {
    read_program_headers(buf, header, u64::from(header.e_phnum))
}

pub(crate) fn read_program_headers(
    buf: &[u8],
    header: &FileHeader,
    count: u64,
) -> Result<Vec<ProgramHeader>> {
    let class = header.class();
    let table = Table {
        kind: "program header",
        offset: header.e_phoff,
        count,
        entsize: header.e_phentsize,
    };
    table.entries(buf, header.ident, record_size(class), |r| {
        ProgramHeader::decode(r, class)
    })
}
