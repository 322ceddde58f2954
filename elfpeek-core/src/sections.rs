use crate::error::Result;
use crate::header::FileHeader;
use crate::ident::ElfClass;
use crate::reader::FieldReader;
use crate::table::Table;
use goblin::elf::section_header::{sht_to_str, SHT_NOBITS, SHT_STRTAB};
use serde::Serialize;

pub fn record_size(class: ElfClass) -> usize {
    match class {
        ElfClass::Class32 => goblin::elf32::section_header::SIZEOF_SHDR,
        ElfClass::Class64 => goblin::elf64::section_header::SIZEOF_SHDR,
    }
}

/// One section header, widened to 64-bit fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionHeader {
    /// Offset of the section's name inside the shstrtab.
    pub sh_name: u32,
    pub sh_type: u32,
    pub sh_flags: u64,
    pub sh_addr: u64,
    pub sh_offset: u64,
    pub sh_size: u64,
    pub sh_link: u32,
    pub sh_info: u32,
    pub sh_addralign: u64,
    pub sh_entsize: u64,
}

impl SectionHeader {
    // Same field order for both classes; only the word width changes.
    fn decode(r: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            sh_name: r.u32()?,
            sh_type: r.u32()?,
            sh_flags: r.word()?,
            sh_addr: r.word()?,
            sh_offset: r.word()?,
            sh_size: r.word()?,
            sh_link: r.u32()?,
            sh_info: r.u32()?,
            sh_addralign: r.word()?,
            sh_entsize: r.word()?,
        })
    }

    /// e.g. `"SHT_PROGBITS"`.
    pub fn type_name(&self) -> &'static str {
        sht_to_str(self.sh_type)
    }

    pub fn is_strtab(&self) -> bool {
        self.sh_type == SHT_STRTAB
    }

    /// `SHT_NOBITS` sections (`.bss`) occupy no bytes in the file.
    pub fn occupies_file(&self) -> bool {
        self.sh_type != SHT_NOBITS
    }
}

/// Decodes the section-header table.
///
/// When `e_shnum` is 0 but a table is present, the real count is taken from
/// section 0's `sh_size`.
pub fn resolve_section_headers(buf: &[u8], header: &FileHeader) -> Result<Vec<SectionHeader>> {
    let class = header.class();
    let mut table = Table {
        kind: "section header",
        offset: header.e_shoff,
        count: u64::from(header.e_shnum),
        entsize: header.e_shentsize,
    };

    if header.e_shnum == 0 && header.e_shoff != 0 {
        let first = Table { count: 1, ..table }
            .entries(buf, header.ident, record_size(class), SectionHeader::decode)?;
        table.count = first.first().map_or(0, |s| s.sh_size);
        log::warn!(
            "e_shnum is 0; using extended section count {} from section 0",
            table.count
        );
    }

    table.entries(buf, header.ident, record_size(class), SectionHeader::decode)
}
