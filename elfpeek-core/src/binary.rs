use crate::error::Result;
use crate::header::FileHeader;
use crate::program::{self, ProgramHeader, PN_XNUM};
use crate::reader::slice_at;
use crate::sections::{resolve_section_headers, SectionHeader};
use crate::strtab::{resolve_shstrtab, StrTab};

/// A fully decoded ELF image.
///
/// Built in one go by [`DecodedElf::parse`]; either every table decoded or
/// the caller gets the first error.
#[derive(Debug, Clone)]
pub struct DecodedElf<'a> {
    data: &'a [u8],
    pub header: FileHeader,
    pub program_headers: Vec<ProgramHeader>,
    pub section_headers: Vec<SectionHeader>,
    pub shstrtab: StrTab<'a>,
}

impl<'a> DecodedElf<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let header = FileHeader::parse(data)?;

        let section_headers = resolve_section_headers(data, &header)?;

        let phnum = match section_headers.first() {
            Some(first) if header.e_phnum == PN_XNUM => {
                log::warn!("e_phnum is PN_XNUM; using sh_info {} of section 0", first.sh_info);
                u64::from(first.sh_info)
            }
            _ => u64::from(header.e_phnum),
        };
        let program_headers = program::read_program_headers(data, &header, phnum)?;

        let shstrtab = resolve_shstrtab(data, &header, &section_headers)?;

        log::info!(
            "Decoded ELF{}: {} program headers, {} section headers",
            header.class().bits(),
            program_headers.len(),
            section_headers.len()
        );

        Ok(Self {
            data,
            header,
            program_headers,
            section_headers,
            shstrtab,
        })
    }

    pub fn entry_point(&self) -> u64 {
        self.header.entry_point()
    }

    pub fn section_name(&self, section: &SectionHeader) -> Result<String> {
        self.shstrtab.get(section.sh_name)
    }

    /// Section names in table order.
    pub fn section_names(&self) -> Result<Vec<String>> {
        self.section_headers
            .iter()
            .map(|s| self.section_name(s))
            .collect()
    }

    /// First section whose name resolves to `name`. Sections whose names do
    /// not resolve are skipped.
    pub fn section_by_name(&self, name: &str) -> Option<&SectionHeader> {
        self.section_headers
            .iter()
            .find(|s| self.section_name(s).is_ok_and(|n| n == name))
    }

    /// The bytes a section occupies in the file; empty for `SHT_NOBITS`.
    pub fn section_data(&self, section: &SectionHeader) -> Result<&'a [u8]> {
        if !section.occupies_file() {
            return Ok(&self.data[..0]);
        }
        slice_at(self.data, section.sh_offset, section.sh_size)
    }

    /// The bytes a segment occupies in the file (`p_filesz`, not `p_memsz`).
    pub fn segment_data(&self, segment: &ProgramHeader) -> Result<&'a [u8]> {
        slice_at(self.data, segment.p_offset, segment.p_filesz)
    }
}
