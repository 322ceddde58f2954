use crate::error::{ElfError, Result};
use crate::header::FileHeader;
use crate::reader::slice_at;
use crate::sections::SectionHeader;
use goblin::elf::section_header::{SHN_UNDEF, SHN_XINDEX};

/// A string table region borrowed from the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrTab<'a> {
    /// Index of the section the region belongs to.
    pub section: usize,
    data: &'a [u8],
}

impl<'a> StrTab<'a> {
    pub fn new(section: usize, data: &'a [u8]) -> Self {
        Self { section, data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: u32) -> Result<String> {
        resolve_name(self.data, index)
    }
}

/// Reads the NUL-terminated name starting at `index`.
///
/// The region end terminates the name if no NUL comes first. Invalid UTF-8
/// is replaced rather than rejected; names are display data here.
pub fn resolve_name(region: &[u8], index: u32) -> Result<String> {
    let start = index as usize;
    if start >= region.len() {
        return Err(ElfError::NameIndexOutOfBounds {
            index,
            len: region.len(),
        });
    }

    let tail = &region[start..];
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    Ok(String::from_utf8_lossy(&tail[..end]).into_owned())
}

/// The effective `e_shstrndx`, following `SHN_XINDEX` into section 0's
/// `sh_link`.
pub fn shstrndx(header: &FileHeader, sections: &[SectionHeader]) -> u32 {
    let index = u32::from(header.e_shstrndx);
    if index != SHN_XINDEX {
        return index;
    }
    match sections.first() {
        Some(first) => {
            log::warn!("e_shstrndx is SHN_XINDEX; using sh_link {} of section 0", first.sh_link);
            first.sh_link
        }
        None => index,
    }
}

/// Selects the section-name string table named by `e_shstrndx`.
///
/// Other `SHT_STRTAB` sections (such as `.strtab` or `.dynstr`) never take
/// part in the choice.
pub fn resolve_shstrtab<'a>(
    buf: &'a [u8],
    header: &FileHeader,
    sections: &[SectionHeader],
) -> Result<StrTab<'a>> {
    let index = shstrndx(header, sections);
    let no_table = || ElfError::NoStringTable {
        index,
        count: sections.len(),
    };

    if index == SHN_UNDEF {
        return Err(no_table());
    }
    let section = sections.get(index as usize).ok_or_else(no_table)?;

    if !section.is_strtab() {
        log::warn!(
            "section {} named by e_shstrndx has type {}, not SHT_STRTAB",
            index,
            section.type_name()
        );
    }

    let data = slice_at(buf, section.sh_offset, section.sh_size)?;
    log::debug!(
        "shstrtab: section {} at {:#x}, {} bytes",
        index,
        section.sh_offset,
        data.len()
    );
    Ok(StrTab::new(index as usize, data))
}
