use crate::error::{ElfError, Result};
use crate::ident::{ElfClass, Ident};
use crate::reader::FieldReader;
use goblin::elf::header::{et_to_str, machine_to_str, ET_EXEC, SIZEOF_IDENT};
use serde::Serialize;

/// Size in bytes of the file header for the given class.
pub fn header_size(class: ElfClass) -> usize {
    match class {
        ElfClass::Class32 => goblin::elf32::header::SIZEOF_EHDR,
        ElfClass::Class64 => goblin::elf64::header::SIZEOF_EHDR,
    }
}

/// The ELF file header, with every address and offset widened to 64 bits.
///
/// Corresponds to `Elf32_Ehdr` / `Elf64_Ehdr`. The on-disk widths differ
/// between classes, but once decoded the two are indistinguishable apart
/// from [`FileHeader::class`].
///
/// Reference: [ELF Specification v1.2](https://refspecs.linuxfoundation.org/elf/elf.pdf)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileHeader {
    /// Decoded identification bytes (class, data encoding, version, ABI).
    pub ident: Ident,

    /// Object file type.
    ///
    /// Common values:
    /// - `ET_NONE` (0): No file type
    /// - `ET_REL` (1): Relocatable file
    /// - `ET_EXEC` (2): Executable file
    /// - `ET_DYN` (3): Shared object
    /// - `ET_CORE` (4): Core dump
    pub e_type: u16,

    /// Target architecture, e.g. `EM_X86_64` (62) or `EM_AARCH64` (183).
    pub e_machine: u16,

    pub e_version: u32,

    /// Virtual address where execution starts.
    pub e_entry: u64,

    /// File offset of the program header table.
    pub e_phoff: u64,

    /// File offset of the section header table.
    pub e_shoff: u64,

    pub e_flags: u32,

    pub e_ehsize: u16,

    /// Size of one entry in the program header table.
    pub e_phentsize: u16,

    /// Number of entries in the program header table, or `PN_XNUM` if the
    /// real count lives in section 0.
    pub e_phnum: u16,

    /// Size of one entry in the section header table.
    pub e_shentsize: u16,

    /// Number of entries in the section header table, or 0 if the real count
    /// lives in section 0.
    pub e_shnum: u16,

    /// Index of the section holding section names, or `SHN_XINDEX` if the
    /// real index lives in section 0.
    pub e_shstrndx: u16,
}

impl FileHeader {
    /// Validates the identification block and decodes the header that
    /// follows it.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let ident = Ident::parse(buf)?;

        let needed = header_size(ident.class);
        if buf.len() < needed {
            return Err(ElfError::TruncatedHeader {
                needed,
                found: buf.len(),
            });
        }

        let mut r = FieldReader::at(buf, 0, needed as u64, ident)?;
        r.skip(SIZEOF_IDENT as u64);

        let header = FileHeader {
            ident,
            e_type: r.u16()?,
            e_machine: r.u16()?,
            e_version: r.u32()?,
            e_entry: r.word()?,
            e_phoff: r.word()?,
            e_shoff: r.word()?,
            e_flags: r.u32()?,
            e_ehsize: r.u16()?,
            e_phentsize: r.u16()?,
            e_phnum: r.u16()?,
            e_shentsize: r.u16()?,
            e_shnum: r.u16()?,
            e_shstrndx: r.u16()?,
        };

        log::debug!(
            "ELF{} {:?}-endian {} header: phoff={:#x} phnum={} shoff={:#x} shnum={} shstrndx={}",
            ident.class.bits(),
            ident.encoding,
            header.type_name(),
            header.e_phoff,
            header.e_phnum,
            header.e_shoff,
            header.e_shnum,
            header.e_shstrndx,
        );

        Ok(header)
    }

    pub fn class(&self) -> ElfClass {
        self.ident.class
    }

    pub fn is_64(&self) -> bool {
        self.ident.class == ElfClass::Class64
    }

    pub fn entry_point(&self) -> u64 {
        self.e_entry
    }

    pub fn is_executable(&self) -> bool {
        self.e_type == ET_EXEC
    }

    /// e.g. `"EXEC"` or `"DYN"`.
    pub fn type_name(&self) -> &'static str {
        et_to_str(self.e_type)
    }

    /// e.g. `"X86_64"` or `"AARCH64"`.
    pub fn machine_name(&self) -> &'static str {
        machine_to_str(self.e_machine)
    }
}

/// Confirms `buf` is an ELF image this crate can decode and returns its
/// file header.
pub fn validate(buf: &[u8]) -> Result<FileHeader> {
    FileHeader::parse(buf)
}
