use crate::error::{ElfError, Result};
use goblin::elf::header::{
    EI_ABIVERSION, EI_CLASS, EI_DATA, EI_OSABI, EI_VERSION, ELFCLASS32, ELFCLASS64, ELFDATA2LSB,
    ELFDATA2MSB, ELFMAG, SELFMAG, SIZEOF_IDENT,
};
use serde::Serialize;

/// `\x7fELF` read as a little-endian word.
pub const ELF_MAGIC: u32 = u32::from_le_bytes(*ELFMAG);

/// Address width of the image, taken from `EI_CLASS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElfClass {
    Class32,
    Class64,
}

impl ElfClass {
    pub fn bits(self) -> u32 {
        match self {
            ElfClass::Class32 => 32,
            ElfClass::Class64 => 64,
        }
    }
}

/// Byte order of every multi-byte field, taken from `EI_DATA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Encoding {
    Little,
    Big,
}

/// The decoded `e_ident` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ident {
    pub class: ElfClass,
    pub encoding: Encoding,
    pub version: u8,
    pub os_abi: u8,
    pub abi_version: u8,
}

impl Ident {
    /// Checks the magic, class and data-encoding bytes at the start of `buf`.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < SELFMAG {
            return Err(ElfError::TruncatedHeader {
                needed: SELFMAG,
                found: buf.len(),
            });
        }

        let found = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
        if found != ELF_MAGIC {
            return Err(ElfError::InvalidMagic {
                expected: ELF_MAGIC,
                found,
            });
        }

        if buf.len() < SIZEOF_IDENT {
            return Err(ElfError::TruncatedHeader {
                needed: SIZEOF_IDENT,
                found: buf.len(),
            });
        }

        let class = match buf[EI_CLASS] {
            ELFCLASS32 => ElfClass::Class32,
            ELFCLASS64 => ElfClass::Class64,
            other => return Err(ElfError::UnsupportedClass(other)),
        };

        let encoding = match buf[EI_DATA] {
            ELFDATA2LSB => Encoding::Little,
            ELFDATA2MSB => Encoding::Big,
            other => return Err(ElfError::UnsupportedEncoding(other)),
        };

        Ok(Self {
            class,
            encoding,
            version: buf[EI_VERSION],
            os_abi: buf[EI_OSABI],
            abi_version: buf[EI_ABIVERSION],
        })
    }
}
