use thiserror::Error;

/// Errors produced while decoding an ELF image.
///
/// Every variant is fatal for the image being decoded: no partially decoded
/// tables are ever handed out.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElfError {
    #[error("truncated ELF header: need {needed} bytes, found {found}")]
    TruncatedHeader { needed: usize, found: usize },

    #[error("could not locate ELF magic. Expected: {expected:x} found: {found:x}")]
    InvalidMagic { expected: u32, found: u32 },

    #[error("unsupported ELF class: {0}")]
    UnsupportedClass(u8),

    #[error("unsupported ELF data encoding: {0}")]
    UnsupportedEncoding(u8),

    #[error("range {offset:#x}+{size:#x} lies outside the {len:#x}-byte buffer")]
    OffsetOutOfBounds { offset: u64, size: u64, len: usize },

    #[error("malformed {table} table: entry size {entsize} is below the {min}-byte record")]
    MalformedTableStride {
        table: &'static str,
        entsize: u16,
        min: usize,
    },

    #[error("no section-header string table (e_shstrndx {index}, {count} sections)")]
    NoStringTable { index: u32, count: usize },

    #[error("name index {index} is outside the {len}-byte string table")]
    NameIndexOutOfBounds { index: u32, len: usize },
}

pub type Result<T> = std::result::Result<T, ElfError>;
