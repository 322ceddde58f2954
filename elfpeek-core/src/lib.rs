pub mod binary;
pub mod error;
pub mod header;
pub mod ident;
pub mod program;
mod reader;
pub mod sections;
pub mod strtab;
mod table;

pub use binary::*;
pub use error::{ElfError, Result};
pub use header::{validate, FileHeader};
pub use ident::{ElfClass, Encoding, Ident, ELF_MAGIC};
pub use program::{resolve_program_headers, ProgramHeader};
pub use reader::slice_at;
pub use sections::{resolve_section_headers, SectionHeader};
pub use strtab::{resolve_name, resolve_shstrtab, StrTab};
