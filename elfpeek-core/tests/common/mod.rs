//! Synthetic ELF images for tests.
#![allow(dead_code)]

use goblin::elf::section_header::SHT_STRTAB;

pub const SHSTRTAB: &str = ".shstrtab";

#[derive(Debug, Clone)]
pub struct Section {
    pub name: &'static str,
    pub sh_type: u32,
    pub addr: u64,
    pub data: Vec<u8>,
}

impl Section {
    pub fn new(name: &'static str, sh_type: u32, data: &[u8]) -> Self {
        Self {
            name,
            sh_type,
            addr: 0,
            data: data.to_vec(),
        }
    }

    /// A `SHT_STRTAB` named `.shstrtab`; its contents are generated.
    pub fn shstrtab() -> Self {
        Self::new(SHSTRTAB, SHT_STRTAB, &[])
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub p_type: u32,
    pub p_flags: u32,
    pub offset: u64,
    pub vaddr: u64,
    pub filesz: u64,
    pub memsz: u64,
}

#[derive(Debug, Clone)]
pub struct ElfBuilder {
    pub class64: bool,
    pub big_endian: bool,
    pub entry: u64,
    pub segments: Vec<Segment>,
    pub sections: Vec<Section>,
    /// Defaults to the index of the `.shstrtab` section, or 0.
    pub shstrndx: Option<u16>,
}

struct Writer {
    buf: Vec<u8>,
    class64: bool,
    big: bool,
}

impl Writer {
    fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }
    fn u16(&mut self, v: u16) {
        let b = if self.big { v.to_be_bytes() } else { v.to_le_bytes() };
        self.buf.extend(b);
    }
    fn u32(&mut self, v: u32) {
        let b = if self.big { v.to_be_bytes() } else { v.to_le_bytes() };
        self.buf.extend(b);
    }
    fn u64(&mut self, v: u64) {
        let b = if self.big { v.to_be_bytes() } else { v.to_le_bytes() };
        self.buf.extend(b);
    }
    fn word(&mut self, v: u64) {
        if self.class64 {
            self.u64(v)
        } else {
            self.u32(v as u32)
        }
    }
}

impl ElfBuilder {
    pub fn new(class64: bool) -> Self {
        Self {
            class64,
            big_endian: false,
            entry: 0x40_1000,
            segments: Vec::new(),
            sections: Vec::new(),
            shstrndx: None,
        }
    }

    pub fn ehsize(&self) -> usize {
        if self.class64 { 64 } else { 52 }
    }

    pub fn phentsize(&self) -> usize {
        if self.class64 { 56 } else { 32 }
    }

    pub fn shentsize(&self) -> usize {
        if self.class64 { 64 } else { 40 }
    }

    /// Offset of a header field that sits after the three words
    /// `e_entry`, `e_phoff`, `e_shoff` (`e_flags` onwards).
    pub fn field_offset(&self, name: &str) -> usize {
        let after_words = if self.class64 { 48 } else { 36 };
        let rel = match name {
            "e_flags" => 0,
            "e_ehsize" => 4,
            "e_phentsize" => 6,
            "e_phnum" => 8,
            "e_shentsize" => 10,
            "e_shnum" => 12,
            "e_shstrndx" => 14,
            other => panic!("unknown field {other}"),
        };
        after_words + rel
    }

    /// Builds the image: header, program headers, section contents, then the
    /// section header table as the very last bytes of the file.
    pub fn build(&self) -> Vec<u8> {
        let mut names = vec![0u8];
        let mut name_offsets = Vec::with_capacity(self.sections.len());
        for s in &self.sections {
            if s.name.is_empty() {
                name_offsets.push(0u32);
            } else {
                name_offsets.push(names.len() as u32);
                names.extend(s.name.as_bytes());
                names.push(0);
            }
        }

        let phoff = if self.segments.is_empty() { 0 } else { self.ehsize() };
        let mut cursor = self.ehsize() + self.segments.len() * self.phentsize();

        let mut contents = Vec::new();
        let mut placed = Vec::with_capacity(self.sections.len());
        for s in &self.sections {
            let data = if s.name == SHSTRTAB && s.sh_type == SHT_STRTAB {
                names.clone()
            } else {
                s.data.clone()
            };
            if s.sh_type == 0 {
                placed.push((0u64, 0u64));
                continue;
            }
            placed.push((cursor as u64, data.len() as u64));
            cursor += data.len();
            contents.extend(data);
        }

        let pad = if self.sections.is_empty() { 0 } else { (8 - cursor % 8) % 8 };
        let shoff = if self.sections.is_empty() { 0 } else { cursor + pad };

        let shstrndx = self.shstrndx.unwrap_or_else(|| {
            self.sections
                .iter()
                .position(|s| s.name == SHSTRTAB)
                .map_or(0, |i| i as u16)
        });

        let mut w = Writer {
            buf: Vec::new(),
            class64: self.class64,
            big: self.big_endian,
        };

        w.buf.extend(b"\x7fELF");
        w.u8(if self.class64 { 2 } else { 1 });
        w.u8(if self.big_endian { 2 } else { 1 });
        w.u8(1);
        w.buf.extend([0u8; 9]);
        w.u16(2);
        w.u16(if self.class64 { 62 } else { 3 });
        w.u32(1);
        w.word(self.entry);
        w.word(phoff as u64);
        w.word(shoff as u64);
        w.u32(0);
        w.u16(self.ehsize() as u16);
        w.u16(self.phentsize() as u16);
        w.u16(self.segments.len() as u16);
        w.u16(self.shentsize() as u16);
        w.u16(self.sections.len() as u16);
        w.u16(shstrndx);

        for p in &self.segments {
            if self.class64 {
                w.u32(p.p_type);
                w.u32(p.p_flags);
                w.u64(p.offset);
                w.u64(p.vaddr);
                w.u64(p.vaddr);
                w.u64(p.filesz);
                w.u64(p.memsz);
                w.u64(0x1000);
            } else {
                w.u32(p.p_type);
                w.u32(p.offset as u32);
                w.u32(p.vaddr as u32);
                w.u32(p.vaddr as u32);
                w.u32(p.filesz as u32);
                w.u32(p.memsz as u32);
                w.u32(p.p_flags);
                w.u32(0x1000);
            }
        }

        w.buf.extend(contents);
        w.buf.extend(std::iter::repeat(0u8).take(pad));

        for ((s, name), (offset, size)) in self.sections.iter().zip(&name_offsets).zip(&placed) {
            w.u32(*name);
            w.u32(s.sh_type);
            w.word(0);
            w.word(s.addr);
            w.word(*offset);
            w.word(*size);
            w.u32(0);
            w.u32(0);
            w.word(1);
            w.word(0);
        }

        w.buf
    }
}

/// A 64-bit image with one `PT_LOAD` segment and two sections: `.text`
/// (PROGBITS) at index 0 and `.shstrtab` (STRTAB) at index 1.
pub fn minimal64() -> ElfBuilder {
    let mut b = ElfBuilder::new(true);
    b.segments.push(Segment {
        p_type: goblin::elf::program_header::PT_LOAD,
        p_flags: goblin::elf::program_header::PF_R | goblin::elf::program_header::PF_X,
        offset: 0,
        vaddr: 0x40_0000,
        filesz: 0x100,
        memsz: 0x100,
    });
    let mut text = Section::new(".text", goblin::elf::section_header::SHT_PROGBITS, &[0x90; 16]);
    text.addr = 0x40_1000;
    b.sections.push(text);
    b.sections.push(Section::shstrtab());
    b
}
