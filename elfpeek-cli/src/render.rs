use anyhow::Result;
use colored::Colorize;
use elfpeek_core::{DecodedElf, ElfClass, FileHeader, ProgramHeader, SectionHeader};
use serde::Serialize;
use std::fmt::Write;
use tabled::settings::Style;
use tabled::{Table, Tabled};

pub const DEFAULT_NAME_WIDTH: usize = 10;

/// The classic listing: file header, one line per section, then one line
/// per program header.
pub fn text(elf: &DecodedElf, name_width: usize) -> Result<String> {
    let names = elf.section_names()?;
    let mut out = String::new();

    writeln!(out, "<--ELF HEADER-->")?;
    writeln!(out, "Program Type: {}-bit", elf.header.class().bits())?;
    writeln!(out, "Entry point address: {:08x}", elf.entry_point())?;
    writeln!(out, "Number of program headers: {}", elf.program_headers.len())?;
    writeln!(out, "Number of section headers: {}", elf.section_headers.len())?;

    for (i, (s, name)) in elf.section_headers.iter().zip(&names).enumerate() {
        let shown: String = name.chars().take(name_width).collect();
        writeln!(
            out,
            "Index[{i:02}] [Name: {shown}] Type: {} Address: {:08x} Offset: {:08x}",
            s.sh_type, s.sh_addr, s.sh_offset
        )?;
    }

    writeln!(out, "<--PROGRAM HEADERS-->")?;
    for (i, p) in elf.program_headers.iter().enumerate() {
        writeln!(
            out,
            "Index[{i:02}] Offset: {:08x} VA: {:08x} PA: {:08x} FSIZE: {:08x} MSIZE: {:08x}",
            p.p_offset, p.p_vaddr, p.p_paddr, p.p_filesz, p.p_memsz
        )?;
    }

    Ok(out)
}

#[derive(Tabled)]
struct SectionRow {
    #[tabled(rename = "Idx")]
    index: usize,
    #[tabled(rename = "Section")]
    name: String,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "VMA")]
    addr: String,
    #[tabled(rename = "Offset")]
    offset: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Flags")]
    flags: String,
}

#[derive(Tabled)]
struct SegmentRow {
    #[tabled(rename = "Idx")]
    index: usize,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "Flg")]
    flags: String,
    #[tabled(rename = "Offset")]
    offset: String,
    #[tabled(rename = "VirtAddr")]
    vaddr: String,
    #[tabled(rename = "PhysAddr")]
    paddr: String,
    #[tabled(rename = "FileSiz")]
    filesz: String,
    #[tabled(rename = "MemSiz")]
    memsz: String,
    #[tabled(rename = "Align")]
    align: String,
}

pub fn table(elf: &DecodedElf) -> Result<String> {
    let names = elf.section_names()?;
    let h = &elf.header;
    let mut out = String::new();

    writeln!(out, "{}", "ELF Header".bold())?;
    writeln!(
        out,
        "  Class: ELF{}  Data: {:?}-endian  Type: {}  Machine: {}",
        h.class().bits(),
        h.ident.encoding,
        h.type_name(),
        h.machine_name()
    )?;
    writeln!(out, "  Entry point: 0x{:x}", h.entry_point())?;
    writeln!(out)?;

    writeln!(out, "{}", "Sections".bold())?;
    if elf.section_headers.is_empty() {
        writeln!(out, "No sections found (possibly stripped binary).")?;
    } else {
        let rows = elf
            .section_headers
            .iter()
            .zip(names)
            .enumerate()
            .map(|(index, (s, name))| SectionRow {
                index,
                name,
                kind: s.type_name(),
                addr: format!("0x{:x}", s.sh_addr),
                offset: format!("0x{:x}", s.sh_offset),
                size: format!("0x{:x}", s.sh_size),
                flags: format!("0x{:x}", s.sh_flags),
            });
        let mut sections = Table::new(rows);
        sections.with(Style::rounded());
        writeln!(out, "{sections}")?;
    }
    writeln!(out)?;

    writeln!(out, "{}", "Segments".bold())?;
    if elf.program_headers.is_empty() {
        writeln!(out, "No program headers found.")?;
    } else {
        let rows = elf
            .program_headers
            .iter()
            .enumerate()
            .map(|(index, p)| SegmentRow {
                index,
                kind: p.type_name(),
                flags: p.flags_string(),
                offset: format!("0x{:x}", p.p_offset),
                vaddr: format!("0x{:x}", p.p_vaddr),
                paddr: format!("0x{:x}", p.p_paddr),
                filesz: format!("0x{:x}", p.p_filesz),
                memsz: format!("0x{:x}", p.p_memsz),
                align: format!("0x{:x}", p.p_align),
            });
        let mut segments = Table::new(rows);
        segments.with(Style::rounded());
        writeln!(out, "{segments}")?;
    }

    Ok(out)
}

#[derive(Serialize)]
struct JsonSection<'a> {
    index: usize,
    name: String,
    type_name: &'static str,
    #[serde(flatten)]
    header: &'a SectionHeader,
}

#[derive(Serialize)]
struct JsonSegment<'a> {
    index: usize,
    type_name: &'static str,
    #[serde(flatten)]
    header: &'a ProgramHeader,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    class: ElfClass,
    type_name: &'static str,
    machine_name: &'static str,
    header: &'a FileHeader,
    shstrtab_index: usize,
    sections: Vec<JsonSection<'a>>,
    segments: Vec<JsonSegment<'a>>,
}

pub fn json(elf: &DecodedElf) -> Result<String> {
    let names = elf.section_names()?;
    let report = JsonReport {
        class: elf.header.class(),
        type_name: elf.header.type_name(),
        machine_name: elf.header.machine_name(),
        header: &elf.header,
        shstrtab_index: elf.shstrtab.section,
        sections: elf
            .section_headers
            .iter()
            .zip(names)
            .enumerate()
            .map(|(index, (header, name))| JsonSection {
                index,
                name,
                type_name: header.type_name(),
                header,
            })
            .collect(),
        segments: elf
            .program_headers
            .iter()
            .enumerate()
            .map(|(index, header)| JsonSegment {
                index,
                type_name: header.type_name(),
                header,
            })
            .collect(),
    };

    let mut out = serde_json::to_string_pretty(&report)?;
    out.push('\n');
    Ok(out)
}
