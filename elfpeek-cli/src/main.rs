use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use elfpeek_core::DecodedElf;
use std::path::PathBuf;
use std::process::ExitCode;

mod render;

/// Exit status for bad arguments and undecodable files (`-1` as a byte).
const EXIT_FAILURE: u8 = 255;

/// Summarise the structure of an ELF file
#[derive(Parser)]
#[command(
    name = "elfpeek",
    about = "Print the file header, section headers and program headers of an ELF file",
    version,
    author
)]
struct Cli {
    /// Path to ELF file
    #[arg(required = true)]
    path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Characters of each section name shown in text output
    #[arg(long, default_value_t = render::DEFAULT_NAME_WIDTH)]
    name_width: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Line-per-record listing
    Text,
    /// Tables with type names and flags
    Table,
    /// JSON document of every decoded field
    Json,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let buf = std::fs::read(&cli.path)
        .with_context(|| format!("Unable to open file {}", cli.path.display()))?;
    log::debug!("Loaded {} bytes from {}", buf.len(), cli.path.display());

    let elf = DecodedElf::parse(&buf)?;

    // Render fully before printing so a bad name never leaves half a report.
    let out = match cli.format {
        Format::Text => render::text(&elf, cli.name_width)?,
        Format::Table => render::table(&elf)?,
        Format::Json => render::json(&elf)?,
    };
    print!("{out}");

    Ok(())
}

/// I/O failures exit with the OS error code, everything else with `-1`.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<std::io::Error>() {
        Some(io) => io
            .raw_os_error()
            .and_then(|code| u8::try_from(code).ok())
            .filter(|&code| code != 0)
            .unwrap_or(1),
        None => EXIT_FAILURE,
    }
}
