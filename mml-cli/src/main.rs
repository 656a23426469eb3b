use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use mml_core::compiler::DEFAULT_ARENA_BYTES;
use mml_core::diagnostic::diagnostics_for;
use mml_core::{CompileOptions, CoreError, compile, dump_ast, dump_tokens};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Generated C++ program
    Cpp,
    /// Token stream, one token per line
    Tokens,
    /// Parsed program in prefix form
    Ast,
}

/// Compile MML source into C++ and, optionally, a native binary.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Source file; reads stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Where to write the emitted text
    #[arg(short, long)]
    output: PathBuf,

    #[arg(long, value_enum, default_value_t = Emit::Cpp)]
    emit: Emit,

    /// Capacity of the generated program's vector arena
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_ARENA_BYTES)]
    arena_size: usize,

    /// Invoke the C++ compiler on the generated code
    #[arg(long)]
    build: bool,

    #[arg(long, value_name = "CMD", default_value = "g++")]
    cxx: String,

    /// Native binary path (defaults to the output path without extension)
    #[arg(long, value_name = "PATH")]
    binary: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    execute(cli)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn execute(cli: Cli) -> Result<()> {
    let source = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read source from stdin")?;
            buffer
        }
    };

    match cli.emit {
        Emit::Cpp => {
            let options = CompileOptions {
                arena_bytes: cli.arena_size,
            };
            let artifact = compile(&source, &options).map_err(report)?;
            write_output(&cli.output, artifact.cpp.as_bytes())?;
            log::info!("wrote C++ to {}", cli.output.display());
            if cli.build {
                let binary = cli
                    .binary
                    .clone()
                    .unwrap_or_else(|| cli.output.with_extension(""));
                build(&cli.cxx, &cli.output, &binary)?;
                println!("Compilation successful! Run with: {}", binary.display());
            }
        }
        Emit::Tokens => write_output(&cli.output, dump_tokens(&source).as_bytes())?,
        Emit::Ast => {
            let ast = dump_ast(&source).map_err(report)?;
            write_output(&cli.output, ast.as_bytes())?;
        }
    }

    if cli.build && cli.emit != Emit::Cpp {
        log::warn!("--build is ignored unless emitting C++");
    }

    Ok(())
}

/// Print every diagnostic behind `err` and turn it into a short summary.
fn report(err: CoreError) -> anyhow::Error {
    for diagnostic in diagnostics_for(&err) {
        eprintln!("{diagnostic}");
    }
    anyhow::Error::new(err).context("compilation failed")
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    fs::write(path, bytes)
        .with_context(|| format!("failed to write output file {}", path.display()))?;
    Ok(())
}

fn build(cxx: &str, source: &Path, binary: &Path) -> Result<()> {
    log::info!("compiling {} with {cxx}", source.display());
    let status = Command::new(cxx)
        .arg("-std=c++17")
        .arg("-o")
        .arg(binary)
        .arg(source)
        .status()
        .with_context(|| format!("failed to launch C++ compiler '{cxx}'"))?;
    if !status.success() {
        bail!("C++ compiler '{cxx}' failed with {status}");
    }
    Ok(())
}
