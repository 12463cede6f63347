//! lolc - Command-line interface for the LOLCODE compiler.
//!
//! Parses arguments with clap, builds a [`Config`], and runs one
//! [`Session`]. Diagnostics and failures go to standard error; the
//! process exits nonzero on any compilation failure. `RUST_LOG` controls
//! tracing verbosity.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use lolc_drv::{Config, EmitStage, Session, TargetKind};

/// LOLCODE compiler targeting a simple stack virtual machine.
#[derive(Parser, Debug)]
#[command(name = "lolc")]
#[command(version)]
#[command(about = "Compile LOLCODE programs to a stack-VM C module", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a source file
    ///
    /// Emits a self-contained C translation unit that embeds the VM
    /// runtime, and optionally hands it to a C compiler.
    Compile(CompileCommand),
}

#[derive(Args, Debug)]
struct CompileCommand {
    /// Input source file
    source: PathBuf,

    /// Output path (default: the input with a .c extension)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Code generation target
    #[arg(long, value_enum, default_value = "c")]
    target: TargetArg,

    /// C compiler to run on the generated module
    #[arg(long)]
    cc: Option<PathBuf>,

    /// Stack cells for the produced program
    #[arg(long, default_value_t = 256)]
    stack_size: usize,

    /// Heap cells for the produced program
    #[arg(long, default_value_t = 256)]
    heap_size: usize,

    /// Dump the token sequence and stop
    #[arg(long)]
    emit_tokens: bool,

    /// Dump the AST and stop
    #[arg(long)]
    emit_ast: bool,

    /// Dump the IR module and stop
    #[arg(long)]
    emit_ir: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum TargetArg {
    /// C translation unit linking the embedded VM runtime
    C,
    /// Assembly (reserved)
    Asm,
}

impl CompileCommand {
    fn into_config(self) -> Config {
        let mut config = Config::new(self.source);
        config.output = self.out;
        config.cc = self.cc;
        config.stack_size = self.stack_size;
        config.heap_size = self.heap_size;
        config.target = match self.target {
            TargetArg::C => TargetKind::C,
            TargetArg::Asm => TargetKind::Asm,
        };
        config.emit = if self.emit_tokens {
            EmitStage::Tokens
        } else if self.emit_ast {
            EmitStage::Ast
        } else if self.emit_ir {
            EmitStage::Ir
        } else {
            EmitStage::Full
        };
        config
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Commands::Compile(command) = cli.command;

    let session = Session::new(command.into_config());
    if let Err(error) = session.run() {
        eprintln!("error: {:#}", error);
        process::exit(1);
    }
}
