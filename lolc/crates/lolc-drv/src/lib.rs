//! lolc-drv - Compiler driver.
//!
//! ============================================================================
//! PIPELINE
//! ============================================================================
//!
//! ```text
//! Source file (.lol)
//!        |
//!   [Lexer]  -> token sequence          (recovering; illegal tokens inline)
//!        |
//!   [Parser] -> AST + error list        (recovering; filtered diagnostics)
//!        |
//!   [Lowerer] -> IR module              (first structural error is fatal)
//!        |
//!   [Target] -> C translation unit      (validated, then serialized)
//!        |
//!   [cc]     -> executable              (only when --cc is given)
//! ```
//!
//! The driver owns orchestration, diagnostics printing, and the exit
//! contract: every diagnostic goes to standard error as
//! `path:start..end: message`, and any failure maps to a nonzero exit.
//! Phases run strictly in order, each owning its product and moving it
//! forward; all file I/O happens at the boundaries.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use lolc_gen::{CTarget, Lowerer, Target};
use lolc_ir::FrameConvention;
use lolc_lex::Token;
use lolc_util::{Handler, Span};

/// Which backend serializes the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetKind {
    #[default]
    C,
    /// Reserved; selecting it reports a clean unsupported-target error.
    Asm,
}

/// How far the pipeline runs before dumping and stopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitStage {
    Tokens,
    Ast,
    Ir,
    /// Run the full pipeline and write the translation unit.
    #[default]
    Full,
}

/// One compiler invocation's configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input source file.
    pub input: PathBuf,
    /// Output path; defaults to the input with a `.c` extension.
    pub output: Option<PathBuf>,
    pub target: TargetKind,
    /// External C compiler to run on the emitted unit.
    pub cc: Option<PathBuf>,
    /// Stack cells for the produced program.
    pub stack_size: usize,
    /// Heap cells for the produced program.
    pub heap_size: usize,
    pub emit: EmitStage,
    pub convention: FrameConvention,
}

impl Config {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            target: TargetKind::default(),
            cc: None,
            stack_size: 256,
            heap_size: 256,
            emit: EmitStage::default(),
            convention: FrameConvention::default(),
        }
    }
}

/// What a successful run produced.
#[derive(Debug, PartialEq, Eq)]
pub enum CompileOutcome {
    /// A phase dump was printed to standard output.
    Dumped,
    /// The translation unit was written.
    Written { path: PathBuf },
    /// The translation unit was written and compiled.
    Built {
        path: PathBuf,
        executable: PathBuf,
    },
}

/// A compilation session: one input, one configuration, one run.
pub struct Session {
    pub config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the pipeline. Diagnostics are printed to standard error; any
    /// lex, parse, lowering, or serialization failure is an `Err`.
    pub fn run(&self) -> Result<CompileOutcome> {
        let path = self.config.input.display().to_string();
        let source = std::fs::read(&self.config.input)
            .with_context(|| format!("failed to read {}", path))?;

        // Phase 1: lex. Never aborts; problems are inline tokens.
        let tokens = lolc_lex::lex(&source);
        debug!(tokens = tokens.len(), "lexed {}", path);

        let handler = Handler::new();
        for token in &tokens {
            if let Token::Illegal(reason) = &token.token {
                handler.error(reason.describe(), token.span());
            }
        }

        if self.config.emit == EmitStage::Tokens {
            for token in &tokens {
                println!("{:>4}  {}..{}  {:?}", token.index, token.start, token.end, token.token);
            }
            return self.finish_diagnostics(&path, handler).map(|_| CompileOutcome::Dumped);
        }

        // Phase 2: parse. Also recovering; its surviving errors join the
        // lexer's.
        let outcome = lolc_par::parse(tokens);
        debug!(
            statements = outcome.program.statements.len(),
            errors = outcome.errors.len(),
            "parsed {}",
            path
        );
        for error in &outcome.errors {
            handler.error(error.message.clone(), error.token.span());
        }
        self.finish_diagnostics(&path, handler)?;

        if self.config.emit == EmitStage::Ast {
            println!("{:#?}", outcome.program);
            return Ok(CompileOutcome::Dumped);
        }

        // Phase 3: lower. Non-recovering.
        let lowerer = Lowerer::new(
            self.config.convention,
            self.config.stack_size,
            self.config.heap_size,
        );
        let module = match lowerer.lower(&outcome.program) {
            Ok(module) => module,
            Err(error) => {
                report(&path, error.span(), &error.to_string());
                bail!("compilation failed with 1 error");
            }
        };

        if self.config.emit == EmitStage::Ir {
            print!("{}", module);
            return Ok(CompileOutcome::Dumped);
        }

        // Phase 4: serialize. Non-recovering.
        let target = match self.config.target {
            TargetKind::C => CTarget::new(self.config.convention),
            TargetKind::Asm => {
                bail!("target 'asm' is not supported in this build; use --target c")
            }
        };
        let code = target
            .assemble(&module)
            .with_context(|| format!("failed to assemble {}", path))?;

        let out_path = self
            .config
            .output
            .clone()
            .unwrap_or_else(|| self.config.input.with_extension("c"));
        std::fs::write(&out_path, &code)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        info!(
            out = %out_path.display(),
            bytes = code.len(),
            "wrote translation unit"
        );

        match &self.config.cc {
            Some(cc) => {
                let executable = self.run_cc(cc, &out_path)?;
                Ok(CompileOutcome::Built {
                    path: out_path,
                    executable,
                })
            }
            None => Ok(CompileOutcome::Written { path: out_path }),
        }
    }

    /// Print every collected diagnostic; fail if any is an error.
    fn finish_diagnostics(&self, path: &str, handler: Handler) -> Result<()> {
        let error_count = handler.error_count();
        for line in handler.render_all(path) {
            eprintln!("{}", line);
        }
        if error_count > 0 {
            bail!("compilation failed with {} error(s)", error_count);
        }
        Ok(())
    }

    /// Invoke the external C compiler on the emitted unit.
    fn run_cc(&self, cc: &Path, c_path: &Path) -> Result<PathBuf> {
        let executable = c_path.with_extension("");
        let status = Command::new(cc)
            .arg(c_path)
            .arg("-o")
            .arg(&executable)
            .status()
            .with_context(|| format!("failed to run C compiler {}", cc.display()))?;
        if !status.success() {
            bail!("C compiler {} exited with {}", cc.display(), status);
        }
        info!(executable = %executable.display(), "built executable");
        Ok(executable)
    }
}

fn report(path: &str, span: Span, message: &str) {
    eprintln!("{}:{}: {}", path, span, message);
}
