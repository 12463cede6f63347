//! Target serialization: IR module to C translation unit.
//!
//! The emitted unit is self-contained: the embedded runtime sources form
//! the preamble, every IR function becomes a C function taking the
//! machine pointer, and the entry becomes `main`, invoking one runtime
//! operation per IR statement in order. `Call` resolves to a direct C
//! call; `CallForeign` is checked against the foreign-function table and
//! also emitted as a direct call.

use std::fmt::Write;

use lolc_ir::{FrameConvention, IrError, IrModule, IrStatement};
use lolc_util::Symbol;
use thiserror::Error;
use tracing::debug;

/// A pluggable serialization backend for IR modules.
pub trait Target {
    /// The name the CLI selects this target by.
    fn name(&self) -> &'static str;

    /// Serialize a module to target-specific text.
    fn assemble(&self, module: &IrModule) -> Result<String, TargetError>;
}

/// Errors from target serialization.
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("invalid IR module: {0}")]
    Invalid(#[from] IrError),

    #[error("failed to format output: {0}")]
    Format(#[from] std::fmt::Error),
}

/// The C-VM target.
pub struct CTarget {
    convention: FrameConvention,
}

impl CTarget {
    pub fn new(convention: FrameConvention) -> Self {
        Self { convention }
    }
}

impl Default for CTarget {
    fn default() -> Self {
        Self::new(FrameConvention::default())
    }
}

impl Target for CTarget {
    fn name(&self) -> &'static str {
        "c"
    }

    fn assemble(&self, module: &IrModule) -> Result<String, TargetError> {
        let foreign_names = lolc_runtime::foreign_names();
        module.validate(&foreign_names)?;

        let mut out = String::new();
        writeln!(out, "/* Generated by lolc. Do not edit. */")?;
        writeln!(out, "#define LOLVM_BASE_ADJUST {}", self.convention.base_adjust())?;
        writeln!(out)?;
        out.push_str(lolc_runtime::CORE_C);
        writeln!(out)?;
        out.push_str(lolc_runtime::STD_C);
        writeln!(out)?;

        // Forward declarations so definition order never matters.
        for function in module.functions.values() {
            writeln!(out, "void {}(machine *vm);", c_symbol(function.name))?;
        }
        if !module.functions.is_empty() {
            writeln!(out)?;
        }

        for function in module.functions.values() {
            writeln!(out, "void {}(machine *vm) {{", c_symbol(function.name))?;
            write_body(&mut out, &function.body)?;
            writeln!(out, "}}")?;
            writeln!(out)?;
        }

        writeln!(out, "int main(void) {{")?;
        writeln!(
            out,
            "    machine *vm = machine_new({}, {});",
            module.entry.stack_size, module.entry.heap_size
        )?;
        write_body(&mut out, &module.entry.body)?;
        writeln!(out, "    machine_drop(vm);")?;
        writeln!(out, "    return 0;")?;
        writeln!(out, "}}")?;

        debug!(
            functions = module.functions.len(),
            bytes = out.len(),
            "assembled C translation unit"
        );
        Ok(out)
    }
}

fn write_body(out: &mut String, body: &[IrStatement]) -> Result<(), TargetError> {
    let mut indent = 1usize;
    for statement in body {
        if matches!(statement, IrStatement::EndWhile) && indent > 1 {
            indent -= 1;
        }
        for _ in 0..indent {
            out.push_str("    ");
        }
        writeln!(out, "{}", statement_to_c(statement))?;
        if matches!(statement, IrStatement::BeginWhile) {
            indent += 1;
        }
    }
    Ok(())
}

fn statement_to_c(statement: &IrStatement) -> String {
    match statement {
        IrStatement::Push(value) => {
            format!("machine_push(vm, {});", float_literal(*value))
        }
        IrStatement::Add => "machine_add(vm);".to_string(),
        IrStatement::Subtract => "machine_subtract(vm);".to_string(),
        IrStatement::Multiply => "machine_multiply(vm);".to_string(),
        IrStatement::Divide => "machine_divide(vm);".to_string(),
        IrStatement::Modulo => "machine_modulo(vm);".to_string(),
        IrStatement::Sign => "machine_sign(vm);".to_string(),
        IrStatement::Allocate => "machine_allocate(vm);".to_string(),
        IrStatement::Free => "machine_free(vm);".to_string(),
        IrStatement::Store(size) => format!("machine_store(vm, {});", size),
        IrStatement::Load(size) => format!("machine_load(vm, {});", size),
        IrStatement::Copy => "machine_copy(vm);".to_string(),
        IrStatement::Mov => "machine_mov(vm);".to_string(),
        IrStatement::Call(name) => format!("{}(vm);", c_symbol(*name)),
        IrStatement::CallForeign(name) => format!("{}(vm);", name),
        IrStatement::BeginWhile => "while (machine_pop(vm)) {".to_string(),
        IrStatement::EndWhile => "}".to_string(),
        IrStatement::LoadBasePtr => "machine_load_base_ptr(vm);".to_string(),
        IrStatement::EstablishStackFrame => "machine_establish_stack_frame(vm);".to_string(),
        IrStatement::EndStackFrame {
            arg_size,
            locals_size,
        } => format!("machine_end_stack_frame(vm, {}, {});", arg_size, locals_size),
        IrStatement::SetReturnRegister => "machine_set_return_register(vm);".to_string(),
        IrStatement::AccessReturnRegister => "machine_access_return_register(vm);".to_string(),
        IrStatement::Hook(slot) => format!("machine_hook(vm, {});", slot),
        IrStatement::RefHook(slot) => format!("machine_ref_hook(vm, {});", slot),
        IrStatement::Halt => "machine_halt(vm);".to_string(),
    }
}

/// A C float literal for a cell value. Non-finite values cannot appear as
/// C literals; they clamp to the float range.
fn float_literal(value: f32) -> String {
    if value.is_nan() {
        return "0.0f".to_string();
    }
    if value.is_infinite() {
        let bound = if value > 0.0 { f32::MAX } else { f32::MIN };
        return format!("{:?}f", bound);
    }
    format!("{:?}f", value)
}

/// Map an IR name to a C identifier. IR names are opaque strings; the
/// serializer is the only place they are resolved.
fn c_symbol(name: Symbol) -> String {
    let mut out = String::from("lol_fn_");
    for ch in name.as_str().chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    out
}
