//! IR data model: instructions, functions, the entry, and the module.

use indexmap::IndexMap;
use lolc_util::Symbol;
use thiserror::Error;

/// A single stack-machine instruction.
///
/// Arithmetic opcodes pop two cells and push one; the operand popped
/// second is the left-hand side, so `Subtract` computes
/// `second-popped - first-popped`. `Sign` pushes the signum (-1, 0, 1) of
/// the popped cell. Heap opcodes address cells, not bytes. `Copy` and
/// `Mov` read and write base-relative variable slots.
#[derive(Debug, Clone, PartialEq)]
pub enum IrStatement {
    /// Push a cell value.
    Push(f32),
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    /// Pop a cell, push its signum.
    Sign,
    /// Pop a size in cells, allocate, push the region address.
    Allocate,
    /// Pop an address, pop a size, release the region.
    Free,
    /// Pop an address, pop `size` cells into the region (first-pushed
    /// lands lowest), push the address back.
    Store(i32),
    /// Pop an address, push `size` cells from the region in order.
    Load(i32),
    /// Pop a base-relative offset, push the cell at `base + offset`.
    Copy,
    /// Pop a base-relative offset, pop a value, store it at
    /// `base + offset`.
    Mov,
    /// Call a function defined in the same module.
    Call(Symbol),
    /// Call a runtime-provided foreign function.
    CallForeign(Symbol),
    /// Open a loop; each iteration pops the continuation condition.
    BeginWhile,
    EndWhile,
    /// Push the current base pointer.
    LoadBasePtr,
    /// Push the previous base pointer and rebase per the module's frame
    /// convention.
    EstablishStackFrame,
    /// Unwind a frame: pop the locals, restore base, pop the
    /// return-address cell, pop the arguments.
    EndStackFrame { arg_size: i32, locals_size: i32 },
    /// Pop a cell into the return register.
    SetReturnRegister,
    /// Push the return register.
    AccessReturnRegister,
    /// Push the value of a runtime hook slot.
    Hook(i32),
    /// Push the address of a runtime hook slot.
    RefHook(i32),
    /// Stop the machine.
    Halt,
}

impl std::fmt::Display for IrStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IrStatement::Push(value) => write!(f, "push {:?}", value),
            IrStatement::Add => write!(f, "add"),
            IrStatement::Subtract => write!(f, "subtract"),
            IrStatement::Multiply => write!(f, "multiply"),
            IrStatement::Divide => write!(f, "divide"),
            IrStatement::Modulo => write!(f, "modulo"),
            IrStatement::Sign => write!(f, "sign"),
            IrStatement::Allocate => write!(f, "allocate"),
            IrStatement::Free => write!(f, "free"),
            IrStatement::Store(size) => write!(f, "store {}", size),
            IrStatement::Load(size) => write!(f, "load {}", size),
            IrStatement::Copy => write!(f, "copy"),
            IrStatement::Mov => write!(f, "mov"),
            IrStatement::Call(name) => write!(f, "call {}", name),
            IrStatement::CallForeign(name) => write!(f, "call-foreign {}", name),
            IrStatement::BeginWhile => write!(f, "begin-while"),
            IrStatement::EndWhile => write!(f, "end-while"),
            IrStatement::LoadBasePtr => write!(f, "load-base-ptr"),
            IrStatement::EstablishStackFrame => write!(f, "establish-stack-frame"),
            IrStatement::EndStackFrame {
                arg_size,
                locals_size,
            } => write!(f, "end-stack-frame {} {}", arg_size, locals_size),
            IrStatement::SetReturnRegister => write!(f, "set-return-register"),
            IrStatement::AccessReturnRegister => write!(f, "access-return-register"),
            IrStatement::Hook(slot) => write!(f, "hook {}", slot),
            IrStatement::RefHook(slot) => write!(f, "ref-hook {}", slot),
            IrStatement::Halt => write!(f, "halt"),
        }
    }
}

/// A user-defined IR function.
#[derive(Debug, Clone)]
pub struct IrFunction {
    pub name: Symbol,
    pub body: Vec<IrStatement>,
}

impl IrFunction {
    pub fn new(name: Symbol) -> Self {
        Self {
            name,
            body: Vec::new(),
        }
    }
}

/// The program entry: the designated main body plus the machine geometry
/// it runs with.
#[derive(Debug, Clone)]
pub struct IrEntry {
    /// Addressable stack cells.
    pub stack_size: usize,
    /// Addressable heap cells.
    pub heap_size: usize,
    pub body: Vec<IrStatement>,
}

impl IrEntry {
    pub fn new(stack_size: usize, heap_size: usize) -> Self {
        Self {
            stack_size,
            heap_size,
            body: Vec::new(),
        }
    }
}

/// Structural validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IrError {
    #[error("Call target '{name}' is not defined in the module")]
    UndefinedCall { name: Symbol },

    #[error("Foreign function '{name}' is not in the runtime table")]
    UnknownForeign { name: Symbol },

    #[error("Unbalanced stack frames in {location}")]
    UnbalancedFrames { location: String },

    #[error("Unbalanced while loop in {location}")]
    UnbalancedLoop { location: String },
}

/// A complete IR module: functions in definition order plus the entry.
#[derive(Debug, Clone)]
pub struct IrModule {
    pub functions: IndexMap<Symbol, IrFunction>,
    pub entry: IrEntry,
}

impl IrModule {
    pub fn new(entry: IrEntry) -> Self {
        Self {
            functions: IndexMap::new(),
            entry,
        }
    }

    /// Add a function definition; later definitions win, in keeping with
    /// the module being assembled once by the generator.
    pub fn define(&mut self, function: IrFunction) {
        self.functions.insert(function.name, function);
    }

    /// Check the static module invariants: every `Call` resolves to a
    /// defined function, every `CallForeign` to a runtime table entry,
    /// and frames and loops balance in every body. The entry may leave
    /// its final frame open, since `Halt` abandons it.
    pub fn validate(&self, foreign_names: &[&str]) -> Result<(), IrError> {
        for function in self.functions.values() {
            self.validate_body(
                &function.body,
                &format!("function '{}'", function.name),
                foreign_names,
                false,
            )?;
        }
        self.validate_body(&self.entry.body, "entry", foreign_names, true)?;
        Ok(())
    }

    fn validate_body(
        &self,
        body: &[IrStatement],
        location: &str,
        foreign_names: &[&str],
        allow_abandoned_frame: bool,
    ) -> Result<(), IrError> {
        let mut frame_depth: i32 = 0;
        let mut loop_depth: i32 = 0;

        for statement in body {
            match statement {
                IrStatement::Call(name) => {
                    if !self.functions.contains_key(name) {
                        return Err(IrError::UndefinedCall { name: *name });
                    }
                }
                IrStatement::CallForeign(name) => {
                    if !foreign_names.contains(&name.as_str()) {
                        return Err(IrError::UnknownForeign { name: *name });
                    }
                }
                IrStatement::EstablishStackFrame => frame_depth += 1,
                IrStatement::EndStackFrame { .. } => {
                    frame_depth -= 1;
                    if frame_depth < 0 {
                        return Err(IrError::UnbalancedFrames {
                            location: location.to_string(),
                        });
                    }
                }
                IrStatement::BeginWhile => loop_depth += 1,
                IrStatement::EndWhile => {
                    loop_depth -= 1;
                    if loop_depth < 0 {
                        return Err(IrError::UnbalancedLoop {
                            location: location.to_string(),
                        });
                    }
                }
                _ => {}
            }
        }

        if loop_depth != 0 {
            return Err(IrError::UnbalancedLoop {
                location: location.to_string(),
            });
        }
        let frames_balanced = frame_depth == 0 || (allow_abandoned_frame && frame_depth > 0);
        if !frames_balanced {
            return Err(IrError::UnbalancedFrames {
                location: location.to_string(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for IrModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for function in self.functions.values() {
            writeln!(f, "fn {}:", function.name)?;
            for statement in &function.body {
                writeln!(f, "    {}", statement)?;
            }
        }
        writeln!(
            f,
            "entry (stack {}, heap {}):",
            self.entry.stack_size, self.entry.heap_size
        )?;
        for statement in &self.entry.body {
            writeln!(f, "    {}", statement)?;
        }
        Ok(())
    }
}
