//! lolc-ir - Stack-machine intermediate representation.
//!
//! The IR is a flat list of user-defined functions plus a designated entry,
//! each carrying a linear sequence of stack-machine instructions. Values
//! are 32-bit float cells; function and foreign names are opaque symbols
//! that only a target serializer resolves.
//!
//! IR values are built up by the code generator and then consumed
//! read-only by a target; nothing mutates a module after lowering.

mod calling_convention;
mod ir;

mod tests;

pub use calling_convention::FrameConvention;
pub use ir::{IrEntry, IrError, IrFunction, IrModule, IrStatement};
