//! lolc-runtime - The embedded VM runtime and its foreign-function table.
//!
//! The C target does not link against an external library: the runtime C
//! sources are embedded in the compiler and concatenated as the preamble
//! of every emitted translation unit. `core.c` implements the `machine`
//! record and its operations; `std.c` implements the foreign functions
//! reachable from `CallForeign`.
//!
//! The [`FOREIGN_TABLE`] mirrors `std.c` on the Rust side so the code
//! generator and serializer can validate names without parsing C.

/// The stack machine implementation (`machine` record and operations).
pub const CORE_C: &str = include_str!("../runtime/core.c");

/// The foreign functions callable from compiled programs.
pub const STD_C: &str = include_str!("../runtime/std.c");

/// One entry of the foreign-function table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignFn {
    /// The name used by `CallForeign`, identical to the C symbol.
    pub name: &'static str,
    /// Cells popped from the stack.
    pub pops: u32,
    /// Cells pushed onto the stack.
    pub pushes: u32,
}

/// Every foreign function the runtime provides, in `std.c` order.
pub const FOREIGN_TABLE: &[ForeignFn] = &[
    ForeignFn { name: "prn", pops: 1, pushes: 0 },
    ForeignFn { name: "prs", pops: 1, pushes: 0 },
    ForeignFn { name: "prh", pops: 1, pushes: 0 },
    ForeignFn { name: "prc", pops: 1, pushes: 0 },
    ForeignFn { name: "prend", pops: 0, pushes: 0 },
    ForeignFn { name: "getch", pops: 0, pushes: 1 },
    ForeignFn { name: "print_string", pops: 1, pushes: 0 },
    ForeignFn { name: "read_string", pops: 0, pushes: 1 },
    ForeignFn { name: "float_to_int", pops: 1, pushes: 1 },
    ForeignFn { name: "int_to_float", pops: 1, pushes: 1 },
    ForeignFn { name: "string_to_int", pops: 1, pushes: 1 },
    ForeignFn { name: "string_to_float", pops: 1, pushes: 1 },
    ForeignFn { name: "int_to_string", pops: 1, pushes: 1 },
    ForeignFn { name: "float_to_string", pops: 1, pushes: 1 },
    ForeignFn { name: "concat_strings", pops: 2, pushes: 1 },
];

/// The table's names, for validation against `CallForeign` targets.
pub fn foreign_names() -> Vec<&'static str> {
    FOREIGN_TABLE.iter().map(|f| f.name).collect()
}

/// Look up a foreign function by name.
pub fn lookup(name: &str) -> Option<&'static ForeignFn> {
    FOREIGN_TABLE.iter().find(|f| f.name == name)
}

/// True if `name` is callable through `CallForeign`.
pub fn is_foreign(name: &str) -> bool {
    lookup(name).is_some()
}
