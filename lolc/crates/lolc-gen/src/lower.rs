//! Lowering: AST to stack IR.
//!
//! ============================================================================
//! VALUE AND FRAME CONVENTIONS
//! ============================================================================
//!
//! Cells are 32-bit floats. A YARN value is one cell holding the address
//! of a length-prefixed heap region. Variables live in base-relative
//! stack slots assigned at declaration: the first local at the frame
//! convention's first offset, each further declaration one below. A local
//! is materialized by pushing one zero cell at its declaration point, so
//! between statements the operand stack holds exactly the declared
//! locals and every statement lowers to a stack-balanced sequence.
//!
//! Boolean results are built from `Sign` (signum) plus squaring through a
//! scratch slot: `sign(x)^2` normalizes any cell to 0/1. Short-circuit
//! operators evaluate later operands inside a `BeginWhile` loop entered
//! only when the accumulator requires it, with a pushed 0 sentinel
//! exiting after one pass. Scratch slots are reserved like locals, ahead
//! of the first statement, three per nesting level of operators that
//! need them.
//!
//! Bare expression statements store their value into the implicit `IT`
//! variable, a pre-declared local, which is readable like any other
//! variable.

use lolc_ir::{FrameConvention, IrEntry, IrModule, IrStatement};
use lolc_par::{
    ArithOp, AssignTarget, CmpOp, Expression, LogicOp, Program, Statement, VariadicOp,
};
use lolc_util::{FxHashMap, Span, Symbol};
use thiserror::Error;
use tracing::debug;

use crate::types::ValueType;

/// Errors that stop lowering. Unlike the lexer and parser, this phase
/// does not recover: the first structural problem fails the pass.
#[derive(Debug, Error, PartialEq)]
pub enum LowerError {
    #[error("Undeclared variable '{name}'")]
    UndeclaredVariable { name: Symbol, span: Span },

    #[error("Cannot cast {from} to {to}")]
    UnsupportedCast {
        from: &'static str,
        to: &'static str,
        span: Span,
    },

    #[error("Statements after KTHXBYE cannot be compiled")]
    StatementsAfterEnd { span: Span },
}

impl LowerError {
    /// The source range the error points at.
    pub fn span(&self) -> Span {
        match self {
            LowerError::UndeclaredVariable { span, .. }
            | LowerError::UnsupportedCast { span, .. }
            | LowerError::StatementsAfterEnd { span } => *span,
        }
    }
}

/// A variable's slot: its base-relative offset and current static type.
#[derive(Debug, Clone, Copy)]
struct Slot {
    offset: i32,
    ty: ValueType,
}

/// Per-body lowering state: the symbol table, the next local offset, the
/// scratch-slot pool, and the emitted instructions.
struct Scope {
    slots: FxHashMap<Symbol, Slot>,
    next_offset: i32,
    temps: Vec<i32>,
    temps_in_use: usize,
    body: Vec<IrStatement>,
}

impl Scope {
    fn new(convention: FrameConvention) -> Self {
        Self {
            slots: FxHashMap::default(),
            next_offset: convention.first_local_offset(),
            temps: Vec::new(),
            temps_in_use: 0,
            body: Vec::new(),
        }
    }

    fn emit(&mut self, statement: IrStatement) {
        self.body.push(statement);
    }

    /// Materialize a new local slot holding zero and bind `name` to it.
    fn declare(&mut self, name: Symbol, ty: ValueType) -> i32 {
        let offset = self.next_offset;
        self.next_offset -= 1;
        self.emit(IrStatement::Push(0.0));
        self.slots.insert(name, Slot { offset, ty });
        offset
    }

    /// Reserve an anonymous scratch slot (pre-materialized like a local).
    fn reserve_temp(&mut self) {
        let offset = self.next_offset;
        self.next_offset -= 1;
        self.emit(IrStatement::Push(0.0));
        self.temps.push(offset);
    }

    fn take_temp(&mut self) -> i32 {
        let offset = self.temps[self.temps_in_use];
        self.temps_in_use += 1;
        offset
    }

    fn temp_mark(&self) -> usize {
        self.temps_in_use
    }

    fn release_temps(&mut self, mark: usize) {
        self.temps_in_use = mark;
    }

    /// Read a variable slot onto the stack.
    fn emit_read(&mut self, offset: i32) {
        self.emit(IrStatement::Push(offset as f32));
        self.emit(IrStatement::Copy);
    }

    /// Store the stack top into a variable slot.
    fn emit_write(&mut self, offset: i32) {
        self.emit(IrStatement::Push(offset as f32));
        self.emit(IrStatement::Mov);
    }

    /// Normalize the stack top to 0/1 via `sign(x)^2`, using a scratch
    /// slot for the duplication.
    fn emit_normalize(&mut self) {
        let mark = self.temp_mark();
        let temp = self.take_temp();
        self.emit(IrStatement::Sign);
        self.emit_write(temp);
        self.emit_read(temp);
        self.emit_read(temp);
        self.emit(IrStatement::Multiply);
        self.release_temps(mark);
    }
}

fn foreign(name: &str) -> IrStatement {
    IrStatement::CallForeign(Symbol::intern(name))
}

/// The code generator. One lowerer carries one frame convention; the
/// convention of the emitted module can never mix.
pub struct Lowerer {
    convention: FrameConvention,
    stack_size: usize,
    heap_size: usize,
}

impl Lowerer {
    pub fn new(convention: FrameConvention, stack_size: usize, heap_size: usize) -> Self {
        Self {
            convention,
            stack_size,
            heap_size,
        }
    }

    pub fn convention(&self) -> FrameConvention {
        self.convention
    }

    /// Lower a parsed program into an IR module. Runs only after a clean
    /// parse; the first structural error stops the pass.
    pub fn lower(&self, program: &Program) -> Result<IrModule, LowerError> {
        let mut scope = Scope::new(self.convention);

        // Reserve the implicit IT register and the scratch slots before
        // any statement lowers, so slot offsets match stack depth at
        // every declaration point.
        if program_uses_it(program) {
            scope.declare(Symbol::intern("IT"), ValueType::Noob);
        }
        for _ in 0..(3 * max_temp_depth(program)) {
            scope.reserve_temp();
        }

        let mut ended = false;
        for statement in &program.statements {
            if ended {
                return Err(LowerError::StatementsAfterEnd {
                    span: statement.span(),
                });
            }
            self.lower_statement(&mut scope, statement)?;
            if matches!(statement, Statement::ProgramEnd(_)) {
                ended = true;
            }
        }

        let mut entry = IrEntry::new(self.stack_size, self.heap_size);
        entry.body = scope.body;
        debug!(
            statements = entry.body.len(),
            locals = scope.slots.len(),
            "lowered program"
        );
        Ok(IrModule::new(entry))
    }

    fn lookup(&self, scope: &Scope, name: Symbol, span: Span) -> Result<Slot, LowerError> {
        scope
            .slots
            .get(&name)
            .copied()
            .ok_or(LowerError::UndeclaredVariable { name, span })
    }

    fn lower_statement(
        &self,
        scope: &mut Scope,
        statement: &Statement,
    ) -> Result<(), LowerError> {
        match statement {
            Statement::VarDecl(decl) => {
                let ty = decl
                    .declared
                    .as_ref()
                    .map(|(keyword, _)| ValueType::from_keyword(*keyword))
                    .unwrap_or(ValueType::Noob);
                scope.declare(decl.name, ty);
                Ok(())
            }

            Statement::VarAssign(assign) => {
                if let AssignTarget::Declaration(decl) = &assign.target {
                    let ty = decl
                        .declared
                        .as_ref()
                        .map(|(keyword, _)| ValueType::from_keyword(*keyword))
                        .unwrap_or(ValueType::Noob);
                    scope.declare(decl.name, ty);
                }
                let name = assign.target.name();
                let slot = self.lookup(scope, name, assign.target.span())?;
                let ty = self.lower_expression(scope, &assign.expr)?;
                scope.emit_write(slot.offset);
                if let Some(slot) = scope.slots.get_mut(&name) {
                    slot.ty = ty;
                }
                Ok(())
            }

            Statement::VarCast(cast) => {
                let slot = self.lookup(scope, cast.name, cast.name_token.span())?;
                let target = ValueType::from_keyword(cast.target);
                scope.emit_read(slot.offset);
                self.emit_conversion(scope, slot.ty, target, cast.target_token.span())?;
                scope.emit_write(slot.offset);
                if let Some(slot) = scope.slots.get_mut(&cast.name) {
                    slot.ty = target;
                }
                Ok(())
            }

            Statement::Visible(visible) => {
                for expr in &visible.exprs {
                    let ty = self.lower_expression(scope, expr)?;
                    match ty {
                        ValueType::Numbar => scope.emit(foreign("prs")),
                        ValueType::Yarn => scope.emit(foreign("print_string")),
                        ValueType::Number | ValueType::Troof | ValueType::Noob => {
                            scope.emit(foreign("prn"))
                        }
                    }
                }
                if !visible.suppress_newline {
                    scope.emit(foreign("prend"));
                }
                Ok(())
            }

            Statement::Gimmeh(gimmeh) => {
                let slot = self.lookup(scope, gimmeh.name, gimmeh.name_token.span())?;
                scope.emit(foreign("read_string"));
                scope.emit_write(slot.offset);
                if let Some(slot) = scope.slots.get_mut(&gimmeh.name) {
                    slot.ty = ValueType::Yarn;
                }
                Ok(())
            }

            Statement::Expression(stmt) => {
                let ty = self.lower_expression(scope, &stmt.expr)?;
                let it = self.lookup(scope, Symbol::intern("IT"), stmt.expr.span())?;
                scope.emit_write(it.offset);
                if let Some(slot) = scope.slots.get_mut(&Symbol::intern("IT")) {
                    slot.ty = ty;
                }
                Ok(())
            }

            Statement::ProgramEnd(_) => {
                scope.emit(IrStatement::Halt);
                Ok(())
            }
        }
    }

    fn lower_expression(
        &self,
        scope: &mut Scope,
        expr: &Expression,
    ) -> Result<ValueType, LowerError> {
        match expr {
            Expression::Number { value, .. } => {
                scope.emit(IrStatement::Push(*value as f32));
                Ok(ValueType::Number)
            }

            Expression::Numbar { value, .. } => {
                scope.emit(IrStatement::Push(*value));
                Ok(ValueType::Numbar)
            }

            Expression::Troof { value, .. } => {
                scope.emit(IrStatement::Push(if *value { 1.0 } else { 0.0 }));
                Ok(ValueType::Troof)
            }

            Expression::Yarn { bytes, .. } => {
                self.lower_string_literal(scope, bytes);
                Ok(ValueType::Yarn)
            }

            Expression::Variable { token, name } => {
                let slot = self.lookup(scope, *name, token.span())?;
                scope.emit_read(slot.offset);
                Ok(slot.ty)
            }

            Expression::Arith {
                op, left, right, ..
            } => self.lower_arith(scope, *op, left, right),

            Expression::Compare {
                op, left, right, ..
            } => self.lower_compare(scope, *op, left, right),

            Expression::Logic {
                op, left, right, ..
            } => self.lower_logic(scope, *op, left, right),

            Expression::Not { operand, .. } => {
                // NOT x = 1 - sign(x)^2
                scope.emit(IrStatement::Push(1.0));
                self.lower_expression(scope, operand)?;
                scope.emit_normalize();
                scope.emit(IrStatement::Subtract);
                Ok(ValueType::Troof)
            }

            Expression::Variadic { op, operands, .. } => {
                self.lower_variadic(scope, *op, operands)
            }

            Expression::Smoosh { operands, .. } => self.lower_smoosh(scope, operands),

            Expression::Cast {
                operand,
                target,
                target_token,
                ..
            } => {
                let from = self.lower_expression(scope, operand)?;
                let to = ValueType::from_keyword(*target);
                self.emit_conversion(scope, from, to, target_token.span())?;
                Ok(to)
            }
        }
    }

    /// Push the length, the byte values, then allocate and populate a
    /// length-prefixed region, leaving its address on the stack.
    fn lower_string_literal(&self, scope: &mut Scope, bytes: &[u8]) {
        let length = bytes.len() as i32;
        scope.emit(IrStatement::Push(length as f32));
        for byte in bytes {
            scope.emit(IrStatement::Push(*byte as f32));
        }
        scope.emit(IrStatement::Push((length + 1) as f32));
        scope.emit(IrStatement::Allocate);
        scope.emit(IrStatement::Store(length + 1));
    }

    fn lower_arith(
        &self,
        scope: &mut Scope,
        op: ArithOp,
        left: &Expression,
        right: &Expression,
    ) -> Result<ValueType, LowerError> {
        if matches!(op, ArithOp::Biggr | ArithOp::Smallr) {
            return self.lower_min_max(scope, op, left, right);
        }

        // Left evaluates first so the opcode's second-popped cell is the
        // left operand.
        let left_ty = self.lower_expression(scope, left)?;
        let right_ty = self.lower_expression(scope, right)?;
        scope.emit(match op {
            ArithOp::Sum => IrStatement::Add,
            ArithOp::Diff => IrStatement::Subtract,
            ArithOp::Produkt => IrStatement::Multiply,
            ArithOp::Quoshunt => IrStatement::Divide,
            ArithOp::Mod => IrStatement::Modulo,
            ArithOp::Biggr | ArithOp::Smallr => IrStatement::Add,
        });
        Ok(left_ty.arith_result(right_ty))
    }

    /// BIGGR/SMALLR: select `left + w * (right - left)` where `w` is 0 or
    /// 1 derived from the signum of `right - left`.
    fn lower_min_max(
        &self,
        scope: &mut Scope,
        op: ArithOp,
        left: &Expression,
        right: &Expression,
    ) -> Result<ValueType, LowerError> {
        let mark = scope.temp_mark();
        let left_slot = scope.take_temp();
        let right_slot = scope.take_temp();
        let sign_slot = scope.take_temp();

        let left_ty = self.lower_expression(scope, left)?;
        scope.emit_write(left_slot);
        let right_ty = self.lower_expression(scope, right)?;
        scope.emit_write(right_slot);

        // s = sign(right - left)
        scope.emit_read(right_slot);
        scope.emit_read(left_slot);
        scope.emit(IrStatement::Subtract);
        scope.emit(IrStatement::Sign);
        scope.emit_write(sign_slot);

        // BIGGR: w = s * (s + 1) / 2 is 1 iff right > left.
        // SMALLR: w = s * (s - 1) / 2 is 1 iff right < left.
        scope.emit_read(sign_slot);
        scope.emit_read(sign_slot);
        scope.emit(IrStatement::Push(1.0));
        scope.emit(match op {
            ArithOp::Biggr => IrStatement::Add,
            _ => IrStatement::Subtract,
        });
        scope.emit(IrStatement::Multiply);
        scope.emit(IrStatement::Push(2.0));
        scope.emit(IrStatement::Divide);

        // w * (right - left) + left
        scope.emit_read(right_slot);
        scope.emit_read(left_slot);
        scope.emit(IrStatement::Subtract);
        scope.emit(IrStatement::Multiply);
        scope.emit_read(left_slot);
        scope.emit(IrStatement::Add);

        scope.release_temps(mark);
        Ok(left_ty.arith_result(right_ty))
    }

    fn lower_compare(
        &self,
        scope: &mut Scope,
        op: CmpOp,
        left: &Expression,
        right: &Expression,
    ) -> Result<ValueType, LowerError> {
        match op {
            CmpOp::Saem => {
                // 1 - sign(left - right)^2
                scope.emit(IrStatement::Push(1.0));
                self.lower_expression(scope, left)?;
                self.lower_expression(scope, right)?;
                scope.emit(IrStatement::Subtract);
                scope.emit_normalize();
                scope.emit(IrStatement::Subtract);
            }
            CmpOp::Diffrint => {
                // sign(left - right)^2
                self.lower_expression(scope, left)?;
                self.lower_expression(scope, right)?;
                scope.emit(IrStatement::Subtract);
                scope.emit_normalize();
            }
        }
        Ok(ValueType::Troof)
    }

    fn lower_logic(
        &self,
        scope: &mut Scope,
        op: LogicOp,
        left: &Expression,
        right: &Expression,
    ) -> Result<ValueType, LowerError> {
        match op {
            LogicOp::Both => self.lower_short_circuit(scope, true, left, right),
            LogicOp::Either => self.lower_short_circuit(scope, false, left, right),
            LogicOp::Won => {
                // xor = (norm(left) - norm(right))^2
                self.lower_expression(scope, left)?;
                scope.emit_normalize();
                self.lower_expression(scope, right)?;
                scope.emit_normalize();
                scope.emit(IrStatement::Subtract);
                scope.emit_normalize();
                Ok(ValueType::Troof)
            }
        }
    }

    /// BOTH OF / EITHER OF: the right operand evaluates inside a loop
    /// entered only when the accumulator requires it.
    fn lower_short_circuit(
        &self,
        scope: &mut Scope,
        require_true: bool,
        left: &Expression,
        right: &Expression,
    ) -> Result<ValueType, LowerError> {
        let mark = scope.temp_mark();
        let acc = scope.take_temp();

        self.lower_expression(scope, left)?;
        scope.emit(IrStatement::Sign);
        scope.emit_write(acc);

        self.emit_accumulator_condition(scope, acc, require_true);
        scope.emit(IrStatement::BeginWhile);
        self.lower_expression(scope, right)?;
        scope.emit(IrStatement::Sign);
        scope.emit_write(acc);
        scope.emit(IrStatement::Push(0.0));
        scope.emit(IrStatement::EndWhile);

        // The accumulator holds a signum; square it to a clean 0/1.
        scope.emit_read(acc);
        scope.emit_read(acc);
        scope.emit(IrStatement::Multiply);

        scope.release_temps(mark);
        Ok(ValueType::Troof)
    }

    /// Push `acc^2` (continue when truthy) or `1 - acc^2` (continue when
    /// falsy).
    fn emit_accumulator_condition(&self, scope: &mut Scope, acc: i32, when_true: bool) {
        if when_true {
            scope.emit_read(acc);
            scope.emit_read(acc);
            scope.emit(IrStatement::Multiply);
        } else {
            scope.emit(IrStatement::Push(1.0));
            scope.emit_read(acc);
            scope.emit_read(acc);
            scope.emit(IrStatement::Multiply);
            scope.emit(IrStatement::Subtract);
        }
    }

    fn lower_variadic(
        &self,
        scope: &mut Scope,
        op: VariadicOp,
        operands: &[Expression],
    ) -> Result<ValueType, LowerError> {
        let mark = scope.temp_mark();
        let acc = scope.take_temp();
        let require_true = matches!(op, VariadicOp::All);

        let mut rest = operands.iter();
        if let Some(first) = rest.next() {
            self.lower_expression(scope, first)?;
        } else {
            // An empty operand list cannot parse, but the lowering keeps
            // the identity element anyway.
            scope.emit(IrStatement::Push(if require_true { 1.0 } else { 0.0 }));
        }
        scope.emit(IrStatement::Sign);
        scope.emit_write(acc);

        for operand in rest {
            self.emit_accumulator_condition(scope, acc, require_true);
            scope.emit(IrStatement::BeginWhile);
            self.lower_expression(scope, operand)?;
            scope.emit(IrStatement::Sign);
            scope.emit_write(acc);
            scope.emit(IrStatement::Push(0.0));
            scope.emit(IrStatement::EndWhile);
        }

        scope.emit_read(acc);
        scope.emit_read(acc);
        scope.emit(IrStatement::Multiply);

        scope.release_temps(mark);
        Ok(ValueType::Troof)
    }

    /// SMOOSH: fold the operands left-to-right through the runtime's
    /// string concatenation, converting non-YARN operands first.
    fn lower_smoosh(
        &self,
        scope: &mut Scope,
        operands: &[Expression],
    ) -> Result<ValueType, LowerError> {
        for (index, operand) in operands.iter().enumerate() {
            let ty = self.lower_expression(scope, operand)?;
            match ty {
                ValueType::Yarn => {}
                ValueType::Numbar => scope.emit(foreign("float_to_string")),
                ValueType::Number | ValueType::Troof | ValueType::Noob => {
                    scope.emit(foreign("int_to_string"))
                }
            }
            if index > 0 {
                scope.emit(foreign("concat_strings"));
            }
        }
        Ok(ValueType::Yarn)
    }

    /// Emit the conversion from `from` to `to`, or fail for a cast the
    /// machine has no rule for.
    fn emit_conversion(
        &self,
        scope: &mut Scope,
        from: ValueType,
        to: ValueType,
        span: Span,
    ) -> Result<(), LowerError> {
        use ValueType::*;
        match (from, to) {
            (a, b) if a == b => {}
            (Number, Numbar) | (Troof, Numbar) => scope.emit(foreign("int_to_float")),
            (Numbar, Number) => scope.emit(foreign("float_to_int")),
            (Yarn, Number) => scope.emit(foreign("string_to_int")),
            (Yarn, Numbar) => scope.emit(foreign("string_to_float")),
            (Number, Yarn) | (Troof, Yarn) => scope.emit(foreign("int_to_string")),
            (Numbar, Yarn) => scope.emit(foreign("float_to_string")),
            (Number, Troof) | (Numbar, Troof) => scope.emit_normalize(),
            (Troof, Number) => {}
            (from, to) => {
                return Err(LowerError::UnsupportedCast {
                    from: from.describe(),
                    to: to.describe(),
                    span,
                })
            }
        }
        Ok(())
    }
}

/// True if any statement stores into or reads the implicit IT register.
fn program_uses_it(program: &Program) -> bool {
    let it = Symbol::intern("IT");
    program.statements.iter().any(|statement| match statement {
        Statement::Expression(_) => true,
        _ => statement_expressions(statement)
            .iter()
            .any(|e| expression_mentions(e, it)),
    })
}

fn expression_mentions(expr: &Expression, name: Symbol) -> bool {
    match expr {
        Expression::Variable { name: found, .. } => *found == name,
        _ => expression_children(expr)
            .iter()
            .any(|child| expression_mentions(child, name)),
    }
}

/// The scratch slots needed by a statement's deepest operator nesting.
fn max_temp_depth(program: &Program) -> u32 {
    program
        .statements
        .iter()
        .map(statement_temp_depth)
        .max()
        .unwrap_or(0)
}

fn statement_temp_depth(statement: &Statement) -> u32 {
    // An in-place cast may normalize through a scratch slot of its own.
    let own = match statement {
        Statement::VarCast(_) => 1,
        _ => 0,
    };
    own.max(
        statement_expressions(statement)
            .iter()
            .map(|e| expression_temp_depth(e))
            .max()
            .unwrap_or(0),
    )
}

fn expression_temp_depth(expr: &Expression) -> u32 {
    let own = match expr {
        Expression::Arith {
            op: ArithOp::Biggr | ArithOp::Smallr,
            ..
        } => 1,
        Expression::Logic { .. }
        | Expression::Not { .. }
        | Expression::Variadic { .. }
        | Expression::Compare { .. }
        | Expression::Cast { .. } => 1,
        _ => 0,
    };
    own + expression_children(expr)
        .iter()
        .map(|child| expression_temp_depth(child))
        .max()
        .unwrap_or(0)
}

fn statement_expressions(statement: &Statement) -> Vec<&Expression> {
    match statement {
        Statement::Expression(s) => vec![&s.expr],
        Statement::VarAssign(s) => vec![&s.expr],
        Statement::Visible(s) => s.exprs.iter().collect(),
        _ => Vec::new(),
    }
}

fn expression_children(expr: &Expression) -> Vec<&Expression> {
    match expr {
        Expression::Arith { left, right, .. }
        | Expression::Logic { left, right, .. }
        | Expression::Compare { left, right, .. } => vec![left, right],
        Expression::Not { operand, .. } | Expression::Cast { operand, .. } => vec![operand],
        Expression::Variadic { operands, .. } | Expression::Smoosh { operands, .. } => {
            operands.iter().collect()
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lolc_lex::lex;
    use lolc_par::parse;

    fn lower_source(source: &str) -> Result<IrModule, LowerError> {
        let outcome = parse(lex(source.as_bytes()));
        assert!(outcome.is_clean(), "parse errors: {:?}", outcome.errors);
        Lowerer::new(FrameConvention::BaseIsSp, 256, 256).lower(&outcome.program)
    }

    fn entry_body(source: &str) -> Vec<IrStatement> {
        lower_source(source).map(|m| m.entry.body).unwrap_or_else(|e| {
            panic!("lowering failed: {}", e);
        })
    }

    #[test]
    fn test_minimal_program_is_just_halt() {
        assert_eq!(entry_body("HAI 1.2\nKTHXBYE"), vec![IrStatement::Halt]);
    }

    #[test]
    fn test_declare_assign_print() {
        let body = entry_body(
            "HAI 1.2\nI HAS A x ITZ NUMBER\nx R SUM OF 1 AN 2\nVISIBLE x\nKTHXBYE\n",
        );
        assert_eq!(
            body,
            vec![
                // I HAS A x
                IrStatement::Push(0.0),
                // x R SUM OF 1 AN 2
                IrStatement::Push(1.0),
                IrStatement::Push(2.0),
                IrStatement::Add,
                IrStatement::Push(-1.0),
                IrStatement::Mov,
                // VISIBLE x
                IrStatement::Push(-1.0),
                IrStatement::Copy,
                IrStatement::CallForeign(Symbol::intern("prn")),
                IrStatement::CallForeign(Symbol::intern("prend")),
                IrStatement::Halt,
            ]
        );
    }

    #[test]
    fn test_numbar_dispatches_float_print() {
        let body = entry_body(
            "HAI 1.2\nI HAS A n ITZ NUMBAR\nn R 3.5\nVISIBLE PRODUKT OF n AN 2\nKTHXBYE\n",
        );
        assert!(body.contains(&IrStatement::CallForeign(Symbol::intern("prs"))));
        assert!(!body.contains(&IrStatement::CallForeign(Symbol::intern("prn"))));
    }

    #[test]
    fn test_string_literal_layout() {
        let body = entry_body("HAI 1.2\nVISIBLE \"hi:)there\"!\nKTHXBYE\n");
        // Length prefix, 8 byte cells, allocation of 9, store of 9.
        assert_eq!(body[0], IrStatement::Push(8.0));
        assert_eq!(body[1], IrStatement::Push(b'h' as f32));
        assert_eq!(body[3], IrStatement::Push(b'\n' as f32));
        assert_eq!(body[9], IrStatement::Push(9.0));
        assert_eq!(body[10], IrStatement::Allocate);
        assert_eq!(body[11], IrStatement::Store(9));
        assert_eq!(
            body[12],
            IrStatement::CallForeign(Symbol::intern("print_string"))
        );
        // The `!` suppresses the trailing newline.
        assert!(!body.contains(&IrStatement::CallForeign(Symbol::intern("prend"))));
    }

    #[test]
    fn test_subtraction_operand_order() {
        let body = entry_body("HAI 1.2\nI HAS A x ITZ NUMBER\nx R DIFF OF 9 AN 3\nKTHXBYE\n");
        let window = [
            IrStatement::Push(9.0),
            IrStatement::Push(3.0),
            IrStatement::Subtract,
        ];
        assert!(
            body.windows(3).any(|w| w == window),
            "body: {:?}",
            body
        );
    }

    #[test]
    fn test_expression_statement_stores_into_it() {
        let body = entry_body("HAI 1.2\nSUM OF 1 AN 2\nVISIBLE IT\nKTHXBYE\n");
        // IT is materialized first, then receives the sum.
        assert_eq!(body[0], IrStatement::Push(0.0));
        let store_it = [IrStatement::Push(-1.0), IrStatement::Mov];
        assert!(body.windows(2).any(|w| w == store_it), "body: {:?}", body);
    }

    #[test]
    fn test_short_circuit_shape() {
        let body = entry_body("HAI 1.2\nI HAS A t ITZ TROOF\nt R BOTH OF WIN AN FAIL\nKTHXBYE\n");
        let begin = body
            .iter()
            .filter(|s| matches!(s, IrStatement::BeginWhile))
            .count();
        let end = body
            .iter()
            .filter(|s| matches!(s, IrStatement::EndWhile))
            .count();
        assert_eq!(begin, 1);
        assert_eq!(end, 1);
        // The loop body ends with the forced exit sentinel.
        let position = body
            .iter()
            .position(|s| matches!(s, IrStatement::EndWhile))
            .unwrap_or_default();
        assert_eq!(body[position - 1], IrStatement::Push(0.0));
    }

    #[test]
    fn test_variadic_loops_per_extra_operand() {
        let body =
            entry_body("HAI 1.2\nI HAS A t ITZ TROOF\nt R ALL OF WIN AN WIN AN FAIL MKAY\nKTHXBYE\n");
        let begin = body
            .iter()
            .filter(|s| matches!(s, IrStatement::BeginWhile))
            .count();
        assert_eq!(begin, 2);
    }

    #[test]
    fn test_gimmeh_reads_into_slot() {
        let body = entry_body("HAI 1.2\nI HAS A name ITZ YARN\nGIMMEH name\nKTHXBYE\n");
        assert_eq!(
            body,
            vec![
                IrStatement::Push(0.0),
                IrStatement::CallForeign(Symbol::intern("read_string")),
                IrStatement::Push(-1.0),
                IrStatement::Mov,
                IrStatement::Halt,
            ]
        );
    }

    #[test]
    fn test_maek_conversions() {
        let body = entry_body("HAI 1.2\nI HAS A x ITZ NUMBAR\nx R MAEK 1 A NUMBAR\nKTHXBYE\n");
        assert!(body.contains(&IrStatement::CallForeign(Symbol::intern("int_to_float"))));

        let body = entry_body("HAI 1.2\nI HAS A s ITZ YARN\ns R MAEK 3.5 A YARN\nKTHXBYE\n");
        assert!(body.contains(&IrStatement::CallForeign(Symbol::intern("float_to_string"))));
    }

    #[test]
    fn test_cast_statement_rewrites_slot_type() {
        let module = lower_source(
            "HAI 1.2\nI HAS A x ITZ NUMBER\nx R 5\nx IS NOW A YARN\nVISIBLE x\nKTHXBYE\n",
        );
        let body = module.map(|m| m.entry.body).unwrap_or_default();
        assert!(body.contains(&IrStatement::CallForeign(Symbol::intern("int_to_string"))));
        // After the cast, VISIBLE dispatches to the string printer.
        assert!(body.contains(&IrStatement::CallForeign(Symbol::intern("print_string"))));
    }

    #[test]
    fn test_smoosh_concatenates_pairwise() {
        let body = entry_body(
            "HAI 1.2\nI HAS A s ITZ YARN\ns R SMOOSH \"a\" AN \"b\" AN \"c\" MKAY\nKTHXBYE\n",
        );
        let concats = body
            .iter()
            .filter(|s| **s == IrStatement::CallForeign(Symbol::intern("concat_strings")))
            .count();
        assert_eq!(concats, 2);
    }

    #[test]
    fn test_undeclared_variable_is_fatal() {
        let outcome = parse(lex(b"HAI 1.2\nVISIBLE mystery\nKTHXBYE\n"));
        assert!(outcome.is_clean());
        let result = Lowerer::new(FrameConvention::BaseIsSp, 256, 256).lower(&outcome.program);
        assert!(matches!(
            result,
            Err(LowerError::UndeclaredVariable { name, .. }) if name.as_str() == "mystery"
        ));
    }

    #[test]
    fn test_noob_cast_is_unsupported() {
        let outcome = parse(lex(
            b"HAI 1.2\nI HAS A x ITZ YARN\nx R MAEK \"s\" A TROOF\nKTHXBYE\n",
        ));
        assert!(outcome.is_clean());
        let result = Lowerer::new(FrameConvention::BaseIsSp, 256, 256).lower(&outcome.program);
        assert!(matches!(result, Err(LowerError::UnsupportedCast { .. })));
    }

    #[test]
    fn test_lowered_module_validates() {
        let module = lower_source(
            "HAI 1.2\nI HAS A x ITZ NUMBER\nx R BIGGR OF 2 AN 7\nVISIBLE x BOTH SAEM x AN 7\nKTHXBYE\n",
        );
        let module = match module {
            Ok(module) => module,
            Err(error) => panic!("lowering failed: {}", error),
        };
        let names = lolc_runtime::foreign_names();
        assert_eq!(module.validate(&names), Ok(()));
        assert_eq!(module.entry.stack_size, 256);
    }

    #[test]
    fn test_statements_balance_frames_and_loops() {
        // Every lowered body must pass structural validation even with
        // deeply nested short-circuit operators.
        let module = lower_source(
            "HAI 1.2\nI HAS A t ITZ TROOF\nt R ALL OF WIN AN EITHER OF FAIL AN NOT FAIL MKAY\nKTHXBYE\n",
        );
        let module = match module {
            Ok(module) => module,
            Err(error) => panic!("lowering failed: {}", error),
        };
        let names = lolc_runtime::foreign_names();
        assert_eq!(module.validate(&names), Ok(()));
    }
}
