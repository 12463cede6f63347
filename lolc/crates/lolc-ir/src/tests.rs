#![cfg(test)]
//! Tests for the IR model and its validation.

use crate::{FrameConvention, IrEntry, IrError, IrFunction, IrModule, IrStatement};
use lolc_util::Symbol;

const FOREIGN: &[&str] = &["prn", "prend", "read_string"];

fn entry_with(body: Vec<IrStatement>) -> IrModule {
    let mut entry = IrEntry::new(256, 256);
    entry.body = body;
    IrModule::new(entry)
}

#[test]
fn test_empty_module_validates() {
    let module = entry_with(vec![IrStatement::Halt]);
    assert_eq!(module.validate(FOREIGN), Ok(()));
}

#[test]
fn test_call_resolution() {
    let mut module = entry_with(vec![
        IrStatement::Push(1.0),
        IrStatement::Call(Symbol::intern("twice")),
        IrStatement::Halt,
    ]);

    // Unresolved at first.
    assert_eq!(
        module.validate(FOREIGN),
        Err(IrError::UndefinedCall {
            name: Symbol::intern("twice")
        })
    );

    let mut twice = IrFunction::new(Symbol::intern("twice"));
    twice.body = vec![
        IrStatement::EstablishStackFrame,
        IrStatement::Push(2.0),
        IrStatement::Push(FrameConvention::BaseIsSp.arg_offset(1, 1) as f32),
        IrStatement::Copy,
        IrStatement::Multiply,
        IrStatement::SetReturnRegister,
        IrStatement::EndStackFrame {
            arg_size: 1,
            locals_size: 0,
        },
    ];
    module.define(twice);
    assert_eq!(module.validate(FOREIGN), Ok(()));
}

#[test]
fn test_foreign_names_checked() {
    let module = entry_with(vec![
        IrStatement::Push(3.0),
        IrStatement::CallForeign(Symbol::intern("prn")),
        IrStatement::CallForeign(Symbol::intern("launch_missiles")),
        IrStatement::Halt,
    ]);
    assert_eq!(
        module.validate(FOREIGN),
        Err(IrError::UnknownForeign {
            name: Symbol::intern("launch_missiles")
        })
    );
}

#[test]
fn test_function_frames_must_balance() {
    let mut module = entry_with(vec![IrStatement::Halt]);
    let mut broken = IrFunction::new(Symbol::intern("broken"));
    broken.body = vec![IrStatement::EstablishStackFrame];
    module.define(broken);

    assert!(matches!(
        module.validate(FOREIGN),
        Err(IrError::UnbalancedFrames { .. })
    ));
}

#[test]
fn test_entry_may_abandon_its_frame() {
    let module = entry_with(vec![IrStatement::EstablishStackFrame, IrStatement::Halt]);
    assert_eq!(module.validate(FOREIGN), Ok(()));
}

#[test]
fn test_loops_must_balance() {
    let module = entry_with(vec![IrStatement::Push(0.0), IrStatement::BeginWhile]);
    assert!(matches!(
        module.validate(FOREIGN),
        Err(IrError::UnbalancedLoop { .. })
    ));

    let module = entry_with(vec![IrStatement::EndWhile]);
    assert!(matches!(
        module.validate(FOREIGN),
        Err(IrError::UnbalancedLoop { .. })
    ));
}

#[test]
fn test_display_round_trips_mnemonics() {
    let mut module = entry_with(vec![
        IrStatement::Push(3.5),
        IrStatement::Store(6),
        IrStatement::EndStackFrame {
            arg_size: 2,
            locals_size: 1,
        },
        IrStatement::Halt,
    ]);
    let mut helper = IrFunction::new(Symbol::intern("helper"));
    helper.body = vec![IrStatement::AccessReturnRegister];
    module.define(helper);

    let printed = module.to_string();
    assert!(printed.contains("fn helper:"));
    assert!(printed.contains("access-return-register"));
    assert!(printed.contains("entry (stack 256, heap 256):"));
    assert!(printed.contains("push 3.5"));
    assert!(printed.contains("store 6"));
    assert!(printed.contains("end-stack-frame 2 1"));
}

#[test]
fn test_definition_order_preserved() {
    let mut module = entry_with(vec![IrStatement::Halt]);
    for name in ["first", "second", "third"] {
        module.define(IrFunction::new(Symbol::intern(name)));
    }
    let names: Vec<&str> = module.functions.keys().map(|s| s.as_str()).collect();
    assert_eq!(names, vec!["first", "second", "third"]);
}
