// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A captured interpreter frame (§3 "Execution context").

use std::rc::Rc;

use crate::compiled_body::CompiledBody;
use crate::symbol_table::SymbolTable;
use crate::value::{ObjectRef, Value};

/// A record for an in-progress nested call; this crate's bodies never
/// actually perform nested calls, so this is always empty in practice,
/// but the closer's "pending-call cleanup" step (§4.3 step 4) and the
/// cloner's "call slots" step (§4.4 step 5) are implemented against it
/// for structural completeness.
#[derive(Debug, Clone)]
pub struct CallSlot {
    pub receiver: Option<ObjectRef>,
}

/// The synthetic frame one level below the generator's own, used so
/// the generator body shows up correctly in introspective argument
/// access (§3, §4.1 step 5).
#[derive(Debug, Clone, Default)]
pub struct PreviousFrame {
    pub arguments: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub body: Rc<CompiledBody>,
    pub ip: usize,
    /// Merged local-variable and temporary-variable storage, indexed
    /// by slot number (see [`crate::compiled_body`] module docs).
    pub slots: Vec<Value>,
    pub operand_stack: Vec<Value>,
    pub call_slots: Vec<CallSlot>,
    pub receiver: Option<ObjectRef>,
    pub symbol_table: Option<SymbolTable>,
    pub previous_frame: PreviousFrame,
    /// Owned copy of the closure, if the body captured state (§4.1
    /// step 1); released by the closer at teardown (§4.3 step 8).
    pub closure_copy: Option<Rc<CompiledBody>>,
}

impl ExecutionContext {
    pub fn new(body: Rc<CompiledBody>, arguments: Vec<Value>, receiver: Option<ObjectRef>) -> Self {
        let slot_count = body.slot_count;
        let symbol_table = None;
        let closure_copy = if body.is_closure {
            Some(body.clone())
        } else {
            None
        };
        Self {
            body,
            ip: 0,
            slots: vec![Value::Undefined; slot_count],
            operand_stack: Vec::new(),
            call_slots: Vec::new(),
            receiver,
            symbol_table,
            previous_frame: PreviousFrame { arguments },
            closure_copy,
        }
    }
}
