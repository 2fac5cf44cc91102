// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A minimal opcode interpreter (§1, §6.2: out of scope in general,
//! but a small stand-in is needed to drive and test the generator
//! core). `execute_ex` runs a context until it yields, returns, or
//! throws — nothing more.

use crate::compiled_body::{Opcode, YieldKeySpec};
use crate::exception::{ExceptionType, JsError};
use crate::execution_context::ExecutionContext;
use crate::value::{Value, ValueKey};

/// What happened when `execute_ex` stopped running.
#[derive(Debug)]
pub enum ExecutionOutcome {
    Yielded {
        value: Value,
        key: ValueKey,
        send_target: Option<usize>,
    },
    Returned(Value),
    Thrown(JsError),
}

/// Runs `ctx` from its current instruction pointer until the next
/// `Yield`, `Return`, or `Throw`.
///
/// `forced_close` mirrors the generator's `FORCED_CLOSE` flag (§4.2):
/// while set, a `Yield` opcode computes its value and key and then
/// discards them instead of suspending, guaranteeing a forced
/// teardown always runs to completion in one call instead of leaving
/// the body freshly re-suspended with no caller able to observe the
/// value (see the Design Notes' resolution of this point).
pub fn execute_ex(
    ctx: &mut ExecutionContext,
    forced_close: bool,
    largest_used_integer_key: &mut i64,
) -> ExecutionOutcome {
    loop {
        let Some(&op) = ctx.body.opcodes.get(ctx.ip) else {
            return ExecutionOutcome::Returned(Value::Undefined);
        };
        ctx.ip += 1;

        match op {
            Opcode::LoadConst(idx) => ctx.operand_stack.push(ctx.body.constants[idx].clone()),
            Opcode::LoadSlot(idx) => ctx.operand_stack.push(ctx.slots[idx].clone()),
            Opcode::StoreSlot(idx) => {
                let value = ctx.operand_stack.pop().unwrap_or(Value::Undefined);
                ctx.slots[idx] = value;
            }
            Opcode::Add => {
                let b = ctx.operand_stack.pop().and_then(|v| v.as_number()).unwrap_or(0.0);
                let a = ctx.operand_stack.pop().and_then(|v| v.as_number()).unwrap_or(0.0);
                ctx.operand_stack.push(Value::Number(a + b));
            }
            Opcode::Yield { key, send_target } => {
                let value = ctx.operand_stack.pop().unwrap_or(Value::Undefined);
                let key = resolve_key(ctx, key, largest_used_integer_key);
                if forced_close {
                    continue;
                }
                return ExecutionOutcome::Yielded {
                    value,
                    key,
                    send_target,
                };
            }
            Opcode::Throw => {
                let value = ctx.operand_stack.pop().unwrap_or(Value::Undefined);
                return ExecutionOutcome::Thrown(JsError::new(ExceptionType::Error, value));
            }
            Opcode::Free(idx) | Opcode::SwitchFree(idx) => {
                ctx.slots[idx] = Value::Undefined;
            }
            Opcode::Jump(target) => ctx.ip = target,
            Opcode::Return => {
                let value = ctx.operand_stack.pop().unwrap_or(Value::Undefined);
                return ExecutionOutcome::Returned(value);
            }
        }
    }
}

fn resolve_key(
    ctx: &ExecutionContext,
    key: YieldKeySpec,
    largest_used_integer_key: &mut i64,
) -> ValueKey {
    match key {
        YieldKeySpec::Auto => {
            *largest_used_integer_key += 1;
            ValueKey::Integer(*largest_used_integer_key)
        }
        YieldKeySpec::Explicit(idx) => {
            let key = ctx.body.explicit_key(idx);
            if let ValueKey::Integer(i) = key {
                *largest_used_integer_key = (*largest_used_integer_key).max(i);
            }
            key
        }
    }
}
