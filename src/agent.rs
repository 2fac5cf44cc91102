// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The ambient interpreter handle.
//!
//! Grounded on `nova_vm`'s `Agent`: a single long-lived value threaded
//! through every operation as `&mut Agent`, owning the host's
//! execution-context stack and exposing `throw_exception_with_static_message`
//! for constructing recoverable errors. Where the teacher's `Agent`
//! swaps ~10 global interpreter variables around a resume, this
//! crate's `Agent` owns just the one stack the generator core actually
//! needs (§9 Design Notes: "the 'current generator' is threaded
//! explicitly as a typed handle rather than aliased through a
//! return-value slot").
//!
//! Configuration follows the same plain-struct convention as the
//! teacher's own `Options` (`disable_gc`, `print_internals`) rather
//! than a config-file crate the teacher never reaches for.

use crate::builtins::control_abstraction_objects::generator_objects;
use crate::exception::{ExceptionType, JsError};
use crate::execution_context::ExecutionContext;
use crate::value::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Reserved for a future recursion-depth guard; unused today.
    pub max_call_depth: Option<usize>,
}

#[derive(Debug, Default)]
pub struct Agent {
    options: Options,
    /// The host's call stack, as seen by introspection. `Generator::resume`
    /// pushes the generator's synthetic previous frame here before
    /// running the body and pops it on the way out (§4.1 step 5,
    /// §4.2 step 5).
    execution_context_stack: Vec<ExecutionContext>,
}

impl Agent {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            execution_context_stack: Vec::new(),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn push_execution_context(&mut self, ctx: ExecutionContext) {
        self.execution_context_stack.push(ctx);
    }

    pub fn pop_execution_context(&mut self) -> Option<ExecutionContext> {
        self.execution_context_stack.pop()
    }

    pub fn current_execution_context(&self) -> Option<&ExecutionContext> {
        self.execution_context_stack.last()
    }

    pub fn throw_exception_with_static_message(
        &mut self,
        kind: ExceptionType,
        message: &'static str,
    ) -> JsError {
        JsError::with_static_message(kind, message)
    }

    pub fn throw_exception(&mut self, kind: ExceptionType, value: Value) -> JsError {
        JsError::new(kind, value)
    }

    /// Runs the closer (including any pending `finally` re-entry) for
    /// every generator whose last handle was dropped since this was
    /// last called (§4.3 "Deferred teardown on drop").
    ///
    /// A host embedding this crate should call this at a point where
    /// it already holds `&mut Agent` with no generator currently
    /// executing — e.g. once per event-loop turn, or immediately
    /// after a `Generator` handle goes out of scope if deterministic
    /// teardown matters more than batching.
    pub fn drain_pending_generator_closes(&mut self) {
        generator_objects::drain_pending_closes(self);
    }
}
