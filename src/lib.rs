// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A generator (coroutine) runtime for a bytecode-interpreted,
//! dynamically typed language: the triplet of context capture, resume,
//! and close over a suspended execution context, plus the iterator
//! façade and clone operation built on top of it.
//!
//! See [`builtins::control_abstraction_objects::generator_objects`] for
//! the core (components A-D) and
//! [`builtins::control_abstraction_objects::generator_prototype`] for
//! the user-visible surface (components E-F).

pub mod agent;
pub mod builtins;
pub mod compiled_body;
pub mod exception;
pub mod execution_context;
pub mod interpreter;
pub mod symbol_table;
pub mod value;

pub use agent::{Agent, Options};
pub use builtins::control_abstraction_objects::generator_objects::{Generator, GeneratorStep};
pub use builtins::control_abstraction_objects::generator_prototype::{
    ExternalIterator, GeneratorPrototype,
};
pub use compiled_body::{BodyBuilder, CompiledBody, LoopEntry, Opcode, TryEntry, YieldKeySpec};
pub use exception::{ExceptionType, JsError, JsResult};
pub use execution_context::ExecutionContext;
pub use value::{ObjectRef, Value, ValueKey};
