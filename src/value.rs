// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The minimal dynamically typed value used throughout this crate.
//!
//! `Value` is deliberately small: it exists only to give the generator
//! core (see [`crate::builtins::control_abstraction_objects`]) something
//! concrete to move, yield, send, and clone. A real embedding would
//! plug in its own richer value representation; the contract the
//! generator core depends on is exactly `Clone` (owned-reference bump)
//! plus the ability to carry a nested generator.

use std::rc::Rc;

use crate::builtins::control_abstraction_objects::generator_objects::Generator;

/// A dynamically typed value.
///
/// `Clone` is this crate's stand-in for the host's owned-reference
/// increment: cloning a `Value::String`/`Value::Object` bumps an `Rc`,
/// cloning a `Value::Generator` bumps the generator's own `Rc`.
#[derive(Debug, Clone)]
pub enum Value {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(Rc<str>),
    Object(ObjectRef),
    Generator(Generator),
}

impl Value {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Scalars compare by value; `Object`/`Generator` compare by identity
/// (`Rc::ptr_eq`), since this crate has no structural-equality
/// contract for either. Used only by this crate's own tests.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(&a.0, &b.0),
            (Value::Generator(a), Value::Generator(b)) => Rc::ptr_eq(&a.0, &b.0),
            _ => false,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Undefined
    }
}

/// A key under which a value was yielded: either an auto-generated
/// integer or a user-supplied integer or string (§3, §6.1 of the
/// generator runtime specification).
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKey {
    Integer(i64),
    String(Rc<str>),
}

impl ValueKey {
    /// Widens a yielded key back into a `Value`, the representation
    /// `GeneratorPrototype::key` hands back to the caller (§4.5).
    pub fn into_value(self) -> Value {
        match self {
            ValueKey::Integer(i) => Value::Number(i as f64),
            ValueKey::String(s) => Value::String(s),
        }
    }
}

/// A minimal stand-in for the host's object store handle. Opaque here;
/// only used as a receiver/bound-this placeholder.
#[derive(Debug, Clone)]
pub struct ObjectRef(pub Rc<ObjectData>);

#[derive(Debug, Default)]
pub struct ObjectData {
    pub class_name: &'static str,
}

impl ObjectRef {
    pub fn new(class_name: &'static str) -> Self {
        ObjectRef(Rc::new(ObjectData { class_name }))
    }
}
