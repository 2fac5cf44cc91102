// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Component E (Iterator Façade) and component F (Lifecycle Bindings).
//!
//! Grounded on `nova_vm`'s `generator_prototype.rs`: the teacher wires
//! `next`/`return`/`throw` as `Behaviour::Regular` builtins on an
//! intrinsic prototype object reached through `OrdinaryObjectBuilder`.
//! This crate has no object-store/intrinsics layer to register against
//! (§1, §6.2 names it as an out-of-scope collaborator), so
//! `GeneratorPrototype` is a plain associated-function namespace over
//! [`Generator`] instead of a `Builtin`/`BuiltinIntrinsic` pair; the
//! method bodies still follow the teacher's validate-then-dispatch
//! shape (`GeneratorValidate` → running/completed/suspended branch →
//! resume).
//!
//! The teacher has no `rewind`/`current`/`key`/`send` (those are a PHP
//! `Iterator` concept, not part of the JS generator protocol, which
//! only exposes `next`/`return`/`throw`); those five operations are
//! grounded instead on `Zend/zend_generators.c`'s
//! `zend_generator_rewind` / `zend_generator_get_current_value` /
//! `zend_generator_get_current_key` / `zend_generator_send`, following
//! the same prime-then-dispatch shape the teacher uses for its own
//! three methods.

use crate::agent::Agent;
use crate::exception::{ExceptionType, JsError, JsResult};
use crate::value::Value;

use super::generator_objects::{Generator, GeneratorStep};

/// The `Generator` prototype's method surface (§4.5, §6.1).
pub struct GeneratorPrototype;

impl GeneratorPrototype {
    /// `Generator::rewind`. Idempotent exactly at the first yield;
    /// raises once the generator has been advanced past it.
    pub fn rewind(agent: &mut Agent, generator: &Generator) -> JsResult<()> {
        generator.prime(agent)?;
        if generator.is_at_first_yield() {
            Ok(())
        } else {
            Err(agent.throw_exception_with_static_message(
                ExceptionType::Error,
                "cannot rewind a generator that was already run",
            ))
        }
    }

    /// `Generator::valid`.
    pub fn valid(agent: &mut Agent, generator: &Generator) -> JsResult<bool> {
        generator.prime(agent)?;
        Ok(generator.value().is_some())
    }

    /// `Generator::current`.
    pub fn current(agent: &mut Agent, generator: &Generator) -> JsResult<Value> {
        generator.prime(agent)?;
        Ok(generator.value().unwrap_or(Value::Null))
    }

    /// `Generator::key`.
    pub fn key(agent: &mut Agent, generator: &Generator) -> JsResult<Value> {
        generator.prime(agent)?;
        Ok(generator
            .key()
            .map(|key| key.into_value())
            .unwrap_or(Value::Null))
    }

    /// `Generator::next` (this crate's JS-protocol `next`, which
    /// returns the new value, folds into [`Self::send`] with an
    /// `Undefined` send value; this is the PHP-protocol `next`, which
    /// discards it).
    pub fn next(agent: &mut Agent, generator: &Generator) -> JsResult<()> {
        generator.prime(agent)?;
        generator.resume(agent, Value::Undefined)?;
        Ok(())
    }

    /// `Generator::send`. Priming counts as the first advance, so
    /// `send` on a freshly created generator both primes *and*
    /// delivers `v` to the first yield in one call, matching
    /// `zend_generator_send`.
    pub fn send(agent: &mut Agent, generator: &Generator, value: Value) -> JsResult<Value> {
        generator.prime(agent)?;
        if generator.is_closed() {
            return Ok(Value::Null);
        }
        match generator.resume(agent, value)? {
            GeneratorStep::Yielded { value, .. } => Ok(value),
            GeneratorStep::Completed(_) => Ok(Value::Null),
        }
    }

    /// `Generator::throw`. §4.5: closed generators raise `exception`
    /// straight back at the caller without touching generator state.
    /// A still-suspended generator is primed, then the exception is
    /// injected; this crate's minimal interpreter has no in-body catch
    /// to deliver it to (§1A, `resume_throw`'s doc comment), so the
    /// injected throw always terminates the generator and propagates.
    pub fn throw(agent: &mut Agent, generator: &Generator, exception: Value) -> JsResult<Value> {
        if generator.is_closed() {
            return Err(JsError::new(ExceptionType::Error, exception));
        }
        generator.prime(agent)?;
        if generator.is_closed() {
            return Err(JsError::new(ExceptionType::Error, exception));
        }
        match generator.resume_throw(agent, exception)? {
            GeneratorStep::Yielded { value, .. } => Ok(value),
            GeneratorStep::Completed(_) => Ok(Value::Null),
        }
    }

    /// `Generator::__wakeup`. Always raises: §6.1's "unserialization of
    /// 'Generator' is not allowed", the non-goal named in §1.
    pub fn wakeup(agent: &mut Agent) -> JsResult<()> {
        Err(agent.throw_exception_with_static_message(
            ExceptionType::Error,
            "unserialization of 'Generator' is not allowed",
        ))
    }

    /// Component F: the literal `new Generator()` surface. A
    /// `Generator` is obtainable only as the return value of invoking
    /// a body containing `YIELD` (§4.1 "Failure", §6.1); this is the
    /// sole entry point user code can reach for manual construction,
    /// and it always fails.
    pub fn construct(agent: &mut Agent) -> JsResult<Value> {
        Err(agent.throw_exception_with_static_message(
            ExceptionType::Error,
            "reserved for internal use",
        ))
    }
}

/// Component E's internal iterator adapter: what a host's `foreach`
/// (or equivalent) construct drives instead of calling the named
/// methods directly.
///
/// Grounded on `Zend/zend_generators.c`'s `zend_generator_iterator`:
/// holds one extra owned reference on the generator for the adapter's
/// lifetime (released on `Drop`, mirroring `dtor`), and rejects by-reference
/// iteration up front if the body never declared it yields by reference.
pub struct ExternalIterator {
    generator: Generator,
}

impl ExternalIterator {
    /// Takes and holds its own owned reference to `generator`,
    /// distinct from whatever handle the caller retains (§4.5's "holds
    /// an extra owned reference... for its lifetime").
    pub fn new(agent: &mut Agent, generator: &Generator, by_ref: bool) -> JsResult<Self> {
        if by_ref && !generator.yields_by_ref() {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::Error,
                "you can only iterate a generator by-reference if it declared that it yields by-reference",
            ));
        }
        Ok(Self {
            generator: generator.clone(),
        })
    }

    pub fn rewind(&self, agent: &mut Agent) -> JsResult<()> {
        GeneratorPrototype::rewind(agent, &self.generator)
    }

    pub fn valid(&self, agent: &mut Agent) -> JsResult<bool> {
        GeneratorPrototype::valid(agent, &self.generator)
    }

    pub fn get_data(&self, agent: &mut Agent) -> JsResult<Value> {
        GeneratorPrototype::current(agent, &self.generator)
    }

    pub fn get_key(&self, agent: &mut Agent) -> JsResult<Value> {
        GeneratorPrototype::key(agent, &self.generator)
    }

    /// §6.1: "cannot traverse an already closed generator" — the
    /// external-iterator path raises here where the named `next`
    /// method instead silently no-ops (§8 "Close law").
    pub fn move_forward(&self, agent: &mut Agent) -> JsResult<()> {
        if self.generator.is_closed() {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::Error,
                "cannot traverse an already closed generator",
            ));
        }
        GeneratorPrototype::next(agent, &self.generator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Options;
    use crate::compiled_body::{BodyBuilder, Opcode, YieldKeySpec};
    use crate::value::ValueKey;
    use std::rc::Rc;

    fn new_agent() -> Agent {
        Agent::new(Options::default())
    }

    fn three_yields_body() -> crate::compiled_body::CompiledBody {
        let mut builder = BodyBuilder::new();
        let a = builder.constant(Value::String("a".into()));
        let b = builder.constant(Value::String("b".into()));
        let c = builder.constant(Value::String("c".into()));
        builder
            .op(Opcode::LoadConst(a))
            .op(Opcode::Yield {
                key: YieldKeySpec::Auto,
                send_target: None,
            })
            .op(Opcode::LoadConst(b))
            .op(Opcode::Yield {
                key: YieldKeySpec::Auto,
                send_target: None,
            })
            .op(Opcode::LoadConst(c))
            .op(Opcode::Yield {
                key: YieldKeySpec::Auto,
                send_target: None,
            })
            .op(Opcode::Return)
            .build()
    }

    #[test]
    fn scenario_one_full_walk() {
        let mut agent = new_agent();
        let gen = Generator::create(&mut agent, Rc::new(three_yields_body()), Vec::new(), None);

        assert!(GeneratorPrototype::valid(&mut agent, &gen).unwrap());
        assert_eq!(
            GeneratorPrototype::key(&mut agent, &gen).unwrap().as_number(),
            Some(0.0)
        );
        assert!(matches!(
            GeneratorPrototype::current(&mut agent, &gen).unwrap(),
            Value::String(s) if &*s == "a"
        ));

        GeneratorPrototype::next(&mut agent, &gen).unwrap();
        assert!(GeneratorPrototype::valid(&mut agent, &gen).unwrap());
        assert!(matches!(
            GeneratorPrototype::current(&mut agent, &gen).unwrap(),
            Value::String(s) if &*s == "b"
        ));

        GeneratorPrototype::next(&mut agent, &gen).unwrap();
        assert!(matches!(
            GeneratorPrototype::current(&mut agent, &gen).unwrap(),
            Value::String(s) if &*s == "c"
        ));

        GeneratorPrototype::next(&mut agent, &gen).unwrap();
        assert!(!GeneratorPrototype::valid(&mut agent, &gen).unwrap());
        assert_eq!(GeneratorPrototype::current(&mut agent, &gen).unwrap(), Value::Null);
        assert_eq!(GeneratorPrototype::key(&mut agent, &gen).unwrap(), Value::Null);
    }

    #[test]
    fn scenario_two_send_feeds_expression() {
        let mut agent = new_agent();
        let mut builder = BodyBuilder::new().slots(1);
        let one = builder.constant(Value::Number(1.0));
        let body = builder
            .op(Opcode::LoadConst(one))
            .op(Opcode::Yield {
                key: YieldKeySpec::Auto,
                send_target: Some(0),
            })
            .op(Opcode::LoadSlot(0))
            .op(Opcode::LoadConst(one))
            .op(Opcode::Add)
            .op(Opcode::Yield {
                key: YieldKeySpec::Auto,
                send_target: None,
            })
            .op(Opcode::Return)
            .build();
        let gen = Generator::create(&mut agent, Rc::new(body), Vec::new(), None);

        assert_eq!(
            GeneratorPrototype::current(&mut agent, &gen).unwrap().as_number(),
            Some(1.0)
        );
        let sent = GeneratorPrototype::send(&mut agent, &gen, Value::Number(40.0)).unwrap();
        assert_eq!(sent.as_number(), Some(41.0));

        GeneratorPrototype::next(&mut agent, &gen).unwrap();
        assert!(!GeneratorPrototype::valid(&mut agent, &gen).unwrap());
    }

    #[test]
    fn rewind_after_advance_raises() {
        let mut agent = new_agent();
        let gen = Generator::create(&mut agent, Rc::new(three_yields_body()), Vec::new(), None);

        // Calling rewind exactly at the first yield is a no-op.
        GeneratorPrototype::rewind(&mut agent, &gen).unwrap();
        GeneratorPrototype::next(&mut agent, &gen).unwrap();

        let err = GeneratorPrototype::rewind(&mut agent, &gen).unwrap_err();
        assert!(matches!(err.value, Value::String(s) if s.contains("already run")));
    }

    #[test]
    fn throw_on_closed_generator_propagates_without_touching_state() {
        let mut agent = new_agent();
        let gen = Generator::create(&mut agent, Rc::new(BodyBuilder::new().op(Opcode::Return).build()), Vec::new(), None);
        GeneratorPrototype::next(&mut agent, &gen).unwrap();
        assert!(gen.is_closed());

        let err = GeneratorPrototype::throw(&mut agent, &gen, Value::String("boom".into())).unwrap_err();
        assert!(matches!(err.value, Value::String(s) if &*s == "boom"));
    }

    #[test]
    fn construct_is_always_rejected() {
        let mut agent = new_agent();
        let err = GeneratorPrototype::construct(&mut agent).unwrap_err();
        assert!(matches!(err.value, Value::String(s) if s.contains("reserved for internal use")));
    }

    #[test]
    fn wakeup_is_always_rejected() {
        let mut agent = new_agent();
        let err = GeneratorPrototype::wakeup(&mut agent).unwrap_err();
        assert!(matches!(err.value, Value::String(s) if s.contains("unserialization")));
    }

    #[test]
    fn external_iterator_rejects_by_ref_when_body_is_by_value() {
        let mut agent = new_agent();
        let gen = Generator::create(&mut agent, Rc::new(three_yields_body()), Vec::new(), None);
        let err = ExternalIterator::new(&mut agent, &gen, true).unwrap_err();
        assert!(matches!(err.value, Value::String(s) if s.contains("by-reference")));
    }

    #[test]
    fn external_iterator_walks_and_rejects_closed_traversal() {
        let mut agent = new_agent();
        let gen = Generator::create(&mut agent, Rc::new(three_yields_body()), Vec::new(), None);
        let iter = ExternalIterator::new(&mut agent, &gen, false).unwrap();

        iter.rewind(&mut agent).unwrap();
        assert!(iter.valid(&mut agent).unwrap());
        assert_eq!(iter.get_key(&mut agent).unwrap().as_number(), Some(0.0));

        iter.move_forward(&mut agent).unwrap();
        iter.move_forward(&mut agent).unwrap();
        iter.move_forward(&mut agent).unwrap();
        assert!(!iter.valid(&mut agent).unwrap());

        let err = iter.move_forward(&mut agent).unwrap_err();
        assert!(matches!(err.value, Value::String(s) if s.contains("already closed")));
    }

    #[test]
    fn clone_does_not_see_keys_as_string(){
        // Guards the §9 open question: a string key must never perturb
        // the integer counter.
        let k = ValueKey::String("k".into());
        assert_eq!(k.into_value(), Value::String("k".into()));
    }
}
