// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recoverable errors.
//!
//! Fatal invariant violations (reentrant resume, a yielded key that is
//! neither int nor string) are not represented here; those are
//! `panic!`s, matching the host's own `E_ERROR`-class aborts and this
//! crate's use of `unreachable!` for the same class of bug (§7 of the
//! generator runtime specification).

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionType {
    TypeError,
    Error,
}

/// A thrown value, carried as a [`Result`] error up to the caller that
/// can observe it.
#[derive(Debug, Clone)]
pub struct JsError {
    pub kind: ExceptionType,
    pub value: Value,
}

impl JsError {
    pub fn new(kind: ExceptionType, value: Value) -> Self {
        Self { kind, value }
    }

    pub fn with_static_message(kind: ExceptionType, message: &'static str) -> Self {
        Self {
            kind,
            value: Value::String(message.into()),
        }
    }
}

pub type JsResult<T> = Result<T, JsError>;
