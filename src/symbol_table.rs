// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Associative local-variable storage, used by a captured execution
//! context when a body's set of locals is not known ahead of time
//! (§3, §6.2 "dynamic locals" case).
//!
//! Grounded on the teacher's own choice of hasher: `nova_vm` depends on
//! `ahash` for its internal associative containers, so this crate's
//! symbol table does too rather than reaching for `std::collections::HashMap`'s
//! default (DoS-resistant but slower) hasher, which the teacher never uses
//! for this kind of internal, non-adversarial map.

use std::rc::Rc;

use ahash::AHashMap;

use crate::value::Value;

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    slots: AHashMap<Rc<str>, Value>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            slots: AHashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slots.get(name)
    }

    pub fn set(&mut self, name: Rc<str>, value: Value) {
        self.slots.insert(name, value);
    }

    /// Deep-copy: every contained value is cloned (owned-reference bump),
    /// matching the "deep copy with value cloning" contract of §6.2.
    pub fn deep_clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
        }
    }

    /// The host's "clean and cache" policy has no externally observable
    /// effect in this crate beyond dropping the contents; a real
    /// embedding would return the backing allocation to a free-list.
    pub fn clean_and_cache(self) {
        drop(self);
    }
}
