// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grounded on `nova_vm`'s `ecmascript::builtins::control_abstraction_objects`
//! directory, which groups `Generator`, `AsyncGenerator`, `Promise`,
//! and iterator helpers under ECMA-262 chapter 27 ("Control Abstraction
//! Objects"). This crate implements only the `Generator` member of
//! that family.

pub mod generator_objects;
pub mod generator_prototype;
