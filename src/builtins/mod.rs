// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Builtin types exposed to user code, laid out the way `nova_vm` lays
//! out its own `ecmascript::builtins` tree: one directory per spec
//! chapter, one module per object/prototype pair.

pub mod control_abstraction_objects;
