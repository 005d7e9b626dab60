// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

/// Opaque pool handle.
///
/// Plugins opened through the pool get negative handles, allocated `-1`,
/// `-2`, ... in open order. Positive handles belong to the native ledger
/// and zero means nothing is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(i32);

impl Handle {
    pub const NONE: Handle = Handle(0);

    /// First handle handed out after a reset
    pub(crate) const FIRST_PLUGIN: Handle = Handle(-1);

    pub fn new(raw: i32) -> Self {
        Handle(raw)
    }

    pub fn get(self) -> i32 {
        self.0
    }

    /// Handle of the underlying native ledger
    pub fn is_native(self) -> bool {
        self.0 > 0
    }

    pub fn is_plugin(self) -> bool {
        self.0 < 0
    }

    pub(crate) fn next(self) -> Handle {
        Handle(self.0.saturating_sub(1))
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Handle> for i32 {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}
