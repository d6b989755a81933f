// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Single logical execution context.
//!
//! Service state lives in `Cell`/`RefCell` and is only touched from the
//! thread that built the service. Network calls run elsewhere and their
//! results are awaited back on this thread, so no locks are needed.

use std::thread::{self, ThreadId};

/// Thread affinity of a service.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionContext {
    owner: ThreadId,
}

impl ExecutionContext {
    /// Bind to the calling thread.
    pub fn current() -> Self {
        Self {
            owner: thread::current().id(),
        }
    }

    /// Whether the calling thread is the owning context.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Panic if `operation` is invoked from a foreign thread.
    #[track_caller]
    pub fn assert_current(&self, operation: &str) {
        assert!(
            self.is_current(),
            "{operation} must be called from the owning execution context"
        );
    }
}
