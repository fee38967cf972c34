// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Workflow engine for the Travel Request Portal.
//!
//! This crate turns commands (submit, decide, edit, pay, withdraw) into
//! validated transitions over a single visit request. Each successful
//! transition yields the updated request plus exactly one audit event.
//! The engine is pure: callers supply the current request, the clock
//! value, and the actor, and persist the result themselves.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

pub use apply::{apply, apply_submit};
pub use command::Command;
pub use error::CoreError;
pub use state::{TransitionResult, request_snapshot};
