//SPDX-License-Identifier: MIT OR Apache-2.0

//! # Guardlog Procedural Macros
//!
//! This crate generates lock-guarded accessor pairs for types that keep their mutable state
//! inside a `guardlog::Guard`. It is re-exported from guardlog; depend on that crate instead.
//!
//! ## Architecture
//!
//! Each macro is invoked in item position inside an `impl` block and expands to two methods:
//! a getter named after the field and a setter named `set_<field>`. Both acquire the guard
//! through `Guard::synchronize`, so the generated code does not care which crate it lives in.
//!
//! ## Grammar
//!
//! ```text
//! guarded_field!(#[attrs]* vis? name: Type => guard(.segment)*)
//! deep_guarded_field!(#[attrs]* vis? name: Type => guard.owned(.segment)* (, delegate)?)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! # // ignore because: the macros need the guardlog runtime, see guardlog::Guard for a runnable version
//! impl Facility {
//!     // fn show_pid(&self) -> bool  /  fn set_show_pid(&self, value: bool)
//!     guarded_field!(pub show_pid: bool => state.display);
//!     // fn threshold(&self) -> Severity, calling raw.sink.level() under the guard
//!     deep_guarded_field!(pub threshold: Severity => state.sink, level);
//! }
//! ```
//!
//! ## Reentrancy
//!
//! The guard is not reentrant.  Code already running inside `synchronize` on the same
//! instance must touch the raw state directly; calling a generated accessor from there
//! deadlocks.

mod accessor;
mod parser;

use proc_macro::TokenStream;

/// Generates a getter/setter pair for a field stored in the guarded state.
///
/// The getter locks, clones the raw value and unlocks.  The setter locks, assigns and unlocks.
/// The field type must implement `Clone`.
///
/// ```ignore
/// # // ignore because: the macros need the guardlog runtime, see guardlog::Guard for a runnable version
/// guarded_field!(pub show_level: bool => state.display);
/// ```
#[proc_macro]
pub fn guarded_field(input: TokenStream) -> TokenStream {
    accessor::guarded_field_impl(input)
}

/// Generates a getter/setter pair that delegates into an object owned by the guarded state.
///
/// The getter locks this instance's guard and then calls `owned.delegate()`; the setter calls
/// `owned.set_delegate(value)`.  `delegate` defaults to the exposed name.
///
/// The owned object must not call back into the outer instance's accessors, or the two
/// locks can be taken in opposite orders.
///
/// ```ignore
/// # // ignore because: the macros need the guardlog runtime, see guardlog::Guard for a runnable version
/// deep_guarded_field!(pub program_name: Option<String> => state.sink);
/// deep_guarded_field!(pub threshold: Severity => state.sink, level);
/// ```
#[proc_macro]
pub fn deep_guarded_field(input: TokenStream) -> TokenStream {
    accessor::deep_guarded_field_impl(input)
}
