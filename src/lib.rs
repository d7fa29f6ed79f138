//! Session gate and bootstrap sequencing for the szachus WASM client.
//!
//! This crate is compiled to WebAssembly and loaded by the game page before
//! the game module itself. It decides from the stored credential, without a
//! network round-trip, whether the visitor may play; if not it reveals the
//! login form and runs the login-then-register protocol. On the first
//! success it starts the embedded game exactly once.
//!
//! Browser glue is behind the `hydrate` feature. Everything else runs and is
//! tested natively against the capability traits.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Local credential decoding and expiry check |
//! | [`controller`] | Bootstrap state machine and submission handling |
//! | [`auth`] | Login/registration fallback protocol and HTTP transport |
//! | [`launcher`] | At-most-once init + run of the embedded application |
//! | [`store`] | Credential slot capability |
//! | [`ui`] | Form and start-signal capability |
//! | [`clock`] | Wall-clock capability |
//! | [`config`] | Page-provided overrides for well-known names |
//! | [`error`] | Error taxonomy |
//! | [`consts`] | Well-known names (storage key, endpoints, DOM ids) |

pub mod auth;
pub mod clock;
pub mod config;
pub mod consts;
pub mod controller;
pub mod error;
pub mod launcher;
pub mod session;
pub mod store;
pub mod ui;

#[cfg(feature = "hydrate")]
pub mod boot;
#[cfg(feature = "hydrate")]
pub mod dom;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use controller::{BootstrapController, BootstrapPhase, SubmitOutcome};
pub use error::GateError;
pub use session::{SessionState, is_playable};
