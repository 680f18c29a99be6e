//! Privileged host side of the capability bridge.
//!
//! The sandboxed UI has no OS access of its own; this crate is what answers
//! its requests. Each operation in the catalog has a handler that validates
//! untrusted input, performs the privileged action (filesystem, shell,
//! git, dialogs, window control) and seals every possible outcome into a
//! structured reply — a fault in one handler never takes down the host or
//! leaks past the envelope. Unsolicited notifications flow the other way
//! through the [`events::EventHub`].
//!
//! [`pump::run_host`] drives one connection; `main.rs` serves it over
//! stdio with the [`platform::Headless`] seams.

#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod dispatch;
pub mod events;
pub mod handlers;
pub mod platform;
pub mod pump;

pub use config::{ConfigError, HostConfig};
pub use context::HostContext;
pub use events::{EventHub, EventStream};
pub use platform::{DialogOps, Headless, SystemOps, WindowOps};
pub use pump::run_host;
