//! # SHIORI Bridge
//!
//! SHIORI/3.0 protocol bridge between a dialog engine and its host.
//!
//! ## Features
//!
//! - **Lifecycle**: initialize / finalize, idempotent both ways
//! - **Ghost Attachment**: load / unload with descriptor reading
//! - **Request Path**: parse, dispatch, and answer SHIORI/3.0 requests
//! - **Ownership Contract**: allocate-here / free-here response buffers
//!   across the C ABI, distinct from static getter strings
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      HOST APPLICATION                        │
//! └───────┬──────────────────────────────────────────▲──────────┘
//!         │ shiori_request(bytes, &len)              │ response buffer
//! ┌───────┴──────────────────────────────────────────┴──────────┐
//! │                     BRIDGE (this crate)                      │
//! │  ┌──────────┐   ┌──────────┐   ┌───────────┐                │
//! │  │   ffi    │ → │  Bridge  │ → │ Responder │ → dialog sets  │
//! │  │ (C ABI)  │   │ (state)  │   │ (events)  │                │
//! │  └──────────┘   └──────────┘   └───────────┘                │
//! │        shiori-core: Request / Response / SakuraScript        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `Bridge` type is an ordinary value for Rust callers and tests;
//! the `ffi` module wraps one process-wide instance in a mutex for
//! C ABI hosts, which cannot carry a handle object.

mod bridge;
mod config;
mod dialog;
mod ffi;
mod responder;
mod state;

pub use bridge::{Bridge, NAME, VERSION};
pub use config::BridgeConfig;
pub use ffi::ResponseBuffer;
pub use responder::Responder;
pub use state::{GhostHandle, Phase};
