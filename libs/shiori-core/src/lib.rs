//! # SHIORI Core
//!
//! Shared SHIORI/3.0 protocol types for the bridge and its hosts.
//!
//! This library provides the common foundation for:
//! - the engine-side bridge crate (parses requests, emits responses)
//! - host applications (build requests, read ghost descriptors)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    HOST APPLICATION                      │
//! │  Uses: RequestBuilder, GhostInfo, Response parsing      │
//! └──────────────────────────┬──────────────────────────────┘
//!                            │ SHIORI/3.0 (bytes over C ABI)
//! ┌──────────────────────────┴──────────────────────────────┐
//! │                    BRIDGE (cdylib)                       │
//! │  Uses: Request parsing, Response + ScriptBuilder        │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod charset;
mod error;
mod ghost;
mod protocol;
pub mod script;

pub use charset::*;
pub use error::*;
pub use ghost::*;
pub use protocol::*;

/// Re-export common types
pub mod prelude {
    pub use crate::charset::Charset;
    pub use crate::error::{Result, ShioriError};
    pub use crate::ghost::GhostInfo;
    pub use crate::protocol::{
        Method, Request, RequestBuilder, Response, StatusCode, PROTOCOL_VERSION,
    };
}
