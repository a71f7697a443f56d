//! The protocol bridge
//!
//! A `Bridge` owns the engine-side state the SHIORI entry points act on:
//! lifecycle phase, configured ghost directory, charset selection, and
//! the attached ghost. It is a plain value the caller constructs, so
//! tests can run as many independent bridges as they like; the single
//! process-wide instance the C ABI needs lives in the `ffi` module.
//!
//! All operations are synchronous and take `&mut self`; one in-flight
//! call at a time is the contract.

use std::path::PathBuf;

use shiori_core::{Charset, GhostInfo, Request, Response, Result, ShioriError};
use tracing::{debug, info, warn};

use crate::config::BridgeConfig;
use crate::responder::Responder;
use crate::state::{GhostHandle, Phase};

/// Bridge name reported by `name()`
pub const NAME: &str = "shiori-bridge";

/// Bridge version reported by `version()`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine-side protocol bridge
#[derive(Debug)]
pub struct Bridge {
    config: BridgeConfig,
    phase: Phase,
    ghost_dir: Option<PathBuf>,
    charset: Charset,
    ghost: Option<GhostInfo>,
    attached: Option<GhostHandle>,
    responder: Responder,
}

impl Bridge {
    /// Create an uninitialized bridge
    pub fn new(config: BridgeConfig) -> Self {
        let charset = config.charset;
        Self {
            config,
            phase: Phase::Uninitialized,
            ghost_dir: None,
            charset,
            ghost: None,
            attached: None,
            responder: Responder::new(),
        }
    }

    // ========== Lifecycle ==========

    /// Initialize the engine. Idempotent: initializing an initialized
    /// bridge is a no-op success.
    pub fn initialize(&mut self) -> Result<()> {
        if self.phase.is_initialized() {
            debug!("initialize: already initialized");
            return Ok(());
        }

        self.phase = Phase::Initialized;
        info!(version = VERSION, "bridge initialized");
        Ok(())
    }

    /// Release engine-held resources and return to `Uninitialized`.
    /// Idempotent and safe before any `initialize`. The configured
    /// directory and charset survive; they are configuration, not
    /// engine-held state.
    pub fn finalize(&mut self) -> Result<()> {
        if !self.phase.is_initialized() {
            debug!("finalize: not initialized, nothing to do");
            return Ok(());
        }

        self.ghost = None;
        self.attached = None;
        self.phase = Phase::Uninitialized;
        info!("bridge finalized");
        Ok(())
    }

    // ========== Configuration ==========

    /// Record the ghost resource directory.
    ///
    /// An empty path is rejected. A path longer than the configured
    /// bound is truncated at a character boundary; the stored value
    /// never exceeds the bound.
    pub fn set_directory(&mut self, path: &str) -> Result<()> {
        if path.is_empty() {
            return Err(ShioriError::InvalidPath("empty path".into()));
        }

        let bounded = Self::bound_path(path, self.config.max_directory_bytes);
        if bounded.len() < path.len() {
            warn!(
                given = path.len(),
                stored = bounded.len(),
                "ghost directory path truncated to bound"
            );
        }

        let dir = PathBuf::from(bounded);
        debug!(dir = %dir.display(), "ghost directory set");
        self.ghost_dir = Some(dir);
        Ok(())
    }

    /// Record the text encoding the host will use on the wire
    pub fn set_encoding(&mut self, code: i32) -> Result<()> {
        let charset = Charset::from_code(code).ok_or(ShioriError::UnknownCharset(code))?;
        self.charset = charset;
        debug!(%charset, "encoding set");
        Ok(())
    }

    /// Truncate a path to at most `max` bytes at a character boundary
    fn bound_path(path: &str, max: usize) -> &str {
        if path.len() <= max {
            return path;
        }
        let mut end = max;
        while !path.is_char_boundary(end) {
            end -= 1;
        }
        &path[..end]
    }

    // ========== Ghost attachment ==========

    /// Attach a ghost. The handle belongs to the host and is only
    /// recorded, never dereferenced; `length` is advisory.
    ///
    /// Reads the ghost descriptor from the configured directory when one
    /// is present. A missing descriptor is logged and tolerated unless
    /// the configuration demands it.
    pub fn load(&mut self, handle: GhostHandle, length: i64) -> Result<()> {
        if !self.phase.is_initialized() {
            return Err(ShioriError::NotInitialized);
        }

        if self.phase.accepts_requests() {
            info!(%handle, "load while loaded: replacing attachment");
        }

        self.ghost = match &self.ghost_dir {
            Some(dir) => match GhostInfo::from_directory(dir) {
                Ok(info) => {
                    info!(ghost = %info.name, "ghost descriptor read");
                    Some(info)
                }
                Err(e) if self.config.require_descriptor => return Err(e),
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "no usable ghost descriptor");
                    None
                }
            },
            None => None,
        };

        self.attached = Some(handle);
        self.phase = Phase::Loaded;
        info!(%handle, length, "ghost attached");
        Ok(())
    }

    /// Detach the current ghost. Fails when uninitialized; detaching
    /// with nothing attached is a no-op success.
    pub fn unload(&mut self) -> Result<()> {
        if !self.phase.is_initialized() {
            return Err(ShioriError::NotInitialized);
        }

        if self.attached.take().is_some() {
            info!("ghost detached");
        }
        self.ghost = None;
        self.phase = Phase::Initialized;
        Ok(())
    }

    // ========== Request path ==========

    /// Answer a raw request, returning the response wire bytes.
    ///
    /// - Uninitialized: hard error, no data is ever produced.
    /// - Initialized but not loaded: a `400 Bad Request` wire response —
    ///   an out-of-order request gets a protocol error, not garbage.
    /// - Unparseable or non-UTF-8 input: a `400` (or `500`) wire response.
    pub fn handle_request(&mut self, handle: GhostHandle, raw: &[u8]) -> Result<Vec<u8>> {
        if !self.phase.is_initialized() {
            return Err(ShioriError::NotInitialized);
        }

        if !self.phase.accepts_requests() {
            warn!("request before load");
            return Ok(self.refused(ShioriError::NotLoaded));
        }

        if let Some(attached) = self.attached {
            if attached != handle {
                // The bridge only forwards handles; a mismatch is the
                // host's business, not ours to reject.
                warn!(%attached, got = %handle, "request handle differs from loaded handle");
            }
        }

        let Ok(text) = std::str::from_utf8(raw) else {
            warn!(len = raw.len(), charset = %self.charset, "request is not valid UTF-8");
            return Ok(self.refused(ShioriError::MalformedRequest("not UTF-8".into())));
        };

        let response = match Request::parse(text) {
            Ok(request) => {
                debug!(
                    method = request.method.as_str(),
                    event = request.id.as_deref().unwrap_or("-"),
                    "request"
                );
                self.responder.respond(&request, self.ghost.as_ref())
            }
            Err(e) => {
                warn!(error = %e, "request rejected");
                self.refusal(e)
            }
        };

        Ok(response.to_wire())
    }

    fn refused(&self, error: ShioriError) -> Vec<u8> {
        self.refusal(error).to_wire()
    }

    /// Build the wire-level refusal for a request-path error
    fn refusal(&self, error: ShioriError) -> Response {
        match error.status() {
            shiori_core::StatusCode::BadRequest => Response::bad_request(),
            _ => Response::server_error(error.to_string()),
        }
        .with_header("Sender", &self.config.sender)
    }

    // ========== Introspection ==========

    /// Bridge name; a static string the caller never frees
    pub fn name(&self) -> &'static str {
        NAME
    }

    /// Bridge version; a static string the caller never frees
    pub fn version(&self) -> &'static str {
        VERSION
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Configured ghost directory
    pub fn directory(&self) -> Option<&std::path::Path> {
        self.ghost_dir.as_deref()
    }

    /// Selected charset
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Descriptor of the attached ghost, when one was read
    pub fn ghost(&self) -> Option<&GhostInfo> {
        self.ghost.as_ref()
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new(BridgeConfig::default())
    }
}
