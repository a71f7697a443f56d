//! C ABI surface
//!
//! The exported entry points a host loads from the cdylib. Success and
//! failure travel as `1`/`0` sentinels and null pointers; nothing here
//! panics across the boundary.
//!
//! Ownership rules:
//! - request buffers are borrowed for the duration of one call and never
//!   freed here;
//! - response buffers are allocated here, handed to the caller, and must
//!   come back through [`shiori_free_response`] exactly once;
//! - the strings from the getters are static and must never be freed.
//!
//! C ABI callers cannot hold a `Bridge` value, so this module owns the
//! single process-wide instance behind a mutex. That mutex is the
//! mutual-exclusion guard for concurrent callers; every entry point
//! takes it for its whole body.

use std::ffi::{CStr, CString};
use std::sync::Mutex;

use libc::{c_char, c_int, c_long, c_void};
use once_cell::sync::Lazy;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use shiori_core::{Result, ShioriError};

use crate::bridge::Bridge;
use crate::state::GhostHandle;

/// Process-wide bridge instance for C ABI callers
static BRIDGE: Lazy<Mutex<Bridge>> = Lazy::new(|| Mutex::new(Bridge::default()));

/// Static getter strings, NUL-terminated for C
static NAME_C: &str = concat!("shiori-bridge", "\0");
static VERSION_C: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

const TRUE: c_int = 1;
const FALSE: c_int = 0;

/// A bridge-allocated response buffer in transit to the caller.
///
/// Distinct from the static getter strings by construction: the only way
/// to produce a raw response pointer is through `into_raw`, and the only
/// way to release one is `from_raw` inside [`shiori_free_response`], so
/// both sides of the free use the same allocator.
#[derive(Debug)]
pub struct ResponseBuffer(CString);

impl ResponseBuffer {
    /// Take ownership of response wire bytes, adding the terminator
    pub fn from_wire(wire: Vec<u8>) -> Result<Self> {
        // Wire bytes are bridge-generated and contain no NUL; if that
        // ever breaks we refuse rather than hand out a short buffer.
        CString::new(wire)
            .map(Self)
            .map_err(|_| ShioriError::AllocationFailed)
    }

    /// Payload length in bytes, excluding the terminator
    pub fn len(&self) -> usize {
        self.0.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.as_bytes().is_empty()
    }

    /// Transfer ownership to the caller
    fn into_raw(self) -> *mut c_char {
        self.0.into_raw()
    }

    /// Reclaim ownership from the caller.
    ///
    /// # Safety
    /// `ptr` must have come from [`ResponseBuffer::into_raw`] and must
    /// not be used afterwards.
    unsafe fn from_raw(ptr: *mut c_char) -> Self {
        Self(unsafe { CString::from_raw(ptr) })
    }
}

/// Run a closure against the process-wide bridge
fn with_bridge<T>(f: impl FnOnce(&mut Bridge) -> T) -> Option<T> {
    match BRIDGE.lock() {
        Ok(mut bridge) => Some(f(&mut bridge)),
        Err(_) => {
            error!("bridge state lock poisoned");
            None
        }
    }
}

fn as_flag(result: Option<Result<()>>) -> c_int {
    match result {
        Some(Ok(())) => TRUE,
        _ => FALSE,
    }
}

/// Install the tracing subscriber once; later calls are no-ops
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

// ========== Lifecycle ==========

#[no_mangle]
pub extern "C" fn shiori_initialize() -> c_int {
    init_tracing();
    as_flag(with_bridge(|bridge| bridge.initialize()))
}

#[no_mangle]
pub extern "C" fn shiori_finalize() -> c_int {
    as_flag(with_bridge(|bridge| bridge.finalize()))
}

// ========== Configuration ==========

/// Record the ghost resource directory. The path is copied; the caller
/// keeps its buffer.
///
/// # Safety
/// `dir` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn shiori_set_directory(dir: *const c_char) -> c_int {
    if dir.is_null() {
        return FALSE;
    }

    let Ok(path) = unsafe { CStr::from_ptr(dir) }.to_str() else {
        warn!("set_directory: path is not valid UTF-8");
        return FALSE;
    };

    as_flag(with_bridge(|bridge| bridge.set_directory(path)))
}

#[no_mangle]
pub extern "C" fn shiori_set_encoding(code: c_int) -> c_int {
    as_flag(with_bridge(|bridge| bridge.set_encoding(code)))
}

// ========== Ghost attachment ==========

/// Attach a ghost. `h` is the host's opaque handle; the bridge records
/// its value as a tag and never dereferences or frees it.
#[no_mangle]
pub extern "C" fn shiori_load(h: *mut c_void, length: c_long) -> c_int {
    let handle = GhostHandle::from_raw(h as usize as u64);
    as_flag(with_bridge(|bridge| bridge.load(handle, length as i64)))
}

#[no_mangle]
pub extern "C" fn shiori_unload() -> c_int {
    as_flag(with_bridge(|bridge| bridge.unload()))
}

// ========== Request path ==========

/// Answer a request.
///
/// On entry `*len` is the request byte length; the request bytes in `req`
/// are borrowed for this call only. On success the return value is a
/// bridge-allocated, NUL-terminated response buffer, `*len` is the
/// payload byte length, and ownership transfers to the caller, who must
/// release it with [`shiori_free_response`] exactly once. On failure the
/// return value is null and `*len` is zero — never a partial buffer.
///
/// # Safety
/// `req` must point to at least `*len` readable bytes, and `len` must be
/// null or a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn shiori_request(req: *const c_char, len: *mut c_long) -> *mut c_char {
    if len.is_null() {
        return std::ptr::null_mut();
    }

    let request_len = unsafe { *len };
    if req.is_null() || request_len < 0 {
        unsafe { *len = 0 };
        return std::ptr::null_mut();
    }

    let raw = unsafe { std::slice::from_raw_parts(req as *const u8, request_len as usize) };
    let handle = GhostHandle::from_raw(req as usize as u64);

    let wire = with_bridge(|bridge| bridge.handle_request(handle, raw));

    let buffer = match wire {
        Some(Ok(wire)) => ResponseBuffer::from_wire(wire),
        Some(Err(e)) => {
            warn!(error = %e, "request refused");
            unsafe { *len = 0 };
            return std::ptr::null_mut();
        }
        None => {
            unsafe { *len = 0 };
            return std::ptr::null_mut();
        }
    };

    match buffer {
        Ok(buffer) => {
            unsafe { *len = buffer.len() as c_long };
            buffer.into_raw()
        }
        Err(_) => {
            unsafe { *len = 0 };
            std::ptr::null_mut()
        }
    }
}

/// Release a response buffer obtained from [`shiori_request`].
///
/// Null is tolerated. Passing any other pointer, or the same pointer
/// twice, is undefined behavior — this is the single matching release
/// operation for bridge-allocated responses.
///
/// # Safety
/// `ptr` must be null or a pointer previously returned by
/// [`shiori_request`] that has not been freed.
#[no_mangle]
pub unsafe extern "C" fn shiori_free_response(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { ResponseBuffer::from_raw(ptr) });
    }
}

// ========== Informational getters ==========

/// Bridge name. Static storage; the caller must not free it.
#[no_mangle]
pub extern "C" fn shiori_get_name() -> *const c_char {
    NAME_C.as_ptr() as *const c_char
}

/// Bridge version. Static storage; the caller must not free it.
#[no_mangle]
pub extern "C" fn shiori_get_version() -> *const c_char {
    VERSION_C.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_buffer_round_trip() {
        let buffer = ResponseBuffer::from_wire(b"SHIORI/3.0 204 No Content\r\n\r\n".to_vec())
            .unwrap();
        let expected = buffer.len();

        let ptr = buffer.into_raw();
        assert!(!ptr.is_null());

        let reclaimed = unsafe { ResponseBuffer::from_raw(ptr) };
        assert_eq!(reclaimed.len(), expected);
    }

    #[test]
    fn test_interior_nul_is_refused() {
        let result = ResponseBuffer::from_wire(b"bad\0bytes".to_vec());
        assert!(matches!(result, Err(ShioriError::AllocationFailed)));
    }

    #[test]
    fn test_getters_are_stable_and_terminated() {
        let name_a = shiori_get_name();
        let name_b = shiori_get_name();
        assert!(!name_a.is_null());
        assert_eq!(name_a, name_b);

        let name = unsafe { CStr::from_ptr(name_a) }.to_str().unwrap();
        assert_eq!(name, "shiori-bridge");

        let version = unsafe { CStr::from_ptr(shiori_get_version()) }
            .to_str()
            .unwrap();
        assert!(!version.is_empty());
    }

    // The exported entry points share one process-wide bridge, so the
    // whole lifecycle is exercised in a single sequential test.
    #[test]
    fn test_exported_lifecycle() {
        // Hard failures before initialize
        let raw = b"GET SHIORI/3.0\r\nID: OnBoot\r\n\r\n";
        let mut len = raw.len() as c_long;
        let ptr = unsafe { shiori_request(raw.as_ptr() as *const c_char, &mut len) };
        assert!(ptr.is_null());
        assert_eq!(len, 0);
        assert_eq!(shiori_unload(), FALSE);

        // Initialize is idempotent
        assert_eq!(shiori_initialize(), TRUE);
        assert_eq!(shiori_initialize(), TRUE);

        // Invalid arguments
        assert_eq!(unsafe { shiori_set_directory(std::ptr::null()) }, FALSE);
        assert_eq!(shiori_set_encoding(1252), FALSE);
        assert_eq!(shiori_set_encoding(65001), TRUE);

        let dir = CString::new("/ghosts/sample").unwrap();
        assert_eq!(unsafe { shiori_set_directory(dir.as_ptr()) }, TRUE);

        // Attach and ask for a boot greeting
        assert_eq!(shiori_load(0x10 as *mut c_void, 0), TRUE);

        let mut len = raw.len() as c_long;
        let ptr = unsafe { shiori_request(raw.as_ptr() as *const c_char, &mut len) };
        assert!(!ptr.is_null());

        let response = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
        assert_eq!(response.len() as c_long, len);
        assert!(response.starts_with("SHIORI/3.0 200 OK\r\n\r\n"));
        unsafe { shiori_free_response(ptr) };

        // Null length slot yields no data
        let ptr = unsafe { shiori_request(raw.as_ptr() as *const c_char, std::ptr::null_mut()) };
        assert!(ptr.is_null());

        assert_eq!(shiori_unload(), TRUE);
        assert_eq!(shiori_finalize(), TRUE);
        assert_eq!(shiori_finalize(), TRUE);
    }
}
