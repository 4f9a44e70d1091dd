//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! The transport collaborator crosses the boundary as `FfiTransportOps`: an
//! opaque context pointer plus a table of function pointers, the C rendition
//! of the `Transport` trait the core consumes. `VtableTransport` adapts the
//! table to the trait and guarantees `destroy` runs exactly once — when the
//! adapter drops, whether the owning request was freed normally or its
//! construction failed halfway.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_void};

use fetch_core::{Method, Step, Transport, TransportError};

/// `step` return value: more data may follow.
pub const FETCH_STEP_PENDING: c_int = 0;
/// `step` return value: the exchange is complete.
pub const FETCH_STEP_DONE: c_int = 1;
/// `step` return value: the exchange failed.
pub const FETCH_STEP_ERROR: c_int = -1;

/// `set_method` argument: HTTP GET, the only method this library drives.
pub const FETCH_METHOD_GET: c_int = 0;

/// Transport operations supplied by the caller.
///
/// `ctx` is the caller's exchange handle; every operation receives it back.
/// Configuration operations (`set_uri`, `set_method`, `prepare`) return 0 on
/// success and nonzero on failure. `get_header` returns a pointer owned by
/// the transport, valid until the next operation, or NULL when the response
/// has no such header. `get_body` returns the chunk made available by the
/// most recent `step` (valid until the next `step`, NULL when no data this
/// step) and `get_body_len` its length in bytes. `destroy` releases `ctx`;
/// the library calls it exactly once per handle it was given.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct FfiTransportOps {
    pub ctx: *mut c_void,
    pub set_uri: unsafe extern "C" fn(ctx: *mut c_void, uri: *const c_char) -> c_int,
    pub set_method: unsafe extern "C" fn(ctx: *mut c_void, method: c_int) -> c_int,
    pub set_header:
        unsafe extern "C" fn(ctx: *mut c_void, name: *const c_char, value: *const c_char),
    pub get_header: unsafe extern "C" fn(ctx: *mut c_void, name: *const c_char) -> *const c_char,
    pub prepare: unsafe extern "C" fn(ctx: *mut c_void) -> c_int,
    pub step: unsafe extern "C" fn(ctx: *mut c_void) -> c_int,
    pub get_body: unsafe extern "C" fn(ctx: *mut c_void) -> *const u8,
    pub get_body_len: unsafe extern "C" fn(ctx: *mut c_void) -> c_int,
    pub status_code: unsafe extern "C" fn(ctx: *mut c_void) -> c_int,
    pub destroy: unsafe extern "C" fn(ctx: *mut c_void),
}

/// Opaque handle to a request. C callers receive a pointer to this and pass
/// it back into every FFI function.
pub struct FfiRequest {
    pub(crate) inner: fetch_core::Request,
}

/// Adapts a caller-supplied vtable to the core's `Transport` trait.
pub(crate) struct VtableTransport {
    ops: FfiTransportOps,
}

impl VtableTransport {
    pub(crate) fn new(ops: FfiTransportOps) -> Self {
        VtableTransport { ops }
    }
}

impl Transport for VtableTransport {
    fn set_uri(&mut self, uri: &str) -> Result<(), TransportError> {
        let uri =
            CString::new(uri).map_err(|_| TransportError("uri contains NUL".to_string()))?;
        let rc = unsafe { (self.ops.set_uri)(self.ops.ctx, uri.as_ptr()) };
        if rc == 0 {
            Ok(())
        } else {
            Err(TransportError(format!("set_uri returned {rc}")))
        }
    }

    fn set_method(&mut self, method: Method) -> Result<(), TransportError> {
        let code = match method {
            Method::Get => FETCH_METHOD_GET,
        };
        let rc = unsafe { (self.ops.set_method)(self.ops.ctx, code) };
        if rc == 0 {
            Ok(())
        } else {
            Err(TransportError(format!("set_method returned {rc}")))
        }
    }

    fn set_header(&mut self, name: &str, value: &str) {
        let (Ok(name), Ok(value)) = (CString::new(name), CString::new(value)) else {
            return;
        };
        unsafe { (self.ops.set_header)(self.ops.ctx, name.as_ptr(), value.as_ptr()) }
    }

    fn header(&self, name: &str) -> Option<String> {
        let name = CString::new(name).ok()?;
        let ptr = unsafe { (self.ops.get_header)(self.ops.ctx, name.as_ptr()) };
        if ptr.is_null() {
            return None;
        }
        // Copy out immediately; the pointer is only valid until the next op.
        Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
    }

    fn prepare(&mut self) -> Result<(), TransportError> {
        let rc = unsafe { (self.ops.prepare)(self.ops.ctx) };
        if rc == 0 {
            Ok(())
        } else {
            Err(TransportError(format!("prepare returned {rc}")))
        }
    }

    fn step(&mut self) -> Step {
        match unsafe { (self.ops.step)(self.ops.ctx) } {
            FETCH_STEP_PENDING => Step::Pending,
            FETCH_STEP_DONE => Step::Done,
            _ => Step::Failed,
        }
    }

    fn chunk(&self) -> Option<&[u8]> {
        let ptr = unsafe { (self.ops.get_body)(self.ops.ctx) };
        if ptr.is_null() {
            return None;
        }
        let len = unsafe { (self.ops.get_body_len)(self.ops.ctx) };
        let len = usize::try_from(len).unwrap_or(0);
        Some(unsafe { std::slice::from_raw_parts(ptr, len) })
    }

    fn status_code(&self) -> u16 {
        let code = unsafe { (self.ops.status_code)(self.ops.ctx) };
        u16::try_from(code).unwrap_or(0)
    }
}

impl Drop for VtableTransport {
    fn drop(&mut self) {
        unsafe { (self.ops.destroy)(self.ops.ctx) }
    }
}
