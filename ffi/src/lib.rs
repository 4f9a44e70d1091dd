//! C-ABI wrapper around `fetch-core`.
//!
//! # Overview
//! Exposes the synchronous GET request surface through `extern "C"`
//! functions: create a request against a URI, attach headers, execute to
//! completion, and read back headers and cookie values. The caller supplies
//! the transport as a vtable (`FfiTransportOps`), so any C HTTP backend can
//! sit underneath without this library linking against it.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - The transport context is destroyed exactly once, on `fetch_request_free`
//!   or on any `fetch_request_new` failure path.
//! - `fetch_request_execute` hands the caller an owned, NUL-terminated,
//!   binary-safe body buffer; the reported length never counts the
//!   terminator. `fetch_body_free` releases it.
//! - `fetch_request_get_header` / `fetch_request_get_cookie` copy into a
//!   caller buffer with snprintf semantics (truncate to `maxlen - 1` bytes
//!   plus NUL) and reject bad arguments before the transport is touched.

pub mod types;

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::panic::{catch_unwind, AssertUnwindSafe};

use types::*;

/// Create a request bound to `uri`, taking ownership of the transport
/// context in `ops`.
///
/// Returns NULL if `uri` is NULL or empty, if the transport refuses the URI
/// or the GET method, or if an internal panic occurs. On every failure path
/// the transport context is destroyed before returning. The caller must free
/// the returned pointer with `fetch_request_free`.
#[unsafe(no_mangle)]
pub extern "C" fn fetch_request_new(
    uri: *const c_char,
    ops: FfiTransportOps,
) -> *mut FfiRequest {
    catch_unwind(|| {
        // The adapter owns the context from here on; any early return drops
        // it and destroys the handle.
        let transport = VtableTransport::new(ops);
        if uri.is_null() {
            return std::ptr::null_mut();
        }
        let uri = unsafe { CStr::from_ptr(uri) }.to_str().unwrap_or("");
        match fetch_core::Request::new(uri, Box::new(transport)) {
            Ok(request) => Box::into_raw(Box::new(FfiRequest { inner: request })),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a request created by `fetch_request_new`, destroying its transport
/// context. Safe to call with NULL; must be called at most once per request.
#[unsafe(no_mangle)]
pub extern "C" fn fetch_request_free(request: *mut FfiRequest) {
    if !request.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(request) });
        }));
    }
}

/// Execute the request to completion.
///
/// On success returns 0 and fills all three outputs: the HTTP status code,
/// an owned NUL-terminated body buffer, and the exact body length excluding
/// the terminator. The caller owns the buffer and must release it with
/// `fetch_body_free`. On failure returns -1 and leaves the outputs untouched.
#[unsafe(no_mangle)]
pub extern "C" fn fetch_request_execute(
    request: *mut FfiRequest,
    status: *mut c_int,
    body: *mut *mut c_char,
    len: *mut c_int,
) -> c_int {
    catch_unwind(AssertUnwindSafe(|| {
        if request.is_null() || status.is_null() || body.is_null() || len.is_null() {
            return -1;
        }
        let request = unsafe { &mut *request };
        match request.inner.execute() {
            Ok(response) => {
                let status_code = response.status();
                let body_len = response.len();
                let boxed: Box<[u8]> = response.into_terminated().into_boxed_slice();
                unsafe {
                    *status = c_int::from(status_code);
                    *body = Box::into_raw(boxed) as *mut c_char;
                    *len = body_len as c_int;
                }
                0
            }
            Err(_) => -1,
        }
    }))
    .unwrap_or(-1)
}

/// Free a body buffer returned by `fetch_request_execute`. `len` must be the
/// length reported by that call. Safe to call with NULL.
#[unsafe(no_mangle)]
pub extern "C" fn fetch_body_free(body: *mut c_char, len: c_int) {
    if body.is_null() || len < 0 {
        return;
    }
    let _ = catch_unwind(|| {
        // The allocation is len body bytes plus the terminator.
        let total = len as usize + 1;
        let slice = std::ptr::slice_from_raw_parts_mut(body as *mut u8, total);
        drop(unsafe { Box::from_raw(slice) });
    });
}

/// Attach a request header. Silently does nothing if any argument is NULL,
/// matching the permissive header-set contract.
#[unsafe(no_mangle)]
pub extern "C" fn fetch_request_set_header(
    request: *mut FfiRequest,
    name: *const c_char,
    value: *const c_char,
) {
    if request.is_null() || name.is_null() || value.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let request = unsafe { &mut *request };
        let name = unsafe { CStr::from_ptr(name) }.to_str().unwrap_or("");
        let value = unsafe { CStr::from_ptr(value) }.to_str().unwrap_or("");
        let _ = request.inner.set_header(name, value);
    }));
}

/// Apply the fixed browser-profile header set. Safe to call with NULL.
#[unsafe(no_mangle)]
pub extern "C" fn fetch_request_set_default_headers(request: *mut FfiRequest) {
    if request.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let request = unsafe { &mut *request };
        request.inner.apply_default_headers();
    }));
}

/// Read a response header into `output`, truncated to `maxlen - 1` bytes
/// plus a NUL terminator.
///
/// Returns `output` on success. Returns NULL, without touching the
/// transport, if `request`, `name`, or `output` is NULL or `maxlen <= 0`,
/// and returns NULL if the response has no such header.
#[unsafe(no_mangle)]
pub extern "C" fn fetch_request_get_header(
    request: *const FfiRequest,
    name: *const c_char,
    output: *mut c_char,
    maxlen: c_int,
) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        if request.is_null() || name.is_null() || output.is_null() || maxlen <= 0 {
            return std::ptr::null_mut();
        }
        let request = unsafe { &*request };
        let name = unsafe { CStr::from_ptr(name) }.to_str().unwrap_or("");
        match request.inner.header(name) {
            Ok(value) => unsafe { copy_truncated(&value, output, maxlen) },
            Err(_) => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Extract a named cookie value from the response's `Set-Cookie` header into
/// `output`, truncated like `fetch_request_get_header`.
///
/// Returns NULL on bad arguments (transport untouched), when the response
/// has no `Set-Cookie` header, or when no cookie with that name is present.
#[unsafe(no_mangle)]
pub extern "C" fn fetch_request_get_cookie(
    request: *const FfiRequest,
    name: *const c_char,
    output: *mut c_char,
    maxlen: c_int,
) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        if request.is_null() || name.is_null() || output.is_null() || maxlen <= 0 {
            return std::ptr::null_mut();
        }
        let request = unsafe { &*request };
        let name = unsafe { CStr::from_ptr(name) }.to_str().unwrap_or("");
        match request.inner.cookie(name) {
            Ok(value) => unsafe { copy_truncated(&value, output, maxlen) },
            Err(_) => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Copy `value` into `output` with snprintf semantics: at most `maxlen - 1`
/// bytes plus a NUL terminator.
///
/// `maxlen` must be positive and `output` must point to at least `maxlen`
/// writable bytes.
unsafe fn copy_truncated(value: &str, output: *mut c_char, maxlen: c_int) -> *mut c_char {
    let n = value.len().min(maxlen as usize - 1);
    std::ptr::copy_nonoverlapping(value.as_ptr(), output as *mut u8, n);
    *output.add(n) = 0;
    output
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
