//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Requests go out as C structs the host can execute directly; everything the
//! host only needs to render (snapshots, notices) goes out as JSON strings.
//! Conversion functions live here to keep `lib.rs` focused on the
//! `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use student_core::{App, HttpMethod, HttpResponse, Outbound};

/// Opaque handle to an `App`. C callers receive a pointer to this and pass it
/// back into every FFI function.
pub struct FfiApp {
    pub(crate) inner: App,
}

/// Copy a Rust string into a caller-owned C string. Interior NULs are dropped.
pub(crate) fn to_c_string(s: impl Into<String>) -> *mut c_char {
    let s: String = s.into();
    CString::new(s.replace('\0', ""))
        .unwrap_or_default()
        .into_raw()
}

/// Borrow a caller-provided C string, treating null and invalid UTF-8 as `None`.
pub(crate) fn from_c_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: student_core::HttpRequest) -> Self {
        let body = match req.body {
            Some(b) => to_c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: to_c_string(k),
                    value: to_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        FfiHttpRequest {
            method: req.method.into(),
            path: to_c_string(req.path),
            headers,
            headers_len,
            body,
        }
    }

    /// Release every allocation owned by this request.
    ///
    /// # Safety
    /// The pointers must have been produced by `from_core` and not freed yet.
    pub(crate) unsafe fn free_fields(&mut self) {
        if !self.path.is_null() {
            drop(unsafe { CString::from_raw(self.path) });
            self.path = std::ptr::null_mut();
        }
        if !self.body.is_null() {
            drop(unsafe { CString::from_raw(self.body) });
            self.body = std::ptr::null_mut();
        }
        if !self.headers.is_null() && self.headers_len > 0 {
            let slice = std::ptr::slice_from_raw_parts_mut(self.headers, self.headers_len as usize);
            let headers = unsafe { Box::from_raw(slice) };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
            self.headers = std::ptr::null_mut();
            self.headers_len = 0;
        }
    }
}

/// A request the host must execute, tagged with the ticket to complete it with.
#[repr(C)]
pub struct FfiOutbound {
    pub ticket: u64,
    pub request: FfiHttpRequest,
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing a request and
/// passes a pointer to `student_app_complete`. The FFI layer reads but does
/// not free these fields. `body` and `url` may be null.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
    pub url: *const c_char,
}

impl FfiHttpResponse {
    pub(crate) fn to_core(&self) -> HttpResponse {
        let mut response = HttpResponse::new(self.status, from_c_str(self.body).unwrap_or(""));
        response.url = from_c_str(self.url).map(str::to_string);
        response
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiOutboundList`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NullArg = 1,
    InvalidUtf8 = 2,
    InvalidJson = 3,
    Panic = 4,
}

/// Result envelope for every call that can issue requests.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `items`
/// points to `len` outbound requests (null when `len` is 0).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `items` is null.
#[repr(C)]
pub struct FfiOutboundList {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub items: *mut FfiOutbound,
    pub len: u32,
}

impl FfiOutboundList {
    pub(crate) fn ok(outbound: Vec<Outbound>) -> *mut Self {
        let len = outbound.len() as u32;
        let items = if outbound.is_empty() {
            std::ptr::null_mut()
        } else {
            let items: Box<[FfiOutbound]> = outbound
                .into_iter()
                .map(|o| FfiOutbound {
                    ticket: o.ticket.0,
                    request: FfiHttpRequest::from_core(o.request),
                })
                .collect();
            Box::into_raw(items) as *mut FfiOutbound
        };
        Box::into_raw(Box::new(FfiOutboundList {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            items,
            len,
        }))
    }

    pub(crate) fn error(code: FfiErrorCode, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiOutboundList {
            error_code: code,
            error_message: to_c_string(msg),
            items: std::ptr::null_mut(),
            len: 0,
        }))
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, &format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, msg)
    }
}
