//! C-ABI wrapper around `student-core`.
//!
//! # Overview
//! Exposes the student admin app through `extern "C"` functions so a native
//! UI written in any language with a C FFI can drive it: the host sends user
//! actions as JSON, executes the HTTP requests the app hands back, reports
//! each outcome, and renders the JSON snapshot.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Calls that may issue requests return one `FfiOutboundList` envelope
//!   carrying either the requests or an error code and message.
//! - The C caller owns all returned pointers and must call the matching
//!   `student_free_*` function to release them.

pub mod types;

use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use student_core::{Action, App, AppConfig, Ticket, TransportError};

use types::*;

// ---------------------------------------------------------------------------
// App lifecycle
// ---------------------------------------------------------------------------

/// Create a new app whose requests target `base_url`.
///
/// An empty `base_url` produces relative request paths.
/// Returns null if `base_url` is null or not UTF-8, or if an internal panic
/// occurs. The caller must free the returned pointer with `student_app_free`.
#[unsafe(no_mangle)]
pub extern "C" fn student_app_new(base_url: *const c_char) -> *mut FfiApp {
    catch_unwind(|| match from_c_str(base_url) {
        Some(url) => Box::into_raw(Box::new(FfiApp {
            inner: App::new(AppConfig::new(url)),
        })),
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a new app from a JSON `AppConfig` (`base_url`, `info_path`,
/// `page_size`; all optional).
///
/// Returns null on null input, invalid JSON, or panic.
#[unsafe(no_mangle)]
pub extern "C" fn student_app_new_with_config(config_json: *const c_char) -> *mut FfiApp {
    catch_unwind(|| {
        let Some(raw) = from_c_str(config_json) else {
            return std::ptr::null_mut();
        };
        match serde_json::from_str::<AppConfig>(raw) {
            Ok(config) => Box::into_raw(Box::new(FfiApp {
                inner: App::new(config),
            })),
            Err(err) => {
                tracing::warn!(%err, "rejected app config");
                std::ptr::null_mut()
            }
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free an app created by `student_app_new*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn student_app_free(app: *mut FfiApp) {
    if !app.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(app) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Driving the app
// ---------------------------------------------------------------------------

/// Run `f` against the app behind `app`, converting null pointers and panics
/// into error envelopes.
fn with_app(
    app: *mut FfiApp,
    what: &str,
    f: impl FnOnce(&mut App) -> *mut FfiOutboundList,
) -> *mut FfiOutboundList {
    if app.is_null() {
        return FfiOutboundList::null_arg("app");
    }
    catch_unwind(AssertUnwindSafe(|| {
        let app = unsafe { &mut *app };
        f(&mut app.inner)
    }))
    .unwrap_or_else(|_| FfiOutboundList::panic(&format!("panic in {what}")))
}

/// Issue the initial list fetch. Later calls return an empty list.
#[unsafe(no_mangle)]
pub extern "C" fn student_app_mount(app: *mut FfiApp) -> *mut FfiOutboundList {
    with_app(app, "student_app_mount", |app| FfiOutboundList::ok(app.mount()))
}

/// Apply a user action given as JSON, e.g. `{"type":"request_delete","id":3}`.
#[unsafe(no_mangle)]
pub extern "C" fn student_app_dispatch(
    app: *mut FfiApp,
    action_json: *const c_char,
) -> *mut FfiOutboundList {
    with_app(app, "student_app_dispatch", |app| {
        if action_json.is_null() {
            return FfiOutboundList::null_arg("action_json");
        }
        let Some(raw) = from_c_str(action_json) else {
            return FfiOutboundList::error(FfiErrorCode::InvalidUtf8, "action is not valid UTF-8");
        };
        match serde_json::from_str::<Action>(raw) {
            Ok(action) => FfiOutboundList::ok(app.dispatch(action)),
            Err(err) => FfiOutboundList::error(FfiErrorCode::InvalidJson, &err.to_string()),
        }
    })
}

/// Report the HTTP response received for `ticket`.
#[unsafe(no_mangle)]
pub extern "C" fn student_app_complete(
    app: *mut FfiApp,
    ticket: u64,
    response: *const FfiHttpResponse,
) -> *mut FfiOutboundList {
    with_app(app, "student_app_complete", |app| {
        if response.is_null() {
            return FfiOutboundList::null_arg("response");
        }
        let response = unsafe { &*response }.to_core();
        FfiOutboundList::ok(app.complete(Ticket(ticket), Ok(response)))
    })
}

/// Report that the request for `ticket` never produced a response.
/// `reason` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn student_app_fail(
    app: *mut FfiApp,
    ticket: u64,
    reason: *const c_char,
) -> *mut FfiOutboundList {
    with_app(app, "student_app_fail", |app| {
        let reason = from_c_str(reason).unwrap_or("request failed").to_string();
        FfiOutboundList::ok(app.complete(Ticket(ticket), Err(TransportError(reason))))
    })
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Current view state as JSON. Returns null if `app` is null or on panic.
/// Free with `student_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn student_app_snapshot(app: *const FfiApp) -> *mut c_char {
    if app.is_null() {
        return std::ptr::null_mut();
    }
    catch_unwind(AssertUnwindSafe(|| {
        let app = unsafe { &*app };
        match serde_json::to_string(&app.inner.snapshot()) {
            Ok(json) => to_c_string(json),
            Err(_) => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Drain pending notices as a JSON array. Returns null if `app` is null or on
/// panic. Free with `student_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn student_app_take_notices(app: *mut FfiApp) -> *mut c_char {
    if app.is_null() {
        return std::ptr::null_mut();
    }
    catch_unwind(AssertUnwindSafe(|| {
        let app = unsafe { &mut *app };
        let notices = app.inner.notifier_mut().take();
        match serde_json::to_string(&notices) {
            Ok(json) => to_c_string(json),
            Err(_) => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiOutboundList` returned by any driving function, including the
/// requests it carries. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn student_free_outbound_list(list: *mut FfiOutboundList) {
    if list.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let list = unsafe { Box::from_raw(list) };
        if !list.error_message.is_null() {
            drop(unsafe { std::ffi::CString::from_raw(list.error_message) });
        }
        if !list.items.is_null() && list.len > 0 {
            let slice = std::ptr::slice_from_raw_parts_mut(list.items, list.len as usize);
            let mut items = unsafe { Box::from_raw(slice) };
            for item in items.iter_mut() {
                unsafe { item.request.free_fields() };
            }
        }
    }));
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn student_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { std::ffi::CString::from_raw(s) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
