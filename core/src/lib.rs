//! Headless core of the student admin client.
//!
//! # Overview
//! Builds `HttpRequest` values and consumes `HttpResponse` values without
//! touching the network (host-does-IO pattern). On top of the stateless API
//! client sit the view models of the admin screen: the student table, the
//! drawer form, the about page, and the [`App`] that composes them.
//!
//! # Design
//! - `StudentClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - `App` hands out ticketed requests and takes completions back, so the host
//!   decides how and when I/O happens.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod info_page;
pub mod list_view;
pub mod notify;
pub mod snapshot;
pub mod types;

pub use app::{Action, App, Destination, Outbound, Ticket};
pub use client::StudentClient;
pub use config::AppConfig;
pub use error::{ApiError, TransportError};
pub use form::{Field, FieldError, FormDraft, StudentForm, Submission, SubmitBlocked};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use info_page::InfoPage;
pub use list_view::{ListState, ListView, PAGE_SIZE};
pub use notify::{Notice, NoticeLevel, NoticeQueue, Notifier, Placement};
pub use snapshot::AppSnapshot;
pub use types::{Gender, InfoResource, NewStudent, ServerError, Student, StudentId};
