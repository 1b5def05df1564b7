//! Root composer: owns navigation and the selected student, and wires the
//! list view, the form and the info page to the API client.
//!
//! # Design
//! The app never performs I/O. Every operation that needs the backend returns
//! [`Outbound`] requests tagged with a [`Ticket`]; the host executes them in
//! whatever order it likes and feeds each outcome back through
//! [`App::complete`]. Completions may produce follow-up requests (the list
//! re-fetch after a successful mutation), which the host executes the same way.
//!
//! User gestures arrive as typed [`Action`]s. Their serde form is what a C host
//! sends through the FFI.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::client::StudentClient;
use crate::config::AppConfig;
use crate::error::{ApiError, TransportError};
use crate::form::{Field, StudentForm, Submission, SubmitBlocked};
use crate::http::{HttpRequest, HttpResponse};
use crate::info_page::InfoPage;
use crate::list_view::{Confirmed, ListView};
use crate::notify::{NoticeQueue, Notifier, Placement};
use crate::snapshot::AppSnapshot;
use crate::types::{NewStudent, Student, StudentId};

const ISSUE_TITLE: &str = "There was an issue";

/// Ties an outbound request to its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub ticket: Ticket,
    pub request: HttpRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    #[default]
    Students,
    About,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Navigate { to: Destination },
    Refresh,
    ShowPage { index: usize },
    AddStudent,
    RequestEdit { id: StudentId },
    RequestDelete { id: StudentId },
    Confirm,
    CancelConfirm,
    EditField { field: Field, value: String },
    SubmitForm,
    ResetForm,
    CloseForm,
}

#[derive(Debug, Clone)]
enum InFlight {
    FetchStudents,
    Create(NewStudent),
    Update(Student),
    Delete(Student),
    Info { path: String },
}

pub struct App<N = NoticeQueue> {
    client: StudentClient,
    notifier: N,
    destination: Destination,
    selection: Option<Student>,
    list: ListView,
    page: usize,
    form: StudentForm,
    info: InfoPage,
    in_flight: BTreeMap<Ticket, InFlight>,
    latest_fetch: Option<Ticket>,
    latest_info: Option<Ticket>,
    form_ticket: Option<Ticket>,
    next_ticket: u64,
    mounted: bool,
}

impl App<NoticeQueue> {
    pub fn new(config: AppConfig) -> Self {
        Self::with_notifier(config, NoticeQueue::new())
    }
}

impl<N: Notifier> App<N> {
    pub fn with_notifier(config: AppConfig, notifier: N) -> Self {
        Self {
            client: StudentClient::new(&config.base_url),
            notifier,
            destination: Destination::Students,
            selection: None,
            list: ListView::new(config.page_size),
            page: 0,
            form: StudentForm::new(),
            info: InfoPage::new(&config.info_path),
            in_flight: BTreeMap::new(),
            latest_fetch: None,
            latest_info: None,
            form_ticket: None,
            next_ticket: 1,
            mounted: false,
        }
    }

    /// Issue the initial list fetch. Subsequent calls do nothing.
    pub fn mount(&mut self) -> Vec<Outbound> {
        if self.mounted {
            return Vec::new();
        }
        self.mounted = true;
        vec![self.fetch_students()]
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Outbound> {
        tracing::debug!(?action, "dispatch");
        match action {
            Action::Navigate { to } => {
                self.destination = to;
                match to {
                    Destination::About => vec![self.fetch_info()],
                    Destination::Students => Vec::new(),
                }
            }
            Action::Refresh => vec![self.fetch_students()],
            Action::ShowPage { index } => {
                self.page = index.min(self.list.page_count().saturating_sub(1));
                Vec::new()
            }
            Action::AddStudent => {
                self.list.cancel_confirm();
                self.selection = None;
                self.form_ticket = None;
                self.form.open(None);
                Vec::new()
            }
            Action::RequestEdit { id } => {
                if !self.list.request_edit(id) {
                    tracing::warn!(%id, "edit requested for unknown student");
                }
                Vec::new()
            }
            Action::RequestDelete { id } => {
                if !self.list.request_delete(id) {
                    tracing::warn!(%id, "delete requested for unknown student");
                }
                Vec::new()
            }
            Action::Confirm => match self.list.confirm() {
                Some(Confirmed::Delete(student)) => {
                    let request = self.client.build_delete_student(student.id);
                    vec![self.issue(InFlight::Delete(student), request)]
                }
                Some(Confirmed::Edit(student)) => {
                    self.form_ticket = None;
                    self.form.open(Some(&student));
                    self.selection = Some(student);
                    Vec::new()
                }
                None => Vec::new(),
            },
            Action::CancelConfirm => {
                self.list.cancel_confirm();
                Vec::new()
            }
            Action::EditField { field, value } => {
                self.form.set_field(field, value);
                Vec::new()
            }
            Action::SubmitForm => self.submit_form(),
            Action::ResetForm => {
                self.form.reset();
                Vec::new()
            }
            Action::CloseForm => {
                self.form.close();
                self.selection = None;
                self.form_ticket = None;
                Vec::new()
            }
        }
    }

    /// Feed the outcome of an outbound request back in.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<HttpResponse, TransportError>,
    ) -> Vec<Outbound> {
        let Some(kind) = self.in_flight.remove(&ticket) else {
            tracing::warn!(ticket = ticket.0, "completion for unknown ticket ignored");
            return Vec::new();
        };
        tracing::debug!(
            ticket = ticket.0,
            status = outcome.as_ref().map(|r| r.status).ok(),
            "request completed"
        );
        let response = outcome.map_err(ApiError::from);

        match kind {
            InFlight::FetchStudents => {
                if self.latest_fetch != Some(ticket) {
                    tracing::debug!(ticket = ticket.0, "stale list response dropped");
                    return Vec::new();
                }
                self.latest_fetch = None;
                let result = response.and_then(|r| self.client.parse_list_students(r));
                self.list.apply_fetch(result, &mut self.notifier);
                self.page = self.page.min(self.list.page_count().saturating_sub(1));
                Vec::new()
            }
            InFlight::Create(student) => {
                let result = response.and_then(|r| self.client.parse_create_student(r));
                self.finish_form(ticket, result.is_ok());
                match result {
                    Ok(_) => {
                        self.notifier.success(
                            "Student successfully added",
                            &format!("{} was added to the system", student.name),
                            None,
                        );
                        vec![self.fetch_students()]
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "creating student failed");
                        self.notifier
                            .error(ISSUE_TITLE, &err.describe(), Some(Placement::BottomLeft));
                        Vec::new()
                    }
                }
            }
            InFlight::Update(student) => {
                let result = response.and_then(|r| self.client.parse_update_student(r));
                self.finish_form(ticket, result.is_ok());
                match result {
                    Ok(_) => {
                        self.notifier.success(
                            "Student edited",
                            &format!("Student {} with Id: {} was edited", student.name, student.id),
                            None,
                        );
                        vec![self.fetch_students()]
                    }
                    Err(err) => {
                        tracing::warn!(id = %student.id, error = %err, "updating student failed");
                        self.notifier.error(ISSUE_TITLE, &err.describe(), None);
                        Vec::new()
                    }
                }
            }
            InFlight::Delete(student) => {
                let result = response
                    .and_then(|r| self.client.parse_delete_student(r))
                    .map(|_| ());
                if self.list.apply_delete(&student, result, &mut self.notifier) {
                    vec![self.fetch_students()]
                } else {
                    Vec::new()
                }
            }
            InFlight::Info { path } => {
                if self.latest_info != Some(ticket) {
                    return Vec::new();
                }
                self.latest_info = None;
                let result = response.and_then(|r| self.client.parse_info(&path, r));
                self.info.apply_fetch(result, &mut self.notifier);
                Vec::new()
            }
        }
    }

    fn submit_form(&mut self) -> Vec<Outbound> {
        let submission = match self.form.submit() {
            Ok(submission) => submission,
            Err(SubmitBlocked::Invalid(errors)) => {
                tracing::debug!(count = errors.len(), "form validation failed");
                return Vec::new();
            }
            Err(blocked) => {
                tracing::debug!(%blocked, "submit ignored");
                return Vec::new();
            }
        };
        let (kind, built) = match submission {
            Submission::Create(student) => {
                let built = self.client.build_create_student(&student);
                (InFlight::Create(student), built)
            }
            Submission::Update(student) => {
                let built = self.client.build_update_student(&student);
                (InFlight::Update(student), built)
            }
        };
        match built {
            Ok(request) => {
                let outbound = self.issue(kind, request);
                self.form_ticket = Some(outbound.ticket);
                vec![outbound]
            }
            Err(err) => {
                self.form.finish(false);
                self.notifier.error(ISSUE_TITLE, &err.describe(), None);
                Vec::new()
            }
        }
    }

    /// Only the submission the form is currently waiting on may close it.
    fn finish_form(&mut self, ticket: Ticket, succeeded: bool) {
        if self.form_ticket != Some(ticket) {
            return;
        }
        self.form_ticket = None;
        self.form.finish(succeeded);
        if succeeded {
            self.selection = None;
        }
    }

    fn fetch_students(&mut self) -> Outbound {
        self.list.begin_fetch();
        let request = self.client.build_list_students();
        let outbound = self.issue(InFlight::FetchStudents, request);
        self.latest_fetch = Some(outbound.ticket);
        outbound
    }

    fn fetch_info(&mut self) -> Outbound {
        self.info.begin_fetch();
        let path = self.info.path().to_string();
        let request = self.client.build_info(&path);
        let outbound = self.issue(InFlight::Info { path }, request);
        self.latest_info = Some(outbound.ticket);
        outbound
    }

    fn issue(&mut self, kind: InFlight, request: HttpRequest) -> Outbound {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        tracing::debug!(
            ticket = ticket.0,
            method = %request.method,
            path = %request.path,
            "issuing request"
        );
        self.in_flight.insert(ticket, kind);
        Outbound { ticket, request }
    }

    pub fn destination(&self) -> Destination {
        self.destination
    }

    pub fn selection(&self) -> Option<&Student> {
        self.selection.as_ref()
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn form(&self) -> &StudentForm {
        &self.form
    }

    pub fn info(&self) -> &InfoPage {
        &self.info
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Number of requests issued but not yet completed.
    pub fn pending_requests(&self) -> usize {
        self.in_flight.len()
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot::capture(self)
    }
}
