//! Serializable view state handed to the host for rendering.

use serde::Serialize;

use crate::app::{App, Destination};
use crate::form::{FieldError, FormDraft, FormMode};
use crate::info_page::InfoState;
use crate::list_view::{ConfirmKind, ListState, Row};
use crate::notify::Notifier;
use crate::types::StudentId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppSnapshot {
    pub destination: Destination,
    pub list: ListSnapshot,
    pub form: Option<FormSnapshot>,
    pub info: InfoSnapshot,
    pub pending_requests: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListPhase {
    Loading,
    Empty,
    Populated,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListSnapshot {
    pub phase: ListPhase,
    pub failure: Option<String>,
    pub refreshing: bool,
    pub count: usize,
    pub page: usize,
    pub page_count: usize,
    pub rows: Vec<Row>,
    pub confirm: Option<ConfirmSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmSnapshot {
    pub kind: ConfirmKind,
    pub id: StudentId,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    pub title: &'static str,
    pub editing: Option<StudentId>,
    pub draft: FormDraft,
    pub errors: Vec<FieldError>,
    pub submitting: bool,
    pub submit_label: &'static str,
    pub submit_disabled: bool,
    pub reset_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoPhase {
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoSnapshot {
    pub phase: InfoPhase,
    pub url: Option<String>,
    pub description: Option<String>,
    pub failure: Option<String>,
}

impl AppSnapshot {
    pub(crate) fn capture<N: Notifier>(app: &App<N>) -> Self {
        let list = app.list();
        let (phase, failure) = match list.state() {
            ListState::Loading => (ListPhase::Loading, None),
            ListState::Empty => (ListPhase::Empty, None),
            ListState::Populated(_) => (ListPhase::Populated, None),
            ListState::Failed(reason) => (ListPhase::Failed, Some(reason.clone())),
        };
        let list = ListSnapshot {
            phase,
            failure,
            refreshing: list.is_refreshing(),
            count: list.len(),
            page: app.current_page(),
            page_count: list.page_count(),
            rows: list.page(app.current_page()),
            confirm: list.pending_confirm().map(|p| ConfirmSnapshot {
                kind: p.kind,
                id: p.student.id,
                prompt: p.prompt(),
            }),
        };

        let form = app.form();
        let form = form.is_visible().then(|| FormSnapshot {
            title: form.title(),
            editing: match form.mode() {
                FormMode::Create => None,
                FormMode::Edit(original) => Some(original.id),
            },
            draft: form.draft().clone(),
            errors: form.errors().to_vec(),
            submitting: form.is_submitting(),
            submit_label: form.submit_label(),
            submit_disabled: form.is_update_disabled() || form.is_submitting(),
            reset_visible: form.is_reset_visible(),
        });

        let info = match app.info().state() {
            InfoState::Idle => InfoSnapshot::bare(InfoPhase::Idle),
            InfoState::Loading => InfoSnapshot::bare(InfoPhase::Loading),
            InfoState::Ready(resource) => InfoSnapshot {
                phase: InfoPhase::Ready,
                url: Some(resource.url.clone()),
                description: Some(resource.description.clone()),
                failure: None,
            },
            InfoState::Failed(reason) => InfoSnapshot {
                failure: Some(reason.clone()),
                ..InfoSnapshot::bare(InfoPhase::Failed)
            },
        };

        AppSnapshot {
            destination: app.destination(),
            list,
            form,
            info,
            pending_requests: app.pending_requests(),
        }
    }
}

impl InfoSnapshot {
    fn bare(phase: InfoPhase) -> Self {
        Self {
            phase,
            url: None,
            description: None,
            failure: None,
        }
    }
}
