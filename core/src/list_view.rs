//! Table of students with per-row edit and delete actions.
//!
//! # States
//! `Loading` until the first fetch resolves, then `Empty` or `Populated`.
//! A first fetch that fails lands in `Failed` so the host can offer a retry
//! instead of spinning forever. Later re-fetches keep the current rows on
//! screen and only raise the `refreshing` flag; the list is always replaced
//! wholesale, never patched.
//!
//! Delete and edit are two-step gestures: `request_*` opens a confirmation
//! prompt and nothing happens until `confirm` releases it.

use serde::Serialize;

use crate::error::ApiError;
use crate::notify::Notifier;
use crate::types::{Gender, Student, StudentId};

pub const PAGE_SIZE: usize = 50;

const ISSUE_TITLE: &str = "There was an issue";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Empty,
    Populated(Vec<Student>),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmKind {
    Delete,
    Edit,
}

/// A row action waiting for the user's explicit go-ahead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirm {
    pub kind: ConfirmKind,
    pub student: Student,
}

impl PendingConfirm {
    pub fn prompt(&self) -> String {
        match self.kind {
            ConfirmKind::Delete => format!("Are you sure to delete {} from the list?", self.student.name),
            ConfirmKind::Edit => format!("Are you sure to edit student {} ?", self.student.name),
        }
    }
}

/// The action a confirmation released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmed {
    Delete(Student),
    Edit(Student),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Avatar {
    Initials(String),
    /// Generic person icon for a blank name.
    Placeholder,
}

impl Avatar {
    /// Initials from the first letter of the first and last words, so
    /// "Tom Hanks" reads "TH".
    pub fn for_name(name: &str) -> Self {
        let mut words = name.split_whitespace();
        let Some(first) = words.next().and_then(|w| w.chars().next()) else {
            return Avatar::Placeholder;
        };
        match words.last().and_then(|w| w.chars().next()) {
            Some(last) => Avatar::Initials(format!("{first}{last}")),
            None => Avatar::Initials(first.to_string()),
        }
    }
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub id: StudentId,
    pub avatar: Avatar,
    pub name: String,
    pub email: String,
    pub gender: Gender,
}

impl From<&Student> for Row {
    fn from(s: &Student) -> Self {
        Row {
            id: s.id,
            avatar: Avatar::for_name(&s.name),
            name: s.name.clone(),
            email: s.email.clone(),
            gender: s.gender,
        }
    }
}

#[derive(Debug)]
pub struct ListView {
    state: ListState,
    refreshing: bool,
    confirm: Option<PendingConfirm>,
    page_size: usize,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl ListView {
    pub fn new(page_size: usize) -> Self {
        Self {
            state: ListState::Loading,
            refreshing: false,
            confirm: None,
            page_size: page_size.max(1),
        }
    }

    /// Mark a fetch as outstanding.
    pub fn begin_fetch(&mut self) {
        if matches!(self.state, ListState::Failed(_)) {
            self.state = ListState::Loading;
        }
        self.refreshing = true;
    }

    /// Replace the list with a fetch result, or report why it failed.
    pub fn apply_fetch(&mut self, result: Result<Vec<Student>, ApiError>, notifier: &mut impl Notifier) {
        self.refreshing = false;
        match result {
            Ok(students) if students.is_empty() => self.state = ListState::Empty,
            Ok(students) => self.state = ListState::Populated(students),
            Err(err) => {
                let message = err.describe_with_status_code();
                tracing::warn!(error = %err, "fetching students failed");
                notifier.error(ISSUE_TITLE, &message, None);
                if matches!(self.state, ListState::Loading) {
                    self.state = ListState::Failed(message);
                }
            }
        }
        // A pending prompt always shows the row as last fetched.
        if let Some(pending) = self.confirm.take() {
            self.confirm = self
                .find(pending.student.id)
                .cloned()
                .map(|student| PendingConfirm {
                    kind: pending.kind,
                    student,
                });
        }
    }

    /// Report the outcome of a delete. Returns true when the list should be
    /// re-fetched.
    pub fn apply_delete(
        &mut self,
        student: &Student,
        result: Result<(), ApiError>,
        notifier: &mut impl Notifier,
    ) -> bool {
        match result {
            Ok(()) => {
                notifier.success(
                    "Student deleted",
                    &format!("Student {} was deleted", student.name),
                    None,
                );
                true
            }
            Err(err) => {
                tracing::warn!(id = %student.id, error = %err, "deleting student failed");
                notifier.error(ISSUE_TITLE, &err.describe(), None);
                false
            }
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn students(&self) -> &[Student] {
        match &self.state {
            ListState::Populated(students) => students,
            _ => &[],
        }
    }

    /// Count shown in the table header.
    pub fn len(&self) -> usize {
        self.students().len()
    }

    pub fn is_empty(&self) -> bool {
        self.students().is_empty()
    }

    pub fn find(&self, id: StudentId) -> Option<&Student> {
        self.students().iter().find(|s| s.id == id)
    }

    pub fn request_delete(&mut self, id: StudentId) -> bool {
        self.request(ConfirmKind::Delete, id)
    }

    pub fn request_edit(&mut self, id: StudentId) -> bool {
        self.request(ConfirmKind::Edit, id)
    }

    fn request(&mut self, kind: ConfirmKind, id: StudentId) -> bool {
        match self.find(id).cloned() {
            Some(student) => {
                self.confirm = Some(PendingConfirm { kind, student });
                true
            }
            None => false,
        }
    }

    pub fn pending_confirm(&self) -> Option<&PendingConfirm> {
        self.confirm.as_ref()
    }

    pub fn confirm(&mut self) -> Option<Confirmed> {
        self.confirm.take().map(|p| match p.kind {
            ConfirmKind::Delete => Confirmed::Delete(p.student),
            ConfirmKind::Edit => Confirmed::Edit(p.student),
        })
    }

    pub fn cancel_confirm(&mut self) {
        self.confirm = None;
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.len().div_ceil(self.page_size)
    }

    /// Rows of the zero-based page `index`; empty past the last page.
    pub fn page(&self, index: usize) -> Vec<Row> {
        self.students()
            .chunks(self.page_size)
            .nth(index)
            .map(|chunk| chunk.iter().map(Row::from).collect())
            .unwrap_or_default()
    }
}
