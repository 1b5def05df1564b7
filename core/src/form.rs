//! Drawer form for creating and editing a student.
//!
//! The form owns a [`FormDraft`] with the raw text of every editable field.
//! Opening or closing the form always throws the draft away. In edit mode the
//! update action stays disabled while the draft equals the original record,
//! so a no-op update can never be submitted.

use serde::{Deserialize, Serialize};

use crate::types::{Gender, NewStudent, Student};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Gender,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Gender];

    fn required_message(self) -> &'static str {
        match self {
            Field::Name => "Please enter student name",
            Field::Email => "Please enter student email",
            Field::Gender => "Please select a gender",
        }
    }
}

/// Inline validation error attached to a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Working copy of the editable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormDraft {
    pub name: String,
    pub email: String,
    pub gender: String,
}

impl FormDraft {
    pub fn from_student(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            email: student.email.clone(),
            gender: student.gender.as_str().to_string(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Gender => &self.gender,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Gender => self.gender = value,
        }
    }

    /// Field-by-field equality with a stored record, ignoring the id.
    pub fn matches(&self, student: &Student) -> bool {
        self.name == student.name
            && self.email == student.email
            && self.gender == student.gender.as_str()
    }

    fn check(&self, field: Field) -> Option<FieldError> {
        let ok = match field {
            Field::Name | Field::Email => !self.get(field).trim().is_empty(),
            Field::Gender => self.gender.parse::<Gender>().is_ok(),
        };
        (!ok).then(|| FieldError {
            field,
            message: field.required_message().to_string(),
        })
    }

    /// Required-field checks. Runs locally; never touches the backend.
    pub fn validate(&self) -> Result<NewStudent, Vec<FieldError>> {
        let errors: Vec<FieldError> = Field::ALL.into_iter().filter_map(|f| self.check(f)).collect();
        match self.gender.parse::<Gender>() {
            Ok(gender) if errors.is_empty() => Ok(NewStudent {
                name: self.name.clone(),
                email: self.email.clone(),
                gender,
            }),
            _ => Err(errors),
        }
    }
}

/// Create when nothing was selected at open time, edit otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit(Student),
}

/// What the form hands to the API client on a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(NewStudent),
    Update(Student),
}

/// Reasons a submit produced no request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitBlocked {
    #[error("form is not open")]
    Closed,
    #[error("a submission is already in flight")]
    Busy,
    #[error("nothing changed")]
    Unchanged,
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(Vec<FieldError>),
}

#[derive(Debug, Default)]
pub struct StudentForm {
    visible: bool,
    mode: FormMode,
    draft: FormDraft,
    update_disabled: bool,
    submitting: bool,
    errors: Vec<FieldError>,
}

impl StudentForm {
    pub fn new() -> Self {
        Self {
            update_disabled: true,
            ..Self::default()
        }
    }

    /// Show the form, seeding the draft from `selection` or leaving it blank.
    pub fn open(&mut self, selection: Option<&Student>) {
        self.visible = true;
        self.submitting = false;
        self.errors.clear();
        self.update_disabled = true;
        match selection {
            Some(student) => {
                self.draft = FormDraft::from_student(student);
                self.mode = FormMode::Edit(student.clone());
            }
            None => {
                self.draft = FormDraft::default();
                self.mode = FormMode::Create;
            }
        }
    }

    /// Hide the form and discard the draft unconditionally.
    pub fn close(&mut self) {
        self.visible = false;
        self.submitting = false;
        self.errors.clear();
        self.update_disabled = true;
        self.draft = FormDraft::default();
        self.mode = FormMode::Create;
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        if !self.visible {
            return;
        }
        self.draft.set(field, value);
        if self.errors.iter().any(|e| e.field == field) {
            self.errors.retain(|e| e.field != field);
            self.errors.extend(self.draft.check(field));
        }
        if let FormMode::Edit(original) = &self.mode {
            self.update_disabled = self.draft.matches(original);
        }
    }

    /// Restore the draft to the original record (edit) or blank (create).
    pub fn reset(&mut self) {
        self.errors.clear();
        self.update_disabled = true;
        self.draft = match &self.mode {
            FormMode::Edit(original) => FormDraft::from_student(original),
            FormMode::Create => FormDraft::default(),
        };
    }

    /// Validate and, when allowed, mark the form busy and return the payload.
    pub fn submit(&mut self) -> Result<Submission, SubmitBlocked> {
        if !self.visible {
            return Err(SubmitBlocked::Closed);
        }
        if self.submitting {
            return Err(SubmitBlocked::Busy);
        }
        if matches!(self.mode, FormMode::Edit(_)) && self.update_disabled {
            return Err(SubmitBlocked::Unchanged);
        }
        let fields = match self.draft.validate() {
            Ok(fields) => fields,
            Err(errors) => {
                self.errors = errors.clone();
                return Err(SubmitBlocked::Invalid(errors));
            }
        };
        self.errors.clear();
        self.submitting = true;
        Ok(match &self.mode {
            FormMode::Create => Submission::Create(fields),
            FormMode::Edit(original) => Submission::Update(fields.with_id(original.id)),
        })
    }

    /// Clear the busy indicator; a successful submission also closes the form.
    pub fn finish(&mut self, succeeded: bool) {
        self.submitting = false;
        if succeeded {
            self.close();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Only meaningful in edit mode; create mode has no gate.
    pub fn is_update_disabled(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_)) && self.update_disabled
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Create new student",
            FormMode::Edit(_) => "Edit student",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Submit",
            FormMode::Edit(_) => "Update",
        }
    }

    /// The reset button only shows once there is something to revert.
    pub fn is_reset_visible(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_)) && !self.update_disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StudentId;
    use pretty_assertions::assert_eq;

    fn tom() -> Student {
        Student {
            id: StudentId(1),
            name: "Tom".to_string(),
            email: "t@x.com".to_string(),
            gender: Gender::Male,
        }
    }

    fn filled_create_form() -> StudentForm {
        let mut form = StudentForm::new();
        form.open(None);
        form.set_field(Field::Name, "Ann");
        form.set_field(Field::Email, "ann@x.com");
        form.set_field(Field::Gender, "FEMALE");
        form
    }

    #[test]
    fn open_for_edit_seeds_draft() {
        let mut form = StudentForm::new();
        form.open(Some(&tom()));
        assert!(form.is_visible());
        assert_eq!(form.title(), "Edit student");
        assert_eq!(form.draft(), &FormDraft::from_student(&tom()));
        assert!(form.is_update_disabled());
    }

    #[test]
    fn reopening_discards_unsaved_edits() {
        let mut form = StudentForm::new();
        form.open(Some(&tom()));
        form.set_field(Field::Name, "Tommy");
        form.close();
        form.open(Some(&tom()));
        assert_eq!(form.draft().name, "Tom");

        form.open(None);
        assert_eq!(form.draft(), &FormDraft::default());
        assert_eq!(form.title(), "Create new student");
    }

    #[test]
    fn update_gate_follows_diff_and_revert() {
        let mut form = StudentForm::new();
        form.open(Some(&tom()));
        assert_eq!(form.submit(), Err(SubmitBlocked::Unchanged));

        form.set_field(Field::Email, "tom@x.com");
        assert!(!form.is_update_disabled());
        assert!(form.is_reset_visible());

        form.set_field(Field::Email, "t@x.com");
        assert!(form.is_update_disabled());
        assert!(!form.is_reset_visible());
    }

    #[test]
    fn gender_change_alone_enables_update() {
        let mut form = StudentForm::new();
        form.open(Some(&tom()));
        form.set_field(Field::Gender, "OTHER");
        let submission = form.submit().unwrap();
        assert_eq!(
            submission,
            Submission::Update(Student {
                gender: Gender::Other,
                ..tom()
            })
        );
        assert!(form.is_submitting());
    }

    #[test]
    fn reset_restores_original() {
        let mut form = StudentForm::new();
        form.open(Some(&tom()));
        form.set_field(Field::Name, "Bill");
        form.reset();
        assert_eq!(form.draft().name, "Tom");
        assert!(form.is_update_disabled());
    }

    #[test]
    fn blank_name_blocks_submission_with_field_error() {
        let mut form = StudentForm::new();
        form.open(None);
        form.set_field(Field::Email, "a@b.com");
        form.set_field(Field::Gender, "MALE");
        match form.submit() {
            Err(SubmitBlocked::Invalid(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, Field::Name);
                assert_eq!(errors[0].message, "Please enter student name");
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert!(!form.is_submitting());
        assert_eq!(form.errors()[0].field, Field::Name);
    }

    #[test]
    fn whitespace_only_is_blank() {
        let mut form = filled_create_form();
        form.set_field(Field::Email, "   ");
        assert!(matches!(form.submit(), Err(SubmitBlocked::Invalid(_))));
    }

    #[test]
    fn unknown_gender_is_rejected() {
        let mut form = filled_create_form();
        form.set_field(Field::Gender, "ROBOT");
        match form.submit() {
            Err(SubmitBlocked::Invalid(errors)) => assert_eq!(errors[0].field, Field::Gender),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn fixing_a_field_clears_its_error() {
        let mut form = StudentForm::new();
        form.open(None);
        let _ = form.submit();
        assert_eq!(form.errors().len(), 3);
        form.set_field(Field::Name, "Ann");
        assert_eq!(form.errors().len(), 2);
        assert!(form.errors().iter().all(|e| e.field != Field::Name));
    }

    #[test]
    fn create_submission_carries_no_id() {
        let mut form = filled_create_form();
        assert_eq!(
            form.submit().unwrap(),
            Submission::Create(NewStudent {
                name: "Ann".to_string(),
                email: "ann@x.com".to_string(),
                gender: Gender::Female,
            })
        );
    }

    #[test]
    fn second_submit_while_pending_is_busy() {
        let mut form = filled_create_form();
        form.submit().unwrap();
        assert_eq!(form.submit(), Err(SubmitBlocked::Busy));
    }

    #[test]
    fn failed_submission_keeps_form_open() {
        let mut form = filled_create_form();
        form.submit().unwrap();
        form.finish(false);
        assert!(form.is_visible());
        assert!(!form.is_submitting());
        assert_eq!(form.draft().name, "Ann");
    }

    #[test]
    fn successful_submission_closes_form() {
        let mut form = filled_create_form();
        form.submit().unwrap();
        form.finish(true);
        assert!(!form.is_visible());
        assert_eq!(form.draft(), &FormDraft::default());
    }

    #[test]
    fn closed_form_ignores_edits_and_submit() {
        let mut form = StudentForm::new();
        form.set_field(Field::Name, "ghost");
        assert_eq!(form.draft().name, "");
        assert_eq!(form.submit(), Err(SubmitBlocked::Closed));
    }
}
