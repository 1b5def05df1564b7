//! Admin screen behaviour driven with simulated backend responses.
//!
//! No network is involved: each test plays the host by hand, answering the
//! requests the app issues with canned `HttpResponse`s.

use pretty_assertions::assert_eq;
use student_core::{
    list_view::Avatar,
    snapshot::{InfoPhase, ListPhase},
    Action, App, AppConfig, Destination, Field, HttpMethod,
    HttpResponse, NoticeLevel, Outbound, Placement, StudentId, TransportError,
};

const TOM: &str = r#"[{"id":1,"name":"Tom","email":"t@x.com","gender":"MALE"}]"#;

fn respond(status: u16, body: &str) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse::new(status, body))
}

fn mounted(list_body: &str) -> App {
    let mut app = App::new(AppConfig::default());
    let out = app.mount();
    assert_eq!(out.len(), 1);
    let follow_up = app.complete(out[0].ticket, respond(200, list_body));
    assert!(follow_up.is_empty());
    app
}

fn edit(app: &mut App, field: Field, value: &str) -> Vec<Outbound> {
    app.dispatch(Action::EditField {
        field,
        value: value.to_string(),
    })
}

fn open_edit_for_tom(app: &mut App) {
    assert!(app.dispatch(Action::RequestEdit { id: StudentId(1) }).is_empty());
    assert!(app.dispatch(Action::Confirm).is_empty());
}

#[test]
fn empty_fetch_shows_add_action_and_no_table() {
    let app = mounted("[]");
    let snap = app.snapshot();
    assert_eq!(snap.list.phase, ListPhase::Empty);
    assert!(snap.list.rows.is_empty());
    assert_eq!(snap.list.count, 0);
}

#[test]
fn single_student_renders_one_row_with_initial() {
    let app = mounted(TOM);
    let snap = app.snapshot();
    assert_eq!(snap.list.phase, ListPhase::Populated);
    assert_eq!(snap.list.rows.len(), 1);
    assert_eq!(snap.list.rows[0].avatar, Avatar::Initials("T".to_string()));
    assert_eq!(snap.list.rows[0].name, "Tom");
}

#[test]
fn create_then_list_includes_created_record() {
    let mut app = mounted("[]");
    app.dispatch(Action::AddStudent);
    edit(&mut app, Field::Name, "Ann");
    edit(&mut app, Field::Email, "ann@x.com");
    edit(&mut app, Field::Gender, "FEMALE");

    let submit = app.dispatch(Action::SubmitForm);
    assert_eq!(submit.len(), 1);
    assert_eq!(submit[0].request.method, HttpMethod::Post);
    assert!(app.snapshot().form.unwrap().submitting);

    let refetch = app.complete(submit[0].ticket, respond(200, ""));
    assert_eq!(refetch.len(), 1);
    assert_eq!(refetch[0].request.method, HttpMethod::Get);
    assert!(!app.form().is_visible());

    app.complete(
        refetch[0].ticket,
        respond(
            200,
            r#"[{"id":5,"name":"Ann","email":"ann@x.com","gender":"FEMALE"}]"#,
        ),
    );
    assert_eq!(app.list().len(), 1);
    assert_eq!(app.list().students()[0].name, "Ann");

    let notices = app.notifier_mut().take();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].title, "Student successfully added");
    assert_eq!(notices[0].message, "Ann was added to the system");
}

#[test]
fn unchanged_edit_keeps_update_disabled() {
    let mut app = mounted(TOM);
    open_edit_for_tom(&mut app);
    assert!(app.snapshot().form.unwrap().submit_disabled);

    // Re-typing identical values is still no change.
    edit(&mut app, Field::Name, "Tom");
    edit(&mut app, Field::Gender, "MALE");
    assert!(app.form().is_update_disabled());
    assert!(app.dispatch(Action::SubmitForm).is_empty());
}

#[test]
fn diff_enables_update_and_revert_disables_it() {
    let mut app = mounted(TOM);
    open_edit_for_tom(&mut app);

    edit(&mut app, Field::Email, "tom@x.com");
    assert!(!app.form().is_update_disabled());
    edit(&mut app, Field::Email, "t@x.com");
    assert!(app.form().is_update_disabled());

    edit(&mut app, Field::Name, "Tommy");
    let out = app.dispatch(Action::SubmitForm);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].request.method, HttpMethod::Put);
    assert_eq!(out[0].request.path, "api/v1/students/1");
    let body: serde_json::Value =
        serde_json::from_str(out[0].request.body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"id": 1, "name": "Tommy", "email": "t@x.com", "gender": "MALE"})
    );
}

#[test]
fn delete_fires_only_after_confirmation() {
    let mut app = mounted(TOM);
    assert!(app.dispatch(Action::RequestDelete { id: StudentId(1) }).is_empty());
    assert_eq!(app.pending_requests(), 0);
    let prompt = app.snapshot().list.confirm.unwrap().prompt;
    assert_eq!(prompt, "Are you sure to delete Tom from the list?");

    assert!(app.dispatch(Action::CancelConfirm).is_empty());
    assert!(app.dispatch(Action::Confirm).is_empty());

    app.dispatch(Action::RequestDelete { id: StudentId(1) });
    let out = app.dispatch(Action::Confirm);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].request.method, HttpMethod::Delete);

    let refetch = app.complete(out[0].ticket, respond(200, ""));
    assert_eq!(refetch.len(), 1);
    let notices = app.notifier_mut().take();
    assert_eq!(notices[0].message, "Student Tom was deleted");
}

#[test]
fn failed_delete_reports_and_does_not_refetch() {
    let mut app = mounted(TOM);
    app.dispatch(Action::RequestDelete { id: StudentId(1) });
    let out = app.dispatch(Action::Confirm);
    let follow_up = app.complete(
        out[0].ticket,
        respond(
            404,
            r#"{"message":"Student with id 1 does not exists","status":404,"error":"Not Found"}"#,
        ),
    );
    assert!(follow_up.is_empty());
    let notices = app.notifier_mut().take();
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].title, "There was an issue");
}

#[test]
fn closing_the_form_never_submits() {
    let mut app = mounted(TOM);
    app.dispatch(Action::AddStudent);
    edit(&mut app, Field::Name, "Ann");
    edit(&mut app, Field::Email, "ann@x.com");
    edit(&mut app, Field::Gender, "FEMALE");
    assert!(app.dispatch(Action::CloseForm).is_empty());

    open_edit_for_tom(&mut app);
    edit(&mut app, Field::Name, "Tommy");
    assert!(app.dispatch(Action::CloseForm).is_empty());

    assert_eq!(app.pending_requests(), 0);
    assert!(app.selection().is_none());
    assert!(app.snapshot().form.is_none());
}

#[test]
fn blank_name_is_blocked_locally() {
    let mut app = mounted("[]");
    app.dispatch(Action::AddStudent);
    edit(&mut app, Field::Name, "");
    edit(&mut app, Field::Email, "a@b.com");
    edit(&mut app, Field::Gender, "MALE");

    let out = app.dispatch(Action::SubmitForm);
    assert!(out.is_empty());
    assert_eq!(app.pending_requests(), 0);

    let form = app.snapshot().form.unwrap();
    assert_eq!(form.errors.len(), 1);
    assert_eq!(form.errors[0].field, Field::Name);
    assert_eq!(form.errors[0].message, "Please enter student name");
}

#[test]
fn update_conflict_is_reported_and_form_stays_open() {
    let mut app = mounted(TOM);
    open_edit_for_tom(&mut app);
    edit(&mut app, Field::Name, "Tommy");
    let out = app.dispatch(Action::SubmitForm);

    let follow_up = app.complete(
        out[0].ticket,
        respond(409, r#"{"message":"conflict","status":409,"error":"Conflict"}"#),
    );
    assert!(follow_up.is_empty());

    let notices = app.notifier_mut().take();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].message, "conflict [409] [Conflict]");

    let form = app.snapshot().form.unwrap();
    assert!(!form.submitting);
    assert_eq!(form.draft.name, "Tommy");
    assert_eq!(app.selection().map(|s| s.id), Some(StudentId(1)));
}

#[test]
fn create_failure_with_unparseable_body_falls_back_to_generic_notice() {
    let mut app = mounted("[]");
    app.dispatch(Action::AddStudent);
    edit(&mut app, Field::Name, "Ann");
    edit(&mut app, Field::Email, "ann@x.com");
    edit(&mut app, Field::Gender, "FEMALE");
    let out = app.dispatch(Action::SubmitForm);

    app.complete(out[0].ticket, respond(502, "<html>Bad Gateway</html>"));
    let notices = app.notifier_mut().take();
    assert_eq!(notices[0].message, "Request failed [502] [Bad Gateway]");
    assert_eq!(notices[0].placement, Placement::BottomLeft);
    assert!(app.form().is_visible());
}

#[test]
fn failed_first_fetch_can_be_retried() {
    let mut app = App::new(AppConfig::default());
    let out = app.mount();
    app.complete(out[0].ticket, Err(TransportError("connection refused".to_string())));
    let snap = app.snapshot();
    assert_eq!(snap.list.phase, ListPhase::Failed);
    assert_eq!(
        snap.list.failure.as_deref(),
        Some("transport error: connection refused")
    );

    let retry = app.dispatch(Action::Refresh);
    assert_eq!(app.snapshot().list.phase, ListPhase::Loading);
    app.complete(retry[0].ticket, respond(200, TOM));
    assert_eq!(app.snapshot().list.phase, ListPhase::Populated);
}

#[test]
fn snapshot_serializes_for_the_host() {
    let mut app = mounted(TOM);
    app.dispatch(Action::RequestEdit { id: StudentId(1) });
    let json = serde_json::to_value(app.snapshot()).unwrap();
    assert_eq!(json["destination"], "students");
    assert_eq!(json["list"]["phase"], "populated");
    assert_eq!(json["list"]["rows"][0]["avatar"]["text"], "T");
    assert_eq!(json["list"]["confirm"]["kind"], "edit");
    assert!(json["form"].is_null());
}

#[test]
fn update_success_names_the_student_and_id() {
    let mut app = mounted(TOM);
    open_edit_for_tom(&mut app);
    edit(&mut app, Field::Name, "Tommy");
    let out = app.dispatch(Action::SubmitForm);

    let refetch = app.complete(out[0].ticket, respond(200, ""));
    assert_eq!(refetch.len(), 1);
    assert!(!app.form().is_visible());
    assert!(app.selection().is_none());

    let notices = app.notifier_mut().take();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Success);
    assert_eq!(notices[0].title, "Student edited");
    assert_eq!(notices[0].message, "Student Tommy with Id: 1 was edited");
}

#[test]
fn reset_restores_the_record_and_disables_update() {
    let mut app = mounted(TOM);
    open_edit_for_tom(&mut app);
    edit(&mut app, Field::Name, "Tommy");
    edit(&mut app, Field::Email, "tommy@x.com");
    assert!(!app.form().is_update_disabled());

    assert!(app.dispatch(Action::ResetForm).is_empty());
    let form = app.snapshot().form.unwrap();
    assert_eq!(form.draft.name, "Tom");
    assert_eq!(form.draft.email, "t@x.com");
    assert!(form.submit_disabled);
    assert!(!form.reset_visible);
    assert!(app.dispatch(Action::SubmitForm).is_empty());
}

#[test]
fn info_failure_is_notified_and_shown() {
    let mut app = mounted("[]");
    let out = app.dispatch(Action::Navigate {
        to: Destination::About,
    });
    app.complete(
        out[0].ticket,
        respond(
            500,
            r#"{"message":"boom","status":500,"error":"Internal Server Error"}"#,
        ),
    );

    let notices = app.notifier_mut().take();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].title, "Could not load project info");
    assert_eq!(notices[0].message, "boom [500] [Internal Server Error]");

    let snap = app.snapshot();
    assert_eq!(snap.info.phase, InfoPhase::Failed);
    assert!(app.info().resource_url().is_none());
}

#[test]
fn confirming_after_refetch_uses_fresh_record() {
    let mut app = mounted(TOM);
    app.dispatch(Action::RequestEdit { id: StudentId(1) });

    let refetch = app.dispatch(Action::Refresh);
    app.complete(
        refetch[0].ticket,
        respond(
            200,
            r#"[{"id":1,"name":"Tommy","email":"t@x.com","gender":"MALE"}]"#,
        ),
    );
    let prompt = app.snapshot().list.confirm.unwrap().prompt;
    assert_eq!(prompt, "Are you sure to edit student Tommy ?");

    app.dispatch(Action::Confirm);
    assert_eq!(app.form().draft().name, "Tommy");
    assert_eq!(app.selection().map(|s| s.name.as_str()), Some("Tommy"));
    assert!(app.form().is_update_disabled());
}
