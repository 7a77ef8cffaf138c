use std::path::PathBuf;

use tasktrack::error::{exit_codes, Error, JsonError};

#[test]
fn exit_codes_map_correctly() {
    let user = Error::InvalidArgument("bad".to_string());
    assert_eq!(user.exit_code(), exit_codes::USER_ERROR);

    let policy = Error::PermissionDenied("admin only".to_string());
    assert_eq!(policy.exit_code(), exit_codes::POLICY_BLOCKED);

    let op = Error::ReportNotFound(PathBuf::from("task_overview.txt"));
    assert_eq!(op.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn json_error_includes_details() {
    let err = Error::MalformedRecord {
        path: PathBuf::from("tasks.txt"),
        line: 3,
        reason: "expected 6 fields, found 2".to_string(),
    };
    let json = JsonError::from(&err);
    assert_eq!(json.code, exit_codes::OPERATION_FAILED);
    assert!(json.error.contains("line 3"));
    let details = json.details.expect("details");
    assert_eq!(details["line"], 3);
    assert_eq!(details["path"], "tasks.txt");
}

#[test]
fn index_errors_carry_bounds() {
    let err = Error::IndexOutOfRange { index: 5, len: 2 };
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    let details = err.details().expect("details");
    assert_eq!(details["index"], 5);
    assert_eq!(details["len"], 2);
}
