use super::*;
use crate::state::test_helpers;
use crate::validate::NameError;

#[test]
fn school_error_to_status_maps_not_found() {
    let err = SchoolError::NotFound("s1".into());
    assert_eq!(school_error_to_status(&err), StatusCode::NOT_FOUND);
}

#[test]
fn school_error_to_status_maps_conflict() {
    let err = SchoolError::AlreadyExists("s1".into());
    assert_eq!(school_error_to_status(&err), StatusCode::CONFLICT);
}

#[test]
fn school_error_to_status_maps_invalid_name() {
    let err = SchoolError::InvalidName(NameError::TooShort("school"));
    assert_eq!(school_error_to_status(&err), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_school_returns_created() {
    let state = test_helpers::test_app_state();
    let body = CreateSchoolBody { school_name: "Al Noor".into(), display_name: None };

    let (status, Json(summary)) = create_school(State(state.clone()), Json(body)).await.unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(summary.name, "Al_Noor");
    let Json(list) = list_schools(State(state)).await;
    assert_eq!(list, vec![summary]);
}

#[tokio::test]
async fn create_school_duplicate_returns_conflict_with_code() {
    let state = test_helpers::test_app_state();
    test_helpers::seed_school(&state, "alnoor").await;
    let body = CreateSchoolBody { school_name: "alnoor".into(), display_name: Some("x".into()) };

    let (status, Json(error)) = create_school(State(state), Json(body)).await.unwrap_err();

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "E_SCHOOL_EXISTS");
}

#[tokio::test]
async fn get_school_missing_returns_not_found() {
    let state = test_helpers::test_app_state();
    let (status, _) = get_school(State(state), Path("ghost".into())).await.unwrap_err();
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn toggle_then_delete() {
    let state = test_helpers::test_app_state();
    test_helpers::seed_school(&state, "s1").await;

    let Json(summary) = toggle_school(State(state.clone()), Path("s1".into())).await.unwrap();
    assert!(!summary.is_active);

    let status = delete_school(State(state.clone()), Path("s1".into())).await.unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(state.schools.read().await.is_empty());
}

#[test]
fn create_body_display_name_is_optional() {
    let body: CreateSchoolBody = serde_json::from_str(r#"{"school_name":"Al Noor"}"#).unwrap();
    assert!(body.display_name.is_none());
}
