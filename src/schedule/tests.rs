use crate::config::test_helpers::setup_test_app;
use crate::test_helpers::{
    empty_request, encode_segment, extract_response_body, multipart_body, multipart_request,
    sample_timetable_xlsx, text_request, xlsx_from_sheets,
};
use axum::http::StatusCode;
use tower::ServiceExt;

fn day_uri(class_name: &str, day: &str) -> String {
    format!("/api/schedule/{}/{}", encode_segment(class_name), encode_segment(day))
}

#[tokio::test]
async fn test_import_then_read_back() {
    let app = setup_test_app().await;

    let body = multipart_body(
        Some(("timetable.xlsx", sample_timetable_xlsx().as_slice())),
        &[("shift", "1")],
    );
    let response = app
        .clone()
        .oneshot(multipart_request("/api/schedule/import", body))
        .await
        .unwrap();
    let (status, result) = extract_response_body(response).await;

    assert_eq!(status, StatusCode::OK, "Import failed: {result}");
    assert_eq!(result["status"], "completed");
    assert_eq!(result["success"], true);
    assert_eq!(result["sheet_name"], "1 смена");
    assert_eq!(result["classes"], serde_json::json!(["5А", "5Б"]));
    assert_eq!(result["lessons_failed"], 0);

    let response = app
        .clone()
        .oneshot(empty_request("GET", &day_uri("5А", "monday")))
        .await
        .unwrap();
    let (status, day) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(day["day"], "monday");
    let lessons = day["lessons"].as_array().unwrap();
    assert_eq!(lessons.len(), 2);
    assert_eq!(lessons[0]["subject"], "Математика");
    assert_eq!(lessons[0]["room"], "12");
    assert_eq!(lessons[1]["subject"], "Физика");
    assert_eq!(lessons[1]["teacher"], "Иванов");
    assert_eq!(lessons[1]["room"], "201");
    assert_eq!(lessons[1]["shift"], "1");

    let response = app
        .oneshot(empty_request("GET", "/api/classes"))
        .await
        .unwrap();
    let (status, classes) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(classes, serde_json::json!(["5А", "5Б"]));
}

#[tokio::test]
async fn test_reimport_replaces_only_imported_classes() {
    let app = setup_test_app().await;

    let first = multipart_body(
        Some(("timetable.xlsx", sample_timetable_xlsx().as_slice())),
        &[("shift", "1")],
    );
    let response = app
        .clone()
        .oneshot(multipart_request("/api/schedule/import", first))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Second workbook only knows 5А, and only has a Friday
    let second = xlsx_from_sheets(&[(
        "1 смена",
        vec![
            vec!["", "", "5А", "", "6А", ""],
            vec!["Пятница", "1", "Технология", "", "", ""],
        ],
    )]);
    let body = multipart_body(Some(("timetable.xlsx", second.as_slice())), &[("shift", "1")]);
    let response = app
        .clone()
        .oneshot(multipart_request("/api/schedule/import", body))
        .await
        .unwrap();
    let (status, result) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["classes"], serde_json::json!(["5А"]));

    let response = app
        .clone()
        .oneshot(empty_request("GET", &day_uri("5А", "monday")))
        .await
        .unwrap();
    let (_, monday) = extract_response_body(response).await;
    assert!(monday["lessons"].as_array().unwrap().is_empty());

    let response = app
        .oneshot(empty_request("GET", &day_uri("5Б", "monday")))
        .await
        .unwrap();
    let (_, untouched) = extract_response_body(response).await;
    assert_eq!(untouched["lessons"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_import_unreadable_timetable_is_unprocessable() {
    let app = setup_test_app().await;

    let workbook = xlsx_from_sheets(&[("1 смена", vec![vec!["Просто текст"]])]);
    let body = multipart_body(Some(("timetable.xlsx", workbook.as_slice())), &[("shift", "1")]);
    let response = app
        .oneshot(multipart_request("/api/schedule/import", body))
        .await
        .unwrap();
    let (status, result) = extract_response_body(response).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(result["status"], "failed");
    assert_eq!(result["failure_stage"], "class_header");
}

#[tokio::test]
async fn test_import_requires_excel_file_and_shift() {
    let app = setup_test_app().await;
    let workbook = sample_timetable_xlsx();

    let cases = [
        multipart_body(None, &[("shift", "1")]),
        multipart_body(Some(("timetable.csv", workbook.as_slice())), &[("shift", "1")]),
        multipart_body(Some(("timetable.xlsx", workbook.as_slice())), &[]),
        multipart_body(Some(("timetable.xlsx", workbook.as_slice())), &[("shift", "  ")]),
    ];

    for body in cases {
        let response = app
            .clone()
            .oneshot(multipart_request("/api/schedule/import", body))
            .await
            .unwrap();
        let (status, error) = extract_response_body(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"]["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_preview_does_not_store() {
    let app = setup_test_app().await;

    let body = multipart_body(
        Some(("timetable.xlsx", sample_timetable_xlsx().as_slice())),
        &[("shift", "2")],
    );
    let response = app
        .clone()
        .oneshot(multipart_request("/api/schedule/preview", body))
        .await
        .unwrap();
    let (status, parsed) = extract_response_body(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(parsed["sheet_name"], "2 смена");
    assert_eq!(parsed["classes"], serde_json::json!(["10П", "11Р"]));
    assert!(!parsed["lessons"].as_array().unwrap().is_empty());

    let response = app
        .oneshot(empty_request("GET", "/api/classes"))
        .await
        .unwrap();
    let (_, classes) = extract_response_body(response).await;
    assert_eq!(classes, serde_json::json!([]));
}

#[tokio::test]
async fn test_preview_failure_reports_stage() {
    let app = setup_test_app().await;

    let body = multipart_body(Some(("timetable.xlsx", b"not a workbook".as_slice())), &[("shift", "1")]);
    let response = app
        .oneshot(multipart_request("/api/schedule/preview", body))
        .await
        .unwrap();
    let (status, error) = extract_response_body(response).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error"]["code"], "IMPORT_FAILED");
    assert!(
        error["error"]["message"]
            .as_str()
            .unwrap()
            .contains("'workbook'")
    );
}

#[tokio::test]
async fn test_manual_edit_replaces_day() {
    let app = setup_test_app().await;

    let response = app
        .clone()
        .oneshot(text_request(
            "PUT",
            &day_uri("7б", "Среда"),
            "1. Математика\n2. Физика (Иванов) - 201\nне урок\n3. Химия - 301",
        ))
        .await
        .unwrap();
    let (status, day) = extract_response_body(response).await;

    assert_eq!(status, StatusCode::OK, "Edit failed: {day}");
    assert_eq!(day["class_name"], "7Б");
    assert_eq!(day["day"], "wednesday");
    let lessons = day["lessons"].as_array().unwrap();
    assert_eq!(lessons.len(), 3);
    assert_eq!(lessons[1]["teacher"], "Иванов");
    assert_eq!(lessons[2]["subject"], "Химия");
    assert_eq!(lessons[2]["room"], "301");

    let response = app
        .clone()
        .oneshot(text_request("PUT", &day_uri("7Б", "wednesday"), "-"))
        .await
        .unwrap();
    let (status, cleared) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["lessons"].as_array().unwrap().is_empty());

    let response = app
        .oneshot(empty_request("GET", &format!("/api/schedule/{}", encode_segment("7Б"))))
        .await
        .unwrap();
    let (status, week) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(week.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_manual_edit_rejects_unreadable_body() {
    let app = setup_test_app().await;

    let response = app
        .oneshot(text_request("PUT", &day_uri("7Б", "monday"), "просто текст"))
        .await
        .unwrap();
    let (status, error) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_class_or_day_is_rejected() {
    let app = setup_test_app().await;

    for uri in [
        day_uri("12А", "monday"),
        day_uri("5Г", "monday"),
        day_uri("5А", "sunday"),
        format!("/api/schedule/{}", encode_segment("10Б")),
    ] {
        let response = app
            .clone()
            .oneshot(empty_request("GET", &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}
