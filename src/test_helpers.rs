/// Shared test helper functions for building workbooks and HTTP requests
///
/// Workbooks are generated in memory with `rust_xlsxwriter`, so tests exercise
/// the same calamine decoding path as real uploads.
use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_xlsxwriter::Workbook;
use serde_json::{Value, json};

pub const MULTIPART_BOUNDARY: &str = "timetable-test-boundary";

/// Extract response body as JSON for testing
pub async fn extract_response_body(response: axum::response::Response) -> (StatusCode, Value) {
    use axum::body::to_bytes;

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let body: Value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| json!({"error": "Invalid JSON response"}));
    (status, body)
}

/// Builds an xlsx file with one worksheet per `(name, rows)`; empty strings leave cells blank
pub fn xlsx_from_sheets(sheets: &[(&str, Vec<Vec<&str>>)]) -> Vec<u8> {
    let mut workbook = Workbook::new();

    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).expect("Invalid sheet name");
        for (r, row) in rows.iter().enumerate() {
            for (c, text) in row.iter().enumerate() {
                if text.is_empty() {
                    continue;
                }
                worksheet
                    .write_string(
                        u32::try_from(r).unwrap(),
                        u16::try_from(c).unwrap(),
                        *text,
                    )
                    .expect("Failed to write cell");
            }
        }
    }

    workbook.save_to_buffer().expect("Failed to build workbook")
}

/// A two-shift timetable laid out the way schools usually send it
pub fn sample_timetable_xlsx() -> Vec<u8> {
    xlsx_from_sheets(&[
        ("Титул", vec![vec!["Расписание на 2025/2026 учебный год"]]),
        (
            "1 смена",
            vec![
                vec!["Расписание уроков 1 смена"],
                vec!["День", "№", "5А", "каб.", "5Б", "каб."],
                vec!["Понедельник", "1", "Математика", "12", "Русский язык (Петрова) - 14а", ""],
                vec!["", "2", "Физика (Иванов) - 201", "", "Литература", "14а"],
                vec!["", "3", "-", "", "Музыка", ""],
                vec!["Вторник", "1", "История", "305", "Химия", "301"],
                vec!["", "2", "Биология", "", "—", ""],
            ],
        ),
        (
            "2 смена",
            vec![
                vec!["", "", "10П", "", "11Р", ""],
                vec!["Среда", "1", "Право", "", "Алгебра - 40", ""],
                vec!["", "2", "Экономика", "41", "Геометрия", ""],
            ],
        ),
    ])
}

/// Encodes multipart/form-data with an optional file field and plain text fields
pub fn multipart_body(file: Option<(&str, &[u8])>, fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();

    if let Some((file_name, data)) = file {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

/// POST request carrying a multipart body built by [`multipart_body`]
pub fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Percent-encodes a path segment so class names like `5А` fit in a request URI
pub fn encode_segment(segment: &str) -> String {
    segment
        .bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' {
                (b as char).to_string()
            } else {
                format!("%{b:02X}")
            }
        })
        .collect()
}

/// Empty-bodied request with the given method
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Request with a plain-text body
pub fn text_request(method: &str, uri: &str, text: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "text/plain; charset=utf-8")
        .body(Body::from(text.to_string()))
        .unwrap()
}
