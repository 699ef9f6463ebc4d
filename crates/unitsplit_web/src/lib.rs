//! `unitsplit_web` v1:
//! HTTP service that splits uploaded record workbooks by organisational unit.
//!
//! Module layout:
//! - `conf`     : environment keys, defaults and naming constants
//! - `config`   : environment-driven service configuration
//! - `spec`     : app state, request payloads and response models
//! - `error`    : request-level error type and its JSON rendering
//! - `util`     : JSON cell conversion and file-name helpers
//! - `storage`  : upload/output path resolution
//! - `workflow` : blocking load -> dedup -> partition -> renumber -> export pipelines
//! - `routes`   : axum handlers
pub mod conf;
pub mod config;
pub mod error;
pub mod routes;
pub mod spec;
pub mod storage;
pub mod util;
pub mod workflow;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

pub use config::{Config, ConfigError};
pub use error::WebError;
pub use spec::{AppState, SpecProcessRequest, SpecSelectionRequest, SpecStorageDirs};

/// Build the service router over `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/upload", post(routes::upload::upload_file))
        .route(
            "/get-college-statistics",
            post(routes::statistics::get_college_statistics),
        )
        .route(
            "/process-college",
            post(routes::process::process_selected_college),
        )
        .route("/download/{filename}", get(routes::download::download_file))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use rust_xlsxwriter::Workbook;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use unitsplit_io_xlsx::load_table;
    use unitsplit_table::EnumCellValue;
    use unitsplit_table::util::derive_column_cells;

    use super::*;

    const C_BOUNDARY: &str = "unitsplit-test-boundary";

    pub(crate) struct TestDir {
        path: PathBuf,
    }

    impl TestDir {
        pub(crate) fn new(prefix: &str) -> Self {
            let n_nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos();
            let path = std::env::temp_dir().join(format!(
                "unitsplit_web_{prefix}_{}_{}",
                std::process::id(),
                n_nanos
            ));
            std::fs::create_dir_all(&path).expect("create test dir");
            Self { path }
        }

        pub(crate) fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Drop for TestDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }

    fn build_app(dir: &TestDir) -> (Router, SpecStorageDirs) {
        let dirs = SpecStorageDirs {
            dir_uploads: dir.path().join("uploads"),
            dir_outputs: dir.path().join("outputs"),
        };
        dirs.ensure().expect("create dirs");
        let app = build_router(AppState::new(dirs.clone(), 16 * 1024 * 1024));
        (app, dirs)
    }

    /// Workbook with columns `序号 | 学院 | 标题 | WOS Accession Number`.
    fn build_xlsx(rows: &[(&str, &str)]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        for (n_col, c_name) in ["序号", "学院", "标题", "WOS Accession Number"]
            .iter()
            .enumerate()
        {
            ws.write_string(0, n_col as u16, *c_name).expect("header");
        }
        for (n_idx, (c_college, c_wos)) in rows.iter().enumerate() {
            let n_row = n_idx as u32 + 1;
            ws.write_number(n_row, 0, (n_idx + 10) as f64).expect("serial");
            ws.write_string(n_row, 1, *c_college).expect("college");
            ws.write_string(n_row, 2, format!("paper {n_idx}")).expect("title");
            ws.write_string(n_row, 3, *c_wos).expect("wos");
        }
        workbook.save_to_buffer().expect("save workbook")
    }

    /// Workbook with columns `序号 | 学院` only.
    fn build_xlsx_without_wos(colleges: &[&str]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        ws.write_string(0, 0, "序号").expect("header");
        ws.write_string(0, 1, "学院").expect("header");
        for (n_idx, c_college) in colleges.iter().enumerate() {
            let n_row = n_idx as u32 + 1;
            ws.write_number(n_row, 0, (n_idx + 1) as f64).expect("serial");
            ws.write_string(n_row, 1, *c_college).expect("college");
        }
        workbook.save_to_buffer().expect("save workbook")
    }

    fn build_upload_request(filename: &str, bytes: &[u8], file_type: Option<&str>) -> Request<Body> {
        let mut body: Vec<u8> = Vec::new();
        if let Some(c_type) = file_type {
            body.extend_from_slice(
                format!(
                    "--{C_BOUNDARY}\r\nContent-Disposition: form-data; name=\"file_type\"\r\n\r\n{c_type}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{C_BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{C_BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={C_BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("build request")
    }

    fn build_json_request(uri: &str, payload: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("build request")
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    async fn upload(app: &Router, filename: &str, rows: &[(&str, &str)]) -> Value {
        let (status, body) = send(app, build_upload_request(filename, &build_xlsx(rows), None)).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body
    }

    #[tokio::test]
    async fn test_upload_reports_colleges_in_first_seen_order() {
        let dir = TestDir::new("upload");
        let (app, dirs) = build_app(&dir);

        let rows = [("B", "W1"), ("A", "W2"), ("B", "W3")];
        let request = build_upload_request("main.xlsx", &build_xlsx(&rows), Some("checkFile"));
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["filename"], json!("main.xlsx"));
        assert_eq!(body["file_type"], json!("checkFile"));
        assert_eq!(body["record_count"], json!(3));
        assert_eq!(body["college_column"], json!("学院"));
        assert_eq!(body["colleges"], json!(["B", "A"]));
        assert_eq!(body["has_wos"], json!(true));
        assert!(dirs.dir_uploads.join("main.xlsx").is_file());

        let body = upload(&app, "other.xlsx", &rows).await;
        assert_eq!(body["file_type"], json!("mainFile"));
    }

    #[tokio::test]
    async fn test_upload_creates_missing_upload_dir() {
        let dir = TestDir::new("upload_mkdir");
        let dirs = SpecStorageDirs {
            dir_uploads: dir.path().join("fresh").join("uploads"),
            dir_outputs: dir.path().join("outputs"),
        };
        let app = build_router(AppState::new(dirs.clone(), 16 * 1024 * 1024));
        assert!(!dirs.dir_uploads.exists());

        let body = upload(&app, "main.xlsx", &[("A", "W1")]).await;
        assert_eq!(body["record_count"], json!(1));
        assert!(dirs.dir_uploads.join("main.xlsx").is_file());
    }

    #[tokio::test]
    async fn test_upload_rejects_missing_and_non_excel_files() {
        let dir = TestDir::new("upload_reject");
        let (app, _dirs) = build_app(&dir);

        let (status, body) = send(&app, build_upload_request("data.csv", b"a,b\n", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("please upload an Excel file"));

        let (status, body) = send(&app, build_upload_request("", b"", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("no file selected"));

        let (status, body) = send(&app, build_upload_request("broken.xlsx", b"not a zip", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_statistics_order_by_count_then_first_seen() {
        let dir = TestDir::new("stats");
        let (app, _dirs) = build_app(&dir);
        upload(&app, "main.xlsx", &[("B", "W1"), ("C", "W2"), ("A", "W3"), ("A", "W4")]).await;

        let (status, body) = send(
            &app,
            build_json_request(
                "/get-college-statistics",
                &json!({ "main_file_path": "uploads/main.xlsx", "college_column": "学院" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let dict_stats = body["college_stats"].as_object().expect("stats object");
        let l_keys: Vec<&str> = dict_stats.keys().map(String::as_str).collect();
        assert_eq!(l_keys, vec!["A", "B", "C"]);
        assert_eq!(dict_stats["A"], json!(2));
        assert_eq!(dict_stats["B"], json!(1));
    }

    #[tokio::test]
    async fn test_statistics_count_check_rows_left_after_dedup() {
        let dir = TestDir::new("stats_dedup");
        let (app, _dirs) = build_app(&dir);
        upload(&app, "main.xlsx", &[("A", "W1"), ("B", "W2")]).await;
        upload(
            &app,
            "check.xlsx",
            &[("A", "W1"), ("A", "W4"), ("B", "W2"), ("B", "W5"), ("B", "W6")],
        )
        .await;

        let (status, body) = send(
            &app,
            build_json_request(
                "/get-college-statistics",
                &json!({
                    "main_file_path": "main.xlsx",
                    "check_file_path": "check.xlsx",
                    "use_deduplication": true,
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "{body}");
        let dict_stats = body["college_stats"].as_object().expect("stats object");
        let l_keys: Vec<&str> = dict_stats.keys().map(String::as_str).collect();
        assert_eq!(l_keys, vec!["B", "A"]);
        assert_eq!(dict_stats["B"], json!(2));
        assert_eq!(dict_stats["A"], json!(1));
    }

    #[tokio::test]
    async fn test_dedup_names_the_file_missing_the_accession_column() {
        let dir = TestDir::new("dedup_missing");
        let (app, _dirs) = build_app(&dir);
        upload(&app, "main.xlsx", &[("A", "W1")]).await;
        for c_name in ["check_bare.xlsx", "main_bare.xlsx"] {
            let request = build_upload_request(c_name, &build_xlsx_without_wos(&["A", "B"]), None);
            let (status, body) = send(&app, request).await;
            assert_eq!(status, StatusCode::OK, "{body}");
            assert_eq!(body["has_wos"], json!(false));
        }

        for (c_main, c_check, c_label) in [
            ("main.xlsx", "check_bare.xlsx", "check file"),
            ("main_bare.xlsx", "main.xlsx", "main file"),
        ] {
            let (status, body) = send(
                &app,
                build_json_request(
                    "/get-college-statistics",
                    &json!({
                        "main_file_path": c_main,
                        "check_file_path": c_check,
                        "use_deduplication": true,
                    }),
                ),
            )
            .await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(
                body["error"],
                json!(format!("Column \"WOS Accession Number\" not found in {c_label}"))
            );
        }
    }

    #[tokio::test]
    async fn test_statistics_missing_column_is_rejected() {
        let dir = TestDir::new("stats_missing");
        let (app, _dirs) = build_app(&dir);
        upload(&app, "main.xlsx", &[("A", "W1")]).await;

        let (status, body) = send(
            &app,
            build_json_request(
                "/get-college-statistics",
                &json!({ "main_file_path": "main.xlsx", "college_column": "院系" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("Column \"院系\" not found in main file"));
    }

    #[tokio::test]
    async fn test_process_writes_both_subsets_and_never_overwrites() {
        let dir = TestDir::new("process");
        let (app, dirs) = build_app(&dir);
        upload(&app, "main.xlsx", &[("A", "W1"), ("B", "W2"), ("A", "W3")]).await;
        let payload = json!({
            "main_file_path": "main.xlsx",
            "selected_college": "A",
            "college_column": "学院",
        });

        let (status, body) = send(&app, build_json_request("/process-college", &payload)).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["college_file"], json!("A.xlsx"));
        assert_eq!(body["remaining_file"], json!("剩余数据.xlsx"));
        assert_eq!(body["college_count"], json!(2));
        assert_eq!(body["remaining_count"], json!(1));
        assert_eq!(body["original_count"], json!(3));
        assert_eq!(body["removed_count"], json!(0));

        let df = load_table(dirs.dir_outputs.join("A.xlsx")).expect("load output");
        assert_eq!(
            derive_column_cells(&df, "序号", "output").expect("serial"),
            vec![EnumCellValue::Integer(1), EnumCellValue::Integer(2)]
        );
        assert_eq!(
            derive_column_cells(&df, "WOS Accession Number", "output").expect("wos"),
            vec![
                EnumCellValue::String("W1".to_string()),
                EnumCellValue::String("W3".to_string())
            ]
        );

        let (status, body) = send(&app, build_json_request("/process-college", &payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["college_file"], json!("A_1.xlsx"));
        assert_eq!(body["remaining_file"], json!("剩余数据_1.xlsx"));
        assert_eq!(body["college_count"], json!(2));
        assert_eq!(body["remaining_count"], json!(1));
    }

    #[tokio::test]
    async fn test_process_deduplicates_check_file_against_main_file() {
        let dir = TestDir::new("process_dedup");
        let (app, _dirs) = build_app(&dir);
        upload(&app, "main.xlsx", &[("A", "W1"), ("B", "W2")]).await;
        upload(&app, "check.xlsx", &[("A", "W1"), ("A", "W4"), ("B", "W2"), ("B", "W5")]).await;

        let (status, body) = send(
            &app,
            build_json_request(
                "/process-college",
                &json!({
                    "main_file_path": "main.xlsx",
                    "check_file_path": "check.xlsx",
                    "use_deduplication": true,
                    "selected_college": "A",
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["college_count"], json!(1));
        assert_eq!(body["remaining_count"], json!(1));
        assert_eq!(body["original_count"], json!(4));
        assert_eq!(body["removed_count"], json!(2));
    }

    #[tokio::test]
    async fn test_process_without_matches_is_an_error() {
        let dir = TestDir::new("process_empty");
        let (app, dirs) = build_app(&dir);
        upload(&app, "main.xlsx", &[("A", "W1")]).await;

        let (status, body) = send(
            &app,
            build_json_request(
                "/process-college",
                &json!({ "main_file_path": "main.xlsx", "selected_college": "Z" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("no records found for \"Z\""));
        assert_eq!(
            std::fs::read_dir(&dirs.dir_outputs).expect("outputs").count(),
            0
        );

        let (status, body) = send(&app, build_json_request("/process-college", &json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_download_serves_outputs_only() {
        let dir = TestDir::new("download");
        let (app, dirs) = build_app(&dir);
        std::fs::write(dirs.dir_outputs.join("A.xlsx"), b"xlsx-bytes").expect("write output");
        std::fs::write(dir.path().join("secret.xlsx"), b"secret").expect("write secret");

        let request = Request::builder()
            .uri("/download/A.xlsx")
            .body(Body::empty())
            .expect("build request");
        let response = app.clone().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"A.xlsx\"; filename*=UTF-8''A.xlsx"
        );
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "10");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        assert_eq!(&bytes[..], b"xlsx-bytes");

        for c_uri in ["/download/missing.xlsx", "/download/..%2Fsecret.xlsx"] {
            let request = Request::builder()
                .uri(c_uri)
                .body(Body::empty())
                .expect("build request");
            let (status, body) = send(&app, request).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{c_uri}");
            assert_eq!(body["success"], json!(false));
        }
    }
}
