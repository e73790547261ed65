pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

/// Headroom over the file limit for the text parts and multipart framing.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/", get(health::welcome_handler))
        .route("/health", get(health::health_handler))
        .route("/api/analyze-resume", post(handlers::handle_analyze_resume))
        .route("/api/ai-analysis", post(handlers::handle_ai_analysis))
        .route(
            "/api/job-requirements",
            post(handlers::handle_job_requirements),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header::CONTENT_TYPE, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::extraction::Extractor;
    use crate::matching::TfIdfSimilarity;
    use crate::narrative::tests::{CannedNarrator, NARRATIVE};
    use crate::narrative::{Narrator, FAILURE_MESSAGE};

    const BOUNDARY: &str = "hireflow-test-boundary";

    fn make_state() -> AppState {
        make_state_with(Arc::new(CannedNarrator {
            text: Some(NARRATIVE),
        }))
    }

    fn make_state_with(narrator: Arc<dyn Narrator>) -> AppState {
        AppState {
            config: Config {
                llm_api_key: "test-key".to_string(),
                llm_base_url: "http://localhost:0/v1".to_string(),
                llm_model: "test-model".to_string(),
                llm_timeout_secs: 1,
                llm_max_attempts: 1,
                port: 0,
                rust_log: "debug".to_string(),
                upload_dir: std::env::temp_dir(),
                max_upload_bytes: 64 * 1024,
                cors_origins: vec![],
            },
            extractor: Arc::new(Extractor::new().unwrap()),
            similarity: Arc::new(TfIdfSimilarity),
            narrator,
        }
    }

    /// Single-page PDF with one Helvetica text line per entry. Offsets in
    /// the xref table are computed, so the file is well-formed.
    fn make_pdf(lines: &[&str]) -> Vec<u8> {
        let mut content = String::from("BT /F1 12 Tf 72 720 Td\n");
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                content.push_str("0 -18 Td\n");
            }
            content.push_str(&format!("({line}) Tj\n"));
        }
        content.push_str("ET");

        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
                .to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, object) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{object}\nendobj\n", i + 1).as_bytes());
        }

        let xref_at = pdf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.extend_from_slice(xref.as_bytes());
        pdf
    }

    fn make_resume_pdf() -> Vec<u8> {
        make_pdf(&[
            "Sam Rivera",
            "Backend developer with 6 years of experience in Python and Docker.",
            "Education: Bachelor's degree in Computer Science.",
        ])
    }

    const JOB_TEXT: &[u8] = b"Python and Docker developer. Bachelor's degree. 5 years of experience.";

    /// `(field name, file name, bytes)` parts encoded as multipart/form-data.
    fn make_multipart(parts: &[(&str, Option<&str>, &[u8])]) -> Body {
        let mut body = Vec::new();
        for (name, file_name, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match file_name {
                Some(file_name) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/pdf\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Body::from(body)
    }

    fn multipart_request(uri: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(make_multipart(parts))
            .unwrap()
    }

    fn json_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        send_to(make_state(), request).await
    }

    async fn send_to(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, json) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "hireflow-api");
    }

    #[tokio::test]
    async fn test_welcome() {
        let (status, json) = send(Request::get("/").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Welcome to HireFlow API!");
    }

    #[tokio::test]
    async fn test_job_requirements() {
        let (status, json) = send(json_request(
            "/api/job-requirements",
            r#"{"job_text": "Python and Docker. Master's degree. 3+ years of experience."}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["skills"]["hard_skills"]["python"], 1);
        assert_eq!(json["experience"]["years"], 3);
    }

    #[tokio::test]
    async fn test_job_requirements_rejects_blank_text() {
        let (status, json) =
            send(json_request("/api/job-requirements", r#"{"job_text": "   "}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");

        let (status, _) = send(json_request("/api/job-requirements", "{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analyze_resume_requires_resume_field() {
        let (status, json) = send(multipart_request(
            "/api/analyze-resume",
            &[("job_requirements", None, b"Python developer")],
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]["message"].as_str().unwrap().contains("resume"));
    }

    #[tokio::test]
    async fn test_ai_analysis_requires_job_post_field() {
        let (status, json) = send(multipart_request(
            "/api/ai-analysis",
            &[
                ("resume", Some("cv.pdf"), b"%PDF-1.4"),
                ("job_requirements", None, b"wrong field name"),
            ],
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]["message"].as_str().unwrap().contains("job_post"));
    }

    #[tokio::test]
    async fn test_non_pdf_resume_is_rejected() {
        let (status, _) = send(multipart_request(
            "/api/analyze-resume",
            &[
                ("resume", Some("cv.docx"), b"PK\x03\x04 word document"),
                ("job_requirements", None, b"Python"),
            ],
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversize_resume_is_rejected() {
        let mut data = b"%PDF-1.4\n".to_vec();
        data.resize(128 * 1024, b' ');
        let (status, json) = send(multipart_request(
            "/api/analyze-resume",
            &[("resume", Some("cv.pdf"), data.as_slice()), ("job_requirements", None, b"Python")],
        ))
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json["error"]["code"], "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn test_unreadable_pdf_is_unprocessable() {
        let (status, json) = send(multipart_request(
            "/api/analyze-resume",
            &[
                ("resume", Some("cv.pdf"), b"%PDF-1.4 truncated"),
                ("job_requirements", None, b"Python"),
            ],
        ))
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["code"], "UNPROCESSABLE_ENTITY");
    }

    #[tokio::test]
    async fn test_job_requirements_rejects_malformed_json() {
        let (status, json) =
            send(json_request("/api/job-requirements", "{\"job_text\": ")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_analyze_resume_with_pdf() {
        let pdf = make_resume_pdf();
        let (status, json) = send(multipart_request(
            "/api/analyze-resume",
            &[
                ("resume", Some("cv.pdf"), pdf.as_slice()),
                ("job_requirements", None, JOB_TEXT),
            ],
        ))
        .await;
        assert_eq!(status, StatusCode::OK);

        let analysis = &json["analysis"];
        assert_eq!(analysis["comparison"]["skill_match"]["match_percentage"], 100.0);
        assert_eq!(analysis["comparison"]["overall_match"]["qualified"], true);
        assert_eq!(analysis["resume_analysis"]["experience"]["years"], 6);
        assert_eq!(analysis["similarity_backend"], "tfidf");
        assert!(json.get("ai_analysis").is_none());
    }

    #[tokio::test]
    async fn test_ai_analysis_with_pdf() {
        let pdf = make_resume_pdf();
        let (status, json) = send(multipart_request(
            "/api/ai-analysis",
            &[
                ("resume", Some("cv.pdf"), pdf.as_slice()),
                ("job_post", None, JOB_TEXT),
            ],
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["analysis"]["comparison"]["overall_match"]["qualified"], true);

        let sections = &json["ai_analysis"]["sections"];
        for key in [
            "candidate_overview",
            "skills_analysis",
            "qualification_assessment",
            "hiring_recommendations",
            "development_opportunities",
        ] {
            assert!(sections[key]["content"].is_string(), "missing section {key}");
        }
        assert_eq!(sections["skills_analysis"]["content"], "Skills Match: 80%");
        assert_eq!(json["ai_analysis"]["confidence_score"], true);
        assert_eq!(json["inline_scores"]["skills_match"], 80);
    }

    #[tokio::test]
    async fn test_ai_analysis_narrative_failure_keeps_analysis() {
        let pdf = make_resume_pdf();
        let state = make_state_with(Arc::new(CannedNarrator { text: None }));
        let (status, json) = send_to(
            state,
            multipart_request(
                "/api/ai-analysis",
                &[
                    ("resume", Some("cv.pdf"), pdf.as_slice()),
                    ("job_post", None, JOB_TEXT),
                ],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["analysis"]["comparison"]["overall_match"]["qualified"], true);
        assert_eq!(json["ai_analysis"]["hr_analysis"], FAILURE_MESSAGE);
        assert_eq!(json["ai_analysis"]["confidence_score"], 0);
        assert!(json["ai_analysis"]["error"].is_string());
        assert!(json["inline_scores"].is_null());
    }
}
