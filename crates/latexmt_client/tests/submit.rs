use latexmt_client::{
    ClientSettings, DocumentPayload, FailureKind, ReqwestApi, Submitter,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestApi {
    ReqwestApi::new(&ClientSettings::with_base_url(server.uri())).expect("api")
}

fn fields() -> Vec<(String, String)> {
    vec![
        ("src_lang".to_string(), "de".to_string()),
        ("tgt_lang".to_string(), "en".to_string()),
        ("input_text".to_string(), "Hallo Welt".to_string()),
    ]
}

#[tokio::test]
async fn translate_posts_form_and_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/translate"))
        .and(body_string_contains("Hallo Welt"))
        .and(body_string_contains("name=\"src_lang\""))
        .respond_with(ResponseTemplate::new(200).set_body_string("Hello world"))
        .expect(1)
        .mount(&server)
        .await;

    let text = api_for(&server).translate(&fields()).await.expect("text");
    assert_eq!(text, "Hello world");
}

#[tokio::test]
async fn translate_returns_body_of_rejected_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/translate"))
        .respond_with(ResponseTemplate::new(400).set_body_string("missing field tgt_lang"))
        .mount(&server)
        .await;

    let text = api_for(&server).translate(&[]).await.expect("text");
    assert_eq!(text, "missing field tgt_lang");
}

#[tokio::test]
async fn submit_job_uploads_document_and_decodes_job() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/jobs"))
        .and(body_string_contains("filename=\"paper.tex\""))
        .and(body_string_contains("\\section{Einleitung}"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"id": 7, "status": "new", "download_url": null, "src_lang": "de", "tgt_lang": "en"}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let document = DocumentPayload {
        file_name: "paper.tex".to_string(),
        bytes: b"\\section{Einleitung}".to_vec(),
    };
    let created = api_for(&server)
        .submit_job(&fields(), document)
        .await
        .expect("submitted")
        .expect("job");
    assert_eq!(created.id, 7);
    assert_eq!(created.status, "new");
}

#[tokio::test]
async fn submit_job_fails_when_jobs_are_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/jobs"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let document = DocumentPayload {
        file_name: "paper.zip".to_string(),
        bytes: vec![0x50, 0x4b, 0x03, 0x04],
    };
    let err = api_for(&server)
        .submit_job(&fields(), document)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(403));
}
