use latexmt_client::{ClientSettings, FailureKind, JobDirectory, JobSummary, ReqwestApi};
use pretty_assertions::assert_eq;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestApi {
    ReqwestApi::new(&ClientSettings::with_base_url(server.uri())).expect("api")
}

#[tokio::test]
async fn list_jobs_decodes_server_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"[
                {"id": 1, "status": "done", "download_url": "/x", "src_lang": "de", "tgt_lang": "en"},
                {"id": 2, "status": "running", "download_url": null}
            ]"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let jobs = api_for(&server).list_jobs().await.expect("jobs");
    assert_eq!(
        jobs,
        vec![
            JobSummary {
                id: 1,
                status: "done".to_string(),
                download_url: Some("/x".to_string()),
                src_lang: Some("de".to_string()),
                tgt_lang: Some("en".to_string()),
            },
            JobSummary {
                id: 2,
                status: "running".to_string(),
                download_url: None,
                src_lang: None,
                tgt_lang: None,
            },
        ]
    );
}

#[tokio::test]
async fn list_jobs_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .respond_with(ResponseTemplate::new(403).set_body_string("\"Jobs are not enabled\""))
        .mount(&server)
        .await;

    let err = api_for(&server).list_jobs().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(403));
}

#[tokio::test]
async fn list_jobs_fails_on_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let err = api_for(&server).list_jobs().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn list_jobs_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw("[]", "application/json"),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        request_timeout_ms: 50,
        ..ClientSettings::with_base_url(server.uri())
    };
    let api = ReqwestApi::new(&settings).expect("api");

    let err = api.list_jobs().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn list_jobs_reports_unreachable_server() {
    let server = MockServer::start().await;
    let api = api_for(&server);
    drop(server);

    let err = api.list_jobs().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
}
