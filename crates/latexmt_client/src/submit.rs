use client_logging::{client_info, client_warn};
use reqwest::multipart::{Form, Part};

use crate::http::{map_reqwest_error, status_error};
use crate::{DocumentPayload, FetchError, JobSummary, ReqwestApi};

#[async_trait::async_trait]
pub trait Submitter: Send + Sync {
    /// Sends inline text for translation and returns the response body.
    async fn translate(&self, fields: &[(String, String)]) -> Result<String, FetchError>;

    /// Uploads a document as a new background job.
    async fn submit_job(
        &self,
        fields: &[(String, String)],
        document: DocumentPayload,
    ) -> Result<Option<JobSummary>, FetchError>;
}

fn text_form(fields: &[(String, String)]) -> Form {
    fields.iter().fold(Form::new(), |form, (name, value)| {
        form.text(name.clone(), value.clone())
    })
}

#[async_trait::async_trait]
impl Submitter for ReqwestApi {
    async fn translate(&self, fields: &[(String, String)]) -> Result<String, FetchError> {
        let url = self.endpoint("api/translate")?;
        let response = self
            .client()
            .post(url)
            .multipart(text_form(fields))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        // The server explains rejected input in the body, so it is shown as is.
        let status = response.status();
        if !status.is_success() {
            client_warn!("Translation request answered with {}", status);
        }
        response.text().await.map_err(map_reqwest_error)
    }

    async fn submit_job(
        &self,
        fields: &[(String, String)],
        document: DocumentPayload,
    ) -> Result<Option<JobSummary>, FetchError> {
        let url = self.endpoint("api/jobs")?;
        let DocumentPayload { file_name, bytes } = document;
        let byte_len = bytes.len();
        let part = Part::bytes(bytes).file_name(file_name.clone());
        let form = text_form(fields).part("document", part);

        let response = self
            .client()
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        let created = serde_json::from_slice::<JobSummary>(&body).ok();
        match &created {
            Some(job) => client_info!(
                "Submitted document {} ({} bytes) as job {}",
                file_name,
                byte_len,
                job.id
            ),
            None => client_info!("Submitted document {} ({} bytes)", file_name, byte_len),
        }
        Ok(created)
    }
}
