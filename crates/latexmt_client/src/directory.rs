use client_logging::client_debug;

use crate::http::{map_reqwest_error, status_error};
use crate::{FetchError, JobSummary, ReqwestApi};

/// Source of the server's current job list.
#[async_trait::async_trait]
pub trait JobDirectory: Send + Sync {
    /// Any non-2xx answer counts as a failure.
    async fn list_jobs(&self) -> Result<Vec<JobSummary>, FetchError>;
}

#[async_trait::async_trait]
impl JobDirectory for ReqwestApi {
    async fn list_jobs(&self) -> Result<Vec<JobSummary>, FetchError> {
        let url = self.endpoint("api/jobs")?;
        let response = self
            .client()
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let jobs: Vec<JobSummary> = response.json().await.map_err(map_reqwest_error)?;
        client_debug!("Listed {} jobs", jobs.len());
        Ok(jobs)
    }
}
