//! HTTP implementation of [`ProgramApi`].

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use super::error::ApiError;
use super::types::{
    GetProgramParams, NewProgramRequest, NewProgramResponse, ProgramDescr, UpdateProgramRequest,
    UpdateProgramResponse,
};
use super::ProgramApi;

/// Program API client bound to a versioned base URL such as
/// `http://localhost:8080/v0`.
#[derive(Debug, Clone)]
pub struct HttpProgramClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpProgramClient {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("feldera-provider/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn programs_url(&self) -> String {
        format!("{}/programs", self.base_url)
    }

    fn program_url(&self, id: Uuid) -> String {
        format!("{}/programs/{}", self.base_url, id)
    }
}

#[async_trait]
impl ProgramApi for HttpProgramClient {
    async fn new_program(&self, req: &NewProgramRequest) -> Result<NewProgramResponse, ApiError> {
        let url = self.programs_url();
        debug!("POST {}", url);
        let resp = self.http.post(&url).json(req).send().await?;
        decode(resp, StatusCode::CREATED).await
    }

    async fn get_program(
        &self,
        id: Uuid,
        params: &GetProgramParams,
    ) -> Result<ProgramDescr, ApiError> {
        let url = self.program_url(id);
        debug!("GET {}", url);
        let resp = self
            .http
            .get(&url)
            .query(&[("with_code", params.with_code)])
            .send()
            .await?;
        decode(resp, StatusCode::OK).await
    }

    async fn update_program(
        &self,
        id: Uuid,
        req: &UpdateProgramRequest,
    ) -> Result<UpdateProgramResponse, ApiError> {
        let url = self.program_url(id);
        debug!("PATCH {}", url);
        let resp = self.http.patch(&url).json(req).send().await?;
        decode(resp, StatusCode::OK).await
    }

    async fn delete_program(&self, id: Uuid) -> Result<(), ApiError> {
        let url = self.program_url(id);
        debug!("DELETE {}", url);
        let resp = self.http.delete(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await?;
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Decode a JSON payload that is only valid with the `expected` status.
async fn decode<T: DeserializeOwned>(
    resp: reqwest::Response,
    expected: StatusCode,
) -> Result<T, ApiError> {
    let status = resp.status();
    let body = resp.text().await?;

    if status != expected {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    if body.trim().is_empty() {
        return Err(ApiError::UnexpectedBody {
            status: status.as_u16(),
            body,
            reason: "empty body".to_string(),
        });
    }

    serde_json::from_str(&body).map_err(|e| ApiError::UnexpectedBody {
        status: status.as_u16(),
        body,
        reason: e.to_string(),
    })
}
