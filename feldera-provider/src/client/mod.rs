//! Client for the Feldera program API.
//!
//! [`ProgramApi`] is the seam the reconciler talks to. [`HttpProgramClient`]
//! implements it over HTTP against `{endpoint}/v0`; tests may inject any
//! other implementation through the provider context.

pub mod error;
pub mod http;
pub mod types;

use async_trait::async_trait;
use uuid::Uuid;

pub use error::ApiError;
pub use http::HttpProgramClient;
pub use types::{
    GetProgramParams, NewProgramRequest, NewProgramResponse, ProgramDescr, UpdateProgramRequest,
    UpdateProgramResponse,
};

/// Operations on the remote program collection.
///
/// Each call is exactly one request/response exchange. Implementations do
/// not retry.
#[async_trait]
pub trait ProgramApi: Send + Sync {
    /// Create a program. Succeeds only with `201 Created`.
    async fn new_program(&self, req: &NewProgramRequest) -> Result<NewProgramResponse, ApiError>;

    /// Fetch a program by id.
    async fn get_program(
        &self,
        id: Uuid,
        params: &GetProgramParams,
    ) -> Result<ProgramDescr, ApiError>;

    /// Change name, description and/or code of a program.
    async fn update_program(
        &self,
        id: Uuid,
        req: &UpdateProgramRequest,
    ) -> Result<UpdateProgramResponse, ApiError>;

    /// Delete a program.
    async fn delete_program(&self, id: Uuid) -> Result<(), ApiError>;
}
