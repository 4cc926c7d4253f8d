//! Request and response bodies of the `/v0/programs` endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /programs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProgramRequest {
    pub name: String,
    pub description: String,
    pub code: String,
}

/// Response of `POST /programs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProgramResponse {
    pub program_id: Uuid,
    pub version: i64,
}

/// Query parameters of `GET /programs/{id}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetProgramParams {
    /// Ask the service to include the SQL code in the response.
    pub with_code: bool,
}

/// Program descriptor returned by `GET /programs/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramDescr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub version: i64,
    /// Only present when requested with `with_code=true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Body of `PATCH /programs/{id}`.
///
/// `None` leaves the remote field unchanged; `Some("")` clears it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProgramRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Response of `PATCH /programs/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProgramResponse {
    pub version: i64,
}
