//! `/v0/programs` handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::state::{MockState, Program};

/// Error body in the shape the Feldera API uses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub error_code: String,
    pub details: serde_json::Value,
}

pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn new(
        status: StatusCode,
        error_code: &str,
        message: String,
        details: serde_json::Value,
    ) -> Self {
        Self {
            status,
            body: ErrorResponse {
                message,
                error_code: error_code.to_string(),
                details,
            },
        }
    }

    fn unknown_program(id: Uuid) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "UnknownProgram",
            format!("Unknown program id '{}'", id),
            json!({ "program_id": id }),
        )
    }

    fn duplicate_name(name: &str) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            "DuplicateName",
            "An entity with this name already exists".to_string(),
            json!({ "name": name }),
        )
    }

    fn injected(status: StatusCode) -> Self {
        Self::new(
            status,
            "Injected",
            format!("Injected failure with status {}", status),
            json!({}),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|e| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            "InvalidUuidParam",
            format!("Invalid UUID string '{}': {}", raw, e),
            json!({ "value": raw }),
        )
    })
}

async fn begin(state: &MockState) -> Result<(), ApiError> {
    match state.begin_request().await {
        Some(status) => Err(ApiError::injected(status)),
        None => Ok(()),
    }
}

#[derive(Deserialize)]
pub struct NewProgramRequest {
    name: String,
    description: String,
    code: String,
}

#[derive(Serialize)]
pub struct NewProgramResponse {
    program_id: Uuid,
    version: i64,
}

pub async fn new_program(
    State(state): State<MockState>,
    Json(req): Json<NewProgramRequest>,
) -> Result<(StatusCode, Json<NewProgramResponse>), ApiError> {
    begin(&state).await?;
    let mut inner = state.inner.write().await;
    if inner.name_taken(&req.name, None) {
        return Err(ApiError::duplicate_name(&req.name));
    }

    let program = Program {
        program_id: Uuid::new_v4(),
        name: req.name,
        description: req.description,
        code: req.code,
        version: 1,
    };
    info!("Created program {} ({})", program.name, program.program_id);
    let resp = NewProgramResponse {
        program_id: program.program_id,
        version: program.version,
    };
    inner.programs.insert(program.program_id, program);
    Ok((StatusCode::CREATED, Json(resp)))
}

#[derive(Deserialize)]
pub struct GetProgramQuery {
    #[serde(default)]
    with_code: bool,
}

#[derive(Serialize)]
pub struct ProgramDescr {
    program_id: Uuid,
    name: String,
    description: String,
    version: i64,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

pub async fn get_program(
    State(state): State<MockState>,
    Path(program_id): Path<String>,
    Query(query): Query<GetProgramQuery>,
) -> Result<Json<ProgramDescr>, ApiError> {
    begin(&state).await?;
    let id = parse_id(&program_id)?;
    let inner = state.inner.read().await;
    let program = inner
        .programs
        .get(&id)
        .ok_or_else(|| ApiError::unknown_program(id))?;

    Ok(Json(ProgramDescr {
        program_id: program.program_id,
        name: program.name.clone(),
        description: program.description.clone(),
        version: program.version,
        status: "None",
        code: query.with_code.then(|| program.code.clone()),
    }))
}

#[derive(Deserialize)]
pub struct UpdateProgramRequest {
    name: String,
    description: Option<String>,
    code: Option<String>,
}

#[derive(Serialize)]
pub struct UpdateProgramResponse {
    version: i64,
}

pub async fn update_program(
    State(state): State<MockState>,
    Path(program_id): Path<String>,
    Json(req): Json<UpdateProgramRequest>,
) -> Result<Json<UpdateProgramResponse>, ApiError> {
    begin(&state).await?;
    let id = parse_id(&program_id)?;
    let mut inner = state.inner.write().await;
    if !inner.programs.contains_key(&id) {
        return Err(ApiError::unknown_program(id));
    }
    if inner.name_taken(&req.name, Some(id)) {
        return Err(ApiError::duplicate_name(&req.name));
    }

    let program = inner
        .programs
        .get_mut(&id)
        .ok_or_else(|| ApiError::unknown_program(id))?;
    program.name = req.name;
    if let Some(description) = req.description {
        program.description = description;
    }
    if let Some(code) = req.code {
        program.code = code;
    }
    program.version += 1;
    info!("Updated program {} to version {}", id, program.version);

    Ok(Json(UpdateProgramResponse {
        version: program.version,
    }))
}

pub async fn delete_program(
    State(state): State<MockState>,
    Path(program_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    begin(&state).await?;
    let id = parse_id(&program_id)?;
    let mut inner = state.inner.write().await;
    match inner.programs.remove(&id) {
        Some(program) => {
            info!("Deleted program {} ({})", program.name, id);
            Ok(StatusCode::OK)
        }
        None => Err(ApiError::unknown_program(id)),
    }
}
