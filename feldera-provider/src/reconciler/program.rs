//! Program reconciler - maps program lifecycle operations to the Feldera API.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::ResourceReconciler;
use crate::client::{ApiError, GetProgramParams, NewProgramRequest, UpdateProgramRequest};
use crate::context::ProviderContext;
use crate::error::{Operation, ProviderError, Result};
use crate::model::ProgramState;

/// Reconciler for `program` resources.
#[derive(Debug, Clone)]
pub struct ProgramReconciler {
    ctx: Arc<ProviderContext>,
}

impl ProgramReconciler {
    pub fn new(ctx: Arc<ProviderContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ProviderContext {
        &self.ctx
    }
}

/// Map a failed call on an existing program. 404 becomes `NotFound` so the
/// host can drop its state instead of retrying.
fn remote_failure(operation: Operation, id: Uuid, source: ApiError) -> ProviderError {
    if source.is_not_found() {
        ProviderError::NotFound { id: id.to_string() }
    } else {
        ProviderError::Client { operation, source }
    }
}

/// Warning for a program that asks to be compiled. Compilation is not
/// triggered; the flag is only persisted.
fn compile_notice(name: &str, state: &ProgramState) -> Option<String> {
    state.should_compile.then(|| {
        format!(
            "Program {} requests compilation, which this provider does not perform",
            name
        )
    })
}

fn note_compile_request(name: &str, state: &ProgramState) {
    if let Some(notice) = compile_notice(name, state) {
        warn!("{}", notice);
    }
}

#[async_trait]
impl ResourceReconciler for ProgramReconciler {
    type State = ProgramState;

    async fn create(&self, planned: &ProgramState) -> Result<ProgramState> {
        let request = NewProgramRequest {
            name: planned.required_name()?.to_string(),
            description: planned.required_description()?.to_string(),
            code: planned.required_code()?.to_string(),
        };
        info!("Creating program {}", request.name);

        let created = self
            .ctx
            .client()
            .new_program(&request)
            .await
            .map_err(|source| ProviderError::Client {
                operation: Operation::Create,
                source,
            })?;

        let mut state = planned.clone();
        state.id = Some(created.program_id.to_string());
        state.version = Some(created.version);
        debug!(
            "Created program {} ({}) at version {}",
            request.name, created.program_id, created.version
        );
        note_compile_request(&request.name, &state);
        Ok(state)
    }

    async fn read(&self, current: &ProgramState) -> Result<ProgramState> {
        let id = current.program_id()?;
        debug!("Reading program {}", id);

        let descr = self
            .ctx
            .client()
            .get_program(id, &GetProgramParams { with_code: true })
            .await
            .map_err(|source| remote_failure(Operation::Read, id, source))?;

        let mut state = current.clone();
        state.name = Some(descr.name);
        state.description = Some(descr.description);
        state.version = Some(descr.version);
        if let Some(code) = descr.code {
            state.code = Some(code);
        }
        Ok(state)
    }

    async fn update(&self, planned: &ProgramState) -> Result<ProgramState> {
        let id = planned.program_id()?;
        let request = UpdateProgramRequest {
            name: planned.required_name()?.to_string(),
            description: planned.description.clone(),
            code: planned.code.clone(),
        };
        info!("Updating program {} ({})", request.name, id);

        let updated = self
            .ctx
            .client()
            .update_program(id, &request)
            .await
            .map_err(|source| remote_failure(Operation::Update, id, source))?;

        if let Some(previous) = planned.version {
            if updated.version <= previous {
                warn!(
                    "Program {} version did not advance: {} -> {}",
                    id, previous, updated.version
                );
            }
        }

        let mut state = planned.clone();
        state.version = Some(updated.version);
        note_compile_request(&request.name, &state);
        Ok(state)
    }

    async fn delete(&self, current: &ProgramState) -> Result<()> {
        let id = current.program_id()?;
        info!("Deleting program {}", id);

        self.ctx
            .client()
            .delete_program(id)
            .await
            .map_err(|source| remote_failure(Operation::Delete, id, source))
    }

    fn import(&self, id: &str) -> ProgramState {
        ProgramState::seed(id.trim())
    }
}
