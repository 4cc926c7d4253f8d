//! Host-side lifecycle driver: refresh, plan, then create or update, and
//! the flows that keep the local state file in step with the remote.

use tracing::{info, warn};

use crate::config::ProgramConfig;
use crate::error::{HostError, ProviderError, Result};
use crate::model::ProgramState;
use crate::plan::{plan, Plan};
use crate::reconciler::ResourceReconciler;
use crate::state_file::StateFile;

/// Result of an apply run.
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    pub plan: Plan,
    pub state: ProgramState,
}

/// Result of a destroy run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestroyOutcome {
    /// No state was persisted, nothing to delete.
    NoState,
    /// The program was deleted and its state discarded.
    Deleted,
    /// The program was already gone remotely; its state was discarded.
    AlreadyGone,
}

/// Refresh persisted state from the remote service.
///
/// Returns `None` when there is nothing to refresh or the program vanished
/// remotely, in which case it will be recreated.
pub async fn refresh<R>(
    reconciler: &R,
    prior: Option<&ProgramState>,
) -> Result<Option<ProgramState>>
where
    R: ResourceReconciler<State = ProgramState>,
{
    let prior = match prior {
        Some(prior) if prior.id.is_some() => prior,
        _ => return Ok(None),
    };

    match reconciler.read(prior).await {
        Ok(state) => Ok(Some(state)),
        Err(ProviderError::NotFound { id }) => {
            warn!("Program {} no longer exists remotely, dropping state", id);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Converge the remote program to `config`.
pub async fn apply<R>(
    reconciler: &R,
    config: &ProgramConfig,
    prior: Option<&ProgramState>,
) -> Result<ApplyOutcome>
where
    R: ResourceReconciler<State = ProgramState>,
{
    let current = refresh(reconciler, prior).await?;
    let plan = plan(config, current.as_ref());

    let state = match (&plan, current) {
        (Plan::NoOp, Some(current)) => {
            info!("Program {} is up to date", config.name);
            current
        }
        (Plan::Update { .. }, Some(current)) => {
            reconciler
                .update(&ProgramState::planned(config, Some(&current)))
                .await?
        }
        _ => reconciler.create(&ProgramState::planned(config, None)).await?,
    };

    Ok(ApplyOutcome { plan, state })
}

/// Apply `config` and persist the resulting state.
///
/// On failure the state file is left as it was.
pub async fn apply_state<R>(
    reconciler: &R,
    config: &ProgramConfig,
    file: &StateFile,
) -> std::result::Result<ApplyOutcome, HostError>
where
    R: ResourceReconciler<State = ProgramState>,
{
    let prior = file.load().await?;
    let outcome = apply(reconciler, config, prior.as_ref()).await?;
    file.save(&outcome.state).await?;
    Ok(outcome)
}

/// Re-read the persisted program and write the refreshed state back.
///
/// A failed read leaves the last known state in place. A program that
/// vanished remotely has its state removed.
pub async fn refresh_state<R>(
    reconciler: &R,
    file: &StateFile,
) -> std::result::Result<Option<ProgramState>, HostError>
where
    R: ResourceReconciler<State = ProgramState>,
{
    let prior = file.load().await?;
    let refreshed = refresh(reconciler, prior.as_ref()).await?;
    match &refreshed {
        Some(state) => file.save(state).await?,
        None => file.remove().await?,
    }
    Ok(refreshed)
}

/// Delete the persisted program and discard its state.
///
/// A program that is already gone remotely counts as deleted. Any other
/// failure keeps the state file so the delete can be retried.
pub async fn destroy_state<R>(
    reconciler: &R,
    file: &StateFile,
) -> std::result::Result<DestroyOutcome, HostError>
where
    R: ResourceReconciler<State = ProgramState>,
{
    let Some(state) = file.load().await? else {
        return Ok(DestroyOutcome::NoState);
    };

    let outcome = match reconciler.delete(&state).await {
        Ok(()) => DestroyOutcome::Deleted,
        Err(ProviderError::NotFound { id }) => {
            warn!("Program {} was already deleted", id);
            DestroyOutcome::AlreadyGone
        }
        Err(e) => return Err(e.into()),
    };
    file.remove().await?;
    Ok(outcome)
}

/// Adopt an existing program by id: seed state, read it, persist it.
pub async fn import_state<R>(
    reconciler: &R,
    id: &str,
    file: &StateFile,
) -> std::result::Result<ProgramState, HostError>
where
    R: ResourceReconciler<State = ProgramState>,
{
    if file.load().await?.is_some() {
        return Err(HostError::StateExists(file.path().to_path_buf()));
    }
    let seed = reconciler.import(id);
    let state = reconciler.read(&seed).await?;
    file.save(&state).await?;
    Ok(state)
}
