//! State record shared by declared configuration, persisted state and the
//! remote service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ProgramConfig;
use crate::error::{ProviderError, Result};

/// Persisted state of one managed program.
///
/// `id` and `version` are assigned by the service. `id` is set once by a
/// successful create and never changes afterwards; `version` is always the
/// last value the service returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramState {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub should_compile: bool,
    pub version: Option<i64>,
}

impl ProgramState {
    /// Seed state for an imported program: only the id is known.
    pub fn seed(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Planned state for `config`, carrying the computed fields of `prior`.
    pub fn planned(config: &ProgramConfig, prior: Option<&ProgramState>) -> Self {
        Self {
            id: prior.and_then(|p| p.id.clone()),
            name: Some(config.name.clone()),
            description: Some(config.description.clone()),
            code: Some(config.code.clone()),
            should_compile: config.should_compile,
            version: prior.and_then(|p| p.version),
        }
    }

    /// Parse `id` from its canonical textual form.
    ///
    /// A missing id is reported the same way as a malformed one.
    pub fn program_id(&self) -> Result<Uuid> {
        let raw = self.id.as_deref().unwrap_or_default();
        Uuid::parse_str(raw).map_err(|source| ProviderError::Parse {
            id: raw.to_string(),
            source,
        })
    }

    pub(crate) fn required_name(&self) -> Result<&str> {
        required(&self.name, "name")
    }

    pub(crate) fn required_description(&self) -> Result<&str> {
        required(&self.description, "description")
    }

    pub(crate) fn required_code(&self) -> Result<&str> {
        required(&self.code, "code")
    }
}

fn required<'a>(value: &'a Option<String>, attribute: &'static str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or(ProviderError::MissingAttribute(attribute))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProgramConfig {
        ProgramConfig {
            name: "orders".to_string(),
            description: "order pipeline".to_string(),
            code: "CREATE TABLE t (x INT);".to_string(),
            should_compile: true,
        }
    }

    #[test]
    fn seed_sets_only_id() {
        let state = ProgramState::seed("3fa85f64-5717-4562-b3fc-2c963f66afa6");
        assert_eq!(
            state.id.as_deref(),
            Some("3fa85f64-5717-4562-b3fc-2c963f66afa6")
        );
        assert!(state.name.is_none());
        assert!(state.description.is_none());
        assert!(state.code.is_none());
        assert!(state.version.is_none());
        assert!(!state.should_compile);
    }

    #[test]
    fn planned_keeps_computed_fields_of_prior() {
        let prior = ProgramState {
            id: Some("3fa85f64-5717-4562-b3fc-2c963f66afa6".to_string()),
            name: Some("old".to_string()),
            description: Some("old".to_string()),
            code: Some("old".to_string()),
            should_compile: false,
            version: Some(4),
        };
        let planned = ProgramState::planned(&config(), Some(&prior));
        assert_eq!(planned.id, prior.id);
        assert_eq!(planned.version, Some(4));
        assert_eq!(planned.name.as_deref(), Some("orders"));
        assert!(planned.should_compile);

        let fresh = ProgramState::planned(&config(), None);
        assert!(fresh.id.is_none());
        assert!(fresh.version.is_none());
    }

    #[test]
    fn program_id_rejects_malformed_and_missing() {
        let err = ProgramState::seed("not-a-uuid").program_id().unwrap_err();
        assert!(matches!(err, ProviderError::Parse { ref id, .. } if id == "not-a-uuid"));

        let err = ProgramState::default().program_id().unwrap_err();
        assert!(matches!(err, ProviderError::Parse { .. }));

        let id = ProgramState::seed("3FA85F64-5717-4562-B3FC-2C963F66AFA6")
            .program_id()
            .unwrap();
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[test]
    fn deserializes_partial_state() {
        let state: ProgramState =
            serde_json::from_str(r#"{"id":"3fa85f64-5717-4562-b3fc-2c963f66afa6"}"#).unwrap();
        assert_eq!(state, ProgramState::seed("3fa85f64-5717-4562-b3fc-2c963f66afa6"));
    }
}
