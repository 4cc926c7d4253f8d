//! Plan: what has to happen to bring a program in line with its declaration.

use std::fmt;

use crate::config::ProgramConfig;
use crate::model::ProgramState;

/// A single attribute that differs between state and declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeChange {
    pub attribute: &'static str,
    pub before: Option<String>,
    pub after: Option<String>,
}

/// Planned action for one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// No program exists yet.
    Create,
    /// The program exists but differs from its declaration.
    Update { changes: Vec<AttributeChange> },
    /// State matches the declaration.
    NoOp,
}

impl Plan {
    pub fn is_noop(&self) -> bool {
        matches!(self, Plan::NoOp)
    }
}

/// Compare the declaration with (refreshed) state.
pub fn plan(config: &ProgramConfig, state: Option<&ProgramState>) -> Plan {
    let state = match state {
        Some(state) if state.id.is_some() => state,
        _ => return Plan::Create,
    };

    let mut changes = Vec::new();
    let mut compare = |attribute: &'static str, before: Option<&str>, after: &str| {
        if before != Some(after) {
            changes.push(AttributeChange {
                attribute,
                before: before.map(str::to_string),
                after: Some(after.to_string()),
            });
        }
    };
    compare("name", state.name.as_deref(), &config.name);
    compare("description", state.description.as_deref(), &config.description);
    compare("code", state.code.as_deref(), &config.code);
    if state.should_compile != config.should_compile {
        changes.push(AttributeChange {
            attribute: "should_compile",
            before: Some(state.should_compile.to_string()),
            after: Some(config.should_compile.to_string()),
        });
    }

    if changes.is_empty() {
        Plan::NoOp
    } else {
        Plan::Update { changes }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plan::Create => writeln!(f, "+ program will be created"),
            Plan::NoOp => writeln!(f, "  no changes"),
            Plan::Update { changes } => {
                writeln!(f, "~ program will be updated in-place")?;
                for change in changes {
                    writeln!(
                        f,
                        "    {}: {} -> {}",
                        change.attribute,
                        summarize(change.before.as_deref()),
                        summarize(change.after.as_deref())
                    )?;
                }
                Ok(())
            }
        }
    }
}

/// Short rendering of a value; SQL code is usually too long to print.
fn summarize(value: Option<&str>) -> String {
    match value {
        None => "(unknown)".to_string(),
        Some(v) if v.contains('\n') || v.len() > 60 => format!("({} bytes)", v.len()),
        Some(v) => format!("{:?}", v),
    }
}
