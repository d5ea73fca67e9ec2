use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::PylockError;

/// What a command run produced, in the shape the CLI prints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: CommandStatus,
    pub message: String,
    #[serde(default)]
    pub details: Value,
}

impl ExecutionOutcome {
    pub(crate) fn success(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Ok,
            message: message.into(),
            details,
        }
    }

    /// Folds an error into an outcome whose details carry the machine-readable
    /// reason and, when there is one, a hint for the user.
    #[must_use]
    pub fn from_error(err: &PylockError) -> Self {
        let mut details = json!({ "reason": err.reason() });
        if let Some(hint) = err.hint() {
            details["hint"] = json!(hint);
        }
        let status = if err.is_user_error() {
            CommandStatus::UserError
        } else {
            CommandStatus::Failure
        };
        Self {
            status,
            message: err.to_string(),
            details,
        }
    }

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self.status {
            CommandStatus::Ok => 0,
            CommandStatus::UserError => 1,
            CommandStatus::Failure => 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandStatus {
    Ok,
    UserError,
    Failure,
}
