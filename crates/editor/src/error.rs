use storyreel_client::ClientError;

/// Errors surfaced by editor sessions.
///
/// By the time either variant is returned, local state is consistent:
/// remote failures have already been rolled back, and precondition
/// failures never touched it.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// The backend rejected or never received the action.
    #[error("{action} failed: {source}")]
    ActionFailed {
        action: &'static str,
        #[source]
        source: ClientError,
    },

    /// The caller invoked an action whose preconditions do not hold.
    #[error("{action} not allowed: {reason}")]
    Precondition { action: &'static str, reason: String },
}

impl EditorError {
    pub(crate) fn failed(action: &'static str) -> impl FnOnce(ClientError) -> EditorError {
        move |source| {
            tracing::warn!(action, error = %source, "Remote action failed");
            EditorError::ActionFailed { action, source }
        }
    }

    pub(crate) fn precondition(action: &'static str, reason: impl Into<String>) -> EditorError {
        EditorError::Precondition {
            action,
            reason: reason.into(),
        }
    }
}
