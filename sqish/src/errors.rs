use sqish_types::SqishError;
use tracing::error;

/// Print an error for the user without a stack trace and log it.
pub fn display_user_error(err: &anyhow::Error) {
    error!("{err:?}");
    eprintln!("{}", user_message(err));
}

fn user_message(err: &anyhow::Error) -> String {
    if let Some(SqishError::PipelineClosed) = err.downcast_ref::<SqishError>() {
        return "sqish: search stopped unexpectedly".to_string();
    }
    format!("sqish: {err:#}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_message_includes_context_chain() {
        let err = anyhow!("database is locked").context("history search failed");
        assert_eq!(
            user_message(&err),
            "sqish: history search failed: database is locked"
        );
    }

    #[test]
    fn test_closed_pipeline_message() {
        let err = anyhow::Error::new(SqishError::PipelineClosed);
        assert_eq!(user_message(&err), "sqish: search stopped unexpectedly");
    }
}
