//! CLI error handling

use std::fmt;

use hcb_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Error from the build pipeline
    Ops(hcb_errors::Error),
}

impl CliError {
    /// Process exit status for this error
    ///
    /// A failed `conda build` passes its own status through.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Ops(e) => e.external_exit_code().unwrap_or(1),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Ops(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Ops(e) => Some(e),
        }
    }
}

impl From<hcb_errors::Error> for CliError {
    fn from(e: hcb_errors::Error) -> Self {
        CliError::Ops(e)
    }
}
