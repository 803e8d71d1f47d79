//! CLI error handling

use std::fmt;

use pyfreeze_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration or pipeline error
    Pipeline(pyfreeze_errors::Error),
    /// Invalid command arguments
    InvalidArguments(String),
    /// I/O error
    Io(std::io::Error),
}

impl CliError {
    /// Stable error code, if the underlying error has one
    pub fn code(&self) -> Option<&'static str> {
        match self {
            CliError::Pipeline(e) => e.user_code(),
            CliError::InvalidArguments(_) => Some("cli.invalid_arguments"),
            CliError::Io(_) => Some("error.io"),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Pipeline(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                if e.is_retryable() {
                    write!(f, "\n  Retry: safe to retry this operation.")?;
                }
                Ok(())
            }
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Pipeline(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::InvalidArguments(_) => None,
        }
    }
}

impl From<pyfreeze_errors::Error> for CliError {
    fn from(e: pyfreeze_errors::Error) -> Self {
        CliError::Pipeline(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyfreeze_errors::InstallError;

    #[test]
    fn test_display_includes_code_and_hint() {
        let err = CliError::from(pyfreeze_errors::Error::from(
            InstallError::RequirementsNotFound {
                path: "/w/requirements.txt".to_string(),
            },
        ));
        let text = err.to_string();
        assert!(text.starts_with("requirements manifest not found: /w/requirements.txt"));
        assert!(text.contains("Code: install.requirements_not_found"));
        assert!(text.contains("Hint: "));
        assert_eq!(err.code(), Some("install.requirements_not_found"));
    }
}
