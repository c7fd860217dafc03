//! Integration tests for error types

#[cfg(test)]
mod tests {
    use hcb_errors::*;

    #[test]
    fn test_error_conversion() {
        let err: Error = MetadataError::MissingField {
            field: "project.name".into(),
        }
        .into();
        assert!(matches!(err, Error::Metadata(_)));
    }

    #[test]
    fn test_error_display() {
        let err = RecipeError::InvalidRequirement {
            requirement: "requests>=".into(),
            message: "unexpected end of input".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid requirement `requests>=`: unexpected end of input"
        );
    }

    #[test]
    fn test_conda_build_failure_carries_exit_code() {
        let err: Error = BuildError::CondaBuildFailed {
            command: "conda build".into(),
            exit_code: Some(3),
        }
        .into();
        assert_eq!(err.external_exit_code(), Some(3));
        assert_eq!(err.user_code(), Some("build.conda_build_failed"));
        assert!(err.to_string().contains("status 3"));
    }

    #[test]
    fn test_signal_termination_has_no_exit_code() {
        let err = BuildError::CondaBuildFailed {
            command: "conda build".into(),
            exit_code: None,
        };
        assert!(err.to_string().contains("terminated by signal"));
        assert_eq!(Error::from(err).external_exit_code(), None);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io_err.into();
        assert!(matches!(
            err,
            Error::Io {
                kind: std::io::ErrorKind::PermissionDenied,
                ..
            }
        ));
        assert_eq!(err.user_code(), Some("error.io"));
    }

    #[test]
    fn test_hints_are_forwarded() {
        let err: Error = ConfigError::InvalidValue {
            field: "HCB_RECIPE_FORMAT".into(),
            value: "xml".into(),
        }
        .into();
        assert!(err.user_hint().is_some());
    }

    #[test]
    fn test_missing_project_hints_match_cli_arguments() {
        let errors: [Error; 2] = [
            MetadataError::ProjectFileNotFound {
                path: "/nowhere/pyproject.toml".into(),
            }
            .into(),
            ConfigError::NotFound {
                path: "/nowhere/pyproject.toml".into(),
            }
            .into(),
        ];
        for err in errors {
            let hint = err.user_hint().unwrap();
            assert!(!hint.contains("--project"), "{hint}");
            assert!(hint.contains("project directory"), "{hint}");
        }
    }
}
