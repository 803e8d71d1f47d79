//! Integration tests for config

#[cfg(test)]
mod tests {
    use pyfreeze_config::*;
    use pyfreeze_types::{ColorChoice, DataMapping, OutputFormat};
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::{tempdir, NamedTempFile};

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for var in [
            "PYFREEZE_OUTPUT",
            "PYFREEZE_COLOR",
            "PYFREEZE_PYTHON",
            "PYFREEZE_ENV_DIR",
            "PYFREEZE_REQUIREMENTS",
        ] {
            std::env::remove_var(var);
        }
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[general]
default_output = "plain"
color = "never"

[build]
env_dir = ".env"
python = "python3.12"

[install]
extra_packages = ["pyinstaller"]

[[bundle.base_data]]
source = "wezel"
destination = "wezel"
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.general.default_output, OutputFormat::Plain);
        assert_eq!(config.general.color, ColorChoice::Never);
        assert_eq!(config.build.env_dir, PathBuf::from(".env"));
        assert_eq!(config.build.python.as_deref(), Some("python3.12"));
        // Unset fields keep their defaults
        assert_eq!(config.build.requirements_file, PathBuf::from("requirements.txt"));
        assert_eq!(config.build.default_entry_point, "wezel/main.py");
        assert_eq!(config.install.extra_packages, vec!["pyinstaller"]);
        assert_eq!(config.bundle.base_data, vec![DataMapping::folder("wezel")]);
    }

    #[tokio::test]
    async fn test_project_file_wins() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(fixed_paths::CONFIG_FILE_NAME),
            "[build]\ndist_dir = \"out\"\n",
        )
        .unwrap();

        let config = Config::load_or_default(None, dir.path()).await.unwrap();
        assert_eq!(config.dist_path(dir.path()), dir.path().join("out"));
    }

    #[tokio::test]
    async fn test_missing_explicit_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let result = Config::load_or_default(Some(&missing), dir.path()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[build\nenv_dir = 3").unwrap();
        let result = Config::load_from_file(temp_file.path()).await;
        assert!(matches!(
            result,
            Err(pyfreeze_errors::Error::Config(
                pyfreeze_errors::ConfigError::ParseError { .. }
            ))
        ));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        let workdir = PathBuf::from("/work");
        assert_eq!(config.env_path(&workdir), PathBuf::from("/work/.venv"));
        assert_eq!(
            config.requirements_path(&workdir),
            PathBuf::from("/work/requirements.txt")
        );
        assert_eq!(config.dist_path(&workdir), PathBuf::from("/work/dist"));
        assert_eq!(config.work_path(&workdir), PathBuf::from("/work/build"));
        assert!(config.install.extra_packages.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("PYFREEZE_OUTPUT", "json");
        std::env::set_var("PYFREEZE_COLOR", "always");
        std::env::set_var("PYFREEZE_PYTHON", "/usr/bin/python3.11");
        std::env::set_var("PYFREEZE_ENV_DIR", "venv-build");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.general.default_output, OutputFormat::Json);
        assert_eq!(config.general.color, ColorChoice::Always);
        assert_eq!(config.build.python.as_deref(), Some("/usr/bin/python3.11"));
        assert_eq!(config.build.env_dir, PathBuf::from("venv-build"));

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("PYFREEZE_COLOR", "sometimes");

        let mut config = Config::default();
        assert!(config.merge_env().is_err());

        clear_env();
    }

    #[test]
    fn test_absolute_env_dir_rejected() {
        let mut config = Config::default();
        config.build.env_dir = PathBuf::from("/tmp/venv");
        assert!(config.validate().is_err());

        config.build.env_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dirs_must_stay_below_workdir() {
        for value in [".", "..", "../x", "./", "venv/../.."] {
            let mut config = Config::default();
            config.build.dist_dir = PathBuf::from(value);
            assert!(config.validate().is_err(), "dist_dir = {value:?}");

            let mut config = Config::default();
            config.build.work_dir = PathBuf::from(value);
            assert!(config.validate().is_err(), "work_dir = {value:?}");
        }

        let mut config = Config::default();
        config.build.dist_dir = PathBuf::from("out/bin");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_current_dir_as_env_dir_rejected() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("PYFREEZE_ENV_DIR", ".");
        let mut config = Config::default();
        let err = config.merge_env().unwrap_err();
        assert!(matches!(
            err,
            pyfreeze_errors::Error::Config(pyfreeze_errors::ConfigError::InvalidValue {
                ref field,
                ..
            }) if field == "build.env_dir"
        ));

        clear_env();
    }

    #[tokio::test]
    async fn test_fallback_data_defaults_and_override() {
        let defaults = Config::default().bundle.fallback_data;
        assert_eq!(
            defaults,
            vec![
                DataMapping::folder("wezel/widgets/icons/my_icons"),
                DataMapping::folder("wezel/widgets/icons/fugue-icons-3.5.6"),
                DataMapping::folder("wezel"),
            ]
        );

        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[bundle]\nfallback_data = []").unwrap();
        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert!(config.bundle.fallback_data.is_empty());
        assert!(config.bundle.base_data.is_empty());
    }
}
