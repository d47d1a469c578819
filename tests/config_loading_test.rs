//! Configuration Loading Tests
//!
//! Covers every source: the process environment, a `.env` file, and YAML
//! files with `${VAR}` expansion.

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use txn_uploadr::config::{
        Config, ConfigError, ConfigLoader, ENV_BASE_PATH, ENV_BUCKET, ENV_ENDPOINT,
        ENV_PATH_STYLE, ENV_REGION,
    };

    const ALL_VARS: [&str; 5] = [ENV_BUCKET, ENV_REGION, ENV_ENDPOINT, ENV_PATH_STYLE, ENV_BASE_PATH];

    fn clear_env() {
        for var in ALL_VARS {
            std::env::remove_var(var);
        }
    }

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // ========================================================================
    // TEST: Environment
    // ========================================================================

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env();
        std::env::set_var(ENV_BUCKET, "env-bucket");
        std::env::set_var(ENV_REGION, "eu-west-1");
        std::env::set_var(ENV_ENDPOINT, "http://localhost:4566");
        std::env::set_var(ENV_PATH_STYLE, "true");

        let config = Config::from_env().unwrap();
        clear_env();

        assert_eq!(config.storage.bucket, "env-bucket");
        assert_eq!(config.storage.region, "eu-west-1");
        assert_eq!(
            config.storage.endpoint.as_deref(),
            Some("http://localhost:4566")
        );
        assert!(config.storage.force_path_style);
        assert_eq!(config.upload.base_path, "uploads");
    }

    #[test]
    #[serial]
    fn test_from_env_lists_missing_variables() {
        clear_env();
        std::env::set_var(ENV_REGION, "eu-west-1");

        let err = Config::from_env().unwrap_err();
        clear_env();

        match err {
            ConfigError::MissingVariables(keys) => assert_eq!(keys, vec![ENV_BUCKET]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    // ========================================================================
    // TEST: Dotenv File
    // ========================================================================

    #[test]
    #[serial]
    fn test_dotenv_fills_unset_variables() {
        clear_env();
        let file = write_file(
            "S3_BUCKET_NAME=dotenv-bucket\nS3_REGION=ap-south-1\nAWS_S3_USE_PATH_STYLE=true\n",
        );

        let config = ConfigLoader::from_env_with_dotenv(file.path()).unwrap();

        assert_eq!(config.storage.bucket, "dotenv-bucket");
        assert_eq!(config.storage.region, "ap-south-1");
        assert!(config.storage.force_path_style);
    }

    #[test]
    #[serial]
    fn test_environment_wins_over_dotenv() {
        clear_env();
        std::env::set_var(ENV_BUCKET, "env-bucket");
        let file = write_file("S3_BUCKET_NAME=dotenv-bucket\nS3_REGION=ap-south-1\n");

        let config = ConfigLoader::from_env_with_dotenv(file.path()).unwrap();
        clear_env();

        assert_eq!(config.storage.bucket, "env-bucket");
        assert_eq!(config.storage.region, "ap-south-1");
    }

    #[test]
    #[serial]
    fn test_missing_dotenv_is_skipped() {
        clear_env();
        std::env::set_var(ENV_BUCKET, "env-bucket");

        let err = ConfigLoader::from_env_with_dotenv("/nonexistent/txn-uploadr/.env").unwrap_err();
        clear_env();

        assert!(matches!(
            err,
            ConfigError::MissingVariables(ref keys) if keys == &vec![ENV_REGION]
        ));
    }

    // ========================================================================
    // TEST: YAML File
    // ========================================================================

    #[test]
    #[serial]
    fn test_load_yaml_with_expansion() {
        clear_env();
        std::env::set_var(ENV_BUCKET, "yaml-bucket");

        let file = write_file(
            r#"
storage:
  bucket: "${S3_BUCKET_NAME}"
  region: "${S3_REGION:-us-east-1}"
  endpoint: "http://localhost:9000"
  force_path_style: true
upload:
  base_path: "incoming"
"#,
        );

        let config = Config::load(file.path()).unwrap();
        clear_env();

        assert_eq!(config.storage.bucket, "yaml-bucket");
        assert_eq!(config.storage.region, "us-east-1");
        assert!(config.storage.force_path_style);
        assert_eq!(config.upload.base_path, "incoming");
    }

    #[test]
    fn test_load_yaml_defaults() {
        let file = write_file("storage:\n  bucket: b\n  region: us-east-1\n");

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.storage.endpoint, None);
        assert!(!config.storage.force_path_style);
        assert_eq!(config.upload.base_path, "uploads");
    }

    #[test]
    fn test_load_yaml_missing_region() {
        let file = write_file("storage:\n  bucket: b\n");

        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::MissingVariables(ref keys)) if keys == &vec![ENV_REGION]
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Config::load("/nonexistent/txn-uploadr.yaml"),
            Err(ConfigError::IoError(_))
        ));
    }

    #[test]
    fn test_load_malformed_yaml() {
        let file = write_file("storage: [not, a, map\n");
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }
}
