pub mod config;
pub mod error;
pub mod logging;

pub use self::config::*;
pub use self::error::*;
pub use self::logging::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_loading() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8085);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.max_files_per_batch, 50);
        assert_eq!(config.processing.worker_cap, 4);
    }

    #[test]
    fn test_error_handling() {
        let error = ChemExtractError::validation("test_field", "test message");
        assert_eq!(error.error_code(), "VALIDATION_ERROR");
        assert_eq!(error.http_status_code(), 400);

        let error = ChemExtractError::nothing_to_report("no CAS numbers found");
        assert_eq!(error.error_code(), "NOTHING_TO_REPORT");
        assert_eq!(error.http_status_code(), 400);
    }

    #[test]
    fn test_allowed_extensions_default() {
        let config = AppConfig::default();
        assert!(config.storage.allowed_extensions.contains(&"pdf".to_string()));
        assert!(!config.storage.allowed_extensions.contains(&"exe".to_string()));
    }
}
