use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for reforge operations.
pub type ReforgeResult<T> = Result<T, ReforgeError>;

/// The error type for matching, capture, input and configuration.
#[derive(Debug, Error)]
pub enum ReforgeError {
    #[error("Image could not be decoded or is empty: {description}")]
    ImageDecode { description: String },

    #[error("Template not found at {path:?}")]
    TemplateNotFound { path: PathBuf },

    #[error("Template at {path:?} is not a valid image: {source}")]
    TemplateDecode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Screen capture of {region} failed: {reason}")]
    Capture { region: String, reason: String },

    #[error("Capture returned {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    CaptureSizeMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Input injection failed: {description}")]
    Input { description: String },

    #[error("Region '{name}' has zero area ({width}x{height})")]
    InvalidRegion {
        name: String,
        width: u32,
        height: u32,
    },

    #[error("Invalid configuration: {description}")]
    InvalidConfig { description: String },

    #[error("No primary template fits inside the {width}x{height} capture region")]
    NoUsableTemplates { width: u32, height: u32 },

    #[error(
        "Tier template '{name}' ({template_width}x{template_height}) is larger than the {width}x{height} capture region"
    )]
    TierTemplateTooLarge {
        name: String,
        template_width: u32,
        template_height: u32,
        width: u32,
        height: u32,
    },

    #[error("Could not access config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config file {path:?} is malformed: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Result cache at {path:?} failed: {description}")]
    CacheIo { path: PathBuf, description: String },

    #[error("Could not start worker thread '{name}': {source}")]
    WorkerSpawn {
        name: String,
        source: std::io::Error,
    },

    #[error("Automation channel closed")]
    ChannelClosed,
}

impl ReforgeError {
    /// Errors that abort a run before the first attempt.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ReforgeError::TemplateNotFound { .. }
                | ReforgeError::TemplateDecode { .. }
                | ReforgeError::InvalidRegion { .. }
                | ReforgeError::InvalidConfig { .. }
                | ReforgeError::NoUsableTemplates { .. }
                | ReforgeError::TierTemplateTooLarge { .. }
                | ReforgeError::ConfigIo { .. }
                | ReforgeError::ConfigParse { .. }
                | ReforgeError::WorkerSpawn { .. }
        )
    }

    /// Environmental failures that only cost the current attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ReforgeError::Capture { .. }
                | ReforgeError::CaptureSizeMismatch { .. }
                | ReforgeError::Input { .. }
                | ReforgeError::ImageDecode { .. }
        )
    }

    pub fn input(description: impl Into<String>) -> Self {
        ReforgeError::Input {
            description: description.into(),
        }
    }

    pub fn invalid_config(description: impl Into<String>) -> Self {
        ReforgeError::InvalidConfig {
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_errors_are_fatal() {
        let err = ReforgeError::TemplateNotFound {
            path: PathBuf::from("missing.png"),
        };
        assert!(err.is_fatal());
        assert!(!err.is_transient());

        let err = ReforgeError::NoUsableTemplates {
            width: 10,
            height: 10,
        };
        assert!(err.is_fatal());
    }

    #[test]
    fn test_capture_errors_are_transient() {
        let err = ReforgeError::Capture {
            region: "(0, 0, 10, 10)".to_string(),
            reason: "outside display".to_string(),
        };
        assert!(err.is_transient());
        assert!(!err.is_fatal());
        assert!(ReforgeError::input("click rejected").is_transient());
    }

    #[test]
    fn test_error_messages() {
        let err = ReforgeError::CaptureSizeMismatch {
            expected_width: 300,
            expected_height: 80,
            actual_width: 299,
            actual_height: 80,
        };
        assert_eq!(
            err.to_string(),
            "Capture returned 299x80, expected 300x80"
        );
    }
}
