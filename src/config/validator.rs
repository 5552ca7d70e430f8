use thiserror::Error;

use crate::agents::config::{ChatConfig, GithubConfig, LlmProviderConfig};
use crate::config::Settings;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_server(&settings.server) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_llm(&settings.llm) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_chat(&settings.chat) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_github(&settings.github) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(server: &crate::config::ServerSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if server.host.is_empty() {
            errors.push(ValidationError::MissingField("server.host".to_string()));
        }

        if server.port == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_llm(llm: &LlmProviderConfig) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if llm.model.trim().is_empty() {
            errors.push(ValidationError::MissingField("llm.model".to_string()));
        }

        if llm.api_key_env.trim().is_empty() {
            errors.push(ValidationError::MissingField("llm.api_key_env".to_string()));
        }

        if let Some(url) = &llm.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                errors.push(ValidationError::InvalidValue {
                    field: "llm.base_url".to_string(),
                    reason: "Must be an http(s) URL".to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_chat(chat: &ChatConfig) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if !(0.0..=2.0).contains(&chat.temperature) {
            errors.push(ValidationError::InvalidValue {
                field: "chat.temperature".to_string(),
                reason: format!("{} is outside [0, 2]", chat.temperature),
            });
        }

        if chat.max_iterations == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "chat.max_iterations".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        if chat.max_output_tokens == Some(0) {
            errors.push(ValidationError::InvalidValue {
                field: "chat.max_output_tokens".to_string(),
                reason: "Must be greater than 0 when set".to_string(),
            });
        }

        if chat.llm_timeout_seconds == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "chat.llm_timeout_seconds".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if chat.tool_timeout_seconds == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "chat.tool_timeout_seconds".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if chat.system_prompt_path.trim().is_empty() {
            errors.push(ValidationError::MissingField("chat.system_prompt_path".to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_github(github: &GithubConfig) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if github.base_url.trim().is_empty() {
            errors.push(ValidationError::MissingField("github.base_url".to_string()));
        }

        if github.repos_per_page == 0 || github.repos_per_page > 100 {
            errors.push(ValidationError::InvalidValue {
                field: "github.repos_per_page".to_string(),
                reason: "Must be between 1 and 100".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
