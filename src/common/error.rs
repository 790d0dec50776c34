use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid data: {message}")]
    InvalidData { message: String },
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failing_layer() {
        let err = CatalogError::InvalidData {
            message: "expected an array".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid data: expected an array");

        let err: CatalogError = serde_json::from_str::<u8>("x").unwrap_err().into();
        assert!(err.to_string().starts_with("JSON deserialization failed"));
    }
}
