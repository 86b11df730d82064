pub type GrainResult<T> = Result<T, GrainError>;

#[derive(thiserror::Error, Debug)]
pub enum GrainError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("resource error: {0}")]
    Resource(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GrainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for errors that reject a single call without touching editor state.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<serde_json::Error> for GrainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            GrainError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            GrainError::encoding("x")
                .to_string()
                .contains("encoding error:")
        );
        assert!(
            GrainError::resource("x")
                .to_string()
                .contains("resource error:")
        );
        assert!(
            GrainError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = GrainError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
        assert!(!err.is_validation());
    }

    #[test]
    fn json_errors_map_to_serde() {
        let err: GrainError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, GrainError::Serde(_)));
    }
}
