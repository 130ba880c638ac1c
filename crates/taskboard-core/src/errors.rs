/// Rejection produced while parsing a request into typed task input.
/// Display strings are sent to clients verbatim.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required")]
    TitleMissing,
    #[error("Title must be a string")]
    TitleNotString,
    #[error("Title cannot be empty")]
    TitleEmpty,
    #[error("Description must be a string")]
    DescriptionNotString,
    #[error("Priority must be 1, 2, or 3")]
    InvalidPriority,
    #[error("Status must be either \"pending\" or \"completed\"")]
    InvalidStatus,
    #[error("Invalid ID parameter")]
    InvalidId,
    #[error("Request body must be a JSON object")]
    BodyNotObject,
    #[error("Malformed JSON body: {0}")]
    MalformedBody(String),
}

impl ValidationError {
    /// Field the rejection refers to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::TitleMissing | Self::TitleNotString | Self::TitleEmpty => Some("title"),
            Self::DescriptionNotString => Some("description"),
            Self::InvalidPriority => Some("priority"),
            Self::InvalidStatus => Some("status"),
            Self::InvalidId => Some("id"),
            Self::BodyNotObject | Self::MalformedBody(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_client_facing() {
        assert_eq!(ValidationError::TitleMissing.to_string(), "Title is required");
        assert_eq!(
            ValidationError::InvalidPriority.to_string(),
            "Priority must be 1, 2, or 3"
        );
        assert_eq!(
            ValidationError::InvalidStatus.to_string(),
            r#"Status must be either "pending" or "completed""#
        );
        assert_eq!(ValidationError::InvalidId.to_string(), "Invalid ID parameter");
    }

    #[test]
    fn field_mapping() {
        assert_eq!(ValidationError::TitleEmpty.field(), Some("title"));
        assert_eq!(ValidationError::InvalidId.field(), Some("id"));
        assert_eq!(ValidationError::MalformedBody("eof".into()).field(), None);
    }
}
