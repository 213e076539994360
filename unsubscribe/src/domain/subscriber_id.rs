use crate::domain::ValidationError;

/// Opaque identifier issued to a subscriber when they signed up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberId(String);

impl SubscriberId {
    pub fn parse(s: String) -> Result<SubscriberId, ValidationError> {
        if s.is_empty() {
            Err(ValidationError::EmptyId)
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for SubscriberId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
