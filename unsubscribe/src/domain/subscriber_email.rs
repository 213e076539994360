use crate::domain::ValidationError;
use lettre::message::Mailbox;
use lettre::Address;
use validator::ValidateEmail;

/// The bare address (`local@domain`) of a subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    /// Accepts either a bare address or a mailbox with a display name
    /// (`Jane Doe <jane@example.com>`). Only the address is kept.
    pub fn parse(s: String) -> Result<SubscriberEmail, ValidationError> {
        let address = match s.parse::<Mailbox>() {
            Ok(mailbox) => mailbox.email,
            Err(e) => {
                tracing::debug!("Invalid email: {e}");
                return Err(ValidationError::InvalidEmailAddress(s));
            }
        };

        if has_valid_dot_placement(&address) && AsRef::<str>::as_ref(&address).validate_email() {
            Ok(Self(address.to_string()))
        } else {
            Err(ValidationError::InvalidEmailAddress(s))
        }
    }
}

// A dot-atom local part cannot start or end with a dot, nor contain two in a row.
fn has_valid_dot_placement(address: &Address) -> bool {
    let user = address.user();
    !user.starts_with('.') && !user.ends_with('.') && !user.contains("..")
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
