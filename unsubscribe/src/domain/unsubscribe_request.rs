use crate::domain::{RequestData, SubscriberEmail, SubscriberId, ValidationError};

pub struct UnsubscribeRequest {
    pub id: SubscriberId,
    pub email: SubscriberEmail,
}

impl TryFrom<RequestData> for UnsubscribeRequest {
    type Error = ValidationError;

    fn try_from(value: RequestData) -> Result<Self, Self::Error> {
        let id = SubscriberId::parse(value.id)?;
        let email = SubscriberEmail::parse(value.email_address)?;

        Ok(UnsubscribeRequest { id, email })
    }
}
