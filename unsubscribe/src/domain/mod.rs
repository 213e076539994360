mod request_data;
pub mod subscriber_email;
pub mod subscriber_id;
pub mod subscription_store;
mod unsubscribe_request;
mod validation_error;

pub use request_data::RequestData;
pub use subscriber_email::SubscriberEmail;
pub use subscriber_id::SubscriberId;
pub use subscription_store::{DatabaseError, SubscriptionStore};
pub use unsubscribe_request::UnsubscribeRequest;
pub use validation_error::ValidationError;
