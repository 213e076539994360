use crate::domain::{DatabaseError, SubscriberEmail, SubscriberId, SubscriptionStore};
use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

/// Subscriptions are stored one item per email address (`PK`), tagged with
/// the id handed out to the subscriber (`SubscriberId`).
#[derive(Debug, Clone)]
pub struct DynamoDbSubscriptionStore {
    client: Client,
    table_name: String,
}

impl DynamoDbSubscriptionStore {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

#[async_trait]
impl SubscriptionStore for DynamoDbSubscriptionStore {
    #[tracing::instrument(
        name = "delete_subscription_from_dynamo_db",
        skip(self),
        fields(table_name = %self.table_name)
    )]
    async fn delete_subscription(
        &self,
        id: &SubscriberId,
        email: &SubscriberEmail,
    ) -> Result<(), DatabaseError> {
        // A missing item passes the condition, so repeated deletes are no-ops.
        let delete_res = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(email.to_string()))
            .condition_expression("attribute_not_exists(PK) OR #subscriber_id = :subscriber_id")
            .expression_attribute_names("#subscriber_id", "SubscriberId")
            .expression_attribute_values(":subscriber_id", AttributeValue::S(id.to_string()))
            .send()
            .await;

        if let Err(e) = &delete_res {
            let is_mismatch = e
                .as_service_error()
                .map(|e| e.is_conditional_check_failed_exception())
                .unwrap_or(false);

            if is_mismatch {
                return Err(DatabaseError::SubscriptionMismatch(format!(
                    "{} is not subscribed under id {}",
                    email, id
                )));
            }
        }

        delete_res.context(format!(
            "Failure deleting record from DynamoDB. Using table {}",
            &self.table_name
        ))?;

        Ok(())
    }
}
