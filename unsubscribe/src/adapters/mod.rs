mod dynamodb_subscription_store;

pub use dynamodb_subscription_store::DynamoDbSubscriptionStore;
