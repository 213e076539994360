use std::sync::Arc;

use aws_lambda_events::apigw::ApiGatewayProxyRequest;
use lambda_extension::Extension;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use telemetry::{get_subscriber, init_subscriber, init_tracer, TraceFlushExtension};
use tokio::sync::mpsc::unbounded_channel;

use unsubscribe::adapters::DynamoDbSubscriptionStore;
use unsubscribe::configuration::get_configuration;
use unsubscribe::templates::{ConfirmationTemplate, UNSUBSCRIBE_SUCCESSFUL};
use unsubscribe::unsubscribe_handler::UnsubscribeEventHandler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let configuration = get_configuration().await?;

    let tracer = init_tracer(&configuration.telemetry)?;
    let subscriber = get_subscriber(
        configuration.telemetry.dataset_name.clone(),
        "info".into(),
        std::io::stdout,
        &configuration.telemetry,
        &tracer,
    );

    init_subscriber(subscriber);

    let template = ConfirmationTemplate::load(UNSUBSCRIBE_SUCCESSFUL);
    if let Err(e) = &template {
        // Keep serving: every request will be answered with a 500.
        tracing::error!(
            error.cause_chain = ?e,
            error.message = %e,
            "Failed to load the confirmation template",
        );
    }

    let store = DynamoDbSubscriptionStore::new(
        configuration.database.dynamo_db_client().await,
        configuration.database.table_name.clone(),
    );

    let (request_done_sender, request_done_receiver) = unbounded_channel::<()>();

    let flush_extension = Arc::new(TraceFlushExtension::new(request_done_receiver));

    let arc_tracer = Arc::new(tracer);
    let extension = Extension::new()
        // Internal extensions only support INVOKE events.
        .with_events(&["INVOKE"])
        .with_events_processor(lambda_extension::service_fn(|event| {
            let cloned_tracer = arc_tracer.clone();

            let flush_extension = flush_extension.clone();
            async move { flush_extension.invoke(event, cloned_tracer).await }
        }))
        // Internal extension names MUST be unique within a given Lambda function.
        .with_extension_name("internal-flush")
        // Extensions MUST be registered before calling lambda_runtime::run(), which ends the Init
        // phase and begins the Invoke phase.
        .register()
        .await?;

    let handler = Arc::new(UnsubscribeEventHandler::new(
        template,
        store,
        configuration.application.allowed_origin.clone(),
        request_done_sender,
    ));

    tracing::info!(
        stage = %configuration.application.stage,
        table_name = %configuration.database.table_name,
        "Unsubscribe function initialised"
    );

    //https://github.com/awslabs/aws-lambda-rust-runtime/blob/main/examples/extension-internal-flush/src/main.rs
    tokio::try_join!(
        run(service_fn(|event: LambdaEvent<ApiGatewayProxyRequest>| {
            let handler = handler.clone();

            async move { handler.invoke(event).await }
        })),
        extension.run(),
    )?;

    Ok(())
}
