use crate::domain::{
    DatabaseError, RequestData, SubscriptionStore, UnsubscribeRequest, ValidationError,
};
use crate::handler_response::HandlerResponse;
use crate::templates::{ConfirmationTemplate, TemplateError};
use crate::utils::error_chain_fmt;
use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use http::StatusCode;
use std::sync::Arc;
use telemetry::parse_context_from;
use tokio::sync::mpsc::UnboundedSender;
use tracing_opentelemetry::OpenTelemetrySpanExt;

#[derive(thiserror::Error)]
pub enum UnsubscribeError {
    #[error("failed to create template from file")]
    TemplateLoadError(#[source] Arc<TemplateError>),
    #[error("failed to render confirmation template")]
    TemplateRenderError(#[source] TemplateError),
    #[error(transparent)]
    ValidationError(#[from] ValidationError),
    #[error("failed to delete subscription")]
    StoreDeletionError(#[source] DatabaseError),
}

impl std::fmt::Debug for UnsubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl UnsubscribeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UnsubscribeError::ValidationError(_) => StatusCode::BAD_REQUEST,
            UnsubscribeError::TemplateLoadError(_)
            | UnsubscribeError::TemplateRenderError(_)
            | UnsubscribeError::StoreDeletionError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Handles unsubscribe requests coming through API Gateway.
///
/// The confirmation template is loaded once, when the function starts. If that
/// failed, every request is answered with an internal error.
pub struct UnsubscribeEventHandler<TStore: SubscriptionStore> {
    template: Result<ConfirmationTemplate, Arc<TemplateError>>,
    store: TStore,
    allowed_origin: String,
    request_done_sender: UnboundedSender<()>,
}

impl<TStore: SubscriptionStore> UnsubscribeEventHandler<TStore> {
    pub fn new(
        template: Result<ConfirmationTemplate, TemplateError>,
        store: TStore,
        allowed_origin: String,
        request_done_sender: UnboundedSender<()>,
    ) -> Self {
        Self {
            template: template.map_err(Arc::new),
            store,
            allowed_origin,
            request_done_sender,
        }
    }

    #[cfg(feature = "lambda")]
    pub async fn invoke(
        &self,
        event: lambda_runtime::LambdaEvent<ApiGatewayProxyRequest>,
    ) -> Result<ApiGatewayProxyResponse, lambda_runtime::Error> {
        use tracing::Instrument;

        let span = tracing::info_span!(
            "unsubscribe_invocation",
            request_id = %event.context.request_id
        );
        let response = self.handle(&event.payload).instrument(span).await;

        // Notify the extension to flush traces.
        let _ = self.request_done_sender.send(());

        Ok(response)
    }

    #[tracing::instrument(
        name = "handle_unsubscribe_request",
        skip(self, request),
        fields(http_method = %request.http_method, status_code = tracing::field::Empty)
    )]
    pub async fn handle(&self, request: &ApiGatewayProxyRequest) -> ApiGatewayProxyResponse {
        tracing::Span::current().set_parent(parse_context_from(&request.headers));

        let response = self.unsubscribe(request).await;
        tracing::Span::current().record("status_code", response.status.as_u16());

        response.into_proxy_response(&self.allowed_origin)
    }

    /// Run the template, validation and deletion steps in order, stopping at
    /// the first failure.
    pub async fn unsubscribe(&self, request: &ApiGatewayProxyRequest) -> HandlerResponse {
        let page = match self.render_confirmation_page() {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Confirmation page is unavailable",
                );
                return HandlerResponse::failure(&e, None);
            }
        };

        let unsubscribe_request = match RequestData::try_from(request)
            .and_then(UnsubscribeRequest::try_from)
        {
            Ok(unsubscribe_request) => unsubscribe_request,
            Err(e) => {
                tracing::warn!(error.message = %e, "Rejecting invalid unsubscribe request");
                return HandlerResponse::failure(&UnsubscribeError::ValidationError(e), None);
            }
        };

        tracing::info!(
            subscriber_id = %unsubscribe_request.id,
            "Deleting subscription"
        );

        if let Err(e) = self
            .store
            .delete_subscription(&unsubscribe_request.id, &unsubscribe_request.email)
            .await
        {
            let e = UnsubscribeError::StoreDeletionError(e);
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "Failed to delete subscription",
            );
            return HandlerResponse::failure(&e, Some(page));
        }

        HandlerResponse::success(page)
    }

    fn render_confirmation_page(&self) -> Result<String, UnsubscribeError> {
        let template = self
            .template
            .as_ref()
            .map_err(|e| UnsubscribeError::TemplateLoadError(e.clone()))?;

        template
            .render()
            .map_err(UnsubscribeError::TemplateRenderError)
    }
}
