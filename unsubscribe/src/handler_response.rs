use crate::unsubscribe_handler::UnsubscribeError;
use crate::utils::error_chain_message;
use aws_lambda_events::apigw::ApiGatewayProxyResponse;
use aws_lambda_events::encodings::Body;
use http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, StatusCode};
use serde::Serialize;

/// Outcome of a single invocation, before it is shaped for API Gateway.
#[derive(Debug, PartialEq, Eq)]
pub struct HandlerResponse {
    pub status: StatusCode,
    pub error: Option<String>,
    pub body: Option<String>,
}

#[derive(Serialize)]
struct ResponseEnvelope<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a str>,
}

impl HandlerResponse {
    pub fn success(body: String) -> Self {
        Self {
            status: StatusCode::OK,
            error: None,
            body: Some(body),
        }
    }

    pub fn failure(error: &UnsubscribeError, body: Option<String>) -> Self {
        Self {
            status: error.status_code(),
            error: Some(error_chain_message(error)),
            body,
        }
    }

    /// Wrap the outcome in a JSON envelope: `{"error": ..., "data": ...}`.
    pub fn into_proxy_response(self, allowed_origin: &str) -> ApiGatewayProxyResponse {
        let envelope = ResponseEnvelope {
            error: self.error.as_deref(),
            data: self.body.as_deref(),
        };
        let (status, json) = match serde_json::to_string(&envelope) {
            Ok(json) => (self.status, json),
            Err(e) => {
                tracing::error!(error.message = %e, "Failed to serialise response body");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    r#"{"error":"failed to serialise response"}"#.to_string(),
                )
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        match HeaderValue::from_str(allowed_origin) {
            Ok(origin) => {
                headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
            }
            Err(_) => {
                tracing::warn!(allowed_origin, "Allowed origin is not a valid header value");
            }
        }

        let mut response = ApiGatewayProxyResponse::default();
        response.status_code = i64::from(status.as_u16());
        response.headers = headers;
        response.body = Some(Body::Text(json));
        response
    }
}
