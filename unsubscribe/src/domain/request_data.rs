use crate::domain::ValidationError;
use aws_lambda_events::apigw::ApiGatewayProxyRequest;
use base64::Engine;
use http::Method;
use serde_json::{Map, Value};

const ID_FIELD: &str = "id";
const EMAIL_ADDRESS_FIELD: &str = "emailAddress";

/// Raw, unvalidated fields of an unsubscribe request.
///
/// Absent fields are read as empty strings and left for validation to reject.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RequestData {
    pub id: String,
    pub email_address: String,
}

impl TryFrom<&ApiGatewayProxyRequest> for RequestData {
    type Error = ValidationError;

    fn try_from(request: &ApiGatewayProxyRequest) -> Result<Self, Self::Error> {
        // Links in emails arrive as GETs with the fields in the query string.
        if request.http_method == Method::GET {
            let parameters = &request.query_string_parameters;
            return Ok(Self {
                id: parameters.first(ID_FIELD).unwrap_or_default().to_string(),
                email_address: parameters
                    .first(EMAIL_ADDRESS_FIELD)
                    .unwrap_or_default()
                    .to_string(),
            });
        }

        let body = decode_body(request)?;
        if body.trim().is_empty() {
            return Ok(Self::default());
        }

        let fields: Map<String, Value> = serde_json::from_str(&body)
            .map_err(|e| ValidationError::MalformedBody(e.to_string()))?;

        Ok(Self {
            id: string_field(&fields, ID_FIELD)?,
            email_address: string_field(&fields, EMAIL_ADDRESS_FIELD)?,
        })
    }
}

fn decode_body(request: &ApiGatewayProxyRequest) -> Result<String, ValidationError> {
    let body = request.body.clone().unwrap_or_default();
    if !request.is_base64_encoded {
        return Ok(body);
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(body)
        .map_err(|e| ValidationError::MalformedBody(e.to_string()))?;

    String::from_utf8(bytes).map_err(|e| ValidationError::MalformedBody(e.to_string()))
}

fn string_field(fields: &Map<String, Value>, name: &'static str) -> Result<String, ValidationError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(ValidationError::NotAString(name)),
    }
}
