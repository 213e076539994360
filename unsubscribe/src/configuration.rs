use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};
use config::FileFormat;
use serde::Deserialize;
use telemetry::TelemetrySettings;

const LOCAL_DYNAMO_DB_ENDPOINT: &str = "http://localhost:8000";

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub telemetry: TelemetrySettings,
    pub application: ApplicationSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub stage: String,
    /// Value of the `Access-Control-Allow-Origin` header on every response.
    pub allowed_origin: String,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub table_name: String,
    pub use_local: bool,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    #[error("{0}")]
    UnsupportedEnvironment(String),
    #[error("CONFIG_PARAMETER_NAME must be set in production")]
    MissingParameterName,
    #[error("failed to retrieve configuration parameter {0}")]
    ParameterRetrieval(String, #[source] anyhow::Error),
    #[error(transparent)]
    InvalidConfiguration(#[from] config::ConfigError),
}

pub async fn get_configuration() -> Result<Settings, ConfigurationError> {
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(ConfigurationError::UnsupportedEnvironment)?;

    let builder = match environment {
        Environment::Local => {
            let configuration_directory = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("configuration");
            let environment_filename = format!("{}.yaml", environment.as_str());

            config::Config::builder()
                .add_source(config::File::from(
                    configuration_directory.join("base.yaml"),
                ))
                .add_source(config::File::from(
                    configuration_directory.join(environment_filename),
                ))
        }
        Environment::Production => {
            let parameter_name = std::env::var("CONFIG_PARAMETER_NAME")
                .map_err(|_| ConfigurationError::MissingParameterName)?;
            let document = fetch_parameter(&parameter_name).await?;

            config::Config::builder()
                .add_source(config::File::from_str(&document, FileFormat::Yaml))
        }
    };

    // Add in settings from environment variables (with a prefix of APP and '__' as separator)
    // E.g. `APP_DATABASE__TABLE_NAME=subscriptions` would set `Settings.database.table_name`
    let settings = builder
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize::<Settings>()?)
}

/// Read the production settings document from SSM. The parameter holds the
/// same YAML shape as `configuration/base.yaml`, e.g.
///
/// ```yaml
/// application:
///   stage: "prod"
///   allowed_origin: "https://millhouse.dev"
/// database:
///   table_name: "millhouse-subscriptions-prod"
///   use_local: false
/// telemetry:
///   otlp_endpoint: "https://api.honeycomb.io/v1/traces"
///   honeycomb_api_key: "<secure string>"
///   dataset_name: "millhouse-unsubscribe"
/// ```
async fn fetch_parameter(name: &str) -> Result<String, ConfigurationError> {
    let ssm_client = aws_sdk_ssm::Client::new(&load_aws_config().await);

    let parameter = ssm_client
        .get_parameter()
        .name(name)
        .with_decryption(true)
        .send()
        .await
        .map_err(|e| ConfigurationError::ParameterRetrieval(name.to_string(), e.into()))?;

    parameter
        .parameter
        .and_then(|p| p.value)
        .ok_or_else(|| {
            ConfigurationError::ParameterRetrieval(
                name.to_string(),
                anyhow::anyhow!("parameter has no value"),
            )
        })
}

pub fn make_region_provider() -> RegionProviderChain {
    RegionProviderChain::default_provider().or_else(Region::new("us-east-1"))
}

pub async fn load_aws_config() -> aws_config::SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(make_region_provider())
        .load()
        .await
}

impl DatabaseSettings {
    pub async fn dynamo_db_client(&self) -> aws_sdk_dynamodb::Client {
        let sdk_config = load_aws_config().await;
        let conf_builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config);

        let conf = match self.use_local {
            true => conf_builder.endpoint_url(LOCAL_DYNAMO_DB_ENDPOINT).build(),
            false => conf_builder.build(),
        };

        aws_sdk_dynamodb::Client::from_conf(conf)
    }
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either local or production",
                other
            )),
        }
    }
}
