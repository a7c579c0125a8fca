//! AWS account lookup through STS `GetCallerIdentity`.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, retry::RetryConfig};
use aws_credential_types::Credentials;
use aws_sdk_sts::error::{DisplayErrorContext, ProvideErrorMetadata};
use tracing::{debug, instrument};

use stackup_core::{
    application::{ApplicationError, ports::IdentityVerifier},
    domain::AwsCredentials,
    error::{StackupError, StackupResult},
};

const PROVIDER_NAME: &str = "stackup";

/// Calls STS with exactly the keys the user entered.
///
/// The keys are installed as a static credentials provider, so profiles,
/// session tokens or instance roles from the environment never take part
/// in the lookup.
#[derive(Debug, Clone)]
pub struct AwsStsVerifier {
    endpoint_url: Option<String>,
    retry: RetryConfig,
}

impl AwsStsVerifier {
    pub fn new() -> Self {
        Self {
            endpoint_url: None,
            retry: RetryConfig::standard(),
        }
    }

    /// Send requests to a different STS endpoint.
    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn client(&self, credentials: &AwsCredentials, region: &str) -> aws_sdk_sts::Client {
        let credentials = Credentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            None,
            None,
            PROVIDER_NAME,
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .retry_config(self.retry.clone());
        if let Some(url) = &self.endpoint_url {
            loader = loader.endpoint_url(url);
        }

        aws_sdk_sts::Client::new(&loader.load().await)
    }
}

impl Default for AwsStsVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityVerifier for AwsStsVerifier {
    #[instrument(skip_all, fields(region = %region))]
    async fn account_id(&self, credentials: &AwsCredentials, region: &str) -> StackupResult<String> {
        let identity = self
            .client(credentials, region)
            .await
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| sdk_failure(&e))?;

        debug!(arn = identity.arn().unwrap_or_default(), "Caller identity resolved");
        identity
            .account()
            .map(str::to_string)
            .ok_or_else(|| verification_error(None, "response carried no account id".into()))
    }
}

/// Keep the AWS error code (`InvalidClientTokenId`, ...) when the service sent one.
fn sdk_failure<E>(err: &E) -> StackupError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let message = match err.message() {
        Some(message) => message.to_string(),
        None => DisplayErrorContext(err).to_string(),
    };
    verification_error(err.code().map(str::to_string), message)
}

fn verification_error(code: Option<String>, message: String) -> StackupError {
    ApplicationError::CredentialVerification { code, message }.into()
}
