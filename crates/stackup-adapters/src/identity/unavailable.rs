//! Stand-in verifier for builds without the `aws` feature.

use async_trait::async_trait;

use stackup_core::{
    application::{ApplicationError, ports::IdentityVerifier},
    domain::AwsCredentials,
    error::StackupResult,
};

/// Always reports that the account could not be looked up.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableVerifier;

#[async_trait]
impl IdentityVerifier for UnavailableVerifier {
    async fn account_id(&self, _credentials: &AwsCredentials, _region: &str) -> StackupResult<String> {
        Err(ApplicationError::CredentialVerification {
            code: None,
            message: "stackup was built without AWS support".into(),
        }
        .into())
    }
}
