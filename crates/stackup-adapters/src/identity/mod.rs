//! Cloud identity verification adapters.

#[cfg(feature = "aws")]
mod aws_sts;
mod unavailable;

#[cfg(feature = "aws")]
pub use aws_sts::AwsStsVerifier;
pub use unavailable::UnavailableVerifier;
