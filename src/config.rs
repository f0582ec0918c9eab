//! Credential and account configuration.

/// Provider configuration collected once at startup and passed by reference
/// into the storage factory. Immutable for the remainder of the run.
#[derive(Debug, Clone, Default)]
pub struct CloudOptions {
    /// AWS profile name, exported as `AWS_PROFILE` for the credential chain.
    pub aws_profile: Option<String>,
    /// GCP project id. Informational; GCS object reads do not require it.
    pub gcp_project: Option<String>,
    /// Path to a GCP service account JSON file.
    pub gcp_credentials: Option<String>,
    /// Azure storage account name.
    pub azure_account: Option<String>,
}
