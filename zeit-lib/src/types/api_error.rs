use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Nameserver state of a domain which failed verification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NsVerification {
    pub name: String,
    pub nameservers: Vec<String>,
    pub intended_nameservers: Vec<String>,
}

/// TXT record state of a domain which failed verification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TxtVerification {
    pub name: String,
    pub values: Vec<String>,
    pub verification_record: String,
}

/// Error payload the API sends along with an error status, as the `error`
/// field of the body.
///
/// Besides `code` and `message`, some endpoints add details: conflicting
/// record ids for `409 Conflict`, the domain name for lookups and the
/// verification state for a failed domain verification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
#[serde(default, rename_all = "camelCase")]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub old_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ns_verification: Option<NsVerification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txt_verification: Option<TxtVerification>,
}

/// Body of an error response
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: ApiError,
}
