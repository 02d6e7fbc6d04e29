use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// The account which created a domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub customer_id: String,
}

/// An alias pointing at a domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Alias {
    pub id: String,
    pub alias: String,
    pub created: Option<Timestamp>,
}

/// A certificate issued for a domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Cert {
    pub id: String,
    pub cns: Vec<String>,
    pub created: Option<Timestamp>,
}

/// A domain registered with ZEIT, either bought through ZEIT or external.
///
/// Every field is optional on the wire; missing fields take their default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Domain {
    pub id: String,
    pub name: String,
    /// Either `zeit.world`, `external` or `na`
    pub service_type: String,
    pub ns_verified_at: Option<Timestamp>,
    pub txt_verified_at: Option<Timestamp>,
    pub cdn_enabled: bool,
    pub created_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub bought_at: Option<Timestamp>,
    /// The TXT record value used for verification
    pub verified_record: String,
    pub verified: bool,
    pub nameservers: Vec<String>,
    pub intended_nameservers: Vec<String>,
    pub creator: User,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub suffix: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<Alias>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub certs: Vec<Cert>,
}

/// Price of a domain for the given period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainPrice {
    /// Price in US dollars
    pub price: u64,
    /// Number of years the price covers
    pub period: u64,
}
