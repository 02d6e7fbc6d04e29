use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use strum::{Display, EnumString, VariantNames};

use crate::Timestamp;

/// DNS record types supported by the API
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    VariantNames,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    #[default]
    A,
    Aaaa,
    Alias,
    Caa,
    Cname,
    Mx,
    Srv,
    Txt,
}

/// A DNS record of a domain
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Subdomain the record applies to; empty for the zone origin
    pub name: String,
    pub value: String,
    pub creator: String,
    pub created: Option<Timestamp>,
    pub updated: Option<Timestamp>,
    /// Priority of an `MX` record
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mx_priority: Option<u32>,
    /// Priority of an `SRV` record
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(rename = "priority", skip_serializing_if = "Option::is_none")]
    pub srv_priority: Option<u32>,
}

impl Record {
    /// Create a record without any server-assigned fields
    #[must_use]
    pub fn new(record_type: RecordType, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            record_type,
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    /// The value as the API expects it when creating a record.
    ///
    /// `MX` and `SRV` records carry their priority in front of the value.
    #[must_use]
    pub fn value(&self) -> String {
        let priority = match self.record_type {
            RecordType::Srv => self.srv_priority,
            RecordType::Mx => self.mx_priority,
            _ => None,
        };
        match priority {
            Some(priority) => format!("{priority} {}", self.value),
            None => self.value.clone(),
        }
    }
}
