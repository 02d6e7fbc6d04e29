use http::Method;
use serde::{Deserialize, Serialize};

use super::{decode, ensure_success};
use crate::{Client, ErrorKind, Record, RecordType, Result};

#[derive(Deserialize)]
struct RecordList {
    #[serde(default)]
    records: Vec<Record>,
}

#[derive(Deserialize)]
struct Uid {
    uid: String,
}

/// Body for creating a record
#[derive(Debug, Serialize, PartialEq, Eq)]
struct NewRecord<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    record_type: RecordType,
    value: String,
}

impl<'a> NewRecord<'a> {
    fn new(record: &'a Record) -> Result<Self> {
        if record.name == "@" {
            return Err(ErrorKind::OriginRecordName);
        }
        let value = record.value();
        Ok(Self {
            name: &record.name,
            record_type: record.record_type,
            value: value.strip_suffix('.').unwrap_or(&value).to_string(),
        })
    }
}

fn records_path(domain: &str) -> String {
    format!("v2/domains/{domain}/records")
}

impl Client {
    /// List the DNS records of a domain
    ///
    /// # Errors
    ///
    /// Fails if the request fails or the API answers with an error.
    pub async fn list_dns_records(&self, domain: &str) -> Result<Vec<Record>> {
        let response = self
            .execute(Method::GET, &records_path(domain), None)
            .await?;
        let list: RecordList = decode(response).await?;
        Ok(list.records)
    }

    /// Create a DNS record, returning the id of the new record.
    ///
    /// Only the name, type and [`Record::value`] of `record` are sent; a
    /// trailing `.` of the value is dropped. The zone origin is named by an
    /// empty string.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::OriginRecordName`] if the record is named `@`.
    /// Otherwise fails if the request fails or the API answers with an error,
    /// e.g. `409 Conflict` with the ids of existing records.
    pub async fn create_dns_record(&self, domain: &str, record: &Record) -> Result<String> {
        let body = serde_json::to_value(NewRecord::new(record)?).map_err(ErrorKind::SerializeBody)?;
        let response = self
            .execute(Method::POST, &records_path(domain), Some(body))
            .await?;
        Ok(decode::<Uid>(response).await?.uid)
    }

    /// Remove a DNS record
    ///
    /// # Errors
    ///
    /// Fails if the request fails or the API answers with an error.
    pub async fn remove_dns_record(&self, domain: &str, record_id: &str) -> Result<()> {
        let path = format!("{}/{record_id}", records_path(domain));
        let response = self.execute(Method::DELETE, &path, None).await?;
        ensure_success(response).await?;
        Ok(())
    }
}
