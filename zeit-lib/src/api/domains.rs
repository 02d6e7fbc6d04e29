use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{decode, ensure_success};
use crate::{Client, Domain, DomainPrice, Result};

const DOMAINS: &str = "v4/domains";

#[derive(Deserialize)]
struct DomainList {
    #[serde(default)]
    domains: Vec<Domain>,
}

/// Single-domain endpoints answer either with `{"domain": {..}}` or with the
/// bare domain
#[derive(Deserialize)]
#[serde(untagged)]
enum DomainBody {
    Wrapped { domain: Domain },
    Bare(Domain),
}

impl From<DomainBody> for Domain {
    fn from(body: DomainBody) -> Self {
        match body {
            DomainBody::Wrapped { domain } | DomainBody::Bare(domain) => domain,
        }
    }
}

#[derive(Deserialize)]
struct Uid {
    uid: String,
}

#[derive(Deserialize)]
struct Availability {
    available: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransferIn<'a> {
    method: &'static str,
    name: &'a str,
    auth_code: &'a str,
    expected_price: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Purchase<'a> {
    name: &'a str,
    expected_price: u64,
}

impl Client {
    /// List all domains of the account or team
    ///
    /// # Errors
    ///
    /// Fails if the request fails or the API answers with an error.
    pub async fn list_domains(&self) -> Result<Vec<Domain>> {
        let response = self.execute(Method::GET, DOMAINS, None).await?;
        let list: DomainList = decode(response).await?;
        Ok(list.domains)
    }

    /// Add an external domain
    ///
    /// # Errors
    ///
    /// Fails if the request fails or the API answers with an error.
    pub async fn add_domain(&self, name: &str) -> Result<Domain> {
        let body = json!({ "name": name });
        let response = self.execute(Method::POST, DOMAINS, Some(body)).await?;
        Ok(decode::<DomainBody>(response).await?.into())
    }

    /// Transfer a domain registered elsewhere to ZEIT
    ///
    /// `expected_price` has to match the transfer price the API expects.
    ///
    /// # Errors
    ///
    /// Fails if the request fails or the API answers with an error.
    pub async fn transfer_in_domain(
        &self,
        name: &str,
        auth_code: &str,
        expected_price: u64,
    ) -> Result<Domain> {
        let body = to_value(&TransferIn {
            method: "transfer-in",
            name,
            auth_code,
            expected_price,
        })?;
        let response = self.execute(Method::POST, DOMAINS, Some(body)).await?;
        Ok(decode::<DomainBody>(response).await?.into())
    }

    /// Verify the ownership of a domain
    ///
    /// # Errors
    ///
    /// Fails if the request fails or the API answers with an error. A failed
    /// verification is an [`crate::ErrorKind::Api`] error carrying the
    /// nameserver and TXT record state.
    pub async fn verify_domain(&self, name: &str) -> Result<Domain> {
        let path = format!("{DOMAINS}/{name}/verify");
        let response = self.execute(Method::POST, &path, None).await?;
        Ok(decode::<DomainBody>(response).await?.into())
    }

    /// Get a single domain
    ///
    /// # Errors
    ///
    /// Fails if the request fails or the API answers with an error.
    pub async fn get_domain(&self, name: &str) -> Result<Domain> {
        let path = format!("{DOMAINS}/{name}");
        let response = self.execute(Method::GET, &path, None).await?;
        Ok(decode::<DomainBody>(response).await?.into())
    }

    /// Remove a domain, returning the id of the removed domain
    ///
    /// # Errors
    ///
    /// Fails if the request fails or the API answers with an error.
    pub async fn remove_domain(&self, name: &str) -> Result<String> {
        let path = format!("{DOMAINS}/{name}");
        let response = self.execute(Method::DELETE, &path, None).await?;
        Ok(decode::<Uid>(response).await?.uid)
    }

    /// Check whether a domain can be bought
    ///
    /// # Errors
    ///
    /// Fails if the request fails or the API answers with an error.
    pub async fn check_domain_availability(&self, name: &str) -> Result<bool> {
        let path = format!("{DOMAINS}/status");
        let response = self
            .execute_with_query(Method::GET, &path, &[("name", name)], None)
            .await?;
        Ok(decode::<Availability>(response).await?.available)
    }

    /// Check the price of a domain
    ///
    /// # Errors
    ///
    /// Fails if the request fails or the API answers with an error.
    pub async fn check_domain_price(&self, name: &str) -> Result<DomainPrice> {
        let path = format!("{DOMAINS}/price");
        let response = self
            .execute_with_query(Method::GET, &path, &[("name", name)], None)
            .await?;
        decode(response).await
    }

    /// Buy a domain
    ///
    /// `expected_price` has to match the price returned by
    /// [`Client::check_domain_price`].
    ///
    /// # Errors
    ///
    /// Fails if the request fails or the API answers with an error.
    pub async fn buy_domain(&self, name: &str, expected_price: u64) -> Result<()> {
        let body = to_value(&Purchase {
            name,
            expected_price,
        })?;
        let path = format!("{DOMAINS}/buy");
        let response = self.execute(Method::POST, &path, Some(body)).await?;
        ensure_success(response).await?;
        Ok(())
    }
}

fn to_value<T: Serialize>(body: &T) -> Result<serde_json::Value> {
    serde_json::to_value(body).map_err(crate::ErrorKind::SerializeBody)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use http::{Method, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_utils::{epoch_secs_from_now, mock_api, rate_limited_mock_api};
    use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::test_utils::client_for;
    use crate::{DomainPrice, ErrorKind};

    fn domain_json(name: &str) -> serde_json::Value {
        json!({
            "id": "dom_1",
            "name": name,
            "serviceType": "external",
            "verified": true,
            "createdAt": 1_544_658_552_174_i64,
            "nameservers": ["ns1.example.net"],
            "creator": {"id": "usr_1", "username": "zeit", "email": "zeit@example.com"}
        })
    }

    #[tokio::test]
    async fn test_list_domains() {
        let body = json!({ "domains": [domain_json("a.com"), domain_json("b.com")] });
        let mock_server = mock_api!(
            Method::GET,
            "/v4/domains",
            ResponseTemplate::new(200).set_body_json(body)
        );
        let domains = client_for(&mock_server, "token").list_domains().await.unwrap();
        let names: Vec<_> = domains.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a.com", "b.com"]);
        assert_eq!(domains[0].creator.username, "zeit");
    }

    #[tokio::test]
    async fn test_get_domain_wrapped_and_bare() {
        let mock_server = MockServer::start().await;
        Mock::given(path("/v4/domains/wrapped.com"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "domain": domain_json("wrapped.com") })),
            )
            .mount(&mock_server)
            .await;
        Mock::given(path("/v4/domains/bare.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(domain_json("bare.com")))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "token");
        assert_eq!(client.get_domain("wrapped.com").await.unwrap().name, "wrapped.com");
        assert_eq!(client.get_domain("bare.com").await.unwrap().name, "bare.com");
    }

    #[tokio::test]
    async fn test_get_missing_domain() {
        let body = json!({"error": {"code": "not_found", "message": "Domain not found", "name": "nope.com"}});
        let mock_server = mock_api!(
            Method::GET,
            "/v4/domains/nope.com",
            ResponseTemplate::new(404).set_body_json(body)
        );
        let err = client_for(&mock_server, "token")
            .get_domain("nope.com")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        let api_error = err.api_error().unwrap();
        assert_eq!(api_error.code, "not_found");
        assert_eq!(api_error.name.as_deref(), Some("nope.com"));
    }

    #[tokio::test]
    async fn test_add_domain() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v4/domains"))
            .and(body_json(json!({"name": "example.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(domain_json("example.com")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let domain = client_for(&mock_server, "token")
            .add_domain("example.com")
            .await
            .unwrap();
        assert_eq!(domain.id, "dom_1");
    }

    #[tokio::test]
    async fn test_transfer_in_domain() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v4/domains"))
            .and(body_json(json!({
                "method": "transfer-in",
                "name": "example.com",
                "authCode": "secret",
                "expectedPrice": 17
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(domain_json("example.com")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let domain = client_for(&mock_server, "token")
            .transfer_in_domain("example.com", "secret", 17)
            .await
            .unwrap();
        assert_eq!(domain.name, "example.com");
    }

    #[tokio::test]
    async fn test_verify_domain_failure() {
        let body = json!({"error": {
            "code": "verification_failed",
            "message": "The domain couldn't be verified",
            "txtVerification": {"name": "example.com", "values": [], "verificationRecord": "abc"}
        }});
        let mock_server = mock_api!(
            Method::POST,
            "/v4/domains/example.com/verify",
            ResponseTemplate::new(400).set_body_json(body)
        );
        let err = client_for(&mock_server, "token")
            .verify_domain("example.com")
            .await
            .unwrap_err();
        let txt = err.api_error().unwrap().txt_verification.clone().unwrap();
        assert_eq!(txt.verification_record, "abc");
    }

    #[tokio::test]
    async fn test_remove_domain() {
        let mock_server = mock_api!(
            Method::DELETE,
            "/v4/domains/example.com",
            ResponseTemplate::new(200).set_body_json(json!({"uid": "dom_1"}))
        );
        let uid = client_for(&mock_server, "token")
            .remove_domain("example.com")
            .await
            .unwrap();
        assert_eq!(uid, "dom_1");
    }

    #[tokio::test]
    async fn test_check_availability_and_price() {
        let mock_server = MockServer::start().await;
        Mock::given(path("/v4/domains/status"))
            .and(query_param("name", "example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"available": true})))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(path("/v4/domains/price"))
            .and(query_param("name", "example.com"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"price": 17, "period": 1})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "token");
        assert!(client.check_domain_availability("example.com").await.unwrap());
        assert_eq!(
            client.check_domain_price("example.com").await.unwrap(),
            DomainPrice {
                price: 17,
                period: 1
            }
        );
    }

    #[tokio::test]
    async fn test_availability_name_is_one_query_value() {
        let mock_server = MockServer::start().await;
        Mock::given(path("/v4/domains/status"))
            .and(query_param("name", "a.com&teamId=other"))
            .and(query_param_is_missing("teamId"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"available": false})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let available = client_for(&mock_server, "token")
            .check_domain_availability("a.com&teamId=other")
            .await
            .unwrap();
        assert!(!available);
    }

    #[tokio::test]
    async fn test_buy_domain() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v4/domains/buy"))
            .and(body_json(json!({"name": "example.com", "expectedPrice": 17})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        client_for(&mock_server, "token")
            .buy_domain("example.com", 17)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_buy_domain_price_mismatch() {
        let body = json!({"error": {"code": "price_mismatch", "message": "The expected price does not match"}});
        let mock_server = mock_api!(
            Method::POST,
            "/v4/domains/buy",
            ResponseTemplate::new(400).set_body_json(body)
        );
        let err = client_for(&mock_server, "token")
            .buy_domain("example.com", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, ErrorKind::Api { .. }));
        assert_eq!(err.to_string(), "API responded with 400 Bad Request: The expected price does not match");
    }

    #[tokio::test]
    async fn test_list_domains_after_rejection() {
        let reset = epoch_secs_from_now(Duration::from_secs(1));
        let mock_server = rate_limited_mock_api!(
            "/v4/domains",
            (5, 0, reset),
            ResponseTemplate::new(200).set_body_json(json!({ "domains": [domain_json("a.com")] }))
        );
        let domains = client_for(&mock_server, "token").list_domains().await.unwrap();
        assert_eq!(domains.len(), 1);
    }
}
