//! Upstream DoH provider client.
//!
//! Queries this resolver does not answer itself are handed to a
//! configured DoH provider, either as an opaque wire-format passthrough
//! or as a dns-json lookup whose answers feed the ENS gateway proxy.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::DnsError;
use crate::types::RecordType;

/// MIME type of DNS wire-format messages over HTTP.
pub const WIRE_FORMAT: &str = "application/dns-message";

/// MIME type of the dns-json format.
pub const JSON_FORMAT: &str = "application/dns-json";

/// One question in a dns-json response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionJson {
    pub name: String,
    #[serde(rename = "type")]
    pub qtype: u16,
}

/// One answer in a dns-json response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerJson {
    pub name: String,
    #[serde(rename = "type")]
    pub rtype: u16,
    #[serde(rename = "TTL")]
    pub ttl: u32,
    pub data: String,
}

/// A dns-json response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseJson {
    #[serde(rename = "Status")]
    pub status: u8,
    #[serde(rename = "TC")]
    pub tc: bool,
    #[serde(rename = "RD")]
    pub rd: bool,
    #[serde(rename = "RA")]
    pub ra: bool,
    #[serde(rename = "AD")]
    pub ad: bool,
    #[serde(rename = "CD")]
    pub cd: bool,
    #[serde(rename = "Question", default)]
    pub question: Vec<QuestionJson>,
    #[serde(rename = "Answer", default)]
    pub answer: Vec<AnswerJson>,
}

/// Client for the configured upstream DoH provider.
#[derive(Debug, Clone)]
pub struct Upstream {
    client: reqwest::Client,
    url: String,
}

impl Upstream {
    /// Create a client for the given DoH provider URL.
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }

    /// Forward a wire-format query and return the wire-format answer.
    ///
    /// # Arguments
    /// * `query` - One complete DNS message in wire format.
    pub async fn resolve_wire(&self, query: &[u8]) -> Result<Vec<u8>, DnsError> {
        debug!("Forwarding wire query to {}", self.url);
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, WIRE_FORMAT)
            .header(reqwest::header::ACCEPT, WIRE_FORMAT)
            .body(query.to_vec())
            .send()
            .await?
            .error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Perform a dns-json lookup for one name and type.
    ///
    /// # Arguments
    /// * `name` - Name to look up, with or without the trailing dot.
    /// * `rtype` - Record type to request.
    pub async fn lookup_json(
        &self,
        name: &str,
        rtype: RecordType,
    ) -> Result<ResponseJson, DnsError> {
        debug!("JSON lookup for {} {} at {}", name, rtype, self.url);
        let rtype_name = rtype.to_string();
        let response = self
            .client
            .get(&self.url)
            .query(&[("name", name), ("type", rtype_name.as_str())])
            .header(reqwest::header::ACCEPT, JSON_FORMAT)
            .send()
            .await?
            .error_for_status()?;
        // Some providers serve dns-json with a non-JSON content type, so
        // take the body as text and parse it ourselves.
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_dns_json_response() {
        let body = r#"{
            "Status": 0, "TC": false, "RD": true, "RA": true, "AD": false, "CD": false,
            "Question": [{"name": "cloudflare-ipfs.com.", "type": 1}],
            "Answer": [{"name": "cloudflare-ipfs.com.", "type": 1, "TTL": 300, "data": "104.17.64.14"}]
        }"#;
        let parsed: ResponseJson = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.status, 0);
        assert_eq!(parsed.answer.len(), 1);
        assert_eq!(parsed.answer[0].data, "104.17.64.14");
        assert_eq!(parsed.answer[0].ttl, 300);
    }

    #[test]
    fn missing_answer_section_defaults_to_empty() {
        let body = r#"{"Status": 3, "TC": false, "RD": true, "RA": true, "AD": false, "CD": false}"#;
        let parsed: ResponseJson = serde_json::from_str(body).unwrap();
        assert!(parsed.question.is_empty());
        assert!(parsed.answer.is_empty());
    }
}
