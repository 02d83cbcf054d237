//! HTTP request handlers for the DoH endpoint.
//!
//! This module owns the transport concerns around the codec: pulling a
//! wire query out of a `GET ?dns=` parameter or a POST body, sniffing
//! the dns-json format, applying the blocklist, and mapping codec
//! errors onto 400-class responses.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query as UrlQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use base64::Engine;
use log::{debug, warn};
use metrics::counter;

use crate::blocklist::BlockList;
use crate::errors::DnsError;
use crate::message;
use crate::record::Question;
use crate::resolver::{route_for, Resolver, Route};
use crate::types::{RecordType, CLASS_IN};
use crate::upstream::{AnswerJson, QuestionJson, ResponseJson, Upstream, JSON_FORMAT, WIRE_FORMAT};

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Resolver,
    pub upstream: Upstream,
    pub blocklist: BlockList,
}

/// Handle `GET /dns-query`.
///
/// Accepts either a wire query in the base64url `dns` parameter or a
/// dns-json query in `name`/`type` parameters.
pub async fn handle_get(
    State(state): State<Arc<AppState>>,
    UrlQuery(params): UrlQuery<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    counter!("doh_requests_total", 1);

    if let Some(dns) = params.get("dns") {
        let raw = match decode_dns_param(dns) {
            Ok(raw) => raw,
            Err(e) => return bad_request(e),
        };
        return wire_response(&state, &raw).await;
    }

    if wants_format(&headers, JSON_FORMAT) {
        return json_response(&state, &params).await;
    }

    bad_request(DnsError::Config("A valid query name must be set.".into()))
}

/// Handle `POST /dns-query` with an `application/dns-message` body.
pub async fn handle_post(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    counter!("doh_requests_total", 1);

    if !wants_format(&headers, WIRE_FORMAT) {
        return bad_request(DnsError::Config("Invalid content type".into()));
    }
    wire_response(&state, &body).await
}

/// Resolve a wire-format query and shape the HTTP response.
async fn wire_response(state: &AppState, raw: &[u8]) -> Response {
    let query = match message::decode(raw) {
        Ok(query) => query,
        Err(e) => {
            counter!("doh_decode_errors_total", 1);
            warn!("Failed to decode query: {}", e);
            return bad_request(e);
        }
    };

    let Some(question) = query.questions.first() else {
        return bad_request(DnsError::Config("A valid query name must be set.".into()));
    };
    debug!("Wire query for {} {}", question.name, question.qtype);

    if state.blocklist.is_blocked(&question.name) {
        counter!("doh_blocked_total", 1);
        return blocked_response();
    }

    match state.resolver.resolve_wire(raw, &query).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, WIRE_FORMAT)], bytes).into_response(),
        Err(e) => {
            warn!("Resolution failed for {}: {}", question.name, e);
            bad_request(e)
        }
    }
}

/// Resolve a dns-json query from `name`/`type` parameters.
async fn json_response(state: &AppState, params: &HashMap<String, String>) -> Response {
    let Some(name) = params.get("name").filter(|name| !name.is_empty()) else {
        return bad_request(DnsError::Config("A valid query name must be set.".into()));
    };
    let rtype = match params.get("type") {
        Some(value) => match RecordType::from_name(value) {
            Some(rtype) => rtype,
            None => {
                return bad_request(DnsError::Config(format!("Unknown query type {value:?}")))
            }
        },
        None => RecordType::A,
    };

    // dns-json names come without the trailing dot.
    let question = Question {
        name: format!("{}.", name.trim_end_matches('.')),
        qtype: rtype,
        class: CLASS_IN,
    };
    debug!("JSON query for {} {}", question.name, question.qtype);

    if state.blocklist.is_blocked(&question.name) {
        counter!("doh_blocked_total", 1);
        return blocked_response();
    }

    let result = match route_for(&question.name) {
        Route::Upstream => {
            counter!("doh_upstream_forwards_total", 1);
            state.upstream.lookup_json(name, rtype).await
        }
        Route::Ens => {
            counter!("doh_ens_answers_total", 1);
            state
                .resolver
                .resolve_ens_records(&question)
                .await
                .map(|records| ResponseJson {
                    status: 0,
                    tc: false,
                    rd: true,
                    ra: true,
                    ad: false,
                    cd: false,
                    question: vec![QuestionJson {
                        name: question.name.clone(),
                        qtype: rtype.value(),
                    }],
                    answer: records
                        .into_iter()
                        .map(|record| AnswerJson {
                            name: record.name,
                            rtype: record.rtype.value(),
                            ttl: record.ttl,
                            data: rdata_text(&record.rdata),
                        })
                        .collect(),
                })
        }
    };

    match result {
        Ok(body) => match serde_json::to_string(&body) {
            Ok(json) => ([(header::CONTENT_TYPE, JSON_FORMAT)], json).into_response(),
            Err(e) => bad_request(DnsError::Json(e)),
        },
        Err(e) => {
            warn!("JSON resolution failed for {}: {}", question.name, e);
            bad_request(e)
        }
    }
}

/// Render a decoded payload in the dns-json `data` style.
fn rdata_text(rdata: &crate::rdata::RData) -> String {
    use crate::rdata::RData;
    match rdata {
        RData::A(text) | RData::Aaaa(text) | RData::Cname(text) => text.clone(),
        RData::Txt(text) => format!("\"{text}\""),
        RData::Soa(soa) => format!(
            "{} {} {} {} {} {} {}",
            soa.mname, soa.rname, soa.serial, soa.refresh, soa.retry, soa.expire, soa.minimum
        ),
        RData::Opt => String::new(),
    }
}

/// Decode the base64url `dns` query parameter. Padding is tolerated
/// even though RFC8484 forbids sending it.
fn decode_dns_param(dns: &str) -> Result<Vec<u8>, DnsError> {
    base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(dns.trim_end_matches('='))
        .map_err(|e| DnsError::Base64(e.to_string()))
}

/// Check the `content-type` and `accept` headers for a format.
fn wants_format(headers: &HeaderMap, format: &str) -> bool {
    [header::CONTENT_TYPE, header::ACCEPT].iter().any(|name| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with(format))
            .unwrap_or(false)
    })
}

fn blocked_response() -> Response {
    (StatusCode::UNAUTHORIZED, "Content blocked.").into_response()
}

fn bad_request(error: DnsError) -> Response {
    (StatusCode::BAD_REQUEST, error.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_the_dns_parameter_with_or_without_padding() {
        let fixture = "q80BAAABAAAAAAAAA3d3dwdleGFtcGxlA2NvbQAAAQAB";
        let raw = decode_dns_param(fixture).unwrap();
        assert_eq!(raw.len(), 33);
        assert_eq!(decode_dns_param(&format!("{fixture}==")).unwrap(), raw);
        assert!(decode_dns_param("not base64!").is_err());
    }

    #[test]
    fn format_sniffing_checks_both_headers() {
        let mut headers = HeaderMap::new();
        assert!(!wants_format(&headers, WIRE_FORMAT));
        headers.insert(header::ACCEPT, WIRE_FORMAT.parse().unwrap());
        assert!(wants_format(&headers, WIRE_FORMAT));
        assert!(!wants_format(&headers, JSON_FORMAT));

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, JSON_FORMAT.parse().unwrap());
        assert!(wants_format(&headers, JSON_FORMAT));
    }

    #[test]
    fn txt_data_is_quoted_like_dns_json() {
        let text = rdata_text(&crate::rdata::RData::Txt("dnslink=/ipfs/Qm".into()));
        assert_eq!(text, "\"dnslink=/ipfs/Qm\"");
    }
}
