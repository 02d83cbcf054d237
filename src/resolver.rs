//! Query resolution and dispatch.
//!
//! Each query routes on its question name: ENS-registered suffixes go
//! to the blockchain translator, everything else is forwarded to the
//! upstream DoH provider untouched. The ENS path mutates only the
//! answer section of the query before re-encoding it as a response.

use log::debug;
use metrics::counter;

use crate::ens::Ens;
use crate::errors::DnsError;
use crate::header::Header;
use crate::message::{self, Message};
use crate::record::ResourceRecord;
use crate::types::RCODE_NOERROR;
use crate::upstream::Upstream;

/// Which collaborator answers a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Forward to the upstream DoH provider.
    Upstream,
    /// Translate through the ENS registry.
    Ens,
}

/// Pick the route for a query name.
///
/// # Arguments
/// * `name` - Dot-terminated question name.
pub fn route_for(name: &str) -> Route {
    let name = name.trim_end_matches('.').to_ascii_lowercase();
    if name == "eth" || name.ends_with(".eth") {
        Route::Ens
    } else {
        Route::Upstream
    }
}

/// Resolves decoded queries against the matching collaborator.
#[derive(Debug, Clone)]
pub struct Resolver {
    upstream: Upstream,
    ens: Ens,
    default_ttl: u32,
}

impl Resolver {
    /// Create a resolver from its two collaborators.
    pub fn new(upstream: Upstream, ens: Ens, default_ttl: u32) -> Self {
        Self {
            upstream,
            ens,
            default_ttl,
        }
    }

    /// Resolve one wire-format query to a wire-format response.
    ///
    /// # Arguments
    /// * `raw` - The original query bytes, forwarded untouched on the
    ///   upstream path.
    /// * `query` - The decoded query, used for routing and for building
    ///   synthetic ENS responses.
    pub async fn resolve_wire(&self, raw: &[u8], query: &Message) -> Result<Vec<u8>, DnsError> {
        let question = query
            .questions
            .first()
            .ok_or_else(|| DnsError::InvalidRecord("query has no question".into()))?;

        match route_for(&question.name) {
            Route::Upstream => {
                counter!("doh_upstream_forwards_total", 1);
                debug!("Forwarding {} upstream", question.name);
                self.upstream.resolve_wire(raw).await
            }
            Route::Ens => {
                counter!("doh_ens_answers_total", 1);
                debug!("Resolving {} via ENS", question.name);
                let answers = self
                    .ens
                    .resolve_question(question, &self.upstream, self.default_ttl)
                    .await?;
                message::encode(&synthesize_response(query, answers))
            }
        }
    }

    /// Answer a question for an ENS name as decoded records, for the
    /// dns-json format.
    pub async fn resolve_ens_records(
        &self,
        question: &crate::record::Question,
    ) -> Result<Vec<ResourceRecord>, DnsError> {
        self.ens
            .resolve_question(question, &self.upstream, self.default_ttl)
            .await
    }
}

/// Build a response message for a query: same id and questions, answer
/// section replaced, response flags set.
pub fn synthesize_response(query: &Message, answers: Vec<ResourceRecord>) -> Message {
    let header = Header {
        qr: true,
        ra: true,
        aa: false,
        tc: false,
        rcode: RCODE_NOERROR,
        ancount: answers.len() as u16,
        nscount: 0,
        arcount: 0,
        ..query.header.clone()
    };
    Message {
        header,
        questions: query.questions.clone(),
        answers,
        name_servers: Vec::new(),
        additionals: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Header;
    use crate::rdata::RData;
    use crate::record::Question;
    use crate::types::{RecordType, CLASS_IN};

    #[test]
    fn eth_names_route_to_ens() {
        assert_eq!(route_for("vitalik.eth."), Route::Ens);
        assert_eq!(route_for("sub.name.ETH."), Route::Ens);
        assert_eq!(route_for("eth."), Route::Ens);
        assert_eq!(route_for("ETH."), Route::Ens);
    }

    #[test]
    fn other_names_route_upstream() {
        assert_eq!(route_for("www.example.com."), Route::Upstream);
        assert_eq!(route_for("eth.example.com."), Route::Upstream);
        assert_eq!(route_for("notaneth."), Route::Upstream);
    }

    #[test]
    fn synthesized_responses_answer_the_query() {
        let query = Message {
            header: Header {
                id: 7,
                qr: false,
                opcode: 0,
                aa: false,
                tc: false,
                rd: true,
                ra: false,
                z: 0,
                rcode: 0,
                qdcount: 1,
                ancount: 0,
                nscount: 0,
                arcount: 0,
            },
            questions: vec![Question {
                name: "vitalik.eth.".into(),
                qtype: RecordType::Txt,
                class: CLASS_IN,
            }],
            answers: vec![],
            name_servers: vec![],
            additionals: vec![],
        };
        let answers = vec![ResourceRecord {
            name: "vitalik.eth.".into(),
            rtype: RecordType::Txt,
            class: CLASS_IN,
            ttl: 3600,
            rdata: RData::Txt("dnslink=/ipfs/QmExample".into()),
        }];

        let response = synthesize_response(&query, answers);
        assert_eq!(response.header.id, 7);
        assert!(response.header.qr);
        assert!(response.header.rd);
        assert!(response.header.ra);
        assert_eq!(response.header.ancount, 1);
        assert_eq!(response.questions, query.questions);

        // The response must survive the wire.
        let wire = message::encode(&response).unwrap();
        assert_eq!(message::decode(&wire).unwrap(), response);
    }
}
