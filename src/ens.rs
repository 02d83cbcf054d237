//! Ethereum Name Service resolution.
//!
//! ENS binds names to resolver contracts, which in turn can hold a
//! contenthash (for `.eth` sites, usually an IPFS CID). This module
//! queries the registry and resolver through raw `eth_call` JSON-RPC
//! and translates the result into synthetic DNS answers: TXT carries
//! the dnslink and contenthash, A/AAAA proxy the configured IPFS
//! gateway so browsers can fetch the content.

use log::{debug, info};
use serde::Deserialize;
use serde_json::json;
use sha3::{Digest, Keccak256};

use crate::cache::ContentHashCache;
use crate::errors::DnsError;
use crate::rdata::RData;
use crate::record::{Question, ResourceRecord};
use crate::types::{RecordType, CLASS_IN};
use crate::upstream::Upstream;

/// Address of the ENS registry contract.
pub const REGISTRY_ADDRESS: &str = "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e";

/// 4-byte selector of `resolver(bytes32)`.
const RESOLVER_SELECTOR: [u8; 4] = [0x01, 0x78, 0xB8, 0xBF];

/// 4-byte selector of `contenthash(bytes32)`.
const CONTENTHASH_SELECTOR: [u8; 4] = [0xBC, 0x1C, 0x58, 0xD1];

/// Multicodec prefix of an ipfs-ns contenthash.
const IPFS_NS_PREFIX: [u8; 2] = [0xE3, 0x01];

const BASE58_ALPHABET: &[u8; 58] =
    b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcError>,
}

/// Client for ENS lookups against an Ethereum JSON-RPC provider.
#[derive(Debug, Clone)]
pub struct Ens {
    client: reqwest::Client,
    /// HTTP URL of the Ethereum RPC provider.
    provider: String,
    /// Hostname of the IPFS gateway A/AAAA queries proxy to.
    ipfs_gateway: String,
    cache: ContentHashCache,
}

/// Compute the EIP-137 namehash of a name.
///
/// Labels are hashed from the TLD towards the leaf, each folded into
/// the running node hash with keccak-256. Case is normalized to lower;
/// full UTS-46 normalization is up to the caller.
pub fn namehash(name: &str) -> [u8; 32] {
    let mut node = [0u8; 32];
    let name = name.trim_end_matches('.');
    if name.is_empty() {
        return node;
    }
    for label in name.rsplit('.') {
        let label_hash = Keccak256::digest(label.to_ascii_lowercase().as_bytes());
        let mut hasher = Keccak256::new();
        hasher.update(node);
        hasher.update(label_hash);
        node = hasher.finalize().into();
    }
    node
}

/// Base58btc-encode bytes, as used for CIDv0.
pub fn base58_encode(input: &[u8]) -> String {
    let mut digits: Vec<u8> = Vec::new();
    for &byte in input {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            carry += (*digit as u32) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }
    let leading_zeros = input.iter().take_while(|&&b| b == 0).count();
    let mut out = String::with_capacity(leading_zeros + digits.len());
    out.extend(std::iter::repeat('1').take(leading_zeros));
    out.extend(
        digits
            .iter()
            .rev()
            .map(|&d| BASE58_ALPHABET[d as usize] as char),
    );
    out
}

/// Extract the IPFS CID from an ipfs-ns contenthash and render it as a
/// base58 CIDv0 (`Qm...`).
///
/// Accepts both CIDv0 payloads (`0x1220` + digest) and CIDv1 dag-pb
/// sha2-256 payloads, which re-encode losslessly as CIDv0.
pub fn contenthash_to_cid(contenthash: &[u8]) -> Result<String, DnsError> {
    let payload = contenthash
        .strip_prefix(&IPFS_NS_PREFIX)
        .ok_or_else(|| DnsError::Ens("contenthash is not ipfs-ns".into()))?;
    // CIDv1: version(0x01) codec(0x70 dag-pb), then the multihash.
    let multihash = payload.strip_prefix(&[0x01, 0x70]).unwrap_or(payload);
    if multihash.len() != 34 || multihash[0] != 0x12 || multihash[1] != 0x20 {
        return Err(DnsError::Ens("contenthash is not a sha2-256 CID".into()));
    }
    Ok(base58_encode(multihash))
}

impl Ens {
    /// Create an ENS client.
    ///
    /// # Arguments
    /// * `client` - Shared HTTP client.
    /// * `provider` - HTTP URL of the Ethereum RPC provider.
    /// * `ipfs_gateway` - Hostname of the IPFS gateway to proxy to.
    /// * `cache` - Cache for resolved contenthashes.
    pub fn new(
        client: reqwest::Client,
        provider: String,
        ipfs_gateway: String,
        cache: ContentHashCache,
    ) -> Self {
        Self {
            client,
            provider,
            ipfs_gateway,
            cache,
        }
    }

    /// Answer a question for an ENS-registered name.
    ///
    /// TXT questions resolve the contenthash on chain; A and AAAA
    /// questions proxy the IPFS gateway. Other types have no ENS
    /// translation and fail with `UnimplementedType`.
    pub async fn resolve_question(
        &self,
        question: &Question,
        upstream: &Upstream,
        ttl: u32,
    ) -> Result<Vec<ResourceRecord>, DnsError> {
        match question.qtype {
            RecordType::A | RecordType::Aaaa => self.gateway_records(question, upstream).await,
            RecordType::Txt => self.contenthash_records(question, ttl).await,
            other => Err(DnsError::UnimplementedType(other)),
        }
    }

    /// Proxy an A/AAAA question to the IPFS gateway host, rewriting the
    /// owner name to the queried name.
    async fn gateway_records(
        &self,
        question: &Question,
        upstream: &Upstream,
    ) -> Result<Vec<ResourceRecord>, DnsError> {
        let response = upstream
            .lookup_json(&self.ipfs_gateway, question.qtype)
            .await?;
        let records = response
            .answer
            .into_iter()
            .filter(|a| RecordType::from(a.rtype) == question.qtype)
            .map(|a| {
                let rdata = match question.qtype {
                    RecordType::Aaaa => RData::Aaaa(a.data),
                    _ => RData::A(a.data),
                };
                ResourceRecord {
                    name: question.name.clone(),
                    rtype: question.qtype,
                    class: CLASS_IN,
                    ttl: a.ttl,
                    rdata,
                }
            })
            .collect();
        Ok(records)
    }

    /// Answer a TXT question with the dnslink and raw contenthash.
    async fn contenthash_records(
        &self,
        question: &Question,
        ttl: u32,
    ) -> Result<Vec<ResourceRecord>, DnsError> {
        let contenthash = self.contenthash(&question.name).await?;
        let cid = contenthash_to_cid(&contenthash)?;
        info!("Resolved {} to /ipfs/{}", question.name, cid);

        let texts = [
            format!("dnslink=/ipfs/{cid}"),
            format!("contenthash=0x{}", hex::encode(&contenthash)),
        ];
        Ok(texts
            .into_iter()
            .map(|text| ResourceRecord {
                name: question.name.clone(),
                rtype: RecordType::Txt,
                class: CLASS_IN,
                ttl,
                rdata: RData::Txt(text),
            })
            .collect())
    }

    /// Fetch the contenthash for a name, going through the cache.
    async fn contenthash(&self, name: &str) -> Result<Vec<u8>, DnsError> {
        if let Some(cached) = self.cache.get(name) {
            debug!("Contenthash cache hit for {}", name);
            return Ok(cached);
        }

        let node = namehash(name);
        let resolver = self.resolver_address(&node).await?;
        let mut data = CONTENTHASH_SELECTOR.to_vec();
        data.extend_from_slice(&node);
        let returned = self.eth_call(&resolver, &data).await?;
        let contenthash = decode_abi_bytes(&returned)?;
        if contenthash.is_empty() {
            return Err(DnsError::Ens(format!("no contenthash set for {name}")));
        }

        self.cache.set(name.to_string(), contenthash.clone());
        Ok(contenthash)
    }

    /// Look up the resolver contract for a node in the ENS registry.
    async fn resolver_address(&self, node: &[u8; 32]) -> Result<String, DnsError> {
        let mut data = RESOLVER_SELECTOR.to_vec();
        data.extend_from_slice(node);
        let returned = self.eth_call(REGISTRY_ADDRESS, &data).await?;
        if returned.len() < 32 {
            return Err(DnsError::Ens("short resolver() return".into()));
        }
        let address = &returned[12..32];
        if address.iter().all(|&b| b == 0) {
            return Err(DnsError::Ens("name has no resolver".into()));
        }
        Ok(format!("0x{}", hex::encode(address)))
    }

    /// Issue one `eth_call` against the provider and return the raw
    /// returned bytes.
    async fn eth_call(&self, to: &str, data: &[u8]) -> Result<Vec<u8>, DnsError> {
        let body = json!({
            "jsonrpc": "2.0",
            "method": "eth_call",
            "params": [{ "to": to, "data": format!("0x{}", hex::encode(data)) }, "latest"],
            "id": 1,
        });
        let response: RpcResponse = self
            .client
            .post(&self.provider)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(DnsError::Ens(format!(
                "eth_call failed with code {}: {}",
                error.code, error.message
            )));
        }
        let result = response
            .result
            .ok_or_else(|| DnsError::Ens("eth_call returned no result".into()))?;
        hex::decode(result.trim_start_matches("0x"))
            .map_err(|e| DnsError::Ens(format!("eth_call returned invalid hex: {e}")))
    }
}

/// Decode a single ABI `bytes` return value: one offset word, one
/// length word, then the data.
fn decode_abi_bytes(returned: &[u8]) -> Result<Vec<u8>, DnsError> {
    if returned.is_empty() {
        return Ok(Vec::new());
    }
    if returned.len() < 64 {
        return Err(DnsError::Ens("short bytes return".into()));
    }
    let offset = abi_word_as_usize(&returned[..32])?;
    let length_end = offset
        .checked_add(32)
        .filter(|&end| end <= returned.len())
        .ok_or_else(|| DnsError::Ens("bytes offset out of range".into()))?;
    let length = abi_word_as_usize(&returned[offset..length_end])?;
    let data_end = length_end
        .checked_add(length)
        .filter(|&end| end <= returned.len())
        .ok_or_else(|| DnsError::Ens("bytes length out of range".into()))?;
    Ok(returned[length_end..data_end].to_vec())
}

fn abi_word_as_usize(word: &[u8]) -> Result<usize, DnsError> {
    if word.len() != 32 || word[..24].iter().any(|&b| b != 0) {
        return Err(DnsError::Ens("ABI word does not fit usize".into()));
    }
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&word[24..]);
    Ok(u64::from_be_bytes(bytes) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namehash_matches_the_eip137_vectors() {
        assert_eq!(namehash(""), [0u8; 32]);
        assert_eq!(
            hex::encode(namehash("eth")),
            "93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae"
        );
        assert_eq!(
            hex::encode(namehash("foo.eth")),
            "de9b09fd7c5f901e23a3f19fecc54828e9c848539801e86591bd9801b019f84f"
        );
        // The trailing dot of DNS presentation names is ignored.
        assert_eq!(namehash("foo.eth."), namehash("foo.eth"));
        assert_eq!(namehash("FOO.eth"), namehash("foo.eth"));
    }

    #[test]
    fn base58_matches_known_vectors() {
        assert_eq!(base58_encode(&[]), "");
        assert_eq!(base58_encode(&[0x61]), "2g");
        assert_eq!(base58_encode(&[0x62, 0x62, 0x62]), "a3gV");
        assert_eq!(base58_encode(&[0x63, 0x63, 0x63]), "aPEr");
        assert_eq!(base58_encode(&[0x00, 0x00, 0x01]), "112");
    }

    #[test]
    fn contenthash_decodes_to_a_cidv0() {
        // ipfs-ns, CIDv1 dag-pb, sha2-256 multihash.
        let mut contenthash = vec![0xE3, 0x01, 0x01, 0x70, 0x12, 0x20];
        contenthash.extend(
            hex::decode("29f2d17be6139079dc48696d1f582a8530eb9805b561eda517e22a892c7e3f1f")
                .unwrap(),
        );
        assert_eq!(
            contenthash_to_cid(&contenthash).unwrap(),
            "QmRAQB6YaCyidP37UdDnjFY5vQuiBrcqdyoW1CuDgwxkD4"
        );
    }

    #[test]
    fn non_ipfs_contenthashes_are_rejected() {
        // swarm-ns prefix
        assert!(matches!(
            contenthash_to_cid(&[0xE4, 0x01, 0x12, 0x20]),
            Err(DnsError::Ens(_))
        ));
        assert!(matches!(contenthash_to_cid(&[]), Err(DnsError::Ens(_))));
    }

    #[test]
    fn abi_bytes_returns_decode() {
        // offset 0x20, length 3, data "abc" padded to a word.
        let mut returned = vec![0u8; 32];
        returned[31] = 0x20;
        let mut length_word = vec![0u8; 32];
        length_word[31] = 3;
        returned.extend(length_word);
        let mut data = b"abc".to_vec();
        data.resize(32, 0);
        returned.extend(data);

        assert_eq!(decode_abi_bytes(&returned).unwrap(), b"abc");
        assert!(decode_abi_bytes(&[]).unwrap().is_empty());
        assert!(matches!(
            decode_abi_bytes(&[0u8; 40]),
            Err(DnsError::Ens(_))
        ));
    }
}
