use crate::workflow::Node;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Canonical, order-fixed view of the content that defines a node.
///
/// Ids, positions, timestamps, toggles and lifecycle status are not part of it.
#[derive(Serialize)]
struct FingerprintInput<'a> {
    title: &'a str,
    description: &'a str,
    url: &'a str,
    category: &'a str,
    spec: Option<String>,
    actions: Vec<ActionFingerprint<'a>>,
}

#[derive(Serialize)]
struct ActionFingerprint<'a> {
    #[serde(rename = "type")]
    action_type: &'a str,
    enabled: bool,
}

/// Computes the content fingerprint (`inputHash`) of a node.
///
/// The attached spec document is digested on its own first, so the canonical
/// record stays small regardless of attachment size.
pub fn fingerprint(node: &Node) -> String {
    let input = FingerprintInput {
        title: &node.title,
        description: node.description.trim(),
        url: &node.url,
        category: node.category.as_str(),
        spec: node.spec.as_ref().map(|s| sha256_hex(s.content.as_bytes())),
        actions: node
            .actions
            .iter()
            .map(|a| ActionFingerprint {
                action_type: &a.action_type,
                enabled: a.enabled,
            })
            .collect(),
    };

    // Only strings, bools and options are serialized here.
    let bytes = serde_json::to_vec(&input).unwrap_or_default();
    sha256_hex(&bytes)
}

/// Lowercase hex SHA-256 digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}
