//! QR payload format.
//!
//! ```text
//! {sys:GUN_CID,cid:<case number>,formid:<code>}
//! ```
//!
//! Fields are inserted verbatim. Callers must reject values containing
//! [`code_catalog::FIELD_DELIMITERS`] (see [`find_delimiter`]) since the
//! format has no escaping.

use code_catalog::FIELD_DELIMITERS;

/// Target system identifier at the start of every payload.
pub const PAYLOAD_SYSTEM: &str = "GUN_CID";

/// Build the QR payload for a case number and a KDL code.
pub fn build_payload(case_number: &str, code: &str) -> String {
    format!("{{sys:{PAYLOAD_SYSTEM},cid:{case_number},formid:{code}}}")
}

/// First payload delimiter contained in `value`, if any.
pub fn find_delimiter(value: &str) -> Option<char> {
    value.chars().find(|c| FIELD_DELIMITERS.contains(c))
}
