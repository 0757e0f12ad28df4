//! Merchant request signature.
//!
//! The gateway authenticates `SUBMIT_TRANSACTION` requests with an MD5 hash
//! over `api_key~merchant_id~reference_code~amount~currency`. The field
//! order is part of the wire contract and must not change.

use std::fmt::Write as _;

use md5::{Digest, Md5};

/// Computes the hex-encoded request signature.
pub(crate) fn sign(
    api_key: &str,
    merchant_id: &str,
    reference_code: &str,
    amount: i64,
    currency: &str,
) -> String {
    let payload = format!("{api_key}~{merchant_id}~{reference_code}~{amount}~{currency}");
    let digest = Md5::digest(payload.as_bytes());

    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        // Writing into a String cannot fail.
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_matches_known_vector() {
        // md5("4Vj8eK4rloUd272L48hsrarnUA~508029~ORDER-100~423000~COP")
        assert_eq!(
            sign(
                "4Vj8eK4rloUd272L48hsrarnUA",
                "508029",
                "ORDER-100",
                423_000,
                "COP"
            ),
            "1a54485bd10d9e95efaa08b52109796e"
        );
    }

    #[test]
    fn signature_covers_every_field_in_order() {
        // md5("apiKey~merchantId~abc123~89000~COP")
        assert_eq!(
            sign("apiKey", "merchantId", "abc123", 89_000, "COP"),
            "edfbfe37419d927fc524041d9ef4958f"
        );
        // md5("k~m~o~1~COP")
        assert_eq!(
            sign("k", "m", "o", 1, "COP"),
            "628884d15e7bf1c253df7bbe2946ec55"
        );
    }

    #[test]
    fn changing_amount_changes_signature() {
        let a = sign("k", "m", "o", 1_000, "COP");
        let b = sign("k", "m", "o", 1_001, "COP");
        assert_ne!(a, b);
    }
}
