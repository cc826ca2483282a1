use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Sign a raw request body with HMAC-SHA256, returning `sha256=<hex>`.
///
/// Note: new_from_slice only fails for algorithms with key length constraints.
/// SHA256 accepts any key length, so this is infallible in practice.
pub fn sign_payload(secret: &str, body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC-SHA256 accepts any key length");
    mac.update(body);
    format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes()))
}

/// Verify a signature header against the exact body bytes that were received.
pub fn verify_signature(secret: &str, body: &[u8], signature: Option<&str>) -> bool {
    let Some(signature) = signature else {
        return false;
    };
    let expected = sign_payload(secret, body);
    constant_time_eq(expected.as_bytes(), signature.as_bytes())
}

pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{"_id":"doc1","_type":"newsPost","_updatedAt":"2024-01-01T00:00:00Z","title":"Hello"}"#;

    #[test]
    fn test_sign_payload_format() {
        let signature = sign_payload("s3cret", BODY.as_bytes());

        assert!(signature.starts_with("sha256="), "signature should have sha256= prefix");
        assert_eq!(signature.len(), 7 + 64, "signature should be prefix(7) + hex(64)");
        assert!(signature[7..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_sign_payload_known_vector() {
        // RFC 4231 test case 2
        let signature = sign_payload("Jefe", b"what do ya want for nothing?");
        assert_eq!(
            signature,
            "sha256=5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_sign_payload_different_secrets() {
        let sig1 = sign_payload("secret1", b"body");
        let sig2 = sign_payload("secret2", b"body");

        assert_ne!(sig1, sig2, "different secrets should produce different signatures");
    }

    #[test]
    fn test_verify_signature_valid() {
        let signature = sign_payload("s3cret", BODY.as_bytes());
        assert!(verify_signature("s3cret", BODY.as_bytes(), Some(&signature)));
    }

    #[test]
    fn test_verify_signature_missing() {
        assert!(!verify_signature("s3cret", BODY.as_bytes(), None));
    }

    #[test]
    fn test_verify_signature_wrong_secret() {
        let signature = sign_payload("secret1", BODY.as_bytes());
        assert!(!verify_signature("secret2", BODY.as_bytes(), Some(&signature)));
    }

    #[test]
    fn test_verify_signature_tampered_body() {
        let signature = sign_payload("s3cret", BODY.as_bytes());
        let tampered = BODY.replace("Hello", "Goodbye");

        assert!(
            !verify_signature("s3cret", tampered.as_bytes(), Some(&signature)),
            "tampered body should fail verification"
        );
    }

    #[test]
    fn test_verify_signature_is_whitespace_sensitive() {
        let signature = sign_payload("s3cret", BODY.as_bytes());
        let reformatted = format!("{} ", BODY);
        assert!(!verify_signature("s3cret", reformatted.as_bytes(), Some(&signature)));
    }

    #[test]
    fn test_verify_signature_malformed() {
        assert!(!verify_signature("s3cret", b"body", Some("not_a_valid_signature")));
        assert!(!verify_signature("s3cret", b"body", Some("sha256=invalid")));
        assert!(!verify_signature("s3cret", b"body", Some("")));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"admin", b"admin"));
        assert!(!constant_time_eq(b"admin", b"admin2"));
        assert!(!constant_time_eq(b"", b"x"));
    }
}
