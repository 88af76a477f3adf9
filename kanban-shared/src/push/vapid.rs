/// VAPID application-server identification (RFC 8292)
///
/// Keys come in the raw base64url form produced by the common `web-push`
/// tooling: a 32-byte P-256 private scalar and the matching 65-byte
/// uncompressed public point. The private key is wrapped into a PKCS#8
/// document so `jsonwebtoken` can sign ES256 with it.
///
/// # Example
///
/// ```no_run
/// use kanban_shared::push::vapid::VapidKeys;
///
/// # fn example(public: &str, private: &str) -> Result<(), kanban_shared::push::PushError> {
/// let keys = VapidKeys::from_base64(public, private, "mailto:admin@example.com")?;
/// let header = keys.authorization("https://fcm.googleapis.com/fcm/send/abc")?;
/// assert!(header.starts_with("vapid t="));
/// # Ok(())
/// # }
/// ```

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;

use super::PushError;

/// PKCS#8 prefix for an EC P-256 private key, up to the private scalar
const PKCS8_PREFIX: [u8; 36] = [
    0x30, 0x81, 0x87, 0x02, 0x01, 0x00, 0x30, 0x13, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d,
    0x02, 0x01, 0x06, 0x08, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07, 0x04, 0x6d, 0x30,
    0x6b, 0x02, 0x01, 0x01, 0x04, 0x20,
];

/// `[1]` public key tag and BIT STRING header preceding the public point
const PKCS8_PUBLIC_TAG: [u8; 5] = [0xa1, 0x44, 0x03, 0x42, 0x00];

const PRIVATE_KEY_LEN: usize = 32;
const PUBLIC_KEY_LEN: usize = 65;

/// JWT lifetime; push services reject anything above 24h
const TOKEN_LIFETIME_HOURS: i64 = 12;

#[derive(Debug, Serialize)]
struct VapidClaims<'a> {
    aud: String,
    exp: i64,
    sub: &'a str,
}

/// Signing material for VAPID authorization headers
#[derive(Clone)]
pub struct VapidKeys {
    encoding_key: EncodingKey,
    public_key: String,
    subject: String,
}

impl std::fmt::Debug for VapidKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VapidKeys")
            .field("public_key", &self.public_key)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

fn decode_key(raw: &str, expected_len: usize, which: &str) -> Result<Vec<u8>, PushError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(raw.trim().trim_end_matches('='))
        .map_err(|e| PushError::InvalidKey(format!("{} key is not base64url: {}", which, e)))?;

    if bytes.len() != expected_len {
        return Err(PushError::InvalidKey(format!(
            "{} key must be {} bytes, got {}",
            which,
            expected_len,
            bytes.len()
        )));
    }

    Ok(bytes)
}

fn pkcs8_document(private: &[u8], public: &[u8]) -> Vec<u8> {
    let mut der = Vec::with_capacity(
        PKCS8_PREFIX.len() + PRIVATE_KEY_LEN + PKCS8_PUBLIC_TAG.len() + PUBLIC_KEY_LEN,
    );
    der.extend_from_slice(&PKCS8_PREFIX);
    der.extend_from_slice(private);
    der.extend_from_slice(&PKCS8_PUBLIC_TAG);
    der.extend_from_slice(public);
    der
}

/// `scheme://host[:port]` of a push endpoint, the JWT audience
fn audience(endpoint: &str) -> Result<String, PushError> {
    let url = reqwest::Url::parse(endpoint)
        .map_err(|e| PushError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;

    if url.host_str().is_none() {
        return Err(PushError::InvalidEndpoint(endpoint.to_string()));
    }

    Ok(url.origin().ascii_serialization())
}

impl VapidKeys {
    /// Builds signing material from base64url raw keys
    ///
    /// `subject` is a `mailto:` or `https:` contact URI sent to push services.
    pub fn from_base64(public: &str, private: &str, subject: &str) -> Result<Self, PushError> {
        let public_bytes = decode_key(public, PUBLIC_KEY_LEN, "public")?;
        let private_bytes = decode_key(private, PRIVATE_KEY_LEN, "private")?;

        if public_bytes[0] != 0x04 {
            return Err(PushError::InvalidKey(
                "public key must be an uncompressed P-256 point".to_string(),
            ));
        }

        let der = pkcs8_document(&private_bytes, &public_bytes);

        Ok(Self {
            encoding_key: EncodingKey::from_ec_der(&der),
            public_key: URL_SAFE_NO_PAD.encode(&public_bytes),
            subject: subject.to_string(),
        })
    }

    /// Public key as handed to browsers (`applicationServerKey`)
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// `Authorization` header value for a request to `endpoint`
    pub fn authorization(&self, endpoint: &str) -> Result<String, PushError> {
        let claims = VapidClaims {
            aud: audience(endpoint)?,
            exp: (Utc::now() + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp(),
            sub: &self.subject,
        };

        let token = encode(&Header::new(Algorithm::ES256), &claims, &self.encoding_key)
            .map_err(|e| PushError::Signing(e.to_string()))?;

        Ok(format!("vapid t={}, k={}", token, self.public_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pkcs8_document_layout() {
        let der = pkcs8_document(&[1u8; 32], &[4u8; 65]);

        assert_eq!(der.len(), 138);
        assert_eq!(&der[..3], &[0x30, 0x81, 0x87]);
        assert_eq!(&der[36..68], &[1u8; 32]);
        assert_eq!(&der[68..73], &PKCS8_PUBLIC_TAG);
    }

    #[test]
    fn test_audience_is_origin() {
        assert_eq!(
            audience("https://fcm.googleapis.com/fcm/send/abc:def").unwrap(),
            "https://fcm.googleapis.com"
        );
        assert_eq!(
            audience("https://push.example.com:8443/x").unwrap(),
            "https://push.example.com:8443"
        );
        assert!(audience("not a url").is_err());
    }

    #[test]
    fn test_rejects_wrong_key_sizes() {
        let short = URL_SAFE_NO_PAD.encode([4u8; 10]);
        let private = URL_SAFE_NO_PAD.encode([1u8; 32]);

        let err = VapidKeys::from_base64(&short, &private, "mailto:a@b.c").unwrap_err();
        assert!(matches!(err, PushError::InvalidKey(_)));

        assert!(VapidKeys::from_base64("%%%", &private, "mailto:a@b.c").is_err());
    }

    #[test]
    fn test_rejects_compressed_public_key() {
        let public = URL_SAFE_NO_PAD.encode([2u8; 65]);
        let private = URL_SAFE_NO_PAD.encode([1u8; 32]);

        assert!(VapidKeys::from_base64(&public, &private, "mailto:a@b.c").is_err());
    }
}
