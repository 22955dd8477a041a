//! # Access Gate
//!
//! Role-based route protection. The gate runs once per navigation as a
//! stateless pre-render check: it inspects the target path and an optional
//! bearer credential and produces either `Allow` or a redirect.
//!
//! Everything here fails closed. A credential that is missing, malformed,
//! expired, or carries a bad signature resolves to the sign-in redirect;
//! no credential failure ever surfaces as an error.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Sign-in target for unauthenticated or untrusted requests
pub const SIGN_IN_PATH: &str = "/signin";
/// Role-escalation target for non-sellers hitting seller routes
pub const BECOME_SELLER_PATH: &str = "/become-seller";
/// Storefront root, where non-admins hitting admin routes land
pub const STORE_PATH: &str = "/store";
/// Canonical admin dashboard
pub const ADMIN_DASHBOARD: &str = "/admin";
/// Canonical seller dashboard
pub const SELLER_DASHBOARD: &str = "/seller/dashboard";

/// Legacy admin sub-paths that collapse onto the admin dashboard
const ADMIN_CANONICALIZED: [&str; 4] = [
    "/admin/products",
    "/admin/users",
    "/admin/orders",
    "/admin/support",
];

/// Legacy seller sub-paths that collapse onto the seller dashboard
const SELLER_CANONICALIZED: [&str; 3] = [
    "/seller/products",
    "/seller/orders",
    "/seller/profile",
];

/// Claims decoded from a bearer credential.
///
/// Every field is defaulted: an absent claim is falsy, never a decode
/// failure and never a panic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID); keys the session slot
    #[serde(default)]
    pub sub: Option<String>,

    /// Admin role claim
    #[serde(default, rename = "isAdmin")]
    pub is_admin: bool,

    /// Seller role claim
    #[serde(default, rename = "isSeller")]
    pub is_seller: bool,

    /// Expiry as a unix timestamp
    #[serde(default)]
    pub exp: Option<i64>,
}

/// The gate's decision for one navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Let the navigation proceed
    Allow,
    /// Send the user elsewhere; never an error page
    Redirect(String),
}

impl GateDecision {
    fn redirect(target: &str) -> Self {
        GateDecision::Redirect(target.to_string())
    }
}

/// Stateless per-request access gate.
///
/// Credentials are three-segment tokens (`header.claims.signature`) whose
/// claims segment is base64url-encoded JSON. The signature is HMAC-SHA256
/// over `header.claims`, verified against a shared signing secret before
/// any claim is trusted.
#[derive(Clone)]
pub struct AccessGate {
    signing_secret: String,
}

impl AccessGate {
    /// Create a gate with the given signing secret
    pub fn new(signing_secret: impl Into<String>) -> Self {
        Self {
            signing_secret: signing_secret.into(),
        }
    }

    /// Decide what to do with a navigation to `path` carrying `token`.
    pub fn evaluate(&self, path: &str, token: Option<&str>) -> GateDecision {
        let admin_area = is_under(path, "/admin");
        let seller_area = is_under(path, "/seller");

        if !admin_area && !seller_area {
            return GateDecision::Allow;
        }

        // Missing, malformed, expired, and badly signed credentials all
        // collapse to the same fail-closed outcome.
        let claims = match token.and_then(|t| self.verify_token(t)) {
            Some(claims) => claims,
            None => return GateDecision::redirect(SIGN_IN_PATH),
        };

        if seller_area && !claims.is_seller {
            return GateDecision::redirect(BECOME_SELLER_PATH);
        }
        if admin_area && !claims.is_admin {
            return GateDecision::redirect(STORE_PATH);
        }

        // Legacy sub-paths are not independently addressable, even for the
        // right role.
        if ADMIN_CANONICALIZED.contains(&path) {
            return GateDecision::redirect(ADMIN_DASHBOARD);
        }
        if SELLER_CANONICALIZED.contains(&path) {
            return GateDecision::redirect(SELLER_DASHBOARD);
        }

        GateDecision::Allow
    }

    /// Verify a credential's signature and expiry, returning its claims.
    ///
    /// Returns `None` on any structural, signature, or expiry failure.
    pub fn verify_token(&self, token: &str) -> Option<Claims> {
        let mut segments = token.splitn(3, '.');
        let header = segments.next()?;
        let payload = segments.next()?;
        let signature = segments.next()?;

        let signed_input = format!("{}.{}", header, payload);
        let expected = compute_hmac_sha256(&self.signing_secret, &signed_input);
        let provided = URL_SAFE_NO_PAD.decode(signature).ok()?;
        if !constant_time_compare(&provided, &expected) {
            return None;
        }

        let claims_json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let claims: Claims = serde_json::from_slice(&claims_json).ok()?;

        if let Some(exp) = claims.exp {
            if exp <= Utc::now().timestamp() {
                return None;
            }
        }

        Some(claims)
    }
}

fn is_under(path: &str, prefix: &str) -> bool {
    path == prefix || path.starts_with(&format!("{}/", prefix))
}

fn compute_hmac_sha256(secret: &str, message: &str) -> Vec<u8> {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "gate-test-secret";

    /// Build a signed token carrying the given claims JSON
    fn sign_token(claims_json: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims_json);
        let signed_input = format!("{}.{}", header, payload);
        let sig = URL_SAFE_NO_PAD.encode(compute_hmac_sha256(SECRET, &signed_input));
        format!("{}.{}", signed_input, sig)
    }

    fn gate() -> AccessGate {
        AccessGate::new(SECRET)
    }

    fn admin_token() -> String {
        sign_token(r#"{"sub":"u1","isAdmin":true,"isSeller":false}"#)
    }

    fn seller_token() -> String {
        sign_token(r#"{"sub":"u2","isAdmin":false,"isSeller":true}"#)
    }

    #[test]
    fn test_public_paths_skip_the_gate() {
        assert_eq!(gate().evaluate("/store", None), GateDecision::Allow);
        assert_eq!(gate().evaluate("/", None), GateDecision::Allow);
        // Prefix match is on path segments, not raw strings
        assert_eq!(gate().evaluate("/administrivia", None), GateDecision::Allow);
    }

    #[test]
    fn test_missing_credential_redirects_to_signin() {
        assert_eq!(
            gate().evaluate("/seller/dashboard", None),
            GateDecision::Redirect(SIGN_IN_PATH.into())
        );
        assert_eq!(
            gate().evaluate("/admin", None),
            GateDecision::Redirect(SIGN_IN_PATH.into())
        );
    }

    #[test]
    fn test_malformed_credentials_never_allow() {
        let g = gate();
        for bad in [
            "",
            "garbage",
            "a.b",
            "a.b.c",
            "!!!.###.$$$",
            &sign_token("not json at all"),
        ] {
            assert_eq!(
                g.evaluate("/admin", Some(bad)),
                GateDecision::Redirect(SIGN_IN_PATH.into()),
                "token {:?} must fail closed",
                bad
            );
        }
    }

    #[test]
    fn test_tampered_signature_fails_closed() {
        let token = admin_token();
        let tampered = format!("{}x", &token[..token.len() - 1]);
        assert_eq!(
            gate().evaluate("/admin", Some(&tampered)),
            GateDecision::Redirect(SIGN_IN_PATH.into())
        );
    }

    #[test]
    fn test_expired_credential_fails_closed() {
        let expired = sign_token(r#"{"sub":"u1","isAdmin":true,"exp":1}"#);
        assert_eq!(
            gate().evaluate("/admin", Some(&expired)),
            GateDecision::Redirect(SIGN_IN_PATH.into())
        );
    }

    #[test]
    fn test_role_mismatch_redirects() {
        let g = gate();
        assert_eq!(
            g.evaluate("/seller/dashboard", Some(&admin_token())),
            GateDecision::Redirect(BECOME_SELLER_PATH.into())
        );
        assert_eq!(
            g.evaluate("/admin", Some(&seller_token())),
            GateDecision::Redirect(STORE_PATH.into())
        );
    }

    #[test]
    fn test_absent_claims_are_falsy() {
        let bare = sign_token(r#"{"sub":"u3"}"#);
        assert_eq!(
            gate().evaluate("/admin", Some(&bare)),
            GateDecision::Redirect(STORE_PATH.into())
        );
    }

    #[test]
    fn test_canonicalization_even_with_role() {
        let g = gate();
        assert_eq!(
            g.evaluate("/admin/products", Some(&admin_token())),
            GateDecision::Redirect(ADMIN_DASHBOARD.into())
        );
        assert_eq!(
            g.evaluate("/seller/orders", Some(&seller_token())),
            GateDecision::Redirect(SELLER_DASHBOARD.into())
        );
    }

    #[test]
    fn test_valid_credential_allows() {
        let g = gate();
        assert_eq!(g.evaluate("/admin", Some(&admin_token())), GateDecision::Allow);
        assert_eq!(
            g.evaluate("/seller/dashboard", Some(&seller_token())),
            GateDecision::Allow
        );
    }

    #[test]
    fn test_verify_token_returns_claims() {
        let claims = gate().verify_token(&seller_token()).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("u2"));
        assert!(claims.is_seller);
        assert!(!claims.is_admin);
    }
}
