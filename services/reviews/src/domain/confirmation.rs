//! Deterministic confirmation codes.
//!
//! A code is `<issued_at base36>-<hex HMAC-SHA256 prefix>`, keyed by the server
//! secret over the user's id, username and email plus the issue time. Anyone
//! holding the secret can regenerate and compare it; changing the username or
//! email invalidates outstanding codes.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::types::User;

type HmacSha256 = Hmac<Sha256>;

const KEY_SALT: &[u8] = b"yamdb.reviews.confirmation-code";
const FIELD_SEP: &[u8] = &[0x1f];
/// Bytes of the MAC kept in the code.
const TAG_LEN: usize = 20;

/// Rejected secret (never happens for HMAC, surfaced instead of panicking).
#[derive(Debug, thiserror::Error)]
#[error("invalid confirmation secret")]
pub struct InvalidSecret;

/// Issue times before the Unix epoch have no code representation.
#[derive(Debug, thiserror::Error)]
#[error("confirmation code issue time {0} is before the unix epoch")]
pub struct IssuedBeforeEpoch(pub DateTime<Utc>);

#[derive(Clone)]
pub struct ConfirmationCodeIssuer {
    mac: HmacSha256,
    ttl: Duration,
}

impl std::fmt::Debug for ConfirmationCodeIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmationCodeIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl ConfirmationCodeIssuer {
    pub fn new(secret: impl AsRef<[u8]>, ttl: Duration) -> Result<Self, InvalidSecret> {
        let mac = HmacSha256::new_from_slice(secret.as_ref()).map_err(|_| InvalidSecret)?;
        Ok(Self { mac, ttl })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Code for `user` as of `issued_at`. Same inputs always give the same code.
    pub fn issue(
        &self,
        user: &User,
        issued_at: DateTime<Utc>,
    ) -> Result<String, IssuedBeforeEpoch> {
        let ts = u64::try_from(issued_at.timestamp()).map_err(|_| IssuedBeforeEpoch(issued_at))?;
        let tag = self.keyed(user, ts).finalize().into_bytes();
        Ok(format!(
            "{}-{}",
            to_base36(ts),
            base16ct::lower::encode_string(&tag[..TAG_LEN])
        ))
    }

    /// `true` if `code` was issued for the user's current state, is not from the
    /// future and is younger than the TTL at `now`.
    pub fn verify(&self, user: &User, code: &str, now: DateTime<Utc>) -> bool {
        let Some((ts_part, tag_part)) = code.split_once('-') else {
            return false;
        };
        let Some(ts) = from_base36(ts_part) else {
            return false;
        };
        let Ok(tag) = base16ct::lower::decode_vec(tag_part) else {
            return false;
        };
        if tag.len() != TAG_LEN {
            return false;
        }
        let Ok(issued) = i64::try_from(ts) else {
            return false;
        };
        let age = now.timestamp() - issued;
        if age < 0 || age > self.ttl.num_seconds() {
            return false;
        }
        self.keyed(user, ts).verify_truncated_left(&tag).is_ok()
    }

    fn keyed(&self, user: &User, ts: u64) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(KEY_SALT);
        mac.update(FIELD_SEP);
        mac.update(user.id.as_bytes());
        mac.update(FIELD_SEP);
        mac.update(user.username.as_bytes());
        mac.update(FIELD_SEP);
        mac.update(user.email.as_bytes());
        mac.update(FIELD_SEP);
        mac.update(ts.to_string().as_bytes());
        mac
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_owned();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Parses only the form `to_base36` emits: lowercase digits, no sign, no
/// leading zeros.
fn from_base36(s: &str) -> Option<u64> {
    if s.is_empty() || s.len() > 13 {
        return None;
    }
    if !s.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()) {
        return None;
    }
    if s.len() > 1 && s.starts_with('0') {
        return None;
    }
    u64::from_str_radix(s, 36).ok()
}
