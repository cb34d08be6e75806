//! JWT decoding and advisory analysis
//!
//! Decodes the three dot-separated base64url segments of a JWT, interprets
//! the standard timestamp claims, and runs an advisory (never blocking)
//! security analysis. No signature verification is performed at any point —
//! the signature segment is surfaced, never validated against a key.

use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{JwtError, JwtSegment};

/// Timestamp claims interpreted during analysis
const TIMESTAMP_CLAIMS: &[(&str, &str)] = &[
    ("nbf", "Not Before"),
    ("exp", "Expiration"),
    ("iat", "Issued At"),
];

/// Substrings that suggest sensitive material inside the payload
const SENSITIVE_NEEDLES: &[&str] = &["password", "secret", "key", "token"];

/// HMAC algorithms recognized as symmetric schemes
const SYMMETRIC_ALGS: &[&str] = &["HS256", "HS384", "HS512"];

/// A fully decoded JWT with derived timestamps and advisory findings
#[derive(Debug, Clone, Serialize)]
pub struct DecodedJwt {
    /// Decoded header object
    pub header: Map<String, Value>,

    /// Decoded payload (claims) object
    pub payload: Map<String, Value>,

    /// Raw signature segment, surfaced but never verified
    pub signature: String,

    /// Interpreted `nbf`/`exp`/`iat` claims, where present
    pub timestamps: Vec<TimestampClaim>,

    /// Advisory security findings
    pub analysis: SecurityAnalysis,
}

/// One interpreted timestamp claim
#[derive(Debug, Clone, Serialize)]
pub struct TimestampClaim {
    /// Claim name (`nbf`, `exp`, `iat`)
    pub claim: String,

    /// Human-readable claim label
    pub label: String,

    /// Raw UNIX timestamp
    pub timestamp: i64,

    /// Rendered UTC datetime
    pub datetime: String,

    /// Whether the claim instant is past the analysis instant (`exp` only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,

    /// Seconds until expiry, for an unexpired `exp`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_secs: Option<i64>,
}

/// Advisory findings: warnings flag weaknesses, notes add context
#[derive(Debug, Clone, Default, Serialize)]
pub struct SecurityAnalysis {
    pub warnings: Vec<String>,
    pub notes: Vec<String>,
}

/// Decode and analyze a token against the current instant
pub fn decode(token: &str) -> Result<DecodedJwt, JwtError> {
    decode_at(token, Utc::now())
}

/// Decode and analyze a token against an explicit instant.
///
/// Pure: the same token and instant always produce the same result.
pub fn decode_at(token: &str, now: DateTime<Utc>) -> Result<DecodedJwt, JwtError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(JwtError::Format(parts.len()));
    }

    let header = decode_object(parts[0], JwtSegment::Header)?;
    let payload = decode_object(parts[1], JwtSegment::Payload)?;
    let signature = parts[2].to_string();

    let timestamps = interpret_timestamps(&payload, now);
    let analysis = analyze(&header, &payload, now);

    Ok(DecodedJwt {
        header,
        payload,
        signature,
        timestamps,
        analysis,
    })
}

/// Base64url-decode one segment and parse it as a JSON object
fn decode_object(segment: &str, which: JwtSegment) -> Result<Map<String, Value>, JwtError> {
    let text = decode_base64url(segment).map_err(|reason| JwtError::Segment {
        segment: which,
        reason,
    })?;

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(JwtError::Segment {
            segment: which,
            reason: "decoded segment is not a JSON object".to_string(),
        }),
        Err(err) => Err(JwtError::Segment {
            segment: which,
            reason: format!("invalid JSON: {}", err),
        }),
    }
}

/// Decode base64url text: re-pad to a multiple of 4, then decode with the
/// URL-safe alphabet and interpret the bytes as UTF-8.
fn decode_base64url(segment: &str) -> Result<String, String> {
    let mut padded = segment.to_string();
    let missing = padded.len() % 4;
    if missing != 0 {
        padded.extend(std::iter::repeat_n('=', 4 - missing));
    }

    let bytes = URL_SAFE
        .decode(&padded)
        .map_err(|e| format!("invalid base64url: {}", e))?;
    String::from_utf8(bytes).map_err(|e| format!("invalid UTF-8: {}", e))
}

fn interpret_timestamps(payload: &Map<String, Value>, now: DateTime<Utc>) -> Vec<TimestampClaim> {
    let mut claims = Vec::new();

    for (claim, label) in TIMESTAMP_CLAIMS {
        let Some(ts) = payload.get(*claim).and_then(claim_timestamp) else {
            continue;
        };
        let Some(datetime) = DateTime::from_timestamp(ts, 0) else {
            continue;
        };

        let (expired, remaining_secs) = if *claim == "exp" {
            let remaining = ts - now.timestamp();
            (Some(remaining < 0), (remaining >= 0).then_some(remaining))
        } else {
            (None, None)
        };

        claims.push(TimestampClaim {
            claim: claim.to_string(),
            label: label.to_string(),
            timestamp: ts,
            datetime: datetime.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            expired,
            remaining_secs,
        });
    }

    claims
}

/// Integer-coercible claim value: JSON numbers and numeric strings count
fn claim_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn analyze(
    header: &Map<String, Value>,
    payload: &Map<String, Value>,
    now: DateTime<Utc>,
) -> SecurityAnalysis {
    let mut analysis = SecurityAnalysis::default();

    match header.get("alg").and_then(Value::as_str) {
        None => analysis
            .warnings
            .push("CRITICAL: no algorithm in header - token is unsigned".to_string()),
        Some(alg) if alg.eq_ignore_ascii_case("none") => analysis
            .warnings
            .push("CRITICAL: algorithm 'none' - token is unsigned".to_string()),
        Some(alg) if SYMMETRIC_ALGS.contains(&alg) => analysis.notes.push(format!(
            "algorithm {} is a symmetric HMAC scheme: whoever verifies can also mint",
            alg
        )),
        Some(_) => {}
    }

    match payload.get("exp").and_then(claim_timestamp) {
        Some(exp) => {
            let remaining = exp - now.timestamp();
            if remaining < 0 {
                analysis.warnings.push("token is EXPIRED".to_string());
            } else {
                analysis
                    .notes
                    .push(format!("token valid for another {}", humanize(remaining)));
            }
        }
        None => analysis
            .warnings
            .push("token has no expiration claim (exp)".to_string()),
    }

    let payload_text = Value::Object(payload.clone()).to_string().to_lowercase();
    for needle in SENSITIVE_NEEDLES {
        if payload_text.contains(needle) {
            analysis.warnings.push(format!(
                "payload may contain sensitive material: '{}'",
                needle
            ));
        }
    }

    analysis
}

/// Render a positive number of seconds as "Nh Nm Ns"
fn humanize(secs: i64) -> String {
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let rest = secs % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else if mins > 0 {
        format!("{}m {}s", mins, rest)
    } else {
        format!("{}s", rest)
    }
}
