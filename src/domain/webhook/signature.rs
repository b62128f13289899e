//! Slack request signing
//!
//! Reference: https://api.slack.com/authentication/verifying-requests-from-slack

use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, error, warn};

use crate::utils::AppError;

pub const SIGNATURE_HEADER: &str = "X-Slack-Signature";
pub const TIMESTAMP_HEADER: &str = "X-Slack-Request-Timestamp";

/// Maximum allowed clock difference for a signed request (5 minutes in seconds)
const MAX_TIMESTAMP_DIFF_SECS: i64 = 300;

const VERSION: &str = "v0";

/// Verify the signature headers of a Slack request against its raw body
pub fn verify_request(secret: &str, headers: &HeaderMap, body: &[u8]) -> Result<(), AppError> {
    let signature = header_str(headers, SIGNATURE_HEADER)?;
    let timestamp = header_str(headers, TIMESTAMP_HEADER)?;

    validate_timestamp(timestamp, chrono::Utc::now().timestamp())?;
    verify_signature(secret, timestamp, signature, body)?;

    debug!("Slack signature verified");
    Ok(())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, AppError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            warn!(header = name, "Missing Slack signature header");
            AppError::unauthorized(format!("Missing {} header", name))
        })
}

/// `X-Slack-Request-Timestamp` must be within five minutes of `now`
fn validate_timestamp(timestamp: &str, now: i64) -> Result<(), AppError> {
    let request_timestamp: i64 = timestamp.parse().map_err(|e| {
        warn!(error = %e, timestamp = %timestamp, "Invalid timestamp format");
        AppError::unauthorized("Invalid timestamp format")
    })?;

    let diff = (now - request_timestamp).abs();
    if diff > MAX_TIMESTAMP_DIFF_SECS {
        warn!(
            request_timestamp,
            current_timestamp = now,
            diff_seconds = diff,
            "Timestamp too old or too far in the future"
        );
        return Err(AppError::unauthorized(
            "Request timestamp is too old or invalid",
        ));
    }

    Ok(())
}

fn mac_for(secret: &str, timestamp: &str, body: &[u8]) -> Result<Hmac<Sha256>, AppError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|e| {
        error!(error = %e, "HMAC initialization failed");
        AppError::internal_error("HMAC error")
    })?;
    mac.update(VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    Ok(mac)
}

fn verify_signature(
    secret: &str,
    timestamp: &str,
    signature: &str,
    body: &[u8],
) -> Result<(), AppError> {
    let hex_digest = signature.strip_prefix("v0=").ok_or_else(|| {
        warn!("Invalid Slack signature format: missing v0= prefix");
        AppError::unauthorized("Invalid signature format")
    })?;
    let digest = hex::decode(hex_digest).map_err(|_| {
        warn!("Slack signature is not valid hex");
        AppError::unauthorized("Invalid signature format")
    })?;

    mac_for(secret, timestamp, body)?
        .verify_slice(&digest)
        .map_err(|_| {
            warn!("Slack signature mismatch");
            AppError::unauthorized("Signature mismatch")
        })
}

/// Compute the `X-Slack-Signature` value for a body, as Slack does
pub fn sign(secret: &str, timestamp: &str, body: &[u8]) -> Result<String, AppError> {
    let mac = mac_for(secret, timestamp, body)?;
    Ok(format!(
        "{}={}",
        VERSION,
        hex::encode(mac.finalize().into_bytes())
    ))
}
