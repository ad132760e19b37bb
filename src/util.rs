use crate::types::OrderParams;

use chrono::Utc;
use ring::hmac;
use std::time::Instant;

/// Elapsed milliseconds since `start`.
pub fn measure_end(start: &Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Milliseconds since unix epoch, as Binance expects for `timestamp`.
pub fn timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// HMAC-SHA256 of `payload` keyed with `secret`, lowercase hex encoded.
pub fn sign(secret: &str, payload: &str) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let tag = hmac::sign(&key, payload.as_bytes());
    hex::encode(tag.as_ref())
}

/// Form-encoded body of a signed request: order parameters, `recvWindow`,
/// `timestamp` then `signature` over everything before it.
pub fn build_signed_query(params: &OrderParams, recv_window_ms: u64, timestamp: i64, secret: &str) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params.to_query_pairs() {
        serializer.append_pair(key, &value);
    }
    serializer.append_pair("recvWindow", &recv_window_ms.to_string());
    serializer.append_pair("timestamp", &timestamp.to_string());
    let query = serializer.finish();

    let signature = sign(secret, &query);
    format!("{}&signature={}", query, signature)
}
