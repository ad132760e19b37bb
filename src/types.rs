use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::defines::*;

#[derive(Debug, Parser)]
#[clap(name="futbot")]
#[clap(about="futbot lets you place market/limit orders on Binance USDT-M futures interactively", long_about=None)]
pub struct CommandlineArgs {
    /// Execute against production instead of testnet.
    /// Testnet is the default for safety.
    #[clap(long)]
    pub mainnet: bool,

    /// File to append log lines to, in addition to console
    #[clap(long, parse(from_os_str), default_value=DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// `recvWindow` in milliseconds sent along with each signed request
    #[clap(long, default_value_t=DEFAULT_RECV_WINDOW_MS)]
    pub recv_window: u64,

    /// Timeout in seconds of a single HTTP request
    #[clap(long, default_value_t=DEFAULT_HTTP_TIMEOUT_SECS)]
    pub timeout: u64,
}

/// Api credentials, held for the lifetime of the process only.
/// `Debug` is implemented manually so the secret never lands in logs.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

/// Tunables of `FuturesClient` not related to credentials.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub recv_window_ms: u64,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Market,
    Limit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInForce {
    /// Good till cancelled
    Gtc,
}

/// Enumerated value the operator picks from a fixed set at a prompt.
pub trait Choice: FromStr {
    /// Wire values accepted, in display order
    const CHOICES: &'static [&'static str];
}

/// Order as gathered from the operator.
/// `price` is only meaningful (and required) for `OrderType::Limit`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: f64,
    pub price: Option<f64>,
}

/// Validated order in the shape submitted to the exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderParams {
    Market {
        symbol: String,
        side: Side,
        quantity: f64,
    },
    Limit {
        symbol: String,
        side: Side,
        quantity: f64,
        price: f64,
        time_in_force: TimeInForce,
    },
}

/// Status code and body of an HTTP response, as seen by `Transport`.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Successful placement outcome.
#[derive(Debug, Clone)]
pub struct OrderResult {
    pub order_id: u64,
    pub symbol: String,
    pub status: String,
    pub client_order_id: String,

    /// Full response echoed back by the exchange
    pub raw: serde_json::Value,
}

/// Subset of the new order response we care about.
// https://binance-docs.github.io/apidocs/futures/en/#new-order-trade
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceOrderResponse {
    pub order_id: u64,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub client_order_id: String,
}

/// Error payload returned by Binance along with a non-2xx status.
#[derive(Debug, serde::Deserialize)]
pub struct BinanceErrorResponse {
    pub code: i64,
    pub msg: String,
}

/// Failure to construct the exchange client. Fatal.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("failed to build http client: {0}")]
    Http(#[from] isahc::Error),
}

/// Failure of a single order placement. Never fatal.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("Binance API error: {status} - {}", describe_api_error(.code, .message))]
    Api {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    #[error("network/request error: {0}")]
    Network(String),

    #[error("unexpected error: {0}")]
    Unknown(String),
}

/// Rejection of a quantity or price typed by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Invalid number. Please enter a valid decimal.")]
    NotANumber,

    #[error("Value must be greater than 0.")]
    NotPositive,
}

fn describe_api_error(code: &Option<i64>, message: &str) -> String {
    match code {
        Some(code) => format!("[{}] {}", code, message),
        None => message.to_string(),
    }
}
