use crate::defines::*;
use crate::types::*;
use crate::util::*;

use isahc::config::Configurable;
use isahc::{HttpClient, ReadResponseExt, Request};
use std::convert::TryFrom;
use std::time::{Duration, Instant};
use tracing::dispatcher::{self, Dispatch};
use tracing::{error, info};

/// Sends one form-encoded POST to a signed endpoint.
/// Anything preventing a response from arriving is `OrderError::Network`.
pub trait Transport {
    fn post_form(&self, url: &str, api_key: &str, body: String) -> Result<RawResponse, OrderError>;
}

/// Blocking transport backed by isahc.
pub struct IsahcTransport {
    client: HttpClient,
}

impl IsahcTransport {
    pub fn new(timeout: Duration) -> Result<IsahcTransport, InitError> {
        let client = HttpClient::builder().timeout(timeout).build()?;
        Ok(IsahcTransport { client })
    }
}

impl Transport for IsahcTransport {
    fn post_form(&self, url: &str, api_key: &str, body: String) -> Result<RawResponse, OrderError> {
        let request = Request::post(url)
            .header(API_KEY_HEADER, api_key)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .map_err(|e| OrderError::Unknown(format!("unable to build request: {}", e)))?;

        let mut response = self.client.send(request)
            .map_err(|e| OrderError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text()
            .map_err(|e| OrderError::Network(format!("unable to read response body: {}", e)))?;

        Ok(RawResponse { status, body })
    }
}

/// Thin wrapper over Binance USDT-M futures order placement.
/// Holds credentials for the lifetime of the process, and logs through the
/// `Dispatch` it was given.
pub struct FuturesClient<T: Transport = IsahcTransport> {
    credentials: Credentials,
    base_url: &'static str,
    recv_window_ms: u64,
    transport: T,
    dispatch: Dispatch,
}

impl FuturesClient<IsahcTransport> {
    /// Construct the client with a real HTTP transport.
    /// Failure here is meant to be fatal for the caller.
    pub fn new(credentials: Credentials, use_testnet: bool, settings: &ClientSettings, dispatch: Dispatch) -> Result<Self, InitError> {
        let transport = match IsahcTransport::new(settings.timeout) {
            Ok(transport) => transport,
            Err(e) => {
                dispatcher::with_default(&dispatch, || error!("Failed to initialize client: {}", e));
                return Err(e);
            }
        };
        Ok(Self::with_transport(credentials, use_testnet, settings, transport, dispatch))
    }
}

impl<T: Transport> FuturesClient<T> {
    pub fn with_transport(credentials: Credentials, use_testnet: bool, settings: &ClientSettings, transport: T, dispatch: Dispatch) -> Self {
        let base_url = if use_testnet { TESTNET_BASE_URL } else { MAINNET_BASE_URL };
        dispatcher::with_default(&dispatch, || {
            info!("Binance client initialized successfully (testnet: {}, endpoint: {})", use_testnet, base_url)
        });

        FuturesClient {
            credentials,
            base_url,
            recv_window_ms: settings.recv_window_ms,
            transport,
            dispatch,
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url
    }

    /// Place an order, returning `None` on any failure.
    /// Failures are logged, never propagated.
    pub fn place_order(&self, request: &OrderRequest) -> Option<OrderResult> {
        self.try_place_order(request)
            .map_err(|e| dispatcher::with_default(&self.dispatch, || log_order_error(&e)))
            .ok()
    }

    /// Place an order, returning the classified failure if any.
    pub fn try_place_order(&self, request: &OrderRequest) -> Result<OrderResult, OrderError> {
        dispatcher::with_default(&self.dispatch, || self.submit(request))
    }

    fn submit(&self, request: &OrderRequest) -> Result<OrderResult, OrderError> {
        info!(
            "Attempting to place {} {} order for {} {}...",
            request.side, request.order_type, request.quantity, request.symbol
        );

        // validation happens before anything touches the network
        let params = OrderParams::try_from(request)?;
        let body = build_signed_query(&params, self.recv_window_ms, timestamp_ms(), &self.credentials.api_secret);
        let url = format!("{}{}", self.base_url, NEW_ORDER_PATH);

        let start = Instant::now();
        let response = self.transport.post_form(&url, &self.credentials.api_key, body)?;
        info!(
            symbol = params.symbol(),
            order_type = params.order_type().as_str(),
            http_status = response.status,
            "Response received in {:.2} ms",
            measure_end(&start)
        );

        let result = OrderResult::try_from(response)?;
        info!(
            symbol = %result.symbol,
            status = %result.status,
            client_order_id = %result.client_order_id,
            "Order placed successfully! Order ID: {}",
            result.order_id
        );
        info!("Order Details: {}", result.raw);
        Ok(result)
    }
}

fn log_order_error(e: &OrderError) {
    match e {
        OrderError::Api { status, code, message } => {
            error!(status = *status, code = ?code, "Binance API Error: {} - {}", status, message)
        }
        OrderError::Validation(msg) => error!("Validation Error: {}", msg),
        OrderError::Network(msg) => error!("Network/Request Error: {}", msg),
        OrderError::Unknown(msg) => error!("Unexpected Error: {}", msg),
    }
}
