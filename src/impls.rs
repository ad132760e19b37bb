use crate::types::*;

use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
        }
    }
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Gtc => "GTC",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive, surrounding whitespace ignored
impl FromStr for Side {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            other => Err(OrderError::Validation(format!("unknown side '{}'", other))),
        }
    }
}

/// Case-insensitive, surrounding whitespace ignored
impl FromStr for OrderType {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MARKET" => Ok(OrderType::Market),
            "LIMIT" => Ok(OrderType::Limit),
            other => Err(OrderError::Validation(format!("unknown order type '{}'", other))),
        }
    }
}

impl Choice for Side {
    const CHOICES: &'static [&'static str] = &["BUY", "SELL"];
}

impl Choice for OrderType {
    const CHOICES: &'static [&'static str] = &["MARKET", "LIMIT"];
}

/// Reject the shapes the exchange would reject anyway, before any network call.
/// A stray price on a market order is dropped.
impl TryFrom<&OrderRequest> for OrderParams {
    type Error = OrderError;

    fn try_from(request: &OrderRequest) -> Result<Self, Self::Error> {
        if request.symbol.trim().is_empty() {
            return Err(OrderError::Validation("symbol must not be empty.".to_string()));
        }
        if !(request.quantity.is_finite() && request.quantity > 0.0) {
            return Err(OrderError::Validation("quantity must be greater than 0.".to_string()));
        }

        match request.order_type {
            OrderType::Market => Ok(OrderParams::Market {
                symbol: request.symbol.clone(),
                side: request.side,
                quantity: request.quantity,
            }),
            OrderType::Limit => match request.price {
                None => Err(OrderError::Validation("Price must be provided for LIMIT orders.".to_string())),
                Some(price) if !(price.is_finite() && price > 0.0) => {
                    Err(OrderError::Validation("price must be greater than 0.".to_string()))
                }
                Some(price) => Ok(OrderParams::Limit {
                    symbol: request.symbol.clone(),
                    side: request.side,
                    quantity: request.quantity,
                    price,
                    time_in_force: TimeInForce::Gtc,
                }),
            },
        }
    }
}

impl OrderParams {
    pub fn symbol(&self) -> &str {
        match self {
            OrderParams::Market { symbol, .. } | OrderParams::Limit { symbol, .. } => symbol,
        }
    }

    pub fn order_type(&self) -> OrderType {
        match self {
            OrderParams::Market { .. } => OrderType::Market,
            OrderParams::Limit { .. } => OrderType::Limit,
        }
    }

    /// Wire parameters in submission order.
    /// Only limit orders carry `price` and `timeInForce`.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            OrderParams::Market { symbol, side, quantity } => vec![
                ("symbol", symbol.clone()),
                ("side", side.as_str().to_string()),
                ("type", OrderType::Market.as_str().to_string()),
                ("quantity", quantity.to_string()),
            ],
            OrderParams::Limit { symbol, side, quantity, price, time_in_force } => vec![
                ("symbol", symbol.clone()),
                ("side", side.as_str().to_string()),
                ("type", OrderType::Limit.as_str().to_string()),
                ("quantity", quantity.to_string()),
                ("price", price.to_string()),
                ("timeInForce", time_in_force.as_str().to_string()),
            ],
        }
    }
}

impl TryFrom<RawResponse> for OrderResult {
    type Error = OrderError;

    /// Classify an exchange response.
    /// Non-2xx is an api error carrying the exchange's code and message when it sent them.
    fn try_from(response: RawResponse) -> Result<Self, Self::Error> {
        if !(200..300).contains(&response.status) {
            return Err(match serde_json::from_str::<BinanceErrorResponse>(&response.body) {
                Ok(err) => OrderError::Api {
                    status: response.status,
                    code: Some(err.code),
                    message: err.msg,
                },
                Err(_) => OrderError::Api {
                    status: response.status,
                    code: None,
                    message: response.body.trim().to_string(),
                },
            });
        }

        let raw: serde_json::Value = serde_json::from_str(&response.body)
            .map_err(|e| OrderError::Unknown(format!("malformed response: {}", e)))?;
        let parsed: BinanceOrderResponse = serde_json::from_value(raw.clone())
            .map_err(|e| OrderError::Unknown(format!("unexpected response format: {}", e)))?;

        Ok(OrderResult {
            order_id: parsed.order_id,
            symbol: parsed.symbol,
            status: parsed.status,
            client_order_id: parsed.client_order_id,
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(order_type: OrderType, price: Option<f64>) -> OrderRequest {
        OrderRequest {
            symbol: "BTCUSDT".to_string(),
            side: Side::Buy,
            order_type,
            quantity: 0.5,
            price,
        }
    }

    #[test]
    fn side_and_type_parse_case_insensitively() {
        assert_eq!("buy".parse::<Side>().unwrap(), Side::Buy);
        assert_eq!(" Sell ".parse::<Side>().unwrap(), Side::Sell);
        assert_eq!("Market".parse::<OrderType>().unwrap(), OrderType::Market);
        assert_eq!("limit".parse::<OrderType>().unwrap(), OrderType::Limit);
        assert!("hold".parse::<Side>().is_err());
        assert!("stop".parse::<OrderType>().is_err());
    }

    #[test]
    fn limit_without_price_is_rejected() {
        let err = OrderParams::try_from(&request(OrderType::Limit, None)).unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
    }

    #[test]
    fn non_finite_amounts_are_rejected() {
        let mut huge_quantity = request(OrderType::Market, None);
        huge_quantity.quantity = f64::INFINITY;
        assert!(matches!(OrderParams::try_from(&huge_quantity), Err(OrderError::Validation(_))));

        let mut nan_quantity = request(OrderType::Market, None);
        nan_quantity.quantity = f64::NAN;
        assert!(matches!(OrderParams::try_from(&nan_quantity), Err(OrderError::Validation(_))));

        let huge_price = request(OrderType::Limit, Some(format!("1{}", "0".repeat(400)).parse().unwrap()));
        assert!(matches!(OrderParams::try_from(&huge_price), Err(OrderError::Validation(_))));
    }

    #[test]
    fn market_drops_stray_price() {
        let params = OrderParams::try_from(&request(OrderType::Market, Some(100.0))).unwrap();
        let keys: Vec<&str> = params.to_query_pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["symbol", "side", "type", "quantity"]);
    }

    #[test]
    fn limit_carries_price_and_gtc() {
        let params = OrderParams::try_from(&request(OrderType::Limit, Some(25000.0))).unwrap();
        let pairs = params.to_query_pairs();
        assert!(pairs.contains(&("price", "25000".to_string())));
        assert!(pairs.contains(&("timeInForce", "GTC".to_string())));
        assert!(pairs.contains(&("quantity", "0.5".to_string())));
    }

    #[test]
    fn credentials_debug_hides_secret() {
        let creds = Credentials { api_key: "key".to_string(), api_secret: "hunter2".to_string() };
        let printed = format!("{:?}", creds);
        assert!(printed.contains("key"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn error_response_keeps_code_and_message() {
        let response = RawResponse {
            status: 401,
            body: r#"{"code":-2015,"msg":"Invalid API-key, IP, or permissions for action."}"#.to_string(),
        };
        match OrderResult::try_from(response).unwrap_err() {
            OrderError::Api { status, code, message } => {
                assert_eq!(status, 401);
                assert_eq!(code, Some(-2015));
                assert_eq!(message, "Invalid API-key, IP, or permissions for action.");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn non_json_error_body_is_kept_verbatim() {
        let response = RawResponse { status: 502, body: "Bad Gateway\n".to_string() };
        let err = OrderResult::try_from(response).unwrap_err();
        assert_eq!(err.to_string(), "Binance API error: 502 - Bad Gateway");
    }

    #[test]
    fn success_without_order_id_is_unknown() {
        let response = RawResponse { status: 200, body: r#"{"symbol":"BTCUSDT"}"#.to_string() };
        assert!(matches!(OrderResult::try_from(response).unwrap_err(), OrderError::Unknown(_)));
    }

    #[test]
    fn success_is_decoded() {
        let response = RawResponse {
            status: 200,
            body: r#"{"orderId":4032919631,"symbol":"BTCUSDT","status":"NEW","clientOrderId":"abc","type":"MARKET"}"#.to_string(),
        };
        let result = OrderResult::try_from(response).unwrap();
        assert_eq!(result.order_id, 4032919631);
        assert_eq!(result.status, "NEW");
        assert_eq!(result.client_order_id, "abc");
        assert_eq!(result.raw["type"], "MARKET");
    }
}
