/// Base url of Binance USDT-M futures testnet
pub const TESTNET_BASE_URL: &str = "https://testnet.binancefuture.com";

/// Base url of Binance USDT-M futures production
pub const MAINNET_BASE_URL: &str = "https://fapi.binance.com";

/// New order endpoint (USDT-M futures)
pub const NEW_ORDER_PATH: &str = "/fapi/v1/order";

/// Header carrying the api-key for signed endpoints
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Default value of `recvWindow` in milliseconds
pub const DEFAULT_RECV_WINDOW_MS: u64 = 5000;

/// Default timeout for a single HTTP request in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Default log file, appended across runs
pub const DEFAULT_LOG_FILE: &str = "trading_bot.log";

/// Typed at any prompt to leave the interactive loop
pub const EXIT_SENTINEL: &str = "EXIT";
