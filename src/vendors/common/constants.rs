use std::time::Duration;

pub const USER_AGENT: &str = concat!("slabfinder/", env!("CARGO_PKG_VERSION"));

// Cosmos only answers its product endpoint to XHR-style requests
pub const XHR_HEADER: &str = "x-requested-with";
pub const XHR_HEADER_VALUE: &str = "XMLHttpRequest";

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
