//! HTTP access for vendor adapters.
//!
//! One `reqwest::Client` is shared by every adapter in the process. It carries
//! the per-request timeout so a stalled vendor cannot hold a cycle open.

use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};

use super::constants::{CONNECT_TIMEOUT, USER_AGENT};
use crate::error::SlabError;

/// Error classification for fetch failures, reported in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    /// 4xx - the page moved or the request is malformed
    Client,
    /// 5xx - vendor-side trouble, usually transient
    Server,
    /// Connection, DNS, TLS or timeout
    Network,
}

pub fn build_client(timeout: Duration) -> Result<reqwest::Client, SlabError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .user_agent(USER_AGENT)
        .build()
        .map_err(SlabError::from)
}

pub fn classify_status(status: StatusCode) -> ErrorType {
    if status.is_client_error() {
        ErrorType::Client
    } else if status.is_server_error() {
        ErrorType::Server
    } else {
        ErrorType::Network
    }
}

pub fn classify_error(err: &reqwest::Error) -> ErrorType {
    match err.status() {
        Some(status) => classify_status(status),
        None => ErrorType::Network,
    }
}

/// Send `request` and return the body text.
///
/// Transport failures, non-2xx statuses and unreadable bodies all become
/// `SlabError::Fetch` tagged with `endpoint`.
pub async fn read_body(request: RequestBuilder, endpoint: &str) -> Result<String, SlabError> {
    let response = request.send().await.map_err(|e| {
        let kind = if e.is_timeout() {
            "timeout".to_string()
        } else {
            format!("{:?}", classify_error(&e)).to_lowercase()
        };
        SlabError::fetch(endpoint, format!("{} error: {}", kind, e))
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SlabError::fetch(
            endpoint,
            format!(
                "status {} ({:?} error)",
                status.as_u16(),
                classify_status(status)
            ),
        ));
    }

    response
        .text()
        .await
        .map_err(|e| SlabError::fetch(endpoint, format!("reading body: {}", e)))
}
