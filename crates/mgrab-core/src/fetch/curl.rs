//! Production [`RangeFetch`] backed by the curl easy API.

use super::parse::parse_response_headers;
use super::{FetchError, RangeFetch, RangeResponse};
use crate::config::MgrabConfig;
use std::collections::HashMap;
use std::str;
use std::time::Duration;

/// Blocking range fetcher. One easy handle per request; follows redirects;
/// forwards caller-supplied headers on every request (session cookies live
/// here; protected resources need the page's session state).
pub struct CurlFetcher {
    connect_timeout: Duration,
    request_timeout: Duration,
    low_speed_limit: u32,
    low_speed_time: Duration,
    custom_headers: HashMap<String, String>,
}

impl CurlFetcher {
    pub fn new(config: &MgrabConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            low_speed_limit: config.low_speed_limit_bytes,
            low_speed_time: Duration::from_secs(config.low_speed_time_secs),
            custom_headers: HashMap::new(),
        }
    }

    /// Headers sent with every request (e.g. `Cookie`, `Referer`).
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.custom_headers = headers;
        self
    }
}

impl RangeFetch for CurlFetcher {
    fn fetch_range(&self, locator: &str, offset: u64) -> Result<RangeResponse, FetchError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(locator)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        // Abort when throughput stalls, plus a hard wall-clock cap so a
        // completely stuck request eventually surfaces as a failure.
        easy.low_speed_limit(self.low_speed_limit)?;
        easy.low_speed_time(self.low_speed_time)?;
        easy.timeout(self.request_timeout)?;
        // Open-ended range: "from offset to the end". The server decides
        // how much of it to send per response.
        easy.range(&format!("{}-", offset))?;

        let mut list = curl::easy::List::new();
        for (k, v) in &self.custom_headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        if !self.custom_headers.is_empty() {
            easy.http_headers(list)?;
        }

        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()? as u32;
        let headers = parse_response_headers(&header_lines);

        Ok(RangeResponse {
            status,
            content_type: headers.content_type,
            content_range: headers.content_range,
            body,
        })
    }
}
