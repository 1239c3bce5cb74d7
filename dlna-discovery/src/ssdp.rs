//! SSDP (Simple Service Discovery Protocol) client for device discovery
//!
//! Sends a single M-SEARCH to the UPnP multicast group and yields the unicast
//! responses that arrive before the search deadline.

use std::net::UdpSocket;
use std::time::{Duration, Instant};

use crate::error::{DiscoveryError, Result};

/// UPnP multicast group and port
pub const SSDP_MULTICAST_ADDR: &str = "239.255.255.250:1900";

/// Search target matching every device and service on the network
pub const SEARCH_ALL: &str = "ssdp:all";

/// SSDP response containing the headers discovery cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsdpResponse {
    /// Description document URL, `None` when the header is missing or empty
    pub location: Option<String>,
    /// Advertised type (`ST`, or `NT` for announcements), empty when absent
    pub search_target: String,
    /// Unique service name, empty when absent
    pub usn: String,
    pub server: Option<String>,
}

/// Source of SSDP search responses.
///
/// `search` sends the request and returns the responses as they arrive; the
/// iterator ends once `timeout` has elapsed.
pub trait SsdpSearch: Send + Sync {
    fn search(&self, timeout: Duration) -> Result<Box<dyn Iterator<Item = SsdpResponse> + Send>>;
}

/// SSDP client for device discovery.
///
/// Every search binds its own socket, so concurrent searches are independent.
#[derive(Debug, Clone)]
pub struct SsdpClient {
    search_target: String,
}

impl SsdpClient {
    /// Client searching for every advertisable device and service type
    pub fn new() -> Self {
        Self::with_search_target(SEARCH_ALL)
    }

    pub fn with_search_target(search_target: impl Into<String>) -> Self {
        Self {
            search_target: search_target.into(),
        }
    }

    fn search_request(&self, timeout: Duration) -> String {
        let mx = timeout.as_secs().clamp(1, 5);
        format!(
            "M-SEARCH * HTTP/1.1\r\n\
             HOST: {}\r\n\
             MAN: \"ssdp:discover\"\r\n\
             MX: {}\r\n\
             ST: {}\r\n\
             USER-AGENT: dlna-cast/1.0 UPnP/1.0\r\n\
             \r\n",
            SSDP_MULTICAST_ADDR, mx, self.search_target
        )
    }
}

impl Default for SsdpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SsdpSearch for SsdpClient {
    fn search(&self, timeout: Duration) -> Result<Box<dyn Iterator<Item = SsdpResponse> + Send>> {
        let deadline = Instant::now() + timeout;

        let socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to bind UDP socket: {}", e)))?;

        socket
            .set_multicast_loop_v4(true)
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to set multicast loop: {}", e)))?;

        let request = self.search_request(timeout);
        socket
            .send_to(request.as_bytes(), SSDP_MULTICAST_ADDR)
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to send M-SEARCH: {}", e)))?;

        tracing::debug!(search_target = %self.search_target, "sent M-SEARCH");

        Ok(Box::new(SsdpResponseIterator::new(socket, deadline)))
    }
}

/// Iterator over SSDP responses received before a deadline
pub(crate) struct SsdpResponseIterator {
    socket: UdpSocket,
    deadline: Instant,
    buffer: [u8; 2048],
    finished: bool,
}

impl SsdpResponseIterator {
    fn new(socket: UdpSocket, deadline: Instant) -> Self {
        Self {
            socket,
            deadline,
            buffer: [0; 2048],
            finished: false,
        }
    }
}

impl Iterator for SsdpResponseIterator {
    type Item = SsdpResponse;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let remaining = self.deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || self.socket.set_read_timeout(Some(remaining)).is_err() {
                self.finished = true;
                break;
            }

            match self.socket.recv_from(&mut self.buffer) {
                Ok((size, from)) => {
                    let Ok(text) = std::str::from_utf8(&self.buffer[..size]) else {
                        tracing::trace!(%from, "ignoring non UTF-8 SSDP datagram");
                        continue;
                    };
                    match parse_ssdp_response(text) {
                        Some(response) => return Some(response),
                        None => tracing::trace!(%from, "ignoring unparseable SSDP datagram"),
                    }
                }
                Err(e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    self.finished = true;
                }
                Err(e) => {
                    tracing::warn!("SSDP socket error, ending search early: {}", e);
                    self.finished = true;
                }
            }
        }
        None
    }
}

/// Parse an SSDP search response from HTTP text
pub(crate) fn parse_ssdp_response(response: &str) -> Option<SsdpResponse> {
    let mut lines = response.lines();
    let status_line = lines.next()?.trim();
    let mut status = status_line.split_whitespace();
    if !status.next()?.starts_with("HTTP/") || status.next()? != "200" {
        return None;
    }

    let mut location = None;
    let mut search_target = None;
    let mut notification_type = None;
    let mut usn = None;
    let mut server = None;

    for line in lines {
        let line = line.trim();

        if let Some(value) = extract_header_value(line, "LOCATION:") {
            location = Some(value);
        } else if let Some(value) = extract_header_value(line, "ST:") {
            search_target = Some(value);
        } else if let Some(value) = extract_header_value(line, "NT:") {
            notification_type = Some(value);
        } else if let Some(value) = extract_header_value(line, "USN:") {
            usn = Some(value);
        } else if let Some(value) = extract_header_value(line, "SERVER:") {
            server = Some(value);
        }
    }

    Some(SsdpResponse {
        location: location.filter(|l| !l.is_empty()),
        search_target: search_target.or(notification_type).unwrap_or_default(),
        usn: usn.unwrap_or_default(),
        server,
    })
}

/// Extract header value from a line like "HEADER: value"
fn extract_header_value(line: &str, header: &str) -> Option<String> {
    if line.len() > header.len()
        && line.is_char_boundary(header.len())
        && line[..header.len()].eq_ignore_ascii_case(header)
    {
        Some(line[header.len()..].trim().to_string())
    } else {
        None
    }
}
