//! HTTP server exposing a local directory to renderers.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tokio::sync::oneshot;
use url::Url;
use warp::Filter;

#[derive(Debug, Error)]
pub enum MediaServerError {
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("failed to bind port {port}: {reason}")]
    Bind { port: u16, reason: String },

    #[error("failed to start media server: {0}")]
    Startup(String),
}

/// Read-only HTTP server for the files of one directory.
///
/// The server runs on a background thread that owns a single-threaded tokio
/// runtime; this handle is fully synchronous. Dropping it stops the server.
///
/// # Example
///
/// ```no_run
/// use media_server::MediaServer;
///
/// let server = MediaServer::start("/home/me/Music", 0)?;
/// println!("Serving at {}", server.url_for("track 01.flac"));
/// server.stop();
/// # Ok::<(), media_server::MediaServerError>(())
/// ```
pub struct MediaServer {
    port: u16,
    public_url: String,
    directory: PathBuf,
    shutdown_tx: Option<oneshot::Sender<()>>,
    server_handle: Option<JoinHandle<()>>,
}

impl MediaServer {
    /// Serve `directory` on all interfaces at `port` (0 lets the OS choose).
    ///
    /// Returns once the listener is bound, or with the bind error.
    pub fn start(directory: impl AsRef<Path>, port: u16) -> Result<Self, MediaServerError> {
        let directory = directory.as_ref().to_path_buf();
        if !directory.is_dir() {
            return Err(MediaServerError::NotADirectory(directory));
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<SocketAddr, MediaServerError>>();

        let server_handle = Self::spawn_server(directory.clone(), port, shutdown_rx, ready_tx)?;

        let addr = match ready_rx.recv() {
            Ok(Ok(addr)) => addr,
            Ok(Err(e)) => {
                let _ = server_handle.join();
                return Err(e);
            }
            Err(_) => {
                let _ = server_handle.join();
                return Err(MediaServerError::Startup("server thread exited before binding".to_string()));
            }
        };

        let public_url = format!("http://{}:{}", detect_local_ip(), addr.port());
        tracing::info!("Serving {} at {}", directory.display(), public_url);

        Ok(Self {
            port: addr.port(),
            public_url,
            directory,
            shutdown_tx: Some(shutdown_tx),
            server_handle: Some(server_handle),
        })
    }

    /// The port the server is bound to
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Base URL renderers can reach the server at, `http://<local-ip>:<port>`
    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// URL of `file_name` inside the served directory, percent-encoded
    pub fn url_for(&self, file_name: &str) -> String {
        match Url::parse(&self.public_url) {
            Ok(mut url) => {
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments.pop_if_empty().push(file_name);
                }
                url.into()
            }
            Err(_) => format!("{}/{}", self.public_url, file_name),
        }
    }

    /// Shut the server down gracefully and wait for its thread
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.server_handle.take() {
            if handle.join().is_err() {
                tracing::warn!("Media server thread panicked");
            }
            tracing::debug!(port = self.port, "media server stopped");
        }
    }

    fn spawn_server(
        directory: PathBuf,
        port: u16,
        shutdown_rx: oneshot::Receiver<()>,
        ready_tx: mpsc::Sender<Result<SocketAddr, MediaServerError>>,
    ) -> Result<JoinHandle<()>, MediaServerError> {
        thread::Builder::new()
            .name("media-server".to_string())
            .spawn(move || {
                let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                    Ok(rt) => rt,
                    Err(e) => {
                        let _ = ready_tx.send(Err(MediaServerError::Startup(format!(
                            "failed to create tokio runtime: {}",
                            e
                        ))));
                        return;
                    }
                };

                rt.block_on(async move {
                    let routes = warp::fs::dir(directory).with(warp::trace::request());

                    let bound = warp::serve(routes).try_bind_with_graceful_shutdown(
                        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port),
                        async move {
                            let _ = shutdown_rx.await;
                        },
                    );

                    match bound {
                        Ok((addr, server)) => {
                            tracing::debug!("Media server listening on {}", addr);
                            let _ = ready_tx.send(Ok(addr));
                            server.await;
                        }
                        Err(e) => {
                            let _ = ready_tx.send(Err(MediaServerError::Bind {
                                port,
                                reason: e.to_string(),
                            }));
                        }
                    }
                });
            })
            .map_err(|e| MediaServerError::Startup(format!("failed to spawn server thread: {}", e)))
    }
}

impl Drop for MediaServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Detect the local IP address renderers should use to reach this host.
///
/// Uses a UDP socket connection to find the address of the outbound
/// interface. No data is actually sent. Falls back to `127.0.0.1`.
pub fn detect_local_ip() -> IpAddr {
    let detected = UdpSocket::bind("0.0.0.0:0")
        .and_then(|socket| {
            socket.connect("8.8.8.8:80")?;
            socket.local_addr()
        })
        .map(|addr| addr.ip());

    match detected {
        Ok(ip) if !ip.is_unspecified() => ip,
        _ => IpAddr::V4(Ipv4Addr::LOCALHOST),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_with_url(public_url: &str) -> MediaServer {
        MediaServer {
            port: 8000,
            public_url: public_url.to_string(),
            directory: PathBuf::from("/srv/media"),
            shutdown_tx: None,
            server_handle: None,
        }
    }

    #[test]
    fn test_url_for_plain_name() {
        let server = server_with_url("http://192.168.1.50:8000");
        assert_eq!(server.url_for("song.mp3"), "http://192.168.1.50:8000/song.mp3");
    }

    #[test]
    fn test_url_for_percent_encodes() {
        let server = server_with_url("http://192.168.1.50:8000");
        assert_eq!(
            server.url_for("my song #1?.mp3"),
            "http://192.168.1.50:8000/my%20song%20%231%3F.mp3"
        );
    }

    #[test]
    fn test_url_for_encodes_slash() {
        let server = server_with_url("http://192.168.1.50:8000");
        assert_eq!(server.url_for("a/b.mp3"), "http://192.168.1.50:8000/a%2Fb.mp3");
    }

    #[test]
    fn test_detect_local_ip_is_specified() {
        assert!(!detect_local_ip().is_unspecified());
    }
}
