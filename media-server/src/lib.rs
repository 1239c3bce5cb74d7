//! Local media exposer for DLNA renderers.
//!
//! Renderers pull media over HTTP, so a local file has to be served before a
//! renderer can play it. [`MediaServer`] serves one directory read-only and
//! builds the URLs to hand to the renderer.
//!
//! ```no_run
//! use media_server::MediaServer;
//!
//! let server = MediaServer::start("/home/me/Music", 0)?;
//! let url = server.url_for("song.mp3");
//! // hand `url` to a renderer, keep `server` alive while it plays
//! # Ok::<(), media_server::MediaServerError>(())
//! ```

pub mod server;

pub use server::{detect_local_ip, MediaServer, MediaServerError};
