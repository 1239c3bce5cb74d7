//! Implementations of the `dlna` subcommands.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::info;

use dlna_api::{ApiError, ControlClient, DeviceResolver, UpnpTransport};
use dlna_config::ConfigStore;
use dlna_discovery::{Device, DiscoveryEngine};
use media_server::MediaServer;

use crate::{timeout_secs, Command};

pub fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Discover { timeout, json } => discover(timeout_secs(timeout), json),
        Command::Play {
            url,
            device,
            timeout,
            port,
        } => play(&url, device.as_deref(), timeout_secs(timeout), port),
        Command::Stop { device, timeout } => stop(device.as_deref(), timeout_secs(timeout)),
        Command::Status { device, timeout } => status(device.as_deref(), timeout_secs(timeout)),
        Command::Config {
            device,
            unset_device,
            show: _,
        } => config(device.as_deref(), unset_device),
    }
}

fn discover(timeout: Duration, json: bool) -> Result<ExitCode> {
    info!("Discovering devices with timeout of {}s...", timeout.as_secs());
    let engine = DiscoveryEngine::new().context("Failed to set up discovery")?;
    let devices = engine.discover(timeout).context("Failed to search the network")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&devices)?);
        return Ok(ExitCode::SUCCESS);
    }

    print!("{}", format_device_list(&devices));
    Ok(ExitCode::SUCCESS)
}

/// Human-readable listing of discovered devices
pub fn format_device_list(devices: &[Device]) -> String {
    if devices.is_empty() {
        return "No DLNA devices found.\n".to_string();
    }

    let mut out = format!("\nFound {} device(s):\n\n", devices.len());
    for (i, device) in devices.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, device.name));
        out.push_str(&format!("     Model: {}\n", device.model_name));
        out.push_str(&format!("     Address: {}\n\n", device.location));
    }
    out
}

/// Where the media handed to `play` comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// A URL the renderer can fetch directly
    Remote(String),
    /// A file that has to be served from this machine
    Local { directory: PathBuf, file_name: String },
}

impl MediaSource {
    /// Classify `input`: an existing file is local, anything else is a URL
    pub fn classify(input: &str) -> Result<Self> {
        let path = Path::new(input);
        if !path.is_file() {
            return Ok(MediaSource::Remote(input.to_string()));
        }

        let path = path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", input))?;
        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .with_context(|| format!("{} has no parent directory", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("{} has no file name", path.display()))?;

        Ok(MediaSource::Local { directory, file_name })
    }
}

fn play(input: &str, device: Option<&str>, timeout: Duration, port: u16) -> Result<ExitCode> {
    let source = MediaSource::classify(input)?;
    let Some(target) = resolve(device, timeout)? else {
        return Ok(ExitCode::FAILURE);
    };
    println!("Found: {}", target.name);

    let client = control_client()?;
    match source {
        MediaSource::Remote(url) => {
            client.play(&target, &url)?;
            println!("Playing {} on {}", url, target.name);
        }
        MediaSource::Local { directory, file_name } => {
            let server = MediaServer::start(&directory, port).context("Failed to start media server")?;
            let url = server.url_for(&file_name);
            client.play(&target, &url)?;

            println!("Playing {} on {}", file_name, target.name);
            println!("Serving {} at {} (Ctrl+C to stop)", directory.display(), server.public_url());
            wait_for_interrupt()?;

            server.stop();
            println!("Media server stopped");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn stop(device: Option<&str>, timeout: Duration) -> Result<ExitCode> {
    let Some(target) = resolve(device, timeout)? else {
        return Ok(ExitCode::FAILURE);
    };

    control_client()?.stop(&target)?;
    println!("Stopped {}", target.name);
    Ok(ExitCode::SUCCESS)
}

fn status(device: Option<&str>, timeout: Duration) -> Result<ExitCode> {
    let Some(target) = resolve(device, timeout)? else {
        return Ok(ExitCode::FAILURE);
    };

    let status = control_client()?.get_status(&target);
    println!("State: {}", status.state);
    Ok(ExitCode::SUCCESS)
}

fn config(device: Option<&str>, unset_device: bool) -> Result<ExitCode> {
    let store = ConfigStore::new()?;

    if let Some(name) = device {
        store
            .save_default_device(name)
            .context("Failed to set the default device")?;
        println!("Default device set to: {}", name.trim());
    } else if unset_device {
        store.clear_default_device()?;
        println!("Default device cleared");
    } else {
        print!("{}", format_config(&store));
    }
    Ok(ExitCode::SUCCESS)
}

pub fn format_config(store: &ConfigStore) -> String {
    let default_device = store
        .load_default_device()
        .unwrap_or_else(|| "(not set)".to_string());
    format!(
        "Config file: {}\nDefault device: {}\n",
        store.path().display(),
        default_device
    )
}

/// Resolve the requested device, telling the user when there is none.
///
/// Returns `Ok(None)` after printing guidance; the caller exits with failure.
fn resolve(device: Option<&str>, timeout: Duration) -> Result<Option<Device>> {
    let engine = DiscoveryEngine::new().context("Failed to set up discovery")?;
    let resolver = DeviceResolver::new(engine, ConfigStore::new()?);

    match resolver.resolve(device, timeout) {
        Ok(Some(found)) => Ok(Some(found)),
        Ok(None) => {
            eprintln!("{}", not_found_message(device));
            Ok(None)
        }
        Err(ApiError::NoDeviceSpecified) => {
            eprintln!("No device specified and no default device configured.");
            eprintln!("Pass a device name, or set a default with: dlna config --device <NAME>");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn not_found_message(device: Option<&str>) -> String {
    match device.map(str::trim).filter(|d| !d.is_empty()) {
        Some(name) => format!("Device '{}' not found", name),
        None => "Default device not found".to_string(),
    }
}

fn control_client() -> Result<ControlClient> {
    let transport = UpnpTransport::new().context("Failed to set up HTTP transport")?;
    Ok(ControlClient::new(transport))
}

/// Block until Ctrl+C is pressed
fn wait_for_interrupt() -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("Failed to install Ctrl+C handler")?;

    while running.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(200));
    }
    Ok(())
}
