//! # Bluetooth RFCOMM Transport
//!
//! Talks to a receipt printer over the Bluetooth Serial Port Profile (SPP),
//! exposed by the kernel as an RFCOMM tty.
//!
//! ## Bluetooth Setup (Linux)
//!
//! The printer must be paired and bound to an RFCOMM device first. The
//! `bind` subcommand does this via [`setup_rfcomm`], or by hand:
//!
//! ```bash
//! $ bluetoothctl
//! [bluetooth]# scan on
//! # Most cheap printers show up as "MTP-II", "RPP02N" or "BlueTooth Printer"
//! [bluetooth]# pair 66:22:XX:XX:XX:XX
//!
//! $ sudo rfcomm bind 0 66:22:XX:XX:XX:XX
//! # This creates /dev/rfcomm0
//! ```
//!
//! The tty is switched to raw 8N1 with software flow control off, so bitmap
//! bytes reach the printer exactly as built. Jobs over 4096 bytes go out in
//! chunks with a short pause; cheap printers have tiny receive buffers.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::process::{Command, Output};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::PrintError;

/// Default RFCOMM device path
pub const DEFAULT_DEVICE: &str = "/dev/rfcomm0";

/// Default chunk size for writes (bytes)
const CHUNK_SIZE: usize = 4096;

/// Delay between chunks (milliseconds)
const CHUNK_DELAY_MS: u64 = 2;

/// # Bluetooth Printer Transport
///
/// A connection to a receipt printer over Bluetooth RFCOMM. Dropping it
/// closes the device.
///
/// ## Example
///
/// ```no_run
/// use washprint::transport::bluetooth::BluetoothTransport;
/// use washprint::protocol::commands;
///
/// let mut transport = BluetoothTransport::open("/dev/rfcomm0")?;
/// transport.write_all(&commands::init())?;
///
/// # Ok::<(), washprint::error::PrintError>(())
/// ```
pub struct BluetoothTransport {
    device: String,
    file: File,
    chunk_size: usize,
    chunk_delay: Duration,
}

impl BluetoothTransport {
    /// Open a Bluetooth connection to the printer.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - The device doesn't exist
    /// - Permission denied (may need root or the dialout group)
    /// - TTY configuration fails
    pub fn open<P: AsRef<Path>>(device: P) -> Result<Self, PrintError> {
        let path = device.as_ref();

        let file = OpenOptions::new().write(true).open(path).map_err(|e| {
            PrintError::Transport(format!("Failed to open {}: {}", path.display(), e))
        })?;

        configure_tty_raw(file.as_raw_fd())?;
        debug!(device = %path.display(), "opened printer device");

        Ok(Self {
            device: path.display().to_string(),
            file,
            chunk_size: CHUNK_SIZE,
            chunk_delay: Duration::from_millis(CHUNK_DELAY_MS),
        })
    }

    /// Open with default device path (/dev/rfcomm0)
    pub fn open_default() -> Result<Self, PrintError> {
        Self::open(DEFAULT_DEVICE)
    }

    /// Device path this transport writes to.
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Set the chunk size for large writes. Default is 4096 bytes.
    pub fn set_chunk_size(&mut self, size: usize) {
        self.chunk_size = size.max(1);
    }

    /// Set the delay between chunks. Default is 2ms.
    pub fn set_chunk_delay(&mut self, delay: Duration) {
        self.chunk_delay = delay;
    }

    /// Write a print job and flush.
    ///
    /// Small writes are sent directly; large ones are chunked.
    pub fn write_all(&mut self, data: &[u8]) -> Result<(), PrintError> {
        if data.len() <= self.chunk_size {
            self.file
                .write_all(data)
                .map_err(|e| PrintError::Transport(format!("Write failed: {}", e)))?;
        } else {
            let chunks = data.len().div_ceil(self.chunk_size);
            debug!(bytes = data.len(), chunks, "writing chunked job");
            for chunk in data.chunks(self.chunk_size) {
                self.file
                    .write_all(chunk)
                    .map_err(|e| PrintError::Transport(format!("Write failed: {}", e)))?;

                if !self.chunk_delay.is_zero() {
                    thread::sleep(self.chunk_delay);
                }
            }
        }

        self.file
            .flush()
            .map_err(|e| PrintError::Transport(format!("Flush failed: {}", e)))?;

        Ok(())
    }
}

/// Put the tty behind `fd` in raw mode.
///
/// `cfmakeraw` leaves IXOFF/IXANY alone, and XON/XOFF bytes (0x11, 0x13)
/// occur in bitmap rows, so those are cleared as well. Plain files are
/// accepted untouched so jobs can be written to a path.
#[cfg(unix)]
fn configure_tty_raw(fd: i32) -> Result<(), PrintError> {
    use std::mem::MaybeUninit;

    let mut attrs = MaybeUninit::<libc::termios>::uninit();
    // SAFETY: tcgetattr fills `attrs` when it returns 0
    if unsafe { libc::tcgetattr(fd, attrs.as_mut_ptr()) } != 0 {
        let err = io::Error::last_os_error();
        return match err.raw_os_error() {
            Some(libc::ENOTTY) => Ok(()),
            _ => Err(PrintError::Transport(format!("Cannot read tty settings: {}", err))),
        };
    }
    let mut attrs = unsafe { attrs.assume_init() };

    unsafe { libc::cfmakeraw(&mut attrs) };
    attrs.c_iflag &= !(libc::IXOFF | libc::IXANY);

    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &attrs) } != 0 {
        return Err(PrintError::Transport(format!(
            "Cannot switch tty to raw mode: {}",
            io::Error::last_os_error()
        )));
    }
    Ok(())
}

#[cfg(not(unix))]
fn configure_tty_raw(_fd: i32) -> Result<(), PrintError> {
    Ok(())
}

// ============================================================================
// RFCOMM SETUP HELPERS
// ============================================================================

/// Validate a Bluetooth MAC address format (XX:XX:XX:XX:XX:XX).
pub fn is_valid_mac(mac: &str) -> bool {
    let groups: Vec<&str> = mac.split(':').collect();
    groups.len() == 6
        && groups
            .iter()
            .all(|g| g.len() == 2 && g.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// Device path of a listing line bound to `mac_upper`.
///
/// Lines look like `rfcomm0: 66:22:AA:BB:CC:DD channel 1 clean`.
fn rfcomm_device_in_line(line: &str, mac_upper: &str) -> Option<String> {
    if !line.to_uppercase().contains(mac_upper) {
        return None;
    }
    let (name, _) = line.split_once(':')?;
    let name = name.trim();
    (!name.is_empty()).then(|| format!("/dev/{}", name))
}

/// First device in an RFCOMM listing that is bound to `mac` and passes `exists`.
fn first_bound_device(
    listing: &str,
    mac: &str,
    exists: impl Fn(&str) -> bool,
) -> Option<String> {
    let mac_upper = mac.to_uppercase();
    listing
        .lines()
        .filter_map(|line| rfcomm_device_in_line(line, &mac_upper))
        .find(|path| exists(path.as_str()))
}

/// Run a Bluetooth utility and capture its output. Only a failure to launch
/// is an error; callers inspect the exit status.
fn run_tool(program: &str, args: &[&str]) -> Result<Output, PrintError> {
    debug!(program, ?args, "running");
    Command::new(program)
        .args(args)
        .output()
        .map_err(|e| PrintError::Transport(format!("Cannot run {}: {}", program, e)))
}

fn require_success(output: &Output, what: &str) -> Result<(), PrintError> {
    if output.status.success() {
        return Ok(());
    }
    Err(PrintError::Transport(format!(
        "{}: {}",
        what,
        String::from_utf8_lossy(&output.stderr).trim()
    )))
}

/// Find an existing RFCOMM device bound to the given MAC address.
///
/// Reads `/proc/net/rfcomm`, then asks `rfcomm -a`.
#[cfg(unix)]
pub fn find_rfcomm_for_mac(mac: &str) -> Result<Option<String>, PrintError> {
    let exists = |path: &str| Path::new(path).exists();

    if let Ok(listing) = fs::read_to_string("/proc/net/rfcomm")
        && let Some(device) = first_bound_device(&listing, mac, exists)
    {
        return Ok(Some(device));
    }

    let output = run_tool("rfcomm", &["-a"])?;
    Ok(first_bound_device(
        &String::from_utf8_lossy(&output.stdout),
        mac,
        exists,
    ))
}

#[cfg(not(unix))]
pub fn find_rfcomm_for_mac(_mac: &str) -> Result<Option<String>, PrintError> {
    Ok(None)
}

/// Connect to a paired printer and bind it to `/dev/rfcomm<channel>`.
///
/// Connects with `bluetoothctl`, checks reachability with `l2ping`, then runs
/// `rfcomm bind` on SPP channel 1. Binding needs root.
#[cfg(unix)]
pub fn setup_rfcomm(mac: &str, channel: u8) -> Result<String, PrintError> {
    let mac = mac.to_uppercase();
    let device_path = format!("/dev/rfcomm{}", channel);
    let settle = Duration::from_millis(500);

    info!(%mac, "connecting");
    let connect = run_tool("bluetoothctl", &["connect", &mac])?;
    let said = String::from_utf8_lossy(&connect.stdout);
    if !(said.contains("Connection successful") || said.contains("already connected")) {
        // not fatal, l2ping decides
        warn!(output = %said.trim(), "bluetoothctl did not confirm connection");
    }
    thread::sleep(settle);

    let ping = run_tool("l2ping", &["-c", "1", &mac])?;
    require_success(&ping, &format!("{} not reachable", mac))?;

    info!(channel, "binding rfcomm");
    let bind = run_tool("rfcomm", &["bind", &channel.to_string(), &mac, "1"])?;
    require_success(&bind, "rfcomm bind failed")?;
    thread::sleep(settle);

    if !Path::new(&device_path).exists() {
        return Err(PrintError::Transport(format!(
            "{} did not appear after binding",
            device_path
        )));
    }
    info!(device = %device_path, "bound");
    Ok(device_path)
}

#[cfg(not(unix))]
pub fn setup_rfcomm(_mac: &str, _channel: u8) -> Result<String, PrintError> {
    Err(PrintError::Transport(
        "RFCOMM binding needs Linux BlueZ tools".to_string(),
    ))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_device_path() {
        assert_eq!(DEFAULT_DEVICE, "/dev/rfcomm0");
    }

    #[test]
    fn test_valid_mac_addresses() {
        assert!(is_valid_mac("00:11:22:33:44:55"));
        assert!(is_valid_mac("AA:BB:CC:DD:EE:FF"));
        assert!(is_valid_mac("aa:bb:cc:dd:ee:ff"));
        assert!(is_valid_mac("66:22:0A:1B:2C:3D"));
    }

    #[test]
    fn test_invalid_mac_addresses() {
        assert!(!is_valid_mac("00:11:22:33:44")); // too short
        assert!(!is_valid_mac("00:11:22:33:44:55:66")); // too long
        assert!(!is_valid_mac("00-11-22-33-44-55")); // wrong separator
        assert!(!is_valid_mac("GG:HH:II:JJ:KK:LL")); // invalid hex
        assert!(!is_valid_mac(""));
        assert!(!is_valid_mac("not-a-mac"));
    }

    #[test]
    fn test_rfcomm_line_match() {
        let line = "rfcomm0: 66:22:aa:bb:cc:dd channel 1 clean";
        assert_eq!(
            rfcomm_device_in_line(line, "66:22:AA:BB:CC:DD"),
            Some("/dev/rfcomm0".to_string())
        );
    }

    #[test]
    fn test_rfcomm_line_other_mac() {
        let line = "rfcomm1: 00:11:22:33:44:55 channel 1 clean";
        assert_eq!(rfcomm_device_in_line(line, "66:22:AA:BB:CC:DD"), None);
    }

    #[test]
    fn test_first_bound_device_skips_missing_paths() {
        let listing = "rfcomm0: 66:22:AA:BB:CC:DD channel 1 closed\n\
                       rfcomm1: 00:11:22:33:44:55 channel 1 clean\n\
                       rfcomm2: 66:22:aa:bb:cc:dd channel 1 clean\n";
        let found = first_bound_device(listing, "66:22:aa:bb:cc:dd", |p| p == "/dev/rfcomm2");
        assert_eq!(found.as_deref(), Some("/dev/rfcomm2"));
        assert_eq!(first_bound_device(listing, "66:22:AA:BB:CC:DD", |_| false), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_tool_missing_program() {
        let err = run_tool("washprint-no-such-tool", &[]).unwrap_err();
        assert!(matches!(err, PrintError::Transport(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_require_success_reports_stderr() {
        let ok = run_tool("sh", &["-c", "exit 0"]).unwrap();
        assert!(require_success(&ok, "ok").is_ok());

        let failed = run_tool("sh", &["-c", "echo boom >&2; exit 3"]).unwrap();
        let err = require_success(&failed, "rfcomm bind failed").unwrap_err();
        assert_eq!(err.to_string(), "Transport error: rfcomm bind failed: boom");
    }

    #[test]
    fn test_open_missing_device() {
        let err = BluetoothTransport::open("/nonexistent/rfcomm0").err().unwrap();
        assert!(matches!(err, PrintError::Transport(_)));
    }

    #[test]
    fn test_write_to_plain_file() {
        let path = std::env::temp_dir().join(format!("washprint-bt-{}.bin", std::process::id()));
        std::fs::write(&path, b"").unwrap();

        let mut transport = BluetoothTransport::open(&path).unwrap();
        transport.set_chunk_size(3);
        transport.set_chunk_delay(Duration::ZERO);
        transport.write_all(&[1, 2, 3, 4, 5, 6, 7]).unwrap();
        drop(transport);

        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3, 4, 5, 6, 7]);
        std::fs::remove_file(&path).unwrap();
    }
}
