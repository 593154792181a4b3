//! Byte transport for computer-link communication.
//!
//! This module defines the [`Transport`] trait the client talks through and
//! [`SerialTransport`], its implementation over a serial port. The transport
//! knows nothing about frames or checksums; it only moves bytes.
//!
//! # Design
//!
//! - **Protocol agnostic** - Handles only byte transmission, no FX knowledge
//! - **Synchronous** - Blocking reads bounded by the configured timeout
//! - **Half duplex** - One outstanding request at a time, enforced by the client
//!
//! # Constants
//!
//! - [`DEFAULT_BAUD_RATE`] - Default link speed (9600 baud)
//! - [`DEFAULT_TIMEOUT`] - Default response timeout (1 second)
//!
//! # Example
//!
//! ```
//! use fx_link::{DataBits, Parity, SerialConfig};
//! use std::time::Duration;
//!
//! let config = SerialConfig::new("/dev/ttyUSB0")
//!     .with_baud_rate(38400)
//!     .with_timeout(Duration::from_millis(500));
//!
//! assert_eq!(config.data_bits, DataBits::Seven);
//! assert_eq!(config.parity, Parity::Even);
//! ```

use std::io;
use std::time::Duration;

#[cfg(feature = "serial")]
use std::io::{Read, Write};
#[cfg(feature = "serial")]
use std::time::Instant;

/// Default baud rate of the FX programming port.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default time to wait for a complete response.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Byte channel to a PLC.
///
/// Implementations must be blocking: [`read`](Transport::read) returns once
/// the buffer is full or the configured timeout has expired.
pub trait Transport: Send {
    /// Opens the channel.
    fn open(&mut self) -> io::Result<()>;

    /// Closes the channel. Closing a closed channel is not an error.
    fn close(&mut self) -> io::Result<()>;

    /// Returns whether the channel is open.
    fn is_connected(&self) -> bool;

    /// Returns the number of bytes waiting to be read.
    fn available_bytes(&mut self) -> io::Result<usize>;

    /// Writes `data` and returns the number of bytes written.
    fn write(&mut self, data: &[u8]) -> io::Result<usize>;

    /// Reads until `buf` is full or the timeout expires.
    ///
    /// Returns the number of bytes read, which is less than `buf.len()` only
    /// if the timeout expired first.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Discards bytes received but not yet read.
    fn flush_input(&mut self) -> io::Result<()>;

    /// Discards bytes queued but not yet transmitted.
    fn flush_output(&mut self) -> io::Result<()>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn open(&mut self) -> io::Result<()> {
        (**self).open()
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn available_bytes(&mut self) -> io::Result<usize> {
        (**self).available_bytes()
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        (**self).write(data)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn flush_input(&mut self) -> io::Result<()> {
        (**self).flush_input()
    }

    fn flush_output(&mut self) -> io::Result<()> {
        (**self).flush_output()
    }
}

/// Number of data bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataBits {
    /// 5 data bits.
    Five,
    /// 6 data bits.
    Six,
    /// 7 data bits, the FX default.
    Seven,
    /// 8 data bits.
    Eight,
}

/// Parity checking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parity {
    /// No parity bit.
    None,
    /// Odd parity.
    Odd,
    /// Even parity, the FX default.
    Even,
}

/// Number of stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopBits {
    /// One stop bit, the FX default.
    One,
    /// Two stop bits.
    Two,
}

/// Serial line settings.
///
/// Defaults match the factory settings of the FX computer link:
/// 9600 baud, 7 data bits, even parity, 1 stop bit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SerialConfig {
    /// Device path or name of the port (`/dev/ttyUSB0`, `COM5`, ...).
    pub port_name: String,
    /// Line speed in baud.
    pub baud_rate: u32,
    /// Data bits per character.
    pub data_bits: DataBits,
    /// Parity mode.
    pub parity: Parity,
    /// Stop bits per character.
    pub stop_bits: StopBits,
    /// Time allowed for a complete response to arrive.
    pub timeout: Duration,
}

impl SerialConfig {
    /// Creates a configuration with the FX default line settings.
    ///
    /// # Example
    ///
    /// ```
    /// use fx_link::SerialConfig;
    /// use std::time::Duration;
    ///
    /// let config = SerialConfig::new("COM5");
    /// assert_eq!(config.baud_rate, 9600);
    /// assert_eq!(config.timeout, Duration::from_secs(1));
    /// ```
    pub fn new(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DataBits::Seven,
            parity: Parity::Even,
            stop_bits: StopBits::One,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the line speed.
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Sets the number of data bits.
    pub fn with_data_bits(mut self, data_bits: DataBits) -> Self {
        self.data_bits = data_bits;
        self
    }

    /// Sets the parity mode.
    pub fn with_parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    /// Sets the number of stop bits.
    pub fn with_stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    /// Sets the response timeout.
    ///
    /// # Example
    ///
    /// ```
    /// use fx_link::SerialConfig;
    /// use std::time::Duration;
    ///
    /// let config = SerialConfig::new("COM5").with_timeout(Duration::from_millis(250));
    /// assert_eq!(config.timeout, Duration::from_millis(250));
    /// ```
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(feature = "serial")]
impl From<DataBits> for serialport::DataBits {
    fn from(bits: DataBits) -> Self {
        match bits {
            DataBits::Five => serialport::DataBits::Five,
            DataBits::Six => serialport::DataBits::Six,
            DataBits::Seven => serialport::DataBits::Seven,
            DataBits::Eight => serialport::DataBits::Eight,
        }
    }
}

#[cfg(feature = "serial")]
impl From<Parity> for serialport::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => serialport::Parity::None,
            Parity::Odd => serialport::Parity::Odd,
            Parity::Even => serialport::Parity::Even,
        }
    }
}

#[cfg(feature = "serial")]
impl From<StopBits> for serialport::StopBits {
    fn from(bits: StopBits) -> Self {
        match bits {
            StopBits::One => serialport::StopBits::One,
            StopBits::Two => serialport::StopBits::Two,
        }
    }
}

/// Serial port transport.
///
/// The port is opened by [`open`](Transport::open), not on construction, so
/// a transport can be created before the adapter is plugged in.
///
/// # Example
///
/// ```no_run
/// use fx_link::{SerialConfig, SerialTransport, Transport};
///
/// let mut transport = SerialTransport::new(SerialConfig::new("/dev/ttyUSB0"));
/// transport.open().unwrap();
/// assert!(transport.is_connected());
/// ```
#[cfg(feature = "serial")]
pub struct SerialTransport {
    config: SerialConfig,
    port: Option<Box<dyn serialport::SerialPort>>,
}

#[cfg(feature = "serial")]
impl SerialTransport {
    /// Creates a closed transport with the given line settings.
    pub fn new(config: SerialConfig) -> Self {
        Self { config, port: None }
    }

    /// Returns the line settings.
    pub fn config(&self) -> &SerialConfig {
        &self.config
    }

    fn port(&mut self) -> io::Result<&mut (dyn serialport::SerialPort + 'static)> {
        self.port.as_deref_mut().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotConnected,
                format!("serial port {} is not open", self.config.port_name),
            )
        })
    }
}

#[cfg(feature = "serial")]
impl Transport for SerialTransport {
    fn open(&mut self) -> io::Result<()> {
        let port = serialport::new(self.config.port_name.as_str(), self.config.baud_rate)
            .data_bits(self.config.data_bits.into())
            .parity(self.config.parity.into())
            .stop_bits(self.config.stop_bits.into())
            .timeout(self.config.timeout)
            .open()?;
        self.port = Some(port);
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        // Dropping the handle releases the device
        self.port = None;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }

    fn available_bytes(&mut self) -> io::Result<usize> {
        let pending = self.port()?.bytes_to_read()?;
        Ok(pending as usize)
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let port = self.port()?;
        port.write_all(data)?;
        port.flush()?;
        Ok(data.len())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let deadline = Instant::now() + self.config.timeout;
        let port = self.port()?;
        let mut filled = 0;

        while filled < buf.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            port.set_timeout(remaining)?;
            match port.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    fn flush_input(&mut self) -> io::Result<()> {
        self.port()?.clear(serialport::ClearBuffer::Input)?;
        Ok(())
    }

    fn flush_output(&mut self) -> io::Result<()> {
        self.port()?.clear(serialport::ClearBuffer::Output)?;
        Ok(())
    }
}

#[cfg(feature = "serial")]
impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("config", &self.config)
            .field("open", &self.port.is_some())
            .finish()
    }
}

/// In-memory transport that records written frames and replays canned responses.
#[cfg(test)]
pub(crate) mod scripted {
    use std::collections::VecDeque;
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::Transport;

    /// Shared state of a [`ScriptedTransport`], inspected by tests after the
    /// transport has been moved into a client.
    #[derive(Debug, Default)]
    pub(crate) struct Script {
        pub(crate) connected: bool,
        pub(crate) responses: VecDeque<Vec<u8>>,
        pub(crate) written: Vec<Vec<u8>>,
        pub(crate) events: Vec<&'static str>,
        pub(crate) fail_flush: bool,
        pub(crate) fail_write: bool,
        pub(crate) short_write: bool,
        pub(crate) read_error: Option<io::ErrorKind>,
    }

    #[derive(Debug, Clone, Default)]
    pub(crate) struct ScriptedTransport {
        script: Arc<Mutex<Script>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        /// Queues the bytes returned by the next read.
        pub(crate) fn respond(&self, bytes: &[u8]) -> &Self {
            self.script().responses.push_back(bytes.to_vec());
            self
        }

        pub(crate) fn script(&self) -> std::sync::MutexGuard<'_, Script> {
            self.script.lock().unwrap()
        }

        pub(crate) fn written(&self) -> Vec<Vec<u8>> {
            self.script().written.clone()
        }
    }

    impl Transport for ScriptedTransport {
        fn open(&mut self) -> io::Result<()> {
            self.script().connected = true;
            Ok(())
        }

        fn close(&mut self) -> io::Result<()> {
            self.script().connected = false;
            Ok(())
        }

        fn is_connected(&self) -> bool {
            self.script().connected
        }

        fn available_bytes(&mut self) -> io::Result<usize> {
            Ok(self.script().responses.front().map_or(0, Vec::len))
        }

        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            let mut script = self.script();
            script.events.push("write");
            if script.fail_write {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "line down"));
            }
            script.written.push(data.to_vec());
            Ok(if script.short_write { data.len() / 2 } else { data.len() })
        }

        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let mut script = self.script();
            script.events.push("read");
            if let Some(kind) = script.read_error {
                return Err(io::Error::new(kind, "read failed"));
            }
            let Some(response) = script.responses.pop_front() else {
                return Ok(0);
            };
            let n = response.len().min(buf.len());
            buf[..n].copy_from_slice(&response[..n]);
            Ok(n)
        }

        fn flush_input(&mut self) -> io::Result<()> {
            let mut script = self.script();
            script.events.push("flush_input");
            if script.fail_flush {
                return Err(io::Error::other("flush failed"));
            }
            Ok(())
        }

        fn flush_output(&mut self) -> io::Result<()> {
            self.script().events.push("flush_output");
            Ok(())
        }
    }
}
