//! FX computer-link client.
//!
//! This module provides the [`Client`] struct, the primary interface for
//! talking to a Mitsubishi FX PLC over its computer link.
//!
//! # Overview
//!
//! The client handles:
//! - Address validation and resolution before anything is sent
//! - Command construction and serialization
//! - Response validation (framing, checksum, ACK/NAK)
//! - Type conversion helpers (f32, i32, u32)
//!
//! # Example
//!
//! ```no_run
//! use fx_link::{Client, RegisterKind, SerialConfig};
//!
//! let client = Client::serial(SerialConfig::new("/dev/ttyUSB0"));
//! client.open()?;
//!
//! // Read D20 and D21
//! let words = client.read_words(RegisterKind::Data, 20, 2)?;
//!
//! // Write D30
//! client.write_words(RegisterKind::Data, 30, &[1234])?;
//!
//! // Read Y0-Y7 and force M500 on
//! let outputs = client.read_bits(RegisterKind::OutputContact, 0, 8)?;
//! client.force_bit(RegisterKind::MemoryContact, 500, true)?;
//!
//! // Typed values across a register pair
//! let setpoint: f32 = client.read_f32(RegisterKind::Data, 100)?;
//! client.write_f32(RegisterKind::Data, 100, setpoint + 0.5)?;
//! # Ok::<(), fx_link::FxError>(())
//! ```
//!
//! # Thread Safety
//!
//! One lock per client serializes every operation for the whole
//! transmit-and-receive exchange, so a `Client` can be shared between
//! threads. The link is half duplex: concurrent callers simply queue.

use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace, warn};

use crate::address::{resolve, resolve_forced, ResolvedAddress};
use crate::command::{ExpectedResponse, ForceBitCommand, ReadCommand, WriteCommand};
use crate::error::{FxError, Result};
use crate::numeric;
use crate::register::{RegisterKind, UnitClass};
use crate::response::{check_ack, ReadResponse};
use crate::transport::Transport;

#[cfg(feature = "serial")]
use crate::transport::{SerialConfig, SerialTransport};

/// Largest frame exchanged with the PLC: a 64-byte write request.
const FRAME_CAPACITY: usize = 140;

/// Transport plus the frame buffers reused by every exchange.
struct Link<T> {
    transport: T,
    tx: Vec<u8>,
    rx: Vec<u8>,
}

impl<T: Transport> Link<T> {
    /// Sends the frame in `tx` and waits for a response of the expected length.
    fn exchange(&mut self, expected: ExpectedResponse) -> Result<&[u8]> {
        self.transport.flush_input().map_err(|e| {
            warn!(error = %e, "failed to flush input buffer");
            FxError::transmit_failure(format!("flush input: {}", e))
        })?;

        trace!(tx = %hex::encode_upper(&self.tx), "sending frame");
        let written = self.transport.write(&self.tx).map_err(|e| {
            warn!(error = %e, "failed to write frame");
            FxError::transmit_failure(format!("write: {}", e))
        })?;
        if written != self.tx.len() {
            warn!(written, frame_len = self.tx.len(), "short write");
            return Err(FxError::transmit_failure(format!(
                "wrote {} of {} bytes",
                written,
                self.tx.len()
            )));
        }

        let expected_len = expected.len();
        self.rx.clear();
        self.rx.resize(expected_len, 0);
        let received = match self.transport.read(&mut self.rx) {
            Ok(n) => n,
            Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => 0,
            Err(e) => return Err(FxError::Io(e)),
        };
        if received < expected_len {
            warn!(expected = expected_len, received, "response timed out");
            return Err(FxError::Timeout {
                expected: expected_len,
                received,
            });
        }

        trace!(rx = %hex::encode_upper(&self.rx), "received frame");
        Ok(&self.rx)
    }
}

/// FX computer-link client.
///
/// Each operation produces exactly one request and one response.
/// No automatic retries, caching, or reconnection.
///
/// Addressing, data-type, alignment and length errors are returned before
/// the transport is touched.
///
/// # Example
///
/// ```no_run
/// use fx_link::{Client, RegisterKind, SerialConfig};
///
/// let client = Client::serial(SerialConfig::new("COM5").with_baud_rate(38400));
/// client.open().unwrap();
///
/// // Read 10 registers from D100
/// let data = client.read_words(RegisterKind::Data, 100, 10).unwrap();
///
/// // Read the 32-bit counter C200
/// let count = client.read_dwords(RegisterKind::Counter32, 200, 1).unwrap();
/// ```
pub struct Client<T: Transport> {
    inner: Mutex<Link<T>>,
}

#[cfg(feature = "serial")]
impl Client<SerialTransport> {
    /// Creates a client over a serial port. The port is opened by [`Client::open`].
    pub fn serial(config: SerialConfig) -> Self {
        Self::new(SerialTransport::new(config))
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client over the given transport.
    pub fn new(transport: T) -> Self {
        Self {
            inner: Mutex::new(Link {
                transport,
                tx: Vec::with_capacity(FRAME_CAPACITY),
                rx: Vec::with_capacity(FRAME_CAPACITY),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Link<T>> {
        // Buffers are cleared before every exchange
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens the underlying transport.
    ///
    /// # Errors
    ///
    /// Returns [`FxError::Io`] if the transport cannot be opened.
    pub fn open(&self) -> Result<()> {
        self.lock().transport.open()?;
        debug!("link opened");
        Ok(())
    }

    /// Closes the underlying transport.
    pub fn close(&self) -> Result<()> {
        self.lock().transport.close()?;
        debug!("link closed");
        Ok(())
    }

    /// Returns whether the underlying transport is open.
    pub fn is_connected(&self) -> bool {
        self.lock().transport.is_connected()
    }

    /// Consumes the client and returns the transport.
    pub fn into_transport(self) -> T {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .transport
    }

    fn read_data(&self, resolved: &ResolvedAddress) -> Result<Vec<u8>> {
        let command = ReadCommand::for_address(resolved)?;

        let mut link = self.lock();
        link.tx.clear();
        command.encode_into(&mut link.tx);
        let frame = link.exchange(command.expected_response())?;
        let response = ReadResponse::from_bytes(frame, usize::from(command.byte_count()))?;

        debug!(
            device_address = command.device_address(),
            bytes = command.byte_count(),
            "read complete"
        );
        Ok(response.into_data())
    }

    fn send_acknowledged(&self, encode: impl FnOnce(&mut Vec<u8>)) -> Result<()> {
        let mut link = self.lock();
        link.tx.clear();
        encode(&mut link.tx);
        let frame = link.exchange(ExpectedResponse::Ack)?;
        check_ack(frame[0])?;

        debug!("command acknowledged");
        Ok(())
    }

    /// Reads consecutive bit devices.
    ///
    /// # Arguments
    ///
    /// * `kind` - Bit register kind (S, X, Y, T, C, M)
    /// * `address` - User address of the first device (octal for X and Y)
    /// * `count` - Number of devices to read
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `count` is 0 (`InvalidParameter`)
    /// - `kind` is a word kind (`IncorrectDataType`)
    /// - The address or length is invalid for the kind
    /// - Communication fails or the response is invalid
    ///
    /// # Example
    ///
    /// ```no_run
    /// use fx_link::{Client, RegisterKind, SerialConfig};
    ///
    /// let client = Client::serial(SerialConfig::new("COM5"));
    /// client.open().unwrap();
    ///
    /// // Y10 and Y11
    /// let outputs = client.read_bits(RegisterKind::OutputContact, 10, 2).unwrap();
    /// ```
    pub fn read_bits(&self, kind: RegisterKind, address: u16, count: u16) -> Result<Vec<bool>> {
        debug!(%kind, address, count, "read_bits");
        if count == 0 {
            return Err(FxError::invalid_parameter("count", "must be greater than 0"));
        }
        if !kind.is_bit() {
            return Err(FxError::IncorrectDataType {
                kind,
                operation: "read_bits",
            });
        }

        let resolved = resolve(kind, address, count)?;
        let data = self.read_data(&resolved)?;
        Ok(numeric::unpack_bits(
            &data,
            usize::from(resolved.bit_offset()),
            usize::from(count),
        ))
    }

    /// Writes consecutive bit devices.
    ///
    /// The first device must sit on bit 0 of its byte (`M0`, `M8`, `Y10`, ...)
    /// and the number of values must be a multiple of 8. Each frame carries
    /// whole bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `values` is empty (`InvalidParameter`)
    /// - `kind` is a word kind (`IncorrectDataType`)
    /// - `values.len()` is not a multiple of 8 (`InvalidParameter`)
    /// - The address or length is invalid for the kind
    /// - The first device is not byte aligned (`AddressMisaligned`)
    /// - Communication fails or the PLC answers NAK
    pub fn write_bits(&self, kind: RegisterKind, address: u16, values: &[bool]) -> Result<()> {
        debug!(%kind, address, count = values.len(), "write_bits");
        if values.is_empty() {
            return Err(FxError::invalid_parameter("values", "cannot be empty"));
        }
        if !kind.is_bit() {
            return Err(FxError::IncorrectDataType {
                kind,
                operation: "write_bits",
            });
        }
        if values.len() % 8 != 0 {
            return Err(FxError::invalid_parameter(
                "values",
                format!("length {} is not a multiple of 8", values.len()),
            ));
        }

        let count = u16::try_from(values.len()).unwrap_or(u16::MAX);
        let resolved = resolve(kind, address, count)?;
        if resolved.bit_offset() != 0 {
            return Err(FxError::AddressMisaligned {
                kind,
                address,
                bit: resolved.bit_offset(),
            });
        }

        let command = WriteCommand::new(resolved.device_address, &numeric::pack_bits(values))?;
        self.send_acknowledged(|tx| command.encode_into(tx))
    }

    /// Forces a single bit device ON or OFF.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `kind` is a word kind (`IncorrectDataType`)
    /// - The address is invalid for the kind
    /// - Communication fails or the PLC answers NAK
    ///
    /// # Example
    ///
    /// ```no_run
    /// use fx_link::{Client, RegisterKind, SerialConfig};
    ///
    /// let client = Client::serial(SerialConfig::new("COM5"));
    /// client.open().unwrap();
    ///
    /// client.force_bit(RegisterKind::MemoryContact, 500, true).unwrap();
    /// ```
    pub fn force_bit(&self, kind: RegisterKind, address: u16, value: bool) -> Result<()> {
        debug!(%kind, address, value, "force_bit");
        let forced = resolve_forced(kind, address)?;
        let command = ForceBitCommand::for_address(&forced, value);
        self.send_acknowledged(|tx| command.encode_into(tx))
    }

    fn require_class(kind: RegisterKind, class: UnitClass, operation: &'static str) -> Result<()> {
        if kind.class() != class {
            return Err(FxError::IncorrectDataType { kind, operation });
        }
        Ok(())
    }

    /// Reads consecutive 16-bit registers.
    ///
    /// Valid for timer and counter current values (`T`, `C0`-`C199`) and data
    /// registers (`D`, `D8000`-`D8255`).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `count` is 0 (`InvalidParameter`)
    /// - `kind` is not a 16-bit register kind (`IncorrectDataType`)
    /// - The address or length is invalid for the kind
    /// - Communication fails or the response is invalid
    pub fn read_words(&self, kind: RegisterKind, address: u16, count: u16) -> Result<Vec<u16>> {
        debug!(%kind, address, count, "read_words");
        if count == 0 {
            return Err(FxError::invalid_parameter("count", "must be greater than 0"));
        }
        Self::require_class(kind, UnitClass::Word16, "read_words")?;

        let resolved = resolve(kind, address, count)?;
        let data = self.read_data(&resolved)?;
        Ok(numeric::bytes_to_words(&data))
    }

    /// Reads consecutive 32-bit counter values (`C200`-`C255`).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `count` is 0 (`InvalidParameter`)
    /// - `kind` is not [`RegisterKind::Counter32`] (`IncorrectDataType`)
    /// - The address or length is invalid
    /// - Communication fails or the response is invalid
    pub fn read_dwords(&self, kind: RegisterKind, address: u16, count: u16) -> Result<Vec<u32>> {
        debug!(%kind, address, count, "read_dwords");
        if count == 0 {
            return Err(FxError::invalid_parameter("count", "must be greater than 0"));
        }
        Self::require_class(kind, UnitClass::Word32, "read_dwords")?;

        let resolved = resolve(kind, address, count)?;
        let data = self.read_data(&resolved)?;
        Ok(numeric::bytes_to_dwords(&data))
    }

    /// Writes consecutive 16-bit registers.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `values` is empty (`InvalidParameter`)
    /// - `kind` is not a 16-bit register kind (`IncorrectDataType`)
    /// - The address or length is invalid for the kind
    /// - Communication fails or the PLC answers NAK
    ///
    /// # Example
    ///
    /// ```no_run
    /// use fx_link::{Client, RegisterKind, SerialConfig};
    ///
    /// let client = Client::serial(SerialConfig::new("COM5"));
    /// client.open().unwrap();
    ///
    /// client.write_words(RegisterKind::Data, 20, &[1000, 2000]).unwrap();
    /// ```
    pub fn write_words(&self, kind: RegisterKind, address: u16, values: &[u16]) -> Result<()> {
        debug!(%kind, address, count = values.len(), "write_words");
        if values.is_empty() {
            return Err(FxError::invalid_parameter("values", "cannot be empty"));
        }
        Self::require_class(kind, UnitClass::Word16, "write_words")?;

        let count = u16::try_from(values.len()).unwrap_or(u16::MAX);
        let resolved = resolve(kind, address, count)?;
        let command = WriteCommand::new(resolved.device_address, &numeric::words_to_bytes(values))?;
        self.send_acknowledged(|tx| command.encode_into(tx))
    }

    /// Reads an f32 (REAL) value from 2 consecutive 16-bit registers.
    ///
    /// # Errors
    ///
    /// Returns an error if `kind` is not a 16-bit register kind, the address
    /// is invalid, or communication fails.
    pub fn read_f32(&self, kind: RegisterKind, address: u16) -> Result<f32> {
        let words = self.read_words(kind, address, 2)?;
        numeric::parse_f32(&words, 0)
    }

    /// Writes an f32 (REAL) value to 2 consecutive 16-bit registers.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use fx_link::{Client, RegisterKind, SerialConfig};
    ///
    /// let client = Client::serial(SerialConfig::new("COM5"));
    /// client.open().unwrap();
    ///
    /// client.write_f32(RegisterKind::Data, 100, 3.14159).unwrap();
    /// ```
    pub fn write_f32(&self, kind: RegisterKind, address: u16, value: f32) -> Result<()> {
        let mut words = [0u16; 2];
        numeric::encode_f32(&mut words, 0, value)?;
        self.write_words(kind, address, &words)
    }

    /// Reads an i32 (DINT) value from 2 consecutive 16-bit registers.
    pub fn read_i32(&self, kind: RegisterKind, address: u16) -> Result<i32> {
        let words = self.read_words(kind, address, 2)?;
        numeric::parse_i32(&words, 0)
    }

    /// Writes an i32 (DINT) value to 2 consecutive 16-bit registers.
    pub fn write_i32(&self, kind: RegisterKind, address: u16, value: i32) -> Result<()> {
        let mut words = [0u16; 2];
        numeric::encode_i32(&mut words, 0, value)?;
        self.write_words(kind, address, &words)
    }

    /// Reads a u32 value from 2 consecutive 16-bit registers.
    ///
    /// Use [`read_dwords`](Self::read_dwords) for the 32-bit counters.
    pub fn read_u32(&self, kind: RegisterKind, address: u16) -> Result<u32> {
        let words = self.read_words(kind, address, 2)?;
        numeric::parse_u32(&words, 0)
    }

    /// Writes a u32 value to 2 consecutive 16-bit registers.
    pub fn write_u32(&self, kind: RegisterKind, address: u16, value: u32) -> Result<()> {
        let mut words = [0u16; 2];
        numeric::encode_u32(&mut words, 0, value)?;
        self.write_words(kind, address, &words)
    }
}

impl<T: Transport> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let connected = self
            .inner
            .try_lock()
            .ok()
            .map(|link| link.transport.is_connected());
        f.debug_struct("Client")
            .field("connected", &connected)
            .finish()
    }
}
