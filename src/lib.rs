//! # FX Computer-Link Protocol Library
//!
//! A Rust library for talking to Mitsubishi FX PLCs over the computer-link
//! serial protocol: ASCII-hex framed requests with an additive checksum,
//! answered by a data frame or a single ACK/NAK byte.
//!
//! This is a **protocol-only** library: no polling, schedulers, or
//! application-level features. Each call produces exactly 1 request and
//! 1 response. No automatic retries, caching, or reconnection.
//!
//! ## Features
//!
//! - **Protocol-only** - address resolution, framing, checksums, validation
//! - **Deterministic** - each call produces exactly 1 request and 1 response
//! - **Type-safe** - register kinds as an enum with a static register map
//! - **No panics** - all errors returned as `Result<T, FxError>`
//! - **Transport agnostic** - serial port by default, any [`Transport`] works
//! - **Numeric helpers** - 32-bit integers, floats and bit packing in [`numeric`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use fx_link::{Client, RegisterKind, SerialConfig};
//!
//! fn main() -> fx_link::Result<()> {
//!     // FX defaults: 9600 baud, 7 data bits, even parity, 1 stop bit
//!     let client = Client::serial(SerialConfig::new("/dev/ttyUSB0"));
//!     client.open()?;
//!
//!     // Read D20 and D21
//!     let data = client.read_words(RegisterKind::Data, 20, 2)?;
//!     println!("D20-D21 = {:?}", data);
//!
//!     // Write D200
//!     client.write_words(RegisterKind::Data, 200, &[0x1234])?;
//!
//!     // Read Y10-Y17
//!     let outputs = client.read_bits(RegisterKind::OutputContact, 10, 8)?;
//!     println!("Y10-Y17 = {:?}", outputs);
//!
//!     // Force M500 on
//!     client.force_bit(RegisterKind::MemoryContact, 500, true)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Register Kinds
//!
//! | Kind | Device | Read | Write | Force |
//! |------|--------|:----:|:-----:|:-----:|
//! | [`RegisterKind::State`] | S0-S999 | bits | bits | ✓ |
//! | [`RegisterKind::InputContact`] | X0-X177 (octal) | bits | bits | ✓ |
//! | [`RegisterKind::OutputContact`] | Y0-Y177 (octal) | bits | bits | ✓ |
//! | [`RegisterKind::TimerContact`] | T0-T255 | bits | bits | ✓ |
//! | [`RegisterKind::Contact`] | C0-C255 | bits | bits | ✓ |
//! | [`RegisterKind::MemoryContact`] | M0-M1023 | bits | bits | ✓ |
//! | [`RegisterKind::MemorySpecial`] | M8000-M8255 | bits | bits | ✓ |
//! | [`RegisterKind::Counter32`] | C200-C255 | 32-bit | ✗ | ✗ |
//! | [`RegisterKind::TimerCounter16`] | T0-T255 | 16-bit | 16-bit | ✗ |
//! | [`RegisterKind::Data`] | D0-D511 | 16-bit | 16-bit | ✗ |
//! | [`RegisterKind::DataSpecial`] | D8000-D8255 | 16-bit | 16-bit | ✗ |
//! | [`RegisterKind::Counter16`] | C0-C199 | 16-bit | 16-bit | ✗ |
//!
//! A single frame carries at most [`MAX_TRANSFER_BYTES`] data bytes.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, FxError>`]. Request errors (address
//! format, range, data type, alignment, length) are returned before anything
//! is written to the link.
//!
//! ```no_run
//! use fx_link::{Client, FxError, RegisterKind, SerialConfig};
//!
//! let client = Client::serial(SerialConfig::new("COM5"));
//! client.open()?;
//!
//! match client.read_words(RegisterKind::Data, 100, 10) {
//!     Ok(data) => println!("Data: {:?}", data),
//!     Err(FxError::Timeout { expected, received }) => {
//!         println!("Timeout: {} of {} bytes", received, expected);
//!     }
//!     Err(FxError::ChecksumMismatch { computed, received }) => {
//!         println!("Bad checksum: {} != {}", computed, received);
//!     }
//!     Err(e) => println!("Error: {} ({})", e, e.code()),
//! }
//! # Ok::<(), FxError>(())
//! ```
//!
//! ## Logging
//!
//! The library logs through [`tracing`]: one `debug` event per operation,
//! raw frames at `trace`, and `warn` on checksum mismatches, NAKs and
//! timeouts. Install a subscriber in the application to see them.

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod address;
mod client;
mod codec;
mod command;
mod error;
pub mod numeric;
mod register;
mod response;
mod transport;

// Public re-exports
pub use address::{resolve, resolve_forced, ForcedAddress, ResolvedAddress, MAX_TRANSFER_BYTES};
pub use client::Client;
pub use codec::{checksum, decode_hex, encode_hex, ACK, ETX, NAK, STX};
pub use command::{ExpectedResponse, ForceBitCommand, ReadCommand, WriteCommand};
pub use error::{FxError, Result, ResultCode};
pub use register::{RegisterKind, RegisterMapEntry, UnitClass};
pub use response::{check_ack, ReadResponse};
pub use transport::{
    DataBits, Parity, SerialConfig, StopBits, Transport, DEFAULT_BAUD_RATE, DEFAULT_TIMEOUT,
};

#[cfg(feature = "serial")]
pub use transport::SerialTransport;
