//! Error types for the FX computer-link protocol.

use std::io;
use thiserror::Error;

use crate::register::RegisterKind;

/// Result type alias for FX operations.
pub type Result<T> = std::result::Result<T, FxError>;

/// Errors that can occur during FX communication.
///
/// Addressing, data-type, alignment and length errors are detected before
/// anything is written to the link. Transport and protocol errors are
/// reported after the attempt; the client never retries on its own.
#[derive(Debug, Error)]
pub enum FxError {
    /// The last digit of the address exceeds the number base of the register kind
    /// (for example `Y8` on the octal-numbered I/O points).
    #[error("Incorrect address format: {kind}{address} (digit exceeds base {number_base})")]
    IncorrectAddressFormat {
        /// Register kind being addressed.
        kind: RegisterKind,
        /// User-facing address.
        address: u16,
        /// Number base of the register kind (8 or 10).
        number_base: u8,
    },

    /// The address lies outside the range configured for the register kind.
    #[error("Address out of range: {kind}{address} (valid range {min}-{max})")]
    AddressOutOfRange {
        /// Register kind being addressed.
        kind: RegisterKind,
        /// User-facing address.
        address: u16,
        /// Lowest valid user address.
        min: u16,
        /// Highest valid user address.
        max: u16,
    },

    /// The operation cannot be used with the given register kind.
    #[error("Incorrect data type: {kind} does not support {operation}")]
    IncorrectDataType {
        /// Register kind passed to the operation.
        kind: RegisterKind,
        /// Name of the rejected operation.
        operation: &'static str,
    },

    /// The request would transfer more bytes than a single frame can carry.
    #[error("Too many bytes: request needs {byte_count} bytes, limit is {limit}")]
    TooManyBytes {
        /// Resolved byte count of the request.
        byte_count: u32,
        /// Maximum byte count per frame.
        limit: u16,
    },

    /// A bit write does not start on a byte boundary.
    #[error("Address misaligned: {kind}{address} is bit {bit} of its byte, bit writes must start at bit 0")]
    AddressMisaligned {
        /// Register kind being written.
        kind: RegisterKind,
        /// User-facing start address.
        address: u16,
        /// Bit position of the start address inside its byte.
        bit: u8,
    },

    /// Flushing or writing to the transport failed.
    #[error("Transmit failure: {reason}")]
    TransmitFailure {
        /// Description of the failure.
        reason: String,
    },

    /// The response was not fully received before the timeout expired.
    #[error("Communication timeout: expected {expected} bytes, received {received}")]
    Timeout {
        /// Number of response bytes expected.
        expected: usize,
        /// Number of response bytes actually received.
        received: usize,
    },

    /// The checksum carried by a response does not match its contents.
    #[error("Checksum mismatch: computed {computed}, received {received}")]
    ChecksumMismatch {
        /// Checksum digits computed over the received frame.
        computed: String,
        /// Checksum digits carried by the frame.
        received: String,
    },

    /// The PLC answered a write or force command with something other than ACK.
    #[error("Not acknowledged: received 0x{received:02X}")]
    NotAcknowledged {
        /// Byte received instead of ACK (usually NAK, 0x15).
        received: u8,
    },

    /// The response frame is structurally invalid.
    #[error("Malformed response: {reason}")]
    MalformedResponse {
        /// Description of the problem.
        reason: String,
    },

    /// Invalid parameter provided.
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter.
        parameter: String,
        /// Description of why the parameter is invalid.
        reason: String,
    },

    /// I/O error while waiting for a response.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl FxError {
    /// Creates a new `InvalidParameter` error.
    ///
    /// # Example
    ///
    /// ```
    /// use fx_link::FxError;
    ///
    /// let err = FxError::invalid_parameter("count", "must be greater than 0");
    /// ```
    pub fn invalid_parameter(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new `MalformedResponse` error.
    ///
    /// # Example
    ///
    /// ```
    /// use fx_link::FxError;
    ///
    /// let err = FxError::malformed_response("missing STX");
    /// ```
    pub fn malformed_response(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Creates a new `TransmitFailure` error.
    pub fn transmit_failure(reason: impl Into<String>) -> Self {
        Self::TransmitFailure {
            reason: reason.into(),
        }
    }

    /// Creates a new `ChecksumMismatch` error from the two checksum digit pairs.
    pub fn checksum_mismatch(computed: [u8; 2], received: [u8; 2]) -> Self {
        Self::ChecksumMismatch {
            computed: String::from_utf8_lossy(&computed).into_owned(),
            received: String::from_utf8_lossy(&received).into_owned(),
        }
    }

    /// Returns the flat result code for this error.
    ///
    /// # Example
    ///
    /// ```
    /// use fx_link::{FxError, ResultCode};
    ///
    /// let err = FxError::NotAcknowledged { received: 0x15 };
    /// assert_eq!(err.code(), ResultCode::NotAcknowledged);
    /// ```
    pub fn code(&self) -> ResultCode {
        match self {
            FxError::IncorrectAddressFormat { .. } => ResultCode::IncorrectAddressFormat,
            FxError::AddressOutOfRange { .. } => ResultCode::AddressOutOfRange,
            FxError::IncorrectDataType { .. } => ResultCode::IncorrectDataType,
            FxError::TooManyBytes { .. } => ResultCode::TooManyBytes,
            FxError::AddressMisaligned { .. } => ResultCode::AddressMisaligned,
            FxError::TransmitFailure { .. } => ResultCode::TransmitFailure,
            FxError::Timeout { .. } => ResultCode::Timeout,
            FxError::ChecksumMismatch { .. } => ResultCode::ChecksumMismatch,
            FxError::NotAcknowledged { .. } => ResultCode::NotAcknowledged,
            FxError::MalformedResponse { .. } => ResultCode::MalformedResponse,
            FxError::InvalidParameter { .. } => ResultCode::InvalidParameter,
            FxError::Io(_) => ResultCode::IoError,
        }
    }

    /// Returns whether the error was raised before anything touched the link.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            FxError::IncorrectAddressFormat { .. }
                | FxError::AddressOutOfRange { .. }
                | FxError::IncorrectDataType { .. }
                | FxError::TooManyBytes { .. }
                | FxError::AddressMisaligned { .. }
                | FxError::InvalidParameter { .. }
        )
    }
}

/// Flat status code view of a transaction outcome.
///
/// Useful for callers that log or display a single status value per
/// transaction instead of matching on [`FxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    /// Transaction completed and validated.
    Success,
    /// Address digit exceeds the kind's number base.
    IncorrectAddressFormat,
    /// Address outside the kind's configured range.
    AddressOutOfRange,
    /// Operation invoked on an incompatible register kind.
    IncorrectDataType,
    /// Resolved byte count exceeds the frame limit.
    TooManyBytes,
    /// Bit write start address not on a byte boundary.
    AddressMisaligned,
    /// Transport write or buffer flush failed.
    TransmitFailure,
    /// Response not fully received within the timeout.
    Timeout,
    /// Computed checksum disagrees with the received one.
    ChecksumMismatch,
    /// Response byte was not ACK.
    NotAcknowledged,
    /// Response frame is structurally invalid.
    MalformedResponse,
    /// Invalid parameter passed to an operation.
    InvalidParameter,
    /// Transport read failed for a reason other than a timeout.
    IoError,
    /// A transaction has started but not finished. Never the outcome of a
    /// completed call.
    InProgress,
}

impl ResultCode {
    /// Returns the result code of an operation outcome.
    ///
    /// # Example
    ///
    /// ```
    /// use fx_link::{FxError, ResultCode};
    ///
    /// let ok: fx_link::Result<u16> = Ok(7);
    /// assert_eq!(ResultCode::of(&ok), ResultCode::Success);
    ///
    /// let failed: fx_link::Result<u16> = Err(FxError::Timeout { expected: 9, received: 0 });
    /// assert_eq!(ResultCode::of(&failed), ResultCode::Timeout);
    /// ```
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => ResultCode::Success,
            Err(e) => e.code(),
        }
    }

    /// Returns whether this code can be the final outcome of a transaction.
    pub fn is_final(self) -> bool {
        self != ResultCode::InProgress
    }
}

impl std::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResultCode::Success => "success",
            ResultCode::IncorrectAddressFormat => "incorrect address format",
            ResultCode::AddressOutOfRange => "address out of range",
            ResultCode::IncorrectDataType => "incorrect data type",
            ResultCode::TooManyBytes => "too many bytes",
            ResultCode::AddressMisaligned => "address misaligned",
            ResultCode::TransmitFailure => "transmit failure",
            ResultCode::Timeout => "timeout",
            ResultCode::ChecksumMismatch => "checksum mismatch",
            ResultCode::NotAcknowledged => "not acknowledged",
            ResultCode::MalformedResponse => "malformed response",
            ResultCode::InvalidParameter => "invalid parameter",
            ResultCode::IoError => "I/O error",
            ResultCode::InProgress => "in progress",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incorrect_address_format_display() {
        let err = FxError::IncorrectAddressFormat {
            kind: RegisterKind::OutputContact,
            address: 18,
            number_base: 8,
        };
        assert_eq!(
            err.to_string(),
            "Incorrect address format: Y18 (digit exceeds base 8)"
        );
    }

    #[test]
    fn test_out_of_range_display() {
        let err = FxError::AddressOutOfRange {
            kind: RegisterKind::Data,
            address: 600,
            min: 0,
            max: 511,
        };
        assert_eq!(
            err.to_string(),
            "Address out of range: D600 (valid range 0-511)"
        );
    }

    #[test]
    fn test_checksum_mismatch_display() {
        let err = FxError::checksum_mismatch(*b"5A", *b"5B");
        assert_eq!(err.to_string(), "Checksum mismatch: computed 5A, received 5B");
    }

    #[test]
    fn test_not_acknowledged_display() {
        let err = FxError::NotAcknowledged { received: 0x15 };
        assert_eq!(err.to_string(), "Not acknowledged: received 0x15");
    }

    #[test]
    fn test_codes() {
        assert_eq!(
            FxError::Timeout {
                expected: 9,
                received: 3
            }
            .code(),
            ResultCode::Timeout
        );
        assert_eq!(
            FxError::transmit_failure("short write").code(),
            ResultCode::TransmitFailure
        );
        assert_eq!(
            FxError::from(io::Error::new(io::ErrorKind::BrokenPipe, "gone")).code(),
            ResultCode::IoError
        );
    }

    #[test]
    fn test_request_errors() {
        assert!(FxError::TooManyBytes {
            byte_count: 65,
            limit: 64
        }
        .is_request_error());
        assert!(!FxError::NotAcknowledged { received: 0x15 }.is_request_error());
    }

    #[test]
    fn test_in_progress_is_not_final() {
        assert!(!ResultCode::InProgress.is_final());
        assert!(ResultCode::Success.is_final());
        assert!(ResultCode::ChecksumMismatch.is_final());
    }
}
