use thiserror::Error;

use crate::metadata::token::Token;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Decode and resolve failures inside a method body are *recorded* on the
/// [`crate::disassembler::InstructionList`] (diagnostics plus the invalid flag) rather than
/// propagated, so a caller always receives a list. The variants below surface through public
/// entry points: precondition violations, signature decoding, and the primitive readers.
///
/// # Error Categories
///
/// ## Buffer Parsing Errors
/// - [`Error::Malformed`] - Structurally invalid bytecode or signature data
/// - [`Error::OutOfBounds`] - Attempted to read beyond the buffer boundaries
/// - [`Error::Empty`] - Empty input provided where a method body was expected
///
/// ## Instruction Stream Errors
/// - [`Error::UnknownOpCode`] - Numeric code not present in the opcode catalog
/// - [`Error::UnresolvableToken`] - The metadata resolver answered "not found"
///
/// ## Signature Errors
/// - [`Error::UnsupportedSignature`] - Calling-convention sub-kind outside the seven
///   supported shapes; raised to the caller, never swallowed
#[derive(Error, Debug)]
pub enum Error {
    /// The data is damaged and could not be parsed.
    ///
    /// This error indicates that the byte stream does not conform to the expected
    /// ECMA-335 encoding. The error includes the source location where the
    /// malformation was detected for debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the buffer.
    ///
    /// This error occurs when trying to read data beyond the end of the method body
    /// or signature blob. It's a safety check to prevent buffer overruns during parsing.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// Provided input was empty.
    ///
    /// This error occurs when an empty buffer is provided where an actual method
    /// body was expected.
    #[error("Provided input was empty")]
    Empty,

    /// Encountered a numeric instruction code that is not part of the opcode catalog.
    ///
    /// Decoding aborts at this point; the instructions decoded so far are retained
    /// on the list for diagnostic use, and the list is marked invalid.
    #[error("Unknown opcode - 0x{0:04X}")]
    UnknownOpCode(u16),

    /// The metadata resolver could not map a token to an entity.
    ///
    /// Recorded per instruction during the resolve pass; the instruction's resolved
    /// value stays unset and resolution continues for the remaining instructions.
    ///
    /// The associated [`Token`] identifies the reference that failed.
    #[error("Failed to resolve metadata token - {0}")]
    UnresolvableToken(Token),

    /// A signature blob uses a calling-convention sub-kind this library does not support.
    ///
    /// The associated value is the offending convention-kind bits. Callers must treat
    /// indirect-call sites with unsupported conventions as an explicit failure.
    #[error("Unsupported calling convention in signature - 0x{0:02X}")]
    UnsupportedSignature(u8),
}
