//! Result and Error types for the pickle module

/// Type alias for `Result<T, pickle::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `voxtools-pickle`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    /// The stream ended before an opcode or its argument was complete
    #[error("pickle stream truncated at byte {offset}")]
    Truncated { offset: usize },

    /// Opcode not understood by the unpickler
    #[error("unsupported pickle opcode 0x{opcode:02x} at byte {offset}")]
    UnknownOpcode { opcode: u8, offset: usize },

    /// Protocol newer than the unpickler understands
    #[error("unsupported pickle protocol {0}")]
    UnsupportedProtocol(u8),

    /// Protocol 5 buffers passed outside of the pickle stream
    #[error("out-of-band pickle buffers are not supported")]
    OutOfBandBuffer,

    /// An opcode needed more values than the stack holds
    #[error("pickle stack exhausted at byte {offset}")]
    StackUnderflow { offset: usize },

    /// An opcode found the wrong kind of value on the stack
    #[error("unexpected {found} on the pickle stack at byte {offset}")]
    UnexpectedValue { found: String, offset: usize },

    /// A memo lookup for a key that was never stored
    #[error("pickle memo has no entry {0}")]
    MissingMemo(usize),

    /// Integers wider than 64 bits
    #[error("integer at byte {offset} does not fit in 64 bits")]
    IntegerTooLarge { offset: usize },

    /// Text protocol literal that does not parse
    #[error("invalid pickle literal \"{text}\" at byte {offset}")]
    InvalidLiteral { text: String, offset: usize },

    /// Text opcode with invalid UTF-8 content
    #[error("invalid utf-8 in pickle string")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// The pickled object was not a numpy array
    #[error("pickled object is not a numpy array ({0})")]
    NotAnArray(String),

    /// Element types with no numeric representation here
    #[error("unsupported array element type \"{0}\"")]
    UnsupportedDtype(String),

    /// Array metadata that does not describe a valid array
    #[error("invalid array shape ({0})")]
    InvalidShape(String),

    /// Data buffer length not matching the shape and element size
    #[error("unexpected byte length (expected {expected:?}, found {found:?})")]
    UnexpectedByteLength { expected: usize, found: usize },
}
