//! Error types returned by boot-time configuration and initialisation.

use core::fmt;

/// A malformed boot command line option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The key is not recognised.
    UnknownKey,
    /// The option has no `=value` part.
    MissingValue,
    /// The value does not parse for this key.
    InvalidValue,
    /// The command line is not valid UTF-8.
    NotUtf8,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::UnknownKey => "unknown option",
            Self::MissingValue => "missing value",
            Self::InvalidValue => "invalid value",
            Self::NotUtf8 => "command line is not UTF-8",
        };
        f.write_str(msg)
    }
}

/// A device did not reach the expected state in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// The PS/2 status register still had these bits set after the last poll.
    Ps2Timeout(u8),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ps2Timeout(status) => write!(f, "PS/2 controller stuck, status {:#04x}", status),
        }
    }
}

/// Result of one boot step.
pub type BootResult = Result<(), BootError>;

/// Fatal boot failures. Each one ends in a kernel panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootError {
    /// The IDT storage was already handed out.
    TableAlreadyClaimed,
    /// A vector was about to be raised with no present gate.
    VectorNotPresent(u8),
}

impl fmt::Display for BootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TableAlreadyClaimed => f.write_str("IDT storage already claimed"),
            Self::VectorNotPresent(v) => write!(f, "vector {:#04x} has no present gate", v),
        }
    }
}
