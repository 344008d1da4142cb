//! Error types for the ledger and the sensor link.

use crate::money::Money;
use thiserror::Error;

/// Errors raised by [`crate::ledger::Ledger`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Amounts below zero are never recorded.
    #[error("negative amount rejected: {0}")]
    NegativeAmount(Money),
}

/// Errors raised by a [`crate::hardware::SensorLink`].
#[derive(Error, Debug)]
pub enum HardwareError {
    /// No device attached.
    #[error("Hardware not connected")]
    NotConnected,

    /// A line arrived but a field could not be parsed.
    #[error("malformed sensor line: {0}")]
    Malformed(String),

    /// I/O error while talking to the device.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
