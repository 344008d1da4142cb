// 🔌 Hardware Layer - sensor link abstraction
//
// A link yields raw comma-separated lines; `reading` turns them into typed
// sensor readings priced from the category table.

pub mod reading;
pub mod simulator;

pub use reading::{HardwareReading, SensorReading};
pub use simulator::Simulator;

use crate::error::HardwareError;

/// Anything that can deliver sensor lines and accept robot commands.
pub trait SensorLink: Send + Sync {
    /// True only when a physical device is attached.
    fn is_connected(&self) -> bool;

    /// Synthetic links mark their readings as simulated.
    fn is_simulated(&self) -> bool {
        false
    }

    /// Read one raw line, without the trailing newline.
    fn read_line(&self) -> Result<String, HardwareError>;

    fn send_command(&self, command: &str) -> Result<(), HardwareError>;
}

/// Read and parse one reading from `link`.
pub fn read_reading(link: &dyn SensorLink) -> Result<HardwareReading, HardwareError> {
    let line = link.read_line()?;
    let reading = SensorReading::parse(line.trim())?;
    Ok(HardwareReading::new(reading, link.is_simulated()))
}

/// A link with no device behind it. Every operation fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct Disconnected;

impl SensorLink for Disconnected {
    fn is_connected(&self) -> bool {
        false
    }

    fn read_line(&self) -> Result<String, HardwareError> {
        Err(HardwareError::NotConnected)
    }

    fn send_command(&self, _command: &str) -> Result<(), HardwareError> {
        Err(HardwareError::NotConnected)
    }
}
