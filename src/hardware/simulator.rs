// 🧪 Hardware Simulator - synthetic sensor lines for development

use super::SensorLink;
use crate::error::HardwareError;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

const BASE_LATITUDE: f64 = -25.7479;
const BASE_LONGITUDE: f64 = 28.2293;

const DELIVERY_STATES: [&str; 3] = ["in_transit", "delivered", "pending"];
const ACTIVITY_LEVELS: [&str; 3] = ["normal", "resting", "active"];

/// Commands kept for inspection; older ones are dropped first.
pub const COMMAND_HISTORY: usize = 32;

/// Generates plausible readings in the same line format real hardware sends.
///
/// Reports itself as not connected, since no device is attached. Commands are
/// accepted; the last [`COMMAND_HISTORY`] of them are kept for inspection.
#[derive(Debug, Default)]
pub struct Simulator {
    commands: Mutex<VecDeque<String>>,
}

impl Simulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently accepted commands, oldest first.
    pub fn sent_commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    fn generate_line<R: Rng>(rng: &mut R) -> String {
        let latitude = BASE_LATITUDE + rng.gen_range(-0.1..0.1);
        let longitude = BASE_LONGITUDE + rng.gen_range(-0.1..0.1);

        match rng.gen_range(0..4) {
            0 => format!(
                "SOIL,{:.2},{:.2}",
                rng.gen_range(20.0..80.0),
                rng.gen_range(15.0..35.0)
            ),
            1 => format!(
                "GPS,{:.6},{:.6},CATTLE-{}",
                latitude,
                longitude,
                rng.gen_range(1000..=9999)
            ),
            2 => format!(
                "DELIVER,PKG-{},{},{:.4};{:.4}",
                rng.gen_range(10000..=99999),
                DELIVERY_STATES.choose(rng).unwrap_or(&"in_transit"),
                latitude,
                longitude
            ),
            _ => format!(
                "LIVESTOCK,CATTLE-{},{},{:.1},{}",
                rng.gen_range(1000..=9999),
                rng.gen_range(60..=120),
                rng.gen_range(37.5..40.0),
                ACTIVITY_LEVELS.choose(rng).unwrap_or(&"normal")
            ),
        }
    }
}

impl SensorLink for Simulator {
    fn is_connected(&self) -> bool {
        false
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn read_line(&self) -> Result<String, HardwareError> {
        Ok(Self::generate_line(&mut rand::thread_rng()))
    }

    fn send_command(&self, command: &str) -> Result<(), HardwareError> {
        tracing::info!(command, "simulated robot command");
        let mut commands = self.commands.lock().unwrap_or_else(PoisonError::into_inner);
        if commands.len() == COMMAND_HISTORY {
            commands.pop_front();
        }
        commands.push_back(command.to_string());
        Ok(())
    }
}
