// Licensed under the Apache-2.0 license

use crate::address::IIC_BASE_ADDRESS;
use crate::heartbeat::HeartbeatConfig;
use crate::i2c::common::AddressMode;

/// Receive ring size used by the scoreboard firmware.
pub const RX_BUFFER_SIZE: usize = 16;

pub struct ScoreboardConfig {
    pub base_address: u8,
    pub address_mode: AddressMode,
    pub heartbeat: Option<HeartbeatConfig>,
}

pub struct ScoreboardConfigBuilder {
    base_address: u8,
    address_mode: AddressMode,
    heartbeat: Option<HeartbeatConfig>,
}

impl Default for ScoreboardConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreboardConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_address: IIC_BASE_ADDRESS,
            address_mode: AddressMode::SevenBit,
            heartbeat: Some(HeartbeatConfig::default()),
        }
    }
    #[must_use]
    pub fn base_address(mut self, address: u8) -> Self {
        self.base_address = address;
        self
    }
    #[must_use]
    pub fn address_mode(mut self, mode: AddressMode) -> Self {
        self.address_mode = mode;
        self
    }
    #[must_use]
    pub fn heartbeat(mut self, config: HeartbeatConfig) -> Self {
        self.heartbeat = Some(config);
        self
    }
    #[must_use]
    pub fn without_heartbeat(mut self) -> Self {
        self.heartbeat = None;
        self
    }
    #[must_use]
    pub fn build(self) -> ScoreboardConfig {
        ScoreboardConfig {
            base_address: self.base_address,
            address_mode: self.address_mode,
            heartbeat: self.heartbeat,
        }
    }
}
