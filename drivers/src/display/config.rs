//! Driver configuration

use super::render::RenderStrategy;

/// I2C address of an HT16K33 with no address jumpers bridged
pub const DEFAULT_ADDRESS: u8 = 0x70;
/// Highest offset selectable through the A0-A2 jumpers
pub const MAX_ADDRESS_OFFSET: u8 = 0x07;

/// Settings fixed for the lifetime of a driver instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// 7-bit bus address of the controller
    pub address: u8,
    /// How numbers are turned into glyphs
    pub strategy: RenderStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub const fn new() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            strategy: RenderStrategy::FixedPoint,
        }
    }

    pub const fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Selects the address from the backpack's jumper setting
    ///
    /// Offsets above 7 cannot be wired and are clamped.
    pub const fn with_address_offset(mut self, offset: u8) -> Self {
        let offset = if offset > MAX_ADDRESS_OFFSET {
            MAX_ADDRESS_OFFSET
        } else {
            offset
        };
        self.address = DEFAULT_ADDRESS + offset;
        self
    }

    pub const fn with_strategy(mut self, strategy: RenderStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_base_address_and_fixed_point() {
        let config = Config::default();
        assert_eq!(config.address, 0x70);
        assert_eq!(config.strategy, RenderStrategy::FixedPoint);
    }

    #[test]
    fn jumper_offset_is_added_to_base_address() {
        assert_eq!(Config::new().with_address_offset(3).address, 0x73);
        assert_eq!(Config::new().with_address_offset(12).address, 0x77);
    }

    #[test]
    fn builders_compose() {
        let config = Config::new()
            .with_address(0x71)
            .with_strategy(RenderStrategy::Formatted);
        assert_eq!(config.address, 0x71);
        assert_eq!(config.strategy, RenderStrategy::Formatted);
    }
}
