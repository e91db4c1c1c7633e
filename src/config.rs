use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::packet::Indicator;

/// The board must not be polled faster than 100 Hz.
pub const MIN_POLL_INTERVAL_MS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub spi: SpiConfig,
    pub polling: PollingConfig,
    /// Lightbar colour forced at start-up; `None` leaves the LED to the
    /// controller.
    #[serde(default)]
    pub indicator: Option<IndicatorConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpiConfig {
    pub device: String,
    pub speed_hz: u32,
    pub mode: u8,
    /// GPIO number of the select line, driven low for each transaction.
    pub select_pin: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    pub interval_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    #[serde(default)]
    pub blink_on: u8,
    #[serde(default)]
    pub blink_off: u8,
}

impl From<IndicatorConfig> for Indicator {
    fn from(c: IndicatorConfig) -> Self {
        Indicator {
            red: c.red,
            green: c.green,
            blue: c.blue,
            blink_on: c.blink_on,
            blink_off: c.blink_off,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spi: SpiConfig {
                device: "/dev/spidev0.0".to_string(),
                // Arduino SPI_CLOCK_DIV16 on a 16 MHz part
                speed_hz: 1_000_000,
                mode: 0,
                select_pin: 8,
            },
            polling: PollingConfig { interval_ms: 10 },
            indicator: None,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;
        let config = Self::parse(&content)?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config =
            serde_yaml::from_str(content).context("Failed to parse configuration file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.polling.interval_ms < MIN_POLL_INTERVAL_MS {
            bail!(
                "Polling interval {}ms is below the {}ms minimum",
                self.polling.interval_ms,
                MIN_POLL_INTERVAL_MS
            );
        }
        if self.spi.mode > 3 {
            bail!("Invalid SPI mode {}", self.spi.mode);
        }
        if self.spi.speed_hz == 0 {
            bail!("SPI clock must be non-zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
spi:
  device: /dev/spidev1.0
  speed_hz: 500000
  mode: 0
  select_pin: 48
polling:
  interval_ms: 20
indicator:
  red: 255
  green: 128
  blue: 0
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.spi.device, "/dev/spidev1.0");
        assert_eq!(config.spi.select_pin, 48);
        assert_eq!(config.polling.interval_ms, 20);
        let indicator: Indicator = config.indicator.unwrap().into();
        assert_eq!(
            indicator,
            Indicator {
                red: 255,
                green: 128,
                blue: 0,
                blink_on: 0,
                blink_off: 0
            }
        );
    }

    #[test]
    fn test_rejects_fast_polling() {
        let mut config = Config::default();
        config.polling.interval_ms = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_mode() {
        let mut config = Config::default();
        config.spi.mode = 4;
        assert!(config.validate().is_err());
    }
}
