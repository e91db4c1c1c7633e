use anyhow::{anyhow, Context, Result};
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::sysfs_gpio::Direction;
use linux_embedded_hal::{SpidevBus, SysfsPin};
use log::{error, info};
use servoshock::config::{Config, SpiConfig};
use servoshock::daemon::Daemon;
use servoshock::HalTransport;
use std::path::PathBuf;
use tokio::signal::unix::{signal, SignalKind};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    init_logger();

    // Parse command line arguments
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/etc/servoshock/config.yaml".to_string());

    info!("Servoshock controller starting...");
    info!("Loading configuration from: {}", config_path);

    let config = Config::load(&config_path)?;

    info!("Configuration loaded successfully");

    // Validate SPI device
    let spi_device_path = &config.spi.device;
    if !PathBuf::from(spi_device_path).exists() {
        error!("SPI device not found: {}", spi_device_path);
        return Err(anyhow!("SPI device not found: {}", spi_device_path));
    }

    let transport = open_transport(&config.spi)?;
    let mut daemon = Daemon::new(config, transport);

    // Setup signal handling via tokio
    let mut sigterm = signal(SignalKind::terminate()).context("Failed to setup SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to setup SIGINT handler")?;
    let mut sighup = signal(SignalKind::hangup()).context("Failed to setup SIGHUP handler")?;

    info!("Daemon started successfully");

    loop {
        tokio::select! {
            result = daemon.poll() => {
                if let Err(e) = result {
                    error!("Daemon poll error: {:#}", e);
                    return Err(e);
                }
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down gracefully");
                break;
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down gracefully");
                break;
            }
            _ = sighup.recv() => {
                info!("Received SIGHUP, reloading configuration");
                match Config::load(&config_path) {
                    Ok(new_config) => daemon.reload_config(new_config)?,
                    Err(e) => error!("Keeping previous configuration: {:#}", e),
                }
            }
        }
    }

    daemon.shutdown()?;
    info!("Servoshock controller shutdown complete");
    Ok(())
}

/// Opens the spidev bus without kernel chip select and claims the select
/// GPIO, idle high.
fn open_transport(spi: &SpiConfig) -> Result<HalTransport<SpidevBus, SysfsPin>> {
    let mut bus = SpidevBus::open(&spi.device)
        .map_err(|e| anyhow!("Failed to open SPI device {}: {:?}", spi.device, e))?;
    let mode = match spi.mode {
        0 => SpiModeFlags::SPI_MODE_0,
        1 => SpiModeFlags::SPI_MODE_1,
        2 => SpiModeFlags::SPI_MODE_2,
        _ => SpiModeFlags::SPI_MODE_3,
    };
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(spi.speed_hz)
        .lsb_first(false)
        .mode(mode | SpiModeFlags::SPI_NO_CS)
        .build();
    bus.configure(&options)
        .context(format!("Failed to configure SPI device: {}", spi.device))?;
    info!("SPI device initialized: {} at {} Hz", spi.device, spi.speed_hz);

    let select = SysfsPin::new(spi.select_pin);
    select
        .export()
        .context(format!("Failed to export select GPIO {}", spi.select_pin))?;
    select
        .set_direction(Direction::High)
        .context(format!("Failed to drive select GPIO {}", spi.select_pin))?;

    Ok(HalTransport::new(bus, select))
}

fn init_logger() {
    // Use `env_logger` for logging. Systemd/journald will capture stdout/stderr.
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();
}
