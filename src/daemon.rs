use anyhow::{Context, Result};
use log::{info, trace};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::Config;
use crate::dump::{bin_u8, dec_u16, dec_u8, hex_dump, hex_u16, hex_u8};
use crate::packet::layout::input::ECHO_BUTTON_BASE;
use crate::packet::{Button, Channel, Feedback, InputPacket, OutputPacket};
use crate::transaction::Servoshock;
use crate::transport::BusTransport;

/// Polls one board and reports what changed between captures.
pub struct Daemon<B> {
    board: Servoshock<B>,
    config: Config,
    output: OutputPacket,
    input: InputPacket,
    previous: Option<InputPacket>,
    transactions: u64,
}

impl<B> Daemon<B>
where
    B: BusTransport,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    pub fn new(config: Config, bus: B) -> Self {
        info!("SPI device: {}", config.spi.device);
        info!("Polling interval: {}ms", config.polling.interval_ms);

        let mut daemon = Daemon {
            board: Servoshock::new(bus),
            config,
            output: OutputPacket::new(),
            input: InputPacket::new(),
            previous: None,
            transactions: 0,
        };
        daemon.apply_indicator();
        daemon
    }

    fn apply_indicator(&mut self) {
        match self.config.indicator {
            Some(indicator) => {
                self.output.set_indicator(
                    indicator.red,
                    indicator.green,
                    indicator.blue,
                    indicator.blink_on,
                    indicator.blink_off,
                );
                self.output.set_feedback_override(Feedback::Led, true);
                info!("Lightbar override: {:?}", self.output.indicator());
            }
            None => self.output.set_feedback_override(Feedback::Led, false),
        }
    }

    pub fn output(&self) -> &OutputPacket {
        &self.output
    }

    /// Override state sent on the next transaction.
    pub fn output_mut(&mut self) -> &mut OutputPacket {
        &mut self.output
    }

    pub fn input(&self) -> &InputPacket {
        &self.input
    }

    pub fn transactions(&self) -> u64 {
        self.transactions
    }

    /// Runs one transaction and returns the buttons whose live state changed
    /// since the previous capture.
    pub fn transact(&mut self) -> Result<Vec<(Button, bool)>> {
        self.board
            .execute(&self.output, &mut self.input)
            .context("SPI transaction failed")?;
        self.transactions += 1;
        trace!("Input packet:\n{}", hex_dump(self.input.as_bytes()));
        trace!("Controller: {}", describe_controller(&self.input));
        trace!("Board outputs: {}", describe_echo(&self.input));

        let changes = changed_buttons(self.previous.as_ref(), &self.input);
        for (button, pressed) in &changes {
            info!(
                "Button {:?}: {}",
                button,
                if *pressed { "pressed" } else { "released" }
            );
        }
        if let Some(previous) = &self.previous {
            if previous.battery() != self.input.battery()
                || previous.usb_connected() != self.input.usb_connected()
            {
                info!(
                    "Battery level {} usb={}",
                    self.input.battery(),
                    self.input.usb_connected()
                );
            }
        }
        self.previous = Some(self.input.clone());
        Ok(changes)
    }

    pub async fn poll(&mut self) -> Result<()> {
        self.transact()?;

        // Sleep for the configured polling interval
        sleep(Duration::from_millis(self.config.polling.interval_ms)).await;

        Ok(())
    }

    pub fn reload_config(&mut self, new_config: Config) -> Result<()> {
        new_config.validate()?;
        self.config = new_config;
        self.apply_indicator();
        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Hands every output back to the controller with one last transaction.
    pub fn shutdown(&mut self) -> Result<()> {
        self.output.release_all();
        self.transact()?;
        info!(
            "Released all overrides after {} transactions",
            self.transactions
        );
        Ok(())
    }

    pub fn into_bus(self) -> B {
        self.board.release()
    }
}

fn describe_controller(input: &InputPacket) -> String {
    let motion = input
        .gyro()
        .iter()
        .chain(input.accel().iter())
        .map(|v| hex_u16(*v as u16))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "report={} sticks={},{},{},{} triggers={},{} imu={}",
        hex_u8(input.report_id()),
        dec_u8(input.l_stick_x()),
        dec_u8(input.l_stick_y()),
        dec_u8(input.r_stick_x()),
        dec_u8(input.r_stick_y()),
        dec_u8(input.l_trigger()),
        dec_u8(input.r_trigger()),
        motion
    )
}

/// Echoed pulse widths in microseconds, then the three echoed button bytes.
fn describe_echo(input: &InputPacket) -> String {
    let widths = Channel::ALL
        .iter()
        .map(|c| format!("{:?}={}", c, dec_u16(input.echo_pulse_width(*c))))
        .collect::<Vec<_>>()
        .join(" ");
    let buttons = input.as_bytes()[ECHO_BUTTON_BASE..]
        .iter()
        .map(|b| bin_u8(*b))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{} buttons={}", widths, buttons)
}

/// With no previous capture every pressed button counts as changed.
fn changed_buttons(previous: Option<&InputPacket>, current: &InputPacket) -> Vec<(Button, bool)> {
    Button::ALL
        .iter()
        .filter_map(|b| {
            let now = current.button(*b);
            let before = previous.map_or(false, |p| p.button(*b));
            (now != before).then_some((*b, now))
        })
        .collect()
}
