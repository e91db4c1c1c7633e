use super::layout::{self, output as map};
use super::{Button, Channel, Feedback, Field};
use crate::error::{Error, Result};

/// Lightbar colour and blink timing. Durations run 0-255, where 255 is
/// roughly 2.5 seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Indicator {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub blink_on: u8,
    pub blink_off: u8,
}

/// Override state sent to the board on every transaction.
///
/// Host owned: values persist across transactions until changed. An override
/// value only takes effect while its enable flag is set; clearing the flag
/// hands the channel back to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPacket {
    bytes: [u8; map::LEN],
}

impl Default for OutputPacket {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPacket {
    pub const LEN: usize = map::LEN;

    pub fn new() -> Self {
        Self {
            bytes: [0u8; map::LEN],
        }
    }

    pub fn from_bytes(bytes: [u8; map::LEN]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; map::LEN] {
        &self.bytes
    }

    pub fn to_bytes(&self) -> [u8; map::LEN] {
        self.bytes
    }

    fn get(&self, field: Field) -> u32 {
        field.read(&self.bytes)
    }

    fn set(&mut self, field: Field, value: u32) {
        field.write(&mut self.bytes, value)
    }

    pub fn feedback_override(&self, feedback: Feedback) -> bool {
        map::FEEDBACK_OVERRIDE[feedback as usize].read_bool(&self.bytes)
    }

    pub fn set_feedback_override(&mut self, feedback: Feedback, enabled: bool) {
        map::FEEDBACK_OVERRIDE[feedback as usize].write_bool(&mut self.bytes, enabled)
    }

    pub fn channel_override(&self, channel: Channel) -> bool {
        map::CHANNEL_OVERRIDE[channel as usize].read_bool(&self.bytes)
    }

    pub fn set_channel_override(&mut self, channel: Channel, enabled: bool) {
        map::CHANNEL_OVERRIDE[channel as usize].write_bool(&mut self.bytes, enabled)
    }

    pub fn button_override(&self, button: Button) -> bool {
        map::BUTTON_OVERRIDE[button as usize].read_bool(&self.bytes)
    }

    pub fn set_button_override(&mut self, button: Button, enabled: bool) {
        map::BUTTON_OVERRIDE[button as usize].write_bool(&mut self.bytes, enabled)
    }

    pub fn led_red(&self) -> u8 {
        self.get(map::LED_RED) as u8
    }

    pub fn set_led_red(&mut self, value: u8) {
        self.set(map::LED_RED, value.into())
    }

    pub fn led_green(&self) -> u8 {
        self.get(map::LED_GREEN) as u8
    }

    pub fn set_led_green(&mut self, value: u8) {
        self.set(map::LED_GREEN, value.into())
    }

    pub fn led_blue(&self) -> u8 {
        self.get(map::LED_BLUE) as u8
    }

    pub fn set_led_blue(&mut self, value: u8) {
        self.set(map::LED_BLUE, value.into())
    }

    pub fn led_blink_on(&self) -> u8 {
        self.get(map::LED_BLINK_ON) as u8
    }

    pub fn set_led_blink_on(&mut self, value: u8) {
        self.set(map::LED_BLINK_ON, value.into())
    }

    pub fn led_blink_off(&self) -> u8 {
        self.get(map::LED_BLINK_OFF) as u8
    }

    pub fn set_led_blink_off(&mut self, value: u8) {
        self.set(map::LED_BLINK_OFF, value.into())
    }

    pub fn rumble_low(&self) -> u8 {
        self.get(map::RUMBLE_LOW) as u8
    }

    pub fn set_rumble_low(&mut self, value: u8) {
        self.set(map::RUMBLE_LOW, value.into())
    }

    pub fn rumble_high(&self) -> u8 {
        self.get(map::RUMBLE_HIGH) as u8
    }

    pub fn set_rumble_high(&mut self, value: u8) {
        self.set(map::RUMBLE_HIGH, value.into())
    }

    /// Pulse width in microseconds driven on `channel` while overridden.
    pub fn pulse_width(&self, channel: Channel) -> u16 {
        self.get(layout::pulse_width(map::PULSE_WIDTH_BASE, channel as usize)) as u16
    }

    pub fn set_pulse_width(&mut self, channel: Channel, micros: u16) {
        self.set(
            layout::pulse_width(map::PULSE_WIDTH_BASE, channel as usize),
            micros.into(),
        )
    }

    /// State forced on `button` while overridden.
    pub fn button_state(&self, button: Button) -> bool {
        layout::button_state(map::BUTTON_STATE_BASE, button as usize).read_bool(&self.bytes)
    }

    pub fn set_button_state(&mut self, button: Button, pressed: bool) {
        layout::button_state(map::BUTTON_STATE_BASE, button as usize)
            .write_bool(&mut self.bytes, pressed)
    }

    /// Sets the LED fields only. Nothing reaches the board until the next
    /// transaction, and the LED override flag is left as it is.
    pub fn set_indicator(&mut self, red: u8, green: u8, blue: u8, blink_on: u8, blink_off: u8) {
        self.set_led_red(red);
        self.set_led_green(green);
        self.set_led_blue(blue);
        self.set_led_blink_on(blink_on);
        self.set_led_blink_off(blink_off);
    }

    pub fn indicator(&self) -> Indicator {
        Indicator {
            red: self.led_red(),
            green: self.led_green(),
            blue: self.led_blue(),
            blink_on: self.led_blink_on(),
            blink_off: self.led_blink_off(),
        }
    }

    pub fn override_channel(&mut self, channel: Channel, micros: u16) {
        self.set_pulse_width(channel, micros);
        self.set_channel_override(channel, true);
    }

    pub fn override_button(&mut self, button: Button, pressed: bool) {
        self.set_button_state(button, pressed);
        self.set_button_override(button, true);
    }

    /// Clears every enable flag so the controller drives all outputs again.
    /// Override values are kept.
    pub fn release_all(&mut self) {
        for feedback in Feedback::ALL {
            self.set_feedback_override(feedback, false);
        }
        for channel in Channel::ALL {
            self.set_channel_override(channel, false);
        }
        for button in Button::ALL {
            self.set_button_override(button, false);
        }
    }

    /// True when any enable flag is set.
    pub fn is_overriding(&self) -> bool {
        Feedback::ALL.iter().any(|f| self.feedback_override(*f))
            || Channel::ALL.iter().any(|c| self.channel_override(*c))
            || Button::ALL.iter().any(|b| self.button_override(*b))
    }
}

impl TryFrom<&[u8]> for OutputPacket {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; map::LEN] = bytes.try_into().map_err(|_| Error::Length {
            expected: map::LEN,
            actual: bytes.len(),
        })?;
        Ok(Self::from_bytes(bytes))
    }
}

impl AsRef<[u8]> for OutputPacket {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
