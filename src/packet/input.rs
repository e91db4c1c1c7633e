use super::layout::{self, input as map};
use super::{Button, Channel, Field};
use crate::error::{check_index, Error, Result};

/// Independent d-pad button states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DPad {
    pub up: bool,
    pub right: bool,
    pub down: bool,
    pub left: bool,
}

/// Expands the board's 8-way compass code into four button states.
///
/// Codes 0..=7 run clockwise from up, odd codes being diagonals. Anything
/// from 8 upwards is the board's neutral position and releases all four.
pub fn decode_dpad(code: u8) -> DPad {
    DPad {
        up: matches!(code, 7 | 0 | 1),
        right: matches!(code, 1..=3),
        down: matches!(code, 3..=5),
        left: matches!(code, 5..=7),
    }
}

/// One entry of a touchpad record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Finger {
    /// 7-bit id, incremented for each new touch.
    pub touch_id: u8,
    /// Set while the finger is not touching the pad.
    pub no_contact: bool,
    /// 12-bit position.
    pub x: u16,
    pub y: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Touchpad {
    pub packet_counter: u8,
    pub fingers: [Finger; map::FINGERS],
}

/// Controller state reported by the board, followed by an echo of what the
/// board is currently driving on its outputs.
///
/// Board owned: each transaction overwrites every byte. Setters exist so
/// captures can be built by hand; they reject values wider than the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPacket {
    bytes: [u8; map::LEN],
}

impl Default for InputPacket {
    fn default() -> Self {
        Self::new()
    }
}

impl InputPacket {
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

    /// Raw view used by the transaction engine to fill in a capture.
    pub(crate) fn bytes_mut(&mut self) -> &mut [u8; map::LEN] {
        &mut self.bytes
    }

    fn get(&self, field: Field) -> u32 {
        field.read(&self.bytes)
    }

    fn set(&mut self, field: Field, value: u32) {
        field.write(&mut self.bytes, value)
    }

    fn set_checked(&mut self, name: &'static str, field: Field, value: u32) -> Result<()> {
        let value = field.checked(name, value)?;
        self.set(field, value);
        Ok(())
    }

    pub fn report_id(&self) -> u8 {
        self.get(map::REPORT_ID) as u8
    }

    pub fn set_report_id(&mut self, value: u8) {
        self.set(map::REPORT_ID, value.into())
    }

    pub fn l_stick_x(&self) -> u8 {
        self.get(map::L_STICK_X) as u8
    }

    pub fn set_l_stick_x(&mut self, value: u8) {
        self.set(map::L_STICK_X, value.into())
    }

    pub fn l_stick_y(&self) -> u8 {
        self.get(map::L_STICK_Y) as u8
    }

    pub fn set_l_stick_y(&mut self, value: u8) {
        self.set(map::L_STICK_Y, value.into())
    }

    pub fn r_stick_x(&self) -> u8 {
        self.get(map::R_STICK_X) as u8
    }

    pub fn set_r_stick_x(&mut self, value: u8) {
        self.set(map::R_STICK_X, value.into())
    }

    pub fn r_stick_y(&self) -> u8 {
        self.get(map::R_STICK_Y) as u8
    }

    pub fn set_r_stick_y(&mut self, value: u8) {
        self.set(map::R_STICK_Y, value.into())
    }

    /// Live state of `button`. The d-pad entries hold the raw nibble until a
    /// transaction has decoded it.
    pub fn button(&self, button: Button) -> bool {
        map::BUTTON[button as usize].read_bool(&self.bytes)
    }

    pub fn set_button(&mut self, button: Button, pressed: bool) {
        map::BUTTON[button as usize].write_bool(&mut self.bytes, pressed)
    }

    /// The four d-pad bits read as one 4-bit code, up being bit 0.
    pub fn dpad_code(&self) -> u8 {
        self.get(map::DPAD_CODE) as u8
    }

    pub fn set_dpad_code(&mut self, code: u8) -> Result<()> {
        self.set_checked("dpad_code", map::DPAD_CODE, code.into())
    }

    pub fn dpad(&self) -> DPad {
        DPad {
            up: self.button(Button::DPadUp),
            right: self.button(Button::DPadRight),
            down: self.button(Button::DPadDown),
            left: self.button(Button::DPadLeft),
        }
    }

    /// Replaces the raw compass code with independent button states.
    pub(crate) fn decode_dpad_in_place(&mut self) {
        let dpad = decode_dpad(self.dpad_code());
        self.set_button(Button::DPadUp, dpad.up);
        self.set_button(Button::DPadRight, dpad.right);
        self.set_button(Button::DPadDown, dpad.down);
        self.set_button(Button::DPadLeft, dpad.left);
    }

    /// 6-bit rolling report counter.
    pub fn counter(&self) -> u8 {
        self.get(map::COUNTER) as u8
    }

    pub fn set_counter(&mut self, value: u8) -> Result<()> {
        self.set_checked("counter", map::COUNTER, value.into())
    }

    pub fn l_trigger(&self) -> u8 {
        self.get(map::L_TRIGGER) as u8
    }

    pub fn set_l_trigger(&mut self, value: u8) {
        self.set(map::L_TRIGGER, value.into())
    }

    pub fn r_trigger(&self) -> u8 {
        self.get(map::R_TRIGGER) as u8
    }

    pub fn set_r_trigger(&mut self, value: u8) {
        self.set(map::R_TRIGGER, value.into())
    }

    pub fn gyro(&self) -> [i16; 3] {
        [map::GYRO_X, map::GYRO_Y, map::GYRO_Z].map(|f| self.get(f) as u16 as i16)
    }

    pub fn set_gyro(&mut self, gyro: [i16; 3]) {
        for (field, value) in [map::GYRO_X, map::GYRO_Y, map::GYRO_Z].into_iter().zip(gyro) {
            self.set(field, u32::from(value as u16));
        }
    }

    pub fn accel(&self) -> [i16; 3] {
        [map::ACCEL_X, map::ACCEL_Y, map::ACCEL_Z].map(|f| self.get(f) as u16 as i16)
    }

    pub fn set_accel(&mut self, accel: [i16; 3]) {
        for (field, value) in [map::ACCEL_X, map::ACCEL_Y, map::ACCEL_Z].into_iter().zip(accel) {
            self.set(field, u32::from(value as u16));
        }
    }

    /// 4-bit battery level.
    pub fn battery(&self) -> u8 {
        self.get(map::BATTERY) as u8
    }

    pub fn set_battery(&mut self, level: u8) -> Result<()> {
        self.set_checked("battery", map::BATTERY, level.into())
    }

    pub fn usb_connected(&self) -> bool {
        map::USB.read_bool(&self.bytes)
    }

    pub fn set_usb_connected(&mut self, connected: bool) {
        map::USB.write_bool(&mut self.bytes, connected)
    }

    pub fn touchpad_packets(&self) -> u8 {
        self.get(map::TOUCHPAD_PACKETS) as u8
    }

    pub fn set_touchpad_packets(&mut self, count: u8) {
        self.set(map::TOUCHPAD_PACKETS, count.into())
    }

    pub fn touchpad(&self, record: usize) -> Result<Touchpad> {
        check_index("touchpad record", record, map::TOUCHPAD_RECORDS)?;
        Ok(Touchpad {
            packet_counter: self.get(map::touchpad_counter(record)) as u8,
            fingers: [self.finger(record, 0)?, self.finger(record, 1)?],
        })
    }

    pub fn set_touchpad_counter(&mut self, record: usize, counter: u8) -> Result<()> {
        check_index("touchpad record", record, map::TOUCHPAD_RECORDS)?;
        self.set(map::touchpad_counter(record), counter.into());
        Ok(())
    }

    pub fn finger(&self, record: usize, finger: usize) -> Result<Finger> {
        check_index("touchpad record", record, map::TOUCHPAD_RECORDS)?;
        check_index("finger", finger, map::FINGERS)?;
        Ok(Finger {
            touch_id: self.get(map::touch_id(record, finger)) as u8,
            no_contact: map::no_contact(record, finger).read_bool(&self.bytes),
            x: self.get(map::finger_x(record, finger)) as u16,
            y: self.get(map::finger_y(record, finger)) as u16,
        })
    }

    /// Writes a whole finger entry. Nothing is written unless every
    /// component fits its field.
    pub fn set_finger(&mut self, record: usize, finger: usize, value: Finger) -> Result<()> {
        check_index("touchpad record", record, map::TOUCHPAD_RECORDS)?;
        check_index("finger", finger, map::FINGERS)?;
        let id = map::touch_id(record, finger);
        let x = map::finger_x(record, finger);
        let y = map::finger_y(record, finger);
        let touch_id = id.checked("touch_id", value.touch_id.into())?;
        let px = x.checked("x", value.x.into())?;
        let py = y.checked("y", value.y.into())?;
        self.set(id, touch_id);
        map::no_contact(record, finger).write_bool(&mut self.bytes, value.no_contact);
        self.set(x, px);
        self.set(y, py);
        Ok(())
    }

    /// Pulse width the board is currently driving on `channel`.
    pub fn echo_pulse_width(&self, channel: Channel) -> u16 {
        self.get(layout::pulse_width(map::ECHO_PULSE_WIDTH_BASE, channel as usize)) as u16
    }

    pub fn set_echo_pulse_width(&mut self, channel: Channel, micros: u16) {
        self.set(
            layout::pulse_width(map::ECHO_PULSE_WIDTH_BASE, channel as usize),
            micros.into(),
        )
    }

    /// State the board is currently driving on `button`, whatever its source.
    pub fn echo_button(&self, button: Button) -> bool {
        layout::button_state(map::ECHO_BUTTON_BASE, button as usize).read_bool(&self.bytes)
    }

    pub fn set_echo_button(&mut self, button: Button, pressed: bool) {
        layout::button_state(map::ECHO_BUTTON_BASE, button as usize)
            .write_bool(&mut self.bytes, pressed)
    }
}

impl TryFrom<&[u8]> for InputPacket {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; map::LEN] = bytes.try_into().map_err(|_| Error::Length {
            expected: map::LEN,
            actual: bytes.len(),
        })?;
        Ok(Self::from_bytes(bytes))
    }
}

impl AsRef<[u8]> for InputPacket {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
