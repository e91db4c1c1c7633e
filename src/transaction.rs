//! One full-duplex exchange of the output and input packets.

use log::trace;

use crate::packet::{InputPacket, OutputPacket, PADDING_BYTE};
use crate::transport::BusTransport;

/// Drives Servoshock transactions over `B`.
///
/// Blocking and unsynchronised: callers must not share one instance across
/// threads without their own locking.
#[derive(Debug)]
pub struct Servoshock<B> {
    bus: B,
}

impl<B: BusTransport> Servoshock<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn release(self) -> B {
        self.bus
    }

    /// Sends `output` while capturing a fresh `input`, then decodes the
    /// d-pad.
    ///
    /// Exactly [`InputPacket::LEN`] bytes are exchanged under one select:
    /// the output packet verbatim, then [`PADDING_BYTE`]. The capture is not
    /// validated. If a byte exchange fails the select line is still released
    /// and the transport error returned; `input` is then partially updated.
    pub fn execute(&mut self, output: &OutputPacket, input: &mut InputPacket) -> Result<(), B::Error> {
        self.bus.select()?;
        let exchanged = self.exchange(output, input);
        let released = self.bus.deselect();
        exchanged?;
        released?;

        input.decode_dpad_in_place();
        trace!(
            "Transaction complete: report_id=0x{:02X} counter={}",
            input.report_id(),
            input.counter()
        );
        Ok(())
    }

    fn exchange(&mut self, output: &OutputPacket, input: &mut InputPacket) -> Result<(), B::Error> {
        let out = output.as_bytes();
        for (i, slot) in input.bytes_mut().iter_mut().enumerate() {
            let byte = out.get(i).copied().unwrap_or(PADDING_BYTE);
            *slot = self.bus.transfer_byte(byte)?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::mock::{BusFault, Event, MockBus};
    use super::*;
    use crate::packet::{Button, Channel, Feedback};

    #[test]
    fn test_exchanges_96_bytes_with_padding() {
        let mut output = OutputPacket::new();
        output.set_indicator(1, 2, 3, 4, 5);
        output.override_channel(Channel::LStickY, 1234);
        output.set_feedback_override(Feedback::Led, true);

        let mut board = Servoshock::new(MockBus::default());
        let mut input = InputPacket::new();
        board.execute(&output, &mut input).unwrap();

        let events = &board.bus().events;
        assert_eq!(events.len(), 98);
        assert_eq!(events[0], Event::Select);
        assert_eq!(events[97], Event::Deselect);

        let sent = board.bus().sent();
        assert_eq!(sent.len(), 96);
        assert_eq!(&sent[..39], output.as_bytes());
        assert!(sent[39..].iter().all(|b| *b == 0xCD));
    }

    #[test]
    fn test_capture_lands_in_input_packet() {
        let mut raw = [0u8; 96];
        for (i, b) in raw.iter_mut().enumerate() {
            *b = i as u8;
        }
        // Keep the d-pad nibble neutral so the decode leaves byte 13 alone.
        raw[13] = 0xF8;

        let mut board = Servoshock::new(MockBus::responding(&InputPacket::from_bytes(raw)));
        let output = OutputPacket::new();
        let mut input = InputPacket::new();
        board.execute(&output, &mut input).unwrap();

        assert_eq!(input.as_bytes()[..13], raw[..13]);
        assert_eq!(input.as_bytes()[13], 0xF0);
        assert_eq!(input.as_bytes()[14..], raw[14..]);
        assert_eq!(output, OutputPacket::new());
    }

    #[test]
    fn test_diagonal_code_seven_presses_up_and_left() {
        let mut capture = InputPacket::new();
        capture.set_button(Button::DPadUp, true);
        capture.set_button(Button::DPadRight, true);
        capture.set_button(Button::DPadDown, true);
        capture.set_button(Button::DPadLeft, false);
        assert_eq!(capture.dpad_code(), 7);

        let mut board = Servoshock::new(MockBus::responding(&capture));
        let mut input = InputPacket::new();
        board.execute(&OutputPacket::new(), &mut input).unwrap();

        assert!(input.button(Button::DPadUp));
        assert!(!input.button(Button::DPadRight));
        assert!(!input.button(Button::DPadDown));
        assert!(input.button(Button::DPadLeft));
    }

    #[test]
    fn test_raw_up_and_left_bits_are_neutral() {
        let mut capture = InputPacket::new();
        capture.set_button(Button::DPadUp, true);
        capture.set_button(Button::DPadLeft, true);
        assert_eq!(capture.dpad_code(), 9);

        let mut board = Servoshock::new(MockBus::responding(&capture));
        let mut input = InputPacket::new();
        board.execute(&OutputPacket::new(), &mut input).unwrap();
        assert_eq!(input.dpad(), crate::packet::DPad::default());
    }

    #[test]
    fn test_every_code_decodes_through_engine() {
        let output = OutputPacket::new();
        for code in 0..16u8 {
            let mut capture = InputPacket::new();
            capture.set_dpad_code(code).unwrap();
            capture.set_button(Button::Cross, true);

            let mut board = Servoshock::new(MockBus::responding(&capture));
            let mut input = InputPacket::new();
            board.execute(&output, &mut input).unwrap();
            assert_eq!(input.dpad(), crate::packet::decode_dpad(code), "code {}", code);
            assert!(input.button(Button::Cross));
        }
    }

    #[test]
    fn test_input_is_fully_overwritten() {
        let mut board = Servoshock::new(MockBus::responding(&InputPacket::new()));
        let mut input = InputPacket::from_bytes([0xAA; 96]);
        board.execute(&OutputPacket::new(), &mut input).unwrap();
        // Zero nibble is code 0, which decodes to up.
        let mut expected = [0u8; 96];
        expected[13] = 0b0001;
        assert_eq!(input.as_bytes(), &expected);
    }

    #[test]
    fn test_failed_exchange_still_deselects() {
        let mut bus = MockBus::default();
        bus.fail_at = Some(50);
        let mut board = Servoshock::new(bus);
        let mut input = InputPacket::new();
        assert_eq!(board.execute(&OutputPacket::new(), &mut input), Err(BusFault));

        let events = &board.bus().events;
        assert_eq!(events.first(), Some(&Event::Select));
        assert_eq!(events.last(), Some(&Event::Deselect));
        assert_eq!(board.bus().sent().len(), 50);
    }
}
