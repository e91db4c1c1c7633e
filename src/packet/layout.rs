//! Byte and bit offsets of every named field. Tables indexed by
//! [`Button`](super::Button), [`Channel`](super::Channel) or
//! [`Feedback`](super::Feedback) follow the declaration order of those enums.

use super::Field;

const fn flag(offset: usize, bit: u8) -> Field {
    Field::flag(offset, bit)
}

/// Host to board.
pub mod output {
    use super::{flag, Field};

    pub const LEN: usize = 39;

    pub const FEEDBACK_OVERRIDE: [Field; 3] = [flag(0, 0), flag(0, 1), flag(0, 2)];

    pub const LED_RED: Field = Field::byte(1);
    pub const LED_GREEN: Field = Field::byte(2);
    pub const LED_BLUE: Field = Field::byte(3);
    pub const LED_BLINK_ON: Field = Field::byte(4);
    pub const LED_BLINK_OFF: Field = Field::byte(5);
    pub const RUMBLE_LOW: Field = Field::byte(6);
    pub const RUMBLE_HIGH: Field = Field::byte(7);

    pub const CHANNEL_OVERRIDE: [Field; 12] = [
        flag(8, 0),
        flag(8, 1),
        flag(8, 2),
        flag(8, 3),
        flag(8, 4),
        flag(8, 5),
        flag(8, 6),
        flag(8, 7),
        flag(9, 0),
        flag(9, 1),
        flag(9, 2),
        flag(9, 3),
    ];

    pub const BUTTON_OVERRIDE: [Field; 18] = [
        flag(9, 4),
        flag(9, 5),
        flag(9, 6),
        flag(9, 7),
        flag(10, 0),
        flag(10, 1),
        flag(10, 2),
        flag(10, 3),
        flag(10, 4),
        flag(10, 5),
        flag(10, 6),
        flag(10, 7),
        flag(11, 0),
        flag(11, 1),
        flag(11, 2),
        flag(11, 3),
        flag(11, 4),
        flag(11, 5),
    ];

    /// First of the twelve pulse-width words.
    pub const PULSE_WIDTH_BASE: usize = 12;

    /// First byte of the target button states.
    pub const BUTTON_STATE_BASE: usize = 36;
}

/// Board to host.
pub mod input {
    use super::{flag, Field};

    pub const LEN: usize = 96;

    pub const REPORT_ID: Field = Field::byte(8);
    pub const L_STICK_X: Field = Field::byte(9);
    pub const L_STICK_Y: Field = Field::byte(10);
    pub const R_STICK_X: Field = Field::byte(11);
    pub const R_STICK_Y: Field = Field::byte(12);

    /// Raw d-pad nibble in bits 0..=3 of byte 13.
    pub const DPAD_CODE: Field = Field::new(13, 0, 4);

    pub const BUTTON: [Field; 18] = [
        flag(13, 0), // up
        flag(13, 1), // right
        flag(13, 2), // down
        flag(13, 3), // left
        flag(13, 7), // triangle
        flag(13, 6), // circle
        flag(13, 5), // cross
        flag(13, 4), // square
        flag(14, 0),
        flag(14, 1),
        flag(14, 2),
        flag(14, 3),
        flag(14, 6), // l3
        flag(14, 7), // r3
        flag(14, 4), // share
        flag(14, 5), // options
        flag(15, 1), // touchpad
        flag(15, 0), // ps
    ];

    pub const COUNTER: Field = Field::new(15, 2, 6);
    pub const L_TRIGGER: Field = Field::byte(16);
    pub const R_TRIGGER: Field = Field::byte(17);

    pub const GYRO_X: Field = Field::word(21);
    pub const GYRO_Y: Field = Field::word(23);
    pub const GYRO_Z: Field = Field::word(25);
    pub const ACCEL_X: Field = Field::word(27);
    pub const ACCEL_Y: Field = Field::word(29);
    pub const ACCEL_Z: Field = Field::word(31);

    pub const BATTERY: Field = Field::new(38, 0, 4);
    pub const USB: Field = flag(38, 4);

    pub const TOUCHPAD_PACKETS: Field = Field::byte(41);

    pub const TOUCHPAD_RECORDS: usize = 3;
    pub const FINGERS: usize = 2;
    pub const TOUCHPAD_BASE: usize = 42;
    pub const TOUCHPAD_LEN: usize = 9;
    pub const FINGER_LEN: usize = 4;

    pub const fn touchpad_counter(record: usize) -> Field {
        Field::byte(TOUCHPAD_BASE + record * TOUCHPAD_LEN)
    }

    const fn finger_base(record: usize, finger: usize) -> usize {
        TOUCHPAD_BASE + record * TOUCHPAD_LEN + 1 + finger * FINGER_LEN
    }

    pub const fn touch_id(record: usize, finger: usize) -> Field {
        Field::new(finger_base(record, finger), 0, 7)
    }

    pub const fn no_contact(record: usize, finger: usize) -> Field {
        flag(finger_base(record, finger), 7)
    }

    pub const fn finger_x(record: usize, finger: usize) -> Field {
        Field::new(finger_base(record, finger) + 1, 0, 12)
    }

    pub const fn finger_y(record: usize, finger: usize) -> Field {
        Field::new(finger_base(record, finger) + 2, 4, 12)
    }

    /// First of the twelve echoed pulse-width words.
    pub const ECHO_PULSE_WIDTH_BASE: usize = 69;

    /// First byte of the echoed button states.
    pub const ECHO_BUTTON_BASE: usize = 93;
}

/// Word at `base + 2 * index`.
pub const fn pulse_width(base: usize, index: usize) -> Field {
    Field::word(base + 2 * index)
}

/// Continuous bit stream starting at bit 0 of `base`.
pub const fn button_state(base: usize, index: usize) -> Field {
    flag(base + index / 8, (index % 8) as u8)
}
