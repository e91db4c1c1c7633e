//! Fixed-width text renderings for diagnostics.

pub fn hex_u8(byte: u8) -> String {
    format!("{:02X}", byte)
}

pub fn hex_u16(value: u16) -> String {
    format!("{:04X}", value)
}

pub fn dec_u8(byte: u8) -> String {
    format!("{:03}", byte)
}

pub fn dec_u16(value: u16) -> String {
    format!("{:05}", value)
}

/// Most significant bit first.
pub fn bin_u8(byte: u8) -> String {
    format!("{:08b}", byte)
}

/// Space separated hex, sixteen bytes per line.
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .chunks(16)
        .map(|line| line.iter().map(|b| hex_u8(*b)).collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_widths() {
        assert_eq!(hex_u8(0x0A), "0A");
        assert_eq!(hex_u16(0x00FF), "00FF");
        assert_eq!(dec_u8(7), "007");
        assert_eq!(dec_u16(42), "00042");
        assert_eq!(dec_u16(u16::MAX), "65535");
        assert_eq!(bin_u8(0b1010), "00001010");
    }

    #[test]
    fn test_hex_dump_lines() {
        let bytes: Vec<u8> = (0..18).collect();
        let dump = hex_dump(&bytes);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("00 01 02"));
        assert_eq!(lines[1], "10 11");
    }
}
