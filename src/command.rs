// Licensed under the Apache-2.0 license

//! Scoreboard command protocol: one byte per command.

/// Command byte that blanks the display.
pub const COMMAND_OFF: u8 = 0xFF;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Show a decimal digit, 0 through 9.
    Digit(u8),
    /// Explicit blanking request.
    Off,
    /// Any other byte; rendered blank.
    Unknown(u8),
}

impl From<u8> for Command {
    fn from(byte: u8) -> Self {
        match byte {
            0..=9 => Command::Digit(byte),
            COMMAND_OFF => Command::Off,
            other => Command::Unknown(other),
        }
    }
}

impl Command {
    #[must_use]
    pub const fn digit(self) -> Option<u8> {
        match self {
            Command::Digit(d) => Some(d),
            Command::Off | Command::Unknown(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_bytes() {
        assert_eq!(Command::from(0), Command::Digit(0));
        assert_eq!(Command::from(9), Command::Digit(9));
        assert_eq!(Command::from(0xFF), Command::Off);
        assert_eq!(Command::from(10), Command::Unknown(10));
        assert_eq!(Command::from(0x30), Command::Unknown(0x30));
    }

    #[test]
    fn test_digit_accessor() {
        assert_eq!(Command::Digit(4).digit(), Some(4));
        assert_eq!(Command::Off.digit(), None);
        assert_eq!(Command::Unknown(42).digit(), None);
    }
}
