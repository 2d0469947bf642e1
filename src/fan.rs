//! The fan-speed command toggled by the dongle's button.

use core::fmt;
use heapless::String;

/// The two speeds the fan command alternates between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FanLevel {
    Low,
    High,
}

impl FanLevel {
    pub const fn speed(self) -> u8 {
        match self {
            FanLevel::Low => 10,
            FanLevel::High => 35,
        }
    }

    /// The speed as the decimal text published on the wire.
    pub fn as_text(self) -> String<3> {
        let mut text = String::new();
        // A u8 always fits in three digits.
        let _ = fmt::Write::write_fmt(&mut text, format_args!("{}", self.speed()));
        text
    }
}

impl fmt::Display for FanLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.speed())
    }
}

/// Click-toggled command state. Starts low; the caller publishes every change.
pub struct FanCommand {
    level: FanLevel,
}

impl FanCommand {
    pub const fn new() -> Self {
        FanCommand {
            level: FanLevel::Low,
        }
    }

    pub fn level(&self) -> FanLevel {
        self.level
    }

    /// Switches to the other level and returns it.
    pub fn toggle(&mut self) -> FanLevel {
        self.level = match self.level {
            FanLevel::Low => FanLevel::High,
            FanLevel::High => FanLevel::Low,
        };
        self.level
    }
}

impl Default for FanCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_the_low_level() {
        assert_eq!(FanCommand::new().level().speed(), 10);
    }

    #[test]
    fn clicks_alternate_strictly_between_the_two_levels() {
        let mut command = FanCommand::new();
        assert_eq!(command.toggle().speed(), 35);
        assert_eq!(command.toggle().speed(), 10);
        assert_eq!(command.toggle().speed(), 35);
    }

    #[test]
    fn formats_the_published_payload_as_decimal_text() {
        assert_eq!(FanLevel::Low.as_text().as_str(), "10");
        assert_eq!(FanLevel::High.as_text().as_str(), "35");
    }
}
