//! Calendar snapshot mirrored against the device registers

/// Decimal calendar/time snapshot.
///
/// Fields hold plain decimal values, never BCD. The day of the week keeps
/// the peripheral's native 1-7 numbering; the driver attaches no meaning
/// to which day is 1. The year is the two low digits, 0-99.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Datetime {
    /// Seconds, 0-59
    pub seconds: u8,
    /// Minutes, 0-59
    pub minutes: u8,
    /// Hours, 0-23
    pub hours: u8,
    /// Day of the week, 1-7
    pub day: u8,
    /// Day of the month, 1-31
    pub date: u8,
    /// Month, 1-12
    pub month: u8,
    /// Year, 0-99
    pub year: u8,
}

impl ufmt::uDisplay for Datetime {
    /// Format a snapshot to display on a serial port,
    /// for instance 2023-12-07 21:34:56
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        if self.year < 10 {
            f.write_str("200")?;
        } else {
            f.write_str("20")?;
        }
        self.year.fmt(f)?;

        if self.month < 10 {
            f.write_str("-0")?;
        } else {
            f.write_str("-")?;
        }
        self.month.fmt(f)?;

        if self.date < 10 {
            f.write_str("-0")?;
        } else {
            f.write_str("-")?;
        }
        self.date.fmt(f)?;

        if self.hours < 10 {
            f.write_str(" 0")?;
        } else {
            f.write_str(" ")?;
        }
        self.hours.fmt(f)?;

        if self.minutes < 10 {
            f.write_str(":0")?;
        } else {
            f.write_str(":")?;
        }
        self.minutes.fmt(f)?;

        if self.seconds < 10 {
            f.write_str(":0")?;
        } else {
            f.write_str(":")?;
        }
        self.seconds.fmt(f)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Buffer(String);

    impl ufmt::uWrite for Buffer {
        type Error = core::convert::Infallible;

        fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
            self.0.push_str(s);
            Ok(())
        }
    }

    #[test]
    fn formats_with_zero_padding() {
        let datetime = Datetime {
            seconds: 6,
            minutes: 34,
            hours: 21,
            day: 4,
            date: 7,
            month: 12,
            year: 23,
        };
        let mut out = Buffer(String::new());
        ufmt::uwrite!(&mut out, "{}", datetime).unwrap();
        assert_eq!(out.0, "2023-12-07 21:34:06");
    }

    #[test]
    fn formats_single_digit_year() {
        let datetime = Datetime {
            seconds: 0,
            minutes: 0,
            hours: 0,
            day: 1,
            date: 1,
            month: 1,
            year: 9,
        };
        let mut out = Buffer(String::new());
        ufmt::uwrite!(&mut out, "{}", datetime).unwrap();
        assert_eq!(out.0, "2009-01-01 00:00:00");
    }
}
