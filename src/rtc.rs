//! DS1307 RTC interface
// https://datasheets.maximintegrated.com/en/ds/DS1307.pdf

use crate::datetime::Datetime;
use embedded_hal::blocking::i2c;

/// Errors surfaced by the driver
#[derive(Debug)]
pub enum Error<CommE> {
    /// I²C bus error
    Comm(CommE),
    /// The device did not answer as expected during initialization
    /// (day-of-week register outside 1-7)
    NotPresent,
    /// RAM access outside the 0x08-0x3F scratch window
    AddressOutOfRange,
}

/// Square wave output frequency, as the RS1/RS0 control register codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquareWaveRate {
    /// 1 Hz
    OneHz = 0b00,
    /// 4.096 kHz
    FourKiloHz = 0b01,
    /// 8.192 kHz
    EightKiloHz = 0b10,
    /// 32.768 kHz
    ThirtyTwoKiloHz = 0b11,
}

struct Register;

impl Register {
    const SECONDS: u8 = 0x00;
    const MINUTES: u8 = 0x01;
    const HOURS: u8 = 0x02;
    const DAY: u8 = 0x03;
    const DATE: u8 = 0x04;
    const MONTH: u8 = 0x05;
    const YEAR: u8 = 0x06;
    const CONTROL: u8 = 0x07;
    const RAM_START: u8 = 0x08;
    const RAM_END: u8 = 0x3F;
}

struct BitFlags;

impl BitFlags {
    /// Seconds register bit 7: oscillator divider halted while set
    const CLOCK_HALT: u8 = 0b1000_0000;
    /// Hours register bit 6: 12-hour mode selected while set
    const H24_H12: u8 = 0b0100_0000;
    /// Hours register bit 5: PM while set, only meaningful in 12-hour mode
    const AM_PM: u8 = 0b0010_0000;
    /// Control register bit 4: square wave output enable
    const SQWE: u8 = 0b0001_0000;
    /// Control register bits 1-0: square wave rate select
    const RS: u8 = 0b0000_0011;
}

/// Fixed 7-bit bus address of the device
pub const DEVICE_ADDRESS: u8 = 0b110_1000;

/// Whole register file, timekeeping plus scratch RAM
const REGISTER_FILE_SIZE: usize = 0x40;

/// Driver handle: owns the bus interface and the last staged/read
/// calendar snapshot.
#[derive(Debug)]
pub struct Ds1307<I2C>
where
    I2C: i2c::Write + i2c::WriteRead,
{
    i2c: I2C,
    datetime: Datetime,
}

impl<I2C, CommE> Ds1307<I2C>
where
    I2C: i2c::Write<Error = CommE> + i2c::WriteRead<Error = CommE>,
{
    /// Create a new handle for a device on the given bus.
    ///
    /// Verifies the device answers (day-of-week register must read 1-7)
    /// and rewrites the hours register to 24-hour mode if the device was
    /// left in 12-hour mode. The snapshot starts zeroed.
    pub fn init(i2c: I2C) -> Result<Self, Error<CommE>> {
        let mut rtc = Ds1307 {
            i2c,
            datetime: Datetime::default(),
        };

        let day = rtc.read_register(Register::DAY)?;
        if !(1..=7).contains(&day) {
            return Err(Error::NotPresent);
        }
        rtc.set_24h_mode()?;
        Ok(rtc)
    }

    /// Release the bus interface.
    pub fn destroy(self) -> I2C {
        self.i2c
    }

    /// Last snapshot read from the device, or staged by the caller.
    pub fn datetime(&self) -> &Datetime {
        &self.datetime
    }

    /// Stage a snapshot to be pushed by [`write_clock`](Self::write_clock).
    pub fn set_datetime(&mut self, datetime: Datetime) {
        self.datetime = datetime;
    }

    /// Pull the seven timekeeping registers into the snapshot.
    ///
    /// The snapshot is overwritten all-or-nothing: on a bus error it is
    /// left untouched. The clock-halt flag is masked out of the seconds
    /// value, and hours are decoded as 24-hour (established by `init`).
    pub fn read_clock(&mut self) -> Result<Datetime, Error<CommE>> {
        let mut data = [0; 7];
        self.read_registers(Register::SECONDS, &mut data)?;

        self.datetime = Datetime {
            seconds: packed_bcd_to_decimal(data[Register::SECONDS as usize] & !BitFlags::CLOCK_HALT),
            minutes: packed_bcd_to_decimal(data[Register::MINUTES as usize]),
            hours: packed_bcd_to_decimal(data[Register::HOURS as usize]),
            // Small native integer 1-7, not BCD
            day: data[Register::DAY as usize],
            date: packed_bcd_to_decimal(data[Register::DATE as usize]),
            month: packed_bcd_to_decimal(data[Register::MONTH as usize]),
            year: packed_bcd_to_decimal(data[Register::YEAR as usize]),
        };
        Ok(self.datetime)
    }

    /// Push the snapshot to the seven timekeeping registers.
    ///
    /// The current clock-halt flag is read back first and carried into
    /// the written seconds byte, so setting the time never starts or
    /// stops the clock as a side effect.
    pub fn write_clock(&mut self) -> Result<(), Error<CommE>> {
        let clock_halt = self.read_register(Register::SECONDS)? & BitFlags::CLOCK_HALT;
        let payload = [
            Register::SECONDS,
            clock_halt | decimal_to_packed_bcd(self.datetime.seconds),
            decimal_to_packed_bcd(self.datetime.minutes),
            decimal_to_packed_bcd(self.datetime.hours),
            self.datetime.day,
            decimal_to_packed_bcd(self.datetime.date),
            decimal_to_packed_bcd(self.datetime.month),
            decimal_to_packed_bcd(self.datetime.year),
        ];
        self.write_data(&payload)
    }

    /// Clear the clock-halt flag, leaving the seconds digits untouched.
    pub fn start_clock(&mut self) -> Result<(), Error<CommE>> {
        let seconds = self.read_register(Register::SECONDS)?;
        self.write_register(Register::SECONDS, seconds & !BitFlags::CLOCK_HALT)
    }

    /// Set the clock-halt flag, stopping the oscillator divider.
    pub fn stop_clock(&mut self) -> Result<(), Error<CommE>> {
        let seconds = self.read_register(Register::SECONDS)?;
        self.write_register(Register::SECONDS, seconds | BitFlags::CLOCK_HALT)
    }

    /// Enable the square wave output pin.
    pub fn square_wave_enable(&mut self) -> Result<(), Error<CommE>> {
        let control = self.read_register(Register::CONTROL)?;
        self.write_register(Register::CONTROL, control | BitFlags::SQWE)
    }

    /// Disable the square wave output pin.
    pub fn square_wave_disable(&mut self) -> Result<(), Error<CommE>> {
        let control = self.read_register(Register::CONTROL)?;
        self.write_register(Register::CONTROL, control & !BitFlags::SQWE)
    }

    /// Select the square wave output frequency, preserving the other
    /// control register bits.
    pub fn square_wave_rate(&mut self, rate: SquareWaveRate) -> Result<(), Error<CommE>> {
        let control = self.read_register(Register::CONTROL)?;
        self.write_register(Register::CONTROL, (control & !BitFlags::RS) | rate as u8)
    }

    /// Read from the battery-backed scratch RAM (0x08-0x3F).
    pub fn read_ram(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Error<CommE>> {
        check_ram_bounds(address, buffer.len())?;
        self.read_registers(address, buffer)
    }

    /// Write to the battery-backed scratch RAM (0x08-0x3F).
    pub fn write_ram(&mut self, address: u8, buffer: &[u8]) -> Result<(), Error<CommE>> {
        check_ram_bounds(address, buffer.len())?;
        self.write_registers(address, buffer)
    }

    /// Read a single register.
    pub fn read_register(&mut self, register: u8) -> Result<u8, Error<CommE>> {
        let mut data = [0];
        self.read_registers(register, &mut data)?;
        Ok(data[0])
    }

    /// Read consecutive registers starting at `register`.
    pub fn read_registers(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), Error<CommE>> {
        self.i2c
            .write_read(DEVICE_ADDRESS, &[register], buffer)
            .map_err(Error::Comm)
    }

    /// Write a single register.
    pub fn write_register(&mut self, register: u8, byte: u8) -> Result<(), Error<CommE>> {
        self.write_data(&[register, byte])
    }

    /// Write consecutive registers starting at `register`. The block must
    /// fit the register file (no wraparound past 0x3F).
    pub fn write_registers(&mut self, register: u8, bytes: &[u8]) -> Result<(), Error<CommE>> {
        if register as usize + bytes.len() > REGISTER_FILE_SIZE {
            return Err(Error::AddressOutOfRange);
        }
        let mut payload = [0; REGISTER_FILE_SIZE + 1];
        payload[0] = register;
        payload[1..=bytes.len()].copy_from_slice(bytes);
        self.write_data(&payload[..=bytes.len()])
    }

    /// Rewrite the hours register as 24-hour if the device is in 12-hour
    /// mode; no bus write when already in 24-hour mode.
    fn set_24h_mode(&mut self) -> Result<(), Error<CommE>> {
        let hours = self.read_register(Register::HOURS)?;
        if hours & BitFlags::H24_H12 == 0 {
            return Ok(());
        }

        let hour_of_12 = packed_bcd_to_decimal(hours & !(BitFlags::H24_H12 | BitFlags::AM_PM));
        let hour_of_24 = if hours & BitFlags::AM_PM != 0 && hour_of_12 < 12 {
            hour_of_12 + 12
        } else if hours & BitFlags::AM_PM == 0 && hour_of_12 == 12 {
            0
        } else {
            hour_of_12
        };
        // Values <= 23 never set the mode bit, so re-encoding selects
        // 24-hour mode by itself.
        self.write_register(Register::HOURS, decimal_to_packed_bcd(hour_of_24))
    }

    /// Write to the RTC via the I2C interface.
    fn write_data(&mut self, payload: &[u8]) -> Result<(), Error<CommE>> {
        self.i2c.write(DEVICE_ADDRESS, payload).map_err(Error::Comm)
    }
}

/// Reject RAM accesses falling outside the scratch window.
fn check_ram_bounds<CommE>(address: u8, len: usize) -> Result<(), Error<CommE>> {
    if !(Register::RAM_START..=Register::RAM_END).contains(&address)
        || address as usize + len > Register::RAM_END as usize + 1
    {
        return Err(Error::AddressOutOfRange);
    }
    Ok(())
}

/// Transform a decimal number to packed BCD format
fn decimal_to_packed_bcd(dec: u8) -> u8 {
    ((dec / 10) << 4) | (dec % 10)
}

/// Transform a number in packed BCD format to decimal
fn packed_bcd_to_decimal(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0xF)
}
