//! The transport between the driver and the display controller.

/// A byte pipe to a page-addressed display controller. Commands and pixel data travel over the
/// same bus and are told apart by the implementation (a D/C line, or a control byte).
pub trait DisplayInterface {
    type Error;

    /// Prepare the bus. Called once by `Display::init`.
    fn connect(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error>;

    fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error>;

    /// Cooperative yield point, called between the pages of a long transfer.
    fn yield_now(&mut self) {}
}

pub mod spi {
    //! The "4-wire" SPI interface: 8 bit words, with a GPIO driving the D/C (data/command) pin.

    use embedded_hal::blocking::spi;
    use embedded_hal::digital::v2::OutputPin;

    use super::DisplayInterface;

    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum SpiInterfaceError<S, P> {
        /// The SPI write failed.
        Spi(S),
        /// Driving the D/C pin failed.
        Dc(P),
    }

    pub struct SpiInterface<SPI, DC> {
        /// The SPI master device connected to the controller.
        spi: SPI,
        /// A GPIO output pin connected to the D/C pin of the controller.
        dc: DC,
    }

    impl<SPI, DC> SpiInterface<SPI, DC>
    where
        SPI: spi::Write<u8>,
        DC: OutputPin,
    {
        pub fn new(spi: SPI, dc: DC) -> Self {
            Self { spi, dc }
        }

        /// Give back the bus and the pin.
        pub fn release(self) -> (SPI, DC) {
            (self.spi, self.dc)
        }
    }

    impl<SPI, DC> DisplayInterface for SpiInterface<SPI, DC>
    where
        SPI: spi::Write<u8>,
        DC: OutputPin,
    {
        type Error = SpiInterfaceError<SPI::Error, DC::Error>;

        fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error> {
            self.dc.set_low().map_err(SpiInterfaceError::Dc)?;
            self.spi.write(&[cmd]).map_err(SpiInterfaceError::Spi)
        }

        fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
            self.dc.set_high().map_err(SpiInterfaceError::Dc)?;
            self.spi.write(buf).map_err(SpiInterfaceError::Spi)
        }
    }
}

pub mod i2c {
    //! The I2C interface. Every transaction starts with a control byte: `0x80` for a single
    //! command byte, `0x40` for a run of display data.

    use embedded_hal::blocking::i2c;

    use super::DisplayInterface;

    /// Common 7-bit address of SSD1306 and SH1106 modules.
    pub const DEFAULT_ADDRESS: u8 = 0x3C;

    const CONTROL_COMMAND: u8 = 0x80;
    const CONTROL_DATA: u8 = 0x40;
    /// Data bytes per I2C transaction, which keeps each write inside small MCU I2C buffers.
    const DATA_CHUNK: usize = 16;

    pub struct I2cInterface<I2C> {
        i2c: I2C,
        address: u8,
    }

    impl<I2C> I2cInterface<I2C>
    where
        I2C: i2c::Write,
    {
        pub fn new(i2c: I2C, address: u8) -> Self {
            Self { i2c, address }
        }

        pub fn release(self) -> I2C {
            self.i2c
        }
    }

    impl<I2C> DisplayInterface for I2cInterface<I2C>
    where
        I2C: i2c::Write,
    {
        type Error = I2C::Error;

        fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error> {
            self.i2c.write(self.address, &[CONTROL_COMMAND, cmd])
        }

        fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
            let mut frame = [0u8; DATA_CHUNK + 1];
            frame[0] = CONTROL_DATA;
            for chunk in buf.chunks(DATA_CHUNK) {
                frame[1..=chunk.len()].copy_from_slice(chunk);
                self.i2c.write(self.address, &frame[..=chunk.len()])?;
            }
            Ok(())
        }
    }

}
