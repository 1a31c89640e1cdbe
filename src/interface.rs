//! The bus transport the driver talks through. The SH1106 is driven over a transactional bus where
//! every command or data burst is framed as `start(address)`, one or more `write(byte)`, and
//! `stop()`.

/// The capability set the driver needs from a bus. Failures are reported through `Error` and are
/// never retried by the driver.
pub trait BusInterface {
    type Error;

    /// (Re)initialize the bus at `clock_hz`.
    fn init(&mut self, clock_hz: u32) -> Result<(), Self::Error>;
    /// Release the bus hardware.
    fn deinit(&mut self) -> Result<(), Self::Error>;
    /// Open a transaction to the device at `address`.
    fn start(&mut self, address: u8) -> Result<(), Self::Error>;
    /// Write one byte inside the open transaction.
    fn write(&mut self, byte: u8) -> Result<(), Self::Error>;
    /// Close the open transaction.
    fn stop(&mut self) -> Result<(), Self::Error>;
}

pub mod i2c {
    //! Adapter from an `embedded-hal` I2C peripheral to [`BusInterface`]. An `embedded-hal` write
    //! carries a whole transaction at once, so the bytes of a transaction are collected until
    //! `stop()` and then flushed in a single write.

    use embedded_hal::i2c::I2c;
    use heapless::Vec;

    use super::BusInterface;
    use crate::command::consts::SH1106_COLS;

    /// The largest transaction the driver issues: a control byte followed by one full row of
    /// physical columns.
    pub const TRANSACTION_CAPACITY: usize = 1 + SH1106_COLS as usize;

    /// Errors raised by [`I2cInterface`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum I2cError<E> {
        /// The I2C peripheral rejected the write.
        Bus(E),
        /// More bytes were written in one transaction than `TRANSACTION_CAPACITY`.
        Overflow,
        /// `write` or `stop` was called without an open transaction.
        NoTransaction,
    }

    #[cfg(feature = "defmt")]
    impl<E> defmt::Format for I2cError<E> {
        fn format(&self, f: defmt::Formatter) {
            match self {
                I2cError::Bus(_e) => defmt::write!(f, "I2C bus error"),
                I2cError::Overflow => defmt::write!(f, "Transaction overflow"),
                I2cError::NoTransaction => defmt::write!(f, "No open transaction"),
            }
        }
    }

    /// A [`BusInterface`] over an `embedded-hal` I2C master.
    pub struct I2cInterface<I2C> {
        /// The I2C master the SH1106 is attached to.
        i2c: I2C,
        /// Address of the open transaction, if any.
        address: Option<u8>,
        buf: Vec<u8, TRANSACTION_CAPACITY>,
    }

    impl<I2C> I2cInterface<I2C>
    where
        I2C: I2c,
    {
        /// Wrap an I2C master. The bus clock is whatever the peripheral was configured with; the
        /// clock rate passed to `init` is not applied.
        pub fn new(i2c: I2C) -> Self {
            Self {
                i2c,
                address: None,
                buf: Vec::new(),
            }
        }

        /// Give back the wrapped peripheral.
        pub fn release(self) -> I2C {
            self.i2c
        }
    }

    impl<I2C> BusInterface for I2cInterface<I2C>
    where
        I2C: I2c,
    {
        type Error = I2cError<I2C::Error>;

        fn init(&mut self, _clock_hz: u32) -> Result<(), Self::Error> {
            #[cfg(feature = "defmt")]
            defmt::debug!("bus clock {=u32} Hz requested, not applied", _clock_hz);
            self.address = None;
            self.buf.clear();
            Ok(())
        }

        fn deinit(&mut self) -> Result<(), Self::Error> {
            self.address = None;
            self.buf.clear();
            Ok(())
        }

        fn start(&mut self, address: u8) -> Result<(), Self::Error> {
            self.buf.clear();
            self.address = Some(address);
            Ok(())
        }

        fn write(&mut self, byte: u8) -> Result<(), Self::Error> {
            if self.address.is_none() {
                return Err(I2cError::NoTransaction);
            }
            self.buf.push(byte).map_err(|_| I2cError::Overflow)
        }

        fn stop(&mut self) -> Result<(), Self::Error> {
            let address = self.address.take().ok_or(I2cError::NoTransaction)?;
            let result = self.i2c.write(address, &self.buf).map_err(I2cError::Bus);
            self.buf.clear();
            result
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};
        use std::vec::Vec as StdVec;

        #[derive(Default)]
        struct RecordingI2c {
            writes: StdVec<(u8, StdVec<u8>)>,
            nack: bool,
        }

        impl ErrorType for RecordingI2c {
            type Error = ErrorKind;
        }

        impl I2c for RecordingI2c {
            fn transaction(
                &mut self,
                address: u8,
                operations: &mut [Operation<'_>],
            ) -> Result<(), Self::Error> {
                if self.nack {
                    return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
                }
                for op in operations.iter() {
                    if let Operation::Write(bytes) = op {
                        self.writes.push((address, bytes.to_vec()));
                    }
                }
                Ok(())
            }
        }

        #[test]
        fn transaction_flushed_at_stop() {
            let mut bus = I2cInterface::new(RecordingI2c::default());
            bus.start(0x3C).unwrap();
            bus.write(0x00).unwrap();
            bus.write(0xAF).unwrap();
            assert!(bus.i2c.writes.is_empty());
            bus.stop().unwrap();
            assert_eq!(bus.release().writes, [(0x3C, vec![0x00, 0xAF])]);
        }

        #[test]
        fn full_row_fits() {
            let mut bus = I2cInterface::new(RecordingI2c::default());
            bus.start(0x3C).unwrap();
            for _ in 0..TRANSACTION_CAPACITY {
                bus.write(0x55).unwrap();
            }
            assert_eq!(bus.write(0x55), Err(I2cError::Overflow));
            bus.stop().unwrap();
            assert_eq!(bus.release().writes[0].1.len(), TRANSACTION_CAPACITY);
        }

        #[test]
        fn write_outside_transaction() {
            let mut bus = I2cInterface::new(RecordingI2c::default());
            assert_eq!(bus.write(0x00), Err(I2cError::NoTransaction));
            assert_eq!(bus.stop(), Err(I2cError::NoTransaction));
        }

        #[test]
        fn nack_reported_and_state_cleared() {
            let mut bus = I2cInterface::new(RecordingI2c {
                nack: true,
                ..Default::default()
            });
            bus.start(0x3C).unwrap();
            bus.write(0x40).unwrap();
            assert_eq!(
                bus.stop(),
                Err(I2cError::Bus(ErrorKind::NoAcknowledge(
                    NoAcknowledgeSource::Address
                )))
            );
            assert!(bus.buf.is_empty());
            assert_eq!(bus.write(0x40), Err(I2cError::NoTransaction));
        }
    }
}
