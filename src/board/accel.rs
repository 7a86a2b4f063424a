//! MMA8451Q 3-axis accelerometer over I²C.
//!
//! Generic over the I²C implementation so callers pass in their HAL's
//! I²C peripheral.  Readings are 14-bit two's complement in ±2 g mode
//! (4096 counts/g).

use defmt::info;
use embedded_hal::i2c::I2c;
use snapsense::{Accelerometer, Axis};

const REG_OUT_X_MSB: u8 = 0x01;
const REG_OUT_Y_MSB: u8 = 0x03;
const REG_OUT_Z_MSB: u8 = 0x05;
const REG_WHO_AM_I: u8 = 0x0D;
const REG_XYZ_DATA_CFG: u8 = 0x0E;
const REG_CTRL_REG1: u8 = 0x2A;

const WHO_AM_I_EXPECTED: u8 = 0x1A;

/// CTRL_REG1: ACTIVE, 800 Hz output data rate.
const CTRL_REG1_ACTIVE: u8 = 0x01;

/// Initialisation failure.
#[derive(Debug)]
pub enum InitError<E> {
    Bus(E),
    /// WHO_AM_I returned something other than an MMA8451Q.
    UnexpectedId(u8),
}

pub struct Mma8451<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Mma8451<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Verify the device and switch it to active ±2 g mode.
    pub fn init(&mut self) -> Result<(), InitError<I2C::Error>> {
        let mut id = [0u8; 1];
        self.i2c
            .write_read(self.address, &[REG_WHO_AM_I], &mut id)
            .map_err(InitError::Bus)?;
        if id[0] != WHO_AM_I_EXPECTED {
            return Err(InitError::UnexpectedId(id[0]));
        }

        // Range can only be changed in standby.
        self.write_reg(REG_CTRL_REG1, 0x00).map_err(InitError::Bus)?;
        self.write_reg(REG_XYZ_DATA_CFG, 0x00).map_err(InitError::Bus)?;
        self.write_reg(REG_CTRL_REG1, CTRL_REG1_ACTIVE)
            .map_err(InitError::Bus)?;

        info!("MMA8451Q initialised (±2g, 14-bit)");
        Ok(())
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[reg, value])
    }
}

impl<I2C: I2c> Accelerometer for Mma8451<I2C> {
    type Error = I2C::Error;

    fn read_axis(&mut self, axis: Axis) -> Result<i16, Self::Error> {
        let reg = match axis {
            Axis::X => REG_OUT_X_MSB,
            Axis::Y => REG_OUT_Y_MSB,
            Axis::Z => REG_OUT_Z_MSB,
        };
        let mut raw = [0u8; 2];
        self.i2c.write_read(self.address, &[reg], &mut raw)?;

        // Left-justified 14-bit sample.
        Ok(i16::from_be_bytes(raw) >> 2)
    }
}
