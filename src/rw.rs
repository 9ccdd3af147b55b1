use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::reg::{MuicReg, PmicReg, MUIC_I2C_ADDR, PMIC_I2C_ADDR};
use crate::Error;

/// Register transport shared by the PMIC and MUIC blocks.
///
/// Both blocks hang off the same I²C bus at different addresses. Every method
/// here is a single bus transaction, except [`Bus::update_muic`] which is the
/// usual read-modify-write pair.
pub(crate) struct Bus<I> {
  i2c: I,
}

impl<I, E> Bus<I>
where
  I: I2c<SevenBitAddress, Error = E>,
{
  pub(crate) const fn new(i2c: I) -> Self {
    Self { i2c }
  }

  pub(crate) fn release(self) -> I {
    self.i2c
  }

  /// Read `N` consecutive MUIC registers starting at `reg` in one transaction.
  pub(crate) async fn read_muic<const N: usize>(&mut self, reg: MuicReg) -> Result<[u8; N], Error<E>> {
    let mut buf = [0u8; N];
    self.read_bytes(MUIC_I2C_ADDR, reg.into(), &mut buf).await?;
    Ok(buf)
  }

  pub(crate) async fn read_muic_u8(&mut self, reg: MuicReg) -> Result<u8, Error<E>> {
    let [value] = self.read_muic::<1>(reg).await?;
    Ok(value)
  }

  pub(crate) async fn read_pmic_u8(&mut self, reg: PmicReg) -> Result<u8, Error<E>> {
    let mut buf = [0u8; 1];
    self.read_bytes(PMIC_I2C_ADDR, reg.into(), &mut buf).await?;
    Ok(buf[0])
  }

  pub(crate) async fn write_muic(&mut self, reg: MuicReg, value: u8) -> Result<(), Error<E>> {
    let buf = [reg.into(), value];
    self.i2c.write(MUIC_I2C_ADDR, &buf).await.map_err(Error::I2c)
  }

  /// Replace the bits selected by `mask` with `value`. The write is skipped
  /// when the register already holds the requested bits.
  pub(crate) async fn update_muic(&mut self, reg: MuicReg, mask: u8, value: u8) -> Result<(), Error<E>> {
    let current = self.read_muic_u8(reg).await?;
    let next = (current & !mask) | (value & mask);
    if next == current {
      return Ok(());
    }
    self.write_muic(reg, next).await
  }

  async fn read_bytes(&mut self, addr: u8, reg: u8, buf: &mut [u8]) -> Result<(), Error<E>> {
    self.i2c.write_read(addr, &[reg], buf).await.map_err(Error::I2c)
  }
}
