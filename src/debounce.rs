use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::reg::{
  MuicReg, PmicReg, CTRL3_ADCDBSET_MASK, CTRL3_ADCDBSET_SHIFT, CTRL4_ADCDBSET_MASK, CTRL4_ADCDBSET_SHIFT,
  CTRL4_ADCMODE_MASK, PMIC_ID1_CTRL4_DEBOUNCE,
};
use crate::rw::Bus;
use crate::Error;

/// Minimum time the ID-pin ADC must be stable before it reports a new code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceTime {
  Ms5 = 0b00,
  Ms10 = 0b01,
  #[default]
  Ms25 = 0b10,
  /// 38 to 62 ms.
  Ms38To62 = 0b11,
}

impl DebounceTime {
  pub const fn selector(self) -> u8 {
    self as u8
  }

  /// Pick the interval by its nominal duration. Only 5, 10, 25 and 38 ms
  /// (the lower bound of the slowest setting) are accepted.
  pub const fn from_millis(ms: u8) -> Result<Self, u8> {
    match ms {
      5 => Ok(Self::Ms5),
      10 => Ok(Self::Ms10),
      25 => Ok(Self::Ms25),
      38 => Ok(Self::Ms38To62),
      other => Err(other),
    }
  }
}

impl From<DebounceTime> for u8 {
  fn from(v: DebounceTime) -> Self {
    v.selector()
  }
}

impl TryFrom<u8> for DebounceTime {
  type Error = u8;

  fn try_from(bits: u8) -> Result<Self, Self::Error> {
    match bits {
      0b00 => Ok(Self::Ms5),
      0b01 => Ok(Self::Ms10),
      0b10 => Ok(Self::Ms25),
      0b11 => Ok(Self::Ms38To62),
      other => Err(other),
    }
  }
}

/// PMIC silicon revision as read from PMIC_ID1.
///
/// The ADC debounce field lives in a different MUIC control register
/// depending on revision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PmicRevision {
  /// PMIC_ID1 = 0x34, ADCDBSET in CTRL4.
  Ctrl4Debounce,
  /// Any other PMIC_ID1, ADCDBSET in CTRL3.
  Ctrl3Debounce(u8),
}

impl PmicRevision {
  pub const fn from_id(pmic_id1: u8) -> Self {
    if pmic_id1 == PMIC_ID1_CTRL4_DEBOUNCE {
      Self::Ctrl4Debounce
    } else {
      Self::Ctrl3Debounce(pmic_id1)
    }
  }

  pub const fn id(self) -> u8 {
    match self {
      Self::Ctrl4Debounce => PMIC_ID1_CTRL4_DEBOUNCE,
      Self::Ctrl3Debounce(id) => id,
    }
  }

  /// Register, mask and value that program `time` on this revision.
  pub(crate) const fn debounce_write(self, time: DebounceTime) -> (MuicReg, u8, u8) {
    match self {
      // ADCMODE is cleared along with the selector.
      Self::Ctrl4Debounce => (
        MuicReg::Ctrl4,
        CTRL4_ADCDBSET_MASK | CTRL4_ADCMODE_MASK,
        time.selector() << CTRL4_ADCDBSET_SHIFT,
      ),
      Self::Ctrl3Debounce(_) => (MuicReg::Ctrl3, CTRL3_ADCDBSET_MASK, time.selector() << CTRL3_ADCDBSET_SHIFT),
    }
  }
}

impl<I, E> Bus<I>
where
  I: I2c<SevenBitAddress, Error = E>,
{
  pub(crate) async fn read_pmic_revision(&mut self) -> Result<PmicRevision, Error<E>> {
    match self.read_pmic_u8(PmicReg::PmicId1).await {
      Ok(id) => Ok(PmicRevision::from_id(id)),
      Err(Error::I2c(e)) => Err(Error::Revision(e)),
      Err(other) => Err(other),
    }
  }

  pub(crate) async fn write_debounce_time(&mut self, revision: PmicRevision, time: DebounceTime) -> Result<(), Error<E>> {
    let (reg, mask, value) = revision.debounce_write(time);
    debug!("ADC debounce selector {=u8} -> {=u8:#04x}", time.selector(), reg as u8);
    self.update_muic(reg, mask, value).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn millis_are_validated() {
    assert_eq!(DebounceTime::from_millis(5), Ok(DebounceTime::Ms5));
    assert_eq!(DebounceTime::from_millis(25), Ok(DebounceTime::Ms25));
    assert_eq!(DebounceTime::from_millis(38), Ok(DebounceTime::Ms38To62));
    assert_eq!(DebounceTime::from_millis(20), Err(20));
    assert_eq!(DebounceTime::try_from(4), Err(4));
    assert_eq!(DebounceTime::try_from(3), Ok(DebounceTime::Ms38To62));
  }

  #[test]
  fn revision_picks_control_register() {
    let rev = PmicRevision::from_id(0x34);
    assert_eq!(rev, PmicRevision::Ctrl4Debounce);
    assert_eq!(rev.debounce_write(DebounceTime::Ms25), (MuicReg::Ctrl4, 0xC3, 0x02));

    let rev = PmicRevision::from_id(0x35);
    assert_eq!(rev, PmicRevision::Ctrl3Debounce(0x35));
    assert_eq!(rev.debounce_write(DebounceTime::Ms25), (MuicReg::Ctrl3, 0x30, 0x20));
    assert_eq!(rev.id(), 0x35);
  }
}
