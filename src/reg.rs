/******************************************************************************
 * Refer to the MAX77804K datasheet and the vendor MUIC driver for details.   *
 * ========================================================================== *
 *                    MAX77804K - PMIC & MUIC Register Map                    *
*******************************************************************************/

/// 7-bit address of the PMIC (top-level) register block.
pub(crate) const PMIC_I2C_ADDR: u8 = 0x66;
/// 7-bit address of the MUIC register block.
pub(crate) const MUIC_I2C_ADDR: u8 = 0x25;

/// PMIC_ID1 value of the revision that carries ADCDBSET in CTRL4.
pub(crate) const PMIC_ID1_CTRL4_DEBOUNCE: u8 = 0x34;

#[allow(dead_code)]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PmicReg {
  PmicId1 = 0x20,
  PmicId2 = 0x21,
}

#[allow(dead_code)]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MuicReg {
  Id = 0x00,

  // Latched interrupts, cleared on read (0x01..0x03)
  Int1 = 0x01,
  Int2 = 0x02,
  Int3 = 0x03,

  // Live status (0x04..0x06)
  Status1 = 0x04,
  Status2 = 0x05,
  Status3 = 0x06,

  // Interrupt masks (0x07..0x09)
  IntMask1 = 0x07,
  IntMask2 = 0x08,
  IntMask3 = 0x09,

  // Charger detection (0x0A..0x0B)
  CdetCtrl1 = 0x0A,
  CdetCtrl2 = 0x0B,

  // Switch and ADC control
  Ctrl1 = 0x0C,
  Ctrl2 = 0x0D,
  Ctrl3 = 0x0E,
  Ctrl4 = 0x16,
}

impl From<MuicReg> for u8 {
  #[inline]
  fn from(r: MuicReg) -> Self {
    r as u8
  }
}

impl From<PmicReg> for u8 {
  #[inline]
  fn from(r: PmicReg) -> Self {
    r as u8
  }
}

// STATUS1..STATUS3 are read as one block.
pub(crate) const STATUS_LEN: usize = 3;
// INT1..INT3 are read as one block.
pub(crate) const INT_LEN: usize = 3;

// CTRL3 (revisions other than 0x34)
pub(crate) const CTRL3_ADCDBSET_SHIFT: u8 = 4;
pub(crate) const CTRL3_ADCDBSET_MASK: u8 = 0b11 << CTRL3_ADCDBSET_SHIFT;

// CTRL4 (revision 0x34)
pub(crate) const CTRL4_ADCDBSET_SHIFT: u8 = 0;
pub(crate) const CTRL4_ADCDBSET_MASK: u8 = 0b11 << CTRL4_ADCDBSET_SHIFT;
pub(crate) const CTRL4_ADCMODE_MASK: u8 = 0b11 << 6;

// CDETCTRL1: DCD timer select, 0 = 2 s
pub(crate) const CDETCTRL1_DCDTMR_MASK: u8 = 1 << 5;
