use bitfield_struct::bitfield;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::reg::{MuicReg, STATUS_LEN};
use crate::rw::Bus;
use crate::Error;

/// Resistance class sensed on the ID pin, as reported in STATUS1[4:0].
///
/// Every 5-bit pattern has a name, so decoding never fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AdcCode {
  Ground = 0x00,
  MhlOrSendEnd = 0x01,
  ButtonS1 = 0x02,
  ButtonS2 = 0x03,
  ButtonS3 = 0x04,
  ButtonS4 = 0x05,
  ButtonS5 = 0x06,
  ButtonS6 = 0x07,
  ButtonS7 = 0x08,
  ButtonS8 = 0x09,
  ButtonS9 = 0x0A,
  ButtonS10 = 0x0B,
  ButtonS11 = 0x0C,
  ButtonS12 = 0x0D,
  /// 28.7 kΩ
  VzwUsbDock = 0x0E,
  /// 34 kΩ
  VzwIncompatible = 0x0F,
  /// 40.2 kΩ
  SmartDock = 0x10,
  /// 49.9 kΩ
  Hmt = 0x11,
  /// 64.9 kΩ
  AudioDock = 0x12,
  /// 80.07 kΩ
  LanHub = 0x13,
  /// 102 kΩ
  ChargingCable = 0x14,
  Mpos = 0x15,
  Uart = 0x16,
  /// 200 kΩ
  Cea936aType1Charger = 0x17,
  /// 255 kΩ
  JigUsbOff = 0x18,
  /// 301 kΩ
  JigUsbOn = 0x19,
  /// 365 kΩ
  DeskDock = 0x1A,
  /// 442 kΩ
  Cea936aType2Charger = 0x1B,
  /// 523 kΩ
  JigUartOff = 0x1C,
  /// 619 kΩ
  JigUartOn = 0x1D,
  /// 1000 or 1002 Ω
  PhonePowered = 0x1E,
  /// Nothing attached to the ID pin.
  Open = 0x1F,
}

impl AdcCode {
  pub const fn into_bits(self) -> u8 {
    self as u8
  }

  pub const fn from_bits(bits: u8) -> Self {
    match bits & 0x1F {
      0x00 => Self::Ground,
      0x01 => Self::MhlOrSendEnd,
      0x02 => Self::ButtonS1,
      0x03 => Self::ButtonS2,
      0x04 => Self::ButtonS3,
      0x05 => Self::ButtonS4,
      0x06 => Self::ButtonS5,
      0x07 => Self::ButtonS6,
      0x08 => Self::ButtonS7,
      0x09 => Self::ButtonS8,
      0x0A => Self::ButtonS9,
      0x0B => Self::ButtonS10,
      0x0C => Self::ButtonS11,
      0x0D => Self::ButtonS12,
      0x0E => Self::VzwUsbDock,
      0x0F => Self::VzwIncompatible,
      0x10 => Self::SmartDock,
      0x11 => Self::Hmt,
      0x12 => Self::AudioDock,
      0x13 => Self::LanHub,
      0x14 => Self::ChargingCable,
      0x15 => Self::Mpos,
      0x16 => Self::Uart,
      0x17 => Self::Cea936aType1Charger,
      0x18 => Self::JigUsbOff,
      0x19 => Self::JigUsbOn,
      0x1A => Self::DeskDock,
      0x1B => Self::Cea936aType2Charger,
      0x1C => Self::JigUartOff,
      0x1D => Self::JigUartOn,
      0x1E => Self::PhonePowered,
      _ => Self::Open,
    }
  }

  /// Codes from `Cea936aType1Charger` up to `JigUartOn`: accessories the chip
  /// recognises but this driver does not route.
  pub const fn is_unhandled_accessory(self) -> bool {
    let code = self as u8;
    code >= Self::Cea936aType1Charger as u8 && code <= Self::JigUartOn as u8
  }
}

/// Charging-port signature reported by the BC1.2 detector in STATUS2[2:0].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ChargerType {
  /// No valid voltage on VB.
  NoVoltage = 0x00,
  /// D+/D- do not present a charger signature: plain USB host.
  Usb = 0x01,
  /// Charging downstream port.
  DownstreamPort = 0x02,
  /// Dedicated charger, D+/D- shorted.
  DedicatedCharger = 0x03,
  /// Proprietary charger limited to 500 mA.
  Special500mA = 0x04,
  /// Proprietary charger limited to 1 A.
  Special1A = 0x05,
  /// 3.3 V bias on D+/D-.
  SpecialBias = 0x06,
  /// Dead-battery charging, 100 mA.
  DeadBattery100mA = 0x07,
}

impl ChargerType {
  pub const fn into_bits(self) -> u8 {
    self as u8
  }

  pub const fn from_bits(bits: u8) -> Self {
    match bits & 0b111 {
      0x00 => Self::NoVoltage,
      0x01 => Self::Usb,
      0x02 => Self::DownstreamPort,
      0x03 => Self::DedicatedCharger,
      0x04 => Self::Special500mA,
      0x05 => Self::Special1A,
      0x06 => Self::SpecialBias,
      _ => Self::DeadBattery100mA,
    }
  }

  /// Signatures of a port that actually sources VBUS to us.
  pub const fn is_charging_port(self) -> bool {
    matches!(
      self,
      Self::Usb | Self::DownstreamPort | Self::DedicatedCharger | Self::Special500mA | Self::Special1A
    )
  }
}

#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct Status1 {
  #[bits(5)]
  pub adc: AdcCode,
  pub adc_low: bool,
  pub adc_error: bool,
  pub adc_1k: bool,
}

#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct Status2 {
  #[bits(3)]
  pub charger_type: ChargerType,
  pub charger_detect_running: bool,
  pub dcd_timeout: bool,
  pub dx_overvoltage: bool,
  pub vbus_voltage: bool,
  pub vid_removed: bool,
}

/// STATUS3 carries nothing the classifier looks at yet.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct Status3 {
  #[bits(4)]
  pub vbus_adc: u8,
  pub vdn_monitor: bool,
  pub dn_resistor: bool,
  #[bits(2)]
  __: u8,
}

/// One coherent read of STATUS1..STATUS3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
  pub status1: Status1,
  pub status2: Status2,
  pub status3: Status3,
}

impl StatusSnapshot {
  pub const fn from_bytes(bytes: [u8; STATUS_LEN]) -> Self {
    Self {
      status1: Status1::from_bits(bytes[0]),
      status2: Status2::from_bits(bytes[1]),
      status3: Status3::from_bits(bytes[2]),
    }
  }

  pub const fn to_bytes(&self) -> [u8; STATUS_LEN] {
    [self.status1.into_bits(), self.status2.into_bits(), self.status3.into_bits()]
  }

  pub const fn adc(&self) -> AdcCode {
    self.status1.adc()
  }

  pub const fn adc_error(&self) -> bool {
    self.status1.adc_error()
  }

  pub const fn charger_type(&self) -> ChargerType {
    self.status2.charger_type()
  }

  pub const fn dx_overvoltage(&self) -> bool {
    self.status2.dx_overvoltage()
  }

  pub const fn vbus_voltage(&self) -> bool {
    self.status2.vbus_voltage()
  }
}

impl From<[u8; STATUS_LEN]> for StatusSnapshot {
  fn from(bytes: [u8; STATUS_LEN]) -> Self {
    Self::from_bytes(bytes)
  }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusSnapshot {
  fn format(&self, f: defmt::Formatter) {
    let [s1, s2, s3] = self.to_bytes();
    defmt::write!(f, "STATUS1={=u8:#04x} STATUS2={=u8:#04x} STATUS3={=u8:#04x}", s1, s2, s3)
  }
}

impl<I, E> Bus<I>
where
  I: I2c<SevenBitAddress, Error = E>,
{
  /// Read STATUS1..STATUS3 in a single transaction.
  pub(crate) async fn read_status(&mut self) -> Result<StatusSnapshot, Error<E>> {
    let bytes = self.read_muic::<STATUS_LEN>(MuicReg::Status1).await?;
    Ok(StatusSnapshot::from_bytes(bytes))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn adc_code_decoding_is_total() {
    for bits in 0u8..=0x1F {
      assert_eq!(AdcCode::from_bits(bits).into_bits(), bits);
    }
  }

  #[test]
  fn charger_type_decoding_is_total() {
    for bits in 0u8..=0x07 {
      assert_eq!(ChargerType::from_bits(bits).into_bits(), bits);
    }
  }

  #[test]
  fn unhandled_accessory_range_bounds() {
    assert!(!AdcCode::Uart.is_unhandled_accessory());
    assert!(AdcCode::Cea936aType1Charger.is_unhandled_accessory());
    assert!(AdcCode::DeskDock.is_unhandled_accessory());
    assert!(AdcCode::JigUartOn.is_unhandled_accessory());
    assert!(!AdcCode::PhonePowered.is_unhandled_accessory());
    assert!(!AdcCode::Open.is_unhandled_accessory());
    assert!(!AdcCode::Ground.is_unhandled_accessory());
  }

  #[test]
  fn charging_port_set() {
    assert!(!ChargerType::NoVoltage.is_charging_port());
    assert!(ChargerType::Usb.is_charging_port());
    assert!(ChargerType::Special1A.is_charging_port());
    assert!(!ChargerType::SpecialBias.is_charging_port());
    assert!(!ChargerType::DeadBattery100mA.is_charging_port());
  }

  #[test]
  fn snapshot_field_layout() {
    // ADC open with ADCERR, CHGTYP=DCP with DxOVP and VBVolt
    let snapshot = StatusSnapshot::from_bytes([0x5F, 0x63, 0x00]);
    assert_eq!(snapshot.adc(), AdcCode::Open);
    assert!(snapshot.adc_error());
    assert!(!snapshot.status1.adc_1k());
    assert_eq!(snapshot.charger_type(), ChargerType::DedicatedCharger);
    assert!(snapshot.dx_overvoltage());
    assert!(snapshot.vbus_voltage());
    assert!(!snapshot.status2.vid_removed());
    assert_eq!(snapshot.to_bytes(), [0x5F, 0x63, 0x00]);
  }
}
