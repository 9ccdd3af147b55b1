/// What the driver believes is plugged in, carried from one detection pass to
/// the next.
///
/// This is session state, not a hardware reading. The device starts out as
/// [`CableType::Unknown`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CableType {
  None,
  Usb,
  Otg,
  /// Travel adapter (dedicated charger).
  Ta,
  DeskDock,
  CarDock,
  JigUartOff,
  /// JIG UART off with VBUS present.
  JigUartOffVb,
  JigUartOn,
  JigUsbOff,
  JigUsbOn,
  Mhl,
  /// MHL with VBUS present.
  MhlVb,
  SmartDock,
  SmartDockTa,
  SmartDockUsb,
  AudioDock,
  Incompatible,
  Cdp,
  #[default]
  Unknown,
}

impl CableType {
  pub const ALL: [CableType; 20] = [
    Self::None,
    Self::Usb,
    Self::Otg,
    Self::Ta,
    Self::DeskDock,
    Self::CarDock,
    Self::JigUartOff,
    Self::JigUartOffVb,
    Self::JigUartOn,
    Self::JigUsbOff,
    Self::JigUsbOn,
    Self::Mhl,
    Self::MhlVb,
    Self::SmartDock,
    Self::SmartDockTa,
    Self::SmartDockUsb,
    Self::AudioDock,
    Self::Incompatible,
    Self::Cdp,
    Self::Unknown,
  ];

  /// Accessories that hold the ID pin against ground while VBUS is supplied
  /// from the other side. Seeing ADC open with a charger signature means they
  /// went away.
  pub const fn requires_ground_reference(self) -> bool {
    matches!(
      self,
      Self::Otg | Self::CarDock | Self::SmartDock | Self::SmartDockTa | Self::SmartDockUsb | Self::AudioDock
    )
  }
}

/// Signals published to the notification sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cable {
  /// Peripheral-mode USB: a host or charger is on the other end.
  Usb,
  /// Host-mode USB (OTG). Never asserted by this driver.
  UsbHost,
}

impl Cable {
  pub const fn name(self) -> &'static str {
    match self {
      Self::Usb => "USB",
      Self::UsbHost => "USB-HOST",
    }
  }
}

/// Consumer of cable state, e.g. the USB gadget stack or a charger driver.
///
/// Called with the device lock held, so implementations must not block.
pub trait CableSink {
  fn set_state(&mut self, cable: Cable, attached: bool);
}

impl<T: CableSink + ?Sized> CableSink for &mut T {
  fn set_state(&mut self, cable: Cable, attached: bool) {
    (**self).set_state(cable, attached)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ground_referenced_accessories() {
    let grounded: usize = CableType::ALL.iter().filter(|c| c.requires_ground_reference()).count();
    assert_eq!(grounded, 6);
    assert!(CableType::Otg.requires_ground_reference());
    assert!(CableType::AudioDock.requires_ground_reference());
    assert!(!CableType::DeskDock.requires_ground_reference());
    assert!(!CableType::Unknown.requires_ground_reference());
    assert!(!CableType::None.requires_ground_reference());
  }

  #[test]
  fn signal_names() {
    assert_eq!(Cable::Usb.name(), "USB");
    assert_eq!(Cable::UsbHost.name(), "USB-HOST");
  }
}
