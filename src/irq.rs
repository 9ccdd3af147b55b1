use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::reg::INT_LEN;
use crate::{CableSink, Max77804kMuic};

/// MUIC interrupt sources, in INT1..INT3 bit order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqSource {
  // INT1
  Adc,
  AdcLow,
  AdcError,
  Adc1k,
  // INT2
  ChgTyp,
  ChgDetRun,
  DcdTmr,
  DxOvp,
  VbVolt,
  VidRm,
  // INT3
  Eoc,
  Cgmbc,
  Ovp,
  MbcChgErr,
  ChgEnabled,
  BatDet,
}

/// Coarse event class an interrupt source feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CableGroup {
  Adc,
  Charger,
}

impl IrqSource {
  pub const COUNT: usize = 16;

  pub const ALL: [IrqSource; Self::COUNT] = [
    Self::Adc,
    Self::AdcLow,
    Self::AdcError,
    Self::Adc1k,
    Self::ChgTyp,
    Self::ChgDetRun,
    Self::DcdTmr,
    Self::DxOvp,
    Self::VbVolt,
    Self::VidRm,
    Self::Eoc,
    Self::Cgmbc,
    Self::Ovp,
    Self::MbcChgErr,
    Self::ChgEnabled,
    Self::BatDet,
  ];

  pub const fn name(self) -> &'static str {
    match self {
      Self::Adc => "MUIC-ADC",
      Self::AdcLow => "MUIC-ADCLOW",
      Self::AdcError => "MUIC-ADCERR",
      Self::Adc1k => "MUIC-ADC1K",
      Self::ChgTyp => "MUIC-CHGTYP",
      Self::ChgDetRun => "MUIC-CHGDETREUN",
      Self::DcdTmr => "MUIC-DCDTMR",
      Self::DxOvp => "MUIC-DXOVP",
      Self::VbVolt => "MUIC-VBVOLT",
      Self::VidRm => "MUIC-VIDRM",
      Self::Eoc => "MUIC-EOC",
      Self::Cgmbc => "MUIC-CGMBC",
      Self::Ovp => "MUIC-OVP",
      Self::MbcChgErr => "MUIC-MBCCHGERR",
      Self::ChgEnabled => "MUIC-CHGENABLED",
      Self::BatDet => "MUIC-BATDET",
    }
  }

  /// Event class this source raises. INT3 (charger block) sources are only
  /// acknowledged so the shared status register clears, and raise nothing.
  pub const fn group(self) -> Option<CableGroup> {
    match self {
      Self::Adc | Self::AdcLow | Self::AdcError | Self::Adc1k => Some(CableGroup::Adc),
      Self::ChgTyp | Self::ChgDetRun | Self::DcdTmr | Self::DxOvp | Self::VbVolt | Self::VidRm => {
        Some(CableGroup::Charger)
      }
      Self::Eoc | Self::Cgmbc | Self::Ovp | Self::MbcChgErr | Self::ChgEnabled | Self::BatDet => None,
    }
  }

  /// Register offset from INT1 and bit mask of this source.
  pub const fn position(self) -> (usize, u8) {
    let index = self as usize;
    match index {
      0..=3 => (0, 1 << index),
      4..=9 => (1, 1 << (index - 4)),
      _ => (2, 1 << (index - 10)),
    }
  }

  /// Sources latched in a raw INT1..INT3 read.
  pub fn decode(int: [u8; INT_LEN]) -> impl Iterator<Item = IrqSource> {
    Self::ALL.into_iter().filter(move |source| {
      let (offset, mask) = source.position();
      int[offset] & mask != 0
    })
  }
}

/// Platform interrupt ids resolved for each [`IrqSource`] at bring-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IrqMap {
  ids: [u32; IrqSource::COUNT],
}

impl IrqMap {
  pub const fn new(ids: [u32; IrqSource::COUNT]) -> Self {
    Self { ids }
  }

  /// Build the table from a resolver, typically "base + hardware index".
  pub fn from_fn(mut resolve: impl FnMut(IrqSource) -> u32) -> Self {
    let mut ids = [0; IrqSource::COUNT];
    for (slot, source) in ids.iter_mut().zip(IrqSource::ALL) {
      *slot = resolve(source);
    }
    Self { ids }
  }

  /// Consecutive ids starting at `base`, in hardware order. Ids wrap past
  /// `u32::MAX`.
  pub fn contiguous(base: u32) -> Self {
    Self::from_fn(|source| base.wrapping_add(source as u32))
  }

  pub fn lookup(&self, irq: u32) -> Option<IrqSource> {
    self.ids.iter().position(|&id| id == irq).map(|index| IrqSource::ALL[index])
  }

  pub fn id(&self, source: IrqSource) -> u32 {
    self.ids[source as usize]
  }
}

/// Sticky per-group flags raised by the interrupt path and consumed by a
/// detection pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pending {
  pub adc: bool,
  pub charger: bool,
}

impl Pending {
  pub(crate) fn raise(&mut self, group: CableGroup) {
    match group {
      CableGroup::Adc => self.adc = true,
      CableGroup::Charger => self.charger = true,
    }
  }

  /// Clear the flags set in `consumed`, leaving any raised since untouched.
  pub(crate) fn consume(&mut self, consumed: Pending) {
    self.adc &= !consumed.adc;
    self.charger &= !consumed.charger;
  }

  pub const fn any(&self) -> bool {
    self.adc || self.charger
  }
}

/// Answer to the interrupt layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqReturn {
  Handled,
}

impl<M, I, E, S> Max77804kMuic<M, I, S>
where
  M: RawMutex,
  I: I2c<SevenBitAddress, Error = E>,
  S: CableSink,
{
  /// Interrupt entry point for a platform interrupt id from the [`IrqMap`].
  ///
  /// Never blocks: raises a sticky flag and queues the detection worker.
  /// Always reports [`IrqReturn::Handled`].
  pub fn handle_irq(&self, irq: u32) -> IrqReturn {
    match self.irqs.lookup(irq) {
      Some(source) => self.handle_source(source),
      None => {
        error!("Cannot recognize IRQ({})", irq);
        IrqReturn::Handled
      }
    }
  }

  /// Same as [`Max77804kMuic::handle_irq`] for an already decoded source.
  pub fn handle_source(&self, source: IrqSource) -> IrqReturn {
    let Some(group) = source.group() else {
      trace!("{} acknowledged", source.name());
      return IrqReturn::Handled;
    };

    let queued = self.with_shared(|shared| {
      if shared.closing {
        return false;
      }
      shared.pending.raise(group);
      true
    });

    if queued {
      // Signalling twice before the worker wakes still yields one pass.
      self.work.signal(());
    } else {
      debug!("{} ignored, device removed", source.name());
    }
    IrqReturn::Handled
  }

  /// Feed a raw INT1..INT3 read through the demultiplexer, for platforms that
  /// read the latched interrupt registers themselves.
  pub fn handle_status(&self, int: [u8; INT_LEN]) -> IrqReturn {
    for source in IrqSource::decode(int) {
      self.handle_source(source);
    }
    IrqReturn::Handled
  }
}
