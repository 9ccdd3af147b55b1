#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Async, `no_std` driver for the MUIC (micro-USB interface controller) block
//! of the Maxim MAX77804K PMIC.
//!
//! The MUIC senses the resistance on the micro-USB ID pin and the charger
//! signature on D+/D-. This crate turns those readings into a debounced
//! "cable attached" state and publishes it to a [`CableSink`]:
//!
//! - Interrupts from the shared PMIC line are demultiplexed into ADC and
//!   charger event groups and coalesced into sticky flags
//! - A single worker future ([`Max77804kMuic::run`]) performs one deferred
//!   initial detection pass and then one pass per coalesced interrupt burst
//! - Every pass reads STATUS1..STATUS3 in one transaction, classifies it
//!   against the remembered [`CableType`], and publishes `USB` / `USB-HOST`
//! - ADC debounce is programmed into the control register that matches the
//!   PMIC revision
//!
//! ```no_run
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
//! use embedded_hal_async::{delay::DelayNs, i2c::{I2c, SevenBitAddress}};
//! use max77804k_muic::{Cable, CableSink, Config, IrqMap, Max77804kMuic};
//!
//! struct Gadget;
//!
//! impl CableSink for Gadget {
//!   fn set_state(&mut self, cable: Cable, attached: bool) {
//!     let _ = (cable, attached);
//!   }
//! }
//!
//! async fn example<I2C, D, E>(i2c: I2C, delay: D) -> Result<(), max77804k_muic::Error<E>>
//! where
//!   I2C: I2c<SevenBitAddress, Error = E>,
//!   D: DelayNs,
//! {
//!   let muic: Max77804kMuic<CriticalSectionRawMutex, _, _> =
//!     Max77804kMuic::new(i2c, Gadget, IrqMap::contiguous(32), Config::default());
//!   muic.initialize().await?;
//!   // Route the PMIC interrupt to `muic.handle_irq(..)`, then drive the worker.
//!   muic.run(delay).await;
//!   Ok(())
//! }
//! ```

#[macro_use]
mod fmt;

mod cable;
mod classify;
mod config;
mod debounce;
mod detect;
mod init;
mod irq;
mod reg;
mod rw;
mod status;
#[cfg(test)]
mod test_support;

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

pub use cable::{Cable, CableSink, CableType};
pub use classify::classify;
pub use config::*;
pub use debounce::{DebounceTime, PmicRevision};
pub use detect::Trigger;
pub use init::Identity;
pub use irq::{CableGroup, IrqMap, IrqReturn, IrqSource, Pending};
pub use status::{AdcCode, ChargerType, Status1, Status2, Status3, StatusSnapshot};

use rw::Bus;

/// Errors that can occur while interacting with the MUIC.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
  /// I²C bus transaction failed with the underlying driver error.
  I2c(E),
  /// PMIC_ID1 could not be read, so the debounce register is unknown.
  Revision(E),
  /// Debounce interval outside the four the chip supports.
  InvalidDebounceTime(u8),
}

/// Everything a detection pass reads and writes. Only touched with the
/// device lock held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MuicState {
  /// Last status block read from the chip.
  pub snapshot: StatusSnapshot,
  pub cable_type: CableType,
  /// ADC code seen by the last completed pass.
  pub adc: Option<AdcCode>,
  /// CHGTYP seen by the last completed pass. `None` until the first one.
  pub charger_type: Option<ChargerType>,
  pub vbus_voltage: bool,
  /// PMIC revision, read once at bring-up.
  pub revision: Option<PmicRevision>,
}

impl MuicState {
  pub(crate) fn record(&mut self, snapshot: StatusSnapshot) {
    self.snapshot = snapshot;
    self.adc = Some(snapshot.adc());
    self.charger_type = Some(snapshot.charger_type());
    self.vbus_voltage = snapshot.vbus_voltage();
  }
}

pub(crate) struct Device<I, S> {
  bus: Bus<I>,
  sink: S,
  state: MuicState,
}

/// Interrupt-side state. Small and `Copy` so the interrupt path only ever
/// does a load and a store inside a critical section.
#[derive(Clone, Copy, Default)]
pub(crate) struct Shared {
  pending: Pending,
  running: bool,
  closing: bool,
}

/// MUIC driver instance.
///
/// `M` selects the raw mutex guarding the device: `CriticalSectionRawMutex`
/// when interrupts are delivered from an ISR, `NoopRawMutex` when everything
/// runs on one executor.
pub struct Max77804kMuic<M: RawMutex, I, S> {
  device: Mutex<M, Device<I, S>>,
  shared: BlockingMutex<M, Cell<Shared>>,
  work: Signal<M, ()>,
  teardown: Signal<M, ()>,
  stopped: Signal<M, ()>,
  irqs: IrqMap,
  config: Config,
}

impl<M, I, E, S> Max77804kMuic<M, I, S>
where
  M: RawMutex,
  I: I2c<SevenBitAddress, Error = E>,
  S: CableSink,
{
  /// Create a driver instance around the shared PMIC bus.
  ///
  /// The chip is not touched until [`Max77804kMuic::initialize`] is called.
  pub fn new(i2c: I, sink: S, irqs: IrqMap, config: Config) -> Self {
    Self {
      device: Mutex::new(Device { bus: Bus::new(i2c), sink, state: MuicState::default() }),
      shared: BlockingMutex::new(Cell::new(Shared::default())),
      work: Signal::new(),
      teardown: Signal::new(),
      stopped: Signal::new(),
      irqs,
      config,
    }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Copy of the state left by the last completed pass.
  pub async fn state(&self) -> MuicState {
    self.device.lock().await.state
  }

  pub async fn cable_type(&self) -> CableType {
    self.device.lock().await.state.cable_type
  }

  /// Interrupt groups raised and not yet consumed by a pass.
  pub fn pending(&self) -> Pending {
    self.with_shared(|shared| shared.pending)
  }

  /// Give back the bus and the sink.
  pub fn release(self) -> (I, S) {
    let device = self.device.into_inner();
    (device.bus.release(), device.sink)
  }

  pub(crate) fn with_shared<R>(&self, f: impl FnOnce(&mut Shared) -> R) -> R {
    self.shared.lock(|cell| {
      let mut shared = cell.get();
      let result = f(&mut shared);
      cell.set(shared);
      result
    })
  }
}
