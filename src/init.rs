use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::reg::{MuicReg, CDETCTRL1_DCDTMR_MASK, INT_LEN};
use crate::{CableSink, DebounceTime, Error, Max77804kMuic, PmicRevision};

/// What bring-up found on the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Identity {
  /// MUIC ID register (vendor and chip revision).
  pub muic_id: u8,
  /// `None` when PMIC_ID1 could not be read.
  pub pmic_revision: Option<PmicRevision>,
  /// Debounce interval programmed, `None` if the chip kept its default.
  pub debounce_time: Option<DebounceTime>,
  /// INT1..INT3 as latched before bring-up. Reading them cleared them.
  pub latched: [u8; INT_LEN],
}

impl<M, I, E, S> Max77804kMuic<M, I, S>
where
  M: RawMutex,
  I: I2c<SevenBitAddress, Error = E>,
  S: CableSink,
{
  /// Bring the MUIC up.
  ///
  /// Caches the PMIC revision, programs the ADC debounce interval and the DCD
  /// timer, takes a first status snapshot, and clears latched interrupts so
  /// the platform can unmask the line. Debounce and DCD failures leave the
  /// chip on its power-on defaults and are only logged; the status, ID and
  /// interrupt reads must succeed.
  pub async fn initialize(&self) -> Result<Identity, Error<E>> {
    let mut guard = self.device.lock().await;
    let device = &mut *guard;

    let pmic_revision = match device.bus.read_pmic_revision().await {
      Ok(revision) => {
        info!("pmic_id1: {=u8:#04x}", revision.id());
        device.state.revision = Some(revision);
        Some(revision)
      }
      Err(_) => {
        warn!("Failed to read PMIC ID, keeping default ADC debounce");
        None
      }
    };

    let debounce_time = match pmic_revision {
      Some(revision) => match device.bus.write_debounce_time(revision, self.config.debounce_time).await {
        Ok(()) => Some(self.config.debounce_time),
        Err(_) => {
          warn!("failed to update ADC debounce time");
          None
        }
      },
      None => None,
    };

    if self.config.dcd_timer_2s && device.bus.update_muic(MuicReg::CdetCtrl1, CDETCTRL1_DCDTMR_MASK, 0).await.is_err() {
      warn!("failed to select 2 s DCD timer");
    }

    device.state.snapshot = device.bus.read_status().await?;

    let muic_id = device.bus.read_muic_u8(MuicReg::Id).await?;
    info!("MUIC device ID : {=u8:#x}", muic_id);

    let latched = device.bus.read_muic::<INT_LEN>(MuicReg::Int1).await?;

    Ok(Identity { muic_id, pmic_revision, debounce_time, latched })
  }

  /// Program the ADC debounce interval.
  ///
  /// Uses the revision cached by [`Max77804kMuic::initialize`], reading it
  /// once if bring-up could not.
  pub async fn set_debounce_time(&self, time: DebounceTime) -> Result<(), Error<E>> {
    let mut guard = self.device.lock().await;
    let device = &mut *guard;

    let revision = match device.state.revision {
      Some(revision) => revision,
      None => {
        let revision = device.bus.read_pmic_revision().await?;
        device.state.revision = Some(revision);
        revision
      }
    };

    device.bus.write_debounce_time(revision, time).await
  }

  /// [`Max77804kMuic::set_debounce_time`] by nominal milliseconds.
  pub async fn set_debounce_time_ms(&self, ms: u8) -> Result<(), Error<E>> {
    let time = DebounceTime::from_millis(ms).map_err(|ms| {
      error!("Invalid ADC debounce time {=u8} ms", ms);
      Error::InvalidDebounceTime(ms)
    })?;
    self.set_debounce_time(time).await
  }
}
