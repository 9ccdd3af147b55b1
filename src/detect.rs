use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{classify, Cable, CableSink, Max77804kMuic, Pending, StatusSnapshot};

/// What started a detection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
  /// The deferred pass run once after bring-up.
  Initial,
  /// One or more coalesced interrupts.
  Interrupt,
  /// Work still queued when the device was removed.
  Drain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetectState {
  Idle,
  Reading,
  Classifying(StatusSnapshot),
  Publishing(bool),
}

impl<M, I, E, S> Max77804kMuic<M, I, S>
where
  M: RawMutex,
  I: I2c<SevenBitAddress, Error = E>,
  S: CableSink,
{
  /// Detection worker. Drive this future for as long as the device exists.
  ///
  /// Waits `initial_detect_delay_ms`, runs the initial pass, then runs one
  /// pass each time [`Max77804kMuic::handle_irq`] queues work. Returns once
  /// [`Max77804kMuic::remove`] is called and any queued pass has finished.
  pub async fn run<D: DelayNs>(&self, mut delay: D) {
    let start = self.with_shared(|shared| {
      if shared.running || shared.closing {
        return false;
      }
      shared.running = true;
      true
    });
    if !start {
      warn!("detection worker already running or device removed");
      return;
    }

    let initial = select(delay.delay_ms(self.config.initial_detect_delay_ms), self.teardown.wait()).await;

    match initial {
      Either::First(()) => {
        if let Some(attached) = self.detect(Trigger::Initial).await {
          info!("Initial cable detection: attached = {}", attached);
        }
        self.serve().await;
      }
      Either::Second(()) => {
        // Nothing may be published before the initial pass, so queued
        // interrupts are dropped with it.
        info!("initial cable detection cancelled");
        self.work.reset();
      }
    }

    self.with_shared(|shared| shared.running = false);
    self.stopped.signal(());
  }

  /// Stop the device: refuse new interrupt work, cancel the initial pass if
  /// it has not started, and wait for the worker to finish what is queued.
  ///
  /// May be called more than once, also concurrently. Every caller returns
  /// once the worker has stopped.
  pub async fn remove(&self) {
    let running = self.with_shared(|shared| {
      shared.closing = true;
      shared.running
    });
    info!("removing MUIC device");
    if running {
      self.teardown.signal(());
      self.stopped.wait().await;
      // Pass the wake on to any other caller waiting here.
      self.stopped.signal(());
    }
  }

  async fn serve(&self) {
    loop {
      match select(self.work.wait(), self.teardown.wait()).await {
        Either::First(()) => {
          self.detect(Trigger::Interrupt).await;
        }
        Either::Second(()) => {
          if self.work.signaled() {
            self.work.reset();
            self.detect(Trigger::Drain).await;
          }
          return;
        }
      }
    }
  }

  /// One detection pass under the device lock. Returns the published state,
  /// or `None` when the status read failed and nothing changed.
  pub(crate) async fn detect(&self, trigger: Trigger) -> Option<bool> {
    let mut guard = self.device.lock().await;
    let device = &mut *guard;
    // The initial pass publishes state only; interrupt flags belong to the
    // triggered pass that follows.
    let consumed = match trigger {
      Trigger::Initial => Pending::default(),
      Trigger::Interrupt | Trigger::Drain => self.pending(),
    };

    let mut state = DetectState::Reading;
    let mut published = None;

    loop {
      state = match state {
        DetectState::Idle => break,

        DetectState::Reading => match device.bus.read_status().await {
          Ok(snapshot) => DetectState::Classifying(snapshot),
          Err(_) => {
            error!("Cannot read STATUS registers ({})", trigger);
            DetectState::Idle
          }
        },

        DetectState::Classifying(snapshot) => {
          let attached = classify(&snapshot, device.state.cable_type, device.state.charger_type);
          trace!("{} adc={} chgtyp={} -> {}", trigger, snapshot.adc(), snapshot.charger_type(), attached);
          device.state.record(snapshot);
          DetectState::Publishing(attached)
        }

        DetectState::Publishing(attached) => {
          device.sink.set_state(Cable::Usb, attached);
          // No OTG sourcing: host mode is never reported.
          device.sink.set_state(Cable::UsbHost, false);

          if consumed.adc {
            info!("ADC IRQ, attached = {}", attached);
          }
          if consumed.charger {
            info!("CHG IRQ, attached = {}", attached);
          }
          self.with_shared(|shared| shared.pending.consume(consumed));

          published = Some(attached);
          DetectState::Idle
        }
      };
    }

    published
  }
}
