//! Fake register file and sink shared by the unit tests.

use std::collections::VecDeque;
use std::vec::Vec;

use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, Operation, SevenBitAddress};

use crate::reg::{MuicReg, MUIC_I2C_ADDR, PMIC_I2C_ADDR, STATUS_LEN};
use crate::{Cable, CableSink, Config, IrqMap, Max77804kMuic};

pub(crate) const TEST_IRQ_BASE: u32 = 200;

pub(crate) type TestMuic = Max77804kMuic<NoopRawMutex, FakeBus, RecordingSink>;

pub(crate) fn muic_with(bus: FakeBus) -> TestMuic {
  Max77804kMuic::new(bus, RecordingSink::default(), IrqMap::contiguous(TEST_IRQ_BASE), Config::default())
}

/// PMIC and MUIC register files behind one fake I²C bus.
pub(crate) struct FakeBus {
  pub muic: [u8; 256],
  pub pmic: [u8; 256],
  /// Values returned by the next STATUS1 block reads, before falling back to
  /// the register file.
  pub status_script: VecDeque<[u8; STATUS_LEN]>,
  /// Every register write as (address, register, value).
  pub writes: Vec<(u8, u8, u8)>,
  pub status_reads: usize,
  pub pmic_reads: usize,
  pub fail_reads: bool,
  pub fail_address: Option<u8>,
  /// Yield to the executor once per transaction.
  pub yield_on_transfer: bool,
}

impl Default for FakeBus {
  fn default() -> Self {
    Self {
      muic: [0; 256],
      pmic: [0; 256],
      status_script: VecDeque::new(),
      writes: Vec::new(),
      status_reads: 0,
      pmic_reads: 0,
      fail_reads: false,
      fail_address: None,
      yield_on_transfer: false,
    }
  }
}

impl FakeBus {
  pub fn with_status(status: [u8; STATUS_LEN]) -> Self {
    let mut bus = Self::default();
    let base = MuicReg::Status1 as usize;
    bus.muic[base..base + STATUS_LEN].copy_from_slice(&status);
    bus
  }

  pub fn script_status(&mut self, status: [u8; STATUS_LEN]) {
    self.status_script.push_back(status);
  }

  pub fn wrote(&self, address: u8, reg: u8) -> bool {
    self.writes.iter().any(|&(a, r, _)| a == address && r == reg)
  }

  fn read_into(&mut self, address: u8, reg: u8, buf: &mut [u8]) {
    if address == PMIC_I2C_ADDR {
      self.pmic_reads += 1;
      for (i, b) in buf.iter_mut().enumerate() {
        *b = self.pmic[reg as usize + i];
      }
      return;
    }

    if reg == MuicReg::Status1 as u8 {
      self.status_reads += 1;
      if let Some(status) = self.status_script.pop_front() {
        buf.copy_from_slice(&status[..buf.len()]);
        return;
      }
    }

    for (i, b) in buf.iter_mut().enumerate() {
      let index = reg as usize + i;
      *b = self.muic[index];
      // INT1..INT3 clear on read.
      if (MuicReg::Int1 as usize..=MuicReg::Int3 as usize).contains(&index) {
        self.muic[index] = 0;
      }
    }
  }
}

impl ErrorType for FakeBus {
  type Error = ErrorKind;
}

impl I2c<SevenBitAddress> for FakeBus {
  async fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
    if self.yield_on_transfer {
      yield_now().await;
    }
    if self.fail_address == Some(address) {
      return Err(ErrorKind::Other);
    }
    assert!(address == MUIC_I2C_ADDR || address == PMIC_I2C_ADDR, "unexpected address {address:#04x}");

    let mut pointer = 0u8;
    for operation in operations.iter_mut() {
      match operation {
        Operation::Write(bytes) => {
          pointer = bytes[0];
          for (i, &value) in bytes[1..].iter().enumerate() {
            let reg = pointer + i as u8;
            let file = if address == PMIC_I2C_ADDR { &mut self.pmic } else { &mut self.muic };
            file[reg as usize] = value;
            self.writes.push((address, reg, value));
          }
        }
        Operation::Read(buf) => {
          if self.fail_reads {
            return Err(ErrorKind::Other);
          }
          self.read_into(address, pointer, buf);
        }
      }
    }
    Ok(())
  }
}

/// Sink that remembers every publication in order.
#[derive(Default)]
pub(crate) struct RecordingSink {
  pub events: Vec<(Cable, bool)>,
}

impl CableSink for RecordingSink {
  fn set_state(&mut self, cable: Cable, attached: bool) {
    self.events.push((cable, attached));
  }
}

/// Delay that elapses immediately.
pub(crate) struct NoDelay;

impl DelayNs for NoDelay {
  async fn delay_ns(&mut self, _ns: u32) {}
}

/// Delay that never elapses.
pub(crate) struct NeverDelay;

impl DelayNs for NeverDelay {
  async fn delay_ns(&mut self, _ns: u32) {
    core::future::pending::<()>().await
  }
}
