use crate::DebounceTime;

/// Delay before the first detection pass, giving the rest of the platform
/// time to come up before a cable state is published.
pub const DEFAULT_INITIAL_DETECT_DELAY_MS: u32 = 3000;

/// Bring-up and scheduling parameters.
///
/// Nothing is sent to the chip until [`crate::Max77804kMuic::initialize`].
///
/// # Example
/// ```no_run
/// use max77804k_muic::{Config, DebounceTime};
///
/// let config = Config::default()
///   .with_debounce_time(DebounceTime::Ms10)
///   .with_initial_detect_delay_ms(1500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
  pub initial_detect_delay_ms: u32,
  pub debounce_time: DebounceTime,
  /// Select the 2 s data-contact-detect timeout in CDETCTRL1.
  pub dcd_timer_2s: bool,
}

impl Config {
  pub const fn new(initial_detect_delay_ms: u32, debounce_time: DebounceTime, dcd_timer_2s: bool) -> Self {
    Self { initial_detect_delay_ms, debounce_time, dcd_timer_2s }
  }

  pub const fn with_initial_detect_delay_ms(mut self, ms: u32) -> Self {
    self.initial_detect_delay_ms = ms;
    self
  }

  pub const fn with_debounce_time(mut self, debounce_time: DebounceTime) -> Self {
    self.debounce_time = debounce_time;
    self
  }

  pub const fn with_dcd_timer_2s(mut self, enabled: bool) -> Self {
    self.dcd_timer_2s = enabled;
    self
  }
}

impl Default for Config {
  fn default() -> Self {
    Self::new(DEFAULT_INITIAL_DETECT_DELAY_MS, DebounceTime::Ms25, true)
  }
}
