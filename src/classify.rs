//! Attached/detached decision over one status snapshot.
//!
//! The decision leans towards "attached": every branch below can only flip
//! the result to detached on specific evidence, and anything unrecognised
//! keeps the cable attached.

use crate::{AdcCode, CableType, ChargerType, StatusSnapshot};

/// Decide whether a cable is attached.
///
/// `previous` is the cable type remembered from earlier passes and
/// `last_charger_type` the CHGTYP recorded by the previous successful pass
/// (`None` before the first one).
pub fn classify(snapshot: &StatusSnapshot, previous: CableType, last_charger_type: Option<ChargerType>) -> bool {
  let adc = snapshot.adc();
  let charger_type = snapshot.charger_type();

  match adc {
    AdcCode::Ground => true,

    // Recognised accessory: only the charger signature vanishing while we
    // were attached to something counts as a detach. With nothing recorded
    // yet there is no edge to see.
    adc if adc.is_unhandled_accessory() => {
      let charger_vanished = charger_type == ChargerType::NoVoltage
        && matches!(last_charger_type, Some(last) if last != charger_type);
      !(previous != CableType::None && charger_vanished)
    }

    AdcCode::Open if !snapshot.adc_error() => match charger_type {
      // DxOVP set: the port is faulted, not empty.
      ChargerType::NoVoltage => snapshot.dx_overvoltage(),
      charger_type if charger_type.is_charging_port() => !previous.requires_ground_reference(),
      _ => true,
    },

    _ => true,
  }
}
