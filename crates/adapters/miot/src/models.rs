//! The model capability table.
//!
//! One row per supported heater model, data not code branches: each row
//! is an immutable [`ModelProfile`] naming the MiOT (siid, piid) address
//! of every feature the model has. Adding a model is adding one row.
//!
//! Property addresses follow the vendor MiOT instance specs as used by
//! the upstream device library. The za-family routes power through
//! service 2 property 2; the mc-family uses service 2 property 1 and a
//! different placement for everything else — exactly the per-model
//! variance the profile layer exists to hide.

use std::collections::{BTreeMap, BTreeSet};

use miheater_domain::feature::Feature;
use miheater_domain::led::LedMode;
use miheater_domain::profile::ModelProfile;
use miheater_domain::property::PropertySpec;

pub const MODEL_ZA1: &str = "zhimi.heater.za1";
pub const MODEL_ZA2: &str = "zhimi.heater.za2";
pub const MODEL_ZB1: &str = "zhimi.heater.zb1";
pub const MODEL_MA2: &str = "zhimi.heater.ma2";
pub const MODEL_MC2: &str = "zhimi.heater.mc2";
pub const MODEL_NB1: &str = "zhimi.heater.nb1";

/// Every model string the registry has a row for.
pub const SUPPORTED_MODELS: [&str; 6] = [
    MODEL_ZA1, MODEL_ZA2, MODEL_ZB1, MODEL_MA2, MODEL_MC2, MODEL_NB1,
];

/// Resolve a reported model string to its capability profile.
///
/// Exact-match lookup; `None` means the model is unknown and the host
/// should fall back to manual model selection.
#[must_use]
pub fn lookup(model: &str) -> Option<ModelProfile> {
    match model {
        MODEL_ZA1 => Some(za1()),
        MODEL_ZA2 => Some(za2()),
        MODEL_ZB1 => Some(zb1()),
        MODEL_MA2 => Some(ma2()),
        MODEL_MC2 => Some(mc2()),
        MODEL_NB1 => Some(nb1()),
        _ => None,
    }
}

/// Smart Space Heater 1 — za-family layout, no humidity sensor, on/off
/// LED only.
fn za1() -> ModelProfile {
    ModelProfile {
        model: MODEL_ZA1.to_string(),
        temp_min: 16.0,
        temp_max: 28.0,
        supports_buzzer: true,
        supports_child_lock: true,
        supports_led: true,
        led_modes: BTreeSet::from([LedMode::Bright, LedMode::Off]),
        supports_delay_off: true,
        delay_off_max_secs: 28_800,
        supports_humidity: false,
        properties: BTreeMap::from([
            (Feature::Power, PropertySpec::new(2, 2)),
            (Feature::TargetTemperature, PropertySpec::new(2, 6)),
            (Feature::Buzzer, PropertySpec::new(3, 1)),
            (Feature::DelayOff, PropertySpec::new(4, 1)),
            (Feature::Temperature, PropertySpec::new(5, 8)),
            (Feature::ChildLock, PropertySpec::new(6, 1)),
            (Feature::LedBrightness, PropertySpec::new(7, 3)),
        ]),
    }
}

/// Smart Space Heater 1S — adds the humidity sensor and the dim LED
/// level to the za-family layout.
fn za2() -> ModelProfile {
    ModelProfile {
        model: MODEL_ZA2.to_string(),
        temp_min: 16.0,
        temp_max: 28.0,
        supports_buzzer: true,
        supports_child_lock: true,
        supports_led: true,
        led_modes: BTreeSet::from([LedMode::Bright, LedMode::Dim, LedMode::Off]),
        supports_delay_off: true,
        delay_off_max_secs: 28_800,
        supports_humidity: true,
        properties: BTreeMap::from([
            (Feature::Power, PropertySpec::new(2, 2)),
            (Feature::TargetTemperature, PropertySpec::new(2, 6)),
            (Feature::Buzzer, PropertySpec::new(3, 1)),
            (Feature::DelayOff, PropertySpec::new(4, 1)),
            (Feature::RelativeHumidity, PropertySpec::new(5, 7)),
            (Feature::Temperature, PropertySpec::new(5, 8)),
            (Feature::ChildLock, PropertySpec::new(6, 1)),
            (Feature::LedBrightness, PropertySpec::new(7, 3)),
        ]),
    }
}

/// Smart Space Heater S — za2 electronics in a different shell; same
/// addresses and capabilities.
fn zb1() -> ModelProfile {
    ModelProfile {
        model: MODEL_ZB1.to_string(),
        ..za2()
    }
}

/// Mi Smart Baseboard Heater 2 — mc-family layout, narrower range, no
/// humidity, on/off LED.
fn ma2() -> ModelProfile {
    ModelProfile {
        model: MODEL_MA2.to_string(),
        temp_min: 18.0,
        temp_max: 28.0,
        supports_buzzer: true,
        supports_child_lock: true,
        supports_led: true,
        led_modes: BTreeSet::from([LedMode::Bright, LedMode::Off]),
        supports_delay_off: true,
        delay_off_max_secs: 43_200,
        supports_humidity: false,
        properties: BTreeMap::from([
            (Feature::Power, PropertySpec::new(2, 1)),
            (Feature::TargetTemperature, PropertySpec::new(2, 5)),
            (Feature::DelayOff, PropertySpec::new(3, 1)),
            (Feature::Temperature, PropertySpec::new(4, 7)),
            (Feature::ChildLock, PropertySpec::new(5, 1)),
            (Feature::Buzzer, PropertySpec::new(6, 1)),
            (Feature::LedBrightness, PropertySpec::new(7, 3)),
        ]),
    }
}

/// Mi Smart Space Heater S — same layout as ma2.
fn mc2() -> ModelProfile {
    ModelProfile {
        model: MODEL_MC2.to_string(),
        ..ma2()
    }
}

/// Mi Smart Space Heater 1S international — mc-family layout with the
/// dim LED level and a wider settable range.
fn nb1() -> ModelProfile {
    ModelProfile {
        model: MODEL_NB1.to_string(),
        temp_min: 16.0,
        temp_max: 32.0,
        led_modes: BTreeSet::from([LedMode::Bright, LedMode::Dim, LedMode::Off]),
        ..ma2()
    }
}
