#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// Enumerated identifier for every field the integration can expose.
///
/// Variant order is the table declaration order: validation output and
/// binding both walk fields in this order, never in configuration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldId {
    // text sensors
    ProtocolId,
    SerialNumber,
    EepromVersionText,
    ChargingModeText,
    // QPIGS numeric sensors
    GridVoltage,
    GridFreq,
    AcOutputVoltage,
    AcOutputFreq,
    OutputApparentPower,
    OutputActivePower,
    OutputLoadPercent,
    BusVoltage,
    BatteryVoltage,
    BatteryChargingCurrent,
    BatteryCapacity,
    InverterTemp,
    PvInputCurrent,
    PvInputVoltage,
    BatteryVoltageFromScc,
    BatteryDischargeCurrent,
    PvChargingPower,
    FanOnVoltageOffset,
    // device status bits
    PvOrAcPoweringLoad,
    ConfigChanged,
    SccFwUpdated,
    LoadOn,
    ChargingOn,
    SccChargingOn,
    AcChargingOn,
    ChargingToFloat,
    InverterOn,
    DustproofInstalled,
    // charging / device mode
    ChargingModeSensor,
    DeviceModeSensor,
    DeviceModeText,
    // QFLAG switches
    BuzzerControl,
    OverloadBypass,
    DisplayEscapeToDefaultPage,
    OverloadRestart,
    OverTemperatureRestart,
    BacklightControl,
    AlarmPrimarySourceInterrupt,
    FaultCodeRecord,
    PowerSaving,
    DataLogPopup,
    GridChargeEnable,
    SolarFeedToGrid,
    // energy history
    EnergySolarToday,
    EnergySolarMonth,
    EnergySolarYear,
    EnergySolarTotal,
    EnergyInverterToday,
    EnergyInverterMonth,
    EnergyInverterYear,
    EnergyInverterTotal,
    // QPIWS
    WarningStatusText,
    // equalization (QBEQI)
    EqualizationEnable,
    EqualizationActive,
    EqualizationVoltage,
    EqualizationTime,
    EqualizationOverTime,
    EqualizationPeriod,
    EqualizationMaxCurrent,
    EqualizationElapsedTime,
    // QPIRI setpoints
    BatteryRechargeVoltage,
    BatteryRedischargeVoltage,
    MaxChargingCurrent,
    MaxAcChargingCurrent,
    AcOutputRatingFrequency,
    AcOutputRatingVoltage,
}

impl FieldId {
    /// All fields in table declaration order.
    pub const ALL: &'static [FieldId] = &[
        FieldId::ProtocolId,
        FieldId::SerialNumber,
        FieldId::EepromVersionText,
        FieldId::ChargingModeText,
        FieldId::GridVoltage,
        FieldId::GridFreq,
        FieldId::AcOutputVoltage,
        FieldId::AcOutputFreq,
        FieldId::OutputApparentPower,
        FieldId::OutputActivePower,
        FieldId::OutputLoadPercent,
        FieldId::BusVoltage,
        FieldId::BatteryVoltage,
        FieldId::BatteryChargingCurrent,
        FieldId::BatteryCapacity,
        FieldId::InverterTemp,
        FieldId::PvInputCurrent,
        FieldId::PvInputVoltage,
        FieldId::BatteryVoltageFromScc,
        FieldId::BatteryDischargeCurrent,
        FieldId::PvChargingPower,
        FieldId::FanOnVoltageOffset,
        FieldId::PvOrAcPoweringLoad,
        FieldId::ConfigChanged,
        FieldId::SccFwUpdated,
        FieldId::LoadOn,
        FieldId::ChargingOn,
        FieldId::SccChargingOn,
        FieldId::AcChargingOn,
        FieldId::ChargingToFloat,
        FieldId::InverterOn,
        FieldId::DustproofInstalled,
        FieldId::ChargingModeSensor,
        FieldId::DeviceModeSensor,
        FieldId::DeviceModeText,
        FieldId::BuzzerControl,
        FieldId::OverloadBypass,
        FieldId::DisplayEscapeToDefaultPage,
        FieldId::OverloadRestart,
        FieldId::OverTemperatureRestart,
        FieldId::BacklightControl,
        FieldId::AlarmPrimarySourceInterrupt,
        FieldId::FaultCodeRecord,
        FieldId::PowerSaving,
        FieldId::DataLogPopup,
        FieldId::GridChargeEnable,
        FieldId::SolarFeedToGrid,
        FieldId::EnergySolarToday,
        FieldId::EnergySolarMonth,
        FieldId::EnergySolarYear,
        FieldId::EnergySolarTotal,
        FieldId::EnergyInverterToday,
        FieldId::EnergyInverterMonth,
        FieldId::EnergyInverterYear,
        FieldId::EnergyInverterTotal,
        FieldId::WarningStatusText,
        FieldId::EqualizationEnable,
        FieldId::EqualizationActive,
        FieldId::EqualizationVoltage,
        FieldId::EqualizationTime,
        FieldId::EqualizationOverTime,
        FieldId::EqualizationPeriod,
        FieldId::EqualizationMaxCurrent,
        FieldId::EqualizationElapsedTime,
        FieldId::BatteryRechargeVoltage,
        FieldId::BatteryRedischargeVoltage,
        FieldId::MaxChargingCurrent,
        FieldId::MaxAcChargingCurrent,
        FieldId::AcOutputRatingFrequency,
        FieldId::AcOutputRatingVoltage,
    ];

    /// Position of this field in declaration order.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Display mode for a bounded numeric setpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberMode {
    Auto,
    Slider,
    Box,
}

impl NumberMode {
    /// Parse a configuration string, case-insensitively.
    pub fn from_config(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("auto") {
            Some(NumberMode::Auto)
        } else if value.eq_ignore_ascii_case("slider") {
            Some(NumberMode::Slider)
        } else if value.eq_ignore_ascii_case("box") {
            Some(NumberMode::Box)
        } else {
            None
        }
    }
}

impl Default for NumberMode {
    fn default() -> Self {
        NumberMode::Box
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_discriminant_order() {
        for (idx, field) in FieldId::ALL.iter().enumerate() {
            assert_eq!(field.index(), idx);
        }
    }

    #[test]
    fn number_mode_parsing_ignores_case() {
        assert_eq!(NumberMode::from_config("BOX"), Some(NumberMode::Box));
        assert_eq!(NumberMode::from_config("slider"), Some(NumberMode::Slider));
        assert_eq!(NumberMode::from_config("Auto"), Some(NumberMode::Auto));
        assert_eq!(NumberMode::from_config("dial"), None);
    }
}
