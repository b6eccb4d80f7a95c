//! The descriptor table itself. Units, precisions, icons, wire commands and
//! bounds are the PIP-protocol values the runtime component expects; entries
//! are grouped by the query that feeds them (QPIGS, QFLAG, QBEQI, QPIRI).

use types::FieldId;

use crate::{
    EntityDescriptor, EntityKind, NumberSpec, SelectSpec, SensorSpec, SwitchSpec, TextSpec,
};

const fn measurement(
    field: FieldId,
    key: &'static str,
    slot: &'static str,
    unit: &'static str,
    precision: u8,
    device_class: &'static str,
) -> EntityDescriptor {
    EntityDescriptor {
        field,
        key,
        slot,
        kind: EntityKind::Sensor(SensorSpec {
            unit: Some(unit),
            precision,
            device_class: Some(device_class),
            state_class: Some("measurement"),
            icon: None,
        }),
    }
}

const fn energy(
    field: FieldId,
    key: &'static str,
    slot: &'static str,
    icon: &'static str,
) -> EntityDescriptor {
    EntityDescriptor {
        field,
        key,
        slot,
        kind: EntityKind::Sensor(SensorSpec {
            unit: Some("kWh"),
            precision: 2,
            device_class: Some("energy"),
            state_class: Some("total_increasing"),
            icon: Some(icon),
        }),
    }
}

const fn plain_sensor(
    field: FieldId,
    key: &'static str,
    slot: &'static str,
    unit: Option<&'static str>,
    precision: u8,
    icon: Option<&'static str>,
) -> EntityDescriptor {
    EntityDescriptor {
        field,
        key,
        slot,
        kind: EntityKind::Sensor(SensorSpec {
            unit,
            precision,
            device_class: None,
            state_class: None,
            icon,
        }),
    }
}

const fn text(field: FieldId, key: &'static str, slot: &'static str) -> EntityDescriptor {
    EntityDescriptor {
        field,
        key,
        slot,
        kind: EntityKind::TextSensor(TextSpec { icon: None }),
    }
}

const fn text_icon(
    field: FieldId,
    key: &'static str,
    slot: &'static str,
    icon: &'static str,
) -> EntityDescriptor {
    EntityDescriptor {
        field,
        key,
        slot,
        kind: EntityKind::TextSensor(TextSpec { icon: Some(icon) }),
    }
}

const fn binary(field: FieldId, key: &'static str, slot: &'static str) -> EntityDescriptor {
    EntityDescriptor {
        field,
        key,
        slot,
        kind: EntityKind::BinarySensor,
    }
}

const fn switch(
    field: FieldId,
    key: &'static str,
    slot: &'static str,
    icon: &'static str,
) -> EntityDescriptor {
    EntityDescriptor {
        field,
        key,
        slot,
        kind: EntityKind::Switch(SwitchSpec { icon }),
    }
}

const fn select(
    field: FieldId,
    key: &'static str,
    slot: &'static str,
    options: &'static [(&'static str, &'static str)],
    command_prefix: &'static str,
    status_command: &'static str,
    response_index: usize,
) -> EntityDescriptor {
    EntityDescriptor {
        field,
        key,
        slot,
        kind: EntityKind::Select(SelectSpec {
            options,
            command_prefix,
            status_command,
            response_index,
        }),
    }
}

#[allow(clippy::too_many_arguments)]
const fn number(
    field: FieldId,
    key: &'static str,
    slot: &'static str,
    command_prefix: &'static str,
    format: &'static str,
    min: f32,
    max: f32,
    step: f32,
    unit: &'static str,
) -> EntityDescriptor {
    EntityDescriptor {
        field,
        key,
        slot,
        kind: EntityKind::Number(NumberSpec {
            command_prefix,
            format,
            min,
            max,
            step,
            unit,
        }),
    }
}

pub static DESCRIPTORS: &[EntityDescriptor] = &[
    // identity and firmware text sensors
    text(FieldId::ProtocolId, "protocol_id", "set_protocol_id"),
    text(FieldId::SerialNumber, "serial_number", "set_serial_number"),
    text(
        FieldId::EepromVersionText,
        "eeprom_version_text",
        "set_eeprom_version_text",
    ),
    text(
        FieldId::ChargingModeText,
        "charging_mode_text",
        "set_charging_mode_text",
    ),
    // QPIGS measurements
    measurement(
        FieldId::GridVoltage,
        "grid_voltage",
        "set_grid_voltage",
        "V",
        1,
        "voltage",
    ),
    measurement(
        FieldId::GridFreq,
        "grid_freq",
        "set_grid_freq",
        "Hz",
        2,
        "frequency",
    ),
    measurement(
        FieldId::AcOutputVoltage,
        "ac_output_voltage",
        "set_ac_output_voltage",
        "V",
        1,
        "voltage",
    ),
    measurement(
        FieldId::AcOutputFreq,
        "ac_output_freq",
        "set_ac_output_freq",
        "Hz",
        2,
        "frequency",
    ),
    measurement(
        FieldId::OutputApparentPower,
        "output_apparent_power",
        "set_output_apparent_power",
        "VA",
        0,
        "power",
    ),
    measurement(
        FieldId::OutputActivePower,
        "output_active_power",
        "set_output_active_power",
        "W",
        0,
        "power",
    ),
    measurement(
        FieldId::OutputLoadPercent,
        "output_load_percent",
        "set_output_load_percent",
        "%",
        0,
        "power",
    ),
    measurement(
        FieldId::BusVoltage,
        "bus_voltage",
        "set_bus_voltage",
        "V",
        1,
        "voltage",
    ),
    measurement(
        FieldId::BatteryVoltage,
        "battery_voltage",
        "set_battery_voltage",
        "V",
        2,
        "voltage",
    ),
    measurement(
        FieldId::BatteryChargingCurrent,
        "battery_charging_current",
        "set_battery_charging_current",
        "A",
        2,
        "current",
    ),
    measurement(
        FieldId::BatteryCapacity,
        "battery_capacity",
        "set_battery_capacity",
        "%",
        0,
        "battery",
    ),
    measurement(
        FieldId::InverterTemp,
        "inverter_temp",
        "set_inverter_temp",
        "°C",
        0,
        "temperature",
    ),
    measurement(
        FieldId::PvInputCurrent,
        "pv_input_current",
        "set_pv_input_current",
        "A",
        2,
        "current",
    ),
    measurement(
        FieldId::PvInputVoltage,
        "pv_input_voltage",
        "set_pv_input_voltage",
        "V",
        1,
        "voltage",
    ),
    measurement(
        FieldId::BatteryVoltageFromScc,
        "battery_voltage_from_scc",
        "set_battery_voltage_from_scc",
        "V",
        2,
        "voltage",
    ),
    measurement(
        FieldId::BatteryDischargeCurrent,
        "battery_discharge_current",
        "set_battery_discharge_current",
        "A",
        2,
        "current",
    ),
    measurement(
        FieldId::PvChargingPower,
        "pv_charging_power",
        "set_pv_charging_power",
        "W",
        0,
        "power",
    ),
    measurement(
        FieldId::FanOnVoltageOffset,
        "fan_on_voltage_offset",
        "set_fan_on_voltage_offset",
        "V",
        2,
        "voltage",
    ),
    // device status bits
    binary(
        FieldId::PvOrAcPoweringLoad,
        "pv_or_ac_powering_load",
        "set_pv_or_ac_powering_load",
    ),
    binary(FieldId::ConfigChanged, "config_changed", "set_config_changed"),
    binary(FieldId::SccFwUpdated, "scc_fw_updated", "set_scc_fw_updated"),
    binary(FieldId::LoadOn, "load_on", "set_load_on"),
    binary(FieldId::ChargingOn, "charging_on", "set_charging_on"),
    binary(
        FieldId::SccChargingOn,
        "scc_charging_on",
        "set_scc_charging_on",
    ),
    binary(FieldId::AcChargingOn, "ac_charging_on", "set_ac_charging_on"),
    binary(
        FieldId::ChargingToFloat,
        "charging_to_float",
        "set_charging_to_float",
    ),
    binary(FieldId::InverterOn, "inverter_on", "set_inverter_on"),
    binary(
        FieldId::DustproofInstalled,
        "dustproof_installed",
        "set_dustproof_installed",
    ),
    // charging / device mode
    plain_sensor(
        FieldId::ChargingModeSensor,
        "charging_mode_sensor",
        "set_charging_mode_sensor",
        None,
        0,
        Some("mdi:battery-charging"),
    ),
    text_icon(
        FieldId::DeviceModeSensor,
        "device_mode_sensor",
        "set_device_mode_sensor",
        "mdi:power-settings",
    ),
    text_icon(
        FieldId::DeviceModeText,
        "device_mode_text",
        "set_device_mode_text",
        "mdi:power-settings",
    ),
    // QFLAG switches
    switch(
        FieldId::BuzzerControl,
        "buzzer_control",
        "set_buzzer_control",
        "mdi:volume-high",
    ),
    switch(
        FieldId::OverloadBypass,
        "overload_bypass",
        "set_overload_bypass",
        "mdi:flash-alert",
    ),
    switch(
        FieldId::DisplayEscapeToDefaultPage,
        "display_escape_to_default_page",
        "set_display_escape_to_default_page",
        "mdi:monitor",
    ),
    switch(
        FieldId::OverloadRestart,
        "overload_restart",
        "set_overload_restart",
        "mdi:restart",
    ),
    switch(
        FieldId::OverTemperatureRestart,
        "over_temperature_restart",
        "set_over_temperature_restart",
        "mdi:thermometer-alert",
    ),
    switch(
        FieldId::BacklightControl,
        "backlight_control",
        "set_backlight_control",
        "mdi:brightness-5",
    ),
    switch(
        FieldId::AlarmPrimarySourceInterrupt,
        "alarm_primary_source_interrupt",
        "set_alarm_primary_source_interrupt",
        "mdi:bell-alert",
    ),
    switch(
        FieldId::FaultCodeRecord,
        "fault_code_record",
        "set_fault_code_record",
        "mdi:file-document-alert",
    ),
    switch(
        FieldId::PowerSaving,
        "power_saving",
        "set_power_saving",
        "mdi:power-plug-off",
    ),
    switch(
        FieldId::DataLogPopup,
        "data_log_popup",
        "set_data_log_popup",
        "mdi:chart-box-outline",
    ),
    switch(
        FieldId::GridChargeEnable,
        "grid_charge_enable",
        "set_grid_charge_enable",
        "mdi:server-network",
    ),
    switch(
        FieldId::SolarFeedToGrid,
        "solar_feed_to_grid",
        "set_solar_feed_to_grid",
        "mdi:database-alert",
    ),
    // energy history
    energy(
        FieldId::EnergySolarToday,
        "energy_solar_today",
        "set_energy_solar_today",
        "mdi:solar-power",
    ),
    energy(
        FieldId::EnergySolarMonth,
        "energy_solar_month",
        "set_energy_solar_month",
        "mdi:calendar-month",
    ),
    energy(
        FieldId::EnergySolarYear,
        "energy_solar_year",
        "set_energy_solar_year",
        "mdi:calendar",
    ),
    energy(
        FieldId::EnergySolarTotal,
        "energy_solar_total",
        "set_energy_solar_total",
        "mdi:calendar",
    ),
    energy(
        FieldId::EnergyInverterToday,
        "energy_inverter_today",
        "set_energy_inverter_today",
        "mdi:flash",
    ),
    energy(
        FieldId::EnergyInverterMonth,
        "energy_inverter_month",
        "set_energy_inverter_month",
        "mdi:calendar-month",
    ),
    energy(
        FieldId::EnergyInverterYear,
        "energy_inverter_year",
        "set_energy_inverter_year",
        "mdi:calendar",
    ),
    energy(
        FieldId::EnergyInverterTotal,
        "energy_inverter_total",
        "set_energy_inverter_total",
        "mdi:calendar",
    ),
    // QPIWS
    text(
        FieldId::WarningStatusText,
        "warning_status_text",
        "set_warning_status_text",
    ),
    // equalization selects (QBEQI feeds both status queries)
    select(
        FieldId::EqualizationEnable,
        "equalization_enable",
        "set_equalization_enable",
        &[("Disabled", "0"), ("Enabled", "1")],
        "PBEQE",
        "QBEQI",
        0,
    ),
    select(
        FieldId::EqualizationActive,
        "equalization_active",
        "set_equalization_active",
        &[("Inactive", "0"), ("Active", "1")],
        "PBEQA",
        "QBEQI",
        9,
    ),
    // equalization setpoints
    number(
        FieldId::EqualizationVoltage,
        "equalization_voltage",
        "set_equalization_voltage",
        "PBEQV",
        "%2.2f",
        48.0,
        61.0,
        0.1,
        "V",
    ),
    number(
        FieldId::EqualizationTime,
        "equalization_time",
        "set_equalization_time",
        "PBEQT",
        "%3d",
        5.0,
        900.0,
        5.0,
        "min",
    ),
    number(
        FieldId::EqualizationOverTime,
        "equalization_over_time",
        "set_equalization_over_time",
        "PBEQOT",
        "%3d",
        5.0,
        900.0,
        5.0,
        "min",
    ),
    number(
        FieldId::EqualizationPeriod,
        "equalization_period",
        "set_equalization_period",
        "PBEQP",
        "%3d",
        0.0,
        90.0,
        1.0,
        "d",
    ),
    plain_sensor(
        FieldId::EqualizationMaxCurrent,
        "equalization_max_current",
        "set_equalization_max_current",
        Some("A"),
        0,
        None,
    ),
    plain_sensor(
        FieldId::EqualizationElapsedTime,
        "equalization_elapsed_time",
        "set_equalization_elapsed_time",
        Some("min"),
        0,
        None,
    ),
    // QPIRI setpoints
    number(
        FieldId::BatteryRechargeVoltage,
        "battery_recharge_voltage",
        "set_battery_recharge_voltage",
        "PBCV",
        "%2.1f",
        42.0,
        51.0,
        1.0,
        "V",
    ),
    number(
        FieldId::BatteryRedischargeVoltage,
        "battery_redischarge_voltage",
        "set_battery_redischarge_voltage",
        "PBDV",
        "%2.1f",
        48.0,
        58.0,
        1.0,
        "V",
    ),
    number(
        FieldId::MaxChargingCurrent,
        "max_charging_current",
        "set_max_charging_current",
        "MNCHGC",
        "%3d",
        10.0,
        120.0,
        10.0,
        "A",
    ),
    number(
        FieldId::MaxAcChargingCurrent,
        "max_ac_charging_current",
        "set_max_ac_charging_current",
        "MUCHGC",
        "%3d",
        2.0,
        100.0,
        10.0,
        "A",
    ),
    number(
        FieldId::AcOutputRatingFrequency,
        "ac_output_rating_frequency",
        "set_ac_output_rating_frequency",
        "F",
        "%2d",
        50.0,
        60.0,
        10.0,
        "Hz",
    ),
    number(
        FieldId::AcOutputRatingVoltage,
        "ac_output_rating_voltage",
        "set_ac_output_rating_voltage",
        "V",
        "%3d",
        220.0,
        240.0,
        10.0,
        "V",
    ),
];
