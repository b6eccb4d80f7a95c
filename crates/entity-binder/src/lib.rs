#![allow(dead_code)]

//! Binding emitter: turns a validated configuration into live entity
//! instances attached to one controller. Registration goes through a closed
//! slot table keyed by `FieldId`; the `set_<key>` names exist for the
//! journal and diagnostics, never for dispatch.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{info, warn};

use config_schema::{
    BinarySettings, SelectSettings, SensorSettings, SwitchSettings, TextSettings, ValidatedConfig,
    ValidatedEntry, ValidatedSettings,
};
use entity_registry::descriptor;
use types::{FieldId, NumberMode};

/// Numeric sensor instance as handed to the runtime component.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorEntity {
    pub key: &'static str,
    pub name: Option<String>,
    pub unit: Option<&'static str>,
    pub precision: u8,
    pub device_class: Option<&'static str>,
    pub state_class: Option<&'static str>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextSensorEntity {
    pub key: &'static str,
    pub name: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinarySensorEntity {
    pub key: &'static str,
    pub name: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchEntity {
    pub key: &'static str,
    pub object_id: String,
    pub name: Option<String>,
    pub icon: String,
}

/// Select instance. Options, parameters and the wire commands are carried
/// through untouched for the protocol component.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectEntity {
    pub key: &'static str,
    pub object_id: String,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub options: Vec<String>,
    pub parameters: Vec<String>,
    pub command_prefix: &'static str,
    pub status_command: &'static str,
    pub response_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberEntity {
    pub key: &'static str,
    pub object_id: String,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub command_prefix: &'static str,
    pub format: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub unit: &'static str,
    pub mode: NumberMode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityInstance {
    Sensor(SensorEntity),
    TextSensor(TextSensorEntity),
    BinarySensor(BinarySensorEntity),
    Switch(SwitchEntity),
    Select(SelectEntity),
    Number(NumberEntity),
}

impl EntityInstance {
    pub fn category_name(&self) -> &'static str {
        match self {
            EntityInstance::Sensor(_) => "sensor",
            EntityInstance::TextSensor(_) => "text_sensor",
            EntityInstance::BinarySensor(_) => "binary_sensor",
            EntityInstance::Switch(_) => "switch",
            EntityInstance::Select(_) => "select",
            EntityInstance::Number(_) => "number",
        }
    }

    /// Builds the instance for one validated entry. Exactly one instance
    /// per present key; absent keys never reach this point.
    fn from_entry(entry: &ValidatedEntry) -> Self {
        let key = descriptor(entry.field).key;
        match &entry.settings {
            ValidatedSettings::Sensor(SensorSettings {
                name,
                unit,
                precision,
                device_class,
                state_class,
                icon,
            }) => EntityInstance::Sensor(SensorEntity {
                key,
                name: name.clone(),
                unit: *unit,
                precision: *precision,
                device_class: *device_class,
                state_class: *state_class,
                icon: icon.clone(),
            }),
            ValidatedSettings::TextSensor(TextSettings { name, icon }) => {
                EntityInstance::TextSensor(TextSensorEntity {
                    key,
                    name: name.clone(),
                    icon: icon.clone(),
                })
            }
            ValidatedSettings::BinarySensor(BinarySettings { name, icon }) => {
                EntityInstance::BinarySensor(BinarySensorEntity {
                    key,
                    name: name.clone(),
                    icon: icon.clone(),
                })
            }
            ValidatedSettings::Switch(SwitchSettings {
                object_id,
                name,
                icon,
            }) => EntityInstance::Switch(SwitchEntity {
                key,
                object_id: object_id.clone(),
                name: name.clone(),
                icon: icon.clone(),
            }),
            ValidatedSettings::Select(SelectSettings {
                object_id,
                name,
                icon,
                options,
                parameters,
                command_prefix,
                status_command,
                response_index,
            }) => EntityInstance::Select(SelectEntity {
                key,
                object_id: object_id.clone(),
                name: name.clone(),
                icon: icon.clone(),
                options: options.clone(),
                parameters: parameters.clone(),
                command_prefix: *command_prefix,
                status_command: *status_command,
                response_index: *response_index,
            }),
            ValidatedSettings::Number(number) => EntityInstance::Number(NumberEntity {
                key,
                object_id: number.object_id.clone(),
                name: number.name.clone(),
                icon: number.icon.clone(),
                command_prefix: number.command_prefix,
                format: number.format,
                min: number.min,
                max: number.max,
                step: number.step,
                unit: number.unit,
                mode: number.mode,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    #[error("slot already occupied")]
    SlotOccupied,
    #[error("slot expects a {expected}, got a {actual}")]
    CategoryMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Owns every entity bound to one inverter integration. Entities live and
/// die with the controller; nothing here is shared across controllers.
#[derive(Debug, Default)]
pub struct Controller {
    entities: BTreeMap<FieldId, EntityInstance>,
    journal: Vec<&'static str>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity(&self, field: FieldId) -> Option<&EntityInstance> {
        self.entities.get(&field)
    }

    pub fn entities(&self) -> impl Iterator<Item = (&FieldId, &EntityInstance)> {
        self.entities.iter()
    }

    /// Slot names invoked so far, in registration order.
    pub fn registered_slots(&self) -> &[&'static str] {
        &self.journal
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn insert(
        &mut self,
        field: FieldId,
        entity: EntityInstance,
    ) -> Result<(), RegistrationError> {
        if self.entities.contains_key(&field) {
            return Err(RegistrationError::SlotOccupied);
        }
        self.journal.push(descriptor(field).slot);
        self.entities.insert(field, entity);
        Ok(())
    }
}

type AttachFn = fn(&mut Controller, FieldId, EntityInstance) -> Result<(), RegistrationError>;

/// One registration slot: the `set_<key>` name plus the attach function.
#[derive(Clone, Copy)]
pub struct Slot {
    pub name: &'static str,
    attach: AttachFn,
}

impl Slot {
    pub fn attach(
        &self,
        controller: &mut Controller,
        field: FieldId,
        entity: EntityInstance,
    ) -> Result<(), RegistrationError> {
        (self.attach)(controller, field, entity)
    }
}

macro_rules! category_attach {
    ($name:ident, $variant:ident, $expected:expr) => {
        fn $name(
            controller: &mut Controller,
            field: FieldId,
            entity: EntityInstance,
        ) -> Result<(), RegistrationError> {
            match entity {
                EntityInstance::$variant(_) => controller.insert(field, entity),
                other => Err(RegistrationError::CategoryMismatch {
                    expected: $expected,
                    actual: other.category_name(),
                }),
            }
        }
    };
}

category_attach!(attach_sensor, Sensor, "sensor");
category_attach!(attach_text_sensor, TextSensor, "text_sensor");
category_attach!(attach_binary_sensor, BinarySensor, "binary_sensor");
category_attach!(attach_switch, Switch, "switch");
category_attach!(attach_select, Select, "select");
category_attach!(attach_number, Number, "number");

/// The closed slot mapping. Total over `FieldId`, resolved through the
/// descriptor table; no slot name is ever assembled at runtime.
pub fn slot(field: FieldId) -> Slot {
    let desc = descriptor(field);
    let attach = match desc.kind {
        entity_registry::EntityKind::Sensor(_) => attach_sensor as AttachFn,
        entity_registry::EntityKind::TextSensor(_) => attach_text_sensor,
        entity_registry::EntityKind::BinarySensor => attach_binary_sensor,
        entity_registry::EntityKind::Switch(_) => attach_switch,
        entity_registry::EntityKind::Select(_) => attach_select,
        entity_registry::EntityKind::Number(_) => attach_number,
    };
    Slot {
        name: desc.slot,
        attach,
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindingError {
    #[error("registration failed for {key}: {cause}")]
    RegistrationFailed {
        key: &'static str,
        cause: RegistrationError,
    },
}

/// Outcome of one binding pass. Errors are collected per key; a failed key
/// never aborts the rest.
#[derive(Debug, Default)]
pub struct BindingResult {
    pub bound: usize,
    pub errors: Vec<BindingError>,
}

impl BindingResult {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Walks the validated configuration (already in table declaration order)
/// and registers one entity per entry with the controller.
pub fn bind(config: &ValidatedConfig, controller: &mut Controller) -> BindingResult {
    let mut result = BindingResult::default();

    for entry in config.entries() {
        let key = descriptor(entry.field).key;
        let entity = EntityInstance::from_entry(entry);
        let slot = slot(entry.field);
        match slot.attach(controller, entry.field, entity) {
            Ok(()) => result.bound += 1,
            Err(cause) => {
                warn!(key, %cause, "registration failed");
                result.errors.push(BindingError::RegistrationFailed { key, cause });
            }
        }
    }

    info!(
        bound = result.bound,
        errors = result.errors.len(),
        uart_id = config.uart_id(),
        "binding pass complete"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use config_schema::{validate, RawConfig, RawSettings};

    fn validated(raw: RawConfig) -> ValidatedConfig {
        validate(&raw).expect("valid configuration")
    }

    fn sample() -> ValidatedConfig {
        validated(
            RawConfig::new("uart_bus")
                .enable("grid_voltage")
                .enable("load_on")
                .enable("buzzer_control")
                .enable("equalization_enable")
                .with("max_charging_current", RawSettings::default()),
        )
    }

    #[test]
    fn bind_registers_one_entity_per_present_key() {
        let config = sample();
        let mut controller = Controller::new();
        let result = bind(&config, &mut controller);

        assert!(result.is_complete());
        assert_eq!(result.bound, 5);
        assert_eq!(controller.len(), 5);
        assert_eq!(
            controller.registered_slots(),
            [
                "set_grid_voltage",
                "set_load_on",
                "set_buzzer_control",
                "set_equalization_enable",
                "set_max_charging_current",
            ]
        );
    }

    #[test]
    fn bound_number_carries_descriptor_metadata() {
        let config = validated(
            RawConfig::new("uart_bus").with("max_charging_current", RawSettings::default()),
        );
        let mut controller = Controller::new();
        let result = bind(&config, &mut controller);
        assert!(result.is_complete());

        match controller.entity(FieldId::MaxChargingCurrent) {
            Some(EntityInstance::Number(number)) => {
                assert_eq!(number.command_prefix, "MNCHGC");
                assert_eq!(number.format, "%3d");
                assert_eq!(number.min, 10.0);
                assert_eq!(number.max, 120.0);
                assert_eq!(number.step, 10.0);
                assert_eq!(number.unit, "A");
            }
            other => panic!("expected bound number, got {other:?}"),
        }
    }

    #[test]
    fn bound_select_carries_wire_metadata() {
        let config = validated(RawConfig::new("uart_bus").enable("equalization_active"));
        let mut controller = Controller::new();
        bind(&config, &mut controller);

        match controller.entity(FieldId::EqualizationActive) {
            Some(EntityInstance::Select(select)) => {
                assert_eq!(select.options, ["Inactive", "Active"]);
                assert_eq!(select.parameters, ["0", "1"]);
                assert_eq!(select.command_prefix, "PBEQA");
                assert_eq!(select.status_command, "QBEQI");
                assert_eq!(select.response_index, 9);
            }
            other => panic!("expected bound select, got {other:?}"),
        }
    }

    #[test]
    fn two_controllers_get_independent_entity_sets() {
        let config = sample();
        let mut first = Controller::new();
        let mut second = Controller::new();

        assert!(bind(&config, &mut first).is_complete());
        assert!(bind(&config, &mut second).is_complete());

        assert_eq!(first.len(), second.len());
        for (field, entity) in first.entities() {
            assert_eq!(second.entity(*field), Some(entity));
        }
    }

    #[test]
    fn occupied_slots_are_reported_without_aborting() {
        let config = sample();
        let mut controller = Controller::new();
        assert!(bind(&config, &mut controller).is_complete());

        // Rebinding into the same controller fails every key but still
        // visits all of them.
        let second = bind(&config, &mut controller);
        assert_eq!(second.bound, 0);
        assert_eq!(second.errors.len(), config.len());
        for error in &second.errors {
            let BindingError::RegistrationFailed { cause, .. } = error;
            assert_eq!(*cause, RegistrationError::SlotOccupied);
        }
        // First binding is untouched.
        assert_eq!(controller.len(), config.len());
    }

    #[test]
    fn slot_rejects_a_category_mismatch() {
        let mut controller = Controller::new();
        let entity = EntityInstance::BinarySensor(BinarySensorEntity {
            key: "load_on",
            name: None,
            icon: None,
        });
        let err = slot(FieldId::GridVoltage)
            .attach(&mut controller, FieldId::GridVoltage, entity)
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::CategoryMismatch {
                expected: "sensor",
                actual: "binary_sensor",
            }
        );
        assert!(controller.is_empty());
    }

    #[test]
    fn slot_names_match_the_descriptor_table() {
        for field in FieldId::ALL {
            assert_eq!(slot(*field).name, descriptor(*field).slot);
        }
    }
}
