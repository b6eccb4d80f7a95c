#![allow(dead_code)]

//! Raw configuration model and the schema validator. Validation is a pure
//! pass over the input and the descriptor table: it rejects unknown keys,
//! resolves defaults and bound overrides, and produces a declaration-ordered
//! [`ValidatedConfig`] ready for binding. Nothing is constructed here.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use entity_registry::{lookup, EntityKind};
use types::{FieldId, NumberMode};

/// User-supplied configuration as parsed from TOML or JSON.
///
/// Every key other than `uart_id` must name a descriptor; its value is
/// either a bare boolean enable marker or a settings object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawConfig {
    /// Reference to the transport the runtime component talks through.
    /// Required, but never dereferenced at this layer.
    pub uart_id: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, RawField>,
}

impl RawConfig {
    pub fn new(uart_id: impl Into<String>) -> Self {
        Self {
            uart_id: Some(uart_id.into()),
            fields: BTreeMap::new(),
        }
    }

    /// Enable a field with all-default settings.
    pub fn enable(mut self, key: &str) -> Self {
        self.fields.insert(key.to_string(), RawField::Marker(true));
        self
    }

    pub fn with(mut self, key: &str, settings: RawSettings) -> Self {
        self.fields
            .insert(key.to_string(), RawField::Settings(settings));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    /// `key = true` enables the field with defaults; `false` reads as absent.
    Marker(bool),
    Settings(RawSettings),
}

/// Per-field overrides. All optional; which of them are accepted depends on
/// the descriptor's category.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    pub id: Option<String>,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub mode: Option<String>,
    pub min_value: Option<f32>,
    pub max_value: Option<f32>,
    pub step: Option<f32>,
}

impl RawSettings {
    fn has_bounds(&self) -> bool {
        self.min_value.is_some() || self.max_value.is_some() || self.step.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("{key}: out of range: {detail}")]
    OutOfRange { key: String, detail: String },
    #[error("{key}: invalid choice: {detail}")]
    InvalidChoice { key: String, detail: String },
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),
}

/// Validated, defaulted configuration. Entries are in table declaration
/// order regardless of configuration order, and the structure is immutable
/// once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    uart_id: String,
    entries: Vec<ValidatedEntry>,
}

impl ValidatedConfig {
    pub fn uart_id(&self) -> &str {
        &self.uart_id
    }

    pub fn entries(&self) -> &[ValidatedEntry] {
        &self.entries
    }

    pub fn get(&self, field: FieldId) -> Option<&ValidatedEntry> {
        self.entries.iter().find(|entry| entry.field == field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEntry {
    pub field: FieldId,
    pub settings: ValidatedSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedSettings {
    Sensor(SensorSettings),
    TextSensor(TextSettings),
    BinarySensor(BinarySettings),
    Switch(SwitchSettings),
    Select(SelectSettings),
    Number(NumberSettings),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensorSettings {
    pub name: Option<String>,
    pub unit: Option<&'static str>,
    pub precision: u8,
    pub device_class: Option<&'static str>,
    pub state_class: Option<&'static str>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextSettings {
    pub name: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinarySettings {
    pub name: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchSettings {
    /// User-supplied id, or synthesized deterministically from the key.
    pub object_id: String,
    pub name: Option<String>,
    pub icon: String,
}

/// Select settings: the descriptor's option and parameter lists copied
/// verbatim. No user-supplied choice list exists.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectSettings {
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
pub struct NumberSettings {
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

/// Validates a raw configuration against the descriptor table.
///
/// Pure: identical input yields a structurally identical result, including
/// synthesized identifiers. Any error aborts the whole configuration; no
/// partial result is produced.
pub fn validate(raw: &RawConfig) -> Result<ValidatedConfig, ValidationError> {
    let uart_id = match raw.uart_id.as_deref() {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => return Err(ValidationError::MissingRequiredField("uart_id")),
    };

    // Reject unknown keys before anything else; BTreeMap iteration keeps
    // the reported key deterministic.
    for key in raw.fields.keys() {
        if lookup(key).is_none() {
            return Err(ValidationError::UnknownField(key.clone()));
        }
    }

    let mut entries = Vec::new();
    for desc in entity_registry::DESCRIPTORS {
        let settings = match raw.fields.get(desc.key) {
            None | Some(RawField::Marker(false)) => continue,
            Some(RawField::Marker(true)) => RawSettings::default(),
            Some(RawField::Settings(settings)) => settings.clone(),
        };

        let validated = validate_field(desc, &settings)?;
        entries.push(ValidatedEntry {
            field: desc.field,
            settings: validated,
        });
    }

    debug!(fields = entries.len(), "configuration validated");
    Ok(ValidatedConfig { uart_id, entries })
}

fn validate_field(
    desc: &'static entity_registry::EntityDescriptor,
    settings: &RawSettings,
) -> Result<ValidatedSettings, ValidationError> {
    // Bound overrides only make sense on bounded numbers.
    if settings.has_bounds() && !matches!(desc.kind, EntityKind::Number(_)) {
        return Err(ValidationError::InvalidChoice {
            key: desc.key.to_string(),
            detail: format!(
                "min_value/max_value/step not accepted on a {}",
                desc.kind.category_name()
            ),
        });
    }
    if settings.mode.is_some() && !matches!(desc.kind, EntityKind::Number(_)) {
        return Err(ValidationError::InvalidChoice {
            key: desc.key.to_string(),
            detail: format!("mode not accepted on a {}", desc.kind.category_name()),
        });
    }
    if settings.id.is_some()
        && matches!(
            desc.kind,
            EntityKind::Sensor(_) | EntityKind::TextSensor(_) | EntityKind::BinarySensor
        )
    {
        return Err(ValidationError::InvalidChoice {
            key: desc.key.to_string(),
            detail: format!("id not accepted on a {}", desc.kind.category_name()),
        });
    }

    let validated = match desc.kind {
        EntityKind::Sensor(spec) => ValidatedSettings::Sensor(SensorSettings {
            name: settings.name.clone(),
            unit: spec.unit,
            precision: spec.precision,
            device_class: spec.device_class,
            state_class: spec.state_class,
            icon: settings
                .icon
                .clone()
                .or_else(|| spec.icon.map(str::to_string)),
        }),
        EntityKind::TextSensor(spec) => ValidatedSettings::TextSensor(TextSettings {
            name: settings.name.clone(),
            icon: settings
                .icon
                .clone()
                .or_else(|| spec.icon.map(str::to_string)),
        }),
        EntityKind::BinarySensor => ValidatedSettings::BinarySensor(BinarySettings {
            name: settings.name.clone(),
            icon: settings.icon.clone(),
        }),
        EntityKind::Switch(spec) => ValidatedSettings::Switch(SwitchSettings {
            object_id: synthesize_id(desc.key, settings.id.as_deref()),
            name: settings.name.clone(),
            icon: settings
                .icon
                .clone()
                .unwrap_or_else(|| spec.icon.to_string()),
        }),
        EntityKind::Select(spec) => ValidatedSettings::Select(SelectSettings {
            object_id: synthesize_id(desc.key, settings.id.as_deref()),
            name: settings.name.clone(),
            icon: settings.icon.clone(),
            options: spec
                .options
                .iter()
                .map(|(label, _)| label.to_string())
                .collect(),
            parameters: spec
                .options
                .iter()
                .map(|(_, param)| param.to_string())
                .collect(),
            command_prefix: spec.command_prefix,
            status_command: spec.status_command,
            response_index: spec.response_index,
        }),
        EntityKind::Number(spec) => {
            let min = settings.min_value.unwrap_or(spec.min);
            let max = settings.max_value.unwrap_or(spec.max);
            let step = settings.step.unwrap_or(spec.step);
            if min > max {
                return Err(ValidationError::OutOfRange {
                    key: desc.key.to_string(),
                    detail: format!("resolved min {min} exceeds max {max}"),
                });
            }
            if step <= 0.0 {
                return Err(ValidationError::OutOfRange {
                    key: desc.key.to_string(),
                    detail: format!("step must be positive, got {step}"),
                });
            }
            let mode = match settings.mode.as_deref() {
                None => NumberMode::default(),
                Some(raw_mode) => NumberMode::from_config(raw_mode).ok_or_else(|| {
                    ValidationError::InvalidChoice {
                        key: desc.key.to_string(),
                        detail: format!("unknown mode {raw_mode:?}"),
                    }
                })?,
            };
            ValidatedSettings::Number(NumberSettings {
                object_id: synthesize_id(desc.key, settings.id.as_deref()),
                name: settings.name.clone(),
                icon: settings.icon.clone(),
                command_prefix: spec.command_prefix,
                format: spec.format,
                min,
                max,
                step,
                unit: spec.unit,
                mode,
            })
        }
    };

    Ok(validated)
}

/// Identifier for a constructed entity: the user's id if given, otherwise
/// the configuration key. Deterministic so repeated validation of the same
/// input is structurally identical.
fn synthesize_id(key: &str, user_id: Option<&str>) -> String {
    match user_id {
        Some(id) => id.to_string(),
        None => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> RawConfig {
        RawConfig::new("uart_bus")
    }

    #[test]
    fn every_known_key_validates_alone() {
        for desc in entity_registry::DESCRIPTORS {
            let config = validate(&base().enable(desc.key)).expect(desc.key);
            assert_eq!(config.len(), 1);
            assert_eq!(config.entries()[0].field, desc.field);
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = validate(&base().enable("bogus_field")).unwrap_err();
        assert_eq!(err, ValidationError::UnknownField("bogus_field".into()));
    }

    #[test]
    fn missing_uart_reference_is_rejected() {
        let raw = RawConfig {
            uart_id: None,
            fields: BTreeMap::new(),
        };
        assert_eq!(
            validate(&raw).unwrap_err(),
            ValidationError::MissingRequiredField("uart_id")
        );

        let blank = RawConfig::new("  ");
        assert_eq!(
            validate(&blank).unwrap_err(),
            ValidationError::MissingRequiredField("uart_id")
        );
    }

    #[test]
    fn number_defaults_come_from_the_descriptor() {
        let config = validate(
            &base().with("max_charging_current", RawSettings::default()),
        )
        .expect("validate");
        let entry = config.get(FieldId::MaxChargingCurrent).expect("entry");
        match &entry.settings {
            ValidatedSettings::Number(number) => {
                assert_eq!(number.min, 10.0);
                assert_eq!(number.max, 120.0);
                assert_eq!(number.step, 10.0);
                assert_eq!(number.unit, "A");
                assert_eq!(number.command_prefix, "MNCHGC");
                assert_eq!(number.mode, NumberMode::Box);
            }
            other => panic!("expected number settings, got {other:?}"),
        }
    }

    #[test]
    fn number_overrides_apply_and_min_above_max_is_rejected() {
        let overridden = base().with(
            "max_charging_current",
            RawSettings {
                min_value: Some(20.0),
                max_value: Some(60.0),
                ..RawSettings::default()
            },
        );
        let config = validate(&overridden).expect("validate");
        match &config.entries()[0].settings {
            ValidatedSettings::Number(number) => {
                assert_eq!(number.min, 20.0);
                assert_eq!(number.max, 60.0);
                assert_eq!(number.step, 10.0);
            }
            other => panic!("expected number settings, got {other:?}"),
        }

        let inverted = base().with(
            "max_charging_current",
            RawSettings {
                min_value: Some(60.0),
                max_value: Some(20.0),
                ..RawSettings::default()
            },
        );
        assert!(matches!(
            validate(&inverted).unwrap_err(),
            ValidationError::OutOfRange { .. }
        ));
    }

    #[test]
    fn equal_min_and_max_are_accepted() {
        let raw = base().with(
            "max_charging_current",
            RawSettings {
                min_value: Some(50.0),
                max_value: Some(50.0),
                ..RawSettings::default()
            },
        );
        validate(&raw).expect("min == max is a valid range");
    }

    #[test]
    fn select_entry_copies_the_descriptor_verbatim() {
        let config = validate(&base().enable("equalization_enable")).expect("validate");
        let entry = config.get(FieldId::EqualizationEnable).expect("entry");
        match &entry.settings {
            ValidatedSettings::Select(select) => {
                assert_eq!(select.options, ["Disabled", "Enabled"]);
                assert_eq!(select.parameters, ["0", "1"]);
                assert_eq!(select.command_prefix, "PBEQE");
                assert_eq!(select.status_command, "QBEQI");
                assert_eq!(select.response_index, 0);
            }
            other => panic!("expected select settings, got {other:?}"),
        }
    }

    #[test]
    fn switch_marker_and_object_forms_agree_on_the_synthesized_id() {
        let marker = validate(&base().enable("buzzer_control")).expect("marker form");
        let object = validate(
            &base().with("buzzer_control", RawSettings::default()),
        )
        .expect("object form");
        assert_eq!(marker, object);

        match &marker.entries()[0].settings {
            ValidatedSettings::Switch(switch) => {
                assert_eq!(switch.object_id, "buzzer_control");
                assert_eq!(switch.icon, "mdi:volume-high");
            }
            other => panic!("expected switch settings, got {other:?}"),
        }
    }

    #[test]
    fn switch_icon_override_is_kept() {
        let raw = base().with(
            "buzzer_control",
            RawSettings {
                icon: Some("mdi:volume-off".into()),
                ..RawSettings::default()
            },
        );
        let config = validate(&raw).expect("validate");
        match &config.entries()[0].settings {
            ValidatedSettings::Switch(switch) => assert_eq!(switch.icon, "mdi:volume-off"),
            other => panic!("expected switch settings, got {other:?}"),
        }
    }

    #[test]
    fn validation_is_idempotent() {
        let raw = base()
            .enable("grid_voltage")
            .enable("equalization_enable")
            .enable("buzzer_control")
            .with(
                "max_charging_current",
                RawSettings {
                    min_value: Some(20.0),
                    ..RawSettings::default()
                },
            );
        let first = validate(&raw).expect("first pass");
        let second = validate(&raw).expect("second pass");
        assert_eq!(first, second);
    }

    #[test]
    fn entries_come_out_in_declaration_order() {
        // Configuration order here is reverse of table order.
        let raw = base()
            .enable("max_charging_current")
            .enable("equalization_enable")
            .enable("buzzer_control")
            .enable("grid_voltage");
        let config = validate(&raw).expect("validate");
        let fields: Vec<FieldId> = config.entries().iter().map(|entry| entry.field).collect();
        assert_eq!(
            fields,
            [
                FieldId::GridVoltage,
                FieldId::BuzzerControl,
                FieldId::EqualizationEnable,
                FieldId::MaxChargingCurrent,
            ]
        );
    }

    #[test]
    fn false_marker_disables_the_field() {
        let mut raw = base();
        raw.fields
            .insert("grid_voltage".into(), RawField::Marker(false));
        let config = validate(&raw).expect("validate");
        assert!(config.is_empty());
    }

    #[test]
    fn bound_overrides_on_a_sensor_are_rejected() {
        let raw = base().with(
            "grid_voltage",
            RawSettings {
                min_value: Some(0.0),
                ..RawSettings::default()
            },
        );
        assert!(matches!(
            validate(&raw).unwrap_err(),
            ValidationError::InvalidChoice { .. }
        ));
    }

    #[test]
    fn unknown_number_mode_is_rejected() {
        let raw = base().with(
            "equalization_voltage",
            RawSettings {
                mode: Some("dial".into()),
                ..RawSettings::default()
            },
        );
        assert!(matches!(
            validate(&raw).unwrap_err(),
            ValidationError::InvalidChoice { .. }
        ));

        let upper = base().with(
            "equalization_voltage",
            RawSettings {
                mode: Some("SLIDER".into()),
                ..RawSettings::default()
            },
        );
        let config = validate(&upper).expect("upper-case mode");
        match &config.entries()[0].settings {
            ValidatedSettings::Number(number) => assert_eq!(number.mode, NumberMode::Slider),
            other => panic!("expected number settings, got {other:?}"),
        }
    }
}
