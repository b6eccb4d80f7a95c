#![allow(dead_code)]

//! Static descriptor table for every measurement and control point the
//! inverter integration exposes. One entry per configuration key, in
//! declaration order; the table is append-only and never mutated at runtime.

use thiserror::Error;
use tracing::debug;
use types::FieldId;

mod table;

pub use table::DESCRIPTORS;

/// Display metadata for a numeric sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSpec {
    pub unit: Option<&'static str>,
    pub precision: u8,
    pub device_class: Option<&'static str>,
    pub state_class: Option<&'static str>,
    pub icon: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSpec {
    pub icon: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwitchSpec {
    /// Default icon, overridable from configuration.
    pub icon: &'static str,
}

/// A selectable mode: ordered (label, wire parameter) pairs plus the wire
/// commands the protocol component uses to set and query it. The wire
/// strings are pass-through metadata, opaque at this layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectSpec {
    pub options: &'static [(&'static str, &'static str)],
    pub command_prefix: &'static str,
    pub status_command: &'static str,
    pub response_index: usize,
}

/// A bounded numeric setpoint with its wire command and value format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberSpec {
    pub command_prefix: &'static str,
    pub format: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub unit: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityKind {
    Sensor(SensorSpec),
    TextSensor(TextSpec),
    BinarySensor,
    Switch(SwitchSpec),
    Select(SelectSpec),
    Number(NumberSpec),
}

impl EntityKind {
    pub fn category_name(&self) -> &'static str {
        match self {
            EntityKind::Sensor(_) => "sensor",
            EntityKind::TextSensor(_) => "text_sensor",
            EntityKind::BinarySensor => "binary_sensor",
            EntityKind::Switch(_) => "switch",
            EntityKind::Select(_) => "select",
            EntityKind::Number(_) => "number",
        }
    }

    /// Wire command prefix, for the kinds that carry one.
    pub fn command_prefix(&self) -> Option<&'static str> {
        match self {
            EntityKind::Select(spec) => Some(spec.command_prefix),
            EntityKind::Number(spec) => Some(spec.command_prefix),
            _ => None,
        }
    }
}

/// Immutable metadata for one configuration key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityDescriptor {
    pub field: FieldId,
    /// Configuration key, matched exactly (no case-folding, no aliases).
    pub key: &'static str,
    /// Registration slot name on the owning controller.
    pub slot: &'static str,
    pub kind: EntityKind,
}

#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("descriptor table order diverges from FieldId order at index {0}")]
    OrderMismatch(usize),
    #[error("duplicate descriptor key: {0}")]
    DuplicateKey(&'static str),
    #[error("duplicate wire command prefix: {0}")]
    DuplicateCommandPrefix(&'static str),
    #[error("descriptor {key} has min {min} > max {max}")]
    InvalidBounds {
        key: &'static str,
        min: f32,
        max: f32,
    },
    #[error("descriptor {key} has non-positive step {step}")]
    InvalidStep { key: &'static str, step: f32 },
    #[error("descriptor {0} has an empty option list")]
    EmptyOptions(&'static str),
}

/// Descriptor for a field identifier. Infallible: the table covers every
/// `FieldId` variant, which `verify` checks once at startup.
pub fn descriptor(field: FieldId) -> &'static EntityDescriptor {
    &DESCRIPTORS[field.index()]
}

/// Exact-match lookup by configuration key.
pub fn lookup(key: &str) -> Option<&'static EntityDescriptor> {
    DESCRIPTORS.iter().find(|desc| desc.key == key)
}

/// Checks the table invariants. Runs once at startup, before any
/// configuration is validated; everything after it may index the table by
/// `FieldId` without further checks.
pub fn verify() -> Result<(), TableError> {
    for (idx, desc) in DESCRIPTORS.iter().enumerate() {
        if desc.field.index() != idx {
            return Err(TableError::OrderMismatch(idx));
        }
        if DESCRIPTORS[..idx].iter().any(|prev| prev.key == desc.key) {
            return Err(TableError::DuplicateKey(desc.key));
        }
        if let Some(prefix) = desc.kind.command_prefix() {
            let clash = DESCRIPTORS[..idx]
                .iter()
                .any(|prev| prev.kind.command_prefix() == Some(prefix));
            if clash {
                return Err(TableError::DuplicateCommandPrefix(prefix));
            }
        }
        match desc.kind {
            EntityKind::Number(spec) => {
                if spec.min > spec.max {
                    return Err(TableError::InvalidBounds {
                        key: desc.key,
                        min: spec.min,
                        max: spec.max,
                    });
                }
                if spec.step <= 0.0 {
                    return Err(TableError::InvalidStep {
                        key: desc.key,
                        step: spec.step,
                    });
                }
            }
            EntityKind::Select(spec) => {
                if spec.options.is_empty() {
                    return Err(TableError::EmptyOptions(desc.key));
                }
            }
            _ => {}
        }
    }

    debug!(fields = DESCRIPTORS.len(), "descriptor table verified");
    Ok(())
}
