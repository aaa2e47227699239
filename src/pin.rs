use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::Direction;

/// Tri-state level carried by a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Voltage {
    High,
    Undefined,
    Low,
}

impl Voltage {
    pub fn to_str(&self) -> &'static str {
        match self {
            Voltage::High => "HIGH",
            Voltage::Undefined => "UNDEFINED",
            Voltage::Low => "LOW",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Voltage::Low => '0',
            Voltage::High => '1',
            Voltage::Undefined => 'X',
        }
    }

    /// Integer level used when signaling the voltage to the outside world.
    /// It carries no meaning for the logic itself.
    pub fn code(&self) -> u8 {
        match self {
            Voltage::High => 14,
            Voltage::Undefined => 8,
            Voltage::Low => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            14 => Some(Voltage::High),
            8 => Some(Voltage::Undefined),
            2 => Some(Voltage::Low),
            _ => None,
        }
    }

    pub fn from_bool(value: bool) -> Self {
        if value {
            Voltage::High
        } else {
            Voltage::Low
        }
    }

    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Voltage::Low => Some(false),
            Voltage::High => Some(true),
            Voltage::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        *self != Voltage::Undefined
    }
}

impl Default for Voltage {
    fn default() -> Self {
        Voltage::Undefined
    }
}

impl std::fmt::Display for Voltage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Ordered pin-id to voltage mapping, used for assignments and results.
pub type PinMap = BTreeMap<String, Voltage>;

/// Pin id of terminal `index` (0, 1 = inputs, 2 = output) on a gate instance.
pub fn gate_pin(instance: &str, index: u8) -> String {
    format!("{}.{}", instance, index)
}

/// Pin id of a port on a nested block instance.
pub fn port_pin(instance: &str, direction: Direction) -> String {
    format!("{}.{}", instance, direction)
}

/// Mutable pin store owned by a circuit block.
///
/// Pins that were never written read as [`Voltage::Undefined`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinTable {
    pins: PinMap,
}

impl PinTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pin: &str) -> Voltage {
        self.pins.get(pin).copied().unwrap_or_default()
    }

    pub fn contains(&self, pin: &str) -> bool {
        self.pins.contains_key(pin)
    }

    pub fn set(&mut self, pin: impl Into<String>, value: Voltage) {
        self.pins.insert(pin.into(), value);
    }

    pub fn apply(&mut self, values: &PinMap) {
        for (pin, value) in values {
            self.pins.insert(pin.clone(), *value);
        }
    }

    /// Copies the value at `source` into `destination`.
    pub fn copy(&mut self, source: &str, destination: &str) {
        let value = self.get(source);
        self.set(destination, value);
    }

    /// Sets every known pin back to undefined, keeping the keys.
    pub fn clear(&mut self) {
        for value in self.pins.values_mut() {
            *value = Voltage::Undefined;
        }
    }

    /// Sub-map of the pins whose ids are in `keys`. Keys absent from the table are omitted.
    pub fn restrict_to<'a, I>(&self, keys: I) -> PinMap
    where
        I: IntoIterator<Item = &'a str>,
    {
        keys.into_iter()
            .filter_map(|key| self.pins.get_key_value(key))
            .map(|(key, value)| (key.clone(), *value))
            .collect()
    }

    pub fn snapshot(&self) -> PinMap {
        self.pins.clone()
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Voltage)> {
        self.pins.iter().map(|(pin, value)| (pin.as_str(), *value))
    }
}

impl std::fmt::Display for PinTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (pin, value)) in self.pins.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", pin, value.to_char())?;
        }
        write!(f, "}}")
    }
}
