use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::component::Component;
use crate::pin::{gate_pin, PinMap, PinTable, Voltage};

/// The two-input gate kinds a model type can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateKind {
    And,
    Or,
    Xor,
    Nor,
}

impl GateKind {
    pub const ALL: [GateKind; 4] = [GateKind::And, GateKind::Or, GateKind::Xor, GateKind::Nor];

    pub fn as_str(&self) -> &'static str {
        match self {
            GateKind::And => "AND",
            GateKind::Or => "OR",
            GateKind::Xor => "XOR",
            GateKind::Nor => "NOR",
        }
    }
}

impl FromStr for GateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GateKind::ALL
            .iter()
            .find(|kind| kind.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown gate kind: {}", s))
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How NOR treats undefined inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NorPolicy {
    /// LOW,LOW is HIGH and LOW paired with UNDEFINED (either side) is UNDEFINED.
    /// Everything else, UNDEFINED,UNDEFINED included, is LOW.
    #[default]
    Legacy,
    /// Any HIGH forces LOW, LOW,LOW is HIGH, everything else is UNDEFINED.
    Strict,
}

impl GateKind {
    /// Combines two input levels into the output level.
    pub fn apply(&self, a: Voltage, b: Voltage, nor: NorPolicy) -> Voltage {
        use crate::pin::Voltage::{High, Low, Undefined};

        match self {
            GateKind::And => match (a, b) {
                (High, High) => High,
                (Undefined, _) | (_, Undefined) => Undefined,
                _ => Low,
            },
            GateKind::Or => match (a, b) {
                (Undefined, _) | (_, Undefined) => Undefined,
                (High, _) | (_, High) => High,
                _ => Low,
            },
            GateKind::Xor => match (a, b) {
                (Undefined, _) | (_, Undefined) => Undefined,
                (x, y) => Voltage::from_bool(x != y),
            },
            GateKind::Nor => match nor {
                NorPolicy::Legacy => match (a, b) {
                    (Low, Low) => High,
                    (Low, Undefined) | (Undefined, Low) => Undefined,
                    _ => Low,
                },
                NorPolicy::Strict => match (a, b) {
                    (High, _) | (_, High) => Low,
                    (Low, Low) => High,
                    _ => Undefined,
                },
            },
        }
    }
}

/// A gate instance bound to the pins `<name>.0`, `<name>.1` (inputs) and `<name>.2` (output).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    name: String,
    kind: GateKind,
    nor: NorPolicy,
    inputs: [String; 2],
    output: String,
}

impl Gate {
    pub fn new(name: String, kind: GateKind) -> Self {
        Self::with_policy(name, kind, NorPolicy::default())
    }

    pub fn with_policy(name: String, kind: GateKind, nor: NorPolicy) -> Self {
        let inputs = [gate_pin(&name, 0), gate_pin(&name, 1)];
        let output = gate_pin(&name, 2);
        Gate {
            name,
            kind,
            nor,
            inputs,
            output,
        }
    }

    pub fn kind(&self) -> GateKind {
        self.kind
    }

    pub fn input_pins(&self) -> [&str; 2] {
        [&self.inputs[0], &self.inputs[1]]
    }

    pub fn output_pin(&self) -> &str {
        &self.output
    }

    /// Output level for the current table contents.
    pub fn output_value(&self, pins: &PinTable) -> Voltage {
        let a = pins.get(&self.inputs[0]);
        let b = pins.get(&self.inputs[1]);
        self.kind.apply(a, b, self.nor)
    }
}

impl Component for Gate {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&mut self, pins: &PinTable) -> PinMap {
        PinMap::from([(self.output.clone(), self.output_value(pins))])
    }
}
