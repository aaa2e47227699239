//! # Netlist data model
//!
//! Structured form of a parsed netlist: the block's port directions, the named gate
//! instances and the point-to-point nets between pins. A netlist is purely descriptive;
//! [`CircuitBlock`](crate::block::CircuitBlock) turns it into live elements.
//!
//! `Display` writes the canonical text layout, which [`parse`](crate::parser::parse)
//! reads back into an equal `Netlist`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Direction;

/// A named gate instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    /// Gate kind or registered block type. Unknown types are inert.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Model {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }
}

/// A named wire copying the value at `source` into `destination` on every pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    pub name: String,
    pub source: String,
    pub destination: String,
}

impl Net {
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            destination: destination.into(),
        }
    }

    pub fn endpoints(&self) -> [&str; 2] {
        [&self.source, &self.destination]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Netlist {
    pub inputs: Vec<Direction>,
    pub outputs: Vec<Direction>,
    pub models: Vec<Model>,
    pub nets: Vec<Net>,
}

impl Netlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|model| model.name == name)
    }

    /// Pin ids of the block's output ports, in declaration order.
    pub fn output_pins(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.outputs.iter().map(|direction| direction.as_str())
    }

    pub fn input_pins(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.inputs.iter().map(|direction| direction.as_str())
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}; {}", self.name, self.kind)
    }
}

impl fmt::Display for Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}; {} {}", self.name, self.source, self.destination)
    }
}

impl fmt::Display for Netlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "NETLIST")?;
        writeln!(f, "$INPUTS")?;
        for input in &self.inputs {
            writeln!(f, "{}", input)?;
        }
        writeln!(f, "$OUTPUTS")?;
        for output in &self.outputs {
            writeln!(f, "{}", output)?;
        }
        writeln!(f, "$MODELS")?;
        for model in &self.models {
            writeln!(f, "{}", model)?;
        }
        writeln!(f, "$NETS")?;
        for net in &self.nets {
            writeln!(f, "{}", net)?;
        }
        write!(f, "$END")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_layout() {
        let netlist = Netlist {
            inputs: vec![Direction::North, Direction::South],
            outputs: vec![Direction::Up],
            models: vec![Model::new("AND1", "AND")],
            nets: vec![
                Net::new("NET1", "NORTH", "AND1.0"),
                Net::new("NET2", "SOUTH", "AND1.1"),
                Net::new("NET3", "AND1.2", "UP"),
            ],
        };

        let expected = "NETLIST\n$INPUTS\nNORTH\nSOUTH\n$OUTPUTS\nUP\n$MODELS\nAND1; AND\n\
                        $NETS\nNET1; NORTH AND1.0\nNET2; SOUTH AND1.1\nNET3; AND1.2 UP\n$END";
        assert_eq!(netlist.to_string(), expected);
    }

    #[test]
    fn test_model_lookup() {
        let mut netlist = Netlist::new();
        netlist.models.push(Model::new("NOR1", "NOR"));
        assert_eq!(netlist.model("NOR1").map(|m| m.kind.as_str()), Some("NOR"));
        assert!(netlist.model("NOR2").is_none());
    }

    #[test]
    fn test_serde_model_type_field() {
        let model: Model = serde_json::from_str(r#"{"name":"X","type":"XOR"}"#).unwrap();
        assert_eq!(model, Model::new("X", "XOR"));
    }
}
