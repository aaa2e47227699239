use crate::block::CircuitBlock;
use crate::components::composite::Composite;
use crate::components::gates::Gate;
use crate::pin::{PinMap, PinTable};

/// Evaluation contract shared by gates and whole blocks.
///
/// An element reads its input pins from the table it is given and returns the values
/// of its output pins. It never writes to the table itself; the caller does.
pub trait Component {
    fn name(&self) -> &str;
    fn evaluate(&mut self, pins: &PinTable) -> PinMap;
}

/// A live element inside a circuit block.
#[derive(Debug, Clone)]
pub enum Element {
    Gate(Gate),
    Composite(Composite),
}

impl Element {
    pub fn kind_name(&self) -> &str {
        match self {
            Element::Gate(gate) => gate.kind().as_str(),
            Element::Composite(composite) => composite.type_name(),
        }
    }

    pub fn input_pins(&self) -> Vec<String> {
        match self {
            Element::Gate(gate) => gate.input_pins().iter().map(|p| p.to_string()).collect(),
            Element::Composite(composite) => composite.input_pins(),
        }
    }

    pub fn output_pins(&self) -> Vec<String> {
        match self {
            Element::Gate(gate) => vec![gate.output_pin().to_string()],
            Element::Composite(composite) => composite.output_pins(),
        }
    }

    pub fn as_block(&self) -> Option<&CircuitBlock> {
        match self {
            Element::Gate(_) => None,
            Element::Composite(composite) => Some(composite.block()),
        }
    }
}

impl Component for Element {
    fn name(&self) -> &str {
        match self {
            Element::Gate(gate) => gate.name(),
            Element::Composite(composite) => composite.name(),
        }
    }

    fn evaluate(&mut self, pins: &PinTable) -> PinMap {
        match self {
            Element::Gate(gate) => gate.evaluate(pins),
            Element::Composite(composite) => composite.evaluate(pins),
        }
    }
}

impl From<Gate> for Element {
    fn from(value: Gate) -> Self {
        Element::Gate(value)
    }
}

impl From<Composite> for Element {
    fn from(value: Composite) -> Self {
        Element::Composite(value)
    }
}
