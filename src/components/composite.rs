use crate::block::CircuitBlock;
use crate::component::Component;
use crate::pin::{port_pin, PinMap, PinTable};

/// A compiled block used as an element of a larger netlist.
///
/// Its ports appear in the enclosing pin table as `<name>.<DIRECTION>`, e.g. `HA1.EAST`.
/// The nested block keeps its own pin table, so latches inside it hold state between
/// passes of the enclosing block.
#[derive(Debug, Clone)]
pub struct Composite {
    name: String,
    type_name: String,
    block: CircuitBlock,
}

impl Composite {
    pub fn new(name: String, type_name: String, block: CircuitBlock) -> Self {
        Self {
            name,
            type_name,
            block,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn block(&self) -> &CircuitBlock {
        &self.block
    }

    pub(crate) fn block_mut(&mut self) -> &mut CircuitBlock {
        &mut self.block
    }

    pub fn input_pins(&self) -> Vec<String> {
        self.block
            .netlist()
            .inputs
            .iter()
            .map(|direction| port_pin(&self.name, *direction))
            .collect()
    }

    pub fn output_pins(&self) -> Vec<String> {
        self.block
            .netlist()
            .outputs
            .iter()
            .map(|direction| port_pin(&self.name, *direction))
            .collect()
    }
}

impl Component for Composite {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&mut self, pins: &PinTable) -> PinMap {
        let assignment: PinMap = self
            .block
            .netlist()
            .inputs
            .iter()
            .map(|direction| {
                (
                    direction.to_string(),
                    pins.get(&port_pin(&self.name, *direction)),
                )
            })
            .collect();

        let outputs = self.block.settle(&assignment);

        self.block
            .netlist()
            .outputs
            .iter()
            .filter_map(|direction| {
                outputs
                    .get(direction.as_str())
                    .map(|value| (port_pin(&self.name, *direction), *value))
            })
            .collect()
    }
}
