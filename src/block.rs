//! # Circuit block
//!
//! A [`CircuitBlock`] is the live form of a [`Netlist`]: one element per recognised model,
//! plus a pin table that outlives individual evaluations. Latches keep their state in
//! that table between calls to [`CircuitBlock::settle`].
//!
//! ## Settlement
//!
//! Each call overwrites the pin table with the caller's assignment and then runs exactly
//! `limits` relaxation passes. A pass evaluates every element in model order, writing each
//! output straight back, then copies every net from source to destination in net order.
//! Writes are visible to the rest of the same pass. There is no convergence check: a
//! circuit that has not settled within `limits` passes returns whatever it holds.
//!
//! ```rust
//! use rusty_fpga::{parse, CircuitBlock, PinMap, Voltage};
//!
//! let netlist = parse(
//!     "NETLIST\n$INPUTS\nNORTH\nSOUTH\n$OUTPUTS\nUP\n$MODELS\nAND1; AND\n\
//!      $NETS\nNET1; NORTH AND1.0\nNET2; SOUTH AND1.1\nNET3; AND1.2 UP\n$END",
//! )
//! .expect("valid netlist");
//! let mut block = CircuitBlock::new(netlist, 5);
//!
//! let inputs = PinMap::from([
//!     ("NORTH".to_string(), Voltage::High),
//!     ("SOUTH".to_string(), Voltage::High),
//! ]);
//! assert_eq!(block.settle(&inputs)["UP"], Voltage::High);
//! ```

use crate::component::{Component, Element};
use crate::components::ElementFactory;
use crate::connection::ConnectivityReport;
use crate::netlist::Netlist;
use crate::pin::{PinMap, PinTable};

#[derive(Debug, Clone)]
pub struct CircuitBlock {
    name: String,
    netlist: Netlist,
    elements: Vec<Element>,
    limits: usize,
    pins: PinTable,
}

impl CircuitBlock {
    /// Builds a block using the four built-in gate kinds.
    pub fn new(netlist: Netlist, limits: usize) -> Self {
        Self::with_factory(netlist, limits, &ElementFactory::new())
    }

    pub fn with_factory(netlist: Netlist, limits: usize, factory: &ElementFactory) -> Self {
        for warning in ConnectivityReport::analyze(&netlist, factory).warnings() {
            tracing::warn!("{}", warning);
        }

        let elements = Self::generate_elements(&netlist, factory);

        let mut pins = PinTable::new();
        for net in &netlist.nets {
            for endpoint in net.endpoints() {
                pins.set(endpoint, Default::default());
            }
        }

        tracing::debug!(
            elements = elements.len(),
            nets = netlist.nets.len(),
            pins = pins.len(),
            limits,
            "constructed circuit block"
        );

        CircuitBlock {
            name: "block".to_string(),
            netlist,
            elements,
            limits,
            pins,
        }
    }

    /// Renames the block. Unnamed blocks are called `block`.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn generate_elements(netlist: &Netlist, factory: &ElementFactory) -> Vec<Element> {
        let mut elements: Vec<Element> = Vec::with_capacity(netlist.models.len());
        for model in &netlist.models {
            let Some(element) = factory.create(model) else {
                continue;
            };
            // A repeated instance name replaces the earlier element in its original slot.
            match elements.iter_mut().find(|e| e.name() == model.name) {
                Some(existing) => *existing = element,
                None => elements.push(element),
            }
        }
        elements
    }

    /// Applies `assignment`, runs the relaxation passes and returns the output ports.
    pub fn settle(&mut self, assignment: &PinMap) -> PinMap {
        self.pins.apply(assignment);

        for pass in 0..self.limits {
            self.relax();
            tracing::trace!(pass, pins = %self.pins, "relaxation pass");
        }

        let outputs = self.pins.restrict_to(self.netlist.output_pins());
        tracing::debug!(?outputs, "settled");
        outputs
    }

    /// One pass: all elements, then all nets.
    fn relax(&mut self) {
        for element in self.elements.iter_mut() {
            let values = element.evaluate(&self.pins);
            self.pins.apply(&values);
        }
        for net in &self.netlist.nets {
            self.pins.copy(&net.source, &net.destination);
        }
    }

    /// Returns every pin, nested blocks included, to undefined.
    pub fn reset(&mut self) {
        self.pins.clear();
        for element in self.elements.iter_mut() {
            if let Element::Composite(composite) = element {
                composite.block_mut().reset();
            }
        }
    }

    pub fn netlist(&self) -> &Netlist {
        &self.netlist
    }

    pub fn limits(&self) -> usize {
        self.limits
    }

    pub fn pins(&self) -> &PinTable {
        &self.pins
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element_names(&self) -> Vec<&str> {
        self.elements.iter().map(|e| e.name()).collect()
    }
}

impl Component for CircuitBlock {
    fn name(&self) -> &str {
        &self.name
    }

    /// Settles with the ports of `pins` that this block declares as inputs.
    fn evaluate(&mut self, pins: &PinTable) -> PinMap {
        let assignment = pins.restrict_to(self.netlist.input_pins());
        self.settle(&assignment)
    }
}
