//! Element construction.
//!
//! [`ElementFactory`] maps the type string of a [`Model`] to a live [`Element`].
//! The four gate kinds are always registered; compiled blocks can be added under
//! new type names with [`ElementFactory::register_block`]. Types the factory does not
//! know produce no element at all.

pub mod composite;
pub mod gates;

use std::collections::HashMap;
use thiserror::Error;

use crate::block::CircuitBlock;
use crate::component::Element;
use crate::netlist::{Model, Netlist};
use composite::Composite;
use gates::{Gate, GateKind, NorPolicy};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FactoryError {
    #[error("element type '{0}' is already registered")]
    DuplicateType(String),
}

#[derive(Debug, Clone)]
enum Blueprint {
    Gate(GateKind),
    Block(CircuitBlock),
}

/// Registry of the element types a netlist may instantiate.
#[derive(Debug, Clone)]
pub struct ElementFactory {
    registry: HashMap<String, Blueprint>,
    nor_policy: NorPolicy,
}

impl Default for ElementFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementFactory {
    pub fn new() -> Self {
        Self::with_nor_policy(NorPolicy::default())
    }

    pub fn with_nor_policy(nor_policy: NorPolicy) -> Self {
        let mut factory = ElementFactory {
            registry: HashMap::new(),
            nor_policy,
        };
        factory.register_default_elements();
        factory
    }

    fn register_default_elements(&mut self) {
        for kind in GateKind::ALL {
            self.registry
                .insert(kind.as_str().to_string(), Blueprint::Gate(kind));
        }
    }

    pub fn nor_policy(&self) -> NorPolicy {
        self.nor_policy
    }

    pub fn is_known(&self, type_name: &str) -> bool {
        self.registry.contains_key(type_name)
    }

    /// Compiles `netlist` with the types registered so far and makes it available
    /// as element type `type_name`.
    pub fn register_block(
        &mut self,
        type_name: impl Into<String>,
        netlist: Netlist,
        limits: usize,
    ) -> Result<(), FactoryError> {
        let type_name = type_name.into();
        if self.registry.contains_key(&type_name) {
            return Err(FactoryError::DuplicateType(type_name));
        }

        let block = CircuitBlock::with_factory(netlist, limits, self).named(type_name.as_str());
        tracing::debug!(
            type_name = %type_name,
            elements = block.element_names().len(),
            "registered block type"
        );
        self.registry.insert(type_name, Blueprint::Block(block));
        Ok(())
    }

    /// Builds the element for `model`, or `None` when its type is unknown.
    pub fn create(&self, model: &Model) -> Option<Element> {
        match self.registry.get(&model.kind)? {
            Blueprint::Gate(kind) => Some(Element::Gate(Gate::with_policy(
                model.name.clone(),
                *kind,
                self.nor_policy,
            ))),
            Blueprint::Block(template) => Some(Element::Composite(Composite::new(
                model.name.clone(),
                model.kind.clone(),
                template.clone(),
            ))),
        }
    }

    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.registry.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use crate::parser::parse;

    #[test]
    fn test_builtin_kinds() {
        let factory = ElementFactory::new();
        assert_eq!(factory.type_names(), vec!["AND", "NOR", "OR", "XOR"]);

        let element = factory.create(&Model::new("G", "XOR")).unwrap();
        assert_eq!(element.name(), "G");
        assert_eq!(element.kind_name(), "XOR");
    }

    #[test]
    fn test_unknown_type_creates_nothing() {
        let factory = ElementFactory::new();
        assert!(factory.create(&Model::new("G", "NAND")).is_none());
        assert!(!factory.is_known("NAND"));
    }

    #[test]
    fn test_register_block() {
        let mut factory = ElementFactory::new();
        let netlist = parse("NETLIST\n$INPUTS\n$OUTPUTS\n$MODELS\n$NETS\n").unwrap();
        factory.register_block("EMPTY", netlist.clone(), 1).unwrap();

        let element = factory.create(&Model::new("E1", "EMPTY")).unwrap();
        assert_eq!(element.as_block().map(|b| b.name()), Some("EMPTY"));
        assert_eq!(
            factory.register_block("AND", netlist, 1),
            Err(FactoryError::DuplicateType("AND".to_string()))
        );
    }
}
