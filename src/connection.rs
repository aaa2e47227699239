use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::fmt;

use crate::components::ElementFactory;
use crate::netlist::Netlist;
use crate::types::Direction;

/// Wiring problems that do not stop a netlist from being simulated.
/// Affected pins simply stay undefined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityWarning {
    UnknownModelType { model: String, kind: String },
    DanglingReference { net: String, pin: String },
    UndrivenPin { pin: String },
    UnusedInput { direction: Direction },
    UnconnectedOutput { direction: Direction },
}

impl fmt::Display for ConnectivityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectivityWarning::UnknownModelType { model, kind } => {
                write!(f, "model {} has unknown type '{}' and is inert", model, kind)
            }
            ConnectivityWarning::DanglingReference { net, pin } => {
                write!(f, "net {} references unknown pin {}", net, pin)
            }
            ConnectivityWarning::UndrivenPin { pin } => {
                write!(f, "pin {} has no driver", pin)
            }
            ConnectivityWarning::UnusedInput { direction } => {
                write!(f, "input {} is not connected", direction)
            }
            ConnectivityWarning::UnconnectedOutput { direction } => {
                write!(f, "output {} is never driven", direction)
            }
        }
    }
}

/// Static analysis of the wiring of a netlist.
#[derive(Debug, Clone, Default)]
pub struct ConnectivityReport {
    warnings: Vec<ConnectivityWarning>,
    connections: BTreeMap<String, Vec<String>>, // pin -> pins sharing a net with it
}

impl ConnectivityReport {
    pub fn analyze(netlist: &Netlist, factory: &ElementFactory) -> Self {
        let mut warnings = Vec::new();
        let mut element_inputs: Vec<String> = Vec::new();
        let mut driven: HashSet<String> = netlist.input_pins().map(str::to_string).collect();
        let instances: HashSet<&str> = netlist.models.iter().map(|m| m.name.as_str()).collect();

        for model in &netlist.models {
            match factory.create(model) {
                Some(element) => {
                    element_inputs.extend(element.input_pins());
                    driven.extend(element.output_pins());
                }
                None => warnings.push(ConnectivityWarning::UnknownModelType {
                    model: model.name.clone(),
                    kind: model.kind.clone(),
                }),
            }
        }

        let mut connections: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for net in &netlist.nets {
            for pin in net.endpoints() {
                if !is_known_pin(pin, &instances) {
                    warnings.push(ConnectivityWarning::DanglingReference {
                        net: net.name.clone(),
                        pin: pin.to_string(),
                    });
                }
            }
            connections
                .entry(net.source.clone())
                .or_default()
                .push(net.destination.clone());
            connections
                .entry(net.destination.clone())
                .or_default()
                .push(net.source.clone());
        }

        // Drive flows along nets until nothing changes.
        loop {
            let before = driven.len();
            for net in &netlist.nets {
                if driven.contains(&net.source) {
                    driven.insert(net.destination.clone());
                }
            }
            if driven.len() == before {
                break;
            }
        }

        let mut undriven = BTreeSet::new();
        for net in &netlist.nets {
            if !driven.contains(&net.source) {
                undriven.insert(net.source.clone());
            }
        }
        for pin in element_inputs {
            if !driven.contains(&pin) {
                undriven.insert(pin);
            }
        }
        warnings.extend(
            undriven
                .into_iter()
                .map(|pin| ConnectivityWarning::UndrivenPin { pin }),
        );

        for direction in &netlist.inputs {
            if !netlist.nets.iter().any(|n| n.source == direction.as_str()) {
                warnings.push(ConnectivityWarning::UnusedInput {
                    direction: *direction,
                });
            }
        }
        for direction in &netlist.outputs {
            if !driven.contains(direction.as_str()) {
                warnings.push(ConnectivityWarning::UnconnectedOutput {
                    direction: *direction,
                });
            }
        }

        ConnectivityReport {
            warnings,
            connections,
        }
    }

    pub fn warnings(&self) -> &[ConnectivityWarning] {
        &self.warnings
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Pins sharing a net with `pin`.
    pub fn connected_pins(&self, pin: &str) -> Option<&Vec<String>> {
        self.connections.get(pin)
    }

    pub fn are_connected(&self, pin1: &str, pin2: &str) -> bool {
        self.connections
            .get(pin1)
            .map(|pins| pins.iter().any(|p| p == pin2))
            .unwrap_or(false)
    }

    /// Groups of pins joined by nets, in pin-name order.
    pub fn connection_groups(&self) -> Vec<Vec<String>> {
        let mut visited = HashSet::new();
        let mut groups = Vec::new();

        for pin in self.connections.keys() {
            if visited.contains(pin) {
                continue;
            }
            let mut group = Vec::new();
            let mut queue = VecDeque::from([pin.clone()]);

            while let Some(current) = queue.pop_front() {
                if visited.insert(current.clone()) {
                    if let Some(neighbors) = self.connections.get(&current) {
                        queue.extend(neighbors.iter().filter(|n| !visited.contains(*n)).cloned());
                    }
                    group.push(current);
                }
            }

            if group.len() > 1 {
                group.sort();
                groups.push(group);
            }
        }

        groups
    }
}

fn is_known_pin(pin: &str, instances: &HashSet<&str>) -> bool {
    if pin.parse::<Direction>().is_ok() {
        return true;
    }
    match pin.rsplit_once('.') {
        Some((instance, _)) => instances.contains(instance),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn analyze(text: &str) -> ConnectivityReport {
        ConnectivityReport::analyze(&parse(text).unwrap(), &ElementFactory::new())
    }

    #[test]
    fn test_clean_netlist() {
        let report = analyze(
            "NETLIST\n$INPUTS\nNORTH\nSOUTH\n$OUTPUTS\nUP\n$MODELS\nAND1; AND\n\
             $NETS\nNET1; NORTH AND1.0\nNET2; SOUTH AND1.1\nNET3; AND1.2 UP\n$END",
        );
        assert!(report.is_clean(), "{:?}", report.warnings());
        assert!(report.are_connected("NORTH", "AND1.0"));
        assert!(report.are_connected("AND1.0", "NORTH"));
        assert!(!report.are_connected("NORTH", "SOUTH"));
    }

    #[test]
    fn test_unknown_type_leaves_output_undriven() {
        let report = analyze(
            "NETLIST\n$INPUTS\nNORTH\nSOUTH\n$OUTPUTS\nUP\n$MODELS\nG; NAND\n\
             $NETS\nNET1; NORTH G.0\nNET2; SOUTH G.1\nNET3; G.2 UP\n$END",
        );
        assert_eq!(
            report.warnings(),
            &[
                ConnectivityWarning::UnknownModelType {
                    model: "G".to_string(),
                    kind: "NAND".to_string()
                },
                ConnectivityWarning::UndrivenPin {
                    pin: "G.2".to_string()
                },
                ConnectivityWarning::UnconnectedOutput {
                    direction: Direction::Up
                },
            ]
        );
    }

    #[test]
    fn test_dangling_reference_and_unused_input() {
        let report = analyze(
            "NETLIST\n$INPUTS\nNORTH\nWEST\n$OUTPUTS\nUP\n$MODELS\nA; OR\n\
             $NETS\nN1; NORTH A.0\nN2; NORTH A.1\nN3; B.2 UP\n$END",
        );
        assert!(report.warnings().contains(&ConnectivityWarning::DanglingReference {
            net: "N3".to_string(),
            pin: "B.2".to_string()
        }));
        assert!(report.warnings().contains(&ConnectivityWarning::UnusedInput {
            direction: Direction::West
        }));
    }

    #[test]
    fn test_connection_groups() {
        let report = analyze(
            "NETLIST\n$INPUTS\nNORTH\n$OUTPUTS\nUP\nDOWN\n$MODELS\nA; AND\n\
             $NETS\nN1; NORTH A.0\nN2; NORTH A.1\nN3; A.2 UP\nN4; A.2 DOWN\n$END",
        );
        assert_eq!(
            report.connection_groups(),
            vec![
                vec!["A.0", "A.1", "NORTH"],
                vec!["A.2", "DOWN", "UP"],
            ]
        );
    }

    #[test]
    fn test_warning_messages() {
        let warning = ConnectivityWarning::UndrivenPin {
            pin: "X.2".to_string(),
        };
        assert_eq!(warning.to_string(), "pin X.2 has no driver");
    }
}
