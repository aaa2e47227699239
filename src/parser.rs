//! Line-oriented netlist parser.
//!
//! The text is scanned once, top to bottom. Marker lines move the parser through
//! [`ParserState`] in a fixed order; every other line is a record of the current section.
//!
//! ```text
//! NETLIST
//! $INPUTS
//! NORTH
//! $OUTPUTS
//! UP
//! $MODELS
//! AND1; AND
//! $NETS
//! NET1; NORTH AND1.0
//! $END
//! ```

use thiserror::Error;

use crate::netlist::{Model, Net, Netlist};
use crate::types::Direction;

/// Errors raised while reading a netlist. Line numbers are 1-based.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("missing section marker '{marker}'")]
    MissingSection { marker: &'static str },
    #[error("line {line}: marker '{marker}' is out of order")]
    UnexpectedMarker { line: usize, marker: String },
    #[error("line {line}: unknown direction '{token}'")]
    UnknownDirection { line: usize, token: String },
    #[error("line {line}: malformed model '{content}', expected '<name>; <type>'")]
    MalformedModel { line: usize, content: String },
    #[error("line {line}: malformed net '{content}', expected '<name>; <source> <destination>'")]
    MalformedNet { line: usize, content: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    BeforeStart,
    /// After `NETLIST`, waiting for `$INPUTS`.
    Header,
    Inputs,
    Outputs,
    Models,
    Nets,
    Ended,
}

const MARKERS: [&str; 6] = ["NETLIST", "$INPUTS", "$OUTPUTS", "$MODELS", "$NETS", "$END"];

impl ParserState {
    /// The state entered when `marker` is read in `self`, if that transition is legal.
    fn transition(self, marker: &str) -> Option<ParserState> {
        match (self, marker) {
            (ParserState::BeforeStart, "NETLIST") => Some(ParserState::Header),
            (ParserState::Header, "$INPUTS") => Some(ParserState::Inputs),
            (ParserState::Inputs, "$OUTPUTS") => Some(ParserState::Outputs),
            (ParserState::Outputs, "$MODELS") => Some(ParserState::Models),
            (ParserState::Models, "$NETS") => Some(ParserState::Nets),
            (ParserState::Nets, "$END") => Some(ParserState::Ended),
            _ => None,
        }
    }

    /// Marker that has to follow before the netlist is complete.
    fn pending_marker(self) -> Option<&'static str> {
        match self {
            ParserState::BeforeStart => Some("NETLIST"),
            ParserState::Header => Some("$INPUTS"),
            ParserState::Inputs => Some("$OUTPUTS"),
            ParserState::Outputs => Some("$MODELS"),
            ParserState::Models => Some("$NETS"),
            ParserState::Nets | ParserState::Ended => None,
        }
    }

    /// Lines outside the NETLIST..$END frame carry no meaning.
    fn ignores_content(self) -> bool {
        matches!(self, ParserState::BeforeStart | ParserState::Ended)
    }
}

/// Parses netlist text into a [`Netlist`].
pub fn parse(text: &str) -> Result<Netlist, FormatError> {
    let mut parser = NetlistParser::new();
    for (index, line) in text.lines().enumerate() {
        parser.feed(index + 1, line)?;
    }
    parser.finish()
}

#[derive(Debug)]
pub struct NetlistParser {
    state: ParserState,
    netlist: Netlist,
}

impl Default for NetlistParser {
    fn default() -> Self {
        Self::new()
    }
}

impl NetlistParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::BeforeStart,
            netlist: Netlist::new(),
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Consumes a single line of input.
    pub fn feed(&mut self, line_number: usize, raw: &str) -> Result<(), FormatError> {
        let line = raw.trim();
        if line.is_empty() {
            return Ok(());
        }

        if MARKERS.contains(&line) {
            match self.state.transition(line) {
                Some(next) => self.state = next,
                // Anything outside the frame is ignored, markers included.
                None if self.state.ignores_content() => {}
                None => {
                    return Err(FormatError::UnexpectedMarker {
                        line: line_number,
                        marker: line.to_string(),
                    })
                }
            }
            return Ok(());
        }

        match self.state {
            ParserState::BeforeStart | ParserState::Ended => {}
            ParserState::Header => {
                return Err(FormatError::MissingSection { marker: "$INPUTS" });
            }
            ParserState::Inputs => {
                let direction = parse_direction(line_number, line)?;
                self.netlist.inputs.push(direction);
            }
            ParserState::Outputs => {
                let direction = parse_direction(line_number, line)?;
                self.netlist.outputs.push(direction);
            }
            ParserState::Models => {
                let model = parse_model(line_number, line)?;
                self.netlist.models.push(model);
            }
            ParserState::Nets => {
                let net = parse_net(line_number, line)?;
                self.netlist.nets.push(net);
            }
        }
        Ok(())
    }

    /// Returns the netlist once the input is exhausted.
    pub fn finish(self) -> Result<Netlist, FormatError> {
        match self.state.pending_marker() {
            Some(marker) => Err(FormatError::MissingSection { marker }),
            None => Ok(self.netlist),
        }
    }
}

fn parse_direction(line: usize, token: &str) -> Result<Direction, FormatError> {
    token
        .parse::<Direction>()
        .map_err(|_| FormatError::UnknownDirection {
            line,
            token: token.to_string(),
        })
}

fn parse_model(line: usize, content: &str) -> Result<Model, FormatError> {
    let fields: Vec<&str> = content.split(';').map(str::trim).collect();
    match fields.as_slice() {
        [name, kind] => Ok(Model::new(*name, *kind)),
        _ => Err(FormatError::MalformedModel {
            line,
            content: content.to_string(),
        }),
    }
}

fn parse_net(line: usize, content: &str) -> Result<Net, FormatError> {
    let malformed = || FormatError::MalformedNet {
        line,
        content: content.to_string(),
    };

    let fields: Vec<&str> = content.split(';').map(str::trim).collect();
    let [name, connection] = fields.as_slice() else {
        return Err(malformed());
    };

    let endpoints: Vec<&str> = connection.split(' ').collect();
    match endpoints.as_slice() {
        [source, destination] if !source.is_empty() && !destination.is_empty() => {
            Ok(Net::new(*name, *source, *destination))
        }
        _ => Err(malformed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AND_GATE: &str = "NETLIST\n$INPUTS\nNORTH\nSOUTH\n$OUTPUTS\nUP\n$MODELS\nAND1; AND\n\
                            $NETS\nNET1; NORTH AND1.0\nNET2; SOUTH AND1.1\nNET3; AND1.2 UP\n$END";

    #[test]
    fn test_parse_sections() {
        let netlist = parse(AND_GATE).unwrap();
        assert_eq!(netlist.inputs, vec![Direction::North, Direction::South]);
        assert_eq!(netlist.outputs, vec![Direction::Up]);
        assert_eq!(netlist.models, vec![Model::new("AND1", "AND")]);
        assert_eq!(netlist.nets.len(), 3);
        assert_eq!(netlist.nets[2], Net::new("NET3", "AND1.2", "UP"));
    }

    #[test]
    fn test_lines_outside_frame_are_ignored() {
        let text = format!("garbage\n{}\n$OUTPUTS\nnot a direction", AND_GATE);
        let netlist = parse(&text).unwrap();
        assert_eq!(netlist.inputs.len(), 2);
        assert_eq!(netlist.nets.len(), 3);
    }

    #[test]
    fn test_end_marker_is_optional() {
        let text = AND_GATE.trim_end_matches("$END");
        assert_eq!(parse(text).unwrap(), parse(AND_GATE).unwrap());
    }

    #[test]
    fn test_missing_nets_section() {
        let text = "NETLIST\n$INPUTS\n$OUTPUTS\n$MODELS\nAND1; AND";
        assert_eq!(
            parse(text),
            Err(FormatError::MissingSection { marker: "$NETS" })
        );
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            parse("$INPUTS\nNORTH"),
            Err(FormatError::MissingSection { marker: "NETLIST" })
        );
    }

    #[test]
    fn test_marker_out_of_order() {
        let text = "NETLIST\n$INPUTS\n$MODELS\n";
        assert_eq!(
            parse(text),
            Err(FormatError::UnexpectedMarker {
                line: 3,
                marker: "$MODELS".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_direction() {
        let text = "NETLIST\n$INPUTS\nNorth\n";
        assert_eq!(
            parse(text),
            Err(FormatError::UnknownDirection {
                line: 3,
                token: "North".to_string()
            })
        );
    }

    #[test]
    fn test_malformed_model() {
        assert!(matches!(
            parse_model(7, "AND1 AND"),
            Err(FormatError::MalformedModel { line: 7, .. })
        ));
        assert!(parse_model(7, "AND1; AND; extra").is_err());
        assert_eq!(parse_model(1, " AND1 ;  OR ").unwrap(), Model::new("AND1", "OR"));
    }

    #[test]
    fn test_malformed_net() {
        assert!(parse_net(1, "NET1 NORTH AND1.0").is_err());
        assert!(parse_net(1, "NET1; NORTH").is_err());
        assert!(parse_net(1, "NET1; NORTH  AND1.0").is_err());
        assert!(parse_net(1, "NET1; NORTH AND1.0 UP").is_err());
        assert_eq!(
            parse_net(1, "NET1;NORTH AND1.0").unwrap(),
            Net::new("NET1", "NORTH", "AND1.0")
        );
    }

    #[test]
    fn test_crlf_and_indentation() {
        let text = AND_GATE.replace('\n', "\r\n    ");
        assert_eq!(parse(&text).unwrap(), parse(AND_GATE).unwrap());
    }

    #[test]
    fn test_error_messages() {
        let err = FormatError::MalformedNet {
            line: 4,
            content: "x".to_string(),
        };
        assert!(err.to_string().starts_with("line 4: malformed net 'x'"));
    }
}
