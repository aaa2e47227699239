use rusty_fpga::system_config::{BlockFactory, ConfiguredBlock, VectorOutcome};
use rusty_fpga::PinMap;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Bundled benches: name, configuration and the netlist it names, all compiled in.
const BUNDLED: [(&str, &str, &str); 3] = [
    (
        "and_gate",
        include_str!("../configs/and_gate.json"),
        include_str!("../netlists/and_gate.net"),
    ),
    (
        "full_adder",
        include_str!("../configs/full_adder.json"),
        include_str!("../netlists/full_adder.net"),
    ),
    (
        "rs_latch",
        include_str!("../configs/rs_latch.json"),
        include_str!("../netlists/rs_latch.net"),
    ),
];

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("Rusty FPGA - Netlist Block Simulator");
    println!("====================================");

    let paths: Vec<String> = std::env::args().skip(1).collect();
    let factory = BlockFactory::new();
    let mut failures = 0;

    if paths.is_empty() {
        for (name, json, netlist) in BUNDLED {
            match factory.create_embedded(json, netlist) {
                Ok(mut block) => failures += run_block(&mut block),
                Err(e) => {
                    eprintln!("Failed to create {}: {}", name, e);
                    failures += 1;
                }
            }
        }
    } else {
        for path in &paths {
            match factory.create_from_json(path) {
                Ok(mut block) => failures += run_block(&mut block),
                Err(e) => {
                    eprintln!("Failed to load {}: {}", path, e);
                    failures += 1;
                }
            }
        }
    }

    if failures == 0 {
        println!("\nAll vectors passed.");
        ExitCode::SUCCESS
    } else {
        println!("\n{} failure(s).", failures);
        ExitCode::FAILURE
    }
}

fn run_block(block: &mut ConfiguredBlock) -> usize {
    println!("\nBlock: {}", block.name());
    if !block.description().is_empty() {
        println!("  {}", block.description());
    }
    println!(
        "  {} elements, {} nets, {} passes per vector",
        block.block().elements().len(),
        block.block().netlist().nets.len(),
        block.block().limits()
    );

    let outcomes = block.run_vectors();
    for outcome in &outcomes {
        print_outcome(outcome);
    }
    outcomes.iter().filter(|o| !o.passed()).count()
}

fn print_outcome(outcome: &VectorOutcome) {
    let status = match (&outcome.expected, outcome.passed()) {
        (None, _) => "    ",
        (Some(_), true) => "ok  ",
        (Some(_), false) => "FAIL",
    };
    print!(
        "  [{}] {} -> {}",
        status,
        format_pins(&outcome.inputs),
        format_pins(&outcome.outputs)
    );
    match &outcome.expected {
        Some(expected) if !outcome.passed() => println!(" (expected {})", format_pins(expected)),
        _ => println!(),
    }
}

fn format_pins(pins: &PinMap) -> String {
    pins.iter()
        .map(|(pin, value)| format!("{}={}", pin, value))
        .collect::<Vec<_>>()
        .join(" ")
}
