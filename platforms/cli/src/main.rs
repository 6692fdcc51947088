use busybeaver::parser::parse_raw;
use busybeaver::programs::DEMO_PROGRAM;
use busybeaver::types::{INITIAL_TAPE_LENGTH, TAPE_GROWTH_CHUNK};
use busybeaver::{
    encode, DisplayOptions, HaltRule, MachineConfig, ProgramLoader, ProgramManager, RawTable,
    Reporter, TuringMachine, TuringMachineError,
};
use chrono::{DateTime, Utc};
use clap::Parser;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Runs a two-symbol Turing machine until it halts and reports its score.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  busybeaver
  busybeaver programs/busy-beaver-3.json
  busybeaver --machine 1RB1LB_1LA1RH --print-tape
  cat table.json | busybeaver --json")]
struct Cli {
    /// Path to a JSON transition table, e.g. {"0A": "1RB", "1A": "1LB", ...}.
    /// Without any table the 4-state busy beaver demo runs.
    program: Option<PathBuf>,

    /// Read the JSON transition table from stdin.
    #[clap(long, conflicts_with_all = ["program", "machine", "demo"])]
    json: bool,

    /// Machine in compact notation, e.g. 1RB1LB_1LA1RH.
    #[clap(short, long, conflicts_with_all = ["program", "demo"])]
    machine: Option<String>,

    /// Run a built-in program by name.
    #[clap(short, long, conflicts_with = "program")]
    demo: Option<String>,

    /// List the built-in programs and exit.
    #[clap(short, long)]
    list: bool,

    /// Print the validated table in compact notation and exit.
    #[clap(long)]
    encode: bool,

    /// Print the whole tape on every step instead of step log lines.
    #[clap(long)]
    print_tape: bool,

    /// Do not print the tape when the machine halts.
    #[clap(long)]
    no_halt_tape: bool,

    /// Accept any number of halting transitions instead of exactly one (an odd count).
    #[clap(long)]
    any_halt: bool,

    /// Stop after this many steps if the machine has not halted.
    #[clap(long)]
    max_steps: Option<u64>,

    /// Number of cells on the initial tape.
    #[clap(long, default_value_t = INITIAL_TAPE_LENGTH)]
    tape_length: usize,

    /// Number of cells added when the head runs off the tape.
    #[clap(long, default_value_t = TAPE_GROWTH_CHUNK)]
    chunk: usize,
}

impl Cli {
    fn machine_config(&self) -> MachineConfig {
        MachineConfig {
            initial_tape_length: self.tape_length,
            growth_chunk: self.chunk,
            halt_rule: if self.any_halt {
                HaltRule::AtLeastOne
            } else {
                HaltRule::Toggle
            },
            step_limit: self.max_steps,
        }
    }

    fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            show_tape: self.print_tape,
            suppress_halt_tape: self.no_halt_tape,
            ..DisplayOptions::default()
        }
    }
}

fn main() {
    let started = Utc::now();
    init_tracing();

    let cli = Cli::parse();

    if cli.list {
        list_programs();
        return;
    }

    // Nothing has run yet, so no timing report on these failures.
    let raw = load_table(&cli).unwrap_or_else(|e| exit_with(&e));
    let mut machine =
        TuringMachine::from_raw(&raw, cli.machine_config()).unwrap_or_else(|e| exit_with(&e));

    if cli.encode {
        match encode(machine.table()) {
            Some(notation) => println!("{}", notation),
            None => exit_with(&TuringMachineError::InvalidConfig(
                "too many states for compact notation".to_string(),
            )),
        }
        return;
    }

    let options = cli.display_options();
    let result = options.validate().and_then(|_| {
        let mut reporter = Reporter::new(BufWriter::new(io::stdout().lock()), options);
        machine.run(&mut reporter)
    });

    if let Err(e) = &result {
        println!("Error: {}", e);
    }

    print_timing(started, Utc::now());

    if result.is_err() {
        process::exit(1);
    }
}

/// Logs go to stderr so they never mix with the machine output. `RUST_LOG` overrides
/// the default level.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(io::stderr)
        .init();
}

/// Picks the table source: a file, stdin JSON, compact notation, or a built-in program.
fn load_table(cli: &Cli) -> Result<RawTable, TuringMachineError> {
    if let Some(path) = &cli.program {
        ProgramLoader::load_program(path)
    } else if cli.json {
        if atty::is(atty::Stream::Stdin) {
            return Err(TuringMachineError::FileError(
                "--json expects a table piped into stdin".to_string(),
            ));
        }
        ProgramLoader::load_program_from_reader(io::stdin().lock())
    } else if let Some(machine) = &cli.machine {
        parse_raw(machine)
    } else {
        let name = cli.demo.as_deref().unwrap_or(DEMO_PROGRAM);
        ProgramManager::get_program_by_name(name).map(|program| program.table)
    }
}

fn list_programs() {
    for index in 0..ProgramManager::get_program_count() {
        match ProgramManager::get_program_info(index) {
            Ok(info) => println!(
                "{}: {} states, {} transitions, starts in {}",
                info.name, info.state_count, info.transition_count, info.initial_state
            ),
            Err(e) => println!("#{}: {}", index, e),
        }
    }
}

fn print_timing(started: DateTime<Utc>, stopped: DateTime<Utc>) {
    println!(
        "Time used in seconds: {}",
        (stopped - started).num_seconds()
    );
    println!("Timestamp start: {}", started.timestamp());
    println!("Timestamp stop: {}", stopped.timestamp());
}

fn exit_with(error: &TuringMachineError) -> ! {
    println!("Error: {}", error);
    process::exit(1);
}
