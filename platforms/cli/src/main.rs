use clap::Parser;
use determinize::{
    analyze_with_limits, convert, export, export_json, export_nfa, split_word,
    AutomatonCatalog, AutomatonError, AutomatonLoader, DfaRunner, Limits, Nfa, NfaRunner,
};
use log::{info, LevelFilter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The automaton definition to convert (.nfa or .json)
    #[clap(short, long, conflicts_with = "demo")]
    input: Option<PathBuf>,

    /// Convert an embedded demo automaton by name
    #[clap(short = 'D', long)]
    demo: Option<String>,

    /// List the embedded demo automata
    #[clap(short, long)]
    list: bool,

    /// Write the result to this file instead of stdout
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Emit the DFA as JSON instead of Graphviz
    #[clap(long)]
    json: bool,

    /// Also write the input NFA as Graphviz to this file
    #[clap(long)]
    nfa_output: Option<PathBuf>,

    /// Report whether the NFA and the DFA accept this word (repeatable)
    #[clap(short, long)]
    word: Vec<String>,

    /// Enforce the classroom caps of 4 states, 3 symbols and 8 transitions
    #[clap(long)]
    classic_limits: bool,

    /// Maximum number of states
    #[clap(long)]
    max_states: Option<usize>,

    /// Maximum number of alphabet symbols
    #[clap(long)]
    max_symbols: Option<usize>,

    /// Maximum number of transitions
    #[clap(long)]
    max_transitions: Option<usize>,

    /// Log every discovered subset
    #[clap(short, long)]
    verbose: bool,
}

impl Cli {
    fn limits(&self) -> Limits {
        let base = if self.classic_limits {
            Limits::CLASSIC
        } else {
            Limits::default()
        };

        Limits {
            max_states: self.max_states.or(base.max_states),
            max_symbols: self.max_symbols.or(base.max_symbols),
            max_transitions: self.max_transitions.or(base.max_transitions),
        }
    }

    fn nfa(&self) -> Result<Option<Nfa>, AutomatonError> {
        match (&self.input, &self.demo) {
            (Some(path), _) => AutomatonLoader::load_nfa(path).map(Some),
            (None, Some(name)) => AutomatonCatalog::get_by_name(name).map(Some),
            (None, None) => Ok(None),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AutomatonError> {
    if cli.list {
        for index in 0..AutomatonCatalog::count() {
            let entry = AutomatonCatalog::get_info(index)?;
            println!(
                "{}: {} ({} states, {} symbols, {} transitions)",
                entry.index,
                entry.name,
                entry.state_count,
                entry.symbol_count,
                entry.transition_count
            );
        }
    }

    let Some(nfa) = cli.nfa()? else {
        return Ok(());
    };

    analyze_with_limits(&nfa, &cli.limits())?;
    info!("Loaded '{}'", nfa.name);

    if let Some(path) = &cli.nfa_output {
        write(&export_nfa(&nfa), path, Some("nfa"))?;
    }

    let dfa = convert(&nfa);

    let artifact = if cli.json {
        export_json(&dfa)?
    } else {
        export(&dfa)
    };

    match &cli.output {
        Some(path) => write(&artifact, path, (!cli.json).then_some("dfa"))?,
        None => print!("{}", artifact),
    }

    let mut nfa_runner = NfaRunner::new(&nfa);
    let mut dfa_runner = DfaRunner::new(&dfa);
    for word in &cli.word {
        let symbols = split_word(word);
        let by_nfa = nfa_runner.accepts(&symbols);
        let by_dfa = dfa_runner.accepts(&symbols);

        eprintln!(
            "{:?}: NFA {}, DFA {}",
            word,
            verdict(by_nfa),
            verdict(by_dfa)
        );
    }

    Ok(())
}

/// Writes `artifact` to `path`, with a rendering hint when it is a Graphviz `graph`.
fn write(artifact: &str, path: &Path, graph: Option<&str>) -> Result<(), AutomatonError> {
    AutomatonLoader::write_artifact(artifact, path)?;
    eprintln!("Wrote {}", path.display());
    if let Some(graph) = graph {
        eprintln!("Render it with: dot -Tsvg {} -o {}.svg", path.display(), graph);
    }

    Ok(())
}

fn verdict(accepted: bool) -> &'static str {
    if accepted {
        "accepts"
    } else {
        "rejects"
    }
}
