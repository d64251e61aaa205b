use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use deskcalc::converter::{convert_str, Category, Direction};
use deskcalc::{parse_keys, Config, FileStore, KeyValueStore, MemoryStore, Mode, Session};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Keypad calculator with history, unit conversion and a light or dark theme
#[derive(Parser)]
#[command(name = "deskcalc", version, about, long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Store file for history and preferences
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    /// Keep everything in memory, nothing is read or written
    #[arg(long, global = true, conflicts_with = "store")]
    memory: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive calculator (the default)
    Repl,

    /// Press a sequence of keys, like "7 + 3 =", and print the display
    Keys {
        /// Keys to press; words are function names or ac, ce and del
        #[arg(required = true, allow_hyphen_values = true)]
        sequence: Vec<String>,
    },

    /// Convert a value between two units
    Convert {
        /// length, weight or temperature
        category: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
        from: String,
        to: String,

        /// Read the value in the target unit and convert it back
        #[arg(short, long)]
        reverse: bool,
    },

    /// List past computations, newest first
    History {
        /// Delete all entries
        #[arg(long)]
        clear: bool,
    },

    /// Show the theme
    Theme {
        /// Switch between light and dark
        #[arg(long)]
        toggle: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    let command = cli.command.unwrap_or(Command::Repl);

    if cli.memory {
        return run(Session::open(MemoryStore::new(), &config), command);
    }
    let path = cli
        .store
        .or_else(|| config.store_path.clone())
        .or_else(FileStore::default_path)
        .ok_or_else(|| anyhow!("no data directory, use --store or --memory"))?;
    let store = FileStore::open(&path).with_context(|| format!("opening {}", path.display()))?;
    run(Session::open(store, &config), command)
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let path = match path.cloned().or_else(Config::default_path) {
        Some(path) => path,
        None => return Ok(Config::default()),
    };
    debug!(path = %path.display(), "configuration");
    Ok(Config::load(&path)?)
}

fn run<S: KeyValueStore>(mut session: Session<S>, command: Command) -> Result<()> {
    match command {
        Command::Repl => repl(&mut session),
        Command::Keys { sequence } => {
            press(&mut session, &sequence.join(" "))?;
            println!("{}", session.calculator().display());
            Ok(())
        }
        Command::Convert {
            category,
            value,
            from,
            to,
            reverse,
        } => {
            println!("{}", convert_args(&category, &value, &from, &to, reverse)?);
            Ok(())
        }
        Command::History { clear } => {
            if clear {
                session.calculator_mut().clear_history();
            } else {
                print_history(&session);
            }
            Ok(())
        }
        Command::Theme { toggle } => {
            if toggle {
                session.toggle_theme();
            }
            println!("{}", session.theme());
            Ok(())
        }
    }
}

fn press<S: KeyValueStore>(session: &mut Session<S>, line: &str) -> Result<()> {
    for input in parse_keys(line)? {
        session.handle(input)?;
    }
    Ok(())
}

fn convert_args(category: &str, value: &str, from: &str, to: &str, reverse: bool) -> Result<String> {
    let category: Category = category.parse()?;
    let direction = if reverse {
        Direction::Reverse
    } else {
        Direction::Forward
    };
    Ok(convert_str(category, value, from, to, direction)?)
}

fn print_history<S: KeyValueStore>(session: &Session<S>) {
    let history = session.calculator().history();
    if history.is_empty() {
        println!("No history");
        return;
    }
    for (index, entry) in history.iter().enumerate() {
        println!(
            "{:>3}  {}  {} = {}",
            index,
            entry.timestamp,
            entry.expression,
            entry.formatted_result()
        );
    }
}

fn repl<S: KeyValueStore>(session: &mut Session<S>) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!("deskcalc, {} theme. Type :help for commands.", session.theme());

    loop {
        let prompt = match session.calculator().pending_summary() {
            summary if summary.is_empty() => "> ".to_string(),
            summary => format!("{} > ", summary),
        };
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    println!("Goodbye!");
                    break;
                }
                rl.add_history_entry(line)?;
                match line.strip_prefix(':') {
                    Some(command) => {
                        if !repl_command(session, command) {
                            break;
                        }
                    }
                    None => match press(session, line) {
                        Ok(()) => println!("{}", session.calculator().display()),
                        Err(err) => println!("{}", err),
                    },
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

const HELP: &str = "\
keys      0-9 . + - * / % ^ ( ) = and the words sin cos tan log ln sqrt ac ce del
:history                      list past computations
:recall N                     put entry N on the display
:clear-history                delete all entries
:convert CAT VALUE FROM TO    convert units (length, weight, temperature)
:theme                        switch between light and dark
:mode basic|scientific        change the keypad
:quit                         leave";

/// Run one `:` command. Returns false to leave the loop.
fn repl_command<S: KeyValueStore>(session: &mut Session<S>, command: &str) -> bool {
    let words: Vec<&str> = command.split_whitespace().collect();
    let outcome = match words.as_slice() {
        ["quit"] | ["q"] => return false,
        ["help"] => {
            println!("{}", HELP);
            Ok(())
        }
        ["history"] => {
            print_history(session);
            Ok(())
        }
        ["recall", index] => index
            .parse::<usize>()
            .map_err(|_| anyhow!("not an index: {}", index))
            .and_then(|index| Ok(session.calculator_mut().recall_history(index)?))
            .map(|()| println!("{}", session.calculator().display())),
        ["clear-history"] => {
            session.calculator_mut().clear_history();
            Ok(())
        }
        ["convert", category, value, from, to] => {
            convert_args(category, value, from, to, false).map(|result| println!("{}", result))
        }
        ["theme"] => {
            println!("{}", session.toggle_theme());
            Ok(())
        }
        ["mode", mode] => parse_mode(mode).map(|mode| {
            session.calculator_mut().switch_mode(mode);
            println!("{}", session.calculator().display());
        }),
        _ => Err(anyhow!("unknown command :{}, try :help", command)),
    };
    if let Err(err) = outcome {
        println!("{}", err);
    }
    true
}

fn parse_mode(name: &str) -> Result<Mode> {
    match name {
        "basic" => Ok(Mode::Basic),
        "scientific" => Ok(Mode::Scientific),
        _ => bail!("unknown mode {}", name),
    }
}
