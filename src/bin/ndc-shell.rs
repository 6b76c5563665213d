//! Interactive NDC console application

use ndc::*;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Command completer for the REPL
struct CommandCompleter {
    commands: Vec<&'static str>,
}

impl CommandCompleter {
    fn new() -> Self {
        Self {
            commands: vec![
                "delete",
                "dir",
                "exit",
                "extract",
                "find",
                "find-all",
                "get",
                "help",
                "ls",
                "open",
                "partition",
                "put",
                "put-dir",
                "quit",
                "rm",
                "tree",
                "version",
            ],
        }
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line_to_cursor = &line[..pos];
        if line_to_cursor.contains(' ') {
            return Ok((pos, vec![]));
        }

        let prefix = line_to_cursor.to_lowercase();
        let matches: Vec<Pair> = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(&prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// Currently opened image and partition
struct Session {
    image: Option<PathBuf>,
    partition: u32,
}

impl Session {
    fn image(&self) -> Option<&PathBuf> {
        if self.image.is_none() {
            println!("No image opened. Use 'open <path>' first.");
        }
        self.image.as_ref()
    }
}

/// Get the path to the history file
fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|mut p| {
        p.push(".ndc_history");
        p
    })
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let bin = std::env::var_os("NDC_BIN")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BIN));

    let ndc = match Ndc::new(&bin) {
        Ok(ndc) => ndc,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        return run_once(&ndc, &args);
    }

    repl(&ndc);
    ExitCode::SUCCESS
}

/// `ndc-shell tree <image> [path]`
fn run_once(ndc: &Ndc, args: &[String]) -> ExitCode {
    match args {
        [command, image, rest @ ..] if command == "tree" && rest.len() <= 1 => {
            let top = rest.first().map(String::as_str).unwrap_or("");
            match ndc.render_tree(image, top, 0) {
                Ok(tree) => {
                    print!("{}", tree);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        _ => {
            eprintln!("Usage: ndc-shell [tree <image> [path]]");
            ExitCode::from(2)
        }
    }
}

fn repl(ndc: &Ndc) {
    println!("=== NDC shell ===");
    println!("{} ({})", ndc.version(), ndc.bin().display());
    println!("Type 'help' for available commands\n");

    let mut rl = match Editor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };
    rl.set_helper(Some(CommandCompleter::new()));

    if let Some(history_path) = history_path() {
        let _ = rl.load_history(&history_path);
    }

    let mut session = Session {
        image: None,
        partition: 0,
    };

    loop {
        let input = match rl.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(input);

        let parts = parse_command_line(input);
        if parts.is_empty() {
            continue;
        }
        let command = parts[0].to_lowercase();
        let arg = |idx: usize| parts.get(idx).map(String::as_str);

        match command.as_str() {
            "help" => print_help(),
            "quit" | "exit" => break,
            "version" => println!(
                "{} ({} output, image paths separated by {:?})",
                ndc.version(),
                ndc.profile().encoding.name(),
                ndc.profile().separator
            ),
            "open" => match arg(1) {
                Some(path) => {
                    let path = expand_home(path);
                    if !path.is_file() {
                        println!("Warning: {} does not exist yet", path.display());
                    }
                    println!("Opened: {}", path.display());
                    session.image = Some(path);
                    session.partition = 0;
                }
                None => println!("Usage: open <path>"),
            },
            "partition" => match arg(1) {
                Some(n) => match n.parse() {
                    Ok(n) => session.partition = n,
                    Err(_) => println!("Invalid partition number: {}", n),
                },
                None => println!("Partition: {}", session.partition),
            },
            "ls" | "dir" => {
                if let Some(image) = session.image() {
                    match ndc.list(image, arg(1).unwrap_or(""), session.partition) {
                        Ok(entries) => print_entries(&entries),
                        Err(e) => println!("Error: {}", e),
                    }
                }
            }
            "find" | "find-all" => {
                let Some(pattern) = arg(1) else {
                    println!("Usage: {} <pattern> [path]", command);
                    continue;
                };
                if let Some(image) = session.image() {
                    let path = arg(2).unwrap_or("");
                    let result = if command == "find" {
                        ndc.find(image, pattern, path, session.partition)
                            .map(|found| found.into_iter().collect::<Vec<_>>())
                    } else {
                        ndc.find_all(image, pattern, path, session.partition)
                    };
                    match result {
                        Ok(entries) if entries.is_empty() => println!("No match for {}", pattern),
                        Ok(entries) => print_entries(&entries),
                        Err(e) => println!("Error: {}", e),
                    }
                }
            }
            "get" => {
                let Some(path) = arg(1) else {
                    println!("Usage: get <path> [dest]");
                    continue;
                };
                if let Some(image) = session.image() {
                    let dest = arg(2).unwrap_or(".");
                    match ndc.get(image, path, dest, session.partition) {
                        Ok(()) => println!("Copied {} to {}", path, dest),
                        Err(e) => println!("Error: {}", e),
                    }
                }
            }
            "put" | "put-dir" => {
                let (Some(src), path) = (arg(1), arg(2)) else {
                    println!("Usage: {} <src> [path]", command);
                    continue;
                };
                if let Some(image) = session.image() {
                    let path = path.unwrap_or("");
                    let result = if command == "put" {
                        ndc.put(image, src, path, session.partition)
                    } else {
                        ndc.put_directory(image, src, path, session.partition)
                    };
                    match result {
                        Ok(()) => println!("Stored {}", src),
                        Err(e) => println!("Error: {}", e),
                    }
                }
            }
            "rm" | "delete" => {
                let Some(path) = arg(1) else {
                    println!("Usage: rm <path>");
                    continue;
                };
                if let Some(image) = session.image() {
                    match ndc.delete(image, path, session.partition) {
                        Ok(()) => println!("Deleted {}", path),
                        Err(e) => println!("Error: {}", e),
                    }
                }
            }
            "tree" => {
                if let Some(image) = session.image() {
                    match ndc.render_tree(image, arg(1).unwrap_or(""), session.partition) {
                        Ok(tree) => print!("{}", tree),
                        Err(e) => println!("Error: {}", e),
                    }
                }
            }
            "extract" => {
                if let Some(image) = session.image() {
                    let dest = arg(1).unwrap_or(".");
                    match ndc.extract(image, dest, session.partition) {
                        Ok(summary) => println!(
                            "Extracted {} files and {} directories to {}",
                            summary.files, summary.directories, dest
                        ),
                        Err(e) => println!("Error: {}", e),
                    }
                }
            }
            _ => println!("Unknown command: {}. Type 'help' for available commands.", command),
        }
    }

    if let Some(history_path) = history_path() {
        let _ = rl.save_history(&history_path);
    }
    println!("Goodbye!");
}

fn parse_command_line(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            ' ' | '\t' if !in_quotes => {
                if !current.is_empty() || quoted {
                    parts.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() || quoted {
        parts.push(current);
    }

    parts
}

fn print_entries(entries: &[Entry]) {
    println!("{:<24} {:>10} {:<8} {}", "Name", "Size", "Type", "Modified");
    println!("{}", "-".repeat(64));
    for entry in entries {
        println!(
            "{:<24} {:>10} {:<8} {}",
            entry.name,
            entry.size,
            entry.entry_type,
            entry.modified_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
}

fn print_help() {
    println!("Available commands:");
    println!("  open <image>                 - Select a disk image (use quotes for paths with spaces)");
    println!("  partition [n]                - Show or set the partition number (default 0)");
    println!("  version                      - Show the NDC version");
    println!("  ls [path]                    - List a folder (dir)");
    println!("  find <pattern> [path]        - Show the first match");
    println!("  find-all <pattern> [path]    - Show every match");
    println!("  get <path> [dest]            - Copy a file out of the image (dest defaults to .)");
    println!("  put <src> [path]             - Copy a file into the image");
    println!("  put-dir <dir> [path]         - Copy a directory into the image");
    println!("  rm <path>                    - Delete from the image (delete)");
    println!("  tree [path]                  - Show the folder tree");
    println!("  extract [dest]               - Copy the whole image out (dest defaults to .)");
    println!("  help                         - Show this help");
    println!("  quit, exit                   - Exit");
}
