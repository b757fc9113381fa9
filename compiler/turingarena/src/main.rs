//! TuringArena interface compiler and driver CLI (demonstration surface,
//! §6): a small hand-dispatched command set mirroring the teacher's own
//! `ori` binary rather than a full argument-parsing framework, since this
//! crate's surface is two commands wide.

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};

use ta_diagnostic::emitter::Emitter;
use ta_ir::Program;

fn main() {
    turingarena::tracing_setup::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "validate" => {
            if args.len() < 3 {
                eprintln!("Usage: ta validate <file.ta>");
                std::process::exit(1);
            }
            validate_file(&args[2]);
        }
        "run" => {
            // ta run <file.ta> -- <solution-command> [args...]
            let Some(dash_dash) = args.iter().position(|a| a == "--") else {
                eprintln!("Usage: ta run <file.ta> -- <solution-command> [args...]");
                std::process::exit(1);
            };
            if args.len() < 3 || dash_dash < 3 {
                eprintln!("Usage: ta run <file.ta> -- <solution-command> [args...]");
                std::process::exit(1);
            }
            let path = &args[2];
            let solution_cmd = &args[dash_dash + 1..];
            if solution_cmd.is_empty() {
                eprintln!("Usage: ta run <file.ta> -- <solution-command> [args...]");
                std::process::exit(1);
            }
            run_file(path, solution_cmd);
        }
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-v" => println!("turingarena {}", env!("CARGO_PKG_VERSION")),
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("TuringArena interface compiler/driver");
    println!();
    println!("Usage: ta <command> [options]");
    println!();
    println!("Commands:");
    println!("  validate <file.ta>                     Parse and analyze an interface, reporting diagnostics");
    println!("  run <file.ta> -- <cmd> [args...]       Drive the interface against a solution command");
    println!("  help                                    Show this help message");
    println!("  version                                 Show version information");
}

fn read_file(path: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|err| {
        eprintln!("error reading {path}: {err}");
        std::process::exit(1);
    })
}

/// Parses and validates `path`, printing any diagnostics and exiting
/// nonzero on failure; returns the analyzed, synthesis-complete program on
/// success.
///
/// Calls `ta_analyze`'s threading/validation/synthesis passes directly
/// rather than through `turingarena::compile`, since rendering a
/// diagnostic needs the same `StringInterner` the validator saw and
/// `compile`'s `CompileError::Diagnostics` variant does not carry the
/// program that produced it.
fn compile_with_diagnostics(path: &str, source: &str) -> Program {
    let mut program = match ta_parse::parse(source) {
        Ok(program) => program,
        Err(err) => {
            eprintln!("{path}: {err}");
            std::process::exit(1);
        }
    };

    let contexts = ta_analyze::thread_program(&program);
    let diagnostics = ta_analyze::validate(&program, &contexts);
    if !diagnostics.is_empty() {
        let emitter = Emitter::new(path, source, &program.interner);
        eprint!("{}", emitter.render_terminal(&diagnostics));
        std::process::exit(1);
    }
    ta_analyze::synthesize_resolution_nodes(&mut program, &contexts);
    program
}

fn validate_file(path: &str) {
    let source = read_file(path);
    let program = compile_with_diagnostics(path, &source);
    println!(
        "OK: {path} ({} method(s), {} callback(s))",
        program.interface.methods.len(),
        program.interface.callbacks.len()
    );
}

fn run_file(path: &str, solution_cmd: &[String]) {
    let source = read_file(path);
    let program = compile_with_diagnostics(path, &source);

    let mut child = Command::new(&solution_cmd[0])
        .args(&solution_cmd[1..])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap_or_else(|err| {
            eprintln!("failed to start solution `{}`: {err}", solution_cmd[0]);
            std::process::exit(1);
        });

    let (Some(solution_stdin), Some(solution_stdout)) = (child.stdin.take(), child.stdout.take()) else {
        eprintln!("failed to attach to solution `{}`'s stdio", solution_cmd[0]);
        std::process::exit(1);
    };
    let solution_stdout = BufReader::new(solution_stdout);

    let input_values = test_input_values();
    let handle = turingarena::run(program, solution_stdout, solution_stdin, input_values);

    for event in handle.events() {
        tracing::debug!(?event, "driver event");
    }

    if let Err(err) = handle.finish() {
        eprintln!("{}: {err}", Path::new(path).display());
        let _ = child.wait();
        std::process::exit(1);
    }

    let _ = child.wait();
}

/// One integer per line read from this process's own stdin, fed to the
/// interface's `input` statements (§1 Non-goals: test data loading is an
/// external collaborator, so this CLI's only job is to forward it).
fn test_input_values() -> impl Iterator<Item = i64> {
    BufReader::new(std::io::stdin())
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| line.trim().parse().ok())
}
