//! coco: run .co scripts or start an interactive session.
//!
//! Usage:
//!   coco [options] [file]
//!
//! With a file argument the script is executed; without one an
//! interactive read-eval loop starts, accumulating declarations across
//! submissions.

use clap::Parser as ClapParser;
use coco_compiler::Compilation;
use coco_core::text::LineMap;
use coco_diagnostics::Diagnostic;
use coco_evaluator::{Value, Variables};
use coco_parser::parse;
use std::io::{self, BufRead, Write};
use std::process;
use std::rc::Rc;

#[derive(ClapParser, Debug)]
#[command(name = "coco", about = "coco - a small scripting language", disable_version_flag = true)]
struct Cli {
    /// Script file to run.
    #[arg(value_name = "FILE")]
    file: Option<String>,

    /// Dump the bound and lowered program instead of running it.
    #[arg(long = "showProgram")]
    show_program: bool,

    /// Export the top-level control-flow graph in DOT form.
    #[arg(long = "showCfg")]
    show_cfg: bool,

    /// Print the version.
    #[arg(short = 'v', long)]
    version: bool,
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const GRAY: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() {
    let cli = Cli::parse();

    if cli.version {
        println!("coco Version 0.1.0");
        return;
    }

    let exit_code = match &cli.file {
        Some(file) => run_file(&cli, file),
        None => run_repl(),
    };
    process::exit(exit_code);
}

fn run_file(cli: &Cli, file: &str) -> i32 {
    let text = match std::fs::read_to_string(file) {
        Ok(text) => text,
        Err(error) => {
            print_error(&format!("cannot read {file}: {error}"));
            return 1;
        }
    };

    let compilation = Compilation::new(parse(text.clone()));

    if cli.show_program || cli.show_cfg {
        let mut out = String::new();
        let result = if cli.show_program {
            compilation.emit_tree(&mut out)
        } else {
            compilation.emit_control_flow_graph(&mut out)
        };
        if result.is_err() {
            print_error("failed to render the program");
            return 1;
        }
        print!("{out}");
        return 0;
    }

    let mut variables = Variables::default();
    match compilation.evaluate(&mut variables) {
        Ok(result) => {
            if !result.diagnostics.is_empty() {
                print_diagnostics(&text, &result.diagnostics, atty_is_terminal());
                return 2;
            }
            if let Some(value) = result.value {
                println!("{value}");
            }
            0
        }
        Err(fault) => {
            print_error(&format!("runtime fault: {fault}"));
            1
        }
    }
}

// ============================================================================
// Interactive session
// ============================================================================

fn run_repl() -> i32 {
    let use_color = atty_is_terminal();
    let mut previous: Option<Rc<Compilation>> = None;
    let mut variables = Variables::default();
    let stdin = io::stdin();
    let mut submission = String::new();

    print_prompt("» ", use_color);
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };

        if submission.is_empty() {
            match line.trim() {
                "#exit" => return 0,
                "#reset" => {
                    previous = None;
                    variables.clear();
                    print_prompt("» ", use_color);
                    continue;
                }
                command @ ("#showTree" | "#showProgram" | "#cfg") => {
                    match &previous {
                        Some(compilation) => match render_compilation(compilation, command) {
                            Ok(out) => print!("{out}"),
                            Err(_) => print_error("failed to render the program"),
                        },
                        None => print_error("nothing has been submitted yet"),
                    }
                    print_prompt("» ", use_color);
                    continue;
                }
                _ => {}
            }
        }

        submission.push_str(&line);
        submission.push('\n');

        if !is_complete_submission(&submission) {
            print_prompt("· ", use_color);
            continue;
        }

        let text = std::mem::take(&mut submission);
        let tree = parse(text.clone());
        let compilation = match previous.clone() {
            Some(previous) => previous.continue_with(tree),
            None => Rc::new(Compilation::new(tree)),
        };

        match compilation.evaluate(&mut variables) {
            Ok(result) => {
                if result.diagnostics.is_empty() {
                    if let Some(value) = result.value {
                        print_value(&value, use_color);
                    }
                    // Only successful submissions extend the session.
                    previous = Some(compilation);
                } else {
                    print_diagnostics(&text, &result.diagnostics, use_color);
                }
            }
            Err(fault) => print_error(&format!("runtime fault: {fault}")),
        }
        print_prompt("» ", use_color);
    }
    0
}

/// Render one of the meta-command views of the last submission.
fn render_compilation(
    compilation: &Compilation,
    command: &str,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    match command {
        "#showTree" => coco_ast::printer::write_tree(&mut out, compilation.tree().root())?,
        "#cfg" => compilation.emit_control_flow_graph(&mut out)?,
        _ => compilation.emit_tree(&mut out)?,
    }
    Ok(out)
}

/// A submission is complete once it parses cleanly; a blank line forces
/// it through so a broken submission can still be reported.
fn is_complete_submission(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    if text.ends_with("\n\n") {
        return true;
    }
    parse(text.to_string()).diagnostics().is_empty()
}

fn print_prompt(prompt: &str, use_color: bool) {
    if use_color {
        print!("{GRAY}{prompt}{RESET}");
    } else {
        print!("{prompt}");
    }
    let _ = io::stdout().flush();
}

fn print_value(value: &Value, use_color: bool) {
    if use_color {
        println!("{CYAN}{value}{RESET}");
    } else {
        println!("{value}");
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

fn print_diagnostics(text: &str, diagnostics: &[Diagnostic], use_color: bool) {
    let line_map = LineMap::new(text);
    for diagnostic in diagnostics {
        let position = line_map.line_and_column_of(diagnostic.span.start);
        if use_color {
            eprintln!(
                "{BOLD}{RED}({}, {}): {}{RESET}",
                position.line + 1,
                position.column + 1,
                diagnostic.message
            );
        } else {
            eprintln!(
                "({}, {}): {}",
                position.line + 1,
                position.column + 1,
                diagnostic.message
            );
        }
        print_source_excerpt(text, &line_map, diagnostic, use_color);
    }
}

/// Show the offending line with the diagnostic's span highlighted.
fn print_source_excerpt(
    text: &str,
    line_map: &LineMap,
    diagnostic: &Diagnostic,
    use_color: bool,
) {
    let line_index = line_map.line_of(diagnostic.span.start);
    let line_span = line_map.line_span(text, line_index);
    let line = &text[line_span.to_range()];

    let span_start = diagnostic.span.start.clamp(line_span.start, line_span.end());
    let span_end = diagnostic.span.end().clamp(span_start, line_span.end());
    let start = (span_start - line_span.start) as usize;
    let end = (span_end - line_span.start) as usize;
    let prefix = &line[..start];
    let error = &line[start..end];
    let suffix = &line[end..];

    if use_color {
        eprintln!("    {prefix}{RED}{error}{RESET}{suffix}");
    } else {
        eprintln!("    {line}");
        eprintln!("    {}{}", " ".repeat(start), "^".repeat(error.len().max(1)));
    }
    eprintln!();
}

fn print_error(msg: &str) {
    if atty_is_terminal() {
        eprintln!("{BOLD}{RED}error{RESET}: {msg}");
    } else {
        eprintln!("error: {msg}");
    }
}

fn atty_is_terminal() -> bool {
    // On Unix, check if stderr is a terminal.
    #[cfg(unix)]
    {
        unsafe { libc::isatty(2) != 0 }
    }
    #[cfg(not(unix))]
    {
        true
    }
}
