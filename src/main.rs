mod debug_report;

use kaeru::{Options, RuleSet, rewrite_verbose_with, stock};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let loaded;
    let rules: &RuleSet = match &config.rules_path {
        Some(path) => {
            let text = match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(err) => {
                    eprintln!("error: failed to read {}: {err}", path.display());
                    std::process::exit(2);
                }
            };
            match RuleSet::from_directives(&text) {
                Ok(set) if set.is_empty() => {
                    eprintln!("error: {}: no rules found", path.display());
                    std::process::exit(2);
                }
                Ok(set) => {
                    loaded = set;
                    &loaded
                }
                Err(err) => {
                    eprintln!("error: {}: {err}", path.display());
                    std::process::exit(2);
                }
            }
        }
        None => stock(),
    };

    let options = Options {
        render_calls: config.render_calls,
    };
    match rewrite_verbose_with(&config.input, rules, &options) {
        Ok(res) => {
            if config.verbose {
                debug_report::print_run(&config.input, &res, config.color);
            } else {
                println!("{}", res.output);
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

struct CliConfig {
    input: String,
    rules_path: Option<PathBuf>,
    render_calls: bool,
    verbose: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut rules_path: Option<PathBuf> = None;
    let mut render_calls = false;
    let mut verbose = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("kaeru {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "-v" | "--verbose" => verbose = true,
            "--render-calls" => render_calls = true,
            "--rules" => {
                let value = args.next().ok_or_else(|| "error: --rules expects a path".to_string())?;
                rules_path = Some(PathBuf::from(value));
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--rules=") => {
                rules_path = Some(PathBuf::from(arg.trim_start_matches("--rules=")));
            }
            _ if arg.starts_with("--input=") => {
                let value = arg.trim_start_matches("--input=");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value.to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig {
        input,
        rules_path,
        render_calls,
        verbose,
        color,
    })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "kaeru {version}

Rule-based text macro substitution CLI.

Usage:
  kaeru [OPTIONS] [--] <input...>
  kaeru [OPTIONS] --input <text>

Options:
  -i, --input <text>     Input text to rewrite. If omitted, reads remaining
                         args or stdin when no args are provided.
  --rules <file>         Load rewrite rules from a directive file
                         (flags/match/subst/ per line, #subst lines and
                         // comments allowed). Default: the stock macro set.
  --render-calls         Also render emitted calls into the output as
                         $name(\"arg\",...); for call-consuming renderers.
  -v, --verbose          Print a rewrite report instead of bare output.
  --color                Force ANSI color output.
  --no-color             Disable ANSI color output.
  -h, --help             Show this help message.
  -V, --version          Print version information.

Exit codes:
  0  Success.
  1  Internal error.
  2  Invalid arguments, unreadable rules, or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
    )
}
