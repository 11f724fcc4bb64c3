//! Purpose: `strto` CLI entry point.
//! Role: Binary crate root; parses args, builds the decoder config, runs commands.
//! Invariants: Successful commands emit exactly one JSON document on stdout.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
use std::io::{self, IsTerminal, Read};

use clap::{
    Args, CommandFactory, Parser, Subcommand, ValueEnum, error::ErrorKind as ClapErrorKind,
};
use clap_complete::aot::Shell;
use serde_json::{Map, Value as Json, json};
use tracing_subscriber::EnvFilter;

mod color_json;
mod command_dispatch;

use color_json::{Layout, render_value};
use strto::api::{Decoder, DecoderConfig, Error, ErrorKind, TypeDesc, Value, to_exit_code};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint("Try `strto --help`."),
                    ColorMode::Auto,
                ));
            }
        },
    };

    init_tracing();
    let color_mode = cli.color;
    let config = cli.decode.config().map_err(|err| (err, color_mode))?;
    tracing::debug!(?config, "decoder config");

    command_dispatch::dispatch_command(cli.command, config, color_mode)
        .map_err(|err| (err, color_mode))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "strto",
    version,
    about = "Decode strings into typed values",
    long_about = None,
    after_help = r#"EXAMPLES
  $ strto decode int '2**10'
  $ strto decode 'list[int]' '1, 2, 3'
  $ strto decode 'dict[str, float]' '{"a": 1, "b": 2.5}'
  $ strto decode 'tuple[int, ...]' @numbers.txt
  $ strto check 'set[date]'

TYPE EXPRESSIONS
  int, float, str, bool, bytes, path, date, datetime, time, duration, ...
  list[T], set[T], tuple[T, ...], tuple[A, B], dict[K, V], A | B,
  optional[T], literal[1, "a", true]"#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "auto",
        value_enum,
        help = "Colorize JSON output and diagnostics: auto|always|never"
    )]
    color: ColorMode,

    #[command(flatten)]
    decode: DecodeArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    #[arg(long, global = true, help = "Treat `@path` values literally instead of reading files")]
    no_from_file: bool,
    #[arg(long, global = true, value_name = "SEP", help = "Item separator for container values (default: ,)")]
    sep: Option<String>,
    #[arg(long, global = true, help = "Disable arithmetic expressions for int and float")]
    no_expressions: bool,
    #[arg(long, global = true, help = "Match bool words case-sensitively")]
    bool_case_sensitive: bool,
}

impl DecodeArgs {
    fn config(&self) -> Result<DecoderConfig, Error> {
        let mut config = DecoderConfig::default()
            .with_from_file(!self.no_from_file)
            .with_expressions(!self.no_expressions)
            .with_bool_case_sensitive(self.bool_case_sensitive);
        if let Some(sep) = &self.sep {
            if sep.is_empty() {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message("--sep must not be empty")
                    .with_hint("Pass a separator such as `--sep ';'`."));
            }
            config = config.with_item_sep(sep.clone());
        }
        Ok(config)
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    #[command(
        about = "Decode a value against a type expression",
        after_help = r#"NOTES
  - Use `-` as VALUE to read the value from stdin.
  - `@path` reads the value from a file (disable with --no-from-file)."#
    )]
    Decode {
        #[arg(value_name = "TYPE", help = "Type expression, e.g. 'list[int]'")]
        ty: String,
        #[arg(value_name = "VALUE", help = "Raw input string")]
        value: String,
        #[arg(long, help = "Pretty-print the JSON output")]
        pretty: bool,
    },
    #[command(about = "Report whether a type expression is decodable")]
    Check {
        #[arg(value_name = "TYPE", help = "Type expression, e.g. 'dict[str, int]'")]
        ty: String,
    },
    #[command(about = "List the registered leaf types")]
    Types,
    #[command(
        arg_required_else_help = true,
        about = "Generate shell completion scripts",
        after_help = r#"EXAMPLES
  $ strto completion bash >> ~/.bashrc
  $ strto completion zsh > ~/.zfunc/_strto
  $ strto completion fish > ~/.config/fish/completions/strto.fish"#
    )]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

fn parse_type_arg(raw: &str) -> Result<TypeDesc, Error> {
    TypeDesc::parse(raw)
}

fn read_value_arg(raw: String) -> Result<String, Error> {
    if raw != "-" {
        return Ok(raw);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to read stdin")
            .with_source(err)
    })?;
    let trimmed_len = buf.trim_end_matches(['\n', '\r']).len();
    buf.truncate(trimmed_len);
    Ok(buf)
}

fn emit_value(value: &Value, pretty: bool, color_mode: ColorMode) {
    let use_color = color_mode.use_color(io::stdout().is_terminal());
    let layout = if pretty { Layout::Pretty } else { Layout::Compact };
    println!("{}", render_value(value, layout, use_color));
}

fn emit_json(value: Json) {
    let json = serde_json::to_string(&value)
        .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let json = serde_json::to_string(&error_json(err)).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::NotFound => "no decoder registered".to_string(),
        ErrorKind::UnsupportedType => "unsupported type".to_string(),
        ErrorKind::Value => "invalid value".to_string(),
        ErrorKind::Type => "wrong kind of input".to_string(),
        ErrorKind::FileNotFound => "file not found".to_string(),
        ErrorKind::Key => "unknown member".to_string(),
        ErrorKind::ZeroDivision => "division by zero".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = std::error::Error::source(err);
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Json {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(err.kind().as_str()));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(value) = err.value() {
        inner.insert("value".to_string(), json!(value));
    }
    if let Some(target) = err.target() {
        inner.insert("type".to_string(), json!(target));
    }
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }
    json!({ "error": Json::Object(inner) })
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = vec![format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    )];
    if let (Some(value), Some(target)) = (err.value(), err.target()) {
        lines.push(format!(
            "{} {value} as {target}",
            colorize_label("while decoding:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    for cause in error_causes(err) {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }
    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, error_json, error_text};
    use clap::Parser;
    use strto::api::{Error, ErrorKind};

    #[test]
    fn global_decode_flags_map_onto_config() {
        let cli = Cli::try_parse_from([
            "strto",
            "decode",
            "list[int]",
            "1;2",
            "--sep",
            ";",
            "--no-expressions",
            "--no-from-file",
        ])
        .expect("parse");
        let config = cli.decode.config().expect("config");
        assert_eq!(config.item_sep, ";");
        assert!(!config.allow_expressions);
        assert!(!config.from_file);
        assert!(!config.bool_case_sensitive);
        assert!(matches!(cli.command, Command::Decode { pretty: false, .. }));
    }

    #[test]
    fn empty_separator_is_usage_error() {
        let cli = Cli::try_parse_from(["strto", "decode", "list[int]", "1", "--sep", ""])
            .expect("parse");
        let err = cli.decode.config().err().expect("empty sep");
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn error_json_carries_decode_context() {
        let err = Error::new(ErrorKind::Value)
            .with_value("abc")
            .with_target("int")
            .with_message("invalid integer value")
            .with_hint("use digits");
        let json = error_json(&err);
        assert_eq!(json["error"]["kind"], "ValueError");
        assert_eq!(json["error"]["value"], "abc");
        assert_eq!(json["error"]["type"], "int");
        assert_eq!(json["error"]["hint"], "use digits");
        let text = error_text(&err, false);
        assert!(text.starts_with("error: invalid integer value"));
        assert!(text.contains("abc as int"));
    }
}
