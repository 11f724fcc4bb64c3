//! Purpose: Hold top-level CLI command dispatch for `strto`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: `check` exits 0 whether or not the type is supported.
//! Invariants: Helpers in `main.rs` remain the source of emission and error formatting.

use super::*;

pub(super) fn dispatch_command(
    command: Command,
    config: DecoderConfig,
    color_mode: ColorMode,
) -> Result<RunOutcome, Error> {
    match command {
        Command::Decode { ty, value, pretty } => {
            let ty = parse_type_arg(&ty)?;
            let input = read_value_arg(value)?;
            let decoder = Decoder::from_config(config);
            let decoded = decoder.bind(ty).decode(&input)?;
            emit_value(&decoded, pretty, color_mode);
            Ok(RunOutcome::ok())
        }
        Command::Check { ty } => {
            let ty = parse_type_arg(&ty)?;
            let decoder = Decoder::from_config(config);
            emit_json(json!({
                "type": ty.to_string(),
                "supported": decoder.is_supported(&ty),
            }));
            Ok(RunOutcome::ok())
        }
        Command::Types => {
            let decoder = Decoder::from_config(config);
            let names: Vec<String> = decoder
                .registry()
                .types()
                .into_iter()
                .map(ToString::to_string)
                .collect();
            emit_json(json!({ "types": names }));
            Ok(RunOutcome::ok())
        }
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "strto", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
    }
}
