use anyhow::Result;
use tracing::info;

use super::output::emit_text;
use crate::acquire;
use crate::cli::TextArgs;
use crate::util::{is_stdin_path, read_input_bytes, write_text};

pub fn run(args: TextArgs) -> Result<()> {
    let config = args.acquire.to_config();

    let text = if is_stdin_path(&args.input) {
        let bytes = read_input_bytes(&args.input)?;
        acquire::acquire_text_from_bytes(&bytes, &config)?.text
    } else {
        acquire::acquire_text(&args.input, &config)?
    };

    info!(chars = text.chars().count(), "text acquired");

    match &args.output {
        Some(path) => {
            write_text(path, &text)?;
            info!(path = %path.display(), "wrote acquired text");
            Ok(())
        }
        None => emit_text(&text),
    }
}
