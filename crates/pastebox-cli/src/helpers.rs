//! Input handling helpers.

use std::io::{self, IsTerminal, Read};

use crate::errors::CliError;

/// Read a text body from `--body` or stdin.
///
/// Stdin is taken verbatim; blank bodies are rejected by the store.
pub fn read_text_body(body: Option<String>) -> anyhow::Result<String> {
    if let Some(value) = body {
        return Ok(value);
    }

    if io::stdin().is_terminal() {
        return Err(CliError::invalid_input(
            "No text provided.\nHint: Use --body or pipe content via stdin.",
        )
        .into());
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
    if buffer.trim().is_empty() {
        return Err(CliError::invalid_input("No input provided on stdin").into());
    }
    Ok(buffer)
}
