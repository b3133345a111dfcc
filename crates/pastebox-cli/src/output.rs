//! Output formatting helpers for the CLI.

use pastebox_core::Text;

/// Convert a text to JSON for output.
pub fn text_json(text: &Text) -> serde_json::Value {
    serde_json::json!({
        "id": text.text_id,
        "content": text.content,
        "created": text.created,
        "expires": text.expires,
    })
}

/// Print a JSON value, pretty-printed.
pub fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
