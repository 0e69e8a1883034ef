//! JSON parsing with located error messages.

use anyhow::Result;

/// Deserialize `body`, reporting the serde path and a snippet of the failing
/// line when it doesn't match `T`.
pub fn parse_json_with_context<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(de).map_err(|err| {
        let path = err.path().to_string();
        let inner = err.into_inner();
        let (line, column) = (inner.line(), inner.column());

        let msg = inner.to_string();
        let loc = format!(" at line {line} column {column}");
        let msg = msg.strip_suffix(&loc).unwrap_or(&msg);

        let mut out = String::new();
        if !path.is_empty() && path != "." {
            out.push_str(&format!("at path '{path}': "));
        }
        out.push_str(&format!(
            "{msg} (line {line} col {column})\n{}",
            snippet(body, line, column, 24)
        ));
        anyhow::anyhow!(out)
    })
}

/// A window of `width` characters around the error position with a caret under it.
fn snippet(body: &str, line: usize, column: usize, width: usize) -> String {
    let target: Vec<char> = body
        .lines()
        .nth(line.saturating_sub(1))
        .unwrap_or("")
        .chars()
        .collect();
    if target.is_empty() {
        return "(empty line)".to_string();
    }

    let at = column.saturating_sub(1).min(target.len() - 1);
    let start = at.saturating_sub(width / 2);
    let end = (at + width / 2).min(target.len());
    let window: String = target[start..end].iter().collect();

    format!("...{window}...\n   {}^", " ".repeat(at - start))
}
