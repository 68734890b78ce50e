//! Query helpers shared by the Postgres repositories

/// Escape `%`, `_` and `\` so user input matches literally inside LIKE/ILIKE
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
