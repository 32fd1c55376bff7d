const FENCE: &str = "```";

/// Drop a leading and/or trailing Markdown code-fence line, then trim.
///
/// Heuristic only: the language tag after the opening fence is ignored and the
/// two fences are not required to pair up.
pub fn strip_fences(text: &str) -> String {
    let mut lines: Vec<&str> = text.lines().collect();
    if lines.first().map(|l| l.trim().starts_with(FENCE)).unwrap_or(false) {
        lines.remove(0);
    }
    if lines.last().map(|l| l.trim().starts_with(FENCE)).unwrap_or(false) {
        lines.pop();
    }
    lines.join("\n").trim().to_string()
}
