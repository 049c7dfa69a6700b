/// Greedy word wrap; a word longer than `width` gets a line of its own.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }

    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

/// Shortens `s` to at most `max_len` characters, marking the cut with `…`.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max_len - 1).collect();
    out.push('…');
    out
}

/// Comma-joined list, or `-` when empty.
pub fn list_or_dash<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        return "-".to_string();
    }
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_breaks_between_words() {
        assert_eq!(wrap("species 'Ar' not found", 12), ["species 'Ar'", "not found"]);
        assert_eq!(wrap("", 10), [""]);
    }

    #[test]
    fn wrap_keeps_long_words_whole() {
        assert_eq!(
            wrap("see mechanisms/h2o2-with-argon.yaml", 10),
            ["see", "mechanisms/h2o2-with-argon.yaml"]
        );
    }

    #[test]
    fn truncate_marks_the_cut() {
        assert_eq!(truncate("ideal-gas", 20), "ideal-gas");
        assert_eq!(truncate("ideal-gas", 9), "ideal-gas");
        assert_eq!(truncate("ideal-molal-solution", 8), "ideal-m…");
        assert_eq!(truncate("α-β-γ-δ", 4), "α-β…");
    }

    #[test]
    fn empty_lists_render_as_dash() {
        assert_eq!(list_or_dash::<&str>(&[]), "-");
        assert_eq!(list_or_dash(&["IdealGas", "ideal_gas"]), "IdealGas, ideal_gas");
    }
}
