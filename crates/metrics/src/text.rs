//! Width-aware text helpers for the line-oriented screen.

use unicode_width::UnicodeWidthStr;

/// Terminal columns taken by `text`, ignoring ANSI escape sequences.
pub fn visible_width(text: &str) -> usize {
    let mut plain = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            if chars.peek() == Some(&'[') {
                chars.next();
                for code in chars.by_ref() {
                    if ('@'..='~').contains(&code) {
                        break;
                    }
                }
            }
            continue;
        }
        plain.push(ch);
    }
    plain.as_str().width()
}

/// Rows `text` occupies on a terminal `cols` wide, counting soft wraps.
pub fn rows_for(text: &str, cols: usize) -> usize {
    let cols = cols.max(1);
    text.split('\n')
        .map(|line| visible_width(line).div_ceil(cols).max(1))
        .sum()
}

/// Greedy word wrap to `width` columns. Continuation lines, including
/// those after embedded newlines, are indented by `indent` spaces.
pub fn format_paragraph(text: &str, width: usize, indent: usize) -> String {
    let width = width.max(indent + 1);
    let pad = " ".repeat(indent);
    let mut out = String::with_capacity(text.len() + 16);

    for (index, paragraph) in text.split('\n').enumerate() {
        let mut col = 0;
        if index > 0 {
            out.push('\n');
            out.push_str(&pad);
            col = indent;
        }
        let mut at_line_start = true;
        for word in paragraph.split_whitespace() {
            let word_width = visible_width(word);
            if !at_line_start && col + 1 + word_width > width {
                out.push('\n');
                out.push_str(&pad);
                col = indent;
                at_line_start = true;
            }
            if !at_line_start {
                out.push(' ');
                col += 1;
            }
            out.push_str(word);
            col += word_width;
            at_line_start = false;
        }
    }
    out
}

/// Splits an uptime into `(value, unit)` pairs, dropping leading zero
/// units but always keeping seconds.
pub fn uptime_parts(total_secs: u64) -> Vec<(u64, &'static str)> {
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    let parts = [
        (days, "days"),
        (hours, "hours"),
        (minutes, "minutes"),
        (seconds, "seconds"),
    ];
    let first = parts
        .iter()
        .position(|(value, _)| *value > 0)
        .unwrap_or(parts.len() - 1);
    parts[first..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::{format_paragraph, rows_for, uptime_parts, visible_width};

    #[test]
    fn escape_sequences_have_no_width() {
        assert_eq!(visible_width("\x1b[38;5;14m42\x1b[39m"), 2);
        assert_eq!(visible_width("plain"), 5);
    }

    #[test]
    fn wraps_with_hanging_indent() {
        let wrapped = format_paragraph("Warning: the quick brown fox jumps", 16, 2);
        assert_eq!(wrapped, "Warning: the\n  quick brown\n  fox jumps");
        for line in wrapped.lines() {
            assert!(line.len() <= 16);
        }
    }

    #[test]
    fn keeps_embedded_newlines() {
        let wrapped = format_paragraph("first\nsecond", 80, 2);
        assert_eq!(wrapped, "first\n  second");
        assert_eq!(rows_for(&wrapped, 80), 2);
    }

    #[test]
    fn counts_soft_wrapped_rows() {
        assert_eq!(rows_for("", 80), 1);
        assert_eq!(rows_for(&"x".repeat(80), 80), 1);
        assert_eq!(rows_for(&"x".repeat(81), 80), 2);
    }

    #[test]
    fn uptime_drops_leading_zero_units() {
        assert_eq!(uptime_parts(0), vec![(0, "seconds")]);
        assert_eq!(uptime_parts(61), vec![(1, "minutes"), (1, "seconds")]);
        assert_eq!(
            uptime_parts(86_400 + 5),
            vec![(1, "days"), (0, "hours"), (0, "minutes"), (5, "seconds")]
        );
    }
}
