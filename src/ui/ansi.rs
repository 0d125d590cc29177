//! ANSI SGR decoding for command output.
//!
//! The formatter is run with colour enabled, so its output carries SGR
//! sequences (`ESC [ ... m`). These become ratatui styles; every other escape
//! sequence (cursor movement, OSC titles, ...) is dropped. Lines are split on
//! `\n` only, so joining the plain text of the result with `\n` gives back the
//! input minus escapes.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

const ESC: u8 = 0x1B;

/// Decode `input` into styled lines
pub fn to_text(input: &str) -> Text<'static> {
    let mut style = Style::default();
    let lines: Vec<Line<'static>> = input
        .split('\n')
        .map(|line| decode_line(line, &mut style))
        .collect();
    Text::from(lines)
}

/// Decode one line; `style` carries over to the next line like a terminal would
fn decode_line(line: &str, style: &mut Style) -> Line<'static> {
    let bytes = line.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;
    let mut start = 0;

    while i < bytes.len() {
        if bytes[i] != ESC {
            i += 1;
            continue;
        }
        if start < i {
            spans.push(Span::styled(line[start..i].to_string(), *style));
        }
        i = consume_escape(line, i, style);
        start = i;
    }
    if start < bytes.len() {
        spans.push(Span::styled(line[start..].to_string(), *style));
    }
    Line::from(spans)
}

/// Consume an escape sequence at `pos`, applying it if it is SGR.
/// Returns the byte index after the sequence.
fn consume_escape(line: &str, pos: usize, style: &mut Style) -> usize {
    let bytes = line.as_bytes();
    let next = pos + 1;
    if next >= bytes.len() {
        return bytes.len();
    }

    match bytes[next] {
        b'[' => {
            let params_start = next + 1;
            let mut i = params_start;
            while i < bytes.len() {
                let b = bytes[i];
                if (0x40..=0x7E).contains(&b) {
                    if b == b'm' {
                        apply_sgr(&line[params_start..i], style);
                    }
                    return i + 1;
                }
                // Anything else (control or non-ASCII) aborts the sequence;
                // `i` is still on a char boundary since only ASCII was skipped
                if !(0x20..=0x3F).contains(&b) {
                    return i;
                }
                i += 1;
            }
            bytes.len()
        }
        b']' | b'P' | b'^' | b'_' => {
            let mut i = next + 1;
            while i < bytes.len() {
                match bytes[i] {
                    0x07 => return i + 1,
                    ESC if i + 1 < bytes.len() && bytes[i + 1] == b'\\' => return i + 2,
                    _ => i += 1,
                }
            }
            bytes.len()
        }
        // Two-character escape; the second may be any char, not just a byte
        _ => next + line[next..].chars().next().map_or(1, char::len_utf8),
    }
}

fn apply_sgr(params: &str, style: &mut Style) {
    if params.is_empty() {
        *style = Style::default();
        return;
    }

    let codes: Vec<u16> = params
        .split(';')
        .map(|p| p.parse().unwrap_or(0))
        .collect();
    let mut i = 0;
    while i < codes.len() {
        match codes[i] {
            0 => *style = Style::default(),
            1 => *style = style.add_modifier(Modifier::BOLD),
            2 => *style = style.add_modifier(Modifier::DIM),
            3 => *style = style.add_modifier(Modifier::ITALIC),
            4 => *style = style.add_modifier(Modifier::UNDERLINED),
            7 => *style = style.add_modifier(Modifier::REVERSED),
            22 => *style = style.remove_modifier(Modifier::BOLD | Modifier::DIM),
            23 => *style = style.remove_modifier(Modifier::ITALIC),
            24 => *style = style.remove_modifier(Modifier::UNDERLINED),
            27 => *style = style.remove_modifier(Modifier::REVERSED),
            c @ 30..=37 => *style = style.fg(basic_color(c - 30)),
            39 => *style = style.fg(Color::Reset),
            c @ 40..=47 => *style = style.bg(basic_color(c - 40)),
            49 => *style = style.bg(Color::Reset),
            c @ 90..=97 => *style = style.fg(bright_color(c - 90)),
            c @ 100..=107 => *style = style.bg(bright_color(c - 100)),
            c @ (38 | 48) => {
                let (color, used) = extended_color(&codes[i + 1..]);
                if let Some(color) = color {
                    *style = if c == 38 {
                        style.fg(color)
                    } else {
                        style.bg(color)
                    };
                }
                i += used;
            }
            _ => {}
        }
        i += 1;
    }
}

/// Parse `5;n` or `2;r;g;b`, returning the colour and parameters consumed
fn extended_color(rest: &[u16]) -> (Option<Color>, usize) {
    match rest {
        [5, n, ..] => (Some(Color::Indexed((*n).min(255) as u8)), 2),
        [2, r, g, b, ..] => (
            Some(Color::Rgb(
                (*r).min(255) as u8,
                (*g).min(255) as u8,
                (*b).min(255) as u8,
            )),
            4,
        ),
        _ => (None, rest.len()),
    }
}

fn basic_color(n: u16) -> Color {
    match n {
        0 => Color::Black,
        1 => Color::Red,
        2 => Color::Green,
        3 => Color::Yellow,
        4 => Color::Blue,
        5 => Color::Magenta,
        6 => Color::Cyan,
        _ => Color::Gray,
    }
}

fn bright_color(n: u16) -> Color {
    match n {
        0 => Color::DarkGray,
        1 => Color::LightRed,
        2 => Color::LightGreen,
        3 => Color::LightYellow,
        4 => Color::LightBlue,
        5 => Color::LightMagenta,
        6 => Color::LightCyan,
        _ => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &Text) -> String {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_plain_text_unchanged() {
        let text = to_text("{\n  \"a\": 1\n}\n");
        assert_eq!(text.lines.len(), 4);
        assert_eq!(plain(&text), "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn test_jq_colours() {
        // jq --color-output style key/value
        let text = to_text("\x1b[1;39m{\x1b[0m\n  \x1b[34;1m\"a\"\x1b[0m: \x1b[0;39m1\x1b[0m");
        assert_eq!(plain(&text), "{\n  \"a\": 1");

        let key = &text.lines[1].spans[1];
        assert_eq!(key.content, "\"a\"");
        assert_eq!(key.style.fg, Some(Color::Blue));
        assert!(key.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_extended_colours() {
        let text = to_text("\x1b[38;5;196mx\x1b[48;2;1;2;3my");
        assert_eq!(text.lines[0].spans[0].style.fg, Some(Color::Indexed(196)));
        assert_eq!(text.lines[0].spans[1].style.bg, Some(Color::Rgb(1, 2, 3)));
    }

    #[test]
    fn test_non_sgr_sequences_dropped() {
        let text = to_text("\x1b]0;title\x07a\x1b[2Kb\x1b");
        assert_eq!(plain(&text), "ab");
    }

    #[test]
    fn test_escape_before_multibyte_char() {
        let text = to_text("ok \x1bé done\n\x1b[é\x1b");
        assert_eq!(plain(&text), "ok  done\né");
    }

    #[test]
    fn test_style_carries_across_lines() {
        let text = to_text("\x1b[31mred\nstill red\x1b[0m\nplain");
        assert_eq!(text.lines[1].spans[0].style.fg, Some(Color::Red));
        assert_eq!(text.lines[2].spans[0].style, Style::default());
    }
}
