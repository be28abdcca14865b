// src/core/commons.rs

// Helper function to wrap a string in quotes and escape internal quotes.
pub fn wrap_value(value: &str) -> String {
    // Escape any existing double quotes and then wrap the whole string in double quotes.
    format!("\"{}\"", value.replace('"', "\\\""))
}

/// Quotes a value only when it contains whitespace and is not already quoted.
pub fn quote_if_needed(value: &str) -> String {
    let already_quoted = value.len() >= 2 && value.starts_with('"') && value.ends_with('"');
    if !already_quoted && value.chars().any(char::is_whitespace) {
        wrap_value(value)
    } else {
        value.to_string()
    }
}

/// Strips the leading `/` and `-` characters of a switch token (`/GR-` -> `GR-`, `--out` -> `out`).
pub fn strip_switch_prefix(token: &str) -> &str {
    token.trim_start_matches(['/', '-'])
}

/// Case-insensitive equality of two switch tokens, ignoring their prefixes.
pub fn tokens_match(a: &str, b: &str) -> bool {
    strip_switch_prefix(a).eq_ignore_ascii_case(strip_switch_prefix(b))
}

/// Splits a rendered command line into arguments following the Windows
/// `CommandLineToArgvW` rules, so it agrees with how the tool would read a response file.
///
/// Backslashes are literal unless they run into a `"`: `2n` backslashes before a quote
/// become `n` and the quote toggles quoting, `2n + 1` become `n` and a literal quote.
/// Outside quotes, spaces and tabs separate arguments.
pub fn split_command_line(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_argument = false;
    let mut in_quotes = false;
    let mut backslashes = 0usize;

    for c in line.chars() {
        match c {
            '\\' => {
                backslashes += 1;
                in_argument = true;
            }
            '"' => {
                current.extend(std::iter::repeat_n('\\', backslashes / 2));
                if backslashes % 2 == 1 {
                    current.push('"');
                } else {
                    in_quotes = !in_quotes;
                }
                backslashes = 0;
                in_argument = true;
            }
            ' ' | '\t' if !in_quotes => {
                current.extend(std::iter::repeat_n('\\', backslashes));
                backslashes = 0;
                if in_argument {
                    args.push(std::mem::take(&mut current));
                    in_argument = false;
                }
            }
            c => {
                current.extend(std::iter::repeat_n('\\', backslashes));
                backslashes = 0;
                current.push(c);
                in_argument = true;
            }
        }
    }

    current.extend(std::iter::repeat_n('\\', backslashes));
    if in_argument {
        args.push(current);
    }
    args
}
