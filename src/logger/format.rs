//! Message formatting
//!
//! Plain messages join their arguments with single spaces. Templates use
//! printf-style verbs filled positionally from the argument list.

use std::borrow::Cow;

use serde_json::Value;

/// Default stringification: strings as-is, everything else as compact JSON
pub fn render(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

/// Join arguments with single spaces
pub fn format_plain(args: &[Value]) -> String {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&render(arg));
    }
    out
}

/// Fill `template` with `args`; an empty template falls back to the plain form.
///
/// Supported verbs: `%v` `%s` `%d` `%f` `%t` (default stringification),
/// `%q` (quoted), `%%` (literal percent). Flags and width are accepted and
/// ignored, except that a precision applies to numbers under `%f`.
pub fn format_message(template: &str, args: &[Value]) -> String {
    if template.is_empty() {
        return format_plain(args);
    }

    let mut out = String::with_capacity(template.len() + 16 * args.len());
    let mut next_arg = 0;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        // Flags and width
        while let Some(&flag) = chars.peek() {
            if matches!(flag, '+' | '-' | '#' | ' ' | '0'..='9') {
                chars.next();
            } else {
                break;
            }
        }

        // Precision
        let mut precision: Option<usize> = None;
        if chars.peek() == Some(&'.') {
            chars.next();
            let mut digits = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_ascii_digit() {
                    digits.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            precision = Some(digits.parse().unwrap_or(0));
        }

        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };

        if verb == '%' {
            out.push('%');
            continue;
        }

        let Some(arg) = args.get(next_arg) else {
            out.push_str(&format!("%!{}(MISSING)", verb));
            continue;
        };
        next_arg += 1;

        match verb {
            'q' => out.push_str(&quote(arg)),
            'f' => match (precision, arg.as_f64()) {
                (Some(p), Some(n)) => out.push_str(&format!("{:.*}", p, n)),
                _ => out.push_str(&render(arg)),
            },
            _ => out.push_str(&render(arg)),
        }
    }

    if next_arg < args.len() {
        let extra: Vec<Cow<'_, str>> = args[next_arg..].iter().map(render).collect();
        out.push_str(&format!("%!(EXTRA {})", extra.join(", ")));
    }

    out
}

fn quote(value: &Value) -> String {
    match value {
        Value::String(s) => Value::String(s.clone()).to_string(),
        other => Value::String(other.to_string()).to_string(),
    }
}
