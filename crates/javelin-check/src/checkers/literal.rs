use javelin_syntax::{LiteralData, LiteralKind, NodeId};

use crate::context::CheckContext;
use crate::diagnostics::{Diagnostic, ErrorCategory};

/// Shared scanner for `\uXXXX` escapes: every token kind runs the same
/// pass, malformed escapes surface through the callback as byte offsets
/// into `text`. A backslash introduces an escape only when preceded by an
/// even number of backslashes.
fn scan_unicode_escapes(text: &str, mut on_malformed: impl FnMut(usize, usize)) {
    let bytes = text.as_bytes();
    let mut position = 0;
    while position < bytes.len() {
        if bytes[position] != b'\\' {
            position += 1;
            continue;
        }
        // Count the backslash run; only an odd trailing backslash opens
        // an escape.
        let run_start = position;
        while position < bytes.len() && bytes[position] == b'\\' {
            position += 1;
        }
        if (position - run_start) % 2 == 0 {
            continue;
        }
        if position >= bytes.len() || bytes[position] != b'u' {
            continue;
        }
        let escape_start = position - 1;
        while position < bytes.len() && bytes[position] == b'u' {
            position += 1;
        }
        let digits_start = position;
        let mut digits = 0;
        while digits < 4 && position < bytes.len() && bytes[position].is_ascii_hexdigit() {
            digits += 1;
            position += 1;
        }
        if digits < 4 {
            on_malformed(escape_start, digits_start + digits);
        }
    }
}

pub(crate) fn check_unicode_escapes(ctx: &mut CheckContext<'_>, node: NodeId, text: &str) {
    let range = ctx.tree.range(node);
    let mut first: Option<(usize, usize)> = None;
    scan_unicode_escapes(text, |start, end| {
        first.get_or_insert((start, end));
    });
    if let Some((start, end)) = first {
        ctx.report(Diagnostic::new(
            ErrorCategory::Lexical,
            "literal.unicode.escape",
            range.slice(start, end),
            "illegal unicode escape",
        ));
    }
}

pub(crate) fn check_unclosed_comment(
    ctx: &mut CheckContext<'_>,
    node: NodeId,
    text: &str,
) {
    if text.starts_with("/*") && (text.len() < 4 || !text.ends_with("*/")) {
        let range = ctx.tree.range(node);
        ctx.report(Diagnostic::new(
            ErrorCategory::Lexical,
            "comment.unclosed",
            range,
            "unclosed comment",
        ));
    }
}

pub(crate) fn check_literal(ctx: &mut CheckContext<'_>, node: NodeId, data: &LiteralData) {
    match data.kind {
        LiteralKind::Int | LiteralKind::Long => check_integer(ctx, node, &data.text),
        LiteralKind::Float | LiteralKind::Double => check_floating(ctx, node, &data.text),
        LiteralKind::Char => check_char(ctx, node, &data.text),
        LiteralKind::String => check_string(ctx, node, &data.text),
        LiteralKind::TextBlock => check_text_block(ctx, node, &data.text),
        LiteralKind::Bool | LiteralKind::Null => {}
    }
}

fn is_digit_for_radix(byte: u8, radix: u32) -> bool {
    (byte as char).is_digit(radix)
}

/// Radix prefix and underscore-placement validation. Underscores may only
/// sit between two digits of the same run.
fn check_integer(ctx: &mut CheckContext<'_>, node: NodeId, text: &str) {
    let range = ctx.tree.range(node);
    let stripped = text
        .strip_suffix(['l', 'L'])
        .unwrap_or(text);
    let (radix, digits_start) = if let Some(rest) = stripped
        .strip_prefix("0x")
        .or_else(|| stripped.strip_prefix("0X"))
    {
        if rest.is_empty() {
            ctx.report(Diagnostic::new(
                ErrorCategory::Lexical,
                "literal.number.empty",
                range,
                "hexadecimal numbers must contain at least one hexadecimal digit",
            ));
            return;
        }
        (16, 2)
    } else if let Some(rest) = stripped
        .strip_prefix("0b")
        .or_else(|| stripped.strip_prefix("0B"))
    {
        if rest.is_empty() {
            ctx.report(Diagnostic::new(
                ErrorCategory::Lexical,
                "literal.number.empty",
                range,
                "binary numbers must contain at least one binary digit",
            ));
            return;
        }
        (2, 2)
    } else {
        (10, 0)
    };
    check_digit_run(ctx, node, text, &stripped[digits_start..], digits_start, radix);
}

fn check_digit_run(
    ctx: &mut CheckContext<'_>,
    node: NodeId,
    _full: &str,
    run: &str,
    offset: usize,
    radix: u32,
) {
    let range = ctx.tree.range(node);
    let bytes = run.as_bytes();
    for (index, &byte) in bytes.iter().enumerate() {
        if byte != b'_' {
            // Suffixes are stripped before the run reaches here, so any
            // leftover alphanumeric outside the radix is an illegal digit.
            if !is_digit_for_radix(byte, radix) && byte.is_ascii_alphanumeric() {
                ctx.report(Diagnostic::new(
                    ErrorCategory::Lexical,
                    "literal.number.malformed",
                    range.slice(offset + index, offset + index + 1),
                    format!("illegal digit '{}' in radix-{radix} literal", byte as char),
                ));
                return;
            }
            continue;
        }
        let after_digit = index > 0 && is_digit_for_radix(bytes[index - 1], radix);
        let before_digit = index + 1 < bytes.len() && is_digit_for_radix(bytes[index + 1], radix);
        if !after_digit || !before_digit {
            ctx.report(Diagnostic::new(
                ErrorCategory::Lexical,
                "literal.number.underscore",
                range.slice(offset + index, offset + index + 1),
                "underscores must be located within digits",
            ));
            return;
        }
    }
}

fn check_floating(ctx: &mut CheckContext<'_>, node: NodeId, text: &str) {
    let stripped = text
        .strip_suffix(['f', 'F', 'd', 'D'])
        .unwrap_or(text);
    // Validate each digit run separately; '.', 'e' and sign characters
    // delimit runs and underscores may not touch them.
    let mut run_start = 0;
    let bytes = stripped.as_bytes();
    for (index, &byte) in bytes.iter().enumerate() {
        let is_delimiter = matches!(byte, b'.' | b'e' | b'E' | b'+' | b'-');
        if is_delimiter {
            if index > run_start {
                check_digit_run(ctx, node, text, &stripped[run_start..index], run_start, 10);
                if ctx.has_error() {
                    return;
                }
            }
            run_start = index + 1;
        }
    }
    if bytes.len() > run_start {
        check_digit_run(ctx, node, text, &stripped[run_start..], run_start, 10);
    }
}

/// Validate simple escapes inside a quoted body. `offset` positions the
/// body within the token.
fn check_escapes(ctx: &mut CheckContext<'_>, node: NodeId, body: &str, offset: usize) {
    let range = ctx.tree.range(node);
    let bytes = body.as_bytes();
    let mut position = 0;
    while position < bytes.len() {
        if bytes[position] != b'\\' {
            position += 1;
            continue;
        }
        let Some(&escaped) = bytes.get(position + 1) else {
            ctx.report(Diagnostic::new(
                ErrorCategory::Lexical,
                "literal.escape.illegal",
                range.slice(offset + position, offset + position + 1),
                "illegal escape character",
            ));
            return;
        };
        match escaped {
            b'b' | b't' | b'n' | b'f' | b'r' | b's' | b'"' | b'\'' | b'\\' => position += 2,
            b'0'..=b'7' => {
                position += 2;
                let mut octal = 1;
                while octal < 3
                    && position < bytes.len()
                    && (b'0'..=b'7').contains(&bytes[position])
                {
                    octal += 1;
                    position += 1;
                }
            }
            // Handled by the unicode-escape scanner.
            b'u' => position += 2,
            _ => {
                ctx.report(Diagnostic::new(
                    ErrorCategory::Lexical,
                    "literal.escape.illegal",
                    range.slice(offset + position, offset + position + 2),
                    "illegal escape character",
                ));
                return;
            }
        }
    }
}

fn check_char(ctx: &mut CheckContext<'_>, node: NodeId, text: &str) {
    let range = ctx.tree.range(node);
    if text.len() < 2 || !text.starts_with('\'') || !text.ends_with('\'') {
        ctx.report(Diagnostic::new(
            ErrorCategory::Lexical,
            "literal.char.unterminated",
            range,
            "unterminated character literal",
        ));
        return;
    }
    let body = &text[1..text.len() - 1];
    if body.is_empty() {
        ctx.report(Diagnostic::new(
            ErrorCategory::Lexical,
            "literal.char.empty",
            range,
            "empty character literal",
        ));
        return;
    }
    check_escapes(ctx, node, body, 1);
    if ctx.has_error() {
        return;
    }
    let payload_chars = if body.starts_with('\\') {
        1
    } else {
        body.chars().count()
    };
    if payload_chars > 1 {
        ctx.report(Diagnostic::new(
            ErrorCategory::Lexical,
            "literal.char.too.long",
            range,
            "too many characters in character literal",
        ));
    }
}

fn check_string(ctx: &mut CheckContext<'_>, node: NodeId, text: &str) {
    let range = ctx.tree.range(node);
    let terminated = text.len() >= 2
        && text.starts_with('"')
        && text.ends_with('"')
        && !ends_with_open_escape(&text[1..text.len() - 1]);
    if !terminated || text.contains('\n') {
        ctx.report(Diagnostic::new(
            ErrorCategory::Lexical,
            "literal.string.unterminated",
            range,
            "unterminated string literal",
        ));
        return;
    }
    check_escapes(ctx, node, &text[1..text.len() - 1], 1);
}

/// An odd trailing backslash run means the closing quote is escaped.
fn ends_with_open_escape(body: &str) -> bool {
    body.bytes().rev().take_while(|&byte| byte == b'\\').count() % 2 == 1
}

fn check_text_block(ctx: &mut CheckContext<'_>, node: NodeId, text: &str) {
    let range = ctx.tree.range(node);
    if !text.starts_with("\"\"\"") {
        return;
    }
    let after_open = &text[3..];
    let Some(newline) = after_open.find('\n') else {
        ctx.report(Diagnostic::new(
            ErrorCategory::Lexical,
            "literal.text.block.open",
            range,
            "new line expected after opening text-block delimiter",
        ));
        return;
    };
    if !after_open[..newline].trim_end_matches('\r').trim().is_empty() {
        ctx.report(Diagnostic::new(
            ErrorCategory::Lexical,
            "literal.text.block.open",
            range,
            "text after opening text-block delimiter",
        ));
        return;
    }
    if text.len() < 6 || !text.ends_with("\"\"\"") {
        ctx.report(Diagnostic::new(
            ErrorCategory::Lexical,
            "literal.text.block.unterminated",
            range,
            "unterminated text block",
        ));
        return;
    }
    check_escapes(ctx, node, &text[3..text.len() - 3], 3);
}

pub(crate) fn check_fragment(ctx: &mut CheckContext<'_>, node: NodeId, text: &str) {
    check_escapes(ctx, node, text, 0);
}
