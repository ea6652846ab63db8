//! HTML to visible text conversion.

/// Convert HTML markup to its visible text.
///
/// Tags are dropped (hyperlink markup included, so only the link's visible
/// text survives), comments and `script`/`style` element content are
/// skipped, common character entities are decoded, and text runs are joined
/// with a single space at each element boundary.
pub fn html_to_text(html: &str) -> String {
    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        let (text, tail) = rest.split_at(open);
        push_text(text, &mut current);
        if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }

        if tail.starts_with("<!--") {
            rest = match tail.find("-->") {
                Some(end) => &tail[end + 3..],
                None => "",
            };
            continue;
        }

        let Some(close) = tail.find('>') else {
            // Unterminated tag; nothing visible can follow.
            return segments.join(" ");
        };
        let tag = &tail[1..close];
        rest = &tail[close + 1..];

        let name = tag_name(tag);
        if name.eq_ignore_ascii_case("script") || name.eq_ignore_ascii_case("style") {
            rest = skip_element(rest, name);
        }
    }

    push_text(rest, &mut current);
    if !current.is_empty() {
        segments.push(current);
    }
    segments.join(" ")
}

/// Append text content, decoding character entities.
fn push_text(text: &str, out: &mut String) {
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match decode_entity(tail) {
            Some((decoded, consumed)) => {
                out.push(decoded);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
}

/// Decode one character entity at the start of `text` (which begins with
/// `&`), returning the character and the number of bytes consumed.
fn decode_entity(text: &str) -> Option<(char, usize)> {
    let end = text
        .char_indices()
        .take(12)
        .find(|(_, character)| *character == ';')
        .map(|(index, _)| index)?;
    let body = &text[1..end];
    let decoded = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        _ => {
            let code = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(decimal) = body.strip_prefix('#') {
                decimal.parse().ok()?
            } else {
                return None;
            };
            char::from_u32(code)?
        }
    };
    Some((decoded, end + 1))
}

/// The element name of a tag body, closing-tag slashes stripped.
fn tag_name(tag: &str) -> &str {
    let tag = tag.trim_start_matches('/');
    let end = tag
        .find(|character: char| !character.is_ascii_alphanumeric())
        .unwrap_or(tag.len());
    &tag[..end]
}

/// Skip everything up to and including the closing tag for `name`.
fn skip_element<'a>(rest: &'a str, name: &str) -> &'a str {
    let mut rest = rest;
    while let Some(open) = rest.find('<') {
        let tail = &rest[open..];
        let Some(close) = tail.find('>') else {
            return "";
        };
        let tag = &tail[1..close];
        rest = &tail[close + 1..];
        if tag.starts_with('/') && tag_name(tag).eq_ignore_ascii_case(name) {
            return rest;
        }
    }
    ""
}
