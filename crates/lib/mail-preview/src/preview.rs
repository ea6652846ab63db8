//! Body preview selection.

use mail_parser::MimeHeaders;

/// Extract a clean plain-text preview of the message body.
///
/// HTML parts are preferred over plain-text parts; among parts of the same
/// kind the last-encountered candidate is tried first, falling back toward
/// earlier ones when a candidate has no visible content after conversion.
/// Attachments and image parts are ignored. A message with no usable body
/// yields an empty string; this function has no failure mode.
pub fn body_preview(message: &mail_parser::Message<'_>) -> String {
    let mut html_parts = Vec::new();
    let mut text_parts = Vec::new();
    collect_leaf_parts(message, 0, &mut html_parts, &mut text_parts);

    for html in html_parts.iter().rev() {
        let candidate = crate::clean_all_whitespace(&crate::html_to_text(html));
        if !candidate.trim().is_empty() {
            return candidate;
        }
    }

    for text in text_parts.iter().rev() {
        let candidate = crate::clean_all_whitespace(text);
        if !candidate.trim().is_empty() {
            return candidate;
        }
    }

    String::new()
}

/// Gather displayable HTML and plain-text leaf parts in encounter order,
/// descending into multipart containers and nested messages.
fn collect_leaf_parts<'a>(
    message: &'a mail_parser::Message<'a>,
    part_id: usize,
    html_parts: &mut Vec<&'a str>,
    text_parts: &mut Vec<&'a str>,
) {
    let Some(part) = message.parts.get(part_id) else {
        return;
    };
    match &part.body {
        mail_parser::PartType::Multipart(children) => {
            for child in children {
                collect_leaf_parts(message, *child as usize, html_parts, text_parts);
            }
        }
        mail_parser::PartType::Message(nested) => {
            collect_leaf_parts(nested, 0, html_parts, text_parts);
        }
        mail_parser::PartType::Html(contents) if is_displayable(part) => {
            html_parts.push(contents.as_ref());
        }
        mail_parser::PartType::Text(contents) if is_displayable(part) => {
            text_parts.push(contents.as_ref());
        }
        _ => {}
    }
}

/// Whether a leaf part belongs in the preview: not an attachment and not an
/// image.
fn is_displayable(part: &mail_parser::MessagePart<'_>) -> bool {
    let is_attachment = part
        .content_disposition()
        .is_some_and(|disposition| disposition.ctype().eq_ignore_ascii_case("attachment"))
        || part.attachment_name().is_some();
    let is_image = part
        .content_type()
        .is_some_and(|content_type| content_type.ctype().eq_ignore_ascii_case("image"));
    !is_attachment && !is_image
}
