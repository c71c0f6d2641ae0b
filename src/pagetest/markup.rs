/// Pull the text content of the first `<name>...</name>` pair out of a
/// markup body, case-insensitively. The test server's XML responses are
/// small and flat, so a full XML parser is not needed to read one element.
pub fn element_text<'a>(body: &'a str, name: &str) -> Option<&'a str> {
    let lower = body.to_ascii_lowercase();
    let open = format!("<{}", name.to_ascii_lowercase());
    let close = format!("</{}>", name.to_ascii_lowercase());

    let start = lower.find(&open)?;
    let text_start = body[start..].find('>')? + start + 1;
    let text_end = lower[text_start..].find(&close)? + text_start;

    Some(body[text_start..text_end].trim())
}
