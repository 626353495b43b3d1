pub(super) fn create_preview(bytes: &[u8], limit_chars: usize) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => truncate_chars(text, limit_chars),
        Err(_) => truncate_chars(&hex::encode(bytes), limit_chars),
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    let mut indices = text.char_indices();
    match indices.nth(limit) {
        Some((offset, _)) => text[..offset].to_string(),
        None => text.to_string(),
    }
}
