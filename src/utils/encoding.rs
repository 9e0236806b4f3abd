/// Decodes an optionally `0x`-prefixed hex string.
///
/// On failure the message names the field, the position of the first
/// offending character and a short preview of the input.
pub fn decode_hex_field(value: &str, field_name: &str) -> Result<Vec<u8>, String> {
    let hex_str = value.strip_prefix("0x").unwrap_or(value);

    if let Some((pos, ch)) = hex_str
        .chars()
        .enumerate()
        .find(|(_, c)| !c.is_ascii_hexdigit())
    {
        return Err(format!(
            "Invalid {} hex: non-hexadecimal character '{}' at position {} (input: {}...)",
            field_name,
            ch,
            pos,
            preview(hex_str)
        ));
    }

    hex::decode(hex_str).map_err(|e| {
        format!(
            "Invalid {} hex: failed to decode - {} (input: {}...)",
            field_name,
            e,
            preview(hex_str)
        )
    })
}

fn preview(value: &str) -> &str {
    let end = value
        .char_indices()
        .nth(16)
        .map(|(idx, _)| idx)
        .unwrap_or(value.len());
    &value[..end]
}
