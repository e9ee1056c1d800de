/// Fills `{name}` placeholders in a route template.
///
/// Returns the expanded path and the keys it consumed, or the first placeholder no
/// parameter could fill.
pub(super) fn expand(
    template: &str,
    params: &[(String, String)],
) -> Result<(String, Vec<String>), String> {
    let mut path = String::with_capacity(template.len());
    let mut consumed = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        path.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| after.to_string())?;
        let name = &after[..close];
        let value = params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
            .ok_or_else(|| name.to_string())?;
        path.push_str(value);
        consumed.push(name.to_string());
        rest = &after[close + 1..];
    }
    path.push_str(rest);

    Ok((path, consumed))
}
