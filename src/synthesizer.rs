use crate::name_parser::ParsedName;

/// Builds `[{suffix}]{character} - {index} {suffix}{marker}.{extension}`.
///
/// Extra variants get index `02` and a trailing ` EX`; everything else `01`.
pub fn synthesize_name(parsed: &ParsedName, extension: &str) -> String {
    let (index, marker) = if parsed.is_extra() {
        ("02", " EX")
    } else {
        ("01", "")
    };
    format!(
        "[{suffix}]{character} - {index} {suffix}{marker}.{extension}",
        suffix = parsed.suffix(),
        character = parsed.character(),
    )
}
