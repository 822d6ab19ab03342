use serde::Serialize;

const EXTRA_MARKER: &str = "EX_";
const LEADING_INDEX: &str = "01";

/// Fields recovered from a filename in one of the rename conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedName {
    character: String,
    suffix: String,
    is_extra: bool,
}

impl ParsedName {
    /// Returns `None` when either field is blank.
    pub fn new(character: impl Into<String>, suffix: impl Into<String>, is_extra: bool) -> Option<Self> {
        let character = character.into();
        let suffix = suffix.into();
        if character.trim().is_empty() || suffix.trim().is_empty() {
            return None;
        }
        Some(Self {
            character,
            suffix,
            is_extra,
        })
    }

    pub fn character(&self) -> &str {
        &self.character
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn is_extra(&self) -> bool {
        self.is_extra
    }
}

/// Strips `.{extension}` (ASCII case-insensitive) from `file_name`.
pub fn strip_extension<'a>(file_name: &'a str, extension: &str) -> Option<&'a str> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    ext.eq_ignore_ascii_case(extension).then_some(stem)
}

/// Classifies a normalized filename against the rename conventions.
///
/// Tried in order:
/// - `EX_{character}_{suffix}` (extra variant; the marker rules out the others)
/// - `{character}_{suffix}`
/// - `01_{character}_{suffix}`
pub fn parse_name(file_name: &str, extension: &str) -> Option<ParsedName> {
    let body = strip_extension(file_name, extension)?;

    if let Some(rest) = body.strip_prefix(EXTRA_MARKER) {
        return match rest.split('_').collect::<Vec<_>>().as_slice() {
            [character, suffix] => ParsedName::new(*character, *suffix, true),
            _ => None,
        };
    }

    match body.split('_').collect::<Vec<_>>().as_slice() {
        [character, suffix] => ParsedName::new(*character, *suffix, false),
        [index, character, suffix] if *index == LEADING_INDEX => {
            ParsedName::new(*character, *suffix, false)
        }
        _ => None,
    }
}
