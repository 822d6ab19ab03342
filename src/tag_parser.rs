use serde::Serialize;

use crate::name_parser::strip_extension;

const SEPARATOR: &str = " - ";
const EXTRA_SUFFIX: &str = " EX";

/// Tag fields recovered from a `[album]performer - NN title` filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTag {
    track_title: String,
    performer: String,
    album: String,
    track_number: u32,
}

impl ParsedTag {
    /// Returns `None` unless `album` and `performer` are non-blank and `track_number >= 1`.
    pub fn new(
        track_title: impl Into<String>,
        performer: impl Into<String>,
        album: impl Into<String>,
        track_number: u32,
    ) -> Option<Self> {
        let performer = performer.into();
        let album = album.into();
        if track_number == 0 || performer.trim().is_empty() || album.trim().is_empty() {
            return None;
        }
        Some(Self {
            track_title: track_title.into(),
            performer,
            album,
            track_number,
        })
    }

    pub fn track_title(&self) -> &str {
        &self.track_title
    }

    pub fn performer(&self) -> &str {
        &self.performer
    }

    pub fn album(&self) -> &str {
        &self.album
    }

    pub fn track_number(&self) -> u32 {
        self.track_number
    }
}

/// Parses `[album]performer - NN title.ext` (or `[album]performer - title.ext`).
///
/// The title is decorated with the performer: `Foo` becomes `Foo (Bar)` and
/// `Foo EX` becomes `Foo (Bar) EX`.
///
/// Without a usable leading number the track is 1 and the whole track part
/// is the title. That covers a number of 0, a non-numeric lead, and a number
/// followed only by whitespace: `[A]B - 01 .mp3` yields track 1 titled
/// `01  (B)`.
pub fn parse_tag(file_name: &str, extension: &str) -> Option<ParsedTag> {
    let body = strip_extension(file_name, extension)?;

    let (prefix_part, track_part) = body.split_once(SEPARATOR)?;
    if track_part.contains(SEPARATOR) || track_part.is_empty() {
        return None;
    }

    let inner = prefix_part.strip_prefix('[')?;
    let (album, performer) = inner.split_once(']')?;

    let (track_number, title) = split_track(track_part);
    ParsedTag::new(decorate_title(title, performer), performer, album, track_number)
}

/// Splits `NN title` into its number and title, falling back to track 1 and
/// the whole text when there is no usable leading number.
fn split_track(track_part: &str) -> (u32, &str) {
    match track_part.split_once(' ') {
        Some((number, title)) if !title.trim().is_empty() => match number.parse::<u32>() {
            Ok(n) if n >= 1 => (n, title),
            _ => (1, track_part),
        },
        _ => (1, track_part),
    }
}

fn decorate_title(title: &str, performer: &str) -> String {
    match title.strip_suffix(EXTRA_SUFFIX) {
        Some(stem) => format!("{stem} ({performer}){EXTRA_SUFFIX}"),
        None => format!("{title} ({performer})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_track() {
        let tag = parse_tag("[Greeting]Alice - 01 Hello.mp3", "mp3").unwrap();
        assert_eq!(tag.album(), "Greeting");
        assert_eq!(tag.performer(), "Alice");
        assert_eq!(tag.track_number(), 1);
        assert_eq!(tag.track_title(), "Hello (Alice)");
    }

    #[test]
    fn test_extra_marker_keeps_ex_after_performer() {
        let tag = parse_tag("[Night]Rika - 02 Night Voice EX.mp3", "mp3").unwrap();
        assert_eq!(tag.track_number(), 2);
        assert_eq!(tag.track_title(), "Night Voice (Rika) EX");
    }

    #[test]
    fn test_bare_title_defaults_to_track_one() {
        let tag = parse_tag("[Secret]Kokoro - Secret.mp3", "mp3").unwrap();
        assert_eq!(tag.track_number(), 1);
        assert_eq!(tag.track_title(), "Secret (Kokoro)");
    }

    #[test]
    fn test_non_numeric_lead_keeps_whole_track_part() {
        let tag = parse_tag("[Night]Rika - Night Voice EX.mp3", "mp3").unwrap();
        assert_eq!(tag.track_number(), 1);
        assert_eq!(tag.track_title(), "Night Voice (Rika) EX");
    }

    #[test]
    fn test_zero_track_number_falls_back() {
        let tag = parse_tag("[A]B - 00 Title.mp3", "mp3").unwrap();
        assert_eq!(tag.track_number(), 1);
        assert_eq!(tag.track_title(), "00 Title (B)");
    }

    #[test]
    fn test_number_with_blank_title_falls_back() {
        let tag = parse_tag("[A]B - 01 .mp3", "mp3").unwrap();
        assert_eq!(tag.track_number(), 1);
        assert_eq!(tag.track_title(), "01  (B)");
    }

    #[test]
    fn test_structure_failures() {
        assert_eq!(parse_tag("Greeting Alice - 01 Hello.mp3", "mp3"), None);
        assert_eq!(parse_tag("[Greeting Alice - 01 Hello.mp3", "mp3"), None);
        assert_eq!(parse_tag("[Greeting]Alice 01 Hello.mp3", "mp3"), None);
        assert_eq!(parse_tag("[A]B - 01 C - D.mp3", "mp3"), None);
        assert_eq!(parse_tag("[Greeting]Alice - 01 Hello.wav", "mp3"), None);
    }

    #[test]
    fn test_blank_album_or_performer_rejected() {
        assert_eq!(parse_tag("[]Alice - 01 Hello.mp3", "mp3"), None);
        assert_eq!(parse_tag("[Greeting] - 01 Hello.mp3", "mp3"), None);
        assert_eq!(parse_tag("[Greeting]Alice - .mp3", "mp3"), None);
    }

    #[test]
    fn test_synthesized_names_are_tag_parseable() {
        let tag = parse_tag("[Greeting]Alice - 02 Greeting EX.mp3", "mp3").unwrap();
        assert_eq!(tag.album(), "Greeting");
        assert_eq!(tag.track_number(), 2);
        assert_eq!(tag.track_title(), "Greeting (Alice) EX");
    }
}
