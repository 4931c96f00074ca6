use std::sync::LazyLock;

use regex::Regex;

static LINE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\r\n]+").unwrap());
static CITATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[.*?\]").unwrap());
static PHONETIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/.*?/;?").unwrap());
static AUDIO_PAREN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^()]*?\b\w+\s*ⓘ\)").unwrap());
static AUDIO_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\b\w+\s*ⓘ").unwrap());
static SPACES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Strip footnote markers, IPA transcriptions and audio-pronunciation
/// markers from paragraph text, then normalise whitespace.
///
/// Running it on its own output changes nothing.
pub fn clean(raw: &str) -> String {
    let text = LINE_BREAK_RE.replace_all(raw, " ");
    let text = CITATION_RE.replace_all(&text, "");
    let text = PHONETIC_RE.replace_all(&text, "");
    let text = AUDIO_PAREN_RE.replace_all(&text, "");
    let text = AUDIO_WORD_RE.replace_all(&text, "");
    SPACES_RE.replace_all(&text, " ").trim().to_string()
}
