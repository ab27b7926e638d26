//! Token extraction from tweet text
//!
//! A lexical tokenizer for German and English tweets. URLs, mentions and
//! hashtags stay whole; words keep inner hyphens and apostrophes; every
//! punctuation mark or symbol is its own token. Whitespace never becomes a
//! token.
//!
//! Attributes are derived from the surface form only: a lowercased lemma, a
//! word shape, alphabetic and stop-word flags, and a coarse part-of-speech tag
//! from a closed-class lexicon (German capitalized words count as nouns).

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::tweet::TokenAttributes;

static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        (?P<url>https?://\S+)
        | (?P<mention>@\w+)
        | (?P<hashtag>\#\w+)
        | (?P<num>\d+(?:[.,:]\d+)*)
        | (?P<word>[\p{L}\p{M}]+(?:['’\-][\p{L}\p{M}]+)*)
        | (?P<punct>\p{P})
        | (?P<sym>\S)
        ",
    )
    .expect("token pattern is valid")
});

static HASHTAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)#\w+").expect("hashtag pattern is valid"));

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| STOP_WORD_LIST.iter().copied().collect());

/// German and English stop words, lowercase.
const STOP_WORD_LIST: &[&str] = &[
    // German
    "aber", "alle", "allem", "allen", "aller", "alles", "als", "also", "am", "an", "ander", "andere",
    "anderen", "auch", "auf", "aus", "bei", "bin", "bis", "bist", "da", "damit", "dann", "das", "dass",
    "dein", "deine", "dem", "den", "denn", "der", "des", "dich", "die", "dies", "diese", "diesem",
    "diesen", "dieser", "dieses", "dir", "doch", "dort", "du", "durch", "ein", "eine", "einem", "einen",
    "einer", "eines", "er", "es", "etwas", "euch", "euer", "für", "gegen", "gewesen", "hab", "habe",
    "haben", "hat", "hatte", "hier", "hin", "ich", "ihm", "ihn", "ihnen", "ihr", "ihre", "im", "in",
    "ist", "ja", "jede", "jeder", "jetzt", "kann", "kein", "keine", "können", "man", "mein", "meine",
    "mich", "mir", "mit", "muss", "nach", "nicht", "nichts", "noch", "nun", "nur", "ob", "oder", "ohne",
    "schon", "sehr", "sein", "seine", "sich", "sie", "sind", "so", "soll", "über", "um", "und", "uns",
    "unser", "unter", "viel", "vom", "von", "vor", "war", "waren", "warum", "was", "weil", "wenn", "wer",
    "werden", "wie", "wieder", "will", "wir", "wird", "wo", "wurde", "zu", "zum", "zur",
    // English
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "because", "been",
    "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has", "have", "he", "her",
    "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "me", "my", "no", "not", "of",
    "on", "or", "our", "she", "so", "that", "the", "their", "them", "then", "there", "they", "this", "to",
    "too", "up", "us", "was", "we", "were", "what", "when", "which", "who", "will", "with", "would",
    "you", "your",
];

/// Lexical category of a raw token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Url,
    Mention,
    Hashtag,
    Number,
    Word,
    Punct,
    Symbol,
}

/// Split text into `(kind, text)` pieces.
///
/// # Examples
///
/// ```
/// use tweetsent::tokenizer::{raw_tokens, TokenKind};
///
/// let tokens: Vec<_> = raw_tokens("Hallo @bob, #Montag!").collect();
/// assert_eq!(tokens, vec![
///     (TokenKind::Word, "Hallo"),
///     (TokenKind::Mention, "@bob"),
///     (TokenKind::Punct, ","),
///     (TokenKind::Hashtag, "#Montag"),
///     (TokenKind::Punct, "!"),
/// ]);
/// ```
pub fn raw_tokens(text: &str) -> impl Iterator<Item = (TokenKind, &str)> {
    TOKEN_REGEX.captures_iter(text).filter_map(|caps| {
        let kinds = [
            ("url", TokenKind::Url),
            ("mention", TokenKind::Mention),
            ("hashtag", TokenKind::Hashtag),
            ("num", TokenKind::Number),
            ("word", TokenKind::Word),
            ("punct", TokenKind::Punct),
            ("sym", TokenKind::Symbol),
        ];
        kinds.iter().find_map(|(name, kind)| caps.name(name).map(|m| (*kind, m.as_str())))
    })
}

/// Tokenize text and derive attributes for every token.
pub fn tokenize(text: &str) -> Vec<TokenAttributes> {
    raw_tokens(text).map(|(kind, token)| attributes(kind, token)).collect()
}

/// Hashtags in order of appearance, including the leading `#`.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG_REGEX.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Whether a lowercase word is a stop word.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word.to_lowercase().as_str())
}

fn attributes(kind: TokenKind, text: &str) -> TokenAttributes {
    let lemma = text.to_lowercase();
    TokenAttributes {
        text: text.to_string(),
        pos: coarse_pos(kind, text, &lemma).to_string(),
        shape: word_shape(text),
        alpha: !text.is_empty() && text.chars().all(char::is_alphabetic),
        stop: STOP_WORDS.contains(lemma.as_str()),
        lemma,
        tag: None,
        dep: None,
    }
}

fn coarse_pos(kind: TokenKind, text: &str, lemma: &str) -> &'static str {
    match kind {
        TokenKind::Url | TokenKind::Mention | TokenKind::Hashtag => "X",
        TokenKind::Number => "NUM",
        TokenKind::Punct => "PUNCT",
        TokenKind::Symbol => "SYM",
        TokenKind::Word => {
            if let Some(tag) = closed_class(lemma) {
                tag
            } else if text.chars().next().is_some_and(char::is_uppercase) {
                "NOUN"
            } else {
                "X"
            }
        }
    }
}

fn closed_class(word: &str) -> Option<&'static str> {
    let tag = match word {
        "der" | "die" | "das" | "den" | "dem" | "des" | "ein" | "eine" | "einen" | "einem" | "einer"
        | "eines" | "kein" | "keine" | "the" | "a" | "this" | "these" | "those" => "DET",
        "ich" | "du" | "er" | "sie" | "es" | "wir" | "ihr" | "mich" | "mir" | "dich" | "dir" | "uns"
        | "euch" | "ihn" | "ihm" | "ihnen" | "man" | "sich" | "mein" | "meine" | "dein" | "deine"
        | "sein" | "seine" | "unser" | "i" | "you" | "he" | "she" | "it" | "we" | "they" | "me"
        | "him" | "her" | "them" | "my" | "your" | "his" | "its" | "our" | "their" => "PRON",
        "in" | "im" | "an" | "am" | "auf" | "aus" | "bei" | "mit" | "nach" | "von" | "vom" | "zu"
        | "zum" | "zur" | "für" | "über" | "unter" | "vor" | "durch" | "gegen" | "ohne" | "um"
        | "seit" | "bis" | "of" | "on" | "at" | "by" | "for" | "with" | "from" | "to" | "into"
        | "about" => "ADP",
        "und" | "oder" | "aber" | "denn" | "sondern" | "and" | "or" | "but" | "nor" => "CCONJ",
        "dass" | "weil" | "wenn" | "ob" | "obwohl" | "als" | "während" | "because" | "if"
        | "although" | "while" | "that" => "SCONJ",
        "bin" | "bist" | "ist" | "sind" | "seid" | "war" | "waren" | "wird" | "werden" | "wurde"
        | "habe" | "hast" | "hat" | "haben" | "hatte" | "kann" | "können" | "muss" | "soll"
        | "will" | "is" | "are" | "was" | "were" | "be" | "been" | "have" | "has" | "had" | "do"
        | "does" | "did" | "would" | "can" | "could" | "should" => "AUX",
        "nicht" | "not" | "ja" | "nein" | "no" => "PART",
        _ => return None,
    };
    Some(tag)
}

/// Orthographic shape: `X` upper, `x` lower, `d` digit, other characters kept;
/// runs of the same class are cut at four.
fn word_shape(text: &str) -> String {
    let mut shape = String::with_capacity(text.len());
    let mut last = None;
    let mut run = 0;
    for c in text.chars() {
        let mapped = if c.is_uppercase() {
            'X'
        } else if c.is_lowercase() {
            'x'
        } else if c.is_ascii_digit() {
            'd'
        } else {
            c
        };
        if Some(mapped) == last {
            run += 1;
        } else {
            last = Some(mapped);
            run = 1;
        }
        if run <= 4 {
            shape.push(mapped);
        }
    }
    shape
}
