//! Regular expressions shared by the chunk splitter and the token classifier.
//!
//! The splitter uses case-insensitive `^`-anchored variants that are tried in priority order
//! at every input position. The classifier uses case-sensitive variants anchored at both ends.

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters trimmed off the ends of hashtags, mentions, dates, urls, emoji and words.
pub const IGNORED_LEAD_TRAIL_CHARS: &[char] = &[
    '#', '@', ',', '.', '!', '?', ';', '|', '&', '+', '-', '^', '~', '*', '\\', '"', '\'', ' ',
    '\t', '\n', '\r',
];

// Only valid at the start of input or after whitespace; the splitter checks that by hand.
const EMOTICON: &str = r">:-?\(|:-?\)|<3|:'\(|:-?\|:-?/|:-?\(|:-?\*|:-?\||:o\)|:-?o|=-?\)|:-?D|:-?p|:-?P|:-?b|;-?p|;-?P|;-?b|;-?\)";

const EMOJI: &str = concat!(
    r"[\x{2712}\x{2714}\x{2716}\x{271d}\x{2721}\x{2728}\x{2733}\x{2734}\x{2744}\x{2747}",
    r"\x{274c}\x{274e}\x{2753}-\x{2755}\x{2757}\x{2763}\x{2764}\x{2795}-\x{2797}\x{27a1}",
    r"\x{27b0}\x{27bf}\x{2934}\x{2935}\x{2b05}-\x{2b07}\x{2b1b}\x{2b1c}\x{2b50}\x{2b55}",
    r"\x{3030}\x{303d}\x{1f004}\x{1f0cf}\x{1f170}\x{1f171}\x{1f17e}\x{1f17f}\x{1f18e}",
    r"\x{1f191}-\x{1f19a}\x{1f201}\x{1f202}\x{1f21a}\x{1f22f}\x{1f232}-\x{1f23a}\x{1f250}",
    r"\x{1f251}\x{1f300}-\x{1f321}\x{1f324}-\x{1f393}\x{1f396}\x{1f397}\x{1f399}-\x{1f39b}",
    r"\x{1f39e}-\x{1f3f0}\x{1f3f3}-\x{1f3f5}\x{1f3f7}-\x{1f4fd}\x{1f4ff}-\x{1f53d}",
    r"\x{1f549}-\x{1f54e}\x{1f550}-\x{1f567}\x{1f56f}\x{1f570}\x{1f573}-\x{1f579}\x{1f587}",
    r"\x{1f58a}-\x{1f58d}\x{1f590}\x{1f595}\x{1f596}\x{1f5a5}\x{1f5a8}\x{1f5b1}\x{1f5b2}",
    r"\x{1f5bc}\x{1f5c2}-\x{1f5c4}\x{1f5d1}-\x{1f5d3}\x{1f5dc}-\x{1f5de}\x{1f5e1}\x{1f5e3}",
    r"\x{1f5ef}\x{1f5f3}\x{1f5fa}-\x{1f64f}\x{1f680}-\x{1f6c5}\x{1f6cb}-\x{1f6d0}",
    r"\x{1f6e0}-\x{1f6e5}\x{1f6e9}\x{1f6eb}\x{1f6ec}\x{1f6f0}\x{1f6f3}\x{1f910}-\x{1f918}",
    r"\x{1f980}-\x{1f984}\x{1f9c0}\x{3297}\x{3299}\x{a9}\x{ae}\x{203c}\x{2049}\x{2122}",
    r"\x{2139}\x{2194}-\x{2199}\x{21a9}\x{21aa}\x{231a}\x{231b}\x{2328}\x{2388}\x{23cf}",
    r"\x{23e9}-\x{23f3}\x{23f8}-\x{23fa}\x{24c2}\x{25aa}\x{25ab}\x{25b6}\x{25c0}",
    r"\x{25fb}-\x{25fe}\x{2600}-\x{2604}\x{260e}\x{2611}\x{2614}\x{2615}\x{2618}\x{261d}",
    r"\x{2620}\x{2622}\x{2623}\x{2626}\x{262a}\x{262e}\x{262f}\x{2638}-\x{263a}",
    r"\x{2648}-\x{2653}\x{2660}\x{2663}\x{2665}\x{2666}\x{2668}\x{267b}\x{267f}",
    r"\x{2692}-\x{2694}\x{2696}\x{2697}\x{2699}\x{269b}\x{269c}\x{26a0}\x{26a1}\x{26aa}",
    r"\x{26ab}\x{26b0}\x{26b1}\x{26bd}\x{26be}\x{26c4}\x{26c5}\x{26c8}\x{26ce}\x{26cf}",
    r"\x{26d1}\x{26d3}\x{26d4}\x{26e9}\x{26ea}\x{26f0}-\x{26f5}\x{26f7}-\x{26fa}\x{26fd}",
    r"\x{2702}\x{2705}\x{2708}-\x{270d}\x{270f}]",
    // keycaps
    r"|[#*0-9]\x{20e3}",
    // regional indicator pairs (flags)
    r"|\x{1f1e6}[\x{1f1e8}-\x{1f1ec}\x{1f1ee}\x{1f1f1}\x{1f1f2}\x{1f1f4}\x{1f1f6}-\x{1f1fa}\x{1f1fc}\x{1f1fd}\x{1f1ff}]",
    r"|\x{1f1e7}[\x{1f1e6}\x{1f1e7}\x{1f1e9}-\x{1f1ef}\x{1f1f1}-\x{1f1f4}\x{1f1f6}-\x{1f1f9}\x{1f1fb}\x{1f1fc}\x{1f1fe}\x{1f1ff}]",
    r"|\x{1f1e8}[\x{1f1e6}\x{1f1e8}\x{1f1e9}\x{1f1eb}-\x{1f1ee}\x{1f1f0}-\x{1f1f5}\x{1f1f7}\x{1f1fa}-\x{1f1ff}]",
    r"|\x{1f1e9}[\x{1f1ea}\x{1f1ec}\x{1f1ef}\x{1f1f0}\x{1f1f2}\x{1f1f4}\x{1f1ff}]",
    r"|\x{1f1ea}[\x{1f1e6}\x{1f1e8}\x{1f1ea}\x{1f1ec}\x{1f1ed}\x{1f1f7}-\x{1f1fa}]",
    r"|\x{1f1eb}[\x{1f1ee}-\x{1f1f0}\x{1f1f2}\x{1f1f4}\x{1f1f7}]",
    r"|\x{1f1ec}[\x{1f1e6}\x{1f1e7}\x{1f1e9}-\x{1f1ee}\x{1f1f1}-\x{1f1f3}\x{1f1f5}-\x{1f1fa}\x{1f1fc}\x{1f1fe}]",
    r"|\x{1f1ed}[\x{1f1f0}\x{1f1f2}\x{1f1f3}\x{1f1f7}\x{1f1f9}\x{1f1fa}]",
    r"|\x{1f1ee}[\x{1f1e8}-\x{1f1ea}\x{1f1f1}-\x{1f1f4}\x{1f1f6}-\x{1f1f9}]",
    r"|\x{1f1ef}[\x{1f1ea}\x{1f1f2}\x{1f1f4}\x{1f1f5}]",
    r"|\x{1f1f0}[\x{1f1ea}\x{1f1ec}-\x{1f1ee}\x{1f1f2}\x{1f1f3}\x{1f1f5}\x{1f1f7}\x{1f1fc}\x{1f1fe}\x{1f1ff}]",
    r"|\x{1f1f1}[\x{1f1e6}-\x{1f1e8}\x{1f1ee}\x{1f1f0}\x{1f1f7}-\x{1f1fb}\x{1f1fe}]",
    r"|\x{1f1f2}[\x{1f1e6}\x{1f1e8}-\x{1f1ed}\x{1f1f0}-\x{1f1ff}]",
    r"|\x{1f1f3}[\x{1f1e6}\x{1f1e8}\x{1f1ea}-\x{1f1ec}\x{1f1ee}\x{1f1f1}\x{1f1f4}\x{1f1f5}\x{1f1f7}\x{1f1fa}\x{1f1ff}]",
    r"|\x{1f1f4}\x{1f1f2}",
    r"|\x{1f1f5}[\x{1f1e6}\x{1f1ea}-\x{1f1ed}\x{1f1f0}-\x{1f1f3}\x{1f1f7}-\x{1f1f9}\x{1f1fc}\x{1f1fe}]",
    r"|\x{1f1f6}\x{1f1e6}",
    r"|\x{1f1f7}[\x{1f1ea}\x{1f1f4}\x{1f1f8}\x{1f1fa}\x{1f1fc}]",
    r"|\x{1f1f8}[\x{1f1e6}-\x{1f1ea}\x{1f1ec}-\x{1f1f4}\x{1f1f7}-\x{1f1f9}\x{1f1fb}\x{1f1fd}-\x{1f1ff}]",
    r"|\x{1f1f9}[\x{1f1e6}\x{1f1e8}\x{1f1e9}\x{1f1eb}-\x{1f1ed}\x{1f1ef}-\x{1f1f4}\x{1f1f7}\x{1f1f9}\x{1f1fb}\x{1f1fc}\x{1f1ff}]",
    r"|\x{1f1fa}[\x{1f1e6}\x{1f1ec}\x{1f1f2}\x{1f1f8}\x{1f1fe}\x{1f1ff}]",
    r"|\x{1f1fb}[\x{1f1e6}\x{1f1e8}\x{1f1ea}\x{1f1ec}\x{1f1ee}\x{1f1f3}\x{1f1fa}]",
    r"|\x{1f1fc}[\x{1f1eb}\x{1f1f8}]",
    r"|\x{1f1fd}\x{1f1f0}",
    r"|\x{1f1fe}[\x{1f1ea}\x{1f1f9}]",
    r"|\x{1f1ff}[\x{1f1e6}\x{1f1f2}\x{1f1fc}]",
);

const URL: &str = r"[+-]?[\w-]+://[^\s/$.?#].[^\s^~]*";
const PHRASE: &str = r#"[+-]?"[^"]+""#;
const HASHTAG: &str = r"[+-]?#+[a-zA-Z0-9_]+";
const MENTION: &str = r"[+-]?@+[a-zA-Z0-9_]+(?:[a-zA-Z0-9_.\-]+)?";
const NUMBER: &str = r"[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?";
const DATE: &str = r"[+-]?[0-9]{4}-[0-9]{2}-[0-9]{2}";
const FIELD: &str = r"[+-]?[a-zA-Z_]+(?:[a-zA-Z0-9_.\-]+)?:";
// Everything up to whitespace or a structural character. Matches the empty string too.
const WORD: &str = r"[+-]?[^\s()\\^<>\[\]{}~=]*";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in query pattern is valid")
}

fn split_prefix(pattern: &str) -> Regex {
    compile(&format!("^(?i:{pattern})"))
}

fn whole(pattern: &str) -> Regex {
    compile(&format!("^(?:{pattern})$"))
}

pub static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| compile(r"[\t\n\x0B\x0C\r ]+"));

/// Splitter alternatives in priority order. The emoticon one is kept apart because it only
/// applies after whitespace.
pub static SPLIT_EMOTICON: Lazy<Regex> = Lazy::new(|| split_prefix(EMOTICON));
pub static SPLIT_ALTERNATIVES: Lazy<[Regex; 4]> = Lazy::new(|| {
    [
        split_prefix(URL),
        split_prefix(PHRASE),
        split_prefix(FIELD),
        split_prefix(WORD),
    ]
});

pub static EMOTICON_TOKEN: Lazy<Regex> = Lazy::new(|| whole(EMOTICON));
pub static EMOJI_TOKEN: Lazy<Regex> = Lazy::new(|| whole(EMOJI));
pub static URL_TOKEN: Lazy<Regex> = Lazy::new(|| whole(URL));
pub static FIELD_TOKEN: Lazy<Regex> = Lazy::new(|| whole(FIELD));
pub static PHRASE_TOKEN: Lazy<Regex> = Lazy::new(|| whole(PHRASE));
pub static HASHTAG_TOKEN: Lazy<Regex> = Lazy::new(|| whole(HASHTAG));
pub static MENTION_TOKEN: Lazy<Regex> = Lazy::new(|| whole(MENTION));
pub static DATE_TOKEN: Lazy<Regex> = Lazy::new(|| whole(DATE));
pub static NUMBER_TOKEN: Lazy<Regex> = Lazy::new(|| whole(NUMBER));

pub fn trim_ignored(value: &str) -> &str {
    value.trim_matches(IGNORED_LEAD_TRAIL_CHARS)
}

pub fn rtrim_ignored(value: &str) -> &str {
    value.trim_end_matches(IGNORED_LEAD_TRAIL_CHARS)
}
