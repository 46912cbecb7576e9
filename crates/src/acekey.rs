//! Single-character shortcut assignment for group names and target names.
//!
//! Keys are drawn from the word itself whenever possible, skipping the prefix
//! every word in the batch shares. The search is an ordered list of strategy
//! functions; the first one that finds a free character wins, and the loop
//! repeats until every word has a key or no strategy can place one. Words
//! left over get a deterministic key from a 64-bit FNV-1a hash of the word.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

pub const DEFAULT_KEY_PATTERN: &str = "^[A-Za-z0-9]$";
pub const FALLBACK_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
pub const PLACEHOLDER_KEY: char = '?';

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

static DEFAULT_ALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_KEY_PATTERN).expect("default key pattern compiles"));

/// Caller override: given a word and the keys taken so far, return the key to
/// use, or `None` to leave the word to the built-in search.
pub type KeyChooser = Arc<dyn Fn(&str, &BTreeSet<char>) -> Option<String> + Send + Sync>;

#[derive(Clone)]
pub struct KeyOptions {
    /// A character is eligible when its one-character string matches.
    pub allowed: Regex,
    /// Also try the upper- and lower-case forms of each candidate.
    pub case_fold: bool,
    /// For targets, first look for characters no other word has at the same
    /// index, so keys line up in a column.
    pub align: bool,
    pub chooser: Option<KeyChooser>,
}

impl Default for KeyOptions {
    fn default() -> Self {
        Self {
            allowed: DEFAULT_ALLOWED.clone(),
            case_fold: true,
            align: true,
            chooser: None,
        }
    }
}

impl fmt::Debug for KeyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyOptions")
            .field("allowed", &self.allowed.as_str())
            .field("case_fold", &self.case_fold)
            .field("align", &self.align)
            .field("chooser", &self.chooser.as_ref().map(|_| ".."))
            .finish()
    }
}

impl KeyOptions {
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let allowed = Regex::new(pattern).map_err(|source| Error::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            allowed,
            ..Self::default()
        })
    }

    pub fn allows(&self, c: char) -> bool {
        let mut buf = [0u8; 4];
        self.allowed.is_match(c.encode_utf8(&mut buf))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySource {
    InWord,
    Chooser,
    Hashed,
    /// The alphabet ran out; the key is not unique.
    Placeholder,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyAssignment {
    pub word: String,
    pub key: char,
    /// Character index in `word` shown as the key.
    pub index: Option<usize>,
    pub source: KeySource,
}

/// A word split around its key character.
///
/// When the key is not part of the word, `before` holds the whole word and the
/// key is shown after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Labelled {
    pub before: String,
    pub key: char,
    pub after: String,
    pub in_word: bool,
}

impl Labelled {
    pub fn plain(&self) -> String {
        if self.in_word {
            format!("{}{}{}", self.before, self.key, self.after)
        } else {
            format!("{} ({})", self.before, self.key)
        }
    }

    pub fn width(&self) -> usize {
        self.plain().chars().count()
    }
}

impl fmt::Display for Labelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain())
    }
}

impl KeyAssignment {
    pub fn labelled(&self) -> Labelled {
        let chars: Vec<char> = self.word.chars().collect();
        match self.index {
            Some(i) if i < chars.len() => Labelled {
                before: chars[..i].iter().collect(),
                key: self.key,
                after: chars[i + 1..].iter().collect(),
                in_word: true,
            },
            _ => Labelled {
                before: self.word.clone(),
                key: self.key,
                after: String::new(),
                in_word: false,
            },
        }
    }
}

/// 64-bit FNV-1a over the UTF-8 bytes of `s`.
pub fn fnv1a64(s: &str) -> u64 {
    s.bytes().fold(FNV_OFFSET, |h, b| (h ^ u64::from(b)).wrapping_mul(FNV_PRIME))
}

/// Length in characters of the prefix shared by every word.
pub fn shared_prefix_len<S: AsRef<str>>(words: &[S]) -> usize {
    let Some(first) = words.first() else {
        return 0;
    };
    let first: Vec<char> = first.as_ref().chars().collect();
    words.iter().skip(1).fold(first.len(), |len, w| {
        w.as_ref()
            .chars()
            .zip(first.iter())
            .take(len)
            .take_while(|(a, b)| a == *b)
            .count()
    })
}

fn single(mut it: impl Iterator<Item = char>) -> Option<char> {
    let c = it.next()?;
    it.next().is_none().then_some(c)
}

fn case_variants(c: char, fold: bool) -> Vec<char> {
    let mut out = vec![c];
    if fold {
        for v in [single(c.to_uppercase()), single(c.to_lowercase())]
            .into_iter()
            .flatten()
        {
            if !out.contains(&v) {
                out.push(v);
            }
        }
    }
    out
}

struct Search<'a> {
    // sorted, deduplicated
    words: Vec<Vec<char>>,
    start: usize,
    opts: &'a KeyOptions,
}

struct Pick {
    word: usize,
    index: usize,
    key: char,
}

impl Search<'_> {
    fn variant(&self, c: char, taken: &BTreeSet<char>) -> Option<char> {
        case_variants(c, self.opts.case_fold)
            .into_iter()
            .find(|v| !taken.contains(v) && self.opts.allows(*v))
    }

    fn unique_at(&self, word: usize, index: usize) -> bool {
        let c = self.words[word][index];
        self.words
            .iter()
            .enumerate()
            .all(|(j, w)| j == word || w.get(index) != Some(&c))
    }

    fn open<'s>(&'s self, assigned: &'s [bool]) -> impl Iterator<Item = (usize, &'s Vec<char>)> + 's {
        self.words
            .iter()
            .enumerate()
            .filter(move |(i, _)| !assigned[*i])
    }
}

type Strategy = fn(&Search<'_>, &[bool], &BTreeSet<char>) -> Option<Pick>;

// a word that is exactly the shared prefix has nothing past it; key it on its
// first character
fn prefix_word_first(s: &Search<'_>, assigned: &[bool], taken: &BTreeSet<char>) -> Option<Pick> {
    s.open(assigned)
        .filter(|(_, w)| !w.is_empty() && w.len() == s.start)
        .find_map(|(i, w)| s.variant(w[0], taken).map(|key| Pick { word: i, index: 0, key }))
}

fn aligned_unique(s: &Search<'_>, assigned: &[bool], taken: &BTreeSet<char>) -> Option<Pick> {
    s.open(assigned).find_map(|(i, w)| {
        (s.start..w.len())
            .filter(|&x| s.unique_at(i, x))
            .find_map(|x| s.variant(w[x], taken).map(|key| Pick { word: i, index: x, key }))
    })
}

fn first_free(s: &Search<'_>, assigned: &[bool], taken: &BTreeSet<char>) -> Option<Pick> {
    s.open(assigned).find_map(|(i, w)| {
        (s.start..w.len()).find_map(|x| s.variant(w[x], taken).map(|key| Pick { word: i, index: x, key }))
    })
}

fn strategies(header: bool, align: bool) -> Vec<Strategy> {
    let mut plan: Vec<Strategy> = vec![prefix_word_first];
    if !header && align {
        plan.push(aligned_unique);
    }
    plan.push(first_free);
    plan
}

fn validate_choice(
    word: &str,
    choice: &str,
    taken: &BTreeSet<char>,
    opts: &KeyOptions,
) -> Result<char> {
    let invalid = |reason: String| Error::InvalidShortcut {
        word: word.to_string(),
        reason,
    };
    let mut chars = choice.chars();
    let (Some(key), None) = (chars.next(), chars.next()) else {
        return Err(invalid(format!("'{choice}' is not a single character")));
    };
    if taken.contains(&key) {
        return Err(invalid(format!("'{key}' is already taken")));
    }
    if !opts.allows(key) {
        return Err(invalid(format!("'{key}' is not an allowed shortcut character")));
    }
    Ok(key)
}

/// Hash the word into the fallback alphabet, rehashing the decimal text of
/// the previous hash on collision. After one attempt per alphabet character
/// the alphabet is swept linearly from the last index; if nothing is free the
/// placeholder is returned.
pub fn hashed_key(word: &str, taken: &BTreeSet<char>, opts: &KeyOptions) -> (char, KeySource) {
    let alphabet: Vec<char> = FALLBACK_ALPHABET.chars().collect();
    let len = alphabet.len();
    let free = |c: char| !taken.contains(&c) && opts.allows(c);

    let mut h = fnv1a64(word);
    let mut idx = 0usize;
    for _ in 0..len {
        idx = (h % len as u64) as usize;
        if free(alphabet[idx]) {
            return (alphabet[idx], KeySource::Hashed);
        }
        h = fnv1a64(&h.to_string());
    }
    (0..len)
        .map(|o| alphabet[(idx + o) % len])
        .find(|c| free(*c))
        .map(|c| (c, KeySource::Hashed))
        .unwrap_or((PLACEHOLDER_KEY, KeySource::Placeholder))
}

/// Assign a key to every distinct word.
///
/// Group headers (`header = true`) skip the column-aligned pass. Keys are
/// pairwise distinct unless a placeholder had to be used.
pub fn assign_keys<S: AsRef<str>>(
    words: &[S],
    header: bool,
    opts: &KeyOptions,
) -> Result<BTreeMap<String, KeyAssignment>> {
    let mut sorted: Vec<String> = words.iter().map(|w| w.as_ref().to_string()).collect();
    sorted.sort();
    sorted.dedup();

    let mut out = BTreeMap::new();
    if sorted.is_empty() {
        return Ok(out);
    }
    let mut taken: BTreeSet<char> = BTreeSet::new();
    let mut assigned = vec![false; sorted.len()];

    if let Some(chooser) = &opts.chooser {
        for (i, word) in sorted.iter().enumerate() {
            let Some(choice) = chooser(word, &taken) else {
                continue;
            };
            let key = validate_choice(word, &choice, &taken, opts)?;
            taken.insert(key);
            assigned[i] = true;
            out.insert(
                word.clone(),
                KeyAssignment {
                    word: word.clone(),
                    key,
                    index: word.chars().position(|c| c == key),
                    source: KeySource::Chooser,
                },
            );
        }
    }

    let search = Search {
        words: sorted.iter().map(|w| w.chars().collect()).collect(),
        start: shared_prefix_len(&sorted),
        opts,
    };
    let plan = strategies(header, opts.align);
    while assigned.iter().any(|a| !a) {
        let Some(pick) = plan.iter().find_map(|s| s(&search, &assigned, &taken)) else {
            break;
        };
        let word = &sorted[pick.word];
        trace!(word = %word, key = %pick.key, index = pick.index, "assigned in-word key");
        taken.insert(pick.key);
        assigned[pick.word] = true;
        out.insert(
            word.clone(),
            KeyAssignment {
                word: word.clone(),
                key: pick.key,
                index: Some(pick.index),
                source: KeySource::InWord,
            },
        );
    }

    for (i, word) in sorted.iter().enumerate() {
        if assigned[i] {
            continue;
        }
        let (key, source) = hashed_key(word, &taken, opts);
        debug!(word = %word, key = %key, ?source, "no free in-word key");
        if source == KeySource::Hashed {
            taken.insert(key);
        }
        out.insert(
            word.clone(),
            KeyAssignment {
                word: word.clone(),
                key,
                index: None,
                source,
            },
        );
    }
    Ok(out)
}
