use crate::PartOfSpeech;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Closed-class English words and a few frequent adverbs/interjections.
static CLOSED_CLASS: Lazy<HashMap<&'static str, PartOfSpeech>> = Lazy::new(|| {
    use PartOfSpeech::*;
    let groups: &[(PartOfSpeech, &[&str])] = &[
        (
            Pron,
            &[
                "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "my", "your", "his",
                "its", "our", "their", "mine", "yours", "hers", "ours", "theirs", "myself", "yourself", "himself",
                "herself", "itself", "ourselves", "themselves", "what", "who", "whom", "which", "i'm", "you're",
                "we're", "they're", "it's", "he's", "she's", "i've", "i'll", "i'd", "something", "anything",
                "nothing", "everything", "someone", "anyone", "everyone", "nobody",
            ],
        ),
        (Det, &["a", "an", "the", "this", "that", "these", "those", "some", "any", "every", "each", "no", "all"]),
        (
            Adp,
            &[
                "at", "in", "on", "to", "from", "of", "with", "for", "by", "about", "into", "onto", "over", "under",
                "near", "after", "before", "through", "between", "during", "without", "via", "towards", "across",
            ],
        ),
        (
            Aux,
            &[
                "am", "is", "are", "was", "were", "be", "been", "being", "do", "does", "did", "have", "has", "had",
                "will", "would", "shall", "should", "can", "could", "may", "might", "must", "don't", "doesn't",
                "didn't", "can't", "won't", "isn't", "aren't",
            ],
        ),
        (Cconj, &["and", "or", "but", "nor", "yet"]),
        (Sconj, &["if", "because", "while", "although", "though", "unless", "whether", "since"]),
        (Part, &["not", "n't"]),
        (
            Intj,
            &["hi", "hello", "hey", "bye", "goodbye", "yes", "yeah", "ok", "okay", "thanks", "please", "wow", "oh"],
        ),
        (
            Adv,
            &[
                "very", "really", "today", "tomorrow", "yesterday", "tonight", "now", "here", "there", "always",
                "never", "also", "too", "soon", "then", "again", "where", "when", "why", "how", "just", "still",
                "already", "maybe", "home", "away", "later",
            ],
        ),
    ];

    groups.iter().flat_map(|(pos, words)| words.iter().map(move |w| (*w, *pos))).collect()
});

/// Base forms of frequent verbs.
static VERBS: Lazy<HashMap<&'static str, ()>> = Lazy::new(|| {
    [
        "like", "love", "hate", "want", "need", "go", "eat", "drink", "know", "think", "see", "get", "make", "take",
        "come", "leave", "fly", "travel", "visit", "book", "live", "work", "say", "tell", "ask", "help", "buy", "pay",
        "stay", "arrive", "return", "start", "stop", "feel", "try", "plan", "move", "call", "give", "find", "meet",
        "play", "read", "write", "walk", "drive", "sleep", "cancel", "reserve", "prefer", "hurt", "ache",
    ]
    .into_iter()
    .map(|v| (v, ()))
    .collect()
});

/// Irregular inflections mapped to their base form.
static IRREGULAR_VERBS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("ate", "eat"),
        ("eaten", "eat"),
        ("went", "go"),
        ("gone", "go"),
        ("flew", "fly"),
        ("flown", "fly"),
        ("left", "leave"),
        ("saw", "see"),
        ("seen", "see"),
        ("made", "make"),
        ("took", "take"),
        ("taken", "take"),
        ("came", "come"),
        ("got", "get"),
        ("said", "say"),
        ("told", "tell"),
        ("bought", "buy"),
        ("paid", "pay"),
        ("felt", "feel"),
        ("thought", "think"),
        ("knew", "know"),
        ("drank", "drink"),
        ("gave", "give"),
        ("found", "find"),
        ("met", "meet"),
        ("wrote", "write"),
        ("drove", "drive"),
        ("slept", "sleep"),
    ])
});

static ADJECTIVES: Lazy<HashMap<&'static str, ()>> = Lazy::new(|| {
    [
        "good", "bad", "great", "nice", "happy", "sad", "big", "small", "new", "old", "hot", "cold", "tired",
        "hungry", "cheap", "expensive", "early", "late", "long", "short", "sick", "fine", "busy", "free", "next",
        "last",
    ]
    .into_iter()
    .map(|a| (a, ()))
    .collect()
});

const ADJECTIVE_SUFFIXES: &[&str] = &["ful", "ous", "ive", "able", "ible", "less", "ish"];

/// Tag one word and compute its lemma.
///
/// `initial` marks the first token of the utterance, where capitalization
/// says nothing about proper nouns.
pub(super) fn tag(word: &str, initial: bool) -> (PartOfSpeech, String) {
    let lower = word.to_lowercase();

    if !word.chars().any(char::is_alphanumeric) {
        let pos = if word.chars().all(|c| c.is_ascii_punctuation() && !"$%+=<>#&@^~|".contains(c)) {
            PartOfSpeech::Punct
        } else {
            PartOfSpeech::Sym
        };
        return (pos, lower);
    }
    if word.chars().all(|c| c.is_numeric()) {
        return (PartOfSpeech::Num, lower);
    }
    if let Some(pos) = CLOSED_CLASS.get(lower.as_str()) {
        return (*pos, lower);
    }
    if let Some(lemma) = verb_lemma(&lower) {
        return (PartOfSpeech::Verb, lemma);
    }
    let adjective_suffix = ADJECTIVE_SUFFIXES.iter().any(|s| lower.len() > s.len() + 2 && lower.ends_with(s));
    if ADJECTIVES.contains_key(lower.as_str()) || adjective_suffix {
        return (PartOfSpeech::Adj, lower);
    }
    if lower.len() > 4 && lower.ends_with("ly") {
        return (PartOfSpeech::Adv, lower);
    }
    if !initial && word.chars().next().is_some_and(char::is_uppercase) {
        return (PartOfSpeech::Propn, lower);
    }

    let lemma = noun_lemma(&lower);
    (PartOfSpeech::Noun, lemma)
}

/// Base form of `word` if it is a known verb or a regular inflection of one.
fn verb_lemma(word: &str) -> Option<String> {
    if VERBS.contains_key(word) {
        return Some(word.to_string());
    }
    if let Some(base) = IRREGULAR_VERBS.get(word) {
        return Some(base.to_string());
    }

    let mut candidates: Vec<String> = Vec::new();
    if let Some(stem) = word.strip_suffix("ies") {
        candidates.push(format!("{stem}y"));
    }
    if let Some(stem) = word.strip_suffix("es") {
        candidates.push(stem.to_string());
    }
    if let Some(stem) = word.strip_suffix('s') {
        candidates.push(stem.to_string());
    }
    if let Some(stem) = word.strip_suffix("ied") {
        candidates.push(format!("{stem}y"));
    }
    for suffix in ["ing", "ed"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            candidates.push(stem.to_string());
            candidates.push(format!("{stem}e"));
            if let Some(undoubled) = undouble(stem) {
                candidates.push(undoubled);
            }
        }
    }
    if let Some(stem) = word.strip_suffix('d') {
        candidates.push(stem.to_string());
    }

    candidates.into_iter().find(|c| c.len() > 1 && VERBS.contains_key(c.as_str()))
}

/// `stopp` -> `stop`, `travell` -> `travel`.
fn undouble(stem: &str) -> Option<String> {
    let mut chars = stem.chars().rev();
    let (last, prev) = (chars.next()?, chars.next()?);
    (last == prev && !"aeiou".contains(last)).then(|| stem[..stem.len() - last.len_utf8()].to_string())
}

fn noun_lemma(word: &str) -> String {
    if word.len() > 4 {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{stem}y");
        }
    }
    let keeps_s = ["ss", "us", "is"].iter().any(|s| word.ends_with(s));
    match word.strip_suffix('s') {
        Some(stem) if word.len() > 3 && !keeps_s => stem.to_string(),
        _ => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_class_beats_capitalization() {
        assert_eq!(tag("We", false), (PartOfSpeech::Pron, "we".to_string()));
        assert_eq!(tag("Today", true), (PartOfSpeech::Adv, "today".to_string()));
    }

    #[test]
    fn capitalized_unknown_words_are_proper_nouns_except_first() {
        assert_eq!(tag("Sumy", false).0, PartOfSpeech::Propn);
        assert_eq!(tag("Sumy", true).0, PartOfSpeech::Noun);
    }

    #[test]
    fn adjectives_from_lexicon_and_suffix() {
        assert_eq!(tag("happy", false).0, PartOfSpeech::Adj);
        assert_eq!(tag("wonderful", false).0, PartOfSpeech::Adj);
        assert_eq!(tag("quickly", false).0, PartOfSpeech::Adv);
    }

    #[test]
    fn noun_plurals_are_stripped_carefully() {
        assert_eq!(noun_lemma("cities"), "city");
        assert_eq!(noun_lemma("glass"), "glass");
        assert_eq!(noun_lemma("bus"), "bus");
        assert_eq!(noun_lemma("cats"), "cat");
    }

    #[test]
    fn symbols_and_punctuation() {
        assert_eq!(tag("?", false).0, PartOfSpeech::Punct);
        assert_eq!(tag("$", false).0, PartOfSpeech::Sym);
    }
}
