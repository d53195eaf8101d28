/// Compile a regex literal once and hand out a `&'static Regex`.
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build a `Vec<Token>` from `text/TAG` pairs, lemma = lowercased text.
///
/// ```ignore
/// let tokens = tokens!["I"/Pron, "am"/Aux, "at"/Adp, "Sumy"/Propn];
/// ```
#[cfg(test)]
macro_rules! tokens {
    ($($text:literal / $pos:ident),* $(,)?) => {
        vec![ $($crate::Token::new($text, $crate::PartOfSpeech::$pos, $text.to_lowercase())),* ]
    };
}
