use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").expect("valid regex");
    static ref WHITESPACE_RE: Regex = Regex::new(r"[ \t\n\x0B\x0C\r]+").expect("valid regex");
    static ref ASCII_WORD_RE: Regex = Regex::new(r"[a-zA-Z]+[0-9]*|[0-9]+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<String> = {
        let english: &[&str] = &[
            "a","an","and","are","as","at","be","by","for","from",
            "has","he","in","is","it","its","of","on","that","the",
            "to","was","will","with","this","but","they","have",
            "had","what","said","each","which","she","do","how","their",
            "if","up","out","many","then","them","these","so","some",
            "her","would","make","like","into","him","time","two","more",
            "go","no","way","could","my","than","first","been","call",
            "who","oil","sit","now","find","down","day","did","get",
            "come","made","may","part",
        ];
        let chinese: &[&str] = &[
            "的","了","在","是","我","有","和","就","不","人",
            "都","一","一个","上","也","很","到","说","要",
            "去","你","会","着","没有","看","好","自己","这",
            "那","里","就是","还","把","比","或者","什么",
            "可以","为","但是","这个","中","来","用","他",
            "她","我们","能","下","子","对","吧","而","被",
            "最","该","些","又","家","可","以","如果","没",
            "多","然后","怎么","出","呢","与","其","给","从",
            "时","每","个","现在","让","因为","当","同",
            "回","过","只","想","实际","后","做","点","起",
            "三","于","关于",
        ];
        let mut set: HashSet<String> = english.iter().chain(chinese).map(|w| w.to_string()).collect();
        set.extend(('0'..='9').map(String::from));
        set.extend(('a'..='z').map(String::from));
        set
    };
}

/// Optional stage applied to ASCII tokens after stop-word removal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stemming {
    #[default]
    None,
    /// Strip one of `ing`, `ed`, `er`, `ly` from words longer than four bytes.
    Suffix,
    /// English Porter2 stemmer.
    Snowball,
}

#[inline]
fn is_c_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Strip markup and punctuation, keep ASCII alphanumerics, `-`, `_` and every
/// non-ASCII character, then collapse whitespace.
pub fn preprocess(text: &str) -> String {
    let without_tags = TAG_RE.replace_all(text, " ");
    let cleaned: String = without_tags
        .chars()
        .map(|c| {
            if !c.is_ascii() || c.is_ascii_alphanumeric() || is_c_space(c) || c == '-' || c == '_' {
                c
            } else {
                ' '
            }
        })
        .collect();
    WHITESPACE_RE
        .replace_all(&cleaned, " ")
        .trim_matches(is_c_space)
        .to_string()
}

/// Split preprocessed text into ASCII words followed by overlapping 1- to
/// 4-character n-grams of every run of 3-byte (CJK range) characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = ASCII_WORD_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|w| w.len() >= 2)
        .map(|w| w.to_ascii_lowercase())
        .collect();

    let wide: Vec<char> = text.chars().filter(|c| c.len_utf8() == 3).collect();
    for i in 0..wide.len() {
        for n in 1..=4 {
            if i + n > wide.len() {
                break;
            }
            tokens.push(wide[i..i + n].iter().collect());
        }
    }
    tokens
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Naive English suffix stripping.
pub fn stem_word(word: &str) -> String {
    if word.len() > 4 {
        for suffix in ["ing", "ed", "er", "ly"] {
            if let Some(stem) = word.strip_suffix(suffix) {
                return stem.to_string();
            }
        }
    }
    word.to_string()
}

/// The full text pipeline: `preprocess -> tokenize -> remove_stop_words`,
/// followed by the optional stemming stage.
#[derive(Debug, Clone, Default)]
pub struct TextPipeline {
    extra_stop_words: HashSet<String>,
    stemming: Stemming,
    fold_compatibility: bool,
}

impl TextPipeline {
    pub fn new() -> Self { Self::default() }

    pub fn with_stemming(mut self, stemming: Stemming) -> Self {
        self.stemming = stemming;
        self
    }

    /// Apply NFKC before preprocessing so full-width Latin folds to ASCII.
    pub fn with_compatibility_folding(mut self, enabled: bool) -> Self {
        self.fold_compatibility = enabled;
        self
    }

    /// Extend the stop-word set from newline separated words.
    pub fn load_stop_words(&mut self, list: &str) {
        let before = self.extra_stop_words.len();
        self.extra_stop_words.extend(
            list.lines()
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(str::to_lowercase),
        );
        tracing::debug!(added = self.extra_stop_words.len() - before, "loaded stop words");
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        is_stopword(token) || self.extra_stop_words.contains(token)
    }

    pub fn remove_stop_words(&self, tokens: Vec<String>) -> Vec<String> {
        tokens.into_iter().filter(|t| !self.is_stop_word(t)).collect()
    }

    pub fn analyze(&self, text: &str) -> Vec<String> {
        let processed = if self.fold_compatibility {
            preprocess(&text.nfkc().collect::<String>())
        } else {
            preprocess(text)
        };
        let tokens = self.remove_stop_words(tokenize(&processed));
        match self.stemming {
            Stemming::None => tokens,
            Stemming::Suffix => tokens
                .into_iter()
                .map(|t| if t.is_ascii() { stem_word(&t) } else { t })
                .collect(),
            Stemming::Snowball => tokens
                .into_iter()
                .map(|t| if t.is_ascii() { STEMMER.stem(&t).into_owned() } else { t })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preprocess_strips_tags_and_punctuation() {
        assert_eq!(preprocess("<p>Hello,   world!</p>"), "Hello world");
        assert_eq!(preprocess("  snake_case-word  "), "snake_case-word");
        assert_eq!(preprocess("中文，标点。"), "中文，标点。");
    }

    #[test]
    fn ascii_tokens_are_lowercased_and_filtered() {
        let t = tokenize("Rust2021 a 42 x9 B");
        assert_eq!(t, vec!["rust2021", "42", "x9"]);
    }

    #[test]
    fn cjk_ngrams() {
        let t = tokenize("搜索引擎");
        assert_eq!(
            t,
            vec!["搜", "搜索", "搜索引", "搜索引擎", "索", "索引", "索引擎", "引", "引擎", "擎"]
        );
    }

    #[test]
    fn four_byte_chars_are_skipped() {
        assert_eq!(tokenize("🦀"), Vec::<String>::new());
    }

    #[test]
    fn suffix_stemmer() {
        assert_eq!(stem_word("running"), "runn");
        assert_eq!(stem_word("jumped"), "jump");
        assert_eq!(stem_word("ring"), "ring");
    }

    #[test]
    fn extra_stop_words() {
        let mut p = TextPipeline::new();
        p.load_stop_words("Rust\n\n  engine \n");
        assert!(p.analyze("rust engine index").iter().all(|t| t == "index"));
    }
}
