use search_core::tokenizer::{preprocess, tokenize, Stemming, TextPipeline};

fn analyze(text: &str) -> Vec<String> {
    TextPipeline::new().analyze(text)
}

#[test]
fn it_strips_markup_and_lowercases() {
    let words = analyze("<h1>Rust</h1> <b>Search</b> ENGINE!");
    assert_eq!(words, vec!["rust", "search", "engine"]);
}

#[test]
fn it_filters_stopwords() {
    let words = analyze("The quick brown fox and the lazy dog 7 x");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert!(!words.contains(&"7".to_string()));
    assert!(words.contains(&"quick".to_string()));
}

#[test]
fn it_filters_chinese_function_words() {
    let words = analyze("我的");
    // "我" and "的" are stop words, the bigram is not
    assert_eq!(words, vec!["我的"]);
}

#[test]
fn it_indexes_mixed_script_text() {
    let words = analyze("Rust语言");
    assert!(words.contains(&"rust".to_string()));
    assert!(words.contains(&"语言".to_string()));
    assert!(words.contains(&"语".to_string()));
}

#[test]
fn order_matters_tags_removed_before_tokenizing() {
    // attribute text inside a tag never reaches the tokenizer
    let words = analyze(r#"<a href="hidden">visible</a>"#);
    assert_eq!(words, vec!["visible"]);
}

#[test]
fn digits_follow_letters_in_one_token() {
    assert_eq!(tokenize(&preprocess("utf8 x86_64 2024")), vec!["utf8", "x86", "64", "2024"]);
}

#[test]
fn compatibility_folding_maps_fullwidth_latin() {
    let folded = TextPipeline::new().with_compatibility_folding(true).analyze("ＲＵＳＴ");
    assert_eq!(folded, vec!["rust"]);
    // without folding the full-width letters are 3-byte characters
    assert!(analyze("ＲＵＳＴ").contains(&"ＲＵＳＴ".to_string()));
}

#[test]
fn snowball_stemming_is_opt_in() {
    let stemmed = TextPipeline::new().with_stemming(Stemming::Snowball).analyze("running runners");
    assert!(stemmed.contains(&"run".to_string()));
    assert_eq!(analyze("running"), vec!["running"]);
}
