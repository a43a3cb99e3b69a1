//! Multilingual heading keyword lexicon.
//!
//! A read-only table from ISO 639-1 language code to lowercase keywords
//! that commonly start or name a section. Matching is a substring test on
//! the lowercased line, so "Introduction to Graphs" hits `introduction`.

/// Language used when a requested code has no keyword list.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Keyword lists, one entry per language.
pub static HEADING_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "en",
        &[
            "chapter",
            "section",
            "contents",
            "introduction",
            "program",
            "aim",
            "algorithm",
            "code",
            "result",
            "output",
            "procedure",
        ],
    ),
    (
        "hi",
        &["अध्याय", "अनुच्छेद", "परिचय", "कार्यक्रम", "लक्ष्य", "प्रक्रिया", "परिणाम"],
    ),
    (
        "ta",
        &[
            "அத்தியாயம்",
            "பிரிவு",
            "அறிமுகம்",
            "நிரல்",
            "நோக்கம்",
            "செயல்முறை",
            "விளைவுகள்",
        ],
    ),
    (
        "bn",
        &["অধ্যায়", "অনুচ্ছেদ", "ভূমিকা", "প্রোগ্রাম", "উদ্দেশ্য", "পদ্ধতি", "ফলাফল"],
    ),
    (
        "te",
        &["అధ్యాయం", "విభాగం", "పరిచయం", "ప్రోగ్రాం", "లక్ష్యం", "విధానం", "ఫలితాలు"],
    ),
    (
        "gu",
        &["અધ્યાય", "વિભાગ", "પરિચય", "પ્રોગ્રામ", "હેતુ", "પ્રક્રિયા", "પરિણામ"],
    ),
    (
        "mr",
        &["अध्याय", "परिच्छेद", "परिचय", "कार्यक्रम", "उद्दिष्ट", "प्रक्रिया", "निकाल"],
    ),
    (
        "ur",
        &["باب", "دفعہ", "تعارف", "پروگرام", "مقصد", "طریقہ", "نتیجہ"],
    ),
    (
        "pa",
        &["ਅਧਿਆਇ", "ਧਾਰਾ", "ਭੂਮਿਕਾ", "ਕਾਰਜਕ੍ਰਮ", "ਉਦੇਸ਼", "ਕਾਰਜਵਿਧੀ", "ਨਤੀਜਾ"],
    ),
    ("ja", &["章", "節", "紹介", "プログラム", "目的", "手順", "結果"]),
    (
        "zh",
        &["章节", "部分", "介绍", "程序", "目标", "过程", "结果", "实验", "小结"],
    ),
    ("ko", &["장", "절", "소개", "프로그램", "목표", "절차", "결과"]),
    (
        "es",
        &[
            "capítulo",
            "sección",
            "introducción",
            "programa",
            "objetivo",
            "procedimiento",
            "resultado",
        ],
    ),
    (
        "fr",
        &[
            "chapitre",
            "section",
            "introduction",
            "programme",
            "objectif",
            "procédure",
            "résultat",
        ],
    ),
    (
        "de",
        &[
            "kapitel",
            "abschnitt",
            "einleitung",
            "programm",
            "ziel",
            "vorgehen",
            "ergebnis",
        ],
    ),
    (
        "it",
        &[
            "capitolo",
            "sezione",
            "introduzione",
            "programma",
            "obiettivo",
            "procedura",
            "risultato",
        ],
    ),
    (
        "pt",
        &[
            "capítulo",
            "seção",
            "introdução",
            "programa",
            "objetivo",
            "procedimento",
            "resultado",
        ],
    ),
];

/// Which keyword lists a classifier consults.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LanguageFilter {
    /// Every language in the lexicon
    #[default]
    All,
    /// A single language; unknown codes fall back to English
    Only(String),
}

/// Keyword list of one language, if present.
pub fn keywords_for(language: &str) -> Option<&'static [&'static str]> {
    HEADING_KEYWORDS
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(language))
        .map(|(_, words)| *words)
}

/// Languages with a keyword list.
pub fn languages() -> impl Iterator<Item = &'static str> {
    HEADING_KEYWORDS.iter().map(|(code, _)| *code)
}

/// Check whether `text` contains a heading keyword.
pub fn contains_keyword(text: &str, filter: &LanguageFilter) -> bool {
    let lowered = text.to_lowercase();
    match filter {
        LanguageFilter::All => HEADING_KEYWORDS
            .iter()
            .any(|(_, words)| words.iter().any(|w| lowered.contains(w))),
        LanguageFilter::Only(code) => keywords_for(code)
            .or_else(|| keywords_for(FALLBACK_LANGUAGE))
            .unwrap_or(&[])
            .iter()
            .any(|w| lowered.contains(w)),
    }
}
