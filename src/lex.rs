use std::collections::HashMap;

use tracing::warn;

use crate::grammar::Grammar;

pub const UNKNOWN_TAG: &str = "UNK";

/// Whitespace segmentation with a phrase table for multi-word tokens, so
/// "máy bay" comes out as the single token its entry maps it to. Longer
/// phrases win over shorter ones starting at the same word.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
  phrases: HashMap<String, String>,
  /// longest phrase length in words; bounds the match window
  window: usize,
}

impl Tokenizer {
  pub fn new(phrases: HashMap<String, String>) -> Self {
    let window = phrases
      .keys()
      .map(|phrase| phrase.split_whitespace().count())
      .max()
      .unwrap_or(1);
    Self { phrases, window }
  }

  pub fn tokenize(&self, text: &str) -> Vec<String> {
    let mut text = text.trim().to_string();
    // sentence-final punctuation becomes its own word
    if let Some(last) = text.chars().last() {
      if matches!(last, '.' | '?' | '!') {
        text.pop();
        text.push(' ');
        text.push(last);
      }
    }
    let words: Vec<&str> = text.split_whitespace().collect();

    let mut tokens = Vec::new();
    let mut i = 0;
    while i < words.len() {
      let limit = (i + self.window).min(words.len());
      let matched = (i + 1..=limit).rev().find_map(|j| {
        self
          .phrases
          .get(&words[i..j].join(" "))
          .map(|token| (token.clone(), j))
      });
      match matched {
        Some((token, j)) => {
          tokens.push(token);
          i = j;
        }
        None => {
          tokens.push(words[i].to_string());
          i += 1;
        }
      }
    }
    tokens
  }
}

/// Dictionary part-of-speech tagging with an `UNK` fallback
#[derive(Debug, Clone, Default)]
pub struct PosTagger {
  lexicon: HashMap<String, String>,
}

impl PosTagger {
  pub fn new(lexicon: HashMap<String, String>) -> Self {
    Self { lexicon }
  }

  /// Derives the lexicon from a grammar's preterminal rules: every
  /// single-terminal alternative like `N -> phòng` tags `phòng` as `N`.
  /// The first category declaring a word wins.
  pub fn from_grammar(grammar: &Grammar) -> Self {
    let mut lexicon = HashMap::new();
    for lhs in grammar.nonterminals() {
      for alt in &grammar.rules[lhs] {
        if let [word] = alt.as_slice() {
          if grammar.is_terminal(word) {
            lexicon.entry(word.clone()).or_insert_with(|| lhs.clone());
          }
        }
      }
    }
    Self { lexicon }
  }

  pub fn tag(&self, tokens: &[String]) -> Vec<String> {
    tokens
      .iter()
      .map(|token| match self.lexicon.get(token) {
        Some(tag) => tag.clone(),
        None => {
          warn!("unknown token {:?}", token);
          UNKNOWN_TAG.to_string()
        }
      })
      .collect()
  }
}
