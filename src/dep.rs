use std::fmt;

/// One input token as the parser sees it: its position in the sentence, the
/// surface word and its part-of-speech tag. Items are value objects; they
/// are cloned between stack, buffer and arcs and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
  pub index: usize,
  pub word: String,
  pub tag: String,
}

impl Item {
  pub fn new(index: usize, word: &str, tag: &str) -> Self {
    Self {
      index,
      word: word.to_string(),
      tag: tag.to_string(),
    }
  }

  /// The synthetic sentinel seeded ahead of all real tokens
  pub fn root() -> Self {
    Self::new(0, "ROOT", "ROOT")
  }

  pub fn words(items: &[Item]) -> Vec<&str> {
    items.iter().map(|item| item.word.as_str()).collect()
  }
}

impl fmt::Display for Item {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({})", self.word, self.tag)
  }
}

/// A directed labeled edge from a syntactic head to its dependent
#[derive(Debug, Clone, PartialEq)]
pub struct Dependency {
  pub head: Item,
  pub tail: Item,
  pub label: String,
}

impl fmt::Display for Dependency {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} --({})-> {}", self.head.word, self.label, self.tail.word)
  }
}

#[test]
fn test_display_forms() {
  let head = Item::new(2, "đi", "V");
  let tail = Item::new(1, "anh", "PRO");
  assert_eq!(head.to_string(), "đi (V)");

  let dep = Dependency {
    head,
    tail,
    label: "nsubj".to_string(),
  };
  assert_eq!(dep.to_string(), "đi --(nsubj)-> anh");
}
