use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

/// helper macro for initializing a regex with lazy_static!
macro_rules! regex_static {
  ($name:ident, $pattern:expr) => {
    lazy_static! {
      static ref $name: Regex = Regex::new($pattern).unwrap();
    }
  };
}

/// Grammar symbols are plain strings. Whether a symbol is a terminal is a
/// property of the rule table, not of the symbol itself: anything that has
/// productions is a nonterminal, everything else matches input words
/// literally.
pub type Symbol = String;

/// One way of rewriting a nonterminal: an ordered sequence of symbols
pub type Alternative = Vec<Symbol>;

#[derive(Debug, Clone, PartialEq)]
pub struct Grammar {
  pub start: Symbol,
  pub rules: HashMap<Symbol, Vec<Alternative>>,
  /// Left-hand sides in declaration order, so Display is deterministic and
  /// leads with the start rule
  order: Vec<Symbol>,
}

impl Grammar {
  pub fn new(start: Symbol, ruleset: Vec<(Symbol, Vec<Alternative>)>) -> Self {
    let mut rules = HashMap::new();
    let mut order = Vec::new();
    for (lhs, alternatives) in ruleset {
      if rules.insert(lhs.clone(), alternatives).is_none() {
        order.push(lhs);
      }
    }
    Self { start, rules, order }
  }

  pub fn is_terminal(&self, symbol: &str) -> bool {
    !self.rules.contains_key(symbol)
  }

  /// Nonterminals in declaration order
  pub fn nonterminals(&self) -> &[Symbol] {
    &self.order
  }

  /// The alternatives for a symbol the caller expects to be a nonterminal
  pub fn alternatives(&self, symbol: &str) -> Result<&[Alternative]> {
    self
      .rules
      .get(symbol)
      .map(Vec::as_slice)
      .ok_or_else(|| Error::UndefinedProduction {
        symbol: symbol.to_string(),
      })
  }

  pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    fs::read_to_string(path)?.parse()
  }

  pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
    fs::write(path, format!("{}\n", self))?;
    Ok(())
  }
}

impl FromStr for Grammar {
  type Err = Error;

  /// Parses the line-oriented `LHS -> a b | c d` format. The first rule's
  /// symbol becomes the start symbol. Re-declaring an LHS replaces its
  /// earlier alternatives, so each nonterminal should appear on one line
  /// with all of its alternatives pipe-separated.
  fn from_str(s: &str) -> Result<Self> {
    regex_static!(RULE, r"^\s*(\S+)\s*->\s*(.*?)\s*$");

    let mut start: Option<Symbol> = None;
    let mut ruleset: Vec<(Symbol, Vec<Alternative>)> = Vec::new();

    for (line_no, line) in s.trim().lines().enumerate() {
      let caps = RULE.captures(line).ok_or_else(|| Error::MalformedGrammar {
        line_no: line_no + 1,
        line: line.to_string(),
      })?;

      let lhs = caps[1].to_string();
      let alternatives = caps[2]
        .split('|')
        .map(|alt| alt.split_whitespace().map(str::to_string).collect())
        .collect();

      if start.is_none() {
        start = Some(lhs.clone());
      }
      // a later line with the same lhs overwrites inside Grammar::new
      ruleset.push((lhs, alternatives));
    }

    match start {
      Some(start) => Ok(Self::new(start, ruleset)),
      None => Err(Error::MalformedGrammar {
        line_no: 1,
        line: String::new(),
      }),
    }
  }
}

impl fmt::Display for Grammar {
  /// The exact inverse of `FromStr`: symbols space-joined, alternatives
  /// pipe-joined, rules newline-joined
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (idx, lhs) in self.order.iter().enumerate() {
      if idx > 0 {
        writeln!(f)?;
      }
      let rhs = self.rules[lhs]
        .iter()
        .map(|alt| alt.join(" "))
        .collect::<Vec<_>>()
        .join(" | ");
      write!(f, "{} -> {}", lhs, rhs)?;
    }
    Ok(())
  }
}

#[test]
fn test_roundtrip() {
  let src = "S -> N V\nN -> cat | dog\nV -> runs";
  let g: Grammar = src.parse().unwrap();

  assert_eq!(g.start, "S");
  assert_eq!(g.to_string(), src);
  assert_eq!(g.to_string().parse::<Grammar>().unwrap(), g);
}

#[test]
fn test_terminal_status_is_table_membership() {
  let g: Grammar = "S -> N V\nN -> cat".parse().unwrap();

  assert!(!g.is_terminal("S"));
  assert!(!g.is_terminal("N"));
  // V has no productions, so it is a terminal even though it looks like a
  // category name
  assert!(g.is_terminal("V"));
  assert!(g.is_terminal("cat"));
}

#[test]
fn test_malformed_line() {
  let err = "S -> N V\nN cat dog".parse::<Grammar>().unwrap_err();
  match err {
    Error::MalformedGrammar { line_no, .. } => assert_eq!(line_no, 2),
    other => panic!("expected MalformedGrammar, got {:?}", other),
  }
}

#[test]
fn test_redeclaration_overwrites() {
  let g: Grammar = "S -> a\nS -> b | c".parse().unwrap();
  assert_eq!(
    g.rules["S"],
    vec![vec!["b".to_string()], vec!["c".to_string()]]
  );
  // still a single line in the serialized form
  assert_eq!(g.to_string(), "S -> b | c");
}

#[test]
fn test_undefined_production() {
  let g = Grammar::new("S".to_string(), Vec::new());
  assert!(matches!(
    g.alternatives("S"),
    Err(Error::UndefinedProduction { .. })
  ));
}
