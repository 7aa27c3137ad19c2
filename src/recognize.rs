use std::fmt;

use crate::error::Result;
use crate::grammar::{Alternative, Grammar, Symbol};

/// One production application: `lhs` was rewritten as `rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct DerivationStep {
  pub lhs: Symbol,
  pub rhs: Alternative,
}

impl fmt::Display for DerivationStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} -> {}", self.lhs, self.rhs.join(" "))
  }
}

/// A leftmost derivation: production applications in the order they were
/// expanded, which is a preorder walk of the derivation tree
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation(pub Vec<DerivationStep>);

impl Derivation {
  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn steps(&self) -> impl Iterator<Item = &DerivationStep> {
    self.0.iter()
  }
}

impl Grammar {
  /// Top-down backtracking recognition. Returns the first derivation found,
  /// or `None` if the sentence is not derivable from the start symbol —
  /// failure to parse is a result, not an error.
  ///
  /// The search runs on an explicit LIFO worklist of
  /// `(remaining symbols, input position, trace)` snapshots, so deep
  /// grammars can't overflow the call stack, and the traversal order is
  /// fully deterministic.
  pub fn recognize(&self, sentence: &str) -> Result<Option<Derivation>> {
    self.alternatives(&self.start)?;
    let words: Vec<&str> = sentence.split_whitespace().collect();

    let mut worklist: Vec<(Vec<Symbol>, usize, Vec<DerivationStep>)> =
      vec![(vec![self.start.clone()], 0, Vec::new())];

    while let Some((remaining, pos, trace)) = worklist.pop() {
      if pos == words.len() {
        if remaining.is_empty() {
          tracing::debug!("accepted {:?} after {} expansions", sentence, trace.len());
          return Ok(Some(Derivation(trace)));
        }
        // input exhausted with symbols left to satisfy
        continue;
      }
      if remaining.is_empty() {
        // symbols exhausted with input left over
        continue;
      }

      let head = &remaining[0];
      match self.rules.get(head) {
        None => {
          // terminal: match it against the next word or prune the branch
          if head.as_str() == words[pos] {
            worklist.push((remaining[1..].to_vec(), pos + 1, trace));
          }
        }
        Some(alternatives) => {
          for alt in alternatives {
            let mut expansion = alt.clone();
            expansion.extend(remaining[1..].iter().cloned());
            let mut extended = trace.clone();
            extended.push(DerivationStep {
              lhs: head.clone(),
              rhs: alt.clone(),
            });
            worklist.push((expansion, pos, extended));
          }
        }
      }
    }

    tracing::debug!("exhausted search for {:?}", sentence);
    Ok(None)
  }

  /// Recognizes a batch of sentences, continuing past per-sentence failures
  pub fn recognize_all(&self, sentences: &[&str]) -> Vec<Result<Option<Derivation>>> {
    sentences.iter().map(|s| self.recognize(s)).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn toy() -> Grammar {
    "S -> N V\nN -> cat\nV -> runs".parse().unwrap()
  }

  #[test]
  fn test_accepts_derivable_sentence() {
    let d = toy().recognize("cat runs").unwrap().expect("should parse");
    assert_eq!(d.len(), 3);
    assert_eq!(d.0[0].lhs, "S");
  }

  #[test]
  fn test_rejects_wrong_order() {
    assert!(toy().recognize("runs cat").unwrap().is_none());
  }

  #[test]
  fn test_rejects_short_input() {
    // input runs out while V is still unsatisfied
    assert!(toy().recognize("cat").unwrap().is_none());
  }

  #[test]
  fn test_rejects_long_input() {
    assert!(toy().recognize("cat runs runs").unwrap().is_none());
  }

  #[test]
  fn test_recursive_grammar() {
    let g: Grammar = "S -> a S | a".parse().unwrap();
    assert!(g.recognize("a a a a").unwrap().is_some());
    assert!(g.recognize("a b").unwrap().is_none());
  }

  #[test]
  fn test_deterministic() {
    // ambiguous but not left-recursive, so the search stays finite
    let g: Grammar = "S -> a S | a | a a S".parse().unwrap();
    assert_eq!(g.recognize("a a a").unwrap(), g.recognize("a a a").unwrap());
  }

  #[test]
  fn test_batch_continues_past_failures() {
    let results = toy().recognize_all(&["cat runs", "runs cat", "cat runs"]);
    assert_eq!(results.len(), 3);
    assert!(results[0].as_ref().unwrap().is_some());
    assert!(results[1].as_ref().unwrap().is_none());
    assert!(results[2].as_ref().unwrap().is_some());
  }
}
