use rand::prelude::*;

use crate::error::Result;
use crate::grammar::{Grammar, Symbol};

/// A partial derivation: the symbols still to rewrite, and the words
/// already emitted to their left
type Branch = (Vec<Symbol>, Vec<Symbol>);

impl Grammar {
  /// Samples up to `max_samples` sentences of at most `max_length` words
  /// from the grammar, using the thread-local rng.
  pub fn generate(&self, max_length: usize, max_samples: usize) -> Result<Vec<String>> {
    self.generate_with_rng(max_length, max_samples, &mut thread_rng())
  }

  /// Like `generate`, but with a caller-supplied rng so sampling can be
  /// reproduced from a seed.
  ///
  /// Keeps a worklist of partial derivations and expands a uniformly-random
  /// one each step; picking randomly instead of LIFO is what spreads the
  /// samples over different branches of the grammar instead of draining one
  /// recursive branch forever.
  pub fn generate_with_rng<R: Rng>(
    &self,
    max_length: usize,
    max_samples: usize,
    rng: &mut R,
  ) -> Result<Vec<String>> {
    // fail up front if the start symbol has no productions
    self.alternatives(&self.start)?;

    let mut samples = Vec::new();
    let mut worklist: Vec<Branch> = vec![(vec![self.start.clone()], Vec::new())];

    while !worklist.is_empty() && samples.len() < max_samples {
      let idx = rng.gen_range(0..worklist.len());
      let (mut remaining, mut emitted) = worklist.swap_remove(idx);

      if remaining.is_empty() {
        if emitted.len() <= max_length {
          tracing::debug!("sample: {}", emitted.join(" "));
          samples.push(emitted.join(" "));
        }
        continue;
      }

      // the length bound is the only termination guarantee on a recursive
      // grammar, and must be applied before expanding
      if emitted.len() > max_length {
        continue;
      }

      let head = remaining.remove(0);
      match self.rules.get(&head) {
        None => {
          // terminal: it becomes the next word of this branch
          emitted.push(head);
          worklist.push((remaining, emitted));
        }
        Some(alternatives) => {
          for alt in alternatives {
            let mut expansion = alt.clone();
            expansion.extend(remaining.iter().cloned());
            worklist.push((expansion, emitted.clone()));
          }
        }
      }
    }

    Ok(samples)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::Error;
  use rand::prelude::*;

  fn seeded() -> StdRng {
    StdRng::seed_from_u64(0x5eed)
  }

  #[test]
  fn test_bounds_hold_on_recursive_grammar() {
    let g: Grammar = "S -> a S | a".parse().unwrap();
    let samples = g.generate_with_rng(5, 20, &mut seeded()).unwrap();

    assert!(!samples.is_empty());
    assert!(samples.len() <= 20);
    for s in &samples {
      assert!(s.split_whitespace().count() <= 5, "too long: {:?}", s);
    }
  }

  #[test]
  fn test_finite_grammar_is_exhausted() {
    let g: Grammar = "S -> N V\nN -> cat | dog\nV -> runs | sleeps".parse().unwrap();
    let mut samples = g.generate_with_rng(10, 100, &mut seeded()).unwrap();
    samples.sort();
    samples.dedup();

    // 2 nouns x 2 verbs, and the worklist empties instead of spinning
    assert_eq!(samples.len(), 4);
  }

  #[test]
  fn test_missing_start_rule() {
    let g = Grammar::new("S".to_string(), Vec::new());
    assert!(matches!(
      g.generate_with_rng(5, 5, &mut seeded()),
      Err(Error::UndefinedProduction { .. })
    ));
  }
}
