use std::collections::VecDeque;

use tracing::{trace, warn};

use crate::dep::{Dependency, Item};
use crate::error::{Error, Result};
use crate::lex::{PosTagger, Tokenizer};
use crate::transition::{Features, Transition, TransitionPolicy};

pub const ROOT_LABEL: &str = "root";

/// What one shift-reduce run produces: the arcs in creation order, plus the
/// final stack and buffer for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
  pub arcs: Vec<Dependency>,
  pub stack: Vec<Item>,
  pub buffer: Vec<Item>,
}

impl ParseOutcome {
  pub fn root(&self) -> Option<&Dependency> {
    self.arcs.iter().find(|dep| dep.label == ROOT_LABEL)
  }

  /// Stack residue that never became the tail of any arc. Items attached by
  /// a right arc legitimately end their life on the stack; anything else
  /// here means the policy walked away from part of the sentence.
  pub fn unattached(&self) -> Vec<&Item> {
    self
      .stack
      .iter()
      .filter(|item| !self.arcs.iter().any(|dep| dep.tail.index == item.index))
      .collect()
  }
}

struct ParserState {
  stack: Vec<Item>,
  buffer: VecDeque<Item>,
  arcs: Vec<Dependency>,
}

impl ParserState {
  fn new(words: &[&str], tags: &[&str]) -> Self {
    assert_eq!(words.len(), tags.len(), "words and tags must align");

    // the sentinel guarantees a non-empty buffer at step one and gives the
    // policy a recognizable start-of-sentence signal; real tokens get
    // indices 1..=n so every index in play is unique
    let mut buffer = VecDeque::with_capacity(words.len() + 1);
    buffer.push_back(Item::root());
    for (idx, (word, tag)) in words.iter().zip(tags.iter()).enumerate() {
      buffer.push_back(Item::new(idx + 1, word, tag));
    }

    Self {
      stack: Vec::new(),
      buffer,
      arcs: Vec::new(),
    }
  }

  fn features(&self) -> Features<'_> {
    Features {
      stack_top: self.stack.last(),
      buffer_front: self.buffer.front().expect("features of an empty buffer"),
      verb_below: self.stack.len() > 1
        && self.stack[..self.stack.len() - 1]
          .iter()
          .any(|item| item.tag == "V"),
    }
  }

  /// Applies one transition. Returns false, changing nothing, if the
  /// transition's precondition does not hold in this state.
  fn apply(&mut self, transition: &Transition) -> bool {
    match transition {
      Transition::Shift => {
        let Some(item) = self.buffer.pop_front() else {
          return false;
        };
        self.stack.push(item);
      }
      Transition::LeftArc(label) => {
        let Some(head) = self.buffer.front().cloned() else {
          return false;
        };
        let Some(tail) = self.stack.pop() else {
          return false;
        };
        self.arcs.push(Dependency {
          head,
          tail,
          label: label.clone(),
        });
      }
      Transition::RightArc(label) => {
        let Some(head) = self.stack.last().cloned() else {
          return false;
        };
        let Some(tail) = self.buffer.pop_front() else {
          return false;
        };
        self.arcs.push(Dependency {
          head,
          tail: tail.clone(),
          label: label.clone(),
        });
        self.stack.push(tail);
      }
      Transition::Reduce => {
        if self.stack.pop().is_none() {
          return false;
        }
      }
    }
    true
  }

  /// The forced final step once the buffer empties: the two oldest stack
  /// items are the sentinel and the surviving head, and they form the root
  /// arc.
  fn attach_root(&mut self) {
    if self.stack.len() < 2 {
      warn!("nothing left to attach a root arc to");
      return;
    }
    let head = self.stack.remove(0);
    let tail = self.stack.remove(0);
    self.arcs.push(Dependency {
      head,
      tail,
      label: ROOT_LABEL.to_string(),
    });
  }

  fn indices_unique(&self) -> bool {
    let mut seen = std::collections::HashSet::new();
    self
      .stack
      .iter()
      .chain(self.buffer.iter())
      .all(|item| seen.insert(item.index))
  }
}

/// Runs the shift-reduce machine over a tagged token sequence under the
/// given policy. The policy is consulted once per step until the buffer
/// empties, then the root arc is forced.
///
/// A transition whose precondition fails degrades to a no-op rather than
/// crashing, but since a pure policy will answer the same way again on the
/// unchanged state, a second consecutive no-op aborts as `ParserStalled`.
pub fn parse<P: TransitionPolicy>(words: &[&str], tags: &[&str], policy: &P) -> Result<ParseOutcome> {
  let mut state = ParserState::new(words, tags);
  let mut stalled = false;

  while !state.buffer.is_empty() {
    let transition = policy.decide(&state.features())?;
    let applied = state.apply(&transition);
    trace!(
      "{:<16} stack={:?} buffer={:?}",
      transition.to_string(),
      Item::words(state.stack.as_slice()),
      Item::words(state.buffer.make_contiguous()),
    );
    debug_assert!(state.indices_unique(), "duplicate index in stack/buffer");

    if applied {
      stalled = false;
    } else {
      warn!("transition {} has no effect in this state", transition);
      if stalled {
        return Err(Error::ParserStalled {
          transition: transition.to_string(),
        });
      }
      stalled = true;
    }
  }

  state.attach_root();

  let outcome = ParseOutcome {
    arcs: state.arcs,
    stack: state.stack,
    buffer: state.buffer.into_iter().collect(),
  };

  let dangling = outcome
    .unattached()
    .iter()
    .map(|item| item.word.clone())
    .collect::<Vec<_>>();
  if !dangling.is_empty() {
    warn!("unbalanced stack: no head for {}", dangling.join(", "));
  }

  Ok(outcome)
}

/// The full pipeline the grammar front end consumes: segmentation, tagging
/// and shift-reduce parsing bundled behind one call.
pub struct DependencyParser<P> {
  pub tokenizer: Tokenizer,
  pub tagger: PosTagger,
  pub policy: P,
}

impl<P: TransitionPolicy> DependencyParser<P> {
  pub fn new(tokenizer: Tokenizer, tagger: PosTagger, policy: P) -> Self {
    Self {
      tokenizer,
      tagger,
      policy,
    }
  }

  pub fn parse(&self, sentence: &str) -> Result<ParseOutcome> {
    let tokens = self.tokenizer.tokenize(sentence);
    let tags = self.tagger.tag(&tokens);

    let words: Vec<&str> = tokens.iter().map(String::as_str).collect();
    let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
    parse(&words, &tags, &self.policy)
  }

  /// Parses a batch, continuing past per-sentence failures
  pub fn parse_all(&self, sentences: &[&str]) -> Vec<Result<ParseOutcome>> {
    sentences.iter().map(|s| self.parse(s)).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_always_shift_leaves_only_a_root_arc() {
    let outcome = parse(
      &["anh", "đi", "Đà_Nẵng"],
      &["PRO", "V", "N-LOC"],
      &|_: &Features| Transition::Shift,
    )
    .unwrap();

    assert_eq!(outcome.arcs.len(), 1);
    let root = outcome.root().unwrap();
    assert_eq!(root.head.word, "ROOT");
    assert_eq!(root.tail.word, "anh");
    // đi and Đà_Nẵng were shifted and never attached
    assert_eq!(Item::words(&outcome.stack), vec!["đi", "Đà_Nẵng"]);
    assert_eq!(outcome.unattached().len(), 2);
  }

  #[test]
  fn test_impossible_transition_stalls() {
    // reduce can never fire on an empty stack, and a pure policy will keep
    // asking for it
    let err = parse(&["anh"], &["PRO"], &|_: &Features| Transition::Reduce).unwrap_err();
    assert!(matches!(err, Error::ParserStalled { .. }));
  }

  #[test]
  fn test_root_indices_are_unique() {
    let outcome = parse(&["a", "b"], &["X", "X"], &|_: &Features| Transition::Shift).unwrap();
    let root = outcome.root().unwrap();
    assert_eq!(root.head.index, 0);
    assert_eq!(root.tail.index, 1);
  }

  #[test]
  #[should_panic(expected = "words and tags must align")]
  fn test_mismatched_tags_panic() {
    let _ = parse(&["a", "b"], &["X"], &|_: &Features| Transition::Shift);
  }
}
