use tracing::trace;

use crate::error::Result;
use crate::transition::{Features, Transition, TransitionPolicy};

/// One named heuristic: when `applies` matches the features, take `action`
pub struct Heuristic {
  pub name: &'static str,
  pub applies: fn(&Features) -> bool,
  pub action: Transition,
}

/// An ordered cascade of heuristics; the first match wins and `SHIFT` is
/// the fallback. Keeping every special case in this flat list keeps the
/// exceptions auditable instead of buried in control flow.
pub struct RulePolicy {
  rules: Vec<Heuristic>,
}

impl RulePolicy {
  pub fn new(rules: Vec<Heuristic>) -> Self {
    Self { rules }
  }

  /// The rule names in evaluation order
  pub fn describe(&self) -> Vec<&'static str> {
    self.rules.iter().map(|rule| rule.name).collect()
  }
}

impl TransitionPolicy for RulePolicy {
  fn decide(&self, features: &Features) -> Result<Transition> {
    for rule in &self.rules {
      if (rule.applies)(features) {
        trace!("rule {:?} -> {}", rule.name, rule.action);
        return Ok(rule.action.clone());
      }
    }
    Ok(Transition::Shift)
  }
}

/// The trivial policy: push everything, attach nothing
pub struct AlwaysShift;

impl TransitionPolicy for AlwaysShift {
  fn decide(&self, _features: &Features) -> Result<Transition> {
    Ok(Transition::Shift)
  }
}

fn stack_tag_in(features: &Features, tags: &[&str]) -> bool {
  features.stack_tag().is_some_and(|tag| tags.contains(&tag))
}

fn left(label: &str) -> Transition {
  Transition::LeftArc(label.to_string())
}

fn right(label: &str) -> Transition {
  Transition::RightArc(label.to_string())
}

impl RulePolicy {
  /// The hand-written cascade for the Vietnamese tourism domain, over the
  /// tagset `PRO N N-LOC V ADJ P NUM QUANT DEMON ADV_AHEAD ADV_ATAIL
  /// ADV_VHEAD ADV_VTAIL`. Nominals before a verb become its subject,
  /// nominals after it its object or locative oblique; modifiers attach to
  /// the nearest plausible head on either side.
  pub fn vietnamese() -> Self {
    Self::new(vec![
      Heuristic {
        name: "shift-onto-empty-stack",
        applies: |f| f.stack_top.is_none(),
        action: Transition::Shift,
      },
      Heuristic {
        name: "subject-of-verb",
        applies: |f| {
          stack_tag_in(f, &["PRO", "N", "N-LOC"]) && f.buffer_tag() == "V" && !f.verb_below
        },
        action: left("nsubj"),
      },
      Heuristic {
        name: "pronoun-subject-of-adjective",
        applies: |f| stack_tag_in(f, &["PRO"]) && f.buffer_tag() == "ADJ",
        action: left("nsubj"),
      },
      Heuristic {
        name: "adverb-before-verb",
        applies: |f| stack_tag_in(f, &["ADV_VHEAD"]) && f.buffer_tag() == "V",
        action: left("advmod"),
      },
      Heuristic {
        name: "adverb-before-adjective",
        applies: |f| stack_tag_in(f, &["ADV_AHEAD"]) && f.buffer_tag() == "ADJ",
        action: left("advmod"),
      },
      Heuristic {
        name: "numeral-before-noun",
        applies: |f| stack_tag_in(f, &["NUM"]) && matches!(f.buffer_tag(), "N" | "N-LOC"),
        action: left("nummod"),
      },
      Heuristic {
        name: "quantifier-before-noun",
        applies: |f| stack_tag_in(f, &["QUANT"]) && matches!(f.buffer_tag(), "N" | "N-LOC"),
        action: left("det"),
      },
      Heuristic {
        name: "case-marker",
        applies: |f| stack_tag_in(f, &["P"]) && matches!(f.buffer_tag(), "N" | "N-LOC" | "PRO"),
        action: left("case"),
      },
      Heuristic {
        name: "shift-over-root",
        applies: |f| stack_tag_in(f, &["ROOT"]),
        action: Transition::Shift,
      },
      Heuristic {
        name: "object",
        applies: |f| stack_tag_in(f, &["V"]) && matches!(f.buffer_tag(), "N" | "PRO"),
        action: right("obj"),
      },
      Heuristic {
        name: "locative-oblique",
        applies: |f| stack_tag_in(f, &["V"]) && f.buffer_tag() == "N-LOC",
        action: right("obl"),
      },
      Heuristic {
        name: "adverb-after-verb",
        applies: |f| stack_tag_in(f, &["V"]) && f.buffer_tag() == "ADV_VTAIL",
        action: right("advmod"),
      },
      Heuristic {
        name: "adjective-after-noun",
        applies: |f| stack_tag_in(f, &["N", "N-LOC"]) && f.buffer_tag() == "ADJ",
        action: right("amod"),
      },
      Heuristic {
        name: "demonstrative",
        applies: |f| stack_tag_in(f, &["N", "N-LOC"]) && f.buffer_tag() == "DEMON",
        action: right("det"),
      },
      Heuristic {
        name: "locative-of-noun",
        applies: |f| stack_tag_in(f, &["N"]) && f.buffer_tag() == "N-LOC",
        action: right("nmod"),
      },
      Heuristic {
        name: "adverb-after-adjective",
        applies: |f| stack_tag_in(f, &["ADJ"]) && f.buffer_tag() == "ADV_ATAIL",
        action: right("advmod"),
      },
      Heuristic {
        // a finished dependent is hiding the verb; uncover it so the
        // post-verbal adverb can attach
        name: "uncover-verb",
        applies: |f| {
          f.buffer_tag() == "ADV_VTAIL" && !stack_tag_in(f, &["V", "ROOT"]) && f.verb_below
        },
        action: Transition::Reduce,
      },
    ])
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dep::Item;
  use crate::shift_reduce::parse;

  fn arc_labels(arcs: &[crate::dep::Dependency]) -> Vec<&str> {
    arcs.iter().map(|dep| dep.label.as_str()).collect()
  }

  #[test]
  fn test_decisions_are_deterministic() {
    let policy = RulePolicy::vietnamese();
    let top = Item::new(1, "anh", "PRO");
    let front = Item::new(2, "đi", "V");
    let features = Features {
      stack_top: Some(&top),
      buffer_front: &front,
      verb_below: false,
    };

    let first = policy.decide(&features).unwrap();
    assert_eq!(first, Transition::LeftArc("nsubj".to_string()));
    assert_eq!(policy.decide(&features).unwrap(), first);
  }

  #[test]
  fn test_describe_lists_rules_in_order() {
    let policy = RulePolicy::vietnamese();
    let names = policy.describe();
    assert_eq!(names[0], "shift-onto-empty-stack");
    assert!(names.contains(&"uncover-verb"));
  }

  #[test]
  fn test_reduce_uncovers_the_verb() {
    // "tôi muốn đặt hai phòng rồi" — the object must be reduced away
    // before the trailing adverb can reach the verb
    let policy = RulePolicy::vietnamese();
    let outcome = parse(
      &["tôi", "muốn", "đặt", "hai", "phòng", "rồi"],
      &["PRO", "ADV_VHEAD", "V", "NUM", "N", "ADV_VTAIL"],
      &policy,
    )
    .unwrap();

    let labels = arc_labels(&outcome.arcs);
    assert_eq!(
      labels,
      vec!["advmod", "nsubj", "nummod", "obj", "advmod", "root"]
    );

    let last_advmod = outcome
      .arcs
      .iter()
      .filter(|dep| dep.label == "advmod")
      .next_back()
      .unwrap();
    assert_eq!(last_advmod.head.word, "đặt");
    assert_eq!(last_advmod.tail.word, "rồi");
    assert!(outcome.unattached().is_empty());
  }

  #[test]
  fn test_attributive_adjective() {
    let policy = RulePolicy::vietnamese();
    let outcome = parse(
      &["tôi", "tìm", "phòng", "đẹp"],
      &["PRO", "V", "N", "ADJ"],
      &policy,
    )
    .unwrap();

    let labels = arc_labels(&outcome.arcs);
    assert_eq!(labels, vec!["nsubj", "obj", "amod", "root"]);
  }
}
