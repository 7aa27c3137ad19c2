use std::fmt;

use crate::grammar::{Grammar, Symbol};
use crate::recognize::{Derivation, DerivationStep};

#[derive(Debug, Clone, PartialEq)]
pub struct Constituent {
  pub symbol: Symbol,
  /// Word-index span covered by this constituent
  pub span: (usize, usize),
}

impl fmt::Display for Constituent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}: {}", self.span.0, self.span.1, self.symbol)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Word {
  pub value: String,
  pub span: (usize, usize),
}

impl fmt::Display for Word {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}: {}", self.span.0, self.span.1, self.value)
  }
}

/// The nesting form of a derivation
#[derive(Debug, Clone, PartialEq)]
pub enum SynTree {
  Branch(Constituent, Vec<SynTree>),
  Leaf(Word),
}

impl SynTree {
  pub fn is_leaf(&self) -> bool {
    matches!(self, Self::Leaf(_))
  }

  pub fn get_branch(&self) -> Option<(&Constituent, &Vec<SynTree>)> {
    match self {
      Self::Branch(c, cs) => Some((c, cs)),
      _ => None,
    }
  }

  /// The terminal fringe, left to right
  pub fn words(&self) -> Vec<&str> {
    match self {
      Self::Leaf(w) => vec![w.value.as_str()],
      Self::Branch(_, children) => children.iter().flat_map(|c| c.words()).collect(),
    }
  }
}

impl fmt::Display for SynTree {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Leaf(w) => write!(f, "{}", w),
      Self::Branch(c, children) => {
        write!(f, "({}", c)?;
        if children.len() == 1 && children[0].is_leaf() {
          write!(f, " {})", children[0])
        } else {
          for child in children.iter() {
            let fmt = format!("{}", child);
            for line in fmt.lines() {
              write!(f, "\n  {}", line)?;
            }
          }
          write!(f, ")")
        }
      }
    }
  }
}

impl Derivation {
  /// Rebuilds the nesting tree from the flat trace.
  ///
  /// The trace is a leftmost derivation, so it lists productions in preorder
  /// and each nonterminal's expansion is simply the next unconsumed step.
  /// That holds for recursive grammars too, since no bookkeeping is keyed on
  /// symbol names. Panics on a trace that is not a preorder derivation,
  /// which can only happen for hand-built traces.
  pub fn syntree(&self, grammar: &Grammar) -> SynTree {
    let mut steps = self.0.iter();
    let mut pos = 0;
    let tree = build(grammar, &mut steps, &mut pos, None);
    assert!(
      steps.next().is_none(),
      "derivation continues past its own root expansion"
    );
    tree
  }
}

fn build<'a, I>(g: &Grammar, steps: &mut I, pos: &mut usize, expected: Option<&str>) -> SynTree
where
  I: Iterator<Item = &'a DerivationStep>,
{
  let step = steps
    .next()
    .expect("derivation ended with a nonterminal unexpanded");
  if let Some(expected) = expected {
    assert_eq!(step.lhs, expected, "derivation steps out of preorder");
  }

  let start = *pos;
  let mut children = Vec::with_capacity(step.rhs.len());
  for sym in &step.rhs {
    if g.is_terminal(sym) {
      children.push(SynTree::Leaf(Word {
        value: sym.clone(),
        span: (*pos, *pos + 1),
      }));
      *pos += 1;
    } else {
      children.push(build(g, steps, pos, Some(sym)));
    }
  }

  SynTree::Branch(
    Constituent {
      symbol: step.lhs.clone(),
      span: (start, *pos),
    },
    children,
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_tree_shape_and_spans() {
    let g: Grammar = "S -> N V\nN -> cat\nV -> runs".parse().unwrap();
    let tree = g.recognize("cat runs").unwrap().unwrap().syntree(&g);

    let (root, children) = tree.get_branch().unwrap();
    assert_eq!(root.symbol, "S");
    assert_eq!(root.span, (0, 2));
    assert_eq!(children.len(), 2);

    let (n, _) = children[0].get_branch().unwrap();
    assert_eq!((n.symbol.as_str(), n.span), ("N", (0, 1)));
    let (v, _) = children[1].get_branch().unwrap();
    assert_eq!((v.symbol.as_str(), v.span), ("V", (1, 2)));

    assert_eq!(tree.words(), vec!["cat", "runs"]);
  }

  #[test]
  fn test_recursive_grammar_nests_correctly() {
    // reusing a nonterminal at several depths must not confuse the rebuild
    let g: Grammar = "S -> a S | a".parse().unwrap();
    let tree = g.recognize("a a a").unwrap().unwrap().syntree(&g);

    assert_eq!(tree.words(), vec!["a", "a", "a"]);

    let (root, children) = tree.get_branch().unwrap();
    assert_eq!(root.span, (0, 3));
    assert_eq!(children.len(), 2);
    let (inner, _) = children[1].get_branch().unwrap();
    assert_eq!((inner.symbol.as_str(), inner.span), ("S", (1, 3)));
  }
}
