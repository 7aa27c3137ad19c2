use std::fmt;
use std::str::FromStr;

use crate::dep::Item;
use crate::error::{Error, Result};

/// The four shift-reduce moves. The policy decides one per step; arcs carry
/// their dependency label with them.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
  Shift,
  LeftArc(String),
  RightArc(String),
  Reduce,
}

impl FromStr for Transition {
  type Err = Error;

  /// Parses the textual protocol spoken by external policies: `SHIFT`,
  /// `LEFT_ARC <label>`, `RIGHT_ARC <label>`, `REDUCE`. Anything else is an
  /// `UnknownTransition`.
  fn from_str(s: &str) -> Result<Self> {
    let mut parts = s.split_whitespace();
    let transition = match (parts.next(), parts.next(), parts.next()) {
      (Some("SHIFT"), None, None) => Self::Shift,
      (Some("REDUCE"), None, None) => Self::Reduce,
      (Some("LEFT_ARC"), Some(label), None) => Self::LeftArc(label.to_string()),
      (Some("RIGHT_ARC"), Some(label), None) => Self::RightArc(label.to_string()),
      _ => {
        return Err(Error::UnknownTransition {
          transition: s.to_string(),
        });
      }
    };
    Ok(transition)
  }
}

impl fmt::Display for Transition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Shift => write!(f, "SHIFT"),
      Self::Reduce => write!(f, "REDUCE"),
      Self::LeftArc(label) => write!(f, "LEFT_ARC {}", label),
      Self::RightArc(label) => write!(f, "RIGHT_ARC {}", label),
    }
  }
}

/// The bounded projection of parser state a policy gets to see: the top of
/// the stack (if any), the front of the buffer, and one derived flag.
#[derive(Debug, Clone, Copy)]
pub struct Features<'a> {
  pub stack_top: Option<&'a Item>,
  pub buffer_front: &'a Item,
  /// true when an item tagged `V` sits in the stack strictly below the top
  pub verb_below: bool,
}

impl<'a> Features<'a> {
  pub fn stack_word(&self) -> Option<&'a str> {
    self.stack_top.map(|item| item.word.as_str())
  }

  pub fn stack_tag(&self) -> Option<&'a str> {
    self.stack_top.map(|item| item.tag.as_str())
  }

  pub fn buffer_word(&self) -> &'a str {
    &self.buffer_front.word
  }

  pub fn buffer_tag(&self) -> &'a str {
    &self.buffer_front.tag
  }
}

/// Decides the next move from the feature projection. Policies must be
/// pure: the same features always get the same answer.
pub trait TransitionPolicy {
  fn decide(&self, features: &Features) -> Result<Transition>;
}

/// Plain closures are policies
impl<F> TransitionPolicy for F
where
  F: Fn(&Features) -> Transition,
{
  fn decide(&self, features: &Features) -> Result<Transition> {
    Ok(self(features))
  }
}

/// Adapter for genuinely external policies that answer in the textual
/// protocol; their bad labels surface as `UnknownTransition` and abort the
/// parse.
pub struct TextPolicy<F>(pub F);

impl<F> TransitionPolicy for TextPolicy<F>
where
  F: Fn(&Features) -> String,
{
  fn decide(&self, features: &Features) -> Result<Transition> {
    (self.0)(features).parse()
  }
}
