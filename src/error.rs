use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
  /// A grammar line without the `->` separator
  #[error("malformed grammar at line {line_no}: {line:?}")]
  MalformedGrammar { line_no: usize, line: String },

  /// An engine dereferenced a nonterminal with no entry in the rule table
  #[error("no productions defined for {symbol:?}")]
  UndefinedProduction { symbol: String },

  /// A textual transition label the engine does not recognize
  #[error("unknown transition {transition:?}")]
  UnknownTransition { transition: String },

  /// The policy kept returning a transition whose precondition can't be met
  #[error("parser stalled on transition {transition}")]
  ParserStalled { transition: String },

  #[error(transparent)]
  Io(#[from] io::Error),
}
