use std::env;
use std::io;
use std::io::Write;
use std::process;

use gramarc::lex::{PosTagger, Tokenizer};
use gramarc::policy::RulePolicy;
use gramarc::shift_reduce::DependencyParser;
use gramarc::{Error, Grammar};

fn usage(prog_name: &str) -> String {
  format!(
    r"Usage: {} FILE [options]

Reads a grammar file and parses sentences typed on stdin.

Options:
  -h, --help         Print this message
  -g, --generate N   Sample N sentences from the grammar and exit
  -l, --length N     Maximum sample length in words (defaults to 10)
  -d, --deps         Dependency-parse input lines instead of recognizing them",
    prog_name
  )
}

struct Args {
  filename: String,
  generate: Option<usize>,
  max_length: usize,
  deps: bool,
}

impl Args {
  fn make_error_message(msg: &str, prog_name: impl AsRef<str>) -> String {
    format!("argument error: {}.\n\n{}", msg, usage(prog_name.as_ref()))
  }

  fn parse(v: Vec<String>) -> Result<Self, String> {
    if v.is_empty() {
      return Err(Self::make_error_message("bad argument vector", "gramarc"));
    }

    let args_len = v.len();
    let mut iter = v.into_iter();
    let prog_name = iter.next().unwrap();

    if args_len < 2 {
      return Err(Self::make_error_message("not enough arguments", prog_name));
    }

    let mut filename: Option<String> = None;
    let mut generate = None;
    let mut max_length = 10;
    let mut deps = false;

    while let Some(o) = iter.next() {
      if o == "-h" || o == "--help" {
        println!("{}", usage(&prog_name));
        process::exit(0);
      } else if o == "-d" || o == "--deps" {
        deps = true;
      } else if o == "-g" || o == "--generate" || o == "-l" || o == "--length" {
        let value = iter
          .next()
          .and_then(|n| n.parse::<usize>().ok())
          .ok_or_else(|| Self::make_error_message("expected a number", &prog_name))?;
        if o == "-g" || o == "--generate" {
          generate = Some(value);
        } else {
          max_length = value;
        }
      } else if filename.is_none() {
        filename = Some(o);
      } else {
        return Err(Self::make_error_message("invalid arguments", prog_name));
      }
    }

    if let Some(filename) = filename {
      Ok(Self {
        filename,
        generate,
        max_length,
        deps,
      })
    } else {
      Err(Self::make_error_message("missing filename", prog_name))
    }
  }
}

fn recognize(g: &Grammar, sentence: &str) -> Result<(), Error> {
  match g.recognize(sentence)? {
    Some(derivation) => println!("{}", derivation.syntree(g)),
    None => println!("Failed to parse the sentence!"),
  }
  Ok(())
}

fn main() -> Result<(), Error> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let opts = match Args::parse(env::args().collect()) {
    Ok(opts) => opts,
    Err(msg) => {
      eprintln!("{}", msg);
      process::exit(255);
    }
  };

  let g = Grammar::read_from_file(&opts.filename)?;

  if let Some(samples) = opts.generate {
    for sample in g.generate(opts.max_length, samples)? {
      println!("{}", sample);
    }
    return Ok(());
  }

  let dep_parser = opts.deps.then(|| {
    DependencyParser::new(
      Tokenizer::default(),
      PosTagger::from_grammar(&g),
      RulePolicy::vietnamese(),
    )
  });

  let mut input = String::new();
  loop {
    print!("> ");
    io::stdout().flush()?;

    match io::stdin().read_line(&mut input) {
      Ok(_) => {
        if input.is_empty() {
          // ctrl+d
          return Ok(());
        }
        let line = input.trim();
        if !line.is_empty() {
          match &dep_parser {
            Some(parser) => match parser.parse(line) {
              Ok(outcome) => {
                for arc in &outcome.arcs {
                  println!("{}", arc);
                }
              }
              Err(err) => eprintln!("{}", err),
            },
            None => recognize(&g, line)?,
          }
        }
        input.clear();
      }
      Err(error) => return Err(error.into()),
    }
  }
}
