//! Macro expansion for raw flag strings.
//!
//! Flags declared on a module may reference build-graph variables
//! (`-I${SourceDir}/include`, `$CommonCflags`). Before a flag can appear in a
//! compilation database it is evaluated against the graph's macro context and
//! split on whitespace, so one raw flag may become zero, one or many
//! arguments.
//!
//! Evaluation failures never abort generation: the raw flag is kept as a
//! single verbatim argument instead.

mod scope;

pub use scope::{MAX_EXPANSION_LEN, MacroScope};

use thiserror::Error;

/// Failure to evaluate a raw flag string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpansionError {
    /// Reference to a variable the scope does not define.
    #[error("undefined variable `{name}` in `{input}`")]
    UndefinedVariable { name: String, input: String },

    /// `${` without a closing brace.
    #[error("unterminated variable reference in `{input}`")]
    UnterminatedReference { input: String },

    /// `${}`.
    #[error("empty variable reference in `{input}`")]
    EmptyReference { input: String },

    /// A character inside `${...}` that cannot be part of a variable name.
    #[error("invalid character {ch:?} in variable name in `{input}`")]
    InvalidVariableName { ch: char, input: String },

    /// `$` followed by a character that starts neither an escape nor a name.
    #[error("invalid escape `${ch}` in `{input}`")]
    InvalidEscape { ch: char, input: String },

    /// `$` as the last character.
    #[error("trailing `$` in `{input}`")]
    TrailingDollar { input: String },

    /// A variable whose value refers back to itself.
    #[error("variable `{name}` refers to itself")]
    RecursiveVariable { name: String },

    /// Evaluation grew past the size limit.
    #[error("expansion of `{input}` exceeds {limit} bytes")]
    ExpansionTooLarge { limit: usize, input: String },
}

/// Evaluation context bound to a build graph.
pub trait MacroEvaluator {
    /// Evaluate `raw`, substituting every variable reference.
    fn evaluate(&self, raw: &str) -> Result<String, ExpansionError>;
}

impl<F> MacroEvaluator for F
where
    F: Fn(&str) -> Result<String, ExpansionError>,
{
    fn evaluate(&self, raw: &str) -> Result<String, ExpansionError> {
        self(raw)
    }
}

/// Evaluate one raw flag and split the result into whitespace-delimited tokens.
pub fn evaluate_and_split<E>(evaluator: &E, raw: &str) -> Result<Vec<String>, ExpansionError>
where
    E: MacroEvaluator + ?Sized,
{
    let evaluated = evaluator.evaluate(raw)?;
    Ok(evaluated.split_whitespace().map(str::to_string).collect())
}

/// Expand every flag of a group, in order.
///
/// Empty flags produce nothing. A flag that fails to evaluate is kept as a
/// single verbatim argument.
pub fn expand_all<E>(evaluator: &E, flags: &[String]) -> Vec<String>
where
    E: MacroEvaluator + ?Sized,
{
    let mut args = Vec::with_capacity(flags.len());
    for flag in flags.iter().filter(|flag| !flag.is_empty()) {
        match evaluate_and_split(evaluator, flag) {
            Ok(tokens) => args.extend(tokens),
            Err(err) => {
                tracing::debug!(flag = %flag, error = %err, "keeping unexpandable flag verbatim");
                args.push(flag.clone());
            }
        }
    }
    args
}
