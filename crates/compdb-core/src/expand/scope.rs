//! Variable scope with Ninja-style references.

use rustc_hash::FxHashMap;

use super::{ExpansionError, MacroEvaluator};

/// Largest evaluated string, in bytes, before evaluation gives up.
pub const MAX_EXPANSION_LEN: usize = 1 << 20;

/// Named variables available to flag evaluation.
///
/// Values are raw strings and may reference other variables; they are
/// evaluated when referenced, not when defined.
///
/// Supported syntax:
/// - `$name` where name is `[A-Za-z0-9_-]+`
/// - `${name}` where name is `[A-Za-z0-9_.-]+`
/// - `$$`, `$ ` and `$:` for a literal `$`, space and colon
///
/// No single evaluation may grow past [`MAX_EXPANSION_LEN`] bytes.
#[derive(Debug, Clone, Default)]
pub struct MacroScope {
    variables: FxHashMap<String, String>,
}

impl MacroScope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or redefine a variable, returning the previous raw value.
    pub fn define(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.variables.insert(name.into(), value.into())
    }

    /// Raw, unevaluated value of a variable.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    fn evaluate_in(&self, raw: &str, stack: &mut Vec<String>) -> Result<String, ExpansionError> {
        let mut out = String::with_capacity(raw.len());
        let mut chars = raw.char_indices().peekable();

        while let Some((_, c)) = chars.next() {
            if out.len() > MAX_EXPANSION_LEN {
                return Err(ExpansionError::ExpansionTooLarge {
                    limit: MAX_EXPANSION_LEN,
                    input: raw.to_string(),
                });
            }
            if c != '$' {
                out.push(c);
                continue;
            }

            match chars.next() {
                None => {
                    return Err(ExpansionError::TrailingDollar {
                        input: raw.to_string(),
                    });
                }
                Some((_, '$')) => out.push('$'),
                Some((_, ' ')) => out.push(' '),
                Some((_, ':')) => out.push(':'),
                Some((brace, '{')) => {
                    let start = brace + 1;
                    let mut end = None;
                    for (i, ch) in chars.by_ref() {
                        if ch == '}' {
                            end = Some(i);
                            break;
                        }
                        if !is_braced_name_char(ch) {
                            return Err(ExpansionError::InvalidVariableName {
                                ch,
                                input: raw.to_string(),
                            });
                        }
                    }
                    let Some(end) = end else {
                        return Err(ExpansionError::UnterminatedReference {
                            input: raw.to_string(),
                        });
                    };
                    if start == end {
                        return Err(ExpansionError::EmptyReference {
                            input: raw.to_string(),
                        });
                    }
                    out.push_str(&self.resolve(&raw[start..end], raw, stack)?);
                }
                Some((start, ch)) if is_name_char(ch) => {
                    let mut end = start + ch.len_utf8();
                    while let Some(&(i, next)) = chars.peek() {
                        if !is_name_char(next) {
                            break;
                        }
                        end = i + next.len_utf8();
                        chars.next();
                    }
                    out.push_str(&self.resolve(&raw[start..end], raw, stack)?);
                }
                Some((_, ch)) => {
                    return Err(ExpansionError::InvalidEscape {
                        ch,
                        input: raw.to_string(),
                    });
                }
            }
        }

        if out.len() > MAX_EXPANSION_LEN {
            return Err(ExpansionError::ExpansionTooLarge {
                limit: MAX_EXPANSION_LEN,
                input: raw.to_string(),
            });
        }
        Ok(out)
    }

    fn resolve(
        &self,
        name: &str,
        input: &str,
        stack: &mut Vec<String>,
    ) -> Result<String, ExpansionError> {
        if stack.iter().any(|active| active == name) {
            return Err(ExpansionError::RecursiveVariable {
                name: name.to_string(),
            });
        }
        let value = self
            .variables
            .get(name)
            .ok_or_else(|| ExpansionError::UndefinedVariable {
                name: name.to_string(),
                input: input.to_string(),
            })?;

        stack.push(name.to_string());
        let evaluated = self.evaluate_in(value, stack);
        stack.pop();
        evaluated
    }
}

impl MacroEvaluator for MacroScope {
    fn evaluate(&self, raw: &str) -> Result<String, ExpansionError> {
        self.evaluate_in(raw, &mut Vec::new())
    }
}

impl<K, V> FromIterator<(K, V)> for MacroScope
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            variables: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn is_braced_name_char(c: char) -> bool {
    is_name_char(c) || c == '.'
}
