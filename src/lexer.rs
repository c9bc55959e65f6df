use crate::error::ShellError;

/// A single lexical unit of a command segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A whitespace-free word: command name, argument or redirection target.
    Word(String),
    /// Marks where the redirection operator stood in the segment.
    Redirect,
}

/// Tokens of one segment together with its optional redirection target.
///
/// When a target is present the token stream ends with
/// `[.., Token::Redirect, Token::Word(target)]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    tokens: Vec<Token>,
    target: Option<String>,
}

impl Tokens {
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Index of the [`Token::Redirect`] marker, if any.
    pub fn redirect_position(&self) -> Option<usize> {
        self.tokens.iter().position(|t| *t == Token::Redirect)
    }

    /// Words that make up the argument vector: everything before the redirect marker.
    pub fn argv(&self) -> Vec<&str> {
        let end = self.redirect_position().unwrap_or(self.tokens.len());
        self.tokens[..end]
            .iter()
            .filter_map(|t| match t {
                Token::Word(w) => Some(w.as_str()),
                Token::Redirect => None,
            })
            .collect()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }
}

/// Split one command segment into [`Tokens`].
///
/// Words are separated by any run of whitespace, so newline and tab leftovers
/// from line buffering never end up inside a word. The segment may contain at
/// most one `redirect_op`, and exactly one word must follow it.
pub fn tokenize(segment: &str, redirect_op: char) -> Result<Tokens, ShellError> {
    let mut parts = segment.split(redirect_op);
    let head = parts.next().unwrap_or_default();
    let tail = parts.next();
    if parts.next().is_some() {
        return Err(ShellError::syntax(format!(
            "more than one '{redirect_op}' in one command"
        )));
    }

    let mut tokens: Vec<Token> = words(head).map(Token::Word).collect();
    let Some(tail) = tail else {
        return Ok(Tokens {
            tokens,
            target: None,
        });
    };

    if tokens.is_empty() {
        return Err(ShellError::syntax(format!(
            "'{redirect_op}' without a command"
        )));
    }
    let mut after = words(tail);
    let target = match (after.next(), after.next()) {
        (Some(target), None) => target,
        (None, _) => {
            return Err(ShellError::syntax(format!(
                "missing target after '{redirect_op}'"
            )));
        }
        (Some(_), Some(_)) => {
            return Err(ShellError::syntax(format!(
                "more than one target after '{redirect_op}'"
            )));
        }
    };

    tokens.push(Token::Redirect);
    tokens.push(Token::Word(target.clone()));
    Ok(Tokens {
        tokens,
        target: Some(target),
    })
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(str::to_owned)
}
