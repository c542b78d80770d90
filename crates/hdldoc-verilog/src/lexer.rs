//! Pattern-table driven tokenizer with an explicit state stack
//!
//! A [`LexerTable`] maps each state to an ordered list of rules. Running the
//! table over a buffer walks a cursor forward: at every position the rules of
//! the state on top of the stack are tried in order and the first one whose
//! pattern matches at the cursor wins. If nothing matches, the cursor moves
//! one character and nothing is reported, so every input terminates and no
//! input is an error.

use log::trace;
use regex::Regex;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

/// Error raised while compiling a rule table
#[derive(Error, Debug)]
pub enum LexerError {
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Context a rule requires at the cursor, in addition to its pattern
///
/// Patterns are matched against the text from the cursor onward, so they
/// cannot look behind it. Anchors cover the cases that need to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// No constraint
    Any,
    /// The previous character is not part of an identifier
    WordStart,
    /// Only whitespace lies between the previous newline and the cursor
    LineStart,
}

impl Anchor {
    fn holds(self, text: &str, pos: usize) -> bool {
        let before = &text[..pos];
        match self {
            Anchor::Any => true,
            Anchor::WordStart => before
                .chars()
                .next_back()
                .map_or(true, |c| !(c.is_alphanumeric() || c == '_')),
            Anchor::LineStart => before
                .chars()
                .rev()
                .take_while(|&c| c != '\n')
                .all(char::is_whitespace),
        }
    }
}

/// What happens to the state stack after a rule matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<S> {
    Stay,
    Push(S),
    Pop,
}

/// Uncompiled rule: pattern source, anchor, action and transition
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec<S, A> {
    pub pattern: &'static str,
    pub anchor: Anchor,
    pub action: Option<A>,
    pub transition: Transition<S>,
}

impl<S: Copy, A: Copy> RuleSpec<S, A> {
    pub const fn new(pattern: &'static str, action: Option<A>, transition: Transition<S>) -> Self {
        Self {
            pattern,
            anchor: Anchor::Any,
            action,
            transition,
        }
    }

    pub const fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }
}

#[derive(Debug)]
struct Rule<S, A> {
    regex: Regex,
    anchor: Anchor,
    action: Option<A>,
    transition: Transition<S>,
}

/// One match reported by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'t, A> {
    /// Byte offset where the match started
    pub pos: usize,
    /// `None` for rules that consume text without reporting anything
    pub action: Option<A>,
    /// Capture groups in pattern order; `None` where a group did not take part
    pub groups: Vec<Option<&'t str>>,
}

impl<'t, A> Token<'t, A> {
    /// Capture group `index` (0-based, excluding the whole match)
    pub fn group(&self, index: usize) -> Option<&'t str> {
        self.groups.get(index).copied().flatten()
    }
}

/// Compiled per-state rule lists
#[derive(Debug)]
pub struct LexerTable<S, A> {
    root: S,
    states: HashMap<S, Vec<Rule<S, A>>>,
}

impl<S, A> LexerTable<S, A>
where
    S: Copy + Eq + Hash + Debug,
    A: Copy + Debug,
{
    /// Compile a table from `(state, rules)` pairs
    ///
    /// Each pattern is anchored at the cursor; rule order within a state is
    /// the match priority.
    pub fn compile(root: S, spec: &[(S, &[RuleSpec<S, A>])]) -> Result<Self, LexerError> {
        let mut states = HashMap::with_capacity(spec.len());

        for (state, rules) in spec {
            let compiled = rules
                .iter()
                .map(|rule| {
                    let regex = Regex::new(&format!("^(?:{})", rule.pattern)).map_err(|e| {
                        LexerError::InvalidPattern {
                            pattern: rule.pattern.to_string(),
                            source: e,
                        }
                    })?;
                    Ok(Rule {
                        regex,
                        anchor: rule.anchor,
                        action: rule.action,
                        transition: rule.transition,
                    })
                })
                .collect::<Result<Vec<_>, LexerError>>()?;
            states.insert(*state, compiled);
        }

        Ok(Self { root, states })
    }

    /// Tokenize `text`, starting in the root state
    pub fn run<'l, 't>(&'l self, text: &'t str) -> Tokens<'l, 't, S, A> {
        Tokens {
            table: self,
            text,
            pos: 0,
            stack: vec![self.root],
        }
    }
}

/// Single-pass iterator over the tokens of one buffer
pub struct Tokens<'l, 't, S, A> {
    table: &'l LexerTable<S, A>,
    text: &'t str,
    pos: usize,
    stack: Vec<S>,
}

impl<'l, 't, S, A> Tokens<'l, 't, S, A>
where
    S: Copy + Eq + Hash + Debug,
    A: Copy + Debug,
{
    /// The state on top of the stack
    pub fn state(&self) -> S {
        self.stack.last().copied().unwrap_or(self.table.root)
    }

    /// Current depth of the state stack (1 = root only)
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn apply(&mut self, transition: Transition<S>) {
        match transition {
            Transition::Stay => {}
            Transition::Push(state) => self.stack.push(state),
            Transition::Pop => {
                // The root state stays put
                if self.stack.len() > 1 {
                    self.stack.pop();
                }
            }
        }
    }

    fn skip_char(&mut self) {
        let step = self.text[self.pos..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        self.pos += step;
    }
}

impl<'l, 't, S, A> Iterator for Tokens<'l, 't, S, A>
where
    S: Copy + Eq + Hash + Debug,
    A: Copy + Debug,
{
    type Item = Token<'t, A>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.text;
        let table = self.table;

        while self.pos < text.len() {
            let start = self.pos;
            let state = self.state();
            let rules = table.states.get(&state).map(Vec::as_slice).unwrap_or(&[]);

            let hit = rules.iter().find_map(|rule| {
                if !rule.anchor.holds(text, start) {
                    return None;
                }
                let caps = rule.regex.captures(&text[start..])?;
                let len = caps.get(0).map_or(0, |m| m.end());
                // An empty match would never move the cursor
                if len == 0 {
                    return None;
                }
                let groups = caps
                    .iter()
                    .skip(1)
                    .map(|g| g.map(|m| &text[start + m.start()..start + m.end()]))
                    .collect::<Vec<_>>();
                Some((rule, len, groups))
            });

            match hit {
                Some((rule, len, groups)) => {
                    self.pos = start + len;
                    self.apply(rule.transition);
                    if let Some(action) = rule.action {
                        trace!("{state:?}@{start}: {action:?} {groups:?}");
                    }
                    return Some(Token {
                        pos: start,
                        action: rule.action,
                        groups,
                    });
                }
                None => self.skip_char(),
            }
        }

        None
    }
}
