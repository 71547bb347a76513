use crate::config::{FilterConfig, MatchMode};
use crate::error::{McFilesError, Result};
use regex::Regex;

/// Decides which file paths and unit names make it into the report.
#[derive(Debug, Clone)]
pub struct NameFilter {
    mode: MatchMode,
    patterns: Vec<String>,
    compiled: Vec<Regex>,
}

impl NameFilter {
    pub fn new(config: &FilterConfig) -> Result<Self> {
        let compiled = match config.match_mode {
            MatchMode::Substring => Vec::new(),
            MatchMode::Glob => config
                .patterns
                .iter()
                .map(|pattern| compile(&glob_to_regex(pattern), pattern))
                .collect::<Result<Vec<_>>>()?,
            MatchMode::Regex => config
                .patterns
                .iter()
                .map(|pattern| compile(pattern, pattern))
                .collect::<Result<Vec<_>>>()?,
        };

        Ok(Self {
            mode: config.match_mode,
            patterns: config.patterns.clone(),
            compiled,
        })
    }

    /// A filter that keeps everything.
    pub fn allow_all() -> Self {
        Self {
            mode: MatchMode::default(),
            patterns: Vec::new(),
            compiled: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.patterns.is_empty()
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn matches(&self, name: &str) -> bool {
        if !self.is_active() {
            return true;
        }

        match self.mode {
            MatchMode::Substring => self.patterns.iter().any(|p| name.contains(p.as_str())),
            MatchMode::Glob | MatchMode::Regex => {
                self.compiled.iter().any(|pattern| pattern.is_match(name))
            }
        }
    }

    /// Like [`NameFilter::matches`]; an entry without a name only passes an
    /// inactive filter.
    pub fn keeps(&self, name: Option<&str>) -> bool {
        name.map_or(!self.is_active(), |name| self.matches(name))
    }
}

impl Default for NameFilter {
    fn default() -> Self {
        Self::allow_all()
    }
}

fn compile(source: &str, pattern: &str) -> Result<Regex> {
    Regex::new(source).map_err(|e| McFilesError::Config {
        message: format!("Invalid filter pattern '{}': {}", pattern, e),
    })
}

/// Translate a shell wildcard into an anchored regex.
///
/// `*` and `?` also match `/`, `[...]` is a character class with `!` for
/// negation, and a `[` without a closing `]` is literal.
fn glob_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from("(?s)^");
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '*' => {
                while i < chars.len() && chars[i] == '*' {
                    i += 1;
                }
                out.push_str(".*");
            }
            '?' => out.push('.'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.push_str(&translate_class(&chars[i..end]));
                    i = end + 1;
                }
                None => out.push_str("\\["),
            },
            _ => out.push_str(&regex::escape(&c.to_string())),
        }
    }

    out.push('$');
    out
}

// Index of the `]` closing a class that opens just before `start`
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start;
    if j < chars.len() && chars[j] == '!' {
        j += 1;
    }
    // A leading `]` is a member, not the terminator
    if j < chars.len() && chars[j] == ']' {
        j += 1;
    }
    chars[j..].iter().position(|&c| c == ']').map(|pos| j + pos)
}

fn translate_class(body: &[char]) -> String {
    let (negated, members) = match body.first() {
        Some('!') => (true, &body[1..]),
        _ => (false, body),
    };

    let mut class = String::from("[");
    if negated {
        class.push('^');
    }
    for (idx, &c) in members.iter().enumerate() {
        match c {
            '\\' | '[' | ']' | '&' | '~' => {
                class.push('\\');
                class.push(c);
            }
            '^' if idx == 0 && !negated => class.push_str("\\^"),
            _ => class.push(c),
        }
    }
    class.push(']');
    class
}
