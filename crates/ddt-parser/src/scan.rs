//! Depth-counted scanning shared by every text parser in this crate.
//!
//! `<`, `[` and `(` open a nesting level, `>`, `]` and `)` close one.
//! Only characters at depth zero are considered by the helpers below, so a
//! comma inside `Dictionary<string, int>` or `(int, int)` never splits.
//! String and char literals are skipped whole.

/// Iterator over the characters of a text that sit at bracket depth zero.
///
/// Bracket characters themselves and anything inside a string or char
/// literal are never yielded.
pub struct TopLevelChars<'a> {
    chars: std::str::CharIndices<'a>,
    depth: usize,
    quote: Option<char>,
    escaped: bool,
    /// Inside `@"..."`, where `\` is literal and `""` is the only escape.
    verbatim: bool,
    /// Previous characters were `@` or `@$`.
    verbatim_prefix: bool,
    /// The previous character closed a verbatim string.
    closed_verbatim: bool,
}

impl<'a> TopLevelChars<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.char_indices(),
            depth: 0,
            quote: None,
            escaped: false,
            verbatim: false,
            verbatim_prefix: false,
            closed_verbatim: false,
        }
    }
}

impl Iterator for TopLevelChars<'_> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<Self::Item> {
        for (index, c) in self.chars.by_ref() {
            let reopens_verbatim = std::mem::take(&mut self.closed_verbatim);

            if let Some(quote) = self.quote {
                if self.verbatim {
                    if c == '"' {
                        self.quote = None;
                        self.closed_verbatim = true;
                    }
                } else if self.escaped {
                    self.escaped = false;
                } else if c == '\\' {
                    self.escaped = true;
                } else if c == quote {
                    self.quote = None;
                }
                continue;
            }

            let after_prefix = self.verbatim_prefix;
            self.verbatim_prefix = c == '@' || (c == '$' && after_prefix);

            match c {
                // `""` inside a verbatim string closes and reopens it
                '"' => {
                    self.quote = Some(c);
                    self.verbatim = after_prefix || reopens_verbatim;
                }
                '\'' => {
                    self.quote = Some(c);
                    self.verbatim = false;
                }
                '<' | '[' | '(' => self.depth += 1,
                // `=>` in a default value must not push the depth negative
                '>' | ']' | ')' => self.depth = self.depth.saturating_sub(1),
                _ if self.depth == 0 => return Some((index, c)),
                _ => {}
            }
        }
        None
    }
}

/// Split `text` on `delimiter` wherever it appears at depth zero.
///
/// Segments are trimmed. The result always holds at least one segment:
/// the whole trimmed text when no top-level delimiter exists.
#[must_use]
pub fn split_top_level(text: &str, delimiter: char) -> Vec<String> {
    let mut segments = Vec::new();
    let mut start = 0;

    for (index, c) in TopLevelChars::new(text) {
        if c == delimiter {
            segments.push(text[start..index].trim().to_string());
            start = index + c.len_utf8();
        }
    }

    segments.push(text[start..].trim().to_string());
    segments
}

/// Byte offset of the first depth-zero occurrence of `needle`.
#[must_use]
pub fn find_top_level(text: &str, needle: char) -> Option<usize> {
    TopLevelChars::new(text)
        .find(|&(_, c)| c == needle)
        .map(|(index, _)| index)
}

/// Byte offset of the last depth-zero occurrence of `needle`.
#[must_use]
pub fn rfind_top_level(text: &str, needle: char) -> Option<usize> {
    TopLevelChars::new(text)
        .filter(|&(_, c)| c == needle)
        .last()
        .map(|(index, _)| index)
}

/// Byte offset of the first `bracket` that opens a new level from depth zero.
#[must_use]
pub fn find_top_level_open(text: &str, bracket: char) -> Option<usize> {
    let mut depth = 0usize;
    for (index, c) in text.char_indices() {
        match c {
            _ if c == bracket && depth == 0 => return Some(index),
            '<' | '[' | '(' => depth += 1,
            '>' | ']' | ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}

/// Byte offset of the bracket that closes the one opened at `open`.
///
/// `open` must point at `<`, `[` or `(`. Depth is shared across all three
/// bracket kinds, matching the rest of the scanner.
#[must_use]
pub fn closing_bracket(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, c) in text.get(open..)?.char_indices() {
        match c {
            '<' | '[' | '(' => depth += 1,
            '>' | ']' | ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}
