//! Reply codes and reply lines of three-digit text protocols.

/// Three-digit reply code (e.g., 220).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReplyCode(u16);

impl ReplyCode {
    /// Creates a new reply code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for ReplyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// Inclusive range of reply codes accepted at one handshake step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeRange {
    low: u16,
    high: u16,
}

impl CodeRange {
    /// Positive completion (200-299).
    pub const COMPLETION: Self = Self::new(200, 299);
    /// Positive completion or intermediate (200-399).
    pub const PROCEED: Self = Self::new(200, 399);

    /// Creates a range from `low` to `high`, both inclusive.
    #[must_use]
    pub const fn new(low: u16, high: u16) -> Self {
        Self { low, high }
    }

    /// Returns true if `code` falls inside the range.
    #[must_use]
    pub const fn contains(self, code: ReplyCode) -> bool {
        code.0 >= self.low && code.0 <= self.high
    }
}

/// One line of a server reply.
///
/// `raw` is the line as received, minus its line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyLine {
    /// Line text without CR/LF.
    pub raw: String,
    /// Leading reply code.
    pub code: ReplyCode,
    /// True when the code is followed by `-`, i.e. more lines follow.
    pub continuation: bool,
}

impl ReplyLine {
    /// Returns the text after the code and separator.
    #[must_use]
    pub fn text(&self) -> &str {
        self.raw.get(4..).unwrap_or("")
    }

    /// Returns true if `line` closes a multi-line reply opened with `code`.
    ///
    /// Only the leading three digits and the separator are compared.
    #[must_use]
    pub fn terminates(code: ReplyCode, line: &str) -> bool {
        let prefix = code.to_string();
        line.strip_prefix(prefix.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod reply_code_tests {
        use super::*;

        #[test]
        fn display_is_zero_padded() {
            assert_eq!(ReplyCode::new(221).to_string(), "221");
            assert_eq!(ReplyCode::new(7).to_string(), "007");
        }

        #[test]
        fn ordering() {
            assert!(ReplyCode::new(221) < ReplyCode::new(425));
        }
    }

    mod code_range_tests {
        use super::*;

        #[test]
        fn completion_bounds() {
            assert!(CodeRange::COMPLETION.contains(ReplyCode::new(200)));
            assert!(CodeRange::COMPLETION.contains(ReplyCode::new(299)));
            assert!(!CodeRange::COMPLETION.contains(ReplyCode::new(199)));
            assert!(!CodeRange::COMPLETION.contains(ReplyCode::new(331)));
        }

        #[test]
        fn proceed_includes_intermediate() {
            assert!(CodeRange::PROCEED.contains(ReplyCode::new(331)));
            assert!(CodeRange::PROCEED.contains(ReplyCode::new(230)));
            assert!(!CodeRange::PROCEED.contains(ReplyCode::new(530)));
        }
    }

    mod reply_line_tests {
        use super::*;

        #[test]
        fn text_after_separator() {
            let line = ReplyLine {
                raw: "221 Goodbye.".to_string(),
                code: ReplyCode::new(221),
                continuation: false,
            };
            assert_eq!(line.text(), "Goodbye.");

            let bare = ReplyLine {
                raw: "221".to_string(),
                code: ReplyCode::new(221),
                continuation: false,
            };
            assert_eq!(bare.text(), "");
        }

        #[test]
        fn terminator_matching() {
            let code = ReplyCode::new(220);
            assert!(ReplyLine::terminates(code, "220 ready"));
            assert!(ReplyLine::terminates(code, "220"));
            assert!(!ReplyLine::terminates(code, "220-more"));
            assert!(!ReplyLine::terminates(code, "221 ready"));
            assert!(!ReplyLine::terminates(code, " 220 indented"));
            assert!(!ReplyLine::terminates(code, "2200 ready"));
        }
    }
}
