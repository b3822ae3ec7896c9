use crate::token::Token;

/// What happened after feeding one more byte into the literal matcher?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Byte matched, but the literal is not finished yet.
    NeedMore,
    /// Byte matched *and* it was the last byte of the literal.
    Done(Token),
    /// Byte did **not** match the expected byte.
    Reject,
}

/// Matches the tail of `true`, `false` or `null` one byte at a time.
///
/// Holds the bytes still expected and the token they complete; `None` once
/// the literal is finished or when constructed from a byte that starts no
/// literal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct ExpectedLiteralBuffer(Option<(&'static [u8], Token)>);

impl ExpectedLiteralBuffer {
    /// Start matching after the *first* byte (`n`, `t`, or `f`).
    pub(crate) fn new(first: u8) -> Self {
        match first {
            b'n' => ExpectedLiteralBuffer(Some((b"ull", Token::Null))),
            b't' => ExpectedLiteralBuffer(Some((b"rue", Token::True))),
            b'f' => ExpectedLiteralBuffer(Some((b"alse", Token::False))),
            _ => ExpectedLiteralBuffer(None),
        }
    }

    /// Give the matcher the next input byte and learn what to do next.
    pub(crate) fn step(&mut self, b: u8) -> Step {
        let Some((bytes, token)) = self.0.take() else {
            return Step::Reject;
        };

        match bytes.split_first() {
            Some((expected, rest)) if *expected == b => {
                if rest.is_empty() {
                    Step::Done(token)
                } else {
                    self.0 = Some((rest, token));
                    Step::NeedMore
                }
            }
            _ => {
                self.0 = Some((bytes, token));
                Step::Reject
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(first: u8, rest: &[u8]) -> Vec<Step> {
        let mut lit = ExpectedLiteralBuffer::new(first);
        rest.iter().map(|b| lit.step(*b)).collect()
    }

    #[test]
    fn matches_each_literal() {
        assert_eq!(
            run(b'n', b"ull"),
            [Step::NeedMore, Step::NeedMore, Step::Done(Token::Null)]
        );
        assert_eq!(
            run(b't', b"rue"),
            [Step::NeedMore, Step::NeedMore, Step::Done(Token::True)]
        );
        assert_eq!(run(b'f', b"alse").last(), Some(&Step::Done(Token::False)));
    }

    #[test]
    fn mismatch_rejects_and_keeps_state() {
        let mut lit = ExpectedLiteralBuffer::new(b't');
        assert_eq!(lit.step(b'r'), Step::NeedMore);
        assert_eq!(lit.step(b'x'), Step::Reject);
        assert_eq!(lit.step(b'u'), Step::NeedMore);
    }

    #[test]
    fn unknown_first_byte_rejects() {
        assert_eq!(run(b'x', b"a"), [Step::Reject]);
    }
}
