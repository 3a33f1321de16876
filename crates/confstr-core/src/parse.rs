use crate::error::{ParseError, Result};
use crate::item::{Item, ItemKind};

/// Cursor over the `key=value` pairs of one nesting level.
///
/// Pairs are separated by commas or whitespace. A pair without an `=value`
/// part yields the key with an empty identifier value, which is how list
/// elements and choice enumerations surface through the same cursor.
/// Nesting is handled by opening a fresh cursor over a nested value with
/// [`Parser::sub`]; no state is shared between levels.
pub struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Cursor over a top-level config or check string.
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Open a sub-scope over a nested value.
    ///
    /// A `Struct` item is scanned without its outer brackets; any other
    /// item is scanned as-is, so scalar membership lookups share this
    /// entry point with list traversal.
    pub fn sub(item: &Item<'a>) -> Self {
        let text = match item.kind {
            ItemKind::Struct => &item.text[1..item.text.len() - 1],
            _ => item.text,
        };
        Self::new(text)
    }

    /// Pull the next key/value pair.
    ///
    /// `Ok(None)` is end of input; `Err` is malformed syntax, which is a
    /// distinct condition and terminates the scan.
    pub fn next_pair(&mut self) -> Result<Option<(Item<'a>, Item<'a>)>> {
        self.skip_separators();
        if self.pos >= self.src.len() {
            return Ok(None);
        }

        let key = self.token()?;
        self.skip_whitespace();
        let value = if self.peek() == Some(b'=') {
            self.pos += 1;
            self.skip_whitespace();
            self.token()?
        } else {
            Item::empty()
        };

        Ok(Some((key, value)))
    }

    /// Resolve the first match of `key` among the pairs of `src`.
    pub fn get_first(src: &'a str, key: &Item<'_>) -> Result<Option<Item<'a>>> {
        let mut parser = Parser::new(src);
        while let Some((k, v)) = parser.next_pair()? {
            if k.text == key.text {
                return Ok(Some(v));
            }
        }
        Ok(None)
    }

    /// Whether `candidate`'s text appears among the keys of `scope`.
    pub fn contains(scope: &Item<'a>, candidate: &Item<'_>) -> Result<bool> {
        let mut sub = Parser::sub(scope);
        while let Some((k, _)) = sub.next_pair()? {
            if k.text == candidate.text {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if !b.is_ascii_whitespace() {
                break;
            }
            self.pos += 1;
        }
    }

    fn skip_separators(&mut self) {
        while let Some(b) = self.peek() {
            if !b.is_ascii_whitespace() && b != b',' {
                break;
            }
            self.pos += 1;
        }
    }

    fn token(&mut self) -> Result<Item<'a>> {
        match self.peek() {
            Some(b'"') => self.quoted(),
            Some(b'(') | Some(b'[') | Some(b'{') => self.nested(),
            _ => self.bare(),
        }
    }

    fn quoted(&mut self) -> Result<Item<'a>> {
        let open = self.pos;
        self.pos += 1;
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == b'"' {
                let text = &self.src[start..self.pos];
                self.pos += 1;
                return Ok(Item {
                    kind: ItemKind::Str,
                    text,
                    num: 0,
                });
            }
            self.pos += 1;
        }
        Err(ParseError::UnterminatedString(open))
    }

    fn nested(&mut self) -> Result<Item<'a>> {
        let open = self.pos;
        let mut depth = 0usize;
        let mut in_quote = false;
        while let Some(b) = self.peek() {
            match b {
                b'"' => in_quote = !in_quote,
                b'(' | b'[' | b'{' if !in_quote => depth += 1,
                b')' | b']' | b'}' if !in_quote => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return Ok(Item {
                            kind: ItemKind::Struct,
                            text: &self.src[open..self.pos],
                            num: 0,
                        });
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
        Err(ParseError::UnbalancedBrackets(open))
    }

    fn bare(&mut self) -> Result<Item<'a>> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if is_delimiter(b) {
                break;
            }
            self.pos += 1;
        }

        let text = &self.src[start..self.pos];
        if text.is_empty() {
            // An empty value slot, as in `key=` or `key=,`, is fine; any
            // other empty token means a character no token can start with.
            return match self.peek() {
                None | Some(b',') => Ok(Item::empty()),
                Some(b) => Err(ParseError::UnexpectedCharacter {
                    ch: b as char,
                    pos: self.pos,
                }),
            };
        }

        classify(text, start)
    }
}

/// A token is numeric only when it is digits end to end; `123abc` is an
/// identifier.
fn classify<'a>(text: &'a str, at: usize) -> Result<Item<'a>> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        let num = text
            .parse::<i64>()
            .map_err(|_| ParseError::NumberOutOfRange(at))?;
        return Ok(Item {
            kind: ItemKind::Num,
            text,
            num,
        });
    }
    Ok(Item {
        kind: ItemKind::Id,
        text,
        num: 0,
    })
}

fn is_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace()
        || matches!(
            b,
            b',' | b'=' | b'"' | b'(' | b')' | b'[' | b']' | b'{' | b'}'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(src: &str) -> Vec<(Item<'_>, Item<'_>)> {
        let mut parser = Parser::new(src);
        let mut out = Vec::new();
        while let Some(pair) = parser.next_pair().expect("scan") {
            out.push(pair);
        }
        out
    }

    fn id(text: &str) -> Item<'_> {
        Item {
            kind: ItemKind::Id,
            text,
            num: 0,
        }
    }

    #[test]
    fn iterates_pairs_in_order() {
        let scanned = pairs("a=1, b=two, c=\"three\"");
        assert_eq!(scanned.len(), 3);

        let (k, v) = scanned[0];
        assert_eq!(k.text, "a");
        assert_eq!(v.kind, ItemKind::Num);
        assert_eq!(v.num, 1);

        let (k, v) = scanned[1];
        assert_eq!(k.text, "b");
        assert_eq!(v.kind, ItemKind::Id);
        assert_eq!(v.text, "two");

        let (k, v) = scanned[2];
        assert_eq!(k.text, "c");
        assert_eq!(v.kind, ItemKind::Str);
        assert_eq!(v.text, "three");
    }

    #[test]
    fn whitespace_separates_pairs() {
        let scanned = pairs("a=1 b=2\n\tc=3");
        assert_eq!(scanned.len(), 3);
        assert_eq!(scanned[2].0.text, "c");
        assert_eq!(scanned[2].1.num, 3);
    }

    #[test]
    fn bare_key_gets_empty_value() {
        let scanned = pairs("verbose");
        assert_eq!(scanned.len(), 1);
        assert_eq!(scanned[0].0.text, "verbose");
        assert_eq!(scanned[0].1, Item::empty());
    }

    #[test]
    fn trailing_equals_gets_empty_value() {
        let scanned = pairs("a=,b=2");
        assert_eq!(scanned[0].1, Item::empty());
        assert_eq!(scanned[1].1.num, 2);
    }

    #[test]
    fn quoted_key_is_a_string_item() {
        let scanned = pairs("\"cache size\"=5");
        assert_eq!(scanned[0].0.kind, ItemKind::Str);
        assert_eq!(scanned[0].0.text, "cache size");
        assert_eq!(scanned[0].1.num, 5);
    }

    #[test]
    fn negative_numbers_parse() {
        let scanned = pairs("offset=-12");
        assert_eq!(scanned[0].1.kind, ItemKind::Num);
        assert_eq!(scanned[0].1.num, -12);
    }

    #[test]
    fn digits_then_letters_is_an_identifier() {
        let scanned = pairs("k=123abc");
        assert_eq!(scanned[0].1.kind, ItemKind::Id);
        assert_eq!(scanned[0].1.text, "123abc");
        assert_eq!(scanned[0].1.num, 0);
    }

    #[test]
    fn lone_dash_is_an_identifier() {
        let scanned = pairs("k=-");
        assert_eq!(scanned[0].1.kind, ItemKind::Id);
    }

    #[test]
    fn oversized_number_is_an_error() {
        let mut parser = Parser::new("k=99999999999999999999");
        assert_eq!(
            parser.next_pair(),
            Err(ParseError::NumberOutOfRange(2))
        );
    }

    #[test]
    fn nested_value_spans_its_brackets() {
        let scanned = pairs("verbose=[api,evict]");
        let (_, v) = scanned[0];
        assert_eq!(v.kind, ItemKind::Struct);
        assert_eq!(v.text, "[api,evict]");

        let mut sub = Parser::sub(&v);
        let (first, first_value) = sub.next_pair().expect("scan").expect("element");
        assert_eq!(first.text, "api");
        assert_eq!(first_value, Item::empty());
        let (second, _) = sub.next_pair().expect("scan").expect("element");
        assert_eq!(second.text, "evict");
        assert_eq!(sub.next_pair().expect("scan"), None);
    }

    #[test]
    fn bracket_kinds_nest_freely() {
        let scanned = pairs("k=(a=[1,2],b={c=3})");
        let (_, v) = scanned[0];
        assert_eq!(v.text, "(a=[1,2],b={c=3})");

        let mut sub = Parser::sub(&v);
        let (_, a) = sub.next_pair().expect("scan").expect("pair");
        assert_eq!(a.text, "[1,2]");
        let (_, b) = sub.next_pair().expect("scan").expect("pair");
        assert_eq!(b.text, "{c=3}");
    }

    #[test]
    fn quotes_protect_brackets() {
        let scanned = pairs("k=[\"a]b\"]");
        let (_, v) = scanned[0];
        assert_eq!(v.kind, ItemKind::Struct);
        assert_eq!(v.text, "[\"a]b\"]");

        let mut sub = Parser::sub(&v);
        let (element, _) = sub.next_pair().expect("scan").expect("element");
        assert_eq!(element.kind, ItemKind::Str);
        assert_eq!(element.text, "a]b");
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let mut parser = Parser::new("k=\"abc");
        assert_eq!(
            parser.next_pair(),
            Err(ParseError::UnterminatedString(2))
        );
    }

    #[test]
    fn unbalanced_brackets_are_an_error() {
        let mut parser = Parser::new("k=[a,b");
        assert_eq!(
            parser.next_pair(),
            Err(ParseError::UnbalancedBrackets(2))
        );
    }

    #[test]
    fn stray_closer_is_an_error() {
        let mut parser = Parser::new("k=]");
        assert_eq!(
            parser.next_pair(),
            Err(ParseError::UnexpectedCharacter { ch: ']', pos: 2 })
        );
    }

    #[test]
    fn get_first_returns_the_first_match() {
        let found = Parser::get_first("x=1,x=2", &id("x")).expect("scan");
        assert_eq!(found.expect("found").num, 1);
    }

    #[test]
    fn get_first_misses_distinctly() {
        let found = Parser::get_first("x=1", &id("y")).expect("scan");
        assert_eq!(found, None);
    }

    #[test]
    fn contains_matches_across_spellings() {
        let scanned = pairs("choices=[\"btree\",\"lsm\"]");
        let (_, allowed) = scanned[0];

        assert!(Parser::contains(&allowed, &id("btree")).expect("scan"));
        assert!(!Parser::contains(&allowed, &id("heap")).expect("scan"));

        let quoted = Item {
            kind: ItemKind::Str,
            text: "lsm",
            num: 0,
        };
        assert!(Parser::contains(&allowed, &quoted).expect("scan"));
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(Parser::new("").next_pair(), Ok(None));
        assert_eq!(Parser::new(" ,, ").next_pair(), Ok(None));
    }
}
