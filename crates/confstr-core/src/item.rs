/// Lexical kind of a config item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// Decimal integer.
    Num,
    /// Bare identifier.
    Id,
    /// Double-quoted string.
    Str,
    /// Bracketed nested list.
    Struct,
}

/// One key or value lexed from a config string.
///
/// Items are views into the original input. `text` excludes the quotes of a
/// `Str` item and includes the brackets of a `Struct` item, so a list value
/// can be reported back to the caller exactly as it was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item<'a> {
    pub kind: ItemKind,
    pub text: &'a str,
    /// Numeric reading for `Num` items, 0 for everything else.
    pub num: i64,
}

impl<'a> Item<'a> {
    /// The default value of a bare key with no `=value` part.
    pub fn empty() -> Self {
        Self {
            kind: ItemKind::Id,
            text: "",
            num: 0,
        }
    }
}
