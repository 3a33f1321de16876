use confstr_core::{Item, ItemKind, Parser};

use crate::errors::ValidationError;

/// Kinds of constraint recognized in a check string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckKind {
    Type,
    Min,
    Max,
    Choices,
}

impl CheckKind {
    fn resolve(name: &str) -> Option<Self> {
        match name {
            "type" => Some(Self::Type),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "choices" => Some(Self::Choices),
            _ => None,
        }
    }
}

/// Check every key in an application-supplied config string against the
/// constraints declared for it in `checks`.
///
/// Validation is fail-fast: the first violated constraint for the first
/// offending key terminates the pass. Constraints run in the order the
/// check string declares them. An empty `config` always succeeds, whatever
/// `checks` contains.
///
/// `min` and `max` compare numeric readings, which are 0 for non-numeric
/// values; check strings are expected to pair bounds with `type=int`, which
/// reports the more precise mismatch when declared first.
///
/// # Panics
///
/// Panics on a constraint name other than `type`, `min`, `max` or
/// `choices`. Check strings are produced by trusted schema tooling, so an
/// unrecognized constraint is a programming error, not an input error.
pub fn validate<'a>(checks: &'a str, config: &'a str) -> Result<(), ValidationError<'a>> {
    if config.is_empty() {
        return Ok(());
    }

    let mut pairs = Parser::new(config);
    while let Some((key, value)) = pairs.next_pair()? {
        if key.kind != ItemKind::Id && key.kind != ItemKind::Str {
            return Err(ValidationError::MalformedKey { key: key.text });
        }

        let group = Parser::get_first(checks, &key)?
            .ok_or(ValidationError::UnknownKey { key: key.text })?;

        let mut constraints = Parser::sub(&group);
        while let Some((name, entry)) = constraints.next_pair()? {
            let Some(kind) = CheckKind::resolve(name.text) else {
                panic!("unrecognized constraint '{}' in check string", name.text);
            };
            match kind {
                CheckKind::Type => check_type(&key, &entry, &value)?,
                CheckKind::Min => {
                    if value.num < entry.num {
                        return Err(ValidationError::BelowMinimum {
                            key: key.text,
                            value: value.num,
                            min: entry.num,
                        });
                    }
                }
                CheckKind::Max => {
                    if value.num > entry.num {
                        return Err(ValidationError::AboveMaximum {
                            key: key.text,
                            value: value.num,
                            max: entry.num,
                        });
                    }
                }
                CheckKind::Choices => check_choices(&key, &entry, &value)?,
            }
        }
    }

    Ok(())
}

/// Declared types the checker does not constrain, such as `string`, pass
/// without inspection.
fn check_type<'a>(
    key: &Item<'a>,
    expected: &Item<'a>,
    value: &Item<'a>,
) -> Result<(), ValidationError<'a>> {
    let ok = match expected.text {
        "int" => value.kind == ItemKind::Num,
        "boolean" => value.kind == ItemKind::Num && (value.num == 0 || value.num == 1),
        "list" => value.kind == ItemKind::Struct,
        _ => true,
    };

    if ok {
        Ok(())
    } else {
        Err(ValidationError::TypeMismatch {
            key: key.text,
            expected: expected.text,
            value: value.text,
        })
    }
}

/// Scalar values must be members of the permitted set; list values need
/// every element to be a member, and at least one element to exist. The
/// empty list fails by policy: no element ever confirms membership. Errors
/// report the whole configured value, brackets included for lists.
fn check_choices<'a>(
    key: &Item<'a>,
    allowed: &Item<'a>,
    value: &Item<'a>,
) -> Result<(), ValidationError<'a>> {
    let ok = match value.kind {
        ItemKind::Struct => {
            let mut elements = Parser::sub(value);
            let mut seen = false;
            let mut member = true;
            while member {
                match elements.next_pair()? {
                    Some((element, _)) => {
                        seen = true;
                        member = Parser::contains(allowed, &element)?;
                    }
                    None => break,
                }
            }
            seen && member
        }
        _ => Parser::contains(allowed, value)?,
    };

    if ok {
        Ok(())
    } else {
        Err(ValidationError::InvalidChoice {
            key: key.text,
            value: value.text,
        })
    }
}
