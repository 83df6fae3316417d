//! Variant tags and handler dispatch.
//!
//! Booleans and lists are variants: invoking one with a handler record runs
//! the branch named after its tag. Compiled code depends on this calling
//! convention, so the runtime reproduces it at the interpreter boundary;
//! Rust code matches on [`Value`] directly.

use std::rc::Rc;

use crate::{List, MarshalError, Value};

/// Branch names of the two variant families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    True,
    False,
    Empty,
    Head,
}

impl Tag {
    pub const ALL: [Tag; 4] = [Tag::True, Tag::False, Tag::Empty, Tag::Head];

    pub fn name(self) -> &'static str {
        match self {
            Tag::True => "True",
            Tag::False => "False",
            Tag::Empty => "Empty",
            Tag::Head => "Head",
        }
    }

    pub fn from_name(name: &str) -> Option<Tag> {
        Tag::ALL.into_iter().find(|tag| tag.name() == name)
    }

    /// The variant family this tag belongs to.
    pub fn family(self) -> &'static str {
        match self {
            Tag::True | Tag::False => "Boolean",
            Tag::Empty | Tag::Head => "List",
        }
    }

    /// Every branch a handler for this tag's family must supply.
    pub fn branches(self) -> [Tag; 2] {
        match self {
            Tag::True | Tag::False => [Tag::True, Tag::False],
            Tag::Empty | Tag::Head => [Tag::Empty, Tag::Head],
        }
    }

    pub fn of_bool(b: bool) -> Tag {
        if b { Tag::True } else { Tag::False }
    }
}

/// Fail unless the handler supplies both branches of `tag`'s family.
pub fn check_handlers(tag: Tag, has_branch: impl Fn(&str) -> bool) -> Result<(), MarshalError> {
    for branch in tag.branches() {
        if !has_branch(branch.name()) {
            return Err(MarshalError::MissingBranch {
                variant: tag.family(),
                branch: branch.name(),
            });
        }
    }
    Ok(())
}

/// Argument passed to the selected branch.
#[derive(Debug, Clone, Copy)]
pub enum Payload<'a> {
    /// `True`, `False` and `Empty` carry nothing.
    Unit,
    /// `Head` carries the element and the rest of the list.
    Pair(&'a Value, &'a Rc<List>),
}

/// A handler record: branch name to callback.
pub type Handlers<'h, T> = [(&'h str, &'h dyn Fn(Payload<'_>) -> T)];

impl Value {
    /// The variant tag, if this value is a variant.
    pub fn tag(&self) -> Option<Tag> {
        match self {
            Value::Boolean(b) => Some(Tag::of_bool(*b)),
            Value::List(list) => Some(match **list {
                List::Empty => Tag::Empty,
                List::Head(..) => Tag::Head,
            }),
            _ => None,
        }
    }

    /// Run the handler branch selected by this value's tag.
    pub fn invoke<T>(&self, handlers: &Handlers<'_, T>) -> Result<T, MarshalError> {
        let tag = self
            .tag()
            .ok_or_else(|| MarshalError::NotAVariant(self.kind().to_string()))?;
        let lookup = |name: &str| {
            handlers
                .iter()
                .find_map(|(branch, callback)| (*branch == name).then_some(*callback))
        };
        check_handlers(tag, |name| lookup(name).is_some())?;

        let payload = match self {
            Value::List(list) => match &**list {
                List::Head(head, rest) => Payload::Pair(head, rest),
                List::Empty => Payload::Unit,
            },
            _ => Payload::Unit,
        };
        let callback = lookup(tag.name()).ok_or(MarshalError::MissingBranch {
            variant: tag.family(),
            branch: tag.name(),
        })?;
        Ok(callback(payload))
    }
}
