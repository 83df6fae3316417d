//! Cons lists.

use std::rc::Rc;

use crate::equality::{Equality, KeySetPolicy};
use crate::Value;

/// A cons list, always terminated by exactly one `Empty`.
#[derive(Debug, Clone)]
pub enum List {
    Empty,
    Head(Value, Rc<List>),
}

impl List {
    /// Build a list from a host sequence. The first element becomes the
    /// outermost `Head`.
    pub fn from_array(items: Vec<Value>) -> List {
        items
            .into_iter()
            .rev()
            .fold(List::Empty, |rest, item| List::Head(item, Rc::new(rest)))
    }

    /// Fold `items` onto an existing tail, keeping their order.
    pub fn prepend_all(items: Vec<Value>, tail: Rc<List>) -> Rc<List> {
        items
            .into_iter()
            .rev()
            .fold(tail, |rest, item| Rc::new(List::Head(item, rest)))
    }

    pub fn cons(head: Value, tail: List) -> List {
        List::Head(head, Rc::new(tail))
    }

    /// Copy the elements into a host sequence.
    pub fn to_array(&self) -> Vec<Value> {
        self.iter().cloned().collect()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { cursor: self }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, List::Empty)
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        Equality::new(KeySetPolicy::Exact).lists(self, other)
    }
}

/// Unlinks the spine cell by cell so that long lists drop without deep
/// recursion. Stops at the first tail that is still shared.
impl Drop for List {
    fn drop(&mut self) {
        let List::Head(_, rest) = self else {
            return;
        };
        let mut next = std::mem::replace(rest, Rc::new(List::Empty));
        while let Ok(mut cell) = Rc::try_unwrap(next) {
            match &mut cell {
                List::Head(_, rest) => next = std::mem::replace(rest, Rc::new(List::Empty)),
                List::Empty => break,
            }
        }
    }
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        List::from_array(iter.into_iter().collect())
    }
}

/// Borrowing iterator over list elements.
pub struct Iter<'a> {
    cursor: &'a List,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        match self.cursor {
            List::Empty => None,
            List::Head(item, rest) => {
                self.cursor = &**rest;
                Some(item)
            }
        }
    }
}
