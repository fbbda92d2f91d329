//! Array iterators.
//!
//! Each iterator is bound to one array and carries its own position, so
//! any number of iterations may be in progress at once.

use crate::value::Value;

/// Iterator over the elements of an array.
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    items: &'a [Value],
}

impl<'a> Iter<'a> {
    pub(crate) fn new(items: &'a [Value]) -> Self {
        Iter { items }
    }

    /// Elements not yet yielded from either end.
    pub fn remaining(&self) -> &'a [Value] {
        self.items
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<&'a Value> {
        let (first, rest) = self.items.split_first()?;
        self.items = rest;
        Some(first)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.items.len(), Some(self.items.len()))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let (last, rest) = self.items.split_last()?;
        self.items = rest;
        Some(last)
    }
}

impl ExactSizeIterator for Iter<'_> {}

/// Iterator over mutable references to the elements of an array.
#[derive(Debug)]
pub struct IterMut<'a> {
    inner: std::slice::IterMut<'a, Value>,
}

impl<'a> IterMut<'a> {
    pub(crate) fn new(items: &'a mut [Value]) -> Self {
        IterMut {
            inner: items.iter_mut(),
        }
    }
}

impl<'a> Iterator for IterMut<'a> {
    type Item = &'a mut Value;

    fn next(&mut self) -> Option<&'a mut Value> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for IterMut<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for IterMut<'_> {}
