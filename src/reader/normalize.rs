//! Collapsing empty cells into nil.
//!
//! A cell whose car and cdr are both nil is treated as a placeholder for nil,
//! as produced by builders that pre-allocate the next cell of a list before
//! knowing whether the list continues. [`normalize`] removes such cells
//! bottom-up; [`promote`] is the inverse step at the top level of a read.

use crate::data::{Object, Pair};

/// Replace every pair whose slots are both nil, after normalizing its
/// children, with nil. Atoms are left untouched.
///
/// Normalizing an already-normalized tree returns it unchanged.
pub fn normalize(slot: Option<Box<Object>>) -> Option<Box<Object>> {
    // Unzip the cdr spine so long lists don't recurse once per element.
    let mut cars = Vec::new();
    let mut rest = slot;
    let tail = loop {
        match rest.map(|boxed| *boxed) {
            Some(Object::Pair(mut pair)) => {
                cars.push(pair.car.take());
                rest = pair.cdr.take();
            }
            Some(atom) => break Some(Box::new(atom)),
            None => break None,
        }
    };

    cars.into_iter().rev().fold(tail, |cdr, car| {
        let car = normalize(car);
        if car.is_none() && cdr.is_none() {
            None
        } else {
            Some(Box::new(Object::Pair(Pair { car, cdr })))
        }
    })
}

/// Make a nil result into the sentinel empty pair, so a top-level read always
/// yields an object.
pub fn promote(object: Option<Object>) -> Object {
    object.unwrap_or_else(Object::empty)
}

impl Object {
    /// Normalize this tree; see [`normalize`].
    pub fn normalized(self) -> Option<Object> {
        normalize(Some(Box::new(self))).map(|boxed| *boxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(i: i64) -> Option<Object> {
        Some(Object::Integer(i))
    }

    /// (1 2) built the placeholder way: every element's cdr is a fresh cell,
    /// and the last one is left empty.
    fn with_placeholders() -> Object {
        let last = Object::cons(None, None);
        let two = Object::cons(int(2), Some(last));
        Object::cons(int(1), Some(two))
    }

    #[test]
    fn collapses_trailing_placeholder() {
        let got = with_placeholders().normalized();
        assert_eq!(got, Object::list([int(1), int(2)]));
    }

    #[test]
    fn collapses_nested_placeholders() {
        // ((1 <empty>) <empty>): the inner list keeps its element, the outer tail goes.
        let inner = Object::cons(int(1), Some(Object::empty()));
        let outer = Object::cons(Some(inner), Some(Object::empty()));
        let want = Object::list([Object::list([int(1)])]);
        assert_eq!(outer.normalized(), want);
    }

    #[test]
    fn fully_empty_collapses_to_nil() {
        let nested = Object::cons(Some(Object::empty()), Some(Object::empty()));
        assert_eq!(nested.normalized(), None);
        assert_eq!(Object::empty().normalized(), None);
        assert_eq!(promote(Object::empty().normalized()), Object::empty());
    }

    #[test]
    fn atoms_untouched() {
        let sym = Object::Symbol("x".parse().unwrap());
        assert_eq!(sym.clone().normalized(), Some(sym));
        assert_eq!(Object::Integer(0).normalized(), int(0));

        let dotted = Object::cons(int(1), int(2));
        assert_eq!(dotted.clone().normalized(), Some(dotted));
    }

    #[test]
    fn idempotent() {
        for tree in [
            with_placeholders(),
            Object::cons(Some(with_placeholders()), Some(Object::empty())),
            Object::dotted([int(1), Some(Object::empty())], int(3)).unwrap(),
            Object::empty(),
            Object::Integer(5),
        ] {
            let once = tree.normalized();
            let twice = once.clone().and_then(Object::normalized);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn many_elements() {
        let list = Object::list((0..200_000).map(int)).unwrap();
        assert_eq!(list.clone().normalized(), Some(list));
    }
}
