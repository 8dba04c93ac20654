//! Lisp data types: the tree the reader hands back.
//!
//! A read produces a strict tree of [`Object`]s. Atoms are integers and symbols;
//! everything else is a [`Pair`] whose two slots each either hold another object
//! or are nil. Nil is not an object: it is the absence of one (`None`).
//!
//! The one exception is the top level of a read. A reader always returns an
//! object, so a top-level `()` is returned as the sentinel `Pair(nil, nil)`;
//! see [`Object::empty`].

mod objects;
pub use objects::*;
