//! Reader for a minimal Lisp: text in, a tree of atoms and cons cells out.
//!
//! ```
//! use consread::data::Object;
//!
//! let list = consread::read("(1 2 . 3)").unwrap();
//! assert_eq!(list.car(), Some(&Object::Integer(1)));
//! ```

pub mod data;
pub mod reader;

pub use reader::{read, read_from, ReadErr, ReadResult, Reader};
