use std::str::FromStr;

/// Enum for a Lisp object.
///
/// Nil has no variant: slots that hold nil are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Integer(Integer),
    Symbol(Symbol),
    Pair(Pair),
}

pub type Integer = i64;

impl Object {
    /// The sentinel for an empty list read at the top level.
    ///
    /// Inside a tree the empty list is nil; this is only handed out where an
    /// object is required and nil cannot be returned.
    pub fn empty() -> Self {
        Object::Pair(Pair::default())
    }

    pub fn cons(car: Option<Object>, cdr: Option<Object>) -> Self {
        Object::Pair(Pair::cons(car, cdr))
    }

    /// Build a proper list from its elements. Returns nil for no elements.
    pub fn list(items: impl IntoIterator<Item = Option<Object>>) -> Option<Object> {
        Self::dotted(items, None)
    }

    /// Build a list from its elements, ending in `tail` rather than nil.
    pub fn dotted(
        items: impl IntoIterator<Item = Option<Object>>,
        tail: Option<Object>,
    ) -> Option<Object> {
        let items: Vec<_> = items.into_iter().collect();
        items
            .into_iter()
            .rev()
            .fold(tail, |cdr, car| Some(Object::cons(car, cdr)))
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, Object::Pair(_))
    }

    pub fn is_atom(&self) -> bool {
        !self.is_pair()
    }

    /// True for the sentinel empty pair: a pair whose slots are both nil.
    pub fn is_empty(&self) -> bool {
        matches!(self, Object::Pair(Pair { car: None, cdr: None }))
    }

    pub fn as_integer(&self) -> Option<Integer> {
        match self {
            Object::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Object::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<&Pair> {
        match self {
            Object::Pair(p) => Some(p),
            _ => None,
        }
    }

    pub fn car(&self) -> Option<&Object> {
        self.as_pair().and_then(Pair::car)
    }

    pub fn cdr(&self) -> Option<&Object> {
        self.as_pair().and_then(Pair::cdr)
    }

    /// Walk the elements of a list.
    ///
    /// Elements may be nil. Iteration stops at the first cdr that is not a pair;
    /// if that cdr is an atom (a dotted tail), it is available from
    /// [`ListIter::tail`] afterwards. The top-level sentinel iterates as empty.
    pub fn iter(&self) -> ListIter<'_> {
        ListIter {
            next: if self.is_empty() { None } else { Some(self) },
            tail: None,
        }
    }

    /// True if following cdrs from here ends in nil.
    pub fn is_proper_list(&self) -> bool {
        let mut it = self.iter();
        for _ in it.by_ref() {}
        self.is_pair() && it.tail().is_none()
    }
}

impl From<Integer> for Object {
    fn from(value: Integer) -> Self {
        Object::Integer(value)
    }
}

impl From<Symbol> for Object {
    fn from(value: Symbol) -> Self {
        Object::Symbol(value)
    }
}

impl From<Pair> for Object {
    fn from(value: Pair) -> Self {
        Object::Pair(value)
    }
}

impl TryFrom<Object> for Pair {
    type Error = Object;

    fn try_from(value: Object) -> Result<Self, Self::Error> {
        match value {
            Object::Pair(p) => Ok(p),
            _ => Err(value),
        }
    }
}

/// A cons cell. Each slot exclusively owns its subtree.
///
/// Dropping, cloning and comparing walk the cdr spine in a loop, so a list's
/// length doesn't cost stack. Drop and comparison also don't recurse into cars.
#[derive(Debug, Default)]
pub struct Pair {
    pub car: Option<Box<Object>>,
    pub cdr: Option<Box<Object>>,
}

impl Pair {
    pub fn cons(car: Option<Object>, cdr: Option<Object>) -> Self {
        Pair {
            car: car.map(Box::new),
            cdr: cdr.map(Box::new),
        }
    }

    pub fn car(&self) -> Option<&Object> {
        self.car.as_deref()
    }

    pub fn cdr(&self) -> Option<&Object> {
        self.cdr.as_deref()
    }

    pub fn set_car(&mut self, car: Option<Object>) {
        self.car = car.map(Box::new);
    }

    pub fn set_cdr(&mut self, cdr: Option<Object>) {
        self.cdr = cdr.map(Box::new);
    }

    pub fn into_parts(mut self) -> (Option<Object>, Option<Object>) {
        (self.car.take().map(|b| *b), self.cdr.take().map(|b| *b))
    }
}

impl Drop for Pair {
    fn drop(&mut self) {
        // Detach subtrees onto a worklist; each pair is emptied before it is
        // dropped, so its own drop has nothing left to do.
        let mut pending: Vec<Box<Object>> =
            self.car.take().into_iter().chain(self.cdr.take()).collect();
        while let Some(mut boxed) = pending.pop() {
            if let Object::Pair(p) = &mut *boxed {
                pending.extend(p.car.take());
                pending.extend(p.cdr.take());
            }
        }
    }
}

impl Clone for Pair {
    fn clone(&self) -> Self {
        let mut cars = Vec::new();
        let mut next = self;
        let tail = loop {
            cars.push(next.car.clone());
            match next.cdr() {
                Some(Object::Pair(p)) => next = p,
                other => break other.cloned().map(Box::new),
            }
        };

        let mut cars = cars.into_iter().rev();
        let mut cdr = tail;
        let mut last = cars.next().flatten();
        for car in cars {
            cdr = Some(Box::new(Object::Pair(Pair { car: last, cdr })));
            last = car;
        }
        Pair { car: last, cdr }
    }
}

impl PartialEq for Pair {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            for slots in [(a.car(), b.car()), (a.cdr(), b.cdr())] {
                match slots {
                    (None, None) => (),
                    (Some(Object::Pair(x)), Some(Object::Pair(y))) => pending.push((x, y)),
                    (Some(x), Some(y)) if x.is_atom() && y.is_atom() => {
                        if x != y {
                            return false;
                        }
                    }
                    _ => return false,
                }
            }
        }
        true
    }
}

impl Eq for Pair {}

/// Iterator over the elements of a list; see [`Object::iter`].
pub struct ListIter<'a> {
    next: Option<&'a Object>,
    tail: Option<&'a Object>,
}

impl<'a> ListIter<'a> {
    /// The non-pair tail the walk stopped at, if any.
    pub fn tail(&self) -> Option<&'a Object> {
        self.tail
    }
}

impl<'a> Iterator for ListIter<'a> {
    type Item = Option<&'a Object>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next.take()? {
            Object::Pair(p) => {
                self.next = p.cdr();
                Some(p.car())
            }
            atom => {
                self.tail = Some(atom);
                None
            }
        }
    }
}

/// A symbol name.
///
/// Only names the lexer could itself produce are valid:
/// identifier characters, optionally led by a sign, and never an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Wrap a name the lexer has already recognized.
    pub(crate) fn new_unchecked(name: String) -> Self {
        debug_assert!(regex::symbol().is_match(&name), "invalid symbol {name:?}");
        Symbol(name)
    }
}

impl FromStr for Symbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if regex::symbol().is_match(s) {
            Ok(Symbol(s.to_owned()))
        } else {
            Err(format!("{s:?} is not a valid symbol"))
        }
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

mod regex {
    use regex::Regex;
    use std::sync::OnceLock;

    pub(super) fn symbol() -> &'static Regex {
        static MATCH: OnceLock<Regex> = OnceLock::new();
        MATCH.get_or_init(|| {
            // A bare sign, or an optional sign followed by a non-digit
            // identifier character and then any identifier characters.
            Regex::new(r"\A(?:[+-]|[+-]?[A-Za-z<=>?!*-][A-Za-z0-9<=>?!*-]*)\z")
                .expect("could not compile regex for symbol")
        })
    }
}
