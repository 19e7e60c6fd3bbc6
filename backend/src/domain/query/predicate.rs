//! A small boolean expression language over record fields.
//!
//! Predicates are built by the domain and interpreted twice: the SQL adapter
//! translates them into Diesel expressions and the in-memory adapter evaluates
//! them with [`Predicate::matches`]. Both interpretations must agree.

/// A literal compared with [`Predicate::Eq`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Integer column value.
    Int(i32),
    /// Text column value, compared exactly.
    Text(String),
}

/// The value a record exposes for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Integer column value.
    Int(i32),
    /// Text column value.
    Text(&'a str),
}

/// Records that can be filtered by fields of type `F`.
pub trait Record<F> {
    /// Current value of `field`.
    fn value(&self, field: F) -> FieldValue<'_>;
}

/// Filter expression over fields of type `F`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate<F> {
    /// Matches every record.
    True,
    /// Matches nothing.
    False,
    /// Field equals the literal.
    Eq(F, Literal),
    /// Field contains at least one of the terms, ignoring case.
    ContainsAny(F, Vec<String>),
    /// Every child matches. Empty is true.
    And(Vec<Predicate<F>>),
    /// Some child matches. Empty is false.
    Or(Vec<Predicate<F>>),
}

impl<F: Copy> Predicate<F> {
    /// Integer equality.
    pub fn eq_int(field: F, value: i32) -> Self {
        Self::Eq(field, Literal::Int(value))
    }

    /// Text equality.
    pub fn eq_text(field: F, value: impl Into<String>) -> Self {
        Self::Eq(field, Literal::Text(value.into()))
    }

    /// Conjunction that drops `True` children and collapses on `False`.
    ///
    /// # Examples
    /// ```
    /// use docvault::domain::query::Predicate;
    ///
    /// let p: Predicate<u8> = Predicate::all([Predicate::True, Predicate::eq_int(0, 3)]);
    /// assert_eq!(p, Predicate::eq_int(0, 3));
    /// ```
    pub fn all(children: impl IntoIterator<Item = Self>) -> Self {
        let mut kept = Vec::new();
        for child in children {
            match child {
                Self::True => {}
                Self::False => return Self::False,
                other => kept.push(other),
            }
        }
        match kept.len() {
            0 => Self::True,
            1 => kept.pop().unwrap_or(Self::True),
            _ => Self::And(kept),
        }
    }

    /// Disjunction that drops `False` children and collapses on `True`.
    pub fn any(children: impl IntoIterator<Item = Self>) -> Self {
        let mut kept = Vec::new();
        for child in children {
            match child {
                Self::False => {}
                Self::True => return Self::True,
                other => kept.push(other),
            }
        }
        match kept.len() {
            0 => Self::False,
            1 => kept.pop().unwrap_or(Self::False),
            _ => Self::Or(kept),
        }
    }

    /// Evaluate the predicate against a record.
    pub fn matches<R: Record<F>>(&self, record: &R) -> bool {
        match self {
            Self::True => true,
            Self::False => false,
            Self::Eq(field, literal) => match (record.value(*field), literal) {
                (FieldValue::Int(actual), Literal::Int(expected)) => actual == *expected,
                (FieldValue::Text(actual), Literal::Text(expected)) => actual == expected,
                _ => false,
            },
            Self::ContainsAny(field, terms) => match record.value(*field) {
                FieldValue::Text(actual) => {
                    let haystack = actual.to_lowercase();
                    terms
                        .iter()
                        .any(|term| haystack.contains(term.to_lowercase().as_str()))
                }
                FieldValue::Int(_) => false,
            },
            Self::And(children) => children.iter().all(|child| child.matches(record)),
            Self::Or(children) => children.iter().any(|child| child.matches(record)),
        }
    }
}
