//! Declarative validation rules and composable specifications.
//!
//! [`Validator`] evaluates an ordered list of rules and reports the first
//! failure. [`Specification`] models a reusable predicate that carries its
//! own failure message and composes with `and`, `or` and `not`.

use super::{DomainError, DomainResult};

type RuleFn<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

struct Rule<T> {
    message: String,
    field: Option<&'static str>,
    predicate: RuleFn<T>,
}

/// Ordered fail-fast rule set.
///
/// # Examples
/// ```
/// use healthcore::domain::Validator;
///
/// let validator = Validator::<u32>::new()
///     .rule("must be positive", |n| *n > 0)
///     .rule("must be even", |n| n % 2 == 0);
///
/// assert!(validator.validate(4).is_ok());
/// let err = validator.validate(3).expect_err("odd");
/// assert_eq!(err.message(), "must be even");
/// ```
pub struct Validator<T> {
    rules: Vec<Rule<T>>,
}

impl<T> Default for Validator<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T> Validator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule; rules run in insertion order.
    pub fn rule(
        mut self,
        message: impl Into<String>,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.rules.push(Rule {
            message: message.into(),
            field: None,
            predicate: Box::new(predicate),
        });
        self
    }

    /// Append a rule whose failure is attributed to `field`.
    pub fn field_rule(
        mut self,
        field: &'static str,
        message: impl Into<String>,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.rules.push(Rule {
            message: message.into(),
            field: Some(field),
            predicate: Box::new(predicate),
        });
        self
    }

    /// Return `value` untouched when every rule holds.
    pub fn validate(&self, value: T) -> DomainResult<T> {
        match self.rules.iter().find(|rule| !(rule.predicate)(&value)) {
            None => Ok(value),
            Some(Rule {
                message,
                field: Some(field),
                ..
            }) => Err(DomainError::invalid_field(*field, message.clone())),
            Some(Rule { message, .. }) => Err(DomainError::validation(message.clone())),
        }
    }
}

/// Predicate over `T` with a human-readable failure message.
pub trait Specification<T> {
    fn is_satisfied_by(&self, candidate: &T) -> bool;

    fn error_message(&self) -> String;

    /// Both specifications must hold.
    fn and<S>(self, other: S) -> And<Self, S>
    where
        Self: Sized,
        S: Specification<T>,
    {
        And(self, other)
    }

    /// At least one specification must hold.
    fn or<S>(self, other: S) -> Or<Self, S>
    where
        Self: Sized,
        S: Specification<T>,
    {
        Or(self, other)
    }

    /// Invert this specification.
    fn not(self) -> Not<Self>
    where
        Self: Sized,
    {
        Not(self)
    }
}

/// Conjunction of two specifications.
#[derive(Debug, Clone)]
pub struct And<A, B>(A, B);

/// Disjunction of two specifications.
#[derive(Debug, Clone)]
pub struct Or<A, B>(A, B);

/// Negation of a specification.
#[derive(Debug, Clone)]
pub struct Not<A>(A);

impl<T, A, B> Specification<T> for And<A, B>
where
    A: Specification<T>,
    B: Specification<T>,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.0.is_satisfied_by(candidate) && self.1.is_satisfied_by(candidate)
    }

    fn error_message(&self) -> String {
        format!("{} AND {}", self.0.error_message(), self.1.error_message())
    }
}

impl<T, A, B> Specification<T> for Or<A, B>
where
    A: Specification<T>,
    B: Specification<T>,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.0.is_satisfied_by(candidate) || self.1.is_satisfied_by(candidate)
    }

    fn error_message(&self) -> String {
        format!("{} OR {}", self.0.error_message(), self.1.error_message())
    }
}

impl<T, A> Specification<T> for Not<A>
where
    A: Specification<T>,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        !self.0.is_satisfied_by(candidate)
    }

    fn error_message(&self) -> String {
        format!("NOT {}", self.0.error_message())
    }
}

/// Specification backed by a closure.
#[derive(Clone)]
pub struct Predicate<F> {
    message: String,
    test: F,
}

impl<F> std::fmt::Debug for Predicate<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predicate")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl<T, F> Specification<T> for Predicate<F>
where
    F: Fn(&T) -> bool,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        (self.test)(candidate)
    }

    fn error_message(&self) -> String {
        self.message.clone()
    }
}

/// Build a specification from a message and a closure.
///
/// # Examples
/// ```
/// use healthcore::domain::{spec, Specification};
///
/// let positive = spec("positive", |n: &i32| *n > 0);
/// let small = spec("small", |n: &i32| *n < 10);
/// let either = positive.or(small);
///
/// assert!(either.is_satisfied_by(&-3));
/// assert_eq!(either.error_message(), "positive OR small");
/// ```
pub fn spec<T, F>(message: impl Into<String>, test: F) -> Predicate<F>
where
    F: Fn(&T) -> bool,
{
    Predicate {
        message: message.into(),
        test,
    }
}

/// Check `value` against `specification`, reporting its message on failure.
pub fn satisfy<T, S>(value: T, specification: &S) -> DomainResult<T>
where
    S: Specification<T>,
{
    if specification.is_satisfied_by(&value) {
        Ok(value)
    } else {
        Err(DomainError::validation(specification.error_message()))
    }
}
