//! Currency-tagged exact decimal amounts.
//!
//! `Money` is never negative. Arithmetic is only defined between amounts in
//! the same currency; a breach of either rule is reported as a validation
//! failure instead of a panic so callers can keep composing results.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DomainError, DomainResult};

/// Supported settlement currencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    #[default]
    Egp,
    Rub,
    Aed,
}

impl Currency {
    /// ISO 4217 code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Egp => "EGP",
            Self::Rub => "RUB",
            Self::Aed => "AED",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "EGP" => Ok(Self::Egp),
            "RUB" => Ok(Self::Rub),
            "AED" => Ok(Self::Aed),
            other => Err(DomainError::invalid_field(
                "currency",
                format!("unsupported currency {other}"),
            )),
        }
    }
}

/// Non-negative amount of a single currency.
///
/// # Examples
/// ```
/// use healthcore::domain::{Currency, Money};
/// use rust_decimal::Decimal;
///
/// let fee = Money::new(Decimal::new(15000, 2), Currency::Egp)?;
/// let doubled = fee.times(Decimal::from(2))?;
/// assert_eq!(doubled.amount(), Decimal::from(300));
/// # Ok::<(), healthcore::domain::DomainError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MoneyDraft")]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

/// Unvalidated wire form of [`Money`].
#[derive(Deserialize)]
struct MoneyDraft {
    amount: Decimal,
    currency: Currency,
}

impl TryFrom<MoneyDraft> for Money {
    type Error = DomainError;

    fn try_from(draft: MoneyDraft) -> Result<Self, Self::Error> {
        Self::new(draft.amount, draft.currency)
    }
}

impl Money {
    /// Validate and construct an amount.
    pub fn new(amount: Decimal, currency: Currency) -> DomainResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::invalid_field(
                "amount",
                "Money amount cannot be negative",
            ));
        }
        Ok(Self { amount, currency })
    }

    /// Whole units of `currency`.
    pub fn from_units(units: u64, currency: Currency) -> Self {
        Self {
            amount: Decimal::from(units),
            currency,
        }
    }

    /// Construct from an amount the caller has already proven non-negative.
    pub(crate) const fn from_non_negative(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Zero in `currency`.
    pub const fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    pub const fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Sum of two amounts in the same currency.
    pub fn plus(&self, other: &Self) -> DomainResult<Self> {
        self.ensure_same_currency(other, "add")?;
        Ok(Self {
            amount: self.amount + other.amount,
            currency: self.currency,
        })
    }

    /// Difference of two amounts in the same currency; never goes negative.
    pub fn minus(&self, other: &Self) -> DomainResult<Self> {
        self.ensure_same_currency(other, "subtract")?;
        if self.amount < other.amount {
            return Err(DomainError::invalid_field("amount", "Insufficient funds"));
        }
        Ok(Self {
            amount: self.amount - other.amount,
            currency: self.currency,
        })
    }

    /// Difference floored at zero.
    pub fn saturating_minus(&self, other: &Self) -> DomainResult<Self> {
        self.ensure_same_currency(other, "subtract")?;
        let amount = if self.amount > other.amount {
            self.amount - other.amount
        } else {
            Decimal::ZERO
        };
        Ok(Self {
            amount,
            currency: self.currency,
        })
    }

    /// Scale by a non-negative multiplier.
    pub fn times(&self, multiplier: Decimal) -> DomainResult<Self> {
        Self::new(self.amount * multiplier, self.currency)
    }

    /// Sum `amounts`, starting from zero in `currency`.
    pub fn sum<'a>(
        currency: Currency,
        amounts: impl IntoIterator<Item = &'a Money>,
    ) -> DomainResult<Self> {
        amounts
            .into_iter()
            .try_fold(Self::zero(currency), |acc, next| acc.plus(next))
    }

    fn ensure_same_currency(&self, other: &Self, operation: &str) -> DomainResult<()> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(DomainError::invalid_field(
                "currency",
                format!(
                    "Cannot {operation} different currencies ({} and {})",
                    self.currency, other.currency
                ),
            ))
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount.round_dp(2), self.currency)
    }
}
