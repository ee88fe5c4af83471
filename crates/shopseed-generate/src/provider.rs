use chrono::{NaiveDate, NaiveDateTime};

use shopseed_core::Money;

/// Semantic kinds of text a phase can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    FullName,
    FirstName,
    LastName,
    CompanyName,
    Email,
    Password,
    Phone,
    StreetAddress,
    City,
    State,
    PostalCode,
    Country,
    Url,
    ImageUrl,
    Department,
    ProductName,
    ProductDescription,
    Material,
    Color,
    Sentence,
    Paragraph,
}

/// Source of plausible field values.
///
/// Implementations only have to honour the requested kind and bounds; no
/// determinism is required beyond that.
pub trait FakeValueProvider: Send {
    fn text(&mut self, kind: TextKind) -> String;

    /// Integer in `[min, max]`.
    fn int(&mut self, min: i64, max: i64) -> i64;

    /// Amount in `[min, max]` minor units.
    fn money(&mut self, min: Money, max: Money) -> Money {
        Money(self.int(min.minor(), max.minor()))
    }

    /// `true` with `probability`.
    fn boolean(&mut self, probability: f64) -> bool;

    fn one_of(&mut self, labels: &'static [&'static str]) -> &'static str;

    /// Uppercase alphanumeric token of exactly `len` characters.
    fn token(&mut self, len: usize) -> String;

    /// Timestamp within the last `max_days` days.
    fn past(&mut self, max_days: i64) -> NaiveDateTime;

    /// Timestamp within the next `max_days` days.
    fn future(&mut self, max_days: i64) -> NaiveDateTime;

    /// Birth date for someone aged `[min_age, max_age]` years.
    fn birthdate(&mut self, min_age: u32, max_age: u32) -> NaiveDate;
}
