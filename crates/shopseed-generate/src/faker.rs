use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, CountryName, StateName, StreetName, ZipCode};
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::Password;
use fake::faker::lorem::en::{Paragraph, Sentence, Word};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use rand::Rng;
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_chacha::ChaCha8Rng;

use crate::provider::{FakeValueProvider, TextKind};

const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

const DOMAIN_SUFFIXES: &[&str] = &["com", "net", "org", "io", "shop", "store"];

const DEPARTMENTS: &[&str] = &[
    "Books", "Movies", "Music", "Games", "Electronics", "Computers", "Home", "Garden",
    "Tools", "Grocery", "Health", "Beauty", "Toys", "Kids", "Baby", "Clothing", "Shoes",
    "Jewelery", "Sports", "Outdoors", "Automotive", "Industrial",
];

const PRODUCT_ADJECTIVES: &[&str] = &[
    "Small", "Ergonomic", "Rustic", "Intelligent", "Gorgeous", "Incredible", "Fantastic",
    "Practical", "Sleek", "Awesome", "Generic", "Handcrafted", "Handmade", "Licensed",
    "Refined", "Unbranded", "Tasty",
];

const MATERIALS: &[&str] = &[
    "Steel", "Wooden", "Concrete", "Plastic", "Cotton", "Granite", "Rubber", "Metal", "Soft",
    "Fresh", "Frozen", "Bronze", "Marble", "Ceramic", "Silk",
];

const PRODUCTS: &[&str] = &[
    "Chair", "Car", "Computer", "Keyboard", "Mouse", "Bike", "Ball", "Gloves", "Pants",
    "Shirt", "Table", "Shoes", "Hat", "Towels", "Soap", "Tuna", "Chicken", "Fish", "Cheese",
    "Bacon", "Pizza", "Salad", "Sausages", "Chips",
];

const COLORS: &[&str] = &[
    "red", "orange", "yellow", "green", "blue", "indigo", "violet", "black", "white", "gray",
    "silver", "gold", "pink", "purple", "teal", "maroon", "olive", "navy",
];

/// `FakeValueProvider` backed by the `fake` crate and a seeded ChaCha RNG.
pub struct FakeRsProvider {
    rng: ChaCha8Rng,
    now: NaiveDateTime,
}

impl FakeRsProvider {
    /// `now` anchors every relative date so a seed reproduces a run.
    pub fn new(seed: u64, now: NaiveDateTime) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            now,
        }
    }

    fn pick(&mut self, values: &'static [&'static str]) -> &'static str {
        values.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn seconds_within(&mut self, max_days: i64) -> i64 {
        let span = max_days.max(0) * 86_400;
        if span == 0 {
            return 0;
        }
        self.rng.random_range(1..=span)
    }
}

impl FakeValueProvider for FakeRsProvider {
    fn text(&mut self, kind: TextKind) -> String {
        let rng = &mut self.rng;
        match kind {
            TextKind::FullName => Name().fake_with_rng(rng),
            TextKind::FirstName => FirstName().fake_with_rng(rng),
            TextKind::LastName => LastName().fake_with_rng(rng),
            TextKind::CompanyName => CompanyName().fake_with_rng(rng),
            TextKind::Email => {
                let first: String = FirstName().fake_with_rng(rng);
                let last: String = LastName().fake_with_rng(rng);
                let suffix = self.token(6).to_lowercase();
                format!(
                    "{}.{}.{suffix}@example.com",
                    slug(&first),
                    slug(&last)
                )
            }
            TextKind::Password => Password(10..20).fake_with_rng(rng),
            TextKind::Phone => PhoneNumber().fake_with_rng(rng),
            TextKind::StreetAddress => {
                let number: String = BuildingNumber().fake_with_rng(rng);
                let street: String = StreetName().fake_with_rng(rng);
                format!("{number} {street}")
            }
            TextKind::City => CityName().fake_with_rng(rng),
            TextKind::State => StateName().fake_with_rng(rng),
            TextKind::PostalCode => ZipCode().fake_with_rng(rng),
            TextKind::Country => CountryName().fake_with_rng(rng),
            TextKind::Url => {
                let word: String = Word().fake_with_rng(rng);
                let suffix = self.pick(DOMAIN_SUFFIXES);
                format!("https://www.{}.{suffix}", slug(&word))
            }
            TextKind::ImageUrl => {
                let seed = self.token(8).to_lowercase();
                format!("https://picsum.photos/seed/{seed}/640/480")
            }
            TextKind::Department => self.pick(DEPARTMENTS).to_string(),
            TextKind::ProductName => {
                let adjective = self.pick(PRODUCT_ADJECTIVES);
                let material = self.pick(MATERIALS);
                let product = self.pick(PRODUCTS);
                format!("{adjective} {material} {product}")
            }
            TextKind::ProductDescription => Sentence(8..16).fake_with_rng(rng),
            TextKind::Material => self.pick(MATERIALS).to_string(),
            TextKind::Color => self.pick(COLORS).to_string(),
            TextKind::Sentence => Sentence(4..10).fake_with_rng(rng),
            TextKind::Paragraph => Paragraph(2..5).fake_with_rng(rng),
        }
    }

    fn int(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    fn boolean(&mut self, probability: f64) -> bool {
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }

    fn one_of(&mut self, labels: &'static [&'static str]) -> &'static str {
        self.pick(labels)
    }

    fn token(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| {
                let idx = self.rng.random_range(0..TOKEN_CHARSET.len());
                TOKEN_CHARSET[idx] as char
            })
            .collect()
    }

    fn past(&mut self, max_days: i64) -> NaiveDateTime {
        let seconds = self.seconds_within(max_days);
        self.now - Duration::seconds(seconds)
    }

    fn future(&mut self, max_days: i64) -> NaiveDateTime {
        let seconds = self.seconds_within(max_days);
        self.now + Duration::seconds(seconds)
    }

    fn birthdate(&mut self, min_age: u32, max_age: u32) -> NaiveDate {
        let today = self.now.date();
        let (min_age, max_age) = (min_age.min(max_age), min_age.max(max_age));
        // Born after `earliest` and on or before `latest`.
        let latest = years_before(today, min_age);
        let earliest = years_before(today, max_age + 1) + Duration::days(1);
        let span = (latest - earliest).num_days().max(0);
        earliest + Duration::days(self.rng.random_range(0..=span))
    }
}

fn years_before(date: NaiveDate, years: u32) -> NaiveDate {
    let year = date.year() - years as i32;
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), 28))
        .unwrap_or(date)
}

fn slug(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn provider(seed: u64) -> FakeRsProvider {
        let now = NaiveDate::from_ymd_opt(2024, 6, 15)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid timestamp");
        FakeRsProvider::new(seed, now)
    }

    #[test]
    fn ints_stay_in_bounds() {
        let mut fake = provider(1);
        for _ in 0..500 {
            let value = fake.int(0, 100);
            assert!((0..=100).contains(&value));
        }
        assert_eq!(fake.int(7, 7), 7);
    }

    #[test]
    fn tokens_are_uppercase_alphanumeric() {
        let mut fake = provider(2);
        let token = fake.token(8);
        assert_eq!(token.len(), 8);
        assert!(token.bytes().all(|b| TOKEN_CHARSET.contains(&b)));
    }

    #[test]
    fn dates_respect_direction() {
        let mut fake = provider(3);
        let now = fake.now;
        for _ in 0..100 {
            let past = fake.past(30);
            assert!(past < now && now - past <= Duration::days(30));
            let future = fake.future(365);
            assert!(future > now && future - now <= Duration::days(365));
        }
    }

    #[test]
    fn birthdates_match_age_bounds() {
        let mut fake = provider(4);
        let today = fake.now.date();
        for _ in 0..200 {
            let born = fake.birthdate(18, 70);
            let age = today.years_since(born).expect("born in the past");
            assert!((18..=70).contains(&age), "age {age}");
        }
    }

    #[test]
    fn same_seed_same_values() {
        let mut a = provider(9);
        let mut b = provider(9);
        assert_eq!(a.text(TextKind::CompanyName), b.text(TextKind::CompanyName));
        assert_eq!(a.text(TextKind::Email), b.text(TextKind::Email));
        assert_eq!(a.int(0, 1_000_000), b.int(0, 1_000_000));
    }

    #[test]
    fn emails_look_like_emails() {
        let mut fake = provider(5);
        let email = fake.text(TextKind::Email);
        assert!(email.ends_with("@example.com"));
        assert!(!email.contains(' '));
    }
}
