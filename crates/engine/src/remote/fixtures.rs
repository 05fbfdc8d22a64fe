//! Deterministic sample data for demos, seeding, and the drift generator.

use motorpool_core::{Car, CarDraft, CarId, Email, Snapshot, User, UserDraft, UserId};

/// First names the drift generator invents users from.
pub const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Bob", "Alice", "Peter", "Paul", "Mary", "Mark", "Luke", "Andrew", "David",
    "Daniel", "Matthew", "Noah", "Ethan", "Ryan",
];

/// Last names the drift generator invents users from.
pub const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Jones", "Brown", "Davis", "Miller", "Wilson", "Moore",
    "Taylor", "Anderson", "Clark", "Walker", "Young",
];

/// Email domains for invented users.
pub const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "mail.test", "fleet.test"];

/// Makes and models the drift generator invents cars from.
pub const MAKES_AND_MODELS: &[(&str, &[&str])] = &[
    ("BMW", &["3er", "5er", "M3", "M5", "X3", "X5"]),
    ("Mercedes", &["C 200", "C 300", "E 200", "E 300", "GLC"]),
    ("Audi", &["A3", "A4", "A6", "Q5", "Q7"]),
    ("Volkswagen", &["Golf", "Passat", "Tiguan", "Polo"]),
    ("Volvo", &["V60", "V90", "XC40", "XC60"]),
    ("Toyota", &["Yaris", "Corolla", "RAV4", "Prius"]),
    ("Ford", &["Fiesta", "Focus", "Mustang", "Kuga"]),
    ("Skoda", &["Fabia", "Octavia", "Superb", "Kodiaq"]),
];

fn email(s: &str) -> Email {
    Email::parse(s).expect("fixture email is valid")
}

fn user(first_name: &str, last_name: &str, address: &str) -> User {
    UserDraft {
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email: email(address),
    }
    .with_id(UserId::generate())
}

fn car(make: &str, model: &str, year: u16) -> Car {
    CarDraft {
        make: make.to_owned(),
        model: model.to_owned(),
        year,
    }
    .with_id(CarId::generate())
}

/// The demo's initial users.
#[must_use]
pub fn seed_users() -> Vec<User> {
    vec![
        user("John", "Doe", "john.doe@example.com"),
        user("Jane", "Doe", "jane.doe@example.com"),
        user("John", "Smith", "john.smith@example.org"),
        user("Jane", "Smith", "jane.smith@mail.test"),
    ]
}

/// The demo's initial cars, all free.
#[must_use]
pub fn seed_cars() -> Vec<Car> {
    vec![
        car("BMW", "M3", 2018),
        car("BMW", "M5", 2019),
        car("Audi", "A4", 2017),
        car("Audi", "A6", 2018),
        car("Mercedes", "C 200", 2018),
        car("Mercedes", "C 300", 2019),
        car("Mercedes", "E 200", 2017),
        car("Mercedes", "E 300", 2018),
    ]
}

/// The full seed state: four users, eight free cars, no bindings.
#[must_use]
pub fn seed_snapshot() -> Snapshot {
    Snapshot {
        users: seed_users(),
        cars: seed_cars(),
        bindings: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_emails_are_unique() {
        let users = seed_users();
        for (i, a) in users.iter().enumerate() {
            for b in users.iter().skip(i + 1) {
                assert_ne!(a.email, b.email);
            }
        }
    }

    #[test]
    fn test_seed_cars_start_free() {
        let snapshot = seed_snapshot();
        assert_eq!(snapshot.free_cars().len(), snapshot.cars.len());
    }
}
