//! Guestbook - End-to-End Adapter Example
//!
//! This example demonstrates the full adapter flow against a real SQLite
//! database:
//! - Declaring an entity with `#[derive(Entity)]`
//! - Validation running before any statement is generated
//! - Chained filtering, ordering and paging
//! - Snake-case table and column inference
//!
//! Run with: cargo run --example guestbook

use quarry::{Adapter, Case, Config, Entity, Validate, Verbosity};
use quarry_derive::Entity;
use quarry_sqlite::SqliteDatabase;

/// One signed guestbook entry.
#[derive(Debug, Default, Entity)]
pub struct Entry {
    #[entity(primary_key)]
    pub id: i64,
    pub author: String,
    pub message: String,
    pub stars: i64,
    #[entity(persisted)]
    saved: bool,
}

impl Validate for Entry {
    fn validate(&self) -> quarry::Result<()> {
        if self.author.is_empty() {
            return Err(quarry::Error::Validation(String::from(
                "entries must be signed",
            )));
        }
        if !(1..=5).contains(&self.stars) {
            return Err(quarry::Error::Validation(String::from(
                "stars must be between 1 and 5",
            )));
        }
        Ok(())
    }
}

fn entry(id: i64, author: &str, message: &str, stars: i64) -> Entry {
    Entry {
        id,
        author: String::from(author),
        message: String::from(message),
        stars,
        saved: false,
    }
}

fn main() -> quarry::Result<()> {
    tracing_subscriber::fmt::init();

    let db = SqliteDatabase::in_memory()?;
    db.execute_batch(
        "CREATE TABLE entries (
            id INTEGER PRIMARY KEY,
            author TEXT NOT NULL,
            message TEXT NOT NULL,
            stars INTEGER NOT NULL
        );",
    )?;

    let config = Config {
        verbosity: Verbosity::SqlOnly,
        table_case: Case::Snake,
        column_case: Case::Snake,
        ..Config::new()
    };
    let adapter = Adapter::with_config(&db, config);

    // Sign the guestbook.
    adapter.save(&mut entry(1, "becky", "Lovely place!", 5))?;
    adapter.save(&mut entry(2, "sam", "Too many rocks.", 2))?;
    adapter.save(&mut entry(3, "ida", "Would visit again.", 4))?;

    // Validation rejects an unsigned entry before any I/O.
    let rejected = adapter.save(&mut entry(4, "", "sneaky", 3));
    println!("unsigned entry: {rejected:?}");

    // Favourable reviews, best first.
    let favourites = Entry::all()
        .filter("stars >= ?", 4)
        .order("-stars")
        .fetch(&adapter)?;
    for fav in &favourites {
        println!("{} ({} stars): {}", fav.author, fav.stars, fav.message);
    }

    // Correct a typo through the primary key.
    let mut sam = Entry::find("author", "sam")
        .fetch(&adapter)?
        .into_iter()
        .next()
        .ok_or_else(|| quarry::Error::Mapping(String::from("sam signed the book above")))?;
    sam.message = String::from("Growing on me.");
    sam.stars = 3;
    adapter.update(&sam)?;

    println!("total entries: {}", Entry::all().count(&adapter)?);
    println!(
        "any 5-star reviews? {}",
        Entry::all().filter("stars", 5).exists(&adapter)?
    );

    Ok(())
}
