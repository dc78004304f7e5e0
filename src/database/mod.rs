// Copyright 2023 Remi Bernotavicius

use diesel::prelude::Connection as _;
use diesel::{QueryResult, RunQueryDsl as _};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::path::Path;

pub mod models;
pub mod schema;

pub type Connection = diesel::sqlite::SqliteConnection;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub const SEED_INGREDIENTS: [&str; 6] = [
    "milk",
    "cacao",
    "strawberry",
    "blueberry",
    "blackberry",
    "sugar",
];

/// The empty name is the "no unit" measure.
pub const SEED_MEASURES: [&str; 8] = ["ml", "g", "l", "cup", "tbsp", "tsp", "dsp", ""];

/// Opens (or creates) the catalog at `path`, bringing the schema up to date and seeding the fixed
/// vocabularies. `:memory:` gives a private throwaway catalog.
pub fn establish_connection(path: impl AsRef<Path>) -> crate::Result<Connection> {
    let path = path.as_ref();
    let url = path
        .to_str()
        .ok_or_else(|| format!("database path {path:?} is not valid UTF-8"))?;
    let mut connection = Connection::establish(url)?;
    diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut connection)?;
    connection.run_pending_migrations(MIGRATIONS)?;
    seed_tables(&mut connection)?;
    log::debug!("opened catalog at {url}");
    Ok(connection)
}

/// Inserts the meals, ingredients and measures the catalog is built around. Rows that already
/// exist are left alone, so this can run on every start.
pub fn seed_tables(conn: &mut Connection) -> QueryResult<()> {
    use diesel::{insert_or_ignore_into, ExpressionMethods as _};

    {
        use schema::meals::dsl::*;
        for meal in models::Meal::iter() {
            insert_or_ignore_into(meals)
                .values(meal_name.eq(meal.to_string()))
                .execute(conn)?;
        }
    }

    {
        use schema::ingredients::dsl::*;
        for name in SEED_INGREDIENTS {
            insert_or_ignore_into(ingredients)
                .values(ingredient_name.eq(name))
                .execute(conn)?;
        }
    }

    {
        use schema::measures::dsl::*;
        for name in SEED_MEASURES {
            insert_or_ignore_into(measures)
                .values(measure_name.eq(name))
                .execute(conn)?;
        }
    }

    Ok(())
}

#[cfg(test)]
pub fn test_connection() -> Connection {
    establish_connection(":memory:").unwrap()
}

#[cfg(test)]
fn row_counts(conn: &mut Connection) -> (i64, i64, i64) {
    use diesel::QueryDsl as _;

    (
        schema::meals::table.count().get_result(conn).unwrap(),
        schema::ingredients::table.count().get_result(conn).unwrap(),
        schema::measures::table.count().get_result(conn).unwrap(),
    )
}

#[test]
fn seeding_twice_changes_nothing() {
    let mut conn = test_connection();
    assert_eq!(row_counts(&mut conn), (4, 6, 8));

    seed_tables(&mut conn).unwrap();
    assert_eq!(row_counts(&mut conn), (4, 6, 8));
}

#[test]
fn meals_are_seeded_in_number_order() {
    use diesel::QueryDsl as _;
    use schema::meals::dsl::*;

    let mut conn = test_connection();
    let rows: Vec<(i32, String)> = meals
        .select((meal_id, meal_name))
        .order(meal_id)
        .load(&mut conn)
        .unwrap();
    assert_eq!(
        rows,
        vec![
            (1, "breakfast".into()),
            (2, "brunch".into()),
            (3, "lunch".into()),
            (4, "supper".into()),
        ]
    );

    for meal in models::Meal::iter() {
        let stored: String = meals
            .find(meal.id())
            .select(meal_name)
            .get_result(&mut conn)
            .unwrap();
        assert_eq!(stored, meal.to_string());
    }
}

#[test]
fn reopening_a_catalog_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("food_blog.db");

    let mut conn = establish_connection(&path).unwrap();
    assert_eq!(row_counts(&mut conn), (4, 6, 8));
    drop(conn);

    let mut conn = establish_connection(&path).unwrap();
    assert_eq!(row_counts(&mut conn), (4, 6, 8));
}
