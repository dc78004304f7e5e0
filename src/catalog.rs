// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{
    IngredientId, Meal, MeasureId, NewQuantity, NewRecipe, NewServe, RecipeId,
};
use crate::resolve::ResolvedLine;
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::QueryResult;
use diesel::RunQueryDsl as _;

/// What the user typed in for one recipe before anything was stored.
#[derive(Debug, PartialEq, Eq)]
pub struct RecipeDraft {
    pub name: String,
    pub description: String,
}

pub fn create_recipe(
    conn: &mut database::Connection,
    new_name: &str,
    new_description: &str,
) -> QueryResult<RecipeId> {
    use database::schema::recipes::dsl::*;
    use diesel::insert_into;

    let new_id = insert_into(recipes)
        .values(NewRecipe {
            recipe_name: new_name,
            recipe_description: new_description,
        })
        .returning(recipe_id)
        .get_result(conn)?;
    log::info!("created recipe {new_name:?} as {new_id:?}");
    Ok(new_id)
}

/// One row per entry of `meals`, repeats included.
pub fn create_serve(
    conn: &mut database::Connection,
    new_recipe_id: RecipeId,
    meals: &[Meal],
) -> QueryResult<()> {
    use database::schema::serve::dsl::*;
    use diesel::insert_into;

    for meal in meals {
        insert_into(serve)
            .values(NewServe {
                recipe_id: new_recipe_id,
                meal_id: meal.id(),
            })
            .execute(conn)?;
    }
    log::debug!("{new_recipe_id:?} is served at {meals:?}");
    Ok(())
}

/// Stores the recipe and the meals it is served at. The two writes commit separately.
pub fn add_recipe(
    conn: &mut database::Connection,
    draft: &RecipeDraft,
    meals: &[Meal],
) -> QueryResult<RecipeId> {
    let new_id = create_recipe(conn, &draft.name, &draft.description)?;
    create_serve(conn, new_id, meals)?;
    Ok(new_id)
}

pub fn create_quantity(
    conn: &mut database::Connection,
    new_measure_id: MeasureId,
    new_ingredient_id: IngredientId,
    new_amount: i64,
    new_recipe_id: RecipeId,
) -> QueryResult<()> {
    use database::schema::quantity::dsl::*;
    use diesel::insert_into;

    insert_into(quantity)
        .values(NewQuantity {
            measure_id: new_measure_id,
            ingredient_id: new_ingredient_id,
            amount: new_amount,
            recipe_id: new_recipe_id,
        })
        .execute(conn)?;
    Ok(())
}

/// Stores one already resolved ingredient line against `recipe_id`.
pub fn record_quantity(
    conn: &mut database::Connection,
    recipe_id: RecipeId,
    line: &ResolvedLine,
) -> QueryResult<()> {
    let measure_id = find_measure_id(conn, &line.measure)?;
    let ingredient_id = find_ingredient_id(conn, &line.ingredient)?;
    create_quantity(conn, measure_id, ingredient_id, line.quantity, recipe_id)?;
    log::debug!(
        "{recipe_id:?} needs {} {:?} of {:?}",
        line.quantity,
        line.measure,
        line.ingredient
    );
    Ok(())
}

pub fn find_measure_id(conn: &mut database::Connection, name: &str) -> QueryResult<MeasureId> {
    use database::schema::measures;

    measures::table
        .select(measures::measure_id)
        .filter(measures::measure_name.eq(name))
        .get_result(conn)
}

pub fn find_ingredient_id(
    conn: &mut database::Connection,
    name: &str,
) -> QueryResult<IngredientId> {
    use database::schema::ingredients;

    ingredients::table
        .select(ingredients::ingredient_id)
        .filter(ingredients::ingredient_name.eq(name))
        .get_result(conn)
}

pub fn measure_names(conn: &mut database::Connection) -> QueryResult<Vec<String>> {
    use database::schema::measures::dsl::*;

    let names: Vec<Option<String>> = measures
        .select(measure_name)
        .order(measure_id)
        .load(conn)?;
    Ok(names.into_iter().map(Option::unwrap_or_default).collect())
}

pub fn ingredient_names(conn: &mut database::Connection) -> QueryResult<Vec<String>> {
    use database::schema::ingredients::dsl::*;

    ingredients
        .select(ingredient_name)
        .order(ingredient_id)
        .load(conn)
}

#[cfg(test)]
use crate::database::models::{Quantity, Recipe, Serve};
#[cfg(test)]
use diesel::{BelongingToDsl as _, SelectableHelper as _};

#[cfg(test)]
fn load_recipe(conn: &mut database::Connection, id: RecipeId) -> Recipe {
    use database::schema::recipes::dsl::*;

    recipes
        .select(Recipe::as_select())
        .filter(recipe_id.eq(id))
        .get_result(conn)
        .unwrap()
}

#[test]
fn recipe_ids_count_up_from_one() {
    let mut conn = database::test_connection();

    let first = create_recipe(&mut conn, "pizza marinara", "Peel tomatoes, bake dough.").unwrap();
    let second = create_recipe(&mut conn, "pancakes", "Mix and fry.").unwrap();
    assert_eq!(first, RecipeId::INITIAL);
    assert_eq!(second, first.next());

    let recipe = load_recipe(&mut conn, first);
    assert_eq!(recipe.recipe_name, "pizza marinara");
    assert_eq!(
        recipe.recipe_description.as_deref(),
        Some("Peel tomatoes, bake dough.")
    );
}

#[test]
fn add_recipe_stores_one_serve_row_per_meal() {
    let mut conn = database::test_connection();

    let draft = RecipeDraft {
        name: "porridge".into(),
        description: "Boil oats in milk.".into(),
    };
    let id = add_recipe(
        &mut conn,
        &draft,
        &[Meal::Breakfast, Meal::Brunch, Meal::Lunch, Meal::Supper],
    )
    .unwrap();

    let recipe = load_recipe(&mut conn, id);
    let rows: Vec<Serve> = Serve::belonging_to(&recipe)
        .select(Serve::as_select())
        .load(&mut conn)
        .unwrap();
    let meal_ids: Vec<_> = rows.iter().map(|s| s.meal_id).collect();
    assert_eq!(
        meal_ids,
        vec![
            Meal::Breakfast.id(),
            Meal::Brunch.id(),
            Meal::Lunch.id(),
            Meal::Supper.id()
        ]
    );
    assert!(rows.iter().all(|s| s.recipe_id == id));
}

#[test]
fn id_lookups() {
    let mut conn = database::test_connection();

    let cup = find_measure_id(&mut conn, "cup").unwrap();
    let no_unit = find_measure_id(&mut conn, "").unwrap();
    let sugar = find_ingredient_id(&mut conn, "sugar").unwrap();
    assert_ne!(cup, no_unit);

    let id = create_recipe(&mut conn, "tea", "Steep.").unwrap();
    create_quantity(&mut conn, cup, sugar, 2, id).unwrap();
    create_quantity(&mut conn, no_unit, sugar, 1, id).unwrap();

    let recipe = load_recipe(&mut conn, id);
    let rows: Vec<Quantity> = Quantity::belonging_to(&recipe)
        .select(Quantity::as_select())
        .load(&mut conn)
        .unwrap();
    let stored: Vec<_> = rows
        .iter()
        .map(|q| (q.measure_id, q.ingredient_id, q.amount))
        .collect();
    assert_eq!(stored, vec![(cup, sugar, 2), (no_unit, sugar, 1)]);

    assert!(find_measure_id(&mut conn, "gallon").is_err());
    assert!(find_ingredient_id(&mut conn, "flour").is_err());
}

#[test]
fn record_quantity_looks_up_names() {
    let mut conn = database::test_connection();
    let id = create_recipe(&mut conn, "milkshake", "Blend.").unwrap();

    let line = ResolvedLine {
        quantity: 250,
        measure: "ml".into(),
        ingredient: "milk".into(),
    };
    record_quantity(&mut conn, id, &line).unwrap();

    let recipe = load_recipe(&mut conn, id);
    let rows: Vec<Quantity> = Quantity::belonging_to(&recipe)
        .select(Quantity::as_select())
        .load(&mut conn)
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, 250);
    assert_eq!(
        rows[0].measure_id,
        find_measure_id(&mut conn, "ml").unwrap()
    );
    assert_eq!(
        rows[0].ingredient_id,
        find_ingredient_id(&mut conn, "milk").unwrap()
    );
}

#[test]
fn quantities_beyond_32_bits_are_stored() {
    let mut conn = database::test_connection();
    let id = create_recipe(&mut conn, "sugar mountain", "Pour.").unwrap();

    let line = ResolvedLine {
        quantity: 5_000_000_000,
        measure: "g".into(),
        ingredient: "sugar".into(),
    };
    record_quantity(&mut conn, id, &line).unwrap();

    let recipe = load_recipe(&mut conn, id);
    let rows: Vec<Quantity> = Quantity::belonging_to(&recipe)
        .select(Quantity::as_select())
        .load(&mut conn)
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, 5_000_000_000);
}

#[test]
fn quantity_for_missing_recipe_is_rejected() {
    let mut conn = database::test_connection();
    let cup = find_measure_id(&mut conn, "cup").unwrap();
    let milk = find_ingredient_id(&mut conn, "milk").unwrap();

    assert!(create_quantity(&mut conn, cup, milk, 1, RecipeId::INITIAL).is_err());
}

#[test]
fn vocabulary_listings() {
    let mut conn = database::test_connection();

    assert_eq!(
        measure_names(&mut conn).unwrap(),
        database::SEED_MEASURES.map(String::from)
    );
    assert_eq!(
        ingredient_names(&mut conn).unwrap(),
        database::SEED_INGREDIENTS.map(String::from)
    );
}
