// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::error::InputError;
use diesel::dsl::count;
use diesel::expression_methods::AggregateExpressionMethods as _;
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::QueryResult;
use diesel::RunQueryDsl as _;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

static COMMA_SEPARATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)(,\s*\w+)*$").unwrap());

/// Whether `input` looks like `word,word, word`.
pub fn is_comma_separated(input: &str) -> bool {
    COMMA_SEPARATED.is_match(input)
}

fn split_list(input: &str) -> BTreeSet<String> {
    input.split(',').map(|item| item.trim().to_owned()).collect()
}

/// The ingredients a recipe has to use and the meals it may be served at.
#[derive(Debug, PartialEq, Eq)]
pub struct ProposalRequest {
    pub ingredients: BTreeSet<String>,
    pub meals: BTreeSet<String>,
}

impl ProposalRequest {
    /// Validates the pair of command-line lists. `Ok(None)` means neither was given.
    pub fn from_args(
        ingredients: Option<&str>,
        meals: Option<&str>,
    ) -> Result<Option<Self>, InputError> {
        let (ingredients, meals) = match (ingredients, meals) {
            (None, None) => return Ok(None),
            (None, Some(_)) => return Err(InputError::NoIngredients),
            (Some(_), None) => return Err(InputError::NoMeals),
            (Some(i), Some(m)) => (i, m),
        };
        if !is_comma_separated(ingredients) {
            return Err(InputError::UserIngredient);
        }
        if !is_comma_separated(meals) {
            return Err(InputError::UserMeal);
        }
        Ok(Some(Self {
            ingredients: split_list(ingredients),
            meals: split_list(meals),
        }))
    }
}

/// Recipe names, in whatever order the database produced them.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Proposal(pub Vec<String>);

impl fmt::Display for Proposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "There are no such recipes in the database.")
        } else {
            write!(f, "Recipes selected for you: {}", self.0.join(", "))
        }
    }
}

/// Finds the recipes that use every requested ingredient and are served at one or more of the
/// requested meals. Other ingredients a recipe has do not disqualify it.
pub fn propose(
    conn: &mut database::Connection,
    request: &ProposalRequest,
) -> QueryResult<Proposal> {
    use database::schema::{ingredients, meals, quantity, recipes, serve};

    if request.ingredients.is_empty() || request.meals.is_empty() {
        return Ok(Proposal::default());
    }
    let wanted = request.ingredients.len() as i64;

    let names = recipes::table
        .inner_join(quantity::table.inner_join(ingredients::table))
        .inner_join(serve::table.inner_join(meals::table))
        .filter(ingredients::ingredient_name.eq_any(&request.ingredients))
        .filter(meals::meal_name.eq_any(&request.meals))
        .group_by((recipes::recipe_id, recipes::recipe_name))
        .having(count(ingredients::ingredient_name).aggregate_distinct().eq(wanted))
        .select(recipes::recipe_name)
        .load::<String>(conn)?;
    log::info!(
        "{} recipe(s) match {:?} at {:?}",
        names.len(),
        request.ingredients,
        request.meals
    );
    Ok(Proposal(names))
}

#[cfg(test)]
fn request(ingredients: &[&str], meals: &[&str]) -> ProposalRequest {
    ProposalRequest {
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        meals: meals.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
fn add_recipe_with(
    conn: &mut database::Connection,
    name: &str,
    meals: &[crate::database::models::Meal],
    contents: &[&str],
) {
    use crate::catalog::{add_recipe, record_quantity, RecipeDraft};
    use crate::resolve::ResolvedLine;

    let draft = RecipeDraft {
        name: name.into(),
        description: format!("Make {name}."),
    };
    let id = add_recipe(conn, &draft, meals).unwrap();
    for ingredient in contents {
        let line = ResolvedLine {
            quantity: 1,
            measure: "cup".into(),
            ingredient: ingredient.to_string(),
        };
        record_quantity(conn, id, &line).unwrap();
    }
}

/// Pancakes for breakfast and risotto for supper.
#[cfg(test)]
fn small_catalog() -> database::Connection {
    use crate::database::models::Meal;

    let mut conn = database::test_connection();
    add_recipe_with(
        &mut conn,
        "pancakes",
        &[Meal::Breakfast],
        &["strawberry", "blueberry"],
    );
    add_recipe_with(&mut conn, "risotto", &[Meal::Supper], &["milk"]);
    conn
}

#[cfg(test)]
fn stocked_catalog() -> database::Connection {
    use crate::database::models::Meal;

    let mut conn = small_catalog();
    add_recipe_with(
        &mut conn,
        "hot chocolate",
        &[Meal::Breakfast, Meal::Brunch, Meal::Supper],
        &["milk", "cacao", "sugar"],
    );
    conn
}

#[cfg(test)]
fn sorted(proposal: Proposal) -> Vec<String> {
    let mut names = proposal.0;
    names.sort();
    names
}

#[test]
fn comma_separated_format() {
    assert!(is_comma_separated("milk"));
    assert!(is_comma_separated("milk,strawberry,blueberry"));
    assert!(is_comma_separated("milk, strawberry"));
    assert!(!is_comma_separated("milk strawberry blueberry"));
    assert!(!is_comma_separated("milk,"));
    assert!(!is_comma_separated(",milk"));
    assert!(!is_comma_separated(""));
}

#[test]
fn argument_pairs() {
    use maplit::btreeset;

    assert_eq!(ProposalRequest::from_args(None, None), Ok(None));
    assert_eq!(
        ProposalRequest::from_args(None, Some("lunch")),
        Err(InputError::NoIngredients)
    );
    assert_eq!(
        ProposalRequest::from_args(Some("milk"), None),
        Err(InputError::NoMeals)
    );
    assert_eq!(
        ProposalRequest::from_args(Some("milk sugar"), Some("lunch")),
        Err(InputError::UserIngredient)
    );
    assert_eq!(
        ProposalRequest::from_args(Some("milk"), Some("lunch supper")),
        Err(InputError::UserMeal)
    );
    assert_eq!(
        ProposalRequest::from_args(Some("milk, sugar,milk"), Some("lunch")),
        Ok(Some(ProposalRequest {
            ingredients: btreeset! {"milk".to_owned(), "sugar".to_owned()},
            meals: btreeset! {"lunch".to_owned()},
        }))
    );
}

#[test]
fn pancakes_or_nothing() {
    let mut conn = small_catalog();

    let found = propose(&mut conn, &request(&["strawberry"], &["breakfast", "brunch"])).unwrap();
    assert_eq!(sorted(found), vec!["pancakes"]);

    let found = propose(&mut conn, &request(&["sugar"], &["breakfast", "brunch"])).unwrap();
    assert_eq!(found, Proposal::default());
}

#[test]
fn proposes_recipes_using_every_ingredient() {
    let mut conn = stocked_catalog();

    let found = propose(&mut conn, &request(&["strawberry"], &["breakfast", "brunch"])).unwrap();
    assert_eq!(sorted(found), vec!["pancakes"]);

    let found = propose(&mut conn, &request(&["milk"], &["supper"])).unwrap();
    assert_eq!(sorted(found), vec!["hot chocolate", "risotto"]);

    let found = propose(&mut conn, &request(&["milk", "sugar"], &["supper"])).unwrap();
    assert_eq!(sorted(found), vec!["hot chocolate"]);

    let found = propose(
        &mut conn,
        &request(&["strawberry", "milk"], &["breakfast", "supper"]),
    )
    .unwrap();
    assert_eq!(found, Proposal::default());
}

#[test]
fn any_requested_meal_is_enough() {
    let mut conn = stocked_catalog();

    // Served at both requested meals; each ingredient still counts once.
    let found = propose(&mut conn, &request(&["milk", "cacao"], &["breakfast", "brunch"])).unwrap();
    assert_eq!(sorted(found), vec!["hot chocolate"]);

    let found = propose(&mut conn, &request(&["milk"], &["lunch"])).unwrap();
    assert_eq!(found, Proposal::default());

    // Names that are not meals just filter nothing in.
    let found = propose(&mut conn, &request(&["milk"], &["dinner", "supper"])).unwrap();
    assert_eq!(sorted(found), vec!["hot chocolate", "risotto"]);

    let found = propose(&mut conn, &request(&["milk"], &["dinner"])).unwrap();
    assert_eq!(found, Proposal::default());
}

#[test]
fn nothing_found() {
    let mut conn = stocked_catalog();

    let found = propose(&mut conn, &request(&["sugar"], &["breakfast", "brunch"])).unwrap();
    assert_eq!(sorted(found), vec!["hot chocolate"]);

    let found = propose(&mut conn, &request(&["blackberry"], &["breakfast", "brunch"])).unwrap();
    assert_eq!(found, Proposal::default());

    let found = propose(&mut conn, &request(&["flour"], &["breakfast"])).unwrap();
    assert_eq!(found, Proposal::default());
}

#[test]
fn report() {
    assert_eq!(
        Proposal::default().to_string(),
        "There are no such recipes in the database."
    );
    assert_eq!(
        Proposal(vec!["a".into(), "b".into(), "c".into()]).to_string(),
        "Recipes selected for you: a, b, c"
    );
}
