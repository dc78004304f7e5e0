// Copyright 2023 Remi Bernotavicius

//! Turning what the user typed for an ingredient line into canonical catalog names.
//!
//! Measures match by prefix and ingredients by substring. Anything other than exactly one match
//! is an error, so the user has to type more until the fragment is unambiguous.

use crate::catalog;
use crate::database;
use crate::error::InputError;
use diesel::QueryResult;

/// The raw pieces of a "quantity [measure] ingredient" line.
#[derive(Debug, PartialEq, Eq)]
pub struct IngredientLine<'a> {
    pub quantity: &'a str,
    pub measure: &'a str,
    pub ingredient: String,
}

impl<'a> IngredientLine<'a> {
    /// Splits on single spaces. With only two tokens there is no measure; otherwise the second
    /// token is the measure and the rest, joined back up, is the ingredient.
    pub fn parse(line: &'a str) -> Self {
        let tokens: Vec<&str> = line.split(' ').collect();
        let quantity = tokens[0];
        if tokens.len() < 3 {
            Self {
                quantity,
                measure: "",
                ingredient: tokens[1..].join(" "),
            }
        } else {
            Self {
                quantity,
                measure: tokens[1],
                ingredient: tokens[2..].join(" "),
            }
        }
    }
}

/// An ingredient line whose names are exact catalog names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLine {
    pub quantity: i64,
    pub measure: String,
    pub ingredient: String,
}

/// Snapshot of the measure and ingredient names, taken once and never refreshed.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    measures: Vec<String>,
    ingredients: Vec<String>,
}

impl Vocabulary {
    pub fn new(measures: Vec<String>, ingredients: Vec<String>) -> Self {
        Self {
            measures,
            ingredients,
        }
    }

    pub fn load(conn: &mut database::Connection) -> QueryResult<Self> {
        let measures = catalog::measure_names(conn)?;
        let ingredients = catalog::ingredient_names(conn)?;
        log::debug!(
            "loaded {} measures and {} ingredients",
            measures.len(),
            ingredients.len()
        );
        Ok(Self::new(measures, ingredients))
    }

    /// Any base-10 integer, zero and negatives included.
    pub fn resolve_quantity(raw: &str) -> Result<i64, InputError> {
        raw.parse().map_err(|_| InputError::Quantity)
    }

    pub fn resolve_measure(&self, raw: &str) -> Result<&str, InputError> {
        if raw.is_empty() {
            return Ok("");
        }
        sole_match(
            self.measures.iter().filter(|m| m.starts_with(raw)),
            InputError::Measure,
        )
    }

    pub fn resolve_ingredient(&self, raw: &str) -> Result<&str, InputError> {
        sole_match(
            self.ingredients.iter().filter(|i| i.contains(raw)),
            InputError::Ingredient,
        )
    }

    /// Checks quantity, then measure, then ingredient, stopping at the first failure.
    pub fn resolve_line(&self, line: &IngredientLine<'_>) -> Result<ResolvedLine, InputError> {
        let quantity = Self::resolve_quantity(line.quantity)?;
        let measure = self.resolve_measure(line.measure)?;
        let ingredient = self.resolve_ingredient(&line.ingredient)?;
        Ok(ResolvedLine {
            quantity,
            measure: measure.into(),
            ingredient: ingredient.into(),
        })
    }
}

fn sole_match<'a>(
    mut candidates: impl Iterator<Item = &'a String>,
    error: InputError,
) -> Result<&'a str, InputError> {
    match (candidates.next(), candidates.next()) {
        (Some(only), None) => Ok(only.as_str()),
        _ => Err(error),
    }
}

#[cfg(test)]
fn seeded() -> Vocabulary {
    Vocabulary::new(
        database::SEED_MEASURES.map(String::from).to_vec(),
        database::SEED_INGREDIENTS.map(String::from).to_vec(),
    )
}

#[test]
fn quantity() {
    assert_eq!(Vocabulary::resolve_quantity("2"), Ok(2));
    assert_eq!(Vocabulary::resolve_quantity("0"), Ok(0));
    assert_eq!(Vocabulary::resolve_quantity("-3"), Ok(-3));
    assert_eq!(
        Vocabulary::resolve_quantity("3000000000"),
        Ok(3_000_000_000)
    );
    assert_eq!(
        Vocabulary::resolve_quantity("-2147483649"),
        Ok(-2_147_483_649)
    );
    assert_eq!(
        Vocabulary::resolve_quantity("text"),
        Err(InputError::Quantity)
    );
    assert_eq!(Vocabulary::resolve_quantity("1.5"), Err(InputError::Quantity));
    assert_eq!(Vocabulary::resolve_quantity(""), Err(InputError::Quantity));
}

#[test]
fn measure() {
    let vocabulary = seeded();

    // Full names.
    assert_eq!(vocabulary.resolve_measure("ml"), Ok("ml"));
    assert_eq!(vocabulary.resolve_measure("tbsp"), Ok("tbsp"));
    assert_eq!(vocabulary.resolve_measure(""), Ok(""));

    // Unique beginnings.
    assert_eq!(vocabulary.resolve_measure("m"), Ok("ml"));
    assert_eq!(vocabulary.resolve_measure("c"), Ok("cup"));
    assert_eq!(vocabulary.resolve_measure("ts"), Ok("tsp"));

    // Nothing starts with it.
    assert_eq!(vocabulary.resolve_measure("gallon"), Err(InputError::Measure));
    assert_eq!(vocabulary.resolve_measure("sp"), Err(InputError::Measure));

    // Both tbsp and tsp start with it.
    assert_eq!(vocabulary.resolve_measure("t"), Err(InputError::Measure));

    // Matching is case sensitive.
    assert_eq!(vocabulary.resolve_measure("ML"), Err(InputError::Measure));
}

#[test]
fn empty_measure_skips_the_vocabulary() {
    let vocabulary = Vocabulary::new(vec![], vec!["milk".into()]);
    assert_eq!(vocabulary.resolve_measure(""), Ok(""));
    assert_eq!(vocabulary.resolve_measure("ml"), Err(InputError::Measure));
}

#[test]
fn ingredient() {
    let vocabulary = seeded();

    assert_eq!(vocabulary.resolve_ingredient("milk"), Ok("milk"));
    assert_eq!(vocabulary.resolve_ingredient("blue"), Ok("blueberry"));
    assert_eq!(vocabulary.resolve_ingredient("caca"), Ok("cacao"));
    assert_eq!(vocabulary.resolve_ingredient("raw"), Ok("strawberry"));

    assert_eq!(vocabulary.resolve_ingredient("flour"), Err(InputError::Ingredient));
    assert_eq!(vocabulary.resolve_ingredient("berry"), Err(InputError::Ingredient));
    assert_eq!(vocabulary.resolve_ingredient(""), Err(InputError::Ingredient));
    assert_eq!(vocabulary.resolve_ingredient("Milk"), Err(InputError::Ingredient));
}

#[test]
fn ingredient_names_may_contain_spaces() {
    let vocabulary = Vocabulary::new(vec![], vec!["brown sugar".into(), "sugar".into()]);
    assert_eq!(vocabulary.resolve_ingredient("brown s"), Ok("brown sugar"));
    assert_eq!(vocabulary.resolve_ingredient("sugar"), Err(InputError::Ingredient));
}

#[test]
fn parse_line() {
    assert_eq!(
        IngredientLine::parse("1 ml milk"),
        IngredientLine {
            quantity: "1",
            measure: "ml",
            ingredient: "milk".into(),
        }
    );
    assert_eq!(
        IngredientLine::parse("10 strawberry"),
        IngredientLine {
            quantity: "10",
            measure: "",
            ingredient: "strawberry".into(),
        }
    );
    assert_eq!(
        IngredientLine::parse("2 tbsp brown sugar"),
        IngredientLine {
            quantity: "2",
            measure: "tbsp",
            ingredient: "brown sugar".into(),
        }
    );
    assert_eq!(
        IngredientLine::parse("3"),
        IngredientLine {
            quantity: "3",
            measure: "",
            ingredient: "".into(),
        }
    );
}

#[test]
fn resolve_line() {
    let vocabulary = seeded();

    assert_eq!(
        vocabulary.resolve_line(&IngredientLine::parse("2 c blue")),
        Ok(ResolvedLine {
            quantity: 2,
            measure: "cup".into(),
            ingredient: "blueberry".into(),
        })
    );
    assert_eq!(
        vocabulary.resolve_line(&IngredientLine::parse("5 sugar")),
        Ok(ResolvedLine {
            quantity: 5,
            measure: "".into(),
            ingredient: "sugar".into(),
        })
    );

    // The quantity is checked before anything else.
    assert_eq!(
        vocabulary.resolve_line(&IngredientLine::parse("lots t berry")),
        Err(InputError::Quantity)
    );
    assert_eq!(
        vocabulary.resolve_line(&IngredientLine::parse("1 t berry")),
        Err(InputError::Measure)
    );
    assert_eq!(
        vocabulary.resolve_line(&IngredientLine::parse("1 ml berry")),
        Err(InputError::Ingredient)
    );
}

#[test]
fn load_from_catalog() {
    let mut conn = database::test_connection();
    let vocabulary = Vocabulary::load(&mut conn).unwrap();
    assert_eq!(vocabulary.resolve_measure("d"), Ok("dsp"));
    assert_eq!(vocabulary.resolve_ingredient("black"), Ok("blackberry"));
}
