// Copyright 2023 Remi Bernotavicius

use crate::catalog::{self, RecipeDraft};
use crate::database;
use crate::database::models::{Meal, RecipeId};
use crate::error::InputError;
use crate::resolve::{IngredientLine, Vocabulary};
use crate::Result;
use std::io::{BufRead, Write};

/// Splits on single spaces; every piece has to be a meal number from 1 to 4.
pub fn parse_meal_numbers(input: &str) -> std::result::Result<Vec<Meal>, InputError> {
    input
        .split(' ')
        .map(|n| {
            n.parse()
                .ok()
                .and_then(Meal::from_number)
                .ok_or(InputError::MealNumber)
        })
        .collect()
}

/// Asks for recipes one after another and stores them until the user enters an empty name or
/// description.
pub struct Session<'a, R, W> {
    conn: &'a mut database::Connection,
    vocabulary: Vocabulary,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(conn: &'a mut database::Connection, input: R, output: W) -> Result<Self> {
        let vocabulary = Vocabulary::load(conn)?;
        Ok(Self {
            conn,
            vocabulary,
            input,
            output,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Pass the empty recipe name to exit.")?;
        loop {
            let Some(draft) = self.gather_recipe()? else {
                return Ok(());
            };
            let meals = match self.gather_meal_numbers()? {
                Ok(meals) => meals,
                Err(e) => {
                    writeln!(self.output, "{e}")?;
                    continue;
                }
            };
            let recipe_id = catalog::add_recipe(self.conn, &draft, &meals)?;
            self.gather_quantities(recipe_id)?;
        }
    }

    /// Reads one line after showing `prompt`. End of input reads as an empty line.
    fn prompt(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        let trimmed = line.strip_suffix('\n').unwrap_or(&line);
        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
        Ok(trimmed.to_owned())
    }

    fn gather_recipe(&mut self) -> Result<Option<RecipeDraft>> {
        let name = self.prompt("Recipe name:")?;
        if name.is_empty() {
            return Ok(None);
        }
        let description = self.prompt("Recipe description:")?;
        if description.is_empty() {
            return Ok(None);
        }
        Ok(Some(RecipeDraft { name, description }))
    }

    fn gather_meal_numbers(&mut self) -> Result<std::result::Result<Vec<Meal>, InputError>> {
        writeln!(self.output, "1) breakfast 2) brunch 3) lunch 4) supper")?;
        writeln!(self.output, "Enter proposed meals separated by a space:")?;
        let numbers = self.prompt("When the dish can be served:")?;
        Ok(parse_meal_numbers(&numbers))
    }

    /// Stores ingredient lines for `recipe_id` until an empty line. A line that doesn't resolve
    /// is reported and skipped; lines already stored stay.
    fn gather_quantities(&mut self, recipe_id: RecipeId) -> Result<()> {
        loop {
            let raw = self.prompt("Input quantity of ingredient <press enter to stop>:")?;
            if raw.is_empty() {
                return Ok(());
            }
            match self.vocabulary.resolve_line(&IngredientLine::parse(&raw)) {
                Ok(line) => catalog::record_quantity(self.conn, recipe_id, &line)?,
                Err(e) => {
                    log::debug!("rejected ingredient line {raw:?}: {e}");
                    writeln!(self.output, "{e}")?;
                }
            }
        }
    }
}

#[cfg(test)]
fn run_session(conn: &mut database::Connection, input: &str) -> String {
    let mut output = vec![];
    Session::new(conn, std::io::Cursor::new(input), &mut output)
        .unwrap()
        .run()
        .unwrap();
    String::from_utf8(output).unwrap()
}

#[cfg(test)]
fn stored_recipes(conn: &mut database::Connection) -> Vec<(String, Vec<i32>, Vec<(String, i64)>)> {
    use crate::database::models::{Quantity, Recipe, Serve};
    use crate::database::schema::{ingredients, quantity, recipes, serve};
    use diesel::{BelongingToDsl as _, QueryDsl as _, RunQueryDsl as _, SelectableHelper as _};

    let all: Vec<Recipe> = recipes::table
        .select(Recipe::as_select())
        .order(recipes::recipe_id)
        .load(conn)
        .unwrap();
    all.iter()
        .map(|recipe| {
            let meals = Serve::belonging_to(recipe)
                .select(serve::meal_id)
                .order(serve::serve_id)
                .load(conn)
                .unwrap();
            let contents = Quantity::belonging_to(recipe)
                .inner_join(ingredients::table)
                .select((ingredients::ingredient_name, quantity::amount))
                .order(quantity::quantity_id)
                .load(conn)
                .unwrap();
            (recipe.recipe_name.clone(), meals, contents)
        })
        .collect()
}

#[test]
fn meal_numbers() {
    assert_eq!(
        parse_meal_numbers("1 3 4"),
        Ok(vec![Meal::Breakfast, Meal::Lunch, Meal::Supper])
    );
    assert_eq!(parse_meal_numbers("2"), Ok(vec![Meal::Brunch]));
    assert_eq!(parse_meal_numbers("text"), Err(InputError::MealNumber));
    assert_eq!(parse_meal_numbers("1234"), Err(InputError::MealNumber));
    assert_eq!(parse_meal_numbers("1 2 5"), Err(InputError::MealNumber));
    assert_eq!(parse_meal_numbers("0"), Err(InputError::MealNumber));
    assert_eq!(parse_meal_numbers("1  2"), Err(InputError::MealNumber));
    assert_eq!(parse_meal_numbers(""), Err(InputError::MealNumber));
}

#[test]
fn empty_name_ends_the_session() {
    let mut conn = database::test_connection();
    let output = run_session(&mut conn, "\n");
    assert_eq!(output, "Pass the empty recipe name to exit.\nRecipe name:");
    assert!(stored_recipes(&mut conn).is_empty());
}

#[test]
fn empty_description_ends_the_session() {
    let mut conn = database::test_connection();
    run_session(&mut conn, "pancakes\n\n1\n");
    assert!(stored_recipes(&mut conn).is_empty());
}

#[test]
fn end_of_input_ends_the_session() {
    let mut conn = database::test_connection();
    run_session(&mut conn, "pancakes\nfry them\n1 2\n2 c blue");
    assert_eq!(
        stored_recipes(&mut conn),
        vec![("pancakes".into(), vec![1, 2], vec![("blueberry".into(), 2)])]
    );
}

#[test]
fn records_a_recipe() {
    let mut conn = database::test_connection();
    let input = "\
hot chocolate
Warm the milk and stir in cacao.
1 4
250 ml milk
2 tbsp caca
1 sugar

";
    let output = run_session(&mut conn, input);
    assert_eq!(
        stored_recipes(&mut conn),
        vec![(
            "hot chocolate".into(),
            vec![1, 4],
            vec![
                ("milk".into(), 250),
                ("cacao".into(), 2),
                ("sugar".into(), 1)
            ]
        )]
    );
    assert_eq!(
        output,
        "Pass the empty recipe name to exit.\n\
         Recipe name:Recipe description:\
         1) breakfast 2) brunch 3) lunch 4) supper\n\
         Enter proposed meals separated by a space:\n\
         When the dish can be served:\
         Input quantity of ingredient <press enter to stop>:\
         Input quantity of ingredient <press enter to stop>:\
         Input quantity of ingredient <press enter to stop>:\
         Input quantity of ingredient <press enter to stop>:\
         Recipe name:"
    );
}

#[test]
fn bad_ingredient_lines_are_skipped() {
    let mut conn = database::test_connection();
    let input = "\
smoothie
Blend.
2
1 cup strawberry
some ml milk
1 t milk
1 ml berry
1 ml flour
3 blackberry

";
    let output = run_session(&mut conn, input);
    assert!(output.contains("Quantity must be a number.\n"));
    assert!(output.contains("The measure is not conclusive!\n"));
    assert_eq!(output.matches("The ingredient is not conclusive!\n").count(), 2);
    assert_eq!(
        stored_recipes(&mut conn),
        vec![(
            "smoothie".into(),
            vec![2],
            vec![("strawberry".into(), 1), ("blackberry".into(), 3)]
        )]
    );
}

#[test]
fn bad_meal_numbers_start_the_recipe_over() {
    let mut conn = database::test_connection();
    let input = "\
risotto
Stir for a long time.
3 5
risotto
Stir for a long time.
4
1 l milk

porridge
Boil.
1 1

";
    let output = run_session(&mut conn, input);
    assert_eq!(
        output
            .matches("Provide one number or multiple numbers from range 1-4 separated by single spaces.\n")
            .count(),
        1
    );
    assert_eq!(
        stored_recipes(&mut conn),
        vec![
            ("risotto".into(), vec![4], vec![("milk".into(), 1)]),
            ("porridge".into(), vec![1, 1], vec![]),
        ]
    );
}
