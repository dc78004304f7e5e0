// Copyright 2023 Remi Bernotavicius

use derive_more::Display;

/// A rejected piece of user input. Each kind carries only its fixed message, which is what gets
/// shown to the user.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq)]
pub enum InputError {
    #[display("Provide one number or multiple numbers from range 1-4 separated by single spaces.")]
    MealNumber,
    #[display("Quantity must be a number.")]
    Quantity,
    #[display("The measure is not conclusive!")]
    Measure,
    #[display("The ingredient is not conclusive!")]
    Ingredient,
    #[display("Provide ingredients separated by a comma.")]
    UserIngredient,
    #[display("Provide meals separated by a comma.")]
    UserMeal,
    #[display("Provide ingredients.")]
    NoIngredients,
    #[display("Provide meals.")]
    NoMeals,
}

impl std::error::Error for InputError {}

#[test]
fn messages() {
    assert_eq!(InputError::Quantity.to_string(), "Quantity must be a number.");
    assert_eq!(
        InputError::MealNumber.to_string(),
        "Provide one number or multiple numbers from range 1-4 separated by single spaces."
    );
    assert_eq!(InputError::NoMeals.to_string(), "Provide meals.");
}
