// Copyright 2023 Remi Bernotavicius

use derive_more::Display;
use diesel::associations::{Associations, Identifiable};
use diesel::deserialize::Queryable;
use diesel::expression::Selectable;
use diesel::prelude::Insertable;
use diesel_derive_newtype::DieselNewType;
use strum::EnumIter;

#[derive(DieselNewType, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct MealId(i32);

#[derive(DieselNewType, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct IngredientId(i32);

#[derive(DieselNewType, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct MeasureId(i32);

#[derive(DieselNewType, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct RecipeId(i32);

#[cfg(test)]
impl RecipeId {
    pub const INITIAL: Self = Self(1);

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(DieselNewType, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct ServeId(i32);

#[derive(DieselNewType, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct QuantityId(i32);

/// The fixed set of meals a recipe can be served at. The discriminant is both the number the
/// user types and the `meal_id` the row receives when seeded.
#[derive(Debug, Display, EnumIter, Hash, Copy, Clone, PartialEq, Eq)]
#[repr(i32)]
pub enum Meal {
    #[display("breakfast")]
    Breakfast = 1,
    #[display("brunch")]
    Brunch = 2,
    #[display("lunch")]
    Lunch = 3,
    #[display("supper")]
    Supper = 4,
}

impl Meal {
    pub fn iter() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }

    pub fn from_number(number: i32) -> Option<Self> {
        Self::iter().find(|m| *m as i32 == number)
    }

    pub fn id(&self) -> MealId {
        MealId(*self as i32)
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = crate::database::schema::recipes)]
#[diesel(primary_key(recipe_id))]
pub struct Recipe {
    pub recipe_id: RecipeId,
    pub recipe_name: String,
    pub recipe_description: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::database::schema::recipes)]
pub struct NewRecipe<'a> {
    pub recipe_name: &'a str,
    pub recipe_description: &'a str,
}

#[derive(Associations, Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(belongs_to(Recipe))]
#[diesel(table_name = crate::database::schema::serve)]
#[diesel(primary_key(serve_id))]
pub struct Serve {
    pub serve_id: ServeId,
    pub recipe_id: RecipeId,
    pub meal_id: MealId,
}

#[derive(Insertable)]
#[diesel(table_name = crate::database::schema::serve)]
pub struct NewServe {
    pub recipe_id: RecipeId,
    pub meal_id: MealId,
}

#[derive(Associations, Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(belongs_to(Recipe))]
#[diesel(table_name = crate::database::schema::quantity)]
#[diesel(primary_key(quantity_id))]
pub struct Quantity {
    pub quantity_id: QuantityId,
    pub measure_id: MeasureId,
    pub ingredient_id: IngredientId,
    pub amount: i64,
    pub recipe_id: RecipeId,
}

#[derive(Insertable)]
#[diesel(table_name = crate::database::schema::quantity)]
pub struct NewQuantity {
    pub measure_id: MeasureId,
    pub ingredient_id: IngredientId,
    pub amount: i64,
    pub recipe_id: RecipeId,
}
