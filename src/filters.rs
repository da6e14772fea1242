use serde::{Deserialize, Serialize};

use crate::model::Recipe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DietaryRestriction {
    Vegetarian,
    Vegan,
    GlutenFree,
    DairyFree,
}

impl DietaryRestriction {
    /// Lowercase name fragments that rule a recipe out under this restriction
    pub fn disallowed_terms(self) -> &'static [&'static str] {
        match self {
            DietaryRestriction::Vegetarian => &["chicken"],
            DietaryRestriction::Vegan => &["chicken", "cheese", "butter", "cream", "egg"],
            DietaryRestriction::GlutenFree => &["pasta", "bread", "noodle", "pizza"],
            DietaryRestriction::DairyFree => &["cheese", "cream", "butter", "milk"],
        }
    }

    pub fn allows(self, recipe_name: &str) -> bool {
        let name = recipe_name.to_lowercase();
        !self
            .disallowed_terms()
            .iter()
            .any(|term| name.contains(term))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Client-side filter set applied on top of whatever the server returned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeFilters {
    pub dietary_restrictions: Vec<DietaryRestriction>,
    /// Minutes. The API carries no timing data, so this is not evaluated.
    pub max_cooking_time: Option<u32>,
    /// Not evaluated for the same reason as `max_cooking_time`
    pub difficulty: Option<Difficulty>,
    pub area: Option<String>,
    pub ingredient: Option<String>,
}

impl RecipeFilters {
    pub fn is_empty(&self) -> bool {
        *self == RecipeFilters::default()
    }

    /// Area name, if set to something other than whitespace
    pub fn active_area(&self) -> Option<&str> {
        non_blank(self.area.as_deref())
    }

    /// Ingredient name, if set to something other than whitespace
    pub fn active_ingredient(&self) -> Option<&str> {
        non_blank(self.ingredient.as_deref())
    }

    pub fn with_restriction(mut self, restriction: DietaryRestriction) -> Self {
        if !self.dietary_restrictions.contains(&restriction) {
            self.dietary_restrictions.push(restriction);
        }
        self
    }

    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    pub fn with_ingredient(mut self, ingredient: impl Into<String>) -> Self {
        self.ingredient = Some(ingredient.into());
        self
    }

    /// Whether `recipe` survives the local filter pass.
    ///
    /// Listing endpoints return summaries without area or ingredients; a
    /// check against a field the recipe does not carry passes.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if !self
            .dietary_restrictions
            .iter()
            .all(|r| r.allows(&recipe.name))
        {
            return false;
        }

        if let (Some(wanted), Some(area)) = (self.active_area(), recipe.area.as_deref()) {
            if !area.trim().eq_ignore_ascii_case(wanted) {
                return false;
            }
        }

        if let Some(wanted) = self.active_ingredient() {
            if !recipe.ingredients.is_empty() {
                let wanted = wanted.to_lowercase();
                return recipe
                    .ingredients
                    .iter()
                    .any(|i| i.name.to_lowercase().contains(&wanted));
            }
        }

        true
    }

    /// Apply [`matches`](Self::matches) to a fetched collection, preserving order
    pub fn apply(&self, recipes: &[Recipe]) -> Vec<Recipe> {
        recipes
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecipeIngredient;

    fn summary(name: &str) -> Recipe {
        Recipe {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_vegetarian_excludes_chicken_only() {
        let recipes = vec![
            summary("Beef Wellington"),
            summary("Chicken & Beef Skewers"),
            summary("CHICKEN Pot Pie"),
            summary("Beef Stroganoff"),
        ];
        let filters = RecipeFilters::default().with_restriction(DietaryRestriction::Vegetarian);

        let names: Vec<_> = filters
            .apply(&recipes)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Beef Wellington", "Beef Stroganoff"]);
    }

    #[test]
    fn test_empty_filters_keep_everything() {
        let recipes = vec![summary("Chicken Karaage"), summary("Pad Thai")];
        let filters = RecipeFilters::default();
        assert!(filters.is_empty());
        assert_eq!(filters.apply(&recipes), recipes);
    }

    #[test]
    fn test_restrictions_combine() {
        let filters = RecipeFilters::default()
            .with_restriction(DietaryRestriction::GlutenFree)
            .with_restriction(DietaryRestriction::DairyFree)
            .with_restriction(DietaryRestriction::DairyFree);

        assert_eq!(filters.dietary_restrictions.len(), 2);
        assert!(!filters.matches(&summary("Spaghetti Pasta")));
        assert!(!filters.matches(&summary("Cheese Omelette")));
        assert!(filters.matches(&summary("Grilled Salmon")));
    }

    #[test]
    fn test_area_applies_only_when_known() {
        let filters = RecipeFilters::default().with_area("Italian");

        let mut lasagne = summary("Lasagne");
        lasagne.area = Some("italian".to_string());
        let mut tacos = summary("Tacos");
        tacos.area = Some("Mexican".to_string());

        assert!(filters.matches(&lasagne));
        assert!(!filters.matches(&tacos));
        assert!(filters.matches(&summary("Unknown Origin")));
    }

    #[test]
    fn test_ingredient_substring_match() {
        let filters = RecipeFilters::default().with_ingredient("Chicken");

        let mut curry = summary("Curry");
        curry.ingredients = vec![RecipeIngredient {
            name: "chicken thighs".to_string(),
            measure: "500g".to_string(),
        }];
        let mut salad = summary("Salad");
        salad.ingredients = vec![RecipeIngredient {
            name: "lettuce".to_string(),
            measure: "1 head".to_string(),
        }];

        assert!(filters.matches(&curry));
        assert!(!filters.matches(&salad));
        assert!(filters.matches(&summary("Listing Only")));
    }

    #[test]
    fn test_blank_area_is_inactive() {
        let filters = RecipeFilters::default().with_area("   ");
        assert!(filters.active_area().is_none());
    }

    #[test]
    fn test_serde_tags() {
        let filters: RecipeFilters = serde_json::from_str(
            r#"{"dietaryRestrictions": ["vegetarian", "glutenFree"], "maxCookingTime": 30, "difficulty": "easy", "area": null, "ingredient": null}"#,
        )
        .unwrap();

        assert_eq!(
            filters.dietary_restrictions,
            vec![DietaryRestriction::Vegetarian, DietaryRestriction::GlutenFree]
        );
        assert_eq!(filters.max_cooking_time, Some(30));
        assert_eq!(filters.difficulty, Some(Difficulty::Easy));
    }
}
