//! Entity module - Contains all SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod finance_budget;
pub mod finance_category;
pub mod finance_entry;
pub mod meal_entry;
pub mod profile;

// Re-export specific types to avoid conflicts
pub use finance_budget::{
    Column as FinanceBudgetColumn, Entity as FinanceBudget, Model as FinanceBudgetModel,
};
pub use finance_category::{
    Column as FinanceCategoryColumn, Entity as FinanceCategory, Model as FinanceCategoryModel,
};
pub use finance_entry::{
    Column as FinanceEntryColumn, Entity as FinanceEntry, Model as FinanceEntryModel,
};
pub use meal_entry::{Column as MealEntryColumn, Entity as MealEntry, Model as MealEntryModel};
pub use profile::{Column as ProfileColumn, Entity as Profile, Model as ProfileModel};
