pub use super::categories::Entity as Categories;
pub use super::ratings::Entity as Ratings;
pub use super::show_categories::Entity as ShowCategories;
pub use super::shows::Entity as Shows;
pub use super::users::Entity as Users;
