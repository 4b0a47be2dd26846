pub mod prelude;

pub mod categories;
pub mod ratings;
pub mod show_categories;
pub mod shows;
pub mod users;
