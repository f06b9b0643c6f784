pub use super::preferences::Entity as Preferences;
