//! Built-in table names and their field catalogs.

use qq_predicate::{FieldCatalog, FieldDescriptor, SemanticType};

/// Players table.
pub const PLAYERS: &str = "players";
/// Games table.
pub const GAMES: &str = "games";
/// Scores table.
pub const SCORES: &str = "scores";
/// Achievements table.
pub const ACHIEVEMENTS: &str = "achievements";

/// All built-in tables, in seeding order.
pub const TABLES: [&str; 4] = [PLAYERS, GAMES, SCORES, ACHIEVEMENTS];

/// Returns the field catalog the editor offers for `table`.
///
/// Returns `None` for tables outside the built-in schema.
pub fn catalog_for(table: &str) -> Option<FieldCatalog> {
    let fields = match table {
        PLAYERS => vec![
            FieldDescriptor::new("name", SemanticType::Text).with_label("Name"),
            FieldDescriptor::new("email", SemanticType::Text).with_label("Email"),
            FieldDescriptor::new("registrationDate", SemanticType::Date)
                .with_label("Registration Date")
                .with_input_type("date"),
            FieldDescriptor::new("totalScore", SemanticType::Number)
                .with_label("Total Score")
                .with_input_type("number"),
            FieldDescriptor::new("isActive", SemanticType::Boolean).with_label("Is Active"),
        ],
        GAMES => vec![
            FieldDescriptor::new("title", SemanticType::Text).with_label("Title"),
            FieldDescriptor::new("description", SemanticType::Text).with_label("Description"),
            FieldDescriptor::new("releaseDate", SemanticType::Date)
                .with_label("Release Date")
                .with_input_type("date"),
        ],
        SCORES => vec![
            FieldDescriptor::new("playerId", SemanticType::Text).with_label("Player"),
            FieldDescriptor::new("gameId", SemanticType::Text).with_label("Game"),
            FieldDescriptor::new("score", SemanticType::Number)
                .with_label("Score")
                .with_input_type("number"),
            FieldDescriptor::new("achievedDate", SemanticType::Date)
                .with_label("Achieved Date")
                .with_input_type("date"),
        ],
        ACHIEVEMENTS => vec![
            FieldDescriptor::new("playerId", SemanticType::Text).with_label("Player"),
            FieldDescriptor::new("gameId", SemanticType::Text).with_label("Game"),
            FieldDescriptor::new("achievementTitle", SemanticType::Text)
                .with_label("Achievement"),
            FieldDescriptor::new("achievementDate", SemanticType::Date)
                .with_label("Achievement Date")
                .with_input_type("date"),
        ],
        _ => return None,
    };
    Some(FieldCatalog::new(fields))
}
