//! Sample data generation.
//!
//! Fills the four built-in tables with synthetic records so the query builder
//! has something to filter. Output is deterministic for a fixed seed, date
//! and clock.

use chrono::{Days, NaiveDate, Utc};
use serde_json::{json, Map, Value};
use uuid::Builder;

use crate::schema::{ACHIEVEMENTS, GAMES, PLAYERS, SCORES};
use crate::{Dataset, Record};

/// Default number of records per table.
pub const DEFAULT_COUNT: usize = 50;

/// Options for [`seed_dataset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedOptions {
    /// Records generated per table.
    pub count: usize,

    /// RNG seed; `None` picks a random one.
    pub seed: Option<u64>,

    /// Reference date for the generated date fields.
    pub today: NaiveDate,

    /// Creation time of the first record, in milliseconds since the epoch.
    pub now_millis: i64,
}

impl Default for SeedOptions {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            count: DEFAULT_COUNT,
            seed: None,
            today: now.date_naive(),
            now_millis: now.timestamp_millis(),
        }
    }
}

impl SeedOptions {
    /// Sets the number of records per table.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

struct Generator {
    rng: fastrand::Rng,
    clock: i64,
}

impl Generator {
    fn record(&mut self, fields: Value) -> Record {
        let mut bytes = [0u8; 16];
        self.rng.fill(&mut bytes);
        let id = Builder::from_random_bytes(bytes).into_uuid().to_string();

        let creation_time = self.clock;
        self.clock += 1;

        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Record {
            id,
            creation_time,
            fields,
        }
    }
}

fn days_before(today: NaiveDate, days: usize) -> String {
    today
        .checked_sub_days(Days::new(days as u64))
        .unwrap_or(NaiveDate::MIN)
        .format("%Y-%m-%d")
        .to_string()
}

/// Generates a fresh dataset of players, games, scores and achievements.
///
/// Scores and achievements reference players and games by `_id`, assigned
/// round-robin.
pub fn seed_dataset(options: &SeedOptions) -> Dataset {
    let rng = match options.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let mut generator = Generator {
        rng,
        clock: options.now_millis,
    };
    let mut dataset = Dataset::new();
    let today = options.today;

    let mut player_ids = Vec::with_capacity(options.count);
    for i in 0..options.count {
        let n = i + 1;
        let total_score = generator.rng.u32(0..10_000);
        let is_active = generator.rng.f64() > 0.2;
        let record = generator.record(json!({
            "name": format!("Player {n}"),
            "email": format!("player{n}@example.com"),
            "registrationDate": days_before(today, i),
            "totalScore": total_score,
            "isActive": is_active,
        }));
        player_ids.push(dataset.insert(PLAYERS, record));
    }

    let mut game_ids = Vec::with_capacity(options.count);
    for i in 0..options.count {
        let n = i + 1;
        let record = generator.record(json!({
            "title": format!("Game {n}"),
            "description": format!("Description for Game {n}"),
            "releaseDate": days_before(today, i * 30),
        }));
        game_ids.push(dataset.insert(GAMES, record));
    }

    if player_ids.is_empty() || game_ids.is_empty() {
        tracing::debug!("no players or games generated, skipping scores and achievements");
        return dataset;
    }

    for i in 0..options.count {
        let score = generator.rng.u32(0..10_000);
        let record = generator.record(json!({
            "playerId": player_ids[i % player_ids.len()],
            "gameId": game_ids[i % game_ids.len()],
            "score": score,
            "achievedDate": days_before(today, i * 10),
        }));
        dataset.insert(SCORES, record);
    }

    for i in 0..options.count {
        let record = generator.record(json!({
            "playerId": player_ids[i % player_ids.len()],
            "gameId": game_ids[i % game_ids.len()],
            "achievementTitle": format!("Achievement {}", i + 1),
            "achievementDate": days_before(today, i * 5),
        }));
        dataset.insert(ACHIEVEMENTS, record);
    }

    tracing::debug!(count = options.count, seed = ?options.seed, "seeded sample dataset");
    dataset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TABLES;

    fn options() -> SeedOptions {
        SeedOptions {
            count: 50,
            seed: Some(7),
            today: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            now_millis: 1_710_000_000_000,
        }
    }

    #[test]
    fn test_every_table_gets_count_records() {
        let dataset = seed_dataset(&options());
        for table in TABLES {
            assert_eq!(dataset.table(table).unwrap().len(), 50, "{table}");
        }
    }

    #[test]
    fn test_player_fields() {
        let dataset = seed_dataset(&options());
        let players = dataset.table(PLAYERS).unwrap();

        let first = &players[0].fields;
        assert_eq!(first["name"], json!("Player 1"));
        assert_eq!(first["email"], json!("player1@example.com"));
        assert_eq!(first["registrationDate"], json!("2024-03-15"));
        assert_eq!(players[2].fields["registrationDate"], json!("2024-03-13"));

        for player in players {
            let score = player.fields["totalScore"].as_u64().unwrap();
            assert!(score < 10_000);
            assert!(player.fields["isActive"].is_boolean());
        }
    }

    #[test]
    fn test_date_steps_per_table() {
        let dataset = seed_dataset(&options());
        assert_eq!(
            dataset.table(GAMES).unwrap()[1].fields["releaseDate"],
            json!("2024-02-14")
        );
        assert_eq!(
            dataset.table(SCORES).unwrap()[1].fields["achievedDate"],
            json!("2024-03-05")
        );
        assert_eq!(
            dataset.table(ACHIEVEMENTS).unwrap()[1].fields["achievementDate"],
            json!("2024-03-10")
        );
    }

    #[test]
    fn test_references_are_round_robin() {
        let dataset = seed_dataset(&options().with_count(5));
        let players = dataset.table(PLAYERS).unwrap();
        let games = dataset.table(GAMES).unwrap();
        for (i, score) in dataset.table(SCORES).unwrap().iter().enumerate() {
            assert_eq!(score.fields["playerId"], json!(players[i].id));
            assert_eq!(score.fields["gameId"], json!(games[i].id));
        }
    }

    #[test]
    fn test_same_seed_same_dataset() {
        assert_eq!(seed_dataset(&options()), seed_dataset(&options()));
    }

    #[test]
    fn test_different_seed_different_scores() {
        let a = seed_dataset(&options());
        let b = seed_dataset(&options().with_seed(8));
        assert_ne!(a, b);
    }

    #[test]
    fn test_creation_times_increase() {
        let dataset = seed_dataset(&options().with_count(3));
        let players = dataset.table(PLAYERS).unwrap();
        assert_eq!(players[0].creation_time, 1_710_000_000_000);
        assert!(players[0].creation_time < players[1].creation_time);
    }

    #[test]
    fn test_zero_count_is_empty() {
        let dataset = seed_dataset(&options().with_count(0));
        assert!(dataset.is_empty());
    }
}
