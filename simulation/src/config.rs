//! Loading and validation of [`GameConfig`] files.

use std::{
    io,
    path::{Path, PathBuf},
};

use candy_crawl_core::{CountRange, GameConfig, RulesConfig, MIN_BOARD_SIDE};
use candy_crawl_system_board_generation::pool_capacity;
use thiserror::Error;

pub use candy_crawl_core::MAX_BOARD_SIDE;

/// Reasons a configuration is refused before any level is generated.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The configuration was not valid TOML or had mistyped fields.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The board cannot hold a player start and a separate exit.
    #[error("board of {columns}x{rows} is too small; both sides need at least {} cells", MIN_BOARD_SIDE)]
    BoardTooSmall {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// The board exceeds [`MAX_BOARD_SIDE`] on some side.
    #[error("board of {columns}x{rows} exceeds the {} cell side limit", MAX_BOARD_SIDE)]
    BoardTooLarge {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// Obstacles and pickups may together ask for more cells than the pool holds.
    #[error("position pool holds {capacity} cells but placements may demand {demand}")]
    PoolTooSmall {
        /// Cells available for random placement.
        capacity: u32,
        /// Worst-case obstacle and pickup count.
        demand: u32,
    },
    /// A count range had its bounds inverted.
    #[error("{field} range is inverted: {minimum} > {maximum}")]
    InvalidRange {
        /// Name of the offending setting.
        field: &'static str,
        /// Configured lower bound.
        minimum: u32,
        /// Configured upper bound.
        maximum: u32,
    },
    /// A rule constant lies below its smallest meaningful value.
    #[error("{field} is {value} but must be at least {minimum}")]
    RuleOutOfRange {
        /// Name of the offending setting.
        field: &'static str,
        /// Configured value.
        value: i32,
        /// Smallest accepted value.
        minimum: i32,
    },
}

/// Parses and validates a TOML document. Missing keys fall back to defaults.
pub fn from_toml_str(contents: &str) -> Result<GameConfig, ConfigError> {
    let config: GameConfig = toml::from_str(contents)?;
    validate(&config)?;
    Ok(config)
}

/// Reads, parses and validates the TOML file at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<GameConfig, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_toml_str(&contents)
}

/// Checks that every level the configuration describes can be generated,
/// ignoring enemies, whose count depends on the level.
pub fn validate(config: &GameConfig) -> Result<(), ConfigError> {
    let board = &config.board;
    check_board(board.columns, board.rows)?;
    check_range("obstacle_count", board.obstacle_count)?;
    check_range("pickup_count", board.pickup_count)?;
    check_rules(&config.rules)?;

    let capacity = pool_capacity(board.columns, board.rows);
    let demand = board
        .obstacle_count
        .maximum
        .saturating_add(board.pickup_count.maximum);
    if demand > capacity {
        return Err(ConfigError::PoolTooSmall { capacity, demand });
    }
    Ok(())
}

/// Checks a board's sides against [`MIN_BOARD_SIDE`] and [`MAX_BOARD_SIDE`].
pub fn check_board(columns: u32, rows: u32) -> Result<(), ConfigError> {
    if columns < MIN_BOARD_SIDE || rows < MIN_BOARD_SIDE {
        return Err(ConfigError::BoardTooSmall { columns, rows });
    }
    if columns > MAX_BOARD_SIDE || rows > MAX_BOARD_SIDE {
        return Err(ConfigError::BoardTooLarge { columns, rows });
    }
    Ok(())
}

fn check_rules(rules: &RulesConfig) -> Result<(), ConfigError> {
    // Walls must lose hit points and moves must not feed the player.
    for (field, value, minimum) in [
        ("wall_damage", rules.wall_damage, 1),
        ("wall_hit_points", rules.wall_hit_points, 1),
        ("food_per_move", rules.food_per_move, 0),
    ] {
        if value < minimum {
            return Err(ConfigError::RuleOutOfRange {
                field,
                value,
                minimum,
            });
        }
    }
    Ok(())
}

fn check_range(field: &'static str, range: CountRange) -> Result<(), ConfigError> {
    if range.minimum > range.maximum {
        return Err(ConfigError::InvalidRange {
            field,
            minimum: range.minimum,
            maximum: range.maximum,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(validate(&GameConfig::default()).is_ok());
    }

    #[test]
    fn partial_documents_keep_defaults() {
        let config = from_toml_str(
            r#"
            [rules]
            starting_food = 30

            [pacing]
            level_start_delay_ms = 0
            "#,
        )
        .expect("valid config");
        assert_eq!(config.rules.starting_food, 30);
        assert_eq!(config.rules.points_per_soda, 20);
        assert_eq!(config.pacing.level_start_delay_ms, 0);
        assert_eq!(config.pacing.turn_delay_ms, 100);
        assert_eq!(config.board.columns, 8);
    }

    #[test]
    fn ranges_parse_as_tables() {
        let config = from_toml_str(
            r#"
            [board]
            columns = 10
            rows = 6
            obstacle_count = { minimum = 2, maximum = 3 }
            "#,
        )
        .expect("valid config");
        assert_eq!(config.board.obstacle_count, CountRange::new(2, 3));
        assert_eq!(config.board.pickup_count, CountRange::new(1, 5));
    }

    #[test]
    fn over_demanding_counts_are_refused() {
        let error = from_toml_str(
            r#"
            [board]
            columns = 4
            rows = 4
            "#,
        )
        .expect_err("pool of 4 cannot host 14 placements");
        assert!(matches!(
            error,
            ConfigError::PoolTooSmall {
                capacity: 4,
                demand: 14,
            }
        ));
    }

    #[test]
    fn inverted_ranges_are_refused() {
        let mut config = GameConfig::default();
        config.board.pickup_count = CountRange::new(3, 1);
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidRange {
                field: "pickup_count",
                minimum: 3,
                maximum: 1,
            })
        ));
    }

    #[test]
    fn degenerate_boards_are_refused() {
        let mut config = GameConfig::default();
        config.board.columns = 1;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::BoardTooSmall { columns: 1, rows: 8 })
        ));
    }

    #[test]
    fn oversized_boards_are_refused() {
        assert!(matches!(
            check_board(MAX_BOARD_SIDE + 1, 8),
            Err(ConfigError::BoardTooLarge {
                columns: 257,
                rows: 8,
            })
        ));
        assert!(check_board(MAX_BOARD_SIDE, MIN_BOARD_SIDE).is_ok());
    }

    #[test]
    fn harmless_wall_damage_is_refused() {
        let mut config = GameConfig::default();
        config.rules.wall_damage = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::RuleOutOfRange {
                field: "wall_damage",
                value: 0,
                minimum: 1,
            })
        ));
    }

    #[test]
    fn feeding_moves_are_refused() {
        let error = from_toml_str(
            r#"
            [rules]
            food_per_move = -2
            "#,
        )
        .expect_err("negative move cost");
        assert!(matches!(
            error,
            ConfigError::RuleOutOfRange {
                field: "food_per_move",
                value: -2,
                minimum: 0,
            }
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            from_toml_str("[board\ncolumns = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
