use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema, SqlErr,
    TransactionError,
};

pub mod entity;
pub mod minigames;
pub mod players;
pub mod scoreboard;
pub mod settings;
pub mod teams;

use entity::{attack_record, common_setting, minigame, player, team};

pub async fn create_db_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(max_connections)
        .min_connections(1)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;
    log::info!("Connected to database ({} connections max)", max_connections);
    Ok(db)
}

/// Creates every table that does not exist yet. Teams come before players
/// so the foreign key has a target.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    let mut team_table = schema.create_table_from_entity(team::Entity);
    let mut player_table = schema.create_table_from_entity(player::Entity);
    let mut minigame_table = schema.create_table_from_entity(minigame::Entity);
    let mut settings_table = schema.create_table_from_entity(common_setting::Entity);
    let mut attack_table = schema.create_table_from_entity(attack_record::Entity);

    for table in [
        team_table.if_not_exists(),
        player_table.if_not_exists(),
        minigame_table.if_not_exists(),
        settings_table.if_not_exists(),
        attack_table.if_not_exists(),
    ] {
        db.execute(&*table).await?;
    }
    log::debug!("Database schema is up to date");
    Ok(())
}

/// Unwraps a transaction result, turning connection failures into the
/// storage variant of the caller's error type.
pub(crate) fn settle<T, E>(
    result: Result<T, TransactionError<E>>,
    storage: impl FnOnce(String) -> E,
) -> Result<T, E>
where
    E: std::error::Error,
{
    match result {
        Ok(value) => Ok(value),
        Err(TransactionError::Transaction(e)) => Err(e),
        Err(TransactionError::Connection(e)) => Err(storage(e.to_string())),
    }
}

pub(crate) enum ConstraintFailure {
    Unique(String),
    ForeignKey(String),
    Other(String),
}

pub(crate) fn classify(err: &DbErr) -> ConstraintFailure {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => ConstraintFailure::Unique(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => ConstraintFailure::ForeignKey(msg),
        _ => ConstraintFailure::Other(err.to_string()),
    }
}
