use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait};

use crate::entities::{prelude::*, preferences};
use game_types::PlayerName;

/// Key under which the player's display name is stored.
pub const PLAYER_NAME_KEY: &str = "USER_NAME";

/// Persisted key/value settings. Absence of the name key means first launch.
pub struct PreferenceRepository {
    db: DatabaseConnection,
}

impl PreferenceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let model = Preferences::find_by_id(key.to_string()).one(&self.db).await?;
        Ok(model.map(|model| model.value))
    }

    /// Insert or overwrite a value.
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let model = preferences::ActiveModel {
            key: ActiveValue::Set(key.to_string()),
            value: ActiveValue::Set(value.to_string()),
            updated_at: ActiveValue::Set(chrono::Utc::now().into()),
        };

        Preferences::insert(model)
            .on_conflict(
                OnConflict::column(preferences::Column::Key)
                    .update_columns([preferences::Column::Value, preferences::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<bool> {
        let result = Preferences::delete_by_id(key.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// The saved display name, if one was ever set.
    pub async fn player_name(&self) -> Result<Option<PlayerName>> {
        let Some(raw) = self.get(PLAYER_NAME_KEY).await? else {
            return Ok(None);
        };

        match PlayerName::parse(&raw) {
            Ok(name) => Ok(Some(name)),
            Err(e) => {
                tracing::warn!("Ignoring stored player name: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn save_player_name(&self, name: &PlayerName) -> Result<()> {
        self.set(PLAYER_NAME_KEY, name.as_str()).await?;
        tracing::info!("Saved player name");
        Ok(())
    }
}
