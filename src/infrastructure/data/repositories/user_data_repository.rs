use async_trait::async_trait;
use serde_json::Value;

use crate::domain::repositories::{StoreError, UserDataStore};
use crate::infrastructure::data::db_context::surrealdb_context::DB;

/// Raw-row reads over the product's user-data tables, used only by the
/// audited admin query path. Rows come back as untyped JSON because the
/// admin surface reports rather than interprets them.
pub struct UserDataRepository;

impl UserDataRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UserDataStore for UserDataRepository {
    async fn fetch(
        &self,
        table: &str,
        target_user_id: Option<&str>,
    ) -> Result<Vec<Value>, StoreError> {
        let mut query = String::from("SELECT * FROM type::table($table)");
        if target_user_id.is_some() {
            query.push_str(" WHERE user_id = $user_id");
        }

        let mut statement = DB.query(query).bind(("table", table.to_owned()));
        if let Some(user_id) = target_user_id {
            statement = statement.bind(("user_id", user_id.to_owned()));
        }

        let mut response = statement.await?;
        Ok(response.take::<Vec<Value>>(0)?)
    }
}
