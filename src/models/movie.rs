use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub director: String,
    pub description: Option<String>,
    pub showtime: String,
    pub showdate: String,
    // Poster bytes never leave through JSON responses
    #[serde(skip_serializing, default)]
    pub image: Option<Vec<u8>>,
}
