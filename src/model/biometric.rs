use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct UserBiometric {
    pub id: i64,
    pub user_id: i64,
    /// Slot assigned by the sensor. Negative values are placeholders used
    /// while resolving an index collision during sync.
    pub sensor_index: Option<i64>,
    pub template_data: Option<String>,
}
