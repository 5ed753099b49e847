use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Stored in `users.role_id`; carried as the numeric id inside JWT claims.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Maintainer = 1,
    Manager = 2,
    Employee = 3,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Maintainer),
            2 => Some(Role::Manager),
            3 => Some(Role::Employee),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }
}

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordType {
    Entry,
    Exit,
}

impl RecordType {
    pub fn toggled(self) -> Self {
        match self {
            RecordType::Entry => RecordType::Exit,
            RecordType::Exit => RecordType::Entry,
        }
    }

    /// Label shown on the device display.
    pub fn display_label(self) -> &'static str {
        match self {
            RecordType::Entry => "Entrada",
            RecordType::Exit => "Saida",
        }
    }
}

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentType {
    MissingEntry,
    MissingExit,
    Both,
    Certificate,
    Waiver,
    Other,
}

impl AdjustmentType {
    /// Types whose approval synthesizes time records on the target date.
    pub fn creates_records(self) -> bool {
        matches!(
            self,
            AdjustmentType::MissingEntry | AdjustmentType::MissingExit | AdjustmentType::Both
        )
    }

    /// Types that excuse the day from absence counting.
    pub fn is_excusal(self) -> bool {
        matches!(self, AdjustmentType::Certificate | AdjustmentType::Waiver)
    }
}

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentStatus {
    Pending,
    Approved,
    Rejected,
}
