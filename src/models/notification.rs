use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Like,
    Comment,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Like => "like",
            NotificationKind::Comment => "comment",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(NotificationKind::Like),
            "comment" => Ok(NotificationKind::Comment),
            other => Err(format!("unknown notification type: {}", other)),
        }
    }
}

/// Joined row as read from the store; `kind` is still raw text here.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NotificationRow {
    pub id: i64,
    pub kind: String,
    pub rec_id: i64,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub from_username: String,
    pub from_user_avatar: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationOut {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub rec_id: i64,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub from_username: String,
    pub from_user_avatar: String,
}

impl TryFrom<NotificationRow> for NotificationOut {
    type Error = String;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            kind: row.kind.parse()?,
            rec_id: row.rec_id,
            is_read: row.is_read,
            created_at: row.created_at,
            from_username: row.from_username,
            from_user_avatar: row.from_user_avatar,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: i64,
    pub actor_id: i64,
    pub kind: NotificationKind,
    pub rec_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_its_text_form() {
        for kind in [NotificationKind::Like, NotificationKind::Comment] {
            assert_eq!(kind.as_str().parse::<NotificationKind>(), Ok(kind));
        }
        assert!("follow".parse::<NotificationKind>().is_err());
    }

    #[test]
    fn kind_serializes_under_type_key() {
        let out = NotificationOut {
            id: 1,
            kind: NotificationKind::Like,
            rec_id: 7,
            is_read: false,
            created_at: Utc::now(),
            from_username: "bob".to_string(),
            from_user_avatar: String::new(),
        };
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["type"], "like");
        assert_eq!(value["from_username"], "bob");
    }
}
