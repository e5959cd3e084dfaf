use serde::{Deserialize, Serialize};

/// A related record the backend sends either as a bare id or embedded in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference<T> {
    ById(String),
    Embedded(T),
}

pub trait Named {
    fn id(&self) -> Option<&str>;
    fn name(&self) -> Option<&str>;
}

impl<T: Named> Reference<T> {
    pub fn id(&self) -> Option<&str> {
        match self {
            Reference::ById(id) => Some(id),
            Reference::Embedded(value) => value.id(),
        }
    }

    /// Best label for people-facing text. Bare ids are shown as-is.
    pub fn display_name(&self) -> String {
        match self {
            Reference::ById(id) => id.clone(),
            Reference::Embedded(value) => value
                .name()
                .or_else(|| value.id())
                .unwrap_or(UNKNOWN_NAME)
                .to_string(),
        }
    }
}

const UNKNOWN_NAME: &str = "Unknown user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    BasicUser,
    Admin,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Option<String>,
    pub username: Option<String>,
    pub name: Option<String>,
    pub role: Option<UserRole>,
    #[serde(default, alias = "isActive")]
    pub active: bool,
}

impl Named for UserSummary {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.username.as_deref().filter(|username| !username.is_empty()))
    }
}
