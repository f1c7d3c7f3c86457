//! Workflow enumerations for videos and content posts.
//!
//! Stored as `TEXT` columns guarded by `CHECK` constraints; the string forms
//! here must match the migration. Handlers validate incoming values with
//! [`validate_choice`] before they reach the database.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Editing lifecycle of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    Draft,
    Editing,
    Review,
    Published,
}

impl VideoStatus {
    pub const ALL: [Self; 4] = [Self::Draft, Self::Editing, Self::Review, Self::Published];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Editing => "editing",
            Self::Review => "review",
            Self::Published => "published",
        }
    }
}

/// Planning and publishing lifecycle of a content post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Idea,
    Draft,
    Ready,
    Scheduled,
    Posted,
    Failed,
}

impl PostStatus {
    pub const ALL: [Self; 6] = [
        Self::Idea,
        Self::Draft,
        Self::Ready,
        Self::Scheduled,
        Self::Posted,
        Self::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idea => "idea",
            Self::Draft => "draft",
            Self::Ready => "ready",
            Self::Scheduled => "scheduled",
            Self::Posted => "posted",
            Self::Failed => "failed",
        }
    }
}

/// Social platform a post targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Linkedin,
    Whatsapp,
    Instagram,
    Twitter,
}

impl Platform {
    pub const ALL: [Self; 5] = [
        Self::Youtube,
        Self::Linkedin,
        Self::Whatsapp,
        Self::Instagram,
        Self::Twitter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Linkedin => "linkedin",
            Self::Whatsapp => "whatsapp",
            Self::Instagram => "instagram",
            Self::Twitter => "twitter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Self; 4] = [Self::Low, Self::Normal, Self::High, Self::Urgent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

/// Implements `Display` and `FromStr` from `as_str` / `ALL`.
macro_rules! string_enum {
    ($ty:ident, $label:literal) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| {
                        let allowed: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                        CoreError::Validation(format!(
                            "Invalid {} '{s}'. Must be one of: {}",
                            $label,
                            allowed.join(", ")
                        ))
                    })
            }
        }
    };
}

string_enum!(VideoStatus, "video status");
string_enum!(PostStatus, "post status");
string_enum!(Platform, "platform");
string_enum!(Priority, "priority");

/// Validate an optional string field against one of the enums above.
pub fn validate_choice<T: FromStr<Err = CoreError>>(value: Option<&str>) -> Result<(), CoreError> {
    match value {
        Some(v) => v.parse::<T>().map(|_| ()),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
