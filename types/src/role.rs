//! Claimed roles and social platforms.
//!
//! Both vocabularies are closed: anything outside them is rejected at the
//! validation boundary, so downstream code only ever sees these enums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// The role category a caller claims. Determines the follower threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Influencer,
    Celebrity,
    Vip,
    Executive,
    ContentCreator,
    PublicFigure,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Influencer,
        Role::Celebrity,
        Role::Vip,
        Role::Executive,
        Role::ContentCreator,
        Role::PublicFigure,
    ];

    /// Canonical lower-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Influencer => "influencer",
            Self::Celebrity => "celebrity",
            Self::Vip => "vip",
            Self::Executive => "executive",
            Self::ContentCreator => "content-creator",
            Self::PublicFigure => "public-figure",
        }
    }

    /// Title-cased label for display, e.g. `Content-Creator`.
    pub fn display_name(&self) -> String {
        title_case(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TypesError::UnknownRole(s.to_string()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The social platform the follower count was claimed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Instagram,
    Youtube,
    Tiktok,
    Linkedin,
    Facebook,
    Twitch,
}

impl Platform {
    pub const ALL: [Platform; 7] = [
        Platform::Twitter,
        Platform::Instagram,
        Platform::Youtube,
        Platform::Tiktok,
        Platform::Linkedin,
        Platform::Facebook,
        Platform::Twitch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Instagram => "instagram",
            Self::Youtube => "youtube",
            Self::Tiktok => "tiktok",
            Self::Linkedin => "linkedin",
            Self::Facebook => "facebook",
            Self::Twitch => "twitch",
        }
    }

    pub fn display_name(&self) -> String {
        title_case(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TypesError::UnknownPlatform(s.to_string()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper-case the first letter of every alphabetic run.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
