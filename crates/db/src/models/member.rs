//! Member entity model and directory response shapes.

use chrono::NaiveDate;
use rendezvous_core::directory::age_on;
use rendezvous_core::gender::Gender;
use rendezvous_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::photo::Photo;

/// Full row from the `members` table.
#[derive(Debug, Clone, FromRow)]
pub struct Member {
    pub id: DbId,
    pub username: String,
    pub known_as: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub introduction: Option<String>,
    pub looking_for: Option<String>,
    pub interests: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub created_at: Timestamp,
    pub last_active: Timestamp,
    pub updated_at: Timestamp,
}

impl Member {
    /// Parsed gender, or `None` if the stored value is blank.
    pub fn gender(&self) -> Option<Gender> {
        Gender::parse(&self.gender)
    }

    /// Build the detail view with the member's photos.
    pub fn into_detail(self, photos: Vec<Photo>, today: NaiveDate) -> MemberDetail {
        let photo_url = photos.iter().find(|p| p.is_main).map(|p| p.url.clone());
        MemberDetail {
            summary: MemberSummary {
                id: self.id,
                username: self.username,
                known_as: self.known_as,
                age: age_on(self.date_of_birth, today),
                gender: self.gender,
                photo_url,
                city: self.city,
                country: self.country,
                created_at: self.created_at,
                last_active: self.last_active,
            },
            introduction: self.introduction,
            looking_for: self.looking_for,
            interests: self.interests,
            photos,
        }
    }
}

/// DTO for seeding a member. Registration itself lives outside this service.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMember {
    pub username: String,
    pub known_as: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Listing row as fetched from the directory query.
#[derive(Debug, Clone, FromRow)]
pub struct MemberSummaryRow {
    pub id: DbId,
    pub username: String,
    pub known_as: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub photo_url: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub created_at: Timestamp,
    pub last_active: Timestamp,
}

impl MemberSummaryRow {
    pub fn into_summary(self, today: NaiveDate) -> MemberSummary {
        MemberSummary {
            id: self.id,
            username: self.username,
            known_as: self.known_as,
            age: age_on(self.date_of_birth, today),
            gender: self.gender,
            photo_url: self.photo_url,
            city: self.city,
            country: self.country,
            created_at: self.created_at,
            last_active: self.last_active,
        }
    }
}

/// Public directory card for a member.
#[derive(Debug, Clone, Serialize)]
pub struct MemberSummary {
    pub id: DbId,
    pub username: String,
    pub known_as: String,
    pub age: i32,
    pub gender: String,
    /// URL of the main photo, if the member has one.
    pub photo_url: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub created_at: Timestamp,
    pub last_active: Timestamp,
}

/// Full public profile returned by `GET /users/{username}`.
#[derive(Debug, Clone, Serialize)]
pub struct MemberDetail {
    #[serde(flatten)]
    pub summary: MemberSummary,
    pub introduction: Option<String>,
    pub looking_for: Option<String>,
    pub interests: Option<String>,
    pub photos: Vec<Photo>,
}
