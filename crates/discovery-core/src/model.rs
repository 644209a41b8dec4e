//! Data model shared by the search index and the recommendation engine
//!
//! Every type here is owned by an external store; the engine only reads them.

use serde::{Deserialize, Serialize};

/// User identifier
pub type UserId = String;

/// A user as supplied by the user store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        username: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            username: username.into(),
            country: country.into(),
            picture: None,
        }
    }

    pub fn with_picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = Some(picture.into());
        self
    }
}

/// Minimal public profile attached to a recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: UserId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

impl From<&User> for PublicProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            picture: user.picture.clone(),
        }
    }
}

/// Latitude/longitude pair in raw degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const ORIGIN: GeoPoint = GeoPoint {
        latitude: 0.0,
        longitude: 0.0,
    };

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Euclidean distance in degree units (not geodesic).
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        let dlat = self.latitude - other.latitude;
        let dlon = self.longitude - other.longitude;
        (dlat * dlat + dlon * dlon).sqrt()
    }

    /// Arithmetic mean of latitude and of longitude. `None` for no points.
    pub fn mean_of<'a>(points: impl IntoIterator<Item = &'a GeoPoint>) -> Option<GeoPoint> {
        let mut count = 0usize;
        let mut lat_sum = 0.0;
        let mut lon_sum = 0.0;
        for p in points {
            count += 1;
            lat_sum += p.latitude;
            lon_sum += p.longitude;
        }
        if count == 0 {
            return None;
        }
        Some(GeoPoint::new(lat_sum / count as f64, lon_sum / count as f64))
    }
}

/// A post, used only for the geo-activity signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub author_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    /// Creation time in milliseconds since the Unix epoch
    pub created_at_ms: i64,
}

impl Post {
    pub fn new(id: impl Into<String>, author_id: impl Into<String>, created_at_ms: i64) -> Self {
        Self {
            id: id.into(),
            author_id: author_id.into(),
            location: None,
            created_at_ms,
        }
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.location = Some(GeoPoint::new(latitude, longitude));
        self
    }
}

/// A friend request that has been sent but not yet accepted or declined
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRelationship {
    pub sender_id: UserId,
    pub receiver_id: UserId,
}

/// Which contribution determined a recommendation's reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    MutualFriends,
    Popularity,
    GeoActivity,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MutualFriends => write!(f, "mutual_friends"),
            Self::Popularity => write!(f, "popularity"),
            Self::GeoActivity => write!(f, "geo_activity"),
        }
    }
}

/// One suggested user with a human-readable reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub user: PublicProfile,
    pub reason: String,
    pub signal: Signal,
    pub score: f64,
}
