/*
 * Responsibility
 * - Handler から見える「認証済み主体」の型
 * - middleware が検証・lookup して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証や user lookup は middleware/services 側の責務
 * - Principal は一度作られたら変更しない (handler には clone が渡る)
 */
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Account role used for route gating.
///
/// Stored role text outside the known set is kept as `Other`. Such users can
/// still authenticate; no role gate is ever configured with `Other`, so every
/// gated route answers them 403.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Recruiter,
    Seeker,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Recruiter => "recruiter",
            Role::Seeker => "seeker",
            Role::Other(role) => role,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            "recruiter" => Role::Recruiter,
            "seeker" => Role::Seeker,
            other => Role::Other(other.to_string()),
        }
    }
}

impl FromStr for Role {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Role::from(s))
    }
}

/// 認証済みのリクエストに付与される主体
///
/// - `id` は token の subject (= users.id)
/// - `role` / `email` / `name` は lookup 時点の user record から取る
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: String,
    pub role: Role,
    pub email: String,
    pub name: String,
}
