//! Teams and the missions that group them.

use crate::error::ServiceResult;
use crate::validation::required_text;
use api_shared::dto::{MissionReq, TeamReq};
use chrono::{DateTime, Utc};
use mission_types::NonEmptyText;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTeam {
    pub name: NonEmptyText,
}

impl NewTeam {
    pub fn from_req(req: &TeamReq) -> ServiceResult<Self> {
        Ok(Self {
            name: required_text("name", req.name.as_deref())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: i64,
    pub name: String,
    pub team_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMission {
    pub name: NonEmptyText,
    pub team_ids: Vec<i64>,
}

impl NewMission {
    pub fn from_req(req: &MissionReq) -> ServiceResult<Self> {
        let mut team_ids = req.team_ids.clone().unwrap_or_default();
        team_ids.sort_unstable();
        team_ids.dedup();
        Ok(Self {
            name: required_text("name", req.name.as_deref())?,
            team_ids,
        })
    }
}
