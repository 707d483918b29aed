//! Team and mission queries.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::DbResult;
use crate::models::{Mission, NewMission, NewTeam, Team};
use chrono::Utc;

const TEAM_COLUMNS: &str = "t.id, t.name, t.created_at, t.updated_at";

fn map_team(row: &Row<'_>) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

pub fn insert_team(conn: &Connection, new: &NewTeam) -> DbResult<Team> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO teams (name, created_at, updated_at) VALUES (?1, ?2, ?2)",
        params![new.name.as_str(), now],
    )?;
    Ok(Team {
        id: conn.last_insert_rowid(),
        name: new.name.as_str().to_string(),
        created_at: now,
        updated_at: now,
    })
}

pub fn find_team(conn: &Connection, id: i64) -> DbResult<Option<Team>> {
    conn.query_row(
        &format!("SELECT {TEAM_COLUMNS} FROM teams t WHERE t.id = ?1"),
        [id],
        map_team,
    )
    .optional()
    .map_err(Into::into)
}

pub fn list_teams(conn: &Connection) -> DbResult<Vec<Team>> {
    let mut stmt = conn.prepare(&format!("SELECT {TEAM_COLUMNS} FROM teams t ORDER BY t.id"))?;
    let teams = stmt
        .query_map([], map_team)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(teams)
}

pub fn teams_for_mission(conn: &Connection, mission_id: i64) -> DbResult<Vec<Team>> {
    let mut stmt = conn.prepare(&format!(
        r#"
        SELECT {TEAM_COLUMNS} FROM teams t
        JOIN mission_teams mt ON mt.team_id = t.id
        WHERE mt.mission_id = ?1
        ORDER BY t.id
        "#
    ))?;
    let teams = stmt
        .query_map([mission_id], map_team)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(teams)
}

/// Inserts the mission and its team links. Callers wrap this in a transaction.
pub fn insert_mission(conn: &Connection, new: &NewMission) -> DbResult<Mission> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO missions (name, created_at, updated_at) VALUES (?1, ?2, ?2)",
        params![new.name.as_str(), now],
    )?;
    let id = conn.last_insert_rowid();

    let mut link = conn.prepare("INSERT INTO mission_teams (mission_id, team_id) VALUES (?1, ?2)")?;
    for team_id in &new.team_ids {
        link.execute(params![id, team_id])?;
    }

    Ok(Mission {
        id,
        name: new.name.as_str().to_string(),
        team_ids: new.team_ids.clone(),
        created_at: now,
        updated_at: now,
    })
}

fn team_ids(conn: &Connection, mission_id: i64) -> DbResult<Vec<i64>> {
    let mut stmt =
        conn.prepare("SELECT team_id FROM mission_teams WHERE mission_id = ?1 ORDER BY team_id")?;
    let ids = stmt
        .query_map([mission_id], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}

pub fn find_mission(conn: &Connection, id: i64) -> DbResult<Option<Mission>> {
    let row = conn
        .query_row(
            "SELECT id, name, created_at, updated_at FROM missions WHERE id = ?1",
            [id],
            |row| {
                Ok(Mission {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    team_ids: Vec::new(),
                    created_at: row.get(2)?,
                    updated_at: row.get(3)?,
                })
            },
        )
        .optional()?;

    match row {
        Some(mut mission) => {
            mission.team_ids = team_ids(conn, mission.id)?;
            Ok(Some(mission))
        }
        None => Ok(None),
    }
}

pub fn list_missions(conn: &Connection) -> DbResult<Vec<Mission>> {
    let mut stmt = conn.prepare("SELECT id FROM missions ORDER BY id")?;
    let ids = stmt
        .query_map([], |row| row.get::<_, i64>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut missions = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(mission) = find_mission(conn, id)? {
            missions.push(mission);
        }
    }
    Ok(missions)
}
