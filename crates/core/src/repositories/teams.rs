//! Teams and missions.

use crate::db::{teams, SharedDatabase};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Mission, MissionDetail, NewMission, NewTeam, Team};
use api_shared::dto::{MissionReq, TeamReq};
use rusqlite::Connection;

#[derive(Clone, Debug)]
pub struct TeamService {
    db: SharedDatabase,
}

impl TeamService {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    pub fn list_teams(&self) -> ServiceResult<Vec<Team>> {
        let db = self.db.lock()?;
        Ok(teams::list_teams(db.conn())?)
    }

    pub fn get_team(&self, id: i64) -> ServiceResult<Team> {
        let db = self.db.lock()?;
        teams::find_team(db.conn(), id)?.ok_or(ServiceError::NotFound)
    }

    pub fn create_team(&self, req: &TeamReq) -> ServiceResult<Team> {
        let new = NewTeam::from_req(req)?;
        let db = self.db.lock()?;
        Ok(teams::insert_team(db.conn(), &new)?)
    }

    pub fn list_missions(&self) -> ServiceResult<Vec<MissionDetail>> {
        let db = self.db.lock()?;
        let conn = db.conn();
        teams::list_missions(conn)?
            .into_iter()
            .map(|mission| detail(conn, mission))
            .collect()
    }

    pub fn get_mission(&self, id: i64) -> ServiceResult<MissionDetail> {
        let db = self.db.lock()?;
        let mission = teams::find_mission(db.conn(), id)?.ok_or(ServiceError::NotFound)?;
        detail(db.conn(), mission)
    }

    /// Every id in `teamIds` must name an existing team.
    pub fn create_mission(&self, req: &MissionReq) -> ServiceResult<MissionDetail> {
        let new = NewMission::from_req(req)?;
        let mut db = self.db.lock()?;

        for team_id in &new.team_ids {
            teams::find_team(db.conn(), *team_id)?.ok_or(ServiceError::NotFound)?;
        }

        let tx = db.transaction()?;
        let mission = teams::insert_mission(&tx, &new)?;
        let created = detail(&tx, mission)?;
        tx.commit()?;
        Ok(created)
    }
}

fn detail(conn: &Connection, mission: Mission) -> ServiceResult<MissionDetail> {
    let teams = teams::teams_for_mission(conn, mission.id)?;
    Ok(MissionDetail { mission, teams })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::shared_db;

    fn team(service: &TeamService, name: &str) -> Team {
        service
            .create_team(&TeamReq {
                name: Some(name.into()),
            })
            .unwrap()
    }

    #[test]
    fn team_name_is_required() {
        let service = TeamService::new(shared_db());
        let err = service.create_team(&TeamReq::default()).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn mission_carries_its_teams() {
        let service = TeamService::new(shared_db());
        let ortho = team(&service, "Orthopaedics");

        let created = service
            .create_mission(&MissionReq {
                name: Some("Guatemala 2015".into()),
                team_ids: Some(vec![ortho.id]),
            })
            .unwrap();
        let team_ids: Vec<i64> = created.teams.iter().map(|t| t.id).collect();
        assert_eq!(team_ids, vec![ortho.id]);

        let fetched = service.get_mission(created.mission.id).unwrap();
        assert_eq!(fetched.mission.team_ids, vec![ortho.id]);
        assert_eq!(service.list_missions().unwrap().len(), 1);
    }

    #[test]
    fn mission_with_unknown_team_is_not_found() {
        let service = TeamService::new(shared_db());
        let result = service.create_mission(&MissionReq {
            name: Some("Peru 2016".into()),
            team_ids: Some(vec![12]),
        });
        assert!(matches!(result, Err(ServiceError::NotFound)));
        assert!(service.list_missions().unwrap().is_empty());
    }

    #[test]
    fn get_unknown_team_is_not_found() {
        let service = TeamService::new(shared_db());
        assert!(matches!(service.get_team(1), Err(ServiceError::NotFound)));
    }
}
