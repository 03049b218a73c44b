use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use log::info;
use validator::Validate;

use crate::{
    RecordId, ServiceError, ServiceResult,
    club::{ArcClubRepository, ClubId},
    coach::{ArcCoachRepository, CoachId},
    util::{merge, merge_opt, non_blank, now, validate_input},
};

pub type TeamId = RecordId;

#[derive(Clone, Debug)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub sport_type: String,
    pub club_id: Option<ClubId>,
    pub coach_id: Option<CoachId>,
    pub level: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub founded_year: Option<i32>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Validate)]
pub struct NewTeam {
    #[validate(
        length(min = 1, max = 100, message = "must be 1 to 100 characters"),
        custom(function = "non_blank")
    )]
    pub name: String,
    #[validate(
        length(min = 1, max = 50, message = "must be 1 to 50 characters"),
        custom(function = "non_blank")
    )]
    pub sport_type: String,
    pub club_id: Option<ClubId>,
    pub coach_id: Option<CoachId>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub level: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub city: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub country: Option<String>,
    #[validate(range(min = 1800, message = "must not be before 1800"))]
    pub founded_year: Option<i32>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Validate)]
pub struct TeamUpdate {
    #[validate(
        length(min = 1, max = 100, message = "must be 1 to 100 characters"),
        custom(function = "non_blank")
    )]
    pub name: Option<String>,
    #[validate(
        length(min = 1, max = 50, message = "must be 1 to 50 characters"),
        custom(function = "non_blank")
    )]
    pub sport_type: Option<String>,
    pub club_id: Option<ClubId>,
    pub coach_id: Option<CoachId>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub level: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub city: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub country: Option<String>,
    #[validate(range(min = 1800, message = "must not be before 1800"))]
    pub founded_year: Option<i32>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct TeamFilter {
    pub sport_type: Option<String>,
    pub club_id: Option<ClubId>,
    pub coach_id: Option<CoachId>,
    pub include_inactive: bool,
}

impl TeamFilter {
    pub fn matches(&self, team: &Team) -> bool {
        (self.include_inactive || team.is_active)
            && self
                .sport_type
                .as_ref()
                .is_none_or(|s| *s == team.sport_type)
            && self.club_id.is_none_or(|c| team.club_id == Some(c))
            && self.coach_id.is_none_or(|c| team.coach_id == Some(c))
    }
}

pub type ArcTeamRepository = Arc<Box<dyn TeamRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait TeamRepository {
    async fn get_team_by_id(&self, id: TeamId) -> ServiceResult<Option<Team>>;
    async fn get_teams(&self, filter: &TeamFilter) -> ServiceResult<Vec<Team>>;
    async fn create_team(&self, team: &Team) -> ServiceResult<TeamId>;
    async fn save_team(&self, team: &Team) -> ServiceResult<()>;
}

pub type ArcTeamService = Arc<Box<dyn TeamService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait TeamService {
    async fn get_teams(&self, filter: TeamFilter) -> ServiceResult<Vec<Team>>;
    async fn get_team(&self, id: TeamId) -> ServiceResult<Team>;
    async fn create_team(&self, new_team: NewTeam) -> ServiceResult<Team>;
    async fn update_team(&self, id: TeamId, update: TeamUpdate) -> ServiceResult<Team>;
    async fn delete_team(&self, id: TeamId) -> ServiceResult<()>;
    async fn set_logo(&self, id: TeamId, path: String) -> ServiceResult<Team>;
}

pub struct TeamServiceImpl {
    team_repository: ArcTeamRepository,
    club_repository: ArcClubRepository,
    coach_repository: ArcCoachRepository,
}

impl TeamServiceImpl {
    pub fn new(
        team_repository: ArcTeamRepository,
        club_repository: ArcClubRepository,
        coach_repository: ArcCoachRepository,
    ) -> Self {
        Self {
            team_repository,
            club_repository,
            coach_repository,
        }
    }

    async fn ensure_references(
        &self,
        club_id: Option<ClubId>,
        coach_id: Option<CoachId>,
    ) -> ServiceResult<()> {
        if let Some(club_id) = club_id {
            let club = self.club_repository.get_club_by_id(club_id).await?;
            if !club.is_some_and(|c| c.is_active) {
                return ServiceError::invalid(format!("club_id: unknown club {}", club_id));
            }
        }
        if let Some(coach_id) = coach_id {
            let coach = self.coach_repository.get_coach_by_id(coach_id).await?;
            if !coach.is_some_and(|c| c.is_active) {
                return ServiceError::invalid(format!("coach_id: unknown coach {}", coach_id));
            }
        }
        Ok(())
    }

    fn validate_founded_year(founded_year: Option<i32>) -> ServiceResult<()> {
        if let Some(year) = founded_year
            && year > now().year()
        {
            return ServiceError::invalid("founded_year: must not be in the future");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl TeamService for TeamServiceImpl {
    async fn get_teams(&self, filter: TeamFilter) -> ServiceResult<Vec<Team>> {
        self.team_repository.get_teams(&filter).await
    }

    async fn get_team(&self, id: TeamId) -> ServiceResult<Team> {
        match self.team_repository.get_team_by_id(id).await? {
            Some(team) => Ok(team),
            None => ServiceError::not_found("Team not found"),
        }
    }

    async fn create_team(&self, new_team: NewTeam) -> ServiceResult<Team> {
        validate_input(&new_team)?;
        Self::validate_founded_year(new_team.founded_year)?;
        self.ensure_references(new_team.club_id, new_team.coach_id)
            .await?;

        let created_at = now();
        let mut team = Team {
            id: 0,
            name: new_team.name,
            sport_type: new_team.sport_type,
            club_id: new_team.club_id,
            coach_id: new_team.coach_id,
            level: new_team.level,
            city: new_team.city,
            country: new_team.country,
            founded_year: new_team.founded_year,
            description: new_team.description,
            logo: None,
            is_active: true,
            created_at,
            updated_at: created_at,
            deleted_at: None,
        };
        team.id = self.team_repository.create_team(&team).await?;
        info!("Created team {} '{}'", team.id, team.name);
        Ok(team)
    }

    async fn update_team(&self, id: TeamId, update: TeamUpdate) -> ServiceResult<Team> {
        validate_input(&update)?;
        Self::validate_founded_year(update.founded_year)?;
        let mut team = self.get_team(id).await?;
        self.ensure_references(update.club_id, update.coach_id)
            .await?;

        merge(&mut team.name, update.name);
        merge(&mut team.sport_type, update.sport_type);
        merge_opt(&mut team.club_id, update.club_id);
        merge_opt(&mut team.coach_id, update.coach_id);
        merge_opt(&mut team.level, update.level);
        merge_opt(&mut team.city, update.city);
        merge_opt(&mut team.country, update.country);
        merge_opt(&mut team.founded_year, update.founded_year);
        merge_opt(&mut team.description, update.description);
        team.updated_at = now();

        self.team_repository.save_team(&team).await?;
        info!("Updated team {}", id);
        Ok(team)
    }

    async fn delete_team(&self, id: TeamId) -> ServiceResult<()> {
        let mut team = self.get_team(id).await?;
        if !team.is_active {
            return Ok(());
        }
        let deleted_at = now();
        team.is_active = false;
        team.deleted_at = Some(deleted_at);
        team.updated_at = deleted_at;
        self.team_repository.save_team(&team).await?;
        info!("Deactivated team {}", id);
        Ok(())
    }

    async fn set_logo(&self, id: TeamId, path: String) -> ServiceResult<Team> {
        let mut team = self.get_team(id).await?;
        team.logo = Some(path);
        team.updated_at = now();
        self.team_repository.save_team(&team).await?;
        Ok(team)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        club::{ClubService, ClubServiceImpl, NewClub},
        mock::{MockClubRepository, MockCoachRepository, MockTeamRepository},
    };

    use super::*;

    struct Fixture {
        teams: MockTeamRepository,
        clubs: MockClubRepository,
        service: TeamServiceImpl,
    }

    fn fixture() -> Fixture {
        let teams = MockTeamRepository::default();
        let clubs = MockClubRepository::default();
        let service = TeamServiceImpl::new(
            Arc::new(Box::new(teams.clone())),
            Arc::new(Box::new(clubs.clone())),
            Arc::new(Box::new(MockCoachRepository::default())),
        );
        Fixture {
            teams,
            clubs,
            service,
        }
    }

    fn new_team(club_id: Option<ClubId>) -> NewTeam {
        NewTeam {
            name: "Royal Challengers".into(),
            sport_type: "cricket".into(),
            club_id,
            coach_id: None,
            level: Some("senior".into()),
            city: Some("Bengaluru".into()),
            country: Some("India".into()),
            founded_year: Some(2008),
            description: None,
        }
    }

    async fn add_club(clubs: &MockClubRepository) -> ClubId {
        let service = ClubServiceImpl::new(Arc::new(Box::new(clubs.clone())));
        service
            .register_club(NewClub {
                name: "Club".into(),
                email: "club@example.com".into(),
                password: "secret1".into(),
                phone: None,
                address: None,
                city: None,
                country: None,
                sport_type: "cricket".into(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_unknown_club_is_rejected() {
        let fixture = fixture();
        assert!(matches!(
            fixture.service.create_team(new_team(Some(7))).await,
            Err(ServiceError::Invalid(msg)) if msg.contains("club_id")
        ));
        assert_eq!(fixture.teams.len(), 0);
    }

    #[tokio::test]
    async fn test_team_lifecycle() {
        let fixture = fixture();
        let club_id = add_club(&fixture.clubs).await;

        let team = fixture.service.create_team(new_team(Some(club_id))).await.unwrap();
        assert_eq!(team.club_id, Some(club_id));

        let updated = fixture
            .service
            .update_team(
                team.id,
                TeamUpdate {
                    level: Some("u19".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.level.as_deref(), Some("u19"));
        assert_eq!(updated.club_id, Some(club_id));
        assert_eq!(updated.founded_year, Some(2008));

        let of_club = fixture
            .service
            .get_teams(TeamFilter {
                club_id: Some(club_id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(of_club.len(), 1);

        fixture.service.delete_team(team.id).await.unwrap();
        assert!(!fixture.service.get_team(team.id).await.unwrap().is_active);
        assert!(
            fixture
                .service
                .get_teams(TeamFilter::default())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_deleted_club_cannot_be_referenced() {
        let fixture = fixture();
        let club_id = add_club(&fixture.clubs).await;
        let team = fixture.service.create_team(new_team(None)).await.unwrap();

        ClubServiceImpl::new(Arc::new(Box::new(fixture.clubs.clone())))
            .delete_club(club_id)
            .await
            .unwrap();

        assert!(matches!(
            fixture
                .service
                .update_team(
                    team.id,
                    TeamUpdate {
                        club_id: Some(club_id),
                        ..Default::default()
                    },
                )
                .await,
            Err(ServiceError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_future_founded_year_is_rejected() {
        let fixture = fixture();
        let mut team = new_team(None);
        team.founded_year = Some(now().year() + 1);
        assert!(matches!(
            fixture.service.create_team(team).await,
            Err(ServiceError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let fixture = fixture();
        let mut blank = new_team(None);
        blank.name = "   ".into();
        assert!(matches!(
            fixture.service.create_team(blank).await,
            Err(ServiceError::Invalid(msg)) if msg.contains("name")
        ));
        assert_eq!(fixture.teams.len(), 0);

        let team = fixture.service.create_team(new_team(None)).await.unwrap();
        let update = TeamUpdate {
            name: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(
            fixture.service.update_team(team.id, update).await,
            Err(ServiceError::Invalid(_))
        ));
    }
}
