use std::sync::Arc;

use crate::{
    club::{ArcClubRepository, ArcClubService, ClubServiceImpl},
    coach::{ArcCoachRepository, ArcCoachService, CoachServiceImpl},
    mock::{
        MockClubRepository, MockCoachRepository, MockPlayerRepository, MockPlayerRoleRepository,
        MockSuperAdminRepository, MockTeamRepository,
    },
    player::{ArcPlayerRepository, ArcPlayerService, PlayerServiceImpl},
    player_role::{ArcPlayerRoleRepository, ArcPlayerRoleService, PlayerRoleServiceImpl},
    super_admin::{ArcSuperAdminRepository, ArcSuperAdminService, SuperAdminServiceImpl},
    team::{ArcTeamRepository, ArcTeamService, TeamServiceImpl},
};

pub struct Repositories {
    pub player_repository: ArcPlayerRepository,
    pub coach_repository: ArcCoachRepository,
    pub club_repository: ArcClubRepository,
    pub team_repository: ArcTeamRepository,
    pub player_role_repository: ArcPlayerRoleRepository,
    pub super_admin_repository: ArcSuperAdminRepository,
}

impl Repositories {
    /// Fresh in-memory repositories with the default player roles seeded.
    pub fn in_memory() -> Self {
        Self {
            player_repository: Arc::new(Box::new(MockPlayerRepository::default())),
            coach_repository: Arc::new(Box::new(MockCoachRepository::default())),
            club_repository: Arc::new(Box::new(MockClubRepository::default())),
            team_repository: Arc::new(Box::new(MockTeamRepository::default())),
            player_role_repository: Arc::new(Box::new(MockPlayerRoleRepository::seeded())),
            super_admin_repository: Arc::new(Box::new(MockSuperAdminRepository::default())),
        }
    }
}

#[derive(Clone)]
pub struct Application {
    pub player_service: ArcPlayerService,
    pub coach_service: ArcCoachService,
    pub club_service: ArcClubService,
    pub team_service: ArcTeamService,
    pub player_role_service: ArcPlayerRoleService,
    pub super_admin_service: ArcSuperAdminService,
}

pub fn build_application(repositories: Repositories) -> Application {
    let Repositories {
        player_repository,
        coach_repository,
        club_repository,
        team_repository,
        player_role_repository,
        super_admin_repository,
    } = repositories;

    let player_service: ArcPlayerService = Arc::new(Box::new(PlayerServiceImpl::new(
        player_repository,
        player_role_repository.clone(),
    )));

    let coach_service: ArcCoachService =
        Arc::new(Box::new(CoachServiceImpl::new(coach_repository.clone())));

    let club_service: ArcClubService =
        Arc::new(Box::new(ClubServiceImpl::new(club_repository.clone())));

    let team_service: ArcTeamService = Arc::new(Box::new(TeamServiceImpl::new(
        team_repository,
        club_repository,
        coach_repository,
    )));

    let player_role_service: ArcPlayerRoleService = Arc::new(Box::new(
        PlayerRoleServiceImpl::new(player_role_repository),
    ));

    let super_admin_service: ArcSuperAdminService = Arc::new(Box::new(
        SuperAdminServiceImpl::new(super_admin_repository),
    ));

    Application {
        player_service,
        coach_service,
        club_service,
        team_service,
        player_role_service,
        super_admin_service,
    }
}
