//! In-memory repositories used by tests and local experiments.

use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use dashmap::DashMap;

use crate::{
    DEFAULT_SPORT_TYPE, RecordId, ServiceResult,
    club::{Club, ClubFilter, ClubId, ClubRepository},
    coach::{Coach, CoachFilter, CoachId, CoachRepository},
    player::{Player, PlayerAccountKey, PlayerFilter, PlayerId, PlayerRepository},
    player_role::{DEFAULT_CRICKET_ROLES, PlayerRole, PlayerRoleId, PlayerRoleRepository},
    super_admin::{SuperAdmin, SuperAdminFilter, SuperAdminId, SuperAdminRepository},
    team::{Team, TeamFilter, TeamId, TeamRepository},
};

trait Row: Clone {
    fn id(&self) -> RecordId;
    fn set_id(&mut self, id: RecordId);
}

macro_rules! impl_row {
    ($($ty:ty),*) => {
        $(impl Row for $ty {
            fn id(&self) -> RecordId {
                self.id
            }
            fn set_id(&mut self, id: RecordId) {
                self.id = id;
            }
        })*
    };
}

impl_row!(Player, Coach, Club, Team, PlayerRole, SuperAdmin);

struct MockTable<T> {
    rows: DashMap<RecordId, T>,
    next_id: AtomicI64,
}

impl<T> Default for MockTable<T> {
    fn default() -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl<T: Row> MockTable<T> {
    fn insert(&self, row: &T) -> RecordId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut row = row.clone();
        row.set_id(id);
        self.rows.insert(id, row);
        id
    }

    fn get(&self, id: RecordId) -> Option<T> {
        self.rows.get(&id).map(|entry| entry.value().clone())
    }

    fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.rows
            .iter()
            .find(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
    }

    fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        let mut rows: Vec<T> = self
            .rows
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|row| row.id());
        rows
    }

    fn save(&self, row: &T) {
        if let Some(mut entry) = self.rows.get_mut(&row.id()) {
            *entry = row.clone();
        }
    }

    fn remove(&self, id: RecordId) -> bool {
        self.rows.remove(&id).is_some()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Default, Clone)]
pub struct MockPlayerRepository {
    table: Arc<MockTable<Player>>,
}

impl MockPlayerRepository {
    pub fn len(&self) -> usize {
        self.table.len()
    }
}

#[async_trait::async_trait]
impl PlayerRepository for MockPlayerRepository {
    async fn get_player_by_id(&self, id: PlayerId) -> ServiceResult<Option<Player>> {
        Ok(self.table.get(id))
    }

    async fn get_player_by_account(
        &self,
        key: &PlayerAccountKey,
    ) -> ServiceResult<Option<Player>> {
        Ok(self.table.find(|p| PlayerAccountKey::of(p) == *key))
    }

    async fn get_players(&self, filter: &PlayerFilter) -> ServiceResult<Vec<Player>> {
        Ok(self.table.filter(|p| filter.matches(p)))
    }

    async fn create_player(&self, player: &Player) -> ServiceResult<PlayerId> {
        Ok(self.table.insert(player))
    }

    async fn save_player(&self, player: &Player) -> ServiceResult<()> {
        self.table.save(player);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockCoachRepository {
    table: Arc<MockTable<Coach>>,
}

impl MockCoachRepository {
    pub fn len(&self) -> usize {
        self.table.len()
    }
}

#[async_trait::async_trait]
impl CoachRepository for MockCoachRepository {
    async fn get_coach_by_id(&self, id: CoachId) -> ServiceResult<Option<Coach>> {
        Ok(self.table.get(id))
    }

    async fn get_coach_by_email(&self, email: &str) -> ServiceResult<Option<Coach>> {
        Ok(self.table.find(|c| c.email == email))
    }

    async fn get_coaches(&self, filter: &CoachFilter) -> ServiceResult<Vec<Coach>> {
        Ok(self.table.filter(|c| filter.matches(c)))
    }

    async fn create_coach(&self, coach: &Coach) -> ServiceResult<CoachId> {
        Ok(self.table.insert(coach))
    }

    async fn save_coach(&self, coach: &Coach) -> ServiceResult<()> {
        self.table.save(coach);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockClubRepository {
    table: Arc<MockTable<Club>>,
}

impl MockClubRepository {
    pub fn len(&self) -> usize {
        self.table.len()
    }
}

#[async_trait::async_trait]
impl ClubRepository for MockClubRepository {
    async fn get_club_by_id(&self, id: ClubId) -> ServiceResult<Option<Club>> {
        Ok(self.table.get(id))
    }

    async fn get_club_by_email(&self, email: &str) -> ServiceResult<Option<Club>> {
        Ok(self.table.find(|c| c.email == email))
    }

    async fn get_clubs(&self, filter: &ClubFilter) -> ServiceResult<Vec<Club>> {
        Ok(self.table.filter(|c| filter.matches(c)))
    }

    async fn create_club(&self, club: &Club) -> ServiceResult<ClubId> {
        Ok(self.table.insert(club))
    }

    async fn save_club(&self, club: &Club) -> ServiceResult<()> {
        self.table.save(club);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockTeamRepository {
    table: Arc<MockTable<Team>>,
}

impl MockTeamRepository {
    pub fn len(&self) -> usize {
        self.table.len()
    }
}

#[async_trait::async_trait]
impl TeamRepository for MockTeamRepository {
    async fn get_team_by_id(&self, id: TeamId) -> ServiceResult<Option<Team>> {
        Ok(self.table.get(id))
    }

    async fn get_teams(&self, filter: &TeamFilter) -> ServiceResult<Vec<Team>> {
        Ok(self.table.filter(|t| filter.matches(t)))
    }

    async fn create_team(&self, team: &Team) -> ServiceResult<TeamId> {
        Ok(self.table.insert(team))
    }

    async fn save_team(&self, team: &Team) -> ServiceResult<()> {
        self.table.save(team);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockPlayerRoleRepository {
    table: Arc<MockTable<PlayerRole>>,
}

impl MockPlayerRoleRepository {
    /// A repository holding the default cricket roles with ids starting at 1.
    pub fn seeded() -> Self {
        let repo = Self::default();
        for name in DEFAULT_CRICKET_ROLES {
            repo.table.insert(&PlayerRole {
                id: 0,
                name: name.to_string(),
                sport_type: DEFAULT_SPORT_TYPE.to_string(),
            });
        }
        repo
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }
}

#[async_trait::async_trait]
impl PlayerRoleRepository for MockPlayerRoleRepository {
    async fn get_role_by_id(&self, id: PlayerRoleId) -> ServiceResult<Option<PlayerRole>> {
        Ok(self.table.get(id))
    }

    async fn get_role_by_name(
        &self,
        name: &str,
        sport_type: &str,
    ) -> ServiceResult<Option<PlayerRole>> {
        Ok(self
            .table
            .find(|r| r.name == name && r.sport_type == sport_type))
    }

    async fn get_roles(&self, sport_type: Option<&str>) -> ServiceResult<Vec<PlayerRole>> {
        Ok(self
            .table
            .filter(|r| sport_type.is_none_or(|s| s == r.sport_type)))
    }

    async fn create_role(&self, role: &PlayerRole) -> ServiceResult<PlayerRoleId> {
        Ok(self.table.insert(role))
    }

    async fn save_role(&self, role: &PlayerRole) -> ServiceResult<()> {
        self.table.save(role);
        Ok(())
    }

    async fn delete_role(&self, id: PlayerRoleId) -> ServiceResult<bool> {
        Ok(self.table.remove(id))
    }
}

#[derive(Default, Clone)]
pub struct MockSuperAdminRepository {
    table: Arc<MockTable<SuperAdmin>>,
}

impl MockSuperAdminRepository {
    pub fn len(&self) -> usize {
        self.table.len()
    }
}

#[async_trait::async_trait]
impl SuperAdminRepository for MockSuperAdminRepository {
    async fn get_super_admin_by_id(&self, id: SuperAdminId) -> ServiceResult<Option<SuperAdmin>> {
        Ok(self.table.get(id))
    }

    async fn get_super_admin_by_email(&self, email: &str) -> ServiceResult<Option<SuperAdmin>> {
        Ok(self.table.find(|a| a.email == email))
    }

    async fn get_super_admins(&self, filter: &SuperAdminFilter) -> ServiceResult<Vec<SuperAdmin>> {
        Ok(self.table.filter(|a| filter.matches(a)))
    }

    async fn create_super_admin(&self, admin: &SuperAdmin) -> ServiceResult<SuperAdminId> {
        Ok(self.table.insert(admin))
    }

    async fn save_super_admin(&self, admin: &SuperAdmin) -> ServiceResult<()> {
        self.table.save(admin);
        Ok(())
    }
}
