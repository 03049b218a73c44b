use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use validator::Validate;

use crate::{
    RecordId, ServiceError, ServiceResult,
    password::{INVALID_CREDENTIALS, hash_password, verify_password},
    player_role::{ArcPlayerRoleRepository, PlayerRoleId},
    util::{merge, merge_opt, non_blank, now, validate_email, validate_input},
};

pub type PlayerId = RecordId;

pub const DEFAULT_LOGIN_TYPE: &str = "email";

#[derive(Clone, Debug)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub sport_type: String,
    pub login_type: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub role_id: Option<PlayerRoleId>,
    pub batting_style: Option<String>,
    pub bowling_style: Option<String>,
    pub dominant_hand: Option<String>,
    pub profile_image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Validate)]
pub struct NewPlayer {
    #[validate(
        length(min = 1, max = 100, message = "must be 1 to 100 characters"),
        custom(function = "non_blank")
    )]
    pub name: String,
    pub email: String,
    #[validate(
        length(min = 1, max = 20, message = "must be 1 to 20 characters"),
        custom(function = "non_blank")
    )]
    pub phone: Option<String>,
    #[validate(length(min = 6, max = 72, message = "must be 6 to 72 characters"))]
    pub password: String,
    #[validate(
        length(min = 1, max = 50, message = "must be 1 to 50 characters"),
        custom(function = "non_blank")
    )]
    pub sport_type: String,
    #[validate(
        length(min = 1, max = 20, message = "must be 1 to 20 characters"),
        custom(function = "non_blank")
    )]
    pub login_type: String,
    #[validate(length(max = 20, message = "must be at most 20 characters"))]
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub nationality: Option<String>,
    pub role_id: Option<PlayerRoleId>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub batting_style: Option<String>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub bowling_style: Option<String>,
    #[validate(length(max = 20, message = "must be at most 20 characters"))]
    pub dominant_hand: Option<String>,
}

#[derive(Clone, Debug, Default, Validate)]
pub struct PlayerUpdate {
    #[validate(
        length(min = 1, max = 100, message = "must be 1 to 100 characters"),
        custom(function = "non_blank")
    )]
    pub name: Option<String>,
    pub email: Option<String>,
    #[validate(
        length(min = 1, max = 20, message = "must be 1 to 20 characters"),
        custom(function = "non_blank")
    )]
    pub phone: Option<String>,
    #[validate(length(min = 6, max = 72, message = "must be 6 to 72 characters"))]
    pub password: Option<String>,
    #[validate(
        length(min = 1, max = 50, message = "must be 1 to 50 characters"),
        custom(function = "non_blank")
    )]
    pub sport_type: Option<String>,
    #[validate(length(max = 20, message = "must be at most 20 characters"))]
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub nationality: Option<String>,
    pub role_id: Option<PlayerRoleId>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub batting_style: Option<String>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub bowling_style: Option<String>,
    #[validate(length(max = 20, message = "must be at most 20 characters"))]
    pub dominant_hand: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct PlayerFilter {
    pub sport_type: Option<String>,
    pub role_id: Option<PlayerRoleId>,
    pub include_inactive: bool,
}

impl PlayerFilter {
    pub fn matches(&self, player: &Player) -> bool {
        (self.include_inactive || player.is_active)
            && self
                .sport_type
                .as_ref()
                .is_none_or(|s| *s == player.sport_type)
            && self.role_id.is_none_or(|r| player.role_id == Some(r))
    }
}

/// The three columns that identify a player account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerAccountKey {
    pub email: String,
    pub login_type: String,
    pub sport_type: String,
}

impl PlayerAccountKey {
    pub fn of(player: &Player) -> Self {
        Self {
            email: player.email.clone(),
            login_type: player.login_type.clone(),
            sport_type: player.sport_type.clone(),
        }
    }
}

pub type ArcPlayerRepository = Arc<Box<dyn PlayerRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait PlayerRepository {
    async fn get_player_by_id(&self, id: PlayerId) -> ServiceResult<Option<Player>>;
    async fn get_player_by_account(&self, key: &PlayerAccountKey)
    -> ServiceResult<Option<Player>>;
    async fn get_players(&self, filter: &PlayerFilter) -> ServiceResult<Vec<Player>>;
    async fn create_player(&self, player: &Player) -> ServiceResult<PlayerId>;
    async fn save_player(&self, player: &Player) -> ServiceResult<()>;
}

pub type ArcPlayerService = Arc<Box<dyn PlayerService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait PlayerService {
    async fn get_players(&self, filter: PlayerFilter) -> ServiceResult<Vec<Player>>;
    async fn get_player(&self, id: PlayerId) -> ServiceResult<Player>;
    async fn register_player(&self, new_player: NewPlayer) -> ServiceResult<Player>;
    async fn update_player(&self, id: PlayerId, update: PlayerUpdate) -> ServiceResult<Player>;
    async fn delete_player(&self, id: PlayerId) -> ServiceResult<()>;
    async fn set_profile_image(&self, id: PlayerId, path: String) -> ServiceResult<Player>;
    async fn try_login(
        &self,
        email: &str,
        password: &str,
        login_type: &str,
        sport_type: &str,
    ) -> ServiceResult<Player>;
}

pub struct PlayerServiceImpl {
    player_repository: ArcPlayerRepository,
    role_repository: ArcPlayerRoleRepository,
}

impl PlayerServiceImpl {
    pub fn new(
        player_repository: ArcPlayerRepository,
        role_repository: ArcPlayerRoleRepository,
    ) -> Self {
        Self {
            player_repository,
            role_repository,
        }
    }

    async fn ensure_account_free(&self, key: &PlayerAccountKey) -> ServiceResult<()> {
        if self
            .player_repository
            .get_player_by_account(key)
            .await?
            .is_some()
        {
            return ServiceError::conflict(
                "Player with this email already exists for this login and sport type",
            );
        }
        Ok(())
    }

    async fn ensure_role_exists(&self, role_id: Option<PlayerRoleId>) -> ServiceResult<()> {
        let Some(role_id) = role_id else {
            return Ok(());
        };
        if self.role_repository.get_role_by_id(role_id).await?.is_none() {
            return ServiceError::invalid(format!("role_id: unknown player role {}", role_id));
        }
        Ok(())
    }

    fn validate_date_of_birth(date_of_birth: Option<NaiveDate>) -> ServiceResult<()> {
        if let Some(date) = date_of_birth
            && date > now().date_naive()
        {
            return ServiceError::invalid("date_of_birth: must not be in the future");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl PlayerService for PlayerServiceImpl {
    async fn get_players(&self, filter: PlayerFilter) -> ServiceResult<Vec<Player>> {
        self.player_repository.get_players(&filter).await
    }

    async fn get_player(&self, id: PlayerId) -> ServiceResult<Player> {
        match self.player_repository.get_player_by_id(id).await? {
            Some(player) => Ok(player),
            None => ServiceError::not_found("Player not found"),
        }
    }

    async fn register_player(&self, new_player: NewPlayer) -> ServiceResult<Player> {
        validate_input(&new_player)?;
        Self::validate_date_of_birth(new_player.date_of_birth)?;
        let email = validate_email(&new_player.email)?;
        let key = PlayerAccountKey {
            email,
            login_type: new_player.login_type,
            sport_type: new_player.sport_type,
        };
        self.ensure_account_free(&key).await?;
        self.ensure_role_exists(new_player.role_id).await?;

        let created_at = now();
        let mut player = Player {
            id: 0,
            name: new_player.name,
            email: key.email,
            phone: new_player.phone,
            password_hash: hash_password(&new_player.password)?,
            sport_type: key.sport_type,
            login_type: key.login_type,
            gender: new_player.gender,
            date_of_birth: new_player.date_of_birth,
            nationality: new_player.nationality,
            role_id: new_player.role_id,
            batting_style: new_player.batting_style,
            bowling_style: new_player.bowling_style,
            dominant_hand: new_player.dominant_hand,
            profile_image: None,
            is_active: true,
            created_at,
            updated_at: created_at,
            deleted_at: None,
        };
        player.id = self.player_repository.create_player(&player).await?;
        info!(
            "Registered player {} <{}> for {}",
            player.id, player.email, player.sport_type
        );
        Ok(player)
    }

    async fn update_player(&self, id: PlayerId, update: PlayerUpdate) -> ServiceResult<Player> {
        validate_input(&update)?;
        Self::validate_date_of_birth(update.date_of_birth)?;
        self.ensure_role_exists(update.role_id).await?;
        let mut player = self.get_player(id).await?;
        let original_key = PlayerAccountKey::of(&player);

        if let Some(email) = &update.email {
            player.email = validate_email(email)?;
        }
        merge(&mut player.sport_type, update.sport_type);
        let key = PlayerAccountKey::of(&player);
        if key != original_key {
            self.ensure_account_free(&key).await?;
        }

        if let Some(password) = &update.password {
            player.password_hash = hash_password(password)?;
        }
        merge(&mut player.name, update.name);
        merge_opt(&mut player.phone, update.phone);
        merge_opt(&mut player.gender, update.gender);
        merge_opt(&mut player.date_of_birth, update.date_of_birth);
        merge_opt(&mut player.nationality, update.nationality);
        merge_opt(&mut player.role_id, update.role_id);
        merge_opt(&mut player.batting_style, update.batting_style);
        merge_opt(&mut player.bowling_style, update.bowling_style);
        merge_opt(&mut player.dominant_hand, update.dominant_hand);
        player.updated_at = now();

        self.player_repository.save_player(&player).await?;
        info!("Updated player {}", id);
        Ok(player)
    }

    async fn delete_player(&self, id: PlayerId) -> ServiceResult<()> {
        let mut player = self.get_player(id).await?;
        if !player.is_active {
            return Ok(());
        }
        let deleted_at = now();
        player.is_active = false;
        player.deleted_at = Some(deleted_at);
        player.updated_at = deleted_at;
        self.player_repository.save_player(&player).await?;
        info!("Deactivated player {}", id);
        Ok(())
    }

    async fn set_profile_image(&self, id: PlayerId, path: String) -> ServiceResult<Player> {
        let mut player = self.get_player(id).await?;
        player.profile_image = Some(path);
        player.updated_at = now();
        self.player_repository.save_player(&player).await?;
        Ok(player)
    }

    async fn try_login(
        &self,
        email: &str,
        password: &str,
        login_type: &str,
        sport_type: &str,
    ) -> ServiceResult<Player> {
        let key = PlayerAccountKey {
            email: email.trim().to_ascii_lowercase(),
            login_type: login_type.to_string(),
            sport_type: sport_type.to_string(),
        };
        let Some(player) = self.player_repository.get_player_by_account(&key).await? else {
            return ServiceError::unauthorized(INVALID_CREDENTIALS);
        };
        if !player.is_active || !verify_password(password, &player.password_hash) {
            return ServiceError::unauthorized(INVALID_CREDENTIALS);
        }
        Ok(player)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        DEFAULT_SPORT_TYPE,
        mock::{MockPlayerRepository, MockPlayerRoleRepository},
    };

    use super::*;

    fn new_player(email: &str) -> NewPlayer {
        NewPlayer {
            name: "Virat".into(),
            email: email.into(),
            phone: Some("5550100".into()),
            password: "secret1".into(),
            sport_type: DEFAULT_SPORT_TYPE.into(),
            login_type: DEFAULT_LOGIN_TYPE.into(),
            gender: Some("male".into()),
            date_of_birth: NaiveDate::from_ymd_opt(1988, 11, 5),
            nationality: Some("Indian".into()),
            role_id: Some(1),
            batting_style: Some("Right-hand bat".into()),
            bowling_style: Some("Right-arm medium".into()),
            dominant_hand: Some("right".into()),
        }
    }

    fn service(repo: &MockPlayerRepository) -> PlayerServiceImpl {
        PlayerServiceImpl::new(
            Arc::new(Box::new(repo.clone())),
            Arc::new(Box::new(MockPlayerRoleRepository::seeded())),
        )
    }

    #[tokio::test]
    async fn test_uniqueness_covers_login_and_sport_type() {
        let repo = MockPlayerRepository::default();
        let service = service(&repo);

        service.register_player(new_player("p@x.com")).await.unwrap();
        assert!(matches!(
            service.register_player(new_player("p@x.com")).await,
            Err(ServiceError::Conflict(_))
        ));
        assert_eq!(repo.len(), 1);

        let mut google = new_player("p@x.com");
        google.login_type = "google".into();
        service.register_player(google).await.unwrap();

        let mut football = new_player("p@x.com");
        football.sport_type = "football".into();
        football.role_id = None;
        service.register_player(football).await.unwrap();
        assert_eq!(repo.len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_role_is_rejected() {
        let repo = MockPlayerRepository::default();
        let service = service(&repo);
        let mut player = new_player("p@x.com");
        player.role_id = Some(99);
        assert!(matches!(
            service.register_player(player).await,
            Err(ServiceError::Invalid(msg)) if msg.contains("role_id")
        ));
        assert_eq!(repo.len(), 0);
    }

    #[tokio::test]
    async fn test_future_birth_date_is_rejected() {
        let service = service(&MockPlayerRepository::default());
        let mut player = new_player("p@x.com");
        player.date_of_birth = Some(now().date_naive() + chrono::Days::new(2));
        assert!(matches!(
            service.register_player(player).await,
            Err(ServiceError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_partial_update() {
        let service = service(&MockPlayerRepository::default());
        let player = service.register_player(new_player("p@x.com")).await.unwrap();

        let updated = service
            .update_player(
                player.id,
                PlayerUpdate {
                    phone: Some("999".into()),
                    role_id: Some(2),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.phone.as_deref(), Some("999"));
        assert_eq!(updated.role_id, Some(2));
        assert_eq!(updated.name, player.name);
        assert_eq!(updated.email, player.email);
        assert_eq!(updated.date_of_birth, player.date_of_birth);
        assert_eq!(updated.batting_style, player.batting_style);
        assert_eq!(updated.password_hash, player.password_hash);
        assert_eq!(updated.created_at, player.created_at);
    }

    #[tokio::test]
    async fn test_update_into_existing_account_is_rejected() {
        let service = service(&MockPlayerRepository::default());
        let first = service.register_player(new_player("a@x.com")).await.unwrap();
        service.register_player(new_player("b@x.com")).await.unwrap();

        assert!(matches!(
            service
                .update_player(
                    first.id,
                    PlayerUpdate {
                        email: Some("B@x.com".into()),
                        ..Default::default()
                    },
                )
                .await,
            Err(ServiceError::Conflict(_))
        ));
        assert_eq!(service.get_player(first.id).await.unwrap().email, "a@x.com");
    }

    #[tokio::test]
    async fn test_soft_delete_and_login() {
        let service = service(&MockPlayerRepository::default());
        let player = service.register_player(new_player("p@x.com")).await.unwrap();

        let logged_in = service
            .try_login("p@x.com", "secret1", DEFAULT_LOGIN_TYPE, DEFAULT_SPORT_TYPE)
            .await
            .unwrap();
        assert_eq!(logged_in.id, player.id);

        service.delete_player(player.id).await.unwrap();
        let stored = service.get_player(player.id).await.unwrap();
        assert!(!stored.is_active);
        assert!(stored.deleted_at.is_some());
        assert!(
            service
                .get_players(PlayerFilter::default())
                .await
                .unwrap()
                .is_empty()
        );
        assert!(matches!(
            service
                .try_login("p@x.com", "secret1", DEFAULT_LOGIN_TYPE, DEFAULT_SPORT_TYPE)
                .await,
            Err(ServiceError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_filter_by_role() {
        let service = service(&MockPlayerRepository::default());
        service.register_player(new_player("a@x.com")).await.unwrap();
        let mut bowler = new_player("b@x.com");
        bowler.role_id = Some(2);
        service.register_player(bowler).await.unwrap();

        let bowlers = service
            .get_players(PlayerFilter {
                role_id: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(bowlers.len(), 1);
        assert_eq!(bowlers[0].email, "b@x.com");
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let repo = MockPlayerRepository::default();
        let service = service(&repo);
        let mut blank = new_player("p@x.com");
        blank.name = "   ".into();
        assert!(matches!(
            service.register_player(blank).await,
            Err(ServiceError::Invalid(msg)) if msg.contains("name")
        ));
        assert_eq!(repo.len(), 0);

        let player = service.register_player(new_player("p@x.com")).await.unwrap();
        let update = PlayerUpdate {
            name: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(
            service.update_player(player.id, update).await,
            Err(ServiceError::Invalid(_))
        ));
        assert_eq!(service.get_player(player.id).await.unwrap().name, "Virat");
    }
}
