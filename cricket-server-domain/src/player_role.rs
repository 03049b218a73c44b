use std::sync::Arc;

use log::info;
use validator::Validate;

use crate::{
    RecordId, ServiceError, ServiceResult,
    util::{merge, non_blank, validate_input},
};

pub type PlayerRoleId = RecordId;

/// Roles seeded into a fresh database for the default sport.
pub const DEFAULT_CRICKET_ROLES: [&str; 4] = ["Batsman", "Bowler", "All-Rounder", "Wicket-Keeper"];

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerRole {
    pub id: PlayerRoleId,
    pub name: String,
    pub sport_type: String,
}

#[derive(Clone, Debug, Validate)]
pub struct NewPlayerRole {
    #[validate(
        length(min = 1, max = 50, message = "must be 1 to 50 characters"),
        custom(function = "non_blank")
    )]
    pub name: String,
    #[validate(
        length(min = 1, max = 50, message = "must be 1 to 50 characters"),
        custom(function = "non_blank")
    )]
    pub sport_type: String,
}

#[derive(Clone, Debug, Default, Validate)]
pub struct PlayerRoleUpdate {
    #[validate(
        length(min = 1, max = 50, message = "must be 1 to 50 characters"),
        custom(function = "non_blank")
    )]
    pub name: Option<String>,
    #[validate(
        length(min = 1, max = 50, message = "must be 1 to 50 characters"),
        custom(function = "non_blank")
    )]
    pub sport_type: Option<String>,
}

pub type ArcPlayerRoleRepository = Arc<Box<dyn PlayerRoleRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait PlayerRoleRepository {
    async fn get_role_by_id(&self, id: PlayerRoleId) -> ServiceResult<Option<PlayerRole>>;
    async fn get_role_by_name(
        &self,
        name: &str,
        sport_type: &str,
    ) -> ServiceResult<Option<PlayerRole>>;
    async fn get_roles(&self, sport_type: Option<&str>) -> ServiceResult<Vec<PlayerRole>>;
    async fn create_role(&self, role: &PlayerRole) -> ServiceResult<PlayerRoleId>;
    async fn save_role(&self, role: &PlayerRole) -> ServiceResult<()>;
    /// Removes the row. Returns whether a row existed.
    async fn delete_role(&self, id: PlayerRoleId) -> ServiceResult<bool>;
}

pub type ArcPlayerRoleService = Arc<Box<dyn PlayerRoleService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait PlayerRoleService {
    async fn get_roles(&self, sport_type: Option<String>) -> ServiceResult<Vec<PlayerRole>>;
    async fn get_role(&self, id: PlayerRoleId) -> ServiceResult<PlayerRole>;
    async fn create_role(&self, new_role: NewPlayerRole) -> ServiceResult<PlayerRole>;
    async fn update_role(
        &self,
        id: PlayerRoleId,
        update: PlayerRoleUpdate,
    ) -> ServiceResult<PlayerRole>;
    async fn delete_role(&self, id: PlayerRoleId) -> ServiceResult<()>;
}

pub struct PlayerRoleServiceImpl {
    role_repository: ArcPlayerRoleRepository,
}

impl PlayerRoleServiceImpl {
    pub fn new(role_repository: ArcPlayerRoleRepository) -> Self {
        Self { role_repository }
    }

    async fn ensure_name_free(&self, name: &str, sport_type: &str) -> ServiceResult<()> {
        if self
            .role_repository
            .get_role_by_name(name, sport_type)
            .await?
            .is_some()
        {
            return ServiceError::conflict(format!(
                "Role '{}' already exists for {}",
                name, sport_type
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl PlayerRoleService for PlayerRoleServiceImpl {
    async fn get_roles(&self, sport_type: Option<String>) -> ServiceResult<Vec<PlayerRole>> {
        self.role_repository.get_roles(sport_type.as_deref()).await
    }

    async fn get_role(&self, id: PlayerRoleId) -> ServiceResult<PlayerRole> {
        match self.role_repository.get_role_by_id(id).await? {
            Some(role) => Ok(role),
            None => ServiceError::not_found("Player role not found"),
        }
    }

    async fn create_role(&self, new_role: NewPlayerRole) -> ServiceResult<PlayerRole> {
        validate_input(&new_role)?;
        let name = new_role.name.trim().to_string();
        self.ensure_name_free(&name, &new_role.sport_type).await?;

        let mut role = PlayerRole {
            id: 0,
            name,
            sport_type: new_role.sport_type,
        };
        role.id = self.role_repository.create_role(&role).await?;
        info!("Created player role {} ({})", role.name, role.sport_type);
        Ok(role)
    }

    async fn update_role(
        &self,
        id: PlayerRoleId,
        update: PlayerRoleUpdate,
    ) -> ServiceResult<PlayerRole> {
        validate_input(&update)?;
        let mut role = self.get_role(id).await?;
        let original = role.clone();

        merge(&mut role.name, update.name.map(|n| n.trim().to_string()));
        merge(&mut role.sport_type, update.sport_type);
        if role.name != original.name || role.sport_type != original.sport_type {
            self.ensure_name_free(&role.name, &role.sport_type).await?;
        }

        self.role_repository.save_role(&role).await?;
        info!("Updated player role {}", id);
        Ok(role)
    }

    async fn delete_role(&self, id: PlayerRoleId) -> ServiceResult<()> {
        if !self.role_repository.delete_role(id).await? {
            return ServiceError::not_found("Player role not found");
        }
        info!("Deleted player role {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::mock::MockPlayerRoleRepository;

    use super::*;

    fn service() -> PlayerRoleServiceImpl {
        PlayerRoleServiceImpl::new(Arc::new(Box::new(MockPlayerRoleRepository::seeded())))
    }

    #[tokio::test]
    async fn test_seeded_roles() {
        let service = service();
        let roles = service.get_roles(Some("cricket".into())).await.unwrap();
        let names: Vec<_> = roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, DEFAULT_CRICKET_ROLES.to_vec());
        assert!(
            service
                .get_roles(Some("football".into()))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_role_names_are_unique_per_sport() {
        let service = service();
        assert!(matches!(
            service
                .create_role(NewPlayerRole {
                    name: "Bowler".into(),
                    sport_type: "cricket".into(),
                })
                .await,
            Err(ServiceError::Conflict(_))
        ));
        let baseball_role = service
            .create_role(NewPlayerRole {
                name: "Bowler".into(),
                sport_type: "baseball".into(),
            })
            .await
            .unwrap();
        assert_eq!(baseball_role.sport_type, "baseball");

        let renamed = service
            .update_role(
                baseball_role.id,
                PlayerRoleUpdate {
                    name: Some("Pitcher".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Pitcher");
        assert_eq!(renamed.sport_type, "baseball");
    }

    #[tokio::test]
    async fn test_hard_delete() {
        let service = service();
        let role = service.get_role(1).await.unwrap();
        service.delete_role(role.id).await.unwrap();
        assert!(matches!(
            service.get_role(role.id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_role(role.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let service = service();
        assert!(matches!(
            service
                .create_role(NewPlayerRole {
                    name: "   ".into(),
                    sport_type: "cricket".into(),
                })
                .await,
            Err(ServiceError::Invalid(msg)) if msg.contains("name")
        ));
        assert!(matches!(
            service
                .update_role(
                    1,
                    PlayerRoleUpdate {
                        name: Some(" ".into()),
                        ..Default::default()
                    },
                )
                .await,
            Err(ServiceError::Invalid(_))
        ));
        assert_eq!(service.get_role(1).await.unwrap().name, "Batsman");
    }
}
