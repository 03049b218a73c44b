use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::info;
use validator::Validate;

use crate::{
    RecordId, ServiceError, ServiceResult,
    password::{INVALID_CREDENTIALS, hash_password, verify_password},
    util::{merge, merge_opt, non_blank, now, validate_email, validate_input},
};

pub type CoachId = RecordId;

#[derive(Clone, Debug)]
pub struct Coach {
    pub id: CoachId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub speciality: Option<String>,
    pub experience_years: Option<i32>,
    pub sport_type: String,
    pub profile_image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Validate)]
pub struct NewCoach {
    #[validate(
        length(min = 1, max = 100, message = "must be 1 to 100 characters"),
        custom(function = "non_blank")
    )]
    pub name: String,
    pub email: String,
    #[validate(length(min = 6, max = 72, message = "must be 6 to 72 characters"))]
    pub password: String,
    #[validate(
        length(min = 1, max = 20, message = "must be 1 to 20 characters"),
        custom(function = "non_blank")
    )]
    pub phone: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub speciality: Option<String>,
    #[validate(range(min = 0, max = 80, message = "must be between 0 and 80"))]
    pub experience_years: Option<i32>,
    #[validate(
        length(min = 1, max = 50, message = "must be 1 to 50 characters"),
        custom(function = "non_blank")
    )]
    pub sport_type: String,
}

#[derive(Clone, Debug, Default, Validate)]
pub struct CoachUpdate {
    #[validate(
        length(min = 1, max = 100, message = "must be 1 to 100 characters"),
        custom(function = "non_blank")
    )]
    pub name: Option<String>,
    pub email: Option<String>,
    #[validate(length(min = 6, max = 72, message = "must be 6 to 72 characters"))]
    pub password: Option<String>,
    #[validate(
        length(min = 1, max = 20, message = "must be 1 to 20 characters"),
        custom(function = "non_blank")
    )]
    pub phone: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub speciality: Option<String>,
    #[validate(range(min = 0, max = 80, message = "must be between 0 and 80"))]
    pub experience_years: Option<i32>,
    #[validate(
        length(min = 1, max = 50, message = "must be 1 to 50 characters"),
        custom(function = "non_blank")
    )]
    pub sport_type: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct CoachFilter {
    pub sport_type: Option<String>,
    pub include_inactive: bool,
}

impl CoachFilter {
    pub fn matches(&self, coach: &Coach) -> bool {
        (self.include_inactive || coach.is_active)
            && self
                .sport_type
                .as_ref()
                .is_none_or(|s| *s == coach.sport_type)
    }
}

pub type ArcCoachRepository = Arc<Box<dyn CoachRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait CoachRepository {
    async fn get_coach_by_id(&self, id: CoachId) -> ServiceResult<Option<Coach>>;
    async fn get_coach_by_email(&self, email: &str) -> ServiceResult<Option<Coach>>;
    async fn get_coaches(&self, filter: &CoachFilter) -> ServiceResult<Vec<Coach>>;
    async fn create_coach(&self, coach: &Coach) -> ServiceResult<CoachId>;
    async fn save_coach(&self, coach: &Coach) -> ServiceResult<()>;
}

pub type ArcCoachService = Arc<Box<dyn CoachService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait CoachService {
    async fn get_coaches(&self, filter: CoachFilter) -> ServiceResult<Vec<Coach>>;
    async fn get_coach(&self, id: CoachId) -> ServiceResult<Coach>;
    async fn register_coach(&self, new_coach: NewCoach) -> ServiceResult<Coach>;
    async fn update_coach(&self, id: CoachId, update: CoachUpdate) -> ServiceResult<Coach>;
    async fn delete_coach(&self, id: CoachId) -> ServiceResult<()>;
    async fn set_profile_image(&self, id: CoachId, path: String) -> ServiceResult<Coach>;
    async fn try_login(&self, email: &str, password: &str) -> ServiceResult<Coach>;
}

pub struct CoachServiceImpl {
    coach_repository: ArcCoachRepository,
}

impl CoachServiceImpl {
    pub fn new(coach_repository: ArcCoachRepository) -> Self {
        Self { coach_repository }
    }

    async fn ensure_email_free(&self, email: &str) -> ServiceResult<()> {
        if self
            .coach_repository
            .get_coach_by_email(email)
            .await?
            .is_some()
        {
            return ServiceError::conflict("Coach with this email already exists");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CoachService for CoachServiceImpl {
    async fn get_coaches(&self, filter: CoachFilter) -> ServiceResult<Vec<Coach>> {
        self.coach_repository.get_coaches(&filter).await
    }

    async fn get_coach(&self, id: CoachId) -> ServiceResult<Coach> {
        match self.coach_repository.get_coach_by_id(id).await? {
            Some(coach) => Ok(coach),
            None => ServiceError::not_found("Coach not found"),
        }
    }

    async fn register_coach(&self, new_coach: NewCoach) -> ServiceResult<Coach> {
        validate_input(&new_coach)?;
        let email = validate_email(&new_coach.email)?;
        self.ensure_email_free(&email).await?;

        let created_at = now();
        let mut coach = Coach {
            id: 0,
            name: new_coach.name,
            email,
            password_hash: hash_password(&new_coach.password)?,
            phone: new_coach.phone,
            speciality: new_coach.speciality,
            experience_years: new_coach.experience_years,
            sport_type: new_coach.sport_type,
            profile_image: None,
            is_active: true,
            created_at,
            updated_at: created_at,
            deleted_at: None,
        };
        coach.id = self.coach_repository.create_coach(&coach).await?;
        info!("Registered coach {} <{}>", coach.id, coach.email);
        Ok(coach)
    }

    async fn update_coach(&self, id: CoachId, update: CoachUpdate) -> ServiceResult<Coach> {
        validate_input(&update)?;
        let mut coach = self.get_coach(id).await?;

        if let Some(email) = &update.email {
            let email = validate_email(email)?;
            if email != coach.email {
                self.ensure_email_free(&email).await?;
            }
            coach.email = email;
        }
        if let Some(password) = &update.password {
            coach.password_hash = hash_password(password)?;
        }
        merge(&mut coach.name, update.name);
        merge_opt(&mut coach.phone, update.phone);
        merge_opt(&mut coach.speciality, update.speciality);
        merge_opt(&mut coach.experience_years, update.experience_years);
        merge(&mut coach.sport_type, update.sport_type);
        coach.updated_at = now();

        self.coach_repository.save_coach(&coach).await?;
        info!("Updated coach {}", id);
        Ok(coach)
    }

    async fn delete_coach(&self, id: CoachId) -> ServiceResult<()> {
        let mut coach = self.get_coach(id).await?;
        if !coach.is_active {
            return Ok(());
        }
        let deleted_at = now();
        coach.is_active = false;
        coach.deleted_at = Some(deleted_at);
        coach.updated_at = deleted_at;
        self.coach_repository.save_coach(&coach).await?;
        info!("Deactivated coach {}", id);
        Ok(())
    }

    async fn set_profile_image(&self, id: CoachId, path: String) -> ServiceResult<Coach> {
        let mut coach = self.get_coach(id).await?;
        coach.profile_image = Some(path);
        coach.updated_at = now();
        self.coach_repository.save_coach(&coach).await?;
        Ok(coach)
    }

    async fn try_login(&self, email: &str, password: &str) -> ServiceResult<Coach> {
        let email = email.trim().to_ascii_lowercase();
        let Some(coach) = self.coach_repository.get_coach_by_email(&email).await? else {
            return ServiceError::unauthorized(INVALID_CREDENTIALS);
        };
        if !coach.is_active || !verify_password(password, &coach.password_hash) {
            return ServiceError::unauthorized(INVALID_CREDENTIALS);
        }
        Ok(coach)
    }
}

#[cfg(test)]
mod tests {
    use crate::mock::MockCoachRepository;

    use super::*;

    fn new_coach(email: &str) -> NewCoach {
        NewCoach {
            name: "A".into(),
            email: email.into(),
            password: "secret1".into(),
            phone: Some("123".into()),
            speciality: Some("Batting".into()),
            experience_years: Some(4),
            sport_type: "cricket".into(),
        }
    }

    fn service(repo: &MockCoachRepository) -> CoachServiceImpl {
        CoachServiceImpl::new(Arc::new(Box::new(repo.clone())))
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let repo = MockCoachRepository::default();
        let service = service(&repo);

        let coach = service
            .register_coach(new_coach("coach@example.com"))
            .await
            .unwrap();
        assert_eq!(coach.email, "coach@example.com");
        assert_ne!(coach.password_hash, "secret1");

        assert!(matches!(
            service.register_coach(new_coach("Coach@Example.com")).await,
            Err(ServiceError::Conflict(_))
        ));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_register_validates_fields() {
        let service = service(&MockCoachRepository::default());

        let mut short_password = new_coach("a@x.com");
        short_password.password = "123".into();
        assert!(matches!(
            service.register_coach(short_password).await,
            Err(ServiceError::Invalid(msg)) if msg.contains("password")
        ));

        assert!(matches!(
            service.register_coach(new_coach("nope")).await,
            Err(ServiceError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_get_missing_coach() {
        let service = service(&MockCoachRepository::default());
        assert!(matches!(
            service.get_coach(42).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_partial_update() {
        let service = service(&MockCoachRepository::default());
        let coach = service.register_coach(new_coach("a@x.com")).await.unwrap();

        let updated = service
            .update_coach(
                coach.id,
                CoachUpdate {
                    phone: Some("999".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.phone.as_deref(), Some("999"));
        assert_eq!(updated.name, coach.name);
        assert_eq!(updated.email, coach.email);
        assert_eq!(updated.speciality, coach.speciality);
        assert_eq!(updated.experience_years, coach.experience_years);
        assert_eq!(updated.password_hash, coach.password_hash);

        let stored = service.get_coach(coach.id).await.unwrap();
        assert_eq!(stored.phone.as_deref(), Some("999"));
    }

    #[tokio::test]
    async fn test_update_rehashes_password_and_checks_email() {
        let service = service(&MockCoachRepository::default());
        let first = service.register_coach(new_coach("a@x.com")).await.unwrap();
        service.register_coach(new_coach("b@x.com")).await.unwrap();

        assert!(matches!(
            service
                .update_coach(
                    first.id,
                    CoachUpdate {
                        email: Some("b@x.com".into()),
                        ..Default::default()
                    },
                )
                .await,
            Err(ServiceError::Conflict(_))
        ));

        service
            .update_coach(
                first.id,
                CoachUpdate {
                    password: Some("another1".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(service.try_login("a@x.com", "another1").await.is_ok());
        assert!(matches!(
            service.try_login("a@x.com", "secret1").await,
            Err(ServiceError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_soft_delete() {
        let service = service(&MockCoachRepository::default());
        let coach = service.register_coach(new_coach("a@x.com")).await.unwrap();

        service.delete_coach(coach.id).await.unwrap();
        service.delete_coach(coach.id).await.unwrap();

        let stored = service.get_coach(coach.id).await.unwrap();
        assert!(!stored.is_active);
        assert!(stored.deleted_at.is_some());
        assert!(
            service
                .get_coaches(CoachFilter::default())
                .await
                .unwrap()
                .is_empty()
        );
        assert!(matches!(
            service.try_login("a@x.com", "secret1").await,
            Err(ServiceError::Unauthorized(_))
        ));
        assert!(matches!(
            service.delete_coach(coach.id + 1).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let repo = MockCoachRepository::default();
        let service = service(&repo);
        let mut blank = new_coach("a@x.com");
        blank.name = "   ".into();
        assert!(matches!(
            service.register_coach(blank).await,
            Err(ServiceError::Invalid(msg)) if msg.contains("name")
        ));
        assert_eq!(repo.len(), 0);

        let coach = service.register_coach(new_coach("a@x.com")).await.unwrap();
        let update = CoachUpdate {
            name: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(
            service.update_coach(coach.id, update).await,
            Err(ServiceError::Invalid(_))
        ));
        assert_eq!(service.get_coach(coach.id).await.unwrap().name, "A");
    }
}
