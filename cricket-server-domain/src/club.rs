use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::info;
use validator::Validate;

use crate::{
    RecordId, ServiceError, ServiceResult,
    password::{INVALID_CREDENTIALS, hash_password, verify_password},
    util::{merge, merge_opt, non_blank, now, validate_email, validate_input},
};

pub type ClubId = RecordId;

#[derive(Clone, Debug)]
pub struct Club {
    pub id: ClubId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub sport_type: String,
    pub logo: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Validate)]
pub struct NewClub {
    #[validate(
        length(min = 1, max = 150, message = "must be 1 to 150 characters"),
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
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub address: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub city: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub country: Option<String>,
    #[validate(
        length(min = 1, max = 50, message = "must be 1 to 50 characters"),
        custom(function = "non_blank")
    )]
    pub sport_type: String,
}

#[derive(Clone, Debug, Default, Validate)]
pub struct ClubUpdate {
    #[validate(
        length(min = 1, max = 150, message = "must be 1 to 150 characters"),
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
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub address: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub city: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub country: Option<String>,
    #[validate(
        length(min = 1, max = 50, message = "must be 1 to 50 characters"),
        custom(function = "non_blank")
    )]
    pub sport_type: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ClubFilter {
    pub sport_type: Option<String>,
    pub city: Option<String>,
    pub include_inactive: bool,
}

impl ClubFilter {
    pub fn matches(&self, club: &Club) -> bool {
        (self.include_inactive || club.is_active)
            && self
                .sport_type
                .as_ref()
                .is_none_or(|s| *s == club.sport_type)
            && self
                .city
                .as_ref()
                .is_none_or(|c| club.city.as_ref() == Some(c))
    }
}

pub type ArcClubRepository = Arc<Box<dyn ClubRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait ClubRepository {
    async fn get_club_by_id(&self, id: ClubId) -> ServiceResult<Option<Club>>;
    async fn get_club_by_email(&self, email: &str) -> ServiceResult<Option<Club>>;
    async fn get_clubs(&self, filter: &ClubFilter) -> ServiceResult<Vec<Club>>;
    async fn create_club(&self, club: &Club) -> ServiceResult<ClubId>;
    async fn save_club(&self, club: &Club) -> ServiceResult<()>;
}

pub type ArcClubService = Arc<Box<dyn ClubService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait ClubService {
    async fn get_clubs(&self, filter: ClubFilter) -> ServiceResult<Vec<Club>>;
    async fn get_club(&self, id: ClubId) -> ServiceResult<Club>;
    async fn register_club(&self, new_club: NewClub) -> ServiceResult<Club>;
    async fn update_club(&self, id: ClubId, update: ClubUpdate) -> ServiceResult<Club>;
    async fn delete_club(&self, id: ClubId) -> ServiceResult<()>;
    async fn set_logo(&self, id: ClubId, path: String) -> ServiceResult<Club>;
    async fn try_login(&self, email: &str, password: &str) -> ServiceResult<Club>;
}

pub struct ClubServiceImpl {
    club_repository: ArcClubRepository,
}

impl ClubServiceImpl {
    pub fn new(club_repository: ArcClubRepository) -> Self {
        Self { club_repository }
    }

    async fn ensure_email_free(&self, email: &str) -> ServiceResult<()> {
        if self
            .club_repository
            .get_club_by_email(email)
            .await?
            .is_some()
        {
            return ServiceError::conflict("Club with this email already exists");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ClubService for ClubServiceImpl {
    async fn get_clubs(&self, filter: ClubFilter) -> ServiceResult<Vec<Club>> {
        self.club_repository.get_clubs(&filter).await
    }

    async fn get_club(&self, id: ClubId) -> ServiceResult<Club> {
        match self.club_repository.get_club_by_id(id).await? {
            Some(club) => Ok(club),
            None => ServiceError::not_found("Club not found"),
        }
    }

    async fn register_club(&self, new_club: NewClub) -> ServiceResult<Club> {
        validate_input(&new_club)?;
        let email = validate_email(&new_club.email)?;
        self.ensure_email_free(&email).await?;

        let created_at = now();
        let mut club = Club {
            id: 0,
            name: new_club.name,
            email,
            password_hash: hash_password(&new_club.password)?,
            phone: new_club.phone,
            address: new_club.address,
            city: new_club.city,
            country: new_club.country,
            sport_type: new_club.sport_type,
            logo: None,
            is_active: true,
            created_at,
            updated_at: created_at,
            deleted_at: None,
        };
        club.id = self.club_repository.create_club(&club).await?;
        info!("Registered club {} <{}>", club.id, club.email);
        Ok(club)
    }

    async fn update_club(&self, id: ClubId, update: ClubUpdate) -> ServiceResult<Club> {
        validate_input(&update)?;
        let mut club = self.get_club(id).await?;

        if let Some(email) = &update.email {
            let email = validate_email(email)?;
            if email != club.email {
                self.ensure_email_free(&email).await?;
            }
            club.email = email;
        }
        if let Some(password) = &update.password {
            club.password_hash = hash_password(password)?;
        }
        merge(&mut club.name, update.name);
        merge_opt(&mut club.phone, update.phone);
        merge_opt(&mut club.address, update.address);
        merge_opt(&mut club.city, update.city);
        merge_opt(&mut club.country, update.country);
        merge(&mut club.sport_type, update.sport_type);
        club.updated_at = now();

        self.club_repository.save_club(&club).await?;
        info!("Updated club {}", id);
        Ok(club)
    }

    async fn delete_club(&self, id: ClubId) -> ServiceResult<()> {
        let mut club = self.get_club(id).await?;
        if !club.is_active {
            return Ok(());
        }
        let deleted_at = now();
        club.is_active = false;
        club.deleted_at = Some(deleted_at);
        club.updated_at = deleted_at;
        self.club_repository.save_club(&club).await?;
        info!("Deactivated club {}", id);
        Ok(())
    }

    async fn set_logo(&self, id: ClubId, path: String) -> ServiceResult<Club> {
        let mut club = self.get_club(id).await?;
        club.logo = Some(path);
        club.updated_at = now();
        self.club_repository.save_club(&club).await?;
        Ok(club)
    }

    async fn try_login(&self, email: &str, password: &str) -> ServiceResult<Club> {
        let email = email.trim().to_ascii_lowercase();
        let Some(club) = self.club_repository.get_club_by_email(&email).await? else {
            return ServiceError::unauthorized(INVALID_CREDENTIALS);
        };
        if !club.is_active || !verify_password(password, &club.password_hash) {
            return ServiceError::unauthorized(INVALID_CREDENTIALS);
        }
        Ok(club)
    }
}
