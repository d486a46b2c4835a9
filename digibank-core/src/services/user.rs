//! User service - operator accounts that can log in to the API

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{validation, ListQuery, Page, User, UserSummary};
use crate::ports::{PasswordHasher, UserStore};
use crate::services::account::PasswordChange;
use crate::services::listing;

const NOT_FOUND: &str = "User not found";
const EMAIL_TAKEN: &str = "Email is already registered";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
}

pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    pub fn get(&self, id: Uuid) -> Result<User> {
        self.store
            .get_user(id)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }

    pub fn list(&self, query: &ListQuery) -> Result<Page<UserSummary>> {
        let users = self.store.list_users()?;
        Ok(listing::query(users, query).map(|u| UserSummary::from(&u)))
    }

    pub fn email_is_registered(&self, email: &str) -> Result<bool> {
        Ok(self.store.get_user_by_email(email)?.is_some())
    }

    pub fn check_password(&self, id: Uuid, password: &str) -> Result<bool> {
        match self.store.get_user(id)? {
            Some(user) => self.hasher.verify(password, &user.password_hash),
            None => Ok(false),
        }
    }

    pub fn create(&self, request: &NewUser) -> Result<User> {
        let name = validation::user_name(&request.name)?;
        let email = validation::email(&request.email)?;
        validation::new_password(&request.password, &request.password_confirm, "Password")?;

        if self.email_is_registered(&email)? {
            return Err(Error::duplicate(EMAIL_TAKEN));
        }

        let user = User::new(name, email, self.hasher.hash(&request.password)?);
        self.store.create_user(&user)?;
        tracing::info!(user_id = %user.id, "user created");
        Ok(user)
    }

    /// Users are updated on existence alone, no password needed
    pub fn update(&self, id: Uuid, request: &UserUpdate) -> Result<User> {
        let name = validation::user_name(&request.name)?;
        let email = validation::email(&request.email)?;
        self.get(id)?;

        if let Some(other) = self.store.get_user_by_email(&email)? {
            if other.id != id {
                return Err(Error::duplicate(EMAIL_TAKEN));
            }
        }

        if !self.store.update_user_details(id, &name, &email)? {
            return Err(Error::operation_failed("Failed to update user"));
        }
        tracing::info!(user_id = %id, "user updated");
        self.get(id)
    }

    pub fn delete(&self, id: Uuid) -> Result<User> {
        let user = self.get(id)?;
        if !self.store.delete_user(id)? {
            return Err(Error::operation_failed("Failed to delete user"));
        }
        tracing::info!(user_id = %id, "user deleted");
        Ok(user)
    }

    pub fn change_password(&self, id: Uuid, request: &PasswordChange) -> Result<()> {
        validation::password_present(&request.password_old, "Old password")?;
        validation::new_password(
            &request.password_new,
            &request.password_confirm,
            "New password",
        )?;

        let user = self.get(id)?;
        if !self.hasher.verify(&request.password_old, &user.password_hash)? {
            return Err(Error::invalid_credentials("Wrong password"));
        }

        let hash = self.hasher.hash(&request.password_new)?;
        if !self.store.update_user_password(id, &hash)? {
            return Err(Error::operation_failed("Failed to change password"));
        }
        tracing::info!(user_id = %id, "user password changed");
        Ok(())
    }
}
