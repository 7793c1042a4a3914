use anyhow::Result;

use crate::{config::AppConfig, models::User};

use super::password;

pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let password_hash = password::hash_password(&config.admin_password)?;
        Ok(Self {
            users: vec![User {
                id: 1,
                username: config.admin_username.clone(),
                email: config.admin_email.clone(),
                password_hash,
            }],
        })
    }

    pub fn find_by_id(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|user| user.email == email)
    }

    /// Unknown emails and wrong passwords are not distinguished.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Option<&User>> {
        let user = match self.find_by_email(email) {
            Some(user) => user,
            None => return Ok(None),
        };

        if password::verify_password(password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}
