//! Ensures the seeded admin and regular accounts exist at startup.
//!
//! The accounts live under reserved ids so the protection rules can refer to
//! them. Seeding is idempotent: an account whose id is already taken is left
//! untouched, including its password.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::{PasswordHasher, UserRepository};
use crate::domain::user_account_service::{map_hasher_error, map_user_repository_error};
use crate::domain::{
    DefaultAccount, DefaultAccounts, EmailAddress, Error, NewUser, PersonName, PlainPassword,
    RoleId, RoleRegistry, UserId, Username,
};

/// Profile and password for one seeded account.
#[derive(Debug, Clone)]
pub struct AccountSeed {
    /// Username.
    pub username: Username,
    /// First name.
    pub firstname: PersonName,
    /// Last name.
    pub lastname: PersonName,
    /// Email address.
    pub email: EmailAddress,
    /// Initial password.
    pub password: PlainPassword,
}

/// Seeds for both reserved accounts. A missing seed skips that account.
#[derive(Debug, Clone, Default)]
pub struct DefaultAccountSeeds {
    /// The administrator.
    pub admin: Option<AccountSeed>,
    /// The regular user.
    pub regular: Option<AccountSeed>,
}

/// Inserts the reserved accounts when they are missing.
pub struct DefaultAccountSeeder<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    accounts: DefaultAccounts,
    roles: RoleRegistry,
}

impl<U, H> DefaultAccountSeeder<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    /// Create a seeder for the given reserved ids.
    pub fn new(
        users: Arc<U>,
        hasher: Arc<H>,
        accounts: DefaultAccounts,
        roles: RoleRegistry,
    ) -> Self {
        Self {
            users,
            hasher,
            accounts,
            roles,
        }
    }

    /// Insert every configured account that does not exist yet.
    ///
    /// Returns how many accounts were inserted.
    ///
    /// # Errors
    /// Returns the mapped repository or hasher error; accounts processed
    /// before the failure stay inserted.
    pub async fn ensure(&self, seeds: &DefaultAccountSeeds) -> Result<u32, Error> {
        let plan = [
            ("admin", self.accounts.admin(), self.roles.admin(), seeds.admin.as_ref()),
            (
                "regular",
                self.accounts.regular(),
                self.roles.regular(),
                seeds.regular.as_ref(),
            ),
        ];
        let mut inserted = 0;
        for (label, id, role_id, seed) in plan {
            let Some(seed) = seed else {
                warn!(account = label, "no password configured; default account not seeded");
                continue;
            };
            if self.insert(id, role_id, seed).await? {
                info!(account = label, user_id = %id, "default account created");
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn insert(&self, id: UserId, role_id: RoleId, seed: &AccountSeed) -> Result<bool, Error> {
        let password_hash = self.hasher.hash(&seed.password).map_err(map_hasher_error)?;
        let account = DefaultAccount {
            id,
            user: NewUser {
                username: seed.username.clone(),
                firstname: seed.firstname.clone(),
                lastname: seed.lastname.clone(),
                email: seed.email.clone(),
                role_id,
                password_hash,
            },
        };
        self.users
            .insert_default_account(&account)
            .await
            .map_err(map_user_repository_error)
    }
}
