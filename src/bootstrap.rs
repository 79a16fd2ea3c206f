//! Service wiring.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use keroosha_auth::{
    Argon2PasswordEncoder, CodeDelivery, ConfirmationService, ConfirmationThrottle,
    LogCodeDelivery, PasswordEncoder, SessionGate, UserAuthManager, build_token_storage,
    spawn_token_purger,
};
use keroosha_core::config::{AppConfig, DevConfig, TokenBackend};
use keroosha_core::error::AppError;
use keroosha_core::result::AppResult;
use keroosha_core::traits::{Clock, PasswordAuthRepository, SystemClock, TokenStorage};
use keroosha_core::UserId;
use keroosha_database::{MemoryRoleRepository, MemoryUserRepository};
use keroosha_entity::{NewUser, RoleRepository, Roles, User, UserRepository};

/// Everything a transport needs to authenticate and manage accounts.
#[derive(Clone)]
pub struct IdentityServices {
    /// Configuration the services were built from.
    pub config: AppConfig,
    /// User storage.
    pub users: Arc<dyn UserRepository>,
    /// Role grant storage.
    pub roles: Arc<dyn RoleRepository>,
    /// Session token backend.
    pub tokens: Arc<dyn TokenStorage>,
    /// Password encoder.
    pub passwords: Arc<dyn PasswordEncoder>,
    /// Confirmation request throttle.
    pub throttle: Arc<ConfirmationThrottle>,
    /// Login, registration and password reset flows.
    pub auth: UserAuthManager,
    /// Confirmation code issuance.
    pub confirmation: ConfirmationService,
    /// Request-time authentication.
    pub gate: SessionGate<User, dyn UserRepository>,
}

impl std::fmt::Debug for IdentityServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityServices")
            .field("tokens", &self.tokens)
            .field("passwords", &self.passwords)
            .field("auth", &self.auth)
            .field("confirmation", &self.confirmation)
            .finish()
    }
}

impl IdentityServices {
    /// Builds the services on in-memory storage and the wall clock.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Builds the services with the throttle driven by `clock`.
    pub fn with_clock(config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(MemoryUserRepository::new());
        let roles: Arc<dyn RoleRepository> = Arc::new(MemoryRoleRepository::new(users.clone()));
        Self::assemble(config, users, roles, Arc::new(LogCodeDelivery), clock)
    }

    /// Builds the services over caller-supplied collaborators.
    pub fn assemble(
        config: &AppConfig,
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        delivery: Arc<dyn CodeDelivery>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let tokens = build_token_storage(&config.token, clock.clone());
        let passwords: Arc<dyn PasswordEncoder> = Arc::new(Argon2PasswordEncoder::new());
        let throttle = Arc::new(ConfirmationThrottle::from_config(&config.auth, clock));

        let auth = UserAuthManager::new(
            users.clone(),
            roles.clone(),
            tokens.clone(),
            passwords.clone(),
            throttle.clone(),
            &config.auth,
        );
        let gate = SessionGate::new(auth.engine().clone());
        let confirmation = ConfirmationService::new(users.clone(), delivery, &config.confirmation);

        Self {
            config: config.clone(),
            users,
            roles,
            tokens,
            passwords,
            throttle,
            auth,
            confirmation,
            gate,
        }
    }

    /// Creates the confirmed development user with the Admin role.
    ///
    /// Returns the existing id if the user is already there.
    pub async fn seed_dev_user(&self, dev: &DevConfig) -> AppResult<UserId> {
        let email = keroosha_auth::CredentialPolicy::normalize_email(&dev.email);
        if let Some(existing) = self.users.find_by_login(&email).await? {
            info!(user_id = %existing.id, "Development user already present");
            return Ok(existing.id);
        }

        info!(%email, "Creating the default user...");
        let id = self
            .users
            .create(NewUser {
                email,
                name: dev.name.clone(),
                password_hash: self.passwords.encode(&dev.password)?,
            })
            .await?;

        let mut user = self
            .users
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Seeded user {id} vanished")))?;
        user.confirmed = true;
        self.users.update(&user).await?;

        self.roles.attach_role(id, Roles::ADMIN).await?;
        info!(user_id = %id, "Successfully seeded the development user");
        Ok(id)
    }

    /// Starts the periodic throttle sweep on the current runtime, unless
    /// `auth.throttle_sweep_interval_seconds` is `0`.
    pub fn spawn_throttle_sweeper(&self) -> Option<JoinHandle<()>> {
        match self.config.auth.throttle_sweep_interval_seconds {
            0 => None,
            secs => Some(self.throttle.clone().spawn_sweeper(Duration::from_secs(secs))),
        }
    }

    /// Starts the periodic purge of expired memory tokens, unless
    /// `token.purge_interval_seconds` is `0` or tokens are signed.
    pub fn spawn_token_purger(&self) -> Option<JoinHandle<()>> {
        if self.config.token.backend != TokenBackend::Memory {
            return None;
        }
        match self.config.token.purge_interval_seconds {
            0 => None,
            secs => Some(spawn_token_purger(self.tokens.clone(), Duration::from_secs(secs))),
        }
    }

    /// Starts every enabled background task.
    pub fn spawn_maintenance(&self) -> Vec<JoinHandle<()>> {
        [self.spawn_throttle_sweeper(), self.spawn_token_purger()]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Builds the services from configuration and hands them to [`start`].
pub async fn bootstrap(config: &AppConfig) -> AppResult<IdentityServices> {
    info!("Starting Keroosha identity v{}", env!("CARGO_PKG_VERSION"));
    start(IdentityServices::from_config(config)).await
}

/// Seeds development data when `dev.seed` is set and starts the background
/// tasks. The tasks stay detached until the runtime shuts down.
pub async fn start(services: IdentityServices) -> AppResult<IdentityServices> {
    if services.config.dev.seed {
        services.seed_dev_user(&services.config.dev).await?;
    }

    let tasks = services.spawn_maintenance();
    info!(
        token_backend = %services.config.token.backend,
        throttle_seconds = services.config.auth.confirmation_throttle_seconds,
        background_tasks = tasks.len(),
        "Identity services ready"
    );
    Ok(services)
}
