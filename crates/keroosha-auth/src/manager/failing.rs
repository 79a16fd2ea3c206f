//! User repository double whose reads or writes can be made to fail.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use keroosha_core::result::AppResult;
use keroosha_core::traits::PasswordAuthRepository;
use keroosha_core::{AppError, UserId};
use keroosha_database::MemoryUserRepository;
use keroosha_entity::{NewUser, User, UserRepository};

/// Delegates to an in-memory repository until told to fail.
#[derive(Debug, Default)]
pub(crate) struct FlakyUserRepository {
    inner: MemoryUserRepository,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyUserRepository {
    pub(crate) fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn read(&self) -> AppResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::database("connection reset during read"));
        }
        Ok(())
    }

    fn write(&self) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::database("connection reset during write"));
        }
        Ok(())
    }
}

#[async_trait]
impl PasswordAuthRepository<User> for FlakyUserRepository {
    async fn get_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        self.read()?;
        self.inner.get_by_id(id).await
    }

    async fn find_by_login(&self, login: &str) -> AppResult<Option<User>> {
        self.read()?;
        self.inner.find_by_login(login).await
    }
}

#[async_trait]
impl UserRepository for FlakyUserRepository {
    async fn create(&self, new_user: NewUser) -> AppResult<UserId> {
        self.write()?;
        self.inner.create(new_user).await
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        self.write()?;
        self.inner.update(user).await
    }

    async fn set_confirmation_code(&self, id: UserId, code: Option<String>) -> AppResult<()> {
        self.write()?;
        self.inner.set_confirmation_code(id, code).await
    }

    async fn confirm_by_code(&self, code: &str) -> AppResult<Option<UserId>> {
        self.write()?;
        self.inner.confirm_by_code(code).await
    }

    async fn set_password(&self, id: UserId, password_hash: String) -> AppResult<()> {
        self.write()?;
        self.inner.set_password(id, password_hash).await
    }

    async fn find_by_confirm_code(&self, code: &str) -> AppResult<Option<User>> {
        self.read()?;
        self.inner.find_by_confirm_code(code).await
    }

    async fn get_by_ids(&self, ids: &[UserId]) -> AppResult<Vec<User>> {
        self.read()?;
        self.inner.get_by_ids(ids).await
    }
}
