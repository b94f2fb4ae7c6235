use std::sync::Arc;

use domain::{NewUser, User, UserId, UserUpdate};
use tracing::info;

use crate::{error::ApplicationError, repository::UserRepository};

pub struct UserServiceDependencies {
    pub user_repository: Arc<dyn UserRepository>,
}

/// 用户用例服务，请求校验在 Web 层完成，这里直通存储。
pub struct UserService {
    deps: UserServiceDependencies,
}

impl UserService {
    pub fn new(deps: UserServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn create(&self, user: NewUser) -> Result<User, ApplicationError> {
        let stored = self.deps.user_repository.create(user).await?;
        info!(user_id = %stored.id, "用户已创建");
        Ok(stored)
    }

    pub async fn list(&self) -> Result<Vec<User>, ApplicationError> {
        Ok(self.deps.user_repository.list_all().await?)
    }

    pub async fn get(&self, id: UserId) -> Result<Option<User>, ApplicationError> {
        Ok(self.deps.user_repository.find_by_id(id).await?)
    }

    /// 返回受影响的行数，0 表示目标用户不存在。
    pub async fn update(&self, id: UserId, update: UserUpdate) -> Result<u64, ApplicationError> {
        let affected = self.deps.user_repository.update(id, update).await?;
        if affected > 0 {
            info!(user_id = %id, "用户已更新");
        }
        Ok(affected)
    }

    pub async fn delete(&self, id: UserId) -> Result<u64, ApplicationError> {
        let affected = self.deps.user_repository.delete(id).await?;
        if affected > 0 {
            info!(user_id = %id, "用户已删除");
        }
        Ok(affected)
    }
}
