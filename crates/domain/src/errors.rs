//! 领域层错误定义
//!
//! 存储层错误在这里建模，供应用层和 Web 层做状态码映射。

use thiserror::Error;

/// 存储层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// 目标记录不存在
    #[error("记录不存在")]
    NotFound,

    /// 唯一约束冲突（例如重复的邮箱）
    #[error("唯一约束冲突: {constraint}")]
    Duplicate { constraint: String },

    /// 外键约束违反（例如消息引用了不存在的用户）
    #[error("外键约束违反: {constraint}")]
    ForeignKey { constraint: String },

    /// 其他存储错误
    #[error("存储错误: {message}")]
    Storage { message: String },
}

impl RepositoryError {
    pub fn duplicate(constraint: impl Into<String>) -> Self {
        Self::Duplicate {
            constraint: constraint.into(),
        }
    }

    pub fn foreign_key(constraint: impl Into<String>) -> Self {
        Self::ForeignKey {
            constraint: constraint.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// 存储层结果类型
pub type RepositoryResult<T> = Result<T, RepositoryError>;
