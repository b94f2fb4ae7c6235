use serde::{Deserialize, Serialize};

use crate::value_objects::{Timestamp, UserId};

/// 用户实体，字段与 users 表一一对应。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// 新建用户的输入。phone 和 password 可缺省，缺省的 password
/// 会在存储层触发 NOT NULL 约束错误。
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: Option<String>,
}

/// 更新用户时允许修改的字段。密码不在更新范围内。
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}
