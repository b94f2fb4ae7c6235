use serde::Serialize;

/// 成功响应的统一信封：`{"success": true, "message": ..., "count"?: ..., "data"?: ...}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            count: None,
            data: Some(data),
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// 列表响应带 count 字段。
    pub fn with_list(message: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            success: true,
            message: message.into(),
            count: Some(items.len()),
            data: Some(items),
        }
    }
}

impl ApiResponse<()> {
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            count: None,
            data: None,
        }
    }

    pub fn with_count(message: impl Into<String>, count: usize) -> Self {
        Self {
            success: true,
            message: message.into(),
            count: Some(count),
            data: None,
        }
    }
}
