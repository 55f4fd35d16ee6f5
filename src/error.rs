//! 统一错误处理 - 配置错误与未知策略

/// 探测模拟可能发生的错误
///
/// 插入未找到空槽位不属于错误，而是 `InsertionTrace::success == false`。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProbeError {
    #[error("无效配置: {reason}")]
    InvalidConfig {
        reason: String,
    },

    #[error("未知探测策略: {id}")]
    UnknownStrategy {
        id: String,
    },
}

/// 库内统一结果类型
pub type Result<T> = std::result::Result<T, ProbeError>;

impl ProbeError {
    /// 构造配置错误
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// 构造未知策略错误
    pub fn unknown_strategy(id: impl Into<String>) -> Self {
        Self::UnknownStrategy { id: id.into() }
    }

    /// 获取错误恢复建议
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidConfig { .. } => Some("检查容量、δ 取值范围 (0, 1] 与试验次数"),
            Self::UnknownStrategy { .. } => Some("使用 uniform、layered 或 funnel"),
        }
    }

    /// 判断错误是否可通过重试恢复
    ///
    /// 两类错误都在调用时由参数决定，原样重试不会成功。
    pub fn is_recoverable(&self) -> bool {
        false
    }

    /// 是否为配置类错误
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }
}
