// ==========================================
// 物流管理系统 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 运行是否正常 (Functioning Status)
// ==========================================
// 存储格式: 单字符 Y / N (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctioningStatus {
    #[serde(rename = "Y")]
    Yes,
    #[serde(rename = "N")]
    No,
}

impl fmt::Display for FunctioningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl FunctioningStatus {
    /// 从单字符代码解析（大小写不敏感），无法识别时返回 None
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "Y" => Some(FunctioningStatus::Yes),
            "N" => Some(FunctioningStatus::No),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            FunctioningStatus::Yes => "Y",
            FunctioningStatus::No => "N",
        }
    }
}

// ==========================================
// 配送状态 (Distribution Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistributionStatus {
    Initiated, // 已发起
    Synced,    // 已同步
}

impl fmt::Display for DistributionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl DistributionStatus {
    /// 从字符串解析配送状态（未知值返回 None）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "INITIATED" => Some(DistributionStatus::Initiated),
            "SYNCED" => Some(DistributionStatus::Synced),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            DistributionStatus::Initiated => "INITIATED",
            DistributionStatus::Synced => "SYNCED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_functioning_status_codes() {
        assert_eq!(FunctioningStatus::parse("Y"), Some(FunctioningStatus::Yes));
        assert_eq!(FunctioningStatus::parse(" n "), Some(FunctioningStatus::No));
        assert_eq!(FunctioningStatus::parse("D"), None);
        assert_eq!(FunctioningStatus::No.to_db_str(), "N");
    }

    #[test]
    fn test_functioning_status_serializes_as_code() {
        let json = serde_json::to_string(&FunctioningStatus::Yes).unwrap();
        assert_eq!(json, "\"Y\"");

        let parsed: FunctioningStatus = serde_json::from_str("\"N\"").unwrap();
        assert_eq!(parsed, FunctioningStatus::No);
    }

    #[test]
    fn test_distribution_status_round_trip() {
        for status in [DistributionStatus::Initiated, DistributionStatus::Synced] {
            assert_eq!(DistributionStatus::parse(status.to_db_str()), Some(status));
        }
        assert_eq!(DistributionStatus::parse(" synced "), Some(DistributionStatus::Synced));
        assert_eq!(DistributionStatus::parse("CLOSED"), None);
    }
}
