//! 宽松反序列化
//!
//! 查询参数来自表单或已保存的搜索条件,字段类型并不可靠
//! (数字可能是字符串,CNPJ可能是数字)。这些函数把形状问题留给校验器报告,
//! 而不是在反序列化阶段失败。
//!
//! 同步信号 (定时任务、执行日志) 可能是旧版本或写到一半的记录,
//! 对应的辅助函数把无法识别的形状当作缺失。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::utils::time_utils::parse_sale_time;

/// 宽松数值
///
/// - 缺失/null/空字符串 → None
/// - 数字 → Some(n)
/// - 数字字符串 (允许逗号小数点) → Some(n)
/// - 其他形状 → Some(NaN),必然无法通过范围校验
pub fn opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => Some(n.as_f64().unwrap_or(f64::NAN)),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.replace(',', ".").parse().unwrap_or(f64::NAN))
            }
        }
        Some(_) => Some(f64::NAN),
    })
}

/// 宽松字符串
///
/// - 缺失/null → None
/// - 字符串 → Some(s)
/// - 数字 → Some(数字的十进制文本)
/// - 其他形状 → None
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// 宽松整数
///
/// 规则同 [`opt_number`],非有限值 → None,小数部分截断
pub fn opt_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_number(deserializer)?
        .filter(|n| n.is_finite())
        .map(|n| n as i64))
}

/// 宽松时间
///
/// RFC 3339 或不带时区的本地时间字符串;其他形状 → None
pub fn opt_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => parse_sale_time(&s),
        _ => None,
    })
}

/// 宽松布尔
///
/// - 布尔 → 原值
/// - 数字 → 非零为 true
/// - 字符串 "true"/"1"/"sim"/"yes" (忽略大小写) → true
/// - 其他形状 → false
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "sim" | "yes"
        ),
        _ => false,
    })
}

/// 宽松文本,缺失或无法识别时为空字符串
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string(deserializer)?.unwrap_or_default())
}
