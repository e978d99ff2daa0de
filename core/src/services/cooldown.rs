//! 查询冷却
//!
//! 职责: 限制同一用户两次价格查询的最小间隔,避免冲击上游API
//! 策略: 记录每个用户最近一次放行的时间,窗口内的调用直接拒绝

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// 按用户的查询冷却
///
/// 只在真正发出请求前占用;校验失败的查询不会走到这里。
pub struct QueryCooldown {
    interval: Duration,
    /// user_id → 最近一次放行时间
    last_calls: Mutex<HashMap<String, Instant>>,
}

impl QueryCooldown {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_calls: Mutex::new(HashMap::new()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 尝试放行一次查询
    ///
    /// # 返回值
    /// - `Ok(())`: 已放行并记录本次时间
    /// - `Err(remaining)`: 冷却中,返回剩余时间
    pub async fn try_acquire(&self, user_id: &str) -> Result<(), Duration> {
        let now = Instant::now();
        let mut guard = self.last_calls.lock().await;

        if let Some(last) = guard.get(user_id) {
            let elapsed = now.saturating_duration_since(*last);
            if elapsed < self.interval {
                let remaining = self.interval - elapsed;
                tracing::debug!(
                    user_id = %user_id,
                    remaining_ms = remaining.as_millis() as u64,
                    "查询冷却中"
                );
                return Err(remaining);
            }
        }

        // 冷却已结束的记录不再影响放行
        let interval = self.interval;
        guard.retain(|_, last| now.saturating_duration_since(*last) < interval);
        guard.insert(user_id.to_string(), now);
        Ok(())
    }

    /// 仍在冷却记录中的用户数
    pub async fn tracked_users(&self) -> usize {
        self.last_calls.lock().await.len()
    }

    /// 剩余冷却时间,不在冷却中返回 None
    pub async fn remaining(&self, user_id: &str) -> Option<Duration> {
        let guard = self.last_calls.lock().await;
        let last = guard.get(user_id)?;
        let elapsed = Instant::now().saturating_duration_since(*last);
        (elapsed < self.interval).then(|| self.interval - elapsed)
    }

    /// 清除用户的冷却记录
    pub async fn reset(&self, user_id: &str) {
        let mut guard = self.last_calls.lock().await;
        if guard.remove(user_id).is_some() {
            tracing::debug!(user_id = %user_id, "已清除查询冷却");
        }
    }
}

/// 剩余时间向上取整到秒,至少为1
pub fn remaining_secs(remaining: Duration) -> u64 {
    let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    secs.max(1)
}
