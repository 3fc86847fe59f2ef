use std::fmt;

/// 监听端运行统计
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListenerStats {
    /// 当前已安装排名的代数（0 = 尚未收到任何更新）
    pub generation: u64,
    /// 成功安装的更新次数
    pub applied: u64,
    /// 被拒绝（帧损坏 / 快照不合法）的更新次数
    pub rejected: u64,
    /// 当前排名中的 key 数
    pub key_count: usize,
    /// 当前被打扰过滤拦截的 key 数
    pub intercepted_count: usize,
}

impl fmt::Display for ListenerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "╔══════════════════════════════════════════════════╗")?;
        writeln!(f, "║           notif-rank Listener Report             ║")?;
        writeln!(f, "╠══════════════════════════════════════════════════╣")?;
        writeln!(f, "║   generation:   {:>10}                       ║", self.generation)?;
        writeln!(f, "║   applied:      {:>10}                       ║", self.applied)?;
        writeln!(f, "║   rejected:     {:>10}                       ║", self.rejected)?;
        writeln!(f, "╠──────────────────────────────────────────────────╣")?;
        writeln!(f, "║   keys:         {:>10}                       ║", self.key_count)?;
        writeln!(
            f,
            "║   intercepted:  {:>10}                       ║",
            self.intercepted_count
        )?;
        writeln!(f, "╚══════════════════════════════════════════════════╝")?;
        Ok(())
    }
}
