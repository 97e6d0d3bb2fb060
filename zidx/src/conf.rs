//! Index build configuration
//! 索引构建配置

/// Read a boolean toggle from the environment.
/// 从环境变量读取布尔开关。
fn env_bool(name: &str, default: bool) -> bool {
  match std::env::var(name) {
    Ok(v) => matches!(v.as_str(), "1" | "true" | "on" | "yes"),
    Err(_) => default,
  }
}

/// Build options. Each toggle gates a planner branch; disabling one forces
/// the fallback below it, trie at the bottom. Defaults come from the
/// environment so operators can force fallbacks without a redeploy.
/// 构建选项。每个开关控制一个规划器分支；关闭即强制退到其下的回退路
/// 径，最底层为字典树。默认值取自环境变量，运维可在不重新部署的情况下
/// 强制回退。
#[derive(Debug, Clone)]
pub struct Conf {
  /// Allow FewZero bitmap variants
  /// 允许 FewZero 位图变体
  pub enable_few_zero: bool,
  /// Allow the pure uint branch (uint prefix, empty suffix)
  /// 允许纯整数分支（整数前缀加空后缀）
  pub enable_uint_index: bool,
  /// Allow uint prefix combined with a non-empty suffix
  /// 允许整数前缀搭配非空后缀
  pub enable_composite_uint_index: bool,
}

impl Default for Conf {
  fn default() -> Self {
    Self {
      enable_few_zero: false,
      enable_uint_index: true,
      enable_composite_uint_index: true,
    }
  }
}

impl Conf {
  /// Defaults with toggles taken from `ZIDX_ENABLE_*`.
  /// 默认值，开关取自 `ZIDX_ENABLE_*` 环境变量。
  pub fn from_env() -> Self {
    Self {
      enable_few_zero: env_bool("ZIDX_ENABLE_FEW_ZERO", false),
      enable_uint_index: env_bool("ZIDX_ENABLE_UINT_INDEX", true),
      enable_composite_uint_index: env_bool("ZIDX_ENABLE_COMPOSITE_UINT_INDEX", true),
    }
  }
}
