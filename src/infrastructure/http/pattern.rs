//! Route pattern compilation and matching.
//!
//! # Responsibilities
//! - Compile a path template with `{name}` placeholders into segments, once,
//!   at registration time
//! - Match an incoming (already normalized) path and capture positional params
//!
//! # Design Decisions
//! - A placeholder is a whole path segment and matches one-or-more non-`/`
//!   characters; an empty segment never satisfies it
//! - Captures are positional, left-to-right; placeholder names are kept only
//!   for logging
//! - One trailing `/` is trimmed from the pattern at compile time (the
//!   dispatcher does the same to incoming paths), so trailing slashes are
//!   insignificant on both sides
//! - No regex; segment comparison keeps matching O(n) over the path

/// 编译后的单个路径段
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// 字面量段, 必须完全相等
    Literal(String),
    /// `{name}` 占位符段, 匹配任意非空、不含 `/` 的段
    Param(String),
}

/// 编译后的路由模式
#[derive(Debug, Clone)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

/// 去掉恰好一个结尾 `/`
pub(crate) fn trim_trailing_slash(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

fn parse_segment(seg: &str) -> Segment {
    let inner = seg
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .filter(|name| {
            !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic() || c == '_')
        });

    match inner {
        Some(name) => Segment::Param(name.to_string()),
        None => Segment::Literal(seg.to_string()),
    }
}

impl RoutePattern {
    /// 编译路径模板
    pub fn compile(pattern: &str) -> Self {
        let trimmed = trim_trailing_slash(pattern);
        let segments = trimmed.split('/').map(parse_segment).collect();
        Self {
            raw: trimmed.to_string(),
            segments,
        }
    }

    /// 原始模板（已去掉结尾斜杠）
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// 占位符名称, 按出现顺序
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// 匹配已归一化的路径, 成功时返回按位置捕获的参数
    ///
    /// 调用方负责先剥离 base path 与结尾斜杠
    pub fn matches(&self, path: &str) -> Option<Vec<String>> {
        let mut params = Vec::new();
        let mut path_segs = path.split('/');

        for segment in &self.segments {
            let seg = path_segs.next()?;
            match segment {
                Segment::Literal(lit) => {
                    if lit != seg {
                        return None;
                    }
                }
                Segment::Param(_) => {
                    // 空段不满足占位符
                    if seg.is_empty() {
                        return None;
                    }
                    params.push(seg.to_string());
                }
            }
        }

        // 路径段数必须一致
        if path_segs.next().is_some() {
            return None;
        }

        Some(params)
    }
}
