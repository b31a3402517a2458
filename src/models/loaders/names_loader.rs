use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use std::path::Path;
use tokio::fs;

/// 读取名字文件，返回所有非空行（已去除首尾空白）
pub async fn load_names_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取名字文件: {}", path.display()))?;

    let lines: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    tracing::info!("从 '{}' 读取到 {} 个名字", path.display(), lines.len());

    Ok(lines)
}

/// 读取名字文件并打乱顺序
pub async fn load_names_file_shuffled(path: &Path) -> Result<Vec<String>> {
    let mut lines = load_names_file(path).await?;
    lines.shuffle(&mut rand::rng());
    tracing::info!("已打乱名字处理顺序");
    Ok(lines)
}
