//! 设置持久化
//!
//! 设置以格式化 JSON 保存在 `Config/settings.json`，缺失的字段使用默认值。

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::GallerySettings;
use crate::paths::PathProvider;
use crate::utils::error::{AppError, AppResult};

/// 设置管理器
#[derive(Debug, Clone)]
pub struct SettingsManager {
    settings_path: PathBuf,
}

fn ensure_parent(path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::Config(format!("无法创建配置目录: {}", e)))?;
    }
    Ok(())
}

impl SettingsManager {
    /// 使用 PathProvider 的设置路径
    pub fn new(provider: &dyn PathProvider) -> AppResult<Self> {
        Self::from_path(provider.settings_path())
    }

    pub fn from_path(settings_path: PathBuf) -> AppResult<Self> {
        ensure_parent(&settings_path)?;
        Ok(Self { settings_path })
    }

    /// 加载设置，文件不存在时返回默认设置
    pub fn load(&self) -> AppResult<GallerySettings> {
        let content = match fs::read_to_string(&self.settings_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("设置文件不存在，使用默认设置");
                return Ok(GallerySettings::default());
            }
            Err(e) => return Err(AppError::Config(format!("无法读取设置文件: {}", e))),
        };

        let settings = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("设置文件格式错误: {}", e)))?;

        tracing::info!("成功加载设置: {:?}", self.settings_path);
        Ok(settings)
    }

    pub fn save(&self, settings: &GallerySettings) -> AppResult<()> {
        if settings.paging.page_size == 0 {
            return Err(AppError::InvalidPageSize(0));
        }

        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| AppError::Config(format!("无法序列化设置: {}", e)))?;
        fs::write(&self.settings_path, content)
            .map_err(|e| AppError::Config(format!("无法保存设置文件: {}", e)))?;

        tracing::info!("成功保存设置: {:?}", self.settings_path);
        Ok(())
    }

    /// 重置为默认设置并写回文件
    pub fn reset(&self) -> AppResult<GallerySettings> {
        let defaults = GallerySettings::default();
        self.save(&defaults)?;
        Ok(defaults)
    }

    pub fn path(&self) -> &PathBuf {
        &self.settings_path
    }
}
