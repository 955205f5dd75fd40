use std::path::PathBuf;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (启动时先加载 `.env`)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./work_dir | 工作目录 |
/// | DATABASE_PATH | {WORK_DIR}/staff.db | SQLite 数据库文件 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false (production: true) | JSON 日志 |
/// | LOG_DIR | {WORK_DIR}/logs | 日志目录 |
/// | AUDIT_ACTOR | admin | 请求未指定操作人时的审计标签 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/staff HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存放数据库和日志
    pub work_dir: String,
    pub database_path: String,
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: String,
    pub audit_actor: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into());
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_production = environment == "production";

        Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| {
                PathBuf::from(&work_dir)
                    .join("staff.db")
                    .to_string_lossy()
                    .into_owned()
            }),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(is_production),
            log_dir: std::env::var("LOG_DIR").unwrap_or_else(|_| {
                PathBuf::from(&work_dir)
                    .join("logs")
                    .to_string_lossy()
                    .into_owned()
            }),
            audit_actor: std::env::var("AUDIT_ACTOR").unwrap_or_else(|_| "admin".into()),
            environment,
            work_dir,
        }
    }

    /// 使用自定义工作目录 (测试场景)
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let work_dir = work_dir.into();
        let base = PathBuf::from(&work_dir);
        Self {
            database_path: base.join("staff.db").to_string_lossy().into_owned(),
            log_dir: base.join("logs").to_string_lossy().into_owned(),
            work_dir,
            ..Self::from_env()
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
