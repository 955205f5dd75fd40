use staff_server::{Config, Server, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. .env 必须在读取配置之前加载
    dotenv::dotenv().ok();
    let config = Config::from_env();

    // 2. 工作目录 + 日志
    setup_environment(&config)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Staff server starting...");

    // 3. 启动 HTTP 服务器
    let server = Server::new(config);
    if let Err(e) = server.run().await {
        tracing::error!(error = %e, "Server error");
        return Err(e);
    }

    Ok(())
}
