use anyhow::Result;
use question_paper_gen::utils::logging;
use question_paper_gen::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let stats = App::initialize(config).await?.run().await?;

    if stats.failed > 0 {
        tracing::warn!("⚠️ 有 {} 个组卷请求失败，详见 warn.txt", stats.failed);
    }

    Ok(())
}
