use anyhow::Result;
use dice_auto_apply::orchestrator::App;
use dice_auto_apply::utils::logging;
use dice_auto_apply::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::load();

    // 初始化并运行应用
    let _result = App::initialize(config).await?.run().await?;

    Ok(())
}
