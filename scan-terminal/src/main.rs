use scan_terminal::{AppState, Config, InputSource, NoticeLevel, ScanInput, init_logger_with_file, print_banner};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境变量 (.env 可选)
    let _ = dotenvy::dotenv();

    // 2. 加载配置 + 日志
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    print_banner();
    tracing::info!(environment = %config.environment, "Scan terminal starting...");

    // 3. 初始化状态
    let state = AppState::initialize(&config).await?;
    if state.admins.needs_bootstrap().await? {
        tracing::warn!("No admin account exists yet; the first registration is open");
    }

    // 4. 终端循环
    let mut controller = state.workflow();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout
            .write_all(format!("{} > ", controller.prompt()).as_bytes())
            .await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let notice = match line.trim() {
            ":quit" => break,
            ":logout" => controller.logout(),
            raw => controller.ingest(ScanInput::new(raw, InputSource::Keyboard)).await,
        };

        let tag = match notice.level {
            NoticeLevel::Success => "OK",
            NoticeLevel::Info => "--",
            NoticeLevel::Warning => "!!",
            NoticeLevel::Error => "XX",
        };
        stdout
            .write_all(format!("[{tag}] {}\n", notice.message).as_bytes())
            .await?;
    }

    tracing::info!("Scan terminal shutting down");
    state.db.close().await;
    Ok(())
}
