use std::path::PathBuf;

use clap::{Parser, Subcommand};
use notif_rank::config::ListenerConfig;
use notif_rank::demo::{demo_snapshot, DEMO_KEYS};
use notif_rank::index::{Ranking, RankingIndex};
use notif_rank::listener::ListenerState;
use notif_rank::storage::RankingUpdate;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "notif-rank", version, about = "Notification ranking snapshot tool")]
struct Cli {
    /// 配置文件（默认 ~/.config/notif-rank/config.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 构造演示快照，走一遍 编码 → 帧 → 解码 → 安装，并打印排名
    Demo,
    /// 把演示快照编码成帧写入文件
    EncodeDemo { out: PathBuf },
    /// 解码帧文件并打印每个 key 的排名
    Inspect {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = ListenerConfig::load_or_default(cli.config.as_deref())?;
    // 帧上限与 key 上限都由同一个 state 按配置执行
    let state = ListenerState::new(&config);

    match cli.command {
        Command::Demo => {
            let snap = demo_snapshot(&DEMO_KEYS)?;
            let frame = state.codec().encode(&RankingUpdate::from_snapshot(&snap))?;
            info!("Demo frame: {} keys, {} bytes", snap.len(), frame.len());

            state.apply_update_bytes(&frame)?;
            print_rankings(&state.current_ranking(), false)?;
            print!("{}", state.stats());
        }
        Command::EncodeDemo { out } => {
            let snap = demo_snapshot(&DEMO_KEYS)?;
            let frame = state.codec().encode(&RankingUpdate::from_snapshot(&snap))?;
            if let Some(parent) = out.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
            tokio::fs::write(&out, &frame).await?;
            info!("Wrote {} bytes to {}", frame.len(), out.display());
        }
        Command::Inspect { file, json } => {
            let data = tokio::fs::read(&file).await?;
            state.apply_update_bytes(&data)?;
            print_rankings(&state.current_ranking(), json)?;
        }
    }

    Ok(())
}

fn print_rankings(idx: &RankingIndex, json: bool) -> anyhow::Result<()> {
    let mut view = Ranking::new();
    for key in idx.ordered_keys() {
        if !idx.lookup(key, &mut view) {
            continue;
        }
        if json {
            println!("{}", serde_json::to_string(&view)?);
        } else {
            println!(
                "#{:<3} {:<12} importance={} visibility={} sentiment={:?} matches_filter={} group={}",
                view.rank(),
                view.key(),
                view.importance(),
                view.visibility_override(),
                view.user_sentiment(),
                view.matches_interruption_filter(),
                view.override_group_key().unwrap_or("-"),
            );
        }
    }
    Ok(())
}
