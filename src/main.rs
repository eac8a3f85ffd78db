// ==========================================
// 采购全流程跟踪系统 - 命令行入口
// ==========================================
// 用法:
//   procurement-tracker <提货快照> [订单快照] [物料规格快照] [--db <path>] [--json] [--lang <locale>]
//
// 执行一次刷新,输出阶段分布与对账差异计数（或完整 JSON 结果）
// ==========================================

use anyhow::{bail, Context};
use procurement_tracker::config::{default_db_path, ConfigManager, EngineSettings};
use procurement_tracker::domain::types::{Collection, MismatchCategory};
use procurement_tracker::domain::ReferenceStatus;
use procurement_tracker::i18n::{current_locale, mismatch_label, set_locale, t, t_with_args};
use procurement_tracker::pipeline::{FileSnapshotSource, RefreshOutcome, RefreshPipeline};
use procurement_tracker::{logging, APP_NAME, VERSION};
use std::path::Path;
use std::sync::Arc;

struct CliArgs {
    snapshots: Vec<String>,
    db_path: Option<String>,
    json: bool,
    locale: Option<String>,
}

fn parse_args() -> anyhow::Result<CliArgs> {
    let mut args = std::env::args().skip(1);
    let mut parsed = CliArgs {
        snapshots: Vec::new(),
        db_path: None,
        json: false,
        locale: None,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => parsed.json = true,
            "--db" => parsed.db_path = Some(args.next().context("--db 需要路径参数")?),
            "--lang" => parsed.locale = Some(args.next().context("--lang 需要语言参数")?),
            _ => parsed.snapshots.push(arg),
        }
    }

    if parsed.snapshots.is_empty() || parsed.snapshots.len() > 3 {
        bail!(t("cli.usage"));
    }
    Ok(parsed)
}

/// 配置库存在时读取配置,否则使用默认值
async fn load_settings(explicit_db: Option<&str>) -> anyhow::Result<EngineSettings> {
    let db_path = match explicit_db {
        Some(path) => path.to_string(),
        None => {
            let path = default_db_path();
            if !Path::new(&path).exists() {
                tracing::info!(db_path = %path, "{}", t("cli.config_fallback"));
                return Ok(EngineSettings::default());
            }
            path
        }
    };

    tracing::info!(db_path = %db_path, "加载配置");
    let config = ConfigManager::new(&db_path)
        .with_context(|| format!("无法打开配置库: {}", db_path))?;
    let settings = EngineSettings::load(&config).await?;
    Ok(settings)
}

fn print_report(outcome: &RefreshOutcome) {
    println!("{}", t_with_args("report.title", &[("refresh_id", outcome.refresh_id.as_str())]));
    println!(
        "{}",
        t_with_args("report.records", &[("count", outcome.records.len().to_string().as_str())])
    );

    println!("{}", t("report.stage_header"));
    for tally in &outcome.stage_tally {
        println!(
            "{}",
            t_with_args(
                "report.stage_line",
                &[("code", tally.code.as_str()), ("count", tally.count.to_string().as_str())],
            )
        );
    }

    let counts = &outcome.summary.counts;
    println!("{}", t("report.mismatch_header"));
    for category in MismatchCategory::ALL {
        println!(
            "{}",
            t_with_args(
                "report.mismatch_line",
                &[
                    ("label", mismatch_label(category).as_str()),
                    ("count", counts.get(category).to_string().as_str()),
                ],
            )
        );
    }
    println!(
        "{}",
        t_with_args("report.mismatch_total", &[("count", counts.total().to_string().as_str())])
    );

    let references = [
        (Collection::Orders, &outcome.summary.order_status),
        (Collection::Materials, &outcome.summary.material_status),
    ];
    for (collection, status) in references {
        if let ReferenceStatus::Unavailable { reason } = status {
            println!(
                "{}",
                t_with_args(
                    "report.reference_unavailable",
                    &[("collection", collection.to_db_str()), ("reason", reason.as_str())],
                )
            );
        }
    }

    if outcome.snapshot_skew.exceeded {
        println!(
            "{}",
            t_with_args(
                "report.skew_exceeded",
                &[
                    ("skew", outcome.snapshot_skew.skew_secs.to_string().as_str()),
                    ("limit", outcome.snapshot_skew.limit_secs.to_string().as_str()),
                ],
            )
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args = parse_args()?;
    if let Some(locale) = &args.locale {
        if !set_locale(locale) {
            tracing::warn!(
                "{}",
                t_with_args(
                    "cli.unsupported_locale",
                    &[("locale", locale.as_str()), ("current", current_locale().as_str())],
                )
            );
        }
    }

    tracing::info!("{} v{}", APP_NAME, VERSION);

    let settings = load_settings(args.db_path.as_deref()).await?;

    let mut source = FileSnapshotSource::new(&args.snapshots[0]);
    if let Some(orders) = args.snapshots.get(1) {
        source = source.with_path(Collection::Orders, orders);
    }
    if let Some(materials) = args.snapshots.get(2) {
        source = source.with_path(Collection::Materials, materials);
    }

    let pipeline = RefreshPipeline::new(Arc::new(source), settings)?;
    let outcome = pipeline.refresh().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_report(&outcome);
    }

    Ok(())
}
