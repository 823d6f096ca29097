use clap::Parser;
use dblp_etl::core::{ConfigProvider, RecordSource};
use dblp_etl::utils::error::{EtlError, ErrorSeverity};
use dblp_etl::utils::{logger, monitor::SystemMonitor, validation::Validate};
use dblp_etl::{CliConfig, DblpXmlSource, EtlEngine, KeywordPipeline, LocalStorage, ReportConfig};

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(context: &str, e: &EtlError) -> ! {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(e.severity()));
}

fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting dblp-etl");
    tracing::debug!("CLI config: {:?}", cli);

    // 載入並驗證報表配置
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            ReportConfig::from_file(path).unwrap_or_else(|e| fail("Failed to load config", &e))
        }
        None => ReportConfig::default(),
    };
    if let Err(e) = config.validate() {
        fail("Configuration validation failed", &e);
    }

    let monitor_enabled = cli.monitor || config.monitoring_enabled();
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }
    let load_monitor = SystemMonitor::new(monitor_enabled);

    // 建立記憶體資料庫，失敗即結束
    tracing::info!("building the dblp main memory DB ...");
    let source = DblpXmlSource::load(&cli.xml_file, &cli.dtd_file)
        .unwrap_or_else(|e| fail("Cannot build the dblp database", &e));
    tracing::info!(
        "MMDB ready: {} publs, {} pers",
        source.number_of_publications(),
        source.number_of_persons()
    );
    load_monitor.log_stats("Load");

    tracing::info!(
        "🔎 Searching titles for '{}' into {}",
        config.keyword(),
        config.output_path()
    );
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = KeywordPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    let summary = engine.run(&source);

    if summary.is_success() {
        tracing::info!(
            "✅ Exported {} matching publications across {} years",
            summary.stats.matched,
            summary.years
        );
        return;
    }

    let mut worst = ErrorSeverity::Low;
    for e in summary.failures() {
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        worst = worst.max(e.severity());
    }
    std::process::exit(exit_code(worst));
}
