// ==========================================
// 单位换算解析引擎 - 命令行入口
// ==========================================
// 用法:
//   unit-convert --snapshot rules.json convert kg g 2
//   unit-convert --snapshot rules.json convert 瓶 ml 2 --material M1
//   unit-convert --snapshot rules.json check 箱 g
//   unit-convert --snapshot rules.json validate
//   unit-convert --snapshot rules.json fingerprint
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde_json::json;

use unit_conversion_engine::{
    logging, ConversionApi, ConversionConfig, ConversionSnapshot, RuleAuthoringValidator,
};

#[derive(Parser)]
#[command(name = "unit-convert", version, about = "计量单位换算解析")]
struct Cli {
    /// 单位与规则快照（JSON）
    #[arg(long, short, value_name = "FILE")]
    snapshot: PathBuf,

    /// 引擎配置（JSON，可选）
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 以 JSON 行格式输出日志
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 换算数量
    Convert {
        from: String,
        to: String,
        quantity: Decimal,
        /// 物料ID（优先匹配物料覆写规则）
        #[arg(long, short)]
        material: Option<String>,
    },
    /// 判断是否可换算
    Check {
        from: String,
        to: String,
        #[arg(long, short)]
        material: Option<String>,
    },
    /// 校验快照中的规则（含环路矛盾检测）
    Validate,
    /// 输出规则集指纹
    Fingerprint,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.log_json {
        logging::init_json("warn");
    } else {
        logging::init_with_default("warn");
    }

    tracing::debug!("{} v{}", unit_conversion_engine::APP_NAME, unit_conversion_engine::VERSION);

    let snapshot = ConversionSnapshot::from_json_file(&cli.snapshot)
        .with_context(|| format!("读取快照失败: {}", cli.snapshot.display()))?;

    let config = match &cli.config {
        Some(path) => ConversionConfig::from_json_file(path)
            .map_err(|e| anyhow!("加载配置失败 {}: {}", path.display(), e))?,
        None => ConversionConfig::default(),
    };

    match cli.command {
        Commands::Convert {
            from,
            to,
            quantity,
            material,
        } => {
            let api = ConversionApi::from_snapshot(&snapshot, &config)?;
            let result = api
                .convert(&from, &to, quantity, material.as_deref())
                .map_err(|e| anyhow!("[{}] {}", e.kind(), e))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Check { from, to, material } => {
            let api = ConversionApi::from_snapshot(&snapshot, &config)?;
            let feasible = api.can_convert(&from, &to, material.as_deref());
            println!(
                "{}",
                json!({
                    "from_unit_code": from,
                    "to_unit_code": to,
                    "material_id": material,
                    "can_convert": feasible,
                })
            );
        }
        Commands::Validate => {
            let (registry, _) = snapshot.build()?;
            let unit_count = registry.len();
            let validator = RuleAuthoringValidator::new(Arc::new(registry), &config);
            validator
                .check_global_rule_set(&snapshot.global_rules)
                .map_err(|e| anyhow!("[{}] {}", e.kind(), e))?;
            for rule in &snapshot.material_rules {
                validator
                    .check_material_rule(rule)
                    .map_err(|e| anyhow!("[{}] {}", e.kind(), e))?;
            }
            println!(
                "规则校验通过: {} 个单位, {} 条全局规则, {} 条物料规则",
                unit_count,
                snapshot.global_rules.len(),
                snapshot.material_rules.len()
            );
        }
        Commands::Fingerprint => {
            println!("{}", snapshot.fingerprint());
        }
    }

    Ok(())
}
