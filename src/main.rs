// ==========================================
// 代课覆盖表系统 - 命令行入口
// ==========================================
// 结果以 JSON 输出到 stdout，日志输出到 stderr
// ==========================================

use clap::{Parser, Subcommand};
use daily_coverage::config::get_default_db_path;
use daily_coverage::{logging, CoverageApi};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "daily-coverage")]
#[command(version, about = "代课覆盖表: 缺勤报表 × 总课表 → 每日覆盖表")]
struct Cli {
    /// SQLite 数据库路径（缺省读取 DAILY_COVERAGE_DB_PATH 或用户数据目录）
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// 从 CSV/Excel 文件整表导入
    Import { sheet: String, file: String },
    /// 按缺勤报表重建覆盖表
    Update,
    /// 清洗、排序并高亮覆盖表
    Clean,
    /// 人工录入一条缺勤
    Manual {
        teacher: String,
        duration: String,
        /// 逐节缺勤的课节，例如 HR,1,2
        #[arg(long, value_delimiter = ',')]
        periods: Vec<String>,
        #[arg(long, default_value = "")]
        sub: String,
    },
    /// 列出教师名单
    Teachers,
    /// 整表导出为 CSV
    Export { sheet: String, file: String },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(api: &CoverageApi, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Import { sheet, file } => print_json(&api.import_sheet(&sheet, &file)?),
        Command::Update => print_json(&api.update_from_report()?),
        Command::Clean => print_json(&api.clean_daily_coverage()?),
        Command::Manual {
            teacher,
            duration,
            periods,
            sub,
        } => {
            let periods: Vec<String> = periods
                .iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
            print_json(&api.add_manual_absence(&teacher, &duration, &periods, &sub)?)
        }
        Command::Teachers => print_json(&api.teacher_names()?),
        Command::Export { sheet, file } => print_json(&api.export_sheet(&sheet, &file)?),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init();

    let db_path = cli.db.unwrap_or_else(get_default_db_path);
    tracing::info!(version = daily_coverage::VERSION, db_path = %db_path, "{}", daily_coverage::APP_NAME);

    let api = CoverageApi::open(&db_path)?;
    run(&api, cli.command)
}
