use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use dblocale::models::{AppConfig, LanguageTag, LogLevel};
use dblocale::services::scanner::catalog;
use dblocale::services::{
    LocalizedModelScanner, ModelDescriptor, ResourceCache, ResourceSynchronizer, TypeScanner,
};
use dblocale::utils::config::{read_config, read_config_from, resolve_db_path};
use dblocale::{init_logger, ResourceStore, SqliteResourceStore};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// 数据库本地化资源仓库命令行工具
#[derive(Debug, Parser)]
#[command(name = "dblocale", author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// 配置文件路径（默认 ~/.dblocale/config.json）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite 数据库路径（覆盖配置文件）
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// 日志级别（覆盖配置文件）
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 扫描模型目录，输出发现的资源
    Scan { catalog: PathBuf },
    /// 扫描模型目录并把缺失的资源注册到数据库
    Sync { catalog: PathBuf },
    /// 查询单条译文
    Get {
        key: String,
        #[arg(short, long)]
        lang: String,
    },
    /// 列出所有有译文的语言
    Languages,
    /// 列出资源；指定前缀时输出该前缀下某语言的译文
    Resources {
        #[arg(long)]
        prefix: Option<String>,
        #[arg(short, long, requires = "prefix")]
        lang: Option<String>,
    },
    /// 删除资源及其全部译文
    Delete { key: String },
    /// 写入译文（省略 value 时写入空译文）
    Set {
        key: String,
        lang: String,
        value: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = load_config(cli.global.config.as_deref())?;
    if let Some(level) = &cli.global.log_level {
        config.log.level = LogLevel::parse(level).map_err(|e| anyhow!(e))?;
    }
    init_logger(&config.log)?;

    let scanner = LocalizedModelScanner::with_config(&config.scanner);
    let db = cli.global.db;

    match cli.command {
        Command::Scan { catalog } => {
            let models = load_catalog(&catalog)?;
            print_json(&scanner.discover(&models))?;
        }
        Command::Sync { catalog } => {
            let models = load_catalog(&catalog)?;
            let (store, cache) = open_repository(&config, db)?;
            let synchronizer = ResourceSynchronizer::new(store, cache, scanner, &config.sync)?;
            print_json(&synchronizer.sync(&models)?)?;
        }
        Command::Get { key, lang } => {
            let (_, cache) = open_repository(&config, db)?;
            match cache.get_translation(&key, &parse_language(&lang)?)? {
                Some(value) => println!("{}", value),
                None => {
                    tracing::debug!(key = %key, language = %lang, "未找到译文");
                    return Ok(ExitCode::from(1));
                }
            }
        }
        Command::Languages => {
            let (_, cache) = open_repository(&config, db)?;
            print_json(&cache.get_available_languages()?)?;
        }
        Command::Resources { prefix, lang } => {
            let (_, cache) = open_repository(&config, db)?;
            match prefix {
                Some(prefix) => {
                    let language = match lang {
                        Some(lang) => parse_language(&lang)?,
                        None => LanguageTag::invariant(),
                    };
                    print_json(&cache.get_all_translations(&prefix, &language)?)?;
                }
                None => print_json(&cache.get_all_resources()?)?,
            }
        }
        Command::Delete { key } => {
            let (_, cache) = open_repository(&config, db)?;
            cache.delete_resource(&key)?;
        }
        Command::Set { key, lang, value } => {
            let (_, cache) = open_repository(&config, db)?;
            cache.create_or_update_translation(&key, &parse_language(&lang)?, value.as_deref())?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => read_config_from(path),
        None => read_config(),
    };
    config.context("读取配置失败")
}

fn open_repository(
    config: &AppConfig,
    db: Option<PathBuf>,
) -> Result<(Arc<dyn ResourceStore>, Arc<ResourceCache>)> {
    let db_path = match db {
        Some(path) => path,
        None => resolve_db_path(config)?,
    };
    let store: Arc<dyn ResourceStore> = Arc::new(
        SqliteResourceStore::open(&db_path)
            .with_context(|| format!("打开资源数据库失败: {}", db_path.display()))?,
    );
    let cache = ResourceCache::builder()
        .store(store.clone())
        .config(config.cache.clone())
        .build()?;
    Ok((store, Arc::new(cache)))
}

fn load_catalog(path: &Path) -> Result<Vec<ModelDescriptor>> {
    catalog::load(path).with_context(|| format!("加载模型目录失败: {}", path.display()))
}

fn parse_language(raw: &str) -> Result<LanguageTag> {
    LanguageTag::parse(raw).with_context(|| format!("无效的语言标签: {}", raw))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
