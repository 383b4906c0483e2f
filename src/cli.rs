//! 命令列參數

use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "wo-tracker", version, about = "工單途程狀態追蹤")]
pub struct RootArgs {
    /// 配置檔路徑
    #[arg(long, env = "WO_TRACKER_CONFIG", default_value = "wo-tracker.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 更新品質表、完工表與在製品表
    Update(DateArgs),

    /// 產生收貨報表（委外加工與物料）
    Journal(DateArgs),
}

#[derive(Debug, Args)]
pub struct DateArgs {
    /// 報表日期（YYYY-MM-DD，預設為昨天）
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl DateArgs {
    pub fn resolve(&self, today: NaiveDate) -> NaiveDate {
        self.date.unwrap_or(today - Duration::days(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_update_with_date() {
        let args = RootArgs::parse_from([
            "wo-tracker",
            "--config",
            "site.toml",
            "update",
            "--date",
            "2025-11-02",
        ]);

        assert_eq!(args.config, PathBuf::from("site.toml"));
        match args.command {
            Command::Update(date) => assert_eq!(
                date.date,
                Some(NaiveDate::from_ymd_opt(2025, 11, 2).unwrap())
            ),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_date_defaults_to_yesterday() {
        let args = DateArgs { date: None };
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        assert_eq!(
            args.resolve(today),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
    }
}
