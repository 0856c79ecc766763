//! Subcommand implementations.

use crate::output::{self, StdoutClipboard};
use anyhow::{Context, Result, bail};
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use traderobots_data::api::{LoginRequest, RobotApi};
use traderobots_data::client::BackendClient;
use traderobots_data::config::ClientConfig;
use traderobots_data::error::{ApiError, ApiResult};
use traderobots_data::marketplace::{RobotFilter, RobotSort, marketplace_view};
use traderobots_data::session::SessionStore;
use traderobots_domain::entities::{Robot, Session};
use traderobots_domain::enums::{IndicatorKind, Symbol, Timeframe};
use traderobots_domain::value_objects::{IndicatorSet, RiskSettings, RobotId, StrategyConfig};
use traderobots_execution::deployment::{DeploymentError, DeploymentHandoff};
use traderobots_execution::export::{CodeKind, export_code};
use traderobots_execution::progress::ProgressConfig;
use traderobots_execution::synthesis::SynthesisOutcome;
use traderobots_execution::wizard::RobotWizard;

#[derive(Args)]
pub struct CreateArgs {
    /// Instrument (e.g., EURUSD)
    #[arg(short, long, default_value = "EURUSD")]
    pub symbol: Symbol,

    /// Chart timeframe (M5, M15, H1, D1)
    #[arg(short, long, default_value = "H1")]
    pub timeframe: Timeframe,

    /// Indicators to combine (rsi, ma, macd, bands, stoch)
    #[arg(short, long, value_delimiter = ',', default_value = "rsi")]
    pub indicators: Vec<IndicatorKind>,

    #[arg(long, default_value_t = 14)]
    pub rsi_period: u32,

    /// RSI oversold level
    #[arg(long, default_value_t = 30.0)]
    pub rsi_buy: f64,

    /// RSI overbought level
    #[arg(long, default_value_t = 70.0)]
    pub rsi_sell: f64,

    #[arg(long, default_value_t = 50)]
    pub ma_period: u32,

    #[arg(long, default_value_t = 20)]
    pub bands_period: u32,

    /// Bollinger band width in standard deviations
    #[arg(long, default_value_t = 2.0)]
    pub bands_dev: f64,

    /// Lot size
    #[arg(long, default_value = "0.01")]
    pub lot: Decimal,

    /// Stop loss in points
    #[arg(long, default_value_t = 30)]
    pub sl: u32,

    /// Take profit in points
    #[arg(long, default_value_t = 60)]
    pub tp: u32,

    /// Print the generated MQL5 code
    #[arg(long)]
    pub copy: bool,

    /// Directory to write the generated MQL5 code to
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Deploy to this trading account once synthesized
    #[arg(long)]
    pub deploy_account: Option<String>,

    #[arg(long, default_value = "0.1")]
    pub deploy_lot: Decimal,

    #[arg(long, default_value_t = 300)]
    pub deploy_sl: u32,

    #[arg(long, default_value_t = 600)]
    pub deploy_tp: u32,
}

impl CreateArgs {
    fn strategy(&self) -> StrategyConfig {
        let mut indicators = IndicatorSet::none_active();
        for kind in &self.indicators {
            indicators.set_active(*kind, true);
        }
        indicators.rsi.period = self.rsi_period;
        indicators.rsi.buy_level = self.rsi_buy;
        indicators.rsi.sell_level = self.rsi_sell;
        indicators.ma.period = self.ma_period;
        indicators.bands.period = self.bands_period;
        indicators.bands.deviation = self.bands_dev;

        StrategyConfig::new(self.symbol, self.timeframe)
            .with_indicators(indicators)
            .with_risk(RiskSettings::new(self.lot, self.sl, self.tp))
    }
}

#[derive(Args)]
pub struct DeployArgs {
    /// Robot to deploy
    pub robot_id: String,

    /// Trading account to deploy to
    #[arg(short, long)]
    pub account: String,

    #[arg(long, default_value = "0.1")]
    pub lot: Decimal,

    #[arg(long, default_value_t = 300)]
    pub sl: u32,

    #[arg(long, default_value_t = 600)]
    pub tp: u32,
}

#[derive(Args)]
pub struct RobotsArgs {
    /// Method filter (all, winrate, ml)
    #[arg(short, long, default_value = "all")]
    pub method: RobotFilter,

    /// Sort order (win_rate, newest)
    #[arg(long, default_value = "win_rate")]
    pub sort: RobotSort,
}

#[derive(Args)]
pub struct AccountsArgs {
    /// Refresh balance and equity from MT5 first
    #[arg(long)]
    pub sync: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Robot whose code to export
    pub robot_id: String,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Export the Python code instead of MQL5
    #[arg(long)]
    pub python: bool,
}

#[derive(Args)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub username: String,

    #[arg(short, long)]
    pub password: String,
}

#[derive(Args)]
pub struct SmokeArgs {
    /// Also check login with these credentials
    #[arg(short, long, requires = "password")]
    pub username: Option<String>,

    #[arg(short, long)]
    pub password: Option<String>,
}

fn client(config: &ClientConfig, store: &SessionStore) -> Result<BackendClient> {
    let session = store.load().context("Failed to load session")?;
    Ok(BackendClient::new(config, session)?)
}

async fn find_robot(api: &dyn RobotApi, id: &RobotId) -> Result<Robot> {
    let robots = api.list_robots().await.context("Failed to list robots")?;
    robots
        .into_iter()
        .find(|robot| &robot.id == id)
        .with_context(|| format!("Robot {id} not found"))
}

pub async fn create(config: &ClientConfig, store: &SessionStore, args: CreateArgs) -> Result<()> {
    let api = Arc::new(client(config, store)?);
    let mut wizard = RobotWizard::new(api, ProgressConfig::from_client_config(config))
        .with_config(args.strategy());

    println!(
        "🤖 Synthesizing {} {} with [{}]...",
        args.symbol,
        args.timeframe,
        output::join(&wizard.config().indicators.active_kinds())
    );
    let renderer = output::render_progress(wizard.progress_receiver());
    let result = wizard.handle_create_robot().await.cloned();
    renderer.abort();
    eprintln!();

    match result? {
        SynthesisOutcome::ValidationFailure(failure) => {
            bail!("{}: {}", failure.title(), failure.reason);
        }
        SynthesisOutcome::ServerFailure(artifact) => {
            output::print_dialog(&artifact.disclosure);
            output::print_robot(&artifact.robot);
        }
        SynthesisOutcome::Success(robot) => {
            println!("✅ Robot registered");
            output::print_robot(&robot);
        }
    }

    if let Some(account) = args.deploy_account {
        wizard.select_account(Some(account));
        let risk = RiskSettings::new(args.deploy_lot, args.deploy_sl, args.deploy_tp);
        if let Err(e) = wizard.deploy(risk).await {
            if let Some(dialog) = wizard.dialog() {
                output::print_dialog(dialog);
            }
            return Err(e.into());
        }
        println!("🚀 Deployed to account {}", wizard.selected_account().unwrap_or_default());
    }

    if args.copy {
        wizard.copy_code(&mut StdoutClipboard)?;
    }

    if let Some(dir) = &args.export_dir
        && let Some(robot) = wizard.robot()
    {
        let path = export_code(robot, CodeKind::Mql5, dir)?;
        println!("💾 Saved {}", path.display());
    }

    Ok(())
}

pub async fn deploy(config: &ClientConfig, store: &SessionStore, args: DeployArgs) -> Result<()> {
    let id = RobotId::parse(&args.robot_id);
    if !id.is_server() {
        let error = DeploymentError::FallbackNotDeployable(id);
        output::print_dialog(&error.dialog());
        return Err(error.into());
    }

    let api = client(config, store)?;
    let mut robot = find_robot(&api, &id).await?;
    let risk = RiskSettings::new(args.lot, args.sl, args.tp);

    match DeploymentHandoff::new(&api)
        .deploy(&mut robot, Some(&args.account), risk)
        .await
    {
        Ok(response) => {
            println!("🚀 Robot {} deployed to account {}", robot.id, args.account);
            if let Some(message) = response.message {
                println!("   {message}");
            }
            Ok(())
        }
        Err(error) => {
            output::print_dialog(&error.dialog());
            Err(error.into())
        }
    }
}

pub async fn robots(config: &ClientConfig, store: &SessionStore, args: RobotsArgs) -> Result<()> {
    let api = client(config, store)?;
    let robots = api.list_robots().await.context("Failed to list robots")?;
    let view = marketplace_view(robots, args.method, args.sort);

    if view.is_empty() {
        println!("No robots found.");
        return Ok(());
    }
    output::robots_table(&view).printstd();
    Ok(())
}

pub async fn accounts(
    config: &ClientConfig,
    store: &SessionStore,
    args: AccountsArgs,
) -> Result<()> {
    let api = client(config, store)?;

    if args.sync {
        let account = api.sync_account().await.context("Account sync failed")?;
        println!("🔄 Synced {}", account.label());
    }

    let accounts = api.list_accounts().await.context("Failed to list accounts")?;
    if accounts.is_empty() {
        println!("No trading accounts linked.");
        return Ok(());
    }
    output::accounts_table(&accounts).printstd();
    Ok(())
}

pub async fn export(config: &ClientConfig, store: &SessionStore, args: ExportArgs) -> Result<()> {
    let api = client(config, store)?;
    let robot = find_robot(&api, &RobotId::parse(&args.robot_id)).await?;
    let kind = if args.python {
        CodeKind::Python
    } else {
        CodeKind::Mql5
    };

    let path = export_code(&robot, kind, &args.dir)?;
    println!("💾 Saved {}", path.display());
    Ok(())
}

pub async fn login(config: &ClientConfig, store: &SessionStore, args: LoginArgs) -> Result<()> {
    let api = BackendClient::new(config, Session::Anonymous)?;
    let credentials = LoginRequest::new(args.username, args.password);

    let user = api.login(&credentials).await.context("Login failed")?;

    println!("👤 Signed in as {}", user.username);
    store.save(&Session::Authenticated(user))?;
    Ok(())
}

pub async fn logout(config: &ClientConfig, store: &SessionStore) -> Result<()> {
    let mut session = store.load().unwrap_or_else(|e| {
        warn!(error = %e, "Discarding unreadable session");
        Session::Anonymous
    });
    if !session.is_authenticated() {
        info!("No signed-in session");
    }

    let api = BackendClient::new(config, session.clone())?;
    store.logout(&api, &mut session).await?;
    println!("👋 Signed out");
    Ok(())
}

/// Result of one smoke check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Passed(String),
    AuthRequired,
    Failed(String),
}

impl Check {
    pub fn from_listing<T>(result: &ApiResult<Vec<T>>) -> Self {
        match result {
            Ok(items) => Self::Passed(format!("{} items", items.len())),
            Err(error) => Self::from_error(error),
        }
    }

    fn from_error(error: &ApiError) -> Self {
        match error {
            ApiError::Unauthorized { .. } => Self::AuthRequired,
            other => Self::Failed(other.to_string()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

pub async fn smoke(config: &ClientConfig, args: SmokeArgs) -> Result<()> {
    let mut api = BackendClient::new(config, Session::Anonymous)?;
    let mut checks: Vec<(&str, Check)> = Vec::new();

    checks.push(("list posts", Check::from_listing(&api.list_posts().await)));

    if let (Some(username), Some(password)) = (args.username, args.password) {
        let login = api.login(&LoginRequest::new(username, password)).await;
        let check = match login {
            Ok(user) => {
                let check = Check::Passed(format!("signed in as {}", user.username));
                api = BackendClient::new(config, Session::Authenticated(user))?;
                check
            }
            Err(error) => Check::from_error(&error),
        };
        checks.push(("login", check));
    }

    checks.push(("list robots", Check::from_listing(&api.list_robots().await)));
    checks.push(("list groups", Check::from_listing(&api.list_groups().await)));
    checks.push(("list messages", Check::from_listing(&api.list_messages().await)));

    output::smoke_table(api.base_url(), &checks).printstd();

    let failed = checks.iter().filter(|(_, check)| check.is_failure()).count();
    if failed > 0 {
        bail!("{failed} smoke check(s) failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rust_decimal_macros::dec;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        create: CreateArgs,
    }

    fn create_args(args: &[&str]) -> CreateArgs {
        let argv = std::iter::once("create").chain(args.iter().copied());
        Harness::try_parse_from(argv).unwrap().create
    }

    #[test]
    fn test_strategy_defaults_match_builder() {
        let strategy = create_args(&[]).strategy();

        assert_eq!(strategy.symbol, Symbol::Eurusd);
        assert_eq!(strategy.timeframe, Timeframe::H1);
        assert_eq!(strategy.indicators.active_kinds(), vec![IndicatorKind::Rsi]);
        assert_eq!(strategy.risk, RiskSettings::default());
    }

    #[test]
    fn test_strategy_only_activates_requested() {
        let strategy =
            create_args(&["--indicators", "ma,stoch", "--ma-period", "100", "--lot", "0.5"])
                .strategy();

        assert_eq!(
            strategy.indicators.active_kinds(),
            vec![IndicatorKind::Ma, IndicatorKind::Stoch]
        );
        assert_eq!(strategy.indicators.ma.period, 100);
        assert_eq!(strategy.risk.lot, dec!(0.5));
    }

    #[test]
    fn test_smoke_treats_auth_as_pass() {
        let unauthorized: ApiResult<Vec<Robot>> = Err(ApiError::Unauthorized { status: 403 });
        let down: ApiResult<Vec<Robot>> = Err(ApiError::Transport("refused".to_string()));

        assert_eq!(Check::from_listing(&unauthorized), Check::AuthRequired);
        assert!(!Check::from_listing(&unauthorized).is_failure());
        assert!(Check::from_listing(&down).is_failure());
        assert_eq!(
            Check::from_listing(&Ok(vec![1, 2, 3])),
            Check::Passed("3 items".to_string())
        );
    }
}
