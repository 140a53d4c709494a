use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use sentinel_risk_report::client::RiskApiClient;
use sentinel_risk_report::config::Config;
use sentinel_risk_report::dashboard::{Dashboard, LoadState};
use sentinel_risk_report::format::{self, RiskBand};
use sentinel_risk_report::layout::ReportMeta;
use sentinel_risk_report::models::{BreakdownEntry, DistressReason, MetricType, UserRecord};
use sentinel_risk_report::{ingest, report, risk, telemetry};

#[derive(Parser)]
#[command(name = "sentinel-risk-report")]
#[command(about = "Portfolio risk dashboard and intervention reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show headline portfolio stats
    Summary {
        /// Read users from a .json or .csv export instead of the API
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Break one metric down by user or bucket
    Breakdown {
        #[arg(long, value_enum)]
        metric: MetricType,
        #[arg(long)]
        input: Option<PathBuf>,
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// List users by risk score, highest first
    Tracker {
        #[arg(long)]
        input: Option<PathBuf>,
        /// Show at most this many users
        #[arg(long)]
        limit: Option<usize>,
        /// Only show the high-risk watchlist
        #[arg(long)]
        high_risk: bool,
    },
    /// Build the distress-factor report and export it as PDF
    Report {
        #[arg(long)]
        input: Option<PathBuf>,
        /// Directory for the PDF (defaults to SENTINEL_REPORT_DIR)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Also write a markdown copy of the report
        #[arg(long)]
        markdown: Option<PathBuf>,
    },
    /// Show a single user's profile
    Profile {
        #[arg(long)]
        id: String,
    },
    /// Record a distress reason and print the suggested intervention
    Discover {
        #[arg(long)]
        user_id: String,
        #[arg(long, value_enum)]
        reason: DistressReason,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().context("invalid configuration")?;
    telemetry::init(&config.telemetry).context("failed to initialise logging")?;

    let client = RiskApiClient::new(&config.api).context("failed to build API client")?;

    match cli.command {
        Commands::Summary { input } => {
            let mut dashboard = Dashboard::new();
            let token = dashboard.begin_fetch();
            let result = match input {
                Some(path) => Ok(load_file(&path)?),
                None => client.fetch_users().await,
            };
            dashboard.complete(token, result);

            match dashboard.state() {
                LoadState::Ready(summary) => {
                    println!("Total exposure:  {}", format::crore(summary.total_exposure));
                    println!("Users at risk:   {}", summary.at_risk_count);
                    println!("Success rate:    {}", format::percent(summary.success_rate));
                    println!("Recoveries:      {}", summary.recovery_count);
                }
                LoadState::Failed(kind) => {
                    anyhow::bail!("could not load users from {} ({:?})", client.base_url(), kind);
                }
                LoadState::Loading => println!("Loading..."),
            }
        }
        Commands::Breakdown {
            metric,
            input,
            json,
        } => {
            let users = load_users(&client, input.as_deref()).await?;
            let entries = risk::compute_metric_breakdown(metric, &users);

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }

            println!("{}:", metric.title());
            if entries.is_empty() {
                println!("No users match this metric.");
            }
            if metric == MetricType::Exposure {
                let shown: f64 = entries.iter().map(BreakdownEntry::value).sum();
                println!("Top {} users hold {}", entries.len(), format::compact_currency(shown));
            }
            for entry in &entries {
                match entry {
                    BreakdownEntry::Exposure { name, value, score } => println!(
                        "- {} {} (score {})",
                        name,
                        format::detailed_currency(*value),
                        score
                    ),
                    BreakdownEntry::Bucket { name, value } => println!("- {}: {}", name, value),
                    BreakdownEntry::Recovery { name, value } => {
                        println!("- {} recovering, score {}", name, value)
                    }
                }
            }
        }
        Commands::Tracker {
            input,
            limit,
            high_risk,
        } => {
            let users = load_users(&client, input.as_deref()).await?;
            let ranked = if high_risk {
                risk::high_risk_watchlist(&users)
            } else {
                risk::rank_by_score(&users)
            };
            let ranked: Vec<_> = ranked.into_iter().take(limit.unwrap_or(usize::MAX)).collect();

            if ranked.is_empty() {
                println!("No users found.");
                return Ok(());
            }

            for user in ranked {
                println!(
                    "- {} {} score {}% [{}] {} ({})",
                    user.id,
                    user.name,
                    user.score,
                    RiskBand::for_score(user.score).label(),
                    user.volatility,
                    user.status
                );
            }
        }
        Commands::Report {
            input,
            out_dir,
            markdown,
        } => {
            let users = load_users(&client, input.as_deref()).await?;
            let factor_report = risk::compute_risk_factor_report(&users);
            let meta = ReportMeta::today();

            let dir = out_dir.unwrap_or_else(|| config.report_dir.clone());
            let path = report::save_report(&factor_report, &meta, &dir)
                .context("report export failed")?;
            println!(
                "Analyzed {} high-risk profiles across {} factors.",
                factor_report.total_high_risk,
                factor_report.factors.len()
            );
            println!("Report written to {}.", path.display());

            if let Some(markdown) = markdown {
                std::fs::write(&markdown, report::render_markdown(&factor_report, &meta))
                    .with_context(|| format!("failed to write {}", markdown.display()))?;
                println!("Markdown copy written to {}.", markdown.display());
            }
        }
        Commands::Profile { id } => {
            let profile = client.fetch_user_profile(&id).await?;
            println!("{} ({})", profile.name, profile.id);
            if let Some(occupation) = &profile.occupation {
                println!("Occupation: {occupation}");
            }
            if let Some(income) = profile.income {
                println!("Monthly income: {}", format::detailed_currency(income));
            }
            if let Some(score) = profile.risk_score {
                println!("Risk score: {score}");
            }
            println!(
                "Disposable income: ₹{:.1}k ({})",
                profile.disposable_income / 1000.0,
                if profile.can_repay { "sustainable" } else { "at risk" }
            );

            if !profile.loans.is_empty() {
                println!("Loans (total EMI {}):", format::detailed_currency(profile.total_emi));
                for loan in &profile.loans {
                    println!(
                        "- {} outstanding {} at {}% ({} months left)",
                        loan.loan_type,
                        format::detailed_currency(loan.outstanding),
                        loan.interest_rate,
                        loan.remaining_months
                    );
                }
            }

            let shares = risk::expenditure_shares(&profile);
            if !shares.is_empty() {
                println!("Spending:");
                for share in shares {
                    println!(
                        "- {} {} ({})",
                        share.name,
                        format::detailed_currency(share.value),
                        format::percent(share.percent)
                    );
                }
            }

            if !profile.shap_values.is_empty() {
                println!("Risk drivers:");
                for driver in &profile.shap_values {
                    println!("- {} +{}: {}", driver.feature, driver.impact, driver.desc);
                }
            }
        }
        Commands::Discover { user_id, reason } => {
            let intervention = client.request_intervention(&user_id, reason).await?;
            println!("Reason: {}", reason.label());
            println!("{}: {}", intervention.action, intervention.message);
        }
    }

    Ok(())
}

fn load_file(path: &Path) -> anyhow::Result<Vec<UserRecord>> {
    ingest::load_users_file(path).with_context(|| format!("failed to load {}", path.display()))
}

async fn load_users(
    client: &RiskApiClient,
    input: Option<&Path>,
) -> anyhow::Result<Vec<UserRecord>> {
    match input {
        Some(path) => load_file(path),
        None => client
            .fetch_users()
            .await
            .with_context(|| format!("failed to fetch users from {}", client.base_url())),
    }
}
