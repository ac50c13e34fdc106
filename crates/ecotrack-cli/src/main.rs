use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use ecotrack_db::Database;
use ecotrack_store::error::StoreError;
use ecotrack_store::ledger::{self, ReportLedger};
use ecotrack_store::session::SessionStore;
use ecotrack_types::api::Verdict;
use ecotrack_types::models::{Category, Severity, UserPatch};
use ecotrack_verify::client::{Evidence, VerifyClient};
use ecotrack_verify::error::SubmitError;
use ecotrack_verify::submit::{ReportDraft, quick_verify, submit_report};

#[derive(Parser)]
#[command(
    name = "ecotrack",
    about = "Submit verified eco-action reports and track cashback rewards"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new account and log in
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        institution: String,
        /// Accepted for compatibility; never stored or checked
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Log in to an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Log out of the active session
    Logout,
    /// Show the active user's profile and reward summary
    Whoami,
    /// Update profile fields of the active user
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        institution: Option<String>,
    },
    /// Submit a report with photographic evidence
    Submit {
        /// Path to the evidence photo (JPEG)
        #[arg(long)]
        image: PathBuf,
        /// One of: waste, tree, water, air, energy, other
        #[arg(long)]
        category: Category,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        location: Option<String>,
        /// One of: low, medium, high
        #[arg(long, default_value_t = Severity::Medium)]
        severity: Severity,
        #[arg(long, requires = "longitude")]
        latitude: Option<f64>,
        #[arg(long, requires = "latitude")]
        longitude: Option<f64>,
    },
    /// Verify a photo without filing a report
    Verify {
        #[arg(long)]
        image: PathBuf,
        #[arg(long, requires = "longitude")]
        latitude: Option<f64>,
        #[arg(long, requires = "latitude")]
        longitude: Option<f64>,
    },
    /// List submitted reports, newest first
    Reports,
    /// Show report and reward statistics
    Dashboard,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ecotrack=debug".into()),
        )
        .init();

    let cli = Cli::parse();

    // Config
    let db_path = std::env::var("ECOTRACK_DB_PATH").unwrap_or_else(|_| "ecotrack.db".into());
    let verify_url = std::env::var("ECOTRACK_VERIFY_URL")
        .unwrap_or_else(|_| "http://localhost:8000/verify-action".into());

    debug!("Using store {} and endpoint {}", db_path, verify_url);

    let db = Arc::new(Database::open(&PathBuf::from(db_path))?);
    let session = SessionStore::new(db.clone());
    let reports = ReportLedger::new(db);
    let client = VerifyClient::new(verify_url);

    match cli.command {
        Command::Signup {
            name,
            email,
            institution,
            password,
        } => {
            let user = session.sign_up(&name, &email, &institution, &password)?;
            println!("Welcome, {}! Account created for {}.", user.name, user.email);
        }

        Command::Login { email, password } => match session.log_in(&email, &password) {
            Ok(user) => println!("Logged in as {} ({}).", user.name, user.email),
            Err(StoreError::NotFound) => {
                println!("Account not found. Create one with `ecotrack signup`.");
            }
            Err(e) => return Err(e.into()),
        },

        Command::Logout => {
            session.log_out()?;
            println!("Logged out.");
        }

        Command::Whoami => match session.active_user()? {
            Some(user) => {
                println!("{} <{}>", user.name, user.email);
                println!("Institution:  {}", user.institution);
                println!("Joined:       {}", user.joined_date.format("%B %d, %Y"));
                println!(
                    "Reports:      {} total, {} solved",
                    user.total_reports, user.solved_reports
                );
                println!("Cashback:     {}", user.total_cashback);
                println!("Certificates: {}", user.certificates);
            }
            None => println!("Not logged in."),
        },

        Command::Update {
            name,
            email,
            institution,
        } => {
            let patch = UserPatch {
                name,
                email,
                institution,
                ..Default::default()
            };
            match session.update_active_user(patch) {
                Ok(user) => println!("Profile updated for {}.", user.name),
                Err(StoreError::NoActiveSession) => println!("Not logged in."),
                Err(e) => return Err(e.into()),
            }
        }

        Command::Submit {
            image,
            category,
            title,
            description,
            location,
            severity,
            latitude,
            longitude,
        } => {
            let mut evidence = Evidence::new(tokio::fs::read(&image).await?);
            if let (Some(lat), Some(lon)) = (latitude, longitude) {
                evidence.coords = Some((lat, lon));
            }
            let draft = ReportDraft {
                category,
                title,
                description,
                location,
                severity,
            };

            match submit_report(&client, &session, &reports, draft, evidence).await {
                Ok(receipt) => {
                    println!("Report verified!");
                    if let Some(confidence) = receipt.confidence {
                        println!("AI confidence: {:.1}%", confidence * 100.0);
                    }
                    if let Some(labels) = &receipt.report.ai_labels {
                        println!("Detected: {}", labels.join(", "));
                    }
                    println!(
                        "+{} cashback ({} total)",
                        receipt.report.cashback, receipt.user.total_cashback
                    );
                }
                Err(e) => print_submit_error(e)?,
            }
        }

        Command::Verify {
            image,
            latitude,
            longitude,
        } => {
            let mut evidence = Evidence::new(tokio::fs::read(&image).await?);
            if let (Some(lat), Some(lon)) = (latitude, longitude) {
                evidence.coords = Some((lat, lon));
            }

            match quick_verify(&client, evidence).await {
                Ok(Verdict::Verified { confidence, labels }) => {
                    match confidence {
                        Some(c) => println!("Verified! (AI confidence: {:.1}%)", c * 100.0),
                        None => println!("Verified!"),
                    }
                    if !labels.is_empty() {
                        println!("Detected: {}", labels.join(", "));
                    }
                }
                Ok(Verdict::NotVerified { reason }) => {
                    println!("Verification failed: {}", reason);
                }
                Err(e) => print_submit_error(e)?,
            }
        }

        Command::Reports => {
            let listed = reports.list()?;
            if listed.is_empty() {
                println!("No reports yet.");
            }
            for report in &listed {
                println!(
                    "{}  {:<20} {:<9} +{:<4} {}",
                    report.date.format("%Y-%m-%d"),
                    report.category,
                    report.status,
                    report.cashback,
                    report.title,
                );
            }
        }

        Command::Dashboard => {
            let listed = reports.list()?;
            println!("Reports submitted: {}", listed.len());
            println!("Issues solved:     {}", ledger::solved_count(&listed));
            println!("Cashback (solved): {}", ledger::solved_cashback(&listed));
            if let Some(user) = session.active_user()? {
                println!(
                    "\n{}: {} reports, {} cashback, {} certificates",
                    user.name, user.total_reports, user.total_cashback, user.certificates
                );
            }
        }
    }

    Ok(())
}

/// Inline rendering for the submission failure taxonomy; unexpected
/// storage errors still propagate.
fn print_submit_error(err: SubmitError) -> Result<()> {
    match err {
        SubmitError::Validation(field) => println!("Missing required field: {}.", field),
        SubmitError::Rejected { reason } => println!("Verification failed: {}", reason),
        SubmitError::Connectivity(_) => {
            println!("Could not reach the verification service. Check your connection.");
        }
        SubmitError::Store(StoreError::NoActiveSession) => println!("Not logged in."),
        other => return Err(other.into()),
    }
    Ok(())
}
