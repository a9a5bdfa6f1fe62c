//! Noah dashboard
//!
//! Command-line front end for the patient analysis backend.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use futures::future::join_all;
use tokio::sync::broadcast;

use noah_dashboard::api::{ApiClient, PatientGateway};
use noah_dashboard::config::{self, Config};
use noah_dashboard::core::search::is_searchable;
use noah_dashboard::core::{
    InsightView, InsightsPanel, LoadState, Level, Notification, Notifier, PatientSearch, PatientSession, UploadQueue,
};
use noah_dashboard::models::{AgentRole, NewPatient, UploadCategory, UploadFile};
use noah_dashboard::ui::terminal;
use noah_dashboard::utils::init_tracing;

#[derive(Parser)]
#[command(name = "noah-dashboard", about = "Noah patient dashboard")]
struct Cli {
    /// Backend base URL, overrides the configured one
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the backend is reachable
    Health,
    /// Show the full analysis for a patient
    Analysis { patient_id: i64 },
    /// Search patients by name
    Search { query: String },
    /// Register a new patient
    CreatePatient {
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        gender: String,
        #[arg(long, default_value = "")]
        contact: String,
        #[arg(long, default_value = "")]
        address: String,
    },
    /// Upload clinical documents, imaging or genomic files
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[arg(long)]
        patient_id: Option<i64>,
        #[arg(long, value_enum)]
        category: Option<Category>,
    },
    /// Show the stored AI summary, or generate a new one
    Summary {
        patient_id: i64,
        #[arg(long)]
        generate: bool,
        #[arg(long, value_enum)]
        report: Option<Role>,
    },
    /// Select several patients back to back; only the last selection is shown
    Watch {
        #[arg(required = true)]
        patient_ids: Vec<i64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Category {
    Clinical,
    Imaging,
    Genomics,
}

impl From<Category> for UploadCategory {
    fn from(category: Category) -> Self {
        match category {
            Category::Clinical => UploadCategory::Clinical,
            Category::Imaging => UploadCategory::Imaging,
            Category::Genomics => UploadCategory::Genomics,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Role {
    Vitals,
    Labs,
    Risks,
}

impl From<Role> for AgentRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Vitals => AgentRole::Vitals,
            Role::Labs => AgentRole::Labs,
            Role::Risks => AgentRole::Risks,
        }
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut settings = config::load_config().context("failed to load configuration")?;
    if let Some(base_url) = cli.base_url {
        settings.api.base_url = base_url;
    }
    init_tracing(&settings.logging)?;

    let client = ApiClient::from_settings(&settings.api)?;
    let gateway: Arc<dyn PatientGateway> = Arc::new(client);
    let notifier = Notifier::default();
    let mut toasts = notifier.subscribe();

    let result = run(cli.command, &settings, gateway, notifier).await;
    flush_toasts(&mut toasts);
    result
}

async fn run(command: Commands, settings: &Config, gateway: Arc<dyn PatientGateway>, notifier: Notifier) -> Result<()> {
    match command {
        Commands::Health => match gateway.health_check().await {
            Ok(health) if health.message.is_empty() => notifier.success("Backend connected successfully!"),
            Ok(health) => notifier.success(health.message),
            Err(err) => {
                notifier.error("Failed to connect to backend");
                return Err(err.into());
            }
        },

        Commands::Analysis { patient_id } => {
            let session = PatientSession::open(gateway, notifier, patient_id).await;
            let snapshot = session.snapshot();
            println!("{}", terminal::render_session(&snapshot));
            if snapshot.state == LoadState::Failed {
                anyhow::bail!("could not load patient #{}", patient_id);
            }
        }

        Commands::Search { query } => {
            if !is_searchable(&query, settings.search.min_query_chars) {
                println!("Type at least {} characters to search.", settings.search.min_query_chars);
                return Ok(());
            }
            let search = PatientSearch::spawn(gateway, &settings.search);
            let mut results = search.results();
            search.set_query(query);
            results.changed().await.context("search stopped before answering")?;
            let latest = results.borrow_and_update().clone();
            println!("{}", terminal::render_search_results(&latest.patients));
        }

        Commands::CreatePatient {
            name,
            age,
            gender,
            contact,
            address,
        } => {
            let form = NewPatient {
                name,
                age,
                gender,
                contact,
                address,
            };
            match gateway.create_patient(&form).await {
                Ok(patient) => {
                    notifier.success(format!("Patient {} created! Now upload their files.", patient.name));
                    println!("{}", terminal::render_patient_card(&patient));
                }
                Err(err) => {
                    notifier.error("Failed to create patient");
                    return Err(err.into());
                }
            }
        }

        Commands::Upload {
            paths,
            patient_id,
            category,
        } => {
            let mut files = Vec::with_capacity(paths.len());
            for path in &paths {
                let file = UploadFile::from_path(path)
                    .await
                    .with_context(|| format!("failed to read {}", path.display()))?;
                if let Some(category) = category.map(UploadCategory::from) {
                    if !category.accepts(&file.file_name) {
                        notifier.error(format!(
                            "{} is not an accepted format ({})",
                            file.file_name,
                            category.accepted_extensions().join(", ")
                        ));
                        continue;
                    }
                }
                files.push(file);
            }

            let mut queue = UploadQueue::new(gateway, settings.upload.clone());
            if let Some(patient_id) = patient_id {
                queue = queue.for_patient(patient_id);
            }
            for outcome in queue.upload_all(files).await {
                if let Err(err) = outcome.result {
                    notifier.error(err.to_string());
                }
            }
            println!("{}", terminal::render_uploads(&queue.entries().await));
        }

        Commands::Summary {
            patient_id,
            generate,
            report,
        } => {
            let panel = InsightsPanel::new(gateway, notifier, patient_id);
            panel.show_patient(patient_id).await;
            if generate {
                // Failures are already on the board and in a toast.
                let _ = panel.generate().await;
            }
            if let Some(role) = report {
                panel.select_view(InsightView::Report(role.into()));
            }
            println!("{}", terminal::render_insights(&panel.snapshot()));
        }

        Commands::Watch { patient_ids } => {
            let session = PatientSession::open(gateway, notifier, settings.session.default_patient_id).await;
            let outcomes = join_all(patient_ids.iter().map(|patient_id| session.select(*patient_id))).await;
            for (patient_id, outcome) in patient_ids.iter().zip(outcomes) {
                println!("#{}: {:?}", patient_id, outcome);
            }
            println!("{}", terminal::render_session(&session.snapshot()));
        }
    }
    Ok(())
}

fn flush_toasts(toasts: &mut broadcast::Receiver<Notification>) {
    while let Ok(toast) = toasts.try_recv() {
        let marker = match toast.level {
            Level::Success => "ok",
            Level::Info => "info",
            Level::Error => "error",
        };
        eprintln!("[{}] {}", marker, toast.message);
    }
}
