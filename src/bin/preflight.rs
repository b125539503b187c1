use classinsight_data::infra::config;
use classinsight_data::{get_data_source, select_kind_from_env, HealthStatus, SourceKind};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Selection env vars (priority order):\n\
           USE_MOCK_DATA, USE_FIRESTORE, SHEETS_API_URL\n\
         Backend env vars:\n\
           FIREBASE_PROJECT_ID, FIREBASE_API_KEY, SCHOOL_ID, OPTIMIZATION_API_URL\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    println!("> Preflight:");
    println!("  USE_MOCK_DATA={}", config::use_mock_data());
    println!("  USE_FIRESTORE={}", config::use_firestore());
    println!(
        "  SHEETS_API_URL={}",
        config::sheets_api_url().unwrap_or_else(|| "(unset)".to_string())
    );
    println!(
        "  FIREBASE_PROJECT_ID={}",
        config::firebase_project_id().unwrap_or_else(|| "(unset)".to_string())
    );
    println!("  SCHOOL_ID={}", config::school_id());
    println!(
        "  OPTIMIZATION_API_URL={}",
        config::optimization_api_url().unwrap_or_else(|| "(unset)".to_string())
    );

    let kind = select_kind_from_env();
    println!("  Selected source: {:?}", kind);
    if kind == SourceKind::Mock && !config::use_mock_data() {
        eprintln!("  Warning: no real backend configured; falling back to mock data.");
    }

    let source = get_data_source().await;

    // Basic backend connectivity
    let health = source.health_check().await;
    match health.latency {
        Some(ms) => println!("  Health: {:?} ({:.0} ms)", health.status, ms),
        None => println!("  Health: {:?}", health.status),
    }
    if health.status == HealthStatus::Degraded {
        eprintln!("  Warning: backend answered but exceeded the latency budget.");
    }
    if kind != SourceKind::Mock && health.status == HealthStatus::Down {
        return Err(anyhow::anyhow!(
            "Configured backend is down. Check the connection settings above."
        ));
    }

    // Roster readable
    let students = source.get_students().await;
    match students.data {
        Some(students) => println!("  Roster readable: {} students.", students.len()),
        None => {
            return Err(anyhow::anyhow!(
                "Roster is not readable: {}",
                students
                    .error
                    .unwrap_or_else(|| "unknown error".to_string())
            ))
        }
    }

    println!("> Preflight OK.");
    Ok(())
}
