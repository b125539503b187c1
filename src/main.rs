//! Dashboard snapshot against whichever data source the environment selects.
//!
//! Useful as a smoke check: it exercises selection, health, stats, and the
//! roster read through the same contract the dashboard consumes.

use classinsight_data::get_data_source;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let source = get_data_source().await;
    println!("> Data source: {}", source.name());

    let health = source.health_check().await;
    match health.latency {
        Some(ms) => println!("  Health: {:?} ({:.0} ms)", health.status, ms),
        None => println!("  Health: {:?}", health.status),
    }

    let stats = source.get_stats().await;
    match stats.data {
        Some(stats) => {
            println!(
                "  Students: {} across {} classes",
                stats.total_students, stats.total_classes
            );
            println!(
                "  Strengths/challenges: {}/{}",
                stats.total_strengths, stats.total_challenges
            );
            println!("  Most common learning style: {}", stats.average_learning_style);
        }
        None => println!(
            "  Stats unavailable: {}",
            stats.error.unwrap_or_else(|| "unknown error".to_string())
        ),
    }

    let students = source.get_students().await;
    match students.data {
        Some(students) => {
            for s in &students {
                println!(
                    "  [{}] {} - {} ({} strengths, {} challenges)",
                    s.class_id, s.student_code, s.learning_style, s.strengths_count,
                    s.challenges_count
                );
            }
        }
        None => println!(
            "  Roster unavailable: {}",
            students.error.unwrap_or_else(|| "unknown error".to_string())
        ),
    }

    Ok(())
}
