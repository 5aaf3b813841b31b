use std::fmt::{Debug, Display};

use scholar_match::core::{get_subscriber, init_subscriber, AppConfig, EmailService};
use scholar_match::db::store::MySqlDocStore;
use scholar_match::jobs::notification_sweep::start_notification_scheduler;
use scholar_match::scholar_match_web_server::ScholarMatchWebServer;
use sqlx::mysql::MySqlPoolOptions;
use tokio::task::JoinError;

use colored::*;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let file_appender = tracing_appender::rolling::daily("/var/tmp/log/scholar_match", "app");

    let subscriber = get_subscriber("scholar_match".into(), "info".into(), file_appender);
    init_subscriber(subscriber);

    let config = AppConfig::new().expect("failed to build our appConfig object");

    let scholar_match_web_server = ScholarMatchWebServer::build(config.clone())
        .await
        .expect("failed to build the scholar match web server");

    let sweep_pool = MySqlPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_lazy_with(config.mysql.connect());

    start_notification_scheduler(
        MySqlDocStore::new(sweep_pool),
        EmailService::new(config.smtp.clone()),
        config.notifications.clone(),
    )
    .await;

    let _x = tokio::spawn(scholar_match_web_server.run_until_stopped());

    println!("{}", "-----------------------------------------".green());
    println!(
        "{}",
        format!(
            "🚀 Server started on Addr: {}:{}",
            config.scholar_match_server_config.host, config.scholar_match_server_config.port
        )
    );
    println!("{}", "-----------------------------------------".green());

    tokio::select! {
        o = _x => {report_exit("xx", o);}
    }
    Ok(())
}

fn report_exit(task_name: &str, outcome: Result<Result<(), impl Debug + Display>, JoinError>) {
    match outcome {
        Ok(Ok(())) => {
            tracing::info!("{} has exited", task_name)
        }
        Ok(Err(e)) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "{} failed",
                task_name
            )
        }
        Err(e) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "{}' task failed to complete",
                task_name
            )
        }
    }
}
