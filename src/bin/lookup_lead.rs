//! Utility to debug phone matching from the command line.
//!
//! Usage: `lookup_lead <telefone> [--status]`
//!
//! Prints the digit/country-code stages and the candidates for a phone. With
//! `--status` it also queries the configured datastore (read-only) and prints
//! the matched lead's status.

use lead_ia_toggle::app::connect_store;
use lead_ia_toggle::config::Config;
use lead_ia_toggle::phone::{digits_only, generate_candidates, strip_country_code};
use lead_ia_toggle::services::LeadLookupService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let query_status = args.iter().any(|a| a == "--status");
    let phone = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .ok_or_else(|| anyhow::anyhow!("Usage: lookup_lead <telefone> [--status]"))?;

    let digits = digits_only(phone);
    println!("Input:      {}", phone);
    println!("Digits:     {}", digits);
    println!("Local part: {}", strip_country_code(&digits));

    let candidates = generate_candidates(phone);
    if candidates.is_empty() {
        println!("Candidates: (none, local part must have 10 or 11 digits)");
    } else {
        println!("Candidates:");
        for candidate in &candidates {
            println!("- {}", candidate);
        }
    }

    if !query_status {
        return Ok(());
    }

    let config = Config::from_env()?;
    let service = LeadLookupService::new(connect_store(&config).await?);

    match service.get_status(Some(phone)).await {
        Ok(status) => {
            println!();
            println!("Nome:      {}", status.nome.as_deref().unwrap_or("-"));
            println!("Telefone:  {}", status.telefone);
            println!("IA on/off: {}", status.ia_on_off.as_deref().unwrap_or("-"));
        }
        Err(e) => println!("\n{}", e),
    }

    Ok(())
}
