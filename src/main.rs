use clap::Parser;
use std::error::Error;
use wiki_hop::results::Navigation;
use wiki_hop::{HopConfig, Termination, topics};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    match run(args).await {
        Ok(navigation) => {
            if matches!(navigation.termination, Termination::FetchFailed { .. }) {
                std::process::exit(1);
            }
        }
        Err(e) => {
            ::log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

async fn run(args: Args) -> Result<Navigation, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => HopConfig::from_file(path)?,
        None => HopConfig::default(),
    };
    args.apply(&mut config);

    let (start, target) = match (&args.start, &args.target) {
        (Some(start), Some(target)) => (start.clone(), target.clone()),
        _ => {
            let topics = topics::load_topics(&args.topics)
                .map_err(|e| format!("failed to read {}: {}", args.topics.display(), e))?;
            topics::pick_two(&topics, &mut rand::thread_rng())?
        }
    };

    println!("Start topic: {}", start);
    println!("End topic: {}", target);
    println!("Max steps: {}", config.max_steps);

    let navigation = wiki_hop::navigate(&config, &start, &target).await?;

    report(&navigation);
    Ok(navigation)
}

fn report(navigation: &Navigation) {
    for (i, hop) in navigation.hops.iter().enumerate() {
        println!(
            "Step {}: {} -> {} ({:.4})",
            i + 1,
            hop.from,
            hop.to,
            hop.score
        );
    }

    if !navigation.path.is_empty() {
        println!("Path: {}", navigation.path.join(" -> "));
    }
    println!("Result: {}", navigation.termination);
}
