use clap::Parser;
use std::path::PathBuf;
use wiki_hop::HopConfig;

#[derive(Parser, Debug)]
#[command(name = "wiki-hop")]
#[command(about = "Walk Wikipedia from one article to another by following the most similar link")]
#[command(version)]
pub struct Args {
    /// Article to start from (drawn from --topics if omitted)
    pub start: Option<String>,

    /// Article to reach (drawn from --topics if omitted)
    pub target: Option<String>,

    /// Newline-delimited list of titles to sample start and target from
    #[arg(long, default_value = "topics.txt")]
    pub topics: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of hops
    #[arg(short, long)]
    pub max_steps: Option<usize>,

    /// Stop as soon as a title is visited twice
    #[arg(long)]
    pub stop_on_revisit: bool,

    /// Base URL of an OpenAI-compatible embeddings API
    #[arg(long)]
    pub embedding_url: Option<String>,

    /// Embedding model name
    #[arg(long)]
    pub model: Option<String>,

    /// User-Agent sent to Wikipedia
    #[arg(long)]
    pub user_agent: Option<String>,
}

impl Args {
    /// Layer command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut HopConfig) {
        if let Some(max_steps) = self.max_steps {
            config.max_steps = max_steps;
        }
        if self.stop_on_revisit {
            config.stop_on_revisit = true;
        }
        if let Some(url) = &self.embedding_url {
            config.embedding.base_url = url.clone();
        }
        if let Some(model) = &self.model {
            config.embedding.model = model.clone();
        }
        if let Some(user_agent) = &self.user_agent {
            config.wiki.user_agent = user_agent.clone();
        }
    }
}
