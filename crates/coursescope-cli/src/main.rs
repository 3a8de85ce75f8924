mod output;

use clap::{Args, Parser, Subcommand};
use coursescope_discussion::{DiscussionQuery, DiscussionService};
use coursescope_ratings::{ProfileLookup, ProfileQuery};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "coursescope-cli")]
#[command(about = "Course discussion and instructor rating lookups")]
struct Cli {
    /// Print raw JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List recent forum posts that mention a course
    Discussions {
        #[command(flatten)]
        course: CourseArgs,

        /// Maximum number of posts to return (1-50)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Summarize what students are saying about a course
    Digest {
        #[command(flatten)]
        course: CourseArgs,
    },
    /// Look up an instructor's ratings profile
    Professor {
        /// Instructor name (e.g., "Jane Doe")
        name: String,

        /// Search every institution, not just the configured one
        #[arg(long)]
        include_all: bool,
    },
}

#[derive(Debug, Args)]
struct CourseArgs {
    /// Course code (e.g., "COMP 232")
    course: String,

    /// Topic tag: difficulty, instructor, exam or tips
    #[arg(long)]
    topic: Option<String>,

    /// Free-text question used to infer the topic
    #[arg(long)]
    question: Option<String>,

    /// How many days of history to search
    #[arg(long)]
    window_days: Option<u32>,
}

impl CourseArgs {
    fn into_query(self, limit: Option<usize>) -> DiscussionQuery {
        DiscussionQuery {
            course_id: self.course,
            topic: self.topic,
            question: self.question,
            window_days: self.window_days,
            limit,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = coursescope_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Discussions { course, limit } => {
            let service = DiscussionService::from_app_config(&config)?;
            let response = service.query(&course.into_query(limit)).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print!("{}", output::render_posts(&response.posts));
            }
        }
        Commands::Digest { course } => {
            let service = DiscussionService::from_app_config(&config)?;
            let digest = service.digest(&course.into_query(None)).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&digest)?);
            } else {
                println!("{}", digest.text);
            }
        }
        Commands::Professor { name, include_all } => {
            let lookup = ProfileLookup::from_app_config(&config)?;
            let result = lookup
                .lookup(&ProfileQuery {
                    name,
                    include_all_institutions: include_all,
                })
                .await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", output::render_profile(&result));
            }
        }
    }

    Ok(())
}
