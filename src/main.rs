use clap::Parser;
use log::error;
use redstream::cli::{Cli, Commands};
use redstream::client::{ArticleOptions, ListOptions};
use redstream::config::AppConfig;
use redstream::models::SubredditName;
use redstream::operations::comments::{handle_comments_command, CommentsOptions};
use redstream::operations::lookup::{handle_lookup_command, LookupKind};
use redstream::operations::stream::{handle_stream_command, StreamOptions};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let session = match config.create_session(cli.app_only).await {
        Ok(session) => session,
        Err(err) => {
            error!("Failed to set up reddit session: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let outcome = match cli.command {
        Commands::Stream {
            subreddit,
            sort,
            time,
            limit,
            pages,
            after,
            brief,
        } => {
            let options = StreamOptions {
                subreddit: subreddit.as_deref().map(SubredditName::new),
                list: ListOptions {
                    sort,
                    time_filter: time,
                    limit,
                },
                pages,
                after,
                brief,
                timezone: config.timezone,
            };
            handle_stream_command(options, session).await
        }
        Commands::Comments {
            article_id,
            sort,
            comment,
            depth,
            limit,
        } => {
            let options = CommentsOptions {
                article_id,
                article: ArticleOptions {
                    sort,
                    comments: comment,
                    depth,
                    limit,
                },
                timezone: config.timezone,
            };
            handle_comments_command(options, session).await
        }
        Commands::Related { article_id, limit } => {
            handle_lookup_command(LookupKind::Related { article_id, limit }, session).await
        }
        Commands::Duplicates { article_id, limit } => {
            handle_lookup_command(LookupKind::Duplicates { article_id, limit }, session).await
        }
        Commands::ById { fullnames } => {
            handle_lookup_command(LookupKind::ById { fullnames }, session).await
        }
        Commands::Random { subreddit } => {
            let subreddit = subreddit.as_deref().map(SubredditName::new);
            handle_lookup_command(LookupKind::Random { subreddit }, session).await
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
