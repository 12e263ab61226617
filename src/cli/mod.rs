use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive numbered menu (default when no command is given)
    Menu,

    /// Generate challenging questions on a topic
    Questions {
        topic: String,

        /// Difficulty level, e.g. beginner, intermediate, expert, research-level
        #[arg(short, long)]
        difficulty: Option<String>,

        /// Number of questions (default 5)
        #[arg(short = 'n', long)]
        count: Option<u32>,
    },

    /// Get a comprehensive answer to a question
    Ask { question: String },

    /// Review code read from a file, or from stdin when no file is given
    Review {
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[arg(short, long)]
        context: Option<String>,
    },

    /// Work through a problem description
    Solve { description: String },

    /// Send a free-form message with no task template
    Chat { message: String },

    /// List models available to the configured API key
    Models {
        /// Include models that cannot generate content
        #[arg(long)]
        all: bool,
    },

    /// Start the web UI
    Serve {
        #[arg(short, long, default_value = "8501")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,

        /// Minutes a browser session may sit idle before it is discarded
        #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
        idle_minutes: u64,
    },
}
