use std::fs::File;
use std::path::PathBuf;
use std::{env, io, process};

use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use sitewalk_crawler::{crawl_site, CrawlConfig, CrawlReport, HtmlLinkExtractor, HttpFetcher};
use tokio::runtime;

/// Same-domain web crawler
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: SubCommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommand {
    #[command(name = "crawl")]
    Crawl(CrawlArgs),
    #[command(hide = true)]
    Completion,
}

/// Crawl a site and report reachable and broken URLs
#[derive(Debug, clap::Args)]
pub struct CrawlArgs {
    /// Seed URL to start crawling from
    pub url: String,
    /// Optional default crawler yaml configuration file
    #[arg(env = "SITEWALK_CONFIG", long)]
    pub config: Option<PathBuf>,
    /// Override crawler's maximum link depth
    #[arg(long)]
    pub max_depth: Option<usize>,
    /// Override crawler's delay in seconds between requests
    #[arg(long)]
    pub delay: Option<f32>,
    /// Override crawler's per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<f32>,
    /// Override crawler's maximum concurrent requests
    #[arg(long)]
    pub concurrent_requests: Option<usize>,
    /// Override crawler's user agent
    #[arg(long)]
    pub user_agent: Option<String>,
    /// No SIGINT handling, the crawl cannot be interrupted cleanly
    #[arg(long)]
    pub no_sigint: bool,
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
    /// When quiet no logs are outputted
    #[arg(long, short)]
    pub quiet: bool,
}

impl TryFrom<&CrawlArgs> for CrawlConfig {
    type Error = anyhow::Error;

    fn try_from(args: &CrawlArgs) -> Result<Self, Self::Error> {
        let mut conf: CrawlConfig = if let Some(file) = args.config.as_ref().map(File::open) {
            serde_yaml::from_reader(file?)?
        } else {
            CrawlConfig::default()
        };
        conf.seed_url = args.url.clone();
        if let Some(max_depth) = args.max_depth {
            conf.max_depth = max_depth;
        }
        if let Some(delay) = args.delay {
            conf.delay = delay;
        }
        if let Some(timeout) = args.timeout {
            conf.timeout = timeout;
        }
        if let Some(concurrent_requests) = args.concurrent_requests {
            conf.concurrent_requests = concurrent_requests;
        }
        if let Some(user_agent) = &args.user_agent {
            conf.user_agent = user_agent.to_string();
        }
        if args.no_sigint {
            conf.handle_sigint = false;
        }
        Ok(conf)
    }
}

pub fn crawl(args: CrawlArgs) -> anyhow::Result<CrawlReport> {
    let conf: CrawlConfig = (&args).try_into()?;
    let fetcher = HttpFetcher::new(&conf.user_agent, conf.timeout()?)?;
    let rt = runtime::Builder::new_multi_thread().enable_all().build()?;
    rt.block_on(crawl_site(&conf, &fetcher, &HtmlLinkExtractor))
}

fn print_report(report: &CrawlReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("Valid URLs:");
        for url in &report.valid_urls {
            println!("{url}");
        }
        println!("\nInvalid URLs:");
        for url in &report.invalid_urls {
            println!("{url}");
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.cmd {
        SubCommand::Crawl(args) => {
            if !args.quiet {
                env::set_var("RUST_LOG", "sitewalk_crawler=info");
                env_logger::init();
            }
            let json = args.json;
            let report = crawl(args)?;
            print_report(&report, json)?;
            if report.invalid_urls.is_empty() {
                Ok(())
            } else {
                process::exit(1)
            }
        }
        SubCommand::Completion => {
            generate(
                Shell::Bash,
                &mut Args::command(),
                "sitewalk",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}
