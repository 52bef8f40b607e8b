use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "deadlink-finder",
    about = "Find dead links in project READMEs and web pages"
)]
pub(crate) struct Options {
    /// Project base URLs (e.g. https://github.com/user/repo),
    /// or page URLs when --page is given
    pub inputs: Vec<String>,

    /// Branch the README lives on
    #[structopt(long, default_value = "main")]
    pub branch: String,

    /// Treat inputs as web pages and check their anchor links
    /// instead of README links
    #[structopt(long)]
    pub page: bool,

    /// Website timeout from connect to response finished (seconds)
    #[structopt(long, default_value = "20")]
    pub timeout: u64,

    /// Maximum number of allowed redirects
    #[structopt(long, default_value = "5")]
    pub max_redirects: usize,

    /// Maximum attempts per link while the server keeps throttling
    #[structopt(long, default_value = "30")]
    pub max_retries: u64,

    /// Wall-clock budget for one document's whole batch of probes (seconds)
    #[structopt(long, default_value = "120")]
    pub batch_timeout: u64,

    /// User agent
    #[structopt(long)]
    pub user_agent: Option<String>,

    /// Verbose program output
    #[structopt(short, long)]
    pub verbose: bool,

    /// Print outcomes as JSON records instead of plain lines
    #[structopt(long)]
    pub json: bool,
}
