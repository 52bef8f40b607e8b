#[macro_use]
extern crate log;

use anyhow::Result;
use deadlink_finder::{collector, extract, stats::ResponseStats, CheckResult, Client, ClientBuilder, Status};
use serde::Serialize;
use std::time::Duration;
use structopt::StructOpt;
use url::Url;

mod options;

use options::Options;

/// A C-like enum that can be cast to `i32` and used as process exit code.
enum ExitCode {
    Success = 0,
    // NOTE: exit code 1 is used for any `Result::Err` bubbled up to `main()` using the `?` operator.
    #[allow(unused)]
    UnexpectedFailure = 1,
    LinkCheckFailure = 2,
}

#[derive(Serialize)]
struct LinkRecord<'a> {
    uri: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<u16>,
    status: String,
    ok: bool,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let opts = Options::from_args();

    let runtime = tokio::runtime::Runtime::new()?;
    let errorcode = runtime.block_on(run(&opts))?;
    std::process::exit(errorcode);
}

async fn run(opts: &Options) -> Result<i32> {
    let mut builder = ClientBuilder::default();
    builder
        .timeout(Duration::from_secs(opts.timeout))
        .max_redirects(opts.max_redirects)
        .max_retries(opts.max_retries)
        .batch_timeout(Duration::from_secs(opts.batch_timeout));
    if let Some(user_agent) = &opts.user_agent {
        builder.user_agent(user_agent.clone());
    }
    let client = builder.build()?;

    let mut all_ok = true;
    for input in &opts.inputs {
        // A failing document only aborts the check for that one document.
        match check_input(&client, input, opts).await {
            Ok(ok) => all_ok &= ok,
            Err(e) => {
                error!("skipping {}: {}", input, e);
                all_ok = false;
            }
        }
    }

    Ok(if all_ok {
        ExitCode::Success as i32
    } else {
        ExitCode::LinkCheckFailure as i32
    })
}

async fn check_input(client: &Client, input: &str, opts: &Options) -> Result<bool> {
    let links = if opts.page {
        let base_url = Url::parse(input)?;
        let content = collector::fetch_page(client, input).await?;
        extract::extract_html_links(&content, &base_url)
    } else {
        collector::collect_links(client, input, &opts.branch).await?
    };
    info!("found {} links in {}", links.len(), input);

    let results = client.check_links(&links).await?;

    if opts.json {
        print_json(&results)?;
    } else {
        for (target, status) in sorted(&results) {
            if let Some(message) = status_message(target, status, opts.verbose) {
                println!("{}", message);
            }
        }
    }

    let stats = ResponseStats::tally(&results);
    println!("{} site: {}", stats.overview(), input);
    if opts.verbose {
        println!("\n{}", stats);
    }
    Ok(stats.is_success())
}

fn sorted(results: &CheckResult) -> Vec<(&String, &Status)> {
    let mut entries: Vec<_> = results.iter().collect();
    entries.sort_by_key(|(target, _)| target.as_str());
    entries
}

fn status_message(target: &str, status: &Status, verbose: bool) -> Option<String> {
    match status {
        Status::Ok(code) if verbose => Some(format!("✅ {} [{}]", target, code)),
        Status::Ok(_) => None,
        _ => Some(format!("{} {} [{}]", status.icon(), target, status)),
    }
}

fn print_json(results: &CheckResult) -> Result<()> {
    let records: Vec<LinkRecord> = sorted(results)
        .into_iter()
        .map(|(target, status)| LinkRecord {
            uri: target,
            code: status.code().map(|c| c.as_u16()),
            status: status.to_string(),
            ok: status.is_success(),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
