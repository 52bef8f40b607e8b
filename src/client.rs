use crate::{
    error::Result,
    retry::RetryExt,
    types::{CheckResult, Status},
};
use derive_builder::Builder;
use rand::Rng;
use reqwest::header::{self, HeaderMap, HeaderValue};
use std::{collections::HashSet, time::Duration};
use tokio::time;

const DEFAULT_MAX_REDIRECTS: usize = 5;
const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_MAX_RETRIES: u64 = 30;
const DEFAULT_MIN_THROTTLE_WAIT: Duration = Duration::from_secs(3);
const DEFAULT_MAX_THROTTLE_WAIT: Duration = Duration::from_secs(15);
const DEFAULT_BATCH_TIMEOUT: Duration = Duration::from_secs(120);

// Faking a browser user agent is necessary for some websites, unfortunately.
// Otherwise we get a 403 from the firewall (e.g. Sucuri/Cloudproxy).
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/89.0.4389.114 Safari/537.36";

#[derive(Debug, Clone)]
pub struct Client {
    reqwest_client: reqwest::Client,
    max_retries: u64,
    min_throttle_wait: Duration,
    max_throttle_wait: Duration,
    batch_timeout: Duration,
}

/// A link checker with a retry loop for throttling servers
/// and a wall-clock budget per checked document.
#[derive(Builder, Debug)]
#[builder(build_fn(skip))]
#[builder(setter(into))]
#[builder(name = "ClientBuilder")]
pub struct ClientBuilderInternal {
    user_agent: String,
    max_redirects: usize,
    timeout: Duration,
    max_retries: u64,
    min_throttle_wait: Duration,
    max_throttle_wait: Duration,
    batch_timeout: Duration,
}

impl ClientBuilder {
    pub fn build(&mut self) -> Result<Client> {
        let user_agent = self
            .user_agent
            .clone()
            .unwrap_or_else(|| USER_AGENT.to_string());

        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_str(&user_agent)?);
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(header::ACCEPT_CHARSET, HeaderValue::from_static("utf-8"));

        let max_redirects = self.max_redirects.unwrap_or(DEFAULT_MAX_REDIRECTS);
        let timeout = self
            .timeout
            .unwrap_or_else(|| Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        // gzip(true) also takes care of the Accept-Encoding header
        // and of transparent decompression.
        let reqwest_client = reqwest::ClientBuilder::new()
            .gzip(true)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(max_redirects))
            .timeout(timeout)
            .build()?;

        Ok(Client {
            reqwest_client,
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            min_throttle_wait: self.min_throttle_wait.unwrap_or(DEFAULT_MIN_THROTTLE_WAIT),
            max_throttle_wait: self.max_throttle_wait.unwrap_or(DEFAULT_MAX_THROTTLE_WAIT),
            batch_timeout: self.batch_timeout.unwrap_or(DEFAULT_BATCH_TIMEOUT),
        })
    }
}

impl Client {
    /// Probe a single link target.
    ///
    /// Throttling (an explicit 429, or a transient transport failure from an
    /// origin that fails closed under load) is absorbed by a bounded retry
    /// loop with a randomized pause. Any other transport failure counts as
    /// the origin being unreachable and becomes a `Status::Error`; only
    /// requests that could not even be constructed escalate as `Err`.
    pub async fn check(&self, url: &str) -> Result<Status> {
        let mut attempts: u64 = 1;
        loop {
            match self.reqwest_client.get(url).send().await {
                Ok(response) => {
                    let code = response.status();
                    if !code.is_throttling() {
                        return Ok(Status::new(code));
                    }
                    info!(
                        "{} received from server for {}, waiting before trying again",
                        code, url
                    );
                }
                Err(e) if e.is_throttling() => {
                    info!(
                        "transient transport failure for {} ({}), waiting before trying again",
                        url, e
                    );
                }
                Err(e) if e.is_builder() => return Err(e.into()),
                Err(e) => {
                    warn!("suppressing error for {}: {}", url, e);
                    return Ok(e.into());
                }
            }
            if attempts >= self.max_retries {
                warn!("giving up on {} after {} throttled attempts", url, attempts);
                return Ok(Status::RetriesExhausted);
            }
            attempts += 1;
            time::sleep(self.throttle_wait()).await;
        }
    }

    /// Check all given targets concurrently and collect one outcome per
    /// distinct target.
    ///
    /// Duplicate submissions are probed once. Targets still in flight when
    /// the batch budget runs out are recorded as `Status::Timeout` and their
    /// probes aborted, so no request outlives the batch. Targets that turned
    /// out unreachable without any response are dropped from the map.
    pub async fn check_links<T>(&self, targets: &[T]) -> Result<CheckResult>
    where
        T: AsRef<str>,
    {
        let mut scheduled = HashSet::new();
        let mut slots = Vec::new();
        for target in targets {
            let target = target.as_ref().to_string();
            if !scheduled.insert(target.clone()) {
                debug!("{} already scheduled, skipping duplicate submission", target);
                continue;
            }
            let client = self.clone();
            let url = target.clone();
            let handle = tokio::spawn(async move { client.check(&url).await });
            slots.push((target, handle));
        }

        let deadline = time::Instant::now() + self.batch_timeout;
        let mut results = CheckResult::new();
        for (target, mut slot) in slots {
            match time::timeout_at(deadline, &mut slot).await {
                Ok(joined) => match joined?? {
                    Status::Error(e) => {
                        warn!("no response from {}, dropping it from the result ({})", target, e);
                    }
                    status => {
                        results.insert(target, status);
                    }
                },
                Err(_) => {
                    slot.abort();
                    results.insert(target, Status::Timeout);
                }
            }
        }
        Ok(results)
    }

    fn throttle_wait(&self) -> Duration {
        rand::thread_rng().gen_range(self.min_throttle_wait..self.max_throttle_wait)
    }

    pub(crate) fn raw_client(&self) -> &reqwest::Client {
        &self.reqwest_client
    }
}
