//! Aurum CLI: loan quotes against tokenized gold.
//!
//! Fetches rate parameters from the Aurum server, falls back to the published
//! defaults when the server cannot be reached, and runs the calculator from
//! `aurum-core` locally.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use aurum_core::params::{
    DEFAULT_ANNUAL_INTEREST_RATE, DEFAULT_LOAN_TO_VALUE_RATIO, KNOWN_KEYS,
};
use aurum_core::term::{DEFAULT_TERM_MONTHS, TermSchedule};
use aurum_core::{LoanQuote, QuoteRequest, RateParameters};

// ── ANSI color helpers ───────────────────────────────────────────────

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const WHITE: &str = "\x1b[37m";
const GOLD: &str = "\x1b[38;5;220m";

const BANNER_SMALL: &str = "◆ Aurum";

/// Request timeout for the rate service.
const HTTP_TIMEOUT: Duration = Duration::from_secs(5);

// ── CLI structure ────────────────────────────────────────────────────

/// Aurum: borrow against your tokenized gold.
#[derive(Parser)]
#[command(
    name = "aurum",
    version,
    about = "Aurum CLI: quote loans against tokenized gold and manage lending rates",
    long_about = None,
    after_help = format!(
        "{DIM}Environment variables:{RESET}\n  \
         AURUM_ADDR          Server address (default: http://127.0.0.1:8300)\n  \
         AURUM_ADMIN_TOKEN   Admin token for set-param\n\n\
         {DIM}Examples:{RESET}\n  \
         aurum quote 100 --term 12\n  \
         aurum quote 250 --term 36 --offline --json\n  \
         aurum set-param interestRate 0.06"
    ),
)]
struct Cli {
    /// Aurum server address.
    #[arg(long, env = "AURUM_ADDR", default_value = "http://127.0.0.1:8300")]
    addr: String,

    /// Admin token for rate parameter writes.
    #[arg(long, env = "AURUM_ADMIN_TOKEN")]
    admin_token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show server health.
    Status,
    /// Show the rate parameters published by the server.
    Params {
        /// Print raw JSON.
        #[arg(long, default_value = "false")]
        json: bool,
    },
    /// Show the offered loan terms.
    Terms,
    /// Quote a loan against a collateral amount.
    Quote {
        /// Tokenized gold pledged, in value units.
        #[arg(allow_negative_numbers = true)]
        collateral: f64,
        /// Loan term in months.
        #[arg(long, default_value_t = DEFAULT_TERM_MONTHS)]
        term: u32,
        /// Skip the server and use the default rates.
        #[arg(long, default_value = "false")]
        offline: bool,
        /// Print the quote as JSON.
        #[arg(long, default_value = "false")]
        json: bool,
    },
    /// Change a rate parameter on the server (admin).
    #[command(name = "set-param")]
    SetParam {
        /// Parameter key: `loanToValueRatio` or `interestRate`.
        key: String,
        /// New value as a fraction (e.g. 0.06 for 6%).
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
}

// ── Pretty output helpers ────────────────────────────────────────────

fn header(title: &str) {
    println!("{BOLD}{GOLD}◆ {title}{RESET}");
    println!("{DIM}─────────────────────────────────────────{RESET}");
}

fn kv_line(key: &str, value: &str) {
    println!("  {DIM}{key:<20}{RESET} {WHITE}{value}{RESET}");
}

fn success(msg: &str) {
    println!("{GREEN}{BOLD}✓{RESET} {msg}");
}

/// Warnings go to stderr so `--json` output stays parseable.
fn warning(msg: &str) {
    eprintln!("{YELLOW}{BOLD}⚠{RESET} {YELLOW}{msg}{RESET}");
}

fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

fn percent(fraction: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, fraction * 100.0)
}

fn print_params(pairs: &[(String, f64)]) {
    header("Rate Parameters");
    if pairs.is_empty() {
        kv_line("(none stored)", "defaults apply");
    }
    for (key, value) in pairs {
        kv_line(key, &value.to_string());
    }
    println!();
}

fn print_quote(quote: &LoanQuote, source: RateSource) {
    header("Loan Quote");
    kv_line("Collateral", &format!("{:.4}", quote.collateral_amount));
    kv_line("Term", &format!("{} months", quote.term_months));
    kv_line(
        "Loan Amount",
        &format!(
            "{GOLD}{BOLD}{}{RESET} {DIM}(LTV {}){RESET}",
            money(quote.loan_amount),
            percent(quote.rates.loan_to_value_ratio, 0)
        ),
    );
    kv_line(
        "Total Repayment",
        &format!(
            "{}{DIM} ({} APR){RESET}",
            money(quote.repayment_amount),
            percent(quote.rates.annual_interest_rate, 1)
        ),
    );
    if let Some(monthly) = quote.monthly_payment() {
        kv_line("Monthly Payment", &money(monthly));
    }
    kv_line("Total Interest", &money(quote.total_interest()));
    kv_line("Rates From", source.as_str());
    println!();
}

// ── HTTP client ──────────────────────────────────────────────────────

struct Client {
    http: reqwest::Client,
    addr: String,
    admin_token: Option<String>,
}

impl Client {
    fn new(addr: &str, admin_token: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("aurum-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            addr: addr.trim_end_matches('/').to_owned(),
            admin_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.addr)
    }

    async fn get(&self, path: &str) -> Result<Value> {
        let resp = self
            .http
            .get(self.url(path))
            .send()
            .await
            .context("request failed")?;
        handle_response(resp).await
    }

    async fn put_admin(&self, path: &str, body: &Value) -> Result<Value> {
        let token = self.admin_token.as_deref().ok_or_else(|| {
            anyhow::anyhow!("no admin token provided; set AURUM_ADMIN_TOKEN or use --admin-token")
        })?;
        let resp = self
            .http
            .put(self.url(path))
            .header("X-Aurum-Admin-Token", token)
            .json(body)
            .send()
            .await
            .context("request failed")?;
        handle_response(resp).await
    }

    /// `getLoanCalculatorParams`: the server's `(key, value)` pairs.
    async fn loan_params(&self) -> Result<Vec<(String, f64)>> {
        let resp = self.get("/v1/loan/params").await?;
        serde_json::from_value(resp).context("unexpected rate parameter format")
    }

    async fn terms(&self) -> Result<TermSchedule> {
        let resp = self.get("/v1/loan/terms").await?;
        serde_json::from_value(resp).context("unexpected term schedule format")
    }
}

async fn handle_response(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    if status == reqwest::StatusCode::NO_CONTENT {
        return Ok(Value::Null);
    }
    let body = resp.text().await.context("failed to read response body")?;
    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
            .unwrap_or(body);
        bail!("server returned {status}: {message}");
    }
    if body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).context("failed to parse response JSON")
}

// ── Command dispatch ─────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("  {RED}{BOLD}✗ Error:{RESET} {e:#}");
            eprintln!();
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let client = Client::new(&cli.addr, cli.admin_token)?;

    match cli.command {
        Commands::Status => cmd_status(&client).await,
        Commands::Params { json } => cmd_params(&client, json).await,
        Commands::Terms => {
            cmd_terms(&client).await;
            Ok(())
        }
        Commands::Quote {
            collateral,
            term,
            offline,
            json,
        } => cmd_quote(&client, collateral, term, offline, json).await,
        Commands::SetParam { key, value } => cmd_set_param(&client, &key, value).await,
    }
}

// ── Commands ─────────────────────────────────────────────────────────

async fn cmd_status(client: &Client) -> Result<()> {
    println!();
    println!("  {BANNER_SMALL} {DIM}checking health...{RESET}");
    println!();
    let resp = client.get("/v1/sys/health").await?;

    header("Server Status");
    kv_line("Address", &client.addr);
    let storage_ok = resp.get("storage_ok").and_then(Value::as_bool).unwrap_or(false);
    kv_line(
        "Storage",
        &if storage_ok {
            format!("{GREEN}ok{RESET}")
        } else {
            format!("{RED}unavailable{RESET}")
        },
    );
    if let Some(n) = resp.get("parameters").and_then(Value::as_u64) {
        kv_line("Parameters", &n.to_string());
    }
    if let Some(v) = resp.get("version").and_then(Value::as_str) {
        kv_line("Version", v);
    }
    println!();
    Ok(())
}

async fn cmd_params(client: &Client, json: bool) -> Result<()> {
    let pairs = client.loan_params().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&pairs)?);
    } else {
        print_params(&pairs);
    }
    Ok(())
}

/// Terms offered by the server, or the built-in schedule if it is unreachable.
async fn cmd_terms(client: &Client) {
    let schedule = match client.terms().await {
        Ok(schedule) => schedule,
        Err(e) => {
            warning(&format!(
                "could not fetch terms from {} ({e:#}); showing the built-in schedule",
                client.addr
            ));
            TermSchedule::default()
        }
    };
    header("Loan Terms");
    let options: Vec<String> = schedule.options().iter().map(u32::to_string).collect();
    kv_line("Offered (months)", &options.join(", "));
    kv_line("Default", &format!("{} months", schedule.default_months));
    println!();
}

/// Where the rates behind a quote came from.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum RateSource {
    Server,
    Defaults,
}

impl RateSource {
    fn as_str(self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Defaults => "defaults",
        }
    }
}

/// Rates for a quote. A failed fetch is never fatal: the defaults apply.
async fn resolve_rates(client: &Client, offline: bool) -> (RateParameters, RateSource) {
    if offline {
        return (RateParameters::default(), RateSource::Defaults);
    }
    match client.loan_params().await {
        Ok(pairs) => (RateParameters::from_pairs(pairs.as_slice()), RateSource::Server),
        Err(e) => {
            warning(&format!(
                "could not fetch rates from {} ({e:#}); using defaults LTV {DEFAULT_LOAN_TO_VALUE_RATIO}, rate {DEFAULT_ANNUAL_INTEREST_RATE}",
                client.addr
            ));
            (RateParameters::default(), RateSource::Defaults)
        }
    }
}

#[derive(Serialize)]
struct QuoteOutput {
    #[serde(flatten)]
    quote: LoanQuote,
    monthly_payment: Option<f64>,
    total_interest: f64,
    rate_source: RateSource,
}

async fn cmd_quote(
    client: &Client,
    collateral: f64,
    term: u32,
    offline: bool,
    json: bool,
) -> Result<()> {
    let request = QuoteRequest {
        collateral_amount: collateral,
        term_months: term,
    };
    // Reject bad input before touching the network.
    request.validate()?;

    if !TermSchedule::default().contains(term) {
        warning(&format!("{term} months is outside the offered term schedule"));
    }

    let (rates, source) = resolve_rates(client, offline).await;
    let quote = LoanQuote::compute(&request, &rates)?;

    if json {
        let output = QuoteOutput {
            quote,
            monthly_payment: quote.monthly_payment(),
            total_interest: quote.total_interest(),
            rate_source: source,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_quote(&quote, source);
    }
    Ok(())
}

async fn cmd_set_param(client: &Client, key: &str, value: f64) -> Result<()> {
    if !KNOWN_KEYS.contains(&key) {
        bail!(
            "unknown rate parameter '{key}', expected one of: {}",
            KNOWN_KEYS.join(", ")
        );
    }
    let body = serde_json::json!({ "value": value });
    let resp = client
        .put_admin(&format!("/v1/loan/params/{key}"), &body)
        .await?;
    let pairs: Vec<(String, f64)> =
        serde_json::from_value(resp).context("unexpected rate parameter format")?;

    println!();
    success(&format!("{key} set to {value}"));
    println!();
    print_params(&pairs);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn money_rounds_to_cents() {
        assert_eq!(money(73.5), "$73.50");
        assert_eq!(money(6.125_001), "$6.13");
    }

    #[test]
    fn percent_formats_fraction() {
        assert_eq!(percent(0.7, 0), "70%");
        assert_eq!(percent(0.05, 1), "5.0%");
    }

    #[test]
    fn cli_parses_quote_defaults() {
        let cli = Cli::try_parse_from(["aurum", "quote", "100"]).unwrap();
        match cli.command {
            Commands::Quote {
                collateral,
                term,
                offline,
                json,
            } => {
                assert!((collateral - 100.0).abs() < f64::EPSILON);
                assert_eq!(term, DEFAULT_TERM_MONTHS);
                assert!(!offline);
                assert!(!json);
            }
            _ => unreachable!("expected quote command"),
        }
    }

    #[test]
    fn quote_output_flattens_quote_fields() {
        let quote = LoanQuote::compute(
            &QuoteRequest {
                collateral_amount: 100.0,
                term_months: 12,
            },
            &RateParameters::default(),
        )
        .unwrap();
        let output = QuoteOutput {
            quote,
            monthly_payment: quote.monthly_payment(),
            total_interest: quote.total_interest(),
            rate_source: RateSource::Defaults,
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["term_months"], 12);
        assert_eq!(value["rate_source"], "defaults");
        assert!(value["rates"]["loan_to_value_ratio"].is_number());
    }
}
