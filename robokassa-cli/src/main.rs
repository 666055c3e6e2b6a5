//! Robokassa CLI
//!
//! Builds payment URLs, computes signatures and simulates ResultURL callbacks.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use robokassa_client::{CallbackPayment, ResultUrlClient};
use robokassa_hex::GatewayService;
use robokassa_signature::SignatureEngine;
use robokassa_types::{CustomData, DEFAULT_PAYMENT_URL, GatewayConfig, PaymentRequest, RequestMethod};

#[derive(Parser)]
#[command(name = "robokassa")]
#[command(author, version, about = "Robokassa integration tools", long_about = None)]
struct Cli {
    #[command(flatten)]
    gateway: GatewayArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GatewayArgs {
    /// Merchant login
    #[arg(long, env = "ROBOKASSA_MERCHANT_LOGIN", default_value = "demo", global = true)]
    merchant_login: String,

    /// Secret for payment URL signatures
    #[arg(long, env = "ROBOKASSA_PASSWORD1", default_value = "", hide_env_values = true, global = true)]
    password1: String,

    /// Secret for ResultURL signatures
    #[arg(long, env = "ROBOKASSA_PASSWORD2", default_value = "", hide_env_values = true, global = true)]
    password2: String,

    /// Digest algorithm (md5, sha256, sha384, sha512)
    #[arg(long, env = "ROBOKASSA_HASH_ALGORITHM", default_value = "md5", global = true)]
    hash_algorithm: String,

    /// Custom data key prefix
    #[arg(long, env = "ROBOKASSA_USER_DATA_PREFIX", default_value = "Shp_", global = true)]
    user_data_prefix: String,

    /// Payment page template URL
    #[arg(long, env = "ROBOKASSA_PAYMENT_URL", default_value = DEFAULT_PAYMENT_URL, global = true)]
    payment_url: String,

    /// ResultURL request method (GET or POST)
    #[arg(long, env = "ROBOKASSA_RESULT_METHOD", default_value = "POST", global = true)]
    result_method: String,
}

impl GatewayArgs {
    fn build(&self) -> Result<GatewayConfig> {
        let config = GatewayConfig::builder(&self.merchant_login)
            .password1(&self.password1)
            .password2(&self.password2)
            .hash_algorithm(&self.hash_algorithm)
            .user_data_prefix(&self.user_data_prefix)
            .payment_url_template(&self.payment_url)
            .result_method(self.result_method.parse::<RequestMethod>()?)
            .build()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build a signed payment page URL
    PaymentUrl {
        /// Payment sum, passed verbatim (e.g. 100.00)
        out_sum: String,
        /// Payment description shown to the buyer
        description: String,
        #[arg(long)]
        invoice_id: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Currency of the sum (OutSumCurrency)
        #[arg(long)]
        currency: Option<String>,
        /// Mark the payment as a test payment
        #[arg(long)]
        test: bool,
        /// Custom data as key=value (repeatable)
        #[arg(long = "data", value_parser = parse_key_value)]
        data: Vec<(String, String)>,
    },
    /// Compute a signature
    Sign {
        #[command(subcommand)]
        kind: SignCommands,
    },
    /// Send a signed ResultURL callback to a running server
    Simulate {
        out_sum: String,
        invoice_id: String,
        /// Custom data as key=value (repeatable)
        #[arg(long = "data", value_parser = parse_key_value)]
        data: Vec<(String, String)>,
        /// Merchant ResultURL endpoint
        #[arg(
            long,
            env = "ROBOKASSA_RESULT_URL",
            default_value = "http://localhost:3000/robokassa/result"
        )]
        url: String,
    },
}

#[derive(Subcommand)]
enum SignCommands {
    /// Payment URL signature (password1)
    Outbound {
        out_sum: String,
        #[arg(long)]
        invoice_id: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long = "data", value_parser = parse_key_value)]
        data: Vec<(String, String)>,
    },
    /// ResultURL signature (password2)
    Inbound {
        out_sum: String,
        #[arg(long)]
        invoice_id: Option<String>,
        /// Unprefixed custom data as key=value (repeatable)
        #[arg(long = "data", value_parser = parse_key_value)]
        data: Vec<(String, String)>,
    },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got {:?}", s))
}

fn payment_url(config: GatewayConfig, req: &PaymentRequest) -> Result<String> {
    Ok(GatewayService::new(config).payment_url(req)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = cli.gateway.build().context("invalid gateway configuration")?;

    match cli.command {
        Commands::PaymentUrl {
            out_sum,
            description,
            invoice_id,
            email,
            currency,
            test,
            data,
        } => {
            let req = PaymentRequest {
                out_sum,
                description,
                invoice_id,
                email,
                out_sum_currency: currency,
                encoding: None,
                is_test: test,
                user_data: data.into_iter().collect(),
            };
            println!("{}", payment_url(config, &req)?);
        }
        Commands::Sign { kind } => {
            let engine = SignatureEngine::from_config(&config);
            let signature = match kind {
                SignCommands::Outbound {
                    out_sum,
                    invoice_id,
                    currency,
                    data,
                } => engine.outbound(
                    config.merchant_login(),
                    &out_sum,
                    invoice_id.as_deref(),
                    currency.as_deref(),
                    config.password1(),
                    &data.into_iter().collect::<CustomData>(),
                ),
                SignCommands::Inbound {
                    out_sum,
                    invoice_id,
                    data,
                } => engine.inbound(
                    &out_sum,
                    invoice_id.as_deref(),
                    config.password2(),
                    &data
                        .into_iter()
                        .collect::<CustomData>()
                        .prefixed(config.user_data_prefix()),
                ),
            };
            println!("{}", signature);
        }
        Commands::Simulate {
            out_sum,
            invoice_id,
            data,
            url,
        } => {
            let mut payment = CallbackPayment::new(out_sum).inv_id(invoice_id.clone());
            for (key, value) in data {
                payment = payment.user_data(key, value);
            }

            let client = ResultUrlClient::new(url, config);
            let resp = client.send(&payment).await?;

            if resp.is_acknowledged(Some(&invoice_id)) {
                println!("✅ Acknowledged: {}", resp.body);
            } else {
                println!("⚠️  Not acknowledged (HTTP {}): {:?}", resp.status, resp.body);
            }
        }
    }

    Ok(())
}
