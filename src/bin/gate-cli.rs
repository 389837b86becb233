use chrono::Utc;
use clap::{Parser, Subcommand};
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, ORIGIN};
use reqwest::Method;
use serde_json::{Map, Value};

#[derive(Parser)]
#[command(name = "gate-cli")]
#[command(about = "Development helper for the API gate", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mint an HS256 bearer token signed with the shared secret
    Token {
        #[arg(short, long, env = "JWT_SECRET")]
        secret: String,

        #[arg(long)]
        subject: String,

        /// Lifetime in seconds; 0 omits `exp`
        #[arg(long, default_value_t = 3600)]
        ttl_secs: i64,

        /// Extra string claims as key=value
        #[arg(long = "claim", value_parser = parse_claim)]
        claims: Vec<(String, String)>,
    },
    /// Send one request through the gate and print the outcome
    Probe {
        #[arg(short, long, default_value = "http://localhost:8080/api/get-nonce")]
        url: String,

        #[arg(short, long)]
        token: Option<String>,

        #[arg(short, long)]
        origin: Option<String>,

        #[arg(short, long, default_value = "GET")]
        method: String,
    },
}

fn parse_claim(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

/// Standard claims first; extra claims may override them.
fn token_payload(
    subject: String,
    ttl_secs: i64,
    now: i64,
    claims: Vec<(String, String)>,
) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("sub".into(), Value::from(subject));
    payload.insert("iat".into(), Value::from(now));
    if ttl_secs > 0 {
        payload.insert("exp".into(), Value::from(now + ttl_secs));
    }
    for (k, v) in claims {
        payload.insert(k, Value::from(v));
    }
    payload
}

fn mint_token(
    secret: &str,
    payload: &Map<String, Value>,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        payload,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Token {
            secret,
            subject,
            ttl_secs,
            claims,
        } => {
            let payload = token_payload(subject, ttl_secs, Utc::now().timestamp(), claims);
            println!("{}", mint_token(&secret, &payload)?);
        }
        Commands::Probe {
            url,
            token,
            origin,
            method,
        } => {
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
            let mut headers = HeaderMap::new();
            if let Some(token) = token {
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bearer {}", token))?,
                );
            }
            if let Some(origin) = origin {
                headers.insert(ORIGIN, HeaderValue::from_str(&origin)?);
            }

            let client = reqwest::Client::new();
            let res = client.request(method, &url).headers(headers).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    println!("Status: {}", res.status());
    for name in [
        "x-request-id",
        "access-control-allow-origin",
        "access-control-allow-methods",
        "access-control-allow-headers",
    ] {
        if let Some(value) = res.headers().get(name) {
            println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
        }
    }

    let text = res.text().await?;
    if text.is_empty() {
        return Ok(());
    }
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
