//! Harness CLI entry point.

use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rhizome_harness_core::{Value, json_to_string};
use rhizome_harness_host::{HttpSource, IoError, OutputSlot, read_file};
use rhizome_harness_runtime_luajit::{Sandbox, SandboxConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "harness")]
#[command(about = "Run Lua programs against the harness intrinsics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a Lua file
    Run {
        /// Input file (or - for stdin)
        file: String,

        #[command(flatten)]
        eval: EvalArgs,
    },

    /// Fetch a program over HTTP and execute it
    Fetch {
        /// Program URL
        url: String,

        /// Treat the URL as a source base and fetch its saved program
        #[arg(long)]
        saved: bool,

        #[command(flatten)]
        eval: EvalArgs,
    },

    /// Post a file's content to a URL
    Post {
        /// Destination URL
        url: String,

        /// File to send
        file: String,
    },
}

#[derive(Args)]
struct EvalArgs {
    /// Expected result as JSON
    #[arg(long)]
    expect: Option<String>,

    /// Sandbox configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// Outcome of comparing a result with `--expect`.
#[derive(Debug, PartialEq)]
enum Verdict {
    Unchecked,
    Matched,
    Mismatched { expected: Value },
}

impl EvalArgs {
    fn sandbox(&self) -> Result<Sandbox, Box<dyn std::error::Error>> {
        let config = match &self.config {
            Some(path) => SandboxConfig::load(path)?,
            None => SandboxConfig::default(),
        };
        Ok(Sandbox::new(config))
    }

    fn check(&self, sandbox: &Sandbox, result: &Value) -> Result<Verdict, Box<dyn std::error::Error>> {
        let Some(expect) = &self.expect else {
            return Ok(Verdict::Unchecked);
        };
        let json: serde_json::Value = serde_json::from_str(expect)?;
        let expected = Value::try_from(json)?;
        if sandbox.equality().holds(result, &expected) {
            Ok(Verdict::Matched)
        } else {
            Ok(Verdict::Mismatched { expected })
        }
    }

    /// Run `code`, emit the result and report whether it met the
    /// expectation.
    fn evaluate(&self, code: &str) -> Result<bool, Box<dyn std::error::Error>> {
        let sandbox = self.sandbox()?;
        let result = sandbox.run(code)?;
        let rendered = json_to_string(&result)?;

        match &self.out {
            Some(path) => OutputSlot::new(Some(path.clone())).write_into(&rendered)?,
            None => println!("{}", rendered),
        }

        match self.check(&sandbox, &result)? {
            Verdict::Unchecked => Ok(true),
            Verdict::Matched => {
                info!("result matches expectation");
                Ok(true)
            }
            Verdict::Mismatched { expected } => {
                eprintln!("expected: {}", expected);
                eprintln!("  actual: {}", result);
                Ok(false)
            }
        }
    }
}

fn read_input(file: &str) -> Result<String, IoError> {
    if file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| IoError::Read {
                path: file.to_string(),
                message: e.to_string(),
            })?;
        Ok(buf)
    } else {
        read_file(file).map_err(|message| IoError::Read {
            path: file.to_string(),
            message,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("harness=info".parse()?))
        .init();

    let cli = Cli::parse();

    let passed = match cli.command {
        Commands::Run { file, eval } => {
            let code = read_input(&file)?;
            eval.evaluate(&code)?
        }

        Commands::Fetch { url, saved, eval } => {
            let code = if saved {
                HttpSource::new(url).fetch_source().await?
            } else {
                HttpSource::new(url.as_str()).fetch_text(&url).await?
            };
            eval.evaluate(&code)?
        }

        Commands::Post { url, file } => {
            let data = read_input(&file)?;
            HttpSource::new(url.as_str()).post(&url, data).await?;
            true
        }
    };

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_args(expect: Option<&str>) -> EvalArgs {
        EvalArgs {
            expect: expect.map(str::to_string),
            config: None,
            out: None,
        }
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from(["harness", "run", "-", "--expect", "42"]).unwrap();
        match cli.command {
            Commands::Run { file, eval } => {
                assert_eq!(file, "-");
                assert_eq!(eval.expect.as_deref(), Some("42"));
                assert!(eval.config.is_none());
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_fetch_saved() {
        let cli = Cli::try_parse_from(["harness", "fetch", "http://localhost:8080", "--saved"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Fetch { saved: true, .. }));
    }

    #[test]
    fn test_check_verdicts() {
        let sandbox = Sandbox::default();
        let result = sandbox.run(r#"{ a = 1 }"#).unwrap();

        assert_eq!(
            eval_args(None).check(&sandbox, &result).unwrap(),
            Verdict::Unchecked
        );
        assert_eq!(
            eval_args(Some(r#"{"a": 1}"#)).check(&sandbox, &result).unwrap(),
            Verdict::Matched
        );
        assert!(matches!(
            eval_args(Some(r#"{"a": 2}"#)).check(&sandbox, &result).unwrap(),
            Verdict::Mismatched { .. }
        ));
    }

    #[test]
    fn test_check_rejects_bad_expectation() {
        let sandbox = Sandbox::default();
        let result = Value::from(1);
        assert!(eval_args(Some("not json")).check(&sandbox, &result).is_err());
        assert!(eval_args(Some("null")).check(&sandbox, &result).is_err());
    }

    #[test]
    fn test_evaluate_writes_output_slot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        let args = EvalArgs {
            expect: Some("[\"a\", \"b\"]".to_string()),
            config: None,
            out: Some(path.clone()),
        };

        assert!(args.evaluate(r#"harness.split({"a,b", ","})"#).unwrap());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[\n  \"a\",\n  \"b\"\n]"
        );
    }

    #[test]
    fn test_evaluate_fails_on_unwritable_output() {
        let dir = tempfile::tempdir().unwrap();
        let args = EvalArgs {
            expect: None,
            config: None,
            out: Some(dir.path().join("no/such/dir/result.json")),
        };
        let err = args.evaluate("42").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<IoError>(),
            Some(IoError::Write { .. })
        ));
    }

    #[test]
    fn test_read_input_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.lua");
        match read_input(path.to_str().unwrap()) {
            Err(IoError::Read { path: reported, message }) => {
                assert!(reported.ends_with("missing.lua"));
                assert!(!message.is_empty());
            }
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("program.lua");
        std::fs::write(&path, "return 1").unwrap();
        assert_eq!(read_input(path.to_str().unwrap()).unwrap(), "return 1");
    }

    #[test]
    fn test_evaluate_reports_mismatch() {
        let args = eval_args(Some("false"));
        assert!(!args.evaluate("equal({1, 1})").unwrap());
    }

    #[test]
    fn test_evaluate_propagates_fault() {
        assert!(eval_args(None).evaluate("this is not valid code").is_err());
    }
}
