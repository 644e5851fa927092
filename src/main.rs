use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use rulegate::rules::{compile, evaluate, Bindings};
use rulegate::ruleset::{parse_binding_arg, RuleSet, RuleSetLoader, RuleSetRegistry};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug)]
struct BindingArgs {
    /// JSON or YAML file with variable bindings
    #[arg(short, long)]
    bindings: Option<PathBuf>,

    /// Extra binding as KEY=VALUE; overrides the bindings file
    #[arg(long = "var", value_name = "KEY=VALUE")]
    vars: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a single expression
    Eval {
        /// The rule expression
        #[arg(short, long)]
        expression: String,

        #[command(flatten)]
        bindings: BindingArgs,
    },
    /// Compile an expression and print its normalized form
    Compile {
        /// The rule expression
        #[arg(short, long)]
        expression: String,
    },
    /// Evaluate every rule in a rule set file
    Check {
        /// Path to the rule set YAML file
        #[arg(short, long)]
        rules: PathBuf,

        #[command(flatten)]
        bindings: BindingArgs,
    },
    /// Serve rule evaluation over HTTP
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "RULEGATE_PORT", default_value_t = 3000)]
        port: u16,

        /// Directory of rule set YAML files to register
        #[arg(long, env = "RULEGATE_RULES_DIR", default_value = "rules")]
        rules_dir: PathBuf,
    },
}

fn load_bindings(loader: &RuleSetLoader, args: &BindingArgs) -> anyhow::Result<Bindings> {
    let mut bindings = match &args.bindings {
        Some(path) => loader
            .load_bindings(path)
            .with_context(|| format!("Failed to load bindings from {:?}", path))?,
        None => Bindings::new(),
    };

    for var in &args.vars {
        let (name, value) = parse_binding_arg(var)?;
        bindings.insert(name, value);
    }

    log::debug!("Loaded {} bindings", bindings.len());
    Ok(bindings)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let loader = RuleSetLoader::new();

    match args.command {
        Commands::Eval {
            expression,
            bindings,
        } => {
            let bindings = load_bindings(&loader, &bindings)?;
            let result = evaluate(&bindings, &expression)?;
            println!("{}", result);
        }
        Commands::Compile { expression } => {
            let expr = compile(&expression)?;
            println!("{}", expr);
            println!("variables: {}", expr.variables().join(", "));
        }
        Commands::Check { rules, bindings } => {
            let set = loader
                .load_ruleset(&rules)
                .with_context(|| format!("Failed to load rule set from {:?}", rules))?;
            let bindings = load_bindings(&loader, &bindings)?;

            println!("Rule set: {}", set.name());
            if !set.description().is_empty() {
                println!("  {}", set.description());
            }
            let outcomes = set.evaluate(&bindings);
            for outcome in &outcomes {
                match &outcome.result {
                    Ok(result) => println!("  {}: {}", outcome.rule, result),
                    Err(e) => println!("  {}: error: {}", outcome.rule, e),
                }
            }

            match RuleSet::matched(&outcomes)? {
                Some(rule) => println!("Matched: {}", rule),
                None => println!("Matched: none"),
            }
        }
        Commands::Serve { port, rules_dir } => {
            let registry = RuleSetRegistry::new();

            if rules_dir.is_dir() {
                for set in loader.load_dir(&rules_dir)? {
                    log::info!("Registered rule set: {}", set.name());
                    registry.register(set).await;
                }
            } else {
                log::warn!("Rules directory {:?} not found, starting empty", rules_dir);
            }

            rulegate::server::serve(port, registry).await?;
        }
    }

    Ok(())
}
