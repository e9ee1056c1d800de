use clap::Parser;
use claimflow::prelude::*;
use claimflow::steps::StepInputs;
use std::io::{self, Write};
use std::time::Instant;

/// Inspect the claimant application flow for a claim snapshot
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the claim snapshot JSON file
    claim_path: Option<String>,

    /// Optional path to the engine config JSON file (feature flags, fixed date)
    #[arg(short, long)]
    config: Option<String>,

    /// Page to route from; prints the next and previous routes
    #[arg(short, long)]
    page: Option<String>,

    /// Navigation hint or extra query parameter, as key=value (repeatable)
    #[arg(long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Optional path to a warnings JSON file, keyed by claim id
    #[arg(short, long)]
    warnings: Option<String>,

    /// Run in interactive mode to be prompted for inputs
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

fn parse_param(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

fn main() {
    let cli = Cli::parse();

    if cli.human {
        run_interactive();
    } else {
        run_non_interactive(cli);
    }
}

fn run_inspection(
    claim_path: String,
    config_path: Option<String>,
    warnings_path: Option<String>,
    page: Option<String>,
    params: QueryParams,
) {
    let total_start = Instant::now();

    // --- 1. File Loading ---
    let claim = ClaimSnapshot::from_file(&claim_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to load claim from '{}': {}", claim_path, e))
    });
    let config = match config_path {
        Some(path) => EngineConfig::from_file(&path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => {
            println!("No config file provided. All feature flags are off.");
            EngineConfig::default()
        }
    };
    let store = match warnings_path {
        Some(path) => WarningStore::from_file(&path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to load warnings from '{}': {}", path, e))
        }),
        None => WarningStore::new(),
    };
    let warnings = claim.claim_id().map(|id| store.get(id)).unwrap_or_default();
    let today = config.today();

    // --- 2. Graph Build ---
    let graph = build_portal_graph()
        .unwrap_or_else(|e| exit_with_error(&format!("Flow graph is invalid: {}", e)));
    println!(
        "Flow graph built: {} pages, {} steps",
        graph.pages().len(),
        graph.steps().len()
    );

    // --- 3. Checklist ---
    let steps = StepModel::new(&graph)
        .compute(&StepInputs::new(&claim, &config, today).with_warnings(warnings));
    println!("\nChecklist for claim {:?} (as of {}):", claim.claim_id(), today);
    for step in &steps {
        println!(
            "  {:>2}. [group {}] {:<22} {:<14}{}",
            step.index,
            step.group,
            step.name.to_string(),
            format!("{:?}", step.status),
            if step.editable { "" } else { " (locked)" }
        );
        if !step.missing_fields.is_empty() {
            let missing: Vec<String> = step.missing_fields.iter().map(|p| p.to_string()).collect();
            println!("        missing: {}", missing.join(", "));
        }
    }
    println!("  -> Part 1 ready: {}", steps.part_one_ready());
    println!("  -> Ready to submit: {}", steps.ready_to_submit());

    // --- 4. Routing ---
    if let Some(page) = page {
        let ctx = ClaimContext::new(&claim, &config, today).with_hints(&params);
        let router = PortalFlowRouter::new(&graph);
        println!("\nRouting from '{}':", page);
        match graph.resolve_traced(&page, &ctx) {
            Ok(resolution) => println!(
                "  -> Next page: {} ({})",
                resolution.target.name, resolution.reason
            ),
            Err(e) => println!("  -> Next page: none ({})", e),
        }
        match router.next_page_route(&page, &ctx, &params) {
            Ok(route) => println!("  -> Next route: {}", route.href),
            Err(e) => println!("  -> Next route: none ({})", e),
        }
        match router.previous_page_route(&page, &ctx, &params) {
            Ok(route) => println!("  -> Previous route: {}", route.href),
            Err(e) => println!("  -> Previous route: none ({})", e),
        }
    }

    println!("\nTotal Execution: {:?}", total_start.elapsed());
}

/// Runs the CLI in non-interactive mode, taking all arguments from the command line.
fn run_non_interactive(cli: Cli) {
    let claim_path = cli.claim_path.unwrap_or_else(|| {
        exit_with_error("Claim path is required in non-interactive mode.");
    });
    let params = cli.params.into_iter().collect();

    run_inspection(claim_path, cli.config, cli.warnings, cli.page, params);
}

/// Runs the CLI in an interactive, human-friendly mode with prompts.
fn run_interactive() {
    println!("--- Claimflow Interactive Mode ---");

    let claim_path = prompt_for_input("Enter claim snapshot path", Some("data/claim.json"));
    let config_path = optional(prompt_for_input(
        "Enter config path (optional)",
        Some("data/config.json"),
    ));
    let warnings_path = optional(prompt_for_input("Enter warnings path (optional)", None));
    let page = optional(prompt_for_input("Enter page to route from (optional)", None));

    run_inspection(
        claim_path,
        config_path,
        warnings_path,
        page,
        QueryParams::new(),
    );
}

fn optional(input: String) -> Option<String> {
    if input.is_empty() { None } else { Some(input) }
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    if io::stdout().flush().is_err() || io::stdin().read_line(&mut line).is_err() {
        exit_with_error("Failed to read from the terminal");
    }
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
