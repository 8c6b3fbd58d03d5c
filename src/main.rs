use std::path::PathBuf;

use hlsbuild::config::settings;
use hlsbuild::log_collector::{self, BuildLogger};
use hlsbuild::orchestrator::plan::{DEFAULT_COMPONENT, DEFAULT_WORKSPACE};
use hlsbuild::{BuildPlan, Orchestrator, VitisClient};

const USAGE: &str = "\
hlsbuild - drive an HLS component through the unified CLI build flow

USAGE:
    hlsbuild [OPTIONS]

OPTIONS:
    --workspace <dir>    Workspace directory (default: fitness_function)
    --component <name>   Component name (default: fitness_hls)
    --plan <file.json>   Execute a plan file instead of the standard sequence
    --print-plan         Print the effective plan as JSON and exit
    --dry-run            Log tool invocations without spawning them
    -h, --help           Show this help
";

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    workspace: Option<PathBuf>,
    component: Option<String>,
    plan: Option<PathBuf>,
    print_plan: bool,
    dry_run: bool,
    help: bool,
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<CliArgs, String> {
    let mut parsed = CliArgs::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--workspace" => {
                let value = args.next().ok_or("--workspace requires a value")?;
                parsed.workspace = Some(PathBuf::from(value));
            }
            "--component" => {
                let value = args.next().ok_or("--component requires a value")?;
                parsed.component = Some(value);
            }
            "--plan" => {
                let value = args.next().ok_or("--plan requires a value")?;
                parsed.plan = Some(PathBuf::from(value));
            }
            "--print-plan" => parsed.print_plan = true,
            "--dry-run" => parsed.dry_run = true,
            "-h" | "--help" => parsed.help = true,
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }
    Ok(parsed)
}

fn main() -> hlsbuild::Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        print!("{}", USAGE);
        return Ok(());
    }

    // Logging comes up before anything that can fail interestingly.
    let log_dir = log_collector::global_logs_path()?;
    BuildLogger::init(&log_dir)?;
    log::info!("hlsbuild {} starting", hlsbuild::VERSION);

    let settings = settings::load_settings(&settings::global_settings_path()?)?;

    let plan = match &args.plan {
        Some(path) => {
            let plan = BuildPlan::from_json_file(path)?;
            log::info!("Loaded plan from {}", path.display());
            plan
        }
        None => {
            let workspace = args
                .workspace
                .clone()
                .or_else(|| settings.workspace_root.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKSPACE));
            let component = args.component.as_deref().unwrap_or(DEFAULT_COMPONENT);
            BuildPlan::standard(&workspace, component)
        }
    };

    if args.print_plan {
        println!("{}", plan.to_json()?);
        return Ok(());
    }

    let mut client = VitisClient::new().with_tool_dir(settings.tool_dir);
    if args.dry_run {
        client = client.with_dry_run(true);
    }

    let report = match Orchestrator::new(client).execute(&plan) {
        Ok(report) => report,
        Err(e) => {
            log::error!("Build failed: {}", e);
            return Err(e.into());
        }
    };

    let report_path = plan.workspace.join("build_report.json");
    std::fs::write(&report_path, serde_json::to_string_pretty(&report)?)?;
    log::info!(
        "All {} call(s) succeeded; report written to {}",
        report.statuses.len(),
        report_path.display()
    );

    Ok(())
}
