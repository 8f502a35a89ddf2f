use clap::Parser;
use itertools::Itertools;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use retail_dash::cli::{report_scope, Args, Command, ListTarget};
use retail_dash::data::export::{export_model, ExportOutcome};
use retail_dash::data::model::Model;
use retail_dash::error::DashResult;
use retail_dash::query::filter::campaign_options;
use retail_dash::reports::build_report;

fn main() -> DashResult<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = args.resolve_config()?;

    match &args.command {
        Command::Summary => {
            let model = Model::generate(&config)?;
            println!("{}", serde_json::to_string_pretty(&model.summary()?)?);
        }
        Command::Export { force } => {
            let outcome = export_model(&args.out_dir, &config, *force)?;
            let verb = match outcome {
                ExportOutcome::Written(_) => "wrote",
                ExportOutcome::Reused(_) => "reused",
            };
            let manifest = outcome.manifest();
            println!(
                "{verb} export at {} (seed={}, records={}, digest={})",
                args.out_dir.display(),
                manifest.seed,
                manifest.records,
                manifest.digest
            );
        }
        Command::Report {
            dashboard,
            from,
            to,
            filters,
        } => {
            let model = Model::generate(&config)?;
            let scope = report_scope(&model, *from, *to, filters)?;
            match build_report(&model, *dashboard, &scope) {
                Some(report) => println!("{}", serde_json::to_string_pretty(&report)?),
                None => println!(
                    "no data for {} between {} and {}",
                    dashboard, scope.range.from, scope.range.to
                ),
            }
        }
        Command::List { target } => {
            let model = Model::generate(&config)?;
            let names: Vec<String> = match target {
                ListTarget::Stores => model.stores.iter().map(|s| s.name.to_string()).collect(),
                ListTarget::Categories => {
                    model.categories.iter().map(|c| c.to_string()).collect()
                }
                ListTarget::Campaigns => campaign_options(&model.records)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                ListTarget::Skus => model
                    .catalog
                    .iter()
                    .map(|item| format!("{}\t{}", item.sku, item.item_category))
                    .sorted()
                    .collect(),
            };
            for name in names {
                println!("{name}");
            }
        }
    }

    Ok(())
}
