use chorder::{ir, registry, ClickHouseLocal, ColumnMatching, Error, OrderOptions};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "chorder")]
#[command(about = "Dependency ordering for ClickHouse DDL batches", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the registered passes
    ListPasses,
    /// Run one pass over a KDL input
    RunPass {
        pass: String,
        #[arg(long = "in")]
        input: PathBuf,
        #[arg(long = "out")]
        output: PathBuf,
    },
    /// Order the statements of a KDL batch, fetching missing dumps from clickhouse-local
    Order {
        #[arg(long = "in")]
        input: PathBuf,
        #[arg(long = "out", default_value = "-")]
        output: PathBuf,
        /// Program invoked as `<program> --query "explain ast ..."`
        #[arg(
            long,
            env = "CHORDER_EXPLAIN_PROGRAM",
            default_value = "clickhouse-local"
        )]
        explain_program: String,
        /// How columns of different statements are matched: name or qualified
        #[arg(long, default_value_t = ColumnMatching::Name)]
        column_matching: ColumnMatching,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(err) = run() {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let cli = Cli::parse();

    match cli.command {
        Commands::ListPasses => {
            for pass in registry::all_passes() {
                println!("{}\t{}", pass.name, pass.help);
            }
        }
        Commands::RunPass {
            pass,
            input,
            output,
        } => {
            let spec = registry::find_pass(&pass).ok_or_else(|| {
                Error::Input(format!("unknown pass '{}'", pass))
            })?;
            let input_text = read_input(&input)?;
            let result = (spec.run)(&input_text)?;
            write_output(&output, &result)?;
        }
        Commands::Order {
            input,
            output,
            explain_program,
            column_matching,
        } => {
            let batch = ir::batch::parse_kdl(&read_input(&input)?)?;
            let mut source = ClickHouseLocal::new(explain_program);
            let options = OrderOptions { column_matching };
            tracing::info!(
                statements = batch.statements.len(),
                program = source.program(),
                %column_matching,
                "ordering batch"
            );

            let ordered = chorder::order_batch(&batch, &mut source, &options)?;
            write_output(&output, &ir::batch::print_kdl(&ordered))?;
        }
    }

    Ok(())
}

fn read_input(path: &PathBuf) -> Result<String, Error> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }

    Ok(fs::read_to_string(path)?)
}

fn write_output(path: &PathBuf, contents: &str) -> Result<(), Error> {
    if path.as_os_str() == "-" {
        let mut stdout = io::stdout();
        stdout.write_all(contents.as_bytes())?;
        return Ok(());
    }

    fs::write(path, contents)?;
    Ok(())
}
