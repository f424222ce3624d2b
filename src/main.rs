mod cli;

use std::{env, io, process, sync::Arc};

use log::error;

use timetable_ical_proxy::{serve, Proxy};

fn setup_logging() {
    if env::var("LOG").is_err() {
        env::set_var("LOG", "timetable_ical_proxy=info");
    }

    pretty_env_logger::init_custom_env("LOG");
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = cli::parse(env::args().skip(1).collect());

    setup_logging();

    let proxy = match Proxy::new(args.config) {
        Ok(proxy) => proxy,
        Err(err) => {
            error!("{err}");
            process::exit(1);
        }
    };

    if args.print {
        return print_schedule(&proxy).await;
    }

    serve(args.address, Arc::new(proxy)).await
}

async fn print_schedule(proxy: &Proxy) -> io::Result<()> {
    let schedule = match proxy.fetch_schedule().await {
        Ok(schedule) => schedule,
        Err(err) => {
            error!("{err}");
            process::exit(1);
        }
    };

    serde_json::to_writer_pretty(io::stdout().lock(), &schedule)?;
    println!();
    Ok(())
}
